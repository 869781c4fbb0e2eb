pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::{generate::GenerateArgs, plan::PlanArgs};

#[derive(Debug, Parser)]
#[command(
    name = "synthmart",
    about = "Synthetic e-commerce dataset generator",
    long_about = "Generate reproducible relational e-commerce datasets: users, products, \
                  orders, order items, and reviews, all derived from one seed.",
    after_help = "Examples:\n  synthmart generate --size small --output ./dataset\n  synthmart generate --config synthmart.toml --seed 7\n  synthmart plan --size large"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate a dataset and write it as CSV files plus metadata")]
    Generate(GenerateArgs),
    #[command(about = "Resolve the effective configuration and report it without generating")]
    Plan(PlanArgs),
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => commands::generate::run(&args),
        Command::Plan(args) => commands::plan::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
