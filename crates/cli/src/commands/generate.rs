use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde_json::json;

use synthmart_core::DatasetGenerator;

use crate::commands::{resolve_config, CommandResult, ConfigOverrides, SizePreset};
use crate::output;

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
    #[arg(
        long,
        help = "Directory the CSV files are written to (default: datasets/<size>_<timestamp>)"
    )]
    pub output: Option<PathBuf>,
}

pub fn run(args: &GenerateArgs) -> CommandResult {
    let config = match resolve_config(&args.overrides) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "generate",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(config.orders, chrono::Local::now().naive_local()));

    let generator = match DatasetGenerator::new(config.clone()) {
        Ok(generator) => generator,
        Err(error) => {
            return CommandResult::failure("generate", "config_validation", error.to_string(), 2);
        }
    };

    let (dataset, report) = match generator.generate() {
        Ok(result) => result,
        Err(error) => {
            return CommandResult::failure("generate", "generation", error.to_string(), 3);
        }
    };

    if let Err(error) = output::write_dataset(&output_dir, &dataset, &config, &report) {
        return CommandResult::failure(
            "generate",
            "output_io",
            format!("could not write dataset to `{}`: {error}", output_dir.display()),
            4,
        );
    }

    let details = json!({
        "output_dir": output_dir.display().to_string(),
        "size_bucket": SizePreset::for_order_count(config.orders).as_str(),
        "seed": config.seed,
        "rows": {
            "users": dataset.customers.len(),
            "products": dataset.products.len(),
            "orders": dataset.orders.len(),
            "order_items": dataset.order_items.len(),
            "reviews": dataset.reviews.len(),
        },
        "abandoned_orders": report.abandoned_orders,
        "cross_sell_items": report.cross_sell_items,
    });

    CommandResult::success("generate", "dataset written", Some(details))
}

/// `datasets/<size>_<timestamp>` for runs that do not name a directory.
fn default_output_dir(orders: u32, now: NaiveDateTime) -> PathBuf {
    let bucket = SizePreset::for_order_count(orders).as_str();
    PathBuf::from("datasets").join(format!("{bucket}_{}", now.format("%Y%m%d_%H%M%S")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::path::PathBuf;

    use super::default_output_dir;

    #[test]
    fn default_directory_is_bucketed_and_timestamped() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 5)
            .expect("valid date")
            .and_hms_opt(14, 30, 9)
            .expect("valid time");
        assert_eq!(
            default_output_dir(200, now),
            PathBuf::from("datasets/small_20260305_143009")
        );
        assert_eq!(
            default_output_dir(20_000, now),
            PathBuf::from("datasets/large_20260305_143009")
        );
    }
}
