use serde_json::json;

use crate::commands::{resolve_config, CommandResult, ConfigOverrides, SizePreset};

#[derive(Debug, clap::Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Resolve and echo the effective configuration without generating anything.
pub fn run(args: &PlanArgs) -> CommandResult {
    let config = match resolve_config(&args.overrides) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "plan",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let details = json!({
        "size_bucket": SizePreset::for_order_count(config.orders).as_str(),
        "users": config.users,
        "products": config.products,
        "orders": config.orders,
        "reviews": config.reviews,
        "seed": config.seed,
        "reference_date": config.reference_date.to_string(),
        "history_days": config.history_days,
        "batch_size": config.batch_size,
    });

    CommandResult::success("plan", "effective configuration resolved", Some(details))
}
