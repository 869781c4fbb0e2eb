pub mod generate;
pub mod plan;

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use synthmart_core::{ConfigError, GenerationConfig};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, details: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            details,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            details: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Named dataset scale presets. A preset fills in the row counts; explicit
/// flags still win over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    Xlarge,
}

impl SizePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizePreset::Small => "small",
            SizePreset::Medium => "medium",
            SizePreset::Large => "large",
            SizePreset::Xlarge => "xlarge",
        }
    }

    /// (users, products, orders, reviews) for this preset.
    fn row_counts(&self) -> (u32, u32, u32, u32) {
        match self {
            SizePreset::Small => (100, 50, 200, 100),
            SizePreset::Medium => (1_000, 200, 2_000, 1_000),
            SizePreset::Large => (10_000, 1_000, 20_000, 10_000),
            SizePreset::Xlarge => (50_000, 5_000, 100_000, 50_000),
        }
    }

    /// Bucket an order count back into the closest preset label.
    pub fn for_order_count(orders: u32) -> SizePreset {
        if orders <= 1_000 {
            SizePreset::Small
        } else if orders <= 10_000 {
            SizePreset::Medium
        } else if orders <= 100_000 {
            SizePreset::Large
        } else {
            SizePreset::Xlarge
        }
    }
}

/// Shared override flags for `generate` and `plan`.
#[derive(Debug, Default, clap::Args)]
pub struct ConfigOverrides {
    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<std::path::PathBuf>,
    #[arg(long, value_enum, help = "Dataset scale preset")]
    pub size: Option<SizePreset>,
    #[arg(long, help = "Number of users to generate")]
    pub users: Option<u32>,
    #[arg(long, help = "Number of products to generate")]
    pub products: Option<u32>,
    #[arg(long, help = "Number of orders to generate")]
    pub orders: Option<u32>,
    #[arg(long, help = "Number of reviews to generate")]
    pub reviews: Option<u32>,
    #[arg(long, help = "Master seed; identical seeds reproduce identical datasets")]
    pub seed: Option<u64>,
}

/// Layering: file (or defaults), then size preset, then explicit flags.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<GenerationConfig, ConfigError> {
    let mut config = match &overrides.config {
        Some(path) => GenerationConfig::load(Path::new(path))?,
        None => GenerationConfig::default(),
    };

    if let Some(size) = overrides.size {
        let (users, products, orders, reviews) = size.row_counts();
        config.users = users;
        config.products = products;
        config.orders = orders;
        config.reviews = reviews;
    }

    if let Some(users) = overrides.users {
        config.users = users;
    }
    if let Some(products) = overrides.products {
        config.products = products;
    }
    if let Some(orders) = overrides.orders {
        config.orders = orders;
    }
    if let Some(reviews) = overrides.reviews {
        config.reviews = reviews;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}
