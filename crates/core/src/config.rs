use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

fn default_users() -> u32 {
    1_000
}

fn default_products() -> u32 {
    200
}

fn default_orders() -> u32 {
    1_000
}

fn default_reviews() -> u32 {
    500
}

fn default_seed() -> u64 {
    42
}

fn default_history_days() -> u32 {
    365
}

fn default_batch_size() -> usize {
    512
}

fn default_reference_date() -> NaiveDate {
    // Fixed default so two runs without an explicit date still agree.
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}

/// Knobs for one generation run. Every sampling operation in the pipeline is
/// derived from `seed`, so identical config reproduces identical output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub users: u32,
    pub products: u32,
    pub orders: u32,
    pub reviews: u32,
    pub seed: u64,
    /// "Today" for the run: order ages, statuses, and signup tenure are all
    /// computed against this date rather than the wall clock.
    pub reference_date: NaiveDate,
    /// Orders are dated within this many days before `reference_date`.
    pub history_days: u32,
    /// Orders are composed and handed to sinks in batches of this many; a
    /// batch never splits one order's line items.
    pub batch_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            users: default_users(),
            products: default_products(),
            orders: default_orders(),
            reviews: default_reviews(),
            seed: default_seed(),
            reference_date: default_reference_date(),
            history_days: default_history_days(),
            batch_size: default_batch_size(),
        }
    }
}

impl GenerationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::ParseFile {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_days == 0 {
            return Err(ConfigError::Validation("history_days must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Validation("batch_size must be at least 1".to_string()));
        }
        if self.orders > 0 && self.products == 0 {
            return Err(ConfigError::Validation(
                "cannot generate orders with zero products".to_string(),
            ));
        }
        if self.orders > 0 && self.users == 0 {
            return Err(ConfigError::Validation(
                "cannot generate orders with zero users".to_string(),
            ));
        }
        if self.reviews > 0 && (self.products == 0 || self.users == 0) {
            return Err(ConfigError::Validation(
                "cannot generate reviews without products and users".to_string(),
            ));
        }
        Ok(())
    }

    /// Earliest date an order can carry.
    pub fn history_start(&self) -> NaiveDate {
        self.reference_date - chrono::Duration::days(i64::from(self.history_days))
    }
}
