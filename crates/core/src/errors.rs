use thiserror::Error;

/// No eligible product was left for a selection step. Recoverable: the
/// composer shrinks the order or skips the slot; it never aborts the run and
/// never falls back to an out-of-stock product.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("no eligible product remains in the catalog for this selection")]
pub struct EmptyCatalog;

/// Conditions that prevent producing any meaningful dataset. Everything else
/// in the pipeline is locally recovered and the run completes best-effort.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("product table is empty; cannot compose orders")]
    EmptyProductTable,
    #[error("customer table is empty; cannot compose orders")]
    EmptyCustomerTable,
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: std::path::PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: std::path::PathBuf, source: toml::de::Error },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
