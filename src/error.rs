//! Error types for the configuration loading surface
//!
//! The breakdown engine itself is infallible: a missing field, mapping
//! entry, or non-numeric value contributes zero and calculation
//! continues. Errors only arise when reading a stored configuration.

use thiserror::Error;

/// Errors surfaced by the pricing configuration loaders.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
