use thiserror::Error;

use tontine_config::ConfigError;
use tontine_core::CoreError;

/// Errors raised while loading snapshots or wiring the calculator to its collaborators.
#[derive(Debug, Error)]
pub enum TontineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Unsupported snapshot schema version {0}")]
    UnsupportedSchema(u32),
}
