//! Error types for cadenza-core.

use thiserror::Error;

/// Error type for cadenza-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to decode audio data: {0}")]
    Decode(String),

    #[error("Effect '{0}' was dropped before it finished loading")]
    EffectDropped(String),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
