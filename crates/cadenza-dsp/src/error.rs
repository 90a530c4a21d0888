//! Error types for cadenza-dsp

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown compressor parameter: {0}")]
    UnknownParameter(String),

    #[error("Compressor parameter '{0}' is read-only")]
    ReadOnlyParameter(String),

    #[error("Unknown compressor preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, Error>;
