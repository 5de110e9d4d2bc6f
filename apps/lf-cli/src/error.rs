//! Error types for the command-line front end.

use std::path::PathBuf;

/// Unified error for every subcommand.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read circuit file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write circuit file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported file extension: {path} (expected .bin, .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Circuit error: {0}")]
    Circuit(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Simulation error: {0}")]
    Simulation(String),
}

/// Result type for lf-cli operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<lf_circuit::CircuitError> for AppError {
    fn from(err: lf_circuit::CircuitError) -> Self {
        AppError::Circuit(err.to_string())
    }
}

impl From<lf_codec::CodecError> for AppError {
    fn from(err: lf_codec::CodecError) -> Self {
        AppError::Codec(err.to_string())
    }
}

impl From<lf_sim::SimError> for AppError {
    fn from(err: lf_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
