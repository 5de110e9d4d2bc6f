//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while scheduling or running ticks.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Circuit error: {0}")]
    Circuit(#[from] lf_circuit::CircuitError),
}

pub type SimResult<T> = Result<T, SimError>;
