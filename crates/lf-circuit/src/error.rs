//! Error types for circuit operations.

use lf_core::{CompId, PinId, TemplateId};
use thiserror::Error;

use crate::gate::GateKind;
use crate::pin::PinKind;

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Errors that can occur while building or mutating a circuit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// Component handle does not refer to anything in this circuit.
    #[error("Component {id} does not exist")]
    ComponentNotFound { id: CompId },

    /// Pin handle does not refer to anything in this circuit.
    #[error("Pin {id} does not exist")]
    PinNotFound { id: PinId },

    /// Operation requires a live component.
    #[error("Component {id} is disabled")]
    ComponentDisabled { id: CompId },

    /// A component has no pin at the requested index.
    #[error("Component {id} has no {kind:?} pin at index {index}")]
    PinIndexOutOfRange {
        id: CompId,
        kind: PinKind,
        index: usize,
    },

    /// Rejected wiring request.
    #[error("Invalid wire: {what}")]
    InvalidWire { what: String },

    /// Template id not present in the registry.
    #[error("Unknown template {id}")]
    UnknownTemplate { id: TemplateId },

    /// Template id registered twice.
    #[error("Template {id} is already registered")]
    DuplicateTemplate { id: TemplateId },

    /// Pin list does not match the gate's fixed arity.
    #[error("{kind} expects {expected} {side:?} pins, got {actual}")]
    ArityMismatch {
        kind: GateKind,
        side: PinKind,
        expected: usize,
        actual: usize,
    },

    /// Operation only applies to a specific gate kind.
    #[error("Component {id} is a {actual}, expected {expected}")]
    WrongKind {
        id: CompId,
        expected: GateKind,
        actual: GateKind,
    },

    /// Arena has no ids left.
    #[error("Too many {what} for a circuit")]
    CapacityExceeded { what: &'static str },

    /// Structural invariant broken (pin ownership, adjacency, live sets).
    #[error("Inconsistent circuit: {what}")]
    Inconsistent { what: String },
}
