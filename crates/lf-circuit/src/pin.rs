//! Connector pins.

use lf_core::{CompId, PinId, Point};
use serde::{Deserialize, Serialize};

/// Direction of a pin relative to its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Consumes a value driven from elsewhere.
    Input,
    /// Driven by the owning component's gate.
    Output,
}

/// A single boolean signal endpoint owned by a component.
///
/// `downstream` is a plain ordered successor list: assigning a value to this
/// pin assigns the same value to every pin reachable through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub id: PinId,
    pub kind: PinKind,
    /// Owning component (handle, not ownership).
    pub owner: CompId,
    /// Anchor relative to the owner's model origin.
    pub offset: Point,
    pub(crate) value: bool,
    pub(crate) downstream: Vec<PinId>,
}

impl Pin {
    pub(crate) fn new(id: PinId, kind: PinKind, owner: CompId, offset: Point) -> Self {
        Self {
            id,
            kind,
            owner,
            offset,
            value: false,
            downstream: Vec::new(),
        }
    }

    /// Current stored value. No propagation.
    pub fn value(&self) -> bool {
        self.value
    }

    /// Directly wired fan-out targets, in wiring order.
    pub fn downstream(&self) -> &[PinId] {
        &self.downstream
    }

    pub fn is_input(&self) -> bool {
        self.kind == PinKind::Input
    }

    pub fn is_output(&self) -> bool {
        self.kind == PinKind::Output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::Id;

    #[test]
    fn new_pin_is_low_and_unwired() {
        let pin = Pin::new(
            Id::from_index(3),
            PinKind::Output,
            Id::from_index(0),
            Point::new(96, 16),
        );
        assert!(!pin.value());
        assert!(pin.downstream().is_empty());
        assert!(pin.is_output());
        assert!(!pin.is_input());
    }
}
