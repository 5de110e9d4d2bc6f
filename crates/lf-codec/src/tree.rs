//! Tree form: a self-contained description of one component.
//!
//! Carries everything needed to rebuild the component (template, gate kind,
//! position, model bounds, pin kinds and anchors) but no wiring and no pin
//! values. Rebuilding always produces fresh pins.

use lf_circuit::{
    Circuit, CircuitError, CompId, GateKind, PinKind, Point, Rect, Template, TemplateId,
};
use serde::{Deserialize, Serialize};

use crate::CodecResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTree {
    pub kind: PinKind,
    pub offset: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentTree {
    pub template: TemplateId,
    pub kind: GateKind,
    pub position: Point,
    pub bounds: Rect,
    /// Inputs in operand order, then outputs in result order.
    #[serde(default)]
    pub pins: Vec<PinTree>,
}

impl ComponentTree {
    /// Anchors of the pins of one kind, in order.
    pub fn offsets(&self, kind: PinKind) -> Vec<Point> {
        self.pins
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.offset)
            .collect()
    }

    /// Number of pins of one kind.
    pub fn count(&self, kind: PinKind) -> usize {
        self.pins.iter().filter(|p| p.kind == kind).count()
    }
}

/// Describe a component.
pub fn to_tree(circuit: &Circuit, id: CompId) -> CodecResult<ComponentTree> {
    let comp = circuit
        .component(id)
        .ok_or(CircuitError::ComponentNotFound { id })?;

    let mut pins = Vec::with_capacity(comp.inputs().len() + comp.outputs().len());
    for &pin_id in comp.inputs().iter().chain(comp.outputs()) {
        let pin = circuit
            .pin(pin_id)
            .ok_or(CircuitError::PinNotFound { id: pin_id })?;
        pins.push(PinTree {
            kind: pin.kind,
            offset: pin.offset,
        });
    }

    Ok(ComponentTree {
        template: comp.template,
        kind: comp.kind,
        position: comp.position(),
        bounds: comp.bounds(),
        pins,
    })
}

/// Rebuild a component from its description: a fresh live component with
/// low pins and no wiring, placed at the recorded position.
pub fn from_tree(circuit: &mut Circuit, tree: &ComponentTree) -> CodecResult<CompId> {
    let template = Template::new(
        tree.template,
        tree.kind.name(),
        tree.kind,
        tree.bounds,
        tree.offsets(PinKind::Input),
        tree.offsets(PinKind::Output),
    );
    let id = circuit.instantiate(&template)?;
    circuit.place(id, tree.position)?;
    Ok(id)
}
