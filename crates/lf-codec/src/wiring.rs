//! Wiring references shared by the binary and document formats.
//!
//! Components are addressed by their index in the saved component list and
//! pins by kind and index within that component.

use std::collections::HashMap;

use lf_circuit::{Circuit, CircuitError, CompId, PinId, PinKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CodecError, CodecResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinRef {
    /// Index into the saved component list.
    pub component: usize,
    pub kind: PinKind,
    /// Index among the component's pins of this kind.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireDoc {
    pub from: PinRef,
    pub to: PinRef,
}

/// Pin-level edges between components of `order`, in pin creation then
/// wiring order.
///
/// Edges touching a component outside `order` are dropped, as are edges
/// driven by an input pin, which `Circuit::wire` would refuse to restore.
pub fn collect_wires(circuit: &Circuit, order: &[CompId]) -> Vec<WireDoc> {
    let index: HashMap<CompId, usize> =
        order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let locate = |pin_id: PinId| -> Option<PinRef> {
        let pin = circuit.pin(pin_id)?;
        let comp = circuit.component(pin.owner)?;
        let side = match pin.kind {
            PinKind::Input => comp.inputs(),
            PinKind::Output => comp.outputs(),
        };
        Some(PinRef {
            component: *index.get(&pin.owner)?,
            kind: pin.kind,
            index: side.iter().position(|&p| p == pin_id)?,
        })
    };

    let mut wires = Vec::new();
    for wire in circuit.wires() {
        let (Some(from), Some(to)) = (locate(wire.from), locate(wire.to)) else {
            continue;
        };
        if from.kind == PinKind::Input {
            debug!(from = %wire.from, to = %wire.to, "skipping wire driven by an input pin");
            continue;
        }
        wires.push(WireDoc { from, to });
    }
    wires
}

fn resolve(circuit: &Circuit, ids: &[CompId], wire: usize, pin: PinRef) -> CodecResult<PinId> {
    let &id = ids.get(pin.component).ok_or(CodecError::WireOutOfRange {
        wire,
        index: pin.component,
        count: ids.len(),
    })?;
    let comp = circuit
        .component(id)
        .ok_or(CircuitError::ComponentNotFound { id })?;
    let found = match pin.kind {
        PinKind::Input => comp.input(pin.index),
        PinKind::Output => comp.output(pin.index),
    };
    let pin_id = found.ok_or(CircuitError::PinIndexOutOfRange {
        id,
        kind: pin.kind,
        index: pin.index,
    })?;
    Ok(pin_id)
}

/// Re-create wiring between freshly decoded components.
pub fn restore_wires(
    circuit: &mut Circuit,
    ids: &[CompId],
    wires: &[WireDoc],
) -> CodecResult<()> {
    for (i, wire) in wires.iter().enumerate() {
        let from = resolve(circuit, ids, i, wire.from)?;
        let to = resolve(circuit, ids, i, wire.to)?;
        circuit.wire(from, to)?;
    }
    debug!(wires = wires.len(), "wiring restored");
    Ok(())
}
