//! Circuit consistency checks.

use std::collections::HashSet;

use lf_core::PinId;

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};
use crate::pin::PinKind;

fn inconsistent(what: String) -> CircuitError {
    CircuitError::Inconsistent { what }
}

/// Validate the circuit structure: ids match slots, pins and components
/// reference each other, every pin edge has its component edge, and the live
/// sets match the enabled flags.
pub(crate) fn validate_circuit(circuit: &Circuit) -> CircuitResult<()> {
    validate_ownership(circuit)?;
    validate_adjacency(circuit)?;
    validate_live_sets(circuit)
}

fn validate_ownership(circuit: &Circuit) -> CircuitResult<()> {
    for (i, pin) in circuit.pins.iter().enumerate() {
        if pin.id.slot() != i {
            return Err(inconsistent(format!("pin {} stored at slot {i}", pin.id)));
        }
        let Some(owner) = circuit.components.get(pin.owner.slot()) else {
            return Err(CircuitError::ComponentNotFound { id: pin.owner });
        };
        let side = match pin.kind {
            PinKind::Input => &owner.inputs,
            PinKind::Output => &owner.outputs,
        };
        if !side.contains(&pin.id) {
            return Err(inconsistent(format!(
                "pin {} claims component {} but is not among its {:?} pins",
                pin.id, owner.id, pin.kind
            )));
        }
    }

    for (i, comp) in circuit.components.iter().enumerate() {
        if comp.id.slot() != i {
            return Err(inconsistent(format!("component {} stored at slot {i}", comp.id)));
        }
        if comp.inputs.len() != comp.kind.input_count()
            || comp.outputs.len() != comp.kind.output_count()
        {
            return Err(inconsistent(format!(
                "component {} ({}) has {} inputs and {} outputs",
                comp.id,
                comp.kind,
                comp.inputs.len(),
                comp.outputs.len()
            )));
        }
        for &pin_id in comp.inputs.iter().chain(&comp.outputs) {
            let pin = circuit
                .pins
                .get(pin_id.slot())
                .ok_or(CircuitError::PinNotFound { id: pin_id })?;
            if pin.owner != comp.id {
                return Err(inconsistent(format!(
                    "component {} lists pin {} owned by {}",
                    comp.id, pin_id, pin.owner
                )));
            }
        }
    }
    Ok(())
}

fn validate_adjacency(circuit: &Circuit) -> CircuitResult<()> {
    for wire in circuit.wires() {
        let to = circuit
            .pins
            .get(wire.to.slot())
            .ok_or(CircuitError::PinNotFound { id: wire.to })?;
        let from = &circuit.pins[wire.from.slot()];
        let source = &circuit.components[from.owner.slot()];
        if !source.downstream.contains(&to.owner) {
            return Err(inconsistent(format!(
                "pin edge {} -> {} has no component edge {} -> {}",
                wire.from, wire.to, from.owner, to.owner
            )));
        }
    }

    for comp in &circuit.components {
        let mut seen = HashSet::new();
        for &target in &comp.downstream {
            if target.slot() >= circuit.components.len() {
                return Err(CircuitError::ComponentNotFound { id: target });
            }
            if !seen.insert(target) {
                return Err(inconsistent(format!(
                    "component {} lists downstream {} twice",
                    comp.id, target
                )));
            }
        }
    }
    Ok(())
}

fn validate_live_sets(circuit: &Circuit) -> CircuitResult<()> {
    let mut expected_pins: HashSet<PinId> = HashSet::new();
    for comp in &circuit.components {
        if comp.enabled != circuit.live_components.contains(&comp.id) {
            return Err(inconsistent(format!(
                "component {} enabled={} disagrees with the live set",
                comp.id, comp.enabled
            )));
        }
        if comp.enabled {
            expected_pins.extend(comp.inputs.iter().chain(&comp.outputs).copied());
        }
    }

    let live: HashSet<PinId> = circuit.live_pins.iter().copied().collect();
    if live != expected_pins {
        return Err(inconsistent(
            "live pins do not match the pins of live components".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateRegistry;
    use lf_core::TemplateId;

    fn pair() -> (Circuit, lf_core::CompId, lf_core::CompId) {
        let registry = TemplateRegistry::standard();
        let mut circuit = Circuit::new();
        let a = circuit
            .create_from_template(&registry, TemplateId(4))
            .unwrap();
        let b = circuit
            .create_from_template(&registry, TemplateId(1))
            .unwrap();
        (circuit, a, b)
    }

    #[test]
    fn validate_empty_circuit() {
        assert!(validate_circuit(&Circuit::new()).is_ok());
    }

    #[test]
    fn validate_after_enable_cycle() {
        let (mut circuit, a, _) = pair();
        circuit.set_enabled(a, false).unwrap();
        validate_circuit(&circuit).unwrap();
        circuit.set_enabled(a, true).unwrap();
        validate_circuit(&circuit).unwrap();
    }

    #[test]
    fn pin_edge_without_component_edge_is_flagged() {
        let (mut circuit, a, b) = pair();
        let out = circuit.components[a.slot()].outputs[0];
        let inp = circuit.components[b.slot()].inputs[0];
        circuit.connect_to(out, inp).unwrap();

        let result = validate_circuit(&circuit);
        assert!(matches!(result, Err(CircuitError::Inconsistent { .. })));

        circuit.components[a.slot()].add_downstream(b);
        validate_circuit(&circuit).unwrap();
    }

    #[test]
    fn live_set_mismatch_is_flagged() {
        let (mut circuit, a, _) = pair();
        circuit.components[a.slot()].enabled = false;
        assert!(validate_circuit(&circuit).is_err());
    }
}
