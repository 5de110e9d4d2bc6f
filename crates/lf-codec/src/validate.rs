//! Circuit document validation.

use lf_circuit::{GateKind, PinKind, TemplateId, TemplateRegistry};

use crate::document::{CircuitDoc, LATEST_VERSION};
use crate::wiring::PinRef;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Component {component}: unknown template {id}")]
    UnknownTemplate { component: usize, id: TemplateId },

    #[error("Component {component}: template {id} is a {expected}, document says {actual}")]
    KindMismatch {
        component: usize,
        id: TemplateId,
        expected: GateKind,
        actual: GateKind,
    },

    #[error("Component {component}: {kind} expects {expected} {side:?} pins, got {actual}")]
    Arity {
        component: usize,
        kind: GateKind,
        side: PinKind,
        expected: usize,
        actual: usize,
    },

    #[error("Wire {wire}: missing reference {what}")]
    MissingReference { wire: usize, what: String },

    #[error("Wire {wire}: an input pin cannot drive a wire")]
    InputSource { wire: usize },
}

/// Check version, templates, pin arity and wire references.
pub fn validate_doc(
    doc: &CircuitDoc,
    registry: &TemplateRegistry,
) -> Result<(), ValidationError> {
    if doc.version == 0 || doc.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version,
        });
    }

    for (component, tree) in doc.components.iter().enumerate() {
        let template = registry
            .get(tree.template)
            .ok_or(ValidationError::UnknownTemplate {
                component,
                id: tree.template,
            })?;
        if template.kind != tree.kind {
            return Err(ValidationError::KindMismatch {
                component,
                id: tree.template,
                expected: template.kind,
                actual: tree.kind,
            });
        }
        let sides = [
            (PinKind::Input, tree.kind.input_count()),
            (PinKind::Output, tree.kind.output_count()),
        ];
        for (side, expected) in sides {
            let actual = tree.count(side);
            if actual != expected {
                return Err(ValidationError::Arity {
                    component,
                    kind: tree.kind,
                    side,
                    expected,
                    actual,
                });
            }
        }
    }

    for (wire, w) in doc.wires.iter().enumerate() {
        check_pin(doc, wire, w.from)?;
        check_pin(doc, wire, w.to)?;
        if w.from.kind == PinKind::Input {
            return Err(ValidationError::InputSource { wire });
        }
    }

    Ok(())
}

fn check_pin(doc: &CircuitDoc, wire: usize, pin: PinRef) -> Result<(), ValidationError> {
    let Some(tree) = doc.components.get(pin.component) else {
        return Err(ValidationError::MissingReference {
            wire,
            what: format!("component {}", pin.component),
        });
    };
    if pin.index >= tree.count(pin.kind) {
        return Err(ValidationError::MissingReference {
            wire,
            what: format!(
                "{:?} pin {} of component {}",
                pin.kind, pin.index, pin.component
            ),
        });
    }
    Ok(())
}
