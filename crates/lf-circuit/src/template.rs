//! Component templates and the palette registry.
//!
//! A template is the prototype a placed component is stamped from: its gate
//! kind, model extent and pin anchors. The registry maps small stable ids to
//! templates; those ids are what the binary save format stores, so existing
//! entries must never be renumbered.

use std::collections::BTreeMap;

use lf_core::{Point, Rect, TemplateId};

use crate::error::{CircuitError, CircuitResult};
use crate::gate::GateKind;
use crate::pin::PinKind;

/// Prototype of a placeable component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub kind: GateKind,
    /// Model extent relative to the model origin, pins excluded.
    pub bounds: Rect,
    /// Input pin anchors, in operand order.
    pub inputs: Vec<Point>,
    /// Output pin anchors, in result order.
    pub outputs: Vec<Point>,
}

impl Template {
    pub fn new(
        id: TemplateId,
        name: impl Into<String>,
        kind: GateKind,
        bounds: Rect,
        inputs: Vec<Point>,
        outputs: Vec<Point>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            bounds,
            inputs,
            outputs,
        }
    }

    /// Check that the pin lists match the gate's arity.
    pub fn check_arity(&self) -> CircuitResult<()> {
        let sides = [
            (PinKind::Input, self.kind.input_count(), self.inputs.len()),
            (PinKind::Output, self.kind.output_count(), self.outputs.len()),
        ];
        for (side, expected, actual) in sides {
            if expected != actual {
                return Err(CircuitError::ArityMismatch {
                    kind: self.kind,
                    side,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Fixed mapping from template id to prototype.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<TemplateId, Template>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in palette.
    ///
    /// Ids 1-5 predate the others and appear in existing save files.
    pub fn standard() -> Self {
        let two_in = || vec![Point::new(0, 16), Point::new(0, 48)];
        let templates = [
            Template::new(
                TemplateId(1),
                "Not",
                GateKind::Not,
                Rect::new(0, 0, 96, 32),
                vec![Point::new(0, 16)],
                vec![Point::new(96, 16)],
            ),
            Template::new(
                TemplateId(2),
                "And",
                GateKind::And,
                Rect::new(0, 0, 64, 64),
                two_in(),
                vec![Point::new(64, 32)],
            ),
            Template::new(
                TemplateId(3),
                "NAnd",
                GateKind::Nand,
                Rect::new(0, 0, 96, 64),
                two_in(),
                vec![Point::new(96, 32)],
            ),
            Template::new(
                TemplateId(4),
                "Switch",
                GateKind::Switch,
                Rect::new(0, 0, 48, 32),
                vec![],
                vec![Point::new(48, 16)],
            ),
            Template::new(
                TemplateId(5),
                "Led",
                GateKind::Led,
                Rect::new(0, 0, 48, 32),
                vec![Point::new(0, 16)],
                vec![],
            ),
            Template::new(
                TemplateId(6),
                "Or",
                GateKind::Or,
                Rect::new(0, 0, 64, 64),
                two_in(),
                vec![Point::new(64, 32)],
            ),
            Template::new(
                TemplateId(7),
                "NOr",
                GateKind::Nor,
                Rect::new(0, 0, 96, 64),
                two_in(),
                vec![Point::new(96, 32)],
            ),
            Template::new(
                TemplateId(8),
                "XOr",
                GateKind::Xor,
                Rect::new(0, 0, 64, 64),
                two_in(),
                vec![Point::new(64, 32)],
            ),
            Template::new(
                TemplateId(9),
                "XNOr",
                GateKind::Xnor,
                Rect::new(0, 0, 96, 64),
                two_in(),
                vec![Point::new(96, 32)],
            ),
        ];

        let mut registry = Self::new();
        for template in templates {
            registry.templates.insert(template.id, template);
        }
        registry
    }

    /// Add a template. Ids are unique and arity must match the gate kind.
    pub fn register(&mut self, template: Template) -> CircuitResult<()> {
        template.check_arity()?;
        if self.templates.contains_key(&template.id) {
            return Err(CircuitError::DuplicateTemplate { id: template.id });
        }
        self.templates.insert(template.id, template);
        Ok(())
    }

    /// Get a template by id.
    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.get(&id)
    }

    /// Get a template by id, reporting unknown ids as an error.
    pub fn lookup(&self, id: TemplateId) -> CircuitResult<&Template> {
        self.get(id).ok_or(CircuitError::UnknownTemplate { id })
    }

    /// All templates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
