//! Placed circuit components.

use lf_core::{CompId, GRID_SIZE, PinId, Point, Rect, TemplateId, centering_anchor};

use crate::gate::GateKind;

/// A placed circuit element.
///
/// Input and output pin order is fixed at construction: index 0 of an AND
/// gate is always its first operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: CompId,
    /// Template this component was stamped from.
    pub template: TemplateId,
    pub kind: GateKind,
    pub(crate) inputs: Vec<PinId>,
    pub(crate) outputs: Vec<PinId>,
    pub(crate) position: Point,
    pub(crate) bounds: Rect,
    pub(crate) anchor: Point,
    /// Components fed by this one. Set semantics, wiring order.
    pub(crate) downstream: Vec<CompId>,
    pub(crate) enabled: bool,
}

impl Component {
    pub(crate) fn new(
        id: CompId,
        template: TemplateId,
        kind: GateKind,
        bounds: Rect,
        inputs: Vec<PinId>,
        outputs: Vec<PinId>,
    ) -> Self {
        Self {
            id,
            template,
            kind,
            inputs,
            outputs,
            position: Point::ORIGIN,
            bounds,
            anchor: centering_anchor(bounds, GRID_SIZE),
            downstream: Vec::new(),
            enabled: true,
        }
    }

    pub fn inputs(&self) -> &[PinId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PinId] {
        &self.outputs
    }

    /// Input pin at `index`, if any.
    pub fn input(&self, index: usize) -> Option<PinId> {
        self.inputs.get(index).copied()
    }

    /// Output pin at `index`, if any.
    pub fn output(&self, index: usize) -> Option<PinId> {
        self.outputs.get(index).copied()
    }

    /// Position in canvas units, as last set by `place`.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Model extent relative to the model origin.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Offset that centers the model on `position`.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Canvas position of the model origin.
    pub fn origin(&self) -> Point {
        self.position.offset(self.anchor)
    }

    /// Current bounding box on the canvas, for hit testing and rendering.
    pub fn bounding_box(&self) -> Rect {
        self.bounds.translate(self.origin())
    }

    /// Components this one feeds, in wiring order.
    pub fn downstream(&self) -> &[CompId] {
        &self.downstream
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record `target` as fed by this component. Returns false if it
    /// already was.
    pub(crate) fn add_downstream(&mut self, target: CompId) -> bool {
        if self.downstream.contains(&target) {
            return false;
        }
        self.downstream.push(target);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::Id;

    fn nand() -> Component {
        Component::new(
            Id::from_index(0),
            TemplateId(3),
            GateKind::Nand,
            Rect::new(0, 0, 96, 64),
            vec![Id::from_index(0), Id::from_index(1)],
            vec![Id::from_index(2)],
        )
    }

    #[test]
    fn pin_accessors() {
        let comp = nand();
        assert_eq!(comp.input(1), Some(Id::from_index(1)));
        assert_eq!(comp.input(2), None);
        assert_eq!(comp.output(0), Some(Id::from_index(2)));
        assert!(comp.is_enabled());
    }

    #[test]
    fn bounding_box_is_centered_on_position() {
        let mut comp = nand();
        comp.position = Point::new(160, 160);
        assert_eq!(comp.anchor(), Point::new(-48, -32));
        assert_eq!(comp.bounding_box(), Rect::new(112, 128, 96, 64));
    }

    #[test]
    fn downstream_has_set_semantics() {
        let mut comp = nand();
        assert!(comp.add_downstream(Id::from_index(5)));
        assert!(!comp.add_downstream(Id::from_index(5)));
        assert!(comp.add_downstream(Id::from_index(4)));
        assert_eq!(comp.downstream(), &[Id::from_index(5), Id::from_index(4)]);
    }
}
