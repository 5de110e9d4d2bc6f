//! The circuit registry: live components, pins, and the wiring between them.

use std::collections::HashSet;

use indexmap::IndexSet;
use lf_core::{CompId, PinId, Point, Rect, TemplateId};
use tracing::debug;

use crate::component::Component;
use crate::error::{CircuitError, CircuitResult};
use crate::events::CircuitEvent;
use crate::gate::GateKind;
use crate::pin::{Pin, PinKind};
use crate::template::{Template, TemplateRegistry};
use crate::validate;

/// A directed pin-to-pin edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wire {
    pub from: PinId,
    pub to: PinId,
}

/// Circuit owns every component and pin ever created in a session.
///
/// The circuit is responsible for:
/// - Stamping components out of templates, clones, or decoded descriptions
/// - Tracking which components (and their pins) are live
/// - Wiring pins and keeping component adjacency in step
/// - Propagating pin values through wiring
/// - Answering hit-test queries for the editor
///
/// Disabled components keep their storage and can be re-enabled.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub(crate) components: Vec<Component>,
    pub(crate) pins: Vec<Pin>,
    /// Live components in enable order.
    pub(crate) live_components: IndexSet<CompId>,
    /// Pins of live components in enable order.
    pub(crate) live_pins: IndexSet<PinId>,
    events: Vec<CircuitEvent>,
    muted: bool,
    /// Bumped on every change that can affect evaluation order.
    revision: u64,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new live component out of `template`, at the origin.
    pub fn instantiate(&mut self, template: &Template) -> CircuitResult<CompId> {
        template.check_arity()?;
        let id = self.spawn(
            template.id,
            template.kind,
            template.bounds,
            &template.inputs,
            &template.outputs,
        )?;
        debug!(comp = %id, template = %template.id, kind = %template.kind, "component created");
        Ok(id)
    }

    /// Look up a template by id and instantiate it.
    pub fn create_from_template(
        &mut self,
        registry: &TemplateRegistry,
        id: TemplateId,
    ) -> CircuitResult<CompId> {
        let template = registry.lookup(id)?;
        self.instantiate(template)
    }

    /// Copy a component: fresh low pins, no wiring, same position.
    pub fn clone_component(&mut self, id: CompId) -> CircuitResult<CompId> {
        let source = self.component_or_err(id)?;
        let template = source.template;
        let kind = source.kind;
        let bounds = source.bounds;
        let position = source.position;
        let inputs: Vec<Point> = source
            .inputs
            .iter()
            .map(|p| self.pins[p.slot()].offset)
            .collect();
        let outputs: Vec<Point> = source
            .outputs
            .iter()
            .map(|p| self.pins[p.slot()].offset)
            .collect();

        let copy = self.spawn(template, kind, bounds, &inputs, &outputs)?;
        self.components[copy.slot()].position = position;
        debug!(source = %id, comp = %copy, "component cloned");
        Ok(copy)
    }

    fn spawn(
        &mut self,
        template: TemplateId,
        kind: GateKind,
        bounds: Rect,
        inputs: &[Point],
        outputs: &[Point],
    ) -> CircuitResult<CompId> {
        let comp_id = CompId::try_from_slot(self.components.len())
            .ok_or(CircuitError::CapacityExceeded { what: "components" })?;
        let first = self.pins.len();
        let pin_ids = (first..first + inputs.len() + outputs.len())
            .map(PinId::try_from_slot)
            .collect::<Option<Vec<PinId>>>()
            .ok_or(CircuitError::CapacityExceeded { what: "pins" })?;
        let (input_ids, output_ids) = pin_ids.split_at(inputs.len());

        let sides = [
            (PinKind::Input, input_ids, inputs),
            (PinKind::Output, output_ids, outputs),
        ];
        for (side, ids, offsets) in sides {
            for (&pin_id, &offset) in ids.iter().zip(offsets) {
                self.pins.push(Pin::new(pin_id, side, comp_id, offset));
            }
        }
        let (input_ids, output_ids) = (input_ids.to_vec(), output_ids.to_vec());

        let comp = Component::new(comp_id, template, kind, bounds, input_ids, output_ids);
        self.live_pins.extend(comp.inputs.iter().chain(&comp.outputs).copied());
        self.live_components.insert(comp_id);
        self.components.push(comp);
        self.revision += 1;
        Ok(comp_id)
    }

    /// Get a component by ID (live or not).
    pub fn component(&self, id: CompId) -> Option<&Component> {
        self.components.get(id.slot())
    }

    /// Get a pin by ID (live or not).
    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(id.slot())
    }

    fn component_or_err(&self, id: CompId) -> CircuitResult<&Component> {
        self.component(id).ok_or(CircuitError::ComponentNotFound { id })
    }

    fn pin_or_err(&self, id: PinId) -> CircuitResult<&Pin> {
        self.pin(id).ok_or(CircuitError::PinNotFound { id })
    }

    /// A pin whose owner is live.
    fn live_pin(&self, id: PinId) -> CircuitResult<&Pin> {
        let pin = self.pin_or_err(id)?;
        if !self.live_components.contains(&pin.owner) {
            return Err(CircuitError::ComponentDisabled { id: pin.owner });
        }
        Ok(pin)
    }

    /// Every component ever created, in creation order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Every pin ever created, in creation order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Live components in enable order.
    pub fn live_components(&self) -> impl Iterator<Item = &Component> {
        self.live_components
            .iter()
            .map(|id| &self.components[id.slot()])
    }

    pub fn is_live(&self, id: CompId) -> bool {
        self.live_components.contains(&id)
    }

    /// Number of live components.
    pub fn len(&self) -> usize {
        self.live_components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live_components.is_empty()
    }

    /// Live components, stably sorted by ascending input pin count.
    ///
    /// This is the order the scheduler seeds its traversal from and the order
    /// components are written to save files.
    pub fn list_components(&self) -> Vec<CompId> {
        let mut ids: Vec<CompId> = self.live_components.iter().copied().collect();
        ids.sort_by_key(|id| self.components[id.slot()].inputs.len());
        ids
    }

    /// All pin-level edges, in pin creation then wiring order.
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.pins.iter().flat_map(|pin| {
            pin.downstream.iter().map(move |&to| Wire { from: pin.id, to })
        })
    }

    /// Counter bumped by every change that can affect evaluation order
    /// (creation, enable/disable, wiring).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Add or remove a component (and its pins) from the live set.
    ///
    /// Re-enabling appends the component to the end of the live order.
    pub fn set_enabled(&mut self, id: CompId, enabled: bool) -> CircuitResult<()> {
        let comp = self.component_or_err(id)?;
        if comp.enabled == enabled {
            return Ok(());
        }
        let pins: Vec<PinId> = comp.inputs.iter().chain(&comp.outputs).copied().collect();

        if enabled {
            self.live_components.insert(id);
            self.live_pins.extend(pins);
        } else {
            self.live_components.shift_remove(&id);
            for pin in &pins {
                self.live_pins.shift_remove(pin);
            }
        }
        self.components[id.slot()].enabled = enabled;
        self.revision += 1;
        self.notify(CircuitEvent::EnabledChanged { comp: id, enabled });
        Ok(())
    }

    /// Move a component. Nothing is recomputed besides geometry.
    pub fn place(&mut self, id: CompId, position: Point) -> CircuitResult<()> {
        self.component_or_err(id)?;
        self.components[id.slot()].position = position;
        self.notify(CircuitEvent::Moved { comp: id, position });
        Ok(())
    }

    /// Append `to` to the fan-out list of `from`.
    ///
    /// Pin-level only: component adjacency is left untouched, so a circuit
    /// linked this way alone does not schedule correctly. Use [`Circuit::wire`]
    /// for editor wiring.
    pub fn connect_to(&mut self, from: PinId, to: PinId) -> CircuitResult<()> {
        self.live_pin(from)?;
        self.live_pin(to)?;
        if from == to {
            return Err(CircuitError::InvalidWire {
                what: format!("pin {from} cannot drive itself"),
            });
        }
        self.pins[from.slot()].downstream.push(to);
        self.revision += 1;
        Ok(())
    }

    /// Wire a driving pin to a target pin.
    ///
    /// Links the pins and records the target's owner as downstream of the
    /// source's owner, together. The source must be an output pin; the target
    /// is usually an input pin but may be another output to build
    /// pass-through trees.
    pub fn wire(&mut self, from: PinId, to: PinId) -> CircuitResult<()> {
        let source = self.live_pin(from)?;
        if source.kind == PinKind::Input {
            return Err(CircuitError::InvalidWire {
                what: format!("input pin {from} cannot drive a wire"),
            });
        }
        let source_owner = source.owner;
        let target_owner = self.live_pin(to)?.owner;

        self.connect_to(from, to)?;
        self.components[source_owner.slot()].add_downstream(target_owner);
        debug!(%from, %to, source = %source_owner, target = %target_owner, "wired");
        Ok(())
    }

    /// Wire output `output` of `source` to input `input` of `target`.
    pub fn wire_components(
        &mut self,
        source: CompId,
        output: usize,
        target: CompId,
        input: usize,
    ) -> CircuitResult<()> {
        let from = self.component_or_err(source)?.output(output).ok_or(
            CircuitError::PinIndexOutOfRange {
                id: source,
                kind: PinKind::Output,
                index: output,
            },
        )?;
        let to = self.component_or_err(target)?.input(input).ok_or(
            CircuitError::PinIndexOutOfRange {
                id: target,
                kind: PinKind::Input,
                index: input,
            },
        )?;
        self.wire(from, to)
    }

    /// Current value of a pin. No propagation.
    pub fn value(&self, pin: PinId) -> Option<bool> {
        self.pin(pin).map(Pin::value)
    }

    /// Assign `value` to `pin` and to every pin reachable through its wiring.
    ///
    /// Assignment is unconditional: unchanged values are re-propagated.
    pub fn set_value(&mut self, pin: PinId, value: bool) -> CircuitResult<()> {
        self.pin_or_err(pin)?;
        self.propagate(pin, value);
        Ok(())
    }

    /// Worklist cascade. Each pin is assigned at most once per call, which
    /// bounds the work on cyclic pin wiring and keeps the stack flat on long
    /// pass-through chains.
    fn propagate(&mut self, start: PinId, value: bool) {
        let mut stack = vec![start];
        let mut seen: HashSet<PinId> = HashSet::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let pin = &mut self.pins[id.slot()];
            let changed = pin.value != value;
            let owner = pin.owner;
            pin.value = value;
            // Reverse so the first wired target is visited first.
            stack.extend(pin.downstream.iter().rev().copied());

            if changed && !self.muted {
                self.events.push(CircuitEvent::PinChanged {
                    pin: id,
                    owner,
                    value,
                });
            }
        }
    }

    /// Run one component's gate: read inputs, compute every output, then
    /// publish the outputs through wiring.
    ///
    /// # Panics
    ///
    /// Panics if the component's pin lists do not match its gate arity.
    pub fn evaluate(&mut self, id: CompId) -> CircuitResult<()> {
        let comp = self.component_or_err(id)?;
        if !comp.kind.drives_outputs() {
            return Ok(());
        }

        let inputs: Vec<bool> = comp
            .inputs
            .iter()
            .map(|p| self.pins[p.slot()].value)
            .collect();
        let mut outputs = vec![false; comp.outputs.len()];
        comp.kind.evaluate(&inputs, &mut outputs);

        for (index, value) in outputs.into_iter().enumerate() {
            let pin = self.components[id.slot()].outputs[index];
            self.propagate(pin, value);
        }
        Ok(())
    }

    fn switch_output(&self, id: CompId) -> CircuitResult<PinId> {
        let comp = self.component_or_err(id)?;
        if comp.kind != GateKind::Switch {
            return Err(CircuitError::WrongKind {
                id,
                expected: GateKind::Switch,
                actual: comp.kind,
            });
        }
        Ok(comp.outputs[0])
    }

    /// Flip an input switch, cascading the new value. Returns the new value.
    pub fn toggle_switch(&mut self, id: CompId) -> CircuitResult<bool> {
        let pin = self.switch_output(id)?;
        let value = !self.pins[pin.slot()].value;
        self.propagate(pin, value);
        Ok(value)
    }

    /// Drive an input switch to a specific value.
    pub fn set_switch(&mut self, id: CompId, value: bool) -> CircuitResult<()> {
        let pin = self.switch_output(id)?;
        self.propagate(pin, value);
        Ok(())
    }

    /// Whether an LED is lit. `None` for anything that is not an LED.
    pub fn led_lit(&self, id: CompId) -> Option<bool> {
        let comp = self.component(id)?;
        if comp.kind != GateKind::Led {
            return None;
        }
        self.value(comp.inputs[0])
    }

    /// Canvas position of a pin anchor.
    pub fn pin_position(&self, id: PinId) -> Option<Point> {
        let pin = self.pin(id)?;
        let owner = self.component(pin.owner)?;
        Some(owner.origin().offset(pin.offset))
    }

    /// First live pin within `radius` of `(x, y)`, in enable order.
    pub fn hit_test_pin(&self, x: f64, y: f64, radius: f64) -> Option<PinId> {
        self.live_pins.iter().copied().find(|&id| {
            self.pin_position(id)
                .is_some_and(|p| p.distance_sq(x, y) <= radius * radius)
        })
    }

    /// First live component whose bounding box contains `(x, y)`.
    pub fn hit_test_component(&self, x: f64, y: f64) -> Option<CompId> {
        self.live_components().find_map(|comp| {
            let bounds = comp.bounding_box();
            (bounds.has_area() && bounds.contains(x, y)).then_some(comp.id)
        })
    }

    fn notify(&mut self, event: CircuitEvent) {
        if !self.muted {
            self.events.push(event);
        }
    }

    /// Drain queued change notifications.
    pub fn take_events(&mut self) -> Vec<CircuitEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stop (or resume) queueing notifications. Headless runs with no view
    /// attached mute the circuit so the queue does not grow unbounded.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.events.clear();
        }
    }

    /// Check pin ownership, adjacency and live-set consistency.
    pub fn validate(&self) -> CircuitResult<()> {
        validate::validate_circuit(self)
    }
}
