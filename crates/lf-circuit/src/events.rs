//! Change notifications for the renderer.
//!
//! The circuit queues an event whenever something a view would redraw
//! changes; views drain the queue with `Circuit::take_events`.

use lf_core::{CompId, PinId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitEvent {
    /// A pin's stored value changed.
    PinChanged {
        pin: PinId,
        owner: CompId,
        value: bool,
    },
    /// A component was placed at a new position.
    Moved { comp: CompId, position: Point },
    /// A component entered or left the live set.
    EnabledChanged { comp: CompId, enabled: bool },
}
