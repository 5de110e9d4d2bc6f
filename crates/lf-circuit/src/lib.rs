//! Circuit model for logicflow.
//!
//! The circuit is an arena of components and pins owned by the caller:
//! - **Pins** carry a boolean value and a fan-out list of downstream pins
//! - **Components** own ordered input/output pins and a gate behaviour
//! - **Wiring** links pins and records component adjacency for scheduling
//! - **Templates** are the fixed palette new components are stamped from
//!
//! # Example
//!
//! ```
//! use lf_circuit::{Circuit, TemplateRegistry, TemplateId};
//!
//! let registry = TemplateRegistry::standard();
//! let mut circuit = Circuit::new();
//! let switch = circuit.create_from_template(&registry, TemplateId(4)).unwrap();
//! let led = circuit.create_from_template(&registry, TemplateId(5)).unwrap();
//! circuit.wire_components(switch, 0, led, 0).unwrap();
//!
//! circuit.toggle_switch(switch).unwrap();
//! assert_eq!(circuit.led_lit(led), Some(true));
//! ```

pub mod circuit;
pub mod component;
pub mod error;
pub mod events;
pub mod gate;
pub mod pin;
pub mod template;
pub(crate) mod validate;

pub use circuit::{Circuit, Wire};
pub use component::Component;
pub use error::{CircuitError, CircuitResult};
pub use events::CircuitEvent;
pub use gate::GateKind;
pub use lf_core::{CompId, PinId, Point, Rect, TemplateId};
pub use pin::{Pin, PinKind};
pub use template::{Template, TemplateRegistry};
