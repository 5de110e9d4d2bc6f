//! Tick scheduling for logicflow circuits.
//!
//! Provides:
//! - Dependency ordering of live components over component adjacency
//! - A scheduler that caches the order against the circuit revision
//! - A headless batch driver that runs ticks and records pin values

pub mod error;
pub mod schedule;
pub mod sim;

pub use error::{SimError, SimResult};
pub use schedule::evaluation_order;
pub use sim::{Scheduler, SimOptions, TickRecord, run_ticks};
