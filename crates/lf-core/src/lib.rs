//! lf-core: stable foundation for logicflow.
//!
//! Contains:
//! - ids (stable compact IDs for components and pins)
//! - geometry (grid points, rectangles, snapping)
//! - timing (opt-in wall clock measurement)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LfError, LfResult};
pub use geometry::*;
pub use ids::*;
