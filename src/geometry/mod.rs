//! Exact convex geometry for point sets.
//!
//! - `newton`: Newton polytope vertex reduction
//! - `simplex`: rational phase-one simplex used by the reducer

pub mod newton;
pub mod simplex;

pub use newton::{ReductionMode, VertexReducer};
pub use simplex::Feasibility;
