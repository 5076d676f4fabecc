//! Rule variants for the polyhedral game family.
//!
//! Variants implement `RuleVariant` to define:
//! - Which moves are legal
//! - How a move transforms the point set
//! - When the game is over
//!
//! The turn engine calls into `RuleVariant` but never interprets
//! variant-specific geometry directly.

pub mod cycle;
pub mod linear;
pub mod polyhedral;
pub mod registry;
pub mod variant;

pub use cycle::{CycleRules, FnPredicate, ReductionStabilized, TerminalPredicate};
pub use linear::LinearTransformRules;
pub use polyhedral::PolyhedralRules;
pub use registry::VariantRegistry;
pub use variant::{
    check_agent_axis, check_host_subset, ensure_running, ParseVariantError, RuleVariant, VariantTag, Winner,
};
