//! Core engine types: points, point sets, moves, errors, RNG, configuration.
//!
//! Everything here is variant-agnostic. Rule variants and the turn engine
//! build on these types without extending them.

pub mod point;
pub mod point_set;
pub mod moves;
pub mod error;
pub mod rng;
pub mod config;

pub use point::Point;
pub use point_set::PointSet;
pub use moves::{HostSubset, Move, MAX_SUBSET_DIMENSION};
pub use error::GameError;
pub use rng::GameRng;
pub use config::EpisodeConfig;
