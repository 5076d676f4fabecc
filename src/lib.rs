//! # hironaka-engine
//!
//! Transition engine for the Hironaka polyhedral game, built for RL training.
//!
//! A state is a finite set of lattice points in N^n. Each turn the host picks
//! a subset of at least two coordinates, the agent picks one coordinate from
//! it, and the variant's rules replace every point by its image. The game
//! ends when a single point survives.
//!
//! ## Design Principles
//!
//! 1. **Exact Geometry**: Newton-polytope vertices are found with rational
//!    arithmetic. No floating-point tolerance decides which points survive.
//!
//! 2. **Pluggable Rules**: Variants are `RuleVariant` strategies looked up in a
//!    `VariantRegistry`, so new games need no changes to the engine.
//!
//! 3. **Failures Leave No Trace**: A rejected move or reset leaves the episode
//!    at its last valid state.
//!
//! ## Architecture
//!
//! - **Persistent Point Sets**: O(1) cloning via `im-rs`, so observations and
//!   trajectories can share states.
//!
//! - **Explicit Turn Phases**: `TurnEngine` is a small state machine that
//!   accepts the host's subset, then the agent's coordinate.
//!
//! ## Modules
//!
//! - `core`: Points, point sets, moves, errors, RNG, configuration
//! - `geometry`: Newton-polytope vertex reduction
//! - `rules`: Variant strategies and their registry
//! - `engine`: Turn state machine and episode controller
//! - `nn`: Tensor encoders and policy network traits
//! - `players`: Scripted and network-driven hosts and agents
//! - `training`: Trajectories, experience buffer, rollouts
//! - `python`: PyO3 bindings (feature `python`)

pub mod core;
pub mod geometry;
pub mod rules;
pub mod engine;
pub mod nn;
pub mod players;
pub mod training;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Point, PointSet,
    HostSubset, Move,
    GameError,
    GameRng,
    EpisodeConfig,
};

pub use crate::geometry::{ReductionMode, VertexReducer};

pub use crate::rules::{
    RuleVariant, VariantTag, Winner, VariantRegistry,
    PolyhedralRules, LinearTransformRules, CycleRules,
    TerminalPredicate, FnPredicate, ReductionStabilized,
};

pub use crate::engine::{EpisodeController, Observation, StepInfo, StepResult, Phase, TurnEngine};

pub use crate::nn::{EncodedState, HostActionEncoder, PointsEncoder, PolicyNetwork, StateEncoder};

pub use crate::players::{AgentPolicy, HostPolicy};

pub use crate::training::{ExperienceBuffer, RolloutConfig, RolloutSummary, RolloutWorker, Trajectory, Transition};
