//! Training infrastructure for neural network integration.
//!
//! This module provides the data structures and rollout loop for
//! generating training data from scripted or learned players.
//!
//! ## Overview
//!
//! - **Trajectory**: Records a complete episode with moves, rewards and outcome
//! - **ExperienceBuffer**: Collects and samples from trajectories
//! - **RolloutWorker**: Plays a host policy against an agent policy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hironaka_engine::players::{RandomAgent, RandomHost};
//! use hironaka_engine::training::{ExperienceBuffer, RolloutConfig, RolloutWorker};
//!
//! let config = RolloutConfig::default()
//!     .with_dimension(3)
//!     .with_max_turns(50);
//!
//! let worker = RolloutWorker::new(Box::new(RandomHost), Box::new(RandomAgent), config);
//!
//! let mut buffer = ExperienceBuffer::new(10000);
//! for trajectory in worker.play_episodes(100)? {
//!     buffer.push(trajectory);
//! }
//!
//! let batch = buffer.sample_batch(32, rng_seed);
//! ```

pub mod rollout;
pub mod trajectory;

// Re-export main types
pub use rollout::{RolloutConfig, RolloutSummary, RolloutWorker};
pub use trajectory::{ExperienceBuffer, TrainingSample, Trajectory, Transition};
