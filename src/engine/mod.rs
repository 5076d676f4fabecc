//! Turn orchestration and the episodic interface.
//!
//! - `turn`: two-phase host/agent state machine
//! - `episode`: resettable episodes with rewards for training code

pub mod episode;
pub mod turn;

pub use episode::{EpisodeController, Observation, StepInfo, StepResult};
pub use turn::{Phase, TurnEngine};
