//! Python bindings for the Hironaka game engine.
//!
//! # Quick Start
//!
//! ```python
//! import hironaka_engine as he
//!
//! # Play one episode by hand
//! env = he.Episode()
//! obs = env.reset(3, [[1, 0, 0], [0, 1, 0], [0, 0, 1]], variant="basic")
//! obs, reward, terminal, info = env.step({1, 2}, 1)
//!
//! # Collect rollouts between scripted players
//! config = he.RolloutConfig(dimension=3, max_turns=50)
//! worker = he.RolloutWorker(config, host="random", agent="choose_first")
//! trajectory = worker.play_episode(seed=42)
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_nn;
mod py_rollout;
mod py_training;

pub use py_core::*;
pub use py_nn::*;
pub use py_rollout::*;
pub use py_training::*;

/// hironaka_engine: transition engine for the Hironaka polyhedral game.
///
/// This module provides:
/// - The episode controller (`Episode`) with reset/step
/// - Scripted and network-driven rollouts
/// - Training data collection and buffering
/// - Neural network integration via Python callbacks
#[pymodule]
fn hironaka_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Episodes
    m.add_class::<PyEpisode>()?;

    // Neural network types
    m.add_class::<PyEncodedState>()?;
    m.add_class::<PyPolicyNetwork>()?;
    m.add_class::<PyPointsEncoder>()?;
    m.add_class::<PyHostActionEncoder>()?;

    // Training types
    m.add_class::<PyTransition>()?;
    m.add_class::<PyTrajectory>()?;
    m.add_class::<PyTrainingSample>()?;
    m.add_class::<PyExperienceBuffer>()?;
    m.add_class::<PyTrajectoryIterator>()?;

    // Rollouts
    m.add_class::<PyRolloutConfig>()?;
    m.add_class::<PyRolloutSummary>()?;
    m.add_class::<PyRolloutWorker>()?;

    Ok(())
}
