//! Rollout bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::players::{agent_by_name, host_by_name, AgentPolicy, HostPolicy, PolicyAgent, PolicyHost};
use crate::training::{RolloutConfig, RolloutSummary, RolloutWorker};

use super::py_core::{parse_variant, to_py_err};
use super::py_nn::PyPolicyNetwork;
use super::py_training::PyTrajectory;

/// Python wrapper for RolloutConfig.
#[pyclass(name = "RolloutConfig")]
#[derive(Clone)]
pub struct PyRolloutConfig(pub RolloutConfig);

#[pymethods]
impl PyRolloutConfig {
    /// Create a new rollout configuration.
    ///
    /// # Arguments
    /// - dimension: Coordinates per point (default: 3)
    /// - num_points: Points sampled per initial state (default: 10)
    /// - max_value: Coordinates are sampled from `[0, max_value)` (default: 20)
    /// - max_turns: Turns before an episode is truncated (default: 100)
    /// - variant: Rule variant name (default: "linear")
    /// - seed_offset: First seed used by `play_episodes` (default: 0)
    #[new]
    #[pyo3(signature = (
        dimension = 3,
        num_points = 10,
        max_value = 20,
        max_turns = 100,
        variant = "linear",
        seed_offset = 0
    ))]
    fn new(
        dimension: usize,
        num_points: usize,
        max_value: i64,
        max_turns: u32,
        variant: &str,
        seed_offset: u64,
    ) -> PyResult<Self> {
        Ok(Self(
            RolloutConfig::default()
                .with_dimension(dimension)
                .with_num_points(num_points)
                .with_max_value(max_value)
                .with_max_turns(max_turns)
                .with_variant(parse_variant(variant)?)
                .with_seed_offset(seed_offset),
        ))
    }

    #[getter]
    fn dimension(&self) -> usize {
        self.0.dimension
    }

    #[getter]
    fn num_points(&self) -> usize {
        self.0.num_points
    }

    #[getter]
    fn max_value(&self) -> i64 {
        self.0.max_value
    }

    #[getter]
    fn max_turns(&self) -> u32 {
        self.0.max_turns
    }

    #[getter]
    fn variant(&self) -> &'static str {
        self.0.variant.name()
    }

    #[getter]
    fn seed_offset(&self) -> u64 {
        self.0.seed_offset
    }

    fn __repr__(&self) -> String {
        format!(
            "RolloutConfig(dim={}, points={}, max_value={}, max_turns={}, variant={})",
            self.0.dimension, self.0.num_points, self.0.max_value, self.0.max_turns, self.0.variant
        )
    }
}

/// Python wrapper for RolloutSummary.
#[pyclass(name = "RolloutSummary")]
#[derive(Clone)]
pub struct PyRolloutSummary(pub RolloutSummary);

#[pymethods]
impl PyRolloutSummary {
    #[getter]
    fn episodes(&self) -> usize {
        self.0.episodes
    }

    #[getter]
    fn initially_ended(&self) -> usize {
        self.0.initially_ended
    }

    #[getter]
    fn ended(&self) -> usize {
        self.0.ended
    }

    #[getter]
    fn total_turns(&self) -> usize {
        self.0.total_turns
    }

    /// Games in play at reset per turn, unended games charged the turn limit.
    #[getter]
    fn rho(&self) -> f64 {
        self.0.rho
    }

    fn __repr__(&self) -> String {
        format!(
            "RolloutSummary(episodes={}, ended={}, turns={}, rho={:.4})",
            self.0.episodes, self.0.ended, self.0.total_turns, self.0.rho
        )
    }
}

/// Rollout worker pairing a host with an agent.
///
/// Scripted players are chosen by name. Passing a `PolicyNetwork` for either
/// side replaces the scripted player with a network-driven one.
#[pyclass(name = "RolloutWorker")]
pub struct PyRolloutWorker {
    inner: RolloutWorker,
}

#[pymethods]
impl PyRolloutWorker {
    /// Create a new rollout worker.
    ///
    /// # Arguments
    /// - config: Rollout configuration
    /// - host: Scripted host, "random" or "all_coord" (default: "random")
    /// - agent: Scripted agent, "random" or "choose_first" (default: "random")
    /// - host_network: Scores `2^dimension - dimension - 1` host actions
    /// - agent_network: Scores `dimension` axes
    /// - exploration: Chance of a random move for network players (default: 0)
    #[new]
    #[pyo3(signature = (
        config,
        host = "random",
        agent = "random",
        host_network = None,
        agent_network = None,
        exploration = 0.0
    ))]
    fn new(
        py: Python<'_>,
        config: &PyRolloutConfig,
        host: &str,
        agent: &str,
        host_network: Option<&PyPolicyNetwork>,
        agent_network: Option<&PyPolicyNetwork>,
        exploration: f64,
    ) -> PyResult<Self> {
        let cfg = &config.0;

        let host: Box<dyn HostPolicy> = match host_network {
            Some(network) => Box::new(
                PolicyHost::new(network.clone_ref(py), cfg.num_points, cfg.dimension)
                    .map_err(to_py_err)?
                    .with_exploration(exploration),
            ),
            None => host_by_name(host).ok_or_else(|| PyValueError::new_err(format!("unknown host: {}", host)))?,
        };

        let agent: Box<dyn AgentPolicy> = match agent_network {
            Some(network) => Box::new(
                PolicyAgent::new(network.clone_ref(py), cfg.num_points, cfg.dimension).with_exploration(exploration),
            ),
            None => agent_by_name(agent).ok_or_else(|| PyValueError::new_err(format!("unknown agent: {}", agent)))?,
        };

        Ok(Self {
            inner: RolloutWorker::new(host, agent, cfg.clone()),
        })
    }

    /// Play one episode from `seed`.
    fn play_episode(&self, py: Python<'_>, seed: u64) -> PyResult<PyTrajectory> {
        py.allow_threads(|| self.inner.play_episode(seed))
            .map(PyTrajectory)
            .map_err(to_py_err)
    }

    /// Play `count` episodes starting at the configured seed offset.
    fn play_episodes(&self, py: Python<'_>, count: usize) -> PyResult<Vec<PyTrajectory>> {
        let trajectories = py
            .allow_threads(|| self.inner.play_episodes(count))
            .map_err(to_py_err)?;
        Ok(trajectories.into_iter().map(PyTrajectory).collect())
    }

    /// Play `count` episodes and summarise them.
    fn evaluate(&self, py: Python<'_>, count: usize) -> PyResult<PyRolloutSummary> {
        py.allow_threads(|| self.inner.evaluate(count))
            .map(PyRolloutSummary)
            .map_err(to_py_err)
    }

    #[getter]
    fn config(&self) -> PyRolloutConfig {
        PyRolloutConfig(self.inner.config().clone())
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}
