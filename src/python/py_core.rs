//! Episode bindings for Python.

use numpy::PyArray2;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{EpisodeConfig, GameError, GameRng, HostSubset};
use crate::engine::{EpisodeController, Observation, StepInfo};
use crate::rules::VariantTag;

/// Collect a host subset from any iterable of ints (list, tuple, set).
pub(crate) fn subset_from_iterable(coords: &Bound<'_, PyAny>) -> PyResult<HostSubset> {
    coords
        .iter()?
        .map(|item| item.and_then(|i| i.extract::<usize>()))
        .collect()
}

/// Map engine errors to Python exceptions.
///
/// Bad input becomes `ValueError`; misuse of the episode lifecycle becomes
/// `RuntimeError`.
pub(crate) fn to_py_err(err: GameError) -> PyErr {
    match err {
        GameError::EpisodeFinished
        | GameError::NoActiveEpisode
        | GameError::OutOfTurn { .. }
        | GameError::InvalidState(_)
        | GameError::Policy(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

pub(crate) fn parse_variant(name: &str) -> PyResult<VariantTag> {
    name.parse::<VariantTag>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

pub(crate) fn observation_dict<'py>(py: Python<'py>, observation: &Observation) -> PyResult<Bound<'py, PyDict>> {
    let points = PyArray2::from_vec2_bound(py, &observation.points)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let dict = PyDict::new_bound(py);
    dict.set_item("points", points)?;
    dict.set_item("variant", observation.variant.name())?;
    dict.set_item("dimension", observation.dimension)?;
    Ok(dict)
}

fn info_dict<'py>(py: Python<'py>, info: &StepInfo) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("turn_count", info.turn_count)?;
    dict.set_item("winner", info.winner.map(|w| w.to_string()))?;
    dict.set_item("truncated", info.truncated)?;
    Ok(dict)
}

/// Python wrapper for EpisodeController.
///
/// Observations are dicts with `points` (int64 array of shape
/// `[num_points, dimension]`), `variant` and `dimension`.
#[pyclass(name = "Episode")]
pub struct PyEpisode {
    inner: EpisodeController,
    rng: GameRng,
}

#[pymethods]
impl PyEpisode {
    /// Create a new episode controller.
    ///
    /// # Arguments
    /// - turn_cost: Reward for each turn that leaves the game running (default: -1)
    /// - max_turns: Truncate after this many turns (default: unlimited)
    /// - value_threshold: Truncate once a coordinate reaches this value
    /// - reposition: Shift each state so every coordinate's minimum is zero
    /// - seed: Seed for `reset_random`
    #[new]
    #[pyo3(signature = (
        turn_cost = -1.0,
        max_turns = None,
        value_threshold = None,
        reposition = false,
        seed = 0
    ))]
    fn new(
        turn_cost: f64,
        max_turns: Option<u32>,
        value_threshold: Option<i64>,
        reposition: bool,
        seed: u64,
    ) -> Self {
        let mut config = EpisodeConfig::default()
            .with_turn_cost(turn_cost)
            .with_reposition(reposition);
        config.max_turns = max_turns;
        config.value_threshold = value_threshold;
        Self {
            inner: EpisodeController::new(config),
            rng: GameRng::new(seed),
        }
    }

    /// Start a new episode from explicit points.
    #[pyo3(signature = (dimension, points, variant = "basic"))]
    fn reset<'py>(
        &mut self,
        py: Python<'py>,
        dimension: usize,
        points: Vec<Vec<i64>>,
        variant: &str,
    ) -> PyResult<Bound<'py, PyDict>> {
        let tag = parse_variant(variant)?;
        let observation = self.inner.reset(dimension, points, tag).map_err(to_py_err)?;
        observation_dict(py, &observation)
    }

    /// Start a new episode from random points in `[0, max_value)`.
    #[pyo3(signature = (dimension, num_points, max_value, variant = "linear"))]
    fn reset_random<'py>(
        &mut self,
        py: Python<'py>,
        dimension: usize,
        num_points: usize,
        max_value: i64,
        variant: &str,
    ) -> PyResult<Bound<'py, PyDict>> {
        let tag = parse_variant(variant)?;
        let observation = self
            .inner
            .reset_random(&mut self.rng, num_points, dimension, max_value, tag)
            .map_err(to_py_err)?;
        observation_dict(py, &observation)
    }

    /// Play one turn.
    ///
    /// `host_subset` is any iterable of 1-based ints, usually a `set`.
    /// Returns `(observation, reward, terminal, info)` where `info` has
    /// `turn_count`, `winner` (`"host"` or `None`) and `truncated`.
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        host_subset: &Bound<'py, PyAny>,
        agent_index: usize,
    ) -> PyResult<(Bound<'py, PyDict>, f64, bool, Bound<'py, PyDict>)> {
        let subset = subset_from_iterable(host_subset)?;
        let result = self.inner.step(&subset, agent_index).map_err(to_py_err)?;
        Ok((
            observation_dict(py, &result.observation)?,
            result.reward,
            result.terminal,
            info_dict(py, &result.info)?,
        ))
    }

    /// Observation of the current state.
    fn observation<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let observation = self.inner.observation().map_err(to_py_err)?;
        observation_dict(py, &observation)
    }

    /// Completed turns in the current episode.
    #[getter]
    fn turn_count(&self) -> u32 {
        self.inner.turn_count()
    }

    /// Is the current episode over?
    #[getter]
    fn done(&self) -> bool {
        self.inner.is_done()
    }

    /// Registered variant names.
    fn variants(&self) -> Vec<&'static str> {
        self.inner.registry().tags().into_iter().map(VariantTag::name).collect()
    }

    fn __repr__(&self) -> String {
        match self.inner.state() {
            Some(state) => format!("Episode(turns={}, state={})", self.inner.turn_count(), state),
            None => "Episode(not started)".to_string(),
        }
    }
}
