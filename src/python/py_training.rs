//! Training data type bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::nn::StateEncoder;
use crate::training::{ExperienceBuffer, TrainingSample, Trajectory, Transition};

use super::py_core::{observation_dict, to_py_err};
use super::py_nn::{PyEncodedState, PyHostActionEncoder, PyPointsEncoder};

/// Python wrapper for Transition.
#[pyclass(name = "Transition")]
#[derive(Clone)]
pub struct PyTransition(pub Transition);

#[pymethods]
impl PyTransition {
    /// Observation before the move.
    #[getter]
    fn observation<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, pyo3::types::PyDict>> {
        observation_dict(py, &self.0.observation)
    }

    /// Host subset (1-based axes).
    #[getter]
    fn host_subset(&self) -> Vec<usize> {
        self.0.action.subset.as_slice().to_vec()
    }

    /// Agent axis (1-based).
    #[getter]
    fn agent_index(&self) -> usize {
        self.0.action.axis
    }

    #[getter]
    fn reward(&self) -> f64 {
        self.0.reward
    }

    #[getter]
    fn terminal(&self) -> bool {
        self.0.terminal
    }

    #[getter]
    fn turn(&self) -> u32 {
        self.0.turn
    }

    fn __repr__(&self) -> String {
        format!(
            "Transition(turn={}, subset={}, axis={}, reward={})",
            self.0.turn, self.0.action.subset, self.0.action.axis, self.0.reward
        )
    }
}

/// Python wrapper for Trajectory.
#[pyclass(name = "Trajectory")]
#[derive(Clone)]
pub struct PyTrajectory(pub Trajectory);

#[pymethods]
impl PyTrajectory {
    /// Get all turns in this trajectory.
    #[getter]
    fn transitions(&self) -> Vec<PyTransition> {
        self.0.transitions.iter().map(|t| PyTransition(t.clone())).collect()
    }

    /// Get the RNG seed used for this episode.
    #[getter]
    fn seed(&self) -> u64 {
        self.0.seed
    }

    #[getter]
    fn variant(&self) -> &'static str {
        self.0.variant.name()
    }

    #[getter]
    fn host(&self) -> String {
        self.0.host.clone()
    }

    #[getter]
    fn agent(&self) -> String {
        self.0.agent.clone()
    }

    #[getter]
    fn total_reward(&self) -> f64 {
        self.0.total_reward
    }

    /// `"host"` if the game ended, otherwise `None`.
    #[getter]
    fn winner(&self) -> Option<String> {
        self.0.winner.map(|w| w.to_string())
    }

    #[getter]
    fn truncated(&self) -> bool {
        self.0.truncated
    }

    /// Observation when the episode stopped.
    #[getter]
    fn final_observation<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, pyo3::types::PyDict>> {
        observation_dict(py, &self.0.final_observation)
    }

    /// Get the number of turns.
    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Compact binary snapshot.
    fn to_bytes<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self
            .0
            .to_bytes()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    /// Restore a snapshot written by `to_bytes`.
    #[staticmethod]
    fn from_bytes(bytes: &[u8]) -> PyResult<Self> {
        Trajectory::from_bytes(bytes)
            .map(Self)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Convert to training samples.
    fn to_training_samples(
        &self,
        encoder: &PyPointsEncoder,
        actions: &PyHostActionEncoder,
    ) -> PyResult<Vec<PyTrainingSample>> {
        let samples = self
            .0
            .to_training_samples(&encoder.0, &actions.0)
            .map_err(to_py_err)?;
        Ok(samples.into_iter().map(PyTrainingSample).collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "Trajectory(variant={}, turns={}, winner={}, seed={})",
            self.0.variant,
            self.0.len(),
            self.0.winner.map_or("None".to_string(), |w| w.to_string()),
            self.0.seed
        )
    }
}

/// Python wrapper for TrainingSample.
#[pyclass(name = "TrainingSample")]
#[derive(Clone)]
pub struct PyTrainingSample(pub TrainingSample);

#[pymethods]
impl PyTrainingSample {
    #[getter]
    fn host_state(&self) -> PyEncodedState {
        PyEncodedState(self.0.host_state.clone())
    }

    #[getter]
    fn host_action(&self) -> usize {
        self.0.host_action
    }

    #[getter]
    fn agent_state(&self) -> PyEncodedState {
        PyEncodedState(self.0.agent_state.clone())
    }

    #[getter]
    fn agent_action(&self) -> usize {
        self.0.agent_action
    }

    #[getter]
    fn reward(&self) -> f32 {
        self.0.reward
    }

    #[getter]
    fn done(&self) -> bool {
        self.0.done
    }

    fn __repr__(&self) -> String {
        format!(
            "TrainingSample(host_action={}, agent_action={}, reward={:.2})",
            self.0.host_action, self.0.agent_action, self.0.reward
        )
    }
}

/// Python wrapper for ExperienceBuffer.
#[pyclass(name = "ExperienceBuffer")]
pub struct PyExperienceBuffer {
    inner: ExperienceBuffer,
}

#[pymethods]
impl PyExperienceBuffer {
    /// Create a new experience buffer with maximum capacity.
    #[new]
    fn new(max_trajectories: usize) -> Self {
        Self {
            inner: ExperienceBuffer::new(max_trajectories),
        }
    }

    /// Add a trajectory to the buffer.
    fn push(&mut self, trajectory: &PyTrajectory) {
        self.inner.push(trajectory.0.clone());
    }

    /// Get the number of trajectories in the buffer.
    fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Get the maximum capacity.
    #[getter]
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Total turns across all trajectories.
    #[getter]
    fn total_turns(&self) -> usize {
        self.inner.total_turns()
    }

    /// Clear all trajectories.
    fn clear(&mut self) {
        self.inner.clear();
    }

    /// Sample a random batch of transitions.
    fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<PyTransition> {
        self.inner
            .sample_batch(batch_size, seed)
            .into_iter()
            .map(PyTransition)
            .collect()
    }

    /// Get all samples as batched numpy arrays for efficient training.
    ///
    /// Returns (host_states, host_actions, agent_states, agent_actions, rewards):
    /// - host_states: [N, max_points * dimension] float32
    /// - host_actions: [N] uint64
    /// - agent_states: [N, max_points * dimension + dimension] float32
    /// - agent_actions: [N] uint64
    /// - rewards: [N] float32
    #[allow(clippy::type_complexity)]
    fn to_numpy_batch<'py>(
        &self,
        py: Python<'py>,
        encoder: &PyPointsEncoder,
        actions: &PyHostActionEncoder,
    ) -> PyResult<(
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray1<u64>>,
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray1<u64>>,
        Bound<'py, PyArray1<f32>>,
    )> {
        let mut samples: Vec<TrainingSample> = Vec::new();
        for trajectory in self.inner.iter() {
            samples.extend(
                trajectory
                    .to_training_samples(&encoder.0, &actions.0)
                    .map_err(to_py_err)?,
            );
        }

        let n = samples.len();
        let host_dim = encoder.0.output_shape().iter().product::<usize>();
        let agent_dim = encoder.0.agent_output_shape().iter().product::<usize>();

        let mut host_states: Vec<f32> = Vec::with_capacity(n * host_dim);
        let mut agent_states: Vec<f32> = Vec::with_capacity(n * agent_dim);
        let mut host_actions: Vec<u64> = Vec::with_capacity(n);
        let mut agent_actions: Vec<u64> = Vec::with_capacity(n);
        let mut rewards: Vec<f32> = Vec::with_capacity(n);

        for sample in &samples {
            host_states.extend_from_slice(&sample.host_state.tensor);
            agent_states.extend_from_slice(&sample.agent_state.tensor);
            host_actions.push(sample.host_action as u64);
            agent_actions.push(sample.agent_action as u64);
            rewards.push(sample.reward);
        }

        let host_states = PyArray1::from_vec_bound(py, host_states)
            .reshape([n, host_dim])
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let agent_states = PyArray1::from_vec_bound(py, agent_states)
            .reshape([n, agent_dim])
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        Ok((
            host_states,
            PyArray1::from_vec_bound(py, host_actions),
            agent_states,
            PyArray1::from_vec_bound(py, agent_actions),
            PyArray1::from_vec_bound(py, rewards),
        ))
    }

    fn __repr__(&self) -> String {
        format!(
            "ExperienceBuffer(len={}, capacity={})",
            self.inner.len(),
            self.inner.capacity()
        )
    }

    /// Iterate over trajectories in the buffer.
    fn __iter__(slf: PyRef<'_, Self>) -> PyResult<Py<PyTrajectoryIterator>> {
        let trajectories: Vec<PyTrajectory> = slf
            .inner
            .iter()
            .map(|t| PyTrajectory(t.clone()))
            .collect();
        Py::new(
            slf.py(),
            PyTrajectoryIterator {
                trajectories,
                index: 0,
            },
        )
    }
}

/// Iterator over trajectories in an ExperienceBuffer.
#[pyclass]
pub struct PyTrajectoryIterator {
    trajectories: Vec<PyTrajectory>,
    index: usize,
}

#[pymethods]
impl PyTrajectoryIterator {
    fn __iter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    fn __next__(mut slf: PyRefMut<'_, Self>) -> Option<PyTrajectory> {
        if slf.index < slf.trajectories.len() {
            let traj = slf.trajectories[slf.index].clone();
            slf.index += 1;
            Some(traj)
        } else {
            None
        }
    }
}
