//! Neural network type bindings for Python.

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::core::{GameError, PointSet};
use crate::nn::{EncodedState, HostActionEncoder, PointsEncoder, PolicyNetwork, StateEncoder};

use super::py_core::{subset_from_iterable, to_py_err};

/// Python wrapper for EncodedState.
#[pyclass(name = "EncodedState")]
#[derive(Clone, Debug)]
pub struct PyEncodedState(pub EncodedState);

#[pymethods]
impl PyEncodedState {
    /// Create a new encoded state from tensor data and shape.
    #[new]
    fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        Self(EncodedState::new(tensor, shape))
    }

    /// Get the tensor data as a list.
    #[getter]
    fn tensor(&self) -> Vec<f32> {
        self.0.tensor.clone()
    }

    /// Get the tensor shape.
    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.0.shape.clone()
    }

    /// Get the total number of elements.
    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Convert tensor to numpy array (flat).
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_slice_bound(py, &self.0.tensor)
    }

    fn __repr__(&self) -> String {
        format!("EncodedState(shape={:?}, len={})", self.0.shape, self.0.len())
    }
}

/// Python-implemented PolicyNetwork wrapper.
///
/// Allows Python callables to drive `PolicyHost` and `PolicyAgent`.
#[pyclass(name = "PolicyNetwork")]
pub struct PyPolicyNetwork {
    callback: PyObject,
    action_space_size: usize,
}

#[pymethods]
impl PyPolicyNetwork {
    /// Create a new network wrapper from a Python callable.
    ///
    /// The callable should accept an EncodedState and return a list of
    /// `action_space_size` scores.
    #[new]
    fn new(callback: PyObject, action_space_size: usize) -> Self {
        Self {
            callback,
            action_space_size,
        }
    }

    /// Call the network on an encoded state.
    fn predict(&self, py: Python<'_>, encoded: &PyEncodedState) -> PyResult<Vec<f32>> {
        self.callback.call1(py, (encoded.clone(),))?.extract(py)
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.action_space_size
    }
}

impl PyPolicyNetwork {
    /// Share the callback under a new handle.
    pub(crate) fn clone_ref(&self, py: Python<'_>) -> Self {
        Self {
            callback: self.callback.clone_ref(py),
            action_space_size: self.action_space_size,
        }
    }
}

// Implement the Rust trait for the Python wrapper
impl PolicyNetwork for PyPolicyNetwork {
    fn predict(&self, encoded: &EncodedState) -> Result<Vec<f32>, GameError> {
        Python::with_gil(|py| {
            let py_encoded = PyEncodedState(encoded.clone());
            self.callback
                .call1(py, (py_encoded,))
                .and_then(|result| result.extract::<Vec<f32>>(py))
                .map_err(|e| {
                    log::warn!("PyPolicyNetwork: predict() failed: {}", e);
                    GameError::Policy(e.to_string())
                })
        })
    }
}

// SAFETY: PyPolicyNetwork is Send + Sync because:
// 1. All Python interactions go through Python::with_gil()
// 2. PyObject internally uses reference counting that's safe across threads
//    when accessed through the GIL
// 3. The other field (action_space_size) is plain data
//
// INVARIANT: Any new methods that access self.callback MUST use with_gil().
unsafe impl Send for PyPolicyNetwork {}
unsafe impl Sync for PyPolicyNetwork {}

/// Python wrapper for PointsEncoder.
#[pyclass(name = "PointsEncoder")]
#[derive(Clone)]
pub struct PyPointsEncoder(pub PointsEncoder);

#[pymethods]
impl PyPointsEncoder {
    #[new]
    #[pyo3(signature = (max_points, dimension, padding = -1.0, rescale = false))]
    fn new(max_points: usize, dimension: usize, padding: f32, rescale: bool) -> Self {
        Self(
            PointsEncoder::new(max_points, dimension)
                .with_padding(padding)
                .with_rescale(rescale),
        )
    }

    /// Encode points as the host sees them.
    fn encode(&self, dimension: usize, points: Vec<Vec<i64>>) -> PyResult<PyEncodedState> {
        let state = PointSet::new(dimension, points).map_err(to_py_err)?;
        self.0.encode(&state).map(PyEncodedState).map_err(to_py_err)
    }

    /// Encode points plus the host's subset as the agent sees them.
    fn encode_for_agent(
        &self,
        dimension: usize,
        points: Vec<Vec<i64>>,
        host_subset: &Bound<'_, PyAny>,
    ) -> PyResult<PyEncodedState> {
        let state = PointSet::new(dimension, points).map_err(to_py_err)?;
        self.0
            .encode_for_agent(&state, &subset_from_iterable(host_subset)?)
            .map(PyEncodedState)
            .map_err(to_py_err)
    }

    /// Get the output shape.
    fn output_shape(&self) -> Vec<usize> {
        self.0.output_shape()
    }

    /// Get the agent-side output shape.
    fn agent_output_shape(&self) -> Vec<usize> {
        self.0.agent_output_shape()
    }
}

/// Python wrapper for HostActionEncoder.
#[pyclass(name = "HostActionEncoder")]
#[derive(Clone)]
pub struct PyHostActionEncoder(pub HostActionEncoder);

#[pymethods]
impl PyHostActionEncoder {
    #[new]
    fn new(dimension: usize) -> PyResult<Self> {
        HostActionEncoder::new(dimension).map(Self).map_err(to_py_err)
    }

    /// Action index of a subset, or `None` if it is not a legal host move.
    fn encode(&self, host_subset: &Bound<'_, PyAny>) -> PyResult<Option<usize>> {
        Ok(self.0.encode(&subset_from_iterable(host_subset)?))
    }

    /// Subset for an action index.
    fn decode(&self, index: usize) -> PyResult<Vec<usize>> {
        self.0
            .decode(index)
            .map(|s| s.as_slice().to_vec())
            .map_err(to_py_err)
    }

    /// Number of host actions.
    fn __len__(&self) -> usize {
        self.0.action_space_size()
    }
}
