//! State and action encoding for neural network input.
//!
//! - `PointsEncoder`: point set -> padded `[max_points, dimension]` tensor
//! - `HostActionEncoder`: host subset <-> dense action index

use rustc_hash::FxHashMap;

use crate::core::{GameError, HostSubset, PointSet};
use crate::nn::traits::EncodedState;

/// Largest dimension the host action table is built for.
pub const MAX_ACTION_DIMENSION: usize = 20;

/// Encodes point sets into tensors for neural network input.
pub trait StateEncoder: Send + Sync {
    /// Encode the state as seen by the host.
    fn encode(&self, state: &PointSet) -> Result<EncodedState, GameError>;

    /// Get the shape of encoded states.
    fn output_shape(&self) -> Vec<usize>;
}

/// Padded point-matrix encoder.
///
/// Rows are points sorted by first coordinate, largest first. Missing rows
/// hold the padding value. Points beyond `max_points` are dropped.
///
/// ```
/// use hironaka_engine::core::PointSet;
/// use hironaka_engine::nn::{PointsEncoder, StateEncoder};
///
/// let encoder = PointsEncoder::new(3, 2);
/// let state = PointSet::new(2, vec![vec![0, 4], vec![2, 1]]).unwrap();
/// let encoded = encoder.encode(&state).unwrap();
///
/// assert_eq!(encoded.shape, vec![3, 2]);
/// assert_eq!(encoded.tensor, vec![2.0, 1.0, 0.0, 4.0, -1.0, -1.0]);
/// ```
#[derive(Clone, Debug)]
pub struct PointsEncoder {
    max_points: usize,
    dimension: usize,
    padding: f32,
    rescale: bool,
}

impl PointsEncoder {
    /// Create an encoder for `max_points` points of `dimension` coordinates.
    pub fn new(max_points: usize, dimension: usize) -> Self {
        Self {
            max_points,
            dimension,
            padding: -1.0,
            rescale: false,
        }
    }

    /// Set the padding value. Must be non-positive to stay apart from real
    /// coordinates.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding.min(0.0);
        self
    }

    /// Divide coordinates by the largest one, mapping them into `[0, 1]`.
    pub fn with_rescale(mut self, rescale: bool) -> Self {
        self.rescale = rescale;
        self
    }

    /// Maximum number of encoded points.
    #[must_use]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Encode the state plus the host's coordinate mask, as seen by the agent.
    ///
    /// Output is flat: `max_points * dimension` point features followed by
    /// `dimension` mask entries (1 for chosen axes).
    pub fn encode_for_agent(&self, state: &PointSet, subset: &HostSubset) -> Result<EncodedState, GameError> {
        let mut encoded = self.encode(state)?;
        encoded
            .tensor
            .extend(subset.to_mask(self.dimension).into_iter().map(|on| if on { 1.0 } else { 0.0 }));
        let len = encoded.tensor.len();
        Ok(EncodedState::new(encoded.tensor, vec![len]))
    }

    /// Shape of `encode_for_agent` output.
    #[must_use]
    pub fn agent_output_shape(&self) -> Vec<usize> {
        vec![self.max_points * self.dimension + self.dimension]
    }
}

impl StateEncoder for PointsEncoder {
    fn encode(&self, state: &PointSet) -> Result<EncodedState, GameError> {
        if state.dimension() != self.dimension {
            return Err(GameError::DimensionMismatch {
                index: 0,
                expected: self.dimension,
                found: state.dimension(),
            });
        }

        let mut rows: Vec<&[i64]> = state.iter().map(|p| p.coords()).collect();
        // Stable sort keeps lexicographic order among equal first coordinates.
        rows.sort_by(|a, b| b[0].cmp(&a[0]));

        let scale = if self.rescale {
            state.max_value().max(1) as f32
        } else {
            1.0
        };

        let mut encoded = EncodedState::filled(self.output_shape(), self.padding);
        for (row, coords) in rows.iter().take(self.max_points).enumerate() {
            for (k, &c) in coords.iter().enumerate() {
                encoded.set(row * self.dimension + k, c as f32 / scale);
            }
        }
        Ok(encoded)
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![self.max_points, self.dimension]
    }
}

/// Dense indexing of host subsets.
///
/// Index `k` is the `k`-th subset produced by `HostSubset::enumerate`, so
/// there are `2^n - n - 1` actions.
#[derive(Clone, Debug)]
pub struct HostActionEncoder {
    dimension: usize,
    subsets: Vec<HostSubset>,
    index: FxHashMap<u64, usize>,
}

impl HostActionEncoder {
    /// Build the action table for `dimension`.
    pub fn new(dimension: usize) -> Result<Self, GameError> {
        if !(2..=MAX_ACTION_DIMENSION).contains(&dimension) {
            return Err(GameError::UnsupportedDimension(dimension));
        }
        let subsets: Vec<HostSubset> = HostSubset::enumerate(dimension)?.collect();
        let index = subsets
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_bits(), i))
            .collect();
        Ok(Self {
            dimension,
            subsets,
            index,
        })
    }

    /// Dimension the table was built for.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of host actions.
    #[must_use]
    pub fn action_space_size(&self) -> usize {
        self.subsets.len()
    }

    /// Index of `subset`, or `None` if it is not a legal host subset.
    #[must_use]
    pub fn encode(&self, subset: &HostSubset) -> Option<usize> {
        if subset.len() < 2 || subset.iter().any(|k| k == 0 || k > self.dimension) {
            return None;
        }
        self.index.get(&subset.to_bits()).copied()
    }

    /// Subset at `index`.
    pub fn decode(&self, index: usize) -> Result<HostSubset, GameError> {
        self.subsets.get(index).cloned().ok_or_else(|| {
            GameError::invalid_move(format!(
                "host action {} outside 0..{}",
                index,
                self.subsets.len()
            ))
        })
    }
}
