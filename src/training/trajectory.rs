//! Trajectory and experience buffer for training data collection.
//!
//! A trajectory records one complete episode, capturing:
//! - The observation before each turn
//! - The move played (host subset and agent axis)
//! - The reward and terminal flag reported by the controller
//! - The final observation and winner

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{GameError, GameRng, Move, PointSet};
use crate::engine::Observation;
use crate::nn::{EncodedState, HostActionEncoder, PointsEncoder, StateEncoder};
use crate::rules::{VariantTag, Winner};

/// One turn of an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// State before the move.
    pub observation: Observation,

    /// Move played.
    pub action: Move,

    /// Reward for the turn.
    pub reward: f64,

    /// The move ended the game.
    pub terminal: bool,

    /// Turn number (1-based) after the move.
    pub turn: u32,
}

/// A complete episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Seed the episode was generated from.
    pub seed: u64,

    /// Governing variant.
    pub variant: VariantTag,

    /// Host strategy name.
    pub host: String,

    /// Agent strategy name.
    pub agent: String,

    /// State after reset.
    pub initial: Observation,

    /// All turns in order.
    pub transitions: Vec<Transition>,

    /// State when the episode stopped.
    pub final_observation: Observation,

    /// Sum of rewards.
    pub total_reward: f64,

    /// Winner, if the game reached a terminal state.
    pub winner: Option<Winner>,

    /// Stopped by a turn or value limit.
    pub truncated: bool,
}

impl Trajectory {
    /// Start a trajectory at the reset observation.
    pub fn new(seed: u64, initial: Observation, host: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            seed,
            variant: initial.variant,
            host: host.into(),
            agent: agent.into(),
            final_observation: initial.clone(),
            initial,
            transitions: Vec::new(),
            total_reward: 0.0,
            winner: None,
            truncated: false,
        }
    }

    /// Add a turn.
    pub fn push(&mut self, transition: Transition) {
        self.total_reward += transition.reward;
        self.transitions.push(transition);
    }

    /// Record how the episode stopped.
    pub fn finish(&mut self, final_observation: Observation, winner: Option<Winner>, truncated: bool) {
        self.final_observation = final_observation;
        self.winner = winner;
        self.truncated = truncated;
    }

    /// Get the number of turns.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if no turn was played.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Did the game reach a terminal state?
    pub fn ended(&self) -> bool {
        self.winner.is_some()
    }

    /// Compact binary snapshot.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Restore a snapshot written by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }

    /// Convert to training samples.
    ///
    /// Each sample holds the host's view, the host action index, the agent's
    /// view (points plus subset mask), the agent axis (0-based) and the turn
    /// reward. Turns whose subset has no action index are skipped; encoders
    /// built for another dimension are an error.
    pub fn to_training_samples(
        &self,
        encoder: &PointsEncoder,
        actions: &HostActionEncoder,
    ) -> Result<Vec<TrainingSample>, GameError> {
        let mut samples = Vec::with_capacity(self.transitions.len());
        for (index, t) in self.transitions.iter().enumerate() {
            if actions.dimension() != t.observation.dimension {
                return Err(GameError::DimensionMismatch {
                    index,
                    expected: actions.dimension(),
                    found: t.observation.dimension,
                });
            }
            let state = PointSet::new(t.observation.dimension, t.observation.points.clone())?;
            let host_state = encoder.encode(&state)?;
            let agent_state = encoder.encode_for_agent(&state, &t.action.subset)?;
            let agent_action = t
                .action
                .axis
                .checked_sub(1)
                .ok_or_else(|| GameError::InvalidMove(format!("axis 0 in turn {}", t.turn)))?;

            let Some(host_action) = actions.encode(&t.action.subset) else {
                continue;
            };
            samples.push(TrainingSample {
                host_state,
                host_action,
                agent_state,
                agent_action,
                reward: t.reward as f32,
                done: t.terminal,
            });
        }
        Ok(samples)
    }
}

/// A single training sample extracted from a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Encoded state seen by the host.
    pub host_state: EncodedState,

    /// Dense host action index.
    pub host_action: usize,

    /// Encoded state and subset mask seen by the agent.
    pub agent_state: EncodedState,

    /// Chosen axis, 0-based.
    pub agent_action: usize,

    /// Turn reward.
    pub reward: f32,

    /// The turn ended the game.
    pub done: bool,
}

/// Buffer for storing trajectories during training.
///
/// Uses a FIFO strategy: when full, oldest trajectories are removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExperienceBuffer {
    trajectories: VecDeque<Trajectory>,
    max_trajectories: usize,
}

impl ExperienceBuffer {
    /// Create a new experience buffer.
    pub fn new(max_trajectories: usize) -> Self {
        Self {
            trajectories: VecDeque::with_capacity(max_trajectories),
            max_trajectories,
        }
    }

    /// Add a trajectory to the buffer.
    ///
    /// If the buffer is full, the oldest trajectory is removed.
    pub fn push(&mut self, trajectory: Trajectory) {
        if self.max_trajectories == 0 {
            return;
        }
        if self.trajectories.len() >= self.max_trajectories {
            self.trajectories.pop_front();
        }
        self.trajectories.push_back(trajectory);
    }

    /// Get the number of trajectories in the buffer.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Get the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.max_trajectories
    }

    /// Clear all trajectories.
    pub fn clear(&mut self) {
        self.trajectories.clear();
    }

    /// Get an iterator over trajectories.
    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Get the total number of turns across all trajectories.
    pub fn total_turns(&self) -> usize {
        self.trajectories.iter().map(Trajectory::len).sum()
    }

    /// Sample a random batch of transitions.
    ///
    /// Uses the provided RNG seed for reproducibility.
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<Transition> {
        let all: Vec<&Transition> = self.trajectories.iter().flat_map(|t| t.transitions.iter()).collect();
        if all.is_empty() || batch_size == 0 {
            return vec![];
        }

        let mut rng = GameRng::new(seed);

        // Fisher-Yates shuffle first `batch_size` elements
        let mut indices: Vec<usize> = (0..all.len()).collect();
        let n = indices.len();
        let limit = batch_size.min(n);

        for i in 0..limit {
            let j = i + rng.gen_range_usize(0..n - i);
            indices.swap(i, j);
        }

        indices[..limit].iter().map(|&i| all[i].clone()).collect()
    }

    /// Compact binary snapshot of the whole buffer.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Restore a snapshot written by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

impl Default for ExperienceBuffer {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HostSubset;

    fn observation(points: Vec<Vec<i64>>) -> Observation {
        Observation {
            dimension: points[0].len(),
            points,
            variant: VariantTag::Basic,
        }
    }

    fn make_trajectory(seed: u64, turns: u32) -> Trajectory {
        let mut traj = Trajectory::new(seed, observation(vec![vec![2, 0], vec![0, 2]]), "host", "agent");
        for turn in 1..=turns {
            traj.push(Transition {
                observation: observation(vec![vec![2, 0], vec![0, 2]]),
                action: Move::new(HostSubset::from([1, 2]), 1),
                reward: -1.0,
                terminal: false,
                turn,
            });
        }
        traj
    }

    #[test]
    fn test_trajectory_accumulates_reward() {
        let traj = make_trajectory(42, 3);
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.total_reward, -3.0);
        assert!(!traj.ended());
        assert_eq!(traj.variant, VariantTag::Basic);
    }

    #[test]
    fn test_trajectory_finish() {
        let mut traj = make_trajectory(1, 1);
        traj.finish(observation(vec![vec![2, 2]]), Some(Winner::Host), false);
        assert!(traj.ended());
        assert_eq!(traj.final_observation.points, vec![vec![2, 2]]);
    }

    #[test]
    fn test_trajectory_bytes() {
        let traj = make_trajectory(7, 2);
        let bytes = traj.to_bytes().unwrap();
        assert_eq!(Trajectory::from_bytes(&bytes).unwrap(), traj);
        assert!(Trajectory::from_bytes(&bytes[..3]).is_err());
    }

    #[test]
    fn test_training_samples() {
        let traj = make_trajectory(0, 2);
        let samples = traj
            .to_training_samples(&PointsEncoder::new(3, 2), &HostActionEncoder::new(2).unwrap())
            .unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].host_action, 0);
        assert_eq!(samples[0].agent_action, 0);
        assert_eq!(samples[0].host_state.shape, vec![3, 2]);
        assert_eq!(samples[0].agent_state.shape, vec![3 * 2 + 2]);
        assert_eq!(samples[0].reward, -1.0);
    }

    #[test]
    fn test_training_samples_reject_mismatched_encoders() {
        let traj = make_trajectory(0, 2);

        let err = traj
            .to_training_samples(&PointsEncoder::new(10, 4), &HostActionEncoder::new(2).unwrap())
            .unwrap_err();
        assert!(matches!(err, GameError::DimensionMismatch { expected: 4, found: 2, .. }));

        let err = traj
            .to_training_samples(&PointsEncoder::new(10, 2), &HostActionEncoder::new(3).unwrap())
            .unwrap_err();
        assert!(matches!(err, GameError::DimensionMismatch { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_buffer_fifo() {
        let mut buffer = ExperienceBuffer::new(2);
        buffer.push(make_trajectory(1, 1));
        buffer.push(make_trajectory(2, 2));
        buffer.push(make_trajectory(3, 3));

        assert_eq!(buffer.len(), 2);
        let seeds: Vec<u64> = buffer.iter().map(|t| t.seed).collect();
        assert_eq!(seeds, vec![2, 3]);
        assert_eq!(buffer.total_turns(), 5);
    }

    #[test]
    fn test_sample_batch_deterministic() {
        let mut buffer = ExperienceBuffer::new(10);
        buffer.push(make_trajectory(1, 4));
        buffer.push(make_trajectory(2, 4));

        let a = buffer.sample_batch(5, 99);
        let b = buffer.sample_batch(5, 99);
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
        assert_eq!(buffer.sample_batch(100, 1).len(), 8);
        assert!(ExperienceBuffer::default().sample_batch(4, 0).is_empty());
    }

    #[test]
    fn test_buffer_bytes() {
        let mut buffer = ExperienceBuffer::new(3);
        buffer.push(make_trajectory(5, 2));
        let back = ExperienceBuffer::from_bytes(&buffer.to_bytes().unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.capacity(), 3);
    }
}
