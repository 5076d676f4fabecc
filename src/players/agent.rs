//! Agent strategies.

use super::host::argmax;
use crate::core::{GameError, GameRng, HostSubset, PointSet};
use crate::nn::{PointsEncoder, PolicyNetwork};

/// Chooses the agent's axis from the host's subset.
pub trait AgentPolicy: Send + Sync {
    /// Pick one axis of `subset`.
    fn choose_axis(&self, state: &PointSet, subset: &HostSubset, rng: &mut GameRng) -> Result<usize, GameError>;

    /// Short name used in logs and trajectories.
    fn name(&self) -> &str;
}

fn empty_subset(subset: &HostSubset) -> GameError {
    GameError::invalid_move(format!("agent cannot choose from empty subset {}", subset))
}

/// Uniformly random axis of the subset.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomAgent;

impl AgentPolicy for RandomAgent {
    fn choose_axis(&self, _state: &PointSet, subset: &HostSubset, rng: &mut GameRng) -> Result<usize, GameError> {
        rng.choose(subset.as_slice())
            .copied()
            .ok_or_else(|| empty_subset(subset))
    }

    fn name(&self) -> &str {
        "random-agent"
    }
}

/// Always picks the smallest axis of the subset.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChooseFirstAgent;

impl AgentPolicy for ChooseFirstAgent {
    fn choose_axis(&self, _state: &PointSet, subset: &HostSubset, _rng: &mut GameRng) -> Result<usize, GameError> {
        subset.iter().next().ok_or_else(|| empty_subset(subset))
    }

    fn name(&self) -> &str {
        "choose-first-agent"
    }
}

/// Agent driven by a policy network with one score per coordinate.
///
/// Scores for axes outside the host's subset are masked out.
pub struct PolicyAgent<N: PolicyNetwork> {
    network: N,
    encoder: PointsEncoder,
    exploration_rate: f64,
}

impl<N: PolicyNetwork> PolicyAgent<N> {
    /// Create a network agent for `max_points` points in `dimension`.
    pub fn new(network: N, max_points: usize, dimension: usize) -> Self {
        Self {
            network,
            encoder: PointsEncoder::new(max_points, dimension),
            exploration_rate: 0.0,
        }
    }

    /// Replace the state encoder.
    pub fn with_encoder(mut self, encoder: PointsEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set the exploration rate.
    pub fn with_exploration(mut self, rate: f64) -> Self {
        self.exploration_rate = rate.clamp(0.0, 1.0);
        self
    }
}

impl<N: PolicyNetwork> AgentPolicy for PolicyAgent<N> {
    fn choose_axis(&self, state: &PointSet, subset: &HostSubset, rng: &mut GameRng) -> Result<usize, GameError> {
        if self.exploration_rate > 0.0 && rng.gen_bool(self.exploration_rate) {
            return RandomAgent.choose_axis(state, subset, rng);
        }

        let scores = self.network.predict(&self.encoder.encode_for_agent(state, subset)?)?;
        let legal = subset
            .iter()
            .map(|axis| {
                let score = axis.checked_sub(1).and_then(|k| scores.get(k).copied());
                (axis, score.unwrap_or(f32::MIN))
            });
        argmax(legal).ok_or_else(|| empty_subset(subset))
    }

    fn name(&self) -> &str {
        "policy-agent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::EncodedState;

    struct Fixed(Vec<f32>);

    impl PolicyNetwork for Fixed {
        fn predict(&self, _encoded: &EncodedState) -> Result<Vec<f32>, GameError> {
            Ok(self.0.clone())
        }
    }

    fn state() -> PointSet {
        PointSet::new(3, vec![vec![1, 0, 2], vec![0, 3, 1]]).unwrap()
    }

    #[test]
    fn test_choose_first() {
        let axis = ChooseFirstAgent
            .choose_axis(&state(), &HostSubset::from([3, 2]), &mut GameRng::new(0))
            .unwrap();
        assert_eq!(axis, 2);
    }

    #[test]
    fn test_random_agent_stays_in_subset() {
        let subset = HostSubset::from([1, 3]);
        let mut rng = GameRng::new(11);
        for _ in 0..50 {
            let axis = RandomAgent.choose_axis(&state(), &subset, &mut rng).unwrap();
            assert!(subset.contains(axis));
        }
    }

    #[test]
    fn test_empty_subset_rejected() {
        let result = RandomAgent.choose_axis(&state(), &HostSubset::default(), &mut GameRng::new(0));
        assert!(matches!(result, Err(GameError::InvalidMove(_))));
    }

    #[test]
    fn test_policy_agent_masks_outside_subset() {
        // Axis 2 scores highest but is not offered.
        let agent = PolicyAgent::new(Fixed(vec![0.2, 0.9, 0.5]), 4, 3);
        let axis = agent
            .choose_axis(&state(), &HostSubset::from([1, 3]), &mut GameRng::new(0))
            .unwrap();
        assert_eq!(axis, 3);
    }
}
