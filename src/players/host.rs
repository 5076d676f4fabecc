//! Host strategies.

use crate::core::{GameError, GameRng, HostSubset, PointSet};
use crate::nn::{HostActionEncoder, PointsEncoder, PolicyNetwork, StateEncoder};

/// Chooses the host's coordinate subset each turn.
pub trait HostPolicy: Send + Sync {
    /// Pick a subset with at least two coordinates of `state`.
    fn choose_subset(&self, state: &PointSet, rng: &mut GameRng) -> Result<HostSubset, GameError>;

    /// Short name used in logs and trajectories.
    fn name(&self) -> &str;
}

/// Uniformly random legal subset.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomHost;

impl HostPolicy for RandomHost {
    fn choose_subset(&self, state: &PointSet, rng: &mut GameRng) -> Result<HostSubset, GameError> {
        let dimension = state.dimension();
        if dimension < 2 {
            return Err(GameError::UnsupportedDimension(dimension));
        }
        // Rejection sampling over bitmasks is uniform over legal subsets.
        loop {
            let mask: Vec<bool> = (0..dimension).map(|_| rng.gen_bool(0.5)).collect();
            let subset = HostSubset::from_mask(&mask);
            if subset.len() >= 2 {
                return Ok(subset);
            }
        }
    }

    fn name(&self) -> &str {
        "random-host"
    }
}

/// Always picks every coordinate.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllCoordHost;

impl HostPolicy for AllCoordHost {
    fn choose_subset(&self, state: &PointSet, _rng: &mut GameRng) -> Result<HostSubset, GameError> {
        Ok(HostSubset::all(state.dimension()))
    }

    fn name(&self) -> &str {
        "all-coord-host"
    }
}

/// Host driven by a policy network over the dense host action space.
///
/// Takes the best-scoring action. With probability `exploration_rate` it
/// picks a uniformly random action instead.
pub struct PolicyHost<N: PolicyNetwork> {
    network: N,
    encoder: PointsEncoder,
    actions: HostActionEncoder,
    exploration_rate: f64,
}

impl<N: PolicyNetwork> PolicyHost<N> {
    /// Create a network host for `max_points` points in `dimension`.
    pub fn new(network: N, max_points: usize, dimension: usize) -> Result<Self, GameError> {
        Ok(Self {
            network,
            encoder: PointsEncoder::new(max_points, dimension),
            actions: HostActionEncoder::new(dimension)?,
            exploration_rate: 0.0,
        })
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

    /// Dense action table.
    pub fn actions(&self) -> &HostActionEncoder {
        &self.actions
    }
}

impl<N: PolicyNetwork> HostPolicy for PolicyHost<N> {
    fn choose_subset(&self, state: &PointSet, rng: &mut GameRng) -> Result<HostSubset, GameError> {
        let size = self.actions.action_space_size();
        if self.exploration_rate > 0.0 && rng.gen_bool(self.exploration_rate) {
            return self.actions.decode(rng.gen_range_usize(0..size));
        }

        let scores = self.network.predict(&self.encoder.encode(state)?)?;
        let best = argmax(scores.iter().take(size).copied().enumerate()).unwrap_or(0);
        self.actions.decode(best)
    }

    fn name(&self) -> &str {
        "policy-host"
    }
}

/// Index of the largest score; the first one wins ties.
pub(crate) fn argmax(scores: impl Iterator<Item = (usize, f32)>) -> Option<usize> {
    scores
        .fold(None, |best: Option<(usize, f32)>, (i, s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })
        .map(|(i, _)| i)
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
    fn test_random_host_is_legal_and_deterministic() {
        let s = state();
        let mut a = GameRng::new(5);
        let mut b = GameRng::new(5);
        for _ in 0..50 {
            let x = RandomHost.choose_subset(&s, &mut a).unwrap();
            assert!(x.len() >= 2);
            assert!(x.iter().all(|k| (1..=3).contains(&k)));
            assert_eq!(x, RandomHost.choose_subset(&s, &mut b).unwrap());
        }
    }

    #[test]
    fn test_all_coord_host() {
        let subset = AllCoordHost.choose_subset(&state(), &mut GameRng::new(0)).unwrap();
        assert_eq!(subset, HostSubset::from([1, 2, 3]));
    }

    #[test]
    fn test_policy_host_takes_argmax() {
        let host = PolicyHost::new(Fixed(vec![0.1, 0.2, 0.9, 0.3]), 4, 3).unwrap();
        let subset = host.choose_subset(&state(), &mut GameRng::new(0)).unwrap();
        assert_eq!(subset, HostSubset::from([2, 3]));
    }

    #[test]
    fn test_policy_host_ignores_extra_scores() {
        let host = PolicyHost::new(Fixed(vec![0.1, 0.0, 0.0, 0.0, 5.0]), 4, 3).unwrap();
        let subset = host.choose_subset(&state(), &mut GameRng::new(0)).unwrap();
        assert_eq!(subset, HostSubset::from([1, 2]));
    }

    #[test]
    fn test_policy_host_full_exploration_is_legal() {
        let host = PolicyHost::new(Fixed(vec![1.0, 0.0, 0.0, 0.0]), 4, 3)
            .unwrap()
            .with_exploration(1.0);
        let mut rng = GameRng::new(9);
        for _ in 0..20 {
            assert!(host.choose_subset(&state(), &mut rng).unwrap().len() >= 2);
        }
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax([1.0, 3.0, 3.0].into_iter().enumerate()), Some(1));
        assert_eq!(argmax(std::iter::empty()), None);
    }
}
