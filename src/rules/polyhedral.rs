//! Basic and "hard" polyhedral games.
//!
//! Both apply the bare coordinate map and end when a single point remains.
//! They keep separate tags so episodes and trajectories record which game
//! they were played under.

use crate::core::{GameError, HostSubset, PointSet};

use super::variant::{ensure_running, RuleVariant, VariantTag};

/// Polyhedral game rules: coordinate map, terminal at one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolyhedralRules {
    tag: VariantTag,
}

impl PolyhedralRules {
    /// Basic polyhedral game.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            tag: VariantTag::Basic,
        }
    }

    /// "Hard" polyhedral game.
    #[must_use]
    pub const fn hard() -> Self {
        Self {
            tag: VariantTag::Hard,
        }
    }
}

impl RuleVariant for PolyhedralRules {
    fn tag(&self) -> VariantTag {
        self.tag
    }

    fn transform(&self, state: &PointSet, subset: &HostSubset, axis: usize) -> Result<PointSet, GameError> {
        ensure_running(self, state)?;
        self.validate_host_choice(state, subset)?;
        self.validate_agent_choice(state, subset, axis)?;
        state.apply_coordinate_map(axis, subset.as_slice())
    }

    fn is_terminal(&self, state: &PointSet) -> bool {
        state.is_singleton()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Winner;

    #[test]
    fn test_basic_scenario_a() {
        let rules = PolyhedralRules::basic();
        let state = PointSet::new(2, vec![vec![0, 0], vec![1, 0], vec![0, 1]]).unwrap();

        let next = rules.transform(&state, &HostSubset::from([1, 2]), 1).unwrap();

        assert_eq!(next.to_vecs(), vec![vec![0, 0], vec![1, 0], vec![1, 1]]);
        assert!(!rules.is_terminal(&next));
        assert_eq!(rules.winner(&next), None);
    }

    #[test]
    fn test_basic_scenario_b() {
        let rules = PolyhedralRules::basic();
        let state = PointSet::new(2, vec![vec![2, 0], vec![0, 2]]).unwrap();

        let next = rules.transform(&state, &HostSubset::from([1, 2]), 1).unwrap();

        assert_eq!(next.to_vecs(), vec![vec![2, 0], vec![2, 2]]);
        assert_eq!(next.cardinality(), 2);
        assert!(!rules.is_terminal(&next));
    }

    #[test]
    fn test_terminal_and_winner() {
        let rules = PolyhedralRules::hard();
        let state = PointSet::new(2, vec![vec![3, 3]]).unwrap();

        assert_eq!(rules.tag(), VariantTag::Hard);
        assert!(rules.is_terminal(&state));
        assert_eq!(rules.winner(&state), Some(Winner::Host));
    }

    #[test]
    fn test_transform_on_terminal_state_fails() {
        let rules = PolyhedralRules::basic();
        let state = PointSet::new(2, vec![vec![3, 3]]).unwrap();

        let err = rules.transform(&state, &HostSubset::from([1, 2]), 1).unwrap_err();
        assert!(matches!(err, GameError::InvalidState(_)));
    }

    #[test]
    fn test_transform_validates_move() {
        let rules = PolyhedralRules::basic();
        let state = PointSet::new(3, vec![vec![1, 0, 0], vec![0, 1, 1]]).unwrap();

        assert!(matches!(
            rules.transform(&state, &HostSubset::from([1, 2]), 3),
            Err(GameError::InvalidMove(_))
        ));
        assert!(matches!(
            rules.transform(&state, &HostSubset::from([2]), 2),
            Err(GameError::InvalidMove(_))
        ));
    }
}
