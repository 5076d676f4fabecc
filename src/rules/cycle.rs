//! Cycle-moving and Thom-type games.
//!
//! Both variants move points with the coordinate map and keep only Newton
//! polytope vertices, like the linear-transform game. Their end condition is
//! not a fixed rule: callers supply a `TerminalPredicate` when building the
//! rules, and the engine never guesses one.
//!
//! `ReductionStabilized` is provided as an explicit opt-in predicate. It is
//! never installed implicitly.

use std::sync::Arc;

use crate::core::{GameError, HostSubset, PointSet};
use crate::geometry::VertexReducer;

use super::variant::{ensure_running, RuleVariant, VariantTag};

/// Decides when a cycle-moving or Thom game is over.
pub trait TerminalPredicate: Send + Sync {
    /// Is `state` terminal?
    fn is_terminal(&self, state: &PointSet) -> bool;

    /// Human-readable name, used in logs.
    fn name(&self) -> &str;
}

/// Wraps a closure as a `TerminalPredicate`.
///
/// ```
/// use hironaka_engine::core::PointSet;
/// use hironaka_engine::rules::{FnPredicate, TerminalPredicate};
///
/// let small = FnPredicate::new("at most two points", |s: &PointSet| s.cardinality() <= 2);
/// assert_eq!(small.name(), "at most two points");
/// ```
pub struct FnPredicate<F> {
    name: String,
    f: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&PointSet) -> bool + Send + Sync,
{
    /// Create a named predicate from a closure.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> TerminalPredicate for FnPredicate<F>
where
    F: Fn(&PointSet) -> bool + Send + Sync,
{
    fn is_terminal(&self, state: &PointSet) -> bool {
        (self.f)(state)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Terminal iff no host move, answered by any agent axis, changes the
/// reduced point count.
///
/// A state with at most one reduced point is always terminal. Moves whose
/// coordinate sums overflow are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReductionStabilized {
    reducer: VertexReducer,
}

impl ReductionStabilized {
    /// Predicate using the exact reducer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Predicate using a custom reducer.
    #[must_use]
    pub fn with_reducer(reducer: VertexReducer) -> Self {
        Self { reducer }
    }
}

impl TerminalPredicate for ReductionStabilized {
    fn is_terminal(&self, state: &PointSet) -> bool {
        let base = self.reducer.reduce(state).cardinality();
        if base <= 1 {
            return true;
        }

        let subsets = match HostSubset::enumerate(state.dimension()) {
            Ok(subsets) => subsets,
            Err(e) => {
                log::warn!("cannot check stabilization: {}", e);
                return false;
            }
        };
        for subset in subsets {
            for axis in subset.iter() {
                let Ok(mapped) = state.apply_coordinate_map(axis, subset.as_slice()) else {
                    continue;
                };
                if self.reducer.reduce(&mapped).cardinality() != base {
                    return false;
                }
            }
        }
        true
    }

    fn name(&self) -> &str {
        "reduction-stabilized"
    }
}

/// Rules for the cycle-moving and Thom variants.
#[derive(Clone)]
pub struct CycleRules {
    tag: VariantTag,
    predicate: Arc<dyn TerminalPredicate>,
    reducer: VertexReducer,
}

impl CycleRules {
    /// Cycle-moving rules with the given terminal predicate.
    pub fn cycle_moving(predicate: impl TerminalPredicate + 'static) -> Self {
        Self::with_tag(VariantTag::CycleMoving, Arc::new(predicate))
    }

    /// Thom-type rules with the given terminal predicate.
    pub fn thom(predicate: impl TerminalPredicate + 'static) -> Self {
        Self::with_tag(VariantTag::Thom, Arc::new(predicate))
    }

    fn with_tag(tag: VariantTag, predicate: Arc<dyn TerminalPredicate>) -> Self {
        Self {
            tag,
            predicate,
            reducer: VertexReducer::new(),
        }
    }

    /// Replace the reducer applied after each map.
    #[must_use]
    pub fn with_reducer(mut self, reducer: VertexReducer) -> Self {
        self.reducer = reducer;
        self
    }

    /// Name of the installed predicate.
    #[must_use]
    pub fn predicate_name(&self) -> &str {
        self.predicate.name()
    }
}

impl std::fmt::Debug for CycleRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleRules")
            .field("tag", &self.tag)
            .field("predicate", &self.predicate.name())
            .field("reducer", &self.reducer)
            .finish()
    }
}

impl RuleVariant for CycleRules {
    fn tag(&self) -> VariantTag {
        self.tag
    }

    fn transform(&self, state: &PointSet, subset: &HostSubset, axis: usize) -> Result<PointSet, GameError> {
        ensure_running(self, state)?;
        self.validate_host_choice(state, subset)?;
        self.validate_agent_choice(state, subset, axis)?;
        let mapped = state.apply_coordinate_map(axis, subset.as_slice())?;
        Ok(self.reducer.reduce(&mapped))
    }

    fn is_terminal(&self, state: &PointSet) -> bool {
        self.predicate.is_terminal(state)
    }

    fn prepare(&self, state: &PointSet) -> PointSet {
        self.reducer.reduce(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Winner;

    #[test]
    fn test_stabilization_unknown_beyond_subset_dimension() {
        let mut a = vec![0; 64];
        let mut b = vec![0; 64];
        a[0] = 1;
        b[1] = 1;
        let state = PointSet::new(64, vec![a, b]).unwrap();

        assert!(!ReductionStabilized::new().is_terminal(&state));
    }

    #[test]
    fn test_closure_predicate_drives_terminal() {
        let rules = CycleRules::thom(FnPredicate::new("max >= 10", |s: &PointSet| s.max_value() >= 10));
        let small = PointSet::new(2, vec![vec![1, 2], vec![3, 0]]).unwrap();
        let large = PointSet::new(2, vec![vec![1, 12], vec![3, 0]]).unwrap();

        assert_eq!(rules.tag(), VariantTag::Thom);
        assert_eq!(rules.predicate_name(), "max >= 10");
        assert!(!rules.is_terminal(&small));
        assert!(rules.is_terminal(&large));
        assert_eq!(rules.winner(&large), Some(Winner::Host));
    }

    #[test]
    fn test_transform_reduces() {
        let rules = CycleRules::cycle_moving(FnPredicate::new("never", |_: &PointSet| false));
        let state = PointSet::new(2, vec![vec![1, 0], vec![0, 1]]).unwrap();

        let next = rules.transform(&state, &HostSubset::from([1, 2]), 1).unwrap();
        assert_eq!(next.to_vecs(), vec![vec![1, 0]]);
    }

    #[test]
    fn test_transform_rejects_terminal_state() {
        let rules = CycleRules::cycle_moving(FnPredicate::new("always", |_: &PointSet| true));
        let state = PointSet::new(2, vec![vec![1, 0], vec![0, 1]]).unwrap();

        assert!(matches!(
            rules.transform(&state, &HostSubset::from([1, 2]), 1),
            Err(GameError::InvalidState(_))
        ));
    }

    #[test]
    fn test_reduction_stabilized_singleton() {
        let state = PointSet::new(2, vec![vec![5, 5]]).unwrap();
        assert!(ReductionStabilized::new().is_terminal(&state));
    }

    #[test]
    fn test_reduction_stabilized_detects_progress() {
        // The map of (0,1) on axis 1 dominates (1,0), so a move changes the count.
        let state = PointSet::new(2, vec![vec![1, 0], vec![0, 1]]).unwrap();
        assert!(!ReductionStabilized::new().is_terminal(&state));
    }

    #[test]
    fn test_debug_names_predicate() {
        let rules = CycleRules::cycle_moving(ReductionStabilized::new());
        let debug = format!("{:?}", rules);
        assert!(debug.contains("reduction-stabilized"));
    }
}
