//! Linear-transform game: coordinate map followed by vertex reduction.
//!
//! After every move only the vertices of the Newton polytope survive, so
//! the point count never grows. The host wins once a single vertex remains.

use crate::core::{GameError, HostSubset, PointSet};
use crate::geometry::VertexReducer;

use super::variant::{ensure_running, RuleVariant, VariantTag};

/// Linear-transform rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearTransformRules {
    reducer: VertexReducer,
}

impl LinearTransformRules {
    /// Rules with the exact reducer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules with a custom reducer.
    #[must_use]
    pub fn with_reducer(reducer: VertexReducer) -> Self {
        Self { reducer }
    }

    /// The reducer applied after each map.
    #[must_use]
    pub fn reducer(&self) -> VertexReducer {
        self.reducer
    }
}

impl RuleVariant for LinearTransformRules {
    fn tag(&self) -> VariantTag {
        VariantTag::LinearTransform
    }

    fn transform(&self, state: &PointSet, subset: &HostSubset, axis: usize) -> Result<PointSet, GameError> {
        ensure_running(self, state)?;
        self.validate_host_choice(state, subset)?;
        self.validate_agent_choice(state, subset, axis)?;
        let mapped = state.apply_coordinate_map(axis, subset.as_slice())?;
        Ok(self.reducer.reduce(&mapped))
    }

    fn is_terminal(&self, state: &PointSet) -> bool {
        state.is_singleton()
    }

    fn prepare(&self, state: &PointSet) -> PointSet {
        self.reducer.reduce(state)
    }
}
