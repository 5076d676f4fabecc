//! Rule variant trait and variant tags.
//!
//! Each game flavour implements `RuleVariant` to define:
//! - Which host subsets and agent axes are legal
//! - How a move transforms the point set
//! - When the game is over and who won
//!
//! The turn engine calls into `RuleVariant` but never interprets
//! variant-specific geometry directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GameError, HostSubset, PointSet};

/// Identifies the rule variant governing an episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantTag {
    /// Basic polyhedral game: coordinate map only.
    Basic,
    /// "Hard" polyhedral game.
    Hard,
    /// Coordinate map followed by Newton polytope reduction.
    LinearTransform,
    /// Cycle-moving game with an external terminal predicate.
    CycleMoving,
    /// Thom-type game with an external terminal predicate.
    Thom,
}

impl VariantTag {
    /// Every tag, in declaration order.
    pub const ALL: [VariantTag; 5] = [
        VariantTag::Basic,
        VariantTag::Hard,
        VariantTag::LinearTransform,
        VariantTag::CycleMoving,
        VariantTag::Thom,
    ];

    /// Short name used in logs and parsing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VariantTag::Basic => "basic",
            VariantTag::Hard => "hard",
            VariantTag::LinearTransform => "linear",
            VariantTag::CycleMoving => "cycle",
            VariantTag::Thom => "thom",
        }
    }
}

impl std::fmt::Display for VariantTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognised variant names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown variant '{0}'")]
pub struct ParseVariantError(pub String);

impl std::str::FromStr for VariantTag {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(VariantTag::Basic),
            "hard" => Ok(VariantTag::Hard),
            "linear" | "linear_transform" => Ok(VariantTag::LinearTransform),
            "cycle" | "cycle_moving" => Ok(VariantTag::CycleMoving),
            "thom" => Ok(VariantTag::Thom),
            other => Err(ParseVariantError(other.to_string())),
        }
    }
}

/// Winner of a finished game. Only the host can win; there are no draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The host reached a terminal configuration.
    Host,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Host => f.write_str("host"),
        }
    }
}

/// Rule variant trait.
///
/// Implementations are stateless, so one instance can be shared by any
/// number of episodes across threads.
///
/// ## Implementation Notes
///
/// - `transform` must reject terminal states with `InvalidState`
/// - `transform` must be deterministic
/// - `prepare` normalises the initial state (identity by default)
pub trait RuleVariant: Send + Sync {
    /// Tag identifying this variant.
    fn tag(&self) -> VariantTag;

    /// Check the host's subset: `|I| >= 2`, every index in `1..=dimension`.
    fn validate_host_choice(&self, state: &PointSet, subset: &HostSubset) -> Result<(), GameError> {
        check_host_subset(state, subset)
    }

    /// Check the agent's axis: `axis` must belong to `subset`.
    fn validate_agent_choice(
        &self,
        _state: &PointSet,
        subset: &HostSubset,
        axis: usize,
    ) -> Result<(), GameError> {
        check_agent_axis(subset, axis)
    }

    /// Apply the move `(subset, axis)` to `state`.
    fn transform(&self, state: &PointSet, subset: &HostSubset, axis: usize) -> Result<PointSet, GameError>;

    /// Is `state` terminal under this variant?
    fn is_terminal(&self, state: &PointSet) -> bool;

    /// Winner of a terminal state, `None` while the game continues.
    fn winner(&self, state: &PointSet) -> Option<Winner> {
        self.is_terminal(state).then_some(Winner::Host)
    }

    /// Normalise an initial state before play starts.
    fn prepare(&self, state: &PointSet) -> PointSet {
        state.clone()
    }
}

/// Shared host-subset check.
pub fn check_host_subset(state: &PointSet, subset: &HostSubset) -> Result<(), GameError> {
    if subset.len() < 2 {
        return Err(GameError::invalid_move(format!(
            "host subset {} has fewer than 2 coordinates",
            subset
        )));
    }
    let dimension = state.dimension();
    if let Some(bad) = subset.iter().find(|&k| k == 0 || k > dimension) {
        return Err(GameError::invalid_move(format!(
            "coordinate {} outside 1..={}",
            bad, dimension
        )));
    }
    Ok(())
}

/// Shared agent-axis check.
pub fn check_agent_axis(subset: &HostSubset, axis: usize) -> Result<(), GameError> {
    if subset.contains(axis) {
        Ok(())
    } else {
        Err(GameError::invalid_move(format!(
            "agent axis {} not in host subset {}",
            axis, subset
        )))
    }
}

/// Reject transforms on finished games.
pub fn ensure_running<R: RuleVariant + ?Sized>(rules: &R, state: &PointSet) -> Result<(), GameError> {
    if rules.is_terminal(state) {
        Err(GameError::InvalidState(format!(
            "{} game already terminal at {}",
            rules.tag(),
            state
        )))
    } else {
        Ok(())
    }
}
