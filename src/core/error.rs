//! Engine errors.
//!
//! Every failure is reported synchronously to the caller of `reset`/`step`
//! and leaves the episode at its last valid state.

use thiserror::Error;

use crate::rules::VariantTag;

/// Errors raised by the game engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// A point's length does not match the episode dimension.
    #[error("point {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A point set was constructed from no points.
    #[error("point set must contain at least one point")]
    EmptyState,

    /// The dimension admits no host move (fewer than two coordinates), or
    /// is too large to enumerate host subsets.
    #[error("dimension {0} is not supported")]
    UnsupportedDimension(usize),

    /// Host subset or agent index violates the move rules.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// A transform was requested on a terminal state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A move was submitted after the episode ended.
    #[error("episode has finished")]
    EpisodeFinished,

    /// A move was submitted in the wrong phase of the turn.
    #[error("out of turn: expected {expected}")]
    OutOfTurn { expected: &'static str },

    /// A coordinate sum no longer fits in `i64`.
    #[error("coordinate overflow while summing axis {axis}")]
    CoordinateOverflow { axis: usize },

    /// No rules are registered for the requested variant.
    #[error("no rules registered for variant {0}")]
    UnsupportedVariant(VariantTag),

    /// `step` was called before `reset`.
    #[error("no active episode, call reset first")]
    NoActiveEpisode,

    /// A policy network failed to produce scores.
    #[error("policy network failed: {0}")]
    Policy(String),
}

impl GameError {
    pub(crate) fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::DimensionMismatch {
            index: 2,
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "point 2 has 2 coordinates, expected 3");

        let err = GameError::invalid_move("subset too small");
        assert_eq!(err.to_string(), "invalid move: subset too small");

        let err = GameError::Policy("callback raised".into());
        assert_eq!(err.to_string(), "policy network failed: callback raised");

        let err = GameError::UnsupportedVariant(VariantTag::Thom);
        assert_eq!(err.to_string(), "no rules registered for variant thom");
    }
}
