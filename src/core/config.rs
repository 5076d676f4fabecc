//! Episode configuration.

use serde::{Deserialize, Serialize};

/// Configuration for an episode controller.
///
/// ```
/// use hironaka_engine::core::EpisodeConfig;
///
/// let config = EpisodeConfig::default()
///     .with_turn_cost(-0.5)
///     .with_max_turns(200);
/// assert_eq!(config.max_turns, Some(200));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Reward charged for every completed turn that leaves the game running.
    pub turn_cost: f64,

    /// Truncate the episode after this many turns (`None` = unlimited).
    pub max_turns: Option<u32>,

    /// Truncate the episode once any coordinate reaches this value.
    pub value_threshold: Option<i64>,

    /// Translate each new state so every coordinate's minimum is zero.
    pub reposition: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            turn_cost: -1.0,
            max_turns: None,
            value_threshold: None,
            reposition: false,
        }
    }
}

impl EpisodeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-turn reward.
    #[must_use]
    pub fn with_turn_cost(mut self, cost: f64) -> Self {
        self.turn_cost = cost;
        self
    }

    /// Set the turn limit.
    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    /// Set the coordinate value threshold.
    #[must_use]
    pub fn with_value_threshold(mut self, threshold: i64) -> Self {
        self.value_threshold = Some(threshold);
        self
    }

    /// Enable repositioning after each transform.
    #[must_use]
    pub fn with_reposition(mut self, reposition: bool) -> Self {
        self.reposition = reposition;
        self
    }

    /// True once `turn_count` has hit the turn limit.
    #[must_use]
    pub fn turns_exhausted(&self, turn_count: u32) -> bool {
        self.max_turns.is_some_and(|max| turn_count >= max)
    }

    /// True once `max_value` has hit the value threshold.
    #[must_use]
    pub fn exceeds_threshold(&self, max_value: i64) -> bool {
        self.value_threshold.is_some_and(|t| max_value >= t)
    }
}
