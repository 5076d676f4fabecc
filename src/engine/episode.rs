//! Resettable episodic interface over the turn engine.
//!
//! `EpisodeController` is what training code talks to: `reset` starts a new
//! game, `step` plays one full host+agent turn and reports an observation,
//! a reward, a terminal flag and an info record.
//!
//! ## Reward
//!
//! Every completed turn that leaves the game running costs
//! `EpisodeConfig::turn_cost` (default `-1`). The turn that ends the game
//! earns `0`. No terminal bonus is added.
//!
//! ## Truncation
//!
//! `max_turns` and `value_threshold` cut an episode short without making it
//! terminal: `info.truncated` is set and later steps fail with
//! `EpisodeFinished`.

use serde::{Deserialize, Serialize};

use super::turn::TurnEngine;
use crate::core::{EpisodeConfig, GameError, GameRng, HostSubset, PointSet};
use crate::rules::{VariantRegistry, VariantTag, Winner};

/// What the caller sees of the current state.
///
/// Points are listed in ascending lexicographic order, which is stable for
/// a given state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Current points.
    pub points: Vec<Vec<i64>>,

    /// Governing variant.
    pub variant: VariantTag,

    /// Episode dimension.
    pub dimension: usize,
}

impl Observation {
    fn of(state: &PointSet, variant: VariantTag) -> Self {
        Self {
            points: state.to_vecs(),
            variant,
            dimension: state.dimension(),
        }
    }
}

/// Extra data reported with each step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Completed turns so far.
    pub turn_count: u32,

    /// Winner once the game is over.
    pub winner: Option<Winner>,

    /// The episode was cut short by a turn or value limit.
    pub truncated: bool,
}

/// Result of one `step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub terminal: bool,
    pub info: StepInfo,
}

#[derive(Clone, Debug)]
struct Episode {
    engine: TurnEngine,
    turn_count: u32,
    truncated: bool,
}

/// Resettable game episodes.
///
/// ## Example
///
/// ```
/// use hironaka_engine::engine::EpisodeController;
/// use hironaka_engine::core::{EpisodeConfig, HostSubset};
/// use hironaka_engine::rules::VariantTag;
///
/// let mut env = EpisodeController::new(EpisodeConfig::default());
/// env.reset(2, vec![vec![0, 0], vec![1, 0], vec![0, 1]], VariantTag::Basic).unwrap();
///
/// let result = env.step(&HostSubset::from([1, 2]), 1).unwrap();
/// assert_eq!(result.observation.points, vec![vec![0, 0], vec![1, 0], vec![1, 1]]);
/// assert_eq!(result.reward, -1.0);
/// assert!(!result.terminal);
/// assert_eq!(result.info.turn_count, 1);
/// ```
#[derive(Clone, Debug)]
pub struct EpisodeController {
    config: EpisodeConfig,
    registry: VariantRegistry,
    episode: Option<Episode>,
}

impl EpisodeController {
    /// Controller over the standard variants.
    #[must_use]
    pub fn new(config: EpisodeConfig) -> Self {
        Self::with_registry(config, VariantRegistry::standard())
    }

    /// Controller over a custom set of variants.
    #[must_use]
    pub fn with_registry(config: EpisodeConfig, registry: VariantRegistry) -> Self {
        Self {
            config,
            registry,
            episode: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Registered variants.
    #[must_use]
    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for registering cycle or Thom rules.
    pub fn registry_mut(&mut self) -> &mut VariantRegistry {
        &mut self.registry
    }

    // === Episode lifecycle ===

    /// Start a new episode from explicit points.
    ///
    /// The rules' `prepare` step runs first (vertex reduction for the
    /// reducing variants). A failed reset keeps the previous episode.
    pub fn reset<I, P>(&mut self, dimension: usize, points: I, variant: VariantTag) -> Result<Observation, GameError>
    where
        I: IntoIterator<Item = P>,
        P: Into<crate::core::Point>,
    {
        let state = PointSet::new(dimension, points)?;
        self.reset_with_state(state, variant)
    }

    /// Start a new episode from random points.
    pub fn reset_random(
        &mut self,
        rng: &mut GameRng,
        num_points: usize,
        dimension: usize,
        max_value: i64,
        variant: VariantTag,
    ) -> Result<Observation, GameError> {
        let state = PointSet::random(rng, num_points, dimension, max_value)?;
        self.reset_with_state(state, variant)
    }

    /// Start a new episode from an existing point set.
    pub fn reset_with_state(&mut self, state: PointSet, variant: VariantTag) -> Result<Observation, GameError> {
        let rules = self.registry.get(variant)?;
        let mut state = rules.prepare(&state);
        if self.config.reposition {
            state = state.reposition();
        }

        let engine = TurnEngine::new(rules, state);
        log::debug!(
            "reset {} episode: {} points in dimension {}{}",
            variant,
            engine.state().cardinality(),
            engine.state().dimension(),
            if engine.is_terminal() { ", already terminal" } else { "" }
        );

        let observation = Observation::of(engine.state(), variant);
        self.episode = Some(Episode {
            engine,
            turn_count: 0,
            truncated: false,
        });
        Ok(observation)
    }

    /// Play one turn: host subset, then agent axis.
    ///
    /// On error nothing changes: state, phase and turn count stay as they
    /// were.
    pub fn step(&mut self, subset: &HostSubset, axis: usize) -> Result<StepResult, GameError> {
        let config = &self.config;
        let episode = self.episode.as_mut().ok_or(GameError::NoActiveEpisode)?;
        if episode.truncated {
            return Err(GameError::EpisodeFinished);
        }

        let terminal = episode.engine.play_turn(subset, axis)?;
        if config.reposition && !terminal {
            episode.engine.reposition();
        }
        // Reposition may itself reveal a terminal state under custom predicates.
        let terminal = episode.engine.is_terminal();

        episode.turn_count += 1;
        let reward = if terminal { 0.0 } else { config.turn_cost };

        let state = episode.engine.state();
        let truncated = !terminal
            && (config.turns_exhausted(episode.turn_count) || config.exceeds_threshold(state.max_value()));
        if truncated {
            log::debug!("episode truncated after {} turns", episode.turn_count);
        }
        episode.truncated = truncated;

        Ok(StepResult {
            observation: Observation::of(state, episode.engine.variant()),
            reward,
            terminal,
            info: StepInfo {
                turn_count: episode.turn_count,
                winner: episode.engine.winner(),
                truncated,
            },
        })
    }

    // === Queries ===

    /// Observation of the current state.
    pub fn observation(&self) -> Result<Observation, GameError> {
        let episode = self.episode.as_ref().ok_or(GameError::NoActiveEpisode)?;
        Ok(Observation::of(episode.engine.state(), episode.engine.variant()))
    }

    /// Current state, if an episode is active.
    #[must_use]
    pub fn state(&self) -> Option<&PointSet> {
        self.episode.as_ref().map(|e| e.engine.state())
    }

    /// Underlying turn engine, if an episode is active.
    #[must_use]
    pub fn engine(&self) -> Option<&TurnEngine> {
        self.episode.as_ref().map(|e| &e.engine)
    }

    /// Completed turns in the current episode.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.episode.as_ref().map_or(0, |e| e.turn_count)
    }

    /// Is the current episode terminal?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.episode.as_ref().is_some_and(|e| e.engine.is_terminal())
    }

    /// Is the current episode over, by terminal state or truncation?
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.episode
            .as_ref()
            .is_some_and(|e| e.truncated || e.engine.is_terminal())
    }
}
