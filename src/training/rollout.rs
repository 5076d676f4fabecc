//! Rollout loop for generating training data.
//!
//! Plays episodes between a host policy and an agent policy, each on a
//! fresh `EpisodeController`, and records them as trajectories.

use serde::{Deserialize, Serialize};

use crate::core::{EpisodeConfig, GameError, GameRng, Move};
use crate::engine::EpisodeController;
use crate::players::{AgentPolicy, HostPolicy};
use crate::rules::{VariantRegistry, VariantTag};

use super::trajectory::{Trajectory, Transition};

/// Configuration for rollouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RolloutConfig {
    /// Coordinates per point.
    pub dimension: usize,

    /// Points sampled for each initial state (before deduplication).
    pub num_points: usize,

    /// Coordinates are sampled from `[0, max_value)`.
    pub max_value: i64,

    /// Maximum turns per episode (to prevent endless games).
    pub max_turns: u32,

    /// Variant to play.
    pub variant: VariantTag,

    /// Seed offset for RNG (combined with episode index for unique seeds).
    pub seed_offset: u64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            dimension: 3,
            num_points: 10,
            max_value: 20,
            max_turns: 100,
            variant: VariantTag::LinearTransform,
            seed_offset: 0,
        }
    }
}

impl RolloutConfig {
    /// Create a new rollout config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the number of sampled points.
    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.num_points = num_points;
        self
    }

    /// Set the coordinate bound.
    pub fn with_max_value(mut self, max_value: i64) -> Self {
        self.max_value = max_value;
        self
    }

    /// Set maximum turns per episode.
    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = max;
        self
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant: VariantTag) -> Self {
        self.variant = variant;
        self
    }

    /// Set seed offset.
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }
}

/// Aggregate statistics over a batch of trajectories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RolloutSummary {
    /// Episodes played.
    pub episodes: usize,

    /// Episodes already terminal at reset.
    pub initially_ended: usize,

    /// Episodes that reached a terminal state after at least one turn.
    pub ended: usize,

    /// Turns played across all episodes.
    pub total_turns: usize,

    /// Games in play at reset divided by the turns they took, where a game
    /// that never ended is charged the full turn limit. Higher means a
    /// stronger host; a host that never wins scores `1 / max_turns`.
    pub rho: f64,
}

impl RolloutSummary {
    /// Summarise `trajectories` played with a limit of `max_turns` turns.
    pub fn from_trajectories(trajectories: &[Trajectory], max_turns: u32) -> Self {
        let initially_ended = trajectories.iter().filter(|t| t.ended() && t.is_empty()).count();
        let ended = trajectories.iter().filter(|t| t.ended() && !t.is_empty()).count();
        let total_turns: usize = trajectories.iter().map(Trajectory::len).sum();

        let charged_turns: u64 = trajectories
            .iter()
            .map(|t| if t.ended() { t.len() as u64 } else { u64::from(max_turns) })
            .sum();
        let in_play = trajectories.len() - initially_ended;
        let rho = if charged_turns == 0 {
            0.0
        } else {
            in_play as f64 / charged_turns as f64
        };

        Self {
            episodes: trajectories.len(),
            initially_ended,
            ended,
            total_turns,
            rho,
        }
    }
}

/// Worker for running rollouts.
///
/// Holds the policies and the rule registry. Each episode gets its own
/// controller, so one worker per thread needs no locking.
pub struct RolloutWorker {
    host: Box<dyn HostPolicy>,
    agent: Box<dyn AgentPolicy>,
    registry: VariantRegistry,
    episode_config: EpisodeConfig,
    config: RolloutConfig,
}

impl RolloutWorker {
    /// Create a new rollout worker over the standard variants.
    pub fn new(host: Box<dyn HostPolicy>, agent: Box<dyn AgentPolicy>, config: RolloutConfig) -> Self {
        Self {
            host,
            agent,
            registry: VariantRegistry::standard(),
            episode_config: EpisodeConfig::default(),
            config,
        }
    }

    /// Use a custom rule registry.
    pub fn with_registry(mut self, registry: VariantRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use a custom episode config. Its turn limit is replaced by
    /// `RolloutConfig::max_turns`.
    pub fn with_episode_config(mut self, config: EpisodeConfig) -> Self {
        self.episode_config = config;
        self
    }

    /// Play one episode from the given seed.
    pub fn play_episode(&self, seed: u64) -> Result<Trajectory, GameError> {
        let rng = GameRng::new(seed);
        let mut points_rng = rng.for_context("points");
        let mut host_rng = rng.for_context("host");
        let mut agent_rng = rng.for_context("agent");

        let episode_config = self.episode_config.clone().with_max_turns(self.config.max_turns);
        let mut controller = EpisodeController::with_registry(episode_config, self.registry.clone());
        let mut observation = controller.reset_random(
            &mut points_rng,
            self.config.num_points,
            self.config.dimension,
            self.config.max_value,
            self.config.variant,
        )?;

        let mut trajectory = Trajectory::new(seed, observation.clone(), self.host.name(), self.agent.name());

        while !controller.is_done() {
            let state = controller.state().cloned().ok_or(GameError::NoActiveEpisode)?;
            let subset = self.host.choose_subset(&state, &mut host_rng)?;
            let axis = self.agent.choose_axis(&state, &subset, &mut agent_rng)?;
            let result = match controller.step(&subset, axis) {
                Ok(result) => result,
                Err(GameError::CoordinateOverflow { axis }) => {
                    log::warn!("seed {}: coordinate overflow on axis {}, truncating", seed, axis);
                    break;
                }
                Err(e) => return Err(e),
            };

            trajectory.push(Transition {
                observation,
                action: Move::new(subset, axis),
                reward: result.reward,
                terminal: result.terminal,
                turn: result.info.turn_count,
            });
            observation = result.observation;
        }

        let engine = controller.engine().ok_or(GameError::NoActiveEpisode)?;
        let truncated = !engine.is_terminal();
        trajectory.finish(observation, engine.winner(), truncated);

        log::debug!(
            "seed {}: {} vs {} finished after {} turns (winner: {})",
            seed,
            self.host.name(),
            self.agent.name(),
            trajectory.len(),
            trajectory.winner.map_or("none".to_string(), |w| w.to_string())
        );
        Ok(trajectory)
    }

    /// Play `count` episodes with seeds `seed_offset..seed_offset + count`.
    pub fn play_episodes(&self, count: usize) -> Result<Vec<Trajectory>, GameError> {
        (0..count)
            .map(|i| self.play_episode(self.config.seed_offset.wrapping_add(i as u64)))
            .collect()
    }

    /// Play `count` episodes and summarise them.
    pub fn evaluate(&self, count: usize) -> Result<RolloutSummary, GameError> {
        Ok(RolloutSummary::from_trajectories(
            &self.play_episodes(count)?,
            self.config.max_turns,
        ))
    }

    /// Get the configuration.
    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }
}

impl std::fmt::Debug for RolloutWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolloutWorker")
            .field("host", &self.host.name())
            .field("agent", &self.agent.name())
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
