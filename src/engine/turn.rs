//! Two-phase turn state machine.
//!
//! A turn alternates between the host and the agent:
//!
//! ```text
//! AwaitingHostMove --submit_host_subset(I)--> AwaitingAgentMove
//! AwaitingAgentMove --submit_agent_index(i)--> AwaitingHostMove | Terminal
//! ```
//!
//! `Terminal` is absorbing. A rejected submission leaves the phase and the
//! state exactly as they were.

use std::sync::Arc;

use crate::core::{GameError, HostSubset, PointSet};
use crate::rules::{RuleVariant, VariantTag, Winner};

/// Where the turn currently stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the host's subset.
    AwaitingHostMove,
    /// The host chose `subset`; waiting for the agent's axis.
    AwaitingAgentMove { subset: HostSubset },
    /// The game is over.
    Terminal,
}

impl Phase {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingHostMove => "awaiting-host",
            Phase::AwaitingAgentMove { .. } => "awaiting-agent",
            Phase::Terminal => "terminal",
        }
    }
}

/// Drives one game through its turns.
///
/// Owns the current state exclusively. The rules are shared and stateless.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use hironaka_engine::core::{HostSubset, PointSet};
/// use hironaka_engine::engine::{Phase, TurnEngine};
/// use hironaka_engine::rules::PolyhedralRules;
///
/// let state = PointSet::new(2, vec![vec![2, 0], vec![0, 2]]).unwrap();
/// let mut engine = TurnEngine::new(Arc::new(PolyhedralRules::basic()), state);
///
/// engine.submit_host_subset(HostSubset::from([1, 2])).unwrap();
/// assert!(matches!(engine.phase(), Phase::AwaitingAgentMove { .. }));
///
/// let terminal = engine.submit_agent_index(1).unwrap();
/// assert!(!terminal);
/// assert_eq!(engine.state().to_vecs(), vec![vec![2, 0], vec![2, 2]]);
/// ```
#[derive(Clone)]
pub struct TurnEngine {
    rules: Arc<dyn RuleVariant>,
    state: PointSet,
    phase: Phase,
}

impl TurnEngine {
    /// Start a game at `state`. Starts in `Terminal` if `state` already is.
    pub fn new(rules: Arc<dyn RuleVariant>, state: PointSet) -> Self {
        let phase = if rules.is_terminal(&state) {
            Phase::Terminal
        } else {
            Phase::AwaitingHostMove
        };
        Self { rules, state, phase }
    }

    // === Queries ===

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &PointSet {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Tag of the governing rules.
    #[must_use]
    pub fn variant(&self) -> VariantTag {
        self.rules.tag()
    }

    /// Has the game ended?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Winner, once the game has ended.
    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        if self.is_terminal() {
            self.rules.winner(&self.state)
        } else {
            None
        }
    }

    // === Transitions ===

    /// Host phase: validate and record the subset.
    pub fn submit_host_subset(&mut self, subset: HostSubset) -> Result<(), GameError> {
        match &self.phase {
            Phase::Terminal => Err(GameError::EpisodeFinished),
            Phase::AwaitingAgentMove { .. } => Err(GameError::OutOfTurn {
                expected: "agent index",
            }),
            Phase::AwaitingHostMove => {
                self.rules.validate_host_choice(&self.state, &subset)?;
                log::trace!("host chose {}", subset);
                self.phase = Phase::AwaitingAgentMove { subset };
                Ok(())
            }
        }
    }

    /// Agent phase: validate the axis, apply the move and check for the end.
    ///
    /// Returns `true` if the game is now over.
    pub fn submit_agent_index(&mut self, axis: usize) -> Result<bool, GameError> {
        let subset = match &self.phase {
            Phase::Terminal => return Err(GameError::EpisodeFinished),
            Phase::AwaitingHostMove => {
                return Err(GameError::OutOfTurn {
                    expected: "host subset",
                })
            }
            Phase::AwaitingAgentMove { subset } => subset.clone(),
        };

        self.rules.validate_agent_choice(&self.state, &subset, axis)?;
        let next = self.rules.transform(&self.state, &subset, axis)?;
        Ok(self.commit(next, &subset, axis))
    }

    /// Play a whole turn at once.
    ///
    /// Both choices are validated before anything changes, so a rejected
    /// agent axis does not leave the engine waiting on the agent.
    pub fn play_turn(&mut self, subset: &HostSubset, axis: usize) -> Result<bool, GameError> {
        match &self.phase {
            Phase::Terminal => return Err(GameError::EpisodeFinished),
            Phase::AwaitingAgentMove { .. } => {
                return Err(GameError::OutOfTurn {
                    expected: "agent index",
                })
            }
            Phase::AwaitingHostMove => {}
        }

        self.rules.validate_host_choice(&self.state, subset)?;
        self.rules.validate_agent_choice(&self.state, subset, axis)?;
        let next = self.rules.transform(&self.state, subset, axis)?;
        Ok(self.commit(next, subset, axis))
    }

    /// Translate the current state so each coordinate's minimum is zero.
    pub fn reposition(&mut self) {
        self.state = self.state.reposition();
        if self.phase == Phase::AwaitingHostMove && self.rules.is_terminal(&self.state) {
            self.phase = Phase::Terminal;
        }
    }

    fn commit(&mut self, next: PointSet, subset: &HostSubset, axis: usize) -> bool {
        let terminal = self.rules.is_terminal(&next);
        log::debug!(
            "{} move {} -> {}: {} -> {} points{}",
            self.rules.tag(),
            subset,
            axis,
            self.state.cardinality(),
            next.cardinality(),
            if terminal { ", terminal" } else { "" }
        );
        self.state = next;
        self.phase = if terminal {
            Phase::Terminal
        } else {
            Phase::AwaitingHostMove
        };
        terminal
    }
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("variant", &self.rules.tag())
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish()
    }
}
