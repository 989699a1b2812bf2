//! Rounds: one battlefield, one set of combatants, turns until an end
//! condition.
//!
//! # Lifecycle
//!
//! ```text
//! Initializing ──run──► Running(turn 1..=max_turns) ──► Concluded
//! ```
//!
//! - **Initializing**: [`Round::new`] allocates the battlefield, enlists one
//!   combatant per entrant with full vitals and scatters them at random.
//! - **Running**: turns are played until the turn limit is reached or at
//!   most one combatant is still alive.
//! - **Concluded**: every combatant, destroyed or not, contributes one
//!   [`Score`] to the [`RoundResult`].
//!
//! # Determinism
//!
//! Placement comes from a `ChaCha8Rng` seeded with the master seed and the
//! round number, so the same seed reproduces the same placements.

use std::sync::Arc;

use battlefield::Battlefield;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::cancel::CancelToken;
use crate::combatant::Vitals;
use crate::decision::{BotLogic, DecisionPolicy};
use crate::error::ArenaError;
use crate::observer::Observers;
use crate::pacing::{next_turn_delay, Pacer};
use crate::resolve::ActionResolver;
use crate::settings::Settings;
use crate::turn::Turn;

// =============================================================================
// Results
// =============================================================================

/// Kills and deaths of one combatant in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Name of the bot
    pub bot_name: String,
    /// Combatants it destroyed
    pub kills: u32,
    /// Times it was destroyed
    pub deaths: u32,
}

/// Outcome of a concluded round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number, starting at 1
    pub number: u32,
    /// Turns actually played
    pub turns_played: u32,
    /// One score per combatant, in acting order
    pub scores: Vec<Score>,
    /// Names of the combatants still alive at the end
    pub survivors: Vec<String>,
}

impl RoundResult {
    /// The sole survivor, if the round ended with exactly one.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        match self.survivors.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Scores ordered by kills, most first. Ties keep acting order.
    #[must_use]
    pub fn standings(&self) -> Vec<&Score> {
        let mut ranked: Vec<&Score> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.kills.cmp(&a.kills));
        ranked
    }
}

// =============================================================================
// Round
// =============================================================================

/// Where a round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Set up, no turn played yet.
    Initializing,
    /// Turns are being played.
    Running,
    /// Finished; scores are final.
    Concluded,
}

/// Driver-side collaborators a round needs while running.
pub struct RoundDriver<'a> {
    /// Match settings
    pub settings: &'a Settings,
    /// Observers to notify
    pub observers: &'a mut Observers,
    /// Inter-turn waits
    pub pacer: &'a dyn Pacer,
    /// Checked before every turn
    pub cancel: &'a CancelToken,
}

/// One round of a match.
#[derive(Debug)]
pub struct Round {
    number: u32,
    max_turns: u32,
    arena: Arena,
    turn: Option<Turn>,
    turns_played: u32,
    state: RoundState,
}

impl Round {
    /// Sets up round `number` for `entrants`.
    ///
    /// # Errors
    ///
    /// [`ArenaError::Setup`] if the battlefield cannot be created or the
    /// combatants do not fit on it.
    pub fn new(
        number: u32,
        settings: &Settings,
        entrants: &[Arc<dyn BotLogic>],
    ) -> Result<Self, ArenaError> {
        let setup = |source| ArenaError::Setup {
            round: number,
            source,
        };

        let battlefield = Battlefield::new(settings.battlefield_width, settings.battlefield_height)
            .map_err(setup)?;
        let mut arena = Arena::new(battlefield);
        let vitals = Vitals::full(settings.max_health, settings.max_shield, settings.max_energy);
        for logic in entrants {
            arena.enlist(Arc::clone(logic), vitals);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(round_seed(settings.seed, number));
        arena.scatter(&mut rng).map_err(setup)?;

        Ok(Self {
            number,
            max_turns: settings.max_turns,
            arena,
            turn: None,
            turns_played: 0,
            state: RoundState::Initializing,
        })
    }

    /// Round number, starting at 1.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Turn limit of this round.
    #[must_use]
    pub const fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Combatants and battlefield.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The most recently played turn.
    #[must_use]
    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    /// Turns played so far.
    #[must_use]
    pub const fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RoundState {
        self.state
    }

    /// Plays the round to its end. A round can be run only once.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::RoundAlreadyPlayed`] if the round has left
    ///   [`RoundState::Initializing`]. Nothing is played or notified.
    /// - [`ArenaError::Cancelled`] if the cancel token is set before a turn.
    ///   The round is then left unfinished and produces no result.
    pub fn run(&mut self, driver: RoundDriver<'_>) -> Result<RoundResult, ArenaError> {
        if self.state != RoundState::Initializing {
            return Err(ArenaError::RoundAlreadyPlayed { round: self.number });
        }
        let RoundDriver {
            settings,
            observers,
            pacer,
            cancel,
        } = driver;
        let span = tracing::info_span!("round", number = self.number);
        let _guard = span.enter();

        let resolver = ActionResolver::new(settings.rules);
        let policy = DecisionPolicy::from(settings);

        self.state = RoundState::Running;
        tracing::info!(combatants = self.arena.len(), "round starting");
        observers.notify(|o| o.on_round_starting(self));

        for number in 1..=self.max_turns {
            if cancel.is_cancelled() {
                tracing::info!(turn = number, "round cancelled");
                return Err(ArenaError::Cancelled {
                    completed_rounds: self.number.saturating_sub(1),
                });
            }

            observers.notify(|o| o.on_turn_starting(self, number));
            let mut turn = Turn::new(number);
            turn.run(&mut self.arena, &resolver, policy);
            self.turns_played = number;
            self.turn = Some(turn);
            if let Some(turn) = &self.turn {
                observers.notify(|o| o.on_turn_finished(self, turn));
            }

            let living = self.arena.living_count();
            if living <= 1 {
                tracing::info!(turn = number, living, "round decided");
                break;
            }
            if number < self.max_turns {
                pacer.pause(next_turn_delay(settings.next_turn_delay, living));
            }
        }

        self.state = RoundState::Concluded;
        let result = self.result();
        tracing::info!(
            turns = result.turns_played,
            winner = result.winner().unwrap_or("none"),
            "round finished"
        );
        observers.notify(|o| o.on_round_finished(self, &result));
        Ok(result)
    }

    /// Scores of every combatant as they stand now.
    #[must_use]
    pub fn result(&self) -> RoundResult {
        RoundResult {
            number: self.number,
            turns_played: self.turns_played,
            scores: self
                .arena
                .combatants()
                .map(|c| Score {
                    bot_name: c.name().to_owned(),
                    kills: c.kills,
                    deaths: c.deaths,
                })
                .collect(),
            survivors: self
                .arena
                .combatants()
                .filter(|c| c.is_alive())
                .map(|c| c.name().to_owned())
                .collect(),
        }
    }
}

/// Per-round seed derived from the master seed.
fn round_seed(master: u64, round: u32) -> u64 {
    master ^ u64::from(round).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
