//! Matches: a fixed number of rounds between the same entrants.
//!
//! A [`Match`] owns the settings, the entrants' decision logic, the observer
//! registry and the pacer. Rounds are played one after another; each starts
//! from a fresh battlefield with fresh combatants, so nothing carries over
//! between rounds except what observers choose to accumulate.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use skirmish_core::action::Action;
//! use skirmish_core::decision::{BotLogic, FnBot};
//! use skirmish_core::matches::Match;
//! use skirmish_core::settings::Settings;
//!
//! let idle: Arc<dyn BotLogic> = Arc::new(FnBot::new("Idler", |_, _, _| Ok(Some(Action::Idle))));
//! let rest: Arc<dyn BotLogic> = Arc::new(FnBot::new("Rester", |_, _, _| Ok(Some(Action::RechargeBattery))));
//!
//! let settings = Settings::headless().with_rounds(2).with_turns(5);
//! let mut arena_match = Match::new(settings, vec![idle, rest]).unwrap();
//! let report = arena_match.run().unwrap();
//!
//! assert_eq!(report.rounds.len(), 2);
//! assert!(report.rounds.iter().all(|r| r.turns_played == 5 && r.scores.len() == 2));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::decision::BotLogic;
use crate::error::{ArenaError, ConfigError};
use crate::observer::{ArenaObserver, Observers};
use crate::pacing::{NoPacing, Pacer, SleepPacer};
use crate::round::{Round, RoundDriver, RoundResult};
use crate::settings::Settings;

/// Results of every round of a finished match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// One result per round, in order
    pub rounds: Vec<RoundResult>,
}

impl MatchReport {
    /// Winner of each round, `None` for rounds without a sole survivor.
    #[must_use]
    pub fn winners(&self) -> Vec<Option<&str>> {
        self.rounds.iter().map(RoundResult::winner).collect()
    }
}

/// A configured match, ready to run.
pub struct Match {
    settings: Settings,
    entrants: Vec<Arc<dyn BotLogic>>,
    observers: Observers,
    pacer: Box<dyn Pacer>,
    cancel: CancelToken,
    results: Vec<RoundResult>,
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.entrants.iter().map(|e| e.name()).collect();
        f.debug_struct("Match")
            .field("settings", &self.settings)
            .field("entrants", &names)
            .field("observers", &self.observers)
            .field("cancel", &self.cancel)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

impl Match {
    /// Creates a match between `entrants`.
    ///
    /// Pacing follows the settings: sleeping if any delay is configured, none
    /// otherwise.
    ///
    /// # Errors
    ///
    /// [`ArenaError::Config`] if the settings are invalid or there are no
    /// entrants.
    pub fn new(settings: Settings, entrants: Vec<Arc<dyn BotLogic>>) -> Result<Self, ArenaError> {
        settings.validate()?;
        if entrants.is_empty() {
            return Err(ConfigError::NoEntrants.into());
        }

        let pacer: Box<dyn Pacer> =
            if settings.next_round_delay.is_zero() && settings.next_turn_delay.is_zero() {
                Box::new(NoPacing)
            } else {
                Box::new(SleepPacer)
            };

        Ok(Self {
            settings,
            entrants,
            observers: Observers::new(),
            pacer,
            cancel: CancelToken::new(),
            results: Vec::new(),
        })
    }

    /// Registers an observer, called after those registered before it.
    #[must_use]
    pub fn with_observer(mut self, observer: impl ArenaObserver + Send + 'static) -> Self {
        self.observers.register(observer);
        self
    }

    /// Replaces the pacer.
    #[must_use]
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    /// A handle that cancels this match from anywhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The settings in force.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Results of the rounds completed by the latest [`run`](Self::run),
    /// including a run that was cancelled.
    #[must_use]
    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    /// Plays every round.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Setup`] if a round cannot be set up. No turn of that
    ///   round is played.
    /// - [`ArenaError::Cancelled`] if the cancel token is set. Rounds finished
    ///   before that remain available through [`results`](Self::results).
    pub fn run(&mut self) -> Result<MatchReport, ArenaError> {
        self.results.clear();
        let settings = &self.settings;
        tracing::info!(
            rounds = settings.max_rounds,
            entrants = self.entrants.len(),
            "match starting"
        );
        self.observers.notify(|o| o.on_match_starting(settings));

        for number in 1..=settings.max_rounds {
            if self.cancel.is_cancelled() {
                return Err(self.cancelled());
            }

            let mut round = Round::new(number, settings, &self.entrants)?;
            let outcome = round.run(RoundDriver {
                settings,
                observers: &mut self.observers,
                pacer: self.pacer.as_ref(),
                cancel: &self.cancel,
            });
            match outcome {
                Ok(result) => self.results.push(result),
                Err(ArenaError::Cancelled { .. }) => return Err(self.cancelled()),
                Err(err) => return Err(err),
            }

            if number < settings.max_rounds {
                self.pacer.pause(settings.next_round_delay);
            }
        }

        let report = MatchReport {
            rounds: self.results.clone(),
        };
        tracing::info!(rounds = report.rounds.len(), "match finished");
        self.observers.notify(|o| o.on_match_finished(&report));
        Ok(report)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cancelled(&self) -> ArenaError {
        let completed_rounds = self.results.len() as u32;
        tracing::info!(completed_rounds, "match cancelled");
        ArenaError::Cancelled { completed_rounds }
    }
}
