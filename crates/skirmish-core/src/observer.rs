//! Lifecycle notifications for renderers, recorders and score keepers.
//!
//! Observers are registered on a [`Match`](crate::matches::Match) and called
//! synchronously, in registration order, from the driver thread. They get
//! read-only access to engine state and cannot influence the battle.
//!
//! Every hook has an empty default, so an observer implements only what it
//! cares about.
//!
//! # Example
//!
//! ```
//! use skirmish_core::observer::ArenaObserver;
//! use skirmish_core::round::Round;
//! use skirmish_core::turn::Turn;
//!
//! #[derive(Default)]
//! struct TurnCounter {
//!     turns: u32,
//! }
//!
//! impl ArenaObserver for TurnCounter {
//!     fn on_turn_finished(&mut self, _round: &Round, _turn: &Turn) {
//!         self.turns += 1;
//!     }
//! }
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::matches::MatchReport;
use crate::round::{Round, RoundResult};
use crate::settings::Settings;
use crate::turn::Turn;

/// Receiver of match, round and turn lifecycle events.
#[allow(unused_variables)]
pub trait ArenaObserver {
    /// Before the first round.
    fn on_match_starting(&mut self, settings: &Settings) {}

    /// After the last round, with every round's result.
    fn on_match_finished(&mut self, report: &MatchReport) {}

    /// After the round's combatants are placed, before its first turn.
    fn on_round_starting(&mut self, round: &Round) {}

    /// After the round concluded.
    fn on_round_finished(&mut self, round: &Round, result: &RoundResult) {}

    /// Before turn `number` is played.
    fn on_turn_starting(&mut self, round: &Round, number: u32) {}

    /// After a turn was played. Positions, vitals and last actions in
    /// `round` reflect the end of the turn.
    fn on_turn_finished(&mut self, round: &Round, turn: &Turn) {}
}

/// Shared observers: the caller keeps one handle to read results after the
/// match, the match holds another.
///
/// A poisoned lock is recovered, since observers only accumulate data.
impl<T: ArenaObserver> ArenaObserver for Arc<Mutex<T>> {
    fn on_match_starting(&mut self, settings: &Settings) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_match_starting(settings);
    }

    fn on_match_finished(&mut self, report: &MatchReport) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_match_finished(report);
    }

    fn on_round_starting(&mut self, round: &Round) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_round_starting(round);
    }

    fn on_round_finished(&mut self, round: &Round, result: &RoundResult) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_round_finished(round, result);
    }

    fn on_turn_starting(&mut self, round: &Round, number: u32) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_turn_starting(round, number);
    }

    fn on_turn_finished(&mut self, round: &Round, turn: &Turn) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_turn_finished(round, turn);
    }
}

/// Ordered list of registered observers.
#[derive(Default)]
pub struct Observers {
    list: Vec<Box<dyn ArenaObserver + Send>>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("list", &format!("[{} observers]", self.list.len()))
            .finish()
    }
}

impl Observers {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer; it is called after all earlier ones.
    pub fn register(&mut self, observer: impl ArenaObserver + Send + 'static) {
        self.list.push(Box::new(observer));
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// True if nobody is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Calls `notify` on every observer in registration order.
    pub fn notify(&mut self, mut notify: impl FnMut(&mut dyn ArenaObserver)) {
        for observer in &mut self.list {
            notify(observer.as_mut());
        }
    }
}
