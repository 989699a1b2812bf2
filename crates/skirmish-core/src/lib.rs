//! # Skirmish Core
//!
//! Engine for turn-based battles between independently written bots.
//!
//! Bots are untrusted decision logic ([`BotLogic`]). Each turn, every living
//! bot is shown itself, its living enemies and the battlefield, and picks one
//! [`Action`]. The engine resolves the action against shared state and
//! records a narrative outcome.
//!
//! ## Architecture
//!
//! - **Match**: plays a fixed number of rounds and notifies observers.
//! - **Round**: fresh battlefield and combatants; turns until the turn limit
//!   or until at most one combatant survives; one score per combatant.
//! - **Turn**: every combatant acts once, in id order.
//! - **Resolution**: applies a decision to the arena; never fails, only
//!   describes.
//! - **Decision**: runs bot logic on an isolated worker under a time budget;
//!   timeouts, errors and panics become malfunctions that destroy the bot.
//!
//! Only decision computation may run concurrently. Every mutation of
//! occupancy and vitals happens serially on the driver thread.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use skirmish_core::{Action, BotLogic, FnBot, Match, Settings};
//!
//! let hunter: Arc<dyn BotLogic> = Arc::new(FnBot::new("Hunter", |me, enemies, _| {
//!     let Some(target) = enemies.first() else { return Ok(Some(Action::Idle)) };
//!     Ok(Some(match (me.place, target.place) {
//!         (Some(here), Some(there)) if here.distance_to(there) <= 5.0 => Action::Attack(target.id),
//!         (_, Some(there)) => Action::MoveTowards(there),
//!         _ => Action::Idle,
//!     }))
//! }));
//! let sitter: Arc<dyn BotLogic> = Arc::new(FnBot::new("Sitter", |_, _, _| Ok(Some(Action::RechargeShield))));
//!
//! let settings = Settings::headless().with_rounds(1).with_turns(200).with_seed(42);
//! let report = Match::new(settings, vec![hunter, sitter]).unwrap().run().unwrap();
//! assert_eq!(report.rounds[0].scores.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod arena;
pub mod cancel;
pub mod combatant;
pub mod decision;
pub mod error;
pub mod matches;
pub mod observer;
pub mod pacing;
pub mod resolve;
pub mod round;
pub mod settings;
pub mod standings;
pub mod turn;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use action::Action;
pub use arena::{Arena, Casualty};
pub use cancel::CancelToken;
pub use combatant::{Cause, Combatant, CombatantId, EnemyView, SelfView, Vitals};
pub use decision::{BotLogic, FnBot, Malfunction};
pub use error::{ArenaError, ConfigError};
pub use matches::{Match, MatchReport};
pub use observer::ArenaObserver;
pub use round::{Round, RoundResult, Score};
pub use settings::{ActionRules, DecisionScheduling, Settings};
pub use standings::Standings;
pub use turn::Turn;

pub use battlefield;
