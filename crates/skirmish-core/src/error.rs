//! Errors that abort a match.
//!
//! Bot misbehaviour never shows up here: a malfunctioning bot is destroyed
//! inside the round (see [`Malfunction`](crate::decision::Malfunction)) and the
//! round carries on. These types cover what the driver itself cannot recover
//! from.

use battlefield::BattlefieldError;
use thiserror::Error;

/// Settings or entrants that make a match impossible to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("battlefield must have at least one place, got {width}x{height}")]
    EmptyBattlefield {
        /// Configured width
        width: u32,
        /// Configured height
        height: u32,
    },

    /// The battlefield has more places than the grid supports.
    #[error("battlefield {width}x{height} exceeds {max} places", max = battlefield::MAX_CELLS)]
    BattlefieldTooLarge {
        /// Configured width
        width: u32,
        /// Configured height
        height: u32,
    },

    /// `max_health` is zero, so every combatant would start destroyed.
    #[error("combatants need positive health")]
    ZeroHealth,

    /// `max_rounds` is zero.
    #[error("a match needs at least one round")]
    ZeroRounds,

    /// `max_turns` is zero.
    #[error("a round needs at least one turn")]
    ZeroTurns,

    /// `rules.attack_range` is zero.
    #[error("attack range must be positive")]
    ZeroAttackRange,

    /// `decision_budget` is zero.
    #[error("decision budget must be positive")]
    ZeroDecisionBudget,

    /// The match was created without bots.
    #[error("a match needs at least one entrant")]
    NoEntrants,
}

/// Fatal failure of a match.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// The match could not be configured.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A round could not be set up, typically because the combatants do not
    /// fit on the battlefield. No turn of that round was played.
    #[error("round {round} could not be set up")]
    Setup {
        /// Number of the round that failed
        round: u32,
        /// What the battlefield rejected
        #[source]
        source: BattlefieldError,
    },

    /// [`Round::run`](crate::round::Round::run) was called on a round that
    /// had already started.
    #[error("round {round} has already been played")]
    RoundAlreadyPlayed {
        /// Number of the round
        round: u32,
    },

    /// The match was cancelled. Rounds finished before cancellation are kept.
    #[error("match cancelled after {completed_rounds} completed rounds")]
    Cancelled {
        /// Rounds that finished and were recorded
        completed_rounds: u32,
    },
}
