//! Engine configuration.
//!
//! [`Settings`] is everything a match needs besides its entrants. Loading it
//! from disk or a command line belongs to the caller; the struct is plain
//! serde data so any format works.
//!
//! # Example
//!
//! ```
//! use skirmish_core::settings::Settings;
//!
//! let settings = Settings::headless()
//!     .with_battlefield(8, 6)
//!     .with_rounds(3)
//!     .with_turns(50);
//!
//! assert!(settings.validate().is_ok());
//! assert!(settings.next_turn_delay.is_zero());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// =============================================================================
// Action Rules
// =============================================================================

/// Energy costs and effect sizes of the action kinds.
///
/// These belong to the engine, not to bots: a bot chooses *what* to do, the
/// rules decide what it costs and how strong it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRules {
    /// Energy needed for any kind of movement.
    pub move_cost: u32,
    /// Energy needed to attack.
    pub attack_cost: u32,
    /// Farthest distance at which an attack still deals damage.
    pub attack_range: u32,
    /// Damage dealt at point-blank range.
    pub attack_damage: u32,
    /// Energy needed to recharge the battery.
    pub battery_recharge_cost: u32,
    /// Energy gained by recharging the battery.
    pub battery_recharge_amount: u32,
    /// Energy needed for a full shield recharge.
    pub shield_recharge_cost: u32,
    /// Shield gained by a full shield recharge.
    pub shield_recharge_amount: u32,
}

impl Default for ActionRules {
    fn default() -> Self {
        Self {
            move_cost: 1,
            attack_cost: 10,
            attack_range: 5,
            attack_damage: 10,
            battery_recharge_cost: 1,
            battery_recharge_amount: 10,
            shield_recharge_cost: 10,
            shield_recharge_amount: 10,
        }
    }
}

// =============================================================================
// Decision Scheduling
// =============================================================================

/// How the decisions of one turn are computed.
///
/// Application of the resulting actions is always serial, in combatant id
/// order. Only the decision computation differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionScheduling {
    /// Each combatant decides right before it acts, seeing the effects of
    /// every combatant that acted earlier in the turn.
    #[default]
    Sequential,
    /// All living combatants decide in parallel against one snapshot taken at
    /// the start of the turn.
    Concurrent,
}

// =============================================================================
// Settings
// =============================================================================

/// Configuration of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Battlefield width in places.
    pub battlefield_width: u32,
    /// Battlefield height in places.
    pub battlefield_height: u32,
    /// Number of rounds in a match.
    pub max_rounds: u32,
    /// Upper bound on turns per round.
    pub max_turns: u32,
    /// Pause between two rounds.
    pub next_round_delay: Duration,
    /// Pause between two turns when every combatant is alive. Shrinks as
    /// combatants are destroyed.
    pub next_turn_delay: Duration,
    /// Health each combatant starts a round with.
    pub max_health: u32,
    /// Shield capacity; combatants start a round fully shielded.
    pub max_shield: u32,
    /// Energy capacity; combatants start a round fully charged.
    pub max_energy: u32,
    /// Wall-clock time a bot gets to choose its action.
    pub decision_budget: Duration,
    /// How decisions within a turn are computed.
    pub scheduling: DecisionScheduling,
    /// Costs and strengths of the actions.
    pub rules: ActionRules,
    /// Master seed for placement randomness.
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            battlefield_width: 10,
            battlefield_height: 10,
            max_rounds: 10,
            max_turns: 100,
            next_round_delay: Duration::from_secs(2),
            next_turn_delay: Duration::from_millis(500),
            max_health: 100,
            max_shield: 100,
            max_energy: 100,
            decision_budget: Duration::from_secs(1),
            scheduling: DecisionScheduling::Sequential,
            rules: ActionRules::default(),
            seed: 0,
        }
    }
}

impl Settings {
    /// Default settings without any pacing delays, for tests and batch runs.
    #[must_use]
    pub fn headless() -> Self {
        Self {
            next_round_delay: Duration::ZERO,
            next_turn_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Sets the battlefield size.
    #[must_use]
    pub fn with_battlefield(mut self, width: u32, height: u32) -> Self {
        self.battlefield_width = width;
        self.battlefield_height = height;
        self
    }

    /// Sets the number of rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Sets the turn limit per round.
    #[must_use]
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    /// Sets the starting vitals.
    #[must_use]
    pub fn with_vitals(mut self, health: u32, shield: u32, energy: u32) -> Self {
        self.max_health = health;
        self.max_shield = shield;
        self.max_energy = energy;
        self
    }

    /// Sets the per-decision time budget.
    #[must_use]
    pub fn with_decision_budget(mut self, budget: Duration) -> Self {
        self.decision_budget = budget;
        self
    }

    /// Sets the decision scheduling mode.
    #[must_use]
    pub fn with_scheduling(mut self, scheduling: DecisionScheduling) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Replaces the action rules.
    #[must_use]
    pub fn with_rules(mut self, rules: ActionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that a match can be run with these settings.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, see [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.battlefield_width == 0 || self.battlefield_height == 0 {
            return Err(ConfigError::EmptyBattlefield {
                width: self.battlefield_width,
                height: self.battlefield_height,
            });
        }
        if u64::from(self.battlefield_width) * u64::from(self.battlefield_height)
            > battlefield::MAX_CELLS
        {
            return Err(ConfigError::BattlefieldTooLarge {
                width: self.battlefield_width,
                height: self.battlefield_height,
            });
        }
        if self.max_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if self.rules.attack_range == 0 {
            return Err(ConfigError::ZeroAttackRange);
        }
        if self.decision_budget.is_zero() {
            return Err(ConfigError::ZeroDecisionBudget);
        }
        Ok(())
    }
}
