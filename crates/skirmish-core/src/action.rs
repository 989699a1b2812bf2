//! The closed set of things a combatant can do in a turn.

use std::fmt;

use battlefield::{Direction, Place};
use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;

/// One turn's choice of a combatant.
///
/// Costs and strengths are not part of the action; they come from the
/// engine's [`ActionRules`](crate::settings::ActionRules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step one place in a compass direction.
    Move(Direction),
    /// Step to the free neighbouring place closest to a target place.
    MoveTowards(Place),
    /// Step to the free neighbouring place farthest from a target place.
    MoveAwayFrom(Place),
    /// Fire at another combatant.
    Attack(CombatantId),
    /// Spend a little energy to regain more.
    RechargeBattery,
    /// Convert energy into shield.
    RechargeShield,
    /// Do nothing.
    Idle,
}

impl Action {
    /// Short name of the action kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Move(_) => "move",
            Self::MoveTowards(_) => "move_towards",
            Self::MoveAwayFrom(_) => "move_away_from",
            Self::Attack(_) => "attack",
            Self::RechargeBattery => "recharge_battery",
            Self::RechargeShield => "recharge_shield",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "move {direction}"),
            Self::MoveTowards(place) => write!(f, "move towards {place}"),
            Self::MoveAwayFrom(place) => write!(f, "move away from {place}"),
            Self::Attack(target) => write!(f, "attack #{target}"),
            Self::RechargeBattery => f.write_str("recharge battery"),
            Self::RechargeShield => f.write_str("recharge shield"),
            Self::Idle => f.write_str("idle"),
        }
    }
}
