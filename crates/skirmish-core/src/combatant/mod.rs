//! Combatants and the read-only views handed to bot logic.
//!
//! A [`Combatant`] is the engine-side state of one bot in one round: its
//! vitals, tallies, attack target and narrative of the last turn. Its
//! position is not stored here; the round's battlefield owns it.
//!
//! Bot logic never touches a `Combatant`. It receives owned snapshots
//! ([`SelfView`], [`EnemyView`]) so that a slow or abandoned decision cannot
//! observe state changing underneath it.

pub mod vitals;

use std::fmt;
use std::sync::Arc;

use battlefield::Place;
use serde::{Deserialize, Serialize};

use crate::decision::BotLogic;
use crate::settings::ActionRules;

pub use vitals::{Gauge, Vitals};

/// Identifier of a combatant within a round.
///
/// Ids are assigned in enlistment order and also fix the order in which
/// combatants act within a turn.
///
/// # Example
///
/// ```
/// use skirmish_core::combatant::CombatantId;
///
/// let a = CombatantId::new(1);
/// let b = CombatantId::new(2);
/// assert!(a < b);
/// assert_eq!(b.to_string(), "2");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u64);

impl CombatantId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CombatantId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// =============================================================================
// Cause of destruction
// =============================================================================

/// What destroyed a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cause {
    /// Shot down by another combatant.
    Combatant {
        /// The attacker
        id: CombatantId,
        /// The attacker's name at the time
        name: String,
    },
    /// Stepped off the battlefield.
    ForceField,
    /// The bot's decision logic timed out, failed or gave no action.
    Malfunction,
    /// Damage without an identified attacker.
    Unknown,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combatant { name, .. } => f.write_str(name),
            Self::ForceField => f.write_str("force field"),
            Self::Malfunction => f.write_str("system malfunction"),
            Self::Unknown => f.write_str("unknown force"),
        }
    }
}

// =============================================================================
// Combatant
// =============================================================================

/// Engine state of one bot during a round.
pub struct Combatant {
    id: CombatantId,
    name: String,
    model: String,
    /// Current and maximum health, shield and energy.
    pub vitals: Vitals,
    /// Whom this combatant hit this turn. Cleared at the start of its next
    /// resolution.
    pub target: Option<CombatantId>,
    /// Set once, when health reaches zero.
    pub destroyed_by: Option<Cause>,
    /// Combatants this one destroyed.
    pub kills: u32,
    /// Times this one was destroyed.
    pub deaths: u32,
    /// Narrative outcome of this combatant's most recent resolution.
    pub last_action: String,
    logic: Arc<dyn BotLogic>,
}

impl fmt::Debug for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combatant")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .field("vitals", &self.vitals)
            .field("target", &self.target)
            .field("destroyed_by", &self.destroyed_by)
            .field("kills", &self.kills)
            .field("deaths", &self.deaths)
            .field("last_action", &self.last_action)
            .finish_non_exhaustive()
    }
}

impl Combatant {
    /// A fresh combatant with full vitals, named after its logic.
    #[must_use]
    pub fn new(id: CombatantId, logic: Arc<dyn BotLogic>, vitals: Vitals) -> Self {
        Self {
            id,
            name: logic.name().to_owned(),
            model: logic.model().to_owned(),
            vitals,
            target: None,
            destroyed_by: None,
            kills: 0,
            deaths: 0,
            last_action: String::new(),
            logic,
        }
    }

    /// Round-scoped identifier.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visual model tag, opaque to the engine.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The bot's decision logic.
    #[must_use]
    pub fn logic(&self) -> Arc<dyn BotLogic> {
        Arc::clone(&self.logic)
    }

    /// True once health has reached zero.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.vitals.health.is_empty()
    }

    /// True while health is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.is_destroyed()
    }

    /// Snapshot of this combatant as seen by its own logic.
    #[must_use]
    pub fn self_view(&self, place: Option<Place>, rules: ActionRules) -> SelfView {
        SelfView {
            id: self.id,
            name: self.name.clone(),
            model: self.model.clone(),
            place,
            vitals: self.vitals,
            kills: self.kills,
            deaths: self.deaths,
            rules,
        }
    }

    /// Snapshot of this combatant as seen by its enemies.
    #[must_use]
    pub fn enemy_view(&self, place: Option<Place>) -> EnemyView {
        EnemyView {
            id: self.id,
            name: self.name.clone(),
            model: self.model.clone(),
            place,
            health: self.vitals.health,
            shield: self.vitals.shield,
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// What a bot knows about itself when deciding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfView {
    /// Own id
    pub id: CombatantId,
    /// Own name
    pub name: String,
    /// Own model tag
    pub model: String,
    /// Own place on the battlefield
    pub place: Option<Place>,
    /// Own vitals, including energy
    pub vitals: Vitals,
    /// Kills so far this round
    pub kills: u32,
    /// Deaths so far this round
    pub deaths: u32,
    /// Costs and strengths of the actions
    pub rules: ActionRules,
}

/// What a bot knows about a living enemy.
///
/// Energy is private and not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    /// Enemy id, usable as an attack target
    pub id: CombatantId,
    /// Enemy name
    pub name: String,
    /// Enemy model tag
    pub model: String,
    /// Enemy place on the battlefield
    pub place: Option<Place>,
    /// Enemy health
    pub health: Gauge,
    /// Enemy shield
    pub shield: Gauge,
}

impl EnemyView {
    /// Distance from `from` to this enemy, if it is placed.
    #[must_use]
    pub fn distance_from(&self, from: Place) -> Option<f64> {
        self.place.map(|place| from.distance_to(place))
    }
}
