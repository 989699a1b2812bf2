//! The arena: every combatant of a round plus the battlefield they stand on.
//!
//! The arena is the container that action resolution mutates. It provides:
//! - Combatant storage with deterministic iteration order (`BTreeMap`)
//! - Occupancy through an owned [`Battlefield`], keyed by [`CombatantId`]
//! - Damage and destruction bookkeeping, including the casualty log
//!
//! # Architecture
//!
//! Combatant ids are assigned in enlistment order, and the `BTreeMap` keeps
//! iteration in that order, which is also the order combatants act in.
//! Destroyed combatants are never removed: they stay in the map for scoring
//! and keep their place on the battlefield as wrecks.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use battlefield::{Battlefield, Place};
//! use skirmish_core::action::Action;
//! use skirmish_core::arena::Arena;
//! use skirmish_core::combatant::Vitals;
//! use skirmish_core::decision::FnBot;
//!
//! let mut arena = Arena::new(Battlefield::new(5, 5).unwrap());
//! let a = arena.enlist(Arc::new(FnBot::new("A", |_, _, _| Ok(Some(Action::Idle)))), Vitals::full(10, 0, 10));
//! let b = arena.enlist(Arc::new(FnBot::new("B", |_, _, _| Ok(Some(Action::Idle)))), Vitals::full(10, 0, 10));
//! arena.relocate(a, Place::new(0, 0)).unwrap();
//! arena.relocate(b, Place::new(1, 0)).unwrap();
//!
//! arena.apply_damage(b, 25, Some(a));
//! assert_eq!(arena.living_count(), 1);
//! assert_eq!(arena.get(a).unwrap().kills, 1);
//! assert_eq!(arena.take_casualties().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use battlefield::{Battlefield, BattlefieldError, Place};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combatant::{Cause, Combatant, CombatantId, EnemyView, SelfView, Vitals};
use crate::decision::{BotLogic, Snapshot};
use crate::settings::ActionRules;

// =============================================================================
// Casualty log
// =============================================================================

/// A destruction, recorded at the moment it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casualty {
    /// Who was destroyed
    pub victim: CombatantId,
    /// Victim's name
    pub victim_name: String,
    /// What destroyed it
    pub cause: Cause,
}

/// Result of [`Arena::apply_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageReport {
    /// Damage soaked up by the shield
    pub absorbed: u32,
    /// Damage that reached health
    pub taken: u32,
    /// Whether this hit destroyed the target
    pub destroyed: bool,
}

// =============================================================================
// Arena
// =============================================================================

/// Combatants of one round and their battlefield.
#[derive(Debug)]
pub struct Arena {
    next_id: u64,
    combatants: BTreeMap<CombatantId, Combatant>,
    battlefield: Battlefield<CombatantId>,
    casualties: Vec<Casualty>,
}

impl Arena {
    /// An arena with no combatants on the given battlefield.
    #[must_use]
    pub fn new(battlefield: Battlefield<CombatantId>) -> Self {
        Self {
            next_id: 1,
            combatants: BTreeMap::new(),
            battlefield,
            casualties: Vec::new(),
        }
    }

    /// Adds a combatant driven by `logic`. It is not placed yet.
    pub fn enlist(&mut self, logic: Arc<dyn BotLogic>, vitals: Vitals) -> CombatantId {
        let id = CombatantId::new(self.next_id);
        self.next_id += 1;
        self.combatants.insert(id, Combatant::new(id, logic, vitals));
        id
    }

    /// Places every combatant on a distinct random free place.
    ///
    /// # Errors
    ///
    /// Fails with [`BattlefieldError::Capacity`] if they do not fit; nobody is
    /// placed in that case.
    pub fn scatter<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BattlefieldError> {
        let ids: Vec<CombatantId> = self.combatants.keys().copied().collect();
        self.battlefield.set_randomly(&ids, rng)
    }

    /// Moves a combatant to `place`. All position changes go through here.
    ///
    /// # Errors
    ///
    /// See [`Battlefield::set`].
    pub fn relocate(&mut self, id: CombatantId, place: Place) -> Result<Place, BattlefieldError> {
        self.battlefield.set(id, place.x(), place.y())
    }

    /// Looks up a combatant.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Looks up a combatant for mutation.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// All combatants in id order, destroyed ones included.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    /// All ids in acting order.
    #[must_use]
    pub fn ids(&self) -> Vec<CombatantId> {
        self.combatants.keys().copied().collect()
    }

    /// Number of combatants, destroyed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// True if nobody was enlisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Number of combatants with health above zero.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.combatants.values().filter(|c| c.is_alive()).count()
    }

    /// The battlefield.
    #[must_use]
    pub fn battlefield(&self) -> &Battlefield<CombatantId> {
        &self.battlefield
    }

    /// Current place of a combatant.
    #[must_use]
    pub fn place_of(&self, id: CombatantId) -> Option<Place> {
        self.battlefield.place_of(id)
    }

    /// Snapshot of every living combatant except `of`.
    #[must_use]
    pub fn enemy_views(&self, of: CombatantId) -> Vec<EnemyView> {
        self.combatants
            .values()
            .filter(|c| c.id() != of && c.is_alive())
            .map(|c| c.enemy_view(self.place_of(c.id())))
            .collect()
    }

    /// The owned view a decision of `id` is made against.
    #[must_use]
    pub fn snapshot(&self, id: CombatantId, rules: ActionRules) -> Option<Snapshot> {
        let me: SelfView = self.get(id)?.self_view(self.place_of(id), rules);
        Some(Snapshot {
            me,
            enemies: self.enemy_views(id),
            battlefield: self.battlefield.clone(),
        })
    }

    /// Deals `amount` damage to `target`, shield first.
    ///
    /// If health reaches zero the target is destroyed and `attacker`, when
    /// given, is credited with the kill. Hitting a destroyed or unknown
    /// combatant does nothing.
    pub fn apply_damage(
        &mut self,
        target: CombatantId,
        amount: u32,
        attacker: Option<CombatantId>,
    ) -> DamageReport {
        let Some(victim) = self.combatants.get_mut(&target) else {
            return DamageReport::default();
        };
        if victim.is_destroyed() {
            return DamageReport::default();
        }

        let (absorbed, taken) = victim.vitals.absorb(amount);
        let destroyed = victim.is_destroyed();
        if destroyed {
            let cause = attacker
                .and_then(|id| self.combatants.get(&id))
                .map_or(Cause::Unknown, |a| Cause::Combatant {
                    id: a.id(),
                    name: a.name().to_owned(),
                });
            self.destroy(target, cause);
        }

        DamageReport {
            absorbed,
            taken,
            destroyed,
        }
    }

    /// Destroys a combatant: health to zero, one more death, and one more
    /// kill for the attacker named in `cause`.
    ///
    /// A combatant is destroyed at most once; later calls are ignored.
    pub fn destroy(&mut self, id: CombatantId, cause: Cause) {
        let Some(victim) = self.combatants.get_mut(&id) else {
            return;
        };
        if victim.destroyed_by.is_some() {
            return;
        }

        victim.vitals.health.empty();
        victim.deaths += 1;
        victim.destroyed_by = Some(cause.clone());
        let victim_name = victim.name().to_owned();

        if let Cause::Combatant { id: attacker, .. } = &cause {
            if let Some(attacker) = self.combatants.get_mut(attacker) {
                attacker.kills += 1;
            }
        }

        tracing::info!(victim = %victim_name, cause = %cause, "combatant destroyed");
        self.casualties.push(Casualty {
            victim: id,
            victim_name,
            cause,
        });
    }

    /// Drains the casualty log.
    pub fn take_casualties(&mut self) -> Vec<Casualty> {
        std::mem::take(&mut self.casualties)
    }
}
