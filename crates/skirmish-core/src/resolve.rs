//! Action resolution.
//!
//! [`ActionResolver`] applies one combatant's decision to the arena and
//! returns the narrative outcome. Resolution never fails: rejected actions
//! produce a descriptive outcome and leave state untouched except for any
//! energy the rules say is spent anyway.
//!
//! # Energy
//!
//! | Action | Needs | Spent |
//! |---|---|---|
//! | `Move` | `move_cost` | whenever the precondition passes |
//! | `MoveTowards` / `MoveAwayFrom` | `move_cost` | only if the combatant actually moves |
//! | `Attack` | `attack_cost` | whenever the precondition passes |
//! | `RechargeBattery` | `battery_recharge_cost` | always, before the recharge |
//! | `RechargeShield` | any energy | up to `shield_recharge_cost`, unless the shield is full |

use battlefield::{Direction, Place};

use crate::action::Action;
use crate::arena::Arena;
use crate::combatant::{Cause, CombatantId};
use crate::decision::Malfunction;
use crate::settings::ActionRules;

/// Applies decisions to an arena under a fixed set of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionResolver {
    rules: ActionRules,
}

impl ActionResolver {
    /// A resolver for the given rules.
    #[must_use]
    pub const fn new(rules: ActionRules) -> Self {
        Self { rules }
    }

    /// The rules in force.
    #[must_use]
    pub const fn rules(&self) -> &ActionRules {
        &self.rules
    }

    /// Damage an attack deals at `distance`.
    ///
    /// `floor(damage * (range - distance + 1) / range)`, and zero beyond
    /// range. Non-increasing in `distance`.
    ///
    /// ```
    /// use skirmish_core::resolve::ActionResolver;
    /// use skirmish_core::settings::ActionRules;
    ///
    /// let resolver = ActionResolver::new(ActionRules { attack_range: 5, attack_damage: 10, ..ActionRules::default() });
    /// assert_eq!(resolver.damage_at(3.0), 6);
    /// assert_eq!(resolver.damage_at(5.0), 2);
    /// assert_eq!(resolver.damage_at(5.1), 0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn damage_at(&self, distance: f64) -> u32 {
        let range = f64::from(self.rules.attack_range);
        if distance > range || range == 0.0 {
            return 0;
        }
        let damage = f64::from(self.rules.attack_damage) * (range - distance + 1.0) / range;
        damage.floor().max(0.0) as u32
    }

    /// Resolves `actor`'s turn.
    ///
    /// A destroyed actor only reports its destruction; `decide` is not
    /// called for it. A malfunction destroys the actor. Any chosen action is
    /// dispatched to its rule.
    pub fn resolve<D>(&self, arena: &mut Arena, actor: CombatantId, decide: D) -> String
    where
        D: FnOnce(&Arena) -> Result<Action, Malfunction>,
    {
        let Some(combatant) = arena.get_mut(actor) else {
            return String::new();
        };
        combatant.target = None;
        if combatant.is_destroyed() {
            return destroyed_outcome(arena, actor);
        }

        match decide(&*arena) {
            Ok(action) => self.apply(arena, actor, action),
            Err(malfunction) => {
                tracing::warn!(
                    bot = %name_of(arena, actor),
                    error = %malfunction,
                    "bot malfunction"
                );
                arena.destroy(actor, Cause::Malfunction);
                destroyed_outcome(arena, actor)
            }
        }
    }

    /// Applies a chosen action for a living actor.
    pub fn apply(&self, arena: &mut Arena, actor: CombatantId, action: Action) -> String {
        tracing::trace!(combatant = %actor, action = action.kind(), "applying action");
        match action {
            Action::Move(direction) => self.step(arena, actor, direction),
            Action::MoveTowards(place) => self.shift(arena, actor, place, Bearing::Towards),
            Action::MoveAwayFrom(place) => self.shift(arena, actor, place, Bearing::AwayFrom),
            Action::Attack(target) => self.attack(arena, actor, target),
            Action::RechargeBattery => self.recharge_battery(arena, actor),
            Action::RechargeShield => self.recharge_shield(arena, actor),
            Action::Idle => format!("{} is idle.", name_of(arena, actor)),
        }
    }

    fn step(&self, arena: &mut Arena, actor: CombatantId, direction: Direction) -> String {
        let name = name_of(arena, actor);
        let Some(from) = arena.place_of(actor) else {
            return format!("{name} cannot move in any direction.");
        };
        if !spend(arena, actor, self.rules.move_cost) {
            return format!("{name} does not have enough energy to move.");
        }

        let to = from.step(direction);
        if arena.battlefield().is_out_of_range(to.x(), to.y()) {
            arena.destroy(actor, Cause::ForceField);
            return format!("{name} moved into force field and exploded.");
        }
        if arena.relocate(actor, to).is_err() {
            return format!("{name} cannot move {direction}, place is occupied.");
        }
        format!("{name} moves {direction}.")
    }

    fn shift(&self, arena: &mut Arena, actor: CombatantId, target: Place, bearing: Bearing) -> String {
        let name = name_of(arena, actor);
        let Some(from) = arena.place_of(actor) else {
            return format!("{name} cannot move in any direction.");
        };
        if !has_energy(arena, actor, self.rules.move_cost) {
            return format!("{name} does not have enough energy to move.");
        }

        let mut candidates = arena.battlefield().free_neighbors(from);
        candidates.push(from);
        // min_by keeps the first of equal elements, so reversing the
        // comparison yields the first farthest candidate.
        let chosen = candidates.into_iter().min_by(|a, b| {
            let (da, db) = (a.distance_to(target), b.distance_to(target));
            match bearing {
                Bearing::Towards => da.total_cmp(&db),
                Bearing::AwayFrom => db.total_cmp(&da),
            }
        });

        match chosen.and_then(|to| from.direction_to(to).map(|d| (to, d))) {
            Some((to, direction)) => {
                spend(arena, actor, self.rules.move_cost);
                if arena.relocate(actor, to).is_err() {
                    return format!("{name} cannot move {direction}, place is occupied.");
                }
                format!("{name} moves {direction}.")
            }
            None => format!("{name} stays at current position."),
        }
    }

    fn attack(&self, arena: &mut Arena, actor: CombatantId, target: CombatantId) -> String {
        let name = name_of(arena, actor);
        if !spend(arena, actor, self.rules.attack_cost) {
            return format!("{name} does not have enough energy to attack.");
        }

        let from = arena.place_of(actor);
        let to = arena.place_of(target);
        let enemy = arena
            .get(target)
            .filter(|_| target != actor)
            .map(|e| (e.name().to_owned(), e.is_destroyed()));
        let (Some(from), Some(to), Some((enemy, enemy_destroyed))) = (from, to, enemy) else {
            return format!("{name} wants to attack, but enemy is not found on battlefield.");
        };

        if enemy_destroyed {
            return format!("{name} attempts to attack {enemy} but failed, target is already destroyed.");
        }
        let distance = from.distance_to(to);
        if distance > f64::from(self.rules.attack_range) {
            return format!("{name} attempts to attack {enemy} but failed, target is out of range.");
        }
        let damage = self.damage_at(distance);
        if damage == 0 {
            return format!("{name} attacks {enemy} with no damage.");
        }

        let report = arena.apply_damage(target, damage, Some(actor));
        if let Some(attacker) = arena.get_mut(actor) {
            attacker.target = Some(target);
        }
        if report.destroyed {
            format!("{name} destroys {enemy}.")
        } else {
            format!("{name} attacks {enemy} with {damage} damage.")
        }
    }

    fn recharge_battery(&self, arena: &mut Arena, actor: CombatantId) -> String {
        let name = name_of(arena, actor);
        if !spend(arena, actor, self.rules.battery_recharge_cost) {
            return format!("{name} does not have enough energy to recharge battery.");
        }
        if let Some(c) = arena.get_mut(actor) {
            c.vitals.energy.fill(self.rules.battery_recharge_amount);
        }
        format!("{name} recharges battery.")
    }

    fn recharge_shield(&self, arena: &mut Arena, actor: CombatantId) -> String {
        let name = name_of(arena, actor);
        let Some(c) = arena.get_mut(actor) else {
            return String::new();
        };
        if c.vitals.energy.is_empty() {
            return format!("{name} does not have enough energy to recharge shield.");
        }
        if c.vitals.shield.is_full() {
            return format!("{name} wants to recharge shield, but it's already full.");
        }

        let cost = self.rules.shield_recharge_cost;
        let gained = if c.vitals.energy.current() < cost {
            // Partial recharge: whatever energy is left becomes shield.
            let drained = c.vitals.energy.drain(cost);
            c.vitals.shield.fill(drained)
        } else {
            c.vitals.energy.drain(cost);
            c.vitals.shield.fill(self.rules.shield_recharge_amount)
        };
        format!("{name} recharges shield by {gained} SP.")
    }
}

#[derive(Debug, Clone, Copy)]
enum Bearing {
    Towards,
    AwayFrom,
}

fn name_of(arena: &Arena, id: CombatantId) -> String {
    arena
        .get(id)
        .map(|c| c.name().to_owned())
        .unwrap_or_default()
}

fn destroyed_outcome(arena: &Arena, id: CombatantId) -> String {
    let Some(c) = arena.get(id) else {
        return String::new();
    };
    let cause = c.destroyed_by.as_ref().unwrap_or(&Cause::Unknown);
    format!("{} is destroyed by {cause}.", c.name())
}

fn has_energy(arena: &Arena, id: CombatantId, cost: u32) -> bool {
    arena.get(id).is_some_and(|c| c.vitals.energy.current() >= cost)
}

/// Drains `cost` energy if the combatant has it. Returns whether it did.
fn spend(arena: &mut Arena, id: CombatantId, cost: u32) -> bool {
    match arena.get_mut(id) {
        Some(c) if c.vitals.energy.current() >= cost => {
            c.vitals.energy.drain(cost);
            true
        }
        _ => false,
    }
}
