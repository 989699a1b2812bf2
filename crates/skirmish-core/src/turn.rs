//! One resolution pass over every combatant.
//!
//! A [`Turn`] lets each combatant act exactly once, in id order, and records
//! the outcome of each. How decisions are computed depends on
//! [`DecisionScheduling`]:
//!
//! - **Sequential**: a combatant decides right before it acts.
//! - **Concurrent**: every living combatant decides in parallel against a
//!   snapshot taken before anyone acts. The actions are then applied one at a
//!   time in id order, so occupancy and vitals are only ever mutated from the
//!   driver thread.
//!
//! In both modes a combatant destroyed earlier in the same turn does not act;
//! it reports its destruction instead.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::action::Action;
use crate::arena::{Arena, Casualty};
use crate::combatant::{Combatant, CombatantId};
use crate::decision::{invoke, BotLogic, DecisionPolicy, Malfunction, Snapshot};
use crate::resolve::ActionResolver;
use crate::settings::DecisionScheduling;

/// Record of one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turn {
    number: u32,
    outcomes: BTreeMap<CombatantId, String>,
    casualties: Vec<Casualty>,
}

impl Turn {
    /// An empty turn record.
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self {
            number,
            outcomes: BTreeMap::new(),
            casualties: Vec::new(),
        }
    }

    /// Ordinal within the round, starting at 1.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Outcome text per combatant.
    #[must_use]
    pub fn outcomes(&self) -> &BTreeMap<CombatantId, String> {
        &self.outcomes
    }

    /// Outcome text of one combatant.
    #[must_use]
    pub fn outcome(&self, id: CombatantId) -> Option<&str> {
        self.outcomes.get(&id).map(String::as_str)
    }

    /// Destructions that happened during this turn, in order.
    #[must_use]
    pub fn casualties(&self) -> &[Casualty] {
        &self.casualties
    }

    /// Lets every combatant in `arena` act once.
    pub fn run(&mut self, arena: &mut Arena, resolver: &ActionResolver, policy: DecisionPolicy) {
        match policy.scheduling {
            DecisionScheduling::Sequential => self.run_sequential(arena, resolver, policy),
            DecisionScheduling::Concurrent => self.run_concurrent(arena, resolver, policy),
        }
        self.casualties.extend(arena.take_casualties());
    }

    fn run_sequential(&mut self, arena: &mut Arena, resolver: &ActionResolver, policy: DecisionPolicy) {
        let rules = *resolver.rules();
        for id in arena.ids() {
            let outcome = resolver.resolve(arena, id, |arena| {
                let logic = arena.get(id).map(Combatant::logic).ok_or(Malfunction::NoAction)?;
                let snapshot = arena.snapshot(id, rules).ok_or(Malfunction::NoAction)?;
                invoke(logic, snapshot, policy.budget)
            });
            self.record(arena, id, outcome);
        }
    }

    fn run_concurrent(&mut self, arena: &mut Arena, resolver: &ActionResolver, policy: DecisionPolicy) {
        let rules = *resolver.rules();
        let pending: Vec<(CombatantId, Arc<dyn BotLogic>, Snapshot)> = arena
            .combatants()
            .filter(|c| c.is_alive())
            .filter_map(|c| Some((c.id(), c.logic(), arena.snapshot(c.id(), rules)?)))
            .collect();

        let mut decisions: BTreeMap<CombatantId, Result<Action, Malfunction>> = pending
            .into_par_iter()
            .map(|(id, logic, snapshot)| (id, invoke(logic, snapshot, policy.budget)))
            .collect();

        for id in arena.ids() {
            let decision = decisions.remove(&id);
            let outcome = resolver.resolve(arena, id, move |_| {
                decision.unwrap_or(Err(Malfunction::NoAction))
            });
            self.record(arena, id, outcome);
        }
    }

    fn record(&mut self, arena: &mut Arena, id: CombatantId, outcome: String) {
        tracing::debug!(turn = self.number, combatant = %id, outcome = %outcome, "resolved");
        if let Some(combatant) = arena.get_mut(id) {
            combatant.last_action.clone_from(&outcome);
        }
        self.outcomes.insert(id, outcome);
    }
}
