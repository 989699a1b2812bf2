//! Bot decision logic and its guarded invocation.
//!
//! Bot logic is untrusted: it may be slow, fail, panic or decline to choose.
//! [`invoke`] runs one decision on its own named worker thread and waits at
//! most the configured budget for the answer. Whatever goes wrong comes back
//! as a [`Malfunction`]; nothing a bot does can stall the round past its
//! budget or unwind into the engine.
//!
//! A worker that misses its budget is abandoned, not killed. It keeps running
//! in the background until the bot logic returns, and its answer is dropped.
//! Logic that never returns keeps its thread alive for the rest of the
//! process.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use skirmish_core::action::Action;
//! use skirmish_core::decision::{invoke, BotLogic, FnBot, Snapshot};
//! # use skirmish_core::combatant::{Combatant, CombatantId, Vitals};
//! # use skirmish_core::settings::ActionRules;
//! # use battlefield::Battlefield;
//!
//! let logic: Arc<dyn BotLogic> = Arc::new(FnBot::new("Waiter", |_, _, _| Ok(Some(Action::Idle))));
//! # let me = Combatant::new(CombatantId::new(1), Arc::clone(&logic), Vitals::full(10, 10, 10))
//! #     .self_view(None, ActionRules::default());
//! # let snapshot = Snapshot { me, enemies: vec![], battlefield: Battlefield::new(3, 3).unwrap() };
//!
//! let action = invoke(logic, snapshot, Duration::from_secs(1));
//! assert_eq!(action, Ok(Action::Idle));
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use battlefield::Battlefield;
use thiserror::Error;

use crate::action::Action;
use crate::combatant::{CombatantId, EnemyView, SelfView};
use crate::settings::{DecisionScheduling, Settings};

// =============================================================================
// Bot Logic
// =============================================================================

/// Decision logic of a bot.
///
/// `decide` receives owned snapshots: the bot itself, every living enemy and
/// the battlefield occupancy. It returns the action for this turn, or
/// `Ok(None)` if it has nothing to say (which counts as a malfunction).
///
/// Implementations must be `Send + Sync` because decisions run on worker
/// threads and, with concurrent scheduling, several at a time.
pub trait BotLogic: Send + Sync {
    /// Display name of the bot.
    fn name(&self) -> &str;

    /// Visual model tag, opaque to the engine.
    fn model(&self) -> &str {
        "default"
    }

    /// Chooses this turn's action.
    ///
    /// # Errors
    ///
    /// Any error destroys the combatant with a system malfunction.
    fn decide(
        &self,
        me: &SelfView,
        enemies: &[EnemyView],
        battlefield: &Battlefield<CombatantId>,
    ) -> anyhow::Result<Option<Action>>;
}

/// Bot logic backed by a closure.
pub struct FnBot<F> {
    name: String,
    model: String,
    decide: F,
}

impl<F> FnBot<F>
where
    F: Fn(&SelfView, &[EnemyView], &Battlefield<CombatantId>) -> anyhow::Result<Option<Action>>
        + Send
        + Sync,
{
    /// Wraps `decide` under the given name.
    pub fn new(name: impl Into<String>, decide: F) -> Self {
        Self {
            name: name.into(),
            model: "default".to_owned(),
            decide,
        }
    }

    /// Sets the model tag.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl<F> fmt::Debug for FnBot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBot")
            .field("name", &self.name)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl<F> BotLogic for FnBot<F>
where
    F: Fn(&SelfView, &[EnemyView], &Battlefield<CombatantId>) -> anyhow::Result<Option<Action>>
        + Send
        + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn decide(
        &self,
        me: &SelfView,
        enemies: &[EnemyView],
        battlefield: &Battlefield<CombatantId>,
    ) -> anyhow::Result<Option<Action>> {
        (self.decide)(me, enemies, battlefield)
    }
}

// =============================================================================
// Malfunction
// =============================================================================

/// Why a bot's decision was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malfunction {
    /// No answer within the budget.
    #[error("no decision within {0:?}")]
    TimedOut(Duration),

    /// The logic returned an error.
    #[error("decision failed: {0}")]
    Failed(String),

    /// The logic panicked.
    #[error("decision logic panicked: {0}")]
    Panicked(String),

    /// The logic returned without choosing an action.
    #[error("no action chosen")]
    NoAction,

    /// The worker thread could not be started.
    #[error("could not start decision worker: {0}")]
    Spawn(String),
}

// =============================================================================
// Invocation
// =============================================================================

/// Everything a decision gets to see, owned so it can move to a worker.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The deciding combatant
    pub me: SelfView,
    /// Living enemies, in id order
    pub enemies: Vec<EnemyView>,
    /// Occupancy at the time of the snapshot
    pub battlefield: Battlefield<CombatantId>,
}

/// Budget and scheduling of decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionPolicy {
    /// Wall-clock time per decision
    pub budget: Duration,
    /// Sequential or concurrent decisions within a turn
    pub scheduling: DecisionScheduling,
}

impl From<&Settings> for DecisionPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            budget: settings.decision_budget,
            scheduling: settings.scheduling,
        }
    }
}

/// Runs one decision on a dedicated worker thread, waiting at most `budget`.
///
/// # Errors
///
/// Returns a [`Malfunction`] if the logic times out, fails, panics, chooses
/// nothing, or if the worker cannot be started.
pub fn invoke(
    logic: Arc<dyn BotLogic>,
    snapshot: Snapshot,
    budget: Duration,
) -> Result<Action, Malfunction> {
    // Capacity 1 so an abandoned worker can still complete its send.
    let (tx, rx) = mpsc::sync_channel(1);
    let thread_name = format!("decision-{}", snapshot.me.id);

    thread::Builder::new()
        .name(thread_name)
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                logic.decide(&snapshot.me, &snapshot.enemies, &snapshot.battlefield)
            }));
            // The receiver is gone if the budget already expired.
            let _ = tx.send(outcome);
        })
        .map_err(|err| Malfunction::Spawn(err.to_string()))?;

    match rx.recv_timeout(budget) {
        Ok(Ok(Ok(Some(action)))) => Ok(action),
        Ok(Ok(Ok(None))) => Err(Malfunction::NoAction),
        Ok(Ok(Err(err))) => Err(Malfunction::Failed(format!("{err:#}"))),
        Ok(Err(payload)) => Err(Malfunction::Panicked(panic_message(payload.as_ref()))),
        Err(RecvTimeoutError::Timeout) => Err(Malfunction::TimedOut(budget)),
        Err(RecvTimeoutError::Disconnected) => Err(Malfunction::Panicked(
            "worker exited without an answer".to_owned(),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, Vitals};
    use crate::settings::ActionRules;
    use std::time::Instant;

    fn snapshot_for(logic: &Arc<dyn BotLogic>) -> Snapshot {
        let me = Combatant::new(CombatantId::new(1), Arc::clone(logic), Vitals::full(10, 10, 10))
            .self_view(None, ActionRules::default());
        Snapshot {
            me,
            enemies: Vec::new(),
            battlefield: Battlefield::new(4, 4).unwrap(),
        }
    }

    fn run(logic: Arc<dyn BotLogic>, budget: Duration) -> Result<Action, Malfunction> {
        let snapshot = snapshot_for(&logic);
        invoke(logic, snapshot, budget)
    }

    #[test]
    fn returns_chosen_action() {
        let logic: Arc<dyn BotLogic> =
            Arc::new(FnBot::new("ok", |_, _, _| Ok(Some(Action::RechargeBattery))));
        assert_eq!(run(logic, Duration::from_secs(1)), Ok(Action::RechargeBattery));
    }

    #[test]
    fn no_action_is_malfunction() {
        let logic: Arc<dyn BotLogic> = Arc::new(FnBot::new("mute", |_, _, _| Ok(None)));
        assert_eq!(run(logic, Duration::from_secs(1)), Err(Malfunction::NoAction));
    }

    #[test]
    fn error_is_malfunction() {
        let logic: Arc<dyn BotLogic> =
            Arc::new(FnBot::new("broken", |_, _, _| Err(anyhow::anyhow!("sensor offline"))));
        assert_eq!(
            run(logic, Duration::from_secs(1)),
            Err(Malfunction::Failed("sensor offline".to_owned()))
        );
    }

    #[test]
    fn panic_is_caught() {
        let logic: Arc<dyn BotLogic> = Arc::new(FnBot::new("boom", |_, _, _| panic!("overheated")));
        assert_eq!(
            run(logic, Duration::from_secs(1)),
            Err(Malfunction::Panicked("overheated".to_owned()))
        );
    }

    #[test]
    fn slow_decision_times_out_within_budget() {
        let logic: Arc<dyn BotLogic> = Arc::new(FnBot::new("sloth", |_, _, _| {
            thread::sleep(Duration::from_millis(500));
            Ok(Some(Action::Idle))
        }));
        let budget = Duration::from_millis(50);

        let start = Instant::now();
        let result = run(logic, budget);

        assert_eq!(result, Err(Malfunction::TimedOut(budget)));
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn decision_sees_snapshot() {
        let logic: Arc<dyn BotLogic> = Arc::new(FnBot::new("reader", |me, _, field| {
            assert_eq!(me.name, "reader");
            assert_eq!(field.width(), 4);
            Ok(Some(Action::Idle))
        }));
        assert_eq!(run(logic, Duration::from_secs(1)), Ok(Action::Idle));
    }
}
