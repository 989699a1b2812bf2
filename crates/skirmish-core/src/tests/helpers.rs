//! Test bots, recording observers and setup shortcuts.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use battlefield::Battlefield;

use crate::action::Action;
use crate::combatant::{CombatantId, EnemyView, SelfView};
use crate::decision::{BotLogic, FnBot};
use crate::matches::MatchReport;
use crate::observer::ArenaObserver;
use crate::pacing::Pacer;
use crate::round::{Round, RoundResult};
use crate::settings::Settings;
use crate::turn::Turn;

// =============================================================================
// Setup
// =============================================================================

/// Headless settings with a short decision budget.
pub fn test_settings() -> Settings {
    Settings::headless()
        .with_battlefield(10, 10)
        .with_rounds(1)
        .with_turns(20)
        .with_decision_budget(Duration::from_millis(300))
}

/// Installs a test-writer subscriber so `tracing` output shows up in failing
/// tests. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Test Bots
// =============================================================================

/// Always idles.
pub fn idle_bot(name: &str) -> Arc<dyn BotLogic> {
    Arc::new(FnBot::new(name, |_, _, _| Ok(Some(Action::Idle))))
}

/// Sleeps for `delay` before idling.
pub fn slow_bot(name: &str, delay: Duration) -> Arc<dyn BotLogic> {
    Arc::new(FnBot::new(name, move |_, _, _| {
        thread::sleep(delay);
        Ok(Some(Action::Idle))
    }))
}

/// Panics on every decision.
pub fn panicking_bot(name: &str) -> Arc<dyn BotLogic> {
    Arc::new(FnBot::new(name, |_, _, _| panic!("bot logic crashed")))
}

/// Returns an error on every decision.
pub fn failing_bot(name: &str) -> Arc<dyn BotLogic> {
    Arc::new(FnBot::new(name, |_, _, _| {
        Err(anyhow::anyhow!("targeting computer offline"))
    }))
}

/// Never chooses an action.
pub fn silent_bot(name: &str) -> Arc<dyn BotLogic> {
    Arc::new(FnBot::new(name, |_, _, _| Ok(None)))
}

/// Attacks the closest enemy in range, otherwise closes in on it. Recharges
/// when short on energy.
pub fn hunter_bot(name: &str) -> Arc<dyn BotLogic> {
    Arc::new(FnBot::new(name, hunt))
}

#[allow(clippy::unnecessary_wraps)]
fn hunt(
    me: &SelfView,
    enemies: &[EnemyView],
    _battlefield: &Battlefield<CombatantId>,
) -> anyhow::Result<Option<Action>> {
    let Some(here) = me.place else {
        return Ok(Some(Action::Idle));
    };
    let closest = enemies
        .iter()
        .filter_map(|e| Some((e, e.distance_from(here)?)))
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((enemy, distance)) = closest else {
        return Ok(Some(Action::Idle));
    };

    if me.vitals.energy.current() < me.rules.attack_cost {
        return Ok(Some(Action::RechargeBattery));
    }
    if distance <= f64::from(me.rules.attack_range) {
        return Ok(Some(Action::Attack(enemy.id)));
    }
    Ok(enemy.place.map(Action::MoveTowards))
}

/// Plays `actions` in order, then idles.
pub struct ScriptedBot {
    name: String,
    script: Mutex<VecDeque<Action>>,
}

impl ScriptedBot {
    /// A bot playing `actions`.
    pub fn new(name: &str, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            name: name.to_owned(),
            script: Mutex::new(actions.into_iter().collect()),
        }
    }
}

impl BotLogic for ScriptedBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(
        &self,
        _me: &SelfView,
        _enemies: &[EnemyView],
        _battlefield: &Battlefield<CombatantId>,
    ) -> anyhow::Result<Option<Action>> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| anyhow::anyhow!("script lock poisoned"))?;
        Ok(Some(script.pop_front().unwrap_or(Action::Idle)))
    }
}

// =============================================================================
// Recording Observers
// =============================================================================

/// Records every lifecycle event as a line of text.
#[derive(Debug, Default)]
pub struct EventLog {
    /// Events in the order they were received
    pub events: Vec<String>,
    /// Every outcome text of every turn, in order
    pub outcomes: Vec<String>,
}

impl ArenaObserver for EventLog {
    fn on_match_starting(&mut self, _settings: &Settings) {
        self.events.push("match starting".into());
    }

    fn on_match_finished(&mut self, report: &MatchReport) {
        self.events
            .push(format!("match finished after {} rounds", report.rounds.len()));
    }

    fn on_round_starting(&mut self, round: &Round) {
        self.events.push(format!("round {} starting", round.number()));
    }

    fn on_round_finished(&mut self, round: &Round, result: &RoundResult) {
        self.events.push(format!(
            "round {} finished after {} turns",
            round.number(),
            result.turns_played
        ));
    }

    fn on_turn_starting(&mut self, _round: &Round, number: u32) {
        self.events.push(format!("turn {number} starting"));
    }

    fn on_turn_finished(&mut self, _round: &Round, turn: &Turn) {
        self.events.push(format!("turn {} finished", turn.number()));
        self.outcomes.extend(turn.outcomes().values().cloned());
    }
}

/// Remembers every requested pause instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    /// Requested pauses, in order
    pub pauses: Arc<Mutex<Vec<Duration>>>,
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}
