//! End-to-end tests of matches, rounds and turns.
//!
//! These drive the public surface the way a host application would:
//! - Scores and termination rules of rounds
//! - Lifecycle events in order
//! - Bot malfunctions isolated to the offending bot
//! - Pacing and cancellation

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use battlefield::{Battlefield, Direction, Place};

use crate::action::Action;
use crate::arena::Arena;
use crate::cancel::CancelToken;
use crate::combatant::{Cause, CombatantId, Vitals};
use crate::decision::{BotLogic, DecisionPolicy};
use crate::error::ArenaError;
use crate::matches::Match;
use crate::observer::ArenaObserver;
use crate::resolve::ActionResolver;
use crate::round::{Round, RoundResult};
use crate::settings::{DecisionScheduling, Settings};
use crate::standings::Standings;
use crate::turn::Turn;

use super::helpers::{
    failing_bot, hunter_bot, idle_bot, init_tracing, panicking_bot, silent_bot, slow_bot,
    test_settings, EventLog, RecordingPacer, ScriptedBot,
};

// =============================================================================
// Rounds
// =============================================================================

#[test]
fn score_per_combatant_regardless_of_survival() {
    init_tracing();
    let settings = test_settings()
        .with_battlefield(4, 4)
        .with_vitals(20, 0, 100)
        .with_turns(100);
    let entrants = vec![hunter_bot("H1"), hunter_bot("H2"), idle_bot("I1"), idle_bot("I2")];

    let report = Match::new(settings, entrants).unwrap().run().unwrap();

    let round = &report.rounds[0];
    assert_eq!(round.scores.len(), 4);
    let kills: u32 = round.scores.iter().map(|s| s.kills).sum();
    let deaths: u32 = round.scores.iter().map(|s| s.deaths).sum();
    assert_eq!(kills, deaths);
    assert!(deaths >= 2);
}

#[test]
fn round_ends_when_one_survivor_remains() {
    let settings = test_settings()
        .with_battlefield(3, 3)
        .with_vitals(20, 0, 100)
        .with_turns(100);

    let report = Match::new(settings, vec![hunter_bot("Hunter"), idle_bot("Sitter")])
        .unwrap()
        .run()
        .unwrap();

    let round = &report.rounds[0];
    assert!(round.turns_played < 100);
    assert_eq!(round.winner(), Some("Hunter"));
    assert_eq!(round.survivors, vec!["Hunter".to_owned()]);
}

#[test]
fn round_without_eliminations_plays_every_turn() {
    let log = Arc::new(Mutex::new(EventLog::default()));
    let settings = test_settings().with_turns(7);

    let report = Match::new(settings, vec![idle_bot("A"), idle_bot("B"), idle_bot("C")])
        .unwrap()
        .with_observer(Arc::clone(&log))
        .run()
        .unwrap();

    assert_eq!(report.rounds[0].turns_played, 7);
    assert_eq!(report.rounds[0].survivors.len(), 3);
    assert_eq!(report.rounds[0].winner(), None);
    let finished_turns = log
        .lock()
        .unwrap()
        .events
        .iter()
        .filter(|e| e.ends_with("finished") && e.starts_with("turn"))
        .count();
    assert_eq!(finished_turns, 7);
}

#[test]
fn mutual_destruction_leaves_no_winner() {
    let mut arena = Arena::new(Battlefield::new(5, 5).unwrap());
    let west = [Action::Move(Direction::West)];
    let a = arena.enlist(Arc::new(ScriptedBot::new("Lemming1", west)), Vitals::full(10, 0, 10));
    let b = arena.enlist(Arc::new(ScriptedBot::new("Lemming2", west)), Vitals::full(10, 0, 10));
    arena.relocate(a, Place::new(0, 1)).unwrap();
    arena.relocate(b, Place::new(0, 3)).unwrap();

    let mut turn = Turn::new(1);
    turn.run(
        &mut arena,
        &ActionResolver::default(),
        DecisionPolicy::from(&test_settings()),
    );

    assert_eq!(arena.living_count(), 0);
    assert!(arena
        .combatants()
        .all(|c| c.destroyed_by == Some(Cause::ForceField) && c.deaths == 1));
    assert_eq!(turn.casualties().len(), 2);
    assert_eq!(turn.outcome(a), Some("Lemming1 moved into force field and exploded."));
}

// =============================================================================
// Lifecycle events
// =============================================================================

#[test]
fn lifecycle_events_arrive_in_order() {
    let log = Arc::new(Mutex::new(EventLog::default()));
    let settings = test_settings().with_rounds(2).with_turns(2);

    Match::new(settings, vec![idle_bot("A"), idle_bot("B")])
        .unwrap()
        .with_observer(Arc::clone(&log))
        .run()
        .unwrap();

    let expected = [
        "match starting",
        "round 1 starting",
        "turn 1 starting",
        "turn 1 finished",
        "turn 2 starting",
        "turn 2 finished",
        "round 1 finished after 2 turns",
        "round 2 starting",
        "turn 1 starting",
        "turn 1 finished",
        "turn 2 starting",
        "turn 2 finished",
        "round 2 finished after 2 turns",
        "match finished after 2 rounds",
    ];
    assert_eq!(log.lock().unwrap().events, expected);
}

#[test]
fn turn_finished_sees_post_turn_state() {
    struct EnergyTrace(Vec<u32>);

    impl ArenaObserver for EnergyTrace {
        fn on_turn_finished(&mut self, round: &Round, _turn: &Turn) {
            let energy = round.arena().combatants().next().unwrap().vitals.energy.current();
            self.0.push(energy);
        }
    }

    let trace = Arc::new(Mutex::new(EnergyTrace(Vec::new())));
    let settings = test_settings().with_turns(3).with_vitals(10, 0, 100);
    let missing = CombatantId::new(99);
    let swinger: Arc<dyn BotLogic> = Arc::new(ScriptedBot::new(
        "Swinger",
        [Action::Attack(missing), Action::Attack(missing), Action::Idle],
    ));

    Match::new(settings, vec![swinger, idle_bot("B")])
        .unwrap()
        .with_observer(Arc::clone(&trace))
        .run()
        .unwrap();

    // Swinging at nobody still costs energy.
    assert_eq!(trace.lock().unwrap().0, vec![90, 80, 80]);
}

#[test]
fn standings_aggregate_round_results() {
    let standings = Arc::new(Mutex::new(Standings::default()));
    let settings = test_settings()
        .with_rounds(3)
        .with_battlefield(3, 3)
        .with_vitals(20, 0, 100)
        .with_turns(100);

    let report = Match::new(settings, vec![hunter_bot("Hunter"), idle_bot("Sitter")])
        .unwrap()
        .with_observer(Arc::clone(&standings))
        .run()
        .unwrap();

    let standings = standings.lock().unwrap();
    assert_eq!(standings.rounds(), 3);
    let hunter = standings.tally("Hunter").unwrap();
    assert_eq!(hunter.wins, 3);
    assert_eq!(hunter.kills, 3);
    assert_eq!(standings.tally("Sitter").unwrap().deaths, 3);
    assert_eq!(standings.ranked()[0].0, "Hunter");
    assert_eq!(report.winners(), vec![Some("Hunter"); 3]);
}

// =============================================================================
// Malfunctions
// =============================================================================

#[test]
fn slow_bot_is_destroyed_without_stalling_the_turn() {
    let log = Arc::new(Mutex::new(EventLog::default()));
    let settings = test_settings()
        .with_turns(3)
        .with_decision_budget(Duration::from_millis(100));
    let entrants = vec![
        slow_bot("Sloth", Duration::from_secs(3)),
        idle_bot("Quick1"),
        idle_bot("Quick2"),
    ];

    let start = Instant::now();
    let report = Match::new(settings, entrants)
        .unwrap()
        .with_observer(Arc::clone(&log))
        .run()
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(2));
    let round = &report.rounds[0];
    assert_eq!(round.turns_played, 3);
    assert_eq!(round.survivors, vec!["Quick1".to_owned(), "Quick2".to_owned()]);
    let log = log.lock().unwrap();
    assert_eq!(log.outcomes[0], "Sloth is destroyed by system malfunction.");
    assert_eq!(log.outcomes[1], "Quick1 is idle.");
}

#[test]
fn every_kind_of_malfunction_destroys_only_its_bot() {
    let settings = test_settings().with_turns(5);
    let entrants = vec![
        panicking_bot("Panicky"),
        failing_bot("Faulty"),
        silent_bot("Silent"),
        idle_bot("Steady"),
    ];

    let report = Match::new(settings, entrants).unwrap().run().unwrap();

    let round = &report.rounds[0];
    assert_eq!(round.turns_played, 1);
    assert_eq!(round.winner(), Some("Steady"));
    for score in &round.scores {
        let expected_deaths = u32::from(score.bot_name != "Steady");
        assert_eq!(score.deaths, expected_deaths, "{}", score.bot_name);
        assert_eq!(score.kills, 0);
    }
}

#[test]
fn concurrent_scheduling_plays_full_match() {
    let settings = test_settings()
        .with_rounds(2)
        .with_battlefield(4, 4)
        .with_vitals(20, 0, 100)
        .with_turns(60)
        .with_scheduling(DecisionScheduling::Concurrent);
    let entrants = vec![
        hunter_bot("H1"),
        hunter_bot("H2"),
        slow_bot("Sloth", Duration::from_secs(2)),
        idle_bot("Idle"),
    ];

    let start = Instant::now();
    let report = Match::new(settings, entrants).unwrap().run().unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    for round in &report.rounds {
        assert_eq!(round.scores.len(), 4);
        let sloth = round.scores.iter().find(|s| s.bot_name == "Sloth").unwrap();
        assert_eq!(sloth.deaths, 1);
    }
}

// =============================================================================
// Pacing
// =============================================================================

#[test]
fn pacing_follows_survivors_and_skips_final_waits() {
    let pacer = RecordingPacer::default();
    let pauses = Arc::clone(&pacer.pauses);
    let settings = Settings {
        next_turn_delay: Duration::from_millis(900),
        next_round_delay: Duration::from_secs(5),
        ..test_settings().with_rounds(2).with_turns(2)
    };

    Match::new(settings, vec![idle_bot("A"), idle_bot("B"), idle_bot("C")])
        .unwrap()
        .with_pacer(pacer)
        .run()
        .unwrap();

    assert_eq!(
        *pauses.lock().unwrap(),
        vec![
            Duration::from_millis(600),
            Duration::from_secs(5),
            Duration::from_millis(600),
        ]
    );
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cancels the match once `after_rounds` rounds have finished.
struct CancelAfterRounds {
    token: CancelToken,
    after_rounds: u32,
}

impl ArenaObserver for CancelAfterRounds {
    fn on_round_finished(&mut self, round: &Round, _result: &RoundResult) {
        if round.number() >= self.after_rounds {
            self.token.cancel();
        }
    }
}

/// Cancels the match after the given turn of the first round.
struct CancelAtTurn {
    token: CancelToken,
    turn: u32,
}

impl ArenaObserver for CancelAtTurn {
    fn on_turn_finished(&mut self, _round: &Round, turn: &Turn) {
        if turn.number() == self.turn {
            self.token.cancel();
        }
    }
}

#[test]
fn cancel_between_rounds_keeps_committed_results() {
    let settings = test_settings().with_rounds(5).with_turns(3);
    let arena_match = Match::new(settings, vec![idle_bot("A"), idle_bot("B")]).unwrap();
    let token = arena_match.cancel_token();
    let mut arena_match = arena_match.with_observer(CancelAfterRounds {
        token,
        after_rounds: 2,
    });

    let err = arena_match.run().unwrap_err();

    assert!(matches!(err, ArenaError::Cancelled { completed_rounds: 2 }));
    assert_eq!(arena_match.results().len(), 2);
    assert!(arena_match.results().iter().all(|r| r.turns_played == 3));
}

#[test]
fn cancel_mid_round_discards_the_round() {
    let log = Arc::new(Mutex::new(EventLog::default()));
    let settings = test_settings().with_rounds(3).with_turns(10);
    let arena_match = Match::new(settings, vec![idle_bot("A"), idle_bot("B")]).unwrap();
    let token = arena_match.cancel_token();
    let mut arena_match = arena_match
        .with_observer(CancelAtTurn { token, turn: 2 })
        .with_observer(Arc::clone(&log));

    let err = arena_match.run().unwrap_err();

    assert!(matches!(err, ArenaError::Cancelled { completed_rounds: 0 }));
    assert!(arena_match.results().is_empty());
    let log = log.lock().unwrap();
    assert_eq!(log.events.last().map(String::as_str), Some("turn 2 finished"));
    assert!(!log.events.iter().any(|e| e.starts_with("round 1 finished")));
}
