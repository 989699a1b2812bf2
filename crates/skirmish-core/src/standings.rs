//! Cumulative standings across the rounds of a match.
//!
//! The match itself only reports per-round results; aggregating them is an
//! observer's job. [`Standings`] is the stock one.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use skirmish_core::action::Action;
//! use skirmish_core::decision::{BotLogic, FnBot};
//! use skirmish_core::matches::Match;
//! use skirmish_core::settings::Settings;
//! use skirmish_core::standings::Standings;
//!
//! let bot = |name: &str| -> Arc<dyn BotLogic> {
//!     Arc::new(FnBot::new(name, |_, _, _| Ok(Some(Action::Idle))))
//! };
//! let standings = Arc::new(Mutex::new(Standings::default()));
//!
//! Match::new(Settings::headless().with_rounds(3).with_turns(2), vec![bot("A"), bot("B")])
//!     .unwrap()
//!     .with_observer(Arc::clone(&standings))
//!     .run()
//!     .unwrap();
//!
//! let standings = standings.lock().unwrap();
//! assert_eq!(standings.rounds(), 3);
//! assert_eq!(standings.ranked().len(), 2);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::observer::ArenaObserver;
use crate::round::{Round, RoundResult};

/// Running totals for one bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Combatants destroyed
    pub kills: u32,
    /// Times destroyed
    pub deaths: u32,
    /// Rounds won as sole survivor
    pub wins: u32,
}

/// Observer that accumulates kills, deaths and wins per bot name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    tallies: BTreeMap<String, Tally>,
    rounds: u32,
}

impl Standings {
    /// Adds one round's result.
    pub fn record(&mut self, result: &RoundResult) {
        for score in &result.scores {
            let tally = self.tallies.entry(score.bot_name.clone()).or_default();
            tally.kills += score.kills;
            tally.deaths += score.deaths;
        }
        if let Some(winner) = result.winner() {
            self.tallies.entry(winner.to_owned()).or_default().wins += 1;
        }
        self.rounds += 1;
    }

    /// Rounds recorded so far.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Totals of one bot.
    #[must_use]
    pub fn tally(&self, bot_name: &str) -> Option<Tally> {
        self.tallies.get(bot_name).copied()
    }

    /// Bots ordered by kills, most first; ties by name.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, Tally)> {
        let mut ranked: Vec<(&str, Tally)> = self
            .tallies
            .iter()
            .map(|(name, tally)| (name.as_str(), *tally))
            .collect();
        ranked.sort_by(|a, b| b.1.kills.cmp(&a.1.kills).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl ArenaObserver for Standings {
    fn on_round_finished(&mut self, _round: &Round, result: &RoundResult) {
        self.record(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Score;

    fn result(scores: &[(&str, u32, u32)], survivors: &[&str]) -> RoundResult {
        RoundResult {
            number: 1,
            turns_played: 10,
            scores: scores
                .iter()
                .map(|(name, kills, deaths)| Score {
                    bot_name: (*name).to_owned(),
                    kills: *kills,
                    deaths: *deaths,
                })
                .collect(),
            survivors: survivors.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn accumulates_across_rounds() {
        let mut standings = Standings::default();
        standings.record(&result(&[("A", 1, 0), ("B", 0, 1)], &["A"]));
        standings.record(&result(&[("A", 0, 1), ("B", 1, 0)], &["B"]));
        standings.record(&result(&[("A", 2, 0), ("B", 0, 1)], &["A"]));

        assert_eq!(
            standings.tally("A"),
            Some(Tally {
                kills: 3,
                deaths: 1,
                wins: 2
            })
        );
        assert_eq!(standings.tally("B").unwrap().wins, 1);
        assert_eq!(standings.rounds(), 3);
    }

    #[test]
    fn draws_award_no_win() {
        let mut standings = Standings::default();
        standings.record(&result(&[("A", 1, 1), ("B", 1, 1)], &[]));
        assert_eq!(standings.tally("A").unwrap().wins, 0);
        assert_eq!(standings.tally("B").unwrap().wins, 0);
    }

    #[test]
    fn ranked_by_kills_then_name() {
        let mut standings = Standings::default();
        standings.record(&result(&[("C", 1, 0), ("A", 1, 0), ("B", 4, 0)], &[]));

        let names: Vec<&str> = standings.ranked().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }
}
