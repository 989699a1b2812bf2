//! Waits between turns and rounds.
//!
//! Pacing exists for people watching a match. It never affects resolution,
//! and headless runs use [`NoPacing`].

use std::thread;
use std::time::Duration;

/// Something that can wait.
pub trait Pacer: Send {
    /// Blocks for about `duration`.
    fn pause(&self, duration: Duration);
}

/// Waits by sleeping the driver thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&self, _duration: Duration) {}
}

/// Wait after a turn with `living` survivors.
///
/// The full `base` delay is split by the number of survivors and one share
/// is taken off, so crowded battlefields move along faster per bot.
///
/// ```
/// use std::time::Duration;
/// use skirmish_core::pacing::next_turn_delay;
///
/// let base = Duration::from_millis(1000);
/// assert_eq!(next_turn_delay(base, 2), Duration::from_millis(500));
/// assert_eq!(next_turn_delay(base, 4), Duration::from_millis(750));
/// ```
#[must_use]
pub fn next_turn_delay(base: Duration, living: usize) -> Duration {
    if living == 0 {
        return base;
    }
    let living = u32::try_from(living).unwrap_or(u32::MAX);
    base - base / living
}
