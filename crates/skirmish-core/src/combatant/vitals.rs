//! Bounded resource gauges.

use serde::{Deserialize, Serialize};

/// A value bounded to `0..=max`.
///
/// Every mutation saturates, so no sequence of drains and fills can move the
/// value outside its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gauge {
    current: u32,
    max: u32,
}

impl Gauge {
    /// A gauge filled to `max`.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// A gauge at `current`, clamped to `max`.
    #[must_use]
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// True at the upper bound.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// True at zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Room left before the gauge is full.
    #[must_use]
    pub const fn headroom(&self) -> u32 {
        self.max - self.current
    }

    /// Removes up to `amount`, returning how much was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount`, returning how much was actually added.
    pub fn fill(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.headroom());
        self.current += added;
        added
    }

    /// Sets the value to zero.
    pub fn empty(&mut self) {
        self.current = 0;
    }
}

/// Health, shield and energy of one combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Hit points. Zero means destroyed.
    pub health: Gauge,
    /// Absorbs damage before health does.
    pub shield: Gauge,
    /// Spent on actions.
    pub energy: Gauge,
}

impl Vitals {
    /// All three gauges full.
    #[must_use]
    pub const fn full(max_health: u32, max_shield: u32, max_energy: u32) -> Self {
        Self {
            health: Gauge::full(max_health),
            shield: Gauge::full(max_shield),
            energy: Gauge::full(max_energy),
        }
    }

    /// Applies `damage`, shield first.
    ///
    /// Returns `(absorbed_by_shield, taken_by_health)`.
    pub fn absorb(&mut self, damage: u32) -> (u32, u32) {
        let absorbed = self.shield.drain(damage);
        let taken = self.health.drain(damage - absorbed);
        (absorbed, taken)
    }
}
