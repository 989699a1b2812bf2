//! The occupancy grid.
//!
//! [`Battlefield`] owns the mapping from coordinate to occupant and its
//! inverse. Both directions are updated together inside [`Battlefield::set`],
//! which is the only way to change where an occupant stands.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::BattlefieldError;
use crate::place::{Direction, Place};

/// Largest width or height a battlefield may have.
///
/// Keeps every in-range coordinate representable as `i32`.
pub const MAX_SIDE: u32 = i32::MAX as u32;

/// Largest number of places a battlefield may have.
///
/// The grid is stored densely and copied into every decision snapshot.
pub const MAX_CELLS: u64 = 1 << 16;

// =============================================================================
// Slot
// =============================================================================

/// Occupancy state of a single place, as returned by [`Battlefield::place_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<T> {
    /// The coordinate
    pub place: Place,
    /// Who stands there, if anyone
    pub occupant: Option<T>,
}

impl<T> Slot<T> {
    /// True if nobody stands on this place.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

// =============================================================================
// Battlefield
// =============================================================================

/// Fixed-size grid of places, each holding at most one occupant.
///
/// # Invariants
///
/// - An occupant appears on at most one place, and a place holds at most one
///   occupant.
/// - No occupant is ever recorded outside `[0, width) x [0, height)`.
///
/// # Example
///
/// ```
/// use battlefield::{Battlefield, BattlefieldError, Place};
///
/// let mut field: Battlefield<char> = Battlefield::new(3, 3).unwrap();
/// field.set('a', 0, 0).unwrap();
/// field.set('a', 1, 0).unwrap();
/// assert!(field.place_at(0, 0).unwrap().is_empty());
///
/// field.set('b', 2, 2).unwrap();
/// assert_eq!(
///     field.set('a', 2, 2),
///     Err(BattlefieldError::Occupied { x: 2, y: 2 })
/// );
/// assert_eq!(field.place_of('a'), Some(Place::new(1, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battlefield<T> {
    width: u32,
    height: u32,
    /// Row-major cells, `y * width + x`.
    cells: Vec<Option<T>>,
    /// Inverse lookup, kept in sync with `cells`.
    places: BTreeMap<T, Place>,
}

impl<T: Copy + Ord> Battlefield<T> {
    /// Allocates an empty grid.
    ///
    /// # Errors
    ///
    /// - [`BattlefieldError::InvalidSize`] if either side is zero or exceeds
    ///   [`MAX_SIDE`].
    /// - [`BattlefieldError::TooLarge`] if the grid has more than
    ///   [`MAX_CELLS`] places.
    pub fn new(width: u32, height: u32) -> Result<Self, BattlefieldError> {
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(BattlefieldError::InvalidSize { width, height });
        }
        if u64::from(width) * u64::from(height) > MAX_CELLS {
            return Err(BattlefieldError::TooLarge { width, height });
        }
        let capacity = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            cells: vec![None; capacity],
            places: BTreeMap::new(),
        })
    }

    /// Grid width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of places.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of places holding an occupant.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.places.len()
    }

    /// Number of empty places.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.occupied_count()
    }

    /// True iff `(x, y)` lies outside `[0, width) x [0, height)`.
    #[must_use]
    pub fn is_out_of_range(&self, x: i32, y: i32) -> bool {
        x < 0 || y < 0 || i64::from(x) >= i64::from(self.width) || i64::from(y) >= i64::from(self.height)
    }

    /// Occupancy state of the place at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`BattlefieldError::OutOfRange`] for coordinates off the grid.
    pub fn place_at(&self, x: i32, y: i32) -> Result<Slot<T>, BattlefieldError> {
        let index = self.index(x, y).ok_or_else(|| self.out_of_range(x, y))?;
        Ok(Slot {
            place: Place::new(x, y),
            occupant: self.cells[index],
        })
    }

    /// Who stands on `place`, if it is in range and occupied.
    #[must_use]
    pub fn occupant_at(&self, place: Place) -> Option<T> {
        self.index(place.x(), place.y())
            .and_then(|index| self.cells[index])
    }

    /// True if `place` is in range and empty.
    #[must_use]
    pub fn is_free(&self, place: Place) -> bool {
        self.index(place.x(), place.y())
            .is_some_and(|index| self.cells[index].is_none())
    }

    /// Moves `occupant` to `(x, y)`, vacating its previous place.
    ///
    /// Setting an occupant onto the place it already holds is a no-op.
    ///
    /// # Errors
    ///
    /// - [`BattlefieldError::OutOfRange`] if the target is off the grid.
    /// - [`BattlefieldError::Occupied`] if a different occupant stands there.
    ///
    /// On error the grid is unchanged.
    pub fn set(&mut self, occupant: T, x: i32, y: i32) -> Result<Place, BattlefieldError> {
        let index = self.index(x, y).ok_or_else(|| self.out_of_range(x, y))?;
        if matches!(self.cells[index], Some(current) if current != occupant) {
            return Err(BattlefieldError::Occupied { x, y });
        }

        let place = Place::new(x, y);
        if let Some(previous) = self.places.insert(occupant, place) {
            if previous != place {
                if let Some(previous_index) = self.index(previous.x(), previous.y()) {
                    self.cells[previous_index] = None;
                }
            }
        }
        self.cells[index] = Some(occupant);
        Ok(place)
    }

    /// Places every occupant on a distinct, uniformly random free place.
    ///
    /// # Errors
    ///
    /// Returns [`BattlefieldError::Capacity`] without touching the grid if
    /// there are fewer free places than occupants.
    pub fn set_randomly<R: Rng + ?Sized>(
        &mut self,
        occupants: &[T],
        rng: &mut R,
    ) -> Result<(), BattlefieldError> {
        let free: Vec<Place> = self.free_places().collect();
        if occupants.len() > free.len() {
            return Err(BattlefieldError::Capacity {
                requested: occupants.len(),
                available: free.len(),
            });
        }

        let chosen: Vec<Place> = free
            .choose_multiple(rng, occupants.len())
            .copied()
            .collect();
        for (occupant, place) in occupants.iter().zip(chosen) {
            self.set(*occupant, place.x(), place.y())?;
        }
        Ok(())
    }

    /// Current place of `occupant`, or `None` if it was never placed.
    #[must_use]
    pub fn place_of(&self, occupant: T) -> Option<Place> {
        self.places.get(&occupant).copied()
    }

    /// Empty in-range neighbours of `place`, in [`Direction::NEIGHBOR_ORDER`].
    #[must_use]
    pub fn free_neighbors(&self, place: Place) -> Vec<Place> {
        Direction::NEIGHBOR_ORDER
            .into_iter()
            .map(|direction| place.step(direction))
            .filter(|candidate| self.is_free(*candidate))
            .collect()
    }

    /// Occupants with their places, ordered by occupant.
    pub fn occupants(&self) -> impl Iterator<Item = (T, Place)> + '_ {
        self.places.iter().map(|(occupant, place)| (*occupant, *place))
    }

    /// Empty places in row-major order.
    pub fn free_places(&self) -> impl Iterator<Item = Place> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| self.place_of_index(index))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_out_of_range(x, y) {
            return None;
        }
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        Some(y * self.width as usize + x)
    }

    // Sides are bounded by MAX_SIDE at construction, so both halves fit in i32.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn place_of_index(&self, index: usize) -> Place {
        let width = self.width as usize;
        Place::new((index % width) as i32, (index / width) as i32)
    }

    fn out_of_range(&self, x: i32, y: i32) -> BattlefieldError {
        BattlefieldError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
