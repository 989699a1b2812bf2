//! # Battlefield
//!
//! Bounded two-dimensional grid on which combatants stand.
//!
//! The grid is the single owner of occupancy: every place holds at most one
//! occupant, and every change of position goes through [`Battlefield::set`].
//! Coordinates outside `[0, width) x [0, height)` are out of range and can
//! never be occupied.
//!
//! The occupant type is a generic key (`Copy + Ord`), so the grid stays
//! independent of whatever it is positioning.
//!
//! ## Quick Start
//!
//! ```
//! use battlefield::{Battlefield, Direction, Place};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut field: Battlefield<u32> = Battlefield::new(10, 10).unwrap();
//! field.set(7, 2, 3).unwrap();
//! assert_eq!(field.place_of(7), Some(Place::new(2, 3)));
//!
//! let next = Place::new(2, 3).step(Direction::North);
//! assert_eq!(next, Place::new(2, 4));
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//! field.set_randomly(&[1, 2, 3], &mut rng).unwrap();
//! assert_eq!(field.occupied_count(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod grid;
pub mod place;

// Re-exports for convenience
pub use error::BattlefieldError;
pub use grid::{Battlefield, Slot, MAX_CELLS, MAX_SIDE};
pub use place::{Direction, Place};
