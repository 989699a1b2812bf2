//! Errors raised by grid operations.

use thiserror::Error;

use crate::grid::{MAX_CELLS, MAX_SIDE};

/// Reasons a battlefield operation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattlefieldError {
    /// A side of the grid is zero or larger than [`MAX_SIDE`].
    #[error("battlefield size {width}x{height} is invalid: both sides must be between 1 and {max}", max = MAX_SIDE)]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// The grid would have more than [`MAX_CELLS`] places.
    #[error("battlefield size {width}x{height} exceeds {max} places", max = MAX_CELLS)]
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// The coordinate lies outside the grid.
    #[error("place ({x}, {y}) is out of range for a {width}x{height} battlefield")]
    OutOfRange {
        /// Requested x
        x: i32,
        /// Requested y
        y: i32,
        /// Grid width
        width: u32,
        /// Grid height
        height: u32,
    },

    /// The place already holds a different occupant.
    #[error("place ({x}, {y}) is already occupied")]
    Occupied {
        /// Requested x
        x: i32,
        /// Requested y
        y: i32,
    },

    /// Random placement asked for more places than are free.
    #[error("cannot place {requested} occupants: only {available} free places")]
    Capacity {
        /// Number of occupants to place
        requested: usize,
        /// Number of free places on the grid
        available: usize,
    },
}
