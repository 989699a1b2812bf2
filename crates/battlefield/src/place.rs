//! Grid coordinates and compass directions.
//!
//! `North` increases `y`, `East` increases `x`. Distances are Euclidean and
//! computed in `f64` so that range checks on integer grids are exact for the
//! distances that matter (whole numbers and small square roots).

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An integer coordinate on the battlefield.
///
/// `Place` is an immutable value; it says nothing about whether the
/// coordinate is inside a particular grid or who stands on it.
///
/// # Example
///
/// ```
/// use battlefield::Place;
///
/// let a = Place::new(0, 0);
/// let b = Place::new(3, 4);
/// assert_eq!(a.distance_to(b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place(IVec2);

impl Place {
    /// Creates a place from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// Euclidean distance to another place.
    #[must_use]
    pub fn distance_to(self, other: Place) -> f64 {
        self.0.as_dvec2().distance(other.0.as_dvec2())
    }

    /// The adjacent place one step in `direction`.
    ///
    /// The result may lie outside any particular grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Place {
        Self(self.0 + direction.offset())
    }

    /// The direction leading from `self` to an adjacent `other`.
    ///
    /// Returns `None` when the places coincide or are not neighbours.
    #[must_use]
    pub fn direction_to(self, other: Place) -> Option<Direction> {
        Direction::from_offset(other.0 - self.0)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.x, self.0.y)
    }
}

impl From<(i32, i32)> for Place {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<IVec2> for Place {
    fn from(v: IVec2) -> Self {
        Self(v)
    }
}

/// One of the eight compass directions a combatant can step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `y + 1`
    North,
    /// `x + 1, y + 1`
    NorthEast,
    /// `x + 1`
    East,
    /// `x + 1, y - 1`
    SouthEast,
    /// `y - 1`
    South,
    /// `x - 1, y - 1`
    SouthWest,
    /// `x - 1`
    West,
    /// `x - 1, y + 1`
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Order in which neighbouring places are offered as movement
    /// candidates. Ties between equally good candidates go to the earlier one.
    pub const NEIGHBOR_ORDER: [Direction; 8] = [
        Direction::West,
        Direction::East,
        Direction::South,
        Direction::North,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Unit offset of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Self::North => IVec2::new(0, 1),
            Self::NorthEast => IVec2::new(1, 1),
            Self::East => IVec2::new(1, 0),
            Self::SouthEast => IVec2::new(1, -1),
            Self::South => IVec2::new(0, -1),
            Self::SouthWest => IVec2::new(-1, -1),
            Self::West => IVec2::new(-1, 0),
            Self::NorthWest => IVec2::new(-1, 1),
        }
    }

    /// The direction whose unit offset equals `offset`, if any.
    #[must_use]
    pub fn from_offset(offset: IVec2) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.offset() == offset)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::NorthEast => "NorthEast",
            Self::East => "East",
            Self::SouthEast => "SouthEast",
            Self::South => "South",
            Self::SouthWest => "SouthWest",
            Self::West => "West",
            Self::NorthWest => "NorthWest",
        };
        f.write_str(name)
    }
}
