//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Unique identifier for an animal.
///
/// Issued sequentially by the world, so a lower id always means an earlier
/// birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnimalId(pub u64);

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Componentwise minimum
    pub fn min(&self, other: Position) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
        }
    }

    /// Componentwise maximum
    pub fn max(&self, other: Position) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }

    /// True if `lower <= self <= upper` on both axes
    pub fn within(&self, lower: Position, upper: Position) -> bool {
        self.x >= lower.x && self.x <= upper.x && self.y >= lower.y && self.y <= upper.y
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: ((self.x % width) + width) % width,
            y: ((self.y % height) + height) % height,
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Position {
        Position::new(-self.x, -self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass direction an animal can face, in clockwise order starting at north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const COUNT: usize = 8;

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ]
    }

    /// Position in the clockwise cycle, `North == 0`
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Direction at `index` in the clockwise cycle, modulo 8
    pub fn from_index(index: usize) -> Self {
        Self::all()[index % Self::COUNT]
    }

    /// Rotate by `steps` 45° increments; positive is clockwise.
    pub fn rotate(&self, steps: i32) -> Self {
        let count = Self::COUNT as i32;
        let index = ((self.index() as i32 + steps) % count + count) % count;
        Self::from_index(index as usize)
    }

    /// `num` steps clockwise
    pub fn next(&self, num: u32) -> Self {
        self.rotate((num % Self::COUNT as u32) as i32)
    }

    /// `num` steps counter-clockwise
    pub fn previous(&self, num: u32) -> Self {
        self.rotate(-((num % Self::COUNT as u32) as i32))
    }

    /// Unit step for this direction. North points toward increasing `y`.
    pub fn to_unit_vector(&self) -> Position {
        match self {
            Direction::North => Position::new(0, 1),
            Direction::NorthEast => Position::new(1, 1),
            Direction::East => Position::new(1, 0),
            Direction::SouthEast => Position::new(1, -1),
            Direction::South => Position::new(0, -1),
            Direction::SouthWest => Position::new(-1, -1),
            Direction::West => Position::new(-1, 0),
            Direction::NorthWest => Position::new(-1, 1),
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Terrain of a cell, fixed when the map is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Fertile region in the middle of the map
    Jungle,
    Steppe,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_position_wrap() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.wrap(10, 10), Position::new(5, 5));

        let pos = Position::new(-1, -1);
        assert_eq!(pos.wrap(10, 10), Position::new(9, 9));

        let pos = Position::new(10, 10);
        assert_eq!(pos.wrap(10, 10), Position::new(0, 0));

        let pos = Position::new(-21, 33);
        assert_eq!(pos.wrap(10, 10), Position::new(9, 3));
    }

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(2, 7);
        let b = Position::new(5, -3);
        assert_eq!(a + b, Position::new(7, 4));
        assert_eq!(a - b, Position::new(-3, 10));
        assert_eq!(-a, Position::new(-2, -7));
        assert_eq!(a.min(b), Position::new(2, -3));
        assert_eq!(a.max(b), Position::new(5, 7));
    }

    #[test]
    fn test_position_within() {
        let lower = Position::new(3, 3);
        let upper = Position::new(6, 6);
        assert!(Position::new(3, 6).within(lower, upper));
        assert!(!Position::new(2, 4).within(lower, upper));
        assert!(!Position::new(4, 7).within(lower, upper));
    }

    #[test]
    fn test_direction_rotation() {
        assert_eq!(Direction::North.next(1), Direction::NorthEast);
        assert_eq!(Direction::North.next(2), Direction::East);
        assert_eq!(Direction::North.previous(1), Direction::NorthWest);
        assert_eq!(Direction::West.next(3), Direction::NorthEast);
        assert_eq!(Direction::East.previous(3), Direction::NorthWest);
        assert_eq!(Direction::South.rotate(-10), Direction::East);
        assert_eq!(Direction::SouthWest.next(8), Direction::SouthWest);
    }

    #[test]
    fn test_direction_unit_vectors() {
        assert_eq!(Direction::North.to_unit_vector(), Position::new(0, 1));
        assert_eq!(Direction::East.to_unit_vector(), Position::new(1, 0));
        assert_eq!(Direction::South.to_unit_vector(), Position::new(0, -1));
        assert_eq!(Direction::West.to_unit_vector(), Position::new(-1, 0));

        for direction in Direction::all() {
            let opposite = direction.rotate(4);
            assert_eq!(direction.to_unit_vector(), -opposite.to_unit_vector());
        }
    }

    proptest! {
        #[test]
        fn wrap_stays_inside(x in -10_000i32..10_000, y in -10_000i32..10_000, w in 1i32..200, h in 1i32..200) {
            let wrapped = Position::new(x, y).wrap(w, h);
            prop_assert!(wrapped.x >= 0 && wrapped.x < w);
            prop_assert!(wrapped.y >= 0 && wrapped.y < h);
        }

        #[test]
        fn rotation_is_modular(start in 0usize..8, steps in -64i32..64) {
            let direction = Direction::from_index(start);
            let expected = ((start as i32 + steps).rem_euclid(8)) as usize;
            prop_assert_eq!(direction.rotate(steps).index(), expected);
            prop_assert_eq!(direction.rotate(steps).rotate(-steps), direction);
        }
    }
}
