pub mod cell;
pub mod resources;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Euclidean modulo: always lands in `[0, dimension)`.
pub fn wrap(coord: i32, dimension: i32) -> i32 {
    coord.rem_euclid(dimension)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: i32, height: i32) -> Self {
        Self {
            x: rng.gen_range(0..width),
            y: rng.gen_range(0..height),
        }
    }

    /// The neighbouring cell in `direction`, wrapped onto the torus.
    pub fn offset(self, direction: Direction, width: i32, height: i32) -> Self {
        let (dx, dy) = direction.to_delta();
        Self {
            x: wrap(self.x + dx, width),
            y: wrap(self.y + dy, height),
        }
    }

    pub fn is_within(self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

/// Facing of an agent. Discriminants are the persisted values and turning
/// works modulo 4 on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
        }
    }

    pub fn turned_left(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % 4]
    }

    pub fn turned_right(self) -> Self {
        Self::ALL[(self.index() as usize + 3) % 4]
    }
}
