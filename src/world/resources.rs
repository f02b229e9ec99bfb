use super::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub pos: Position,
    pub quantity: i32,
}

impl Food {
    pub fn new(pos: Position, quantity: i32) -> Self {
        Self { pos, quantity }
    }

    /// Depleted food keeps its slot but is invisible to sensing and eating.
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Takes one unit. Returns false if nothing was left.
    pub fn consume_unit(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }
        self.quantity -= 1;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub pos: Position,
}

impl Wall {
    pub fn new(pos: Position) -> Self {
        Self { pos }
    }
}
