use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an agent sees in the cell directly ahead of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Nothing = 0,
    Agent = 1,
    Food = 2,
    Wall = 3,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Nothing,
        Environment::Agent,
        Environment::Food,
        Environment::Wall,
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
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Nothing => "nothing",
            Environment::Agent => "agent",
            Environment::Food => "food",
            Environment::Wall => "wall",
        };
        f.write_str(name)
    }
}
