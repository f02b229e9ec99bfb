use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of things an agent can do in one tick. `Step` covers
/// eating and attacking depending on what is ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentAction {
    Nothing = 0,
    Step = 1,
    TurnLeft = 2,
    TurnRight = 3,
}

impl AgentAction {
    pub const ALL: [AgentAction; 4] = [
        AgentAction::Nothing,
        AgentAction::Step,
        AgentAction::TurnLeft,
        AgentAction::TurnRight,
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

impl fmt::Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentAction::Nothing => "nothing",
            AgentAction::Step => "step",
            AgentAction::TurnLeft => "turn-left",
            AgentAction::TurnRight => "turn-right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_action_from_index() {
        assert_eq!(AgentAction::from_index(1), Some(AgentAction::Step));
        assert_eq!(AgentAction::from_index(3), Some(AgentAction::TurnRight));
        assert_eq!(AgentAction::from_index(4), None);
    }

    #[test]
    fn test_random_action_covers_set() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[AgentAction::random(&mut rng).index() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
