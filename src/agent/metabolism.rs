use crate::config::AgentConfig;
use serde::{Deserialize, Serialize};

/// Hunger and health of one agent. Health is allowed to go negative; the
/// agent counts as dead once it is `<= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metabolism {
    hunger: i32,
    health: i32,
}

impl Metabolism {
    pub fn new(hunger: i32, health: i32) -> Self {
        Self { hunger, health }
    }

    pub fn starting(config: &AgentConfig) -> Self {
        Self::new(config.starting_hunger, config.starting_health)
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Plain subtraction, no clamping and no death check.
    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn kill(&mut self) {
        self.health = 0;
    }

    pub fn eat(&mut self, recovery: i32) {
        self.hunger = (self.hunger - recovery).max(0);
    }

    /// End-of-tick hunger update: starve once hunger reaches the cap,
    /// otherwise grow hungrier.
    pub fn tick(&mut self, config: &AgentConfig) {
        if self.hunger >= config.lethal_hunger {
            self.hunger = config.lethal_hunger;
            self.health -= config.hunger_tick;
        } else {
            self.hunger += config.hunger_tick;
        }
    }
}
