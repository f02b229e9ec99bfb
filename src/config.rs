use crate::error::SimError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub agent: AgentConfig,
    pub evolution: EvolutionConfig,
    pub simulation: SimulationConfig,
    pub trainer: TrainerConfig,
    pub checkpoint: CheckpointConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub agents_count: usize,
    pub food_count: usize,
    pub walls_count: usize,
    pub food_quantity_max: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub starting_health: i32,
    pub starting_hunger: i32,
    pub lethal_hunger: i32,
    pub hunger_tick: i32,
    pub food_hunger_recovery: i32,
    pub attack_damage: i32,
    pub retaliation_damage: i32,
    pub max_lifetime: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub genes_count: usize,
    pub mutation_threshold: u32,
    pub mutation_probability: u32,
    pub mating_selection_pool: usize,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Automatic ticks in server mode. 0 means manual stepping only.
    pub ticks_per_second: u64,
    pub auto_advance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub generations: u64,
    pub snapshot_path: String,
    pub log_every: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub enabled: bool,
    pub interval_generations: u64,
    pub directory: String,
    pub keep_last_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
    pub update_rate_hz: u64,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                width: 48,
                height: 25,
                agents_count: 64,
                food_count: 256,
                walls_count: 128,
                food_quantity_max: 4,
            },
            agent: AgentConfig {
                starting_health: 100,
                starting_hunger: 50,
                lethal_hunger: 100,
                hunger_tick: 10,
                food_hunger_recovery: 30,
                attack_damage: 10,
                retaliation_damage: 5,
                max_lifetime: 100,
            },
            evolution: EvolutionConfig {
                genes_count: 128,
                mutation_threshold: 16,
                mutation_probability: 256,
                mating_selection_pool: 32,
                seed: None,
            },
            simulation: SimulationConfig {
                ticks_per_second: 0,
                auto_advance: false,
            },
            trainer: TrainerConfig {
                generations: 1024 * 8,
                snapshot_path: "output/game_state.bin".to_string(),
                log_every: 256,
            },
            checkpoint: CheckpointConfig {
                enabled: true,
                interval_generations: 1024,
                directory: "checkpoints".to_string(),
                keep_last_n: 8,
            },
            server: ServerConfig {
                enabled: true,
                address: "127.0.0.1".to_string(),
                port: 8080,
                update_rate_hz: 10,
                static_dir: "static".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Per-gene mutation chance as a fraction.
    pub fn mutation_rate(&self) -> f64 {
        self.evolution.mutation_threshold as f64 / self.evolution.mutation_probability as f64
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let world = &self.world;
        if world.width <= 0 || world.height <= 0 {
            return Err(SimError::InvalidConfig(format!(
                "board must be non-empty, got {}x{}",
                world.width, world.height
            )));
        }

        let cells = world.width as usize * world.height as usize;
        let entities = world.agents_count + world.food_count + world.walls_count;
        if entities > cells {
            return Err(SimError::InvalidConfig(format!(
                "{} entities do not fit on a {}x{} board",
                entities, world.width, world.height
            )));
        }

        if world.food_quantity_max < 1 {
            return Err(SimError::InvalidConfig(
                "food_quantity_max must be at least 1".to_string(),
            ));
        }

        let evolution = &self.evolution;
        if evolution.genes_count == 0 || evolution.genes_count % 2 != 0 {
            return Err(SimError::InvalidConfig(format!(
                "genes_count must be even and non-zero, got {}",
                evolution.genes_count
            )));
        }

        if evolution.mating_selection_pool == 0 {
            return Err(SimError::InvalidConfig(
                "mating_selection_pool must be at least 1".to_string(),
            ));
        }

        if evolution.mutation_probability == 0
            || evolution.mutation_threshold > evolution.mutation_probability
        {
            return Err(SimError::InvalidConfig(format!(
                "mutation threshold {} must not exceed probability {}",
                evolution.mutation_threshold, evolution.mutation_probability
            )));
        }

        if self.agent.max_lifetime == 0 {
            return Err(SimError::InvalidConfig(
                "max_lifetime must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
