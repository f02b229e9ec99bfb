use crate::agent::Agent;
use crate::checkpoint::{self, SnapshotError};
use crate::config::Config;
use crate::error::SimError;
use crate::evolution;
use crate::simulation::{CellReport, Game};
use crate::stats::GenerationMetrics;
use crate::world::Position;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

/// Result of running one generation to the end and breeding its successor.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub metrics: GenerationMetrics,
    pub oldest: Option<Agent>,
}

/// Owns the generation currently in flight plus the random source used to
/// build and breed generations.
pub struct Session {
    config: Config,
    game: Game,
    rng: StdRng,
    generation: u64,
    tick: u64,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, SimError> {
        let mut rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let game = Game::new(&config, &mut rng)?;

        Ok(Self {
            config,
            game,
            rng,
            generation: 0,
            tick: 0,
        })
    }

    /// Resumes from an existing game, e.g. one loaded from a snapshot.
    pub fn with_game(config: Config, game: Game) -> Self {
        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            game,
            rng,
            generation: 0,
            tick: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn metrics(&self) -> GenerationMetrics {
        GenerationMetrics::compute(self.generation, self.tick, &self.game)
    }

    /// Throws the current generation away and builds a fresh random one,
    /// terrain included.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.game = Game::new(&self.config, &mut self.rng)?;
        self.generation = 0;
        self.tick = 0;
        log::info!("Generation re-initialized");
        Ok(())
    }

    pub fn step(&mut self) {
        self.game.step(&self.config);
        self.tick += 1;
    }

    /// Runs the current generation until everyone is dead, then replaces it
    /// with the bred successor.
    pub fn advance_generation(&mut self) -> Result<GenerationSummary, SimError> {
        self.tick += self.game.run_to_extinction(&self.config);

        let metrics = self.metrics();
        let oldest = self.game.oldest_agent().cloned();
        if let Some(agent) = &oldest {
            log::debug!("Oldest agent of generation {}: {}", self.generation, agent);
        }

        let next = evolution::prepare_next_generation(&self.game, &self.config, &mut self.rng)?;
        self.game = next;
        self.generation += 1;
        self.tick = 0;

        Ok(GenerationSummary { metrics, oldest })
    }

    pub fn cell(&self, pos: Position) -> CellReport {
        self.game.cell(pos)
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        checkpoint::save_snapshot(path, &self.game, &self.config)
    }

    /// Replaces the current game with the snapshot at `path`. On any error
    /// the current game is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), SnapshotError> {
        self.game = checkpoint::load_snapshot(path, &self.config)?;
        self.tick = 0;
        Ok(())
    }
}
