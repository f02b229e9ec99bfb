use crate::checkpoint::{self, SnapshotError};
use crate::config::Config;
use crate::error::SimError;
use crate::session::{GenerationSummary, Session};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error("snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct TrainingSummary {
    pub generations: u64,
    pub last: Option<GenerationSummary>,
}

fn starting_session(config: &Config, snapshot_path: &Path) -> Result<Session, TrainerError> {
    if snapshot_path.exists() {
        log::info!("Resuming from snapshot: {:?}", snapshot_path);
        let game = checkpoint::load_snapshot(snapshot_path, config)?;
        return Ok(Session::with_game(config.clone(), game));
    }

    if config.checkpoint.enabled {
        if let Some(game) = checkpoint::load_latest_checkpoint(config)? {
            return Ok(Session::with_game(config.clone(), game));
        }
    }

    log::info!("Starting from a random generation");
    Ok(Session::new(config.clone())?)
}

/// Breeds `generations` generations, then saves the fresh successor of the
/// last one to `snapshot_path`.
pub fn run(
    config: &Config,
    snapshot_path: &Path,
    generations: u64,
) -> Result<TrainingSummary, TrainerError> {
    let mut session = starting_session(config, snapshot_path)?;
    let mut last = None;

    for generation in 0..generations {
        let summary = session.advance_generation()?;

        if config.trainer.log_every > 0 && generation % config.trainer.log_every == 0 {
            let metrics = &summary.metrics;
            log::info!(
                "Generation: {} | Ticks: {} | Avg Lifetime: {:.2} | Max Lifetime: {} | Food: {}",
                generation,
                metrics.tick,
                metrics.avg_lifetime,
                metrics.max_lifetime,
                metrics.total_food
            );
        }

        if config.checkpoint.enabled
            && config.checkpoint.interval_generations > 0
            && (generation + 1) % config.checkpoint.interval_generations == 0
        {
            match checkpoint::save_checkpoint(session.game(), config) {
                Ok(path) => log::info!("Checkpoint saved: {:?}", path),
                Err(e) => log::error!("Failed to save checkpoint: {}", e),
            }
        }

        last = Some(summary);
    }

    if let Some(agent) = last.as_ref().and_then(|summary| summary.oldest.as_ref()) {
        log::info!("Oldest agent of the last generation:\n{}", agent.report());
    }

    session.save(snapshot_path)?;
    log::info!("Saved next generation to {:?}", snapshot_path);

    Ok(TrainingSummary { generations, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::small_config;

    fn trainer_config(dir: &Path) -> Config {
        let mut config = small_config(14, 14, 8, 20);
        config.world.walls_count = 6;
        config.evolution.seed = Some(90);
        config.trainer.log_every = 2;
        config.checkpoint.enabled = true;
        config.checkpoint.interval_generations = 2;
        config.checkpoint.keep_last_n = 1;
        config.checkpoint.directory = dir.join("checkpoints").to_string_lossy().into_owned();
        config
    }

    #[test]
    fn test_run_produces_loadable_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = trainer_config(dir.path());
        let snapshot = dir.path().join("out").join("state.bin");

        let summary = run(&config, &snapshot, 5).unwrap();

        assert_eq!(summary.generations, 5);
        let last = summary.last.unwrap();
        assert_eq!(last.metrics.generation, 4);
        assert!(last.oldest.is_some());

        let game = checkpoint::load_snapshot(&snapshot, &config).unwrap();
        assert_eq!(game.agents.len(), 8);
        assert!(game.agents.iter().all(|a| a.lifetime == 0 && a.is_alive()));

        let kept = std::fs::read_dir(&config.checkpoint.directory)
            .unwrap()
            .flatten()
            .count();
        assert_eq!(kept, 1);
    }

    #[test]
    fn test_run_resumes_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = trainer_config(dir.path());
        config.checkpoint.enabled = false;
        let snapshot = dir.path().join("state.bin");

        run(&config, &snapshot, 1).unwrap();
        let first = checkpoint::load_snapshot(&snapshot, &config).unwrap();

        let summary = run(&config, &snapshot, 0).unwrap();
        assert!(summary.last.is_none());

        let resumed = checkpoint::load_snapshot(&snapshot, &config).unwrap();
        assert_eq!(resumed, first);
    }
}
