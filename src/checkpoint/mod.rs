//! Binary snapshots of a whole generation.
//!
//! The image is a fixed-size little-endian dump of the three pools in array
//! order with no header or versioning. Its length depends only on the entity
//! counts, `genes_count` and `max_lifetime`, so a file can only be read back
//! with the config that wrote it.

pub mod storage;

use crate::agent::action::AgentAction;
use crate::agent::chromosome::{Chromosome, Gene};
use crate::agent::metabolism::Metabolism;
use crate::agent::Agent;
use crate::config::Config;
use crate::simulation::Game;
use crate::world::cell::Environment;
use crate::world::resources::{Food, Wall};
use crate::world::{Direction, Position};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

const GENE_LEN: usize = 4 * 4;
const FOOD_LEN: usize = 4 * 3;
const WALL_LEN: usize = 4 * 2;

fn agent_len(config: &Config) -> usize {
    // index, x, y, direction, state, hunger, health, lifetime
    let fixed = 8 + 4 * 6 + 8;
    let history = 4 * config.agent.max_lifetime as usize;
    let chromosome = 8 + GENE_LEN * config.evolution.genes_count;
    fixed + history + chromosome
}

/// Exact byte length of a snapshot written with `config`.
pub fn snapshot_len(config: &Config) -> usize {
    agent_len(config) * config.world.agents_count
        + FOOD_LEN * config.world.food_count
        + WALL_LEN * config.world.walls_count
}

pub fn encode(game: &Game, config: &Config) -> Vec<u8> {
    let mut out = Vec::with_capacity(snapshot_len(config));

    for agent in &game.agents {
        out.extend_from_slice(&(agent.index as u64).to_le_bytes());
        out.extend_from_slice(&agent.pos.x.to_le_bytes());
        out.extend_from_slice(&agent.pos.y.to_le_bytes());
        out.extend_from_slice(&agent.direction.index().to_le_bytes());
        out.extend_from_slice(&agent.current_state.to_le_bytes());
        out.extend_from_slice(&agent.hunger().to_le_bytes());
        out.extend_from_slice(&agent.health().to_le_bytes());
        out.extend_from_slice(&agent.lifetime.to_le_bytes());

        for slot in 0..config.agent.max_lifetime as usize {
            let action = agent
                .history
                .get(slot)
                .copied()
                .unwrap_or(AgentAction::Nothing);
            out.extend_from_slice(&action.index().to_le_bytes());
        }

        out.extend_from_slice(&(agent.chromosome.len() as u64).to_le_bytes());
        for gene in &agent.chromosome.genes {
            out.extend_from_slice(&gene.current_state.to_le_bytes());
            out.extend_from_slice(&gene.next_state.to_le_bytes());
            out.extend_from_slice(&gene.environment.index().to_le_bytes());
            out.extend_from_slice(&gene.action.index().to_le_bytes());
        }
    }

    for food in &game.food {
        out.extend_from_slice(&food.quantity.to_le_bytes());
        out.extend_from_slice(&food.pos.x.to_le_bytes());
        out.extend_from_slice(&food.pos.y.to_le_bytes());
    }

    for wall in &game.walls {
        out.extend_from_slice(&wall.pos.x.to_le_bytes());
        out.extend_from_slice(&wall.pos.y.to_le_bytes());
    }

    out
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], SnapshotError> {
        let end = self.offset + N;
        let chunk = self
            .bytes
            .get(self.offset..end)
            .ok_or_else(|| SnapshotError::Corrupt(format!("truncated at byte {}", self.offset)))?;
        self.offset = end;
        let mut buf = [0u8; N];
        buf.copy_from_slice(chunk);
        Ok(buf)
    }

    fn u32(&mut self) -> Result<u32, SnapshotError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn i32(&mut self) -> Result<i32, SnapshotError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    fn u64(&mut self) -> Result<u64, SnapshotError> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn position(&mut self, width: i32, height: i32) -> Result<Position, SnapshotError> {
        let pos = Position::new(self.i32()?, self.i32()?);
        if !pos.is_within(width, height) {
            return Err(SnapshotError::Corrupt(format!(
                "position [{};{}] is off the board",
                pos.x, pos.y
            )));
        }
        Ok(pos)
    }
}

fn corrupt(what: &str, value: u32) -> SnapshotError {
    SnapshotError::Corrupt(format!("invalid {} value {}", what, value))
}

pub fn decode(bytes: &[u8], config: &Config) -> Result<Game, SnapshotError> {
    let expected = snapshot_len(config);
    if bytes.len() != expected {
        return Err(SnapshotError::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let (width, height) = (config.world.width, config.world.height);
    let mut reader = Reader { bytes, offset: 0 };
    let mut game = Game::empty(width, height);

    for _ in 0..config.world.agents_count {
        let index = reader.u64()? as usize;
        let pos = reader.position(width, height)?;
        let direction = reader.u32()?;
        let direction = Direction::from_index(direction).ok_or_else(|| corrupt("direction", direction))?;
        let current_state = reader.u32()?;
        let hunger = reader.i32()?;
        let health = reader.i32()?;
        let lifetime = reader.u64()?;

        let mut history = Vec::with_capacity(config.agent.max_lifetime as usize);
        for _ in 0..config.agent.max_lifetime {
            let action = reader.u32()?;
            history.push(AgentAction::from_index(action).ok_or_else(|| corrupt("action", action))?);
        }

        let gene_count = reader.u64()? as usize;
        if gene_count != config.evolution.genes_count {
            return Err(SnapshotError::Corrupt(format!(
                "agent {} has {} genes, expected {}",
                index, gene_count, config.evolution.genes_count
            )));
        }

        let mut genes = Vec::with_capacity(gene_count);
        for _ in 0..gene_count {
            let current = reader.u32()?;
            let next = reader.u32()?;
            let environment = reader.u32()?;
            let environment =
                Environment::from_index(environment).ok_or_else(|| corrupt("environment", environment))?;
            let action = reader.u32()?;
            let action = AgentAction::from_index(action).ok_or_else(|| corrupt("action", action))?;
            genes.push(Gene::new(current, environment, action, next));
        }

        game.agents.push(Agent {
            index,
            pos,
            direction,
            current_state,
            metabolism: Metabolism::new(hunger, health),
            lifetime,
            history,
            chromosome: Chromosome::new(genes),
        });
    }

    for _ in 0..config.world.food_count {
        let quantity = reader.i32()?;
        let pos = reader.position(width, height)?;
        game.food.push(Food::new(pos, quantity));
    }

    for _ in 0..config.world.walls_count {
        let pos = reader.position(width, height)?;
        game.walls.push(Wall::new(pos));
    }

    Ok(game)
}

/// Writes the snapshot to a sibling temp file and renames it into place so
/// a failed write never leaves a half-written snapshot at `path`.
pub fn save_snapshot(path: &Path, game: &Game, config: &Config) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, encode(game, config))?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a complete snapshot. Either a whole new game comes back or an
/// error does; nothing is decoded into existing state.
pub fn load_snapshot(path: &Path, config: &Config) -> Result<Game, SnapshotError> {
    let bytes = fs::read(path)?;
    decode(&bytes, config)
}

/// Saves a timestamped checkpoint and prunes old ones.
pub fn save_checkpoint(game: &Game, config: &Config) -> Result<PathBuf, SnapshotError> {
    let dir = Path::new(&config.checkpoint.directory);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let checkpoint_path = storage::create_checkpoint_path(&config.checkpoint.directory);
    save_snapshot(&checkpoint_path, game, config)?;

    storage::cleanup_old_checkpoints(&config.checkpoint.directory, config.checkpoint.keep_last_n)?;

    Ok(checkpoint_path)
}

/// Loads the newest checkpoint. An unreadable checkpoint is moved aside so
/// the next run starts fresh instead of failing on it again.
pub fn load_latest_checkpoint(config: &Config) -> Result<Option<Game>, SnapshotError> {
    let Some(checkpoint_path) = storage::find_latest_checkpoint(&config.checkpoint.directory) else {
        log::info!("No checkpoint found");
        return Ok(None);
    };

    log::info!("Loading checkpoint from: {:?}", checkpoint_path);

    match load_snapshot(&checkpoint_path, config) {
        Ok(game) => Ok(Some(game)),
        Err(SnapshotError::Io(e)) => Err(SnapshotError::Io(e)),
        Err(e) => {
            log::error!("Failed to decode checkpoint: {}. Creating backup and starting fresh.", e);

            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let backup_path = format!("{}.backup.{}", checkpoint_path.display(), timestamp);

            if let Err(rename_err) = fs::rename(&checkpoint_path, &backup_path) {
                log::error!("Failed to backup old checkpoint: {}", rename_err);
            } else {
                log::info!("Backed up old checkpoint to: {}", backup_path);
            }

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::small_config;
    use rand::{rngs::StdRng, SeedableRng};

    fn played_game(config: &Config) -> Game {
        let mut rng = StdRng::seed_from_u64(40);
        let mut game = Game::new(config, &mut rng).unwrap();
        for _ in 0..5 {
            game.step(config);
        }
        game
    }

    #[test]
    fn test_snapshot_len_matches_encoding() {
        let config = Config::default();
        let game = played_game(&config);
        assert_eq!(encode(&game, &config).len(), snapshot_len(&config));
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let config = Config::default();
        let game = played_game(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("game_state.bin");

        save_snapshot(&path, &game, &config).unwrap();
        let loaded = load_snapshot(&path, &config).unwrap();

        assert_eq!(loaded, game);
        assert!(!dir.path().join("nested").join("game_state.bin.tmp").exists());
    }

    #[test]
    fn test_truncated_snapshot_is_rejected() {
        let config = Config::default();
        let game = played_game(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");

        let bytes = encode(&game, &config);
        fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        match load_snapshot(&path, &config) {
            Err(SnapshotError::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, bytes.len());
                assert_eq!(actual, bytes.len() - 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_snapshot_is_io_error() {
        let config = Config::default();
        let dir = tempfile::tempdir().unwrap();
        let result = load_snapshot(&dir.path().join("missing.bin"), &config);
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }

    #[test]
    fn test_bad_direction_is_corrupt() {
        let config = small_config(10, 10, 1, 0);
        let game = played_game(&config);
        let mut bytes = encode(&game, &config);
        // direction follows index (8 bytes) and position (8 bytes)
        bytes[16..20].copy_from_slice(&9u32.to_le_bytes());

        assert!(matches!(decode(&bytes, &config), Err(SnapshotError::Corrupt(_))));
    }

    #[test]
    fn test_checkpoint_round_trip_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(10, 10, 3, 5);
        config.checkpoint.directory = dir.path().to_string_lossy().to_string();
        config.checkpoint.keep_last_n = 2;

        let game = played_game(&config);
        let path = save_checkpoint(&game, &config).unwrap();
        assert!(path.exists());

        let loaded = load_latest_checkpoint(&config).unwrap();
        assert_eq!(loaded, Some(game));

        fs::write(&path, b"garbage").unwrap();
        assert!(load_latest_checkpoint(&config).unwrap().is_none());
        assert!(!path.exists());
    }
}
