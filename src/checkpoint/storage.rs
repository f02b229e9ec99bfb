use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const CHECKPOINT_EXTENSION: &str = "bin";

fn list_checkpoints(directory: &str) -> Vec<(PathBuf, DateTime<Utc>)> {
    let mut checkpoints: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

    if let Ok(entries) = fs::read_dir(directory) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some(CHECKPOINT_EXTENSION) {
                if let Ok(metadata) = entry.metadata() {
                    if let Ok(modified) = metadata.modified() {
                        let datetime: DateTime<Utc> = modified.into();
                        checkpoints.push((path, datetime));
                    }
                }
            }
        }
    }

    // newest first
    checkpoints.sort_by(|a, b| b.1.cmp(&a.1));
    checkpoints
}

pub fn find_latest_checkpoint(directory: &str) -> Option<PathBuf> {
    if !Path::new(directory).exists() {
        return None;
    }

    list_checkpoints(directory)
        .into_iter()
        .next()
        .map(|(path, _)| path)
}

pub fn create_checkpoint_path(directory: &str) -> PathBuf {
    let now: DateTime<Utc> = Utc::now();
    let filename = format!(
        "checkpoint_{}.{}",
        now.format("%Y-%m-%d_%H-%M-%S%.3f"),
        CHECKPOINT_EXTENSION
    );

    Path::new(directory).join(filename)
}

pub fn cleanup_old_checkpoints(directory: &str, keep_last_n: usize) -> std::io::Result<()> {
    if !Path::new(directory).exists() {
        return Ok(());
    }

    for (path, _) in list_checkpoints(directory).iter().skip(keep_last_n) {
        log::info!("Deleting old checkpoint: {:?}", path);
        fs::remove_file(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_create_checkpoint_path() {
        let path = create_checkpoint_path("test_checkpoints");
        assert!(path.to_str().unwrap().starts_with("test_checkpoints"));
        assert!(path.to_str().unwrap().ends_with(".bin"));
        assert!(path.to_str().unwrap().contains("checkpoint_"));
    }

    #[test]
    fn test_missing_directory() {
        assert!(find_latest_checkpoint("does/not/exist").is_none());
        assert!(cleanup_old_checkpoints("does/not/exist", 1).is_ok());
    }

    #[test]
    fn test_keeps_newest_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let base = SystemTime::now() - Duration::from_secs(3600);

        for (i, name) in ["a.bin", "b.bin", "c.bin", "d.bin"].iter().enumerate() {
            let file = File::create(dir.path().join(name)).unwrap();
            file.set_modified(base + Duration::from_secs(60 * i as u64))
                .unwrap();
        }
        File::create(dir.path().join("notes.txt")).unwrap();

        let directory = dir.path().to_str().unwrap();
        assert_eq!(
            find_latest_checkpoint(directory),
            Some(dir.path().join("d.bin"))
        );

        cleanup_old_checkpoints(directory, 2).unwrap();

        assert!(!dir.path().join("a.bin").exists());
        assert!(!dir.path().join("b.bin").exists());
        assert!(dir.path().join("c.bin").exists());
        assert!(dir.path().join("d.bin").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
