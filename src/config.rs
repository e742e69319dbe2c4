//! Progression configuration, persisted as JSON next to the game.

use error::ProgressionError;
use save::{read_json, write_json};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Directory holding every progression document and save slot
    pub save_dir: PathBuf,
    pub items_file: String,
    pub puzzles_file: String,
    pub achievements_file: String,
    pub progress_file: String,
    pub max_slots: usize,
    pub autosave_interval_secs: u64,
    /// env_logger filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            items_file: "items.json".to_string(),
            puzzles_file: "puzzles.json".to_string(),
            achievements_file: "achievements.json".to_string(),
            progress_file: "progress.json".to_string(),
            max_slots: 5,
            autosave_interval_secs: 300,
            log_filter: "info".to_string(),
        }
    }
}

impl ProgressionConfig {
    /// Config rooted at `save_dir`, everything else default
    pub fn with_save_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            ..Self::default()
        }
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ProgressionError> {
        match read_json::<ProgressionConfig>(path)? {
            Some(mut config) => {
                if config.max_slots == 0 {
                    log::warn!("max_slots must be at least 1, using 1");
                    config.max_slots = 1;
                }
                Ok(config)
            }
            None => {
                log::info!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgressionError> {
        write_json(path, self)
    }

    pub fn items_path(&self) -> PathBuf {
        self.save_dir.join(&self.items_file)
    }

    pub fn puzzles_path(&self) -> PathBuf {
        self.save_dir.join(&self.puzzles_file)
    }

    pub fn achievements_path(&self) -> PathBuf {
        self.save_dir.join(&self.achievements_file)
    }

    pub fn progress_path(&self) -> PathBuf {
        self.save_dir.join(&self.progress_file)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}
