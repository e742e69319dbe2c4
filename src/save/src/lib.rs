//! Progression persistence: JSON documents, the Progress Record and save slots.

pub mod document;
pub mod record;

pub use document::{LoadOutcome, check_version, read_json, write_json};
pub use record::{PROGRESS_VERSION, PlayerRecord, ProgressRecord};

use anyhow::{Context, Result};
use bincode::{Decode, Encode, config};
use error::ProgressionError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Save slot metadata
#[derive(Debug, Clone, Encode, Decode, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub slot: usize,
    pub timestamp: SystemTime,
    pub label: String,
    pub play_time: f64, // seconds
}

/// Contents of one save slot
#[derive(Debug, Clone, Encode, Decode, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub metadata: SaveMetadata,
    pub progress: ProgressRecord,
}

/// Current save slot format version
pub const SAVE_VERSION: u32 = 1;

impl SaveData {
    pub fn new(slot: usize, label: impl Into<String>, play_time: f64, progress: ProgressRecord) -> Self {
        Self {
            version: SAVE_VERSION,
            metadata: SaveMetadata {
                slot,
                timestamp: SystemTime::now(),
                label: label.into(),
                play_time,
            },
            progress,
        }
    }

    /// Validate save data integrity
    pub fn validate(&self) -> Result<(), ProgressionError> {
        check_version(self.version, SAVE_VERSION)?;
        self.progress.validate()
    }
}

/// Slot-based save system
pub struct SaveSystem {
    save_dir: PathBuf,
    max_slots: usize,
}

impl SaveSystem {
    /// Create the save system, creating the directory if needed
    pub fn new(save_dir: impl AsRef<Path>, max_slots: usize) -> Result<Self, ProgressionError> {
        let save_dir = save_dir.as_ref();

        if !save_dir.exists() {
            fs::create_dir_all(save_dir).context("Failed to create save directory")?;
        }

        Ok(Self {
            save_dir: save_dir.to_path_buf(),
            max_slots,
        })
    }

    /// List every readable save, newest first
    pub fn list_saves(&self) -> Result<Vec<SaveMetadata>, ProgressionError> {
        let mut saves = Vec::new();

        let entries = fs::read_dir(&self.save_dir).context("Failed to read save directory")?;

        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && path.extension().is_some_and(|ext| ext == "sav") {
                match Self::read_slot_file(&path) {
                    Ok(data) => saves.push(data.metadata),
                    Err(e) => log::warn!("Skipping unreadable save {:?}: {:#}", path, e),
                }
            }
        }

        saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(saves)
    }

    /// Write a save slot
    pub fn save_game(&self, slot: usize, data: &SaveData) -> Result<()> {
        let path = self.slot_path(slot)?;

        let temp_path = path.with_extension("tmp");
        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary save file")?;

        bincode::encode_into_std_write(data, &mut file, config::standard())
            .context("Failed to serialize save data")?;

        file.flush().context("Failed to flush save data")?;

        fs::rename(temp_path, &path).context("Failed to commit save file")?;

        log::info!("Saved progress to slot {} ({:?})", slot, path);
        Ok(())
    }

    /// Read a save slot
    pub fn load_game(&self, slot: usize) -> Result<SaveData> {
        let path = self.slot_path(slot)?;

        let mut data = Self::read_slot_file(&path)?;
        data.progress.migrate();
        data.validate().context("Save data validation failed")?;

        log::info!("Loaded progress from slot {}", slot);
        Ok(data)
    }

    /// Delete a save slot (no-op when empty)
    pub fn delete_save(&self, slot: usize) -> Result<()> {
        let path = self.slot_path(slot)?;

        if path.exists() {
            fs::remove_file(path).context("Failed to delete save file")?;
        }

        Ok(())
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Whether the slot holds a save
    pub fn has_save(&self, slot: usize) -> bool {
        self.save_path(slot).is_some_and(|path| path.exists())
    }

    pub fn save_path(&self, slot: usize) -> Option<PathBuf> {
        if slot >= self.max_slots {
            return None;
        }
        Some(self.save_dir.join(format!("save_{}.sav", slot)))
    }

    fn slot_path(&self, slot: usize) -> Result<PathBuf> {
        self.save_path(slot)
            .ok_or_else(|| ProgressionError::InvalidSlot(slot).into())
    }

    fn read_slot_file(path: &Path) -> Result<SaveData> {
        let mut file = fs::File::open(path).context(format!("Save file not found: {:?}", path))?;
        let data: SaveData = bincode::decode_from_std_read(&mut file, config::standard())
            .context(format!("Failed to deserialize save file: {:?}", path))?;
        Ok(data)
    }
}

/// Interval-driven saving into slot 0
pub struct AutoSave {
    pub save_system: SaveSystem,
    pub interval: Duration,
    pub last_save: Option<SystemTime>,
}

impl AutoSave {
    pub fn new(save_system: SaveSystem, interval: Duration) -> Self {
        Self {
            save_system,
            interval,
            last_save: None,
        }
    }

    /// Save if the interval has elapsed; returns whether a save happened
    pub fn check_auto_save(&mut self, data: &SaveData) -> Result<bool> {
        let now = SystemTime::now();
        let should_save = match self.last_save {
            Some(last) => now.duration_since(last).unwrap_or_default() >= self.interval,
            None => true,
        };

        if should_save {
            self.save_system.save_game(0, data)?;
            self.last_save = Some(now);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Save immediately, ignoring the interval
    pub fn force_save(&mut self, data: &SaveData) -> Result<()> {
        self.save_system.save_game(0, data)?;
        self.last_save = Some(SystemTime::now());
        Ok(())
    }

    pub fn last_save_time(&self) -> Option<SystemTime> {
        self.last_save
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress() -> ProgressRecord {
        let mut record = ProgressRecord::new();
        record.players.push(PlayerRecord {
            id: 1,
            x: 4.0,
            y: 2.0,
            health: 55.0,
        });
        record.items_collected.insert(10);
        record
    }

    #[test]
    fn slot_roundtrip_preserves_progress() {
        let dir = tempfile::tempdir().unwrap();
        let system = SaveSystem::new(dir.path(), 3).unwrap();
        let data = SaveData::new(1, "Before the vault", 128.5, progress());

        system.save_game(1, &data).unwrap();
        assert!(system.has_save(1));
        assert!(!system.has_save(0));

        let loaded = system.load_game(1).unwrap();
        assert_eq!(loaded.progress, data.progress);
        assert_eq!(loaded.metadata.label, "Before the vault");
        assert_eq!(loaded.metadata.play_time, 128.5);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let system = SaveSystem::new(dir.path(), 2).unwrap();
        let data = SaveData::new(5, "nope", 0.0, ProgressRecord::new());

        assert!(system.save_game(5, &data).is_err());
        assert!(system.load_game(5).is_err());
        assert!(!system.has_save(5));
        assert!(system.save_path(5).is_none());
    }

    #[test]
    fn list_saves_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let system = SaveSystem::new(dir.path(), 3).unwrap();
        system
            .save_game(0, &SaveData::new(0, "good", 1.0, progress()))
            .unwrap();
        fs::write(dir.path().join("save_2.sav"), b"garbage").unwrap();

        let saves = system.list_saves().unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].label, "good");
    }

    #[test]
    fn delete_save_removes_file_and_tolerates_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let system = SaveSystem::new(dir.path(), 2).unwrap();
        system
            .save_game(0, &SaveData::new(0, "x", 0.0, progress()))
            .unwrap();

        system.delete_save(0).unwrap();
        assert!(!system.has_save(0));
        system.delete_save(1).unwrap();
    }

    #[test]
    fn auto_save_respects_interval() {
        let dir = tempfile::tempdir().unwrap();
        let system = SaveSystem::new(dir.path(), 1).unwrap();
        let mut auto = AutoSave::new(system, Duration::from_secs(3600));
        let data = SaveData::new(0, "auto", 0.0, progress());

        assert!(auto.check_auto_save(&data).unwrap());
        assert!(!auto.check_auto_save(&data).unwrap());
        auto.force_save(&data).unwrap();
        assert!(auto.last_save_time().is_some());
    }
}
