//! Achievements tracking system
//!
//! A fixed catalog of achievements with progress counters. Gameplay code
//! reports progress explicitly; the ledger unlocks each achievement at most
//! once and announces the unlock through an optional callback.

pub mod achievement;

#[cfg(test)]
mod tests;

pub use achievement::{Achievement, AchievementCategory, default_catalog, ids};

use error::ProgressionError;
use save::{LoadOutcome, read_json, write_json};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub type UnlockCallback = Box<dyn FnMut(&Achievement)>;

/// Persisted state of one achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAchievement {
    pub progress: u32,
    pub unlocked: bool,
}

/// The achievement catalog plus its progress and unlock tracking
pub struct AchievementLedger {
    /// Catalog order is preserved for listing
    achievements: Vec<Achievement>,
    index: HashMap<String, usize>,
    on_unlocked: Option<UnlockCallback>,
    /// Unlocked this session (for notifications)
    newly_unlocked: Vec<String>,
}

impl AchievementLedger {
    /// Ledger over the default catalog
    pub fn new() -> Self {
        Self::with_catalog(default_catalog())
    }

    /// Ledger over a custom catalog. Later duplicates of an id are dropped.
    pub fn with_catalog(catalog: Vec<Achievement>) -> Self {
        let mut achievements = Vec::with_capacity(catalog.len());
        let mut index = HashMap::new();

        for mut achievement in catalog {
            if index.contains_key(&achievement.id) {
                log::warn!("Duplicate achievement id {:?} in catalog, ignoring", achievement.id);
                continue;
            }
            achievement.clear();
            index.insert(achievement.id.clone(), achievements.len());
            achievements.push(achievement);
        }

        Self {
            achievements,
            index,
            on_unlocked: None,
            newly_unlocked: Vec::new(),
        }
    }

    pub fn set_on_unlocked(&mut self, callback: impl FnMut(&Achievement) + 'static) {
        self.on_unlocked = Some(Box::new(callback));
    }

    /// Add `delta` to an achievement's progress, unlocking it when the target
    /// is reached. Unknown or already-unlocked ids are ignored.
    pub fn update_progress(&mut self, id: &str, delta: i32) -> bool {
        let Some(&slot) = self.index.get(id) else {
            log::debug!("Progress for unknown achievement {:?} ignored", id);
            return false;
        };

        if self.achievements[slot].add_progress(delta) {
            self.announce(slot);
            return true;
        }
        false
    }

    /// Force-unlock; no-op when unknown or already unlocked
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        let Some(&slot) = self.index.get(id) else {
            return false;
        };

        if self.achievements[slot].unlock() {
            self.announce(slot);
            return true;
        }
        false
    }

    fn announce(&mut self, slot: usize) {
        let achievement = &self.achievements[slot];
        log::info!("Achievement unlocked: {} ({})", achievement.name, achievement.id);

        self.newly_unlocked.push(achievement.id.clone());
        if let Some(callback) = self.on_unlocked.as_mut() {
            callback(achievement);
        }
    }

    /// False for unknown ids
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.get(id).map(Achievement::is_unlocked).unwrap_or(false)
    }

    /// Zero for unknown ids
    pub fn get_progress(&self, id: &str) -> u32 {
        self.get(id).map(Achievement::progress).unwrap_or(0)
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.index.get(id).map(|&slot| &self.achievements[slot])
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn unlocked_achievements(&self) -> Vec<&Achievement> {
        self.achievements.iter().filter(|a| a.is_unlocked()).collect()
    }

    pub fn locked_achievements(&self) -> Vec<&Achievement> {
        self.achievements.iter().filter(|a| !a.is_unlocked()).collect()
    }

    /// Get newly unlocked achievements since last check and clear the list
    pub fn drain_newly_unlocked(&mut self) -> Vec<String> {
        std::mem::take(&mut self.newly_unlocked)
    }

    pub fn peek_newly_unlocked(&self) -> &[String] {
        &self.newly_unlocked
    }

    /// Unlock percentage (0.0 to 1.0)
    pub fn unlock_percentage(&self) -> f32 {
        let total = self.achievements.len();
        if total == 0 {
            return 0.0;
        }
        self.unlocked_achievements().len() as f32 / total as f32
    }

    /// Reset all progress and unlocks
    pub fn reset(&mut self) {
        for achievement in &mut self.achievements {
            achievement.clear();
        }
        self.newly_unlocked.clear();
    }

    /// Snapshot of every catalog entry
    pub fn to_saved(&self) -> BTreeMap<String, SavedAchievement> {
        self.achievements
            .iter()
            .map(|a| {
                (
                    a.id.clone(),
                    SavedAchievement {
                        progress: a.progress(),
                        unlocked: a.is_unlocked(),
                    },
                )
            })
            .collect()
    }

    /// Overwrite catalog entries present in `saved`. Unknown ids are ignored,
    /// absent entries keep their state, and no unlock is announced.
    pub fn apply_saved(&mut self, saved: &BTreeMap<String, SavedAchievement>) -> usize {
        let mut applied = 0;
        for (id, entry) in saved {
            match self.index.get(id) {
                Some(&slot) => {
                    self.achievements[slot].restore(entry.progress, entry.unlocked);
                    applied += 1;
                }
                None => log::debug!("Saved achievement {:?} not in catalog, ignoring", id),
            }
        }
        applied
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ProgressionError> {
        write_json(path, &self.to_saved()).inspect_err(|e| {
            log::warn!("Failed to save achievements to {:?}: {}", path, e);
        })?;
        log::info!("Saved {} achievements to {:?}", self.achievements.len(), path);
        Ok(())
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadOutcome, ProgressionError> {
        match read_json::<BTreeMap<String, SavedAchievement>>(path) {
            Ok(Some(saved)) => {
                let applied = self.apply_saved(&saved);
                log::info!("Loaded {} achievements from {:?}", applied, path);
                Ok(LoadOutcome::Loaded)
            }
            Ok(None) => {
                log::info!("No achievement save at {:?}, keeping defaults", path);
                Ok(LoadOutcome::Missing)
            }
            Err(e) => {
                log::warn!("Failed to load achievements from {:?}: {}", path, e);
                Err(e)
            }
        }
    }
}

impl Default for AchievementLedger {
    fn default() -> Self {
        Self::new()
    }
}
