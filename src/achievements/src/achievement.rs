//! Achievement definitions and types

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Stable keys of the default catalog
pub mod ids {
    pub const FIRST_PICKUP: &str = "first_pickup";
    pub const COLLECTOR: &str = "collector";
    pub const KEY_MASTER: &str = "key_master";
    pub const PUZZLE_SOLVER: &str = "puzzle_solver";
    pub const MASTERMIND: &str = "mastermind";
    pub const EXPLORER: &str = "explorer";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum AchievementCategory {
    Collection,
    Puzzle,
    Exploration,
    Mastery,
}

/// An achievement and its progress.
///
/// Once unlocked it stays unlocked and its progress is pinned to the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub target_value: u32,
    current_progress: u32,
    unlocked: bool,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: AchievementCategory,
        target_value: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            target_value,
            current_progress: 0,
            unlocked: false,
        }
    }

    pub fn progress(&self) -> u32 {
        self.current_progress
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Fraction of the target reached, in `0.0..=1.0`
    pub fn completion_ratio(&self) -> f32 {
        if self.target_value == 0 {
            return if self.unlocked { 1.0 } else { 0.0 };
        }
        (self.current_progress as f32 / self.target_value as f32).min(1.0)
    }

    /// Apply a delta (clamped at zero) and unlock when the target is reached.
    /// Returns true only if this call unlocked the achievement.
    pub fn add_progress(&mut self, delta: i32) -> bool {
        if self.unlocked {
            return false;
        }

        let next = i64::from(self.current_progress) + i64::from(delta);
        self.current_progress = next.clamp(0, i64::from(u32::MAX)) as u32;

        if self.current_progress >= self.target_value {
            return self.unlock();
        }
        false
    }

    /// Returns false if already unlocked
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.current_progress = self.target_value;
        true
    }

    /// Overwrite from persisted data without any notification
    pub(crate) fn restore(&mut self, progress: u32, unlocked: bool) {
        self.unlocked = unlocked;
        self.current_progress = if unlocked { self.target_value } else { progress };
    }

    pub(crate) fn clear(&mut self) {
        self.unlocked = false;
        self.current_progress = 0;
    }
}

/// Catalog used by scenes that do not supply their own
pub fn default_catalog() -> Vec<Achievement> {
    vec![
        Achievement::new(
            ids::FIRST_PICKUP,
            "First Find",
            "Pick up your first item",
            AchievementCategory::Collection,
            1,
        ),
        Achievement::new(
            ids::COLLECTOR,
            "Collector",
            "Pick up 10 items",
            AchievementCategory::Collection,
            10,
        ),
        Achievement::new(
            ids::KEY_MASTER,
            "Key Master",
            "Collect 3 keys",
            AchievementCategory::Collection,
            3,
        ),
        Achievement::new(
            ids::PUZZLE_SOLVER,
            "Puzzle Solver",
            "Complete a puzzle",
            AchievementCategory::Puzzle,
            1,
        ),
        Achievement::new(
            ids::MASTERMIND,
            "Mastermind",
            "Complete 5 puzzles",
            AchievementCategory::Puzzle,
            5,
        ),
        Achievement::new(
            ids::EXPLORER,
            "Explorer",
            "Collect every item in a scene",
            AchievementCategory::Exploration,
            1,
        ),
    ]
}
