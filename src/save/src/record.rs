//! Progress Record: the only progression shape that crosses the persistence boundary.

use bincode::{Decode, Encode};
use error::ProgressionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::document::{self, check_version};

/// Current Progress Record format version
pub const PROGRESS_VERSION: u32 = 1;

/// Transform and health of one player-capable actor
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub health: f32,
}

/// Versioned snapshot of player state plus collected-item and completed-puzzle ids
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub items_collected: BTreeSet<u32>,
    #[serde(default)]
    pub puzzles_completed: BTreeSet<u32>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self {
            version: PROGRESS_VERSION,
            players: Vec::new(),
            items_collected: BTreeSet::new(),
            puzzles_completed: BTreeSet::new(),
        }
    }

    /// Bring records written before versioning up to the current shape
    pub fn migrate(&mut self) {
        if self.version == 0 {
            // Unversioned records share the v1 layout
            self.version = PROGRESS_VERSION;
        }
    }

    /// Validate record integrity
    pub fn validate(&self) -> Result<(), ProgressionError> {
        check_version(self.version, PROGRESS_VERSION)?;

        for player in &self.players {
            if !player.x.is_finite() || !player.y.is_finite() || !player.health.is_finite() {
                return Err(ProgressionError::Deserialization(format!(
                    "player {} has a non-finite transform or health",
                    player.id
                )));
            }
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.items_collected.is_empty() && self.puzzles_completed.is_empty()
    }

    /// Write the record as a JSON document
    pub fn write_json(&self, path: &Path) -> Result<(), ProgressionError> {
        document::write_json(path, self)
    }

    /// Read a JSON record; `Ok(None)` when no file exists
    pub fn read_json(path: &Path) -> Result<Option<Self>, ProgressionError> {
        let Some(mut record) = document::read_json::<ProgressRecord>(path)? else {
            return Ok(None);
        };
        record.migrate();
        record.validate()?;
        Ok(Some(record))
    }
}
