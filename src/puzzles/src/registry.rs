//! Puzzle Registry: owns every puzzle, detects completions and keeps statistics

use error::ProgressionError;
use glam::Vec2;
use save::{LoadOutcome, check_version, read_json, write_json};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use world::{ActorId, LayerMask, PuzzleId, SceneHost};

use crate::puzzle::{Puzzle, PuzzleState};

/// Puzzle document format version. v1 stored a single `completedSteps` boolean.
pub const PUZZLE_DOC_VERSION: u32 = 2;

/// Running puzzle statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleStatistics {
    pub total_puzzles_added: u32,
    pub total_puzzles_completed: u32,
    /// Seconds since registry start divided by completions; 0 when none
    pub average_completion_time: f64,
}

pub type PuzzleCallback = Box<dyn FnMut(PuzzleId)>;

/// Owning collection of puzzles
#[derive(Default)]
pub struct PuzzleRegistry {
    puzzles: Vec<Puzzle>,
    /// Completions already counted and announced
    completion_logged: HashSet<PuzzleId>,
    /// Player auto-joined by proximity, per puzzle
    proximity: HashMap<PuzzleId, ActorId>,
    stats: PuzzleStatistics,
    elapsed: f64,
    on_completed: Option<PuzzleCallback>,
    newly_completed: Vec<PuzzleId>,
}

impl PuzzleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a puzzle. Rejects a duplicate id.
    pub fn register_puzzle(&mut self, puzzle: Puzzle) -> bool {
        if self.find(puzzle.id()).is_some() {
            log::warn!("Puzzle {} already registered, ignoring", puzzle.id());
            return false;
        }

        log::debug!("Registered {} \"{}\" with {} steps", puzzle.id(), puzzle.name(), puzzle.steps().len());
        self.puzzles.push(puzzle);
        self.stats.total_puzzles_added += 1;
        true
    }

    pub fn remove_puzzle(&mut self, id: PuzzleId) -> bool {
        let Some(index) = self.puzzles.iter().position(|p| p.id() == id) else {
            return false;
        };
        self.puzzles.remove(index);
        self.completion_logged.remove(&id);
        self.proximity.remove(&id);
        true
    }

    /// Advance every puzzle, then record newly completed ones
    pub fn update_all(&mut self, dt: f32) {
        self.elapsed += f64::from(dt);

        for puzzle in &mut self.puzzles {
            puzzle.update(dt);
        }

        self.detect_completions();
    }

    fn detect_completions(&mut self) {
        for puzzle in &self.puzzles {
            if puzzle.state() != PuzzleState::Completed || !self.completion_logged.insert(puzzle.id()) {
                continue;
            }

            self.stats.total_puzzles_completed += 1;
            self.stats.average_completion_time =
                self.elapsed / f64::from(self.stats.total_puzzles_completed);

            log::info!("Puzzle completed: {} \"{}\"", puzzle.id(), puzzle.name());

            if let Some(callback) = self.on_completed.as_mut() {
                callback(puzzle.id());
            }
            self.newly_completed.push(puzzle.id());
        }
    }

    /// Join the first overlapping player-capable actor to each open puzzle and
    /// release players that walked away. Explicit joins are left alone.
    pub fn refresh_interactions(&mut self, host: &dyn SceneHost) {
        for puzzle in &mut self.puzzles {
            if puzzle.is_completed() {
                continue;
            }

            let found = host
                .first_collider_for_bounds(&puzzle.bounds(), None, LayerMask::PLAYER)
                .filter(|actor| host.is_player_capable(*actor));
            let previous = self.proximity.get(&puzzle.id()).copied();
            if found == previous {
                continue;
            }

            if let Some(actor) = previous {
                puzzle.leave(actor);
                self.proximity.remove(&puzzle.id());
            }
            if let Some(actor) = found {
                puzzle.join(actor);
                self.proximity.insert(puzzle.id(), actor);
            }
        }
    }

    /// Binding target: mark one step of one puzzle
    pub fn mark_step_completed(&mut self, id: PuzzleId, step: usize) -> bool {
        match self.find_mut(id) {
            Some(puzzle) => puzzle.mark_step_completed(step),
            None => {
                log::warn!("Cannot complete step {} of unknown {}", step, id);
                false
            }
        }
    }

    pub fn join(&mut self, id: PuzzleId, actor: ActorId) -> bool {
        self.find_mut(id).map(|p| p.join(actor)).is_some()
    }

    pub fn leave(&mut self, id: PuzzleId, actor: ActorId) -> bool {
        self.find_mut(id).is_some_and(|p| p.leave(actor))
    }

    /// Force a puzzle to Completed; the next update counts it like any other
    pub fn force_complete(&mut self, id: PuzzleId) -> bool {
        self.find_mut(id).is_some_and(Puzzle::force_complete)
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn find(&self, id: PuzzleId) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id() == id)
    }

    pub fn find_mut(&mut self, id: PuzzleId) -> Option<&mut Puzzle> {
        self.puzzles.iter_mut().find(|p| p.id() == id)
    }

    pub fn completed_ids(&self) -> Vec<PuzzleId> {
        self.puzzles
            .iter()
            .filter(|p| p.is_completed())
            .map(Puzzle::id)
            .collect()
    }

    pub fn statistics(&self) -> &PuzzleStatistics {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn set_on_completed(&mut self, callback: impl FnMut(PuzzleId) + 'static) {
        self.on_completed = Some(Box::new(callback));
    }

    /// Completions recorded since the last drain
    pub fn drain_completed(&mut self) -> Vec<PuzzleId> {
        std::mem::take(&mut self.newly_completed)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ProgressionError> {
        let document = PuzzleDocument {
            version: PUZZLE_DOC_VERSION,
            puzzles: self.puzzles.iter().map(PuzzleEntry::from).collect(),
            statistics: self.stats.clone(),
        };

        write_json(path, &document).inspect_err(|e| {
            log::warn!("Failed to save puzzles to {:?}: {}", path, e);
        })?;
        log::info!("Saved {} puzzles to {:?}", self.puzzles.len(), path);
        Ok(())
    }

    /// Restore step flags, states and statistics onto registered puzzles.
    /// Live state is untouched when the document is missing or unreadable.
    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadOutcome, ProgressionError> {
        let document = match read_json::<PuzzleDocument>(path) {
            Ok(Some(document)) => document,
            Ok(None) => {
                log::info!("No puzzle save at {:?}, keeping defaults", path);
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => {
                log::warn!("Failed to load puzzles from {:?}: {}", path, e);
                return Err(e);
            }
        };
        check_version(document.version, PUZZLE_DOC_VERSION)
            .inspect_err(|e| log::warn!("Ignoring puzzle save {:?}: {}", path, e))?;

        for entry in &document.puzzles {
            let Some(puzzle) = self.find_mut(entry.id) else {
                log::warn!("Saved {} is not registered, skipping", entry.id);
                continue;
            };

            let flags = match &entry.completed_steps {
                CompletedSteps::PerStep(flags) => flags.clone(),
                CompletedSteps::All(all) => vec![*all; puzzle.steps().len()],
            };
            puzzle.restore(&flags, entry.state);
        }

        // Restored completions are already part of the saved statistics
        for puzzle in &self.puzzles {
            if puzzle.is_completed() {
                self.completion_logged.insert(puzzle.id());
            }
        }
        self.stats = document.statistics;

        log::info!("Loaded {} puzzle entries from {:?}", document.puzzles.len(), path);
        Ok(LoadOutcome::Loaded)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PuzzleDocument {
    version: u32,
    puzzles: Vec<PuzzleEntry>,
    #[serde(default)]
    statistics: PuzzleStatistics,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleEntry {
    id: PuzzleId,
    #[serde(default)]
    name: String,
    position: Vec2,
    size: Vec2,
    state: PuzzleState,
    completed_steps: CompletedSteps,
}

/// Per-step flags, or the v1 single boolean meaning "every step"
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum CompletedSteps {
    PerStep(Vec<bool>),
    All(bool),
}

impl From<&Puzzle> for PuzzleEntry {
    fn from(puzzle: &Puzzle) -> Self {
        Self {
            id: puzzle.id(),
            name: puzzle.name().to_string(),
            position: puzzle.position(),
            size: puzzle.size(),
            state: puzzle.state(),
            completed_steps: CompletedSteps::PerStep(puzzle.step_flags().to_vec()),
        }
    }
}
