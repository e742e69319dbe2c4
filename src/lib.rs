//! Scene progression: items, puzzles and achievements tracked for a running
//! game scene, with JSON documents and bincode save slots for persistence.

pub mod config;
pub mod scene;
pub mod sync;

pub use config::ProgressionConfig;
pub use scene::{DocumentsLoad, Scene};
pub use sync::{ApplyReport, apply, gather};

pub use achievements::{Achievement, AchievementCategory, AchievementLedger, ids};
pub use error::{ProgressionError, handle_error};
pub use items::{BindingTable, Item, ItemKind, ItemRegistry, PickupContext, StepBinding};
pub use puzzles::{Puzzle, PuzzleRegistry, PuzzleState};
pub use save::{LoadOutcome, PlayerRecord, ProgressRecord, SaveData, SaveSystem};
pub use world::{ActorId, ActorKind, ItemId, PuzzleId, SceneWorld, Vec2};
