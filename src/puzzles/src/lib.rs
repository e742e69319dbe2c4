//! Puzzle tracking
//!
//! Puzzles are ordered lists of named steps driven through a
//! Locked → Active → Completed state machine. The [`PuzzleRegistry`] owns
//! them, counts completions and announces each one exactly once.

pub mod puzzle;
pub mod registry;


pub use puzzle::{Puzzle, PuzzleState};
pub use registry::{PUZZLE_DOC_VERSION, PuzzleCallback, PuzzleRegistry, PuzzleStatistics};
