//! Puzzle definitions and the step-completion state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};
use world::{ActorId, Bounds, PuzzleId};

/// Lifecycle of a puzzle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PuzzleState {
    Locked,
    Active,
    Completed,
}

impl From<PuzzleState> for u8 {
    fn from(state: PuzzleState) -> u8 {
        match state {
            PuzzleState::Locked => 0,
            PuzzleState::Active => 1,
            PuzzleState::Completed => 2,
        }
    }
}

impl TryFrom<u8> for PuzzleState {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(PuzzleState::Locked),
            1 => Ok(PuzzleState::Active),
            2 => Ok(PuzzleState::Completed),
            other => Err(format!("unknown puzzle state {}", other)),
        }
    }
}

/// A multi-step puzzle placed in the scene
#[derive(Debug, Clone)]
pub struct Puzzle {
    id: PuzzleId,
    name: String,
    position: Vec2,
    size: Vec2,
    steps: Vec<String>,
    completed: Vec<bool>,
    state: PuzzleState,
    /// Actors currently interacting; duplicates are allowed
    interacting: Vec<ActorId>,
}

impl Puzzle {
    /// A puzzle without steps starts out completed
    pub fn new(
        id: PuzzleId,
        name: impl Into<String>,
        position: Vec2,
        size: Vec2,
        steps: Vec<String>,
    ) -> Self {
        let state = if steps.is_empty() {
            PuzzleState::Completed
        } else {
            PuzzleState::Locked
        };

        Self {
            id,
            name: name.into(),
            position,
            size,
            completed: vec![false; steps.len()],
            steps,
            state,
            interacting: Vec::new(),
        }
    }

    pub fn id(&self) -> PuzzleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == PuzzleState::Completed
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn step_flags(&self) -> &[bool] {
        &self.completed
    }

    /// False for out-of-range indices
    pub fn step_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn completed_step_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    pub fn step_index(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step == name)
    }

    pub fn all_steps_done(&self) -> bool {
        self.completed.iter().all(|done| *done)
    }

    /// Mark a step done.
    ///
    /// Returns false for an unknown or already-completed step. Otherwise returns
    /// whether every step is now done; the state itself only advances on
    /// [`Puzzle::update`] or [`Puzzle::check_completion`].
    pub fn mark_step_completed(&mut self, index: usize) -> bool {
        match self.completed.get_mut(index) {
            Some(done) if !*done => *done = true,
            _ => return false,
        }

        log::debug!(
            "{} step {} ({}) completed, {}/{} done",
            self.id,
            index,
            self.steps[index],
            self.completed_step_count(),
            self.steps.len()
        );
        self.all_steps_done()
    }

    pub fn mark_step_by_name(&mut self, name: &str) -> bool {
        match self.step_index(name) {
            Some(index) => self.mark_step_completed(index),
            None => false,
        }
    }

    /// True iff every step is done; completes an active puzzle as a side effect
    pub fn check_completion(&mut self) -> bool {
        let done = self.all_steps_done();
        if done && self.state == PuzzleState::Active {
            self.transition(PuzzleState::Completed);
        }
        done
    }

    /// Advance the state machine by one frame
    pub fn update(&mut self, _dt: f32) {
        if self.state == PuzzleState::Locked && !self.interacting.is_empty() {
            self.transition(PuzzleState::Active);
        }
        if self.state == PuzzleState::Active {
            self.check_completion();
        }
    }

    pub fn join(&mut self, actor: ActorId) {
        self.interacting.push(actor);
    }

    /// Removes one occurrence; leaving as a non-member is a no-op
    pub fn leave(&mut self, actor: ActorId) -> bool {
        match self.interacting.iter().position(|a| *a == actor) {
            Some(index) => {
                self.interacting.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn interacting_actors(&self) -> &[ActorId] {
        &self.interacting
    }

    /// Apply persisted step flags and state without moving anything backwards.
    /// Returns the number of steps newly marked.
    pub fn restore(&mut self, flags: &[bool], saved_state: PuzzleState) -> usize {
        let mut restored = 0;
        for (done, saved) in self.completed.iter_mut().zip(flags) {
            if *saved && !*done {
                *done = true;
                restored += 1;
            }
        }

        if saved_state == PuzzleState::Completed && self.all_steps_done() {
            self.state = PuzzleState::Completed;
        } else if saved_state >= PuzzleState::Active && self.state == PuzzleState::Locked {
            self.state = PuzzleState::Active;
        }
        restored
    }

    /// Mark every step done and jump straight to Completed
    pub fn force_complete(&mut self) -> bool {
        if self.state == PuzzleState::Completed {
            return false;
        }
        self.completed.iter_mut().for_each(|done| *done = true);
        self.transition(PuzzleState::Completed);
        true
    }

    fn transition(&mut self, next: PuzzleState) {
        log::debug!("{} {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }
}
