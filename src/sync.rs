//! Progress snapshots: gather live state into a [`ProgressRecord`] and push a
//! record back into a running scene.

use items::{ItemRegistry, PickupContext};
use puzzles::PuzzleRegistry;
use save::{PlayerRecord, ProgressRecord};
use world::{ActorId, ActorRoster, ItemId, PlayerState, PuzzleId, SceneHost, Vec2};

/// What [`apply`] managed to restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub players_restored: usize,
    pub players_missing: Vec<u32>,
    pub items_collected: usize,
    pub items_missing: Vec<u32>,
    pub puzzles_completed: usize,
    pub puzzles_missing: Vec<u32>,
}

impl ApplyReport {
    /// Every entry in the record found a live counterpart
    pub fn is_complete(&self) -> bool {
        self.players_missing.is_empty() && self.items_missing.is_empty() && self.puzzles_missing.is_empty()
    }
}

/// Snapshot every player-capable actor, collected item and completed puzzle
pub fn gather(roster: &dyn ActorRoster, items: &ItemRegistry, puzzles: &PuzzleRegistry) -> ProgressRecord {
    let mut record = ProgressRecord::new();

    for actor in roster.player_actors() {
        if let Some(state) = roster.player_state(actor) {
            record.players.push(PlayerRecord {
                id: actor.0,
                x: state.position.x,
                y: state.position.y,
                health: state.health,
            });
        }
    }

    record.items_collected = items.collected_ids().into_iter().map(|id| id.0).collect();
    record.puzzles_completed = puzzles.completed_ids().into_iter().map(|id| id.0).collect();

    log::debug!(
        "Gathered progress: {} players, {} items, {} puzzles",
        record.players.len(),
        record.items_collected.len(),
        record.puzzles_completed.len()
    );
    record
}

/// Push `record` into the scene.
///
/// Players are overwritten in place. Items go through the normal pickup path
/// with the lowest-id player so bindings and notifications fire; puzzles are
/// forced complete and get counted on the next puzzle update. Entries with no
/// live counterpart are reported and skipped.
pub fn apply(
    record: &ProgressRecord,
    host: &mut dyn SceneHost,
    items: &mut ItemRegistry,
    puzzles: &mut PuzzleRegistry,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for player in &record.players {
        let state = PlayerState {
            position: Vec2::new(player.x, player.y),
            health: player.health,
        };
        if host.set_player_state(ActorId(player.id), state) {
            report.players_restored += 1;
        } else {
            log::warn!("Saved player {} has no live actor", ActorId(player.id));
            report.players_missing.push(player.id);
        }
    }

    let collector = host.player_actors().first().copied();
    {
        let mut ctx = PickupContext::new().with_host(&mut *host).with_puzzles(&mut *puzzles);
        for &raw in &record.items_collected {
            let id = ItemId(raw);
            let Some(item) = items.find(id) else {
                log::warn!("Saved {} is not in the registry", id);
                report.items_missing.push(raw);
                continue;
            };
            if item.is_collected() {
                continue;
            }
            let Some(actor) = collector else {
                log::warn!("No player to receive {}", id);
                report.items_missing.push(raw);
                continue;
            };
            if items.interact_with_item(id, actor, &mut ctx) {
                report.items_collected += 1;
            }
        }
    }

    for &raw in &record.puzzles_completed {
        let id = PuzzleId(raw);
        let Some(puzzle) = puzzles.find(id) else {
            log::warn!("Saved {} is not in the registry", id);
            report.puzzles_missing.push(raw);
            continue;
        };
        if puzzle.is_completed() {
            continue;
        }
        if puzzles.force_complete(id) {
            report.puzzles_completed += 1;
        }
    }

    log::info!(
        "Applied progress: {} players, {} items, {} puzzles",
        report.players_restored,
        report.items_collected,
        report.puzzles_completed
    );
    report
}
