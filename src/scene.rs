//! A running scene: the world plus every progression registry, owned together
//! and stepped in a fixed order each frame.

use achievements::{AchievementLedger, ids};
use anyhow::{Context, Result};
use error::{ProgressionError, handle_error};
use items::{Item, ItemKind, ItemRegistry, PickupContext, StepBinding};
use puzzles::{Puzzle, PuzzleRegistry};
use save::{AutoSave, LoadOutcome, ProgressRecord, SaveData, SaveSystem};
use world::{ActorId, ActorKind, ItemId, PuzzleId, SceneWorld, Vec2};

use crate::config::ProgressionConfig;
use crate::sync::{self, ApplyReport};

/// Default player collision box
pub const PLAYER_SIZE: Vec2 = Vec2::new(16.0, 16.0);
pub const PLAYER_HEALTH: f32 = 100.0;

/// Per-document results of [`Scene::load_documents`]
#[derive(Debug)]
pub struct DocumentsLoad {
    pub items: Result<LoadOutcome, ProgressionError>,
    pub puzzles: Result<LoadOutcome, ProgressionError>,
    pub achievements: Result<LoadOutcome, ProgressionError>,
}

impl DocumentsLoad {
    /// First failure, if any document failed
    pub fn first_error(&self) -> Option<&ProgressionError> {
        [&self.items, &self.puzzles, &self.achievements]
            .into_iter()
            .find_map(|result| result.as_ref().err())
    }

    /// Player-facing text for each document that failed, labelled by document
    pub fn messages(&self) -> Vec<String> {
        [("items", &self.items), ("puzzles", &self.puzzles), ("achievements", &self.achievements)]
            .into_iter()
            .filter_map(|(name, result)| {
                let e = result.as_ref().err()?;
                Some(format!("{}: {}", name, handle_error(e)))
            })
            .collect()
    }
}

pub struct Scene {
    config: ProgressionConfig,
    world: SceneWorld,
    items: ItemRegistry,
    puzzles: PuzzleRegistry,
    achievements: AchievementLedger,
    play_time: f64,
}

impl Scene {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            config,
            world: SceneWorld::new(),
            items: ItemRegistry::new(),
            puzzles: PuzzleRegistry::new(),
            achievements: AchievementLedger::new(),
            play_time: 0.0,
        }
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SceneWorld {
        &mut self.world
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn puzzles(&self) -> &PuzzleRegistry {
        &self.puzzles
    }

    pub fn puzzles_mut(&mut self) -> &mut PuzzleRegistry {
        &mut self.puzzles
    }

    pub fn achievements(&self) -> &AchievementLedger {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut AchievementLedger {
        &mut self.achievements
    }

    /// Seconds of simulation since the scene was created
    pub fn play_time(&self) -> f64 {
        self.play_time
    }

    pub fn spawn_player(&mut self, name: &str, position: Vec2) -> ActorId {
        self.world
            .spawn_actor(ActorKind::Player, name, position, PLAYER_SIZE, PLAYER_HEALTH)
    }

    pub fn move_actor(&mut self, actor: ActorId, position: Vec2) -> bool {
        self.world.move_actor(actor, position)
    }

    pub fn add_item(&mut self, item: Item) -> bool {
        let mut ctx = PickupContext::new().with_host(&mut self.world);
        self.items.add_item(item, &mut ctx)
    }

    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let mut ctx = PickupContext::new().with_host(&mut self.world);
        self.items.remove_item(id, &mut ctx)
    }

    pub fn register_puzzle(&mut self, puzzle: Puzzle) -> bool {
        self.puzzles.register_puzzle(puzzle)
    }

    pub fn bind_item_to_puzzle_step(&mut self, item: ItemId, puzzle: PuzzleId, step: usize) -> Option<StepBinding> {
        self.items.bind_item_to_puzzle_step(item, puzzle, step)
    }

    /// Step one frame: item pickups, puzzle proximity, puzzle states, then
    /// achievement progress from whatever happened.
    pub fn update(&mut self, dt: f32) {
        self.play_time += f64::from(dt);

        {
            let mut ctx = PickupContext::new()
                .with_host(&mut self.world)
                .with_puzzles(&mut self.puzzles);
            self.items.update_all(dt, &mut ctx);
        }
        self.puzzles.refresh_interactions(&self.world);
        self.puzzles.update_all(dt);

        self.award_achievements();
    }

    /// Explicit interaction with an item, wherever the actor stands
    pub fn interact(&mut self, actor: ActorId, item: ItemId) -> bool {
        let collected = {
            let mut ctx = PickupContext::new()
                .with_host(&mut self.world)
                .with_puzzles(&mut self.puzzles);
            self.items.interact_with_item(item, actor, &mut ctx)
        };
        if collected {
            self.award_achievements();
        }
        collected
    }

    fn award_achievements(&mut self) {
        let pickups = self.items.drain_pickups();
        for pickup in &pickups {
            self.achievements.update_progress(ids::FIRST_PICKUP, 1);
            self.achievements.update_progress(ids::COLLECTOR, 1);
            if pickup.kind == ItemKind::Key {
                self.achievements.update_progress(ids::KEY_MASTER, 1);
            }
        }

        // only a live pickup can finish the set
        if !pickups.is_empty() && self.items.items().iter().all(Item::is_collected) {
            self.achievements.unlock_achievement(ids::EXPLORER);
        }

        for _ in self.puzzles.drain_completed() {
            self.achievements.update_progress(ids::PUZZLE_SOLVER, 1);
            self.achievements.update_progress(ids::MASTERMIND, 1);
        }
    }

    pub fn progress_record(&self) -> ProgressRecord {
        sync::gather(&self.world, &self.items, &self.puzzles)
    }

    /// Push a record into the live scene.
    ///
    /// Restored pickups and completions are settled and discarded here so
    /// they do not count toward achievements a second time.
    pub fn apply_progress(&mut self, record: &ProgressRecord) -> ApplyReport {
        let report = sync::apply(record, &mut self.world, &mut self.items, &mut self.puzzles);
        self.puzzles.update_all(0.0);
        self.items.drain_pickups();
        self.puzzles.drain_completed();
        report
    }

    /// Write the item, puzzle, achievement and progress documents
    pub fn save_documents(&self) -> Result<(), ProgressionError> {
        self.items.save_to_file(&self.config.items_path())?;
        self.puzzles.save_to_file(&self.config.puzzles_path())?;
        self.achievements.save_to_file(&self.config.achievements_path())?;
        self.progress_record().write_json(&self.config.progress_path())?;
        log::info!("Saved progression documents to {:?}", self.config.save_dir);
        Ok(())
    }

    /// Load each document independently; a bad document leaves its
    /// registry untouched and does not stop the others.
    pub fn load_documents(&mut self) -> DocumentsLoad {
        let puzzles = self.puzzles.load_from_file(&self.config.puzzles_path());
        let items = {
            let mut ctx = PickupContext::new()
                .with_host(&mut self.world)
                .with_puzzles(&mut self.puzzles);
            self.items.load_from_file(&self.config.items_path(), &mut ctx)
        };
        let achievements = self.achievements.load_from_file(&self.config.achievements_path());

        // completions restored from disk were already counted
        self.puzzles.drain_completed();
        self.items.drain_pickups();

        let load = DocumentsLoad {
            items,
            puzzles,
            achievements,
        };
        if let Some(e) = load.first_error() {
            log::warn!("Some progression documents failed to load: {}", e);
        }
        load
    }

    /// Restore players, items and puzzles from the progress document
    pub fn load_progress_document(&mut self) -> Result<Option<ApplyReport>, ProgressionError> {
        let Some(mut record) = ProgressRecord::read_json(&self.config.progress_path())? else {
            return Ok(None);
        };
        record.migrate();
        record.validate()?;
        Ok(Some(self.apply_progress(&record)))
    }

    pub fn save_system(&self) -> Result<SaveSystem, ProgressionError> {
        SaveSystem::new(&self.config.save_dir, self.config.max_slots)
    }

    pub fn auto_save(&self) -> Result<AutoSave, ProgressionError> {
        Ok(AutoSave::new(self.save_system()?, self.config.autosave_interval()))
    }

    pub fn snapshot(&self, slot: usize, label: &str) -> SaveData {
        SaveData::new(slot, label, self.play_time, self.progress_record())
    }

    pub fn save_slot(&self, slot: usize, label: &str) -> Result<()> {
        let saves = self.save_system()?;
        saves
            .save_game(slot, &self.snapshot(slot, label))
            .with_context(|| format!("Failed to save slot {}", slot))
    }

    pub fn load_slot(&mut self, slot: usize) -> Result<ApplyReport> {
        let saves = self.save_system()?;
        let data = saves
            .load_game(slot)
            .with_context(|| format!("Failed to load slot {}", slot))?;
        self.play_time = data.metadata.play_time;
        Ok(self.apply_progress(&data.progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene() -> (tempfile::TempDir, Scene) {
        let dir = tempfile::tempdir().unwrap();
        let scene = Scene::new(ProgressionConfig::with_save_dir(dir.path()));
        (dir, scene)
    }

    #[test]
    fn walking_onto_items_awards_achievements() {
        let (_dir, mut scene) = scene();
        let player = scene.spawn_player("hero", Vec2::new(-50.0, 0.0));
        scene.add_item(Item::new(ItemId(1), "key", ItemKind::Key, Vec2::new(0.0, 0.0), Vec2::splat(8.0)));
        scene.add_item(Item::new(ItemId(2), "coin", ItemKind::Collectible, Vec2::new(30.0, 0.0), Vec2::splat(8.0)));

        scene.update(0.1);
        assert!(scene.items().collected_ids().is_empty());

        scene.move_actor(player, Vec2::new(0.0, 0.0));
        scene.update(0.1);
        assert_eq!(scene.items().collected_ids(), vec![ItemId(1)]);
        assert!(scene.achievements().is_unlocked(ids::FIRST_PICKUP));
        assert_eq!(scene.achievements().get_progress(ids::KEY_MASTER), 1);
        assert!(!scene.achievements().is_unlocked(ids::EXPLORER));

        scene.move_actor(player, Vec2::new(30.0, 0.0));
        scene.update(0.1);
        assert_eq!(scene.achievements().get_progress(ids::COLLECTOR), 2);
        assert!(scene.achievements().is_unlocked(ids::EXPLORER));
    }

    #[test]
    fn bound_item_completes_puzzle_and_awards_solver() {
        let (_dir, mut scene) = scene();
        let player = scene.spawn_player("hero", Vec2::new(500.0, 500.0));
        scene.add_item(Item::new(ItemId(10), "key", ItemKind::Key, Vec2::ZERO, Vec2::splat(4.0)));
        scene.register_puzzle(Puzzle::new(
            PuzzleId(20),
            "door",
            Vec2::new(200.0, 0.0),
            Vec2::splat(10.0),
            vec!["unlock".to_string()],
        ));
        scene.bind_item_to_puzzle_step(ItemId(10), PuzzleId(20), 0);

        assert!(scene.interact(player, ItemId(10)));
        scene.update(0.1);
        // nobody at the door yet, so it stays locked
        assert!(!scene.puzzles().find(PuzzleId(20)).unwrap().is_completed());

        scene.move_actor(player, Vec2::new(200.0, 0.0));
        scene.update(0.1);

        assert!(scene.puzzles().find(PuzzleId(20)).unwrap().is_completed());
        assert!(scene.achievements().is_unlocked(ids::PUZZLE_SOLVER));
        assert_eq!(scene.achievements().get_progress(ids::MASTERMIND), 1);
    }

    #[test]
    fn slot_roundtrip_restores_without_reawarding() {
        let (_dir, mut scene) = scene();
        let player = scene.spawn_player("hero", Vec2::ZERO);
        scene.add_item(Item::new(ItemId(1), "coin", ItemKind::Collectible, Vec2::new(90.0, 0.0), Vec2::ONE));
        scene.interact(player, ItemId(1));
        scene.update(2.0);
        scene.save_slot(1, "checkpoint").unwrap();

        let mut fresh = Scene::new(scene.config().clone());
        let player = fresh.spawn_player("hero", Vec2::new(5.0, 5.0));
        fresh.add_item(Item::new(ItemId(1), "coin", ItemKind::Collectible, Vec2::new(90.0, 0.0), Vec2::ONE));

        let report = fresh.load_slot(1).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.items_collected, 1);
        assert_eq!(fresh.world().actor_position(player), Some(Vec2::ZERO));
        assert!(fresh.items().find(ItemId(1)).unwrap().is_collected());
        assert_eq!(fresh.play_time(), 2.0);

        fresh.update(0.1);
        assert_eq!(fresh.achievements().get_progress(ids::COLLECTOR), 0);
    }

    #[test]
    fn restored_collection_does_not_unlock_explorer() {
        let (_dir, mut scene) = scene();
        let player = scene.spawn_player("hero", Vec2::ZERO);
        scene.add_item(Item::new(ItemId(1), "coin", ItemKind::Collectible, Vec2::new(90.0, 0.0), Vec2::ONE));
        scene.interact(player, ItemId(1));
        assert!(scene.achievements().is_unlocked(ids::EXPLORER));
        scene.save_slot(1, "all collected").unwrap();

        let mut fresh = Scene::new(scene.config().clone());
        fresh.spawn_player("hero", Vec2::ZERO);
        fresh.add_item(Item::new(ItemId(1), "coin", ItemKind::Collectible, Vec2::new(90.0, 0.0), Vec2::ONE));
        fresh.load_slot(1).unwrap();
        assert!(fresh.items().find(ItemId(1)).unwrap().is_collected());

        fresh.update(0.1);
        fresh.update(0.1);
        assert_eq!(fresh.achievements().get_progress(ids::COLLECTOR), 0);
        assert!(!fresh.achievements().is_unlocked(ids::FIRST_PICKUP));
        assert!(!fresh.achievements().is_unlocked(ids::EXPLORER));
        assert!(fresh.achievements().peek_newly_unlocked().is_empty());
    }

    #[test]
    fn missing_documents_load_as_missing() {
        let (_dir, mut scene) = scene();
        let load = scene.load_documents();
        assert!(load.first_error().is_none());
        assert!(load.messages().is_empty());
        assert!(matches!(load.items, Ok(LoadOutcome::Missing)));
        assert_eq!(scene.load_progress_document().unwrap(), None);
    }

    #[test]
    fn failed_documents_are_reported_in_player_terms() {
        let (_dir, mut scene) = scene();
        std::fs::write(scene.config().puzzles_path(), "[oops").unwrap();

        let load = scene.load_documents();
        assert_eq!(
            load.messages(),
            vec!["puzzles: Saved progress is corrupted and was ignored".to_string()]
        );
    }
}
