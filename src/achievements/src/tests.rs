//! Comprehensive tests for the achievements ledger

use crate::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn counting_ledger() -> (AchievementLedger, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut ledger = AchievementLedger::new();
    let sink = Rc::clone(&seen);
    ledger.set_on_unlocked(move |a| sink.borrow_mut().push(a.id.clone()));
    (ledger, seen)
}

#[test]
fn fresh_ledger_is_all_locked_at_zero() {
    let ledger = AchievementLedger::new();
    assert!(!ledger.achievements().is_empty());
    for achievement in ledger.achievements() {
        assert!(!achievement.is_unlocked());
        assert_eq!(achievement.progress(), 0);
    }
    assert_eq!(ledger.unlock_percentage(), 0.0);
}

#[test]
fn collector_unlocks_exactly_once_after_ten_updates() {
    let (mut ledger, seen) = counting_ledger();

    let unlocks: Vec<bool> = (0..10).map(|_| ledger.update_progress(ids::COLLECTOR, 1)).collect();

    assert_eq!(unlocks.iter().filter(|u| **u).count(), 1);
    assert!(unlocks[9]);
    assert!(ledger.is_unlocked(ids::COLLECTOR));
    assert_eq!(*seen.borrow(), vec![ids::COLLECTOR.to_string()]);

    // Further progress is never applied
    assert!(!ledger.update_progress(ids::COLLECTOR, 5));
    assert_eq!(ledger.get_progress(ids::COLLECTOR), 10);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn overshooting_pins_progress_to_target() {
    let mut ledger = AchievementLedger::new();
    assert!(ledger.update_progress(ids::KEY_MASTER, 7));
    assert_eq!(ledger.get_progress(ids::KEY_MASTER), 3);
}

#[test]
fn completion_ratio_follows_progress() {
    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::COLLECTOR, 4);
    assert_eq!(ledger.get(ids::COLLECTOR).unwrap().completion_ratio(), 0.4);

    ledger.unlock_achievement(ids::COLLECTOR);
    assert_eq!(ledger.get(ids::COLLECTOR).unwrap().completion_ratio(), 1.0);
    assert_eq!(ledger.get(ids::MASTERMIND).unwrap().completion_ratio(), 0.0);
}

#[test]
fn negative_deltas_clamp_at_zero() {
    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::MASTERMIND, 2);
    ledger.update_progress(ids::MASTERMIND, -5);
    assert_eq!(ledger.get_progress(ids::MASTERMIND), 0);
    assert!(!ledger.is_unlocked(ids::MASTERMIND));
}

#[test]
fn force_unlock_fires_once() {
    let (mut ledger, seen) = counting_ledger();
    assert!(ledger.unlock_achievement(ids::EXPLORER));
    assert!(!ledger.unlock_achievement(ids::EXPLORER));
    assert_eq!(ledger.get_progress(ids::EXPLORER), 1);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(ledger.drain_newly_unlocked(), vec![ids::EXPLORER.to_string()]);
    assert!(ledger.peek_newly_unlocked().is_empty());
}

#[test]
fn unknown_ids_are_harmless() {
    let (mut ledger, seen) = counting_ledger();
    assert!(!ledger.update_progress("nope", 100));
    assert!(!ledger.unlock_achievement("nope"));
    assert!(!ledger.is_unlocked("nope"));
    assert_eq!(ledger.get_progress("nope"), 0);
    assert!(ledger.get("nope").is_none());
    assert!(seen.borrow().is_empty());
}

#[test]
fn custom_catalog_drops_duplicates() {
    let ledger = AchievementLedger::with_catalog(vec![
        Achievement::new("a", "A", "first", AchievementCategory::Mastery, 2),
        Achievement::new("a", "A again", "dup", AchievementCategory::Mastery, 9),
        Achievement::new("b", "B", "second", AchievementCategory::Puzzle, 1),
    ]);
    assert_eq!(ledger.achievements().len(), 2);
    assert_eq!(ledger.get("a").unwrap().target_value, 2);
}

#[test]
fn unlocked_and_locked_lists_partition_catalog() {
    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::FIRST_PICKUP, 1);
    ledger.update_progress(ids::PUZZLE_SOLVER, 1);

    let unlocked: Vec<&str> = ledger.unlocked_achievements().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(unlocked, vec![ids::FIRST_PICKUP, ids::PUZZLE_SOLVER]);
    assert_eq!(
        ledger.unlocked_achievements().len() + ledger.locked_achievements().len(),
        ledger.achievements().len()
    );
    assert!(ledger.unlock_percentage() > 0.0);
}

#[test]
fn saved_map_has_every_entry() {
    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::COLLECTOR, 4);
    let saved = ledger.to_saved();

    assert_eq!(saved.len(), ledger.achievements().len());
    assert_eq!(saved[ids::COLLECTOR], SavedAchievement { progress: 4, unlocked: false });

    let json = serde_json::to_value(&saved).unwrap();
    assert_eq!(json[ids::COLLECTOR]["progress"], 4);
    assert_eq!(json[ids::COLLECTOR]["unlocked"], false);
}

#[test]
fn load_restores_without_firing_callbacks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("achievements.json");

    let mut original = AchievementLedger::new();
    original.update_progress(ids::COLLECTOR, 6);
    original.unlock_achievement(ids::PUZZLE_SOLVER);
    original.save_to_file(&path).unwrap();

    let (mut ledger, seen) = counting_ledger();
    assert_eq!(ledger.load_from_file(&path).unwrap(), save::LoadOutcome::Loaded);

    assert_eq!(ledger.get_progress(ids::COLLECTOR), 6);
    assert!(ledger.is_unlocked(ids::PUZZLE_SOLVER));
    assert!(seen.borrow().is_empty());
    assert!(ledger.peek_newly_unlocked().is_empty());
}

#[test]
fn load_ignores_unknown_ids_and_keeps_absent_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("achievements.json");
    std::fs::write(
        &path,
        r#"{"ghost":{"progress":3,"unlocked":true},"collector":{"progress":2,"unlocked":false}}"#,
    )
    .unwrap();

    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::MASTERMIND, 1);
    ledger.load_from_file(&path).unwrap();

    assert_eq!(ledger.get_progress(ids::COLLECTOR), 2);
    assert_eq!(ledger.get_progress(ids::MASTERMIND), 1);
    assert!(ledger.get("ghost").is_none());
}

#[test]
fn saved_unlock_pins_progress_to_target() {
    let mut ledger = AchievementLedger::new();
    let mut saved = std::collections::BTreeMap::new();
    saved.insert(ids::COLLECTOR.to_string(), SavedAchievement { progress: 2, unlocked: true });

    assert_eq!(ledger.apply_saved(&saved), 1);
    assert_eq!(ledger.get_progress(ids::COLLECTOR), 10);
}

#[test]
fn missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::COLLECTOR, 3);

    let missing = ledger.load_from_file(&dir.path().join("absent.json")).unwrap();
    assert_eq!(missing, save::LoadOutcome::Missing);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "[1, 2").unwrap();
    assert!(ledger.load_from_file(&bad).is_err());
    assert_eq!(ledger.get_progress(ids::COLLECTOR), 3);
}

#[test]
fn reset_clears_everything() {
    let mut ledger = AchievementLedger::new();
    ledger.update_progress(ids::FIRST_PICKUP, 1);
    ledger.reset();
    assert!(!ledger.is_unlocked(ids::FIRST_PICKUP));
    assert!(ledger.drain_newly_unlocked().is_empty());
}

proptest! {
    #[test]
    fn unlock_is_monotonic_and_progress_bounded(deltas in proptest::collection::vec(-5i32..8, 0..40)) {
        let mut ledger = AchievementLedger::new();
        let mut was_unlocked = false;
        let mut unlock_events = 0;

        for delta in deltas {
            if ledger.update_progress(ids::COLLECTOR, delta) {
                unlock_events += 1;
            }
            let unlocked = ledger.is_unlocked(ids::COLLECTOR);
            prop_assert!(!was_unlocked || unlocked);
            if unlocked {
                prop_assert_eq!(ledger.get_progress(ids::COLLECTOR), 10);
            }
            was_unlocked = unlocked;
        }

        prop_assert!(unlock_events <= 1);
        prop_assert_eq!(unlock_events == 1, was_unlocked);
    }
}
