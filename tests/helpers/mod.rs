#![allow(dead_code)]

//! Shared scene builders for the integration tests.

use scene_progression::{ActorId, Item, ItemId, ItemKind, ProgressionConfig, Puzzle, PuzzleId, Scene, Vec2};
use std::path::Path;

pub const KEY: ItemId = ItemId(1);
pub const COG: ItemId = ItemId(2);
pub const COIN: ItemId = ItemId(3);
pub const VAULT_DOOR: PuzzleId = PuzzleId(100);
pub const WELCOME_SIGN: PuzzleId = PuzzleId(101);

/// A corridor along the x axis: key, cog and coin, then a two-step door
/// that the key and cog unlock. The sign has no steps.
pub fn vault_scene(save_dir: &Path) -> (Scene, ActorId) {
    let mut scene = Scene::new(ProgressionConfig::with_save_dir(save_dir));
    let player = scene.spawn_player("Hero", Vec2::ZERO);

    scene.add_item(Item::new(KEY, "Brass Key", ItemKind::Key, Vec2::new(40.0, 0.0), Vec2::splat(8.0)));
    scene.add_item(Item::new(COG, "Cog", ItemKind::Tool, Vec2::new(90.0, 0.0), Vec2::splat(8.0)));
    scene.add_item(Item::new(COIN, "Old Coin", ItemKind::Collectible, Vec2::new(130.0, 4.0), Vec2::splat(6.0)));

    scene.register_puzzle(Puzzle::new(
        VAULT_DOOR,
        "Vault Door",
        Vec2::new(170.0, -4.0),
        Vec2::splat(24.0),
        vec!["insert key".to_string(), "fit cog".to_string()],
    ));
    scene.register_puzzle(Puzzle::new(WELCOME_SIGN, "Welcome Sign", Vec2::new(0.0, 40.0), Vec2::ONE, Vec::new()));

    scene.bind_item_to_puzzle_step(KEY, VAULT_DOOR, 0);
    scene.bind_item_to_puzzle_step(COG, VAULT_DOOR, 1);
    (scene, player)
}

/// Walk the player along the corridor two units per frame until `to_x`
pub fn walk_to(scene: &mut Scene, player: ActorId, to_x: f32) {
    let mut x = scene.world().actor_position(player).map_or(0.0, |p| p.x);
    while x < to_x {
        x += 2.0;
        scene.move_actor(player, Vec2::new(x, 0.0));
        scene.update(0.1);
    }
}
