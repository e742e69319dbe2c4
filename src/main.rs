use anyhow::{Context, Result};
use env_logger::Env;
use std::path::PathBuf;

use scene_progression::{Item, ItemId, ItemKind, ProgressionConfig, Puzzle, PuzzleId, Scene, Vec2, handle_error};

const FRAME: f32 = 1.0 / 30.0;
const WALK_SPEED: f32 = 60.0;

fn build_vault(scene: &mut Scene) {
    scene.add_item(Item::new(ItemId(1), "Brass Key", ItemKind::Key, Vec2::new(40.0, 0.0), Vec2::splat(8.0)));
    scene.add_item(Item::new(ItemId(2), "Cog", ItemKind::Tool, Vec2::new(90.0, 0.0), Vec2::splat(8.0)));
    scene.add_item(Item::new(ItemId(3), "Old Coin", ItemKind::Collectible, Vec2::new(130.0, 4.0), Vec2::splat(6.0)));

    scene.register_puzzle(Puzzle::new(
        PuzzleId(100),
        "Vault Door",
        Vec2::new(170.0, -4.0),
        Vec2::splat(24.0),
        vec!["insert key".to_string(), "fit cog".to_string()],
    ));
    scene.register_puzzle(Puzzle::new(PuzzleId(101), "Welcome Sign", Vec2::new(0.0, 40.0), Vec2::ONE, Vec::new()));

    scene.bind_item_to_puzzle_step(ItemId(1), PuzzleId(100), 0);
    scene.bind_item_to_puzzle_step(ItemId(2), PuzzleId(100), 1);
}

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("progression.json"));
    let config = match ProgressionConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("⚠️ {}", handle_error(&e));
            return Err(e).with_context(|| format!("Failed to read config {:?}", config_path));
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str())).init();

    let mut scene = Scene::new(config);
    let player = scene.spawn_player("Hero", Vec2::ZERO);
    build_vault(&mut scene);

    for message in scene.load_documents().messages() {
        eprintln!("⚠️ {}", message);
    }

    let mut auto_save = scene.auto_save()?;
    match scene.load_slot(0) {
        Ok(report) => println!(
            "Loaded saved progress ({} items, {} puzzles restored)",
            report.items_collected, report.puzzles_completed
        ),
        Err(_) => println!("New game started"),
    }

    let mut x = scene
        .world()
        .actor_position(player)
        .map_or(0.0, |position| position.x);
    while x < 200.0 {
        x += WALK_SPEED * FRAME;
        scene.move_actor(player, Vec2::new(x, 0.0));
        scene.update(FRAME);
        auto_save.check_auto_save(&scene.snapshot(0, "autosave"))?;
    }

    scene.save_documents()?;
    auto_save.force_save(&scene.snapshot(0, "autosave"))?;

    let items = scene.items().statistics();
    let puzzles = scene.puzzles().statistics();
    println!(
        "Collected {}/{} items, solved {}/{} puzzles",
        items.total_items_collected, items.total_items_added, puzzles.total_puzzles_completed, puzzles.total_puzzles_added
    );
    for achievement in scene.achievements().unlocked_achievements() {
        println!("🏆 {}: {}", achievement.name, achievement.description);
    }
    for achievement in scene.achievements().locked_achievements() {
        let ratio = achievement.completion_ratio();
        if ratio > 0.0 {
            println!("⏳ {}: {:.0}%", achievement.name, ratio * 100.0);
        }
    }
    println!("💾 Progress saved to {:?}", scene.config().save_dir);

    Ok(())
}
