//! Integration tests for the save slot
//!
//! Covers the full persistence loop through a directory-backed store:
//! - Every mutating reducer writes the slot; a new game boots from it
//! - Corrupt or partially damaged blobs never block a boot
//! - Capacity limits of the loading config are re-applied

use ai_pm_sim::content::Catalog;
use ai_pm_sim::game::Game;
use ai_pm_sim::storage::{FileStore, SaveStore};
use ai_pm_sim::GameConfig;
use serde_json::json;
use tempfile::TempDir;

const SAVE_KEY: &str = "ai_pm_sim_save_v1";

fn config() -> GameConfig {
    GameConfig {
        seed: Some(3),
        ..GameConfig::default()
    }
}

fn boot(dir: &TempDir, config: GameConfig) -> Game {
    Game::boot(
        Catalog::embedded().unwrap(),
        config,
        Box::new(FileStore::new(dir.path())),
    )
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_progress_survives_restart_of_the_process() {
    let dir = TempDir::new().unwrap();

    let mut game = boot(&dir, config());
    game.choose_option("begin").unwrap();
    game.choose_option("vanity_dau").unwrap();
    game.ui_mut().toggle_cards();
    let xp = game.state().xp;
    let event = game.state().flags.chapter_events.get(&1).cloned();
    drop(game);

    assert!(dir.path().join(format!("{}.json", SAVE_KEY)).exists());

    let restored = boot(&dir, config());
    assert_eq!(restored.state().xp, xp);
    assert_eq!(restored.state().scene_id, "c1_competitor");
    assert_eq!(restored.state().mistakes.len(), 1);
    assert_eq!(restored.state().nav_stack.len(), 2);
    assert_eq!(restored.state().flags.chapter_events.get(&1).cloned(), event);
    // Transient UI is never persisted
    assert!(!restored.state().ui.cards_open);
}

#[test]
fn test_undo_works_after_reload() {
    let dir = TempDir::new().unwrap();
    let mut game = boot(&dir, config());
    game.choose_option("begin").unwrap();
    drop(game);

    let mut restored = boot(&dir, config());
    restored.go_back_one_step();
    assert_eq!(restored.state().scene_id, "start");
    assert_eq!(restored.state().xp, 0);
}

// ============================================================================
// Damaged saves
// ============================================================================

#[test]
fn test_corrupt_blob_boots_fresh_game() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set(SAVE_KEY, "{not json").unwrap();

    let game = boot(&dir, config());
    assert_eq!(game.state().scene_id, "start");
    assert_eq!(game.state().xp, 0);
}

#[test]
fn test_damaged_field_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let blob = json!({
        "savedAt": 0,
        "appVersion": "0.0.1",
        "state": {
            "xp": 120,
            "sceneId": "c2_insight",
            "metrics": "not an object",
            "powerups": {"skipTaskCharges": 2},
        }
    });
    let mut store = FileStore::new(dir.path());
    store.set(SAVE_KEY, &blob.to_string()).unwrap();

    let game = boot(&dir, config());
    assert_eq!(game.state().xp, 120);
    assert_eq!(game.state().scene_id, "c2_insight");
    assert_eq!(game.state().metrics, Default::default());
    assert_eq!(game.state().powerups.skip_task_charges, 2);
    assert!(!game.state().powerups.insight_lens);
}

// ============================================================================
// Caps
// ============================================================================

#[test]
fn test_caps_reapplied_on_load() {
    let dir = TempDir::new().unwrap();
    let mut game = boot(&dir, config());
    game.go_to_scene("c1_kickoff");
    for _ in 0..4 {
        game.choose_option("vanity_dau").unwrap();
        game.go_to_scene("c2_insight");
        game.choose_option("skip_interviews").unwrap();
        game.go_to_scene("c1_kickoff");
    }
    assert_eq!(game.state().nav_stack.len(), 8);
    assert_eq!(game.state().mistakes.len(), 2);
    drop(game);

    let tight = GameConfig {
        nav_capacity: 3,
        mistake_capacity: 1,
        ..config()
    };
    let restored = boot(&dir, tight);
    assert_eq!(restored.state().nav_stack.len(), 3);
    assert_eq!(restored.state().mistakes.len(), 1);
    assert_eq!(restored.state().mistakes.entries()[0].count, 4);
}

#[test]
fn test_restart_overwrites_slot() {
    let dir = TempDir::new().unwrap();
    let mut game = boot(&dir, config());
    game.choose_option("begin").unwrap();
    game.restart();
    drop(game);

    let restored = boot(&dir, config());
    assert_eq!(restored.state().xp, 0);
    assert!(restored.state().nav_stack.is_empty());
}
