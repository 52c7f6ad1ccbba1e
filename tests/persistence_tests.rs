//! Save and load round trips through the file system.

use gridcrawl::{Direction, GameConfig, GameState, GridcrawlError, PlayerState};
use tempfile::tempdir;

#[test]
fn test_save_and_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut game = GameState::new_populated(GameConfig::for_testing(99)).unwrap();
    game.move_player(Direction::Left).unwrap();
    game.advance_turn();
    game.save_to_file(&path).unwrap();

    let loaded = GameState::load_from_file(&path).unwrap();
    assert_eq!(loaded.player, game.player);
    assert_eq!(loaded.turn_number, game.turn_number);
    assert_eq!(loaded.statistics, game.statistics);
    assert_eq!(loaded.lifecycle.live_count(), game.lifecycle.live_count());
    for floor in 0..3 {
        let before: Vec<_> = game.lifecycle.live_npcs(floor).into_iter().cloned().collect();
        let after: Vec<_> = loaded.lifecycle.live_npcs(floor).into_iter().cloned().collect();
        assert_eq!(before, after);
    }
}

#[test]
fn test_loaded_game_keeps_playing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save.json");

    let game = GameState::new_populated(GameConfig::for_testing(3)).unwrap();
    game.save_to_file(&path).unwrap();

    let mut loaded = GameState::load_from_file(&path).unwrap();
    let npc_id = loaded.lifecycle.live_npcs(0)[0].id;
    let record = loaded.battle(npc_id).unwrap();
    assert!(record.rounds > 0);
    assert!(loaded.player.hp() <= loaded.player.stats.max_hp);
    assert!(loaded.lifecycle.check_consistency().is_ok());
}

#[test]
fn test_missing_and_corrupt_files() {
    let dir = tempdir().unwrap();

    let missing = GameState::load_from_file(dir.path().join("nope.json"));
    assert!(matches!(missing, Err(GridcrawlError::Io(_))));

    let corrupt = dir.path().join("corrupt.json");
    std::fs::write(&corrupt, "{ not json").unwrap();
    assert!(matches!(
        GameState::load_from_file(&corrupt),
        Err(GridcrawlError::Serde(_))
    ));
}
