//! Multi-wave integration tests driven through the game loop.
//!
//! These tests play the game the way a front-end does, with action tokens and
//! ticks, and check the state and what the player was told.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::path::Path;

use colony_defense::game::check_invariants;
use colony_defense::{
    Action, Building, BuildingKind, Cue, Flow, GameConfig, GameLoop, GatedNarrator, Phase,
    PlayerTechTree, RecordingNarrator, SaveStore, TechId,
};

fn new_game(dir: &Path) -> GameLoop<RecordingNarrator> {
    let mut game = GameLoop::new(
        GameConfig::default(),
        SaveStore::new(dir),
        RecordingNarrator::new(),
    );
    game.start();
    game.handle_action(Action::Select);
    assert_eq!(game.phase(), Phase::Combat);
    game
}

/// Shoot and tick until the wave ends; panics if it never does.
fn clear_wave<N: colony_defense::Narrator>(game: &mut GameLoop<N>) {
    for _ in 0..500 {
        if game.phase() != Phase::Combat {
            return;
        }
        game.handle_action(Action::Shoot);
        game.tick();
    }
    panic!("wave {} did not end", game.state().wave);
}

#[test]
fn test_seven_waves_no_panic() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());

    for wave in 1..=7 {
        assert_eq!(game.state().wave, wave);
        clear_wave(&mut game);
        assert_eq!(game.phase(), Phase::Management, "wave {wave}");
        assert!(check_invariants(game.state(), game.turret()).is_empty());
        // Management always leaves the turret at full shield.
        assert_eq!(game.turret().shield(), game.turret().max_shield());
        game.handle_action(Action::EndManagement);
    }

    assert_eq!(game.state().wave, 8);
    // Waves 1-7 award max(1, wave / 3) each plus the wave 5 boss bonus.
    assert_eq!(game.state().tech_points, 1 + 1 + 1 + 1 + 1 + 2 + 2 + 2);
    // Three swarmers on wave 5, one on 6, two on 7.
    assert_eq!(game.state().colony.hp, 100 - 30);
}

#[test]
fn test_management_entry_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    clear_wave(&mut game);

    let lines: Vec<&str> = game.narrator().lines().collect();
    let complete = lines.iter().position(|l| *l == "Wave 1 complete!").unwrap();
    let earned = lines.iter().position(|l| *l == "Earned 1 tech points").unwrap();
    let management = lines
        .iter()
        .position(|l| l.starts_with("Management phase."))
        .unwrap();
    let menu = lines.iter().position(|l| *l == "Management options").unwrap();
    assert!(complete < earned && earned < management && management < menu);
    assert!(game.store().auto_save_path().exists());
}

#[test]
fn test_build_and_produce() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    clear_wave(&mut game);

    // Build menu, first entry is the solar panel.
    game.handle_action(Action::Build);
    game.handle_action(Action::Select);
    assert_eq!(game.state().buildings, vec![Building::new(BuildingKind::SolarPanel)]);
    assert!(game.narrator().played(Cue::ConstructionComplete));
    let energy = game.state().resources.energy;

    game.handle_action(Action::EndManagement);
    clear_wave(&mut game);
    // Nine basic invaders at 10 energy each plus 5 from the panel.
    assert_eq!(game.state().resources.energy, energy + 90 + 5);
    assert!(game.narrator().heard("Generated 5 energy"));
}

#[test]
fn test_shield_generator_absorbs_swarmers() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    game.state_mut()
        .buildings
        .push(Building::new(BuildingKind::ShieldGenerator));
    clear_wave(&mut game);
    assert_eq!(game.state().shield_strength, 25);

    game.state_mut().wave = 4;
    game.handle_action(Action::EndManagement);
    assert_eq!(game.state().wave, 5);
    game.tick();

    // 15 swarmer damage is soaked by the 25-point shield.
    assert_eq!(game.state().colony.hp, 100);
    assert_eq!(game.state().shield_strength, 10);
    assert!(game.narrator().heard("Shield absorbed 5 damage"));
}

#[test]
fn test_missile_clears_wave() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    game.state_mut()
        .buildings
        .push(Building::new(BuildingKind::MissileSilo));
    clear_wave(&mut game);
    assert_eq!(game.state().missiles, 1);

    game.handle_action(Action::EndManagement);
    game.handle_action(Action::Missile);
    assert!(game.battle().enemies().is_empty());
    assert_eq!(game.state().missiles, 0);
    assert_eq!(game.state().enemies_defeated_in_current_wave, 9);

    game.tick();
    assert_eq!(game.phase(), Phase::Management);

    // The silo refilled the missile; firing one outside combat is refused.
    game.handle_action(Action::Missile);
    assert!(game.narrator().heard("missile is not available"));
}

#[test]
fn test_skip_waves() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    game.state_mut()
        .buildings
        .push(Building::new(BuildingKind::CommandCenter));
    clear_wave(&mut game);
    assert_eq!(game.state().wave_skip_available, 1);
    assert!(game.menu().labels().any(|l| l == "Skip 1 Waves"));

    game.handle_action(Action::SkipWave);
    assert_eq!(game.phase(), Phase::Combat);
    assert_eq!(game.state().wave, 3);
    assert_eq!(game.state().wave_skip_available, 0);
    assert!(game.narrator().heard("Skipped 1 waves"));
}

#[test]
fn test_tech_levels_survive_game_over() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    clear_wave(&mut game);

    game.state_mut().techs = PlayerTechTree::from_levels([(TechId::ReinforcedColony, 1)]);
    game.state_mut().wave = 4;
    game.state_mut().colony.hp = 1;
    game.handle_action(Action::EndManagement);
    game.tick();
    assert_eq!(game.phase(), Phase::GameOver);
    assert!(game.narrator().heard("destroyed on wave 5"));

    game.handle_action(Action::Restart);
    assert_eq!(game.phase(), Phase::Combat);
    assert_eq!(game.state().wave, 1);
    assert_eq!(game.state().colony.max_hp, 125);
    assert_eq!(game.state().colony.hp, 125);
    assert_eq!(game.state().techs.level(TechId::ReinforcedColony), 1);
    assert_eq!(game.state().tech_points, 1);
}

#[test]
fn test_research_through_menu() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    clear_wave(&mut game);
    game.state_mut().tech_points = 10;

    // Repair, Build, Upgrade, Research.
    for _ in 0..3 {
        game.handle_action(Action::Down);
    }
    game.handle_action(Action::Select);
    assert!(game.narrator().heard("Research. 10 tech points available"));
    game.handle_action(Action::Select);

    assert_eq!(game.state().techs.level(TechId::ReinforcedColony), 1);
    assert_eq!(game.state().tech_points, 0);
    assert!(game.narrator().heard("Reinforced Colony researched to level 1"));
}

#[test]
fn test_save_and_load_slot() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(dir.path());
    clear_wave(&mut game);
    std::fs::remove_file(game.store().auto_save_path()).unwrap();
    game.state_mut().resources.metal = 77;
    game.handle_action(Action::SaveGame);
    assert!(game.narrator().heard("Game saved successfully."));

    let mut fresh = GameLoop::new(
        GameConfig::default(),
        SaveStore::new(dir.path()),
        RecordingNarrator::new(),
    );
    fresh.start();
    fresh.handle_token("load_slot_0");
    assert_eq!(fresh.phase(), Phase::Combat);
    assert_eq!(fresh.state().wave, 1);
    assert_eq!(fresh.state().resources.metal, 77);
    assert_eq!(fresh.turret().shield(), fresh.turret().max_shield());
    assert!(fresh.narrator().heard("Game loaded. You are at wave 1."));

    fresh.handle_token("load_slot_9");
    assert!(fresh.narrator().heard("not available in combat"));
}

#[test]
fn test_load_menu_from_main_menu() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = GameLoop::new(
        GameConfig::default(),
        SaveStore::new(dir.path()),
        RecordingNarrator::new(),
    );
    game.start();
    game.handle_action(Action::LoadSlot(0));
    assert!(game.narrator().heard("Invalid save slot."));

    game.handle_action(Action::Down);
    game.handle_action(Action::Select);
    assert!(game.narrator().heard("No saved games found"));
    // Only Back is listed.
    game.handle_action(Action::Select);
    assert_eq!(game.phase(), Phase::MainMenu);
    assert_eq!(game.menu().labels().next(), Some("New Game"));
}

#[test]
fn test_rejected_actions() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = GameLoop::new(
        GameConfig::default(),
        SaveStore::new(dir.path()),
        RecordingNarrator::new(),
    );
    game.handle_action(Action::Shoot);
    assert!(game.narrator().heard("shoot is not available in the main menu"));
    game.handle_action(Action::SaveGame);
    assert!(game.narrator().heard("No game in progress to save."));
    assert!(game.store().list_save_files().is_empty());
}

#[test]
fn test_pause_speech_mutes_narration() {
    let dir = tempfile::tempdir().unwrap();
    let narrator = GatedNarrator::new(RecordingNarrator::new(), GameConfig::default().audio);
    let mut game = GameLoop::new(GameConfig::default(), SaveStore::new(dir.path()), narrator);

    game.handle_token("pause_speech");
    game.handle_action(Action::Down);
    assert!(game.narrator().is_paused());
    assert!(!game.narrator().inner().heard("Load Game"));
    assert!(game.narrator().inner().played(Cue::MenuNav));

    game.handle_token("resume_speech");
    game.handle_action(Action::Down);
    assert!(game.narrator().inner().heard("Exit"));
    assert_eq!(game.handle_action(Action::Select), Flow::Exit);
}
