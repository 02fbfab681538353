//! The phase state machine.
//!
//! [`GameLoop`] owns the session (state, turret, battle, phase, menu), the
//! save store and the narrator. Front-ends feed it [`Action`]s and call
//! [`GameLoop::tick`] periodically; every result is reported through the
//! narrator.
//!
//! Both entry points run under a fault guard: the session is snapshotted
//! first, and if the step panics the snapshot is restored, the player is told,
//! an auto-save is attempted and the loop keeps going.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error, info};

use crate::config::GameConfig;
use crate::game::{assert_invariants, Battle, GameState, TickOutcome, Turret, SCREEN_WIDTH};
use crate::narrator::{Cue, Narrator};
use crate::save::SaveStore;
use crate::session::{Action, Menu, MenuItem, MenuKind, Phase};

/// Whether the front-end should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// The player asked to leave.
    Exit,
}

/// Everything a fault rollback restores.
#[derive(Debug, Clone)]
struct Session {
    state: GameState,
    turret: Turret,
    battle: Battle,
    phase: Phase,
    menu: Menu,
}

/// A running game session.
#[derive(Debug)]
pub struct GameLoop<N: Narrator> {
    config: GameConfig,
    store: SaveStore,
    narrator: N,
    session: Session,
}

impl<N: Narrator> GameLoop<N> {
    /// A session at the main menu. Nothing is narrated until [`GameLoop::start`].
    #[must_use]
    pub fn new(config: GameConfig, store: SaveStore, narrator: N) -> Self {
        let session = Session {
            state: GameState::new(&config),
            turret: Turret::new(config.turret_start, SCREEN_WIDTH, config.turret_max_shield),
            battle: Battle::default(),
            phase: Phase::MainMenu,
            menu: Menu::main(),
        };
        Self {
            config,
            store,
            narrator,
            session,
        }
    }

    /// Greet the player and announce the main menu.
    pub fn start(&mut self) {
        self.narrator.speak("Welcome to Space Colony Defense!");
        self.session.menu.announce(&mut self.narrator);
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.session.state
    }

    /// Mutable game state, for scripted setups.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.session.state
    }

    /// The turret.
    #[must_use]
    pub fn turret(&self) -> &Turret {
        &self.session.turret
    }

    /// The wave in progress (empty outside combat).
    #[must_use]
    pub fn battle(&self) -> &Battle {
        &self.session.battle
    }

    /// The menu showing.
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.session.menu
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The save store.
    #[must_use]
    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// The narrator.
    #[must_use]
    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    /// Mutable narrator access.
    pub fn narrator_mut(&mut self) -> &mut N {
        &mut self.narrator
    }

    /// Give back the narrator.
    #[must_use]
    pub fn into_narrator(self) -> N {
        self.narrator
    }

    /// Parse and handle one input token.
    ///
    /// Unknown tokens are narrated as such and otherwise ignored.
    pub fn handle_token(&mut self, token: &str) -> Flow {
        match token.parse::<Action>() {
            Ok(action) => self.handle_action(action),
            Err(e) => {
                debug!(error = %e, "rejected input");
                self.narrator.play_cue(Cue::ActionFail);
                self.narrator.speak("Unknown command");
                Flow::Continue
            }
        }
    }

    /// Handle one player action.
    pub fn handle_action(&mut self, action: Action) -> Flow {
        debug!(%action, phase = %self.session.phase, "action");
        self.guarded(|game| game.dispatch(action))
    }

    /// Advance combat by one tick. A no-op outside combat.
    pub fn tick(&mut self) {
        self.guarded(|game| {
            game.combat_tick();
            Flow::Continue
        });
    }

    fn guarded(&mut self, step: impl FnOnce(&mut Self) -> Flow) -> Flow {
        let snapshot = self.session.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| step(self))) {
            Ok(flow) => flow,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown fault".to_string());
                error!(%reason, phase = %snapshot.phase, "recovered from fault");
                self.session = snapshot;
                self.narrator.play_cue(Cue::ActionFail);
                self.narrator.speak("Something went wrong. The last action was undone.");
                if self.session.phase.is_playing() {
                    self.store.auto_save(&self.session.state);
                }
                Flow::Continue
            }
        }
    }

    fn dispatch(&mut self, action: Action) -> Flow {
        if action.is_global() {
            return self.global_action(action);
        }

        match self.session.phase {
            Phase::MainMenu => self.main_menu_action(action),
            Phase::Combat => {
                self.combat_action(action);
                Flow::Continue
            }
            Phase::Management => {
                self.management_action(action);
                Flow::Continue
            }
            Phase::GameOver => {
                self.game_over_action(action);
                Flow::Continue
            }
            Phase::WaveComplete => {
                self.enter_management();
                Flow::Continue
            }
        }
    }

    /// Actions honoured in every phase.
    fn global_action(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Exit,
            Action::PauseSpeech => self.narrator.pause(),
            Action::ResumeSpeech => self.narrator.resume(),
            Action::StopSpeech => self.narrator.stop(),
            Action::SaveGame => self.save_game(),
            _ => self.reject(action),
        }
        Flow::Continue
    }

    fn reject(&mut self, action: Action) {
        self.narrator.play_cue(Cue::ActionFail);
        self.narrator
            .speak(&format!("{action} is not available in {}", phase_label(self.session.phase)));
    }

    fn speak_status(&mut self) {
        for line in self.session.state.status_lines() {
            self.narrator.speak(&line);
        }
    }

    // ----- main menu -------------------------------------------------------

    fn main_menu_action(&mut self, action: Action) -> Flow {
        match action {
            Action::Up => self.session.menu.navigate_up(&mut self.narrator),
            Action::Down => self.session.menu.navigate_down(&mut self.narrator),
            Action::Select => return self.select_main_menu_item(),
            Action::LoadSlot(slot) => self.load_slot(slot),
            Action::Menu => self.show_main_menu(),
            _ => self.reject(action),
        }
        Flow::Continue
    }

    fn select_main_menu_item(&mut self) -> Flow {
        match self.session.menu.current() {
            Some(MenuItem::NewGame) => self.start_new_game(),
            Some(MenuItem::LoadGame) => {
                let files = self.store.list_save_files();
                self.session.menu = Menu::load(&files);
                self.session.menu.announce(&mut self.narrator);
            }
            Some(MenuItem::Exit) => {
                self.narrator.speak("Thanks for playing!");
                return Flow::Exit;
            }
            Some(MenuItem::LoadSlot(slot)) => self.load_slot(slot),
            Some(MenuItem::Back) => self.show_main_menu(),
            _ => {}
        }
        Flow::Continue
    }

    fn show_main_menu(&mut self) {
        self.session.phase = Phase::MainMenu;
        self.session.battle = Battle::default();
        self.session.menu = Menu::main();
        self.session.menu.announce(&mut self.narrator);
    }

    /// Fresh state for a new game. Tech levels and unspent points carry over.
    fn start_new_game(&mut self) {
        let previous = &self.session.state;
        let mut state = GameState::new(&self.config);
        state.techs = previous.techs.clone();
        state.tech_points = previous.tech_points;
        state.apply_tech_effects();
        self.session.state = state;
        self.session.turret = self.fresh_turret();
        info!(wave = self.session.state.wave, "new game");
        self.narrator.speak(&format!(
            "New game started. Prepare for Wave {}!",
            self.session.state.wave
        ));
        self.start_wave();
    }

    fn load_slot(&mut self, slot: usize) {
        let files = self.store.list_save_files();
        match files.get(slot) {
            Some(path) => self.load_saved_game(path),
            None => {
                self.narrator.play_cue(Cue::ActionFail);
                self.narrator.speak("Invalid save slot.");
            }
        }
    }

    /// Replace the session with a saved game and resume combat at its wave.
    fn load_saved_game(&mut self, path: &Path) {
        let Some(state) = self.store.load_game(path) else {
            self.narrator.play_cue(Cue::ActionFail);
            self.narrator.speak("Failed to load game.");
            return;
        };
        self.session.state = state;
        self.session.turret = self.fresh_turret();
        info!(path = %path.display(), wave = self.session.state.wave, "game loaded");
        self.narrator.play_cue(Cue::ActionSuccess);
        self.narrator.speak(&format!(
            "Game loaded. You are at wave {}.",
            self.session.state.wave
        ));
        self.speak_status();
        self.start_wave();
    }

    fn fresh_turret(&self) -> Turret {
        Turret::new(self.config.turret_start, SCREEN_WIDTH, self.config.turret_max_shield)
    }

    // ----- combat ----------------------------------------------------------

    fn start_wave(&mut self) {
        let session = &mut self.session;
        session.battle = Battle::start(&mut session.state, &mut self.narrator);
        session.phase = Phase::Combat;
    }

    fn combat_action(&mut self, action: Action) {
        let session = &mut self.session;
        let narrator = &mut self.narrator;
        match action {
            Action::Left => session.turret.move_left(narrator),
            Action::Right => session.turret.move_right(narrator),
            Action::Shoot => session.battle.fire(&session.turret, &session.state, narrator),
            Action::Missile => {
                session.battle.launch_missile(&mut session.state, narrator);
            }
            Action::Status => self.speak_status(),
            Action::Menu => {
                session.state.retreat(narrator);
                self.show_main_menu();
            }
            _ => self.reject(action),
        }
    }

    fn combat_tick(&mut self) {
        if self.session.phase != Phase::Combat {
            return;
        }
        let session = &mut self.session;
        let outcome = session
            .battle
            .tick(&mut session.state, &mut session.turret, &mut self.narrator);
        assert_invariants(&session.state, &session.turret);
        match outcome {
            TickOutcome::Ongoing => {}
            TickOutcome::ColonyLost => self.game_over(),
            TickOutcome::WaveCleared => self.wave_cleared(),
        }
    }

    fn wave_cleared(&mut self) {
        self.session.phase = Phase::WaveComplete;
        let wave = self.session.state.wave;
        info!(wave, "wave complete");
        self.narrator.play_cue(Cue::ActionSuccess);
        self.narrator.speak(&format!("Wave {wave} complete!"));
        self.session.state.complete_wave(&mut self.narrator);
        self.session.state.defeat_boss(&mut self.narrator);
        self.enter_management();
    }

    fn game_over(&mut self) {
        self.session.phase = Phase::GameOver;
        self.session.battle = Battle::default();
        let state = &self.session.state;
        info!(wave = state.wave, tech_points = state.tech_points, "game over");
        self.narrator.play_cue(Cue::ActionFail);
        self.narrator.speak(&format!(
            "Game Over! Your colony was destroyed on wave {}. You earned {} tech points.",
            state.wave, state.tech_points
        ));
    }

    // ----- management ------------------------------------------------------

    /// Production, turret service and auto-save; runs once per entry.
    fn enter_management(&mut self) {
        let session = &mut self.session;
        session.phase = Phase::Management;
        session.battle = Battle::default();
        session.state.produce_from_buildings(&mut self.narrator);
        let max_shield = session.turret.max_shield();
        session.turret.repair_shield(max_shield, &mut self.narrator);
        if !self.store.auto_save(&self.session.state) {
            debug!("auto-save failed");
        }
        self.narrator
            .speak("Management phase. Review your status and prepare for the next wave.");
        self.speak_status();
        self.session.menu = Menu::management(&self.session.state);
        self.session.menu.announce(&mut self.narrator);
    }

    fn end_management(&mut self) {
        self.session.state.wave = self.session.state.wave.saturating_add(1);
        self.start_wave();
    }

    fn management_action(&mut self, action: Action) {
        match action {
            Action::Up => self.session.menu.navigate_up(&mut self.narrator),
            Action::Down => self.session.menu.navigate_down(&mut self.narrator),
            Action::Select => self.select_management_item(),
            Action::Repair => self.repair(),
            Action::Status => self.speak_status(),
            Action::Build => self.open_submenu(Menu::build()),
            Action::Upgrade => self.open_upgrade_menu(),
            Action::EndManagement => self.end_management(),
            Action::SkipWave => self.skip_waves(),
            Action::Menu => self.show_main_menu(),
            _ => self.reject(action),
        }
    }

    fn select_management_item(&mut self) {
        let Some(item) = self.session.menu.current() else {
            return;
        };
        match item {
            MenuItem::RepairColony => self.repair(),
            MenuItem::BuildStructure => self.open_submenu(Menu::build()),
            MenuItem::UpgradeStructure => self.open_upgrade_menu(),
            MenuItem::Research => self.open_submenu(Menu::research(&self.session.state)),
            MenuItem::Status => self.speak_status(),
            MenuItem::NextWave => self.end_management(),
            MenuItem::SkipWaves => self.skip_waves(),
            MenuItem::Build(kind) => {
                self.session.state.add_building(kind, &mut self.narrator);
                self.return_to_management();
            }
            MenuItem::UpgradeBuilding(index) => {
                self.session.state.upgrade_building(index, &mut self.narrator);
                self.return_to_management();
            }
            MenuItem::Tech(id) => {
                self.session.state.purchase_tech(id, &mut self.narrator);
                self.return_to_management();
            }
            MenuItem::Back => self.return_to_management(),
            MenuItem::NewGame | MenuItem::LoadGame | MenuItem::Exit | MenuItem::LoadSlot(_) => {}
        }
    }

    fn open_submenu(&mut self, menu: Menu) {
        self.session.menu = menu;
        self.session.menu.announce(&mut self.narrator);
    }

    fn open_upgrade_menu(&mut self) {
        if self.session.state.buildings.is_empty() {
            self.narrator.play_cue(Cue::ActionFail);
            self.narrator.speak("No buildings to upgrade");
            return;
        }
        self.open_submenu(Menu::upgrade(&self.session.state));
    }

    /// Rebuild the management menu, keeping the cursor when already there.
    fn return_to_management(&mut self) {
        let index = if self.session.menu.kind() == MenuKind::Management {
            self.session.menu.index()
        } else {
            0
        };
        self.session.menu = Menu::management(&self.session.state).with_index(index);
        self.session.menu.announce(&mut self.narrator);
    }

    /// Repair the colony; a successful repair also services the turret shield.
    fn repair(&mut self) {
        let session = &mut self.session;
        if session.state.repair_colony(&mut self.narrator) {
            let max_shield = session.turret.max_shield();
            session.turret.repair_shield(max_shield, &mut self.narrator);
        }
        if self.session.menu.kind() == MenuKind::Management {
            self.return_to_management();
        }
    }

    /// Spend skip credits, then leave management for the following wave.
    fn skip_waves(&mut self) {
        if self.session.state.skip_waves(&mut self.narrator) {
            self.end_management();
        }
    }

    // ----- game over -------------------------------------------------------

    fn game_over_action(&mut self, action: Action) {
        match action {
            Action::Restart => self.start_new_game(),
            Action::Menu => {
                let techs = self.session.state.techs.clone();
                let tech_points = self.session.state.tech_points;
                self.session.state = GameState::new(&self.config);
                self.session.state.techs = techs;
                self.session.state.tech_points = tech_points;
                self.show_main_menu();
            }
            Action::Status => self.speak_status(),
            _ => self.reject(action),
        }
    }

    // ----- global ----------------------------------------------------------

    fn save_game(&mut self) {
        if !self.session.phase.is_playing() {
            self.narrator.play_cue(Cue::ActionFail);
            self.narrator.speak("No game in progress to save.");
            return;
        }
        if self.store.save_game(&self.session.state, None) {
            self.narrator.play_cue(Cue::ActionSuccess);
            self.narrator.speak("Game saved successfully.");
        } else {
            self.narrator.play_cue(Cue::ActionFail);
            self.narrator.speak("Failed to save game.");
        }
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::MainMenu => "the main menu",
        Phase::Combat => "combat",
        Phase::WaveComplete | Phase::Management => "the management phase",
        Phase::GameOver => "game over",
    }
}
