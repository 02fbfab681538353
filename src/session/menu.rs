//! Navigable menus.
//!
//! A [`Menu`] is a titled list of entries with a cursor. Navigation wraps at
//! both ends and announces the new entry with a menu cue.

use std::path::PathBuf;

use crate::game::{BuildingKind, GameState, TechId, CATALOG};
use crate::narrator::{Cue, Narrator};

/// What selecting an entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Start a fresh game.
    NewGame,
    /// Open the save list.
    LoadGame,
    /// Leave the program.
    Exit,
    /// Load the save at this index.
    LoadSlot(usize),
    /// Return to the parent menu.
    Back,
    /// Repair the colony.
    RepairColony,
    /// Open the build menu.
    BuildStructure,
    /// Open the upgrade menu.
    UpgradeStructure,
    /// Open the research menu.
    Research,
    /// Narrate the status report.
    Status,
    /// Start the next wave.
    NextWave,
    /// Use wave-skip credits.
    SkipWaves,
    /// Construct a building.
    Build(BuildingKind),
    /// Upgrade the building at this index.
    UpgradeBuilding(usize),
    /// Buy a tech level.
    Tech(TechId),
}

/// Which menu is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// Title menu.
    Main,
    /// Save selection.
    Load,
    /// Management phase.
    Management,
    /// Building selection.
    Build,
    /// Building upgrade selection.
    Upgrade,
    /// Tech selection.
    Research,
}

/// A titled list of entries with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    kind: MenuKind,
    title: String,
    entries: Vec<(MenuItem, String)>,
    index: usize,
}

impl Menu {
    fn new(kind: MenuKind, title: impl Into<String>, entries: Vec<(MenuItem, String)>) -> Self {
        Self {
            kind,
            title: title.into(),
            entries,
            index: 0,
        }
    }

    /// The title menu.
    #[must_use]
    pub fn main() -> Self {
        Self::new(
            MenuKind::Main,
            "Main menu",
            vec![
                (MenuItem::NewGame, "New Game".to_string()),
                (MenuItem::LoadGame, "Load Game".to_string()),
                (MenuItem::Exit, "Exit".to_string()),
            ],
        )
    }

    /// Save selection over `files`, newest first.
    #[must_use]
    pub fn load(files: &[PathBuf]) -> Self {
        let mut entries: Vec<(MenuItem, String)> = files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let name = path
                    .file_stem()
                    .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
                (MenuItem::LoadSlot(i), format!("Slot {i}: {name}"))
            })
            .collect();
        entries.push((MenuItem::Back, "Back".to_string()));
        let title = if files.is_empty() {
            "Load game. No saved games found"
        } else {
            "Load game"
        };
        Self::new(MenuKind::Load, title, entries)
    }

    /// The management menu. Skip Waves appears only with credits.
    #[must_use]
    pub fn management(state: &GameState) -> Self {
        let mut entries = vec![
            (MenuItem::RepairColony, "Repair Colony".to_string()),
            (MenuItem::BuildStructure, "Build Structure".to_string()),
            (MenuItem::UpgradeStructure, "Upgrade Structure".to_string()),
            (MenuItem::Research, "Research".to_string()),
            (MenuItem::Status, "Status".to_string()),
            (MenuItem::NextWave, "Next Wave".to_string()),
        ];
        if state.wave_skip_available > 0 {
            entries.push((
                MenuItem::SkipWaves,
                format!("Skip {} Waves", state.wave_skip_available),
            ));
        }
        Self::new(MenuKind::Management, "Management options", entries)
    }

    /// Building selection with costs.
    #[must_use]
    pub fn build() -> Self {
        let mut entries: Vec<(MenuItem, String)> = BuildingKind::ALL
            .into_iter()
            .map(|kind| {
                let cost = kind.cost();
                (
                    MenuItem::Build(kind),
                    format!(
                        "{kind}: {} metal, {} energy, {} food",
                        cost.metal, cost.energy, cost.food
                    ),
                )
            })
            .collect();
        entries.push((MenuItem::Back, "Back".to_string()));
        Self::new(MenuKind::Build, "Build Structure", entries)
    }

    /// Owned buildings that can still be upgraded.
    #[must_use]
    pub fn upgrade(state: &GameState) -> Self {
        let mut entries: Vec<(MenuItem, String)> = state
            .buildings
            .iter()
            .enumerate()
            .filter(|(_, building)| building.level.next().is_some())
            .map(|(i, building)| (MenuItem::UpgradeBuilding(i), format!("{}: {building}", i + 1)))
            .collect();
        entries.push((MenuItem::Back, "Back".to_string()));
        Self::new(MenuKind::Upgrade, "Upgrade Structure", entries)
    }

    /// Every tech not yet at max level, with its next price.
    #[must_use]
    pub fn research(state: &GameState) -> Self {
        let mut entries: Vec<(MenuItem, String)> = CATALOG
            .iter()
            .filter_map(|upgrade| {
                let cost = state.techs.next_cost(upgrade.id)?;
                let level = state.techs.level(upgrade.id);
                Some((
                    MenuItem::Tech(upgrade.id),
                    format!(
                        "{} level {}: {cost} points. {}",
                        upgrade.name,
                        level + 1,
                        upgrade.description
                    ),
                ))
            })
            .collect();
        entries.push((MenuItem::Back, "Back".to_string()));
        let title = format!("Research. {} tech points available", state.tech_points);
        Self::new(MenuKind::Research, title, entries)
    }

    /// Keep the cursor at `index` where possible.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index.min(self.entries.len().saturating_sub(1));
        self
    }

    /// Which menu this is.
    #[must_use]
    pub const fn kind(&self) -> MenuKind {
        self.kind
    }

    /// Cursor position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Entry labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(_, label)| label.as_str())
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<MenuItem> {
        self.entries.get(self.index).map(|&(item, _)| item)
    }

    fn current_label(&self) -> &str {
        self.entries.get(self.index).map_or("", |(_, label)| label.as_str())
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn navigate_up(&mut self, narrator: &mut dyn Narrator) {
        if self.entries.is_empty() {
            return;
        }
        self.index = self.index.checked_sub(1).unwrap_or(self.entries.len() - 1);
        self.announce_current(narrator);
    }

    /// Move the cursor down, wrapping to the top.
    pub fn navigate_down(&mut self, narrator: &mut dyn Narrator) {
        if self.entries.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.entries.len();
        self.announce_current(narrator);
    }

    /// Play the menu cue and speak the current entry.
    pub fn announce_current(&self, narrator: &mut dyn Narrator) {
        narrator.play_cue(Cue::MenuNav);
        narrator.speak(self.current_label());
    }

    /// Speak the title and the current entry.
    pub fn announce(&self, narrator: &mut dyn Narrator) {
        narrator.speak(&self.title);
        self.announce_current(narrator);
    }
}
