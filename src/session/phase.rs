//! Session phases.

use std::fmt;

/// Where the session is in its lifecycle.
///
/// ```text
/// MAIN_MENU --new game / load--> COMBAT
/// COMBAT --wave cleared--> WAVE_COMPLETE --> MANAGEMENT --next wave--> COMBAT
/// COMBAT --colony lost--> GAME_OVER --restart--> COMBAT
///                                   --menu--> MAIN_MENU
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Title menu and save selection.
    #[default]
    MainMenu,
    /// A wave is being fought.
    Combat,
    /// Transient: rewards are being granted for a cleared wave.
    WaveComplete,
    /// Between waves.
    Management,
    /// The colony fell.
    GameOver,
}

impl Phase {
    /// Whether a game is in progress and can be saved.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Phase::Combat | Phase::WaveComplete | Phase::Management)
    }

    /// Upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::MainMenu => "MAIN_MENU",
            Phase::Combat => "COMBAT",
            Phase::WaveComplete => "WAVE_COMPLETE",
            Phase::Management => "MANAGEMENT",
            Phase::GameOver => "GAME_OVER",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
