//! The action tokens a front-end sends to the game loop.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseActionError;

/// Prefix of the `load_slot_<N>` token.
const LOAD_SLOT_PREFIX: &str = "load_slot_";

/// One player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Previous menu entry.
    Up,
    /// Next menu entry.
    Down,
    /// Activate the current menu entry.
    Select,
    /// Move the turret left.
    Left,
    /// Move the turret right.
    Right,
    /// Fire the turret.
    Shoot,
    /// Launch a missile.
    Missile,
    /// Narrate the current status.
    Status,
    /// Leave to the main menu.
    Menu,
    /// Repair the colony.
    Repair,
    /// Open the build menu.
    Build,
    /// Open the upgrade menu.
    Upgrade,
    /// Finish the management phase.
    EndManagement,
    /// Use wave-skip credits.
    SkipWave,
    /// Write a save file.
    SaveGame,
    /// Start over after a game over.
    Restart,
    /// Pause narration.
    PauseSpeech,
    /// Resume narration.
    ResumeSpeech,
    /// Stop the current narration.
    StopSpeech,
    /// Load the save at this index of the newest-first listing.
    LoadSlot(usize),
    /// Leave the program.
    Quit,
}

impl Action {
    /// Accepted in every phase.
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(
            self,
            Action::SaveGame
                | Action::PauseSpeech
                | Action::ResumeSpeech
                | Action::StopSpeech
                | Action::Quit
        )
    }

    /// Token for the fixed-name actions; `None` for `LoadSlot`.
    #[must_use]
    pub const fn token(self) -> Option<&'static str> {
        Some(match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Select => "select",
            Action::Left => "left",
            Action::Right => "right",
            Action::Shoot => "shoot",
            Action::Missile => "missile",
            Action::Status => "status",
            Action::Menu => "menu",
            Action::Repair => "repair",
            Action::Build => "build",
            Action::Upgrade => "upgrade",
            Action::EndManagement => "end_management",
            Action::SkipWave => "skip_wave",
            Action::SaveGame => "save_game",
            Action::Restart => "restart",
            Action::PauseSpeech => "pause_speech",
            Action::ResumeSpeech => "resume_speech",
            Action::StopSpeech => "stop_speech",
            Action::Quit => "quit",
            Action::LoadSlot(_) => return None,
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.token()) {
            (Action::LoadSlot(slot), _) => write!(f, "{LOAD_SLOT_PREFIX}{slot}"),
            (_, Some(token)) => f.write_str(token),
            (_, None) => Ok(()),
        }
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    /// Parse a token; surrounding whitespace and case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let action = match token.as_str() {
            "up" => Action::Up,
            "down" => Action::Down,
            "select" => Action::Select,
            "left" => Action::Left,
            "right" => Action::Right,
            "shoot" => Action::Shoot,
            "missile" => Action::Missile,
            "status" => Action::Status,
            "menu" => Action::Menu,
            "repair" => Action::Repair,
            "build" => Action::Build,
            "upgrade" => Action::Upgrade,
            "end_management" => Action::EndManagement,
            "skip_wave" => Action::SkipWave,
            "save_game" => Action::SaveGame,
            "restart" => Action::Restart,
            "pause_speech" => Action::PauseSpeech,
            "resume_speech" => Action::ResumeSpeech,
            "stop_speech" => Action::StopSpeech,
            "quit" => Action::Quit,
            other => other
                .strip_prefix(LOAD_SLOT_PREFIX)
                .and_then(|slot| slot.parse().ok())
                .map(Action::LoadSlot)
                .ok_or_else(|| ParseActionError { token: s.trim().to_string() })?,
        };
        Ok(action)
    }
}
