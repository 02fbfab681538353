//! Game configuration.
//!
//! A [`GameConfig`] is built once at startup and handed to the session. Every
//! field has a default, so a config file only needs the keys it changes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::game::Resources;

/// Directory under the home directory holding config and saves.
pub const DATA_DIR_NAME: &str = ".space_colony_defense";

/// Audio and speech preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Play sound cues.
    pub enable_sounds: bool,
    /// Speak narration lines.
    pub enable_narration: bool,
    /// Speech rate in words per minute, passed through to speech backends.
    pub speech_rate: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enable_sounds: true,
            enable_narration: true,
            speech_rate: 150,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Colony hit points at the start of a new game.
    pub colony_max_hp: i32,
    /// Resources at the start of a new game.
    pub starting_resources: Resources,
    /// Turret lane at the start of a new game.
    pub turret_start: u32,
    /// Turret shield capacity.
    pub turret_max_shield: u32,
    /// Audio preferences.
    pub audio: AudioSettings,
    /// Where saves live. `None` uses the default data directory.
    pub save_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            colony_max_hp: 100,
            starting_resources: Resources::new(50, 30, 20),
            turret_start: 5,
            turret_max_shield: 100,
            audio: AudioSettings::default(),
            save_dir: None,
        }
    }
}

impl GameConfig {
    /// Load a configuration file.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults.
    ///
    /// A missing file silently yields defaults; an unreadable or malformed
    /// file is logged and also yields defaults.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable config");
                Self::default()
            }
        }
    }

    /// Write this configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file I/O fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// The default config file location (`~/.space_colony_defense/config.json`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.json"))
    }

    /// The directory saves should go to.
    #[must_use]
    pub fn resolved_save_dir(&self) -> Option<PathBuf> {
        self.save_dir
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("saves")))
    }
}

/// The per-user data directory (`~/.space_colony_defense`), if a home
/// directory can be determined. The directory is not created.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(Path::new(&home).join(DATA_DIR_NAME))
}
