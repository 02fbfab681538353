//! Save slots on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::data_dir;
use crate::error::{SaveError, SaveResult};
use crate::game::GameState;
use crate::save::codec::{self, SaveData};

/// File name of the auto-save slot.
pub const AUTO_SAVE_FILE: &str = "auto_save.json";

/// Summary of one save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveInfo {
    /// Saved wave.
    pub wave: u32,
    /// Colony hit points.
    pub colony_hp: i32,
    /// Colony maximum hit points.
    pub colony_max_hp: i32,
    /// Unspent tech points.
    pub tech_points: u32,
    /// Number of buildings.
    pub building_count: usize,
    /// When the save was written, or `"Unknown"`.
    pub save_date: String,
    /// File name without directory.
    pub filename: String,
}

/// A directory of save files.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// A store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The default store, `~/.space_colony_defense/saves`, or `./saves` when
    /// no home directory is known.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(data_dir().map_or_else(|| PathBuf::from("saves"), |dir| dir.join("saves")))
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the auto-save slot.
    #[must_use]
    pub fn auto_save_path(&self) -> PathBuf {
        self.dir.join(AUTO_SAVE_FILE)
    }

    /// Write `state` to `name` (a file name inside the store), or to a
    /// timestamped `save_YYYYmmdd_HHMMSS.json` when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn try_save_game(&self, state: &GameState, name: Option<&str>) -> SaveResult<PathBuf> {
        let now = Local::now();
        let path = match name {
            Some(name) => self.dir.join(name),
            None => self
                .dir
                .join(format!("save_{}.json", now.format("%Y%m%d_%H%M%S"))),
        };
        let text = codec::encode(state, now)?;
        write_text_atomic(&path, &text)?;
        info!(path = %path.display(), wave = state.wave, "game saved");
        Ok(path)
    }

    /// Save, reporting only success.
    pub fn save_game(&self, state: &GameState, name: Option<&str>) -> bool {
        match self.try_save_game(state, name) {
            Ok(_) => true,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "save failed");
                false
            }
        }
    }

    /// Save to the auto-save slot.
    pub fn auto_save(&self, state: &GameState) -> bool {
        self.save_game(state, Some(AUTO_SAVE_FILE))
    }

    /// Load a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::NotFound`] for a missing file, or an I/O or JSON
    /// error.
    pub fn try_load_game(&self, path: &Path) -> SaveResult<GameState> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SaveError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let decoded = codec::decode(&text)?;
        debug!(
            path = %path.display(),
            skipped = decoded.warnings.len(),
            "game loaded"
        );
        Ok(decoded.state)
    }

    /// Load a snapshot, yielding `None` on any failure.
    #[must_use]
    pub fn load_game(&self, path: &Path) -> Option<GameState> {
        match self.try_load_game(path) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "load failed");
                None
            }
        }
    }

    /// Every `.json` file in the store, most recently modified first. Ties
    /// are broken by path.
    ///
    /// A missing directory yields an empty list.
    #[must_use]
    pub fn list_save_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut files: Vec<(SystemTime, PathBuf)> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .map(|path| {
                let modified = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, path)
            })
            .collect();
        files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        files.into_iter().map(|(_, path)| path).collect()
    }

    /// Summarise a save file without restoring it.
    #[must_use]
    pub fn save_info(&self, path: &Path) -> Option<SaveInfo> {
        let text = fs::read_to_string(path).ok()?;
        let data: SaveData = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable save file");
                return None;
            }
        };
        Some(SaveInfo {
            wave: data.wave,
            colony_hp: data.colony.hp,
            colony_max_hp: data.colony.max_hp,
            tech_points: data.tech_points,
            building_count: data.buildings.len(),
            save_date: if data.save_date.is_empty() {
                "Unknown".to_string()
            } else {
                data.save_date
            },
            filename: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

/// Write through a sibling temp file and rename it into place.
fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("save.json");
    path.with_file_name(format!("{file_name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Building, BuildingKind};

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("saves"));
        let state = GameState {
            wave: 7,
            buildings: vec![Building::new(BuildingKind::RepairBay)],
            ..GameState::default()
        };

        assert!(store.save_game(&state, Some("slot.json")));
        let loaded = store.load_game(&store.dir().join("slot.json")).unwrap();
        assert_eq!(loaded, state);
        assert!(!store.dir().join("slot.json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        let path = dir.path().join("nope.json");
        assert!(matches!(store.try_load_game(&path), Err(SaveError::NotFound(_))));
        assert!(store.load_game(&path).is_none());
    }

    #[test]
    fn test_corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ truncated").unwrap();
        assert!(store.load_game(&path).is_none());
        assert!(store.save_info(&path).is_none());
    }

    #[test]
    fn test_auto_save_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        assert!(store.auto_save(&GameState::default()));
        assert!(store.auto_save_path().exists());
    }

    #[test]
    fn test_list_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        assert!(store.list_save_files().is_empty());
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert!(store.save_game(&GameState::default(), Some("a.json")));
        let files = store.list_save_files();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.json"));
    }

    #[test]
    fn test_save_info() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        let state = GameState {
            wave: 4,
            tech_points: 9,
            ..GameState::default()
        };
        let path = store.try_save_game(&state, Some("info.json")).unwrap();
        let info = store.save_info(&path).unwrap();
        assert_eq!(info.wave, 4);
        assert_eq!(info.tech_points, 9);
        assert_eq!(info.colony_hp, 100);
        assert_eq!(info.building_count, 0);
        assert_eq!(info.filename, "info.json");
        assert_ne!(info.save_date, "Unknown");
    }

    #[test]
    fn test_unwritable_dir_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let store = SaveStore::new(blocker.join("saves"));
        assert!(!store.save_game(&GameState::default(), None));
    }
}
