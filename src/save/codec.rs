//! JSON snapshot of a [`GameState`].
//!
//! The document layout:
//!
//! ```json
//! {
//!   "colony": {"hp": 100, "max_hp": 100},
//!   "resources": {"energy": 50, "metal": 30, "food": 20},
//!   "wave": 3, "tech_points": 5,
//!   "buildings": [{"type": "SOLAR_PANEL", "level": "BASIC"}],
//!   "shield_strength": 0, "missiles": 0, "wave_skip_available": 0,
//!   "owned_techs": {"rapid_fire": 1},
//!   "save_time": 1700000000.0, "save_date": "2023-11-14 22:13:20"
//! }
//! ```
//!
//! `shield_strength`, `missiles`, `wave_skip_available` and `owned_techs` may
//! be absent and default to zero or empty. A building or tech entry with an
//! unknown name is skipped with a warning; the rest of the snapshot loads.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SaveResult;
use crate::game::{Building, BuildingKind, BuildingLevel, Colony, GameState, PlayerTechTree, Resources, TechId};

/// Format of `save_date`.
pub const SAVE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Building entry as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Enum name of the building type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Enum name of the level.
    pub level: String,
}

impl From<&Building> for BuildingRecord {
    fn from(building: &Building) -> Self {
        Self {
            kind: building.kind.name().to_string(),
            level: building.level.name().to_string(),
        }
    }
}

/// On-disk snapshot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Colony hit points.
    pub colony: Colony,
    /// Resource ledger.
    pub resources: Resources,
    /// Current wave.
    pub wave: u32,
    /// Unspent tech points.
    pub tech_points: u32,
    /// Owned buildings.
    pub buildings: Vec<BuildingRecord>,
    /// Colony shield strength.
    #[serde(default)]
    pub shield_strength: u32,
    /// Missiles ready.
    #[serde(default)]
    pub missiles: u32,
    /// Wave-skip credits.
    #[serde(default)]
    pub wave_skip_available: u32,
    /// Owned tech levels by id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub owned_techs: BTreeMap<String, u32>,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub save_time: f64,
    /// Local wall-clock time, [`SAVE_DATE_FORMAT`].
    #[serde(default)]
    pub save_date: String,
}

impl SaveData {
    /// Snapshot `state` as of `now`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn capture(state: &GameState, now: DateTime<Local>) -> Self {
        Self {
            colony: state.colony,
            resources: state.resources,
            wave: state.wave,
            tech_points: state.tech_points,
            buildings: state.buildings.iter().map(BuildingRecord::from).collect(),
            shield_strength: state.shield_strength,
            missiles: state.missiles,
            wave_skip_available: state.wave_skip_available,
            owned_techs: state
                .techs
                .owned()
                .iter()
                .map(|(id, &level)| (id.as_str().to_string(), level))
                .collect(),
            save_time: now.timestamp_millis() as f64 / 1000.0,
            save_date: now.format(SAVE_DATE_FORMAT).to_string(),
        }
    }

    /// Rebuild a game state, skipping unrecognised entries.
    #[must_use]
    pub fn restore(&self) -> Decoded {
        let mut warnings = Vec::new();

        let mut buildings = Vec::with_capacity(self.buildings.len());
        for record in &self.buildings {
            let kind = record.kind.parse::<BuildingKind>();
            let level = record.level.parse::<BuildingLevel>();
            match (kind, level) {
                (Ok(kind), Ok(level)) => buildings.push(Building::with_level(kind, level)),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(kind = %record.kind, level = %record.level, "skipping building: {e}");
                    warnings.push(format!("skipped building {}/{}: {e}", record.kind, record.level));
                }
            }
        }

        let mut levels = Vec::with_capacity(self.owned_techs.len());
        for (name, &level) in &self.owned_techs {
            match name.parse::<TechId>() {
                Ok(id) => levels.push((id, level)),
                Err(e) => {
                    warn!(tech = %name, "skipping tech: {e}");
                    warnings.push(format!("skipped tech {name}: {e}"));
                }
            }
        }

        let mut colony = self.colony;
        colony.hp = colony.hp.min(colony.max_hp);

        let state = GameState {
            colony,
            resources: self.resources,
            buildings,
            wave: self.wave.max(1),
            tech_points: self.tech_points,
            shield_strength: self.shield_strength,
            missiles: self.missiles,
            wave_skip_available: self.wave_skip_available,
            techs: PlayerTechTree::from_levels(levels),
            total_enemies_in_wave: 0,
            enemies_defeated_in_current_wave: 0,
        };
        Decoded { state, warnings }
    }
}

/// A decoded snapshot plus the entries that were skipped.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The restored state.
    pub state: GameState,
    /// One message per skipped entry.
    pub warnings: Vec<String>,
}

/// Serialize `state` as pretty JSON stamped with `now`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(state: &GameState, now: DateTime<Local>) -> SaveResult<String> {
    Ok(serde_json::to_string_pretty(&SaveData::capture(state, now))?)
}

/// Parse a snapshot document.
///
/// # Errors
///
/// Returns an error if the text is not JSON or a required key is missing.
pub fn decode(text: &str) -> SaveResult<Decoded> {
    let data: SaveData = serde_json::from_str(text)?;
    Ok(data.restore())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_state() -> GameState {
        GameState {
            colony: Colony { hp: 70, max_hp: 125 },
            resources: Resources::new(12, 34, 56),
            wave: 3,
            tech_points: 5,
            buildings: vec![
                Building::new(BuildingKind::SolarPanel),
                Building::with_level(BuildingKind::ShieldGenerator, BuildingLevel::Improved),
            ],
            shield_strength: 45,
            missiles: 2,
            ..GameState::default()
        }
    }

    #[test]
    fn test_encode_layout() {
        let now = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let text = encode(&sample_state(), now).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["colony"]["max_hp"], 125);
        assert_eq!(value["resources"]["food"], 56);
        assert_eq!(value["buildings"][1]["type"], "SHIELD_GENERATOR");
        assert_eq!(value["buildings"][1]["level"], "IMPROVED");
        assert_eq!(value["save_date"], "2024-05-06 07:08:09");
        assert!(value.get("owned_techs").is_none());
    }

    #[test]
    fn test_decode_restores_state() {
        let state = sample_state();
        let text = encode(&state, Local::now()).unwrap();
        let decoded = decode(&text).unwrap();
        assert!(decoded.warnings.is_empty());
        assert_eq!(decoded.state, state);
    }

    #[test]
    fn test_missing_optional_keys_default() {
        let text = r#"{
            "colony": {"hp": 50, "max_hp": 100},
            "resources": {"energy": 1, "metal": 2, "food": 3},
            "wave": 4, "tech_points": 0, "buildings": []
        }"#;
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.state.shield_strength, 0);
        assert_eq!(decoded.state.missiles, 0);
        assert_eq!(decoded.state.wave_skip_available, 0);
        assert_eq!(decoded.state.wave, 4);
    }

    #[test]
    fn test_unknown_entries_are_skipped() {
        let text = r#"{
            "colony": {"hp": 50, "max_hp": 100},
            "resources": {"energy": 1, "metal": 2, "food": 3},
            "wave": 4, "tech_points": 0,
            "buildings": [
                {"type": "LASER_TOWER", "level": "BASIC"},
                {"type": "SCRAP_FORGE", "level": "LEGENDARY"},
                {"type": "SCRAP_FORGE", "level": "ADVANCED"}
            ],
            "owned_techs": {"rapid_fire": 2, "time_travel": 1}
        }"#;
        let decoded = decode(text).unwrap();
        assert_eq!(
            decoded.state.buildings,
            vec![Building::with_level(BuildingKind::ScrapForge, BuildingLevel::Advanced)]
        );
        assert_eq!(decoded.state.techs.level(TechId::RapidFire), 2);
        assert_eq!(decoded.warnings.len(), 3);
    }

    #[test]
    fn test_overfull_colony_is_clamped() {
        let text = r#"{
            "colony": {"hp": 500, "max_hp": 100},
            "resources": {"energy": 0, "metal": 0, "food": 0},
            "wave": 0, "tech_points": 0, "buildings": []
        }"#;
        let decoded = decode(text).unwrap();
        assert_eq!(decoded.state.colony.hp, 100);
        assert_eq!(decoded.state.wave, 1);
    }

    #[test]
    fn test_missing_required_key_is_error() {
        assert!(decode(r#"{"wave": 1}"#).is_err());
        assert!(decode("not json").is_err());
    }
}
