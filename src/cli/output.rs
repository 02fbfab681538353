//! Output formatting utilities for CLI.

use colony_defense::{Enemy, SaveInfo};
use colony_defense::game::composition;
use serde::Serialize;

/// JSON-serializable wave roster.
#[derive(Debug, Serialize)]
pub(super) struct JsonWave<'a> {
    /// Wave number.
    pub(super) wave: u32,
    /// Basic invader count.
    pub(super) basic: usize,
    /// Armored ship count.
    pub(super) armored: usize,
    /// Swarmer count.
    pub(super) swarmers: usize,
    /// Every enemy in roster order.
    pub(super) enemies: &'a [Enemy],
}

impl<'a> JsonWave<'a> {
    /// Create from a generated roster.
    pub(super) fn new(wave: u32, enemies: &'a [Enemy]) -> Self {
        let (basic, armored, swarmers) = composition(enemies);
        Self {
            wave,
            basic,
            armored,
            swarmers,
            enemies,
        }
    }
}

/// Format a wave roster as human-readable text.
pub(super) fn format_wave(wave: u32, enemies: &[Enemy]) -> String {
    let (basic, armored, swarmers) = composition(enemies);
    let mut output = String::new();

    output.push_str(&format!("Wave {wave}: {} enemies\n", enemies.len()));
    output.push_str(&format!(
        "  {basic} basic, {armored} armored, {swarmers} swarmers\n\n"
    ));
    for enemy in enemies {
        let drop = enemy.drop();
        output.push_str(&format!(
            "  {:<14} x={:<2} y={:<2} drops {} {}\n",
            enemy.kind.label(),
            enemy.x,
            enemy.y,
            drop.amount,
            drop.kind.label()
        ));
    }

    output
}

/// Format save summaries as a slot table.
pub(super) fn format_saves(infos: &[SaveInfo]) -> String {
    if infos.is_empty() {
        return "No saved games found\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<5} {:<28} {:>5} {:>9} {:>5} {:>9}  {}\n",
        "Slot", "File", "Wave", "Colony", "Tech", "Buildings", "Saved"
    ));
    for (slot, info) in infos.iter().enumerate() {
        output.push_str(&format!(
            "{:<5} {:<28} {:>5} {:>9} {:>5} {:>9}  {}\n",
            slot,
            info.filename,
            info.wave,
            format!("{}/{}", info.colony_hp, info.colony_max_hp),
            info.tech_points,
            info.building_count,
            info.save_date
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_defense::generate_wave;

    #[test]
    fn test_format_wave_header() {
        let enemies = generate_wave(3);
        let text = format_wave(3, &enemies);
        assert!(text.starts_with("Wave 3: 12 enemies\n"));
        assert!(text.contains("10 basic, 2 armored, 0 swarmers"));
    }

    #[test]
    fn test_format_saves_empty() {
        assert_eq!(format_saves(&[]), "No saved games found\n");
    }
}
