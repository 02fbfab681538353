//! Game state management.
//!
//! [`GameState`] is the aggregate root of a session: colony, ledger,
//! buildings, wave counter, tech progress and the counters derived from
//! special buildings. It holds no collaborators; every operation that has
//! player-facing meaning takes the narrator as an argument.

use tracing::debug;

use crate::config::GameConfig;
use crate::game::{
    Building, BuildingKind, Colony, Enemy, PlayerTechTree, Resources, SpecialEffect, TechId,
};
use crate::narrator::{Cue, Narrator};

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// The player's base.
    pub colony: Colony,
    /// Resource ledger.
    pub resources: Resources,
    /// Owned buildings, in construction order.
    pub buildings: Vec<Building>,
    /// Current wave, starting at 1.
    pub wave: u32,
    /// Unspent tech points.
    pub tech_points: u32,
    /// Damage the colony shield absorbs before the turret or colony.
    pub shield_strength: u32,
    /// Missiles ready to fire.
    pub missiles: u32,
    /// Waves that may be skipped from the management phase.
    pub wave_skip_available: u32,
    /// Owned tech levels.
    pub techs: PlayerTechTree,
    /// Size of the current wave when it spawned.
    pub total_enemies_in_wave: u32,
    /// Enemies destroyed so far in the current wave.
    pub enemies_defeated_in_current_wave: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl GameState {
    /// A fresh session at wave 1.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            colony: Colony::new(config.colony_max_hp),
            resources: config.starting_resources,
            buildings: Vec::new(),
            wave: 1,
            tech_points: 0,
            shield_strength: 0,
            missiles: 0,
            wave_skip_available: 0,
            techs: PlayerTechTree::new(),
            total_enemies_in_wave: 0,
            enemies_defeated_in_current_wave: 0,
        }
    }

    /// Credit the drop of a destroyed enemy.
    pub fn collect_resource(&mut self, enemy: &Enemy, narrator: &mut dyn Narrator) {
        let drop = enemy.drop();
        let mut delta = Resources::zero();
        *delta.get_mut(drop.kind) = drop.amount;
        self.resources.apply_delta(&delta, narrator);
    }

    /// Pay for and add a building of `kind`.
    pub fn add_building(&mut self, kind: BuildingKind, narrator: &mut dyn Narrator) -> bool {
        let building = Building::new(kind);
        if !building.construct(&mut self.resources, narrator) {
            return false;
        }
        self.buildings.push(building);
        narrator.play_cue(Cue::ActionSuccess);
        narrator.speak(&format!("{kind} constructed successfully"));
        true
    }

    /// Upgrade the building at `index`.
    pub fn upgrade_building(&mut self, index: usize, narrator: &mut dyn Narrator) -> bool {
        let Some(building) = self.buildings.get_mut(index) else {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("Invalid building index");
            return false;
        };
        building.upgrade(&mut self.resources, narrator)
    }

    /// Run one production cycle over every building, in list order.
    ///
    /// Ordinary buildings add resources. Special buildings re-assert their
    /// effect: shield strength, missiles and wave-skip credits are set, so with
    /// several buildings of one kind the last one wins; tech points and
    /// repairs accumulate.
    pub fn produce_from_buildings(&mut self, narrator: &mut dyn Narrator) {
        let bonus = self.techs.bonus();
        for building in &self.buildings {
            building.produce_resources(&mut self.resources, bonus.efficiency_levels, narrator);
            match building.special_effect() {
                None => {}
                Some(SpecialEffect::Shield(value)) => {
                    self.shield_strength = value + bonus.shield_bonus;
                    narrator.speak(&format!("Shield strength set to {}", self.shield_strength));
                }
                Some(SpecialEffect::TechPoints(value)) => {
                    self.tech_points = self.tech_points.saturating_add(value);
                    narrator.speak(&format!("Research produced {value} tech points"));
                }
                Some(SpecialEffect::Repair(value)) => {
                    let healed = self.colony.heal(value);
                    if healed > 0 {
                        narrator.speak(&format!("Repair bay restored {healed} colony health"));
                    }
                }
                Some(SpecialEffect::Missiles(value)) => {
                    self.missiles = value;
                    narrator.speak(&format!("Missiles available: {value}"));
                }
                Some(SpecialEffect::WaveSkip(value)) => {
                    self.wave_skip_available = value;
                    narrator.speak(&format!("Wave skip available: {value}"));
                }
            }
        }
        debug!(
            wave = self.wave,
            buildings = self.buildings.len(),
            shield = self.shield_strength,
            missiles = self.missiles,
            "production cycle"
        );
    }

    /// Whether the colony has fallen.
    #[must_use]
    pub const fn check_loss(&self) -> bool {
        self.colony.is_destroyed()
    }

    /// Reset the per-wave counters for a wave of `total` enemies.
    pub fn begin_wave(&mut self, total: usize) {
        self.total_enemies_in_wave = u32::try_from(total).unwrap_or(u32::MAX);
        self.enemies_defeated_in_current_wave = 0;
    }

    /// Count `count` enemies as defeated this wave.
    pub fn record_defeats(&mut self, count: usize) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.enemies_defeated_in_current_wave =
            self.enemies_defeated_in_current_wave.saturating_add(count);
    }

    /// Leave combat early.
    ///
    /// Awards `wave / 2` tech points only if at least half the wave was
    /// destroyed; otherwise nothing. Returns the points awarded.
    pub fn retreat(&mut self, narrator: &mut dyn Narrator) -> u32 {
        if self.enemies_defeated_in_current_wave >= self.total_enemies_in_wave / 2 {
            let points = self.wave / 2;
            self.tech_points = self.tech_points.saturating_add(points);
            narrator.speak(&format!("Retreat successful. Earned {points} tech points"));
            points
        } else {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("Retreated too early. No tech points earned");
            0
        }
    }

    /// Award `max(1, wave / 3)` tech points for clearing the wave.
    pub fn complete_wave(&mut self, narrator: &mut dyn Narrator) -> u32 {
        let points = (self.wave / 3).max(1);
        self.tech_points = self.tech_points.saturating_add(points);
        narrator.speak(&format!("Earned {points} tech points"));
        points
    }

    /// Award `wave / 2` bonus tech points on every fifth wave.
    pub fn defeat_boss(&mut self, narrator: &mut dyn Narrator) -> u32 {
        if self.wave % 5 != 0 {
            return 0;
        }
        let points = self.wave / 2;
        self.tech_points = self.tech_points.saturating_add(points);
        narrator.speak(&format!("Boss wave cleared. Bonus {points} tech points"));
        points
    }

    /// Spend all wave-skip credits, jumping the wave counter ahead.
    pub fn skip_waves(&mut self, narrator: &mut dyn Narrator) -> bool {
        if self.wave_skip_available == 0 {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("No wave skips available");
            return false;
        }
        let skipped = self.wave_skip_available;
        self.wave = self.wave.saturating_add(skipped);
        self.wave_skip_available = 0;
        narrator.play_cue(Cue::ActionSuccess);
        narrator.speak(&format!("Skipped {skipped} waves"));
        true
    }

    /// Consume one missile if any are ready.
    pub fn fire_missile(&mut self, narrator: &mut dyn Narrator) -> bool {
        if self.missiles == 0 {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("No missiles available");
            return false;
        }
        self.missiles -= 1;
        true
    }

    /// Repair the colony from the ledger.
    pub fn repair_colony(&mut self, narrator: &mut dyn Narrator) -> bool {
        self.colony.repair(&mut self.resources, narrator)
    }

    /// Buy the next level of `id`, deducting its price from `tech_points`.
    pub fn purchase_tech(&mut self, id: TechId, narrator: &mut dyn Narrator) -> bool {
        let upgrade = id.upgrade();
        let Some(cost) = self.techs.purchase_tech(id, self.tech_points) else {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak(&format!("Cannot research {}", upgrade.name));
            return false;
        };
        self.tech_points -= cost;
        narrator.play_cue(Cue::ActionSuccess);
        narrator.speak(&format!(
            "{} researched to level {}",
            upgrade.name,
            self.techs.level(id)
        ));
        true
    }

    /// Apply the permanent bonuses of owned techs.
    ///
    /// Colony and resource bonuses are additive, so this must run once per
    /// fresh state; the wave bonus is a floor.
    pub fn apply_tech_effects(&mut self) {
        let bonus = self.techs.bonus();
        self.colony.reinforce(bonus.colony_hp);
        self.resources.add(&bonus.resources);
        self.wave = self.wave.max(bonus.min_wave);
    }

    /// Shots fired per `shoot`.
    #[must_use]
    pub fn projectiles_per_shot(&self) -> usize {
        1 + self.techs.bonus().extra_projectiles as usize
    }

    /// Absorb `damage` with the colony shield; returns what passes through.
    pub fn absorb(&mut self, damage: u32, narrator: &mut dyn Narrator) -> u32 {
        if self.shield_strength == 0 {
            return damage;
        }
        let absorbed = damage.min(self.shield_strength);
        self.shield_strength -= absorbed;
        narrator.speak(&format!("Shield absorbed {absorbed} damage"));
        damage - absorbed
    }

    /// Spoken status report.
    #[must_use]
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Wave {}", self.wave),
            format!("Colony HP: {}/{}", self.colony.hp, self.colony.max_hp),
        ];
        if self.shield_strength > 0 {
            lines.push(format!("Shield strength: {}", self.shield_strength));
        }
        if self.missiles > 0 {
            lines.push(format!("Missiles available: {}", self.missiles));
        }
        if self.wave_skip_available > 0 {
            lines.push(format!("Wave skip available: {}", self.wave_skip_available));
        }
        lines.push(format!(
            "Resources - Energy: {}, Metal: {}, Food: {}",
            self.resources.energy, self.resources.metal, self.resources.food
        ));
        lines.push(format!("Tech points: {}", self.tech_points));
        lines
    }
}
