//! Buildings: construction, upgrades and per-cycle output.
//!
//! Every table is an exhaustive `match` over [`BuildingKind`] and
//! [`BuildingLevel`], so adding a variant without its numbers does not compile.
//!
//! Level multipliers are 1.0, 1.75 and 3.0. They are applied in integer
//! quarters and floored, so `5 * 1.75` yields 8.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;
use crate::game::Resources;
use crate::narrator::{Cue, Narrator};

/// Building type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingKind {
    /// Produces energy.
    SolarPanel,
    /// Produces food.
    HydroponicFarm,
    /// Produces metal.
    ScrapForge,
    /// Sets colony shield strength.
    ShieldGenerator,
    /// Adds tech points.
    ResearchLab,
    /// Heals the colony.
    RepairBay,
    /// Sets available missiles.
    MissileSilo,
    /// Sets wave-skip credits.
    CommandCenter,
}

impl BuildingKind {
    /// Every building type in menu order.
    pub const ALL: [BuildingKind; 8] = [
        BuildingKind::SolarPanel,
        BuildingKind::HydroponicFarm,
        BuildingKind::ScrapForge,
        BuildingKind::ShieldGenerator,
        BuildingKind::ResearchLab,
        BuildingKind::RepairBay,
        BuildingKind::MissileSilo,
        BuildingKind::CommandCenter,
    ];

    /// Enum name as stored on disk.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BuildingKind::SolarPanel => "SOLAR_PANEL",
            BuildingKind::HydroponicFarm => "HYDROPONIC_FARM",
            BuildingKind::ScrapForge => "SCRAP_FORGE",
            BuildingKind::ShieldGenerator => "SHIELD_GENERATOR",
            BuildingKind::ResearchLab => "RESEARCH_LAB",
            BuildingKind::RepairBay => "REPAIR_BAY",
            BuildingKind::MissileSilo => "MISSILE_SILO",
            BuildingKind::CommandCenter => "COMMAND_CENTER",
        }
    }

    /// Title-cased name for narration.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            BuildingKind::SolarPanel => "Solar Panel",
            BuildingKind::HydroponicFarm => "Hydroponic Farm",
            BuildingKind::ScrapForge => "Scrap Forge",
            BuildingKind::ShieldGenerator => "Shield Generator",
            BuildingKind::ResearchLab => "Research Lab",
            BuildingKind::RepairBay => "Repair Bay",
            BuildingKind::MissileSilo => "Missile Silo",
            BuildingKind::CommandCenter => "Command Center",
        }
    }

    /// Construction cost.
    #[must_use]
    pub const fn cost(self) -> Resources {
        // Resources::new takes (energy, metal, food).
        match self {
            BuildingKind::SolarPanel => Resources::new(0, 30, 0),
            BuildingKind::HydroponicFarm => Resources::new(20, 20, 0),
            BuildingKind::ScrapForge => Resources::new(10, 40, 0),
            BuildingKind::ShieldGenerator => Resources::new(30, 50, 0),
            BuildingKind::ResearchLab => Resources::new(40, 40, 10),
            BuildingKind::RepairBay => Resources::new(20, 60, 0),
            BuildingKind::MissileSilo => Resources::new(40, 80, 0),
            BuildingKind::CommandCenter => Resources::new(60, 100, 30),
        }
    }

    /// Ordinary output at BASIC level. Zero for special-effect buildings.
    #[must_use]
    pub const fn base_production(self) -> Resources {
        match self {
            BuildingKind::SolarPanel => Resources::new(5, 0, 0),
            BuildingKind::HydroponicFarm => Resources::new(0, 0, 3),
            BuildingKind::ScrapForge => Resources::new(0, 2, 0),
            BuildingKind::ShieldGenerator
            | BuildingKind::ResearchLab
            | BuildingKind::RepairBay
            | BuildingKind::MissileSilo
            | BuildingKind::CommandCenter => Resources::zero(),
        }
    }

    /// Whether this type yields a special effect instead of resources.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(
            self,
            BuildingKind::ShieldGenerator
                | BuildingKind::ResearchLab
                | BuildingKind::RepairBay
                | BuildingKind::MissileSilo
                | BuildingKind::CommandCenter
        )
    }

    /// Special effect at `level`, if this type has one.
    #[must_use]
    pub const fn special_effect(self, level: BuildingLevel) -> Option<SpecialEffect> {
        use BuildingLevel::{Advanced, Basic, Improved};
        Some(match (self, level) {
            (BuildingKind::ShieldGenerator, Basic) => SpecialEffect::Shield(25),
            (BuildingKind::ShieldGenerator, Improved) => SpecialEffect::Shield(45),
            (BuildingKind::ShieldGenerator, Advanced) => SpecialEffect::Shield(75),
            (BuildingKind::ResearchLab, Basic) => SpecialEffect::TechPoints(1),
            (BuildingKind::ResearchLab, Improved) => SpecialEffect::TechPoints(2),
            (BuildingKind::ResearchLab, Advanced) => SpecialEffect::TechPoints(4),
            (BuildingKind::RepairBay, Basic) => SpecialEffect::Repair(10),
            (BuildingKind::RepairBay, Improved) => SpecialEffect::Repair(20),
            (BuildingKind::RepairBay, Advanced) => SpecialEffect::Repair(35),
            (BuildingKind::MissileSilo, Basic) => SpecialEffect::Missiles(1),
            (BuildingKind::MissileSilo, Improved) => SpecialEffect::Missiles(2),
            (BuildingKind::MissileSilo, Advanced) => SpecialEffect::Missiles(3),
            (BuildingKind::CommandCenter, Basic) => SpecialEffect::WaveSkip(1),
            (BuildingKind::CommandCenter, Improved) => SpecialEffect::WaveSkip(2),
            (BuildingKind::CommandCenter, Advanced) => SpecialEffect::WaveSkip(3),
            (
                BuildingKind::SolarPanel | BuildingKind::HydroponicFarm | BuildingKind::ScrapForge,
                _,
            ) => return None,
        })
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BuildingKind {
    type Err = ParseNameError;

    /// Accepts the stored enum name in any case (`SOLAR_PANEL`, `solar_panel`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        BuildingKind::ALL
            .into_iter()
            .find(|kind| kind.name() == upper)
            .ok_or_else(|| ParseNameError::new("building", s))
    }
}

/// Building tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingLevel {
    /// As built.
    #[default]
    Basic,
    /// First upgrade.
    Improved,
    /// Final tier.
    Advanced,
}

impl BuildingLevel {
    /// The next tier, or `None` at ADVANCED.
    #[must_use]
    pub const fn next(self) -> Option<BuildingLevel> {
        match self {
            BuildingLevel::Basic => Some(BuildingLevel::Improved),
            BuildingLevel::Improved => Some(BuildingLevel::Advanced),
            BuildingLevel::Advanced => None,
        }
    }

    /// Production multiplier in quarters (1.0, 1.75, 3.0).
    #[must_use]
    pub const fn multiplier_quarters(self) -> i32 {
        match self {
            BuildingLevel::Basic => 4,
            BuildingLevel::Improved => 7,
            BuildingLevel::Advanced => 12,
        }
    }

    /// Cost of upgrading *to* this level; `None` for BASIC.
    ///
    /// Shared by every building type.
    #[must_use]
    pub const fn upgrade_cost(self) -> Option<Resources> {
        match self {
            BuildingLevel::Basic => None,
            BuildingLevel::Improved => Some(Resources::new(30, 50, 10)),
            BuildingLevel::Advanced => Some(Resources::new(60, 100, 25)),
        }
    }

    /// Enum name as stored on disk.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BuildingLevel::Basic => "BASIC",
            BuildingLevel::Improved => "IMPROVED",
            BuildingLevel::Advanced => "ADVANCED",
        }
    }

    /// Lower-case label for narration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BuildingLevel::Basic => "basic",
            BuildingLevel::Improved => "improved",
            BuildingLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for BuildingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuildingLevel {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BASIC" => Ok(BuildingLevel::Basic),
            "IMPROVED" => Ok(BuildingLevel::Improved),
            "ADVANCED" => Ok(BuildingLevel::Advanced),
            _ => Err(ParseNameError::new("building level", s)),
        }
    }
}

/// Non-resource output of a special building for one production cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialEffect {
    /// Colony shield strength, set.
    Shield(u32),
    /// Tech points, added.
    TechPoints(u32),
    /// Colony hit points, added and capped.
    Repair(i32),
    /// Missiles, set.
    Missiles(u32),
    /// Wave-skip credits, set.
    WaveSkip(u32),
}

/// An owned building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Building type.
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    /// Current tier.
    pub level: BuildingLevel,
}

impl Building {
    /// A new BASIC building. Nothing is paid until [`Building::construct`].
    #[must_use]
    pub const fn new(kind: BuildingKind) -> Self {
        Self {
            kind,
            level: BuildingLevel::Basic,
        }
    }

    /// A building at an explicit level, as restored from a save.
    #[must_use]
    pub const fn with_level(kind: BuildingKind, level: BuildingLevel) -> Self {
        Self { kind, level }
    }

    /// Pay the construction cost.
    ///
    /// Fails without touching `resources` if any channel is short.
    pub fn construct(&self, resources: &mut Resources, narrator: &mut dyn Narrator) -> bool {
        if !resources.try_spend(&self.kind.cost()) {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("Insufficient resources");
            return false;
        }
        narrator.play_cue(Cue::ConstructionStart);
        narrator.speak(&format!("Building {}", self.kind));
        narrator.play_cue(Cue::ConstructionComplete);
        true
    }

    /// Advance one tier, paying the target tier's upgrade cost.
    pub fn upgrade(&mut self, resources: &mut Resources, narrator: &mut dyn Narrator) -> bool {
        let Some(next) = self.level.next() else {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak(&format!("{} is already at maximum level", self.kind));
            return false;
        };
        let cost = next.upgrade_cost().unwrap_or_default();
        if !resources.try_spend(&cost) {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("Insufficient resources for upgrade");
            return false;
        }
        self.level = next;
        narrator.play_cue(Cue::ConstructionComplete);
        narrator.speak(&format!("{} upgraded to {} level", self.kind, next));
        true
    }

    /// Ordinary output this cycle, with `efficiency_levels` quarter bonuses.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn production(&self, efficiency_levels: u32) -> Resources {
        let base = self.kind.base_production();
        let quarters = self.level.multiplier_quarters();
        // Each efficiency level adds a quarter on top of the level multiplier.
        let bonus = 4 + efficiency_levels as i32;
        Resources::new(
            base.energy * quarters * bonus / 16,
            base.metal * quarters * bonus / 16,
            base.food * quarters * bonus / 16,
        )
    }

    /// Add this cycle's ordinary output to `resources`, narrating each
    /// nonzero channel. Returns what was produced.
    pub fn produce_resources(
        &self,
        resources: &mut Resources,
        efficiency_levels: u32,
        narrator: &mut dyn Narrator,
    ) -> Resources {
        let produced = self.production(efficiency_levels);
        for (amount, label) in [
            (produced.energy, "energy"),
            (produced.metal, "metal"),
            (produced.food, "food"),
        ] {
            if amount != 0 {
                narrator.speak(&format!("Generated {amount} {label}"));
            }
        }
        resources.add(&produced);
        produced
    }

    /// Special effect at the current level.
    #[must_use]
    pub const fn special_effect(&self) -> Option<SpecialEffect> {
        self.kind.special_effect(self.level)
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.level)
    }
}
