//! The tech tree.
//!
//! Upgrade definitions live in the immutable [`CATALOG`]. A player's progress
//! is nothing more than the level map in [`PlayerTechTree`]; every "current
//! level" is read from that map. Tech points are held by
//! [`GameState`](crate::game::GameState), which pairs validation, deduction
//! and recording in a single operation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;
use crate::game::Resources;

/// Identifier of a tech upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechId {
    /// +25 colony max hp per level.
    ReinforcedColony,
    /// +10 shield-generator output per level.
    AdvancedShields,
    /// Gates multi-shot.
    RapidFire,
    /// One extra projectile per level.
    MultiShot,
    /// Bonus starting resources per level.
    ResourceStorage,
    /// +25% ordinary building output per level.
    EfficientBuildings,
    /// Start at a later wave.
    WaveSkip,
}

impl TechId {
    /// Every tech in catalog order.
    pub const ALL: [TechId; 7] = [
        TechId::ReinforcedColony,
        TechId::AdvancedShields,
        TechId::RapidFire,
        TechId::MultiShot,
        TechId::ResourceStorage,
        TechId::EfficientBuildings,
        TechId::WaveSkip,
    ];

    /// Stable string id, as stored in saves.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TechId::ReinforcedColony => "reinforced_colony",
            TechId::AdvancedShields => "advanced_shields",
            TechId::RapidFire => "rapid_fire",
            TechId::MultiShot => "multi_shot",
            TechId::ResourceStorage => "resource_storage",
            TechId::EfficientBuildings => "efficient_buildings",
            TechId::WaveSkip => "wave_skip",
        }
    }

    /// Catalog entry for this id.
    #[must_use]
    pub fn upgrade(self) -> &'static TechUpgrade {
        // CATALOG is ordered like ALL.
        &CATALOG[self as usize]
    }
}

impl fmt::Display for TechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechId {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TechId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseNameError::new("tech", s))
    }
}

/// Tech grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TechCategory {
    /// Colony and turret defense.
    Defense,
    /// Weapons.
    Weapons,
    /// Resource generation.
    Economy,
    /// Special abilities.
    Special,
}

/// Immutable definition of a purchasable upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechUpgrade {
    /// Identifier.
    pub id: TechId,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Category.
    pub category: TechCategory,
    /// Cost of the first level; level `n + 1` costs `base_cost * (n + 1)`.
    pub base_cost: u32,
    /// Highest purchasable level.
    pub max_level: u32,
    /// Techs that must be owned at level 1 or higher.
    pub prerequisites: &'static [TechId],
}

impl TechUpgrade {
    /// Cost of going from `current_level` to the next level.
    #[must_use]
    pub const fn cost(&self, current_level: u32) -> u32 {
        self.base_cost.saturating_mul(current_level.saturating_add(1))
    }

    /// Whether the next level can be bought.
    ///
    /// Max level, price and prerequisites are checked independently; any one
    /// failing rejects the purchase.
    #[must_use]
    pub fn can_purchase(&self, owned: &BTreeMap<TechId, u32>, available_points: u32) -> bool {
        let level = owned.get(&self.id).copied().unwrap_or(0);
        if level >= self.max_level {
            return false;
        }
        if available_points < self.cost(level) {
            return false;
        }
        self.prerequisites
            .iter()
            .all(|prereq| owned.get(prereq).is_some_and(|&l| l >= 1))
    }
}

/// Every tech upgrade, in [`TechId::ALL`] order.
pub static CATALOG: [TechUpgrade; 7] = [
    TechUpgrade {
        id: TechId::ReinforcedColony,
        name: "Reinforced Colony",
        description: "Increases colony max HP",
        category: TechCategory::Defense,
        base_cost: 10,
        max_level: 3,
        prerequisites: &[],
    },
    TechUpgrade {
        id: TechId::AdvancedShields,
        name: "Advanced Shields",
        description: "Shield generators produce stronger shields",
        category: TechCategory::Defense,
        base_cost: 15,
        max_level: 2,
        prerequisites: &[TechId::ReinforcedColony],
    },
    TechUpgrade {
        id: TechId::RapidFire,
        name: "Rapid Fire",
        description: "Improves turret handling",
        category: TechCategory::Weapons,
        base_cost: 10,
        max_level: 3,
        prerequisites: &[],
    },
    TechUpgrade {
        id: TechId::MultiShot,
        name: "Multi-Shot",
        description: "Fires extra projectiles at nearby enemies",
        category: TechCategory::Weapons,
        base_cost: 20,
        max_level: 2,
        prerequisites: &[TechId::RapidFire],
    },
    TechUpgrade {
        id: TechId::ResourceStorage,
        name: "Resource Storage",
        description: "Start with more initial resources",
        category: TechCategory::Economy,
        base_cost: 5,
        max_level: 3,
        prerequisites: &[],
    },
    TechUpgrade {
        id: TechId::EfficientBuildings,
        name: "Efficient Buildings",
        description: "Buildings produce more resources",
        category: TechCategory::Economy,
        base_cost: 15,
        max_level: 2,
        prerequisites: &[TechId::ResourceStorage],
    },
    TechUpgrade {
        id: TechId::WaveSkip,
        name: "Wave Skip",
        description: "Start at higher wave numbers",
        category: TechCategory::Special,
        base_cost: 30,
        max_level: 3,
        prerequisites: &[],
    },
];

/// Aggregate modifiers granted by owned techs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TechBonus {
    /// Added to colony max hp and current hp.
    pub colony_hp: i32,
    /// Added to the resource ledger.
    pub resources: Resources,
    /// Wave floor; zero means no floor.
    pub min_wave: u32,
    /// Added to shield-generator output.
    pub shield_bonus: u32,
    /// Quarter-steps added to ordinary building output.
    pub efficiency_levels: u32,
    /// Extra projectiles per shot.
    pub extra_projectiles: u32,
}

/// A player's owned tech levels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerTechTree {
    owned: BTreeMap<TechId, u32>,
}

impl PlayerTechTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored levels. Levels above a tech's maximum are clamped
    /// and zero levels are dropped.
    pub fn from_levels(levels: impl IntoIterator<Item = (TechId, u32)>) -> Self {
        let owned = levels
            .into_iter()
            .filter(|&(_, level)| level > 0)
            .map(|(id, level)| (id, level.min(id.upgrade().max_level)))
            .collect();
        Self { owned }
    }

    /// Owned level of `id` (zero if never bought).
    #[must_use]
    pub fn level(&self, id: TechId) -> u32 {
        self.owned.get(&id).copied().unwrap_or(0)
    }

    /// The owned level map.
    #[must_use]
    pub const fn owned(&self) -> &BTreeMap<TechId, u32> {
        &self.owned
    }

    /// Price of the next level, or `None` when maxed.
    #[must_use]
    pub fn next_cost(&self, id: TechId) -> Option<u32> {
        let upgrade = id.upgrade();
        let level = self.level(id);
        (level < upgrade.max_level).then(|| upgrade.cost(level))
    }

    /// Whether `id` can be bought with `available_points`.
    #[must_use]
    pub fn can_purchase(&self, id: TechId, available_points: u32) -> bool {
        id.upgrade().can_purchase(&self.owned, available_points)
    }

    /// Validate and record one level of `id`.
    ///
    /// Returns the price paid, or `None` if the purchase is not allowed.
    /// Points are not deducted here; use
    /// [`GameState::purchase_tech`](crate::game::GameState::purchase_tech).
    pub fn purchase_tech(&mut self, id: TechId, available_points: u32) -> Option<u32> {
        if !self.can_purchase(id, available_points) {
            return None;
        }
        let level = self.level(id);
        let cost = id.upgrade().cost(level);
        self.owned.insert(id, level + 1);
        Some(cost)
    }

    /// Techs purchasable right now, in catalog order.
    pub fn available(&self, available_points: u32) -> impl Iterator<Item = &'static TechUpgrade> + '_ {
        CATALOG
            .iter()
            .filter(move |upgrade| upgrade.can_purchase(&self.owned, available_points))
    }

    /// Modifiers implied by the owned levels.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn bonus(&self) -> TechBonus {
        let level = |id| self.level(id);
        let storage = level(TechId::ResourceStorage) as i32;
        let wave_skip = level(TechId::WaveSkip);
        TechBonus {
            colony_hp: level(TechId::ReinforcedColony) as i32 * 25,
            resources: Resources::new(storage * 20, storage * 20, storage * 10),
            min_wave: if wave_skip > 0 { wave_skip * 2 - 1 } else { 0 },
            shield_bonus: level(TechId::AdvancedShields) * 10,
            efficiency_levels: level(TechId::EfficientBuildings),
            extra_projectiles: level(TechId::MultiShot),
        }
    }
}
