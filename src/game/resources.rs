//! The resource ledger: energy, metal and food.
//!
//! Counters are plain signed integers. Nothing here forbids a negative value;
//! operations that spend resources check [`Resources::can_afford`] first and
//! leave the ledger untouched when the check fails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;
use crate::narrator::{Cue, Narrator};

/// One resource channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// Energy.
    Energy,
    /// Metal.
    Metal,
    /// Food.
    Food,
}

impl ResourceKind {
    /// All channels in ledger order.
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Energy, ResourceKind::Metal, ResourceKind::Food];

    /// Capitalised display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::Energy => "Energy",
            ResourceKind::Metal => "Metal",
            ResourceKind::Food => "Food",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENERGY" => Ok(ResourceKind::Energy),
            "METAL" => Ok(ResourceKind::Metal),
            "FOOD" => Ok(ResourceKind::Food),
            _ => Err(ParseNameError::new("resource", s)),
        }
    }
}

/// Resources released when an enemy is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDrop {
    /// Channel receiving the drop.
    pub kind: ResourceKind,
    /// Amount added.
    pub amount: i32,
}

impl ResourceDrop {
    /// Create a drop.
    #[must_use]
    pub const fn new(kind: ResourceKind, amount: i32) -> Self {
        Self { kind, amount }
    }
}

/// The three fungible counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Energy held.
    pub energy: i32,
    /// Metal held.
    pub metal: i32,
    /// Food held.
    pub food: i32,
}

impl Resources {
    /// Create a ledger with the given counters.
    #[must_use]
    pub const fn new(energy: i32, metal: i32, food: i32) -> Self {
        Self {
            energy,
            metal,
            food,
        }
    }

    /// An empty ledger.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Value of one channel.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Energy => self.energy,
            ResourceKind::Metal => self.metal,
            ResourceKind::Food => self.food,
        }
    }

    /// Mutable access to one channel.
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut i32 {
        match kind {
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Metal => &mut self.metal,
            ResourceKind::Food => &mut self.food,
        }
    }

    /// Whether every channel holds at least as much as `cost`.
    #[must_use]
    pub const fn can_afford(&self, cost: &Resources) -> bool {
        self.energy >= cost.energy && self.metal >= cost.metal && self.food >= cost.food
    }

    /// Deduct `cost` if every channel covers it.
    ///
    /// Returns `false` and leaves the ledger unchanged otherwise.
    pub fn try_spend(&mut self, cost: &Resources) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.energy -= cost.energy;
        self.metal -= cost.metal;
        self.food -= cost.food;
        true
    }

    /// Add `other` channel by channel.
    pub fn add(&mut self, other: &Resources) {
        self.energy = self.energy.saturating_add(other.energy);
        self.metal = self.metal.saturating_add(other.metal);
        self.food = self.food.saturating_add(other.food);
    }

    /// Add a delta, narrating every nonzero channel with its sign.
    pub fn apply_delta(&mut self, delta: &Resources, narrator: &mut dyn Narrator) {
        for kind in ResourceKind::ALL {
            let amount = delta.get(kind);
            if amount == 0 {
                continue;
            }
            let slot = self.get_mut(kind);
            *slot = slot.saturating_add(amount);
            narrator.play_cue(Cue::ResourceChange);
            narrator.speak(&format!("{kind} {amount:+}"));
        }
    }

    /// Whether every channel is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.energy == 0 && self.metal == 0 && self.food == 0
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} energy, {} metal, {} food",
            self.energy, self.metal, self.food
        )
    }
}
