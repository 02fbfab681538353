//! Enemy types and the wave generator.
//!
//! [`generate_wave`] is a pure function of the wave number. Waves 1, 3 and 5
//! are hand-tuned for onboarding; every other wave follows the scaling
//! formula below, capped by the lane count.
//!
//! # Layout
//!
//! Enemies sit on a lane `x` and a depth row `y`. Each enemy type has its own
//! row (basic invaders `y = 0`, armored ships `y = 1`, swarmers `y = 2`) and
//! waves past 15 stack extra rows of basic invaders from `y = 3` onward, so
//! no two enemies of one wave share a position.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;
use crate::game::{ResourceDrop, ResourceKind};

/// Number of lanes enemies are spread across.
pub const SCREEN_WIDTH: u32 = 10;

/// Depth row of basic invaders.
const BASIC_ROW: u32 = 0;
/// Depth row of armored ships.
const ARMORED_ROW: u32 = 1;
/// Depth row of swarmers.
const SWARMER_ROW: u32 = 2;
/// First depth row used for stacked reinforcements.
const STACKED_ROW_BASE: u32 = 3;
/// Basic invaders per stacked row.
const STACKED_ROW_SIZE: u32 = 5;

/// Enemy type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyKind {
    /// Harmless on its own; drops energy.
    BasicInvader,
    /// Fires at the turret every tick; drops metal.
    ArmoredShip,
    /// Dives at the colony; drops food.
    Swarmer,
}

impl EnemyKind {
    /// The drop an enemy of this type leaves when none is set explicitly.
    #[must_use]
    pub const fn default_drop(self) -> ResourceDrop {
        match self {
            EnemyKind::BasicInvader => ResourceDrop::new(ResourceKind::Energy, 10),
            EnemyKind::ArmoredShip => ResourceDrop::new(ResourceKind::Metal, 15),
            EnemyKind::Swarmer => ResourceDrop::new(ResourceKind::Food, 5),
        }
    }

    /// Enum name as stored on disk.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EnemyKind::BasicInvader => "BASIC_INVADER",
            EnemyKind::ArmoredShip => "ARMORED_SHIP",
            EnemyKind::Swarmer => "SWARMER",
        }
    }

    /// Spoken name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EnemyKind::BasicInvader => "basic invader",
            EnemyKind::ArmoredShip => "armored ship",
            EnemyKind::Swarmer => "swarmer",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EnemyKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BASIC_INVADER" => Ok(EnemyKind::BasicInvader),
            "ARMORED_SHIP" => Ok(EnemyKind::ArmoredShip),
            "SWARMER" => Ok(EnemyKind::Swarmer),
            _ => Err(ParseNameError::new("enemy", s)),
        }
    }
}

/// A single enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Enemy type.
    pub kind: EnemyKind,
    /// Lane.
    pub x: u32,
    /// Depth row.
    pub y: u32,
    /// Explicit drop; `None` means the type default.
    pub resource_drop: Option<ResourceDrop>,
}

impl Enemy {
    /// Create an enemy with the default drop for its type.
    #[must_use]
    pub const fn new(kind: EnemyKind, x: u32, y: u32) -> Self {
        Self {
            kind,
            x,
            y,
            resource_drop: None,
        }
    }

    /// Override the drop.
    #[must_use]
    pub const fn with_drop(mut self, drop: ResourceDrop) -> Self {
        self.resource_drop = Some(drop);
        self
    }

    /// The drop this enemy leaves behind.
    #[must_use]
    pub const fn drop(&self) -> ResourceDrop {
        match self.resource_drop {
            Some(drop) => drop,
            None => self.kind.default_drop(),
        }
    }

    /// Whether this enemy occupies the same position as `other`.
    #[must_use]
    pub const fn same_position(&self, other: &Enemy) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Generate the roster for `wave_number`.
///
/// Deterministic: the same wave number always yields the same sequence.
/// Wave 0 is treated as wave 1.
#[must_use]
pub fn generate_wave(wave_number: u32) -> Vec<Enemy> {
    let wave = wave_number.max(1);
    match wave {
        1 => (0..5)
            .map(|i| Enemy::new(EnemyKind::BasicInvader, i * 2, BASIC_ROW))
            .collect(),
        3 => {
            let mut enemies: Vec<Enemy> = (0..10)
                .map(|i| Enemy::new(EnemyKind::BasicInvader, i, BASIC_ROW))
                .collect();
            enemies.push(Enemy::new(EnemyKind::ArmoredShip, 3, ARMORED_ROW));
            enemies.push(Enemy::new(EnemyKind::ArmoredShip, 7, ARMORED_ROW));
            enemies
        }
        5 => {
            let mut enemies: Vec<Enemy> = (0..8)
                .map(|i| Enemy::new(EnemyKind::BasicInvader, i, BASIC_ROW))
                .collect();
            enemies.extend((0..3).map(|i| Enemy::new(EnemyKind::Swarmer, i * 3 + 2, SWARMER_ROW)));
            enemies
        }
        _ => scaled_wave(wave),
    }
}

/// Formula-driven roster for waves without a hand-tuned layout.
fn scaled_wave(wave: u32) -> Vec<Enemy> {
    let num_basic = 5 + wave.saturating_mul(2);
    let num_armored = wave.saturating_sub(3).saturating_mul(2);
    let num_swarmers = wave.saturating_sub(5);

    let max_basic = num_basic
        .saturating_add((wave / 10) * 3)
        .min(SCREEN_WIDTH);
    let max_armored = num_armored
        .saturating_add((wave / 15) * 2)
        .min(SCREEN_WIDTH / 2);
    let max_swarmers = num_swarmers
        .saturating_add(wave / 20)
        .min(SCREEN_WIDTH / 3);

    let mut enemies = Vec::with_capacity((max_basic + max_armored + max_swarmers) as usize);
    enemies.extend((0..max_basic).map(|i| Enemy::new(EnemyKind::BasicInvader, i, BASIC_ROW)));
    enemies.extend((0..max_armored).map(|i| Enemy::new(EnemyKind::ArmoredShip, i * 2 + 1, ARMORED_ROW)));
    enemies.extend((0..max_swarmers).map(|i| Enemy::new(EnemyKind::Swarmer, i * 3 + 2, SWARMER_ROW)));

    if wave > 15 {
        let extra_rows = wave / 15;
        for row in 0..extra_rows {
            let y = STACKED_ROW_BASE + row;
            enemies.extend(
                (0..STACKED_ROW_SIZE.min(SCREEN_WIDTH))
                    .map(|x| Enemy::new(EnemyKind::BasicInvader, x, y)),
            );
        }
    }

    enemies
}

/// Count enemies of each type: `(basic, armored, swarmers)`.
#[must_use]
pub fn composition(enemies: &[Enemy]) -> (usize, usize, usize) {
    enemies
        .iter()
        .fold((0, 0, 0), |(basic, armored, swarm), enemy| match enemy.kind {
            EnemyKind::BasicInvader => (basic + 1, armored, swarm),
            EnemyKind::ArmoredShip => (basic, armored + 1, swarm),
            EnemyKind::Swarmer => (basic, armored, swarm + 1),
        })
}
