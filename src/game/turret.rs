//! The player's turret: a lane position and a shield pool.

use serde::{Deserialize, Serialize};

use crate::game::Enemy;
use crate::narrator::{Cue, Narrator};

/// A shot fired by the turret.
///
/// Hits are resolved by position, not by trajectory: a targeted projectile
/// hits when an enemy at the target's `(x, y)` is still active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Lane the projectile was fired from.
    pub position: u32,
    /// Enemy the projectile is bound to, if any was in range.
    pub target: Option<Enemy>,
}

impl Projectile {
    /// Whether this projectile is bound to an enemy.
    #[must_use]
    pub const fn is_targeted(&self) -> bool {
        self.target.is_some()
    }
}

/// Player-controlled turret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turret {
    position: u32,
    screen_width: u32,
    shield: u32,
    max_shield: u32,
    is_damaged: bool,
}

impl Turret {
    /// A turret at `position` (clamped to the lane range) with a full shield.
    #[must_use]
    pub fn new(position: u32, screen_width: u32, max_shield: u32) -> Self {
        Self {
            position: position.min(screen_width),
            screen_width,
            shield: max_shield,
            max_shield,
            is_damaged: false,
        }
    }

    /// Current lane.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Highest lane index.
    #[must_use]
    pub const fn screen_width(&self) -> u32 {
        self.screen_width
    }

    /// Current shield.
    #[must_use]
    pub const fn shield(&self) -> u32 {
        self.shield
    }

    /// Shield capacity.
    #[must_use]
    pub const fn max_shield(&self) -> u32 {
        self.max_shield
    }

    /// Whether the shield is below capacity.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.is_damaged
    }

    fn refresh_damage_flag(&mut self) {
        self.is_damaged = self.shield < self.max_shield;
    }

    /// Move one lane left. Silent at the left edge.
    pub fn move_left(&mut self, narrator: &mut dyn Narrator) {
        if self.position > 0 {
            self.position -= 1;
            narrator.play_cue(Cue::TurretMove);
        }
    }

    /// Move one lane right. Silent at the right edge.
    pub fn move_right(&mut self, narrator: &mut dyn Narrator) {
        if self.position < self.screen_width {
            self.position += 1;
            narrator.play_cue(Cue::TurretMove);
        }
    }

    /// Fire at the nearest enemy.
    ///
    /// Distance is `|enemy.x - position|`; among equally near enemies the
    /// first in roster order wins. An empty roster yields an untargeted
    /// projectile. The shoot cue plays either way.
    pub fn shoot(&self, enemies: &[Enemy], narrator: &mut dyn Narrator) -> Projectile {
        narrator.play_cue(Cue::TurretShoot);
        Projectile {
            position: self.position,
            target: self.nearest(enemies, 1).first().copied(),
        }
    }

    /// Fire one projectile at each of the `count` nearest enemies.
    ///
    /// Returns at least one projectile (untargeted when the roster is empty)
    /// and never more than one per enemy. One shoot cue plays per volley.
    pub fn volley(&self, enemies: &[Enemy], count: usize, narrator: &mut dyn Narrator) -> Vec<Projectile> {
        narrator.play_cue(Cue::TurretShoot);
        let targets = self.nearest(enemies, count.max(1));
        if targets.is_empty() {
            return vec![Projectile {
                position: self.position,
                target: None,
            }];
        }
        targets
            .into_iter()
            .map(|enemy| Projectile {
                position: self.position,
                target: Some(enemy),
            })
            .collect()
    }

    /// Up to `count` enemies ordered by distance, ties broken by roster order.
    fn nearest(&self, enemies: &[Enemy], count: usize) -> Vec<Enemy> {
        let mut ranked: Vec<(u32, usize)> = enemies
            .iter()
            .enumerate()
            .map(|(i, enemy)| (enemy.x.abs_diff(self.position), i))
            .collect();
        ranked.sort_unstable();
        ranked
            .into_iter()
            .take(count)
            .map(|(_, i)| enemies[i])
            .collect()
    }

    /// Absorb damage into the shield, flooring at zero.
    pub fn take_damage(&mut self, amount: u32, narrator: &mut dyn Narrator) {
        let before = self.shield;
        self.shield = self.shield.saturating_sub(amount);
        self.refresh_damage_flag();
        if before > 0 && self.shield == 0 {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("Turret shield depleted");
        } else {
            narrator.play_cue(Cue::EnemyHit);
        }
    }

    /// Restore shield, capped at capacity.
    ///
    /// Narrates only when the shield actually rose. Returns the amount restored.
    pub fn repair_shield(&mut self, amount: u32, narrator: &mut dyn Narrator) -> u32 {
        let before = self.shield;
        self.shield = self.shield.saturating_add(amount).min(self.max_shield);
        self.refresh_damage_flag();
        let restored = self.shield - before;
        if restored > 0 {
            narrator.play_cue(Cue::ActionSuccess);
            narrator.speak(&format!("Turret shield repaired to {}", self.shield));
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EnemyKind;
    use crate::narrator::RecordingNarrator;

    fn basic(x: u32) -> Enemy {
        Enemy::new(EnemyKind::BasicInvader, x, 0)
    }

    #[test]
    fn test_movement_is_clamped() {
        let mut narrator = RecordingNarrator::new();
        let mut turret = Turret::new(0, 10, 100);

        turret.move_left(&mut narrator);
        assert_eq!(turret.position(), 0);
        assert!(narrator.events().is_empty());

        turret.move_right(&mut narrator);
        assert_eq!(turret.position(), 1);
        assert!(narrator.played(Cue::TurretMove));

        let mut turret = Turret::new(10, 10, 100);
        narrator.clear();
        turret.move_right(&mut narrator);
        assert_eq!(turret.position(), 10);
        assert!(narrator.events().is_empty());
    }

    #[test]
    fn test_shoot_targets_nearest() {
        let mut narrator = RecordingNarrator::new();
        let turret = Turret::new(5, 10, 100);
        let enemies = [basic(8), basic(3), basic(10)];

        let projectile = turret.shoot(&enemies, &mut narrator);
        assert_eq!(projectile.target.map(|e| e.x), Some(3));
        assert!(narrator.played(Cue::TurretShoot));
    }

    #[test]
    fn test_shoot_tie_prefers_first() {
        let mut narrator = RecordingNarrator::new();
        let turret = Turret::new(5, 10, 100);
        let enemies = [basic(7), basic(3)];
        let projectile = turret.shoot(&enemies, &mut narrator);
        assert_eq!(projectile.target.map(|e| e.x), Some(7));
    }

    #[test]
    fn test_shoot_empty_roster_is_untargeted() {
        let mut narrator = RecordingNarrator::new();
        let turret = Turret::new(5, 10, 100);
        let projectile = turret.shoot(&[], &mut narrator);
        assert!(!projectile.is_targeted());
        assert!(narrator.played(Cue::TurretShoot));
    }

    #[test]
    fn test_volley_distinct_targets() {
        let mut narrator = RecordingNarrator::new();
        let turret = Turret::new(5, 10, 100);
        let enemies = [basic(0), basic(6), basic(4)];
        let shots = turret.volley(&enemies, 2, &mut narrator);
        let xs: Vec<u32> = shots.iter().filter_map(|p| p.target.map(|e| e.x)).collect();
        assert_eq!(xs, vec![6, 4]);

        let shots = turret.volley(&enemies, 10, &mut narrator);
        assert_eq!(shots.len(), 3);
    }

    #[test]
    fn test_shield_never_negative() {
        let mut narrator = RecordingNarrator::new();
        let mut turret = Turret::new(5, 10, 100);
        turret.take_damage(150, &mut narrator);
        assert_eq!(turret.shield(), 0);
        assert!(turret.is_damaged());
        assert!(narrator.heard("Turret shield depleted"));
        assert!(narrator.played(Cue::ActionFail));

        narrator.clear();
        turret.take_damage(10, &mut narrator);
        assert!(!narrator.heard("depleted"));
        assert!(narrator.played(Cue::EnemyHit));
    }

    #[test]
    fn test_repair_shield_narrates_only_on_increase() {
        let mut narrator = RecordingNarrator::new();
        let mut turret = Turret::new(5, 10, 100);
        assert_eq!(turret.repair_shield(20, &mut narrator), 0);
        assert!(narrator.events().is_empty());

        turret.take_damage(30, &mut narrator);
        narrator.clear();
        assert_eq!(turret.repair_shield(50, &mut narrator), 30);
        assert_eq!(turret.shield(), 100);
        assert!(!turret.is_damaged());
        assert!(narrator.played(Cue::ActionSuccess));
    }

    #[test]
    fn test_copy_is_an_independent_snapshot() {
        let mut narrator = RecordingNarrator::new();
        let mut turret = Turret::new(5, 10, 100);
        let snapshot = turret;

        turret.take_damage(40, &mut narrator);
        turret.move_left(&mut narrator);
        assert_eq!(snapshot.shield(), 100);
        assert_eq!(snapshot.position(), 5);

        // Capacity is fixed at construction; repair never exceeds it.
        turret.repair_shield(u32::MAX, &mut narrator);
        assert_eq!(turret.shield(), snapshot.shield());
        assert_eq!(turret.max_shield(), 100);
    }
}
