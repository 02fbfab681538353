//! Combat resolution.
//!
//! A [`Battle`] holds the active enemy roster and projectiles in flight for
//! one wave. [`Battle::tick`] advances it one step in a fixed order:
//! projectiles resolve first, then enemies attack, then the colony is checked
//! for loss, then the roster for completion. A lost colony takes priority over
//! a cleared wave in the same tick.

use tracing::trace;

use crate::game::{generate_wave, Enemy, EnemyKind, GameState, Projectile, Turret};
use crate::narrator::{Cue, Narrator};

/// Damage an armored ship deals to the turret each tick.
pub const ARMORED_SHIP_DAMAGE: u32 = 10;

/// Damage a swarmer deals to the colony when it arrives.
pub const SWARMER_DAMAGE: u32 = 5;

/// Result of one combat tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Enemies remain and the colony stands.
    Ongoing,
    /// Every enemy is gone.
    WaveCleared,
    /// The colony fell.
    ColonyLost,
}

/// One wave in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Battle {
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
}

impl Battle {
    /// A battle against an explicit roster.
    #[must_use]
    pub fn new(enemies: Vec<Enemy>) -> Self {
        Self {
            enemies,
            projectiles: Vec::new(),
        }
    }

    /// Spawn the roster for `state.wave`, reset the wave counters and
    /// announce it.
    pub fn start(state: &mut GameState, narrator: &mut dyn Narrator) -> Self {
        let enemies = generate_wave(state.wave);
        state.begin_wave(enemies.len());
        narrator.speak(&format!(
            "Wave {} incoming. {} enemies detected.",
            state.wave,
            enemies.len()
        ));
        Self::new(enemies)
    }

    /// Active enemies.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Whether no enemies remain.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Fire the turret. Multi-shot techs add projectiles aimed at the
    /// next-nearest enemies.
    pub fn fire(&mut self, turret: &Turret, state: &GameState, narrator: &mut dyn Narrator) {
        let shots = state.projectiles_per_shot();
        if shots <= 1 {
            let projectile = turret.shoot(&self.enemies, narrator);
            self.projectiles.push(projectile);
        } else {
            let volley = turret.volley(&self.enemies, shots, narrator);
            self.projectiles.extend(volley);
        }
    }

    /// Launch a missile, destroying every active enemy without drops.
    pub fn launch_missile(&mut self, state: &mut GameState, narrator: &mut dyn Narrator) -> bool {
        if !state.fire_missile(narrator) {
            return false;
        }
        state.record_defeats(self.enemies.len());
        self.enemies.clear();
        narrator.play_cue(Cue::ActionSuccess);
        narrator.speak("Missile destroyed all enemies!");
        true
    }

    /// Resolve projectiles against the roster.
    ///
    /// A projectile whose target still stands destroys it and credits its
    /// drop. A targeted projectile whose target is gone is discarded.
    /// Untargeted projectiles stay in flight. Returns the number of kills.
    pub fn resolve_projectiles(&mut self, state: &mut GameState, narrator: &mut dyn Narrator) -> usize {
        let mut kills = 0;
        let enemies = &mut self.enemies;
        self.projectiles.retain(|projectile| {
            let Some(target) = projectile.target else {
                return true;
            };
            if let Some(index) = enemies.iter().position(|e| e.same_position(&target)) {
                let enemy = enemies.remove(index);
                narrator.play_cue(Cue::EnemyHit);
                state.collect_resource(&enemy, narrator);
                kills += 1;
            }
            false
        });
        state.record_defeats(kills);
        kills
    }

    /// Let every enemy act once.
    ///
    /// Armored ships hit the turret, swarmers hit the colony and are removed,
    /// basic invaders do nothing. The colony shield absorbs first.
    pub fn enemy_attacks(&mut self, state: &mut GameState, turret: &mut Turret, narrator: &mut dyn Narrator) {
        let mut index = 0;
        while index < self.enemies.len() {
            match self.enemies[index].kind {
                EnemyKind::BasicInvader => {
                    index += 1;
                }
                EnemyKind::ArmoredShip => {
                    let damage = state.absorb(ARMORED_SHIP_DAMAGE, narrator);
                    if damage > 0 {
                        turret.take_damage(damage, narrator);
                    }
                    index += 1;
                }
                EnemyKind::Swarmer => {
                    let damage = state.absorb(SWARMER_DAMAGE, narrator);
                    if damage > 0 {
                        state.colony.take_damage(i32::try_from(damage).unwrap_or(i32::MAX));
                        narrator.play_cue(Cue::ActionFail);
                        narrator.speak(&format!("Colony damaged! Health: {}", state.colony.hp));
                    }
                    self.enemies.remove(index);
                }
            }
        }
    }

    /// Advance one tick.
    pub fn tick(&mut self, state: &mut GameState, turret: &mut Turret, narrator: &mut dyn Narrator) -> TickOutcome {
        let kills = self.resolve_projectiles(state, narrator);
        self.enemy_attacks(state, turret, narrator);
        trace!(
            kills,
            remaining = self.enemies.len(),
            colony_hp = state.colony.hp,
            "combat tick"
        );
        if state.check_loss() {
            TickOutcome::ColonyLost
        } else if self.enemies.is_empty() {
            self.projectiles.clear();
            TickOutcome::WaveCleared
        } else {
            TickOutcome::Ongoing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Colony, Resources};
    use crate::narrator::{RecordingNarrator, SilentNarrator};

    fn turret() -> Turret {
        Turret::new(5, 10, 100)
    }

    #[test]
    fn test_projectile_kill_collects_drop() {
        let mut narrator = RecordingNarrator::new();
        let mut state = GameState::default();
        let mut turret = turret();
        let mut battle = Battle::new(vec![Enemy::new(EnemyKind::BasicInvader, 4, 0)]);

        battle.fire(&turret, &state, &mut narrator);
        let outcome = battle.tick(&mut state, &mut turret, &mut narrator);

        assert_eq!(outcome, TickOutcome::WaveCleared);
        assert_eq!(state.resources.energy, 60);
        assert_eq!(state.enemies_defeated_in_current_wave, 1);
        assert!(narrator.played(Cue::EnemyHit));
    }

    #[test]
    fn test_stale_targeted_projectile_discarded() {
        let mut state = GameState::default();
        let target = Enemy::new(EnemyKind::BasicInvader, 4, 0);
        let mut battle = Battle::new(vec![target, Enemy::new(EnemyKind::BasicInvader, 6, 0)]);
        battle.projectiles.push(Projectile {
            position: 5,
            target: Some(target),
        });
        battle.projectiles.push(Projectile {
            position: 5,
            target: Some(target),
        });
        battle.projectiles.push(Projectile {
            position: 5,
            target: None,
        });

        assert_eq!(battle.resolve_projectiles(&mut state, &mut SilentNarrator), 1);
        assert_eq!(battle.enemies().len(), 1);
        assert_eq!(battle.projectiles().len(), 1);
        assert!(!battle.projectiles()[0].is_targeted());
    }

    #[test]
    fn test_armored_ship_hits_turret_through_shield() {
        let mut state = GameState {
            shield_strength: 4,
            ..GameState::default()
        };
        let mut turret = turret();
        let mut battle = Battle::new(vec![Enemy::new(EnemyKind::ArmoredShip, 1, 1)]);

        battle.enemy_attacks(&mut state, &mut turret, &mut SilentNarrator);
        assert_eq!(state.shield_strength, 0);
        assert_eq!(turret.shield(), 94);
        assert_eq!(battle.enemies().len(), 1);
    }

    #[test]
    fn test_swarmer_hits_colony_and_leaves() {
        let mut narrator = RecordingNarrator::new();
        let mut state = GameState::default();
        let mut turret = turret();
        let mut battle = Battle::new(vec![
            Enemy::new(EnemyKind::Swarmer, 2, 2),
            Enemy::new(EnemyKind::BasicInvader, 0, 0),
        ]);

        battle.enemy_attacks(&mut state, &mut turret, &mut narrator);
        assert_eq!(state.colony.hp, 95);
        assert_eq!(battle.enemies().len(), 1);
        assert_eq!(state.resources, Resources::new(50, 30, 20));
        assert!(narrator.heard("Colony damaged! Health: 95"));
    }

    #[test]
    fn test_kill_resolves_before_enemy_attack() {
        // The projectile removes the last swarmer before it can reach the
        // colony, so the wave clears with the colony intact.
        let mut state = GameState {
            colony: Colony { hp: 5, max_hp: 100 },
            ..GameState::default()
        };
        let mut turret = turret();
        let swarmer = Enemy::new(EnemyKind::Swarmer, 5, 2);
        let mut battle = Battle::new(vec![swarmer]);
        battle.fire(&turret, &state, &mut SilentNarrator);

        let outcome = battle.tick(&mut state, &mut turret, &mut SilentNarrator);
        assert_eq!(outcome, TickOutcome::WaveCleared);
        assert_eq!(state.colony.hp, 5);
        assert_eq!(state.resources.food, 25);
    }

    #[test]
    fn test_loss_beats_wave_clear() {
        let mut state = GameState {
            colony: Colony { hp: 5, max_hp: 100 },
            ..GameState::default()
        };
        let mut turret = turret();
        let mut battle = Battle::new(vec![Enemy::new(EnemyKind::Swarmer, 2, 2)]);

        let outcome = battle.tick(&mut state, &mut turret, &mut SilentNarrator);
        assert!(battle.is_cleared());
        assert_eq!(outcome, TickOutcome::ColonyLost);
    }

    #[test]
    fn test_missile_clears_roster_without_drops() {
        let mut state = GameState {
            missiles: 1,
            ..GameState::default()
        };
        state.begin_wave(5);
        let mut battle = Battle::start(&mut state, &mut SilentNarrator);
        assert!(battle.launch_missile(&mut state, &mut SilentNarrator));
        assert!(battle.is_cleared());
        assert_eq!(state.enemies_defeated_in_current_wave, 5);
        assert_eq!(state.resources, Resources::new(50, 30, 20));
        assert!(!battle.launch_missile(&mut state, &mut SilentNarrator));
    }

    #[test]
    fn test_start_announces_wave() {
        let mut narrator = RecordingNarrator::new();
        let mut state = GameState::default();
        let battle = Battle::start(&mut state, &mut narrator);
        assert_eq!(battle.enemies().len(), 5);
        assert_eq!(state.total_enemies_in_wave, 5);
        assert!(narrator.heard("Wave 1 incoming. 5 enemies detected."));
    }
}
