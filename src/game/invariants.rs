//! Game invariants - sanity checks that detect bugs.
//!
//! None of these should ever trigger in a correctly implemented game. They
//! are bug detectors for tests and fuzzers, not gameplay rules.

use crate::game::{GameState, Turret};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState, turret: &Turret) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut violation = |message: String| violations.push(InvariantViolation { message });

    if state.colony.hp > state.colony.max_hp {
        violation(format!(
            "Colony hp {} exceeds max {}",
            state.colony.hp, state.colony.max_hp
        ));
    }

    if state.wave == 0 {
        violation("Wave counter is 0".to_string());
    }

    if state.enemies_defeated_in_current_wave > state.total_enemies_in_wave {
        violation(format!(
            "Defeated {} enemies of a {}-enemy wave",
            state.enemies_defeated_in_current_wave, state.total_enemies_in_wave
        ));
    }

    for (&id, &level) in state.techs.owned() {
        let max = id.upgrade().max_level;
        if level > max {
            violation(format!("Tech {id} at level {level} > max {max}"));
        }
    }

    if turret.position() > turret.screen_width() {
        violation(format!(
            "Turret position {} outside 0..={}",
            turret.position(),
            turret.screen_width()
        ));
    }

    if turret.shield() > turret.max_shield() {
        violation(format!(
            "Turret shield {} exceeds max {}",
            turret.shield(),
            turret.max_shield()
        ));
    }

    if turret.is_damaged() != (turret.shield() < turret.max_shield()) {
        violation(format!(
            "Turret damage flag {} disagrees with shield {}/{}",
            turret.is_damaged(),
            turret.shield(),
            turret.max_shield()
        ));
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState, turret: &Turret) {
    let violations = check_invariants(state, turret);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState, _turret: &Turret) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Colony, PlayerTechTree, TechId};

    fn turret() -> Turret {
        Turret::new(5, 10, 100)
    }

    #[test]
    fn test_fresh_game_passes() {
        let violations = check_invariants(&GameState::default(), &turret());
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_overhealed_colony_detected() {
        let state = GameState {
            colony: Colony { hp: 101, max_hp: 100 },
            ..GameState::default()
        };
        let violations = check_invariants(&state, &turret());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Colony hp"));
    }

    #[test]
    fn test_negative_colony_hp_is_not_a_violation() {
        let state = GameState {
            colony: Colony { hp: -5, max_hp: 100 },
            ..GameState::default()
        };
        assert!(check_invariants(&state, &turret()).is_empty());
    }

    #[test]
    fn test_wave_zero_detected() {
        let state = GameState {
            wave: 0,
            ..GameState::default()
        };
        let violations = check_invariants(&state, &turret());
        assert!(violations.iter().any(|v| v.message.contains("Wave")));
    }

    #[test]
    fn test_tech_level_within_bounds_passes() {
        let state = GameState {
            techs: PlayerTechTree::from_levels([(TechId::MultiShot, 2)]),
            ..GameState::default()
        };
        assert!(check_invariants(&state, &turret()).is_empty());
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut state = GameState {
            colony: Colony { hp: 200, max_hp: 100 },
            wave: 0,
            ..GameState::default()
        };
        state.begin_wave(1);
        state.record_defeats(2);
        let violations = check_invariants(&state, &turret());
        assert_eq!(violations.len(), 3, "{violations:?}");
    }

    #[test]
    #[should_panic(expected = "Game invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let state = GameState {
            wave: 0,
            ..GameState::default()
        };
        assert_invariants(&state, &turret());
    }
}
