//! The colony: the player's base and loss condition.

use serde::{Deserialize, Serialize};

use crate::game::Resources;
use crate::narrator::{Cue, Narrator};

/// Metal spent by one colony repair.
pub const COLONY_REPAIR_COST: i32 = 20;

/// Hit-point pool of the player's base.
///
/// `hp` never exceeds `max_hp`. It may drop to zero or below; that is the
/// loss condition and is checked, not prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
}

impl Colony {
    /// A colony at full health.
    #[must_use]
    pub const fn new(max_hp: i32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    /// Whether the colony has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }

    /// Whether the colony is below full health.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    /// Subtract damage. Hit points are not floored.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Add hit points, capped at `max_hp`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Raise `max_hp` and current hp by the same amount.
    pub fn reinforce(&mut self, bonus: i32) {
        self.max_hp = self.max_hp.saturating_add(bonus);
        self.hp = self.hp.saturating_add(bonus).min(self.max_hp);
    }

    /// Spend [`COLONY_REPAIR_COST`] metal to restore full health.
    ///
    /// Returns `false` without touching anything when metal is short.
    pub fn repair(&mut self, resources: &mut Resources, narrator: &mut dyn Narrator) -> bool {
        if resources.metal < COLONY_REPAIR_COST {
            narrator.play_cue(Cue::ActionFail);
            narrator.speak("Not enough metal to repair colony");
            return false;
        }
        resources.metal -= COLONY_REPAIR_COST;
        self.hp = self.max_hp;
        narrator.play_cue(Cue::ActionSuccess);
        narrator.speak("Colony repaired");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::RecordingNarrator;

    #[test]
    fn test_repair_costs_twenty_metal() {
        let mut narrator = RecordingNarrator::new();
        let mut colony = Colony { hp: 80, max_hp: 100 };
        let mut resources = Resources::new(50, 30, 20);

        assert!(colony.repair(&mut resources, &mut narrator));
        assert_eq!(colony.hp, 100);
        assert_eq!(resources, Resources::new(50, 10, 20));
        assert!(narrator.played(Cue::ActionSuccess));
        assert!(narrator.heard("Colony repaired"));
    }

    #[test]
    fn test_repair_without_metal() {
        let mut narrator = RecordingNarrator::new();
        let mut colony = Colony { hp: 50, max_hp: 100 };
        let mut resources = Resources::new(50, 10, 20);

        assert!(!colony.repair(&mut resources, &mut narrator));
        assert_eq!(colony.hp, 50);
        assert_eq!(resources.metal, 10);
        assert!(narrator.played(Cue::ActionFail));
        assert!(narrator.heard("Not enough metal"));
    }

    #[test]
    fn test_heal_is_capped() {
        let mut colony = Colony { hp: 95, max_hp: 100 };
        assert_eq!(colony.heal(20), 5);
        assert_eq!(colony.hp, 100);
    }

    #[test]
    fn test_damage_below_zero_is_destroyed() {
        let mut colony = Colony::new(10);
        colony.take_damage(15);
        assert_eq!(colony.hp, -5);
        assert!(colony.is_destroyed());
    }

    #[test]
    fn test_reinforce_raises_both() {
        let mut colony = Colony { hp: 60, max_hp: 100 };
        colony.reinforce(25);
        assert_eq!(colony, Colony { hp: 85, max_hp: 125 });
    }
}
