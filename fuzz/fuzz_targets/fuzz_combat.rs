#![no_main]

use arbitrary::Arbitrary;
use colony_defense::game::{check_invariants, Enemy, EnemyKind};
use colony_defense::{Battle, GameState, SilentNarrator, TickOutcome, Turret};
use libfuzzer_sys::fuzz_target;

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    /// Enemies as (kind selector, lane, row).
    enemies: Vec<(u8, u8, u8)>,
    /// Colony shield strength.
    shield: u16,
    /// Missiles in stock.
    missiles: u8,
    /// Turret start lane.
    turret_lane: u8,
    /// Per-tick commands: 0 left, 1 right, 2 shoot, 3 missile, other idle.
    commands: Vec<u8>,
}

fuzz_target!(|input: CombatInput| {
    // Cap inputs to keep runs fast
    let roster: Vec<Enemy> = input
        .enemies
        .iter()
        .take(64)
        .map(|&(kind, x, y)| {
            let kind = match kind % 3 {
                0 => EnemyKind::BasicInvader,
                1 => EnemyKind::ArmoredShip,
                _ => EnemyKind::Swarmer,
            };
            Enemy::new(kind, u32::from(x % 11), u32::from(y % 8))
        })
        .collect();

    let mut state = GameState {
        shield_strength: u32::from(input.shield),
        missiles: u32::from(input.missiles % 4),
        ..GameState::default()
    };
    state.begin_wave(roster.len());
    let mut turret = Turret::new(u32::from(input.turret_lane % 11), 10, 100);
    let mut narrator = SilentNarrator;
    let mut battle = Battle::new(roster);

    for &command in input.commands.iter().take(256) {
        match command % 5 {
            0 => turret.move_left(&mut narrator),
            1 => turret.move_right(&mut narrator),
            2 => battle.fire(&turret, &state, &mut narrator),
            3 => {
                let _ = battle.launch_missile(&mut state, &mut narrator);
            }
            _ => {}
        }

        let outcome = battle.tick(&mut state, &mut turret, &mut narrator);
        let violations = check_invariants(&state, &turret);
        assert!(violations.is_empty(), "invariant violations: {violations:?}");
        assert!(turret.position() <= 10);
        match outcome {
            TickOutcome::Ongoing => assert!(!battle.enemies().is_empty()),
            TickOutcome::WaveCleared => {
                assert!(battle.enemies().is_empty());
                break;
            }
            TickOutcome::ColonyLost => {
                assert!(state.colony.hp <= 0);
                break;
            }
        }
    }
});
