#![no_main]

use arbitrary::Arbitrary;
use colony_defense::game::check_invariants;
use colony_defense::{Action, GameConfig, GameLoop, SaveStore, SilentNarrator};
use libfuzzer_sys::fuzz_target;

/// One step of player input.
#[derive(Arbitrary, Debug)]
enum Step {
    /// A known action.
    Action(u8),
    /// A load-slot request.
    LoadSlot(u8),
    /// A raw token, which may be garbage.
    Token(String),
    /// Advance combat.
    Tick,
}

const ACTIONS: [Action; 20] = [
    Action::Up,
    Action::Down,
    Action::Select,
    Action::Left,
    Action::Right,
    Action::Shoot,
    Action::Missile,
    Action::Status,
    Action::Menu,
    Action::Repair,
    Action::Build,
    Action::Upgrade,
    Action::EndManagement,
    Action::SkipWave,
    Action::SaveGame,
    Action::Restart,
    Action::PauseSpeech,
    Action::ResumeSpeech,
    Action::StopSpeech,
    Action::Quit,
];

fuzz_target!(|steps: Vec<Step>| {
    let dir = std::env::temp_dir().join("colony-defense-fuzz");
    let mut game = GameLoop::new(GameConfig::default(), SaveStore::new(dir), SilentNarrator);
    game.start();

    // Cap sequence length to keep runs fast
    for step in steps.into_iter().take(2000) {
        match step {
            Step::Action(i) => {
                let _ = game.handle_action(ACTIONS[usize::from(i) % ACTIONS.len()]);
            }
            Step::LoadSlot(slot) => {
                let _ = game.handle_action(Action::LoadSlot(usize::from(slot)));
            }
            Step::Token(token) => {
                let _ = game.handle_token(&token);
            }
            Step::Tick => game.tick(),
        }

        let violations = check_invariants(game.state(), game.turret());
        assert!(violations.is_empty(), "invariant violations: {violations:?}");
        assert!(game.state().wave >= 1);
    }
});
