//! Play command implementation.

use super::CliError;
use colony_defense::{
    ConsoleNarrator, Flow, GameConfig, GameLoop, GatedNarrator, ProviderChain, SaveStore,
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::info;

/// Execute the play command.
///
/// Reads one action token per line from stdin. Every line, handled or not,
/// advances combat by one tick. End of input ends the session.
///
/// # Errors
///
/// Returns an error if an explicitly requested config file cannot be loaded
/// or stdin cannot be read.
pub(crate) fn execute(
    config_path: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    quiet_cues: bool,
) -> Result<(), CliError> {
    let mut config = match config_path {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default_path()
            .map(|path| GameConfig::load_or_default(&path))
            .unwrap_or_default(),
    };
    if let Some(dir) = save_dir {
        config.save_dir = Some(dir);
    }

    let store = config
        .resolved_save_dir()
        .map_or_else(SaveStore::default_location, SaveStore::new);
    let providers = ProviderChain::new(vec![Box::new(ConsoleNarrator::stdout(!quiet_cues))]);
    info!(
        save_dir = %store.dir().display(),
        narration = providers.active_name(),
        "starting session"
    );
    let narrator = GatedNarrator::new(providers, config.audio);

    let mut game = GameLoop::new(config, store, narrator);
    game.start();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            game.tick();
            continue;
        }
        if game.handle_token(&line) == Flow::Exit {
            break;
        }
        game.tick();
    }

    info!(phase = %game.phase(), wave = game.state().wave, "session ended");
    Ok(())
}
