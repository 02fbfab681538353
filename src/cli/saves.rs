//! Saves command implementation.

use super::output::format_saves;
use super::{CliError, OutputFormat};
use colony_defense::{GameConfig, SaveInfo, SaveStore};
use std::path::PathBuf;

/// Execute the saves command.
///
/// Slots are listed newest first, numbered the way `load_slot_<N>` expects.
/// Files that cannot be summarized are left out.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn execute(save_dir: Option<PathBuf>, format: OutputFormat) -> Result<(), CliError> {
    let store = save_dir
        .or_else(|| {
            GameConfig::default_path()
                .map(|path| GameConfig::load_or_default(&path))
                .and_then(|config| config.resolved_save_dir())
        })
        .map_or_else(SaveStore::default_location, SaveStore::new);

    let infos: Vec<SaveInfo> = store
        .list_save_files()
        .iter()
        .filter_map(|path| store.save_info(path))
        .collect();

    match format {
        OutputFormat::Text => print!("{}", format_saves(&infos)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&infos)?),
    }

    Ok(())
}
