//! Wave command implementation.

use super::output::{format_wave, JsonWave};
use super::{CliError, OutputFormat};
use colony_defense::generate_wave;

/// Execute the wave command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn execute(wave: u32, format: OutputFormat) -> Result<(), CliError> {
    let wave = wave.max(1);
    let enemies = generate_wave(wave);

    match format {
        OutputFormat::Text => print!("{}", format_wave(wave, &enemies)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonWave::new(wave, &enemies))?;
            println!("{json}");
        }
    }

    Ok(())
}
