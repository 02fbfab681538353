//! Space Colony Defense CLI - play in a console or inspect waves and saves.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Space Colony Defense - an audio-first wave defense game
#[derive(Parser, Debug)]
#[command(name = "colony-defense")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play in text mode, one action token per line on stdin
    Play {
        /// Config file (default: ~/.space_colony_defense/config.json)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Save directory (overrides the config file)
        #[arg(long)]
        save_dir: Option<std::path::PathBuf>,

        /// Do not print sound cues
        #[arg(short, long)]
        quiet_cues: bool,
    },

    /// Print the enemy roster of a wave
    Wave {
        /// Wave number (1 and up)
        #[arg(required = true)]
        wave: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// List save slots, newest first
    Saves {
        /// Save directory (default: ~/.space_colony_defense/saves)
        #[arg(long)]
        save_dir: Option<std::path::PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::Play {
            config,
            save_dir,
            quiet_cues,
        } => cli::play::execute(config, save_dir, quiet_cues),

        Commands::Wave { wave, format } => cli::wave::execute(wave, format),

        Commands::Saves { save_dir, format } => cli::saves::execute(save_dir, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
