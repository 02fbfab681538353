// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Space Colony Defense: an audio-first wave-defense game engine.
//!
//! The player moves a turret along a row of lanes, shoots down waves of
//! invaders to protect a colony, and spends the resources they drop between
//! waves on buildings and research. All player feedback flows through a
//! [`Narrator`], so the engine runs the same whether it is wired to a speech
//! engine, a console or a test recorder.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Front-end (console, scripted)     │
//! ├─────────────────────────────────────┤
//! │   Session (actions, phases, menus)  │
//! ├─────────────────────────────────────┤
//! │   Game rules        │   Saves       │
//! ├─────────────────────────────────────┤
//! │   Narrator                          │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use colony_defense::{Action, GameConfig, GameLoop, Phase, RecordingNarrator, SaveStore};
//!
//! let dir = std::env::temp_dir().join("colony-defense-doc");
//! let mut game = GameLoop::new(GameConfig::default(), SaveStore::new(dir), RecordingNarrator::new());
//! game.start();
//! game.handle_action(Action::Select);
//! assert_eq!(game.phase(), Phase::Combat);
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod narrator;
pub mod save;
pub mod session;

pub use config::{AudioSettings, GameConfig};
pub use error::{ConfigError, ParseActionError, ParseNameError, SaveError, SaveResult};

// Re-export key game types at crate root for convenience
pub use game::{
    generate_wave, Battle, Building, BuildingKind, BuildingLevel, Colony, Enemy, EnemyKind,
    GameState, PlayerTechTree, Resources, TechId, TickOutcome, Turret,
};
pub use narrator::{
    ConsoleNarrator, Cue, GatedNarrator, LogNarrator, NarrationProvider, Narrator,
    ProviderChain, RecordingNarrator, SilentNarrator,
};
pub use save::{SaveInfo, SaveStore};
pub use session::{Action, Flow, GameLoop, Menu, MenuItem, Phase};
