//! The interactive session: action tokens, phases, menus and the loop that
//! ties them to the game state.

mod action;
mod game_loop;
mod menu;
mod phase;

pub use action::Action;
pub use game_loop::{Flow, GameLoop};
pub use menu::{Menu, MenuItem, MenuKind};
pub use phase::Phase;
