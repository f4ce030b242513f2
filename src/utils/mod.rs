//! Shared utilities: paths, hotkeys, pause control and session stats

pub mod bot_state;
pub mod keybinds;
pub mod path;
pub mod pause;
