//! Red Bite - auto fishing bot driven by a red marker on screen
//!
//! Watches a fixed screen region for the red minigame marker, clicks when a
//! white flash surrounds it, and re-casts when the round ends or nothing has
//! happened for a while.

pub mod bot;
pub mod error;
pub mod input;
pub mod screen_reader;
pub mod setup;
pub mod utils;

// Re-exports for convenience
pub use bot::{Action, BotState, ControlLoop, FishingStateMachine, LoopTiming, TickOutcome};
pub use error::{CaptureError, ConfigError, InjectionError};
pub use input::{EnigoInput, InputSink, MouseButton};
pub use screen_reader::{
    BoundingBox, Classification, ColorRange, Frame, FrameSource, Region, ScreenService, Settings,
    SignalClassifier,
};
pub use utils::{bot_state::SessionStats, keybinds, path::get_data_dir, pause};
