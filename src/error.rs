//! Error types for capture, input injection and configuration

use thiserror::Error;

/// Failure to read the region of interest from the screen.
///
/// Always transient from the bot's point of view: the control loop logs it,
/// backs off and retries on the next tick.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No screen contains point ({0}, {1})")]
    NoScreen(i32, i32),
    #[error("Capture backend failed: {0}")]
    Backend(String),
    #[error("Captured buffer has unexpected size {got} (expected {expected})")]
    BadBuffer { expected: usize, got: usize },
}

/// Failure to emit a click or cast.
#[derive(Error, Debug)]
pub enum InjectionError {
    #[error("Failed to create input backend: {0}")]
    Backend(String),
    #[error("Input event rejected: {0}")]
    Rejected(String),
}

/// Startup configuration problems. These are fatal before the loop starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Region has no size ({width}x{height})")]
    EmptyRegion { width: u32, height: u32 },
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Color range '{0}' has a lower bound above its upper bound")]
    InvertedColorRange(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("Unknown key name: {0}")]
    UnknownKey(String),
    #[error("Unknown mouse button: {0}")]
    UnknownButton(String),
}
