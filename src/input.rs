//! Input simulation: the single click used both to cast and to reel in

use serde::{Deserialize, Serialize};

use enigo::{Button, Direction, Enigo, Mouse, Settings};

use crate::error::InjectionError;

/// Mouse button used for casting and clicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl std::str::FromStr for MouseButton {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(crate::error::ConfigError::UnknownButton(s.to_string())),
        }
    }
}

/// Something that can press a mouse button once.
pub trait InputSink {
    fn trigger(&mut self, button: MouseButton) -> Result<(), InjectionError>;
}

/// Real input backed by enigo.
pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    pub fn new() -> Result<Self, InjectionError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| InjectionError::Backend(format!("{:?}", e)))?;
        Ok(Self { enigo })
    }

    /// Current cursor position in screen coordinates
    pub fn cursor_position(&self) -> Result<(i32, i32), InjectionError> {
        self.enigo
            .location()
            .map_err(|e| InjectionError::Rejected(format!("{:?}", e)))
    }
}

impl InputSink for EnigoInput {
    fn trigger(&mut self, button: MouseButton) -> Result<(), InjectionError> {
        let button = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        };
        self.enigo
            .button(button, Direction::Click)
            .map_err(|e| InjectionError::Rejected(format!("{:?}", e)))
    }
}
