//! Global hotkeys for pausing and stopping the bot

use std::time::Duration;

use anyhow::{Context, Result};
use global_hotkey::hotkey::{Code, HotKey};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use crate::error::ConfigError;

/// What a hotkey press asks the bot to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyCommand {
    TogglePause,
    Stop,
}

/// Registered hotkey ids. `Copy` so the listener thread can own a copy while
/// the manager stays on the thread that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyIds {
    pub pause: u32,
    pub stop: u32,
}

impl HotkeyIds {
    /// Map a hotkey event to a command. Key releases are ignored so one
    /// press toggles once.
    pub fn command_for(&self, id: u32, state: HotKeyState) -> Option<HotkeyCommand> {
        if state != HotKeyState::Pressed {
            return None;
        }
        if id == self.pause {
            Some(HotkeyCommand::TogglePause)
        } else if id == self.stop {
            Some(HotkeyCommand::Stop)
        } else {
            None
        }
    }

    /// Wait up to `timeout` for the next relevant hotkey press.
    pub fn next_command(&self, timeout: Duration) -> Option<HotkeyCommand> {
        let event = GlobalHotKeyEvent::receiver().recv_timeout(timeout).ok()?;
        tracing::trace!("[HOTKEY] event id={} state={:?}", event.id, event.state);
        self.command_for(event.id, event.state)
    }
}

/// Owns the OS registration; dropping it unregisters the hotkeys.
pub struct HotkeyBindings {
    _manager: GlobalHotKeyManager,
    ids: HotkeyIds,
}

impl HotkeyBindings {
    pub fn register(pause_key: &str, stop_key: &str) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        let pause = HotKey::new(None, parse_code(pause_key)?);
        let stop = HotKey::new(None, parse_code(stop_key)?);
        let ids = HotkeyIds { pause: pause.id(), stop: stop.id() };

        manager
            .register(pause)
            .with_context(|| format!("Failed to register pause hotkey {}", pause_key))?;
        manager
            .register(stop)
            .with_context(|| format!("Failed to register stop hotkey {}", stop_key))?;

        tracing::info!("[HOTKEY] Registered PAUSE={}, STOP={}", pause_key, stop_key);
        Ok(Self { _manager: manager, ids })
    }

    pub fn ids(&self) -> HotkeyIds {
        self.ids
    }
}

fn parse_code(key: &str) -> Result<Code, ConfigError> {
    string_to_code(key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

/// Convert key string to global_hotkey Code
pub fn string_to_code(key: &str) -> Option<Code> {
    let key_upper = key.trim().to_uppercase();
    let code = match key_upper.as_str() {
        "A" => Code::KeyA,
        "B" => Code::KeyB,
        "C" => Code::KeyC,
        "D" => Code::KeyD,
        "E" => Code::KeyE,
        "F" => Code::KeyF,
        "G" => Code::KeyG,
        "H" => Code::KeyH,
        "I" => Code::KeyI,
        "J" => Code::KeyJ,
        "K" => Code::KeyK,
        "L" => Code::KeyL,
        "M" => Code::KeyM,
        "N" => Code::KeyN,
        "O" => Code::KeyO,
        "P" => Code::KeyP,
        "Q" => Code::KeyQ,
        "R" => Code::KeyR,
        "S" => Code::KeyS,
        "T" => Code::KeyT,
        "U" => Code::KeyU,
        "V" => Code::KeyV,
        "W" => Code::KeyW,
        "X" => Code::KeyX,
        "Y" => Code::KeyY,
        "Z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,
        "ESC" | "ESCAPE" => Code::Escape,
        "SPACE" => Code::Space,
        "TAB" => Code::Tab,
        "PAUSE" => Code::Pause,
        "HOME" => Code::Home,
        "END" => Code::End,
        "INSERT" => Code::Insert,
        "DELETE" => Code::Delete,
        "PAGEUP" => Code::PageUp,
        "PAGEDOWN" => Code::PageDown,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_code() {
        assert_eq!(string_to_code("p"), Some(Code::KeyP));
        assert_eq!(string_to_code("F10"), Some(Code::F10));
        assert_eq!(string_to_code(" esc "), Some(Code::Escape));
        assert_eq!(string_to_code(""), None);
        assert_eq!(string_to_code("HYPER"), None);
    }

    #[test]
    fn test_command_for_ignores_release() {
        let ids = HotkeyIds { pause: 7, stop: 9 };
        assert_eq!(ids.command_for(7, HotKeyState::Pressed), Some(HotkeyCommand::TogglePause));
        assert_eq!(ids.command_for(7, HotKeyState::Released), None);
        assert_eq!(ids.command_for(9, HotKeyState::Pressed), Some(HotkeyCommand::Stop));
        assert_eq!(ids.command_for(3, HotKeyState::Pressed), None);
    }

    #[test]
    fn test_hotkey_ids_differ_per_key() {
        let p = HotKey::new(None, Code::KeyP);
        let f10 = HotKey::new(None, Code::F10);
        assert_ne!(p.id(), f10.id());
    }
}
