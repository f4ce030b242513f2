//! Settings for detection, timing and hotkeys

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::classifier::{BITE_WHITE_RATIO, MIN_UI_SPAN, RING_MARGIN};
use super::color::ColorRange;
use super::screen_service::Region;
use crate::bot::IDLE_TIMEOUT;
use crate::error::ConfigError;
use crate::input::MouseButton;
use crate::utils::keybinds::string_to_code;
use crate::utils::path::get_data_dir;

/// Inclusive range of milliseconds to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange { min_ms: 0, max_ms: 0 };

    pub fn is_zero(&self) -> bool {
        self.max_ms == 0
    }

    /// Pick a delay uniformly from the range.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

/// Screen rectangle given by two corners, as stored in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiConfig {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RoiConfig {
    pub fn to_region(&self) -> Result<Region, ConfigError> {
        Region::from_corners(self.left, self.top, self.right, self.bottom)
    }
}

/// Settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub red: ColorRange,
    pub white: ColorRange,
    pub min_ui_span_px: i32,
    pub ring_margin_px: i32,
    pub bite_white_ratio: f64,
    pub idle_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub cast_settle_ms: u64,
    pub click_settle_ms: u64,
    pub capture_backoff_ms: u64,
    pub paused_poll_ms: u64,
    pub recast_delay_ms: DelayRange,
    pub pause_key: String,
    pub stop_key: String,
    pub mouse_button: MouseButton,
    pub cast_on_start: bool,
    pub roi: Option<RoiConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            red: ColorRange::RED,
            white: ColorRange::WHITE,
            min_ui_span_px: MIN_UI_SPAN,
            ring_margin_px: RING_MARGIN,
            bite_white_ratio: BITE_WHITE_RATIO,
            idle_timeout_secs: IDLE_TIMEOUT.as_secs(),
            tick_interval_ms: 50,
            cast_settle_ms: 2000,
            click_settle_ms: 500,
            capture_backoff_ms: 1000,
            paused_poll_ms: 50,
            recast_delay_ms: DelayRange::ZERO,
            pause_key: "P".to_string(),
            stop_key: "F10".to_string(),
            mouse_button: MouseButton::Right,
            cast_on_start: true,
            roi: None,
        }
    }
}

impl Settings {
    /// Load settings from the data directory, falling back to defaults when
    /// no settings file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("[CONFIG] No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        tracing::info!("[CONFIG] Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.red.is_valid() {
            return Err(ConfigError::InvertedColorRange("red"));
        }
        if !self.white.is_valid() {
            return Err(ConfigError::InvertedColorRange("white"));
        }
        if self.min_ui_span_px < 0 {
            return Err(invalid("min_ui_span_px", "must not be negative"));
        }
        if self.ring_margin_px < 1 {
            return Err(invalid("ring_margin_px", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.bite_white_ratio) {
            return Err(invalid("bite_white_ratio", "must be in [0, 1)"));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be greater than 0"));
        }
        if !(25..=50).contains(&self.tick_interval_ms) {
            tracing::warn!(
                "[CONFIG] tick_interval_ms={} is outside the usual 25-50 ms",
                self.tick_interval_ms
            );
        }
        if self.paused_poll_ms == 0 {
            return Err(invalid("paused_poll_ms", "must be greater than 0"));
        }
        if self.paused_poll_ms > self.tick_interval_ms {
            tracing::info!(
                "[CONFIG] paused_poll_ms={} is capped to tick_interval_ms={}",
                self.paused_poll_ms,
                self.tick_interval_ms
            );
        }
        if self.recast_delay_ms.min_ms > self.recast_delay_ms.max_ms {
            return Err(invalid("recast_delay_ms", "min_ms is above max_ms"));
        }
        for key in [&self.pause_key, &self.stop_key] {
            if string_to_code(key).is_none() {
                return Err(ConfigError::UnknownKey(key.clone()));
            }
        }
        if self.pause_key.eq_ignore_ascii_case(&self.stop_key) {
            return Err(invalid("stop_key", "must differ from pause_key"));
        }
        if let Some(roi) = &self.roi {
            roi.to_region()?;
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue { name, reason: reason.to_string() }
}

/// Get settings file path
pub fn get_settings_path() -> PathBuf {
    get_data_dir().join("config").join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.red, ColorRange::RED);
        assert_eq!(settings.white, ColorRange::WHITE);
        assert_eq!(settings.idle_timeout(), Duration::from_secs(180));
        assert_eq!(settings.idle_timeout(), IDLE_TIMEOUT);
        assert_eq!(settings.pause_key, "P");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tick_interval_ms": 30, "mouse_button": "left",
                 "recast_delay_ms": {{"min_ms": 1000, "max_ms": 2000}},
                 "roi": {{"left": 900, "top": 40, "right": 700, "bottom": 80}}}}"#
        )
        .unwrap();
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.tick_interval_ms, 30);
        assert_eq!(settings.mouse_button, MouseButton::Left);
        assert_eq!(settings.recast_delay_ms, DelayRange { min_ms: 1000, max_ms: 2000 });
        assert_eq!(settings.cast_settle_ms, 2000);
        let region = settings.roi.unwrap().to_region().unwrap();
        assert_eq!((region.left, region.top, region.width, region.height), (700, 40, 200, 40));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            Settings::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.red = ColorRange::new([255, 0, 0], [200, 0, 0]);
        assert!(matches!(settings.validate(), Err(ConfigError::InvertedColorRange("red"))));

        let mut settings = Settings::default();
        settings.pause_key = "NOPE".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::UnknownKey(_))));

        let mut settings = Settings::default();
        settings.recast_delay_ms = DelayRange { min_ms: 5, max_ms: 1 };
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.roi = Some(RoiConfig { left: 10, top: 10, right: 10, bottom: 50 });
        assert!(matches!(settings.validate(), Err(ConfigError::EmptyRegion { .. })));
    }

    #[test]
    fn test_delay_range_sample() {
        let mut rng = rand::rng();
        assert_eq!(DelayRange::ZERO.sample(&mut rng), Duration::ZERO);
        let range = DelayRange { min_ms: 1000, max_ms: 2000 };
        for _ in 0..50 {
            let d = range.sample(&mut rng);
            assert!(d >= Duration::from_millis(1000) && d <= Duration::from_millis(2000));
        }
    }
}
