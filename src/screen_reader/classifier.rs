//! Turns a captured frame into "minigame active" and "bite" signals

use image::RgbaImage;

use super::base::Settings;
use super::color::ColorRange;
use super::scanner::{find_bounding_box, BoundingBox};

/// Default span (exclusive) a red box must exceed on both axes.
pub const MIN_UI_SPAN: i32 = 8;
/// Default distance between the red box and the sampled ring.
pub const RING_MARGIN: i32 = 2;
/// Default white share of the ring (exclusive) that signals a bite.
pub const BITE_WHITE_RATIO: f64 = 0.5;

/// Result of classifying one frame. Only valid for the tick that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub ui_active: bool,
    /// Always false when `ui_active` is false.
    pub bite_detected: bool,
    /// Red marker box in buffer-local coordinates.
    pub marker: Option<BoundingBox>,
    /// White share of the ring, when the ring was sampled.
    pub white_ratio: Option<f64>,
}

impl Classification {
    pub const NOTHING: Classification = Classification {
        ui_active: false,
        bite_detected: false,
        marker: None,
        white_ratio: None,
    };
}

/// Stateless frame classifier. Classifying the same buffer twice yields the
/// same result.
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    red: ColorRange,
    white: ColorRange,
    min_ui_span: i32,
    ring_margin: i32,
    bite_ratio: f64,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self {
            red: ColorRange::RED,
            white: ColorRange::WHITE,
            min_ui_span: MIN_UI_SPAN,
            ring_margin: RING_MARGIN,
            bite_ratio: BITE_WHITE_RATIO,
        }
    }
}

impl SignalClassifier {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            red: settings.red,
            white: settings.white,
            min_ui_span: settings.min_ui_span_px,
            ring_margin: settings.ring_margin_px,
            bite_ratio: settings.bite_white_ratio,
        }
    }

    /// Locate the red marker and derive both signals from it.
    pub fn classify(&self, image: &RgbaImage) -> Classification {
        let Some(marker) = find_bounding_box(image, |p| self.red.matches(p)) else {
            return Classification::NOTHING;
        };
        if !self.is_ui_active(Some(&marker)) {
            return Classification { marker: Some(marker), ..Classification::NOTHING };
        }

        let white_ratio = self.ring_white_ratio(image, &marker);
        Classification {
            ui_active: true,
            bite_detected: white_ratio.is_some_and(|r| r > self.bite_ratio),
            marker: Some(marker),
            white_ratio,
        }
    }

    /// The minigame bar is up when the red box is larger than stray noise
    /// on both axes.
    pub fn is_ui_active(&self, marker: Option<&BoundingBox>) -> bool {
        marker.is_some_and(|b| b.width() > self.min_ui_span && b.height() > self.min_ui_span)
    }

    /// True when more than the configured share of the ring around `marker`
    /// is white.
    pub fn is_surrounded_by_white(&self, image: &RgbaImage, marker: &BoundingBox) -> bool {
        self.ring_white_ratio(image, marker)
            .is_some_and(|r| r > self.bite_ratio)
    }

    /// White share of the border of `marker` grown by the ring margin,
    /// clipped to the buffer. `None` when no ring pixel is inside the buffer.
    pub fn ring_white_ratio(&self, image: &RgbaImage, marker: &BoundingBox) -> Option<f64> {
        let (w, h) = (image.width() as i32, image.height() as i32);
        let mut total = 0u32;
        let mut white = 0u32;

        for (x, y) in marker.expanded(self.ring_margin).perimeter() {
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            total += 1;
            if self.white.matches(image.get_pixel(x as u32, y as u32)) {
                white += 1;
            }
        }

        if total == 0 {
            return None;
        }
        Some(white as f64 / total as f64)
    }
}
