//! Inclusive RGB color ranges used to recognise the marker and the flash

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Inclusive per-channel RGB interval. Alpha is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl ColorRange {
    /// Red marker drawn over the fishing bar.
    pub const RED: ColorRange = ColorRange::new([200, 0, 0], [255, 100, 100]);
    /// Bright flash that surrounds the marker on a bite.
    pub const WHITE: ColorRange = ColorRange::new([220, 220, 220], [255, 255, 255]);

    pub const fn new(low: [u8; 3], high: [u8; 3]) -> Self {
        Self { low, high }
    }

    /// True when every channel of `pixel` lies in `[low, high]`.
    #[inline]
    pub fn matches(&self, pixel: &Rgba<u8>) -> bool {
        let [r, g, b, _] = pixel.0;
        (self.low[0]..=self.high[0]).contains(&r)
            && (self.low[1]..=self.high[1]).contains(&g)
            && (self.low[2]..=self.high[2]).contains(&b)
    }

    /// A range is usable only if no channel has `low > high`.
    pub fn is_valid(&self) -> bool {
        self.low.iter().zip(self.high.iter()).all(|(lo, hi)| lo <= hi)
    }
}
