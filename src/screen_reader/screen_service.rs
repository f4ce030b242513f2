//! Screen capture service

use image::RgbaImage;
use screenshots::Screen;

use crate::error::{CaptureError, ConfigError};

/// Region for screenshot capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Create a region, rejecting zero width or height.
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyRegion { width, height });
        }
        Ok(Self { left, top, width, height })
    }

    /// Create from two opposite corners given in any order.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, ConfigError> {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top))
    }
}

/// One captured frame of the region, with the screen position of its
/// top-left pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbaImage,
    pub origin: (i32, i32),
}

/// Anything that can produce a frame of a region: the real screen, or a
/// scripted source in tests.
pub trait FrameSource {
    fn capture(&mut self, region: &Region) -> Result<Frame, CaptureError>;
}

/// Service for capturing screenshots
#[derive(Debug, Default)]
pub struct ScreenService;

impl ScreenService {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for ScreenService {
    fn capture(&mut self, region: &Region) -> Result<Frame, CaptureError> {
        let screen = Screen::from_point(region.left, region.top)
            .map_err(|_| CaptureError::NoScreen(region.left, region.top))?;
        let (screen_x, screen_y) = (screen.display_info.x, screen.display_info.y);

        let shot = screen
            .capture_area(
                region.left - screen_x,
                region.top - screen_y,
                region.width,
                region.height,
            )
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        let (width, height) = (shot.width(), shot.height());
        let raw = shot.into_raw();
        let expected = width as usize * height as usize * 4;
        let got = raw.len();
        let image = RgbaImage::from_raw(width, height, raw)
            .ok_or(CaptureError::BadBuffer { expected, got })?;

        Ok(Frame { image, origin: (region.left, region.top) })
    }
}
