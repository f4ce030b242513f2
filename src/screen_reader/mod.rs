//! Screen reader module for capturing the region and reading its signals

pub mod base;
pub mod classifier;
pub mod color;
pub mod scanner;
pub mod screen_service;

pub use base::{get_settings_path, DelayRange, RoiConfig, Settings};
pub use classifier::{Classification, SignalClassifier};
pub use color::ColorRange;
pub use scanner::{find_bounding_box, BoundingBox};
pub use screen_service::{Frame, FrameSource, Region, ScreenService};
