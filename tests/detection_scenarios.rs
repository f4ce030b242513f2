//! Detection scenarios on synthetic frames
//!
//! Builds frames with a red marker and a partially white ring around it and
//! checks the classifier and state machine against the expected decisions.
//!
//! Run with: cargo test --test detection_scenarios

use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use red_bite::bot::{Action, BotState, FishingStateMachine, IDLE_TIMEOUT};
use red_bite::{BoundingBox, ColorRange, SignalClassifier};

const BACKGROUND: Rgba<u8> = Rgba([30, 60, 90, 255]);
const RED: Rgba<u8> = Rgba([220, 40, 40, 255]);
const WHITE: Rgba<u8> = Rgba([245, 245, 245, 255]);

/// Frame with a red block covering `marker` (inclusive corners).
fn frame_with_marker(size: u32, marker: BoundingBox) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, BACKGROUND);
    for y in marker.min_y..=marker.max_y {
        for x in marker.min_x..=marker.max_x {
            img.put_pixel(x as u32, y as u32, RED);
        }
    }
    img
}

/// Paint the first `white` pixels of the ring around `marker` white.
fn paint_ring(img: &mut RgbaImage, marker: &BoundingBox, white: usize) {
    for (x, y) in marker.expanded(2).perimeter().take(white) {
        img.put_pixel(x as u32, y as u32, WHITE);
    }
}

/// Marker whose 2px ring has exactly 100 pixels.
fn hundred_pixel_ring_marker() -> BoundingBox {
    BoundingBox::new(10, 10, 31, 31)
}

#[test]
fn test_ring_has_one_hundred_pixels() {
    let marker = hundred_pixel_ring_marker();
    assert_eq!(marker.expanded(2).perimeter().count(), 100);
}

#[test]
fn test_ten_by_ten_marker_activates_ui() {
    let img = frame_with_marker(20, BoundingBox::new(5, 5, 15, 15));
    let result = SignalClassifier::default().classify(&img);
    assert_eq!(result.marker, Some(BoundingBox::new(5, 5, 15, 15)));
    assert!(result.ui_active);
}

#[test]
fn test_five_by_five_marker_is_ignored() {
    let img = frame_with_marker(20, BoundingBox::new(5, 5, 10, 10));
    let result = SignalClassifier::default().classify(&img);
    assert!(result.marker.is_some());
    assert!(!result.ui_active);
}

#[test]
fn test_no_red_means_no_ui() {
    let img = RgbaImage::from_pixel(32, 32, WHITE);
    let result = SignalClassifier::default().classify(&img);
    assert_eq!(result.marker, None);
    assert!(!result.ui_active);
    assert!(!result.bite_detected);
}

#[test]
fn test_half_white_ring_is_not_a_bite() {
    let marker = hundred_pixel_ring_marker();
    let mut img = frame_with_marker(40, marker);
    paint_ring(&mut img, &marker, 50);

    let result = SignalClassifier::default().classify(&img);
    assert!(result.ui_active);
    assert_eq!(result.white_ratio, Some(0.5));
    assert!(!result.bite_detected);
}

#[test]
fn test_fifty_one_percent_white_ring_is_a_bite() {
    let marker = hundred_pixel_ring_marker();
    let mut img = frame_with_marker(40, marker);
    paint_ring(&mut img, &marker, 51);

    let result = SignalClassifier::default().classify(&img);
    assert_eq!(result.white_ratio, Some(0.51));
    assert!(result.bite_detected);
}

#[test]
fn test_classifying_twice_gives_same_result() {
    let marker = hundred_pixel_ring_marker();
    let mut img = frame_with_marker(40, marker);
    paint_ring(&mut img, &marker, 63);

    let classifier = SignalClassifier::default();
    let first = classifier.classify(&img);
    let second = classifier.classify(&img);
    assert_eq!(first, second);
}

#[test]
fn test_custom_ranges_change_detection() {
    // A blue marker is invisible to the default classifier but found with a
    // blue range configured as "red".
    let mut settings = red_bite::Settings::default();
    settings.red = ColorRange::new([0, 0, 200], [80, 80, 255]);
    let mut img = RgbaImage::from_pixel(30, 30, BACKGROUND);
    for y in 5..=20 {
        for x in 5..=20 {
            img.put_pixel(x, y, Rgba([10, 10, 230, 255]));
        }
    }
    assert!(!SignalClassifier::default().classify(&img).ui_active);
    assert!(SignalClassifier::from_settings(&settings).classify(&img).ui_active);
}

#[test]
fn test_idle_timeout_recasts() {
    let start = Instant::now();
    let mut machine = FishingStateMachine::new(IDLE_TIMEOUT, start);
    let later = start + Duration::from_secs(4 * 60);

    assert_eq!(machine.step(false, false, later), Some(Action::Cast));
    assert_eq!(machine.state(), BotState::Idle);
    assert_eq!(machine.last_action(), later);
}

#[test]
fn test_eighty_percent_ring_while_fishing_clicks() {
    let marker = hundred_pixel_ring_marker();
    let mut img = frame_with_marker(40, marker);
    paint_ring(&mut img, &marker, 80);

    let classifier = SignalClassifier::default();
    let start = Instant::now();
    let mut machine = FishingStateMachine::new(IDLE_TIMEOUT, start);

    let quiet = frame_with_marker(40, marker);
    let signals = classifier.classify(&quiet);
    assert_eq!(machine.step(signals.ui_active, signals.bite_detected, start), None);
    assert_eq!(machine.state(), BotState::Fishing);

    let signals = classifier.classify(&img);
    assert_eq!(signals.white_ratio, Some(0.8));
    assert_eq!(
        machine.step(signals.ui_active, signals.bite_detected, start),
        Some(Action::Click)
    );
    assert_eq!(machine.state(), BotState::Fishing);
}

#[test]
fn test_bar_disappearing_while_fishing_casts() {
    let classifier = SignalClassifier::default();
    let start = Instant::now();
    let mut machine = FishingStateMachine::new(IDLE_TIMEOUT, start);

    let bar = frame_with_marker(40, hundred_pixel_ring_marker());
    let signals = classifier.classify(&bar);
    machine.step(signals.ui_active, signals.bite_detected, start);
    assert_eq!(machine.state(), BotState::Fishing);

    let empty = RgbaImage::from_pixel(40, 40, BACKGROUND);
    let signals = classifier.classify(&empty);
    assert_eq!(
        machine.step(signals.ui_active, signals.bite_detected, start),
        Some(Action::Cast)
    );
    assert_eq!(machine.state(), BotState::Idle);
}
