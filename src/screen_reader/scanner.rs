//! Bounding box search over a captured frame

use image::{Rgba, RgbaImage};

/// Axis-aligned box given by its inclusive corner pixels.
///
/// `width()` and `height()` are the spans `max - min`, so a box covering
/// pixels 5..=15 on both axes is 10x10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, x, y)
    }

    fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// Grow the box by `margin` pixels on every side.
    pub fn expanded(&self, margin: i32) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    /// Shift a buffer-local box into screen coordinates.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.min_x + dx, self.min_y + dy, self.max_x + dx, self.max_y + dy)
    }

    /// Border pixels of the box (its outer ring), top row to bottom row.
    ///
    /// Interior rows yield only their two edge pixels, so this walks
    /// `2 * (w + h)` points without touching the interior.
    pub fn perimeter(&self) -> impl Iterator<Item = (i32, i32)> {
        let Self { min_x, min_y, max_x, max_y } = *self;
        (min_y..=max_y).flat_map(move |y| {
            let step = if y == min_y || y == max_y {
                1
            } else {
                (max_x - min_x).max(1) as usize
            };
            (min_x..=max_x).step_by(step).map(move |x| (x, y))
        })
    }
}

/// Tight bounding box of every pixel satisfying `predicate`, or `None` when
/// nothing matches. Streams over the buffer without collecting matches.
pub fn find_bounding_box<F>(image: &RgbaImage, predicate: F) -> Option<BoundingBox>
where
    F: Fn(&Rgba<u8>) -> bool,
{
    let mut found: Option<BoundingBox> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if !predicate(pixel) {
            continue;
        }
        let (x, y) = (x as i32, y as i32);
        match found.as_mut() {
            Some(bbox) => bbox.include(x, y),
            None => found = Some(BoundingBox::point(x, y)),
        }
    }
    found
}
