//! Interactive region setup from two cursor positions

use std::io::BufRead;

use anyhow::{Context, Result};

use crate::error::InjectionError;
use crate::screen_reader::Region;

/// Ask the operator to hover both corners of the fishing bar.
///
/// `lines` supplies the Enter presses and `cursor` the pointer position at
/// each press. A region without width or height is rejected.
pub fn setup_region<R, C>(lines: &mut R, mut cursor: C) -> Result<Region>
where
    R: BufRead,
    C: FnMut() -> Result<(i32, i32), InjectionError>,
{
    println!("\n--- Define the fishing bar region ---");

    println!("Hover the TOP-LEFT corner of the bar and press Enter...");
    let (x1, y1) = read_corner(lines, &mut cursor).context("Failed to read top-left corner")?;
    println!("Top-left saved: ({}, {})", x1, y1);

    println!("Hover the BOTTOM-RIGHT corner of the bar and press Enter...");
    let (x2, y2) = read_corner(lines, &mut cursor).context("Failed to read bottom-right corner")?;
    println!("Bottom-right saved: ({}, {})", x2, y2);

    let region = Region::from_corners(x1, y1, x2, y2)?;
    tracing::info!("[SETUP] Region {:?}", region);
    Ok(region)
}

fn read_corner<R, C>(lines: &mut R, cursor: &mut C) -> Result<(i32, i32)>
where
    R: BufRead,
    C: FnMut() -> Result<(i32, i32), InjectionError>,
{
    let mut line = String::new();
    if lines.read_line(&mut line)? == 0 {
        anyhow::bail!("Input closed before the corner was confirmed");
    }
    Ok(cursor()?)
}
