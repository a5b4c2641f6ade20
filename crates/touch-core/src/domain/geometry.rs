//! Target display area and normalized-to-pixel mapping.
//!
//! TUIO positions are normalized to the sensor surface.  The bridge stretches
//! that unit square over one rectangle of the host desktop, the *target area*,
//! usually the bounds of a single monitor in virtual-desktop pixels.

use serde::{Deserialize, Serialize};

/// A rectangle in host desktop pixels.
///
/// `x` / `y` are the top-left corner and may be negative on multi-monitor
/// desktops where a display sits left of or above the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl TargetArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// An absolute pixel position on the host desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

/// Maps a normalized position into `area`.
///
/// `pixel = origin + round(norm * extent)`, rounding half to even.  Values
/// outside `[0, 1]` are not clamped and land outside the area; the host
/// decides what to do with them.  Results saturate at the `i32` range.
pub fn map_to_pixels(x: f32, y: f32, area: &TargetArea) -> PixelPoint {
    PixelPoint {
        x: scale_axis(x, area.x, area.width),
        y: scale_axis(y, area.y, area.height),
    }
}

fn scale_axis(norm: f32, origin: i32, extent: u32) -> i32 {
    let offset = (f64::from(norm) * f64::from(extent)).round_ties_even();
    // `as` saturates on overflow and maps NaN to 0.
    origin.saturating_add(offset as i32)
}
