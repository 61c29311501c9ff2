//! Linear (equirectangular) mapping from geographic degrees to grid cells.
//!
//! Rounding is `f64::round`, i.e. half away from zero. An axis with zero span
//! collapses onto the middle cell of that axis; for a single-point layer every
//! coordinate therefore lands on the canvas center.

use crate::bounds::GeoBounds;

/// A character cell on the canvas: `x` is the column, `y` the row (0 = top).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Project `(lon, lat)` into a `width` x `height` grid framed by `bounds`.
///
/// Latitude is flipped: `lat_max` maps to row 0. The result is always clamped
/// into `[0, width-1] x [0, height-1]`.
pub fn project(lon: f64, lat: f64, bounds: &GeoBounds, width: usize, height: usize) -> GridPoint {
    let max_x = width.saturating_sub(1) as f64;
    let max_y = height.saturating_sub(1) as f64;

    let lon_span = bounds.lon_span();
    let x = if lon_span > 0.0 {
        (lon - bounds.lon_min) / lon_span * max_x
    } else {
        max_x / 2.0
    };

    let lat_span = bounds.lat_span();
    let y = if lat_span > 0.0 {
        (bounds.lat_max - lat) / lat_span * max_y
    } else {
        max_y / 2.0
    };

    GridPoint::new(to_cell(x, max_x), to_cell(y, max_y))
}

fn to_cell(v: f64, max: f64) -> usize {
    // NaN only shows up for non-finite input; pin it to the origin.
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, max) as usize
}
