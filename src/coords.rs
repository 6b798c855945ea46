//! Resolution-independent coordinate mapping (spec §4.4).
//!
//! Automation scripts written against `move`/`click`/`capture` would
//! otherwise have to hardcode pixel coordinates for one specific screen
//! resolution. The relative coordinate system instead exposes a fixed,
//! easy-to-reason-about grid (both dimensions multiples of 100, at most
//! 99900) whose aspect ratio tracks the framebuffer's, and translates
//! relative points/rects to absolute framebuffer pixels on demand.

use crate::{Point, Rect};

/// The relative coordinate grid for a `width x height` framebuffer: both
/// dimensions are positive multiples of 100, at most 99900, with aspect
/// ratio matching the framebuffer as closely as the multiple-of-100
/// constraint allows.
pub fn relative_resolution(width: u16, height: u16) -> (u32, u32) {
    const MAX_DIMENSION: u32 = 99900;
    let aspect = width as f64 / height as f64;

    if aspect >= 1.0 {
        let relative_width = MAX_DIMENSION;
        let relative_height = ((MAX_DIMENSION as f64 / aspect) as u32 / 100) * 100;
        (relative_width, relative_height.max(100))
    } else {
        let relative_height = MAX_DIMENSION;
        let relative_width = ((MAX_DIMENSION as f64 * aspect) as u32 / 100) * 100;
        (relative_width.max(100), relative_height)
    }
}

/// Converts a point in the relative coordinate grid to absolute framebuffer
/// pixel coordinates.
pub fn relative_to_absolute_point(point: Point, width: u16, height: u16) -> Point {
    let (rel_w, rel_h) = relative_resolution(width, height);
    Point {
        x: (point.x as u64 * width as u64 / rel_w as u64) as u32,
        y: (point.y as u64 * height as u64 / rel_h as u64) as u32,
    }
}

/// Converts a rectangle in the relative coordinate grid to an absolute
/// framebuffer pixel rectangle, independently scaling origin and extent.
pub fn relative_to_absolute_rect(rect: Rect, width: u16, height: u16) -> Rect {
    let (rel_w, rel_h) = relative_resolution(width, height);
    Rect {
        x: (rect.x as u64 * width as u64 / rel_w as u64) as u32,
        y: (rect.y as u64 * height as u64 / rel_h as u64) as u32,
        width: (rect.width as u64 * width as u64 / rel_w as u64) as u32,
        height: (rect.height as u64 * height as u64 / rel_h as u64) as u32,
    }
}
