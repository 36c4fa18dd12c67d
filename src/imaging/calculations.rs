//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{DEFAULT_RESIZE_BOX, ResizeParams};

/// Scale `source` to fit inside `bounds`, preserving aspect ratio.
///
/// One edge matches its bound exactly, the other is at most its bound.
/// Images smaller than the box are scaled up. Results are never below 1px.
///
/// # Examples
/// ```
/// # use imgbatch::imaging::calculations::fit_within;
/// // 256x128 landscape into a 128x128 box → 128x64
/// assert_eq!(fit_within((256, 128), (128, 128)), (128, 64));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the limiting edge
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w, h.max(1))
    } else {
        // Height is the limiting edge
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.max(1), max_h)
    }
}

/// Scale `source` so one edge equals `target`, the other following the aspect ratio.
pub fn scale_to_width(source: (u32, u32), target: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let h = (src_h as f64 * target as f64 / src_w as f64).round() as u32;
    (target, h.max(1))
}

/// See [`scale_to_width`].
pub fn scale_to_height(source: (u32, u32), target: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let w = (src_w as f64 * target as f64 / src_h as f64).round() as u32;
    (w.max(1), target)
}

/// Calculate resize output dimensions from the configured parameters.
///
/// Returns `None` when the source or a requested dimension is zero.
pub fn resize_dimensions(source: (u32, u32), params: &ResizeParams) -> Option<(u32, u32)> {
    if source.0 == 0 || source.1 == 0 {
        return None;
    }
    match (params.width, params.height) {
        (Some(0), _) | (_, Some(0)) => None,
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => Some(scale_to_width(source, w)),
        (None, Some(h)) => Some(scale_to_height(source, h)),
        (None, None) => Some(fit_within(source, DEFAULT_RESIZE_BOX)),
    }
}
