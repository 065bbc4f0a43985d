// THEORY:
// The `alpha_bounds` module is the lowest analytical layer of the engine. Its
// single job is to answer: "where is the visible content of this mask?" A mask
// is a largely transparent screenshot, so the answer is the minimal rectangle
// enclosing every pixel whose alpha channel exceeds the visibility threshold.
//
// Key architectural principles:
// 1.  **Pure Function Over Pixels**: `compute_bounds` has no side effects and
//     no state. It scans the full RGBA buffer exactly once; for large images
//     this O(width * height) pass dominates the run time, which is why the
//     parallel pipeline fans whole files out to workers rather than splitting
//     a single scan.
// 2.  **Threshold Zero By Default**: A pixel is visible iff `alpha > threshold`.
//     The default threshold of 0 means any trace of opacity counts; partial
//     transparency tolerance is an explicit configuration choice, never an
//     implicit one.
// 3.  **Opaque Fallback**: Sources without an alpha channel arrive here after
//     `to_rgba8`, which synthesizes a fully opaque channel. Such images
//     therefore produce the full-image rectangle rather than an error.
// 4.  **Empty Is a Value**: An image with no visible pixel returns `None`.
//     Deciding what to do about that (skip with a recorded reason) belongs to
//     the catalog layer, not here.

use crate::core_modules::rect::Rect;
use image::RgbaImage;

/// Computes the minimal axis-aligned rectangle enclosing every pixel whose
/// alpha value strictly exceeds `threshold`.
///
/// Returns `None` when the image has no visible pixel at all.
pub fn compute_bounds(image: &RgbaImage, threshold: u8) -> Option<Rect> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut visible = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] > threshold {
            visible = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !visible {
        return None;
    }

    // Inclusive pixel extents become a half-open rectangle.
    Some(Rect::new(min_x, min_y, max_x + 1, max_y + 1))
}

/// Produces the cropped copy of `image` covered by `bounds`.
/// The caller drops the full decoded buffer immediately afterwards; only the
/// crop travels through the rest of the run.
pub fn crop_to_bounds(image: &RgbaImage, bounds: Rect) -> RgbaImage {
    image::imageops::crop_imm(
        image,
        bounds.left,
        bounds.top,
        bounds.width(),
        bounds.height(),
    )
    .to_image()
}
