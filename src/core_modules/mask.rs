// THEORY:
// The `mask` module defines the per-image record that flows through the whole
// run. A `MaskImage` is created once during catalog construction and is
// immutable afterwards: the only mutation in its lifecycle is the
// name-collision rename, and that happens inside the catalog before the
// record is ever handed out.
//
// Key architectural principles:
// 1.  **Identity Is the Source Path**: Two records are the same mask iff they
//     came from the same file. The display name is derived data and may have
//     been suffixed for uniqueness; the file on disk is never touched.
// 2.  **Dumb Data Container**: The struct performs no analysis. Bounds come
//     from the alpha-bounds extractor, the name from the run context, the
//     crop from the extraction step.
// 3.  **Only the Crop Survives**: The full decoded pixel buffer lives exactly
//     as long as it takes to compute the bounding rectangle and cut the crop.
//     The record keeps the crop because both the archive and any downstream
//     consumer need it; the source dimensions are kept as plain numbers.

use crate::core_modules::rect::Rect;
use image::RgbaImage;
use std::path::PathBuf;

/// One catalogued mask: a screenshot with visible content, its bounding
/// rectangle, and the unique name downstream generators refer to it by.
#[derive(Debug, Clone)]
pub struct MaskImage {
    /// Absolute path of the source file. This is the record's identity.
    pub source_path: PathBuf,
    /// Final display name, unique case-sensitively across the whole run.
    /// Defaults to the file stem; collisions get a `_N` suffix.
    pub name: String,
    /// The directory containing the source file. Clustering never crosses
    /// directory boundaries.
    pub directory: PathBuf,
    /// Width of the source image in pixels, unchanged from the file.
    pub width: u32,
    /// Height of the source image in pixels, unchanged from the file.
    pub height: u32,
    /// Minimal rectangle enclosing all visible pixels. Always contained in
    /// `[0, width) x [0, height)`.
    pub bounds: Rect,
    /// The cropped copy of the visible region, ready for archive packaging.
    pub cropped: RgbaImage,
}
