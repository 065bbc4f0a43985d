// THEORY:
// A `WatchZone` is the engine's externally visible product: one named screen
// region that the downstream auto-splitter polls, backed by one or more
// candidate masks. It is a read-only summary created by the clusterer — the
// XML, ASL, and archive generators only ever read it.

use crate::core_modules::rect::Rect;
use std::path::PathBuf;

/// One clustered watch region. Identity is `(directory, cluster_index)`.
#[derive(Debug, Clone)]
pub struct WatchZone {
    /// The source subdirectory all members came from. Zones never span
    /// directories.
    pub directory: PathBuf,
    /// Position of this zone among the zones of its directory, in emission
    /// order.
    pub cluster_index: u32,
    /// The union of all member bounding rectangles (corner extents only;
    /// interior gaps are permitted and irrelevant).
    pub bounds: Rect,
    /// Final mask names of the members, in catalog traversal order. Order is
    /// significant: repeated runs must emit byte-identical output.
    pub member_names: Vec<String>,
    /// Opaque comparison-metric selector for the downstream generator.
    /// The engine never interprets it; unset by default.
    pub comparison_metric: Option<String>,
}
