// THEORY:
// The `pipeline` module is the top-level API for the whole engine. It
// encapsulates the catalog and clustering stages behind a single, easy-to-use
// interface: configure once, point it at a root directory, get back the
// ordered WatchZones, the catalogued masks, and the structured run record.

use crate::core_modules::catalog;
use crate::core_modules::run_context::RunContext;
use crate::core_modules::zone_clusterer;
use crate::error::Result;
use std::path::Path;

// Re-export key data structures for the public API.
pub use crate::core_modules::mask::MaskImage;
pub use crate::core_modules::rect::Rect;
pub use crate::core_modules::run_context::{ProcessingEvent, SkipReason};
pub use crate::core_modules::watch_zone::WatchZone;
pub use crate::error::ArchitectError;

/// Configuration for a pipeline run, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum pixel gap between two bounding rectangles for them to be
    /// considered part of one logical region.
    pub proximity_tolerance: u32,
    /// A pixel is visible iff its alpha value strictly exceeds this.
    pub alpha_threshold: u8,
    /// Approved raster extensions, matched case-insensitively. Anything else
    /// is skipped with a recorded reason.
    pub approved_extensions: Vec<String>,
    /// Screen geometry advertised in the generated profile.
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            proximity_tolerance: 10,
            alpha_threshold: 0,
            approved_extensions: vec!["png".to_string()],
            screen_width: 1280,
            screen_height: 720,
        }
    }
}

/// Everything a run produces: the ordered catalog, the ordered zones, and
/// the per-file facts for the logging collaborator.
#[derive(Debug)]
pub struct ArchitectReport {
    pub masks: Vec<MaskImage>,
    pub zones: Vec<WatchZone>,
    pub events: Vec<ProcessingEvent>,
}

/// The main, top-level struct for the mask engine.
pub struct ArchitectPipeline {
    config: PipelineConfig,
}

impl ArchitectPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full batch pipeline over one root directory.
    pub fn run(&self, root: &Path) -> Result<ArchitectReport> {
        let mut ctx = RunContext::new();

        // Stage 1: Catalog Construction
        let masks = catalog::build_catalog(root, &self.config, &mut ctx)?;

        // Stage 2: Zone Clustering
        let zones = zone_clusterer::cluster(&masks, self.config.proximity_tolerance, &mut ctx)?;

        Ok(ArchitectReport {
            masks,
            zones,
            events: ctx.into_events(),
        })
    }
}
