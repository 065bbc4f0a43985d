// THEORY:
// The `run_context` module replaces what would otherwise be global mutable
// state — a shared uniqueness counter and an ambient logger — with one
// explicit object owned by a single run. A `RunContext` is created when a
// pipeline run starts and discarded when it ends; nothing about a run leaks
// into the next one.
//
// Key architectural principles:
// 1.  **Facts, Not Log Lines**: The engine records structured
//     `ProcessingEvent`s (decision + reason). How those facts get formatted
//     into a log file is the binary's business; the engine only mirrors each
//     fact through the `log` facade for live observability.
// 2.  **One Name Registry Per Run**: Mask names must be unique
//     case-sensitively across the entire tree, not per directory. The
//     registry hands the first claimant its name unchanged and deterministic
//     `_1`, `_2`, ... suffixes to everyone after, in traversal order.
// 3.  **Append-Only**: Events are only ever appended, so the sequential
//     phases of the pipeline can share the context freely without locking.

use crate::core_modules::rect::Rect;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// Why a scanned file was excluded from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file's extension is not on the approved list for this run.
    UnapprovedExtension { extension: String },
    /// The image decoded fine but contains no visible pixel.
    FullyTransparent,
    /// The file could not be decoded as an image at all.
    UnsupportedFormat { detail: String },
    /// Decoding started but the pixel data is broken.
    CorruptImage { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnapprovedExtension { extension } => {
                write!(f, "extension \"{extension}\" is not approved")
            }
            SkipReason::FullyTransparent => {
                write!(f, "fully transparent, no visible content")
            }
            SkipReason::UnsupportedFormat { detail } => {
                write!(f, "not a decodable image: {detail}")
            }
            SkipReason::CorruptImage { detail } => {
                write!(f, "corrupt image data: {detail}")
            }
        }
    }
}

/// One structured fact about the run, in the order it happened.
#[derive(Debug, Clone)]
pub enum ProcessingEvent {
    /// A file was catalogued under its default name.
    Processed { name: String, path: PathBuf },
    /// A file was catalogued but its name collided and was suffixed.
    /// The file on disk keeps its original name.
    Renamed {
        original: String,
        assigned: String,
        path: PathBuf,
    },
    /// A file was excluded from the catalog.
    Skipped { path: PathBuf, reason: SkipReason },
    /// The clusterer emitted a WatchZone.
    ZoneCreated {
        directory: PathBuf,
        cluster_index: u32,
        member_count: usize,
        bounds: Rect,
    },
}

impl fmt::Display for ProcessingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingEvent::Processed { name, path } => {
                write!(f, "processed {} as \"{name}\"", path.display())
            }
            ProcessingEvent::Renamed {
                original,
                assigned,
                path,
            } => write!(
                f,
                "renamed \"{original}\" to \"{assigned}\" for {}",
                path.display()
            ),
            ProcessingEvent::Skipped { path, reason } => {
                write!(f, "skipped {}: {reason}", path.display())
            }
            ProcessingEvent::ZoneCreated {
                directory,
                cluster_index,
                member_count,
                bounds,
            } => write!(
                f,
                "watchzone {}#{cluster_index}: {member_count} mask(s) in ({}, {})-({}, {})",
                directory.display(),
                bounds.left,
                bounds.top,
                bounds.right,
                bounds.bottom
            ),
        }
    }
}

/// Per-run state: the mask-name registry and the structured event log.
/// One context per run; discarded at run end.
#[derive(Debug, Default)]
pub struct RunContext {
    claimed_names: HashSet<String>,
    events: Vec<ProcessingEvent>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a unique name derived from `base`. The first claimant gets
    /// `base` itself; later claimants get `base_1`, `base_2`, ... — the
    /// suffixed candidate is re-checked against the registry so a mask that
    /// was genuinely named `base_1` on disk can never be shadowed.
    ///
    /// Returns the final name and whether it differs from `base`.
    pub fn claim_name(&mut self, base: &str) -> (String, bool) {
        if self.claimed_names.insert(base.to_string()) {
            return (base.to_string(), false);
        }

        let mut count = 1u32;
        loop {
            let candidate = format!("{base}_{count}");
            if self.claimed_names.insert(candidate.clone()) {
                return (candidate, true);
            }
            count += 1;
        }
    }

    /// Appends one fact to the run record and mirrors it through `log`.
    pub fn record(&mut self, event: ProcessingEvent) {
        match &event {
            ProcessingEvent::Skipped { .. } => log::warn!("{event}"),
            _ => log::info!("{event}"),
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[ProcessingEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ProcessingEvent> {
        self.events
    }
}
