//! Error types for the mask-processing pipeline.
//!
//! Per-file failures (`UnsupportedFormat`, `CorruptImage`) are recovered
//! inside the catalog: the file is recorded as skipped and the run continues.
//! Directory- and run-level failures (`EmptyDirectory`, `NoUsableImages`) are
//! fatal and carry the offending path so the caller can report it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchitectError {
    /// The file could not be decoded as an image at all.
    #[error("cannot decode {} as an image: {}", .path.display(), .detail)]
    UnsupportedFormat { path: PathBuf, detail: String },

    /// Decoding started but the pixel data is broken.
    #[error("corrupt image data in {}: {}", .path.display(), .detail)]
    CorruptImage { path: PathBuf, detail: String },

    /// A directory group reached the clusterer with zero usable entries.
    /// Unreachable through the catalog path, guarded regardless.
    #[error("directory {} produced no usable masks", .directory.display())]
    EmptyDirectory { directory: PathBuf },

    /// The whole tree yielded nothing to work with. Fatal for the run.
    #[error("no usable images found under {}", .root.display())]
    NoUsableImages { root: PathBuf },

    /// Profile XML serialization failed.
    #[error("profile XML generation failed: {0}")]
    Xml(String),

    /// Packaging the .vas archive failed.
    #[error("archive generation failed at {}: {}", .path.display(), .detail)]
    Archive { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchitectError>;
