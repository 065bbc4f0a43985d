// THEORY:
// The `catalog` module is the ingestion layer of the engine. It turns a root
// directory into an ordered sequence of `MaskImage` records, and it is the
// only place that touches the filesystem for reading sources.
//
// Key architectural principles:
// 1.  **Deterministic Traversal**: Files are discovered depth-first with
//     siblings in alphabetical order. Every downstream guarantee — which
//     duplicate keeps its name, the member order inside a WatchZone, the
//     byte-identity of repeated runs — is anchored to this order.
// 2.  **Gate, Then Decode**: The extension allow-list filters candidates up
//     front (case-insensitively); decode failures are then classified into
//     the error taxonomy instead of being guessed at from library behavior.
// 3.  **Per-File Failures Never Abort the Run**: An unreadable, unsupported,
//     or fully transparent file is recorded as skipped and excluded. Only a
//     tree that yields zero usable images is fatal.
// 4.  **Split for Parallelism**: `extract` is a pure per-file function so the
//     parallel pipeline can fan it out to workers, while `scan_candidates`
//     and `finalize_catalog` stay sequential — naming must happen in
//     traversal order no matter who computed the pixels.

use crate::core_modules::alpha_bounds::{compute_bounds, crop_to_bounds};
use crate::core_modules::mask::MaskImage;
use crate::core_modules::rect::Rect;
use crate::core_modules::run_context::{ProcessingEvent, RunContext, SkipReason};
use crate::error::{ArchitectError, Result};
use crate::pipeline::PipelineConfig;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The result of scanning one candidate file, before naming.
#[derive(Debug)]
pub(crate) enum Extraction {
    Visible {
        width: u32,
        height: u32,
        bounds: Rect,
        cropped: RgbaImage,
    },
    FullyTransparent,
}

/// Enumerates candidate files under `root` in deterministic traversal order.
/// Files whose extension is not on the approved list are recorded as skipped
/// here and never reach the decoder.
pub(crate) fn scan_candidates(
    root: &Path,
    config: &PipelineConfig,
    ctx: &mut RunContext,
) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if config
            .approved_extensions
            .iter()
            .any(|approved| approved.eq_ignore_ascii_case(&extension))
        {
            candidates.push(path);
        } else {
            ctx.record(ProcessingEvent::Skipped {
                path,
                reason: SkipReason::UnapprovedExtension { extension },
            });
        }
    }

    Ok(candidates)
}

/// Decodes one candidate and computes its visible bounds and crop.
/// Pure per-file work: no shared state, safe to run on any worker.
pub(crate) fn extract(path: &Path, alpha_threshold: u8) -> Result<Extraction> {
    let decoded = image::open(path).map_err(|e| classify_decode_error(path, e))?;

    // Sources without an alpha channel come out fully opaque here, which
    // makes their bounding rectangle the full image.
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    match compute_bounds(&rgba, alpha_threshold) {
        Some(bounds) => {
            let cropped = crop_to_bounds(&rgba, bounds);
            Ok(Extraction::Visible {
                width,
                height,
                bounds,
                cropped,
            })
        }
        None => Ok(Extraction::FullyTransparent),
    }
}

fn classify_decode_error(path: &Path, error: image::ImageError) -> ArchitectError {
    match error {
        image::ImageError::Unsupported(e) => ArchitectError::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
        other => ArchitectError::CorruptImage {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

fn skip_reason_for(error: &ArchitectError) -> SkipReason {
    match error {
        ArchitectError::UnsupportedFormat { detail, .. } => SkipReason::UnsupportedFormat {
            detail: detail.clone(),
        },
        other => SkipReason::CorruptImage {
            detail: other.to_string(),
        },
    }
}

/// Turns per-file extraction outcomes (in traversal order) into the final
/// catalog: assigns unique names, records one event per file, and fails the
/// run only if nothing usable remains.
pub(crate) fn finalize_catalog(
    root: &Path,
    extracted: Vec<(PathBuf, Result<Extraction>)>,
    ctx: &mut RunContext,
) -> Result<Vec<MaskImage>> {
    let mut masks = Vec::new();

    for (path, outcome) in extracted {
        match outcome {
            Ok(Extraction::Visible {
                width,
                height,
                bounds,
                cropped,
            }) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let (name, renamed) = ctx.claim_name(&stem);

                if renamed {
                    ctx.record(ProcessingEvent::Renamed {
                        original: stem,
                        assigned: name.clone(),
                        path: path.clone(),
                    });
                } else {
                    ctx.record(ProcessingEvent::Processed {
                        name: name.clone(),
                        path: path.clone(),
                    });
                }

                let directory = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());

                masks.push(MaskImage {
                    source_path: path,
                    name,
                    directory,
                    width,
                    height,
                    bounds,
                    cropped,
                });
            }
            Ok(Extraction::FullyTransparent) => {
                ctx.record(ProcessingEvent::Skipped {
                    path,
                    reason: SkipReason::FullyTransparent,
                });
            }
            Err(error) => {
                let reason = skip_reason_for(&error);
                ctx.record(ProcessingEvent::Skipped { path, reason });
            }
        }
    }

    if masks.is_empty() {
        return Err(ArchitectError::NoUsableImages {
            root: root.to_path_buf(),
        });
    }

    Ok(masks)
}

/// Builds the full catalog sequentially: scan, extract each candidate in
/// traversal order, then name and collect.
pub fn build_catalog(
    root: &Path,
    config: &PipelineConfig,
    ctx: &mut RunContext,
) -> Result<Vec<MaskImage>> {
    let candidates = scan_candidates(root, config, ctx)?;

    let extracted = candidates
        .into_iter()
        .map(|path| {
            let outcome = extract(&path, config.alpha_threshold);
            (path, outcome)
        })
        .collect();

    finalize_catalog(root, extracted, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn write_mask(path: &Path, width: u32, height: u32, visible: Rect) {
        let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        for y in visible.top..visible.bottom {
            for x in visible.left..visible.right {
                img.put_pixel(x, y, Rgba([200, 200, 200, 255]));
            }
        }
        img.save(path).expect("failed to write test mask");
    }

    #[test]
    fn duplicate_stems_across_directories_are_renamed_in_traversal_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();

        write_mask(&root.join("Box.png"), 20, 20, Rect::new(1, 1, 5, 5));
        write_mask(&root.join("sub/Box.png"), 20, 20, Rect::new(6, 6, 9, 9));

        let mut ctx = RunContext::new();
        let masks = build_catalog(root, &PipelineConfig::default(), &mut ctx).unwrap();

        assert_eq!(masks.len(), 2);
        // Root-level Box.png sorts before the "sub" directory, keeps its name.
        assert_eq!(masks[0].name, "Box");
        assert_eq!(masks[1].name, "Box_1");
        // The source files keep their names; only the records are renamed.
        assert!(root.join("sub/Box.png").exists());
        assert!(
            ctx.events()
                .iter()
                .any(|e| matches!(e, ProcessingEvent::Renamed { assigned, .. } if assigned == "Box_1"))
        );
    }

    #[test]
    fn non_image_and_unapproved_files_are_skipped_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        write_mask(&root.join("good.png"), 10, 10, Rect::new(2, 2, 8, 8));
        // Approved extension but not an image.
        fs::write(root.join("fake.png"), b"definitely not a png").unwrap();
        // Unapproved extension.
        fs::write(root.join("notes.txt"), b"readme").unwrap();

        let mut ctx = RunContext::new();
        let masks = build_catalog(root, &PipelineConfig::default(), &mut ctx).unwrap();

        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].name, "good");

        let skips: Vec<&SkipReason> = ctx
            .events()
            .iter()
            .filter_map(|e| match e {
                ProcessingEvent::Skipped { reason, .. } => Some(reason),
                _ => None,
            })
            .collect();
        assert_eq!(skips.len(), 2);
        assert!(
            skips
                .iter()
                .any(|r| matches!(r, SkipReason::UnapprovedExtension { extension } if extension == "txt"))
        );
        assert!(
            skips
                .iter()
                .any(|r| matches!(r, SkipReason::UnsupportedFormat { .. }))
        );
    }

    #[test]
    fn fully_transparent_images_are_skipped_with_reason() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        write_mask(&root.join("visible.png"), 10, 10, Rect::new(0, 0, 3, 3));
        let empty = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        empty.save(root.join("empty.png")).unwrap();

        let mut ctx = RunContext::new();
        let masks = build_catalog(root, &PipelineConfig::default(), &mut ctx).unwrap();

        assert_eq!(masks.len(), 1);
        assert!(ctx.events().iter().any(|e| matches!(
            e,
            ProcessingEvent::Skipped {
                reason: SkipReason::FullyTransparent,
                ..
            }
        )));
    }

    #[test]
    fn empty_tree_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = RunContext::new();
        let result = build_catalog(dir.path(), &PipelineConfig::default(), &mut ctx);
        assert!(matches!(
            result,
            Err(ArchitectError::NoUsableImages { .. })
        ));
    }

    #[test]
    fn repeated_runs_produce_identical_catalogs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("a")).unwrap();
        fs::create_dir(root.join("b")).unwrap();

        write_mask(&root.join("a/Mark.png"), 30, 30, Rect::new(0, 0, 10, 10));
        write_mask(&root.join("b/Mark.png"), 30, 30, Rect::new(5, 5, 15, 15));
        write_mask(&root.join("b/Other.png"), 30, 30, Rect::new(20, 20, 30, 30));

        let run = || {
            let mut ctx = RunContext::new();
            build_catalog(root, &PipelineConfig::default(), &mut ctx).unwrap()
        };

        let first = run();
        let second = run();
        let names = |masks: &[MaskImage]| -> Vec<String> {
            masks.iter().map(|m| m.name.clone()).collect()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["Mark", "Mark_1", "Other"]);
    }
}
