// THEORY:
// Packages the run's output into the `.vas` archive the auto-splitter
// consumes: every cropped mask re-encoded as PNG at its archive-relative
// path, plus `script.asl` and `structure.xml`. Source files are never
// touched; the archive is the only thing written besides the run log.

use crate::core_modules::mask::MaskImage;
use crate::error::{ArchitectError, Result};
use crate::generators::archive_path;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn archive_err(output_path: &Path, error: impl std::fmt::Display) -> ArchitectError {
    ArchitectError::Archive {
        path: output_path.to_path_buf(),
        detail: error.to_string(),
    }
}

/// Encodes one cropped mask back to PNG bytes for storage.
fn encode_png(mask: &MaskImage, output_path: &Path) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    encoder
        .write_image(
            mask.cropped.as_raw(),
            mask.cropped.width(),
            mask.cropped.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| archive_err(output_path, e))?;
    Ok(bytes)
}

/// Creates the `.vas` archive at `output_path`.
pub fn create_vas_archive(
    masks: &[MaskImage],
    asl_content: &str,
    xml_content: &str,
    root: &Path,
    output_path: &Path,
) -> Result<()> {
    let file = File::create(output_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for mask in masks {
        let entry_name = archive_path(mask, root);
        let png_bytes = encode_png(mask, output_path)?;
        zip.start_file(entry_name.as_str(), options)
            .map_err(|e| archive_err(output_path, e))?;
        zip.write_all(&png_bytes)?;
        log::info!("cropped image added to archive: {entry_name}");
    }

    zip.start_file("script.asl", options)
        .map_err(|e| archive_err(output_path, e))?;
    zip.write_all(asl_content.as_bytes())?;

    zip.start_file("structure.xml", options)
        .map_err(|e| archive_err(output_path, e))?;
    zip.write_all(xml_content.as_bytes())?;

    zip.finish().map_err(|e| archive_err(output_path, e))?;
    log::info!("archive created: {}", output_path.display());
    Ok(())
}
