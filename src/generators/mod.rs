// THEORY:
// The `generators` modules are the mechanical output stage: they read the
// engine's WatchZone and MaskImage records and produce the three artifacts a
// profile ships with — `structure.xml`, the ASL script stub, and the `.vas`
// archive. They never mutate the records they are given.

pub mod archive;
pub mod asl;
pub mod xml;

use crate::core_modules::mask::MaskImage;
use std::path::Path;

/// The archive-relative path a mask is stored under: its directory relative
/// to the run root, joined with the final unique name. Always
/// forward-slashed, matching zip entry conventions. The rename exists only
/// here and in the XML — never on disk.
pub(crate) fn archive_path(mask: &MaskImage, root: &Path) -> String {
    let mut segments: Vec<String> = mask
        .directory
        .strip_prefix(root)
        .unwrap_or_else(|_| Path::new(""))
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.push(format!("{}.png", mask.name));
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::rect::Rect;
    use image::RgbaImage;
    use std::path::PathBuf;

    fn mask_at(directory: &str, name: &str) -> MaskImage {
        MaskImage {
            source_path: Path::new(directory).join("original.png"),
            name: name.to_string(),
            directory: PathBuf::from(directory),
            width: 10,
            height: 10,
            bounds: Rect::new(0, 0, 10, 10),
            cropped: RgbaImage::new(10, 10),
        }
    }

    #[test]
    fn archive_path_is_relative_and_forward_slashed() {
        let mask = mask_at("/game/menus/pause", "Resume_1");
        assert_eq!(
            archive_path(&mask, Path::new("/game")),
            "menus/pause/Resume_1.png"
        );
    }

    #[test]
    fn archive_path_for_root_level_mask_is_bare_name() {
        let mask = mask_at("/game", "Title");
        assert_eq!(archive_path(&mask, Path::new("/game")), "Title.png");
    }
}
