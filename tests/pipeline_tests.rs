// End-to-end runs over real directory trees of synthesized RGBA masks.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use vas_architect::error::ArchitectError;
use vas_architect::generators::{archive, asl, xml};
use vas_architect::parallel_pipeline::ParallelArchitectPipeline;
use vas_architect::pipeline::{
    ArchitectPipeline, ArchitectReport, PipelineConfig, ProcessingEvent, Rect,
};

/// Writes a largely transparent mask with one visible block.
fn write_mask(path: &Path, width: u32, height: u32, visible: Rect) {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for y in visible.top..visible.bottom {
        for x in visible.left..visible.right {
            img.put_pixel(x, y, Rgba([240, 240, 240, 255]));
        }
    }
    img.save(path).expect("failed to write test mask");
}

/// A small game tree: one mask at the root, a menus directory with a linked
/// pair plus one distant mask, and a boss directory whose mask stem collides
/// with the root one.
fn build_game_tree(root: &Path) {
    fs::create_dir(root.join("boss")).unwrap();
    fs::create_dir(root.join("menus")).unwrap();

    write_mask(&root.join("title.png"), 1280, 720, Rect::new(100, 100, 200, 200));
    write_mask(&root.join("boss/title.png"), 1280, 720, Rect::new(600, 40, 700, 90));
    write_mask(&root.join("menus/map.png"), 1280, 720, Rect::new(500, 500, 600, 600));
    write_mask(&root.join("menus/pause.png"), 1280, 720, Rect::new(0, 0, 50, 50));
    // 5px gap to pause.png: linked under the default 10px tolerance.
    write_mask(&root.join("menus/pause_icon.png"), 1280, 720, Rect::new(55, 0, 80, 40));
}

fn names(report: &ArchitectReport) -> Vec<&str> {
    report.masks.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn end_to_end_naming_clustering_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    build_game_tree(root);

    let report = ArchitectPipeline::new(PipelineConfig::default())
        .run(root)
        .unwrap();

    // Depth-first alphabetical traversal: boss/ before menus/ before the
    // root-level file, so the root title.png is the one renamed.
    assert_eq!(
        names(&report),
        vec!["title", "map", "pause", "pause_icon", "title_1"]
    );
    assert!(root.join("title.png").exists(), "source files stay untouched");

    // boss: 1 zone; menus: map alone + linked pause pair; root: 1 zone.
    assert_eq!(report.zones.len(), 4);

    assert_eq!(report.zones[0].directory, root.join("boss"));
    assert_eq!(report.zones[0].member_names, vec!["title"]);

    assert_eq!(report.zones[1].directory, root.join("menus"));
    assert_eq!(report.zones[1].member_names, vec!["map"]);
    assert_eq!(report.zones[1].cluster_index, 0);

    assert_eq!(report.zones[2].directory, root.join("menus"));
    assert_eq!(report.zones[2].member_names, vec!["pause", "pause_icon"]);
    assert_eq!(report.zones[2].cluster_index, 1);
    assert_eq!(report.zones[2].bounds, Rect::new(0, 0, 80, 50));

    assert_eq!(report.zones[3].directory, root);
    assert_eq!(report.zones[3].member_names, vec!["title_1"]);

    // Every mask belongs to exactly one zone.
    let member_total: usize = report.zones.iter().map(|z| z.member_names.len()).sum();
    assert_eq!(member_total, report.masks.len());
}

#[test]
fn no_zone_spans_two_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("a")).unwrap();
    fs::create_dir(root.join("b")).unwrap();

    // Identical bounding rectangles in different directories.
    let shared = Rect::new(10, 10, 60, 60);
    write_mask(&root.join("a/corner.png"), 100, 100, shared);
    write_mask(&root.join("b/corner.png"), 100, 100, shared);

    let report = ArchitectPipeline::new(PipelineConfig::default())
        .run(root)
        .unwrap();

    assert_eq!(report.zones.len(), 2);
    for zone in &report.zones {
        assert_eq!(zone.member_names.len(), 1);
    }
    assert_ne!(report.zones[0].directory, report.zones[1].directory);
}

#[test]
fn rerun_over_unchanged_tree_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    build_game_tree(root);

    let pipeline = ArchitectPipeline::new(PipelineConfig::default());
    let first = pipeline.run(root).unwrap();
    let second = pipeline.run(root).unwrap();

    assert_eq!(names(&first), names(&second));
    assert_eq!(first.zones.len(), second.zones.len());
    for (a, b) in first.zones.iter().zip(second.zones.iter()) {
        assert_eq!(a.directory, b.directory);
        assert_eq!(a.cluster_index, b.cluster_index);
        assert_eq!(a.bounds, b.bounds);
        assert_eq!(a.member_names, b.member_names);
    }
}

#[tokio::test]
async fn parallel_pipeline_matches_sequential_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    build_game_tree(root);
    // Extra junk exercises the skip paths concurrently.
    fs::write(root.join("menus/readme.txt"), b"notes").unwrap();
    fs::write(root.join("menus/broken.png"), b"not a png").unwrap();

    let sequential = ArchitectPipeline::new(PipelineConfig::default())
        .run(root)
        .unwrap();
    let parallel = ParallelArchitectPipeline::new(PipelineConfig::default())
        .run(root)
        .await
        .unwrap();

    assert_eq!(names(&sequential), names(&parallel));
    assert_eq!(sequential.zones.len(), parallel.zones.len());
    for (a, b) in sequential.zones.iter().zip(parallel.zones.iter()) {
        assert_eq!(a.directory, b.directory);
        assert_eq!(a.bounds, b.bounds);
        assert_eq!(a.member_names, b.member_names);
    }

    let skips = |report: &ArchitectReport| {
        report
            .events
            .iter()
            .filter(|e| matches!(e, ProcessingEvent::Skipped { .. }))
            .count()
    };
    assert_eq!(skips(&sequential), 2);
    assert_eq!(skips(&sequential), skips(&parallel));
}

#[test]
fn empty_root_is_a_fatal_run_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ArchitectPipeline::new(PipelineConfig::default()).run(dir.path());
    assert!(matches!(result, Err(ArchitectError::NoUsableImages { .. })));
}

#[test]
fn generated_artifacts_cover_every_zone_and_mask() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    build_game_tree(root);

    let config = PipelineConfig::default();
    let report = ArchitectPipeline::new(config.clone()).run(root).unwrap();

    let xml_content = xml::create_xml(&report.masks, &report.zones, root, &config).unwrap();
    assert_eq!(
        xml_content.matches("<WatchZone>").count(),
        report.zones.len()
    );
    assert_eq!(
        xml_content.matches("<FilePath>").count(),
        report.masks.len()
    );

    let mask_names: Vec<&str> = report.masks.iter().map(|m| m.name.as_str()).collect();
    let asl_content = asl::create_asl(&mask_names);
    for name in &mask_names {
        assert!(asl_content.contains(&format!("features[\"{name}\"]")));
    }

    let out = root.join("game.vas");
    archive::create_vas_archive(&report.masks, &asl_content, &xml_content, root, &out).unwrap();
    let archive_file = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
    // One PNG per mask plus the script and the profile.
    assert_eq!(archive_file.len(), report.masks.len() + 2);
}
