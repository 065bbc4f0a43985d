// Orchestrates the full workflow over one root directory of mask
// screenshots: catalog + cluster, profile XML, ASL stub, .vas archive, and a
// per-run log file written beside the sources. Directory selection belongs
// to the surrounding application; this binary takes the path as its single
// argument and nothing else.

use std::env;
use std::path::{Path, PathBuf};
use vas_architect::error::Result;
use vas_architect::generators::{archive, asl, xml};
use vas_architect::parallel_pipeline::ParallelArchitectPipeline;
use vas_architect::pipeline::{ArchitectReport, PipelineConfig, ProcessingEvent};

#[tokio::main]
async fn main() {
    env_logger::init();

    // --- 1. Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: vas_architect <mask_root_directory>");
        std::process::exit(2);
    }
    let root = PathBuf::from(&args[1]);

    if let Err(e) = run(&root).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(root: &Path) -> Result<()> {
    let config = PipelineConfig::default();

    // --- 2. Catalog & Clustering ---
    let pipeline = ParallelArchitectPipeline::new(config.clone());
    let report = pipeline.run(root).await?;

    // --- 3. Profile Generation ---
    let xml_content = xml::create_xml(&report.masks, &report.zones, root, &config)?;
    let mask_names: Vec<&str> = report.masks.iter().map(|m| m.name.as_str()).collect();
    let asl_content = asl::create_asl(&mask_names);

    // --- 4. Archive Packaging ---
    let profile_name = root
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profile".to_string());
    let output_path = root.join(format!("{profile_name}.vas"));
    archive::create_vas_archive(&report.masks, &asl_content, &xml_content, root, &output_path)?;

    // --- 5. Run Log & Summary ---
    write_run_log(root, &report)?;

    let skipped = report
        .events
        .iter()
        .filter(|e| matches!(e, ProcessingEvent::Skipped { .. }))
        .count();
    println!(
        "Created {} with {} WatchZone(s) from {} mask(s); {} file(s) skipped.",
        output_path.display(),
        report.zones.len(),
        report.masks.len(),
        skipped
    );
    Ok(())
}

/// One line per structured event plus a closing summary, written beside the
/// sources so a run leaves an inspectable record.
fn write_run_log(root: &Path, report: &ArchitectReport) -> Result<()> {
    let mut lines: Vec<String> = report.events.iter().map(|e| e.to_string()).collect();
    lines.push(format!(
        "summary: {} mask(s), {} watchzone(s)",
        report.masks.len(),
        report.zones.len()
    ));
    std::fs::write(root.join("architect.log"), lines.join("\n") + "\n")?;
    Ok(())
}
