// THEORY:
// Generates the `structure.xml` game profile: one `WatchZone` element per
// clustered zone, each advertising its enclosing geometry and the archive
// paths of its member masks. Zone names come from the directory name,
// uniquified across the profile with the same `_N` rule masks use. The
// comparison metric is only interpreted here: a set metric becomes a real
// `ErrorMetric` element, an unset one stays a placeholder comment for the
// user to fill in.

use crate::core_modules::mask::MaskImage;
use crate::core_modules::watch_zone::WatchZone;
use crate::error::{ArchitectError, Result};
use crate::generators::archive_path;
use crate::pipeline::PipelineConfig;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;

const GENERATOR_COMMENT: &str = "Generated by vas_architect";
const ERROR_METRIC_OPTIONS: &str = "ErrorMetric options: \
    default=PeakSignalToNoise | \
    MeanErrorPerPixel | \
    Absolute | \
    StructuralDissimilarity";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn xml_err(error: impl std::fmt::Display) -> ArchitectError {
    ArchitectError::Xml(error.to_string())
}

fn start(writer: &mut XmlWriter, tag: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_err)
}

fn end(writer: &mut XmlWriter, tag: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)
}

fn text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    start(writer, tag)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    end(writer, tag)
}

fn comment(writer: &mut XmlWriter, text: &str) -> Result<()> {
    // Comments carry literal angle brackets (the placeholder elements users
    // uncomment), so the content must not be entity-escaped.
    writer
        .write_event(Event::Comment(BytesText::from_escaped(text)))
        .map_err(xml_err)
}

/// Enforces unique WatchZone names by appending a counter when a name is
/// already taken. Zone names live in their own namespace, separate from mask
/// names.
fn unique_zone_name(base: &str, existing: &mut HashSet<String>) -> String {
    if existing.insert(base.to_string()) {
        return base.to_string();
    }
    let mut count = 1u32;
    loop {
        let candidate = format!("{base}_{count}");
        if existing.insert(candidate.clone()) {
            return candidate;
        }
        count += 1;
    }
}

fn directory_label(zone: &WatchZone) -> String {
    zone.directory
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Game".to_string())
}

fn write_watchzone(
    writer: &mut XmlWriter,
    zone: &WatchZone,
    zone_name: &str,
    masks_by_name: &HashMap<&str, &MaskImage>,
    root: &Path,
) -> Result<()> {
    start(writer, "WatchZone")?;
    text_element(writer, "Name", zone_name)?;

    match &zone.comparison_metric {
        Some(metric) => text_element(writer, "ErrorMetric", metric)?,
        None => comment(writer, "ErrorMetric></ErrorMetric")?,
    }
    comment(writer, "Equalize>false</Equalize")?;

    start(writer, "Geometry")?;
    text_element(writer, "X", &zone.bounds.left.to_string())?;
    text_element(writer, "Y", &zone.bounds.top.to_string())?;
    text_element(writer, "Width", &zone.bounds.width().to_string())?;
    text_element(writer, "Height", &zone.bounds.height().to_string())?;
    end(writer, "Geometry")?;

    start(writer, "Watches")?;
    start(writer, "Watcher")?;
    text_element(writer, "Name", &directory_label(zone))?;

    start(writer, "WatchImages")?;
    for member in &zone.member_names {
        let mask = masks_by_name
            .get(member.as_str())
            .ok_or_else(|| ArchitectError::Xml(format!("unknown mask name \"{member}\"")))?;
        start(writer, "WatchImage")?;
        text_element(writer, "FilePath", &archive_path(mask, root))?;
        end(writer, "WatchImage")?;
    }
    end(writer, "WatchImages")?;

    end(writer, "Watcher")?;
    end(writer, "Watches")?;
    end(writer, "WatchZone")
}

/// Renders the complete `structure.xml` profile as a string.
pub fn create_xml(
    masks: &[MaskImage],
    zones: &[WatchZone],
    root: &Path,
    config: &PipelineConfig,
) -> Result<String> {
    let masks_by_name: HashMap<&str, &MaskImage> =
        masks.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b'\t', 1);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_err)?;

    let mut profile = BytesStart::new("GameProfile");
    profile.push_attribute(("xmlns:xsd", "http://www.w3.org/2001/XMLSchema"));
    profile.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    writer
        .write_event(Event::Start(profile))
        .map_err(xml_err)?;

    comment(&mut writer, GENERATOR_COMMENT)?;
    let profile_name = root
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Game".to_string());
    text_element(&mut writer, "Name", &profile_name)?;

    start(&mut writer, "Screens")?;
    start(&mut writer, "Screen")?;
    text_element(&mut writer, "Name", "Game")?;
    start(&mut writer, "Geometry")?;
    text_element(&mut writer, "Width", &config.screen_width.to_string())?;
    text_element(&mut writer, "Height", &config.screen_height.to_string())?;
    end(&mut writer, "Geometry")?;

    start(&mut writer, "WatchZones")?;
    comment(&mut writer, ERROR_METRIC_OPTIONS)?;

    let mut zone_names = HashSet::new();
    for zone in zones {
        let zone_name = unique_zone_name(&directory_label(zone), &mut zone_names);
        write_watchzone(&mut writer, zone, &zone_name, &masks_by_name, root)?;
    }

    end(&mut writer, "WatchZones")?;
    end(&mut writer, "Screen")?;
    end(&mut writer, "Screens")?;
    end(&mut writer, "GameProfile")?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_err)
}
