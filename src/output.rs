//! CLI output formatting for every subcommand.
//!
//! Output is **information-first**: each line leads with what something is
//! (a slot, a size, a color) and puts coordinates and paths after it.
//!
//! # Output Format
//!
//! ## Analyze
//!
//! ```text
//! shoot.jpg (1600x900, heuristic)
//!     background  full image         0,0 1600x900     90%
//!     main        salient subject    212,80 1180x760  74%
//!     title       top strip          0,0 1600x80      50%
//!     aux         aux band           160,45 1280x270  40%
//!     logo        detailed corner    1120,630 480x270 55%
//!
//! Palette
//!     #C02020 red
//!     #202020 black
//! ```
//!
//! ## Export
//!
//! ```text
//! Exporting 3 sizes
//!     1200x630 → out/ad-1200x630.png (6 layers)
//!     1080x1920 → out/ad-1080x1920.png (5 layers)
//!         skipped aux: corrupt buffer: ...
//! ```
//!
//! # Architecture
//!
//! Each subcommand has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::detection::{Extraction, ExtractionSource, LabeledRegion};
use crate::export::{ExportEvent, ExportedFile};
use crate::imaging::MatteStats;
use crate::layout::SkippedLayer;
use crate::palette::describe_color;
use crate::types::{Color, ElementSlot, Region, TextSlot, TextSlots};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// `x,y WxH`
pub fn region_span(region: Region) -> String {
    format!("{},{} {}x{}", region.x, region.y, region.w, region.h)
}

/// One aligned slot row: name, label, span, confidence.
pub fn slot_line(slot: ElementSlot, labeled: &LabeledRegion) -> String {
    format!(
        "{:<11} {:<18} {:<16} {}%",
        slot.name(),
        labeled.label,
        region_span(labeled.scored.region),
        labeled.scored.confidence.percent()
    )
}

fn skipped_line(skip: &SkippedLayer) -> String {
    format!("skipped {}: {}", skip.layer, skip.error)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Analyze
// ============================================================================

/// Format the element regions and palette found in one photo.
pub fn format_analysis(source: &Path, extraction: &Extraction, palette: &[Color]) -> Vec<String> {
    let mut lines = Vec::new();
    let method = match extraction.source {
        ExtractionSource::Detector => "detector",
        ExtractionSource::Heuristic => "heuristic",
    };
    let size = extraction
        .regions
        .get(&ElementSlot::Background)
        .map(|r| format!("{}x{}", r.scored.region.w, r.scored.region.h))
        .unwrap_or_else(|| "?".to_string());
    lines.push(format!("{} ({}, {})", file_name(source), size, method));

    for slot in ElementSlot::ALL {
        if let Some(labeled) = extraction.regions.get(&slot) {
            lines.push(format!("    {}", slot_line(slot, labeled)));
        }
    }

    if !palette.is_empty() {
        lines.push(String::new());
        lines.push("Palette".to_string());
        for color in palette {
            lines.push(format!("    {} {}", color.to_hex(), describe_color(*color)));
        }
    }
    lines
}

pub fn print_analysis(source: &Path, extraction: &Extraction, palette: &[Color]) {
    for line in format_analysis(source, extraction, palette) {
        println!("{}", line);
    }
}

/// Format text slot contents (e.g. from OCR bucketing), in slot order.
pub fn format_text_slots(texts: &TextSlots) -> Vec<String> {
    if texts.is_empty() {
        return vec!["No text".to_string()];
    }
    let mut lines = vec!["Text".to_string()];
    for slot in TextSlot::ALL {
        if let Some(style) = texts.get(&slot) {
            lines.push(format!("    {:<9} {}", slot.name(), style.content));
        }
    }
    lines
}

pub fn print_text_slots(texts: &TextSlots) {
    for line in format_text_slots(texts) {
        println!("{}", line);
    }
}

// ============================================================================
// Matte
// ============================================================================

pub fn format_matte(output: &Path, stats: &MatteStats) -> Vec<String> {
    let [r, g, b] = stats.reference;
    vec![
        format!("{}", output.display()),
        format!("    Background: {}", Color([r, g, b]).to_hex()),
        format!("    Threshold: {:.1}", stats.threshold),
        format!("    Cleared: {} px", stats.cleared),
        format!("    Feathered: {} px", stats.feathered),
    ]
}

pub fn print_matte(output: &Path, stats: &MatteStats) {
    for line in format_matte(output, stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::Started { total } => {
            let noun = if *total == 1 { "size" } else { "sizes" };
            vec![format!("Exporting {} {}", total, noun)]
        }
        ExportEvent::Rendered {
            size,
            path,
            drawn,
            skipped,
        } => {
            let mut lines = vec![format!(
                "    {} \u{2192} {} ({} layers)",
                size,
                path.display(),
                drawn
            )];
            lines.extend(skipped.iter().map(|s| format!("        {}", skipped_line(s))));
            lines
        }
    }
}

/// Closing summary after every size is written.
pub fn format_export_summary(files: &[ExportedFile]) -> Vec<String> {
    let skipped: usize = files.iter().map(|f| f.skipped.len()).sum();
    let mut line = format!(
        "Exported {} file{}",
        files.len(),
        if files.len() == 1 { "" } else { "s" }
    );
    if skipped > 0 {
        line.push_str(&format!(", {} layer{} skipped", skipped, if skipped == 1 { "" } else { "s" }));
    }
    vec![line]
}

pub fn print_export_summary(files: &[ExportedFile]) {
    for line in format_export_summary(files) {
        println!("{}", line);
    }
}
