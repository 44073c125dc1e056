//! Job configuration.
//!
//! A job file describes one ad: where its elements come from, what the text
//! says, how layers stack, and which sizes to export. Every key is optional;
//! user values are merged over stock defaults before validation.
//!
//! ## Configuration Options
//!
//! ```toml
//! sizes = ["1200x630", "1080x1920", "1080x1080"]
//! format = "png"            # png | jpeg | webp
//! quality = 90              # JPEG quality (1-100)
//! invert_logo = false
//! layer_order = ["main", "title-image", "aux", "logo",
//!                "title", "subtitle", "desc", "note", "date"]
//!
//! [source]
//! photo = "shoot.jpg"       # analyzed to fill any element not given below
//! detections = "objects.json"
//! ocr = "lines.json"        # fills text slots not set under [text]
//! external_background = "generated.png"
//!
//! [elements]
//! logo = "brand.png"
//! matte = ["logo"]          # remove flat backgrounds after loading
//!
//! [text.title]
//! content = "SUMMER SALE"
//! weight = "extra-bold"
//! color = "#FFD700"
//! shadow = true
//!
//! [layout.logo]
//! offset_x = 0.0            # percent of canvas width
//! offset_y = 2.5            # percent of canvas height
//! scale = 0.8
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early. Relative paths are
//! resolved against the job file's directory.

use crate::export::TargetSize;
use crate::imaging::{OutputFormat, Quality};
use crate::types::{ElementSlot, LayerOrder, LayoutMap, TextSlots};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// One ad job, loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Export sizes, `WIDTHxHEIGHT`.
    pub sizes: Vec<TargetSize>,
    pub format: OutputFormat,
    /// Lossy encoding quality (1-100).
    pub quality: u32,
    /// Draw the logo with inverted colors.
    pub invert_logo: bool,
    /// Drawing order of the nine layers, bottom first.
    pub layer_order: LayerOrder,
    pub source: SourceConfig,
    pub elements: ElementsConfig,
    pub text: TextSlots,
    pub layout: LayoutMap,
    pub processing: ProcessingConfig,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            sizes: vec![
                TargetSize::new(1200, 630),
                TargetSize::new(1080, 1920),
                TargetSize::new(1080, 1080),
            ],
            format: OutputFormat::Png,
            quality: Quality::default().value(),
            invert_logo: false,
            layer_order: LayerOrder::default(),
            source: SourceConfig::default(),
            elements: ElementsConfig::default(),
            text: TextSlots::new(),
            layout: LayoutMap::new(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl JobConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation("quality must be 1-100".into()));
        }
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation("sizes must not be empty".into()));
        }
        if let Some(size) = self.sizes.iter().find(|s| s.width == 0 || s.height == 0) {
            return Err(ConfigError::Validation(format!(
                "size {size} has a zero dimension"
            )));
        }
        for (layer, params) in &self.layout {
            if !(params.scale.is_finite() && params.scale > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "layout.{layer}.scale must be a positive number"
                )));
            }
            if !params.offset_x.is_finite() || !params.offset_y.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "layout.{layer} offsets must be finite"
                )));
            }
        }
        Ok(())
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    /// Rebase every relative path onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let rebase = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut().filter(|p| p.is_relative()) {
                *path = base.join(&*path);
            }
        };
        rebase(&mut self.source.photo);
        rebase(&mut self.source.detections);
        rebase(&mut self.source.ocr);
        rebase(&mut self.source.external_background);
        rebase(&mut self.elements.background);
        rebase(&mut self.elements.main);
        rebase(&mut self.elements.title);
        rebase(&mut self.elements.aux);
        rebase(&mut self.elements.logo);
    }
}

/// Inputs analyzed to populate slots automatically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Source photograph split into element slots.
    pub photo: Option<PathBuf>,
    /// Detector output (JSON list of `{label, score, box}`) for `photo`.
    pub detections: Option<PathBuf>,
    /// OCR output (JSON list of `{text, confidence, height, y}`).
    pub ocr: Option<PathBuf>,
    /// Compose over this image instead of the background slot.
    pub external_background: Option<PathBuf>,
}

/// Explicit element images. Each one replaces whatever `source.photo`
/// extraction put in that slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementsConfig {
    pub background: Option<PathBuf>,
    pub main: Option<PathBuf>,
    pub title: Option<PathBuf>,
    pub aux: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    /// Slots to run background removal on once loaded.
    pub matte: Vec<ElementSlot>,
}

impl ElementsConfig {
    pub fn path(&self, slot: ElementSlot) -> Option<&Path> {
        match slot {
            ElementSlot::Background => self.background.as_deref(),
            ElementSlot::Main => self.main.as_deref(),
            ElementSlot::Title => self.title.as_deref(),
            ElementSlot::Aux => self.aux.as_deref(),
            ElementSlot::Logo => self.logo.as_deref(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel export workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(JobConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a job file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<JobConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: JobConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a job file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// validates the result, and resolves relative paths against the file's
/// directory. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<JobConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(base, overlay)?;
    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }
    Ok(config)
}

/// Returns a fully-commented stock job file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# adframe job configuration
# =========================
# All options are optional. Uncomment and change what you need.
# Relative paths are resolved against this file's directory.

# Canvas sizes to export, WIDTHxHEIGHT. Each size picks a layout by its
# shape: portrait (height > 1.2 x width), landscape (width > 1.2 x height)
# or square (everything in between).
sizes = ["1200x630", "1080x1920", "1080x1080"]

# Output format: "png", "jpeg" or "webp" (lossless).
format = "png"

# JPEG quality (1-100). Ignored by png and webp.
quality = 90

# Draw the logo with inverted colors (useful on dark backgrounds).
invert_logo = false

# Drawing order, bottom first. Must list each of the nine layers once.
# The background is always drawn first and is not part of this list.
layer_order = [
    "main", "title-image", "aux", "logo",
    "title", "subtitle", "desc", "note", "date",
]

# ---------------------------------------------------------------------------
# Automatic element sources
# ---------------------------------------------------------------------------
[source]
# A photo to split into background/main/title/aux/logo crops.
# photo = "photo.jpg"

# Object detector output for the photo, a JSON list of
#   {"label": "...", "score": 0.9, "box": {"xmin": 0, "ymin": 0, "xmax": 1, "ymax": 1}}
# with box coordinates as fractions of the image. Without it, a saliency
# heuristic picks the regions.
# detections = "detections.json"

# OCR output, a JSON list of {"text": "...", "confidence": 0-100,
# "height": px, "y": px}. Lines are bucketed by height into
# title/subtitle/desc/note for any text slot not set below.
# ocr = "ocr.json"

# Compose over this image instead of the background slot. The main
# subject layer is left out so it does not cover the artwork.
# external_background = "generated.png"

# ---------------------------------------------------------------------------
# Explicit element images (override automatic crops)
# ---------------------------------------------------------------------------
[elements]
# background = "bg.jpg"
# main = "product.png"
# title = "wordmark.png"
# aux = "badge.png"
# logo = "logo.png"

# Slots whose flat background should be removed after loading.
matte = []

# ---------------------------------------------------------------------------
# Text slots: title, subtitle, desc, note, date
# ---------------------------------------------------------------------------
# [text.title]
# content = "SUMMER SALE"
# weight = "extra-bold"   # 100-900 or thin/light/regular/medium/bold/...
# color = "#FFFFFF"
# shadow = true

# ---------------------------------------------------------------------------
# Per-layer nudges on top of the default layout
# ---------------------------------------------------------------------------
# [layout.logo]
# offset_x = 0.0   # percent of canvas width
# offset_y = 0.0   # percent of canvas height
# scale = 1.0      # image layers only; grows/shrinks about the box center

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel export workers. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4
"##
}
