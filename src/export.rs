//! Multi-size export.
//!
//! One immutable [`Scene`] is rendered once per requested [`TargetSize`] and
//! written next to its siblings:
//!
//! ```text
//! out/
//! ├── promo-1200x630.png
//! ├── promo-1080x1920.png
//! └── promo-1080x1080.png
//! ```
//!
//! ## Parallel Processing
//!
//! Sizes are rendered in parallel on the global rayon pool. Every worker
//! reads the same slots and writes its own canvas, so no locking is needed
//! beyond what the backend itself does. Progress is reported through an
//! optional channel, one [`ExportEvent`] per finished size, in completion
//! order.

use crate::imaging::{BackendError, ImageBackend, OutputFormat, Quality};
use crate::layout::{ComposeError, Composed, Scene, SkippedLayer, compose_scene, compose_scene_over};
use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("composition failed: {0}")]
    Compose(#[from] ComposeError),
    #[error("image backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Requested canvas size, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for TargetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid size '{s}' (expected WIDTHxHEIGHT)"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid size '{s}' (expected WIDTHxHEIGHT)"))
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

impl Serialize for TargetSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetSize {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `<stem>-<w>x<h>.<ext>`
pub fn output_filename(stem: &str, size: TargetSize, format: OutputFormat) -> String {
    format!("{stem}-{size}.{}", format.extension())
}

/// Progress from [`export_sizes`].
#[derive(Debug, Clone)]
pub enum ExportEvent {
    Started { total: usize },
    Rendered {
        size: TargetSize,
        path: PathBuf,
        drawn: usize,
        skipped: Vec<SkippedLayer>,
    },
}

/// What one size produced.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub size: TargetSize,
    pub path: PathBuf,
    pub drawn: usize,
    pub skipped: Vec<SkippedLayer>,
}

/// Everything shared by every size of one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportJob<'a> {
    pub scene: Scene<'a>,
    pub output_dir: &'a Path,
    pub stem: &'a str,
    pub format: OutputFormat,
    pub quality: Quality,
    /// Compose over this image instead of the background slot, without the
    /// main layer.
    pub external_background: Option<&'a RgbaImage>,
}

fn render(job: &ExportJob<'_>, size: TargetSize) -> Result<Composed, ComposeError> {
    match job.external_background {
        Some(bg) => compose_scene_over(&job.scene, bg, size.width, size.height),
        None => compose_scene(&job.scene, size.width, size.height),
    }
}

/// Render and save every size. Stops at the first failing size; files
/// already written stay on disk.
pub fn export_sizes(
    backend: &impl ImageBackend,
    job: &ExportJob<'_>,
    sizes: &[TargetSize],
    events: Option<Sender<ExportEvent>>,
) -> Result<Vec<ExportedFile>, ExportError> {
    std::fs::create_dir_all(job.output_dir)?;
    if let Some(tx) = &events {
        tx.send(ExportEvent::Started { total: sizes.len() }).ok();
    }

    sizes
        .par_iter()
        .map(|&size| -> Result<ExportedFile, ExportError> {
            let composed = render(job, size)?;
            let path = job
                .output_dir
                .join(output_filename(job.stem, size, job.format));
            backend.save(&composed.image, &path, job.quality)?;
            tracing::debug!(%size, path = %path.display(), "exported");

            let file = ExportedFile {
                size,
                path,
                drawn: composed.drawn.len(),
                skipped: composed.skipped,
            };
            if let Some(tx) = &events {
                tx.send(ExportEvent::Rendered {
                    size,
                    path: file.path.clone(),
                    drawn: file.drawn,
                    skipped: file.skipped.clone(),
                })
                .ok();
            }
            Ok(file)
        })
        .collect()
}
