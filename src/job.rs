//! Turning a [`JobConfig`] into composition inputs.
//!
//! ```text
//! source.photo ──extract──▶ slots ◀── elements.<slot> (explicit files win)
//!                              │
//!                        elements.matte
//!                              ▼
//!                     immutable ElementSlots ──▶ export
//! ```
//!
//! Every matte pass finishes here, before the slots are shared with the
//! export workers.

use crate::config::JobConfig;
use crate::detection::{Detection, Extraction, extract_elements};
use crate::imaging::{BackendError, ImageBackend, MatteStats, remove_background};
use crate::ocr::{OcrLine, bucket_lines};
use crate::types::{ElementSlot, ElementSlots, TextSlots, TextStyle};
use image::RgbaImage;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Imaging error: {0}")]
    Imaging(#[from] BackendError),
}

/// Inputs ready for [`Scene`](crate::layout::Scene).
#[derive(Debug, Clone)]
pub struct Assembled {
    pub slots: ElementSlots,
    pub texts: TextSlots,
    pub external_background: Option<RgbaImage>,
    /// Present when `source.photo` was analyzed.
    pub extraction: Option<Extraction>,
    pub mattes: Vec<(ElementSlot, MatteStats)>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, JobError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a detector output file.
pub fn read_detections(path: &Path) -> Result<Vec<Detection>, JobError> {
    read_json(path)
}

/// Read an OCR output file.
pub fn read_ocr(path: &Path) -> Result<Vec<OcrLine>, JobError> {
    read_json(path)
}

/// Load, extract, and matte everything a job needs.
pub fn assemble_with_backend(
    backend: &impl ImageBackend,
    config: &JobConfig,
) -> Result<Assembled, JobError> {
    let extraction = match &config.source.photo {
        Some(photo) => {
            let image = backend.load(photo)?;
            let detections = match &config.source.detections {
                Some(path) => read_detections(path)?,
                None => Vec::new(),
            };
            Some(extract_elements(&image, &detections))
        }
        None => None,
    };

    let mut slots = extraction
        .as_ref()
        .map(|e| e.slots.clone())
        .unwrap_or_default();
    for slot in ElementSlot::ALL {
        if let Some(path) = config.elements.path(slot) {
            slots.insert(slot, backend.load(path)?);
        }
    }

    let mut mattes = Vec::new();
    for &slot in &config.elements.matte {
        match slots.pixels_mut(slot) {
            Some(pixels) => mattes.push((slot, remove_background(pixels))),
            None => tracing::warn!(%slot, "matte requested for an empty slot"),
        }
    }

    let mut texts = config.text.clone();
    if let Some(path) = &config.source.ocr {
        for (slot, content) in bucket_lines(&read_ocr(path)?) {
            texts.entry(slot).or_insert_with(|| TextStyle::new(content));
        }
    }

    let external_background = config
        .source
        .external_background
        .as_deref()
        .map(|p| backend.load(p))
        .transpose()?;

    Ok(Assembled {
        slots,
        texts,
        external_background,
        extraction,
        mattes,
    })
}
