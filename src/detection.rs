//! Object-detector output → element slots.
//!
//! A trained detector reports boxes in normalized `[0, 1]` coordinates. The
//! mapping here turns them into pixel [`Region`]s and assigns one per slot by
//! area and position:
//!
//! | Slot | Pick | Fallback region | Fallback confidence |
//! |---|---|---|---|
//! | main | largest box | none | n/a |
//! | logo | smallest box centered in a corner zone | top-left quarter | 0.4 |
//! | title | largest box centered in the top 35% | top 22% strip | 0.5 |
//! | aux | largest box not picked above | 80% band away from main | 0.35 |
//!
//! Picks are tracked by index into the sorted list, so a fallback region can
//! never alias a real detection during exclusion.
//!
//! With no detections at all, [`extract_elements`] runs the saliency
//! heuristic instead. Either way the background slot receives the full image.

use crate::imaging::{crop_region, extract_heuristic_regions};
use crate::types::{ElementSlot, ElementSlots, Region, ScoredRegion};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BACKGROUND_CONFIDENCE_DETECTED: f32 = 0.95;
pub const BACKGROUND_CONFIDENCE_HEURISTIC: f32 = 0.9;

const LOGO_FALLBACK_CONFIDENCE: f32 = 0.4;
const TITLE_FALLBACK_CONFIDENCE: f32 = 0.5;
const AUX_FALLBACK_CONFIDENCE: f32 = 0.35;

/// Box corners as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

/// One detector result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub score: f32,
    #[serde(rename = "box")]
    pub bbox: NormalizedBox,
}

/// A slot assignment and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledRegion {
    /// Detector label, or a description of the fallback.
    pub label: String,
    #[serde(flatten)]
    pub scored: ScoredRegion,
}

impl LabeledRegion {
    fn new(label: impl Into<String>, region: Region, confidence: f32) -> Self {
        Self {
            label: label.into(),
            scored: ScoredRegion::new(region, confidence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedRegions {
    pub main: LabeledRegion,
    pub logo: LabeledRegion,
    pub title: LabeledRegion,
    pub aux: LabeledRegion,
}

/// Pixel-space view of a detection, used for sorting and zone tests.
struct Placed<'a> {
    detection: &'a Detection,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Placed<'_> {
    fn area(&self) -> f64 {
        self.w * self.h
    }

    fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    fn labeled(&self, width: u32, height: u32) -> LabeledRegion {
        LabeledRegion::new(
            self.detection.label.clone(),
            Region::clamped(self.x, self.y, self.w, self.h, width, height),
            self.detection.score,
        )
    }
}

fn in_corner(cx: f64, cy: f64, w: f64, h: f64) -> bool {
    (cx < w * 0.3 || cx > w * 0.7) && (cy < h * 0.3 || cy > h * 0.7)
}

/// Assign detections to the main/logo/title/aux slots of a `width`×`height`
/// image. `None` when there are no detections.
pub fn map_detections(detections: &[Detection], width: u32, height: u32) -> Option<DetectedRegions> {
    let (w, h) = (width as f64, height as f64);
    let mut placed: Vec<Placed> = detections
        .iter()
        .map(|d| Placed {
            detection: d,
            x: d.bbox.xmin as f64 * w,
            y: d.bbox.ymin as f64 * h,
            w: (d.bbox.xmax - d.bbox.xmin) as f64 * w,
            h: (d.bbox.ymax - d.bbox.ymin) as f64 * h,
        })
        .collect();
    // Stable: equal areas keep detector order
    placed.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let main_idx = 0;
    let main = placed.get(main_idx)?;
    let (_, main_cy) = main.center();

    let logo_idx = (1..placed.len()).rev().find(|&i| {
        let (cx, cy) = placed[i].center();
        in_corner(cx, cy, w, h)
    });
    let title_idx = (1..placed.len()).find(|&i| placed[i].center().1 < h * 0.35);
    let aux_idx = (1..placed.len()).find(|&i| Some(i) != logo_idx && Some(i) != title_idx);

    let logo = match logo_idx {
        Some(i) => placed[i].labeled(width, height),
        None => LabeledRegion::new(
            "logo area",
            Region::clamped(0.0, 0.0, w * 0.25, h * 0.25, width, height),
            LOGO_FALLBACK_CONFIDENCE,
        ),
    };
    let title = match title_idx {
        Some(i) => placed[i].labeled(width, height),
        None => LabeledRegion::new(
            "top strip",
            Region::clamped(0.0, 0.0, w, h * 0.22, width, height),
            TITLE_FALLBACK_CONFIDENCE,
        ),
    };
    let aux = match aux_idx {
        Some(i) => placed[i].labeled(width, height),
        None => {
            let y = if main_cy < h * 0.5 { h * 0.6 } else { 0.0 };
            LabeledRegion::new(
                "aux band",
                Region::clamped(w * 0.1, y, w * 0.8, h * 0.3, width, height),
                AUX_FALLBACK_CONFIDENCE,
            )
        }
    };

    Some(DetectedRegions {
        main: main.labeled(width, height),
        logo,
        title,
        aux,
    })
}

/// Which analysis produced an [`Extraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Detector,
    Heuristic,
}

/// Slots filled from one source image, with the regions they were cut from.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub source: ExtractionSource,
    pub slots: ElementSlots,
    pub regions: BTreeMap<ElementSlot, LabeledRegion>,
}

/// Fill all five element slots from `image`.
///
/// Uses the detector mapping when `detections` is non-empty and the saliency
/// heuristic otherwise. Every slot receives a full-resolution crop.
pub fn extract_elements(image: &RgbaImage, detections: &[Detection]) -> Extraction {
    let (width, height) = image.dimensions();
    let full = Region::clamped(0.0, 0.0, width as f64, height as f64, width, height);

    let (source, background_confidence, picks) = match map_detections(detections, width, height) {
        Some(found) => (
            ExtractionSource::Detector,
            BACKGROUND_CONFIDENCE_DETECTED,
            [
                (ElementSlot::Main, found.main),
                (ElementSlot::Logo, found.logo),
                (ElementSlot::Title, found.title),
                (ElementSlot::Aux, found.aux),
            ],
        ),
        None => {
            let regions = extract_heuristic_regions(image);
            let named = |label: &str, scored: ScoredRegion| LabeledRegion {
                label: label.to_string(),
                scored,
            };
            (
                ExtractionSource::Heuristic,
                BACKGROUND_CONFIDENCE_HEURISTIC,
                [
                    (ElementSlot::Main, named("salient subject", regions.main)),
                    (ElementSlot::Logo, named("detailed corner", regions.logo)),
                    (ElementSlot::Title, named("top strip", regions.title)),
                    (ElementSlot::Aux, named("aux band", regions.aux)),
                ],
            )
        }
    };

    let mut slots = ElementSlots::new();
    let mut regions = BTreeMap::new();
    slots.insert(ElementSlot::Background, crop_region(image, full));
    regions.insert(
        ElementSlot::Background,
        LabeledRegion::new("full image", full, background_confidence),
    );
    for (slot, labeled) in picks {
        slots.insert(slot, crop_region(image, labeled.scored.region));
        regions.insert(slot, labeled);
    }

    tracing::debug!(?source, detections = detections.len(), "extracted element slots");
    Extraction {
        source,
        slots,
        regions,
    }
}
