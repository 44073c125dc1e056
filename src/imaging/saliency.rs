//! Saliency heuristics for locating elements without a trained detector.
//!
//! Each pixel is scored by how far its color sits from the scene's mean color
//! plus a saturation bonus. The brightest part of that map becomes the main
//! subject; the logo, title and auxiliary regions are positional guesses
//! derived from corner texture and from where the main subject sits.
//!
//! ```text
//! score(p) = |rgb(p) - mean_rgb| + 80 * (max - min) / max
//! ```
//!
//! Every entry point accepts any image, including 1×1 and single-color
//! inputs, and always returns four regions inside the source bounds.

use crate::types::{Region, ScoredRegion};
use image::RgbaImage;
use serde::Serialize;

/// Weight of the saturation term in the saliency score.
const SATURATION_WEIGHT: f32 = 80.0;
/// Share of pixels (by score, from the top) that may define the main box.
pub const MAIN_FRACTION: f64 = 0.6;
/// Padding around the main box, as a fraction of the shorter side.
const MAIN_PADDING: f64 = 0.03;
/// Mean score that maps to full confidence before clamping.
const CONFIDENCE_SCALE: f32 = 150.0;
const MAIN_CONFIDENCE_RANGE: (f32, f32) = (0.3, 0.95);

pub const LOGO_CONFIDENCE: f32 = 0.55;
pub const TITLE_CONFIDENCE: f32 = 0.5;
pub const AUX_CONFIDENCE: f32 = 0.4;

/// Per-pixel saliency scores, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SaliencyMap {
    width: u32,
    height: u32,
    scores: Vec<f32>,
}

impl SaliencyMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.scores[y as usize * self.width as usize + x as usize]
    }
}

/// The four heuristic regions for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeuristicRegions {
    pub main: ScoredRegion,
    pub logo: ScoredRegion,
    pub title: ScoredRegion,
    pub aux: ScoredRegion,
}

/// Score every pixel by color distinctiveness and saturation.
pub fn compute_saliency(image: &RgbaImage) -> SaliencyMap {
    let (width, height) = image.dimensions();
    let total = width as usize * height as usize;
    if total == 0 {
        return SaliencyMap {
            width,
            height,
            scores: Vec::new(),
        };
    }

    let mut sums = [0f64; 3];
    for px in image.pixels() {
        for c in 0..3 {
            sums[c] += px.0[c] as f64;
        }
    }
    let mean = sums.map(|s| (s / total as f64) as f32);

    let scores = image
        .pixels()
        .map(|px| {
            let [r, g, b, _] = px.0;
            let dr = r as f32 - mean[0];
            let dg = g as f32 - mean[1];
            let db = b as f32 - mean[2];
            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            let saturation = if max == 0 {
                0.0
            } else {
                (max - min) as f32 / max as f32
            };
            (dr * dr + dg * dg + db * db).sqrt() + saturation * SATURATION_WEIGHT
        })
        .collect();

    SaliencyMap {
        width,
        height,
        scores,
    }
}

/// Padded bounding box of the pixels in the top `fraction` of scores.
///
/// Falls back to the whole image when no box can be formed.
pub fn salient_region(map: &SaliencyMap, fraction: f64) -> Region {
    let (w, h) = (map.width, map.height);
    if map.scores.is_empty() {
        return Region::clamped(0.0, 0.0, w as f64, h as f64, w, h);
    }

    let mut ranked = map.scores.clone();
    let k = ((ranked.len() as f64 * (1.0 - fraction)).floor() as usize).min(ranked.len() - 1);
    let (_, cut, _) = ranked.select_nth_unstable_by(k, |a, b| b.total_cmp(a));
    let cut = *cut;

    let (mut x1, mut y1, mut x2, mut y2) = (u32::MAX, u32::MAX, 0u32, 0u32);
    let mut found = false;
    for y in 0..h {
        let row = &map.scores[y as usize * w as usize..(y as usize + 1) * w as usize];
        for (x, &score) in row.iter().enumerate() {
            if score >= cut {
                let x = x as u32;
                found = true;
                x1 = x1.min(x);
                x2 = x2.max(x);
                y1 = y1.min(y);
                y2 = y2.max(y);
            }
        }
    }
    if !found {
        tracing::debug!("saliency map has no pixel above the cut, using the full image");
        return Region::full(w, h);
    }

    let pad = w.min(h) as f64 * MAIN_PADDING;
    let left = (x1 as f64 - pad).max(0.0);
    let top = (y1 as f64 - pad).max(0.0);
    let right = (x2 as f64 + 1.0 + pad).min(w as f64);
    let bottom = (y2 as f64 + 1.0 + pad).min(h as f64);
    if right - left < 1.0 || bottom - top < 1.0 {
        return Region::full(w, h);
    }
    Region::clamped(left, top, right - left, bottom - top, w, h)
}

/// The 30%×30% corner with the most luminance variance.
///
/// Samples every third pixel. Ties (including all-flat corners) resolve to
/// the top-left corner.
pub fn logo_region(image: &RgbaImage) -> Region {
    let (w, h) = image.dimensions();
    let (wf, hf) = (w as f64, h as f64);
    let (rw, rh) = (wf * 0.3, hf * 0.3);
    let corners = [(0.0, 0.0), (wf * 0.7, 0.0), (0.0, hf * 0.7), (wf * 0.7, hf * 0.7)];

    let mut best = corners[0];
    let mut best_variance = 0.0;
    for corner in corners {
        if let Some(variance) = luminance_variance(image, corner, (rw, rh)) {
            if variance > best_variance {
                best_variance = variance;
                best = corner;
            }
        }
    }
    Region::clamped(best.0, best.1, rw, rh, w, h)
}

fn luminance_variance(image: &RgbaImage, origin: (f64, f64), size: (f64, f64)) -> Option<f64> {
    let (w, h) = image.dimensions();
    let x_end = (origin.0 + size.0).min(w as f64);
    let y_end = (origin.1 + size.1).min(h as f64);

    let (mut sum, mut sum_sq, mut n) = (0f64, 0f64, 0usize);
    let mut y = origin.1.floor() as u32;
    while (y as f64) < y_end {
        let mut x = origin.0.floor() as u32;
        while (x as f64) < x_end {
            let [r, g, b, _] = image.get_pixel(x, y).0;
            let l = r as f64 * 0.299 + g as f64 * 0.587 + b as f64 * 0.114;
            sum += l;
            sum_sq += l * l;
            n += 1;
            x += 3;
        }
        y += 3;
    }
    if n == 0 {
        return None;
    }
    let mean = sum / n as f64;
    Some(sum_sq / n as f64 - mean * mean)
}

/// Strip above the main subject; the top 20% when the subject starts at the top.
pub fn title_region(main: Region, width: u32, height: u32) -> Region {
    let above = (main.y as f64).min(height as f64 * 0.3);
    let strip = if above >= 1.0 {
        above
    } else {
        height as f64 * 0.2
    };
    Region::clamped(0.0, 0.0, width as f64, strip, width, height)
}

/// Band in whichever half of the image the main subject does not dominate.
pub fn aux_region(main: Region, width: u32, height: u32) -> Region {
    let (wf, hf) = (width as f64, height as f64);
    if main.center_y() < hf * 0.5 {
        Region::clamped(wf * 0.1, hf * 0.6, wf * 0.8, hf * 0.35, width, height)
    } else {
        Region::clamped(wf * 0.1, hf * 0.05, wf * 0.8, hf * 0.3, width, height)
    }
}

/// Mean score inside `region` (stride 2) mapped to `[0.3, 0.95]`.
pub fn main_confidence(map: &SaliencyMap, region: Region) -> f32 {
    let (lo, hi) = MAIN_CONFIDENCE_RANGE;
    let (mut sum, mut n) = (0f64, 0usize);
    for y in (region.y..region.bottom().min(map.height)).step_by(2) {
        for x in (region.x..region.right().min(map.width)).step_by(2) {
            sum += map.get(x, y) as f64;
            n += 1;
        }
    }
    if n == 0 {
        return lo;
    }
    let mean = (sum / n as f64) as f32;
    (mean / CONFIDENCE_SCALE).clamp(lo, hi)
}

/// Locate main, logo, title and aux regions from pixel statistics alone.
pub fn extract_heuristic_regions(image: &RgbaImage) -> HeuristicRegions {
    let (w, h) = image.dimensions();
    let map = compute_saliency(image);
    let main = salient_region(&map, MAIN_FRACTION);
    let main_conf = main_confidence(&map, main);
    tracing::debug!(?main, confidence = main_conf, "saliency main region");

    HeuristicRegions {
        main: ScoredRegion::new(main, main_conf),
        logo: ScoredRegion::new(logo_region(image), LOGO_CONFIDENCE),
        title: ScoredRegion::new(title_region(main, w, h), TITLE_CONFIDENCE),
        aux: ScoredRegion::new(aux_region(main, w, h), AUX_CONFIDENCE),
    }
}
