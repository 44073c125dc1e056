//! Type scale and text placement.
//!
//! Font sizes follow a golden-ratio modular scale anchored at 2.8% of the
//! canvas's shorter side, so the hierarchy is identical at every export
//! size:
//!
//! ```text
//! note     b
//! date     b·φ·0.8
//! desc     b·φ
//! subtitle b·φ²
//! title    b·φ³
//! ```
//!
//! Vertical positions are baselines. On landscape and square canvases the
//! whole cluster moves down by 10% of the height.

use super::aspect::AspectClass;
use crate::types::{FontWeight, LayoutParams, TextSlot};

pub const PHI: f64 = 1.618;
/// Base size as a fraction of the canvas's shorter side.
pub const BASE_RATIO: f64 = 0.028;
/// Title baseline as a fraction of the canvas height, before the shift.
pub const TITLE_LINE: f64 = 0.28;
/// Text is clipped to this share of the canvas width.
pub const MAX_TEXT_WIDTH: f64 = 0.85;
/// Distance of the note baseline from the bottom edge, in pixels.
pub const NOTE_BOTTOM_MARGIN: f64 = 60.0;

/// Pixel font sizes for one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizes {
    pub note: u32,
    pub date: u32,
    pub desc: u32,
    pub subtitle: u32,
    pub title: u32,
}

impl FontSizes {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let b = width.min(height) as f64 * BASE_RATIO;
        let px = |v: f64| v.round() as u32;
        Self {
            note: px(b),
            date: px(b * PHI * 0.8),
            desc: px(b * PHI),
            subtitle: px(b * PHI * PHI),
            title: px(b * PHI * PHI * PHI),
        }
    }

    pub fn get(&self, slot: TextSlot) -> u32 {
        match slot {
            TextSlot::Title => self.title,
            TextSlot::Subtitle => self.subtitle,
            TextSlot::Desc => self.desc,
            TextSlot::Note => self.note,
            TextSlot::Date => self.date,
        }
    }
}

pub fn default_weight(slot: TextSlot) -> FontWeight {
    match slot {
        TextSlot::Title => FontWeight::EXTRA_BOLD,
        TextSlot::Subtitle | TextSlot::Date => FontWeight::BOLD,
        TextSlot::Desc | TextSlot::Note => FontWeight::REGULAR,
    }
}

/// Shadow blur radius in pixels; larger roles cast softer shadows.
pub fn shadow_blur(slot: TextSlot) -> f64 {
    match slot {
        TextSlot::Title => 12.0,
        TextSlot::Subtitle => 10.0,
        TextSlot::Desc => 6.0,
        TextSlot::Note => 3.0,
        TextSlot::Date => 4.0,
    }
}

/// Downward shift of the text cluster: none for portrait.
pub fn text_shift(class: AspectClass, height: u32) -> f64 {
    if class.is_portrait() {
        0.0
    } else {
        height as f64 * 0.10
    }
}

/// Where one text slot is drawn: centered on `center_x` with its baseline at
/// `baseline`, clipped horizontally to `max_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub center_x: f64,
    pub baseline: f64,
    pub size: u32,
    pub max_width: f64,
}

/// Position of a text slot on a `width`×`height` canvas, including the
/// layer's offsets (percent of canvas width/height). Text ignores `scale`.
pub fn text_placement(
    slot: TextSlot,
    width: u32,
    height: u32,
    params: &LayoutParams,
) -> TextPlacement {
    let class = AspectClass::of(width, height);
    let sizes = FontSizes::for_canvas(width, height);
    let (w, h) = (width as f64, height as f64);
    let shift = text_shift(class, height);

    let title_line = h * TITLE_LINE + shift;
    let subtitle_line = title_line + sizes.title as f64 * 1.3;
    let baseline = match slot {
        TextSlot::Title => title_line,
        TextSlot::Subtitle => subtitle_line,
        TextSlot::Desc => {
            if class.is_portrait() {
                h * 0.40
            } else {
                subtitle_line + sizes.subtitle as f64 + h * 0.10
            }
        }
        TextSlot::Note => h - NOTE_BOTTOM_MARGIN,
        TextSlot::Date => {
            let lift = if class.is_portrait() { 0.0 } else { h * 0.05 };
            title_line - h * 0.10 - lift
        }
    };

    TextPlacement {
        center_x: w / 2.0 + w * params.offset_x as f64 / 100.0,
        baseline: baseline + h * params.offset_y as f64 / 100.0,
        size: sizes.get(slot),
        max_width: w * MAX_TEXT_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Type scale
    // =========================================================================

    #[test]
    fn sizes_for_1200x630() {
        // b = 630 * 0.028 = 17.64
        let s = FontSizes::for_canvas(1200, 630);
        assert_eq!(s.note, 18);
        assert_eq!(s.date, 23); // 22.83
        assert_eq!(s.desc, 29); // 28.54
        assert_eq!(s.subtitle, 46); // 46.18
        assert_eq!(s.title, 75); // 74.72
    }

    #[test]
    fn hierarchy_is_strict_at_common_sizes() {
        for (w, h) in [(1080, 1920), (1200, 630), (1080, 1080), (1920, 1080)] {
            let s = FontSizes::for_canvas(w, h);
            assert!(s.note < s.date && s.date < s.desc);
            assert!(s.desc < s.subtitle && s.subtitle < s.title);
        }
    }

    #[test]
    fn default_weights() {
        assert_eq!(default_weight(TextSlot::Title).value(), 800);
        assert_eq!(default_weight(TextSlot::Subtitle).value(), 700);
        assert_eq!(default_weight(TextSlot::Desc).value(), 400);
        assert_eq!(default_weight(TextSlot::Note).value(), 400);
        assert_eq!(default_weight(TextSlot::Date).value(), 700);
    }

    // =========================================================================
    // Placement
    // =========================================================================

    #[test]
    fn landscape_title_is_shifted_down() {
        let p = text_placement(TextSlot::Title, 1200, 630, &LayoutParams::default());
        assert!((p.baseline - (630.0 * 0.28 + 63.0)).abs() < 1e-9);
        assert_eq!(p.center_x, 600.0);
        assert_eq!(p.max_width, 1020.0);
        assert_eq!(p.size, 75);
    }

    #[test]
    fn portrait_title_is_not_shifted() {
        let p = text_placement(TextSlot::Title, 1080, 1920, &LayoutParams::default());
        assert!((p.baseline - 1920.0 * 0.28).abs() < 1e-9);
    }

    #[test]
    fn subtitle_and_desc_follow_the_title() {
        let d = LayoutParams::default();
        let title = text_placement(TextSlot::Title, 1000, 1000, &d);
        let sub = text_placement(TextSlot::Subtitle, 1000, 1000, &d);
        let desc = text_placement(TextSlot::Desc, 1000, 1000, &d);
        let sizes = FontSizes::for_canvas(1000, 1000);
        assert!((sub.baseline - (title.baseline + sizes.title as f64 * 1.3)).abs() < 1e-9);
        assert!((desc.baseline - (sub.baseline + sizes.subtitle as f64 + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn portrait_desc_is_fixed() {
        let p = text_placement(TextSlot::Desc, 1080, 1920, &LayoutParams::default());
        assert!((p.baseline - 768.0).abs() < 1e-9);
    }

    #[test]
    fn note_hugs_the_bottom_and_date_sits_above_title() {
        let d = LayoutParams::default();
        assert_eq!(text_placement(TextSlot::Note, 1000, 800, &d).baseline, 740.0);
        let date = text_placement(TextSlot::Date, 1000, 1000, &d);
        let title = text_placement(TextSlot::Title, 1000, 1000, &d);
        assert!((title.baseline - date.baseline - 150.0).abs() < 1e-9);
    }

    #[test]
    fn offsets_move_text_by_canvas_percent() {
        let params = LayoutParams {
            offset_x: -10.0,
            offset_y: 5.0,
            scale: 3.0,
        };
        let base = text_placement(TextSlot::Note, 1000, 500, &LayoutParams::default());
        let moved = text_placement(TextSlot::Note, 1000, 500, &params);
        assert_eq!(moved.center_x, 400.0);
        assert!((moved.baseline - base.baseline - 25.0).abs() < 1e-9);
        assert_eq!(moved.size, base.size);
    }
}
