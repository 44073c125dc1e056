//! OCR lines → text slots.
//!
//! Box height stands in for font size. Lines are ranked by height and split
//! into title / subtitle / desc / note by where they fall between the
//! smallest and largest line:
//!
//! ```text
//! ratio = (height - min) / (max - min)
//!   > 0.70  title
//!   > 0.40  subtitle
//!   > 0.15  desc
//!   else    note
//! ```
//!
//! One surviving line is always the title; two are title and subtitle.
//! Each bucket is read top to bottom and joined with all whitespace removed,
//! which suits CJK copy where OCR inserts spurious spaces.

use crate::types::{TextSlot, TextStyle, TextSlots};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lines at or below this confidence are dropped.
pub const MIN_CONFIDENCE: f32 = 30.0;

/// One recognized line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    /// Recognizer confidence, 0–100.
    pub confidence: f32,
    /// Bounding box height in source pixels.
    pub height: f32,
    /// Top of the bounding box in source pixels.
    pub y: f32,
}

fn bucket_for(ratio: f32) -> TextSlot {
    if ratio > 0.7 {
        TextSlot::Title
    } else if ratio > 0.4 {
        TextSlot::Subtitle
    } else if ratio > 0.15 {
        TextSlot::Desc
    } else {
        TextSlot::Note
    }
}

/// Bucket OCR lines into text slot contents. Slots with no lines are absent.
pub fn bucket_lines(lines: &[OcrLine]) -> BTreeMap<TextSlot, String> {
    let mut kept: Vec<&OcrLine> = lines
        .iter()
        .filter(|l| !l.text.trim().is_empty() && l.confidence > MIN_CONFIDENCE)
        .collect();
    kept.sort_by(|a, b| b.height.total_cmp(&a.height));

    let mut buckets: BTreeMap<TextSlot, Vec<&OcrLine>> = BTreeMap::new();
    match kept.as_slice() {
        [] => {}
        [only] => buckets.entry(TextSlot::Title).or_default().push(*only),
        [first, second] => {
            buckets.entry(TextSlot::Title).or_default().push(*first);
            buckets.entry(TextSlot::Subtitle).or_default().push(*second);
        }
        _ => {
            let max = kept.iter().map(|l| l.height).fold(f32::MIN, f32::max);
            let min = kept.iter().map(|l| l.height).fold(f32::MAX, f32::min);
            let range = if max - min == 0.0 { 1.0 } else { max - min };
            for line in &kept {
                let slot = bucket_for((line.height - min) / range);
                buckets.entry(slot).or_default().push(*line);
            }
        }
    }

    buckets
        .into_iter()
        .map(|(slot, mut group)| {
            group.sort_by(|a, b| a.y.total_cmp(&b.y));
            let joined: String = group
                .iter()
                .flat_map(|l| l.text.chars().filter(|c| !c.is_whitespace()))
                .collect();
            (slot, joined)
        })
        .collect()
}

/// [`bucket_lines`] as default-styled [`TextSlots`].
pub fn text_slots_from_lines(lines: &[OcrLine]) -> TextSlots {
    bucket_lines(lines)
        .into_iter()
        .map(|(slot, content)| (slot, TextStyle::new(content)))
        .collect()
}
