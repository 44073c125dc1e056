//! Shared types used by the analyzer, the matte, the composer, and the CLI.
//!
//! These are the nouns of the crate: pixel-space [`Region`]s with a
//! [`Confidence`], the five [`ElementSlot`]s and five [`TextSlot`]s a
//! composition is built from, the nine [`LayerId`]s and their validated
//! drawing [`LayerOrder`], and the per-layer [`LayoutParams`] nudges.
//!
//! The detector mapping in [`detection`](crate::detection) and the saliency
//! analyzer in [`imaging::saliency`](crate::imaging::saliency) both produce
//! [`ScoredRegion`]s, so slot extraction never cares which one ran.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Regions
// =============================================================================

/// Axis-aligned box in source-pixel coordinates.
///
/// Regions built through [`Region::clamped`] always satisfy `w, h >= 1` and
/// `x + w <= source_width`, `y + h <= source_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// The whole source image.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Round a fractional box to whole pixels and clamp it inside the source.
    ///
    /// Origin is rounded and clamped to the last row/column; size is rounded,
    /// raised to 1 and cut back so the box never leaves the image. A source
    /// with a zero dimension still yields a 1-pixel extent on that axis.
    pub fn clamped(x: f64, y: f64, w: f64, h: f64, source_width: u32, source_height: u32) -> Self {
        let (x, w) = clamp_axis(x, w, source_width);
        let (y, h) = clamp_axis(y, h, source_height);
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Vertical center in source pixels.
    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.h as f64 / 2.0
    }

    /// True when the region lies entirely inside a `width`×`height` source.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

fn clamp_axis(start: f64, len: f64, limit: u32) -> (u32, u32) {
    let limit = limit.max(1);
    let start = if start.is_finite() { start.round() } else { 0.0 };
    let start = (start.max(0.0) as u32).min(limit - 1);
    let len = if len.is_finite() { len.round() } else { 0.0 };
    let len = (len.max(1.0) as u32).min(limit - start).max(1);
    (start, len)
}

/// Score in `[0, 1]`; clamped on construction, NaN becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f32);

impl Confidence {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Whole-number percentage, as shown next to extracted thumbnails.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

/// A region together with how sure the producer is about it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRegion {
    pub region: Region,
    pub confidence: Confidence,
}

impl ScoredRegion {
    pub fn new(region: Region, confidence: f32) -> Self {
        Self {
            region,
            confidence: Confidence::new(confidence),
        }
    }
}

// =============================================================================
// Slots and layers
// =============================================================================

/// A visual placement in the final composition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ElementSlot {
    Background,
    Main,
    Title,
    Aux,
    Logo,
}

impl ElementSlot {
    pub const ALL: [ElementSlot; 5] = [
        ElementSlot::Background,
        ElementSlot::Main,
        ElementSlot::Title,
        ElementSlot::Aux,
        ElementSlot::Logo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementSlot::Background => "background",
            ElementSlot::Main => "main",
            ElementSlot::Title => "title",
            ElementSlot::Aux => "aux",
            ElementSlot::Logo => "logo",
        }
    }
}

impl fmt::Display for ElementSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A text placement in the final composition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TextSlot {
    Title,
    Subtitle,
    Desc,
    Note,
    Date,
}

impl TextSlot {
    pub const ALL: [TextSlot; 5] = [
        TextSlot::Title,
        TextSlot::Subtitle,
        TextSlot::Desc,
        TextSlot::Note,
        TextSlot::Date,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextSlot::Title => "title",
            TextSlot::Subtitle => "subtitle",
            TextSlot::Desc => "desc",
            TextSlot::Note => "note",
            TextSlot::Date => "date",
        }
    }
}

/// One of the nine orderable layers. Background is not a layer: it is always
/// painted first, outside any [`LayerOrder`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LayerId {
    Main,
    TitleImage,
    Aux,
    Logo,
    Title,
    Subtitle,
    Desc,
    Note,
    Date,
}

/// What a layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Image(ElementSlot),
    Text(TextSlot),
}

impl LayerId {
    pub const ALL: [LayerId; 9] = [
        LayerId::Main,
        LayerId::TitleImage,
        LayerId::Aux,
        LayerId::Logo,
        LayerId::Title,
        LayerId::Subtitle,
        LayerId::Desc,
        LayerId::Note,
        LayerId::Date,
    ];

    pub fn kind(self) -> LayerKind {
        match self {
            LayerId::Main => LayerKind::Image(ElementSlot::Main),
            LayerId::TitleImage => LayerKind::Image(ElementSlot::Title),
            LayerId::Aux => LayerKind::Image(ElementSlot::Aux),
            LayerId::Logo => LayerKind::Image(ElementSlot::Logo),
            LayerId::Title => LayerKind::Text(TextSlot::Title),
            LayerId::Subtitle => LayerKind::Text(TextSlot::Subtitle),
            LayerId::Desc => LayerKind::Text(TextSlot::Desc),
            LayerId::Note => LayerKind::Text(TextSlot::Note),
            LayerId::Date => LayerKind::Text(TextSlot::Date),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayerId::Main => "main",
            LayerId::TitleImage => "title-image",
            LayerId::Aux => "aux",
            LayerId::Logo => "logo",
            LayerId::Title => "title",
            LayerId::Subtitle => "subtitle",
            LayerId::Desc => "desc",
            LayerId::Note => "note",
            LayerId::Date => "date",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerId {
    type Err = LayerOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| LayerOrderError::Unknown(s.to_string()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerOrderError {
    #[error("layer '{0}' appears more than once")]
    Duplicate(LayerId),
    #[error("layer '{0}' is missing from the order")]
    Missing(LayerId),
    #[error("unknown layer id '{0}'")]
    Unknown(String),
}

/// Drawing order of the nine layers, first drawn first (bottom-most).
///
/// Always a permutation of [`LayerId::ALL`]: construction rejects duplicates
/// and omissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayerId>", into = "Vec<LayerId>")]
pub struct LayerOrder(Vec<LayerId>);

impl LayerOrder {
    pub fn new(ids: Vec<LayerId>) -> Result<Self, LayerOrderError> {
        let mut seen = [false; LayerId::ALL.len()];
        for &id in &ids {
            let slot = &mut seen[id as usize];
            if *slot {
                return Err(LayerOrderError::Duplicate(id));
            }
            *slot = true;
        }
        if let Some(missing) = LayerId::ALL.into_iter().find(|id| !seen[*id as usize]) {
            return Err(LayerOrderError::Missing(missing));
        }
        Ok(Self(ids))
    }

    pub fn iter(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[LayerId] {
        &self.0
    }

    /// Move a layer one step towards the top (drawn later). No-op at the end.
    pub fn raise(&mut self, id: LayerId) {
        if let Some(pos) = self.0.iter().position(|&l| l == id) {
            if pos + 1 < self.0.len() {
                self.0.swap(pos, pos + 1);
            }
        }
    }

    /// Move a layer one step towards the bottom (drawn earlier). No-op at the start.
    pub fn lower(&mut self, id: LayerId) {
        if let Some(pos) = self.0.iter().position(|&l| l == id) {
            if pos > 0 {
                self.0.swap(pos, pos - 1);
            }
        }
    }
}

impl Default for LayerOrder {
    fn default() -> Self {
        Self(LayerId::ALL.to_vec())
    }
}

impl TryFrom<Vec<LayerId>> for LayerOrder {
    type Error = LayerOrderError;

    fn try_from(ids: Vec<LayerId>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}

impl From<LayerOrder> for Vec<LayerId> {
    fn from(order: LayerOrder) -> Self {
        order.0
    }
}

/// User nudges applied on top of a layer's default anchor.
///
/// Offsets are percentages of the canvas width/height; `scale` shrinks or
/// grows the anchor box about its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutParams {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl LayoutParams {
    pub const fn scaled(scale: f32) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale,
        }
    }

    /// Scale with the zero/NaN guard the layout math relies on.
    pub fn effective_scale(&self) -> f32 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::scaled(1.0)
    }
}

pub type LayoutMap = BTreeMap<LayerId, LayoutParams>;

// =============================================================================
// Text styling
// =============================================================================

/// Opaque sRGB color, written `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}' (expected #RRGGBB or #RGB)")]
pub struct ColorParseError(pub String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16);
        match hex.len() {
            6 => Ok(Color([
                channel(0, 2).map_err(|_| err())?,
                channel(2, 2).map_err(|_| err())?,
                channel(4, 2).map_err(|_| err())?,
            ])),
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in out.iter_mut().enumerate() {
                    let v = channel(i, 1).map_err(|_| err())?;
                    *c = v * 17;
                }
                Ok(Color(out))
            }
            _ => Err(err()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// CSS-style font weight, 100 (thin) to 900 (black).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "WeightRepr", into = "u16")]
pub struct FontWeight(u16);

impl FontWeight {
    pub const REGULAR: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);

    /// Rounds to the nearest hundred inside 100..=900.
    pub fn new(value: u16) -> Self {
        let rounded = ((value as u32 + 50) / 100 * 100) as u16;
        Self(rounded.clamp(100, 900))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl From<FontWeight> for u16 {
    fn from(w: FontWeight) -> Self {
        w.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeightRepr {
    Number(u16),
    Name(String),
}

impl TryFrom<WeightRepr> for FontWeight {
    type Error = String;

    fn try_from(repr: WeightRepr) -> Result<Self, Self::Error> {
        match repr {
            WeightRepr::Number(n) => Ok(FontWeight::new(n)),
            WeightRepr::Name(name) => name.parse(),
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s.to_ascii_lowercase().as_str() {
            "thin" => 100,
            "light" => 300,
            "normal" | "regular" => 400,
            "medium" => 500,
            "semibold" | "semi-bold" => 600,
            "bold" => 700,
            "extrabold" | "extra-bold" => 800,
            "black" => 900,
            other => other
                .parse::<u16>()
                .map_err(|_| format!("invalid font weight '{s}'"))?,
        };
        Ok(FontWeight::new(value))
    }
}

/// Content and styling for one text slot. Empty content renders nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    pub content: String,
    /// `None` uses the slot's default weight.
    pub weight: Option<FontWeight>,
    pub color: Color,
    pub shadow: bool,
}

impl TextStyle {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_shadow(mut self) -> Self {
        self.shadow = true;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: String::new(),
            weight: None,
            color: Color::WHITE,
            shadow: false,
        }
    }
}

pub type TextSlots = BTreeMap<TextSlot, TextStyle>;

// =============================================================================
// Element slots
// =============================================================================

/// What a host placed into an element slot.
///
/// `Encoded` holds undecoded file bytes; they are decoded per composition and
/// a decode failure only drops that one layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotImage {
    Pixels(RgbaImage),
    Encoded(Vec<u8>),
}

/// Immutable snapshot of the element buffers a composition reads.
///
/// Each slot owns at most one image; inserting replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSlots {
    slots: BTreeMap<ElementSlot, SlotImage>,
}

impl ElementSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pixels in a slot, returning whatever was there before.
    pub fn insert(&mut self, slot: ElementSlot, image: RgbaImage) -> Option<SlotImage> {
        self.slots.insert(slot, SlotImage::Pixels(image))
    }

    pub fn insert_encoded(&mut self, slot: ElementSlot, bytes: Vec<u8>) -> Option<SlotImage> {
        self.slots.insert(slot, SlotImage::Encoded(bytes))
    }

    pub fn with(mut self, slot: ElementSlot, image: RgbaImage) -> Self {
        self.insert(slot, image);
        self
    }

    pub fn clear(&mut self, slot: ElementSlot) -> Option<SlotImage> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: ElementSlot) -> Option<&SlotImage> {
        self.slots.get(&slot)
    }

    /// Decoded pixels for a slot, if it holds pixels rather than bytes.
    pub fn pixels(&self, slot: ElementSlot) -> Option<&RgbaImage> {
        match self.slots.get(&slot) {
            Some(SlotImage::Pixels(img)) => Some(img),
            _ => None,
        }
    }

    pub fn pixels_mut(&mut self, slot: ElementSlot) -> Option<&mut RgbaImage> {
        match self.slots.get_mut(&slot) {
            Some(SlotImage::Pixels(img)) => Some(img),
            _ => None,
        }
    }

    pub fn contains(&self, slot: ElementSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn populated(&self) -> impl Iterator<Item = ElementSlot> + '_ {
        self.slots.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The same snapshot without the listed slots.
    pub fn without(&self, excluded: &[ElementSlot]) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .filter(|(slot, _)| !excluded.contains(slot))
                .map(|(slot, img)| (*slot, img.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Region
    // =========================================================================

    #[test]
    fn clamped_region_stays_inside_source() {
        let r = Region::clamped(-10.0, 5.4, 500.0, 20.6, 100, 50);
        assert_eq!(r, Region::new(0, 5, 100, 21));
        assert!(r.fits_within(100, 50));
    }

    #[test]
    fn clamped_region_has_at_least_one_pixel() {
        let r = Region::clamped(99.7, 49.9, 0.0, 0.2, 100, 50);
        assert_eq!(r, Region::new(99, 49, 1, 1));
    }

    #[test]
    fn clamped_region_handles_nan() {
        let r = Region::clamped(f64::NAN, 0.0, f64::INFINITY, 3.0, 10, 10);
        assert_eq!(r, Region::new(0, 0, 1, 3));
    }

    #[test]
    fn confidence_clamps() {
        assert_eq!(Confidence::new(1.7).value(), 1.0);
        assert_eq!(Confidence::new(-0.2).value(), 0.0);
        assert_eq!(Confidence::new(f32::NAN).value(), 0.0);
        assert_eq!(Confidence::new(0.555).percent(), 56);
    }

    // =========================================================================
    // LayerOrder
    // =========================================================================

    #[test]
    fn default_order_is_a_permutation() {
        let order = LayerOrder::default();
        assert!(LayerOrder::new(order.as_slice().to_vec()).is_ok());
        assert_eq!(order.as_slice()[0], LayerId::Main);
        assert_eq!(order.as_slice()[8], LayerId::Date);
    }

    #[test]
    fn order_rejects_duplicates() {
        let mut ids = LayerId::ALL.to_vec();
        ids[1] = LayerId::Main;
        assert_eq!(
            LayerOrder::new(ids),
            Err(LayerOrderError::Duplicate(LayerId::Main))
        );
    }

    #[test]
    fn order_rejects_omissions() {
        let ids = LayerId::ALL[..8].to_vec();
        assert_eq!(
            LayerOrder::new(ids),
            Err(LayerOrderError::Missing(LayerId::Date))
        );
    }

    #[test]
    fn raise_and_lower_swap_neighbours() {
        let mut order = LayerOrder::default();
        order.raise(LayerId::Main);
        assert_eq!(&order.as_slice()[..2], &[LayerId::TitleImage, LayerId::Main]);
        order.lower(LayerId::Main);
        assert_eq!(order, LayerOrder::default());
        order.lower(LayerId::Main);
        assert_eq!(order, LayerOrder::default());
    }

    #[test]
    fn layer_ids_parse_from_names() {
        for id in LayerId::ALL {
            assert_eq!(id.name().parse::<LayerId>().unwrap(), id);
        }
        assert!("thumbMain".parse::<LayerId>().is_err());
    }

    #[test]
    fn layer_order_deserializes_and_validates() {
        let ok: LayerOrder = serde_json::from_str(
            r#"["date","note","desc","subtitle","title","logo","aux","title-image","main"]"#,
        )
        .unwrap();
        assert_eq!(ok.as_slice()[0], LayerId::Date);

        let bad = serde_json::from_str::<LayerOrder>(r#"["main","main"]"#);
        assert!(bad.is_err());
    }

    // =========================================================================
    // Styling
    // =========================================================================

    #[test]
    fn color_parses_long_and_short_hex() {
        assert_eq!("#1a1A2e".parse::<Color>().unwrap(), Color([0x1a, 0x1a, 0x2e]));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert!("1a1a2e".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert_eq!(Color([0x1a, 0x1a, 0x2e]).to_hex(), "#1A1A2E");
    }

    #[test]
    fn font_weight_rounds_and_parses_names() {
        assert_eq!(FontWeight::new(750).value(), 800);
        assert_eq!(FontWeight::new(20).value(), 100);
        assert_eq!(FontWeight::new(1200).value(), 900);
        assert_eq!("bold".parse::<FontWeight>().unwrap(), FontWeight::BOLD);
        assert_eq!("600".parse::<FontWeight>().unwrap().value(), 600);
        assert!("heavy-ish".parse::<FontWeight>().is_err());
    }

    #[test]
    fn text_style_blank_is_empty() {
        assert!(TextStyle::new("   ").is_empty());
        assert!(!TextStyle::new("SALE").is_empty());
    }

    // =========================================================================
    // ElementSlots
    // =========================================================================

    #[test]
    fn inserting_replaces_previous_owner() {
        let mut slots = ElementSlots::new();
        assert!(slots.insert(ElementSlot::Logo, RgbaImage::new(2, 2)).is_none());
        let previous = slots.insert(ElementSlot::Logo, RgbaImage::new(3, 3));
        assert!(matches!(previous, Some(SlotImage::Pixels(img)) if img.width() == 2));
        assert_eq!(slots.pixels(ElementSlot::Logo).unwrap().width(), 3);
    }

    #[test]
    fn without_drops_only_listed_slots() {
        let slots = ElementSlots::new()
            .with(ElementSlot::Background, RgbaImage::new(1, 1))
            .with(ElementSlot::Main, RgbaImage::new(1, 1))
            .with(ElementSlot::Logo, RgbaImage::new(1, 1));
        let trimmed = slots.without(&[ElementSlot::Background, ElementSlot::Main]);
        assert_eq!(trimmed.populated().collect::<Vec<_>>(), vec![ElementSlot::Logo]);
        assert_eq!(slots.populated().count(), 3);
    }
}
