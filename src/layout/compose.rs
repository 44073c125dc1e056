//! The layer-composition loop.
//!
//! One call paints one canvas:
//!
//! ```text
//! background (slot cover-blit, external image, or gradient)
//!   → for id in LayerOrder: image layer (anchor box + fit) | text layer (baseline)
//! ```
//!
//! Composition reads an immutable [`ElementSlots`] snapshot and allocates a
//! fresh canvas, so repeated calls with the same inputs are pixel-identical
//! and independent sizes can render in parallel. Only zero-sized targets
//! fail; a broken or empty element drops that one layer with a warning and
//! the rest of the canvas still renders.

use super::anchors::{Fit, placement};
use super::text::{self, Clip};
use super::typography::{default_weight, shadow_blur, text_placement};
use crate::imaging::raster::{BlitError, draw_contain, draw_cover, fill_diagonal_gradient, invert_rgb};
use crate::imaging::{Rect, decode_bytes};
use crate::types::{
    Color, ElementSlot, ElementSlots, LayerId, LayerKind, LayerOrder, LayoutMap, LayoutParams,
    SlotImage, TextSlot, TextSlots, TextStyle,
};
use image::RgbaImage;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

/// Fallback background gradient, top-left to bottom-right.
pub const GRADIENT_FROM: Color = Color([0x1a, 0x1a, 0x2e]);
pub const GRADIENT_TO: Color = Color([0x16, 0x21, 0x3e]);

/// Main-layer scale used when composing over an external background.
pub const EXTERNAL_MAIN_SCALE: f32 = 0.6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Why a single layer was left out of a composition.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LayerError {
    #[error("corrupt buffer: {0}")]
    CorruptBuffer(String),
    #[error("layer has no drawable area")]
    DegenerateLayer,
}

impl From<BlitError> for LayerError {
    fn from(_: BlitError) -> Self {
        LayerError::DegenerateLayer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLayer {
    pub layer: LayerId,
    pub error: LayerError,
}

/// What ended up under the layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundFill {
    /// The background slot, cover-blitted full bleed.
    Slot,
    /// A caller-supplied image, cover-blitted full bleed.
    External,
    /// The fallback gradient.
    Gradient,
}

/// A finished canvas plus a record of what went into it.
#[derive(Debug, Clone)]
pub struct Composed {
    pub image: RgbaImage,
    pub background: BackgroundFill,
    /// Layers painted, in painting order.
    pub drawn: Vec<LayerId>,
    pub skipped: Vec<SkippedLayer>,
}

/// Everything a composition reads besides the target size.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub slots: &'a ElementSlots,
    pub texts: &'a TextSlots,
    pub order: &'a LayerOrder,
    pub layout: Option<&'a LayoutMap>,
    /// Draw the logo with its colors inverted.
    pub invert_logo: bool,
}

impl<'a> Scene<'a> {
    pub fn new(slots: &'a ElementSlots, texts: &'a TextSlots, order: &'a LayerOrder) -> Self {
        Self {
            slots,
            texts,
            order,
            layout: None,
            invert_logo: false,
        }
    }

    pub fn with_layout(mut self, layout: &'a LayoutMap) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_inverted_logo(mut self, invert: bool) -> Self {
        self.invert_logo = invert;
        self
    }
}

enum Backdrop<'a> {
    FromSlot,
    External(&'a RgbaImage),
}

/// Compose a `width`×`height` canvas.
pub fn compose(
    width: u32,
    height: u32,
    slots: &ElementSlots,
    texts: &TextSlots,
    order: &LayerOrder,
    layout: Option<&LayoutMap>,
) -> Result<RgbaImage, ComposeError> {
    let mut scene = Scene::new(slots, texts, order);
    scene.layout = layout;
    compose_scene(&scene, width, height).map(|c| c.image)
}

/// Compose over an externally supplied background (e.g. generated artwork).
///
/// The background and main slots never participate, and the main layer's
/// scale is pinned to [`EXTERNAL_MAIN_SCALE`].
pub fn compose_over_external_background(
    background: &RgbaImage,
    width: u32,
    height: u32,
    slots: &ElementSlots,
    texts: &TextSlots,
    order: &LayerOrder,
) -> Result<RgbaImage, ComposeError> {
    let scene = Scene::new(slots, texts, order);
    compose_scene_over(&scene, background, width, height).map(|c| c.image)
}

/// [`compose`] with a report of drawn and skipped layers.
pub fn compose_scene(scene: &Scene<'_>, width: u32, height: u32) -> Result<Composed, ComposeError> {
    let layout = scene.layout.cloned().unwrap_or_default();
    render(scene, width, height, Backdrop::FromSlot, &[], &layout)
}

/// [`compose_over_external_background`] with a report.
pub fn compose_scene_over(
    scene: &Scene<'_>,
    background: &RgbaImage,
    width: u32,
    height: u32,
) -> Result<Composed, ComposeError> {
    let layout = ai_background_layout(scene.layout);
    render(
        scene,
        width,
        height,
        Backdrop::External(background),
        &[ElementSlot::Background, ElementSlot::Main],
        &layout,
    )
}

/// Layout used over an external background: the caller's nudges, with the
/// main layer's scale forced to [`EXTERNAL_MAIN_SCALE`].
pub fn ai_background_layout(base: Option<&LayoutMap>) -> LayoutMap {
    let mut layout = base.cloned().unwrap_or_default();
    let main = layout
        .entry(LayerId::Main)
        .or_insert_with(LayoutParams::default);
    main.scale = EXTERNAL_MAIN_SCALE;
    layout
}

fn check_dimensions(width: u32, height: u32) -> Result<(), ComposeError> {
    let bytes = (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| n.checked_mul(4));
    match bytes {
        Some(n) if width > 0 && height > 0 && n <= isize::MAX as u64 => Ok(()),
        _ => Err(ComposeError::InvalidDimensions { width, height }),
    }
}

fn render(
    scene: &Scene<'_>,
    width: u32,
    height: u32,
    backdrop: Backdrop<'_>,
    excluded: &[ElementSlot],
    layout: &LayoutMap,
) -> Result<Composed, ComposeError> {
    check_dimensions(width, height)?;
    let mut canvas = RgbaImage::new(width, height);
    let full = Rect::new(0.0, 0.0, width as f64, height as f64);

    let background = match backdrop {
        Backdrop::External(img) => match draw_cover(&mut canvas, img, full) {
            Ok(()) => BackgroundFill::External,
            Err(err) => {
                tracing::warn!(error = %err, "external background unusable, using gradient");
                fill_diagonal_gradient(&mut canvas, GRADIENT_FROM, GRADIENT_TO);
                BackgroundFill::Gradient
            }
        },
        Backdrop::FromSlot => paint_slot_background(&mut canvas, scene.slots),
    };

    let mut drawn = Vec::new();
    let mut skipped = Vec::new();
    for layer in scene.order.iter() {
        let params = layout.get(&layer).copied().unwrap_or_default();
        let outcome = match layer.kind() {
            LayerKind::Image(slot) => {
                if excluded.contains(&slot) {
                    continue;
                }
                let Some(source) = scene.slots.get(slot) else {
                    continue;
                };
                let invert = slot == ElementSlot::Logo && scene.invert_logo;
                draw_image_layer(&mut canvas, layer, source, &params, invert)
            }
            LayerKind::Text(slot) => {
                let Some(style) = scene.texts.get(&slot).filter(|s| !s.is_empty()) else {
                    continue;
                };
                draw_text_layer(&mut canvas, slot, style, &params)
            }
        };
        match outcome {
            Ok(()) => drawn.push(layer),
            Err(error) => {
                tracing::warn!(%layer, %error, "skipping layer");
                skipped.push(SkippedLayer { layer, error });
            }
        }
    }

    Ok(Composed {
        image: canvas,
        background,
        drawn,
        skipped,
    })
}

fn paint_slot_background(canvas: &mut RgbaImage, slots: &ElementSlots) -> BackgroundFill {
    let full = Rect::new(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    if let Some(source) = slots.get(ElementSlot::Background) {
        let painted = resolve_pixels(source)
            .and_then(|img| draw_cover(canvas, &img, full).map_err(LayerError::from));
        match painted {
            Ok(()) => return BackgroundFill::Slot,
            Err(error) => {
                tracing::warn!(%error, "background slot unusable, using gradient");
            }
        }
    }
    fill_diagonal_gradient(canvas, GRADIENT_FROM, GRADIENT_TO);
    BackgroundFill::Gradient
}

fn resolve_pixels(source: &SlotImage) -> Result<Cow<'_, RgbaImage>, LayerError> {
    match source {
        SlotImage::Pixels(img) => Ok(Cow::Borrowed(img)),
        SlotImage::Encoded(bytes) => decode_bytes(bytes)
            .map(Cow::Owned)
            .map_err(|e| LayerError::CorruptBuffer(e.to_string())),
    }
}

fn draw_image_layer(
    canvas: &mut RgbaImage,
    layer: LayerId,
    source: &SlotImage,
    params: &LayoutParams,
    invert: bool,
) -> Result<(), LayerError> {
    let (dest, fit) = placement(layer, canvas.width(), canvas.height(), params)
        .ok_or(LayerError::DegenerateLayer)?;
    let mut pixels = resolve_pixels(source)?;
    if invert {
        invert_rgb(pixels.to_mut());
    }
    match fit {
        Fit::Cover => draw_cover(canvas, &pixels, dest)?,
        Fit::Contain => draw_contain(canvas, &pixels, dest)?,
    }
    Ok(())
}

fn draw_text_layer(
    canvas: &mut RgbaImage,
    slot: TextSlot,
    style: &TextStyle,
    params: &LayoutParams,
) -> Result<(), LayerError> {
    let at = text_placement(slot, canvas.width(), canvas.height(), params);
    let weight = style.weight.unwrap_or_else(|| default_weight(slot));
    let coverage = text::rasterize(&style.content, at.size as f64, weight, at.center_x, at.baseline);
    if coverage.is_blank() {
        return Err(LayerError::DegenerateLayer);
    }
    let clip = Clip::centered(at.center_x, at.max_width);
    if style.shadow {
        text::shadow(canvas, &coverage, shadow_blur(slot), clip);
    }
    text::fill(canvas, &coverage, style.color, 1.0, clip);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_pixel_near, bounding_box, count_pixels, png_bytes, solid};
    use std::collections::BTreeMap;

    fn texts(pairs: &[(TextSlot, &str)]) -> TextSlots {
        pairs
            .iter()
            .map(|(slot, s)| (*slot, TextStyle::new(*s)))
            .collect()
    }

    fn all_slots() -> ElementSlots {
        ElementSlots::new()
            .with(ElementSlot::Background, solid(40, 40, [0, 0, 255, 255]))
            .with(ElementSlot::Main, solid(40, 30, [255, 0, 0, 255]))
            .with(ElementSlot::Title, solid(20, 10, [0, 255, 0, 255]))
            .with(ElementSlot::Aux, solid(10, 10, [255, 255, 0, 255]))
            .with(ElementSlot::Logo, solid(30, 10, [255, 0, 255, 255]))
    }

    fn all_texts() -> TextSlots {
        texts(&[
            (TextSlot::Title, "TITLE"),
            (TextSlot::Subtitle, "SUB"),
            (TextSlot::Desc, "DESC"),
            (TextSlot::Note, "NOTE"),
            (TextSlot::Date, "2026"),
        ])
    }

    // =========================================================================
    // Dimensions and background
    // =========================================================================

    #[test]
    fn zero_dimensions_are_rejected() {
        let slots = ElementSlots::new();
        let t = TextSlots::new();
        let order = LayerOrder::default();
        for (w, h) in [(0, 10), (10, 0), (0, 0)] {
            assert_eq!(
                compose(w, h, &slots, &t, &order, None).unwrap_err(),
                ComposeError::InvalidDimensions { width: w, height: h }
            );
        }
    }

    #[test]
    fn empty_scene_paints_gradient() {
        let slots = ElementSlots::new();
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 200, 100).unwrap();
        assert_eq!(out.background, BackgroundFill::Gradient);
        assert!(out.drawn.is_empty() && out.skipped.is_empty());
        assert_pixel_near(&out.image, 0, 0, [0x1a, 0x1a, 0x2e, 255], 1);
        assert_pixel_near(&out.image, 199, 99, [0x16, 0x21, 0x3e, 255], 1);
    }

    #[test]
    fn background_slot_fills_canvas() {
        let slots = ElementSlots::new().with(ElementSlot::Background, solid(10, 10, [9, 99, 199, 255]));
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 120, 63).unwrap();
        assert_eq!(out.background, BackgroundFill::Slot);
        assert_eq!(
            count_pixels(&out.image, (0, 0, 120, 63), |p| {
                p[0].abs_diff(9) <= 1 && p[1].abs_diff(99) <= 1 && p[2].abs_diff(199) <= 1
            }),
            120 * 63
        );
    }

    #[test]
    fn corrupt_background_falls_back_to_gradient() {
        let mut slots = ElementSlots::new();
        slots.insert_encoded(ElementSlot::Background, b"garbage".to_vec());
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 50, 50).unwrap();
        assert_eq!(out.background, BackgroundFill::Gradient);
    }

    // =========================================================================
    // Layer loop
    // =========================================================================

    #[test]
    fn every_populated_layer_is_drawn_once_in_order() {
        let slots = all_slots();
        let t = all_texts();
        let mut ids = LayerId::ALL.to_vec();
        ids.reverse();
        let order = LayerOrder::new(ids.clone()).unwrap();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 300, 200).unwrap();
        assert_eq!(out.drawn, ids);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn empty_slots_and_blank_text_are_not_drawn() {
        let slots = ElementSlots::new().with(ElementSlot::Logo, solid(10, 10, [1, 1, 1, 255]));
        let t = texts(&[(TextSlot::Title, "HI"), (TextSlot::Note, "   ")]);
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 300, 200).unwrap();
        assert_eq!(out.drawn, vec![LayerId::Logo, LayerId::Title]);
    }

    #[test]
    fn corrupt_slot_is_skipped_and_rest_renders() {
        let mut slots = ElementSlots::new();
        slots.insert_encoded(ElementSlot::Aux, vec![0x89, b'P', b'N', b'G', 0, 0]);
        slots.insert(ElementSlot::Logo, solid(10, 10, [1, 1, 1, 255]));
        let t = texts(&[(TextSlot::Title, "OK")]);
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 300, 200).unwrap();
        assert_eq!(out.drawn, vec![LayerId::Logo, LayerId::Title]);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].layer, LayerId::Aux);
        assert!(matches!(out.skipped[0].error, LayerError::CorruptBuffer(_)));
    }

    #[test]
    fn encoded_slot_is_decoded_and_drawn() {
        let mut slots = ElementSlots::new();
        slots.insert_encoded(ElementSlot::Main, png_bytes(&solid(8, 8, [200, 10, 10, 255])));
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 64, 64).unwrap();
        assert_eq!(out.drawn, vec![LayerId::Main]);
        assert_pixel_near(&out.image, 32, 32, [200, 10, 10, 255], 1);
    }

    #[test]
    fn zero_area_element_is_degenerate() {
        let slots = ElementSlots::new().with(ElementSlot::Title, RgbaImage::new(0, 4));
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 100, 100).unwrap();
        assert_eq!(
            out.skipped,
            vec![SkippedLayer {
                layer: LayerId::TitleImage,
                error: LayerError::DegenerateLayer
            }]
        );
    }

    #[test]
    fn later_layers_paint_over_earlier_ones() {
        // Main (red, full bleed) drawn last covers the logo box entirely
        let slots = ElementSlots::new()
            .with(ElementSlot::Main, solid(10, 10, [255, 0, 0, 255]))
            .with(ElementSlot::Logo, solid(10, 10, [0, 255, 0, 255]));
        let t = TextSlots::new();
        let mut ids = LayerId::ALL.to_vec();
        ids.retain(|id| *id != LayerId::Main);
        ids.push(LayerId::Main);
        let order = LayerOrder::new(ids).unwrap();
        let img = compose(200, 200, &slots, &t, &order, None).unwrap();
        assert_eq!(count_pixels(&img, (0, 0, 200, 200), |p| p[1] > 128), 0);

        let img = compose(200, 200, &slots, &t, &LayerOrder::default(), None).unwrap();
        assert!(count_pixels(&img, (0, 0, 200, 200), |p| p == [0, 255, 0, 255]) > 0);
    }

    #[test]
    fn layout_scale_shrinks_main() {
        let slots = ElementSlots::new().with(ElementSlot::Main, solid(10, 10, [255, 0, 0, 255]));
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let layout: LayoutMap = BTreeMap::from([(LayerId::Main, LayoutParams::scaled(0.5))]);
        let img = compose(100, 100, &slots, &t, &order, Some(&layout)).unwrap();
        let red = bounding_box(&img, |p| p[0] > 250 && p[1] < 5).unwrap();
        assert_eq!(red, (25, 25, 50, 50));
    }

    #[test]
    fn huge_scale_is_drawn_clipped_to_the_canvas() {
        let slots = ElementSlots::new()
            .with(ElementSlot::Main, solid(8, 8, [255, 0, 0, 255]))
            .with(ElementSlot::Logo, solid(8, 8, [0, 0, 255, 255]));
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let layout: LayoutMap = BTreeMap::from([
            (LayerId::Main, LayoutParams::scaled(1.0e5)),
            (LayerId::Logo, LayoutParams::scaled(1.0e9)),
        ]);
        let scene = Scene::new(&slots, &t, &order).with_layout(&layout);
        let out = compose_scene(&scene, 100, 100).unwrap();

        assert_eq!(out.drawn, vec![LayerId::Main, LayerId::Logo]);
        assert!(out.skipped.is_empty());
        assert_eq!(out.image.dimensions(), (100, 100));
        // The logo is drawn last and blown up past every edge
        assert_eq!(count_pixels(&out.image, (0, 0, 100, 100), |p| p[2] < 250), 0);
    }

    #[test]
    fn inverted_logo_flips_colors() {
        let slots = ElementSlots::new().with(ElementSlot::Logo, solid(10, 10, [0, 0, 0, 255]));
        let t = TextSlots::new();
        let order = LayerOrder::default();
        let scene = Scene::new(&slots, &t, &order).with_inverted_logo(true);
        let out = compose_scene(&scene, 100, 100).unwrap();
        assert_pixel_near(&out.image, 50, 10, [255, 255, 255, 255], 0);
    }

    // =========================================================================
    // Text
    // =========================================================================

    #[test]
    fn text_uses_style_color_and_weight() {
        let slots = ElementSlots::new().with(ElementSlot::Background, solid(4, 4, [0, 0, 0, 255]));
        let mut t = TextSlots::new();
        t.insert(
            TextSlot::Title,
            TextStyle::new("X").with_color(Color([255, 200, 0])),
        );
        let order = LayerOrder::default();
        let img = compose(400, 400, &slots, &t, &order, None).unwrap();
        assert!(count_pixels(&img, (0, 0, 400, 400), |p| p == [255, 200, 0, 255]) > 0);
    }

    #[test]
    fn shadow_darkens_around_text() {
        let slots = ElementSlots::new().with(ElementSlot::Background, solid(4, 4, [255, 255, 255, 255]));
        let order = LayerOrder::default();
        let plain = texts(&[(TextSlot::Title, "I")]);
        let mut shadowed = plain.clone();
        if let Some(s) = shadowed.get_mut(&TextSlot::Title) {
            s.shadow = true;
            s.color = Color::WHITE;
        }
        let a = compose(400, 400, &slots, &plain, &order, None).unwrap();
        let b = compose(400, 400, &slots, &shadowed, &order, None).unwrap();
        let dark = |img: &RgbaImage| count_pixels(img, (0, 0, 400, 400), |p| p[0] < 230);
        assert_eq!(dark(&a), 0);
        assert!(dark(&b) > 0);
    }

    #[test]
    fn tiny_canvas_text_is_degenerate() {
        // min side 10 -> note size rounds to 0
        let slots = ElementSlots::new();
        let t = texts(&[(TextSlot::Note, "TINY")]);
        let order = LayerOrder::default();
        let out = compose_scene(&Scene::new(&slots, &t, &order), 10, 10).unwrap();
        assert_eq!(out.skipped[0].error, LayerError::DegenerateLayer);
    }

    // =========================================================================
    // External background variant
    // =========================================================================

    #[test]
    fn external_variant_skips_background_and_main() {
        let slots = all_slots();
        let t = all_texts();
        let order = LayerOrder::default();
        let bg = solid(16, 9, [10, 20, 30, 255]);
        let out = compose_scene_over(&Scene::new(&slots, &t, &order), &bg, 320, 180).unwrap();
        assert_eq!(out.background, BackgroundFill::External);
        assert!(!out.drawn.contains(&LayerId::Main));
        assert_eq!(out.drawn.len(), 8);
        // corner untouched by any layer shows the external background
        assert_pixel_near(&out.image, 0, 179, [10, 20, 30, 255], 1);
    }

    #[test]
    fn external_layout_pins_main_scale() {
        let layout = ai_background_layout(None);
        assert_eq!(layout[&LayerId::Main].scale, 0.6);

        let base = BTreeMap::from([(
            LayerId::Main,
            LayoutParams {
                offset_x: 5.0,
                offset_y: 0.0,
                scale: 2.0,
            },
        )]);
        let layout = ai_background_layout(Some(&base));
        assert_eq!(layout[&LayerId::Main].scale, 0.6);
        assert_eq!(layout[&LayerId::Main].offset_x, 5.0);
    }

    #[test]
    fn composition_is_idempotent() {
        let slots = all_slots();
        let t = all_texts();
        let order = LayerOrder::default();
        let a = compose(333, 211, &slots, &t, &order, None).unwrap();
        let b = compose(333, 211, &slots, &t, &order, None).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
