//! Default placement boxes for image layers.
//!
//! One hand-tuned box per `(LayerId, AspectClass)`: three regimes per image
//! layer, kept as data so each layout can be read and tested in isolation.
//! Text layers have no box; they are positioned by baseline in
//! [`typography`](super::typography).
//!
//! Each box edge is a fraction of either canvas dimension. The aux box is
//! square, so its height is also measured against the canvas width.

use super::aspect::AspectClass;
use crate::imaging::Rect;
use crate::types::{LayerId, LayoutParams};

/// A length expressed as a fraction of one canvas dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    Width(f64),
    Height(f64),
}

impl Span {
    pub fn resolve(self, width: u32, height: u32) -> f64 {
        match self {
            Span::Width(f) => width as f64 * f,
            Span::Height(f) => height as f64 * f,
        }
    }
}

/// How an image is fitted into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Fill the box, cropping overflow.
    Cover,
    /// Fit inside the box, leaving margins.
    Contain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: Span,
    pub y: Span,
    pub w: Span,
    pub h: Span,
    pub fit: Fit,
}

impl Anchor {
    pub fn resolve(&self, width: u32, height: u32) -> Rect {
        Rect::new(
            self.x.resolve(width, height),
            self.y.resolve(width, height),
            self.w.resolve(width, height),
            self.h.resolve(width, height),
        )
    }
}

use AspectClass::{Landscape, Portrait, Square};
use Fit::{Contain, Cover};
use Span::{Height as H, Width as W};

const fn boxed(x: Span, y: Span, w: Span, h: Span, fit: Fit) -> Anchor {
    Anchor { x, y, w, h, fit }
}

const FULL_BLEED: Anchor = boxed(W(0.0), H(0.0), W(1.0), H(1.0), Cover);

#[rustfmt::skip]
static ANCHORS: [(LayerId, AspectClass, Anchor); 12] = [
    (LayerId::Main,       Portrait,  FULL_BLEED),
    (LayerId::Main,       Landscape, FULL_BLEED),
    (LayerId::Main,       Square,    FULL_BLEED),

    (LayerId::TitleImage, Portrait,  boxed(W(0.35), H(0.47), W(0.30), H(0.08), Contain)),
    (LayerId::TitleImage, Landscape, boxed(W(0.58), H(0.06), W(0.22), H(0.12), Contain)),
    (LayerId::TitleImage, Square,    boxed(W(0.36), H(0.53), W(0.28), H(0.10), Contain)),

    (LayerId::Aux,        Portrait,  boxed(W(0.74), H(0.40), W(0.22), W(0.22), Contain)),
    (LayerId::Aux,        Landscape, boxed(W(0.82), H(0.04), W(0.14), W(0.14), Contain)),
    (LayerId::Aux,        Square,    boxed(W(0.78), H(0.36), W(0.18), W(0.18), Contain)),

    // Centered horizontally, vertically centered on 10% of the height
    (LayerId::Logo,       Portrait,  boxed(W(0.20), H(0.065), W(0.60), H(0.07), Contain)),
    (LayerId::Logo,       Landscape, boxed(W(0.20), H(0.03),  W(0.60), H(0.14), Contain)),
    (LayerId::Logo,       Square,    boxed(W(0.20), H(0.05),  W(0.60), H(0.10), Contain)),
];

/// Default box for an image layer. `None` for text layers.
pub fn anchor(layer: LayerId, class: AspectClass) -> Option<&'static Anchor> {
    ANCHORS
        .iter()
        .find(|(id, c, _)| *id == layer && *c == class)
        .map(|(_, _, a)| a)
}

/// Final destination box for an image layer on a `width`×`height` canvas.
///
/// The anchor box is scaled about its own center by `params.scale`, then
/// shifted by `offset_x`% of the width and `offset_y`% of the height.
pub fn placement(
    layer: LayerId,
    width: u32,
    height: u32,
    params: &LayoutParams,
) -> Option<(Rect, Fit)> {
    let anchor = anchor(layer, AspectClass::of(width, height))?;
    let rect = anchor
        .resolve(width, height)
        .scaled_about_center(params.effective_scale() as f64)
        .translated(
            width as f64 * params.offset_x as f64 / 100.0,
            height as f64 * params.offset_y as f64 / 100.0,
        );
    Some((rect, anchor.fit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayerKind;

    fn approx(a: Rect, b: Rect) -> bool {
        (a.x - b.x).abs() < 1e-9
            && (a.y - b.y).abs() < 1e-9
            && (a.w - b.w).abs() < 1e-9
            && (a.h - b.h).abs() < 1e-9
    }

    #[test]
    fn every_image_layer_has_a_box_per_class() {
        for id in LayerId::ALL {
            for class in AspectClass::ALL {
                let has = anchor(id, class).is_some();
                let is_image = matches!(id.kind(), LayerKind::Image(_));
                assert_eq!(has, is_image, "{id} / {class}");
            }
        }
    }

    #[test]
    fn table_has_no_duplicate_keys() {
        for (i, (a, ca, _)) in ANCHORS.iter().enumerate() {
            for (b, cb, _) in &ANCHORS[i + 1..] {
                assert!(!(a == b && ca == cb), "duplicate anchor {a} / {ca}");
            }
        }
    }

    #[test]
    fn main_is_full_bleed_cover() {
        let (rect, fit) = placement(LayerId::Main, 1200, 630, &LayoutParams::default()).unwrap();
        assert_eq!(fit, Fit::Cover);
        assert!(approx(rect, Rect::new(0.0, 0.0, 1200.0, 630.0)));
    }

    #[test]
    fn title_image_landscape_box() {
        let (rect, fit) =
            placement(LayerId::TitleImage, 1000, 500, &LayoutParams::default()).unwrap();
        assert_eq!(fit, Fit::Contain);
        assert!(approx(rect, Rect::new(580.0, 30.0, 220.0, 60.0)));
    }

    #[test]
    fn aux_box_is_square_in_every_class() {
        for (w, h) in [(1080, 1920), (1200, 630), (1000, 1000)] {
            let (rect, _) = placement(LayerId::Aux, w, h, &LayoutParams::default()).unwrap();
            assert!((rect.w - rect.h).abs() < 1e-9);
        }
    }

    #[test]
    fn logo_is_centered_near_the_top() {
        for (w, h) in [(1080, 1920), (1200, 630), (1000, 1000)] {
            let (rect, _) = placement(LayerId::Logo, w, h, &LayoutParams::default()).unwrap();
            assert!((rect.x + rect.w / 2.0 - w as f64 / 2.0).abs() < 1e-9);
            assert!((rect.y + rect.h / 2.0 - h as f64 * 0.10).abs() < 1e-6);
        }
    }

    #[test]
    fn scale_and_offset_apply_about_center() {
        let params = LayoutParams {
            offset_x: 10.0,
            offset_y: -5.0,
            scale: 0.5,
        };
        let (rect, _) = placement(LayerId::Main, 1000, 1000, &params).unwrap();
        assert!(approx(rect, Rect::new(350.0, 200.0, 500.0, 500.0)));
    }

    #[test]
    fn zero_scale_falls_back_to_unit() {
        let params = LayoutParams::scaled(0.0);
        let (rect, _) = placement(LayerId::Main, 100, 100, &params).unwrap();
        assert!(approx(rect, Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn text_layers_have_no_placement() {
        assert!(placement(LayerId::Title, 100, 100, &LayoutParams::default()).is_none());
    }
}
