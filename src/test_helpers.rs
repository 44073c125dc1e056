//! Shared test utilities for the adframe test suite.
//!
//! Provides synthetic image builders and pixel assertions so tests can
//! describe scenes in a line instead of hand-filling buffers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bg = solid(40, 20, [0, 0, 255, 255]);
//! let logo = framed(10, 10, 1, [255, 0, 0, 255], [0, 255, 0, 255]);
//! assert_pixel_near(&bg, 3, 3, [0, 0, 255, 255], 0);
//! ```

use image::{Rgba, RgbaImage};

// =========================================================================
// Builders
// =========================================================================

/// Single-color image.
pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Left half (`x < width / 2`) one color, right half another.
pub fn split_horizontal(width: u32, height: u32, left: [u8; 4], right: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 { Rgba(left) } else { Rgba(right) }
    })
}

/// Checkerboard with square cells of `cell` pixels.
pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { Rgba(a) } else { Rgba(b) }
    })
}

/// `inner` filled image with a `border`-pixel frame of `edge`.
pub fn framed(width: u32, height: u32, border: u32, edge: [u8; 4], inner: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let on_edge = x < border
            || y < border
            || x + border >= width
            || y + border >= height;
        if on_edge { Rgba(edge) } else { Rgba(inner) }
    })
}

/// PNG-encoded bytes of an image, for encoded-slot tests.
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

// =========================================================================
// Assertions: panic with coordinates and both colors on mismatch
// =========================================================================

/// Assert every channel of a pixel is within `tolerance` of `expected`.
pub fn assert_pixel_near(image: &RgbaImage, x: u32, y: u32, expected: [u8; 4], tolerance: u8) {
    let actual = image.get_pixel(x, y).0;
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance);
    assert!(
        close,
        "pixel ({x},{y}) is {actual:?}, expected {expected:?} ±{tolerance}"
    );
}

/// Count pixels in a rectangle matching a predicate.
pub fn count_pixels(
    image: &RgbaImage,
    area: (u32, u32, u32, u32),
    pred: impl Fn([u8; 4]) -> bool,
) -> usize {
    let (x0, y0, w, h) = area;
    let mut n = 0;
    for y in y0..(y0 + h).min(image.height()) {
        for x in x0..(x0 + w).min(image.width()) {
            if pred(image.get_pixel(x, y).0) {
                n += 1;
            }
        }
    }
    n
}

/// Bounding box `(x, y, w, h)` of pixels matching a predicate, if any.
pub fn bounding_box(image: &RgbaImage, pred: impl Fn([u8; 4]) -> bool) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in image.enumerate_pixels() {
        if pred(px.0) {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}
