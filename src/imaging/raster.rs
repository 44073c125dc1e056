//! Raster surface utilities: cropping and aspect-preserving blits.
//!
//! | Operation | Implementation |
//! |---|---|
//! | Crop | `image::imageops::crop_imm` |
//! | Cover blit | centered source window → visible part → `resize` (Lanczos3) → `overlay` |
//! | Contain blit | visible part → `resize` (Lanczos3) → `overlay` |
//! | Gradient fill | per-pixel projection onto the diagonal |
//!
//! Blits alpha-blend onto the destination (`imageops::overlay`). Anchor boxes
//! may hang off-canvas or dwarf it: only the on-canvas part is resampled.

use super::calculations::{Rect, clip_blit, contain_rect, cover_source_rect, source_window};
use crate::types::{Color, Region};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlitError {
    #[error("source image has no pixels ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
    #[error("target area rounds to zero pixels")]
    EmptyTarget,
}

/// Copy a region out of `source` as an owned full-resolution crop.
///
/// The region is clamped to the source first, so any [`Region`] is accepted.
pub fn crop_region(source: &RgbaImage, region: Region) -> RgbaImage {
    let clamped = Region::clamped(
        region.x as f64,
        region.y as f64,
        region.w as f64,
        region.h as f64,
        source.width(),
        source.height(),
    );
    imageops::crop_imm(source, clamped.x, clamped.y, clamped.w, clamped.h).to_image()
}

fn ensure_pixels(src: &RgbaImage) -> Result<(), BlitError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(BlitError::EmptySource {
            width: src.width(),
            height: src.height(),
        });
    }
    Ok(())
}

/// Resample the part of source `window` that lands on the canvas.
///
/// Only the visible sub-rectangle is resized, so the allocation is bounded by
/// the canvas however large `dest` is.
fn blit_window(canvas: &mut RgbaImage, src: &RgbaImage, dest: Rect, window: Rect) {
    let Some(visible) = clip_blit(dest, window, canvas.dimensions()) else {
        return;
    };
    let (sx, sy, sw, sh) = source_window(visible.window, src.dimensions());
    let target = visible.target;

    let resized = if (sx, sy, sw, sh) == (0, 0, src.width(), src.height()) {
        imageops::resize(src, target.w, target.h, FilterType::Lanczos3)
    } else {
        let cropped = imageops::crop_imm(src, sx, sy, sw, sh).to_image();
        imageops::resize(&cropped, target.w, target.h, FilterType::Lanczos3)
    };
    imageops::overlay(canvas, &resized, target.x, target.y);
}

/// Scale-and-crop `src` so it exactly fills `dest`, center-cropping overflow.
pub fn draw_cover(canvas: &mut RgbaImage, src: &RgbaImage, dest: Rect) -> Result<(), BlitError> {
    ensure_pixels(src)?;
    dest.to_pixels().ok_or(BlitError::EmptyTarget)?;
    let window = cover_source_rect(src.dimensions(), (dest.w, dest.h));
    blit_window(canvas, src, dest, window);
    Ok(())
}

/// Fit `src` entirely inside `dest`, preserving aspect ratio, centered.
pub fn draw_contain(canvas: &mut RgbaImage, src: &RgbaImage, dest: Rect) -> Result<(), BlitError> {
    ensure_pixels(src)?;
    let fitted = contain_rect(src.dimensions(), dest);
    fitted.to_pixels().ok_or(BlitError::EmptyTarget)?;
    let whole = Rect::new(0.0, 0.0, src.width() as f64, src.height() as f64);
    blit_window(canvas, src, fitted, whole);
    Ok(())
}

/// Paint an opaque two-stop linear gradient from the top-left corner to the
/// bottom-right corner.
pub fn fill_diagonal_gradient(canvas: &mut RgbaImage, from: Color, to: Color) {
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);
    let len_sq = w * w + h * h;
    if len_sq == 0.0 {
        return;
    }
    for (x, y, px) in canvas.enumerate_pixels_mut() {
        let t = (((x as f64 + 0.5) * w + (y as f64 + 0.5) * h) / len_sq).clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for c in 0..3 {
            let a = from.0[c] as f64;
            let b = to.0[c] as f64;
            out[c] = (a + (b - a) * t).round() as u8;
        }
        out[3] = 255;
        *px = Rgba(out);
    }
}

/// Invert the color channels, keeping alpha.
pub fn invert_rgb(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let [r, g, b, a] = px.0;
        *px = Rgba([255 - r, 255 - g, 255 - b, a]);
    }
}
