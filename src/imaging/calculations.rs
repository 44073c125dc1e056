//! Pure geometry for blits and anchor boxes.
//!
//! All functions here are pure and testable without any pixels.

/// A rectangle in floating-point canvas or source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Grow or shrink about the center by `factor`.
    pub fn scaled_about_center(self, factor: f64) -> Self {
        let w = self.w * factor;
        let h = self.h * factor;
        Self {
            x: self.x + (self.w - w) / 2.0,
            y: self.y + (self.h - h) / 2.0,
            w,
            h,
        }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Integer placement: rounded origin and size. `None` when either side
    /// rounds to zero pixels.
    pub fn to_pixels(self) -> Option<PixelRect> {
        if !(self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite())
        {
            return None;
        }
        let w = self.w.round();
        let h = self.h.round();
        if w < 1.0 || h < 1.0 {
            return None;
        }
        Some(PixelRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            w: w as u32,
            h: h as u32,
        })
    }
}

/// A rectangle snapped to whole pixels. The origin may lie off-canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

/// The part of a blit that lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleBlit {
    /// On-canvas destination pixels.
    pub target: PixelRect,
    /// Source area that maps onto `target`.
    pub window: Rect,
}

/// Clip a blit of source `window` into `dest` to a `canvas`-sized area.
///
/// The destination is snapped like [`Rect::to_pixels`], intersected with the
/// canvas, and the visible fraction is mapped linearly back into `window`.
/// `None` when no whole pixel lands on the canvas.
pub fn clip_blit(dest: Rect, window: Rect, canvas: (u32, u32)) -> Option<VisibleBlit> {
    let placed = [dest.x, dest.y, dest.w, dest.h];
    if placed.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let (x0, y0) = (dest.x.round(), dest.y.round());
    let (x1, y1) = (x0 + dest.w.round(), y0 + dest.h.round());
    if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
        return None;
    }

    let (vx0, vx1) = (x0.max(0.0), x1.min(canvas.0 as f64));
    let (vy0, vy1) = (y0.max(0.0), y1.min(canvas.1 as f64));
    if vx1 - vx0 < 1.0 || vy1 - vy0 < 1.0 {
        return None;
    }

    let fx = ((vx0 - x0) / (x1 - x0), (vx1 - x0) / (x1 - x0));
    let fy = ((vy0 - y0) / (y1 - y0), (vy1 - y0) / (y1 - y0));
    Some(VisibleBlit {
        target: PixelRect {
            x: vx0 as i64,
            y: vy0 as i64,
            w: (vx1 - vx0) as u32,
            h: (vy1 - vy0) as u32,
        },
        window: Rect::new(
            window.x + fx.0 * window.w,
            window.y + fy.0 * window.h,
            (fx.1 - fx.0) * window.w,
            (fy.1 - fy.0) * window.h,
        ),
    })
}

/// Source window to sample so that it exactly covers a `dest` area.
///
/// The window keeps the destination aspect ratio and is centered in the
/// source; whichever source axis is too long gets cropped.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `dest` - Destination area size (width, height)
///
/// # Examples
/// ```
/// # use adframe::imaging::{Rect, cover_source_rect};
/// // 2:1 source into a square: crop the middle half horizontally
/// assert_eq!(cover_source_rect((200, 100), (50.0, 50.0)), Rect::new(50.0, 0.0, 100.0, 100.0));
/// ```
pub fn cover_source_rect(source: (u32, u32), dest: (f64, f64)) -> Rect {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    let (dst_w, dst_h) = dest;

    let src_aspect = src_w / src_h;
    let dst_aspect = dst_w / dst_h;

    if src_aspect > dst_aspect {
        // Source is wider: full height, crop the sides
        let crop_w = src_h * dst_aspect;
        Rect::new((src_w - crop_w) / 2.0, 0.0, crop_w, src_h)
    } else {
        // Source is taller: full width, crop top and bottom
        let crop_h = src_w / dst_aspect;
        Rect::new(0.0, (src_h - crop_h) / 2.0, src_w, crop_h)
    }
}

/// Largest rectangle with the source aspect ratio that fits inside `dest`,
/// centered in it.
pub fn contain_rect(source: (u32, u32), dest: Rect) -> Rect {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    let scale = (dest.w / src_w).min(dest.h / src_h);
    let w = src_w * scale;
    let h = src_h * scale;
    Rect::new(dest.x + (dest.w - w) / 2.0, dest.y + (dest.h - h) / 2.0, w, h)
}

/// Snap a fractional source window to whole pixels inside the source.
///
/// Returns `(x, y, w, h)` with `w, h >= 1` and the window inside bounds.
pub fn source_window(window: Rect, source: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let x = (window.x.round().max(0.0) as u32).min(src_w.saturating_sub(1));
    let y = (window.y.round().max(0.0) as u32).min(src_h.saturating_sub(1));
    let w = (window.w.round().max(1.0) as u32).min(src_w - x).max(1);
    let h = (window.h.round().max(1.0) as u32).min(src_h - y).max(1);
    (x, y, w, h)
}
