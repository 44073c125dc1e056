//! Built-in bitmap text renderer.
//!
//! Glyphs come from a 5×7 dot matrix scaled to the font size: one dot is a
//! tenth of the em, so capitals are 0.7 em tall and each character advances
//! six dots. Dots are rasterized as anti-aliased rectangles, heavier weights
//! grow every dot, and lowercase letters use the capital forms. Characters
//! outside the face draw as a hollow box.
//!
//! Placement mirrors a canvas `fillText` with centered alignment: `x` is the
//! horizontal center and `y` the alphabetic baseline.

use crate::types::{Color, FontWeight};
use image::{GrayImage, Luma, RgbaImage, imageops};

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
const ADVANCE_DOTS: f64 = 6.0;
const DOTS_PER_EM: f64 = 10.0;

/// Shadow color alpha, as in `rgba(0,0,0,0.7)`.
const SHADOW_ALPHA: f32 = 0.7;
/// Shadow offset in pixels (right, down).
const SHADOW_OFFSET: (i64, i64) = (1, 2);

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the
/// pixels (bit 4 = leftmost).
#[rustfmt::skip]
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b10001,0b01010,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b01100,0b01100),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b01100,0b00100,0b01000),
        ':' => g!(0b00000,0b01100,0b01100,0b00000,0b01100,0b01100,0b00000),
        ';' => g!(0b00000,0b01100,0b01100,0b00000,0b01100,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '"' => g!(0b01010,0b01010,0b01010,0b00000,0b00000,0b00000,0b00000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '@' => g!(0b01110,0b10001,0b00001,0b01101,0b10101,0b10101,0b01110),
        '$' => g!(0b00100,0b01111,0b10100,0b01110,0b00101,0b11110,0b00100),
        '*' => g!(0b00000,0b00100,0b10101,0b01110,0b10101,0b00100,0b00000),

        _ => None,
    }
}

#[rustfmt::skip]
const MISSING_GLYPH: [u8; 7] = [0b11111,0b10001,0b10001,0b10001,0b10001,0b10001,0b11111];

fn rows_for(ch: char) -> [u8; 7] {
    glyph5x7(ch).unwrap_or(MISSING_GLYPH)
}

/// Size of one dot in pixels.
fn dot(size: f64) -> f64 {
    size / DOTS_PER_EM
}

/// Extra stroke thickness for a weight, in pixels. 400 is the base face.
fn stroke_gain(size: f64, weight: FontWeight) -> f64 {
    let relative = (weight.value() as f64 - 400.0) / 400.0;
    dot(size) * relative.clamp(-0.3, 1.0)
}

/// Advance width of `text` at `size` pixels: six dots per character, minus
/// the trailing gap.
pub fn measure(text: &str, size: f64) -> f64 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    dot(size) * (ADVANCE_DOTS * n as f64 - 1.0)
}

/// Per-pixel ink coverage of a text run, positioned in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Canvas coordinates of the mask's top-left pixel.
    pub origin: (i64, i64),
    pub width: u32,
    pub height: u32,
    data: Vec<f32>,
}

impl Coverage {
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }

    fn add_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let (ox, oy) = (self.origin.0 as f64, self.origin.1 as f64);
        let (lx0, ly0, lx1, ly1) = (x0 - ox, y0 - oy, x1 - ox, y1 - oy);
        let px_start = lx0.floor().max(0.0) as u32;
        let py_start = ly0.floor().max(0.0) as u32;
        let px_end = (lx1.ceil().max(0.0) as u32).min(self.width);
        let py_end = (ly1.ceil().max(0.0) as u32).min(self.height);
        for py in py_start..py_end {
            let cov_y = (ly1.min(py as f64 + 1.0) - ly0.max(py as f64)).max(0.0);
            if cov_y <= 0.0 {
                continue;
            }
            for px in px_start..px_end {
                let cov_x = (lx1.min(px as f64 + 1.0) - lx0.max(px as f64)).max(0.0);
                let cell = &mut self.data[(py * self.width + px) as usize];
                *cell = (*cell + (cov_x * cov_y) as f32).min(1.0);
            }
        }
    }
}

/// Rasterize `text` centered on `center_x` with its baseline at `baseline`.
pub fn rasterize(text: &str, size: f64, weight: FontWeight, center_x: f64, baseline: f64) -> Coverage {
    let d = dot(size);
    let gain = stroke_gain(size, weight);
    let left = center_x - measure(text, size) / 2.0;
    let top = baseline - GLYPH_ROWS as f64 * d;
    let margin = gain.max(0.0) / 2.0 + 1.0;

    let x0 = (left - margin).floor() as i64;
    let y0 = (top - margin).floor() as i64;
    let x1 = (left + measure(text, size) + margin).ceil() as i64;
    let y1 = (baseline + margin).ceil() as i64;
    let width = (x1 - x0).max(0) as u32;
    let height = (y1 - y0).max(0) as u32;

    let mut cov = Coverage {
        origin: (x0, y0),
        width,
        height,
        data: vec![0.0; width as usize * height as usize],
    };
    if d <= 0.0 {
        return cov;
    }

    let half = gain / 2.0;
    for (i, ch) in text.chars().enumerate() {
        let glyph_left = left + i as f64 * ADVANCE_DOTS * d;
        for (row, bits) in rows_for(ch).iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                    continue;
                }
                let dx = glyph_left + col as f64 * d;
                let dy = top + row as f64 * d;
                cov.add_rect(dx - half, dy - half, dx + d + half, dy + d + half);
            }
        }
    }
    cov
}

/// Horizontal band `[x0, x1)` of canvas columns that may receive ink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub x0: f64,
    pub x1: f64,
}

impl Clip {
    pub fn centered(center_x: f64, width: f64) -> Self {
        Self {
            x0: center_x - width / 2.0,
            x1: center_x + width / 2.0,
        }
    }

    fn admits(&self, x: i64) -> bool {
        let mid = x as f64 + 0.5;
        mid >= self.x0 && mid < self.x1
    }
}

/// Source-over blend of an opaque color at `alpha` onto one pixel.
fn blend(dst: &mut image::Rgba<u8>, color: [u8; 3], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let a = alpha.min(1.0);
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    for c in 0..3 {
        let src = color[c] as f32;
        let under = dst.0[c] as f32;
        let v = if out_a > 0.0 {
            (src * a + under * dst_a * (1.0 - a)) / out_a
        } else {
            0.0
        };
        dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Paint coverage onto the canvas in `color`, scaled by `opacity`.
pub fn fill(canvas: &mut RgbaImage, cov: &Coverage, color: Color, opacity: f32, clip: Clip) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for my in 0..cov.height {
        let cy = cov.origin.1 + my as i64;
        if cy < 0 || cy >= ch {
            continue;
        }
        for mx in 0..cov.width {
            let cx = cov.origin.0 + mx as i64;
            if cx < 0 || cx >= cw || !clip.admits(cx) {
                continue;
            }
            let c = cov.get(mx, my);
            if c > 0.0 {
                blend(canvas.get_pixel_mut(cx as u32, cy as u32), color.0, c * opacity);
            }
        }
    }
}

/// Soft black shadow under a text run: the coverage blurred with a Gaussian
/// of sigma `blur / 2`, offset one pixel right and two down.
pub fn shadow(canvas: &mut RgbaImage, cov: &Coverage, blur: f64, clip: Clip) {
    let sigma = (blur / 2.0) as f32;
    let pad = (sigma * 3.0).ceil().max(0.0) as u32;
    let mut mask = GrayImage::new(cov.width + 2 * pad, cov.height + 2 * pad);
    for y in 0..cov.height {
        for x in 0..cov.width {
            let v = (cov.get(x, y) * 255.0).round() as u8;
            mask.put_pixel(x + pad, y + pad, Luma([v]));
        }
    }
    let blurred = if sigma > 0.0 {
        imageops::blur(&mask, sigma)
    } else {
        mask
    };

    let data = blurred
        .pixels()
        .map(|p| p.0[0] as f32 / 255.0)
        .collect::<Vec<_>>();
    let shifted = Coverage {
        origin: (
            cov.origin.0 - pad as i64 + SHADOW_OFFSET.0,
            cov.origin.1 - pad as i64 + SHADOW_OFFSET.1,
        ),
        width: blurred.width(),
        height: blurred.height(),
        data,
    };
    fill(canvas, &shifted, Color::BLACK, SHADOW_ALPHA, clip);
}
