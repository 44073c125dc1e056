//! Background removal by flood fill from the image border.
//!
//! The border pixels define the background color: their mean is the
//! reference and their RMS distance from it (the spread) loosens the
//! threshold for noisy backdrops. Every pixel reachable from an edge
//! through 4-connected neighbours closer than the threshold becomes fully
//! transparent, and foreground pixels touching that region are feathered.
//!
//! The fill is an explicit breadth-first queue over a visited bitset, so
//! memory stays linear in the pixel count and large images cannot overflow
//! the stack.

use image::RgbaImage;
use serde::Serialize;
use std::collections::VecDeque;

const SPREAD_WEIGHT: f64 = 1.5;
const THRESHOLD_BASE: f64 = 25.0;
const THRESHOLD_MIN: f64 = 30.0;
const THRESHOLD_MAX: f64 = 80.0;
/// Alpha multiplier for foreground pixels on the background boundary.
const FEATHER: f64 = 0.6;

/// What a matte pass measured and changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatteStats {
    /// Mean border color the fill compared against.
    pub reference: [u8; 3],
    pub threshold: f64,
    /// Pixels made fully transparent.
    pub cleared: usize,
    /// Foreground pixels whose alpha was reduced.
    pub feathered: usize,
}

/// One bit per pixel.
struct BitGrid {
    width: usize,
    words: Vec<u64>,
}

impl BitGrid {
    fn new(width: u32, height: u32) -> Self {
        let bits = width as usize * height as usize;
        Self {
            width: width as usize,
            words: vec![0; bits.div_ceil(64)],
        }
    }

    fn get(&self, x: u32, y: u32) -> bool {
        let i = y as usize * self.width + x as usize;
        self.words[i / 64] & (1 << (i % 64)) != 0
    }

    /// Set a bit, returning whether it was previously clear.
    fn insert(&mut self, x: u32, y: u32) -> bool {
        let i = y as usize * self.width + x as usize;
        let mask = 1 << (i % 64);
        let word = &mut self.words[i / 64];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }
}

/// Border pixel positions: top and bottom rows in full, then the left and
/// right columns between them.
fn border_positions(width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(2 * (width as usize + height as usize));
    for x in 0..width {
        out.push((x, 0));
        out.push((x, height - 1));
    }
    for y in 1..height.saturating_sub(1) {
        out.push((0, y));
        out.push((width - 1, y));
    }
    out
}

fn distance(rgb: [u8; 4], reference: [f64; 3]) -> f64 {
    let dr = rgb[0] as f64 - reference[0];
    let dg = rgb[1] as f64 - reference[1];
    let db = rgb[2] as f64 - reference[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Similarity threshold for a given border spread.
pub fn threshold_for_spread(spread: f64) -> f64 {
    (spread * SPREAD_WEIGHT + THRESHOLD_BASE).clamp(THRESHOLD_MIN, THRESHOLD_MAX)
}

/// Make the border-connected background transparent, in place.
///
/// An image with no pixels is returned untouched.
pub fn remove_background(image: &mut RgbaImage) -> MatteStats {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return MatteStats {
            reference: [0; 3],
            threshold: THRESHOLD_MIN,
            cleared: 0,
            feathered: 0,
        };
    }

    let border = border_positions(width, height);
    let mut sums = [0f64; 3];
    for &(x, y) in &border {
        let px = image.get_pixel(x, y).0;
        for c in 0..3 {
            sums[c] += px[c] as f64;
        }
    }
    let n = border.len() as f64;
    let reference = sums.map(|s| s / n);

    let spread = (border
        .iter()
        .map(|&(x, y)| distance(image.get_pixel(x, y).0, reference).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();
    let threshold = threshold_for_spread(spread);

    let background = flood_from_border(image, &border, reference, threshold);

    let mut cleared = 0;
    let mut feathered = 0;
    for y in 0..height {
        for x in 0..width {
            if background.get(x, y) {
                continue;
            }
            let touches_background = (x > 0 && background.get(x - 1, y))
                || (x + 1 < width && background.get(x + 1, y))
                || (y > 0 && background.get(x, y - 1))
                || (y + 1 < height && background.get(x, y + 1));
            if touches_background {
                let px = image.get_pixel_mut(x, y);
                px.0[3] = (px.0[3] as f64 * FEATHER).round() as u8;
                feathered += 1;
            }
        }
    }
    for y in 0..height {
        for x in 0..width {
            if background.get(x, y) {
                image.get_pixel_mut(x, y).0[3] = 0;
                cleared += 1;
            }
        }
    }

    let stats = MatteStats {
        reference: reference.map(|c| c.round() as u8),
        threshold,
        cleared,
        feathered,
    };
    tracing::debug!(
        spread,
        threshold,
        cleared,
        feathered,
        "background removed"
    );
    stats
}

struct Fill<'a> {
    image: &'a RgbaImage,
    reference: [f64; 3],
    threshold: f64,
    background: &'a mut BitGrid,
    queue: VecDeque<(u32, u32)>,
}

impl Fill<'_> {
    /// Queue a pixel the first time it is seen under the threshold.
    fn visit(&mut self, x: u32, y: u32) {
        if self.background.get(x, y) {
            return;
        }
        if distance(self.image.get_pixel(x, y).0, self.reference) < self.threshold {
            self.background.insert(x, y);
            self.queue.push_back((x, y));
        }
    }
}

/// Breadth-first fill over 4-connected pixels within `threshold` of
/// `reference`, seeded from the border. A pixel is marked when it is queued,
/// so each one enters the queue at most once.
fn flood_from_border(
    image: &RgbaImage,
    border: &[(u32, u32)],
    reference: [f64; 3],
    threshold: f64,
) -> BitGrid {
    let (width, height) = image.dimensions();
    let mut background = BitGrid::new(width, height);
    let mut fill = Fill {
        image,
        reference,
        threshold,
        background: &mut background,
        queue: VecDeque::new(),
    };

    for &(x, y) in border {
        fill.visit(x, y);
    }
    while let Some((x, y)) = fill.queue.pop_front() {
        if x > 0 {
            fill.visit(x - 1, y);
        }
        if x + 1 < width {
            fill.visit(x + 1, y);
        }
        if y > 0 {
            fill.visit(x, y - 1);
        }
        if y + 1 < height {
            fill.visit(x, y + 1);
        }
    }
    background
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::solid;
    use image::Rgba;

    /// 10x10 with a 1px red frame around a blue 8x8 interior.
    fn framed_square() -> RgbaImage {
        let mut img = solid(10, 10, [255, 0, 0, 255]);
        for y in 1..9 {
            for x in 1..9 {
                img.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        img
    }

    #[test]
    fn uniform_border_clears_frame_and_feathers_ring() {
        let mut img = framed_square();
        let stats = remove_background(&mut img);

        assert_eq!(stats.reference, [255, 0, 0]);
        assert_eq!(stats.threshold, 30.0);
        assert_eq!(stats.cleared, 36);
        assert_eq!(stats.feathered, 28);

        for (x, y, px) in img.enumerate_pixels() {
            let inside = (1..9).contains(&x) && (1..9).contains(&y);
            let ring = inside && (x == 1 || x == 8 || y == 1 || y == 8);
            let expected = if !inside {
                0
            } else if ring {
                153
            } else {
                255
            };
            assert_eq!(px.0[3], expected, "alpha at ({x},{y})");
        }
    }

    #[test]
    fn foreground_colors_are_untouched() {
        let mut img = framed_square();
        remove_background(&mut img);
        assert_eq!(&img.get_pixel(4, 4).0[..3], &[0, 0, 255]);
    }

    #[test]
    fn enclosed_background_colored_pixels_survive() {
        // A red island inside the blue square is not border-connected.
        let mut img = framed_square();
        img.put_pixel(4, 4, Rgba([255, 0, 0, 255]));
        img.put_pixel(5, 4, Rgba([255, 0, 0, 255]));
        remove_background(&mut img);
        assert_eq!(img.get_pixel(4, 4).0[3], 255);
    }

    #[test]
    fn noisy_border_raises_threshold() {
        // Alternating 200/240 gray: every border pixel sits 20*sqrt(3) from the mean
        let mut img = solid(12, 12, [220, 220, 220, 255]);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let v = if (x + y) % 2 == 0 { 200 } else { 240 };
            *px = Rgba([v, v, v, 255]);
        }
        let stats = remove_background(&mut img);
        assert!((stats.threshold - (20.0 * 3f64.sqrt() * 1.5 + 25.0)).abs() < 1e-6);
        assert_eq!(stats.cleared, 144);
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn distant_border_pixel_is_not_seeded() {
        let mut img = framed_square();
        img.put_pixel(0, 5, Rgba([0, 255, 0, 255]));
        let border = border_positions(10, 10);
        let background = flood_from_border(&img, &border, [255.0, 0.0, 0.0], 30.0);

        assert!(!background.get(0, 5));
        assert!(background.get(0, 4));
        assert!(background.get(0, 6));
        assert!(!background.get(1, 5));
    }

    #[test]
    fn repeated_seeds_fill_each_pixel_once() {
        // A one-row image lists every pixel twice as both top and bottom border
        let img = solid(6, 1, [9, 9, 9, 255]);
        let border = border_positions(6, 1);
        assert_eq!(border.len(), 12);
        let background = flood_from_border(&img, &border, [9.0, 9.0, 9.0], 30.0);
        assert!((0..6).all(|x| background.get(x, 0)));

        let mut img = img;
        assert_eq!(remove_background(&mut img).cleared, 6);
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(threshold_for_spread(0.0), 30.0);
        assert_eq!(threshold_for_spread(10.0), 40.0);
        assert_eq!(threshold_for_spread(500.0), 80.0);
    }

    #[test]
    fn large_uniform_image_does_not_overflow() {
        let mut img = solid(1024, 1024, [10, 10, 10, 255]);
        let stats = remove_background(&mut img);
        assert_eq!(stats.cleared, 1024 * 1024);
    }

    #[test]
    fn empty_and_single_pixel_images() {
        let mut empty = RgbaImage::new(0, 0);
        assert_eq!(remove_background(&mut empty).cleared, 0);

        let mut one = solid(1, 1, [5, 6, 7, 255]);
        let stats = remove_background(&mut one);
        assert_eq!(stats.cleared, 1);
        assert_eq!(one.get_pixel(0, 0).0[3], 0);
    }
}
