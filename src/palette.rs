//! Dominant colors of a source image, and plain-word color names.
//!
//! Used to describe a source photo to a background generator ("Color
//! palette: ...") and by `analyze` output.

use crate::types::Color;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Side of the thumbnail colors are counted on.
pub const SAMPLE_SIZE: u32 = 64;
/// Every n-th thumbnail pixel is counted, in row-major order.
pub const SAMPLE_STRIDE: usize = 4;
pub const QUANTUM: f32 = 32.0;

fn quantize(v: u8) -> u8 {
    ((v as f32 / QUANTUM).round() * QUANTUM).min(255.0) as u8
}

/// Up to `count` most frequent quantized colors, most frequent first.
///
/// Ties keep first-seen order. An empty image has no colors.
pub fn dominant_colors(image: &RgbaImage, count: usize) -> Vec<Color> {
    if image.width() == 0 || image.height() == 0 {
        return Vec::new();
    }
    let thumb = imageops::resize(image, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);

    // (color, hits) in first-seen order
    let mut tally: Vec<(Color, usize)> = Vec::new();
    for px in thumb.pixels().step_by(SAMPLE_STRIDE) {
        let color = Color([quantize(px[0]), quantize(px[1]), quantize(px[2])]);
        match tally.iter_mut().find(|(c, _)| *c == color) {
            Some((_, hits)) => *hits += 1,
            None => tally.push((color, 1)),
        }
    }
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally.into_iter().take(count).map(|(c, _)| c).collect()
}

/// A one-word description of a color, by perceived brightness first.
pub fn describe_color(color: Color) -> &'static str {
    let [r, g, b] = color.0;
    let brightness = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) as f32 / 1000.0;
    if brightness > 220.0 {
        "white"
    } else if brightness < 35.0 {
        "black"
    } else if r > 180 && g < 100 && b < 100 {
        "red"
    } else if r > 180 && g > 150 && b < 80 {
        "yellow/gold"
    } else if r < 80 && g < 80 && b > 150 {
        "blue"
    } else if r < 80 && g > 150 && b < 80 {
        "green"
    } else if brightness > 160.0 {
        "light-colored"
    } else {
        "dark-colored"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{solid, split_horizontal};

    #[test]
    fn quantize_rounds_to_multiples_of_32() {
        assert_eq!(quantize(0), 0);
        assert_eq!(quantize(15), 0);
        assert_eq!(quantize(16), 32);
        assert_eq!(quantize(100), 96);
        assert_eq!(quantize(250), 255);
    }

    #[test]
    fn solid_image_has_one_color() {
        let colors = dominant_colors(&solid(10, 10, [200, 30, 30, 255]), 3);
        assert_eq!(colors, vec![Color([192, 32, 32])]);
    }

    #[test]
    fn larger_area_ranks_first() {
        // Left half and right half are equal; 3:1 split is not
        let mut img = split_horizontal(64, 64, [0, 0, 0, 255], [255, 255, 255, 255]);
        for y in 0..64 {
            for x in 32..48 {
                img.put_pixel(x, y, image::Rgba([0, 0, 0, 255]));
            }
        }
        let colors = dominant_colors(&img, 3);
        assert_eq!(colors[0], Color([0, 0, 0]));
        assert!(colors.contains(&Color([255, 255, 255])));
    }

    #[test]
    fn count_limits_result() {
        let img = split_horizontal(64, 64, [0, 0, 0, 255], [255, 255, 255, 255]);
        assert_eq!(dominant_colors(&img, 1).len(), 1);
    }

    #[test]
    fn empty_image_has_no_colors() {
        assert!(dominant_colors(&RgbaImage::new(0, 0), 3).is_empty());
    }

    #[test]
    fn color_words() {
        assert_eq!(describe_color(Color::WHITE), "white");
        assert_eq!(describe_color(Color::BLACK), "black");
        assert_eq!(describe_color(Color([220, 40, 40])), "red");
        assert_eq!(describe_color(Color([230, 190, 40])), "yellow/gold");
        assert_eq!(describe_color(Color([30, 40, 200])), "blue");
        assert_eq!(describe_color(Color([40, 200, 40])), "green");
        assert_eq!(describe_color(Color([180, 180, 180])), "light-colored");
        assert_eq!(describe_color(Color([100, 100, 100])), "dark-colored");
    }
}
