//! Pure Rust file backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality, alpha dropped) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{OutputFormat, Quality};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::io::BufWriter;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Decode in-memory file bytes (any supported format) into RGBA.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, BackendError> {
    image::load_from_memory(bytes)
        .map(DynamicImage::into_rgba8)
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode buffer: {e}")))
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(image: &RgbaImage, path: &Path, format: OutputFormat, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let result = match format {
        OutputFormat::Png => {
            image.write_with_encoder(image::codecs::png::PngEncoder::new(writer))
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value() as u8);
            rgb.write_with_encoder(encoder)
        }
        OutputFormat::WebP => {
            image.write_with_encoder(image::codecs::webp::WebPEncoder::new_lossless(writer))
        }
    };
    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("{} encode failed for {}: {e}", format, path.display()))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map(DynamicImage::into_rgba8)
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
            })
    }

    fn save(&self, image: &RgbaImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
        let format = OutputFormat::from_path(path).ok_or_else(|| {
            BackendError::ProcessingFailed(format!(
                "Unsupported output format: {}",
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
            ))
        })?;
        encode(image, path, format, quality)
    }
}
