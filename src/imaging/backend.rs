//! Image file backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three file operations the crate
//! needs: identify, load, and save. Everything else (saliency, matting,
//! composition) works on in-memory [`RgbaImage`]s and never touches disk.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure Rust codecs.

use super::params::Quality;
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image file backends.
///
/// `Sync` so a single backend can be shared across rayon workers during
/// multi-size export.
pub trait ImageBackend: Sync {
    /// Get image dimensions without decoding pixels.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode a file into 8-bit RGBA.
    fn load(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Encode `image` to `path`, choosing the format from the extension.
    fn save(&self, image: &RgbaImage, path: &Path, quality: Quality) -> Result<(), BackendError>;
}
