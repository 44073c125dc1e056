//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify / load / save** | [`ImageBackend`] over the `image` codecs |
//! | **Crop / blit / gradient** | `image::imageops` ([`raster`]) |
//! | **Saliency regions** | per-pixel color distance + saturation ([`saliency`]) |
//! | **Background removal** | border flood fill with feathering ([`matte`]) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for cover/contain geometry (unit testable)
//! - **Parameters**: Encoding quality and output format
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Raster / saliency / matte**: in-memory pixel work on [`image::RgbaImage`]

pub mod backend;
mod calculations;
pub mod matte;
mod params;
pub mod raster;
pub mod rust_backend;
pub mod saliency;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    PixelRect, Rect, VisibleBlit, clip_blit, contain_rect, cover_source_rect, source_window,
};
pub use matte::{MatteStats, remove_background};
pub use params::{OutputFormat, Quality};
pub use raster::{BlitError, crop_region};
pub use rust_backend::{RustBackend, decode_bytes};
pub use saliency::{HeuristicRegions, extract_heuristic_regions};
