//! # adframe
//!
//! Element extraction and deterministic multi-size compositing for marketing
//! graphics. One source photo (or a handful of element images) plus a few
//! lines of text become a set of ads at every size a campaign needs.
//!
//! # Architecture: Extract, Then Compose
//!
//! ```text
//! 1. Extract   photo + detections  →  ElementSlots  (background, main, title, aux, logo)
//!              OCR lines           →  TextSlots     (title, subtitle, desc, note, date)
//! 2. Compose   slots + LayerOrder  →  RgbaImage     (one canvas per target size)
//! 3. Export    canvases            →  out/ad-WxH.png
//! ```
//!
//! Extraction never guesses twice: regions come from detector boxes when
//! there are any, and from a saliency heuristic otherwise. Composition is a
//! pure function of its inputs, so the same job always renders the same
//! pixels and every target size can be rendered in parallel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Regions, slots, layer order, layout parameters, text styles |
//! | [`imaging`] | Backend trait, cover/contain geometry, saliency, background matte |
//! | [`detection`] | Detector boxes → element slots, with heuristic fallback |
//! | [`ocr`] | OCR lines → text slots by height and position |
//! | [`palette`] | Dominant color sampling |
//! | [`layout`] | Aspect classes, anchor tables, typography, the compositor |
//! | [`job`] | Turns a job file into composition inputs |
//! | [`export`] | Parallel rendering of every target size |
//! | [`config`] | `job.toml` loading, stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Layout Tables Instead of a Solver
//!
//! Each canvas is classified as landscape, portrait, or square, and each class
//! has a fixed table of anchor boxes per layer. Tables are easy to reason
//! about and make output reproducible; a constraint solver would need tuning
//! per campaign and could change results between versions.
//!
//! ## Layers Fail Alone
//!
//! A corrupt element image or a layer that scales to nothing is skipped with
//! a warning and reported in [`layout::Composed`]; the remaining layers are
//! still drawn. Only an unusable canvas size fails a composition.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, and text rasterization run on the `image` crate
//! with no system libraries, so the binary is self-contained.

pub mod config;
pub mod detection;
pub mod export;
pub mod imaging;
pub mod job;
pub mod layout;
pub mod ocr;
pub mod output;
pub mod palette;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
