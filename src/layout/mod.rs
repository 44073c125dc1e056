//! Multi-layer ad composition.
//!
//! | Piece | Role |
//! |---|---|
//! | [`aspect`] | Portrait / landscape / square classification of a target size |
//! | [`anchors`] | Default box per image layer and aspect class, plus user nudges |
//! | [`typography`] | Golden-ratio type scale and text baselines |
//! | [`text`] | Bitmap face rasterizer, fill and blurred drop shadow |
//! | `compose` | The layer loop that paints one canvas |
//!
//! Everything here is a pure function of its inputs: the same slots, texts,
//! order and layout at the same size always produce the same pixels.

pub mod anchors;
pub mod aspect;
mod compose;
pub mod text;
pub mod typography;

pub use aspect::AspectClass;
pub use compose::{
    BackgroundFill, ComposeError, Composed, EXTERNAL_MAIN_SCALE, GRADIENT_FROM, GRADIENT_TO,
    LayerError, Scene, SkippedLayer, ai_background_layout, compose,
    compose_over_external_background, compose_scene, compose_scene_over,
};
