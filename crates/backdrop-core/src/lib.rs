//! Procedural ray-marched backdrop pipeline.
//!
//! Everything in this crate is platform independent. The web and native
//! frontends feed it a frame delta, a pointer sample and a viewport size, and
//! get back an RGBA buffer.
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod march;
pub mod math;
pub mod motion;
pub mod pointer;
pub mod preset;
pub mod render;
pub mod scene;
pub mod sdf;
pub mod shade;

pub use camera::Camera;
pub use config::{EdgeFade, MarchConfig, Palette, SceneConfig, SceneKind, ShapeKind};
pub use constants::*;
pub use error::ConfigError;
pub use frame::{FrameDriver, FrameParams, Viewport};
pub use march::{march, march_observed, MarchResult, MarchSample, MarchSettings};
pub use motion::{MovementPattern, PrimitiveTraits};
pub use pointer::{ndc_from_pixel, PointerState};
pub use preset::Preset;
pub use render::{
    composite, pixel_ndc, render_frame, trace_pixel, Framebuffer, OutputSettings, PixelSample,
};
pub use scene::{FieldScene, MorphScene, Primitive, SceneFunction};
pub use sdf::{smooth_union, Sdf};
pub use shade::{calc_normal, shade, Light, LightKind, Lights, Shaded, ShadingParams};
