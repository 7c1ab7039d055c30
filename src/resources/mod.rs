//! Option and Resource Definitions
//!
//! Plain data consumed by the shader generator, independent of any GPU API:
//! - [`MaterialOptions`]: per-material configuration
//! - [`LitOptions`]: lighting-specific option subset
//! - [`MapFeature`]: the typed table of map-like features
//! - [`ShaderDefines`]: preprocessor define sets
//! - [`TextureKey`] / [`TextureEncoding`]: texture identity and encoding

pub mod features;
pub mod lit_options;
pub mod material_options;
pub mod shader_defines;
pub mod texture;

pub use features::{FeatureDescriptor, MapFeature};
pub use lit_options::{
    BlendType, DitherMode, FogMode, FresnelModel, GammaMode, LitOptions, NineSlicedMode,
    ReflectionSource, ShadingModel, ToneMapping,
};
pub use material_options::{DetailMode, FeatureMaps, MapOptions, MaterialOptions, Tint};
pub use shader_defines::ShaderDefines;
pub use texture::{TextureEncoding, TextureKey};
