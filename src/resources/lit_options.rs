//! Lighting Options
//!
//! The nested option subset consumed by the lit backend: render pass,
//! blending and alpha handling, shading model, which physically based
//! features are active, output transforms and per-material chunk overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::renderer::pipeline::shader_pass::SHADER_FORWARD;

/// Blending of the material's output with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendType {
    #[default]
    None,
    Normal,
    Additive,
    Premultiplied,
    Multiplicative,
}

/// Opacity dithering pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DitherMode {
    #[default]
    None,
    Bayer8,
    BlueNoise,
    IgnNoise,
}

impl DitherMode {
    /// Suffix of the `DITHER_<MODE>` define. `None` for no dithering.
    #[must_use]
    pub fn define_suffix(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Bayer8 => Some("BAYER8"),
            Self::BlueNoise => Some("BLUENOISE"),
            Self::IgnNoise => Some("IGNNOISE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ShadingModel {
    Phong = 0,
    #[default]
    Blinn = 1,
}

/// Fresnel approximation. `None` doubles as "unset" until normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FresnelModel {
    #[default]
    None = 0,
    Schlick = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FogMode {
    #[default]
    None,
    Linear,
    Exp,
    Exp2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GammaMode {
    None,
    #[default]
    Srgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMapping {
    #[default]
    Linear,
    Filmic,
    Hejl,
    Aces,
    Aces2,
    Neutral,
}

/// Sprite/UI rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NineSlicedMode {
    #[default]
    Simple,
    Sliced,
    Tiled,
}

impl NineSlicedMode {
    /// Sliced and tiled modes replace per-map UVs with the border-aware UV.
    #[inline]
    #[must_use]
    pub fn overrides_uv(self) -> bool {
        matches!(self, Self::Sliced | Self::Tiled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectionSource {
    #[default]
    None,
    EnvAtlas,
    Cubemap,
    Sphere,
}

/// Options shared with the lit backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LitOptions {
    /// Render pass id, resolved through the
    /// [`ShaderPassRegistry`](crate::renderer::pipeline::ShaderPassRegistry).
    pub pass: u32,
    pub blend_type: BlendType,
    pub alpha_test: bool,
    pub alpha_to_coverage: bool,
    pub opacity_dither: DitherMode,
    pub opacity_shadow_dither: DitherMode,
    pub has_tangents: bool,
    pub shading_model: ShadingModel,
    pub fresnel_model: FresnelModel,
    pub ambient_sh: bool,
    pub clustered_lighting_enabled: bool,
    /// Number of non-clustered lights affecting the material.
    pub light_count: u32,
    pub dir_light_map_enabled: bool,
    pub reflection_source: ReflectionSource,
    /// The mesh provides a vertex colour attribute that some feature reads.
    pub vertex_colors: bool,
    /// A height map drives parallax; the frontend needs a tangent frame.
    pub use_heights: bool,
    pub use_specular: bool,
    pub use_metalness: bool,
    pub use_sheen: bool,
    pub use_iridescence: bool,
    pub use_clear_coat: bool,
    pub use_refraction: bool,
    pub use_dynamic_refraction: bool,
    pub use_specularity_factor: bool,
    pub fog: FogMode,
    pub gamma: GammaMode,
    pub tone_map: ToneMapping,
    pub nine_sliced_mode: NineSlicedMode,
    /// Chunk overrides, by chunk name. Take precedence over the repository.
    pub chunks: BTreeMap<String, String>,
}

impl Default for LitOptions {
    fn default() -> Self {
        Self {
            pass: SHADER_FORWARD,
            blend_type: BlendType::None,
            alpha_test: false,
            alpha_to_coverage: false,
            opacity_dither: DitherMode::None,
            opacity_shadow_dither: DitherMode::None,
            has_tangents: false,
            shading_model: ShadingModel::Blinn,
            fresnel_model: FresnelModel::None,
            ambient_sh: false,
            clustered_lighting_enabled: false,
            light_count: 0,
            dir_light_map_enabled: false,
            reflection_source: ReflectionSource::None,
            vertex_colors: false,
            use_heights: false,
            use_specular: true,
            use_metalness: false,
            use_sheen: false,
            use_iridescence: false,
            use_clear_coat: false,
            use_refraction: false,
            use_dynamic_refraction: false,
            use_specularity_factor: false,
            fog: FogMode::None,
            gamma: GammaMode::Srgb,
            tone_map: ToneMapping::Linear,
            nine_sliced_mode: NineSlicedMode::Simple,
            chunks: BTreeMap::new(),
        }
    }
}

impl LitOptions {
    /// Resolves shading-model-dependent options.
    ///
    /// Phong has no Fresnel term and no spherical-harmonics ambient. Other
    /// models promote an unset Fresnel model to Schlick.
    pub fn normalize_shading(&mut self) {
        if self.shading_model == ShadingModel::Phong {
            self.fresnel_model = FresnelModel::None;
            self.ambient_sh = false;
        } else if self.fresnel_model == FresnelModel::None {
            self.fresnel_model = FresnelModel::Schlick;
        }
    }

    /// Whether any opacity handling is requested for the forward pass.
    #[must_use]
    pub fn needs_forward_opacity(&self) -> bool {
        self.blend_type != BlendType::None
            || self.alpha_test
            || self.alpha_to_coverage
            || self.opacity_dither != DitherMode::None
    }

    /// Whether any opacity handling is requested for depth/shadow passes.
    #[must_use]
    pub fn needs_depth_opacity(&self) -> bool {
        self.alpha_test || self.alpha_to_coverage || self.opacity_shadow_dither != DitherMode::None
    }
}
