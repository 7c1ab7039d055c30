//! Lit Backend
//!
//! The lit backend owns everything that does not depend on individual map
//! features: the vertex stage, varyings, the fragment stage wrapper and the
//! output stage. The standard generator only produces the *frontend* (the
//! surface evaluation) and hands it over as a [`FrontendSource`].
//!
//! [`TemplateLitBackend`] renders both stages from the embedded
//! `templates/lit_vertex.glsl` and `templates/lit_fragment.glsl` through the
//! shared minijinja environment. Varyings come from one shared include so the
//! two stages always agree on them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::map_composer::{MAX_UV_SETS, UvUsage};
use super::shader_manager::get_env;
use super::shader_pass::ShaderPassInfo;
use crate::errors::Result;
use crate::resources::lit_options::{
    FogMode, GammaMode, LitOptions, ReflectionSource, ToneMapping,
};
use crate::resources::shader_defines::ShaderDefines;

pub const VERTEX_TEMPLATE: &str = "templates/lit_vertex.glsl";
pub const FRAGMENT_TEMPLATE: &str = "templates/lit_fragment.glsl";

/// Meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VertexSemantic {
    Position,
    Normal,
    Tangent,
    TexCoord0,
    TexCoord1,
    Color,
}

impl VertexSemantic {
    #[must_use]
    pub fn tex_coord(set: u32) -> Self {
        if set == 0 { Self::TexCoord0 } else { Self::TexCoord1 }
    }
}

/// What the lit backend needs from the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LitCapabilities {
    /// The backend consumes a world-space normal.
    pub needs_normal: bool,
    /// The backend samples the scene colour (dynamic refraction).
    pub needs_scene_color: bool,
    pub needs_screen_size: bool,
    /// The backend needs `matrix_model` / `matrix_viewProjection` in the
    /// fragment stage.
    pub needs_transforms: bool,
    /// Some direct or baked lighting is evaluated.
    pub lighting: bool,
    /// An environment reflection source is bound.
    pub reflections: bool,
}

/// Generated frontend, as handed to [`LitBackend::generate_fragment_shader`].
#[derive(Debug, Clone, Copy)]
pub struct FrontendSource<'a> {
    /// Globals: feature variables, uniforms, samplers and helper chunks.
    pub declarations: &'a str,
    /// Feature chunk bodies followed by the frontend wrapper function.
    pub code: &'a str,
    /// Statement(s) that evaluate the frontend inside `main`.
    pub entry: &'a str,
    /// UV expression for a derivative-based tangent frame, when the mesh has
    /// no tangents.
    pub lighting_uv: Option<&'a str>,
}

/// Pass-invariant shader generation.
pub trait LitBackend: Send + Sync {
    fn capabilities(&self, lit: &LitOptions) -> LitCapabilities;

    fn generate_vertex_shader(
        &self,
        lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
    ) -> Result<String>;

    fn generate_fragment_shader(
        &self,
        lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
        frontend: &FrontendSource<'_>,
    ) -> Result<String>;

    /// Attribute name → semantic for the generated vertex stage.
    fn attributes(
        &self,
        lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
    ) -> BTreeMap<String, VertexSemantic>;
}

// ─── Template backend ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct UvSetContext {
    index: u32,
    unmodified: bool,
}

#[derive(Serialize)]
struct TransformContext {
    uniform: String,
    id: u32,
    uv: u32,
}

#[derive(Serialize)]
struct StageContext<'a> {
    pass_name: &'a str,
    forward: bool,
    defines: String,
    uv_sets: Vec<UvSetContext>,
    transforms: Vec<TransformContext>,
    normals: bool,
    tangents: bool,
    vertex_colors: bool,
    nine_sliced: bool,
}

#[derive(Serialize)]
struct FragmentContext<'a> {
    #[serde(flatten)]
    stage: StageContext<'a>,
    declarations: &'a str,
    code: &'a str,
    entry: &'a str,
    lighting_uv: Option<&'a str>,
}

/// Lit backend rendering the embedded GLSL templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateLitBackend;

impl TemplateLitBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn stage_context<'a>(
        &self,
        lit: &LitOptions,
        pass: &'a ShaderPassInfo,
        usage: &UvUsage,
    ) -> StageContext<'a> {
        let forward = pass.is_forward();
        let normals = forward && self.capabilities(lit).needs_normal;
        let nine_sliced = forward && lit.nine_sliced_mode.overrides_uv();

        let uv_sets = (0..MAX_UV_SETS)
            .filter(|&set| usage.used[set as usize] || (set == 0 && nine_sliced))
            .map(|set| UvSetContext {
                index: set,
                unmodified: usage.unmodified[set as usize],
            })
            .collect();

        let mut transforms: Vec<TransformContext> = Vec::with_capacity(usage.transforms.len());
        for t in &usage.transforms {
            if transforms.iter().any(|seen| seen.id == t.transform && seen.uv == t.uv) {
                continue;
            }
            transforms.push(TransformContext {
                uniform: format!("{}Transform", t.feature.sampler_name()),
                id: t.transform,
                uv: t.uv,
            });
        }

        StageContext {
            pass_name: &pass.name,
            forward,
            defines: header_defines(lit, pass).to_preprocessor(),
            uv_sets,
            transforms,
            normals,
            tangents: normals && lit.has_tangents,
            vertex_colors: lit.vertex_colors,
            nine_sliced,
        }
    }
}

impl LitBackend for TemplateLitBackend {
    fn capabilities(&self, lit: &LitOptions) -> LitCapabilities {
        let lighting =
            lit.light_count > 0 || lit.dir_light_map_enabled || lit.clustered_lighting_enabled;
        let reflections = lit.reflection_source != ReflectionSource::None;
        LitCapabilities {
            needs_normal: lighting
                || reflections
                || lit.use_heights
                || lit.use_specular
                || lit.ambient_sh
                || lit.use_clear_coat,
            needs_scene_color: lit.use_dynamic_refraction,
            needs_screen_size: lit.use_dynamic_refraction,
            needs_transforms: lit.use_dynamic_refraction,
            lighting,
            reflections,
        }
    }

    fn generate_vertex_shader(
        &self,
        lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
    ) -> Result<String> {
        let ctx = self.stage_context(lit, pass, usage);
        let template = get_env().get_template(VERTEX_TEMPLATE)?;
        Ok(template.render(&ctx)?)
    }

    fn generate_fragment_shader(
        &self,
        lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
        frontend: &FrontendSource<'_>,
    ) -> Result<String> {
        let ctx = FragmentContext {
            stage: self.stage_context(lit, pass, usage),
            declarations: frontend.declarations,
            code: frontend.code,
            entry: frontend.entry,
            lighting_uv: frontend.lighting_uv,
        };
        let template = get_env().get_template(FRAGMENT_TEMPLATE)?;
        Ok(template.render(&ctx)?)
    }

    fn attributes(
        &self,
        lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
    ) -> BTreeMap<String, VertexSemantic> {
        let ctx = self.stage_context(lit, pass, usage);

        let mut attributes = BTreeMap::new();
        attributes.insert("vertex_position".to_string(), VertexSemantic::Position);
        if ctx.normals {
            attributes.insert("vertex_normal".to_string(), VertexSemantic::Normal);
        }
        if ctx.tangents {
            attributes.insert("vertex_tangent".to_string(), VertexSemantic::Tangent);
        }
        for set in &ctx.uv_sets {
            attributes.insert(
                format!("vertex_texCoord{}", set.index),
                VertexSemantic::tex_coord(set.index),
            );
        }
        if ctx.vertex_colors {
            attributes.insert("vertex_color".to_string(), VertexSemantic::Color);
        }
        attributes
    }
}

/// Pass define plus output-stage defines.
fn header_defines(lit: &LitOptions, pass: &ShaderPassInfo) -> ShaderDefines {
    let mut defines = pass.defines.clone();

    if lit.has_tangents {
        defines.flag("HAS_TANGENTS");
    }
    if lit.ambient_sh {
        defines.flag("LIT_AMBIENT_SH");
    }
    if lit.clustered_lighting_enabled {
        defines.flag("LIT_CLUSTERED_LIGHTS");
    }
    if lit.gamma == GammaMode::Srgb {
        defines.flag("GAMMA_SRGB");
    }

    match lit.fog {
        FogMode::None => {}
        FogMode::Linear => defines.flag("FOG_LINEAR"),
        FogMode::Exp => defines.flag("FOG_EXP"),
        FogMode::Exp2 => defines.flag("FOG_EXP2"),
    }

    let tone_map = match lit.tone_map {
        ToneMapping::Linear => "TONEMAP_LINEAR",
        ToneMapping::Filmic => "TONEMAP_FILMIC",
        ToneMapping::Hejl => "TONEMAP_HEJL",
        ToneMapping::Aces => "TONEMAP_ACES",
        ToneMapping::Aces2 => "TONEMAP_ACES2",
        ToneMapping::Neutral => "TONEMAP_NEUTRAL",
    };
    defines.flag(tone_map);

    defines
}
