//! Standard Shader Generator
//!
//! Turns a [`MaterialOptions`] into a [`ProgramDefinition`]. The generator
//! produces the *frontend* (per-feature surface evaluation) and delegates
//! the pass-invariant stages to a [`LitBackend`].
//!
//! # Assembly
//!
//! One call runs through a fresh [`FrontendBuilder`]:
//!
//! 1. Resolve the render pass; unknown ids fall back to forward.
//! 2. Normalize UV sets and channel masks, collect [`UvUsage`], generate the
//!    vertex stage.
//! 3. Normalize shading-model-dependent lit options.
//! 4. Assemble features. Depth-only passes assemble opacity at most; forward
//!    passes walk every feature in a fixed order.
//! 5. Close the frontend: lit arguments, the `evaluateFrontend()` wrapper and
//!    one sampler uniform per shared texture.
//! 6. Generate the fragment stage around the frontend.
//!
//! Options are normalized in place; that is the only mutation visible to the
//! caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::chunks::{ChunkLibrary, ChunkRepository, ChunkSet};
use super::lit_shader::{
    FrontendSource, LitBackend, LitCapabilities, TemplateLitBackend, VertexSemantic,
};
use super::map_composer::{MapComposer, UvUsage, uv_source_expression};
use super::shader_pass::{ShaderPassInfo, ShaderPassRegistry};
use super::source_builder::FrontendBuilder;
use crate::errors::Result;
use crate::renderer::settings::GeneratorSettings;
use crate::resources::features::MapFeature;
use crate::resources::lit_options::{DitherMode, NineSlicedMode};
use crate::resources::material_options::MaterialOptions;
use crate::utils::interner;

/// Name of the generated frontend entry point.
pub const FRONTEND_ENTRY: &str = "evaluateFrontend";

/// A generated program, ready for the device's compile entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramDefinition {
    pub name: String,
    pub vertex_code: String,
    pub fragment_code: String,
    /// Attribute name → semantic.
    pub attributes: BTreeMap<String, VertexSemantic>,
}

/// Generator for standard-material programs.
pub struct StandardShaderGenerator {
    settings: GeneratorSettings,
    chunks: Arc<dyn ChunkRepository>,
    passes: ShaderPassRegistry,
    backend: Box<dyn LitBackend>,
}

impl StandardShaderGenerator {
    /// Generator over the built-in chunks, passes and template backend.
    #[must_use]
    pub fn new(settings: GeneratorSettings) -> Self {
        interner::preload_common_defines();
        Self {
            settings,
            chunks: Arc::new(ChunkLibrary::builtin()),
            passes: ShaderPassRegistry::new(),
            backend: Box::new(TemplateLitBackend::new()),
        }
    }

    #[must_use]
    pub fn with_chunks(mut self, chunks: Arc<dyn ChunkRepository>) -> Self {
        self.chunks = chunks;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: impl LitBackend + 'static) -> Self {
        self.backend = Box::new(backend);
        self
    }

    #[must_use]
    pub fn with_passes(mut self, passes: ShaderPassRegistry) -> Self {
        self.passes = passes;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    #[must_use]
    pub fn passes(&self) -> &ShaderPassRegistry {
        &self.passes
    }

    pub fn passes_mut(&mut self) -> &mut ShaderPassRegistry {
        &mut self.passes
    }

    /// Generates the program for `options`.
    ///
    /// Normalizes `options` in place: UV sets are clamped, channel masks
    /// corrected, `vertex_colors` and `use_heights` raised from the maps and
    /// shading-model-dependent lit options resolved.
    pub fn create_shader_definition(
        &self,
        options: &mut MaterialOptions,
    ) -> Result<ProgramDefinition> {
        let pass = self.passes.resolve(options.lit_options.pass);

        let usage = UvUsage::collect(options);
        options.lit_options.vertex_colors |= options.uses_vertex_color();
        options.lit_options.use_heights |= options.map(MapFeature::Height).map;
        let vertex_code = self
            .backend
            .generate_vertex_shader(&options.lit_options, pass, &usage)?;

        options.lit_options.normalize_shading();

        let options: &MaterialOptions = options;
        let lit = &options.lit_options;
        let chunks = ChunkSet::new(self.chunks.as_ref(), &lit.chunks);

        let mut assembly = Assembly {
            options,
            chunks,
            composer: MapComposer::new(options, chunks, pass, self.settings.placeholder_policy),
            caps: self.backend.capabilities(lit),
            out: FrontendBuilder::new(),
            lighting_uv: None,
        };

        if lit.nine_sliced_mode == NineSlicedMode::Tiled {
            assembly.declare("const float textureBias = -1000.0;");
        } else {
            assembly.declare("uniform float textureBias;");
        }

        if pass.is_forward() {
            assembly.forward(pass)?;
        } else {
            assembly.depth()?;
        }

        let lighting_uv = assembly.lighting_uv.take();
        let frontend = assembly.finish()?;

        let fragment_code = self.backend.generate_fragment_shader(
            lit,
            pass,
            &usage,
            &FrontendSource {
                declarations: &frontend.declarations,
                code: &frontend.code,
                entry: &frontend.entry,
                lighting_uv: lighting_uv.as_deref(),
            },
        )?;

        log::debug!(
            "Generated standard program for pass `{}` ({} samplers)",
            pass.name,
            frontend.sampler_count
        );

        Ok(ProgramDefinition {
            name: format!("standard_{}", pass.name),
            vertex_code,
            fragment_code,
            attributes: self.backend.attributes(lit, pass, &usage),
        })
    }
}

/// Finished frontend sections.
struct Frontend {
    declarations: String,
    code: String,
    entry: String,
    sampler_count: usize,
}

/// One generation call's assembly state.
struct Assembly<'a> {
    options: &'a MaterialOptions,
    chunks: ChunkSet<'a>,
    composer: MapComposer<'a>,
    caps: LitCapabilities,
    out: FrontendBuilder,
    lighting_uv: Option<String>,
}

impl Assembly<'_> {
    fn declare(&mut self, decl: &str) {
        self.out.decl.append(decl);
    }

    fn call(&mut self, func: &str) {
        self.out.func.append(func);
    }

    fn arg(&mut self, arg: &str) {
        self.out.args.append(arg);
    }

    /// Appends an unparameterized chunk to the declarations.
    fn declare_chunk(&mut self, name: &str) -> Result<()> {
        let source = self.chunks.get(name)?;
        self.out.decl.append(source);
        Ok(())
    }

    /// Appends an unparameterized chunk to the code section.
    fn code_chunk(&mut self, name: &str) -> Result<()> {
        let source = self.chunks.get(name)?;
        self.out.code.append(source);
        Ok(())
    }

    /// Composes a feature chunk into the code section.
    fn add_map(&mut self, feature: MapFeature, chunk: &str) -> Result<()> {
        let encoding = feature
            .descriptor()
            .decodes
            .then(|| self.options.map(feature).encoding);
        let composed = self
            .composer
            .compose(feature, chunk, &mut self.out.samplers, encoding)?;
        self.out.legacy_sampling |= composed.legacy_sampling;
        self.out.code.append(&composed.code);
        Ok(())
    }

    fn opacity(&mut self, dither: DitherMode) -> Result<()> {
        self.declare("float dAlpha;");
        self.add_map(MapFeature::Opacity, "opacityPS")?;
        self.call("getOpacity();");
        self.arg("litArgs_opacity = dAlpha;");

        if self.options.lit_options.alpha_test {
            self.code_chunk("alphaTestPS")?;
            self.call("alphaTest(dAlpha);");
        }

        if let Some(mode) = dither.define_suffix() {
            if dither == DitherMode::Bayer8 {
                self.declare_chunk("bayerPS")?;
            }
            self.declare(&format!("#define DITHER_{mode}"));
            self.declare_chunk("opacityDitherPS")?;
            self.call("opacityDither(dAlpha, 0.0);");
        }
        Ok(())
    }

    fn depth(&mut self) -> Result<()> {
        let options = self.options;
        let lit = &options.lit_options;
        if !lit.needs_depth_opacity() {
            return Ok(());
        }

        if options.map(MapFeature::Height).map {
            // no parallax pass here, the offset stays zero
            self.declare("vec2 dUvOffset = vec2(0.0);");
        }
        self.opacity(lit.opacity_shadow_dither)
    }

    fn forward(&mut self, pass: &ShaderPassInfo) -> Result<()> {
        let options = self.options;
        let lit = &options.lit_options;

        // parallax
        if options.map(MapFeature::Height).map {
            self.declare("vec2 dUvOffset;");
            self.add_map(MapFeature::Height, "parallaxPS")?;
            self.call("getParallax();");
        }

        // opacity
        if lit.needs_forward_opacity() {
            self.opacity(lit.opacity_dither)?;
        } else {
            self.declare("float dAlpha = 1.0;");
        }

        // normal
        if self.caps.needs_normal {
            let normal = options.map(MapFeature::Normal).map;
            if normal || options.map(MapFeature::ClearCoatNormal).map {
                self.code_chunk(if options.packed_normal {
                    "normalXYPS"
                } else {
                    "normalXYZPS"
                })?;

                if !lit.has_tangents {
                    let source = if normal {
                        MapFeature::Normal
                    } else {
                        MapFeature::ClearCoatNormal
                    };
                    self.lighting_uv = Some(uv_source_expression(options, source, pass));
                }
            }

            self.declare("vec3 dNormalW;");
            self.add_map(MapFeature::NormalDetail, "normalDetailMapPS")?;
            self.add_map(MapFeature::Normal, "normalMapPS")?;
            self.call("getNormal();");
            self.arg("litArgs_worldNormal = dNormalW;");
        }

        if self.caps.needs_scene_color {
            self.declare("uniform sampler2D uSceneColorMap;");
        }
        if self.caps.needs_screen_size {
            self.declare("uniform vec4 uScreenSize;");
        }
        if self.caps.needs_transforms {
            self.declare("uniform mat4 matrix_viewProjection;");
            self.declare("uniform mat4 matrix_model;");
        }

        if options.map(MapFeature::DiffuseDetail).map || options.map(MapFeature::AoDetail).map {
            self.declare_chunk("detailModesPS")?;
        }

        // albedo
        self.declare("vec3 dAlbedo;");
        self.add_map(MapFeature::DiffuseDetail, "diffuseDetailMapPS")?;
        self.add_map(MapFeature::Diffuse, "diffusePS")?;
        self.call("getAlbedo();");
        self.arg("litArgs_albedo = dAlbedo;");

        if lit.use_refraction {
            self.declare("float dTransmission;");
            self.add_map(MapFeature::Refraction, "transmissionPS")?;
            self.call("getRefraction();");
            self.arg("litArgs_transmission = dTransmission;");

            self.declare("float dThickness;");
            self.add_map(MapFeature::Thickness, "thicknessPS")?;
            self.call("getThickness();");
            self.arg("litArgs_thickness = dThickness;");
        }

        if lit.use_iridescence {
            self.declare("float dIridescence;");
            self.add_map(MapFeature::Iridescence, "iridescencePS")?;
            self.call("getIridescence();");
            self.arg("litArgs_iridescence_intensity = dIridescence;");

            self.declare("float dIridescenceThickness;");
            self.add_map(MapFeature::IridescenceThickness, "iridescenceThicknessPS")?;
            self.call("getIridescenceThickness();");
            self.arg("litArgs_iridescence_thickness = dIridescenceThickness;");
        }

        // specularity & glossiness
        if (self.caps.lighting && lit.use_specular) || self.caps.reflections {
            self.declare("vec3 dSpecularity;");
            self.declare("float dGlossiness;");

            if lit.use_sheen {
                self.declare("vec3 sSpecularity;");
                self.add_map(MapFeature::Sheen, "sheenPS")?;
                self.call("getSheen();");
                self.arg("litArgs_sheen_specularity = sSpecularity;");

                self.declare("float sGlossiness;");
                self.add_map(MapFeature::SheenGloss, "sheenGlossPS")?;
                self.call("getSheenGlossiness();");
                self.arg("litArgs_sheen_gloss = sGlossiness;");
            }

            if lit.use_metalness {
                self.declare("float dMetalness;");
                self.add_map(MapFeature::Metalness, "metalnessPS")?;
                self.call("getMetalness();");
                self.arg("litArgs_metalness = dMetalness;");

                self.declare("float dIor;");
                self.add_map(MapFeature::Ior, "iorPS")?;
                self.call("getIor();");
                self.arg("litArgs_ior = dIor;");
            }

            if lit.use_specularity_factor {
                self.declare("float dSpecularityFactor;");
                self.add_map(MapFeature::SpecularityFactor, "specularityFactorPS")?;
                self.call("getSpecularityFactor();");
                self.arg("litArgs_specularityFactor = dSpecularityFactor;");
            }

            if options.use_specular_color {
                self.add_map(MapFeature::Specular, "specularPS")?;
            } else {
                self.out
                    .code
                    .append("void getSpecularity() { dSpecularity = vec3(1); }");
            }
            self.call("getSpecularity();");
            self.arg("litArgs_specularity = dSpecularity;");

            self.add_map(MapFeature::Gloss, "glossPS")?;
            self.call("getGlossiness();");
            self.arg("litArgs_gloss = dGlossiness;");
        } else {
            self.declare("vec3 dSpecularity = vec3(0.0);");
            self.declare("float dGlossiness = 0.0;");
        }

        // ao
        let ao = options.map(MapFeature::Ao);
        if ao.map || ao.vertex_color {
            self.declare("float dAo;");
            self.add_map(MapFeature::AoDetail, "aoDetailMapPS")?;
            self.add_map(MapFeature::Ao, "aoPS")?;
            self.call("getAO();");
            self.arg("litArgs_ao = dAo;");
        }

        // emission
        self.declare("vec3 dEmission;");
        self.add_map(MapFeature::Emissive, "emissivePS")?;
        self.call("getEmission();");
        self.arg("litArgs_emission = dEmission;");

        if lit.use_clear_coat {
            self.declare("float ccSpecularity;");
            self.declare("float ccGlossiness;");
            self.declare("vec3 ccNormalW;");

            self.add_map(MapFeature::ClearCoat, "clearCoatPS")?;
            self.add_map(MapFeature::ClearCoatGloss, "clearCoatGlossPS")?;
            self.add_map(MapFeature::ClearCoatNormal, "clearCoatNormalPS")?;

            self.call("getClearCoat();");
            self.call("getClearCoatGlossiness();");
            self.call("getClearCoatNormal();");

            self.arg("litArgs_clearcoat_specularity = ccSpecularity;");
            self.arg("litArgs_clearcoat_gloss = ccGlossiness;");
            self.arg("litArgs_clearcoat_worldNormal = ccNormalW;");
        }

        // lightmap
        let light = options.map(MapFeature::Light);
        if light.map || light.vertex_color {
            let directional = options.dir_light_map && lit.use_specular;
            if directional {
                self.declare("vec3 dLightmapDir;");
                self.arg("litArgs_lightmapDir = dLightmapDir;");
            }
            self.declare("vec3 dLightmap;");
            self.add_map(
                MapFeature::Light,
                if directional {
                    "lightmapDirPS"
                } else {
                    "lightmapSinglePS"
                },
            )?;
            self.call("getLightMap();");
            self.arg("litArgs_lightmap = dLightmap;");
        }

        if self.out.legacy_sampling {
            let helpers = self.chunks.get("textureSamplePS")?;
            self.out.decl.prepend(helpers);
        }

        Ok(())
    }

    /// Closes the frontend and consumes the builder.
    fn finish(mut self) -> Result<Frontend> {
        self.declare_chunk("litShaderArgsPS")?;

        let FrontendBuilder {
            mut decl,
            mut code,
            func,
            args,
            samplers,
            ..
        } = self.out;

        code.append(&format!(
            "void {FRONTEND_ENTRY}() {{\n{}\n{}\n }}\n",
            func.as_str(),
            args.as_str()
        ));

        for name in samplers.names() {
            decl.append(&format!("uniform sampler2D {name};"));
        }

        Ok(Frontend {
            declarations: decl.into_string(),
            code: code.into_string(),
            entry: format!("\n    {FRONTEND_ENTRY}();\n\n"),
            sampler_count: samplers.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pipeline::shader_pass::{SHADER_DEPTH, SHADER_SHADOW};
    use crate::resources::lit_options::{BlendType, ShadingModel};
    use crate::resources::material_options::MapOptions;
    use crate::resources::texture::TextureKey;

    fn generator() -> StandardShaderGenerator {
        StandardShaderGenerator::new(GeneratorSettings::default())
    }

    #[test]
    fn default_forward_program_has_core_features() {
        let mut options = MaterialOptions::new();
        let program = generator().create_shader_definition(&mut options).unwrap();

        assert_eq!(program.name, "standard_forward");
        let fs = &program.fragment_code;
        assert!(fs.contains("float dAlpha = 1.0;"));
        assert!(fs.contains("void getAlbedo()"));
        assert!(fs.contains("void getEmission()"));
        assert!(fs.contains("litArgs_albedo = dAlbedo;"));
        assert!(fs.contains("void evaluateFrontend() {"));
        assert!(fs.contains("uniform float textureBias;"));
        assert!(!fs.contains("uniform sampler2D texture_"));
        assert!(!fs.contains('$'));
    }

    #[test]
    fn frontend_calls_follow_assembly_order() {
        let mut options = MaterialOptions::new()
            .with_map(MapFeature::Height, MapOptions::new(MapFeature::Height).with_texture(1))
            .with_map(MapFeature::Ao, MapOptions::new(MapFeature::Ao).with_texture(2));
        options.lit_options.blend_type = BlendType::Normal;
        options.lit_options.light_count = 1;

        let program = generator().create_shader_definition(&mut options).unwrap();
        let fs = &program.fragment_code;

        let order = [
            "getParallax();",
            "getOpacity();",
            "getNormal();",
            "getAlbedo();",
            "getSpecularity();",
            "getGlossiness();",
            "getAO();",
            "getEmission();",
        ];
        let positions: Vec<usize> = order.iter().map(|call| fs.find(call).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn depth_pass_without_alpha_has_no_opacity() {
        let mut options = MaterialOptions::new().with_map(
            MapFeature::Opacity,
            MapOptions::new(MapFeature::Opacity).with_texture(3),
        );
        options.lit_options.pass = SHADER_SHADOW;

        let program = generator().create_shader_definition(&mut options).unwrap();
        assert!(!program.fragment_code.contains("getOpacity"));
        assert!(!program.fragment_code.contains("getAlbedo"));
    }

    #[test]
    fn depth_pass_with_alpha_test_assembles_opacity_only() {
        let mut options = MaterialOptions::new().with_map(
            MapFeature::Opacity,
            MapOptions::new(MapFeature::Opacity).with_texture(3),
        );
        options.lit_options.pass = SHADER_DEPTH;
        options.lit_options.alpha_test = true;
        options.lit_options.opacity_shadow_dither = DitherMode::Bayer8;

        let program = generator().create_shader_definition(&mut options).unwrap();
        let fs = &program.fragment_code;
        assert!(fs.contains("getOpacity();"));
        assert!(fs.contains("alphaTest(dAlpha);"));
        assert!(fs.contains("#define DITHER_BAYER8"));
        assert!(fs.contains("float bayer8("));
        assert!(fs.contains("opacityDither(dAlpha, 0.0);"));
        assert!(fs.contains("uniform sampler2D texture_opacityMap;"));
        assert!(!fs.contains("getAlbedo"));
    }

    #[test]
    fn tiled_mode_uses_constant_bias() {
        let mut options = MaterialOptions::new();
        options.lit_options.nine_sliced_mode = NineSlicedMode::Tiled;
        let program = generator().create_shader_definition(&mut options).unwrap();
        assert!(program.fragment_code.contains("const float textureBias = -1000.0;"));
        assert!(!program.fragment_code.contains("uniform float textureBias;"));
    }

    #[test]
    fn phong_is_normalized_in_place() {
        let mut options = MaterialOptions::new();
        options.lit_options.shading_model = ShadingModel::Phong;
        options.lit_options.ambient_sh = true;
        generator().create_shader_definition(&mut options).unwrap();
        assert_eq!(options.lit_options.fresnel_model as u8, 0);
        assert!(!options.lit_options.ambient_sh);
    }

    #[test]
    fn tangentless_normal_map_sets_lighting_uv() {
        let mut options = MaterialOptions::new().with_map(
            MapFeature::Normal,
            MapOptions::new(MapFeature::Normal)
                .with_texture(TextureKey(4))
                .with_uv(1),
        );
        let program = generator().create_shader_definition(&mut options).unwrap();
        assert!(program.fragment_code.contains("cotangentFrame(dVertexNormalW, vPositionW, vUv1)"));
        assert!(program.fragment_code.contains("vec3 unpackNormal(vec4 nmap)"));
    }

    #[test]
    fn directional_lightmap_needs_specular() {
        let mut options = MaterialOptions::new().with_map(
            MapFeature::Light,
            MapOptions::new(MapFeature::Light).with_texture(8).with_uv(1),
        );
        options.dir_light_map = true;

        let program = generator().create_shader_definition(&mut options.clone()).unwrap();
        assert!(program.fragment_code.contains("litArgs_lightmapDir = dLightmapDir;"));

        options.lit_options.use_specular = false;
        let program = generator().create_shader_definition(&mut options).unwrap();
        assert!(!program.fragment_code.contains("dLightmapDir;"));
        assert!(program.fragment_code.contains("litArgs_lightmap = dLightmap;"));
    }
}
