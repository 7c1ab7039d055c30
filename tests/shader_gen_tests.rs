//! Standard Shader Generator Tests
//!
//! Tests for:
//! - Frontend assembly per pass kind (forward vs depth-only)
//! - UV source expressions (identity, transforms, parallax, nine-slicing)
//! - Channel mask correction and alpha-only decoding
//! - Sampler sharing by texture identity
//! - Placeholder policy and chunk overrides
//! - The lit backend seam

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use myth_shadergen::renderer::pipeline::lit_shader::{
    FrontendSource, LitBackend, LitCapabilities, VertexSemantic,
};
use myth_shadergen::renderer::pipeline::map_composer::UvUsage;
use myth_shadergen::renderer::pipeline::shader_pass::{
    PassKind, SHADER_DEPTH, SHADER_FORWARD_HDR, SHADER_SHADOW, ShaderPassInfo,
};
use myth_shadergen::resources::lit_options::{
    DitherMode, FresnelModel, NineSlicedMode, ShadingModel,
};
use myth_shadergen::{
    ChunkLibrary, GeneratorSettings, LitOptions, MapFeature, MapOptions, MaterialOptions,
    PlaceholderPolicy, ShaderGenError, StandardShaderGenerator, TextureEncoding, TextureKey,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn generator() -> StandardShaderGenerator {
    init_logging();
    StandardShaderGenerator::new(GeneratorSettings::default())
}

fn textured(feature: MapFeature, id: u64) -> MapOptions {
    MapOptions::new(feature).with_texture(id)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn diffuse_map_uses_base_uv_and_rgb() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new().with_map(
        MapFeature::Diffuse,
        textured(MapFeature::Diffuse, 1).with_uv(0).with_transform(0).with_channel("rgb"),
    );

    let program = generator().create_shader_definition(&mut options)?;

    assert!(
        program
            .fragment_code
            .contains("decodeLinear(texture2D(texture_diffuseMap, vUv0, textureBias)).rgb")
    );
    assert!(program.fragment_code.contains("uniform sampler2D texture_diffuseMap;"));
    assert_eq!(program.attributes["vertex_texCoord0"], VertexSemantic::TexCoord0);
    Ok(())
}

#[test]
fn parallax_offsets_every_map_but_height() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Height, textured(MapFeature::Height, 1))
        .with_map(MapFeature::Normal, textured(MapFeature::Normal, 2).with_transform(0));

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;

    assert!(fs.contains("texture2D(texture_normalMap, vUv0 + dUvOffset, textureBias)"));
    assert!(fs.contains("texture2D(texture_heightMap, vUv0, textureBias)"));
    assert!(!fs.contains("texture_heightMap, vUv0 + dUvOffset"));
    assert!(fs.contains("vec2 dUvOffset;"));
    Ok(())
}

#[test]
fn phong_normalizes_fresnel_and_ambient_sh() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new();
    options.lit_options.shading_model = ShadingModel::Phong;
    options.lit_options.ambient_sh = true;

    generator().create_shader_definition(&mut options)?;

    assert_eq!(options.lit_options.fresnel_model, FresnelModel::None);
    assert!(!options.lit_options.ambient_sh);
    Ok(())
}

#[test]
fn depth_pass_without_alpha_handling_skips_opacity() -> anyhow::Result<()> {
    for pass in [SHADER_DEPTH, SHADER_SHADOW] {
        let mut options = MaterialOptions::new()
            .with_map(MapFeature::Opacity, textured(MapFeature::Opacity, 1));
        options.lit_options.pass = pass;
        options.lit_options.alpha_test = false;
        options.lit_options.opacity_shadow_dither = DitherMode::None;

        let program = generator().create_shader_definition(&mut options)?;
        assert!(!program.fragment_code.contains("getOpacity"));
        assert!(!program.fragment_code.contains("opacityPS"));
        assert!(!program.fragment_code.contains("uniform sampler2D"));
    }
    Ok(())
}

#[test]
fn depth_pass_with_alpha_to_coverage_keeps_opacity() -> anyhow::Result<()> {
    let mut options =
        MaterialOptions::new().with_map(MapFeature::Opacity, textured(MapFeature::Opacity, 1));
    options.lit_options.pass = SHADER_DEPTH;
    options.lit_options.alpha_to_coverage = true;

    let program = generator().create_shader_definition(&mut options)?;
    assert!(program.fragment_code.contains("getOpacity();"));
    assert!(!program.fragment_code.contains("alphaTest(dAlpha);"));
    Ok(())
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn generation_is_deterministic() -> anyhow::Result<()> {
    let make = || {
        let mut options = MaterialOptions::new()
            .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1).with_transform(2))
            .with_map(MapFeature::Normal, textured(MapFeature::Normal, 2))
            .with_map(MapFeature::Gloss, textured(MapFeature::Gloss, 3).with_uv(1))
            .with_map(MapFeature::Ao, MapOptions::new(MapFeature::Ao).with_vertex_color("r"));
        options.lit_options.light_count = 2;
        options.lit_options.use_metalness = true;
        options
    };

    let generator = generator();
    let mut first = make();
    let mut second = make();
    let a = generator.create_shader_definition(&mut first)?;
    let b = generator.create_shader_definition(&mut second)?;
    let c = generator.create_shader_definition(&mut first)?;

    assert_eq!(a, b);
    assert_eq!(a, c);
    Ok(())
}

// ============================================================================
// Sampler sharing
// ============================================================================

#[test]
fn shared_texture_declares_one_sampler() -> anyhow::Result<()> {
    let shared = TextureKey(77);
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Opacity, MapOptions::new(MapFeature::Opacity).with_texture(shared))
        .with_map(MapFeature::Diffuse, MapOptions::new(MapFeature::Diffuse).with_texture(shared))
        .with_map(MapFeature::Emissive, MapOptions::new(MapFeature::Emissive).with_texture(shared));
    options.lit_options.alpha_test = true;

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;

    assert_eq!(fs.matches("uniform sampler2D ").count(), 1);
    assert_eq!(fs.matches("uniform sampler2D texture_opacityMap;").count(), 1);
    assert!(fs.contains("texture2D(texture_opacityMap, vUv0, textureBias).a"));
    assert!(fs.contains("decodeLinear(texture2D(texture_opacityMap, vUv0, textureBias)).rgb"));
    assert!(!fs.contains("texture_diffuseMap"));
    assert!(!fs.contains("texture_emissiveMap"));
    Ok(())
}

#[test]
fn distinct_textures_get_distinct_samplers() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1))
        .with_map(MapFeature::Emissive, textured(MapFeature::Emissive, 2));

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(fs.contains("uniform sampler2D texture_diffuseMap;"));
    assert!(fs.contains("uniform sampler2D texture_emissiveMap;"));
    assert_eq!(fs.matches("uniform sampler2D ").count(), 2);
    Ok(())
}

// ============================================================================
// Channels & decoding
// ============================================================================

#[test]
fn channel_masks_are_corrected_in_place() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1).with_channel("rgba"))
        .with_map(MapFeature::Emissive, textured(MapFeature::Emissive, 2).with_channel("r"))
        .with_map(MapFeature::Gloss, textured(MapFeature::Gloss, 3).with_channel("ga"));

    let program = generator().create_shader_definition(&mut options)?;

    assert_eq!(options.maps[MapFeature::Diffuse].channel, "rgb");
    assert_eq!(options.maps[MapFeature::Emissive].channel, "rrr");
    assert_eq!(options.maps[MapFeature::Gloss].channel, "g");
    assert!(program.fragment_code.contains("textureBias)).rrr"));
    Ok(())
}

#[test]
fn alpha_only_mask_never_decodes() -> anyhow::Result<()> {
    for encoding in [
        TextureEncoding::Linear,
        TextureEncoding::Srgb,
        TextureEncoding::Rgbm,
        TextureEncoding::Rgbe,
        TextureEncoding::Rgbp,
    ] {
        let mut options = MaterialOptions::new().with_map(
            MapFeature::Emissive,
            textured(MapFeature::Emissive, 1)
                .with_channel("aaa")
                .with_encoding(encoding),
        );

        let program = generator().create_shader_definition(&mut options)?;
        assert!(
            program
                .fragment_code
                .contains("passThrough(texture2D(texture_emissiveMap, vUv0, textureBias)).aaa"),
            "{encoding:?}"
        );
    }
    Ok(())
}

#[test]
fn srgb_without_gamma_decodes_linear() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new().with_map(
        MapFeature::Diffuse,
        textured(MapFeature::Diffuse, 1).with_encoding(TextureEncoding::Srgb),
    );
    let program = generator().create_shader_definition(&mut options.clone())?;
    assert!(program.fragment_code.contains("decodeGamma(texture2D(texture_diffuseMap"));

    options.lit_options.gamma = myth_shadergen::resources::GammaMode::None;
    let program = generator().create_shader_definition(&mut options)?;
    assert!(program.fragment_code.contains("decodeLinear(texture2D(texture_diffuseMap"));
    Ok(())
}

// ============================================================================
// UV expressions
// ============================================================================

#[test]
fn uv_sets_are_clamped() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1).with_uv(7));

    let program = generator().create_shader_definition(&mut options)?;
    assert_eq!(options.maps[MapFeature::Diffuse].uv, 1);
    assert!(program.fragment_code.contains("texture_diffuseMap, vUv1,"));
    assert!(program.vertex_code.contains("vUv1 = uv1;"));
    Ok(())
}

#[test]
fn transformed_maps_read_transformed_varyings() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Gloss, textured(MapFeature::Gloss, 1).with_uv(1).with_transform(2));
    options.lit_options.light_count = 1;

    let program = generator().create_shader_definition(&mut options)?;
    assert!(program.fragment_code.contains("texture2D(texture_glossMap, vUV1_2, textureBias)"));
    assert!(program.vertex_code.contains(
        "vUV1_2 = vec2(dot(vec3(uv1, 1.0), texture_glossMapTransform0), dot(vec3(uv1, 1.0), texture_glossMapTransform1));"
    ));
    assert!(program.vertex_code.contains("uniform vec3 texture_glossMapTransform0;"));
    Ok(())
}

#[test]
fn force_uv1_emits_second_set() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new();
    options.force_uv1 = true;

    let program = generator().create_shader_definition(&mut options)?;
    assert!(program.vertex_code.contains("attribute vec2 vertex_texCoord1;"));
    assert!(program.vertex_code.contains("vUv1 = uv1;"));
    assert!(!program.vertex_code.contains("vertex_texCoord0"));
    Ok(())
}

#[test]
fn nine_slicing_overrides_every_forward_uv() -> anyhow::Result<()> {
    for mode in [NineSlicedMode::Sliced, NineSlicedMode::Tiled] {
        for pass in [0, SHADER_FORWARD_HDR] {
            let mut options = MaterialOptions::new()
                .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1).with_transform(3))
                .with_map(MapFeature::Opacity, textured(MapFeature::Opacity, 2).with_uv(1))
                .with_map(MapFeature::Height, textured(MapFeature::Height, 3));
            options.lit_options.nine_sliced_mode = mode;
            options.lit_options.pass = pass;
            options.lit_options.alpha_test = true;

            let program = generator().create_shader_definition(&mut options)?;
            let fs = &program.fragment_code;
            assert!(fs.contains("texture2D(texture_diffuseMap, nineSlicedUv, textureBias)"));
            assert!(fs.contains("texture2D(texture_opacityMap, nineSlicedUv, textureBias)"));
            assert!(fs.contains("texture2D(texture_heightMap, nineSlicedUv, textureBias)"));
            assert!(!fs.contains("nineSlicedUv + dUvOffset"));
        }
    }
    Ok(())
}

#[test]
fn nine_slicing_is_ignored_by_depth_passes() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Opacity, textured(MapFeature::Opacity, 1).with_transform(4));
    options.lit_options.nine_sliced_mode = NineSlicedMode::Sliced;
    options.lit_options.pass = SHADER_SHADOW;
    options.lit_options.alpha_test = true;

    let program = generator().create_shader_definition(&mut options)?;
    assert!(program.fragment_code.contains("texture2D(texture_opacityMap, vUV0_4, textureBias)"));
    assert!(!program.fragment_code.contains("nineSlicedUv"));
    Ok(())
}

// ============================================================================
// Passes
// ============================================================================

#[test]
fn unknown_pass_falls_back_to_forward() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new();
    options.lit_options.pass = 42;

    let program = generator().create_shader_definition(&mut options)?;
    assert_eq!(program.name, "standard_forward");
    assert!(program.fragment_code.contains("getAlbedo();"));
    Ok(())
}

#[test]
fn user_pass_carries_its_define() -> anyhow::Result<()> {
    let mut generator = generator();
    let outline = generator.passes_mut().allocate("outline", PassKind::DepthOnly)?;

    let mut options = MaterialOptions::new();
    options.lit_options.pass = outline;

    let program = generator.create_shader_definition(&mut options)?;
    assert_eq!(program.name, "standard_outline");
    assert!(program.fragment_code.contains("#define OUTLINE_PASS\n"));
    assert!(program.vertex_code.contains("// outline vertex stage"));
    assert!(!program.fragment_code.contains("getAlbedo"));
    Ok(())
}

// ============================================================================
// Chunk overrides & placeholder policy
// ============================================================================

#[test]
fn chunk_override_replaces_builtin() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new();
    options.lit_options.chunks.insert(
        "emissivePS".into(),
        "void getEmission() { dEmission = vec3(0.25); }".into(),
    );

    let program = generator().create_shader_definition(&mut options)?;
    assert!(program.fragment_code.contains("dEmission = vec3(0.25);"));
    assert!(!program.fragment_code.contains("material_emissiveIntensity"));
    Ok(())
}

#[test]
fn strict_policy_rejects_unknown_placeholder() {
    let mut options = MaterialOptions::new();
    options
        .lit_options
        .chunks
        .insert("diffusePS".into(), "void getAlbedo() { dAlbedo = $TINT; }".into());

    match generator().create_shader_definition(&mut options) {
        Err(ShaderGenError::UnknownPlaceholder { chunk, token }) => {
            assert_eq!(chunk, "diffusePS");
            assert_eq!(token, "TINT");
        }
        other => panic!("expected UnknownPlaceholder, got {other:?}"),
    }
}

#[test]
fn lenient_policy_strips_unknown_placeholder() -> anyhow::Result<()> {
    init_logging();
    let generator = StandardShaderGenerator::new(GeneratorSettings {
        placeholder_policy: PlaceholderPolicy::Lenient,
        ..Default::default()
    });

    let mut options = MaterialOptions::new();
    options
        .lit_options
        .chunks
        .insert("diffusePS".into(), "void getAlbedo() { dAlbedo = $TINT; }".into());

    let program = generator.create_shader_definition(&mut options)?;
    assert!(program.fragment_code.contains("dAlbedo = TINT;"));
    Ok(())
}

#[test]
fn legacy_sample_macro_pulls_in_helpers() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new().with_map(
        MapFeature::Diffuse,
        textured(MapFeature::Diffuse, 1).with_encoding(TextureEncoding::Srgb),
    );
    options.lit_options.chunks.insert(
        "diffusePS".into(),
        "void getAlbedo() {\n    dAlbedo = $texture2DSAMPLE($SAMPLER, $UV).$CH;\n}\n".into(),
    );

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(fs.contains("dAlbedo = texture2DSRGB(texture_diffuseMap, vUv0).rgb;"));
    assert_eq!(fs.matches("vec4 texture2DSRGB(sampler2D tex, vec2 uv) {").count(), 1);
    Ok(())
}

#[test]
fn missing_chunk_is_an_error() {
    let generator = StandardShaderGenerator::new(GeneratorSettings::default())
        .with_chunks(Arc::new(ChunkLibrary::new()));

    let mut options = MaterialOptions::new();
    assert!(matches!(
        generator.create_shader_definition(&mut options),
        Err(ShaderGenError::ChunkNotFound(_))
    ));
}

#[test]
fn builtin_chunks_are_complete() {
    assert!(ChunkLibrary::builtin().validate().is_ok());
}

// ============================================================================
// Feature toggles
// ============================================================================

#[test]
fn specular_block_requires_lighting_or_reflections() -> anyhow::Result<()> {
    let mut unlit = MaterialOptions::new();
    let program = generator().create_shader_definition(&mut unlit)?;
    assert!(program.fragment_code.contains("vec3 dSpecularity = vec3(0.0);"));
    assert!(!program.fragment_code.contains("getGlossiness();"));

    let mut lit = MaterialOptions::new();
    lit.lit_options.light_count = 1;
    lit.lit_options.use_sheen = true;
    lit.lit_options.use_metalness = true;
    lit.lit_options.use_specularity_factor = true;
    let program = generator().create_shader_definition(&mut lit)?;
    let fs = &program.fragment_code;
    for call in [
        "getSheen();",
        "getSheenGlossiness();",
        "getMetalness();",
        "getIor();",
        "getSpecularityFactor();",
        "getSpecularity();",
        "getGlossiness();",
    ] {
        assert!(fs.contains(call), "{call}");
    }
    assert!(fs.contains("void getSpecularity() { dSpecularity = vec3(1); }"));
    Ok(())
}

#[test]
fn clear_coat_refraction_and_iridescence() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::ClearCoatNormal, textured(MapFeature::ClearCoatNormal, 9));
    options.lit_options.use_clear_coat = true;
    options.lit_options.use_refraction = true;
    options.lit_options.use_dynamic_refraction = true;
    options.lit_options.use_iridescence = true;
    options.packed_normal = true;

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(fs.contains("litArgs_clearcoat_worldNormal = ccNormalW;"));
    assert!(fs.contains("litArgs_transmission = dTransmission;"));
    assert!(fs.contains("litArgs_thickness = dThickness;"));
    assert!(fs.contains("litArgs_iridescence_thickness = dIridescenceThickness;"));
    assert!(fs.contains("uniform sampler2D uSceneColorMap;"));
    assert!(fs.contains("uniform vec4 uScreenSize;"));
    assert!(fs.contains("normal.xy = nmap.wy * 2.0 - 1.0;"));
    assert!(fs.contains("cotangentFrame(dVertexNormalW, vPositionW, vUv0)"));
    Ok(())
}

#[test]
fn vertex_color_features_raise_vertex_colors() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Diffuse, MapOptions::new(MapFeature::Diffuse).with_vertex_color("rgba"));

    let program = generator().create_shader_definition(&mut options)?;
    assert!(options.lit_options.vertex_colors);
    assert_eq!(options.maps[MapFeature::Diffuse].vertex_color_channel, "rgb");
    assert!(program.fragment_code.contains("vVertexColor.rgb"));
    assert_eq!(program.attributes["vertex_color"], VertexSemantic::Color);
    Ok(())
}

#[test]
fn detail_maps_blend_through_detail_modes() -> anyhow::Result<()> {
    use myth_shadergen::resources::DetailMode;

    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1))
        .with_map(
            MapFeature::DiffuseDetail,
            textured(MapFeature::DiffuseDetail, 2).with_detail_mode(DetailMode::Overlay),
        );

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(fs.contains("vec3 detailMode_overlay(vec3 c1, vec3 c2)"));
    assert!(fs.contains("return detailMode_overlay(albedo, albedoDetail);"));
    assert!(fs.contains("uniform sampler2D texture_diffuseDetailMap;"));
    Ok(())
}

#[test]
fn detail_mode_defaults_to_mul() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Diffuse, textured(MapFeature::Diffuse, 1))
        .with_map(MapFeature::DiffuseDetail, textured(MapFeature::DiffuseDetail, 2));
    assert!(options.maps[MapFeature::DiffuseDetail].detail_mode.is_none());

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(fs.contains("return detailMode_mul(albedo, albedoDetail);"));
    assert!(!fs.contains("detailMode_DETAILMODE"));
    Ok(())
}

#[test]
fn normal_detail_without_normal_map_is_dropped() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::NormalDetail, textured(MapFeature::NormalDetail, 3));
    options.lit_options.light_count = 1;

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(!options.maps[MapFeature::NormalDetail].map);
    assert!(!fs.contains("texture_normalDetailMap"));
    assert!(fs.contains("getNormal();"));
    Ok(())
}

#[test]
fn height_map_without_lighting_declares_tangent_frame() -> anyhow::Result<()> {
    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Height, textured(MapFeature::Height, 1));
    options.lit_options.use_specular = false;

    let program = generator().create_shader_definition(&mut options)?;
    let fs = &program.fragment_code;
    assert!(options.lit_options.use_heights);
    assert!(fs.contains("getParallax();"));
    assert!(fs.contains("mat3 dTBN;"));
    assert!(fs.contains("dViewDirW = normalize(view_position - vPositionW);"));
    Ok(())
}

// ============================================================================
// Lit backend seam
// ============================================================================

#[derive(Default)]
struct RecordingBackend {
    seen: Mutex<Vec<(String, String, Option<String>)>>,
}

impl LitBackend for RecordingBackend {
    fn capabilities(&self, _lit: &LitOptions) -> LitCapabilities {
        LitCapabilities {
            needs_normal: true,
            lighting: true,
            ..Default::default()
        }
    }

    fn generate_vertex_shader(
        &self,
        _lit: &LitOptions,
        pass: &ShaderPassInfo,
        usage: &UvUsage,
    ) -> myth_shadergen::Result<String> {
        Ok(format!("// vs {} {:?}", pass.name, usage.used))
    }

    fn generate_fragment_shader(
        &self,
        _lit: &LitOptions,
        _pass: &ShaderPassInfo,
        _usage: &UvUsage,
        frontend: &FrontendSource<'_>,
    ) -> myth_shadergen::Result<String> {
        self.seen.lock().unwrap().push((
            frontend.declarations.to_string(),
            frontend.entry.to_string(),
            frontend.lighting_uv.map(str::to_string),
        ));
        Ok(format!("{}{}", frontend.declarations, frontend.code))
    }

    fn attributes(
        &self,
        _lit: &LitOptions,
        _pass: &ShaderPassInfo,
        _usage: &UvUsage,
    ) -> BTreeMap<String, VertexSemantic> {
        BTreeMap::from([("vertex_position".to_string(), VertexSemantic::Position)])
    }
}

#[test]
fn backend_receives_frontend_sections() -> anyhow::Result<()> {
    let backend = Arc::new(RecordingBackend::default());

    struct Shared(Arc<RecordingBackend>);
    impl LitBackend for Shared {
        fn capabilities(&self, lit: &LitOptions) -> LitCapabilities {
            self.0.capabilities(lit)
        }
        fn generate_vertex_shader(
            &self,
            lit: &LitOptions,
            pass: &ShaderPassInfo,
            usage: &UvUsage,
        ) -> myth_shadergen::Result<String> {
            self.0.generate_vertex_shader(lit, pass, usage)
        }
        fn generate_fragment_shader(
            &self,
            lit: &LitOptions,
            pass: &ShaderPassInfo,
            usage: &UvUsage,
            frontend: &FrontendSource<'_>,
        ) -> myth_shadergen::Result<String> {
            self.0.generate_fragment_shader(lit, pass, usage, frontend)
        }
        fn attributes(
            &self,
            lit: &LitOptions,
            pass: &ShaderPassInfo,
            usage: &UvUsage,
        ) -> BTreeMap<String, VertexSemantic> {
            self.0.attributes(lit, pass, usage)
        }
    }

    let generator = StandardShaderGenerator::new(GeneratorSettings::default())
        .with_backend(Shared(Arc::clone(&backend)));

    let mut options = MaterialOptions::new()
        .with_map(MapFeature::Normal, textured(MapFeature::Normal, 1).with_uv(1));
    let program = generator.create_shader_definition(&mut options)?;

    assert_eq!(program.vertex_code, "// vs forward [false, true]");
    assert!(program.fragment_code.contains("void evaluateFrontend() {\ngetNormal();"));
    assert!(program.fragment_code.contains("litArgs_worldNormal = dNormalW;\n"));

    let seen = backend.seen.lock().unwrap();
    let (declarations, entry, lighting_uv) = &seen[0];
    assert_eq!(entry, "\n    evaluateFrontend();\n\n");
    assert_eq!(lighting_uv.as_deref(), Some("vUv1"));
    assert!(declarations.starts_with("uniform float textureBias;\n"));
    assert!(declarations.ends_with("uniform sampler2D texture_normalMap;\n"));
    assert!(declarations.contains("float litArgs_opacity = 1.0;"));
    Ok(())
}
