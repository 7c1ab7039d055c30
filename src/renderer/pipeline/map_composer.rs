//! Map Feature Composer
//!
//! Turns one [`MapFeature`] plus its [`MapOptions`] into a directly
//! insertable source chunk:
//!
//! ```text
//! #define MAPFLOAT / #undef MAPFLOAT        ← scalar tint
//! #define MAPCOLOR / #undef MAPCOLOR        ← colour tint
//! #define MAPVERTEX / #undef MAPVERTEX      ← vertex colour
//! #define MAPTEXTURE / #undef MAPTEXTURE    ← texture bound
//! #define MAPINVERT / #undef MAPINVERT      ← invert
//! <chunk body with $UV, $CH, $SAMPLER, … substituted>
//! ```
//!
//! The chunk body branches on the flags itself, so a feature with nothing
//! bound still yields valid, inert source.
//!
//! This module also owns the UV bookkeeping that precedes composition:
//! channel-mask correction, UV-set clamping and the per-set usage scan that
//! feeds vertex shader generation.

use smallvec::SmallVec;

use super::chunks::ChunkSet;
use super::placeholders::{self, Placeholder, Substitutions};
use super::shader_pass::ShaderPassInfo;
use super::source_builder::{SamplerKey, SamplerTable};
use crate::errors::Result;
use crate::renderer::settings::PlaceholderPolicy;
use crate::resources::features::MapFeature;
use crate::resources::material_options::{DetailMode, MapOptions, MaterialOptions, Tint};
use crate::resources::texture::TextureEncoding;

/// Number of UV sets a vertex provides.
pub const MAX_UV_SETS: u32 = 2;

/// UV expression used by every map in sliced/tiled sprite rendering.
pub const NINE_SLICED_UV: &str = "nineSlicedUv";

/// Parallax displacement added to every map but the height map itself.
pub const PARALLAX_OFFSET: &str = " + dUvOffset";

// ============================================================================
// UV bookkeeping
// ============================================================================

/// Fits a channel mask to `count` components.
///
/// Longer masks are truncated; shorter ones repeat their last character.
/// `None` (fixed-layout maps) and empty masks are returned unchanged.
#[must_use]
pub fn correct_channel(channel: &str, count: Option<usize>) -> String {
    let Some(count) = count else {
        return channel.to_string();
    };
    let len = channel.chars().count();
    match channel.chars().last() {
        Some(_) if len > count => channel.chars().take(count).collect(),
        Some(last) if len < count => {
            let mut corrected = String::with_capacity(count);
            corrected.push_str(channel);
            corrected.extend(std::iter::repeat_n(last, count - len));
            corrected
        }
        _ => channel.to_string(),
    }
}

/// Resolves the UV source expression a feature samples with.
#[must_use]
pub fn uv_source_expression(
    options: &MaterialOptions,
    feature: MapFeature,
    pass: &ShaderPassInfo,
) -> String {
    let lit = &options.lit_options;
    if pass.is_forward() && lit.nine_sliced_mode.overrides_uv() {
        return NINE_SLICED_UV.to_string();
    }

    let map = options.map(feature);
    let uv = map.uv.min(MAX_UV_SETS - 1);
    let mut expression = if map.transform == 0 {
        format!("vUv{uv}")
    } else {
        format!("vUV{uv}_{}", map.transform)
    };

    if options.map(MapFeature::Height).map && feature != MapFeature::Height {
        expression.push_str(PARALLAX_OFFSET);
    }
    expression
}

/// A map that samples through a UV transform applied in the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapTransform {
    pub feature: MapFeature,
    pub transform: u32,
    pub uv: u32,
}

/// Which UV sets the program reads, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UvUsage {
    /// Some map (or `force_uv1`) samples this set.
    pub used: [bool; MAX_UV_SETS as usize],
    /// Some map samples this set without a transform.
    pub unmodified: [bool; MAX_UV_SETS as usize],
    /// Transformed maps, in feature order.
    pub transforms: SmallVec<[MapTransform; 4]>,
}

impl UvUsage {
    /// Scans every feature and normalizes its options in place.
    ///
    /// Vertex-colour masks and texture channel masks are corrected to the
    /// feature's native channel count, UV sets are clamped into range. A
    /// normal detail texture without a base normal map is dropped.
    pub fn collect(options: &mut MaterialOptions) -> Self {
        let mut usage = Self::default();

        // detail normals blend onto the base normal map
        if !options.map(MapFeature::Normal).map {
            options.map_mut(MapFeature::NormalDetail).map = false;
        }

        for (feature, map) in options.maps.iter_mut() {
            let channels = feature.descriptor().channels;

            if map.vertex_color {
                map.vertex_color_channel = correct_channel(&map.vertex_color_channel, channels);
            }

            if map.map {
                map.uv = map.uv.min(MAX_UV_SETS - 1);
                map.channel = correct_channel(&map.channel, channels);

                let set = map.uv as usize;
                usage.used[set] = true;
                usage.unmodified[set] |= map.transform == 0;

                if map.transform != 0 {
                    usage.transforms.push(MapTransform {
                        feature,
                        transform: map.transform,
                        uv: map.uv,
                    });
                }
            }
        }

        if options.force_uv1 {
            if !usage.used[1] {
                usage.unmodified[1] = true;
            }
            usage.used[1] = true;
        }

        usage
    }
}

// ============================================================================
// Composer
// ============================================================================

/// A composed feature chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedChunk {
    pub code: String,
    /// See [`Substituted::legacy_sampling`](super::placeholders::Substituted::legacy_sampling).
    pub legacy_sampling: bool,
}

/// Composes feature chunks for one material and pass.
pub struct MapComposer<'a> {
    options: &'a MaterialOptions,
    chunks: ChunkSet<'a>,
    pass: &'a ShaderPassInfo,
    policy: PlaceholderPolicy,
}

impl<'a> MapComposer<'a> {
    #[must_use]
    pub fn new(
        options: &'a MaterialOptions,
        chunks: ChunkSet<'a>,
        pass: &'a ShaderPassInfo,
        policy: PlaceholderPolicy,
    ) -> Self {
        Self {
            options,
            chunks,
            pass,
            policy,
        }
    }

    /// Composes `chunk_name` configured for `feature`.
    ///
    /// Samplers the chunk introduces are registered in `samplers`, shared by
    /// texture identity. `encoding` is the decode hint for colour features.
    pub fn compose(
        &self,
        feature: MapFeature,
        chunk_name: &str,
        samplers: &mut SamplerTable,
        encoding: Option<TextureEncoding>,
    ) -> Result<ComposedChunk> {
        let map = self.options.map(feature);
        let source = self.chunks.get(chunk_name)?;

        let mut subs = Substitutions::default();

        if map.map {
            subs.uv = Some(uv_source_expression(self.options, feature, self.pass));
            subs.channel = Some(&map.channel);

            if placeholders::references(source, Placeholder::Sampler) {
                let key = map
                    .identifier
                    .map_or(SamplerKey::Unshared(feature), SamplerKey::Texture);
                subs.sampler = Some(samplers.assign(key, feature.sampler_name()).to_string());
            }

            if let Some(encoding) = encoding {
                subs.decode = Some(placeholders::decode_function(
                    encoding,
                    &map.channel,
                    self.options.lit_options.gamma,
                ));
                subs.legacy_sample = Some(encoding.legacy_sample_function());
            }
        }

        if map.vertex_color {
            subs.vertex_color = Some(&map.vertex_color_channel);
        }

        if placeholders::references(source, Placeholder::DetailMode) {
            subs.detail_mode = Some(map.detail_mode.unwrap_or(DetailMode::Mul).as_str());
        }

        let body = placeholders::substitute(chunk_name, source, &subs, self.policy)?;

        let mut code = map_defines(map);
        code.push_str(&body.code);

        Ok(ComposedChunk {
            code,
            legacy_sampling: body.legacy_sampling,
        })
    }
}

fn map_defines(map: &MapOptions) -> String {
    let flags = [
        ("MAPFLOAT", map.tint.contains(Tint::SCALAR)),
        ("MAPCOLOR", map.tint.contains(Tint::COLOR)),
        ("MAPVERTEX", map.vertex_color),
        ("MAPTEXTURE", map.map),
        ("MAPINVERT", map.invert),
    ];

    let mut out = String::with_capacity(96);
    for (name, enabled) in flags {
        out.push_str(if enabled { "#define " } else { "#undef " });
        out.push_str(name);
        out.push('\n');
    }
    out
}
