//! Material Options
//!
//! The flat configuration a material hands to the shader generator right
//! before a program is requested. It has two parts:
//!
//! - *Surface options*: one [`MapOptions`] per [`MapFeature`], plus a few
//!   material-wide switches.
//! - *Lighting options*: the nested [`LitOptions`].
//!
//! Options serialize (with serde) to a flat object whose top-level keys are
//! the feature names and the material-wide switches. The key generator
//! relies on that shape.

use std::ops::{Index, IndexMut};

use bitflags::bitflags;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::resources::features::MapFeature;
use crate::resources::lit_options::LitOptions;
use crate::resources::texture::{TextureEncoding, TextureKey};

bitflags! {
    /// Which tint inputs a feature multiplies in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Tint: u8 {
        /// A scalar uniform tint.
        const SCALAR = 1 << 0;
        /// A colour/vector uniform tint.
        const COLOR  = 1 << 1;
    }
}

/// Blend keyword of a detail map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailMode {
    Mul,
    Add,
    Screen,
    Overlay,
    Min,
    Max,
}

impl DetailMode {
    /// Keyword substituted for `$DETAILMODE`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mul => "mul",
            Self::Add => "add",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

// ============================================================================
// Per-feature options
// ============================================================================

/// Settings of one map feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// A texture is bound for this feature.
    pub map: bool,
    /// UV set the texture samples. Clamped to the supported sets during
    /// generation.
    pub uv: u32,
    /// Channel mask, e.g. `rgb` or `a`.
    pub channel: String,
    /// UV transform id. 0 is the identity.
    pub transform: u32,
    /// Identity of the bound texture, for sampler sharing.
    pub identifier: Option<TextureKey>,
    pub tint: Tint,
    pub vertex_color: bool,
    pub vertex_color_channel: String,
    pub invert: bool,
    pub detail_mode: Option<DetailMode>,
    pub encoding: TextureEncoding,
}

impl MapOptions {
    /// Inert options for `feature`: no texture, no tint, no vertex colour.
    #[must_use]
    pub fn new(feature: MapFeature) -> Self {
        let channel = feature.descriptor().default_channel;
        Self {
            map: false,
            uv: 0,
            channel: channel.to_string(),
            transform: 0,
            identifier: None,
            tint: Tint::empty(),
            vertex_color: false,
            vertex_color_channel: channel.to_string(),
            invert: false,
            detail_mode: None,
            encoding: TextureEncoding::Linear,
        }
    }

    /// Binds a texture with the given identity.
    #[must_use]
    pub fn with_texture(mut self, identifier: impl Into<TextureKey>) -> Self {
        self.map = true;
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_uv(mut self, uv: u32) -> Self {
        self.uv = uv;
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: &str) -> Self {
        self.channel = channel.to_string();
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: u32) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    /// Drives the feature from the given vertex-colour channels.
    #[must_use]
    pub fn with_vertex_color(mut self, channel: &str) -> Self {
        self.vertex_color = true;
        self.vertex_color_channel = channel.to_string();
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: TextureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_detail_mode(mut self, mode: DetailMode) -> Self {
        self.detail_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }
}

/// One [`MapOptions`] per [`MapFeature`], indexed by feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMaps([MapOptions; MapFeature::COUNT]);

impl Default for FeatureMaps {
    fn default() -> Self {
        Self(std::array::from_fn(|i| MapOptions::new(MapFeature::ALL[i])))
    }
}

impl FeatureMaps {
    /// Iterate features with their options, in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (MapFeature, &MapOptions)> {
        MapFeature::ALL.iter().copied().zip(self.0.iter())
    }

    /// Iterate features with mutable options, in feature order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (MapFeature, &mut MapOptions)> {
        MapFeature::ALL.iter().copied().zip(self.0.iter_mut())
    }
}

impl Index<MapFeature> for FeatureMaps {
    type Output = MapOptions;

    #[inline]
    fn index(&self, feature: MapFeature) -> &MapOptions {
        &self.0[feature.index()]
    }
}

impl IndexMut<MapFeature> for FeatureMaps {
    #[inline]
    fn index_mut(&mut self, feature: MapFeature) -> &mut MapOptions {
        &mut self.0[feature.index()]
    }
}

impl Serialize for FeatureMaps {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(MapFeature::COUNT))?;
        for (feature, options) in self.iter() {
            map.serialize_entry(feature.name(), options)?;
        }
        map.end()
    }
}

// ============================================================================
// Material options
// ============================================================================

/// Full option set for one standard-material program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOptions {
    #[serde(flatten)]
    pub maps: FeatureMaps,
    /// Generate UV set 1 even when no map samples it.
    pub force_uv1: bool,
    /// Normal maps store XY only; Z is reconstructed.
    pub packed_normal: bool,
    /// A directional lightmap is available.
    pub dir_light_map: bool,
    /// Sample the specular colour chunk instead of constant white.
    pub use_specular_color: bool,
    pub lit_options: LitOptions,
}

impl MaterialOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options of one feature.
    #[must_use]
    pub fn with_map(mut self, feature: MapFeature, options: MapOptions) -> Self {
        self.maps[feature] = options;
        self
    }

    #[inline]
    #[must_use]
    pub fn map(&self, feature: MapFeature) -> &MapOptions {
        &self.maps[feature]
    }

    #[inline]
    pub fn map_mut(&mut self, feature: MapFeature) -> &mut MapOptions {
        &mut self.maps[feature]
    }

    /// Whether any feature reads the vertex colour attribute.
    #[must_use]
    pub fn uses_vertex_color(&self) -> bool {
        self.maps.iter().any(|(_, m)| m.vertex_color)
    }
}
