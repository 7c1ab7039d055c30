//! Texture identity and colour encoding as seen by the shader generator.
//!
//! The generator never touches texel data. It only needs to know *which*
//! texture a map samples (to share one sampler between maps bound to the
//! same texture) and *how* its texels are encoded (to pick a decode
//! function).

use serde::{Deserialize, Serialize};

/// Identity of a texture resource, used for sampler aliasing.
///
/// Two maps carrying the same key sample through a single sampler
/// declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureKey(pub u64);

impl From<u64> for TextureKey {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Colour encoding of texel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureEncoding {
    #[default]
    Linear,
    Srgb,
    Rgbm,
    Rgbe,
    Rgbp,
}

impl TextureEncoding {
    /// Name of the chunk-library function that decodes a sampled texel.
    #[must_use]
    pub fn decode_function(self) -> &'static str {
        match self {
            Self::Linear => "decodeLinear",
            Self::Srgb => "decodeGamma",
            Self::Rgbm => "decodeRGBM",
            Self::Rgbe => "decodeRGBE",
            Self::Rgbp => "decodeRGBP",
        }
    }

    /// Sampling function substituted for the deprecated `$texture2DSAMPLE`.
    ///
    /// There is no legacy RGBP sampler; it falls back to `texture2D`.
    #[must_use]
    pub fn legacy_sample_function(self) -> &'static str {
        match self {
            Self::Srgb => "texture2DSRGB",
            Self::Rgbm => "texture2DRGBM",
            Self::Rgbe => "texture2DRGBE",
            Self::Linear | Self::Rgbp => "texture2D",
        }
    }
}
