//! Chunk Placeholder Substitution
//!
//! Chunk text marks its parameter slots with a `$` sentinel followed by an
//! identifier. The set of identifiers is closed:
//!
//! | Token              | Bound to                                   |
//! |--------------------|--------------------------------------------|
//! | `$UV`              | UV source expression                       |
//! | `$CH`              | channel mask                               |
//! | `$SAMPLER`         | sampler identifier                         |
//! | `$DECODE`          | decode function for the texture encoding   |
//! | `$VC`              | vertex-colour channel mask                 |
//! | `$DETAILMODE`      | detail blend keyword                       |
//! | `$texture2DSAMPLE` | deprecated encoding-specific sampler       |
//!
//! A known token without a bound value loses its sentinel and stays in
//! place: chunks only reference unbound slots inside branches that the
//! feature's `MAP*` flags disable. A token outside the set is an error
//! under [`PlaceholderPolicy::Strict`]. A `$` not followed by an identifier
//! is plain text.

use crate::errors::{Result, ShaderGenError};
use crate::renderer::settings::PlaceholderPolicy;
use crate::resources::lit_options::GammaMode;
use crate::resources::texture::TextureEncoding;

/// Decode function that leaves the texel untouched.
pub const PASS_THROUGH: &str = "passThrough";

/// A supported placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Uv,
    Channel,
    Sampler,
    Decode,
    VertexColor,
    DetailMode,
    LegacySample,
}

impl Placeholder {
    /// Parses the identifier that follows a `$`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "UV" => Self::Uv,
            "CH" => Self::Channel,
            "SAMPLER" => Self::Sampler,
            "DECODE" => Self::Decode,
            "VC" => Self::VertexColor,
            "DETAILMODE" => Self::DetailMode,
            "texture2DSAMPLE" => Self::LegacySample,
            _ => return None,
        })
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Uv => "UV",
            Self::Channel => "CH",
            Self::Sampler => "SAMPLER",
            Self::Decode => "DECODE",
            Self::VertexColor => "VC",
            Self::DetailMode => "DETAILMODE",
            Self::LegacySample => "texture2DSAMPLE",
        }
    }
}

/// Values bound to placeholders for one chunk. Unset slots stay unbound.
#[derive(Debug, Clone, Default)]
pub struct Substitutions<'a> {
    pub uv: Option<String>,
    pub channel: Option<&'a str>,
    pub sampler: Option<String>,
    pub decode: Option<&'static str>,
    pub legacy_sample: Option<&'static str>,
    pub vertex_color: Option<&'a str>,
    pub detail_mode: Option<&'static str>,
}

impl Substitutions<'_> {
    fn value(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::Uv => self.uv.as_deref(),
            Placeholder::Channel => self.channel,
            Placeholder::Sampler => self.sampler.as_deref(),
            Placeholder::Decode => self.decode,
            Placeholder::VertexColor => self.vertex_color,
            Placeholder::DetailMode => self.detail_mode,
            Placeholder::LegacySample => self.legacy_sample,
        }
    }
}

/// Output of [`substitute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub code: String,
    /// The chunk sampled through an encoding-specific legacy function and
    /// needs the `textureSamplePS` helper.
    pub legacy_sampling: bool,
}

/// Whether a chunk's text references a placeholder.
#[must_use]
pub fn references(source: &str, placeholder: Placeholder) -> bool {
    let token = placeholder.token();
    let mut rest = source;
    while let Some(pos) = rest.find('$') {
        let after = &rest[pos + 1..];
        let len = identifier_len(after);
        if &after[..len] == token {
            return true;
        }
        rest = &after[len..];
    }
    false
}

/// Replaces every `$` placeholder in `source`.
///
/// `chunk` names the chunk in diagnostics.
pub fn substitute(
    chunk: &str,
    source: &str,
    subs: &Substitutions<'_>,
    policy: PlaceholderPolicy,
) -> Result<Substituted> {
    let mut code = String::with_capacity(source.len() + 64);
    let mut legacy_sampling = false;
    let mut rest = source;

    while let Some(pos) = rest.find('$') {
        code.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let len = identifier_len(after);
        if len == 0 {
            // not a placeholder
            code.push('$');
            rest = after;
            continue;
        }
        let token = &after[..len];

        match Placeholder::from_token(token) {
            Some(placeholder) => match subs.value(placeholder) {
                Some(value) => {
                    if placeholder == Placeholder::LegacySample {
                        log::warn!(
                            "Shader chunk `{chunk}` uses the deprecated `$texture2DSAMPLE(...)` macro, use `$DECODE(texture2D(...))` instead"
                        );
                        legacy_sampling |= value != "texture2D";
                    }
                    code.push_str(value);
                }
                None => code.push_str(token),
            },
            None => match policy {
                PlaceholderPolicy::Strict => {
                    return Err(ShaderGenError::UnknownPlaceholder {
                        chunk: chunk.to_string(),
                        token: token.to_string(),
                    });
                }
                PlaceholderPolicy::Lenient => {
                    log::debug!("Stripping unknown placeholder `${token}` in shader chunk `{chunk}`");
                    code.push_str(token);
                }
            },
        }

        rest = &after[len..];
    }
    code.push_str(rest);

    Ok(Substituted {
        code,
        legacy_sampling,
    })
}

/// Decode function for a texture sampled through `channel`.
///
/// Alpha is never colour-decoded, so an alpha-only mask passes through.
/// Without gamma correction sRGB data is read as linear.
#[must_use]
pub fn decode_function(encoding: TextureEncoding, channel: &str, gamma: GammaMode) -> &'static str {
    if is_alpha_only(channel) {
        return PASS_THROUGH;
    }
    let encoding = if gamma == GammaMode::None && encoding == TextureEncoding::Srgb {
        TextureEncoding::Linear
    } else {
        encoding
    };
    encoding.decode_function()
}

/// `a`, `aa`, `aaa`, …
#[inline]
#[must_use]
pub fn is_alpha_only(channel: &str) -> bool {
    !channel.is_empty() && channel.bytes().all(|b| b == b'a')
}

#[inline]
fn identifier_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}
