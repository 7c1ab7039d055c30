//! Generator Settings
//!
//! Configuration for [`StandardShaderGenerator`](crate::renderer::pipeline::StandardShaderGenerator)
//! and [`ProgramLibrary`](crate::renderer::pipeline::ProgramLibrary).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_shadergen::renderer::{GeneratorSettings, PlaceholderPolicy};
//!
//! // Default: unknown placeholders are hard errors
//! let settings = GeneratorSettings::default();
//!
//! // Accept legacy chunk text that carries stray `$` tokens
//! let settings = GeneratorSettings {
//!     placeholder_policy: PlaceholderPolicy::Lenient,
//!     ..Default::default()
//! };
//!
//! // Or load from JSON
//! let settings = GeneratorSettings::from_json_str(r#"{ "placeholder_policy": "lenient" }"#)?;
//! ```

use serde::Deserialize;

use crate::errors::Result;

// ---------------------------------------------------------------------------
// PlaceholderPolicy
// ---------------------------------------------------------------------------

/// How chunk text referencing a placeholder outside the supported set is
/// treated.
///
/// Known placeholders that a feature leaves unbound are always stripped of
/// their `$` sentinel; chunks only reference them inside preprocessor
/// branches that the feature disables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    /// Fail with [`ShaderGenError::UnknownPlaceholder`](crate::errors::ShaderGenError::UnknownPlaceholder).
    #[default]
    Strict,
    /// Strip the `$` sentinel, keep the identifier, log at debug level.
    Lenient,
}

// ---------------------------------------------------------------------------
// GeneratorSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub placeholder_policy: PlaceholderPolicy,
    /// Log the full source of every newly generated program at trace level.
    pub log_generated_source: bool,
}

impl GeneratorSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
