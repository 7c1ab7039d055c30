//! Shader Chunk Repository
//!
//! Chunks are named fragments of GLSL source, possibly carrying `$`
//! placeholders that the [map composer](super::map_composer) fills in.
//!
//! - [`ChunkRepository`] is the lookup interface the generator consumes.
//! - [`ChunkLibrary`] is the shipped implementation; [`ChunkLibrary::builtin`]
//!   loads the chunks embedded under `shaders/chunks/`.
//! - [`ChunkSet`] layers a material's per-chunk overrides on top of a
//!   repository for the duration of one generation call.

use std::borrow::Cow;
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::shader_manager::ShaderAssets;
use crate::errors::{Result, ShaderGenError};

/// Every chunk name the standard generator can reference.
pub const REQUIRED_CHUNKS: &[&str] = &[
    "alphaTestPS",
    "aoDetailMapPS",
    "aoPS",
    "bayerPS",
    "clearCoatGlossPS",
    "clearCoatNormalPS",
    "clearCoatPS",
    "detailModesPS",
    "diffuseDetailMapPS",
    "diffusePS",
    "emissivePS",
    "glossPS",
    "iorPS",
    "iridescencePS",
    "iridescenceThicknessPS",
    "lightmapDirPS",
    "lightmapSinglePS",
    "litShaderArgsPS",
    "metalnessPS",
    "normalDetailMapPS",
    "normalMapPS",
    "normalXYPS",
    "normalXYZPS",
    "opacityDitherPS",
    "opacityPS",
    "parallaxPS",
    "sheenGlossPS",
    "sheenPS",
    "specularPS",
    "specularityFactorPS",
    "textureSamplePS",
    "thicknessPS",
    "transmissionPS",
];

/// Read-only source of chunk text, keyed by chunk name.
pub trait ChunkRepository: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&str>;
}

/// In-memory chunk repository.
#[derive(Debug, Clone, Default)]
pub struct ChunkLibrary {
    chunks: FxHashMap<String, Cow<'static, str>>,
}

impl ChunkLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every embedded `chunks/<name>.glsl`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut library = Self::new();

        for path in ShaderAssets::iter() {
            let Some(name) = path
                .strip_prefix("chunks/")
                .and_then(|p| p.strip_suffix(".glsl"))
            else {
                continue;
            };
            let Some(file) = ShaderAssets::get(&path) else {
                continue;
            };

            let source = match file.data {
                Cow::Borrowed(bytes) => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
                Cow::Owned(bytes) => String::from_utf8(bytes).ok().map(Cow::Owned),
            };

            match source {
                Some(source) => {
                    library.chunks.insert(name.to_string(), source);
                }
                None => log::warn!("Skipping shader chunk {path}: not valid UTF-8"),
            }
        }

        log::debug!("Loaded {} built-in shader chunks", library.chunks.len());
        library
    }

    /// Adds or replaces a chunk.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<Cow<'static, str>>) {
        self.chunks.insert(name.into(), source.into());
    }

    /// Checks that every chunk in [`REQUIRED_CHUNKS`] is present.
    pub fn validate(&self) -> Result<()> {
        match REQUIRED_CHUNKS
            .iter()
            .find(|name| !self.chunks.contains_key(**name))
        {
            Some(missing) => Err(ShaderGenError::ChunkNotFound((*missing).to_string())),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl ChunkRepository for ChunkLibrary {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.chunks.get(name).map(AsRef::as_ref)
    }
}

/// A repository seen through one material's chunk overrides.
#[derive(Clone, Copy)]
pub struct ChunkSet<'a> {
    base: &'a dyn ChunkRepository,
    overrides: &'a BTreeMap<String, String>,
}

impl<'a> ChunkSet<'a> {
    #[must_use]
    pub fn new(base: &'a dyn ChunkRepository, overrides: &'a BTreeMap<String, String>) -> Self {
        Self { base, overrides }
    }

    /// Returns the override for `name` if any, else the repository chunk.
    pub fn get(&self, name: &str) -> Result<&'a str> {
        if let Some(source) = self.overrides.get(name) {
            return Ok(source.as_str());
        }
        self.base
            .lookup(name)
            .ok_or_else(|| ShaderGenError::ChunkNotFound(name.to_string()))
    }
}
