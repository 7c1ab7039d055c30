//! Source Builders
//!
//! [`FrontendBuilder`] is the per-call assembly session of the generator. It
//! owns four independent [`SourceBuilder`] sections and the
//! [`SamplerTable`]. It is created at the start of one generation call and
//! consumed at its end, so nothing accumulated for one material can leak
//! into the next.

use rustc_hash::FxHashMap;

use crate::resources::features::MapFeature;
use crate::resources::texture::TextureKey;

/// Append-only text accumulator. Every appended chunk ends with a newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuilder {
    code: String,
}

impl SourceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk, adding a trailing newline if it lacks one.
    pub fn append(&mut self, chunk: &str) {
        self.code.push_str(chunk);
        if !chunk.ends_with('\n') {
            self.code.push('\n');
        }
    }

    /// Inserts a chunk before everything appended so far.
    pub fn prepend(&mut self, chunk: &str) {
        let mut code = String::with_capacity(chunk.len() + 1 + self.code.len());
        code.push_str(chunk);
        if !chunk.ends_with('\n') {
            code.push('\n');
        }
        code.push_str(&self.code);
        self.code = code;
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.code
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.code
    }
}

/// Key a sampler is shared under.
///
/// Maps without a texture identity never share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerKey {
    Texture(TextureKey),
    Unshared(MapFeature),
}

/// Texture identity → sampler name, in first-use order.
#[derive(Debug, Clone, Default)]
pub struct SamplerTable {
    entries: Vec<String>,
    lookup: FxHashMap<SamplerKey, usize>,
}

impl SamplerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sampler already assigned to `key`, or assigns `name`.
    pub fn assign(&mut self, key: SamplerKey, name: String) -> &str {
        let index = match self.lookup.get(&key) {
            Some(&index) => index,
            None => {
                self.entries.push(name);
                let index = self.entries.len() - 1;
                self.lookup.insert(key, index);
                index
            }
        };
        &self.entries[index]
    }

    /// Sampler names in first-use order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One generation call's assembly state.
#[derive(Debug, Default)]
pub struct FrontendBuilder {
    /// Global declarations: per-feature variables, uniforms, helper chunks.
    pub decl: SourceBuilder,
    /// Feature chunk bodies.
    pub code: SourceBuilder,
    /// Per-feature invocation calls, in assembly order.
    pub func: SourceBuilder,
    /// Assignments of feature results to the lit backend's arguments.
    pub args: SourceBuilder,
    pub samplers: SamplerTable,
    /// Some chunk sampled through a legacy encoding-specific function.
    pub legacy_sampling: bool,
}

impl FrontendBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
