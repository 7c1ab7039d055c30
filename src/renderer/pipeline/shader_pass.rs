//! Shader Pass Registry
//!
//! Classifies render-pass ids into the two kinds the generator cares about:
//! forward passes, which assemble every lighting feature, and depth-only
//! passes (depth, picking, shadows), which assemble opacity at most.
//!
//! Built-in passes occupy the fixed ids below. Applications can allocate
//! extra passes by name; ids are handed out after the built-ins.

use rustc_hash::FxHashMap;

use crate::errors::{Result, ShaderGenError};
use crate::resources::shader_defines::ShaderDefines;

pub const SHADER_FORWARD: u32 = 0;
pub const SHADER_FORWARD_HDR: u32 = 1;
pub const SHADER_DEPTH: u32 = 2;
pub const SHADER_PICK: u32 = 3;
pub const SHADER_SHADOW: u32 = 4;

/// Which features a pass assembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Forward,
    DepthOnly,
}

/// One registered render pass.
#[derive(Debug, Clone)]
pub struct ShaderPassInfo {
    pub index: u32,
    pub name: String,
    pub kind: PassKind,
    /// Defines prepended to programs generated for this pass.
    pub defines: ShaderDefines,
}

impl ShaderPassInfo {
    fn new(index: u32, name: &str, kind: PassKind) -> Self {
        let mut defines = ShaderDefines::new();
        defines.flag(&format!("{}_PASS", name.to_uppercase()));
        Self {
            index,
            name: name.to_string(),
            kind,
            defines,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.kind == PassKind::Forward
    }
}

/// Registry of render passes, addressed by id.
#[derive(Debug, Clone)]
pub struct ShaderPassRegistry {
    passes: Vec<ShaderPassInfo>,
    by_name: FxHashMap<String, u32>,
}

impl Default for ShaderPassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderPassRegistry {
    /// Creates a registry holding the built-in passes.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            passes: Vec::with_capacity(8),
            by_name: FxHashMap::default(),
        };
        for (name, kind) in [
            ("forward", PassKind::Forward),
            ("forward_hdr", PassKind::Forward),
            ("depth", PassKind::DepthOnly),
            ("pick", PassKind::DepthOnly),
            ("shadow", PassKind::DepthOnly),
        ] {
            registry.push(name, kind);
        }
        registry
    }

    fn push(&mut self, name: &str, kind: PassKind) -> u32 {
        let index = self.passes.len() as u32;
        self.passes.push(ShaderPassInfo::new(index, name, kind));
        self.by_name.insert(name.to_string(), index);
        index
    }

    /// Registers a user pass and returns its id.
    pub fn allocate(&mut self, name: &str, kind: PassKind) -> Result<u32> {
        if self.by_name.contains_key(name) {
            return Err(ShaderGenError::PassNameInUse(name.to_string()));
        }
        Ok(self.push(name, kind))
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&ShaderPassInfo> {
        self.passes.get(index as usize)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&ShaderPassInfo> {
        self.by_name.get(name).and_then(|&index| self.get(index))
    }

    /// Looks up a pass, falling back to the forward pass for unknown ids.
    #[must_use]
    pub fn resolve(&self, index: u32) -> &ShaderPassInfo {
        self.get(index).unwrap_or_else(|| {
            log::warn!("Unknown shader pass id {index}, generating for the forward pass");
            &self.passes[SHADER_FORWARD as usize]
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}
