//! Preprocessor Define Sets
//!
//! Collects the `#define` lines that a render pass and the lighting options
//! contribute to a generated program header.
//!
//! Names and values are interned [`Symbol`]s. Entries are kept ordered by
//! name *text*, not by symbol, so the rendered header is the same no matter
//! in which order strings were first interned.
//!
//! ```rust,ignore
//! use myth_shadergen::resources::ShaderDefines;
//!
//! let mut defines = ShaderDefines::new();
//! defines.flag("TONEMAP_ACES");
//! defines.set("MAX_LIGHTS", "8");
//!
//! assert_eq!(defines.to_preprocessor(), "#define MAX_LIGHTS 8\n#define TONEMAP_ACES\n");
//! ```

use std::hash::{Hash, Hasher};

use crate::utils::interner::{self, Symbol};

/// An ordered set of preprocessor defines.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    entries: Vec<(Symbol, Symbol)>,
}

impl ShaderDefines {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing an existing value.
    ///
    /// An empty value renders as a bare `#define NAME`.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = interner::intern(value);
        match self
            .entries
            .binary_search_by(|&(k, _)| interner::resolve(k).cmp(name))
        {
            Ok(idx) => self.entries[idx].1 = value,
            Err(idx) => self.entries.insert(idx, (interner::intern(name), value)),
        }
    }

    /// Sets a bare define.
    #[inline]
    pub fn flag(&mut self, name: &str) {
        self.set(name, "");
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// Value of `name`, `Some("")` for a bare define.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&'static str> {
        // never interned, never set
        interner::get(name)?;
        self.entries
            .binary_search_by(|&(k, _)| interner::resolve(k).cmp(name))
            .ok()
            .map(|idx| interner::resolve(self.entries[idx].1))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `#define` line per entry, ordered by name.
    #[must_use]
    pub fn to_preprocessor(&self) -> String {
        let mut out = String::with_capacity(self.entries.len() * 24);
        for &(name, value) in &self.entries {
            out.push_str("#define ");
            out.push_str(interner::resolve(name));
            let value = interner::resolve(value);
            if !value.is_empty() {
                out.push(' ');
                out.push_str(value);
            }
            out.push('\n');
        }
        out
    }
}

impl Hash for ShaderDefines {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl PartialEq for ShaderDefines {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ShaderDefines {}
