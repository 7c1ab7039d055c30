//! Program cache keys.
//!
//! A key is a pure function of an option set's *values*: options are
//! serialized with serde, their property names are sorted and each
//! `name + value` pair is written on its own line. The nested lit options
//! follow under their own header by the same rule:
//!
//! ```text
//! standard:
//! ao{"channel":"g",...}
//! dirLightMapfalse
//! ...
//! lit:
//! alphaTestfalse
//! chunks
//! diffusePS"<override text, JSON-escaped>"
//! ...
//! ```
//!
//! Two option sets that compare equal always produce the same key;
//! instance identity never leaks into it.

use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

use crate::errors::Result;
use crate::renderer::pipeline::shader_pass::SHADER_DEPTH;
use crate::resources::material_options::MaterialOptions;

const LIT_PROPERTY: &str = "litOptions";
const CHUNKS_PROPERTY: &str = "chunks";

/// Sorted property names of one option layout.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PropertyLists {
    standard: Vec<String>,
    lit: Vec<String>,
}

impl PropertyLists {
    fn collect(root: &Map<String, Value>) -> Self {
        let standard = sorted_names(root, Some(LIT_PROPERTY));
        let lit = match root.get(LIT_PROPERTY) {
            Some(Value::Object(lit)) => sorted_names(lit, None),
            _ => Vec::new(),
        };
        Self { standard, lit }
    }
}

fn sorted_names(object: &Map<String, Value>, skip: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = object
        .keys()
        .filter(|name| Some(name.as_str()) != skip)
        .cloned()
        .collect();
    names.sort_unstable();
    names
}

/// Derives program cache keys from [`MaterialOptions`].
///
/// Holds two canonical option sets. Their sorted property lists are computed
/// on first use and reused whenever one of those exact instances is keyed.
#[derive(Debug)]
pub struct KeyGenerator {
    full_defaults: Arc<MaterialOptions>,
    minimal_defaults: Arc<MaterialOptions>,
    full_properties: OnceLock<PropertyLists>,
    minimal_properties: OnceLock<PropertyLists>,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyGenerator {
    #[must_use]
    pub fn new() -> Self {
        let full = MaterialOptions::new();

        let mut minimal = MaterialOptions::new();
        minimal.lit_options.pass = SHADER_DEPTH;
        minimal.lit_options.use_specular = false;

        Self {
            full_defaults: Arc::new(full),
            minimal_defaults: Arc::new(minimal),
            full_properties: OnceLock::new(),
            minimal_properties: OnceLock::new(),
        }
    }

    /// Canonical forward-pass option set.
    #[must_use]
    pub fn full_defaults(&self) -> &Arc<MaterialOptions> {
        &self.full_defaults
    }

    /// Canonical depth-pass option set with specular disabled.
    #[must_use]
    pub fn minimal_defaults(&self) -> &Arc<MaterialOptions> {
        &self.minimal_defaults
    }

    /// Computes the cache key of `options`.
    pub fn generate_key(&self, options: &MaterialOptions) -> Result<String> {
        let root: Map<String, Value> = serde_json::from_value(serde_json::to_value(options)?)?;

        let memo = if std::ptr::eq(options, Arc::as_ptr(&self.full_defaults)) {
            Some(&self.full_properties)
        } else if std::ptr::eq(options, Arc::as_ptr(&self.minimal_defaults)) {
            Some(&self.minimal_properties)
        } else {
            None
        };

        let fresh;
        let properties = match memo {
            Some(cell) => cell.get_or_init(|| PropertyLists::collect(&root)),
            None => {
                fresh = PropertyLists::collect(&root);
                &fresh
            }
        };

        let mut key = String::with_capacity(2048);
        key.push_str("standard:\n");
        write_properties(&mut key, &root, &properties.standard);

        key.push_str("lit:\n");
        if let Some(Value::Object(lit)) = root.get(LIT_PROPERTY) {
            write_properties(&mut key, lit, &properties.lit);
        }

        Ok(key)
    }
}

fn write_properties(key: &mut String, object: &Map<String, Value>, names: &[String]) {
    for name in names {
        let Some(value) = object.get(name) else {
            continue;
        };

        key.push_str(name);
        match (name.as_str(), value) {
            (CHUNKS_PROPERTY, Value::Object(chunks)) => {
                key.push('\n');
                let mut entries: Vec<_> = chunks.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                // quoted, override text may span lines
                for (chunk, text) in entries {
                    key.push_str(chunk);
                    key.push_str(&text.to_string());
                    key.push('\n');
                }
            }
            _ => {
                push_value(key, value);
                key.push('\n');
            }
        }
    }
}

fn push_value(key: &mut String, value: &Value) {
    match value {
        Value::String(s) => key.push_str(s),
        other => key.push_str(&other.to_string()),
    }
}
