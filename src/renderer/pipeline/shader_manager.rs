//! Shader Asset & Program Manager
//!
//! Owns the embedded shader assets, the process-wide minijinja environment
//! the lit backend renders through, and the program cache.
//!
//! ## Asset layout
//!
//! | Path                 | Content                                          |
//! |----------------------|--------------------------------------------------|
//! | `chunks/<name>.glsl` | Frontend chunks with `$` placeholders            |
//! | `templates/*.glsl`   | Lit backend templates (minijinja, custom syntax) |
//!
//! ## Program cache
//!
//! [`ProgramLibrary`] keys programs by [`KeyGenerator`] output and, on a
//! miss, generates and deduplicates the result by hashing the **final**
//! vertex + fragment source with xxh3-128. Distinct option sets that
//! generate identical source share one [`ProgramDefinition`].

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use minijinja::{Environment, Error, ErrorKind, syntax::SyntaxConfig};
use rust_embed::RustEmbed;
use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

use super::program_key::KeyGenerator;
use super::shader_gen::{ProgramDefinition, StandardShaderGenerator};
use crate::errors::Result;
use crate::resources::material_options::MaterialOptions;

pub static SHADER_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(RustEmbed)]
#[folder = "src/renderer/pipeline/shaders"]
pub(crate) struct ShaderAssets;

/// The shared template environment.
///
/// Blocks use `{$ ... $}`, variables `{{ ... }}` and line statements `$$`.
/// Includes resolve relative to `templates/`.
pub fn get_env() -> &'static Environment<'static> {
    SHADER_ENV.get_or_init(|| {
        let mut env = Environment::new();

        match SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .line_statement_prefix("$$")
            .build()
        {
            Ok(syntax) => env.set_syntax(syntax),
            Err(e) => log::error!("Failed to configure shader template syntax: {e}"),
        }

        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);

        env.set_loader(shader_loader);

        env.set_path_join_callback(|name, _parent| format!("templates/{name}").into());

        env
    })
}

fn shader_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let filename = if std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("glsl"))
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.glsl"))
    };

    #[cfg(debug_assertions)]
    {
        let path = std::path::Path::new("src/renderer/pipeline/shaders").join(filename.as_ref());
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(source) => return Ok(Some(source)),
                Err(e) => {
                    return Err(Error::new(
                        ErrorKind::TemplateNotFound,
                        format!("Failed to read file: {e}"),
                    ));
                }
            }
        }
    }

    if let Some(file) = ShaderAssets::get(&filename)
        && let Ok(source) = std::str::from_utf8(file.data.as_ref())
    {
        return Ok(Some(source.to_string()));
    }

    Ok(None)
}

// ─── ProgramLibrary ───────────────────────────────────────────────────────────

/// Program cache in front of a [`StandardShaderGenerator`].
pub struct ProgramLibrary {
    generator: StandardShaderGenerator,
    keys: KeyGenerator,
    /// Cache key → program.
    programs: FxHashMap<String, Arc<ProgramDefinition>>,
    /// xxh3-128 of final source → program.
    sources: FxHashMap<u128, Arc<ProgramDefinition>>,
}

impl ProgramLibrary {
    #[must_use]
    pub fn new(generator: StandardShaderGenerator) -> Self {
        Self {
            generator,
            keys: KeyGenerator::new(),
            programs: FxHashMap::default(),
            sources: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn generator(&self) -> &StandardShaderGenerator {
        &self.generator
    }

    #[must_use]
    pub fn keys(&self) -> &KeyGenerator {
        &self.keys
    }

    /// Returns the cached program for `options`, generating it on a miss.
    ///
    /// The key is taken before generation normalizes `options`.
    pub fn get_or_generate(&mut self, options: &mut MaterialOptions) -> Result<Arc<ProgramDefinition>> {
        let key = self.keys.generate_key(options)?;
        if let Some(program) = self.programs.get(&key) {
            return Ok(Arc::clone(program));
        }

        log::debug!("Program cache miss, generating ({} cached)", self.programs.len());

        let definition = self.generator.create_shader_definition(options)?;
        let hash = source_hash(&definition);

        let program = match self.sources.get(&hash) {
            Some(existing) => Arc::clone(existing),
            None => {
                if self.generator.settings().log_generated_source {
                    Self::trace_program(&definition);
                }
                let program = Arc::new(definition);
                self.sources.insert(hash, Arc::clone(&program));
                program
            }
        };

        self.programs.insert(key, Arc::clone(&program));
        Ok(program)
    }

    /// Number of cached keys.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Number of distinct generated sources.
    #[must_use]
    pub fn unique_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn clear(&mut self) {
        self.programs.clear();
        self.sources.clear();
    }

    fn trace_program(definition: &ProgramDefinition) {
        log::trace!(
            "================= Generated Program {} ==================\n// vertex\n{}\n// fragment\n{}",
            definition.name,
            definition.vertex_code,
            definition.fragment_code
        );
    }
}

/// xxh3-128 over the vertex source, a separator and the fragment source.
#[must_use]
pub fn source_hash(definition: &ProgramDefinition) -> u128 {
    let mut bytes =
        Vec::with_capacity(definition.vertex_code.len() + definition.fragment_code.len() + 1);
    bytes.extend_from_slice(definition.vertex_code.as_bytes());
    bytes.push(0);
    bytes.extend_from_slice(definition.fragment_code.as_bytes());
    xxh3_128(&bytes)
}
