#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # Myth Shader Generator
//!
//! Generates standard-material programs from declarative options by
//! composing GLSL chunks.
//!
//! ```rust,ignore
//! use myth_shadergen::{GeneratorSettings, MapFeature, MapOptions, MaterialOptions, ProgramLibrary, StandardShaderGenerator};
//!
//! let mut library = ProgramLibrary::new(StandardShaderGenerator::new(GeneratorSettings::default()));
//!
//! let mut options = MaterialOptions::new()
//!     .with_map(MapFeature::Diffuse, MapOptions::new(MapFeature::Diffuse).with_texture(1));
//!
//! let program = library.get_or_generate(&mut options)?;
//! println!("{}", program.fragment_code);
//! ```

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod utils;

pub use errors::{Result, ShaderGenError};
pub use renderer::pipeline::{
    ChunkLibrary, ChunkRepository, KeyGenerator, LitBackend, ProgramDefinition, ProgramLibrary,
    ShaderPassRegistry, StandardShaderGenerator, TemplateLitBackend,
};
pub use renderer::{GeneratorSettings, PlaceholderPolicy};
pub use resources::{
    LitOptions, MapFeature, MapOptions, MaterialOptions, ShaderDefines, TextureEncoding,
    TextureKey, Tint,
};
pub use utils::interner;
