//! Shader generation pipeline
//!
//! Leaf-first:
//! - chunks: chunk repository and per-material override layering
//! - placeholders: `$` placeholder substitution
//! - source_builder: per-call text sections and the sampler table
//! - map_composer: per-feature chunk composition and UV bookkeeping
//! - program_key: program cache keys
//! - shader_pass: render pass registry
//! - lit_shader: pass-invariant stages (lit backend)
//! - shader_gen: the standard shader generator
//! - shader_manager: embedded assets, template environment, program cache

pub mod chunks;
pub mod lit_shader;
pub mod map_composer;
pub mod placeholders;
pub mod program_key;
pub mod shader_gen;
pub mod shader_manager;
pub mod shader_pass;
pub mod source_builder;

pub use chunks::{ChunkLibrary, ChunkRepository, ChunkSet, REQUIRED_CHUNKS};
pub use lit_shader::{FrontendSource, LitBackend, LitCapabilities, TemplateLitBackend, VertexSemantic};
pub use map_composer::{ComposedChunk, MapComposer, MapTransform, UvUsage};
pub use program_key::KeyGenerator;
pub use shader_gen::{ProgramDefinition, StandardShaderGenerator};
pub use shader_manager::ProgramLibrary;
pub use shader_pass::{
    PassKind, SHADER_DEPTH, SHADER_FORWARD, SHADER_FORWARD_HDR, SHADER_PICK, SHADER_SHADOW,
    ShaderPassInfo, ShaderPassRegistry,
};
pub use source_builder::{FrontendBuilder, SamplerKey, SamplerTable, SourceBuilder};
