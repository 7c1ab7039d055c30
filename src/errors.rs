//! Error Types
//!
//! This module defines the error types used throughout the shader generator.
//!
//! # Overview
//!
//! The main error type [`ShaderGenError`] covers the failure modes that are
//! owned by the generator itself:
//! - Chunk repository defects (a referenced chunk is missing)
//! - Chunk text defects (a placeholder outside the closed set)
//! - Lit backend template failures
//! - Serialization failures while deriving cache keys or reading settings
//!
//! Malformed *material options* are never an error: out-of-range UV sets and
//! mismatched channel masks are normalized, unknown pass ids fall back to the
//! forward pass.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ShaderGenError>`.
//!
//! ```rust,ignore
//! use myth_shadergen::errors::Result;
//!
//! fn build() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for shader generation.
#[derive(Error, Debug)]
pub enum ShaderGenError {
    // ========================================================================
    // Chunk Errors
    // ========================================================================
    /// The chunk repository has no chunk with this name.
    #[error("Shader chunk not found: {0}")]
    ChunkNotFound(String),

    /// A chunk references a placeholder outside the supported set.
    #[error("Unknown placeholder `${token}` in shader chunk `{chunk}`")]
    UnknownPlaceholder {
        /// Name of the chunk being composed
        chunk: String,
        /// The placeholder identifier, without the `$` sentinel
        token: String,
    },

    // ========================================================================
    // Template Errors
    // ========================================================================
    /// Lit backend template failed to load or render.
    #[error("Shader template error: {0}")]
    Template(#[from] minijinja::Error),

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization or parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// A user shader pass with this name already exists.
    #[error("Shader pass name already in use: {0}")]
    PassNameInUse(String),
}

/// Alias for `Result<T, ShaderGenError>`.
pub type Result<T> = std::result::Result<T, ShaderGenError>;
