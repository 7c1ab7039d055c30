//! Renderer-side shader generation.
//!
//! - [`pipeline`]: chunk composition, program assembly and caching
//! - [`settings`]: generator configuration

pub mod pipeline;
pub mod settings;

pub use settings::{GeneratorSettings, PlaceholderPolicy};
