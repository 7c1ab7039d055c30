//! Utility Module
//!
//! - [`interner`]: String interning for efficient symbol storage
//!
//! # String Interning
//!
//! The interner module provides efficient string storage for frequently
//! used identifiers like preprocessor define names. Interned strings (Symbols)
//! can be compared in O(1) time.
//!
//! ```rust,ignore
//! use myth_shadergen::utils::interner;
//!
//! let sym1 = interner::intern("FORWARD_PASS");
//! let sym2 = interner::intern("FORWARD_PASS");
//! assert_eq!(sym1, sym2); // O(1) comparison
//! ```

pub mod interner;

pub use interner::Symbol;
