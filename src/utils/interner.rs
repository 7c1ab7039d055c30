//! Global String Interner
//!
//! Maps strings to compact integer [`Symbol`]s for cheap comparison and
//! hashing. This backs the preprocessor define sets in
//! [`ShaderDefines`](crate::resources::shader_defines::ShaderDefines).

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Compact integer identifier for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning its Symbol.
///
/// Returns the existing Symbol if the string was interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the Symbol of an already interned string without allocating.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a Symbol back to its string.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

/// Pre-interns the define names emitted for every generated program.
///
/// Call once at startup to keep interning off the generation hot path.
pub fn preload_common_defines() {
    let common = [
        // Passes
        "FORWARD_PASS",
        "FORWARD_HDR_PASS",
        "DEPTH_PASS",
        "PICK_PASS",
        "SHADOW_PASS",
        // Frontend
        "HAS_TANGENTS",
        "LIT_AMBIENT_SH",
        "LIT_CLUSTERED_LIGHTS",
        // Output
        "GAMMA_SRGB",
        "FOG_LINEAR",
        "FOG_EXP",
        "FOG_EXP2",
        "TONEMAP_LINEAR",
        "TONEMAP_FILMIC",
        "TONEMAP_HEJL",
        "TONEMAP_ACES",
        "TONEMAP_ACES2",
        "TONEMAP_NEUTRAL",
        // Bare define value
        "",
    ];

    for name in common {
        intern(name);
    }
}
