// ============================================================================
// pull-signals - Errors
// The one recoverable failure mode the engine defines
// ============================================================================

use thiserror::Error;

/// Errors surfaced by the reactive engine.
///
/// The engine defines exactly one: a derivation body reaching back into the
/// engine through the non-reactive `get`/`set` API instead of through the
/// `read` constructor it was built with. Every other failure mode (a
/// user-supplied `compute` panicking) is left to propagate as a normal Rust
/// panic — see the error handling notes in the expanded specification.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReactiveError {
    /// A `get`/`set` call reached the engine while a derivation was being
    /// computed. Derivations must route all reads through the reactive
    /// `read` API so the engine can record them as dependencies.
    #[error("non-reactive access: get()/set() cannot be called from inside a derivation body")]
    NonReactiveAccess,
}
