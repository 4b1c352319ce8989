// ============================================================================
// pull-signals - A Lazy, Pull-Based Reactive Signal Graph
// ============================================================================
//
// A fine-grained reactive computation engine: writable `Input<T>` leaves and
// read-only derived `Signal<T>` nodes, recomputed on demand and cached until
// one of their inputs actually changes. There is no scheduler and no
// tracking context — a derivation declares its sources up front through
// `read`/`read2`/`read3`, and reading it always walks exactly the nodes that
// might be stale.
//
// See the crate's design notes for the pull algorithm (`core`), the node
// types it operates on (`primitives`), and the equality policies that decide
// what counts as a change (`reactivity`).
// ============================================================================

pub mod core;
pub mod macros;
pub mod primitives;
pub mod reactivity;

pub use core::{default_equals, EngineContext, EqualsFn, NodeState, ReactiveError};
pub use primitives::{
    input, input_named, input_with_equals, read, read2, read2_with_equals, read3,
    read3_with_equals, read_with_equals, AsSource, Computed, Input, Signal, SourceNode,
};
pub use reactivity::equality::{
    always_equals, by_field, deep_equals, equals, never_equals, safe_equals_f32, safe_equals_f64,
    safe_equals_option_f64, safe_not_equal_f32, safe_not_equal_f64, shallow_equals_slice,
    shallow_equals_vec,
};

// =============================================================================
// TESTS
// =============================================================================
