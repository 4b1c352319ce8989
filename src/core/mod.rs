// ============================================================================
// pull-signals - Core Module
// Fundamental types, traits, and context for the reactive engine
// ============================================================================

pub mod constants;
pub mod context;
pub mod error;
pub mod types;

pub use constants::NodeState;
pub use context::{check_reactive_access, next_id, run_computing, with_context, EngineContext};
pub use error::ReactiveError;
pub use types::{
    default_equals, input_set_contains, union_inputs, AnyInput, AnyNode, AnyReader, EqualsFn,
};
