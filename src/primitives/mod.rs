// ============================================================================
// pull-signals - Primitives Module
// Core reactive primitives: input leaves and derived signals
// ============================================================================

pub mod derived;
pub mod input;
pub mod signal;

pub use derived::Computed;
pub use input::{input, input_named, input_with_equals, Input};
pub use signal::{
    read, read2, read2_with_equals, read3, read3_with_equals, read_with_equals, AsSource, Signal,
    SourceNode,
};
