// ============================================================================
// pull-signals - Reactivity Module
// Equality policies for deciding whether a recomputed value counts as a
// change (§4.5)
// ============================================================================

pub mod equality;

pub use equality::{
    always_equals, always_equals_fn, by_field, deep_equals, default_equals_fn, equals,
    never_equals, never_equals_fn, safe_equals_f32, safe_equals_f64, safe_equals_option_f64,
    safe_not_equal_f32, safe_not_equal_f64, shallow_equals_slice, shallow_equals_vec,
};
