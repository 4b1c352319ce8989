// ============================================================================
// pull-signals - Type Definitions
// Type-erased traits shared by input leaves and derived nodes
// ============================================================================

use std::any::Any;
use std::rc::{Rc, Weak};

use super::constants::NodeState;

// =============================================================================
// EQUALITY
// =============================================================================

/// Comparator deciding whether a node's freshly computed value counts as a
/// change from its prior cached value (§4.5).
pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// Default equality: ordinary `PartialEq`, not identity/pointer comparison,
/// since almost every value type a user reaches for (`i32`, `String`, …)
/// only implements the former.
pub fn default_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

// =============================================================================
// TYPE-ERASED TRAITS
// =============================================================================
//
// The graph has to store inputs and deriveds of unrelated value types in the
// same collections (an input's `readers`, a derived's `inputs`). These
// traits expose exactly the operations that don't need to know the value
// type, so `Rc<dyn AnyInput>` / `Weak<dyn AnyReader>` can stand in for
// `Rc<InputInner<T>>` / `Weak<DerivedInner<S>>` of any T, S.
// =============================================================================

/// Identity and freshness, common to both input and derived nodes (§3 "Node
/// (common)").
pub trait AnyNode: Any {
    /// Monotonically unique id, assigned at construction. Debugging only.
    fn id(&self) -> u64;

    /// Optional display label. Debugging only.
    fn name(&self) -> Option<&str>;

    /// Current freshness state.
    fn state(&self) -> NodeState;

    fn as_any(&self) -> &dyn Any;
}

/// A node that can be notified when one of its transitive inputs changes.
/// Implemented by `DerivedInner<T>`. Inputs hold `Weak<dyn AnyReader>`
/// entries in their `readers` set so a write can reach every listening
/// derivation without keeping it alive (§5 memory discipline).
pub trait AnyReader: AnyNode {
    /// Transition this reader to `Dirty` (§4.1's write propagation).
    fn mark_dirty(&self);
}

/// A leaf node holding an authoritative value. Implemented by
/// `InputInner<T>`. Stored as `Rc<dyn AnyInput>` inside a derived node's
/// `inputs` set, independent of the input's own value type.
pub trait AnyInput: AnyNode {
    /// Record that `reader` consumed this input during the computation it
    /// is currently finishing (§4.2 step 6, resubscribe).
    fn register_reader(&self, reader: Weak<dyn AnyReader>);

    /// Drop the back-reference matching `reader`'s identity, if any (§4.2
    /// step 3, unsubscribe). Implementations may opportunistically purge
    /// other stale (already-dropped) weak references while here.
    fn unregister_reader(&self, reader: &Weak<dyn AnyReader>);
}

// =============================================================================
// INPUT SETS
// =============================================================================
//
// A derived node's `inputs` (§3) is a set of input leaves deduplicated by
// node id, not by `Rc` pointer equality — two different `Rc<dyn AnyInput>`
// handles to the same input are still the same node.
// =============================================================================

/// Whether `set` already contains an input with the given id.
pub fn input_set_contains(set: &[Rc<dyn AnyInput>], id: u64) -> bool {
    set.iter().any(|input| input.id() == id)
}

/// Union `extra` into `into`, skipping any input already present by id.
pub fn union_inputs(into: &mut Vec<Rc<dyn AnyInput>>, extra: &[Rc<dyn AnyInput>]) {
    for input in extra {
        if !input_set_contains(into, input.id()) {
            into.push(input.clone());
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
