// ============================================================================
// pull-signals - Derived Nodes
// Lazy, cached values computed from one or more source signals
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::trace;

use crate::core::{
    check_reactive_access, next_id, run_computing, union_inputs, AnyInput, AnyNode, AnyReader,
    EqualsFn, NodeState, ReactiveError,
};

use super::signal::{Signal, SourceNode};

// =============================================================================
// AUTO-UNWRAP
// =============================================================================

/// The result of a derivation's compute closure: either a plain value, or
/// another signal whose value the engine reads through transparently (§4.2
/// step 4f). A derived's cached value is always the former — two levels of
/// unwrap can never occur because `Computed<T>` only ever names one.
pub enum Computed<T> {
    Value(T),
    Signal(Signal<T>),
}

impl<T> Computed<T> {
    pub fn value(value: T) -> Self {
        Computed::Value(value)
    }

    pub fn signal(signal: Signal<T>) -> Self {
        Computed::Signal(signal)
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

/// What a derivation's direct-source fetch (§4.2 steps a-c) produces: a
/// thunk that, when called, invokes the user `compute` with the
/// already-fetched source values; the transitive input set those sources
/// report; and whether every direct source ended this step `CLEAN_SAME`.
pub type EvalOutcome<T> = (Box<dyn FnOnce() -> Computed<T>>, Vec<Rc<dyn AnyInput>>, bool);

type EvalFn<T> = Box<dyn FnMut() -> Result<EvalOutcome<T>, ReactiveError>>;

// =============================================================================
// DERIVED INNER
// =============================================================================

/// The internal data behind a derived `Signal<T>`: the pull algorithm of
/// §4.2 lives here.
pub struct DerivedInner<T> {
    id: u64,
    name: Option<String>,
    state: Cell<NodeState>,
    value: RefCell<Option<T>>,
    equals: EqualsFn<T>,
    eval: RefCell<EvalFn<T>>,
    inputs: RefCell<Vec<Rc<dyn AnyInput>>>,
    self_ref: RefCell<Weak<DerivedInner<T>>>,
}

impl<T: Clone + 'static> DerivedInner<T> {
    pub fn new<E>(eval: E, equals: EqualsFn<T>) -> Rc<Self>
    where
        E: FnMut() -> Result<EvalOutcome<T>, ReactiveError> + 'static,
    {
        Self::new_named(eval, equals, None)
    }

    pub fn new_named<E>(eval: E, equals: EqualsFn<T>, name: Option<String>) -> Rc<Self>
    where
        E: FnMut() -> Result<EvalOutcome<T>, ReactiveError> + 'static,
    {
        let inner = Rc::new(Self {
            id: next_id(),
            name,
            state: Cell::new(NodeState::Dirty),
            value: RefCell::new(None),
            equals,
            eval: RefCell::new(Box::new(eval)),
            inputs: RefCell::new(Vec::new()),
            self_ref: RefCell::new(Weak::new()),
        });
        *inner.self_ref.borrow_mut() = Rc::downgrade(&inner);
        inner
    }

    fn reader_weak(&self) -> Weak<dyn AnyReader> {
        let weak: Weak<dyn AnyReader> = self.self_ref.borrow().clone();
        weak
    }

    /// §4.2, steps 1-7. The heart of the engine.
    fn pull_internal(&self) -> Result<(T, NodeState), ReactiveError> {
        // Step 1: reentrancy check. Rejects both a direct external call made
        // while some *other* derivation's compute is on the stack, and a
        // derivation reading itself or a sibling through the non-reactive
        // API from inside its own compute body (scenario 7).
        check_reactive_access()?;

        // Step 2: fast path.
        if self.state.get().is_dirty() {
            self.recompute()?;
        }

        let value = self
            .value
            .borrow()
            .clone()
            .expect("derived has no cached value after a successful recompute");
        Ok((value, self.state.get()))
    }

    fn recompute(&self) -> Result<(), ReactiveError> {
        let self_weak = self.reader_weak();

        // Step 3: unsubscribe from the inputs this node currently lists.
        let old_inputs = self.inputs.borrow().clone();
        for input in &old_inputs {
            input.unregister_reader(&self_weak);
        }

        // Step 4a-c: fetch direct sources, union their inputs, and compute
        // the upstream verdict. This is engine-internal recursion through
        // `SourceNode::pull`, not a user-facing access, so it runs with the
        // reentrancy guard *not* engaged.
        let (thunk, mut new_inputs, all_same) = (self.eval.borrow_mut())()?;

        let first_eval = self.value.borrow().is_none();

        if all_same && !first_eval {
            // Step 4d: cascade-skip. The cached value is left untouched;
            // only the freshness flag changes.
            trace!("derived {} cascade-skipped, sources all CLEAN_SAME", self.id);
            self.state.set(NodeState::CleanSame);
        } else {
            // Step 4e: invoke the user's compute, guarded so any get()/set()
            // reaching the engine from inside it is rejected (§4.3).
            trace!("derived {} recomputing", self.id);
            let result = run_computing(thunk);

            // Step 4f: auto-unwrap. A signal-valued result is read through
            // (recursively, outside the guard) and its inputs merged in.
            let raw = match result {
                Computed::Value(value) => value,
                Computed::Signal(signal) => {
                    let (inner_value, _) = signal.inner.pull()?;
                    union_inputs(&mut new_inputs, &signal.inner.inputs_snapshot());
                    inner_value
                }
            };

            // Step 5: equality & state.
            let changed = match self.value.borrow().as_ref() {
                Some(old) => !(self.equals)(old, &raw),
                None => true,
            };
            *self.value.borrow_mut() = Some(raw);
            self.state.set(if changed {
                NodeState::CleanDifferent
            } else {
                NodeState::CleanSame
            });
        }

        // Step 6: resubscribe using the freshly gathered input set — done
        // unconditionally (even on the step-4d short circuit) so this node
        // stays correctly registered with every input it transitively
        // reads; only the cached *value* is preserved untouched by 4d.
        for input in &new_inputs {
            input.register_reader(self_weak.clone());
        }
        *self.inputs.borrow_mut() = new_inputs;

        Ok(())
    }

    pub fn get(&self) -> Result<T, ReactiveError> {
        self.pull_internal().map(|(value, _)| value)
    }

    fn peek(&self) -> Option<T> {
        self.value.borrow().clone()
    }
}

impl<T: 'static> AnyNode for DerivedInner<T> {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn state(&self) -> NodeState {
        self.state.get()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: 'static> AnyReader for DerivedInner<T> {
    fn mark_dirty(&self) {
        self.state.set(NodeState::Dirty);
    }
}

impl<T: Clone + 'static> SourceNode<T> for DerivedInner<T> {
    fn pull(&self) -> Result<(T, NodeState), ReactiveError> {
        self.pull_internal()
    }

    fn inputs_snapshot(&self) -> Vec<Rc<dyn AnyInput>> {
        self.inputs.borrow().clone()
    }

    fn peek(&self) -> Option<T> {
        DerivedInner::peek(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
