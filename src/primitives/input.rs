// ============================================================================
// pull-signals - Input Leaves
// Writable source nodes at the base of the reactive graph (§4.1)
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::trace;

use crate::core::{
    check_reactive_access, default_equals, next_id, AnyInput, AnyNode, AnyReader, EqualsFn,
    NodeState, ReactiveError,
};

use super::signal::{read, read_with_equals, AsSource, SourceNode};
use super::derived::Computed;

// =============================================================================
// INPUT INNER
// =============================================================================

/// The internal data behind an [`Input<T>`]: an authoritative value plus the
/// set of derivations currently reading it (§3 "Input").
pub struct InputInner<T> {
    id: u64,
    name: Option<String>,
    state: Cell<NodeState>,
    value: RefCell<T>,
    equals: EqualsFn<T>,
    readers: RefCell<Vec<Weak<dyn AnyReader>>>,
    self_ref: RefCell<Weak<InputInner<T>>>,
}

impl<T> InputInner<T> {
    fn new_with_equals(value: T, equals: EqualsFn<T>, name: Option<String>) -> Rc<Self> {
        let inner = Rc::new(Self {
            id: next_id(),
            name,
            state: Cell::new(NodeState::CleanDifferent),
            value: RefCell::new(value),
            equals,
            readers: RefCell::new(Vec::new()),
            self_ref: RefCell::new(Weak::new()),
        });
        *inner.self_ref.borrow_mut() = Rc::downgrade(&inner);
        inner
    }

    /// §4.1 `set`: replace the value, and if it actually changed by
    /// `equals`, dirty every reader still listening.
    fn set(&self, value: T) -> bool {
        let changed = !(self.equals)(&self.value.borrow(), &value);
        if !changed {
            self.state.set(NodeState::CleanSame);
            return false;
        }
        *self.value.borrow_mut() = value;
        self.state.set(NodeState::CleanDifferent);
        let mut dirtied = 0usize;
        self.readers.borrow_mut().retain(|reader| match reader.upgrade() {
            Some(r) => {
                r.mark_dirty();
                dirtied += 1;
                true
            }
            None => false,
        });
        trace!("input {} changed, dirtying {} reader(s)", self.id, dirtied);
        true
    }
}

impl<T: 'static> AnyNode for InputInner<T> {
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

impl<T: 'static> AnyInput for InputInner<T> {
    fn register_reader(&self, reader: Weak<dyn AnyReader>) {
        self.readers.borrow_mut().push(reader);
    }

    fn unregister_reader(&self, reader: &Weak<dyn AnyReader>) {
        let before = self.readers.borrow().len();
        self.readers
            .borrow_mut()
            .retain(|existing| existing.strong_count() > 0 && !existing.ptr_eq(reader));
        let purged = before - self.readers.borrow().len();
        if purged > 1 {
            // More than the one entry we meant to remove went away: the rest
            // were dangling weak refs left by dropped derived signals (§5).
            trace!("input {} purged {} stale reader(s)", self.id, purged - 1);
        }
    }
}

impl<T: Clone + 'static> SourceNode<T> for InputInner<T> {
    fn pull(&self) -> Result<(T, NodeState), ReactiveError> {
        check_reactive_access()?;
        Ok((self.value.borrow().clone(), self.state.get()))
    }

    fn inputs_snapshot(&self) -> Vec<Rc<dyn AnyInput>> {
        let this: Rc<dyn AnyInput> = self
            .self_ref
            .borrow()
            .upgrade()
            .expect("input outlives its own self-reference");
        vec![this]
    }

    fn peek(&self) -> Option<T> {
        Some(self.value.borrow().clone())
    }
}

// =============================================================================
// INPUT<T>
// =============================================================================

/// A writable leaf of the reactive graph (§3 "Input", §4.1).
#[derive(Clone)]
pub struct Input<T> {
    inner: Rc<InputInner<T>>,
}

impl<T: 'static> Input<T> {
    /// Create a new input with the default (`PartialEq`) equality policy.
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::new_with_equals(value, default_equals)
    }

    /// Create a new input with a custom equality function (§4.5).
    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            inner: InputInner::new_with_equals(value, equals, None),
        }
    }

    /// Create a new input carrying a debug label.
    pub fn new_named(value: T, name: impl Into<String>) -> Self
    where
        T: PartialEq,
    {
        Self {
            inner: InputInner::new_with_equals(value, default_equals, Some(name.into())),
        }
    }
}

impl<T: Clone + 'static> Input<T> {
    /// Read the current value (§4.1). Fails with `NonReactiveAccess` if
    /// called from inside a derivation body.
    pub fn get(&self) -> Result<T, ReactiveError> {
        self.inner.pull().map(|(value, _)| value)
    }

    /// Write a new value, dirtying every transitively-dependent derivation
    /// in one hop if it differs from the current value by `equals` (§4.1).
    pub fn set(&self, value: T) -> Result<(), ReactiveError> {
        check_reactive_access()?;
        self.inner.set(value);
        Ok(())
    }

    /// Construct a derived signal reading this input (§4.4).
    pub fn read<R, F>(&self, f: F) -> super::signal::Signal<R>
    where
        R: Clone + PartialEq + 'static,
        F: Fn(T) -> Computed<R> + 'static,
    {
        read(self, f)
    }

    /// Like [`Input::read`], with a custom equality function for the
    /// derived result (§4.5).
    pub fn read_with_equals<R, F>(&self, f: F, equals: EqualsFn<R>) -> super::signal::Signal<R>
    where
        R: Clone + 'static,
        F: Fn(T) -> Computed<R> + 'static,
    {
        read_with_equals(self, f, equals)
    }
}

impl<T: Clone + 'static> AsSource<T> for Input<T> {
    fn source_node(&self) -> Rc<dyn SourceNode<T>> {
        self.inner.clone()
    }
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

pub fn input<T: PartialEq + 'static>(value: T) -> Input<T> {
    Input::new(value)
}

pub fn input_with_equals<T: 'static>(value: T, equals: EqualsFn<T>) -> Input<T> {
    Input::new_with_equals(value, equals)
}

pub fn input_named<T: PartialEq + 'static>(value: T, name: impl Into<String>) -> Input<T> {
    Input::new_named(value, name)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let a = input(1);
        assert_eq!(a.get().unwrap(), 1);
        a.set(2).unwrap();
        assert_eq!(a.get().unwrap(), 2);
    }

    #[test]
    fn setting_equal_value_reports_same_state_and_skips_dirtying() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let a = input(5);
        let d = a.read(move |x| {
            count_clone.set(count_clone.get() + 1);
            Computed::value(x * 2)
        });
        assert_eq!(d.get().unwrap(), 10);
        assert_eq!(count.get(), 1);

        a.set(5).unwrap();
        assert_eq!(d.get().unwrap(), 10);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn custom_equals_suppresses_dirtying() {
        let never_equal: EqualsFn<i32> = |_, _| false;
        let a = input_with_equals(1, never_equal);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let d = a.read(move |x| {
            count_clone.set(count_clone.get() + 1);
            Computed::value(x)
        });
        d.get().unwrap();
        a.set(1).unwrap();
        d.get().unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn named_input_carries_its_label() {
        let a = input_named(1, "counter");
        assert_eq!(a.inner.name(), Some("counter"));
    }

    #[test]
    fn set_rejected_while_computing() {
        let a = input(1);
        let a_clone = a.clone();
        let d = a.read(move |x| {
            let result = a_clone.set(x + 1);
            assert_eq!(result, Err(ReactiveError::NonReactiveAccess));
            Computed::value(x)
        });
        d.get().unwrap();
    }
}
