// ============================================================================
// pull-signals - Signal Handle & Derivation Constructors
// The read-only surface over an input or a derived node, and `read`/`read2`/
// `read3` (§4.4)
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::{default_equals, AnyInput, AnyNode, EqualsFn, NodeState, ReactiveError};

use super::derived::{Computed, DerivedInner};

// =============================================================================
// SOURCE NODE
// =============================================================================

/// Object-safe, value-typed node: implemented by both `InputInner<T>` and
/// `DerivedInner<T>` so a derivation's constructors can read their direct
/// sources without caring which kind of node each one is.
pub trait SourceNode<T>: AnyNode {
    /// Read the current value, recomputing first if dirty (§4.1 for an
    /// input, §4.2 for a derived). Returns the freshness state the node
    /// ended this call in, for the caller's upstream verdict (§4.2 step c).
    fn pull(&self) -> Result<(T, NodeState), ReactiveError>;

    /// The input leaves transitively consumed by this node's most recent
    /// successful computation (§3 `inputs`). For an input, `{self}`.
    fn inputs_snapshot(&self) -> Vec<Rc<dyn AnyInput>>;

    /// The current cached value without recomputing or checking the
    /// reentrancy guard — `None` for a derived that has never run. Used
    /// only for diagnostics (`Signal: Debug`).
    fn peek(&self) -> Option<T>;
}

// =============================================================================
// SIGNAL<T>
// =============================================================================

/// A read-only handle onto a node in the reactive graph.
///
/// Produced by [`read`]/[`read2`]/[`read3`] or by [`Input::read`]. Cloning
/// shares the underlying node (an `Rc` bump, not a new node).
#[derive(Clone)]
pub struct Signal<T> {
    pub(crate) inner: Rc<dyn SourceNode<T>>,
}

impl<T: Clone + 'static> Signal<T> {
    /// Read the current value, recomputing if dirty (§4.2). Fails with
    /// `NonReactiveAccess` if called from inside a derivation body (§4.3).
    pub fn get(&self) -> Result<T, ReactiveError> {
        self.inner.pull().map(|(value, _)| value)
    }

    /// Construct a derived signal reading this one (§4.4 single-source
    /// form).
    pub fn read<R, F>(&self, f: F) -> Signal<R>
    where
        R: Clone + PartialEq + 'static,
        F: Fn(T) -> Computed<R> + 'static,
    {
        read(self, f)
    }

    /// Like [`Signal::read`], with a custom equality function for the
    /// derived result (§4.5).
    pub fn read_with_equals<R, F>(&self, f: F, equals: EqualsFn<R>) -> Signal<R>
    where
        R: Clone + 'static,
        F: Fn(T) -> Computed<R> + 'static,
    {
        read_with_equals(self, f, equals)
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id())
            .field("value", &self.inner.peek())
            .finish()
    }
}

/// Anything usable as a direct source for a derivation: both [`Input<T>`]
/// and [`Signal<T>`] implement it.
///
/// [`Input<T>`]: super::input::Input
pub trait AsSource<T> {
    fn source_node(&self) -> Rc<dyn SourceNode<T>>;
}

impl<T: Clone + 'static> AsSource<T> for Signal<T> {
    fn source_node(&self) -> Rc<dyn SourceNode<T>> {
        self.inner.clone()
    }
}

// =============================================================================
// CONSTRUCTORS (§4.4)
// =============================================================================

fn union_owned(
    mut base: Vec<Rc<dyn AnyInput>>,
    extra: Vec<Rc<dyn AnyInput>>,
) -> Vec<Rc<dyn AnyInput>> {
    crate::core::union_inputs(&mut base, &extra);
    base
}

/// Single-source derivation constructor (§4.4): `source.read(f)`.
pub fn read<A, R, F>(source: &impl AsSource<A>, f: F) -> Signal<R>
where
    A: Clone + 'static,
    R: Clone + PartialEq + 'static,
    F: Fn(A) -> Computed<R> + 'static,
{
    read_with_equals(source, f, default_equals)
}

/// Like [`read`], with a custom equality function for the result.
pub fn read_with_equals<A, R, F>(source: &impl AsSource<A>, f: F, equals: EqualsFn<R>) -> Signal<R>
where
    A: Clone + 'static,
    R: Clone + 'static,
    F: Fn(A) -> Computed<R> + 'static,
{
    let source = source.source_node();
    let f = Rc::new(f);
    let eval = move || {
        let (a, a_state) = source.pull()?;
        let inputs = source.inputs_snapshot();
        let all_same = a_state.is_same();
        let f = f.clone();
        let thunk: Box<dyn FnOnce() -> Computed<R>> = Box::new(move || f(a));
        Ok((thunk, inputs, all_same))
    };
    Signal {
        inner: DerivedInner::new(eval, equals),
    }
}

/// Two-source derivation constructor (§4.4 multi-source form): `f` runs
/// whenever either source reports a new value; the cascade-skip
/// optimization applies jointly (SAME iff both sources are `CLEAN_SAME`).
pub fn read2<A, B, R, F>(sa: &impl AsSource<A>, sb: &impl AsSource<B>, f: F) -> Signal<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    R: Clone + PartialEq + 'static,
    F: Fn(A, B) -> Computed<R> + 'static,
{
    read2_with_equals(sa, sb, f, default_equals)
}

/// Like [`read2`], with a custom equality function for the result.
pub fn read2_with_equals<A, B, R, F>(
    sa: &impl AsSource<A>,
    sb: &impl AsSource<B>,
    f: F,
    equals: EqualsFn<R>,
) -> Signal<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    R: Clone + 'static,
    F: Fn(A, B) -> Computed<R> + 'static,
{
    let sa = sa.source_node();
    let sb = sb.source_node();
    let f = Rc::new(f);
    let eval = move || {
        let (a, a_state) = sa.pull()?;
        let (b, b_state) = sb.pull()?;
        let inputs = union_owned(sa.inputs_snapshot(), sb.inputs_snapshot());
        let all_same = a_state.is_same() && b_state.is_same();
        let f = f.clone();
        let thunk: Box<dyn FnOnce() -> Computed<R>> = Box::new(move || f(a, b));
        Ok((thunk, inputs, all_same))
    };
    Signal {
        inner: DerivedInner::new(eval, equals),
    }
}

/// Three-source derivation constructor (§4.4 multi-source form).
pub fn read3<A, B, C, R, F>(
    sa: &impl AsSource<A>,
    sb: &impl AsSource<B>,
    sc: &impl AsSource<C>,
    f: F,
) -> Signal<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    R: Clone + PartialEq + 'static,
    F: Fn(A, B, C) -> Computed<R> + 'static,
{
    read3_with_equals(sa, sb, sc, f, default_equals)
}

/// Like [`read3`], with a custom equality function for the result.
pub fn read3_with_equals<A, B, C, R, F>(
    sa: &impl AsSource<A>,
    sb: &impl AsSource<B>,
    sc: &impl AsSource<C>,
    f: F,
    equals: EqualsFn<R>,
) -> Signal<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    R: Clone + 'static,
    F: Fn(A, B, C) -> Computed<R> + 'static,
{
    let sa = sa.source_node();
    let sb = sb.source_node();
    let sc = sc.source_node();
    let f = Rc::new(f);
    let eval = move || {
        let (a, a_state) = sa.pull()?;
        let (b, b_state) = sb.pull()?;
        let (c, c_state) = sc.pull()?;
        let inputs = union_owned(
            union_owned(sa.inputs_snapshot(), sb.inputs_snapshot()),
            sc.inputs_snapshot(),
        );
        let all_same = a_state.is_same() && b_state.is_same() && c_state.is_same();
        let f = f.clone();
        let thunk: Box<dyn FnOnce() -> Computed<R>> = Box::new(move || f(a, b, c));
        Ok((thunk, inputs, all_same))
    };
    Signal {
        inner: DerivedInner::new(eval, equals),
    }
}

// =============================================================================
// TESTS
// =============================================================================
