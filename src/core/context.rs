// ============================================================================
// pull-signals - Engine Context
// Process-wide state: the node-id counter and the reentrancy guard flag
// ============================================================================

use std::cell::Cell;

use log::trace;

use super::error::ReactiveError;

// =============================================================================
// ENGINE CONTEXT
// =============================================================================

/// Thread-local home for the engine's two pieces of global state (§5): the
/// monotonic node-id counter, and the reentrancy-guard flag.
///
/// Both are mutated in strict scopes only: the counter on node construction,
/// the flag around a derivation's `compute` callback.
pub struct EngineContext {
    /// `true` while a derivation's `compute` closure is on the stack. Any
    /// `get`/`set` reaching the engine while this is set is a reentrant,
    /// non-reactive access and must be rejected.
    computing: Cell<bool>,

    /// Debug escape hatch that disables the reentrancy guard entirely (§4.3).
    guard_enabled: Cell<bool>,

    /// Source of node ids; debugging aid only, never consulted for behavior.
    next_id: Cell<u64>,
}

impl EngineContext {
    fn new() -> Self {
        Self {
            computing: Cell::new(false),
            guard_enabled: Cell::new(true),
            next_id: Cell::new(0),
        }
    }

    /// Allocate the next node id.
    pub fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Enable or disable the reentrancy guard. Intended for diagnostics only.
    pub fn set_guard_enabled(&self, enabled: bool) {
        self.guard_enabled.set(enabled);
    }

    pub fn guard_enabled(&self) -> bool {
        self.guard_enabled.get()
    }

    pub fn is_computing(&self) -> bool {
        self.computing.get()
    }

    /// Reject the call if it reaches the engine while a `compute` body is
    /// executing (§4.3). Called at the top of every `get`/`set`.
    pub fn check_reactive_access(&self) -> Result<(), ReactiveError> {
        if self.guard_enabled.get() && self.computing.get() {
            trace!("rejected get()/set() reached while a derivation was computing");
            return Err(ReactiveError::NonReactiveAccess);
        }
        Ok(())
    }

    /// Enter the `compute` callback, returning a guard that restores the
    /// prior state when dropped — including on panic unwind.
    fn enter_compute(&self) -> ComputeGuard<'_> {
        let previous = self.computing.replace(true);
        ComputeGuard {
            ctx: self,
            previous,
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// REENTRANCY GUARD
// =============================================================================

/// RAII guard marking the engine as `COMPUTING` for its lifetime.
///
/// Grounded in the teacher's `BatchGuard`/`UntrackGuard` pattern: entering
/// sets the flag, `Drop` restores whatever was there before, unconditionally,
/// so a panicking `compute` still leaves the engine in a consistent state
/// (§7's "the reentrancy flag must always be restored").
struct ComputeGuard<'a> {
    ctx: &'a EngineContext,
    previous: bool,
}

impl Drop for ComputeGuard<'_> {
    fn drop(&mut self) {
        self.ctx.computing.set(self.previous);
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    static CONTEXT: EngineContext = EngineContext::new();
}

/// Access the thread-local engine context.
pub fn with_context<R>(f: impl FnOnce(&EngineContext) -> R) -> R {
    CONTEXT.with(f)
}

/// Allocate the next node id.
pub fn next_id() -> u64 {
    with_context(|ctx| ctx.next_id())
}

/// Reject the call if the engine is currently `COMPUTING` (§4.3).
pub fn check_reactive_access() -> Result<(), ReactiveError> {
    with_context(|ctx| ctx.check_reactive_access())
}

/// Run `body` with the engine marked `COMPUTING`, guaranteeing the flag is
/// restored afterward even if `body` panics.
pub fn run_computing<R>(body: impl FnOnce() -> R) -> R {
    with_context(|ctx| {
        let _guard = ctx.enter_compute();
        body()
    })
}

/// Disable the reentrancy guard for diagnostics. Not part of the public API.
#[cfg(test)]
pub fn set_guard_enabled(enabled: bool) {
    with_context(|ctx| ctx.set_guard_enabled(enabled));
}

// =============================================================================
// TESTS
// =============================================================================
