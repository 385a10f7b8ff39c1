use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use crate::state::HistoryState;

pub(crate) type CommitFn = Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>;

/// Applies a proposed transition, at most effectively once.
///
/// The handle may be cloned and invoked from several places (e.g. immediately
/// and again from a deferred callback); every call after the first is a silent
/// no-op. The latch is what keeps pop reconciliation race-free.
#[derive(Clone)]
pub struct CommitHandle {
    fired: Rc<Cell<bool>>,
    run: CommitFn,
}

impl CommitHandle {
    pub(crate) fn new(run: CommitFn) -> Self {
        Self {
            fired: Rc::new(Cell::new(false)),
            run,
        }
    }

    /// Apply the transition. Later calls resolve immediately without effect.
    pub fn call(&self) -> LocalBoxFuture<'static, ()> {
        if self.fired.replace(true) {
            return async {}.boxed_local();
        }
        (self.run)()
    }

    /// Whether the transition has been applied (or at least started).
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

impl fmt::Debug for CommitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitHandle")
            .field("fired", &self.fired.get())
            .finish()
    }
}

/// Compensating action that undoes an already-applied platform navigation
/// after the application rejects it.
///
/// Produced for pop events: the platform has already moved, so a blocked
/// chain must issue the inverse move to restore the visible address. Like
/// [`CommitHandle`] it fires at most once.
#[derive(Clone)]
pub struct RevertHandle {
    fired: Rc<Cell<bool>>,
    run: Rc<dyn Fn()>,
}

impl RevertHandle {
    pub fn new(run: impl Fn() + 'static) -> Self {
        Self {
            fired: Rc::new(Cell::new(false)),
            run: Rc::new(run),
        }
    }

    /// Issue the compensating navigation. Later calls are no-ops.
    pub fn call(&self) {
        if !self.fired.replace(true) {
            (self.run)();
        }
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

impl fmt::Debug for RevertHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevertHandle")
            .field("fired", &self.fired.get())
            .finish()
    }
}

/// Extra classification attached to some transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionInfo {
    /// A move of more than one step along the stack.
    Jump,
    /// The whole stack was replaced.
    Reset,
}

/// A proposed navigation, produced by every history operation.
///
/// Nothing is applied to history until [`Transition::commit`] runs. Cloning
/// shares the underlying handles; committing any clone commits them all.
#[derive(Clone)]
pub struct Transition {
    /// The state history will be in once committed.
    pub next: HistoryState,
    /// Latched commit handle.
    pub commit: CommitHandle,
    /// Set when the transition reconciles a platform pop event; calling it
    /// visually undoes the pop.
    pub revert_pop: Option<RevertHandle>,
    /// Extra classification, when the plain kind is not enough.
    pub info: Option<TransitionInfo>,
}

impl Transition {
    /// Apply the proposal, making `next` the live state.
    pub fn commit(&self) -> LocalBoxFuture<'static, ()> {
        self.commit.call()
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("next", &self.next)
            .field("commit", &self.commit)
            .field("revert_pop", &self.revert_pop)
            .field("info", &self.info)
            .finish()
    }
}
