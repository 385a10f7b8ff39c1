use futures_util::future::LocalBoxFuture;

use crate::state::HistoryState;

/// The navigation-surface operation a commit translates to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverOp {
    /// Install the bootstrap state.
    Load,
    /// Write a new address without reloading.
    Push,
    /// Overwrite the current address without reloading.
    Replace,
    /// Move `n` positions along the platform stack. `is_pop` means the
    /// platform already moved (user pressed back/forward) and no write is
    /// needed.
    Jump { n: isize, is_pop: bool },
    /// Update the state payload of the entry `n` positions away without
    /// changing the current position.
    SetState { n: isize },
    /// Replace the entire platform stack.
    Reset,
}

/// Binds the history core to a concrete navigation surface.
///
/// Implementations serialize committed proposals into real platform calls.
/// The browser implementation lives in `waypoint-web`; [`MemoryDriver`] is the
/// in-memory host used by tests, servers and native apps.
///
/// All handlers are asynchronous: the browser write itself is synchronous, but
/// forced navigation is not, so consumers must treat every application as an
/// awaitable step.
///
/// [`MemoryDriver`]: crate::MemoryDriver
pub trait HistoryDriver {
    /// Apply a committed transition to the platform.
    ///
    /// `prev` is the state committed before this transition; drivers use it
    /// to wait for the platform to catch up before issuing further writes.
    fn handle(
        &self,
        op: &DriverOp,
        next: &HistoryState,
        prev: &HistoryState,
    ) -> LocalBoxFuture<'static, ()>;

    /// Persist the committed stack. Called after every commit.
    fn save(&self, state: &HistoryState) {
        let _ = state;
    }
}
