use std::cell::RefCell;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use crate::driver::{DriverOp, HistoryDriver};
use crate::state::HistoryState;

/// A [`HistoryDriver`] with no platform underneath.
///
/// All navigation state lives in the core; commits only record which platform
/// operation they would have issued. Suitable for tests, servers and any
/// non-browser host.
#[derive(Default)]
pub struct MemoryDriver {
    ops: RefCell<Vec<DriverOp>>,
    saves: RefCell<Vec<HistoryState>>,
}

impl MemoryDriver {
    /// The platform operations committed so far, in commit order.
    #[must_use]
    pub fn ops(&self) -> Vec<DriverOp> {
        self.ops.borrow().clone()
    }

    /// The states persisted so far, in commit order.
    #[must_use]
    pub fn saved(&self) -> Vec<HistoryState> {
        self.saves.borrow().clone()
    }
}

impl HistoryDriver for MemoryDriver {
    fn handle(
        &self,
        op: &DriverOp,
        _next: &HistoryState,
        _prev: &HistoryState,
    ) -> LocalBoxFuture<'static, ()> {
        self.ops.borrow_mut().push(op.clone());
        async {}.boxed_local()
    }

    fn save(&self, state: &HistoryState) {
        self.saves.borrow_mut().push(state.clone());
    }
}
