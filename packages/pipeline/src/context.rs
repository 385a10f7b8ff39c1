use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::action::Action;
use crate::routes::Route;

/// Chain-wide flags shared by every request of one navigation chain.
///
/// Shared by `Rc` reference; the data itself is never duplicated, since a
/// copy would break chain-wide busy/pending tracking.
#[derive(Default)]
pub struct ChainCtx {
    /// Latched true once any action in the chain carries a path or
    /// originates from history. Pathless follow-up actions inherit it.
    pub(crate) busy: Cell<bool>,
    /// The at-most-one in-flight, not-yet-committed request of the chain.
    pub(crate) pending: RefCell<Option<CancelToken>>,
    /// A blocked navigation waiting for confirmation.
    pub(crate) confirm: RefCell<Option<PendingConfirm>>,
}

/// Shared across a redirect chain so "has this chain already committed a URL
/// change" is knowable chain-wide.
#[derive(Default)]
pub struct ChainTmp {
    pub(crate) committed: Cell<bool>,
    pub(crate) load: Cell<bool>,
}

/// Cooperative cancellation token for a pending request.
///
/// Once cancelled, the request's eventual commit and revert calls are
/// downgraded to no-ops; platform writes already issued are not rolled back.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// What `confirm` needs to resume or decline a blocked navigation.
pub(crate) struct PendingConfirm {
    /// The blocked action, re-dispatched verbatim on acceptance.
    pub action: Action,
    /// The route whose leave guard blocked it.
    pub route: Rc<Route>,
}
