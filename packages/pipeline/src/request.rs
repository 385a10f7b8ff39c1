use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use tracing::debug;
use waypoint_history::{CommitHandle, History, RevertHandle};

use crate::action::{Action, RedirectAction, DEFAULT_REDIRECT_STATUS};
use crate::context::{CancelToken, ChainCtx, ChainTmp, PendingConfirm};
use crate::pipeline::Pipeline;
use crate::routes::Route;

/// One in-flight action flowing through the pipeline.
///
/// A request is created per dispatched action and discarded once its chain
/// settles. Its `tmp` and `ctx` handles are shared with every other request
/// of the same chain.
pub struct Request {
    pub(crate) pipeline: Rc<Pipeline>,
    /// The (possibly coerced) action this request carries.
    pub action: Action,
    /// The descriptor the action resolved to.
    pub route: Rc<Route>,
    /// The descriptor of the route we are navigating away from.
    pub prev_route: Rc<Route>,
    pub(crate) from_history: bool,
    pub(crate) tmp: Rc<ChainTmp>,
    pub(crate) ctx: Rc<ChainCtx>,
    pub(crate) cancel: CancelToken,
    pub(crate) commit_history: Option<CommitHandle>,
    pub(crate) revert_pop: Option<RevertHandle>,
}

impl Request {
    /// The history this request's pipeline drives.
    #[must_use]
    pub fn history(&self) -> &History {
        self.pipeline.history()
    }

    /// Whether a newer chain superseded this request.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether this chain started from the initial load transition.
    #[must_use]
    pub fn is_first_load(&self) -> bool {
        self.tmp.load.get()
    }

    /// Whether this chain has already committed a URL change.
    #[must_use]
    pub fn has_committed(&self) -> bool {
        self.tmp.committed.get()
    }

    /// Commit the request: mark the chain committed, then apply the
    /// application dispatch and the history commit concurrently. Both must
    /// complete for the returned future to settle.
    ///
    /// A cancelled request commits nothing.
    pub fn commit(&self) -> LocalBoxFuture<'static, Value> {
        if self.cancel.is_cancelled() {
            debug!("skipping commit of cancelled request");
            return async { Value::Null }.boxed_local();
        }

        self.ctx.pending.borrow_mut().take();
        self.tmp.committed.set(true);

        let dispatched = (self.pipeline.sink())(self.action.clone());
        let history = match &self.commit_history {
            Some(commit) => commit.call(),
            None => async {}.boxed_local(),
        };

        async move {
            let (result, ()) = futures_util::future::join(dispatched, history).await;
            result
        }
        .boxed_local()
    }

    /// Dispatch a follow-up action within this chain.
    ///
    /// While the chain is busy, a routed action is coerced into a redirect
    /// (status 302) instead of a fresh push, preserving "one navigation, one
    /// history entry". If the chain has not committed yet and came from a pop
    /// event, the pop is reverted immediately.
    pub fn dispatch(&self, action: Action) -> LocalBoxFuture<'static, Value> {
        let route = self.pipeline.routes().lookup(&action);
        let action = match action {
            Action::Route(inner)
                if self.ctx.busy.get() && route.is_navigable() =>
            {
                if !self.tmp.committed.get() {
                    if let Some(revert) = &self.revert_pop {
                        debug!("reverting uncommitted pop before redirect");
                        revert.call();
                    }
                }
                Action::Redirect(RedirectAction {
                    action: inner,
                    status: DEFAULT_REDIRECT_STATUS,
                })
            }
            other => other,
        };

        self.pipeline.dispatch_chained(action, self.tmp.clone(), false)
    }

    /// Register a confirm handle on the chain context and announce the block
    /// through the dispatch sink.
    pub fn block(&self) -> LocalBoxFuture<'static, Value> {
        *self.ctx.confirm.borrow_mut() = Some(PendingConfirm {
            action: self.action.clone(),
            route: self.prev_route.clone(),
        });
        (self.pipeline.sink())(Action::Block(self.action.reference()))
    }
}
