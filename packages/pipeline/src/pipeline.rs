use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::future::LocalBoxFuture;
use futures_util::{FutureExt, StreamExt};
use serde_json::Value;
use tracing::{debug, trace, warn};
use waypoint_history::{History, Kind, Transition};

use crate::action::{Action, HistoryUpdate};
use crate::context::{CancelToken, ChainCtx, ChainTmp};
use crate::error::PipelineError;
use crate::request::Request;
use crate::routes::{LeaveGuard, Route, Routes};

/// The settleable handle every dispatch returns.
pub type DispatchFuture = LocalBoxFuture<'static, Value>;

/// The application's dispatch sink: receives every action that leaves the
/// pipeline (committed route actions, history updates, block/unblock
/// signals) and returns a handle to its eventual result.
pub type DispatchSink = Rc<dyn Fn(Action) -> DispatchFuture>;

/// The dispatch pipeline.
///
/// Classifies each incoming action (history-originated vs. route action) and
/// proposes the matching history change for navigable ones. A proposal is
/// committed through the history driver once the chain settles, or reverted
/// when the navigation is blocked or superseded by a newer chain. Externally
/// triggered transitions enter through the history listener; both sources
/// funnel into the same per-chain handling.
pub struct Pipeline {
    routes: Routes,
    history: History,
    sink: DispatchSink,
    ctx: Rc<ChainCtx>,
    last_route: RefCell<Option<String>>,
    tx: UnboundedSender<Action>,
    rx: RefCell<Option<UnboundedReceiver<Action>>>,
}

impl Pipeline {
    /// Wire a pipeline to a history and an application dispatch sink.
    ///
    /// Setup validation happens earlier, in [`Routes::new`]; by the time all
    /// three collaborators exist, construction cannot fail.
    ///
    /// The pipeline installs itself as the history's transition listener:
    /// pop-originated proposals are queued as [`Action::HistoryUpdate`] and
    /// handled by [`Pipeline::run`].
    pub fn new(routes: Routes, history: History, sink: DispatchSink) -> Rc<Self> {
        let (tx, rx) = unbounded();

        let pipeline = Rc::new(Self {
            routes,
            history: history.clone(),
            sink,
            ctx: Rc::new(ChainCtx::default()),
            last_route: RefCell::new(None),
            tx: tx.clone(),
            rx: RefCell::new(Some(rx)),
        });

        history.listen(move |transition| {
            let update = Action::HistoryUpdate(HistoryUpdate {
                transition: transition.clone(),
            });
            if tx.unbounded_send(update).is_err() {
                warn!("pipeline queue closed; dropping history update");
            }
        });

        pipeline
    }

    /// The history this pipeline drives.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn routes(&self) -> &Routes {
        &self.routes
    }

    pub(crate) fn sink(&self) -> &DispatchSink {
        &self.sink
    }

    /// A sender feeding the pipeline's queue, for hosts that deliver actions
    /// from outside the run loop.
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<Action> {
        self.tx.clone()
    }

    /// Dispatch the first-load transition produced by history construction.
    pub fn bootstrap(self: &Rc<Self>, first: Transition) -> DispatchFuture {
        self.dispatch(Action::HistoryUpdate(HistoryUpdate { transition: first }))
    }

    /// Drain the queue, dispatching each action in arrival order. Chains are
    /// processed one at a time; a chain's follow-up actions resolve within
    /// its own dispatch.
    pub async fn run(self: Rc<Self>) {
        let rx = self.rx.borrow_mut().take();
        let Some(mut rx) = rx else {
            debug!("pipeline run loop already taken");
            return;
        };
        while let Some(action) = rx.next().await {
            self.dispatch(action).await;
        }
    }

    /// Dispatch an action as the start of a new navigation chain.
    pub fn dispatch(self: &Rc<Self>, action: Action) -> DispatchFuture {
        self.dispatch_chained(action, Rc::new(ChainTmp::default()), true)
    }

    /// Resolve a blocked navigation.
    ///
    /// Declining dispatches an [`Action::Unblock`] signal. Accepting lifts
    /// the registered leave guard, re-dispatches the blocked action so it
    /// passes through uninhibited, and restores the guard on every exit path.
    pub fn confirm(
        self: &Rc<Self>,
        can_leave: bool,
    ) -> LocalBoxFuture<'static, Result<Value, PipelineError>> {
        let pipeline = self.clone();
        async move {
            let pending = pipeline
                .ctx
                .confirm
                .borrow_mut()
                .take()
                .ok_or(PipelineError::NothingBlocked)?;

            if !can_leave {
                debug!("confirmation declined");
                return Ok((pipeline.sink)(Action::Unblock).await);
            }

            let lifted = pending.route.before_leave.borrow_mut().take();
            let _restore = RestoreGuard {
                route: pending.route.clone(),
                guard: lifted,
            };
            let result = pipeline.dispatch(pending.action.clone()).await;
            Ok(result)
        }
        .boxed_local()
    }

    pub(crate) fn dispatch_chained(
        self: &Rc<Self>,
        action: Action,
        tmp: Rc<ChainTmp>,
        is_new_chain: bool,
    ) -> DispatchFuture {
        let pipeline = self.clone();
        async move {
            let request = pipeline.create_request(action, tmp, is_new_chain);
            let result = pipeline.process(request).await;
            if is_new_chain {
                pipeline.ctx.busy.set(false);
            }
            result
        }
        .boxed_local()
    }

    /// Classify an action and wrap it as a [`Request`], proposing the
    /// matching history change for navigable route actions.
    fn create_request(self: &Rc<Self>, action: Action, tmp: Rc<ChainTmp>, is_new_chain: bool) -> Request {
        let from_history = action.is_from_history();
        let route = self.routes.lookup(&action);
        let prev_route = match self.last_route.borrow().as_deref() {
            Some(name) => self.routes.get(name),
            None => self.routes.lookup(&Action::Unblock),
        };
        let cancel = CancelToken::default();

        // cancel a pending uncommitted request when a new chain comes in
        if route.is_navigable() {
            let mut pending = self.ctx.pending.borrow_mut();
            if is_new_chain {
                if let Some(old) = pending.take() {
                    trace!("new chain supersedes pending request");
                    old.cancel();
                }
            }
            *pending = Some(cancel.clone());
        }

        if let Action::HistoryUpdate(update) = &action {
            if update.transition.next.kind == Kind::Load {
                tmp.load.set(true);
            }
        }

        // a redirect arriving outside a busy chain was initiated externally;
        // the chain counts as having already committed a URL
        if !self.ctx.busy.get() && action.is_redirect() {
            tmp.committed.set(true);
        }

        if route.is_navigable() || from_history {
            self.ctx.busy.set(true);
        }

        let (commit_history, revert_pop) = match &action {
            Action::HistoryUpdate(update) => (
                Some(update.transition.commit.clone()),
                update.transition.revert_pop.clone(),
            ),
            Action::Route(_) | Action::Redirect(_)
                if route.is_navigable() && action.error().is_none() =>
            {
                let path = route.path().unwrap_or("/").to_string();
                let state = action
                    .as_route()
                    .map(|a| a.state.clone())
                    .unwrap_or(Value::Null);
                // pipeline-originated proposals must not re-enter through the
                // listener as a second navigation
                let transition = if action.is_redirect() && tmp.committed.get() {
                    self.history.silently(|h| h.replace(&path, state, None))
                } else {
                    self.history.silently(|h| h.push(&path, state, None))
                };
                (Some(transition.commit.clone()), None)
            }
            _ => (None, None),
        };

        Request {
            pipeline: self.clone(),
            action,
            route,
            prev_route,
            from_history,
            tmp,
            ctx: self.ctx.clone(),
            cancel,
            commit_history,
            revert_pop,
        }
    }

    async fn process(&self, request: Request) -> Value {
        // error-flagged actions keep flowing but never navigate
        if let Some(error) = request.action.error() {
            warn!(%error, "action flagged as error; navigation suppressed");
            if let Some(on_error) = request.route.on_error.clone() {
                on_error(&request).await;
            }
            return (self.sink)(request.action.clone()).await;
        }

        // gate real navigations behind the previous route's leave guard
        if request.route.is_navigable() || request.from_history {
            if let Some(guard) = request.prev_route.leave_guard() {
                let allowed = guard(&request.action.reference()).await;
                if !allowed {
                    debug!("navigation blocked, awaiting confirmation");
                    let result = request.block().await;
                    if !request.tmp.committed.get() {
                        if let Some(revert) = &request.revert_pop {
                            revert.call();
                        }
                    }
                    return result;
                }
            }
        }

        if request.is_cancelled() {
            debug!("request cancelled before commit");
            return Value::Null;
        }

        let result = request.commit().await;

        if let Some(name) = request.action.name() {
            *self.last_route.borrow_mut() = Some(name.to_string());
        }
        if let Some(thunk) = request.route.thunk.clone() {
            thunk(&request).await;
        }
        if let Some(on_complete) = request.route.on_complete.clone() {
            on_complete(&request).await;
        }
        result
    }
}

/// Restores a lifted leave guard when dropped, so `confirm` is
/// exception-safe.
struct RestoreGuard {
    route: Rc<Route>,
    guard: Option<LeaveGuard>,
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            *self.route.before_leave.borrow_mut() = Some(guard);
        }
    }
}
