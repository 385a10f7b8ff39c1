//! Request Dispatch Pipeline
//!
//! waypoint-pipeline wraps each application action as it flows through
//! dispatch and keeps it in lock-step with the history core. Per navigation
//! chain it tracks one pending, not-yet-committed request, cancels superseded
//! pending requests, coerces route actions dispatched from inside a busy
//! chain into redirects, and exposes block/confirm semantics for gated
//! navigation ("leave this page?" prompts).
//!
//! The pipeline depends on the history core's commit/revert contract only; it
//! never talks to a browser directly.

mod action;
mod context;
mod error;
mod pipeline;
mod request;
mod routes;

pub use action::{
    Action, ActionRef, HistoryUpdate, RedirectAction, RouteAction, DEFAULT_REDIRECT_STATUS,
};
pub use context::{CancelToken, ChainCtx, ChainTmp};
pub use error::PipelineError;
pub use pipeline::{DispatchFuture, DispatchSink, Pipeline};
pub use request::Request;
pub use routes::{LeaveGuard, Route, RouteCallback, Routes};
