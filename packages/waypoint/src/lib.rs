//! waypoint: a navigation history state machine with an action dispatch
//! pipeline.
//!
//! Every navigation is a two-phase affair: operations on
//! [`history::History`] propose a [`history::Transition`] and nothing
//! changes until its commit handle runs. The [`pipeline::Pipeline`] sits
//! between application actions and the history, deciding per navigation
//! chain what commits, what gets coerced into a redirect, and what is
//! blocked pending confirmation.
//!
//! Hosts pick a navigation surface by choosing a driver: the in-memory
//! driver works everywhere (tests, servers, native apps); the `web` feature
//! adds a browser driver backed by the History API.
//!
//! ```
//! use waypoint::history::History;
//!
//! let (history, first) = History::in_memory("/home");
//! futures::executor::block_on(first.commit());
//!
//! let transition = history.push("/about", serde_json::Value::Null, None);
//! futures::executor::block_on(transition.commit());
//! assert_eq!(history.location().pathname, "/about");
//! ```

pub use waypoint_history as history;
pub use waypoint_pipeline as pipeline;
#[cfg(feature = "web")]
pub use waypoint_web as web;

/// The types most hosts need.
pub mod prelude {
    pub use crate::history::{
        History, HistoryDriver, HistoryError, HistoryState, JumpTarget, Kind, Location,
        MemoryDriver, Transition,
    };
    pub use crate::pipeline::{
        Action, Pipeline, PipelineError, Route, RouteAction, Routes,
    };
    #[cfg(feature = "web")]
    pub use crate::web::create_web_history;
}
