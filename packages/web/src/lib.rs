//! Browser adapter for the waypoint history core.
//!
//! [`create_web_history`] bootstraps a [`History`] from `window.location`
//! (restoring a persisted stack from session storage when possible) and wires
//! a [`WebDriver`] to it. The driver translates committed transitions into
//! History API calls, reconciles `popstate` events back into jump proposals,
//! and persists the stack after every commit.
//!
//! [`History`]: waypoint_history::History

mod driver;
mod session;
mod wire;

pub use driver::{create_web_history, WebDriver};
