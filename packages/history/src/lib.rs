//! Navigation History Core
//!
//! waypoint-history owns the navigation entry stack and the current index, and
//! exposes the navigation operations (`push`, `replace`, `jump`, `set_state`,
//! `reset`) that drive it. Nothing is applied eagerly: every operation returns
//! a [`Transition`] describing the proposed next state together with a latched
//! [`CommitHandle`]. Only running the commit handle makes the proposal the
//! live, observable state. This two-phase protocol is what lets a dispatch
//! pipeline cancel, redirect or block a navigation before the address bar ever
//! changes.
//!
//! The core is bound to a concrete navigation surface through the
//! [`HistoryDriver`] trait. [`MemoryDriver`] keeps everything in memory and is
//! suitable for tests, servers and native hosts; the `waypoint-web` crate
//! provides the browser implementation.

mod core;
mod driver;
mod error;
mod location;
mod memory;
mod session;
mod state;
mod transition;

pub use crate::core::{History, JumpTarget, Listener, PopSnapshot};
pub use driver::{DriverOp, HistoryDriver};
pub use error::HistoryError;
pub use location::{create_key, find_basename, format_slashes, Location};
pub use memory::MemoryDriver;
pub use session::SessionState;
pub use state::{HistoryState, Kind};
pub use transition::{CommitHandle, RevertHandle, Transition, TransitionInfo};
