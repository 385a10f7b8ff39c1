use gloo_storage::{SessionStorage, Storage};
use tracing::warn;
use waypoint_history::{HistoryState, SessionState};

const STORAGE_PREFIX: &str = "__waypoint_history__";

fn storage_key(id: &str) -> String {
    format!("{STORAGE_PREFIX}{id}")
}

/// Persist the committed stack so reloads and restored tabs resume where
/// they left off.
pub(crate) fn save(id: &str, state: &HistoryState) {
    let snapshot = SessionState {
        id: id.to_string(),
        index: state.index,
        entries: state.entries.clone(),
    };
    if let Err(err) = SessionStorage::set(storage_key(id), &snapshot) {
        warn!(%err, "failed to persist session history");
    }
}

/// The stack persisted for this session, if any.
pub(crate) fn restore(id: &str) -> Option<SessionState> {
    let saved: SessionState = SessionStorage::get(storage_key(id)).ok()?;
    if saved.index >= saved.entries.len() {
        warn!("discarding persisted session with out-of-range index");
        return None;
    }
    Some(saved)
}
