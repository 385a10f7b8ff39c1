use serde::{Deserialize, Serialize};

use crate::location::Location;

/// The stack layout persisted to session-scoped storage.
///
/// `id` is a per-tab identifier generated on first encounter; it scopes the
/// storage key so multiple tabs on the same origin keep independent stacks.
/// Unknown fields are ignored on read, so the layout can grow without
/// breaking older persisted data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Per-tab session identifier.
    pub id: String,
    /// Position of the current entry.
    pub index: usize,
    /// All visited entries, oldest first.
    pub entries: Vec<Location>,
}

impl SessionState {
    /// Serialize for storage.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore from storage. Returns `None` for data this version cannot
    /// read; callers fall back to bootstrapping a fresh single-entry stack.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let state = SessionState {
            id: "tab-1".into(),
            index: 1,
            entries: vec![Location::from_path("/"), Location::from_path("/a")],
        };

        let raw = state.to_json().unwrap();
        assert_eq!(SessionState::from_json(&raw), Some(state));
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw = r#"{
            "id": "tab-1",
            "index": 0,
            "entries": [{ "url": "/", "pathname": "/", "search": "", "key": "abc" }],
            "futureField": 42
        }"#;

        let state = SessionState::from_json(raw).expect("forward compatible read");
        assert_eq!(state.index, 0);
        assert_eq!(state.entries[0].url, "/");
        // absent payload fields fall back to defaults
        assert!(state.entries[0].state.is_null());
        assert_eq!(state.entries[0].basename, "");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(SessionState::from_json("not json"), None);
    }
}
