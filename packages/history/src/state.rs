use serde::{Deserialize, Serialize};

use crate::location::Location;

/// How a history state came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    /// Initial state, restored or bootstrapped on startup.
    Load,
    /// A new entry was appended.
    Push,
    /// The current entry was replaced.
    Redirect,
    /// Moved to an earlier entry.
    Back,
    /// Moved to a later entry.
    Next,
    /// Only an entry's state payload changed.
    SetState,
    /// The whole stack was replaced.
    Reset,
}

impl Kind {
    /// Whether this kind describes a move along already-visited entries.
    #[must_use]
    pub fn is_jump(self) -> bool {
        matches!(self, Kind::Back | Kind::Next)
    }
}

/// A complete snapshot of the navigation stack.
///
/// For any committed state `0 <= index < entries.len()` holds and
/// `entries[index]` is the current location.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryState {
    /// How this state was produced.
    pub kind: Kind,
    /// Position of the current entry.
    pub index: usize,
    /// All visited entries, oldest first.
    pub entries: Vec<Location>,
    /// The basename in effect.
    pub basename: String,
}

impl HistoryState {
    /// The current entry.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Number of entries on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
