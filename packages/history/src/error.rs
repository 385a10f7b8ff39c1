use thiserror::Error;

/// Errors raised by history operations.
///
/// Invalid-target navigation is reported synchronously, before any state
/// mutation; callers can pre-check with [`History::can_jump`].
///
/// [`History::can_jump`]: crate::History::can_jump
#[derive(Debug, Error)]
pub enum HistoryError {
    /// `jump` or `reset` targeted an index with no entry.
    #[error("no history entry at index {index}; consider checking `can_jump` first")]
    OutOfRange {
        /// The requested index.
        index: isize,
    },

    /// A jump-by-key referenced a key not present on the stack.
    #[error("no history entry with key `{key}`")]
    UnknownKey {
        /// The requested entry key.
        key: String,
    },
}
