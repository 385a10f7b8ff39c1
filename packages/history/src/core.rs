use std::cell::RefCell;
use std::rc::Rc;

use futures_util::FutureExt;
use serde_json::Value;
use tracing::trace;

use crate::driver::{DriverOp, HistoryDriver};
use crate::error::HistoryError;
use crate::location::{create_key, find_basename, format_slashes, merge_state, Location};
use crate::memory::MemoryDriver;
use crate::state::{HistoryState, Kind};
use crate::transition::{CommitFn, CommitHandle, RevertHandle, Transition, TransitionInfo};

/// Receives every notified [`Transition`] synchronously, before the producing
/// operation returns.
pub type Listener = Rc<dyn Fn(&Transition)>;

/// Where a jump should land.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JumpTarget {
    /// Offset from the current index.
    Relative(isize),
    /// An absolute stack index.
    Index(usize),
    /// The entry carrying this key.
    Key(String),
}

/// Stack position captured when a platform pop event arrives, used by
/// [`History::replace_pop`] to resolve the popped entry's content in place.
#[derive(Clone, Debug)]
pub struct PopSnapshot {
    /// The index the pop landed on.
    pub index: usize,
    /// The entries as they were when the pop arrived.
    pub entries: Vec<Location>,
}

struct Shared {
    entries: Vec<Location>,
    index: usize,
    basename: String,
    kind: Kind,
}

/// The navigation history state machine.
///
/// Owns the entry stack and current index. Every operation builds a proposed
/// next state and returns it as a [`Transition`]; the stack only changes when
/// the transition's commit handle runs. A registered listener observes each
/// proposal synchronously before the operation returns, which is how the
/// dispatch pipeline gets hold of commit and revert handles.
///
/// `History` is cheap to clone; clones share the same stack.
#[derive(Clone)]
pub struct History {
    shared: Rc<RefCell<Shared>>,
    basenames: Rc<Vec<String>>,
    driver: Rc<dyn HistoryDriver>,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl History {
    /// Create a history over `driver`, bootstrapped with the given stack.
    ///
    /// Returns the history together with its first-load transition. The stack
    /// is readable immediately, but the driver only observes it once the
    /// returned transition commits.
    pub fn new(
        entries: Vec<Location>,
        index: usize,
        basenames: Vec<String>,
        driver: Rc<dyn HistoryDriver>,
    ) -> Result<(Self, Transition), HistoryError> {
        if index >= entries.len() {
            return Err(HistoryError::OutOfRange {
                index: index as isize,
            });
        }

        let basename = entries[index].basename.clone();
        let basenames = basenames.iter().map(|b| format_slashes(b)).collect();

        let history = Self {
            shared: Rc::new(RefCell::new(Shared {
                entries: entries.clone(),
                index,
                basename: basename.clone(),
                kind: Kind::Load,
            })),
            basenames: Rc::new(basenames),
            driver,
            listener: Rc::new(RefCell::new(None)),
        };

        let next = HistoryState {
            kind: Kind::Load,
            index,
            entries,
            basename,
        };
        let commit = history.make_commit(DriverOp::Load, next.clone());
        let first = Transition {
            next,
            commit,
            revert_pop: None,
            info: None,
        };

        Ok((history, first))
    }

    /// Create a history backed by [`MemoryDriver`], starting at `path`.
    pub fn in_memory(path: &str) -> (Self, Transition) {
        Self::in_memory_with(path, Rc::new(MemoryDriver::default()))
    }

    /// Create a history backed by a specific [`MemoryDriver`] instance.
    pub fn in_memory_with(path: &str, driver: Rc<MemoryDriver>) -> (Self, Transition) {
        let entries = vec![Location::from_path(path)];
        match Self::new(entries, 0, Vec::new(), driver) {
            Ok(pair) => pair,
            // a single entry at index 0 is always in range
            Err(_) => unreachable!("single-entry bootstrap cannot be out of range"),
        }
    }

    // -- observers --

    /// Snapshot of the committed state.
    #[must_use]
    pub fn current(&self) -> HistoryState {
        let shared = self.shared.borrow();
        HistoryState {
            kind: shared.kind,
            index: shared.index,
            entries: shared.entries.clone(),
            basename: shared.basename.clone(),
        }
    }

    /// The committed current location.
    #[must_use]
    pub fn location(&self) -> Location {
        let shared = self.shared.borrow();
        shared.entries[shared.index].clone()
    }

    /// The committed current index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.shared.borrow().index
    }

    /// Number of committed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.borrow().entries.is_empty()
    }

    /// The basename currently in effect.
    #[must_use]
    pub fn basename(&self) -> String {
        self.shared.borrow().basename.clone()
    }

    /// Set the basename for subsequently created entries.
    pub fn set_basename(&self, basename: &str) {
        self.shared.borrow_mut().basename = format_slashes(basename);
    }

    /// Whether `url` matches the entry just behind the current index.
    #[must_use]
    pub fn is_back_url(&self, url: &str) -> bool {
        let shared = self.shared.borrow();
        shared
            .index
            .checked_sub(1)
            .and_then(|i| shared.entries.get(i))
            .is_some_and(|e| e.url == url)
    }

    /// Whether `url` matches the entry just ahead of the current index.
    #[must_use]
    pub fn is_next_url(&self, url: &str) -> bool {
        let shared = self.shared.borrow();
        shared
            .entries
            .get(shared.index + 1)
            .is_some_and(|e| e.url == url)
    }

    /// Direction a platform pop moved in: `1` if the popped URL matches the
    /// forward neighbor, `-1` otherwise.
    #[must_use]
    pub fn pop_direction(&self, url: &str) -> isize {
        if self.is_next_url(url) {
            1
        } else {
            -1
        }
    }

    /// Whether a jump to `target` would land on an existing entry.
    #[must_use]
    pub fn can_jump(&self, target: &JumpTarget) -> bool {
        match self.resolve(target) {
            Ok(n) => {
                let shared = self.shared.borrow();
                let index = shared.index as isize + n;
                index >= 0 && (index as usize) < shared.entries.len()
            }
            Err(_) => false,
        }
    }

    // -- listener --

    /// Register the single transition listener, replacing any previous one.
    pub fn listen(&self, listener: impl Fn(&Transition) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Remove the transition listener.
    pub fn unlisten(&self) {
        self.listener.borrow_mut().take();
    }

    /// Run `f` with the listener suspended.
    ///
    /// Used by the pipeline for proposals it creates itself: they must not
    /// come back around through the listener as a second navigation.
    pub fn silently<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let saved = self.listener.borrow_mut().take();
        let result = f(self);
        *self.listener.borrow_mut() = saved;
        result
    }

    // -- operations --

    /// Propose appending a new entry after the current index, truncating any
    /// forward entries.
    ///
    /// Pushing a URL identical to a neighboring entry never grows the stack:
    /// it is reclassified as a [`Kind::Back`]/[`Kind::Next`] jump, matching
    /// what a browser would do when re-visiting an adjacent URL.
    pub fn push(&self, path: &str, state: Value, basename: Option<&str>) -> Transition {
        let location = self.build_location(path, state.clone(), basename);

        if self.is_back_url(&location.url) {
            return self.jump_resolved(-1, Some(state), None, None);
        }
        if self.is_next_url(&location.url) {
            return self.jump_resolved(1, Some(state), None, None);
        }

        let (index, entries, basename) = {
            let shared = self.shared.borrow();
            let index = shared.index + 1;
            let mut entries = shared.entries[..index.min(shared.entries.len())].to_vec();
            entries.push(location);
            (index, entries, shared.basename.clone())
        };

        let next = HistoryState {
            kind: Kind::Push,
            index,
            entries,
            basename,
        };
        let commit = self.make_commit(DriverOp::Push, next.clone());
        self.notify(Transition {
            next,
            commit,
            revert_pop: None,
            info: None,
        })
    }

    /// Propose overwriting the entry at the current index.
    ///
    /// Kind is [`Kind::Redirect`] unless the target matches a neighboring
    /// entry, in which case this becomes a jump like [`History::push`].
    pub fn replace(&self, path: &str, state: Value, basename: Option<&str>) -> Transition {
        let location = self.build_location(path, state.clone(), basename);

        if self.is_back_url(&location.url) {
            return self.jump_resolved(-1, Some(state), None, None);
        }
        if self.is_next_url(&location.url) {
            return self.jump_resolved(1, Some(state), None, None);
        }

        let (index, entries, basename) = {
            let shared = self.shared.borrow();
            let mut entries = shared.entries.clone();
            entries[shared.index] = location;
            (shared.index, entries, shared.basename.clone())
        };

        let next = HistoryState {
            kind: Kind::Redirect,
            index,
            entries,
            basename,
        };
        let commit = self.make_commit(DriverOp::Replace, next.clone());
        self.notify(Transition {
            next,
            commit,
            revert_pop: None,
            info: None,
        })
    }

    /// Propose replacing the entry a pop event already landed on.
    ///
    /// Used when the popped entry's content must be resolved asynchronously:
    /// the platform has moved, and the replacement happens at the index the
    /// pop put us on.
    pub fn replace_pop(
        &self,
        path: &str,
        state: Value,
        basename: Option<&str>,
        pop: &PopSnapshot,
    ) -> Transition {
        let location = self.build_location(path, state, basename);

        let (kind, basename) = {
            let shared = self.shared.borrow();
            let kind = if pop.index < shared.index {
                Kind::Back
            } else {
                Kind::Next
            };
            (kind, shared.basename.clone())
        };

        let mut entries = pop.entries.clone();
        entries[pop.index] = location;

        let next = HistoryState {
            kind,
            index: pop.index,
            entries,
            basename,
        };
        let commit = self.make_commit(DriverOp::Replace, next.clone());
        self.notify(Transition {
            next,
            commit,
            revert_pop: None,
            info: None,
        })
    }

    /// Propose a move along already-visited entries.
    ///
    /// Fails with [`HistoryError::OutOfRange`] before any state mutation when
    /// no entry exists at the target; guard with [`History::can_jump`].
    /// `revert_pop` marks the jump as reconciling a platform pop event.
    pub fn jump(
        &self,
        target: JumpTarget,
        state: Option<Value>,
        kind: Option<Kind>,
        revert_pop: Option<RevertHandle>,
    ) -> Result<Transition, HistoryError> {
        let n = self.resolve(&target)?;
        {
            let shared = self.shared.borrow();
            let index = shared.index as isize + n;
            if index < 0 || index as usize >= shared.entries.len() {
                return Err(HistoryError::OutOfRange { index });
            }
        }
        Ok(self.jump_resolved(n, state, kind, revert_pop))
    }

    /// Sugar for a one-step backward jump.
    pub fn back(&self, state: Option<Value>) -> Result<Transition, HistoryError> {
        self.jump(JumpTarget::Relative(-1), state, Some(Kind::Back), None)
    }

    /// Sugar for a one-step forward jump.
    pub fn next(&self, state: Option<Value>) -> Result<Transition, HistoryError> {
        self.jump(JumpTarget::Relative(1), state, Some(Kind::Next), None)
    }

    /// Propose mutating the state payload of an entry without navigating.
    ///
    /// The current index does not change; kind is [`Kind::SetState`]. With no
    /// target the current entry is updated.
    pub fn set_state(
        &self,
        state: Value,
        target: Option<JumpTarget>,
    ) -> Result<Transition, HistoryError> {
        let n = match target {
            Some(t) => self.resolve(&t)?,
            None => 0,
        };

        let next = {
            let shared = self.shared.borrow();
            let index = shared.index as isize + n;
            if index < 0 || index as usize >= shared.entries.len() {
                return Err(HistoryError::OutOfRange { index });
            }

            let mut entries = shared.entries.clone();
            merge_state(&mut entries[index as usize].state, &state);
            HistoryState {
                kind: Kind::SetState,
                index: shared.index,
                entries,
                basename: shared.basename.clone(),
            }
        };

        let commit = self.make_commit(DriverOp::SetState { n }, next.clone());
        Ok(self.notify(Transition {
            next,
            commit,
            revert_pop: None,
            info: None,
        }))
    }

    /// Propose replacing the entire stack, e.g. on deep-link bootstrap or an
    /// app-level reset.
    ///
    /// When `index` is omitted the new tail is used. When `kind` is omitted it
    /// is inferred: a single entry loads ([`Kind::Load`]); landing at the tail
    /// is [`Kind::Next`]; landing on the previous index is [`Kind::Redirect`];
    /// otherwise [`Kind::Back`]/[`Kind::Next`] by relative position.
    pub fn reset(
        &self,
        entries: Vec<Location>,
        index: Option<usize>,
        kind: Option<Kind>,
    ) -> Result<Transition, HistoryError> {
        if entries.is_empty() {
            return Err(HistoryError::OutOfRange { index: -1 });
        }
        let index = index.unwrap_or(entries.len() - 1);
        if index >= entries.len() {
            return Err(HistoryError::OutOfRange {
                index: index as isize,
            });
        }

        let (kind, basename) = {
            let shared = self.shared.borrow();
            let kind = kind.unwrap_or_else(|| {
                if entries.len() == 1 {
                    Kind::Load
                } else if index == entries.len() - 1 {
                    Kind::Next
                } else if index == shared.index {
                    Kind::Redirect
                } else if index < shared.index {
                    Kind::Back
                } else {
                    Kind::Next
                }
            });
            (kind, shared.basename.clone())
        };

        let next = HistoryState {
            kind,
            index,
            entries,
            basename,
        };
        let commit = self.make_commit(DriverOp::Reset, next.clone());
        Ok(self.notify(Transition {
            next,
            commit,
            revert_pop: None,
            info: Some(TransitionInfo::Reset),
        }))
    }

    // -- internals --

    pub(crate) fn jump_resolved(
        &self,
        n: isize,
        state: Option<Value>,
        kind: Option<Kind>,
        revert_pop: Option<RevertHandle>,
    ) -> Transition {
        let next = {
            let shared = self.shared.borrow();
            let index = (shared.index as isize + n) as usize;
            let mut entries = shared.entries.clone();
            if let Some(patch) = &state {
                merge_state(&mut entries[index].state, patch);
            }
            let kind = kind.unwrap_or(if n < 0 { Kind::Back } else { Kind::Next });
            HistoryState {
                kind,
                index,
                entries,
                basename: shared.basename.clone(),
            }
        };

        let info = (n.abs() != 1).then_some(TransitionInfo::Jump);
        let is_pop = revert_pop.is_some();
        let commit = self.make_commit(DriverOp::Jump { n, is_pop }, next.clone());
        self.notify(Transition {
            next,
            commit,
            revert_pop,
            info,
        })
    }

    fn resolve(&self, target: &JumpTarget) -> Result<isize, HistoryError> {
        let shared = self.shared.borrow();
        match target {
            JumpTarget::Relative(n) => Ok(*n),
            JumpTarget::Index(i) => Ok(*i as isize - shared.index as isize),
            JumpTarget::Key(key) => shared
                .entries
                .iter()
                .position(|e| &e.key == key)
                .map(|i| i as isize - shared.index as isize)
                .ok_or_else(|| HistoryError::UnknownKey { key: key.clone() }),
        }
    }

    /// Strip a recognized basename off `path` and build the new entry.
    fn build_location(&self, path: &str, state: Value, basename: Option<&str>) -> Location {
        let (path, found) = match find_basename(path, &self.basenames) {
            Some(bn) => (path[bn.len()..].to_string(), Some(bn.to_string())),
            None => (path.to_string(), basename.map(format_slashes)),
        };
        if let Some(bn) = found {
            self.set_basename(&bn);
        }

        let bn = self.basename();
        Location::new(&path, state, create_key(), &bn)
    }

    fn make_commit(&self, op: DriverOp, next: HistoryState) -> CommitHandle {
        let shared = self.shared.clone();
        let driver = self.driver.clone();
        let run: CommitFn = Rc::new(move || {
            let shared = shared.clone();
            let driver = driver.clone();
            let next = next.clone();
            let op = op.clone();
            async move {
                let prev = {
                    let shared = shared.borrow();
                    HistoryState {
                        kind: shared.kind,
                        index: shared.index,
                        entries: shared.entries.clone(),
                        basename: shared.basename.clone(),
                    }
                };
                driver.handle(&op, &next, &prev).await;

                trace!(kind = ?next.kind, index = next.index, len = next.entries.len(), "history commit");
                {
                    let mut shared = shared.borrow_mut();
                    shared.entries = next.entries.clone();
                    shared.index = next.index;
                    shared.kind = next.kind;
                    shared.basename = next.basename.clone();
                }
                driver.save(&next);
            }
            .boxed_local()
        });
        CommitHandle::new(run)
    }

    fn notify(&self, transition: Transition) -> Transition {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(&transition);
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    fn committed(history: &History, t: &Transition) -> HistoryState {
        block_on(t.commit());
        history.current()
    }

    #[test]
    fn push_appends_and_truncates_forward() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        let t = history.push("/a", Value::Null, None);
        assert_eq!(t.next.kind, Kind::Push);
        let state = committed(&history, &t);
        assert_eq!(state.index, 1);
        assert_eq!(state.len(), 2);

        block_on(history.back(None).unwrap().commit());
        assert_eq!(history.index(), 0);

        // pushing from index 0 drops the abandoned forward branch
        let t = history.push("/b", Value::Null, None);
        let state = committed(&history, &t);
        assert_eq!(state.len(), 2);
        assert_eq!(state.entries[1].url, "/b");
    }

    #[test]
    fn push_to_forward_neighbor_is_a_jump() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());
        block_on(history.push("/a", Value::Null, None).commit());
        block_on(history.back(None).unwrap().commit());

        let t = history.push("/a", Value::Null, None);
        assert_eq!(t.next.kind, Kind::Next);
        let state = committed(&history, &t);
        assert_eq!(state.len(), 2);
        assert_eq!(state.index, 1);
    }

    #[test]
    fn push_to_back_neighbor_is_a_jump() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());
        block_on(history.push("/a", Value::Null, None).commit());

        let t = history.push("/home", Value::Null, None);
        assert_eq!(t.next.kind, Kind::Back);
        let state = committed(&history, &t);
        assert_eq!(state.len(), 2);
        assert_eq!(state.index, 0);
    }

    #[test]
    fn replace_keeps_index_and_length() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());
        block_on(history.push("/a", Value::Null, None).commit());

        let t = history.replace("/b", Value::Null, None);
        assert_eq!(t.next.kind, Kind::Redirect);
        let state = committed(&history, &t);
        assert_eq!(state.index, 1);
        assert_eq!(state.len(), 2);
        assert_eq!(state.location().url, "/b");
    }

    #[test]
    fn commit_is_latched() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        let t = history.push("/a", Value::Null, None);
        block_on(t.commit());
        let after_one = history.current();

        // pushing again through the same handle must be a no-op
        block_on(t.commit());
        assert_eq!(history.current(), after_one);
        assert!(t.commit.has_fired());
    }

    #[test]
    fn uncommitted_proposal_does_not_mutate() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        let _t = history.push("/a", Value::Null, None);
        assert_eq!(history.len(), 1);
        assert_eq!(history.location().url, "/home");
    }

    #[test]
    fn jump_out_of_range_is_an_error() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        assert!(!history.can_jump(&JumpTarget::Relative(1)));
        let err = history.jump(JumpTarget::Relative(1), None, None, None);
        assert!(matches!(err, Err(HistoryError::OutOfRange { index: 1 })));
        // nothing mutated
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn jump_by_key_and_index() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());
        block_on(history.push("/a", Value::Null, None).commit());
        block_on(history.push("/b", Value::Null, None).commit());

        let key = history.current().entries[0].key.clone();
        assert!(history.can_jump(&JumpTarget::Key(key.clone())));

        let t = history.jump(JumpTarget::Key(key), None, None, None).unwrap();
        assert_eq!(t.info, Some(TransitionInfo::Jump));
        block_on(t.commit());
        assert_eq!(history.index(), 0);

        let t = history
            .jump(JumpTarget::Index(2), None, None, None)
            .unwrap();
        block_on(t.commit());
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn set_state_merges_without_moving() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());
        block_on(history.push("/a", json!({ "a": 1 }), None).commit());

        let t = history.set_state(json!({ "b": 2 }), None).unwrap();
        assert_eq!(t.next.kind, Kind::SetState);
        block_on(t.commit());

        assert_eq!(history.index(), 1);
        assert_eq!(history.location().state, json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn set_state_on_other_entry() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());
        block_on(history.push("/a", Value::Null, None).commit());

        let t = history
            .set_state(json!({ "seen": true }), Some(JumpTarget::Relative(-1)))
            .unwrap();
        block_on(t.commit());

        assert_eq!(history.index(), 1);
        assert_eq!(history.current().entries[0].state, json!({ "seen": true }));
    }

    #[test]
    fn reset_kind_inference() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        let stack = vec![
            Location::from_path("/a"),
            Location::from_path("/b"),
            Location::from_path("/c"),
        ];

        // landing at the tail
        let t = history.reset(stack.clone(), Some(2), None).unwrap();
        assert_eq!(t.next.kind, Kind::Next);
        assert_eq!(t.info, Some(TransitionInfo::Reset));
        block_on(t.commit());

        // landing on the previous index
        let t = history.reset(stack.clone(), Some(2), None).unwrap();
        assert_eq!(t.next.kind, Kind::Redirect);
        block_on(t.commit());

        // below the previous index
        let t = history.reset(stack.clone(), Some(0), None).unwrap();
        assert_eq!(t.next.kind, Kind::Back);
        block_on(t.commit());

        // single entry resets to a load
        let t = history
            .reset(vec![Location::from_path("/only")], None, None)
            .unwrap();
        assert_eq!(t.next.kind, Kind::Load);
    }

    #[test]
    fn reset_rejects_bad_index() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        let err = history.reset(vec![Location::from_path("/a")], Some(3), None);
        assert!(matches!(err, Err(HistoryError::OutOfRange { .. })));
        assert!(history.reset(Vec::new(), None, None).is_err());
    }

    #[test]
    fn basename_is_found_and_stripped() {
        let entries = vec![Location::from_path("/home")];
        let (history, first) =
            History::new(entries, 0, vec!["/app".into()], Rc::new(MemoryDriver::default()))
                .unwrap();
        block_on(first.commit());

        let t = history.push("/app/a", Value::Null, None);
        assert_eq!(t.next.location().url, "/a");
        assert_eq!(t.next.location().basename, "/app");
        assert_eq!(t.next.location().href(), "/app/a");
    }

    #[test]
    fn listener_sees_every_notified_transition() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        history.listen(move |t| sink.borrow_mut().push(t.next.kind));

        let t = history.push("/a", Value::Null, None);
        block_on(t.commit());
        history.silently(|h| h.replace("/b", Value::Null, None));

        assert_eq!(*seen.borrow(), vec![Kind::Push]);
    }

    #[test]
    fn index_invariant_holds_after_every_commit() {
        let (history, first) = History::in_memory("/home");
        block_on(first.commit());

        block_on(history.push("/a", Value::Null, None).commit());
        block_on(history.push("/b", Value::Null, None).commit());
        block_on(history.back(None).unwrap().commit());
        block_on(history.replace("/c", Value::Null, None).commit());
        block_on(history.next(None).unwrap().commit());

        let state = history.current();
        assert!(state.index < state.len());
    }
}
