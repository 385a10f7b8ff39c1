use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use tracing::{debug, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use waypoint_history::{
    create_key, DriverOp, History, HistoryDriver, HistoryError, HistoryState, JumpTarget,
    Location, PopSnapshot, RevertHandle, Transition,
};
use web_sys::PopStateEvent;

use crate::session;
use crate::wire::WireState;

/// Polling interval while waiting for the browser to apply a forced `go`.
const SETTLE_INTERVAL_MS: u32 = 9;
/// Polls before a forced `go` is given up on.
const SETTLE_MAX_TRIES: u32 = 10;

/// Create a browser-backed history.
///
/// The stack is restored from session storage when the persisted current
/// entry still matches the visible address; otherwise a fresh single-entry
/// stack is bootstrapped from `window.location`. The returned [`Transition`]
/// is the initial load proposal and must be committed (normally by the
/// dispatch pipeline) before further navigation.
pub fn create_web_history(
    basenames: Vec<String>,
) -> Result<(History, Transition), HistoryError> {
    let window = web_sys::window().expect("access to `window`");
    let history = window.history().expect("`window` has access to `history`");

    let wire = history.state().ok().and_then(|s| WireState::from_js(&s));
    let id = wire
        .as_ref()
        .map(|w| w.id.clone())
        .unwrap_or_else(create_key);

    let url = current_url(&window);
    let (entries, index) = match session::restore(&id) {
        Some(saved) if saved.entries[saved.index].url == url => {
            debug!(index = saved.index, "restored session stack");
            (saved.entries, saved.index)
        }
        _ => (vec![bootstrap_location(&url, wire.as_ref())], 0),
    };

    let driver = Rc::new(WebDriver {
        inner: Rc::new(Inner {
            id,
            window,
            history,
            pop_forced: Cell::new(false),
            go_busy: Cell::new(false),
            go_waiters: RefCell::new(VecDeque::new()),
            core: RefCell::new(None),
            pop_listener: RefCell::new(None),
        }),
    });

    let (core, first) = History::new(entries, index, basenames, driver.clone())?;
    driver.bind(&core);
    Ok((core, first))
}

fn current_url(window: &web_sys::Window) -> String {
    let location = window.location();
    let pathname = location.pathname().unwrap_or_else(|_| String::from("/"));
    let search = location.search().unwrap_or_default();
    format!("{pathname}{search}")
}

fn bootstrap_location(url: &str, wire: Option<&WireState>) -> Location {
    let mut location = Location::from_path(url);
    if let Some(wire) = wire {
        // a reload lands on an entry we already own; keep its identity
        location.key = wire.key.clone();
        location.state = wire.state.clone();
    }
    location
}

/// [`HistoryDriver`] writing through the browser History API.
///
/// Writes (`pushState`/`replaceState`) are synchronous, but position moves
/// (`go`) are not: the browser applies them later and announces the result
/// with a pop event. Every move is therefore a serialized round trip that
/// waits for the browser to land on the expected entry before the next write
/// is issued.
pub struct WebDriver {
    inner: Rc<Inner>,
}

struct Inner {
    id: String,
    window: web_sys::Window,
    history: web_sys::History,
    /// Set while a self-issued `go` is in flight so its pop event is not
    /// mistaken for a user navigation.
    pop_forced: Cell<bool>,
    go_busy: Cell<bool>,
    /// FIFO tickets serializing forced `go` round trips.
    go_waiters: RefCell<VecDeque<oneshot::Sender<()>>>,
    core: RefCell<Option<History>>,
    pop_listener: RefCell<Option<EventListener>>,
}

impl WebDriver {
    /// Attach the driver to its history core and start listening for pop
    /// events. Called once, right after core construction.
    fn bind(&self, core: &History) {
        *self.inner.core.borrow_mut() = Some(core.clone());
        let inner = self.inner.clone();
        let listener = EventListener::new(&self.inner.window, "popstate", move |event| {
            inner.on_pop(event);
        });
        *self.inner.pop_listener.borrow_mut() = Some(listener);
    }
}

impl HistoryDriver for WebDriver {
    fn handle(
        &self,
        op: &DriverOp,
        next: &HistoryState,
        prev: &HistoryState,
    ) -> LocalBoxFuture<'static, ()> {
        let inner = self.inner.clone();
        let op = op.clone();
        let next = next.clone();
        let prev = prev.clone();
        async move {
            trace!(?op, "applying committed transition to browser");
            match op {
                DriverOp::Load | DriverOp::Replace => inner.write_replace(next.location()),
                DriverOp::Push => inner.write_push(next.location()),
                DriverOp::Jump { n, is_pop } => inner.handle_jump(n, is_pop, &next, &prev).await,
                DriverOp::SetState { n } => inner.handle_set_state(n, &next).await,
                DriverOp::Reset => inner.handle_reset(&next, &prev).await,
            }
        }
        .boxed_local()
    }

    fn save(&self, state: &HistoryState) {
        session::save(&self.inner.id, state);
    }
}

impl Inner {
    fn wire_for(&self, location: &Location) -> WireState {
        WireState {
            id: self.id.clone(),
            key: location.key.clone(),
            state: location.state.clone(),
        }
    }

    fn current_wire(&self) -> Option<WireState> {
        self.history.state().ok().and_then(|s| WireState::from_js(&s))
    }

    fn write_push(&self, location: &Location) {
        let state = self.wire_for(location).to_js();
        if let Err(err) = self
            .history
            .push_state_with_url(&state, "", Some(&location.url))
        {
            warn!(?err, url = %location.url, "pushState failed");
        }
    }

    fn write_replace(&self, location: &Location) {
        let state = self.wire_for(location).to_js();
        if let Err(err) = self
            .history
            .replace_state_with_url(&state, "", Some(&location.url))
        {
            warn!(?err, url = %location.url, "replaceState failed");
        }
    }

    /// Move the browser without the resulting pop re-entering the core.
    fn force_go(&self, delta: isize) {
        if delta == 0 {
            return;
        }
        self.pop_forced.set(true);
        if let Err(err) = self.history.go_with_delta(delta as i32) {
            self.pop_forced.set(false);
            warn!(?err, delta, "history.go failed");
        }
    }

    /// Wait until the browser reports `key` as the current entry, bounded by
    /// [`SETTLE_MAX_TRIES`].
    async fn settle_on(&self, key: &str) {
        for _ in 0..SETTLE_MAX_TRIES {
            if self.current_wire().is_some_and(|w| w.key == key) {
                return;
            }
            TimeoutFuture::new(SETTLE_INTERVAL_MS).await;
        }
        warn!(%key, "browser never settled on the expected entry");
    }

    async fn enter_queue(&self) {
        if self.go_busy.replace(true) {
            let (tx, rx) = oneshot::channel();
            self.go_waiters.borrow_mut().push_back(tx);
            let _ = rx.await;
        }
    }

    fn exit_queue(&self) {
        match self.go_waiters.borrow_mut().pop_front() {
            Some(tx) => {
                let _ = tx.send(());
            }
            None => self.go_busy.set(false),
        }
    }

    async fn handle_jump(self: &Rc<Self>, n: isize, is_pop: bool, next: &HistoryState, prev: &HistoryState) {
        if is_pop {
            // the user already moved the browser there
            return;
        }
        self.enter_queue().await;
        self.settle_on(&prev.location().key).await;
        self.force_go(n);
        self.settle_on(&next.location().key).await;
        // refresh the landed entry so its payload matches the committed state
        self.write_replace(next.location());
        self.exit_queue();
    }

    /// Round trip for updating an entry `n` positions away: walk there,
    /// rewrite it, walk back.
    async fn handle_set_state(self: &Rc<Self>, n: isize, next: &HistoryState) {
        let target = &next.entries[(next.index as isize + n) as usize];
        if n == 0 {
            self.write_replace(target);
            return;
        }
        self.enter_queue().await;
        self.settle_on(&next.location().key).await;
        self.force_go(n);
        self.settle_on(&target.key).await;
        self.write_replace(target);
        self.force_go(-n);
        self.settle_on(&next.location().key).await;
        self.exit_queue();
    }

    /// Rebuild the browser stack: rewind to the oldest entry, replace it,
    /// push the rest, then walk back to the target index.
    async fn handle_reset(self: &Rc<Self>, next: &HistoryState, prev: &HistoryState) {
        self.enter_queue().await;
        self.settle_on(&prev.location().key).await;

        let rewind = -(prev.index as isize);
        if rewind != 0 {
            self.force_go(rewind);
            self.settle_on(&prev.entries[0].key).await;
        }

        let mut entries = next.entries.iter();
        if let Some(first) = entries.next() {
            self.write_replace(first);
        }
        for entry in entries {
            self.write_push(entry);
        }

        // pushing left the browser on the newest entry
        let delta = next.index as isize - (next.entries.len() as isize - 1);
        if delta != 0 {
            self.force_go(delta);
            self.settle_on(&next.location().key).await;
        }
        self.exit_queue();
    }

    /// Reconcile a pop event the browser delivered.
    fn on_pop(self: &Rc<Self>, event: &web_sys::Event) {
        if self.pop_forced.replace(false) {
            trace!("ignoring self-issued pop");
            return;
        }
        let core = match self.core.borrow().clone() {
            Some(core) => core,
            None => return,
        };
        let state = event
            .dyn_ref::<PopStateEvent>()
            .map(PopStateEvent::state)
            .unwrap_or(JsValue::NULL);
        let url = current_url(&self.window);

        match WireState::from_js(&state).filter(|w| w.id == self.id) {
            Some(wire) => {
                let snapshot = core.current();
                let Some(found) = snapshot.entries.iter().position(|e| e.key == wire.key) else {
                    warn!(key = %wire.key, "pop landed on an entry outside the saved stack");
                    return;
                };
                let n = found as isize - snapshot.index as isize;
                if n == 0 {
                    return;
                }
                let inner = self.clone();
                let revert = RevertHandle::new(move || inner.force_go(-n));
                // proposes a jump; the pipeline commits or reverts it
                if let Err(err) = core.jump(JumpTarget::Relative(n), None, None, Some(revert)) {
                    warn!(%err, "pop reconciliation failed");
                }
            }
            None => {
                // hash links and foreign pushState calls move the browser
                // without our state; resolve them in place at the landing
                // position
                debug!(%url, "pop without own state, adopting entry");
                let snapshot = core.current();
                let landed = (snapshot.index as isize + core.pop_direction(&url))
                    .clamp(0, snapshot.entries.len() as isize - 1)
                    as usize;
                let pop = PopSnapshot {
                    index: landed,
                    entries: snapshot.entries,
                };
                core.replace_pop(&url, Value::Null, None, &pop);
            }
        }
    }
}
