//! End-to-end dispatch behavior: redirect coercion inside busy chains,
//! blocking and confirmation, and pop reversal for rejected navigations.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::block_on;
use futures_util::FutureExt;
use serde_json::Value;
use waypoint_history::{History, JumpTarget, RevertHandle};
use waypoint_pipeline::{
    Action, DispatchSink, HistoryUpdate, Pipeline, PipelineError, Route, Routes,
};

fn recording_sink() -> (DispatchSink, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink_log = log.clone();
    let sink: DispatchSink = Rc::new(move |action: Action| {
        let entry = match &action {
            Action::Redirect(r) => format!("redirect:{}:{}", r.action.name, r.status),
            other => other.reference().name,
        };
        sink_log.borrow_mut().push(entry);
        async { Value::Null }.boxed_local()
    });
    (sink, log)
}

#[test]
fn follow_up_navigation_in_a_busy_chain_becomes_a_redirect() {
    let (history, _first) = History::in_memory("/home");
    let routes = Routes::new([
        (
            "first",
            Route::with_path("/first").with_thunk(|request| {
                let follow_up = request.dispatch(Action::route("second"));
                async move {
                    follow_up.await;
                }
                .boxed_local()
            }),
        ),
        ("second", Route::with_path("/second")),
    ])
    .unwrap();
    let (sink, log) = recording_sink();
    let pipeline = Pipeline::new(routes, history, sink);

    block_on(pipeline.dispatch(Action::route("first")));

    // the follow-up replaced the chain's entry instead of pushing a new one
    assert_eq!(pipeline.history().location().pathname, "/second");
    assert_eq!(pipeline.history().len(), 2);
    assert_eq!(log.borrow().as_slice(), ["first", "redirect:second:302"]);
}

#[test]
fn declined_confirmation_unblocks_without_navigating() {
    let (history, _first) = History::in_memory("/home");
    let routes = Routes::new([
        (
            "home",
            Route::with_path("/home")
                .with_leave_guard(|_| async { false }.boxed_local()),
        ),
        ("away", Route::with_path("/away")),
    ])
    .unwrap();
    let (sink, log) = recording_sink();
    let pipeline = Pipeline::new(routes, history, sink);

    // establish "home" as the route we would be leaving
    block_on(pipeline.dispatch(Action::route("home")));

    block_on(pipeline.dispatch(Action::route("away")));
    assert_eq!(pipeline.history().location().pathname, "/home");

    block_on(pipeline.confirm(false)).unwrap();
    assert_eq!(pipeline.history().location().pathname, "/home");
    assert_eq!(
        log.borrow().as_slice(),
        ["home", "away", "@@history/unblock"]
    );

    // nothing left to confirm
    assert!(matches!(
        block_on(pipeline.confirm(false)),
        Err(PipelineError::NothingBlocked)
    ));
}

#[test]
fn accepted_confirmation_resumes_and_restores_the_guard() {
    let (history, _first) = History::in_memory("/start");
    let routes = Routes::new([
        ("start", Route::with_path("/start")),
        (
            "guarded",
            Route::with_path("/guarded")
                .with_leave_guard(|_| async { false }.boxed_local()),
        ),
        ("away", Route::with_path("/away")),
    ])
    .unwrap();
    let (sink, _log) = recording_sink();
    let pipeline = Pipeline::new(routes, history, sink);

    block_on(pipeline.dispatch(Action::route("guarded")));
    assert_eq!(pipeline.history().location().pathname, "/guarded");

    // leaving "guarded" blocks, accepting resumes the blocked navigation
    block_on(pipeline.dispatch(Action::route("away")));
    assert_eq!(pipeline.history().location().pathname, "/guarded");
    block_on(pipeline.confirm(true)).unwrap();
    assert_eq!(pipeline.history().location().pathname, "/away");

    // the guard is back in place for the next visit
    block_on(pipeline.dispatch(Action::route("guarded")));
    block_on(pipeline.dispatch(Action::route("away")));
    assert_eq!(pipeline.history().location().pathname, "/guarded");
}

#[test]
fn a_blocked_pop_reverts_the_platform_move() {
    let (history, _first) = History::in_memory("/home");
    let routes = Routes::new([(
        "guarded",
        Route::with_path("/guarded")
            .with_leave_guard(|_| async { false }.boxed_local()),
    )])
    .unwrap();
    let (sink, log) = recording_sink();
    let pipeline = Pipeline::new(routes, history, sink);

    block_on(pipeline.dispatch(Action::route("guarded")));
    assert_eq!(pipeline.history().index(), 1);

    // simulate the platform having already moved back one entry
    let reverted = Rc::new(Cell::new(0));
    let counter = reverted.clone();
    let transition = pipeline
        .history()
        .silently(|h| {
            h.jump(
                JumpTarget::Relative(-1),
                None,
                None,
                Some(RevertHandle::new(move || counter.set(counter.get() + 1))),
            )
        })
        .unwrap();

    block_on(pipeline.dispatch(Action::HistoryUpdate(HistoryUpdate { transition })));

    // blocked, never committed, and the platform position was restored
    assert_eq!(pipeline.history().index(), 1);
    assert_eq!(reverted.get(), 1);
    assert_eq!(log.borrow().last().unwrap(), "@@history/update");
}

#[test]
fn bootstrap_commits_the_initial_load() {
    let (history, first) = History::in_memory("/home");
    let routes = Routes::new([("home", Route::with_path("/home"))]).unwrap();
    let (sink, log) = recording_sink();
    let pipeline = Pipeline::new(routes, history, sink);

    block_on(pipeline.bootstrap(first));

    assert_eq!(pipeline.history().location().pathname, "/home");
    assert_eq!(log.borrow().as_slice(), ["@@history/update"]);
}
