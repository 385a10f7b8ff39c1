use futures::executor::block_on;
use serde_json::Value;
use waypoint_history::{History, JumpTarget, Kind};

#[test]
fn end_to_end_stack_walk() {
    let (history, first) = History::in_memory("/home");
    block_on(first.commit());

    let t = history.push("/a", Value::Null, None);
    assert_eq!(t.next.kind, Kind::Push);
    block_on(t.commit());
    let state = history.current();
    assert_eq!(state.index, 1);
    assert_eq!(
        state.entries.iter().map(|e| e.url.as_str()).collect::<Vec<_>>(),
        vec!["/home", "/a"]
    );

    let t = history
        .jump(JumpTarget::Relative(-1), None, None, None)
        .unwrap();
    assert_eq!(t.next.kind, Kind::Back);
    block_on(t.commit());
    assert_eq!(history.index(), 0);

    // pushing from index 0 discards the abandoned forward branch
    let t = history.push("/b", Value::Null, None);
    assert_eq!(t.next.kind, Kind::Push);
    block_on(t.commit());
    let state = history.current();
    assert_eq!(state.index, 1);
    assert_eq!(
        state.entries.iter().map(|e| e.url.as_str()).collect::<Vec<_>>(),
        vec!["/home", "/b"]
    );
}

#[test]
fn index_stays_in_bounds_across_arbitrary_sequences() {
    let (history, first) = History::in_memory("/0");
    block_on(first.commit());

    let steps: &[&dyn Fn(&History)] = &[
        &|h| block_on(h.push("/1", Value::Null, None).commit()),
        &|h| block_on(h.push("/2", Value::Null, None).commit()),
        &|h| {
            if let Ok(t) = h.back(None) {
                block_on(t.commit());
            }
        },
        &|h| block_on(h.replace("/r", Value::Null, None).commit()),
        &|h| {
            if let Ok(t) = h.next(None) {
                block_on(t.commit());
            }
        },
        &|h| block_on(h.push("/3", Value::Null, None).commit()),
        &|h| {
            if h.can_jump(&JumpTarget::Relative(-2)) {
                let t = h
                    .jump(JumpTarget::Relative(-2), None, None, None)
                    .unwrap();
                block_on(t.commit());
            }
        },
    ];

    for step in steps {
        step(&history);
        let state = history.current();
        assert!(state.index < state.len(), "index invariant violated");
    }
}

#[test]
fn neighbor_push_never_grows_the_stack() {
    let (history, first) = History::in_memory("/home");
    block_on(first.commit());
    block_on(history.push("/a", Value::Null, None).commit());
    block_on(history.back(None).unwrap().commit());

    // forward neighbor
    let t = history.push("/a", Value::Null, None);
    assert_eq!(t.next.kind, Kind::Next);
    assert_eq!(t.next.len(), 2);
    block_on(t.commit());

    // back neighbor
    let t = history.push("/home", Value::Null, None);
    assert_eq!(t.next.kind, Kind::Back);
    assert_eq!(t.next.len(), 2);
}

#[test]
fn second_commit_call_changes_nothing() {
    let (history, first) = History::in_memory("/home");
    block_on(first.commit());

    let push = history.push("/a", Value::Null, None);
    block_on(push.commit());
    let once = history.current();

    block_on(push.commit());
    block_on(push.commit.call());
    assert_eq!(history.current(), once);
}
