use core_state::{EditEngine, GrowthPolicy, lines_from};

fn engine() -> EditEngine {
    EditEngine::with_policy(GrowthPolicy::new(8, 8)).unwrap()
}

fn printed(engine: &mut EditEngine, from: usize, to: usize) -> Vec<String> {
    engine
        .print(from, to)
        .map(|l| l.map_or_else(|| ".".to_string(), |t| String::from_utf8_lossy(t).into_owned()))
        .collect()
}

fn doc(engine: &mut EditEngine) -> Vec<String> {
    engine.finish();
    engine
        .lines()
        .map(|l| String::from_utf8_lossy(l).into_owned())
        .collect()
}

#[test]
fn replace_then_undo_restores_prior_document() {
    let mut e = engine();
    e.replace(1, 3, &mut lines_from(["one", "two", "three"]))
        .unwrap();
    let before = doc(&mut e);

    e.replace(2, 3, &mut lines_from(["TWO", "THREE"])).unwrap();
    assert_eq!(doc(&mut e), ["one", "TWO", "THREE"]);

    e.queue_undo(1);
    assert_eq!(doc(&mut e), before);
    assert_eq!(e.line_count(), 3);
}

#[test]
fn redo_after_undo_is_bit_identical() {
    let mut e = engine();
    e.replace(1, 4, &mut lines_from(["a", "b", "c", "d"])).unwrap();
    e.delete(2, 3).unwrap();
    e.replace(2, 3, &mut lines_from(["x", "y"])).unwrap();
    e.delete(1, 1).unwrap();
    e.replace(3, 3, &mut lines_from(["tail"])).unwrap();
    let latest = doc(&mut e);

    for n in 1..=5 {
        e.queue_undo(n);
        e.finish();
        e.queue_redo(n);
        assert_eq!(doc(&mut e), latest, "undo/redo of {n} steps");
    }
}

#[test]
fn out_of_range_delete_is_transparent_to_undo() {
    let mut e = engine();
    e.replace(1, 2, &mut lines_from(["a", "b"])).unwrap();
    e.delete(3, 7).unwrap();
    assert_eq!(doc(&mut e), ["a", "b"]);
    assert_eq!(e.line_count(), 2);

    // Undoing the ignored delete changes nothing.
    e.queue_undo(1);
    assert_eq!(doc(&mut e), ["a", "b"]);
    // The next undo reaches the replace.
    e.queue_undo(1);
    assert!(doc(&mut e).is_empty());
}

#[test]
fn deletes_on_empty_document_are_all_invalidated() {
    let mut e = engine();
    e.delete(1, 1).unwrap();
    e.delete(0, 0).unwrap();
    assert_eq!(e.history().depth(), 2);
    assert_eq!(e.history().last_effective(), 0);
    e.queue_undo(2);
    assert!(doc(&mut e).is_empty());
    e.queue_redo(2);
    assert!(doc(&mut e).is_empty());
}

#[test]
fn queued_undos_coalesce_into_one_pass() {
    let build = || {
        let mut e = engine();
        for i in 1..=6 {
            let text = format!("v{i}");
            e.replace(1, 1, &mut lines_from([text.as_str()])).unwrap();
        }
        e
    };

    let mut batched = build();
    batched.queue_undo(3);
    batched.queue_undo(2);
    let batched_out = printed(&mut batched, 1, 1);

    let mut stepwise = build();
    stepwise.queue_undo(3);
    let _ = printed(&mut stepwise, 1, 1);
    stepwise.queue_undo(2);
    let stepwise_out = printed(&mut stepwise, 1, 1);

    assert_eq!(batched_out, ["v1"]);
    assert_eq!(batched_out, stepwise_out);
    assert_eq!(batched.history().depth(), stepwise.history().depth());
}

#[test]
fn undo_and_redo_requests_net_out() {
    let mut e = engine();
    for i in 1..=4 {
        let text = format!("v{i}");
        e.replace(1, 1, &mut lines_from([text.as_str()])).unwrap();
    }
    e.queue_undo(3);
    e.queue_redo(1);
    e.queue_undo(1);
    // Net: 3 undos.
    assert_eq!(printed(&mut e, 1, 1), ["v1"]);
    assert_eq!(e.history().depth(), 1);

    // Asking for more than exists is clamped to the redo ceiling.
    e.queue_redo(100);
    assert_eq!(printed(&mut e, 1, 1), ["v4"]);
    assert_eq!(e.history().depth(), 4);
}

#[test]
fn print_on_empty_and_short_documents() {
    let mut e = engine();
    assert_eq!(printed(&mut e, 1, 5), [".", ".", ".", ".", "."]);
    e.replace(1, 1, &mut lines_from(["solo"])).unwrap();
    assert_eq!(printed(&mut e, 3, 3), ["."]);
}

#[test]
fn concrete_session_scenario() {
    let mut e = engine();
    e.replace(1, 2, &mut lines_from(["A", "B"])).unwrap();
    e.delete(1, 1).unwrap();
    assert_eq!(printed(&mut e, 1, 2), ["B", "."]);

    e.queue_undo(2);
    assert_eq!(printed(&mut e, 1, 2), [".", "."]);

    // Exactly one step forward: the state right after the replace.
    e.queue_redo(1);
    assert_eq!(printed(&mut e, 1, 2), ["A", "B"]);
}

#[test]
fn new_edit_after_undo_discards_redo_tail() {
    let mut e = engine();
    e.replace(1, 1, &mut lines_from(["a"])).unwrap();
    e.replace(2, 2, &mut lines_from(["b"])).unwrap();
    e.replace(3, 3, &mut lines_from(["c"])).unwrap();
    e.queue_undo(2);
    e.replace(2, 2, &mut lines_from(["B"])).unwrap();
    assert_eq!(e.history().depth(), 2);
    assert_eq!(e.history().recorded(), 2);

    e.queue_redo(5);
    assert_eq!(printed(&mut e, 1, 3), ["a", "B", "."]);
    e.queue_undo(1);
    assert_eq!(printed(&mut e, 1, 3), ["a", ".", "."]);
}

#[test]
fn print_without_undo_keeps_redo_available() {
    let mut e = engine();
    e.replace(1, 1, &mut lines_from(["a"])).unwrap();
    e.replace(1, 1, &mut lines_from(["b"])).unwrap();
    e.queue_undo(1);
    assert_eq!(printed(&mut e, 1, 1), ["a"]);
    e.queue_redo(1);
    assert_eq!(printed(&mut e, 1, 1), ["b"]);
}

#[test]
fn history_grows_past_initial_reservation() {
    let mut e = EditEngine::with_policy(GrowthPolicy::new(2, 1)).unwrap();
    for i in 1..=10 {
        let text = format!("l{i}");
        e.replace(i, i, &mut lines_from([text.as_str()])).unwrap();
    }
    assert_eq!(e.history().depth(), 10);
    assert!(e.history().capacity() >= 10);
    e.queue_undo(9);
    assert_eq!(printed(&mut e, 1, 2), ["l1", "."]);
    e.queue_redo(9);
    assert_eq!(printed(&mut e, 10, 10), ["l10"]);
}
