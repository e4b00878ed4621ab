//! Undo / Redo handling.
//!
//! Requests are only queued here. The engine nets and clamps them and walks
//! the history once, the next time a print or an edit needs the document.

use super::DispatchResult;
use core_state::EditEngine;

pub(crate) fn handle_undo(engine: &mut EditEngine, steps: usize) -> DispatchResult {
    engine.queue_undo(steps);
    tracing::trace!(
        target: "actions.dispatch",
        op = "undo",
        steps,
        pending = engine.history().pending_undo(),
        "undo"
    );
    DispatchResult::clean()
}

pub(crate) fn handle_redo(engine: &mut EditEngine, steps: usize) -> DispatchResult {
    engine.queue_redo(steps);
    tracing::trace!(
        target: "actions.dispatch",
        op = "redo",
        steps,
        pending = engine.history().pending_redo(),
        "redo"
    );
    DispatchResult::clean()
}
