//! Versioned edit engine: the live line chain plus the command history that
//! makes batched undo/redo cost proportional to the steps requested.
//!
//! Undo/redo requests are only queued (`queue_undo` / `queue_redo`). The net
//! movement is resolved lazily, in one pass, right before anything observes the
//! document: a print, a new replace/delete, or `finish` at end of input.
//!
//! Every edit changes exactly one link of the live chain (`before.next`, or
//! `head`) plus links inside freshly allocated lines. Undo walks the batch
//! backwards restoring each command's `old_head` link; redo walks it forwards
//! re-pointing at `after`/`new_head`. Because each step restores the exact
//! link it changed, states revisited by redo are bit-identical to the originals.
//!
//! Shortcuts:
//! - a batch made only of invalidated commands moves `depth` and nothing else;
//! - target states holding 0 or 1 lines take head/tail/count straight from the
//!   target command's `tail_after` instead of trusting the relinked head.
//!
//! Telemetry: `state.engine` spans/events for edits and resolution,
//! `state.history` events from the command log.

use std::cmp::Ordering;

use core_text::{LineId, LineStore, Lines};
use tracing::{debug, trace};

mod error;
pub mod history;
pub mod source;

pub use error::EngineError;
pub use history::{Command, CommandHistory, CommandKind, GrowthPolicy};
pub use source::{LineSource, lines_from};

/// One editing session: document plus history.
#[derive(Debug)]
pub struct EditEngine {
    store: LineStore,
    history: CommandHistory,
}

impl EditEngine {
    /// Engine with the default history reservation.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_policy(GrowthPolicy::default())
    }

    pub fn with_policy(policy: GrowthPolicy) -> Result<Self, EngineError> {
        Ok(Self {
            store: LineStore::new(),
            history: CommandHistory::new(policy)?,
        })
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Line count as currently materialized (pending undo/redo not applied).
    pub fn line_count(&self) -> usize {
        self.store.len()
    }

    /// Document contents as currently materialized.
    pub fn lines(&self) -> Lines<'_> {
        self.store.iter()
    }

    pub fn queue_undo(&mut self, steps: usize) {
        self.history.queue_undo(steps);
    }

    pub fn queue_redo(&mut self, steps: usize) {
        self.history.queue_redo(steps);
    }

    /// Resolve any queued work; called at end of input.
    pub fn finish(&mut self) {
        self.resolve_pending();
    }

    /// Apply the net of all queued undo/redo requests in a single pass.
    pub fn resolve_pending(&mut self) {
        if !self.history.has_pending() {
            return;
        }
        let (undo, redo) = self.history.take_pending();
        let span = tracing::debug_span!(target: "state.engine", "resolve_pending", undo, redo, depth = self.history.depth());
        let _e = span.enter();
        match undo.cmp(&redo) {
            Ordering::Greater => self.undo(undo - redo),
            Ordering::Less => self.redo(redo - undo),
            Ordering::Equal => {}
        }
    }

    fn undo(&mut self, steps: usize) {
        let depth = self.history.depth();
        let target = depth.saturating_sub(steps);
        if self.history.last_effective() <= target {
            // Only invalidated commands in the batch; the cached index is still
            // the largest effective one at or below `target`.
            self.history.set_depth(target);
            trace!(target: "state.engine", depth, to = target, "undo_invalidated_only");
            return;
        }
        for index in (target + 1..=depth).rev() {
            if let Some((before, old_head)) = self.history.get(index).kind.undo_link() {
                self.store.relink(before, old_head);
            }
        }
        if target == 0 {
            self.store.clear();
            self.history.set_depth(0);
            self.history.set_last_effective(0);
            debug!(target: "state.engine", depth, "undo_to_empty");
            return;
        }
        self.restore_from(target);
        self.history.set_depth(target);
        self.history.recompute_last_effective();
        debug!(target: "state.engine", depth, to = target, lines = self.store.len(), "undo_applied");
    }

    fn redo(&mut self, steps: usize) {
        let depth = self.history.depth();
        let target = (depth + steps).min(self.history.recorded());
        for index in depth + 1..=target {
            if let Some((before, next)) = self.history.get(index).kind.redo_link() {
                self.store.relink(before, next);
            }
        }
        self.restore_from(target);
        self.history.set_depth(target);
        self.history.recompute_last_effective();
        debug!(target: "state.engine", depth, to = target, lines = self.store.len(), "redo_applied");
    }

    /// Set head/tail/count to the shape recorded by the command at `index`.
    fn restore_from(&mut self, index: usize) {
        let info = self.history.get(index);
        let (size, tail) = (info.size_after, info.tail_after);
        match size {
            0 => self.store.clear(),
            1 => self.store.restore(tail, tail, 1),
            _ => self.store.restore_tail(tail, size),
        }
    }

    /// Delete lines `from..=to`, clamped into the document. A range that clamps
    /// to nothing is recorded as an invalidated command.
    pub fn delete(&mut self, from: usize, to: usize) -> Result<(), EngineError> {
        self.begin_edit();
        let index = self.history.push(from, to, CommandKind::delete())?;

        let count = self.store.len();
        let from = from.max(1);
        let to = to.min(count);
        let command = self.history.top_mut();
        command.from = from;
        command.to = to;
        if from > to {
            self.history.invalidate(index);
            debug!(target: "state.engine", index, from, to, lines = count, "delete_invalidated");
            return Ok(());
        }

        let before = self.store.line_before(from);
        let old_head = match before {
            Some(id) => self.store.next(id),
            None => self.store.head(),
        };
        let after = self
            .store
            .node_at(to + 1, before.map(|id| (from - 1, id)));
        self.store.splice_out(before, after, to - from + 1);

        let (size_after, tail_after) = (self.store.len(), self.store.tail());
        let command = self.history.top_mut();
        command.kind = CommandKind::Delete {
            before,
            after,
            old_head,
        };
        command.size_after = size_after;
        command.tail_after = tail_after;
        self.history.mark_effective();
        debug!(target: "state.engine", index, from, to, lines = size_after, "delete_applied");
        Ok(())
    }

    /// Replace lines `from..=to` with lines pulled from `source` until it
    /// reports the terminator. The number of supplied lines is free: the span
    /// past `to` is reattached after however many lines arrived.
    pub fn replace<S: LineSource + ?Sized>(
        &mut self,
        from: usize,
        to: usize,
        source: &mut S,
    ) -> Result<(), EngineError> {
        self.begin_edit();
        let before = self.store.line_before(from);
        let old_head = match before {
            Some(id) => self.store.next(id),
            None => self.store.head(),
        };
        let index = self
            .history
            .push(from, to, CommandKind::replace(before, old_head))?;

        let count = self.store.len();
        let start = from.max(1);
        let prefix = (start - 1).min(count);
        let replaced = if to >= start {
            to.min(count).saturating_sub(prefix)
        } else {
            0
        };

        let mut inserted = Vec::new();
        let mut new_tail: Option<LineId> = None;
        // Last old line consumed so far, advanced in lockstep with new input.
        let mut old_cursor: Option<LineId> = None;
        let mut walked = 0usize;
        loop {
            let text = match source.next_line() {
                Ok(Some(text)) => text,
                Ok(None) => break,
                Err(err) => {
                    // Leave no half-built command behind: the slot becomes a no-op.
                    for &id in &inserted {
                        self.store.release(id);
                    }
                    self.history.invalidate(index);
                    debug!(target: "state.engine", index, from, to, error = %err, "replace_abandoned");
                    return Err(err);
                }
            };
            let id = self.store.alloc_detached(text);
            if let Some(tail) = new_tail {
                self.store.set_next(tail, Some(id));
            }
            new_tail = Some(id);
            inserted.push(id);
            if walked < replaced {
                old_cursor = match old_cursor {
                    None => old_head,
                    Some(node) => self.store.next(node),
                };
                walked += 1;
            }
        }
        if walked < replaced {
            old_cursor = self
                .store
                .node_at(prefix + replaced, old_cursor.map(|node| (prefix + walked, node)));
        }
        let after = match old_cursor {
            Some(node) if replaced > 0 => self.store.next(node),
            _ => old_head,
        };

        self.store.splice_out(before, after, replaced);
        let new_head = inserted.first().copied();
        if let (Some(head), Some(tail)) = (new_head, new_tail) {
            self.store.splice_in(before, head, tail, inserted.len());
        }

        let supplied = inserted.len();
        let (size_after, tail_after) = (self.store.len(), self.store.tail());
        let command = self.history.top_mut();
        command.kind = CommandKind::Replace {
            before,
            after,
            old_head,
            new_head,
            inserted,
        };
        command.size_after = size_after;
        command.tail_after = tail_after;
        self.history.mark_effective();
        debug!(target: "state.engine", index, from, to, replaced, supplied, lines = size_after, "replace_applied");
        Ok(())
    }

    /// Lines `from..=to` of the up-to-date document. Positions below 1 or past
    /// the end yield `None`, rendered by callers as a placeholder.
    pub fn print(&mut self, from: usize, to: usize) -> Printed<'_> {
        self.resolve_pending();
        let remaining = if to >= from {
            (to - from).saturating_add(1)
        } else {
            0
        };
        Printed {
            cursor: self.store.node_at(from.max(1), None),
            store: &self.store,
            position: from,
            remaining,
        }
    }

    fn begin_edit(&mut self) {
        self.resolve_pending();
        let store = &mut self.store;
        self.history.truncate_redo_tail(|id| store.release(id));
    }
}

/// Iterator returned by [`EditEngine::print`].
#[derive(Debug)]
pub struct Printed<'a> {
    store: &'a LineStore,
    cursor: Option<LineId>,
    position: usize,
    remaining: usize,
}

impl<'a> Iterator for Printed<'a> {
    type Item = Option<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let position = self.position;
        self.position = self.position.saturating_add(1);
        if position == 0 || position > self.store.len() {
            return Some(None);
        }
        let Some(node) = self.cursor else {
            return Some(None);
        };
        self.cursor = self.store.next(node);
        Some(Some(self.store.text(node)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
