use core_text::LineId;
use tracing::{debug, trace};

use crate::EngineError;

/// Command slots reserved up front.
pub const HISTORY_INITIAL_CAPACITY: usize = 80_000;
/// Slots added each time the history outgrows its reservation.
pub const HISTORY_GROWTH_INCREMENT: usize = 10_000;

/// Reservation policy for the command log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    pub initial_capacity: usize,
    pub growth_increment: usize,
}

impl GrowthPolicy {
    pub fn new(initial_capacity: usize, growth_increment: usize) -> Self {
        Self {
            initial_capacity,
            growth_increment: growth_increment.max(1),
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(HISTORY_INITIAL_CAPACITY, HISTORY_GROWTH_INCREMENT)
    }
}

/// Structural record of one edit, per variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandKind {
    /// A delete whose range clamped to nothing. Occupies a slot, changes nothing.
    #[default]
    Invalidated,
    Delete {
        before: Option<LineId>,
        after: Option<LineId>,
        old_head: Option<LineId>,
    },
    Replace {
        before: Option<LineId>,
        after: Option<LineId>,
        old_head: Option<LineId>,
        new_head: Option<LineId>,
        /// Every line this command allocated, released when the command is truncated.
        inserted: Vec<LineId>,
    },
}

impl CommandKind {
    pub fn delete() -> Self {
        Self::Delete {
            before: None,
            after: None,
            old_head: None,
        }
    }

    pub fn replace(before: Option<LineId>, old_head: Option<LineId>) -> Self {
        Self::Replace {
            before,
            after: None,
            old_head,
            new_head: None,
            inserted: Vec::new(),
        }
    }

    pub fn is_invalidated(&self) -> bool {
        matches!(self, Self::Invalidated)
    }

    /// `(before, next)` link that reverses this command.
    pub fn undo_link(&self) -> Option<(Option<LineId>, Option<LineId>)> {
        match self {
            Self::Invalidated => None,
            Self::Delete {
                before, old_head, ..
            }
            | Self::Replace {
                before, old_head, ..
            } => Some((*before, *old_head)),
        }
    }

    /// `(before, next)` link that reapplies this command.
    pub fn redo_link(&self) -> Option<(Option<LineId>, Option<LineId>)> {
        match self {
            Self::Invalidated => None,
            Self::Delete { before, after, .. } => Some((*before, *after)),
            // A replace that supplied no lines behaves like a delete.
            Self::Replace {
                before,
                after,
                new_head,
                ..
            } => Some((*before, new_head.or(*after))),
        }
    }
}

/// One history slot. `size_after`/`tail_after` describe the document right
/// after the command took effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub from: usize,
    pub to: usize,
    pub size_after: usize,
    pub tail_after: Option<LineId>,
    pub kind: CommandKind,
}

impl Command {
    fn new(from: usize, to: usize, kind: CommandKind) -> Self {
        Self {
            from,
            to,
            size_after: 0,
            tail_after: None,
            kind,
        }
    }

    fn reset(&mut self, from: usize, to: usize, kind: CommandKind) {
        self.from = from;
        self.to = to;
        self.size_after = 0;
        self.tail_after = None;
        self.kind = kind;
    }
}

/// Randomly indexable command log with depth pointer, redo ceiling and queued
/// undo/redo counters.
///
/// Slot 0 is a permanent record of the empty document so index arithmetic can
/// treat "before the first command" like any other state.
///
/// Invariants:
/// - `depth <= recorded`
/// - `last_effective <= depth`, and every slot in `(last_effective, depth]` is
///   `CommandKind::Invalidated`
/// - slots past `recorded` are stale and get overwritten by the next push
#[derive(Debug)]
pub struct CommandHistory {
    slots: Vec<Command>,
    capacity: usize,
    policy: GrowthPolicy,
    depth: usize,
    recorded: usize,
    last_effective: usize,
    pending_undo: usize,
    pending_redo: usize,
    has_pending: bool,
}

impl CommandHistory {
    pub fn new(policy: GrowthPolicy) -> Result<Self, EngineError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(policy.initial_capacity + 1)
            .map_err(|source| EngineError::HistoryExhausted {
                capacity: 0,
                source,
            })?;
        slots.push(Command::default());
        Ok(Self {
            slots,
            capacity: policy.initial_capacity,
            policy,
            depth: 0,
            recorded: 0,
            last_effective: 0,
            pending_undo: 0,
            pending_redo: 0,
            has_pending: false,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn recorded(&self) -> usize {
        self.recorded
    }
    pub fn last_effective(&self) -> usize {
        self.last_effective
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn pending_undo(&self) -> usize {
        self.pending_undo
    }
    pub fn pending_redo(&self) -> usize {
        self.pending_redo
    }
    pub fn has_pending(&self) -> bool {
        self.has_pending
    }

    /// Slots ever allocated (excluding the empty-document sentinel).
    pub fn allocated_slots(&self) -> usize {
        self.slots.len() - 1
    }

    /// Command at `index`; index 0 is the empty document.
    pub fn get(&self, index: usize) -> &Command {
        &self.slots[index]
    }

    /// Command at the current depth.
    pub fn top(&self) -> &Command {
        &self.slots[self.depth]
    }

    pub fn top_mut(&mut self) -> &mut Command {
        &mut self.slots[self.depth]
    }

    /// Record a new command at `depth + 1`, reusing the slot if it was allocated
    /// before. Anything previously beyond `depth` stops being redoable.
    pub fn push(&mut self, from: usize, to: usize, kind: CommandKind) -> Result<usize, EngineError> {
        let index = self.depth + 1;
        self.ensure_capacity(index)?;
        if let Some(slot) = self.slots.get_mut(index) {
            slot.reset(from, to, kind);
        } else {
            self.slots.push(Command::new(from, to, kind));
        }
        self.depth = index;
        self.recorded = index;
        trace!(target: "state.history", depth = index, from, to, "command_pushed");
        Ok(index)
    }

    fn ensure_capacity(&mut self, index: usize) -> Result<(), EngineError> {
        if index <= self.capacity {
            return Ok(());
        }
        let grown = self.capacity + self.policy.growth_increment;
        let additional = (grown + 1).saturating_sub(self.slots.len());
        self.slots
            .try_reserve_exact(additional)
            .map_err(|source| EngineError::HistoryExhausted {
                capacity: self.capacity,
                source,
            })?;
        debug!(target: "state.history", old = self.capacity, new = grown, "history_grown");
        self.capacity = grown;
        Ok(())
    }

    /// Drop every command beyond `depth`, handing the lines only they owned to
    /// `release`. Must run before a push that follows undos.
    pub fn truncate_redo_tail(&mut self, mut release: impl FnMut(LineId)) {
        if self.recorded == self.depth {
            return;
        }
        let mut released = 0usize;
        for slot in &mut self.slots[self.depth + 1..=self.recorded] {
            if let CommandKind::Replace { inserted, .. } = &mut slot.kind {
                released += inserted.len();
                for id in inserted.drain(..) {
                    release(id);
                }
            }
        }
        debug!(
            target: "state.history",
            depth = self.depth,
            discarded = self.recorded - self.depth,
            released,
            "redo_tail_truncated"
        );
        self.recorded = self.depth;
    }

    /// Turn the slot at `index` into a no-op that still remembers the document
    /// shape of the last effective command, so jumping to it restores correctly.
    pub fn invalidate(&mut self, index: usize) {
        let source = &self.slots[self.last_effective];
        let (from, to, size_after, tail_after) =
            (source.from, source.to, source.size_after, source.tail_after);
        let slot = &mut self.slots[index];
        slot.from = from;
        slot.to = to;
        slot.size_after = size_after;
        slot.tail_after = tail_after;
        slot.kind = CommandKind::Invalidated;
        trace!(target: "state.history", index, copied_from = self.last_effective, "command_invalidated");
    }

    /// Mark the command at the current depth as the latest effective one.
    pub fn mark_effective(&mut self) {
        self.last_effective = self.depth;
    }

    pub fn recompute_last_effective(&mut self) {
        self.last_effective = (1..=self.depth)
            .rev()
            .find(|&i| !self.slots[i].kind.is_invalidated())
            .unwrap_or(0);
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        debug_assert!(depth <= self.recorded);
        self.depth = depth;
    }

    pub(crate) fn set_last_effective(&mut self, index: usize) {
        self.last_effective = index;
    }

    /// Queue `steps` undos, never more than the history can honour once pending
    /// redos are netted out.
    pub fn queue_undo(&mut self, steps: usize) {
        self.has_pending = true;
        let max = self.depth + self.pending_redo;
        self.pending_undo = self.pending_undo.saturating_add(steps.min(max)).min(max);
        trace!(target: "state.history", steps, pending_undo = self.pending_undo, pending_redo = self.pending_redo, "undo_queued");
    }

    /// Queue `steps` redos, bounded by the redo ceiling plus pending undos.
    pub fn queue_redo(&mut self, steps: usize) {
        self.has_pending = true;
        let max = self.pending_undo + self.recorded - self.depth;
        self.pending_redo = self.pending_redo.saturating_add(steps.min(max)).min(max);
        trace!(target: "state.history", steps, pending_undo = self.pending_undo, pending_redo = self.pending_redo, "redo_queued");
    }

    /// Take the queued counters as `(undo, redo)`, clearing them and the flag.
    pub fn take_pending(&mut self) -> (usize, usize) {
        let taken = (self.pending_undo, self.pending_redo);
        self.pending_undo = 0;
        self.pending_redo = 0;
        self.has_pending = false;
        taken
    }
}
