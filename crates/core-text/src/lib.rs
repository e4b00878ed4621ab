//! Arena-backed chain of text lines.
//!
//! The live document is a singly-linked chain threaded through a [`LineArena`].
//! Lines are addressed 1-based, matching the editing protocol. Detaching a run
//! never frees it: the caller keeps the handles and can splice the run back
//! later, which is what the undo history relies on.
//!
//! Invariants (checked by `debug_assert_chain` in tests):
//! - `count == 0` iff `head` is `None` (and then `tail` is `None` too).
//! - `tail.next` is `None`.
//! - walking `count - 1` links from `head` reaches `tail`.

pub mod arena;

pub use arena::{LineArena, LineId};

/// The live line chain plus the arena that owns every line record.
#[derive(Debug, Default)]
pub struct LineStore {
    arena: LineArena,
    head: Option<LineId>,
    tail: Option<LineId>,
    count: usize,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of lines in the live document.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn head(&self) -> Option<LineId> {
        self.head
    }

    pub fn tail(&self) -> Option<LineId> {
        self.tail
    }

    pub fn text(&self, id: LineId) -> &[u8] {
        self.arena.text(id)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.arena.next(id)
    }

    pub fn arena(&self) -> &LineArena {
        &self.arena
    }

    /// Allocate a line that is not yet part of the live chain.
    pub fn alloc_detached(&mut self, text: Vec<u8>) -> LineId {
        self.arena.alloc(text)
    }

    /// Link `id` to `next` without touching head/tail/count.
    pub fn set_next(&mut self, id: LineId, next: Option<LineId>) {
        self.arena.set_next(id, next);
    }

    /// Give a line no chain or history entry can reach back to the arena.
    pub fn release(&mut self, id: LineId) {
        self.arena.release(id);
    }

    /// Node before 1-based position `index`.
    ///
    /// `None` when `index <= 1`; the current tail when `index` is past the end,
    /// so inserts beyond the document append after the last line.
    pub fn line_before(&self, index: usize) -> Option<LineId> {
        if index <= 1 {
            return None;
        }
        if index > self.count {
            return self.tail;
        }
        self.node_at(index - 1, None)
    }

    /// Node at 1-based position `index`.
    ///
    /// `resume` is a previously resolved `(position, node)` pair; when it lies at
    /// or before `index` the walk continues from there instead of from `head`.
    pub fn node_at(&self, index: usize, resume: Option<(usize, LineId)>) -> Option<LineId> {
        if index == 0 || index > self.count {
            return None;
        }
        if index == self.count {
            return self.tail;
        }
        let (mut at, mut node) = match resume {
            Some((at, node)) if at >= 1 && at <= index => (at, node),
            _ => (1, self.head?),
        };
        while at < index {
            node = self.arena.next(node)?;
            at += 1;
        }
        Some(node)
    }

    /// Point `before.next` (or `head` when `before` is `None`) at `next`.
    pub fn relink(&mut self, before: Option<LineId>, next: Option<LineId>) {
        match before {
            Some(id) => self.arena.set_next(id, next),
            None => self.head = next,
        }
    }

    /// Detach the run strictly between `before` and `after`.
    ///
    /// The removed nodes keep their links; the last one still points at `after`.
    pub fn splice_out(&mut self, before: Option<LineId>, after: Option<LineId>, removed: usize) {
        self.relink(before, after);
        if after.is_none() {
            self.tail = before;
        }
        self.count -= removed;
    }

    /// Attach the run `new_head..=new_tail` directly after `before`.
    pub fn splice_in(
        &mut self,
        before: Option<LineId>,
        new_head: LineId,
        new_tail: LineId,
        inserted: usize,
    ) {
        let after = match before {
            Some(id) => self.arena.next(id),
            None => self.head,
        };
        self.arena.set_next(new_tail, after);
        self.relink(before, Some(new_head));
        if after.is_none() {
            self.tail = Some(new_tail);
        }
        self.count += inserted;
    }

    /// Reset head, tail and count wholesale.
    pub fn restore(&mut self, head: Option<LineId>, tail: Option<LineId>, count: usize) {
        self.head = head;
        self.restore_tail(tail, count);
    }

    /// Reset tail and count, terminating the chain at the new tail.
    pub fn restore_tail(&mut self, tail: Option<LineId>, count: usize) {
        self.tail = tail;
        self.count = count;
        if let Some(id) = tail {
            self.arena.set_next(id, None);
        }
    }

    pub fn clear(&mut self) {
        self.restore(None, None, 0);
    }

    /// Iterate the live document, bounded by `count`.
    pub fn iter(&self) -> Lines<'_> {
        Lines {
            store: self,
            cursor: self.head,
            remaining: self.count,
        }
    }

    #[cfg(test)]
    fn debug_assert_chain(&self) {
        assert_eq!(self.count == 0, self.head.is_none());
        assert_eq!(self.count == 0, self.tail.is_none());
        if let Some(tail) = self.tail {
            assert_eq!(self.arena.next(tail), None);
            assert_eq!(self.node_at(self.count, None), Some(tail));
            let mut node = self.head.unwrap();
            for _ in 1..self.count {
                node = self.arena.next(node).unwrap();
            }
            assert_eq!(node, tail);
        }
    }
}

/// Borrowing iterator over the live document's line contents.
#[derive(Debug)]
pub struct Lines<'a> {
    store: &'a LineStore,
    cursor: Option<LineId>,
    remaining: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor?;
        self.remaining -= 1;
        self.cursor = self.store.next(id);
        Some(self.store.text(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
