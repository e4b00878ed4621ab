//! Arena of line records addressed by stable `LineId` handles.
//!
//! Records are never moved once allocated. A released record keeps its slot in
//! the backing vector and is recycled by the next allocation, so handles held by
//! live code stay valid until their owner explicitly gives them back.

use tracing::trace;

/// Stable handle to a line record inside a [`LineArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(usize);

impl LineId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
struct LineRecord {
    text: Box<[u8]>,
    next: Option<LineId>,
}

#[derive(Debug, Default)]
pub struct LineArena {
    records: Vec<LineRecord>,
    free: Vec<LineId>,
}

impl LineArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached record (no successor) holding `text`.
    pub fn alloc(&mut self, text: Vec<u8>) -> LineId {
        let record = LineRecord {
            text: text.into_boxed_slice(),
            next: None,
        };
        if let Some(id) = self.free.pop() {
            self.records[id.index()] = record;
            return id;
        }
        let id = LineId(self.records.len());
        self.records.push(record);
        id
    }

    /// Return a record to the free list. The caller guarantees nothing references it.
    pub fn release(&mut self, id: LineId) {
        let record = &mut self.records[id.index()];
        record.text = Box::default();
        record.next = None;
        self.free.push(id);
        trace!(target: "text.arena", id = id.0, free = self.free.len(), "line_released");
    }

    pub fn text(&self, id: LineId) -> &[u8] {
        &self.records[id.index()].text
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.records[id.index()].next
    }

    pub fn set_next(&mut self, id: LineId, next: Option<LineId>) {
        self.records[id.index()].next = next;
    }

    /// Records currently handed out (live chain plus any history-owned runs).
    pub fn allocated(&self) -> usize {
        self.records.len() - self.free.len()
    }

    pub fn free_slots(&self) -> usize {
        self.free.len()
    }
}
