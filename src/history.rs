// history.rs

use std::ops::RangeInclusive;

/// Slot id for a record that has never been written.
const EMPTY_SLOT: u64 = 0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryRecord {
    /// The line exactly as read, trailing newline included.
    pub command: Vec<u8>,
    pub id: u64,
}

impl HistoryRecord {
    fn is_empty(&self) -> bool {
        self.id == EMPTY_SLOT
    }
}

/// Fixed-capacity ring of past command lines.
///
/// Ids start at 1 and only grow. Record `id` always lives in slot
/// `(id - 1) % capacity`, so the oldest live record sits at `next_write`
/// once the ring has filled.
pub struct HistoryLedger {
    buffer: Vec<HistoryRecord>,
    next_write: usize,
    next_id: u64,
}

impl HistoryLedger {
    pub fn new(capacity: usize) -> Self {
        let mut ledger = Self {
            buffer: vec![HistoryRecord::default(); capacity.max(1)],
            next_write: 0,
            next_id: 1,
        };
        ledger.reset();
        ledger
    }

    pub fn reset(&mut self) {
        self.buffer.fill(HistoryRecord::default());
        self.next_write = 0;
        self.next_id = 1;
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.issued().min(self.capacity() as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id the next `append` will be given.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn append(&mut self, command: impl Into<Vec<u8>>) {
        self.buffer[self.next_write] = HistoryRecord {
            command: command.into(),
            id: self.next_id,
        };
        self.next_id += 1;
        self.next_write = self.wrap(self.next_write + 1);
    }

    /// Ids currently retained; empty when nothing has been appended.
    pub fn live_range(&self) -> RangeInclusive<u64> {
        let newest = self.issued();
        let oldest = newest
            .saturating_sub(self.capacity() as u64)
            .saturating_add(1);
        oldest..=newest
    }

    pub fn lookup(&self, id: u64) -> Option<&[u8]> {
        if !self.live_range().contains(&id) {
            return None;
        }
        let record = &self.buffer[self.slot_of(id)];
        debug_assert_eq!(record.id, id);
        Some(record.command.as_slice())
    }

    /// Live records, oldest first.
    pub fn enumerate(&self) -> impl Iterator<Item = &HistoryRecord> + '_ {
        let start = if self.issued() >= self.capacity() as u64 {
            self.next_write
        } else {
            0
        };
        (0..self.capacity())
            .map(move |offset| &self.buffer[self.wrap(start + offset)])
            .filter(|record| !record.is_empty())
    }

    fn issued(&self) -> u64 {
        self.next_id - 1
    }

    fn wrap(&self, index: usize) -> usize {
        index % self.capacity()
    }

    fn slot_of(&self, id: u64) -> usize {
        ((id - 1) % self.capacity() as u64) as usize
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(crate::config::HISTORY_SIZE)
    }
}
