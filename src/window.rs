//! `window` implements the fixed-capacity cost-record ring buffer backing
//! the two sliding cost windows in §4.4.3. Only the compressor maintains
//! these; the decompressor never needs to re-derive a mode switch, it just
//! reads the mode bit the compressor already decided.

use std::collections::VecDeque;

/// Per-point encoded bit cost, tagged with the timestamp it was incurred at
/// (needed for time-based eviction).
#[derive(Copy, Clone, Debug)]
pub struct CostRecord {
    pub cost: i64,
    pub ts: u64,
}

/// Hard cap on the ring buffer's backing storage, independent of the
/// configured evaluation window `E` (mirrors the reference's fixed-size
/// `RingBuffer<CostRecord, 256>`).
const MAX_CAPACITY: usize = 256;

pub struct CostWindow {
    buffer: VecDeque<CostRecord>,
    sum: i64,
}

impl CostWindow {
    pub fn new() -> Self {
        CostWindow {
            buffer: VecDeque::with_capacity(MAX_CAPACITY),
            sum: 0,
        }
    }

    pub fn sum(&self) -> i64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Pushes `record`, then evicts from the head until the window is no
    /// larger than `min(capacity, MAX_CAPACITY)` (point-count-bounded mode).
    pub fn push_bounded(&mut self, record: CostRecord, capacity: usize) {
        self.buffer.push_back(record);
        self.sum += record.cost;
        let cap = capacity.min(MAX_CAPACITY).max(1);
        while self.buffer.len() > cap {
            self.evict_front();
        }
    }

    /// Pushes `record`, then evicts everything older than `now - duration`
    /// (time-bounded mode), subject to the same hard capacity cap.
    pub fn push_time_bounded(&mut self, record: CostRecord, now: u64, duration: u64) {
        self.buffer.push_back(record);
        self.sum += record.cost;
        while let Some(front) = self.buffer.front() {
            let stale = now >= duration && front.ts < now - duration;
            if stale || self.buffer.len() > MAX_CAPACITY {
                self.evict_front();
            } else {
                break;
            }
        }
    }

    fn evict_front(&mut self) {
        if let Some(evicted) = self.buffer.pop_front() {
            self.sum -= evicted.cost;
        }
    }
}

impl Default for CostWindow {
    fn default() -> Self {
        Self::new()
    }
}
