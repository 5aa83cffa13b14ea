//! `huffman` maintains the adaptive 3-symbol prefix code over predictor
//! identities (§4.3). The code alphabet is always `{0, 10, 11}`; only the
//! assignment of predictors to those three codes changes over time.

use std::collections::VecDeque;

use tracing::trace;

use crate::bits::{BitReader, BitWriter};
use crate::predictor::Predictor;

/// Size of the sliding window of recent predictor choices that drives the
/// frequency-based code assignment.
const WINDOW_SIZE: usize = 1000;

/// `(bit pattern, length)` for one of the three fixed codes, in decreasing
/// rank order: rank 0 is `0` (length 1), ranks 1 and 2 are `10`/`11`.
const CODE_TABLE: [(u8, u8); 3] = [(0b0, 1), (0b10, 2), (0b11, 2)];

pub struct AdaptiveHuffman {
    window: VecDeque<Predictor>,
    counts: [i64; 3],
    /// `ranks[r]` is the predictor currently assigned the rank-`r` code.
    ranks: [Predictor; 3],
    /// `codes[predictor.index()]` is that predictor's current `(bits, length)`.
    codes: [(u8, u8); 3],
}

impl AdaptiveHuffman {
    /// Seeded prior counts, arbitrary but shared by both encoder and decoder.
    const SEED_COUNTS: [i64; 3] = [60, 10, 30]; // [LDR, CP, ZP]

    pub fn new() -> Self {
        let mut huffman = AdaptiveHuffman {
            window: VecDeque::with_capacity(WINDOW_SIZE),
            counts: Self::SEED_COUNTS,
            ranks: Predictor::ALL,
            codes: [(0, 0); 3],
        };
        huffman.assign();
        huffman
    }

    /// Recomputes the rank-to-predictor assignment: sort by `(frequency
    /// desc, predictor-id asc)` and hand out `0`, `10`, `11` in that order.
    fn assign(&mut self) {
        let mut order = Predictor::ALL;
        order.sort_by(|&a, &b| {
            self.counts[b.index()]
                .cmp(&self.counts[a.index()])
                .then(a.index().cmp(&b.index()))
        });
        self.ranks = order;
        for (rank, &predictor) in order.iter().enumerate() {
            self.codes[predictor.index()] = CODE_TABLE[rank];
        }
        trace!(?order, "huffman code reassigned");
    }

    /// Bit length of `predictor`'s current code (1 or 2).
    pub fn code_len(&self, predictor: Predictor) -> u32 {
        self.codes[predictor.index()].1 as u32
    }

    /// Writes `predictor`'s current code. Returns the number of bits written.
    pub fn encode(&self, predictor: Predictor, writer: &mut BitWriter) -> u32 {
        let (bits, len) = self.codes[predictor.index()];
        writer.write_u32(bits as u32, len as u32)
    }

    /// Reads one predictor identity off `reader` per the current assignment.
    pub fn decode(&self, reader: &mut BitReader) -> Option<Predictor> {
        if !reader.read_bit()? {
            Some(self.ranks[0])
        } else if !reader.read_bit()? {
            Some(self.ranks[1])
        } else {
            Some(self.ranks[2])
        }
    }

    /// Records a transmitted predictor choice: pushes it onto the sliding
    /// window, evicting and decrementing the oldest entry once the window
    /// exceeds [`WINDOW_SIZE`], then reassigns every time the window length
    /// lands on a multiple of 100.
    pub fn record(&mut self, predictor: Predictor) {
        self.window.push_back(predictor);
        self.counts[predictor.index()] += 1;
        if self.window.len() > WINDOW_SIZE {
            if let Some(evicted) = self.window.pop_front() {
                self.counts[evicted.index()] -= 1;
            }
        }
        if self.window.len() % 100 == 0 {
            self.assign();
        }
    }
}

impl Default for AdaptiveHuffman {
    fn default() -> Self {
        Self::new()
    }
}
