//! `mode` defines the compression-mode enum and the evaluation-instant clock
//! shared verbatim by the compressor and the decompressor, so the
//! self-synchronizing mode-bit side channel (§4.4.2) can never drift between
//! the two sides.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompressionMode {
    MultiPredictor,
    LdrOnly,
}

impl CompressionMode {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            CompressionMode::LdrOnly
        } else {
            CompressionMode::MultiPredictor
        }
    }

    pub fn to_bit(self) -> bool {
        matches!(self, CompressionMode::LdrOnly)
    }
}

/// Minimum window occupancy required before a time-based mode switch is evaluated.
/// Point-based evaluation instead gates on the window having reached `evaluation_window`.
pub const MIN_SAMPLES_TIME_BASED: usize = 5;

/// Counts points processed (anchor included) and tracks the last evaluation
/// timestamp, reproducing the identical predicate on both encoder and decoder.
pub struct EvalClock {
    points_read: u64,
    last_eval_ts: u64,
}

impl EvalClock {
    pub fn new(anchor_ts: u64) -> Self {
        EvalClock {
            points_read: 1,
            last_eval_ts: anchor_ts,
        }
    }

    pub fn points_read(&self) -> u64 {
        self.points_read
    }

    /// Registers a just-processed non-anchor sample and reports whether `ts`
    /// lands on an evaluation instant (§4.4.2).
    pub fn advance(
        &mut self,
        ts: u64,
        use_time_window: bool,
        evaluation_window: u16,
        time_window_seconds: u32,
    ) -> bool {
        self.points_read += 1;
        if use_time_window {
            let due = ts >= self.last_eval_ts
                && ts - self.last_eval_ts >= time_window_seconds as u64;
            if due {
                self.last_eval_ts = ts;
            }
            due
        } else {
            self.points_read % evaluation_window as u64 == 0
        }
    }
}
