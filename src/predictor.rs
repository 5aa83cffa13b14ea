//! `predictor` maintains the reconstructed history and computes the three
//! parallel predictions (ZP, LDR, CP) for a target timestamp (§4.2).

use std::collections::VecDeque;

use crate::point::Sample;

/// The closed set of predictor identities, totally ordered `Ldr < Cp < Zp`
/// for tie-breaking in the cost model (§4.4.1).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Predictor {
    Ldr = 0,
    Cp = 1,
    Zp = 2,
}

impl Predictor {
    pub const ALL: [Predictor; 3] = [Predictor::Ldr, Predictor::Cp, Predictor::Zp];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The three predictions for a target timestamp, each a `(lon, lat)` pair.
#[derive(Copy, Clone, Debug)]
pub struct Predictions {
    pub ldr: (f64, f64),
    pub cp: (f64, f64),
    pub zp: (f64, f64),
}

impl Predictions {
    pub fn get(&self, predictor: Predictor) -> (f64, f64) {
        match predictor {
            Predictor::Ldr => self.ldr,
            Predictor::Cp => self.cp,
            Predictor::Zp => self.zp,
        }
    }
}

struct HistoryEntry {
    point: Sample,
    /// Per-axis velocity induced by the transition into `point`.
    velocity: (f64, f64),
}

/// Maintains `current_reconstructed_point` and a bounded window of recent
/// reconstructed samples, each annotated with the velocity that produced it.
pub struct PredictorBank {
    current: Sample,
    history: VecDeque<HistoryEntry>,
}

impl PredictorBank {
    /// Maximum number of history entries retained (`H` in the design doc).
    const MAX_HISTORY: usize = 3;

    /// Seeds the bank with the stream anchor: zero velocity, single entry.
    pub fn new(anchor: Sample) -> Self {
        let mut history = VecDeque::with_capacity(Self::MAX_HISTORY);
        history.push_back(HistoryEntry {
            point: anchor,
            velocity: (0.0, 0.0),
        });
        PredictorBank {
            current: anchor,
            history,
        }
    }

    pub fn current(&self) -> Sample {
        self.current
    }

    /// Computes all three predictions for `target_ts`, sharing the clamped
    /// `Δt = max(target_ts - current.ts, 1)`.
    pub fn predict(&self, target_ts: u64) -> Predictions {
        let dt_signed = target_ts as i64 - self.current.ts as i64;
        let dt = if dt_signed <= 0 { 1.0 } else { dt_signed as f64 };

        let zp = (self.current.lon, self.current.lat);

        let ldr = if self.history.len() < 2 {
            zp
        } else {
            let v_last = self.history.back().unwrap().velocity;
            (self.current.lon + v_last.0 * dt, self.current.lat + v_last.1 * dt)
        };

        let cp = if self.history.len() < 3 {
            ldr
        } else {
            let v_last = self.history[self.history.len() - 1].velocity;
            let v_prev = self.history[self.history.len() - 2].velocity;
            let accel = (v_last.0 - v_prev.0, v_last.1 - v_prev.1);
            (
                ldr.0 + 0.5 * accel.0 * dt * dt,
                ldr.1 + 0.5 * accel.1 * dt * dt,
            )
        };

        Predictions { ldr, cp, zp }
    }

    /// Appends `reconstructed` to the history with its induced velocity, and
    /// evicts the oldest entry once the window exceeds `H`.
    pub fn apply(&mut self, reconstructed: Sample) {
        let dt_signed = reconstructed.ts as i64 - self.current.ts as i64;
        let velocity = if dt_signed <= 0 {
            (0.0, 0.0)
        } else {
            let dt = dt_signed as f64;
            (
                (reconstructed.lon - self.current.lon) / dt,
                (reconstructed.lat - self.current.lat) / dt,
            )
        };

        self.history.push_back(HistoryEntry {
            point: reconstructed,
            velocity,
        });
        if self.history.len() > Self::MAX_HISTORY {
            self.history.pop_front();
        }
        self.current = reconstructed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_point_degenerates_ldr_and_cp_to_current() {
        let bank = PredictorBank::new(Sample::new(0.0, 0.0, 0));
        let pred = bank.predict(10);
        assert_eq!(pred.ldr, (0.0, 0.0));
        assert_eq!(pred.cp, (0.0, 0.0));
        assert_eq!(pred.zp, (0.0, 0.0));
    }

    #[test]
    fn ldr_extrapolates_constant_velocity() {
        let mut bank = PredictorBank::new(Sample::new(0.0, 0.0, 0));
        bank.apply(Sample::new(1.0, 0.0, 10));
        // velocity is (0.1, 0.0) per tick; predicting 10 ticks ahead.
        let pred = bank.predict(20);
        assert!((pred.ldr.0 - 2.0).abs() < 1e-9);
        assert_eq!(pred.ldr.1, 0.0);
    }

    #[test]
    fn cp_needs_three_history_entries() {
        let mut bank = PredictorBank::new(Sample::new(0.0, 0.0, 0));
        bank.apply(Sample::new(1.0, 0.0, 10));
        // Only two entries so far: CP degenerates to LDR.
        let pred = bank.predict(20);
        assert_eq!(pred.cp, pred.ldr);

        bank.apply(Sample::new(3.0, 0.0, 20));
        // Velocity accelerated from 0.1 to 0.2 per tick: CP should now differ from LDR.
        let pred = bank.predict(30);
        assert_ne!(pred.cp, pred.ldr);
    }

    #[test]
    fn negative_dt_clamps_to_one() {
        let mut bank = PredictorBank::new(Sample::new(0.0, 0.0, 10));
        bank.apply(Sample::new(1.0, 0.0, 20));
        // Target before current: dt clamps to 1, velocity still (0.1, 0.0).
        let pred = bank.predict(5);
        assert!((pred.ldr.0 - (1.0 + 0.1)).abs() < 1e-9);
    }
}
