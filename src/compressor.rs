//! `compressor` drives the encoder side of the CoST pipeline (§4.4): per-point
//! predictor selection, cost-windowed mode switching, and bit emission.

use tracing::{debug, trace, trace_span};

use crate::bits::BitWriter;
use crate::codec::{dequantize, estimate_bits, quantize, write_residual};
use crate::config::CompressorConfig;
use crate::huffman::AdaptiveHuffman;
use crate::mode::{CompressionMode, EvalClock, MIN_SAMPLES_TIME_BASED};
use crate::point::Sample;
use crate::predictor::{Predictor, PredictorBank};
use crate::stats::CompressionStats;
use crate::window::{CostRecord, CostWindow};

/// Amortized cost, in bits, of the mode bit itself (§4.4.3 `κ`).
const SWITCH_HYSTERESIS: i64 = 1;

pub struct Compressor {
    config: CompressorConfig,
    writer: BitWriter,
    bank: Option<PredictorBank>,
    huffman: AdaptiveHuffman,
    cost_multi: CostWindow,
    cost_ldr: CostWindow,
    mode: CompressionMode,
    clock: Option<EvalClock>,
    stats: CompressionStats,
}

impl Compressor {
    pub fn new(config: CompressorConfig) -> Self {
        let mut writer = BitWriter::new();
        let mut stats = CompressionStats::new();
        stats.total_bits += writer.write_u32(config.block_size as u32, 16) as u64;
        stats.total_bits +=
            writer.write_u64(config.epsilon_effective().to_bits(), 64) as u64;
        stats.total_bits += writer.write_u32(config.evaluation_window as u32, 16) as u64;
        stats.total_bits += writer.write_bit(config.use_time_window) as u64;
        if config.use_time_window {
            stats.total_bits += writer.write_u32(config.time_window_seconds, 32) as u64;
        }
        debug!(
            block_size = config.block_size,
            evaluation_window = config.evaluation_window,
            use_time_window = config.use_time_window,
            time_window_seconds = config.time_window_seconds,
            "header written"
        );

        Compressor {
            config,
            writer,
            bank: None,
            huffman: AdaptiveHuffman::new(),
            cost_multi: CostWindow::new(),
            cost_ldr: CostWindow::new(),
            mode: CompressionMode::MultiPredictor,
            clock: None,
            stats,
        }
    }

    pub fn add(&mut self, point: Sample) {
        let _span = trace_span!("compressor_add", ts = point.ts).entered();
        match self.bank.take() {
            None => {
                self.write_anchor(point);
                self.bank = Some(PredictorBank::new(point));
                self.clock = Some(EvalClock::new(point.ts));
                self.stats.total_points += 1;
            }
            Some(mut bank) => {
                self.encode_point(&mut bank, point);
                self.bank = Some(bank);
            }
        }
    }

    pub fn close(&mut self) {
        self.writer.flush();
    }

    pub fn compressed_bytes(&self) -> &[u8] {
        self.writer.bytes()
    }

    pub fn compressed_bits(&self) -> u64 {
        self.writer.bits_written()
    }

    pub fn stats(&self) -> &CompressionStats {
        &self.stats
    }

    fn write_anchor(&mut self, point: Sample) {
        let mut bits = 0u64;
        bits += self.writer.write_u64(point.lon.to_bits(), 64) as u64;
        bits += self.writer.write_u64(point.lat.to_bits(), 64) as u64;
        bits += self.writer.write_u64(point.ts, 64) as u64;
        self.stats.total_bits += bits;
        self.stats.timestamp_bits += 64;
    }

    fn encode_point(&mut self, bank: &mut PredictorBank, point: Sample) {
        let step = self.config.quant_step();
        let predictions = bank.predict(point.ts);

        let mut best = Predictor::Ldr;
        let mut best_cost = u32::MAX;
        for &p in &Predictor::ALL {
            let pred = predictions.get(p);
            let cost = self.huffman.code_len(p)
                + estimate_bits(point.lon - pred.0, step)
                + estimate_bits(point.lat - pred.1, step);
            if cost < best_cost {
                best_cost = cost;
                best = p;
            }
        }

        let ldr_pred = predictions.get(Predictor::Ldr);
        let cost_ldr_only =
            estimate_bits(point.lon - ldr_pred.0, step) + estimate_bits(point.lat - ldr_pred.1, step);

        let multi_record = CostRecord { cost: best_cost as i64, ts: point.ts };
        let ldr_record = CostRecord { cost: cost_ldr_only as i64, ts: point.ts };
        if self.config.use_time_window {
            let duration = self.config.time_window_seconds as u64;
            self.cost_multi.push_time_bounded(multi_record, point.ts, duration);
            self.cost_ldr.push_time_bounded(ldr_record, point.ts, duration);
        } else {
            let capacity = self.config.evaluation_window as usize;
            self.cost_multi.push_bounded(multi_record, capacity);
            self.cost_ldr.push_bounded(ldr_record, capacity);
        }

        let mode_used = self.mode;
        let reconstructed = match mode_used {
            CompressionMode::MultiPredictor => {
                let flag_bits = self.huffman.encode(best, &mut self.writer);
                self.huffman.record(best);
                self.stats.predictor_flag_bits += flag_bits as u64;
                self.stats.total_bits += flag_bits as u64;
                self.stats.record_predictor(best);
                self.emit_body(bank, point, best)
            }
            CompressionMode::LdrOnly => self.emit_body(bank, point, Predictor::Ldr),
        };
        bank.apply(reconstructed);
        self.stats.total_points += 1;

        let clock = self.clock.as_mut().expect("anchor already processed");
        let at_instant = clock.advance(
            point.ts,
            self.config.use_time_window,
            self.config.evaluation_window,
            self.config.time_window_seconds,
        );

        if at_instant {
            let sufficient = if self.config.use_time_window {
                self.cost_multi.len() >= MIN_SAMPLES_TIME_BASED
            } else {
                self.cost_multi.len() >= self.config.evaluation_window as usize
            };
            if sufficient {
                self.maybe_switch_mode();
            }
            let bit = self.mode.to_bit();
            self.writer.write_bit(bit);
            self.stats.mode_switch_bits += 1;
            self.stats.total_bits += 1;
        }

        match mode_used {
            CompressionMode::MultiPredictor => self.stats.multi_predictor_mode_points += 1,
            CompressionMode::LdrOnly => self.stats.ldr_only_mode_points += 1,
        }
    }

    /// Writes the shared ts-delta + residual body for `predictor`'s prediction,
    /// returning the reconstructed sample the history should advance to.
    fn emit_body(&mut self, bank: &PredictorBank, point: Sample, predictor: Predictor) -> Sample {
        let step = self.config.quant_step();
        let current = bank.current();
        let prediction = bank.predict(point.ts).get(predictor);

        let delta = (point.ts as i64).wrapping_sub(current.ts as i64);
        let ts_bits = self.writer.write_u64(delta as u64, 64);
        self.stats.timestamp_bits += ts_bits as u64;

        let dlon = point.lon - prediction.0;
        let dlat = point.lat - prediction.1;
        let lon_bits = write_residual(&mut self.writer, dlon, step);
        let lat_bits = write_residual(&mut self.writer, dlat, step);
        self.stats.quantized_data_bits += (lon_bits + lat_bits) as u64;
        self.stats.total_bits += (ts_bits + lon_bits + lat_bits) as u64;

        let recon_lon = prediction.0 + dequantize(quantize(dlon, step), step);
        let recon_lat = prediction.1 + dequantize(quantize(dlat, step), step);
        Sample::new(recon_lon, recon_lat, point.ts)
    }

    fn maybe_switch_mode(&mut self) {
        let s_multi = self.cost_multi.sum();
        let s_ldr = self.cost_ldr.sum();
        let new_mode = match self.mode {
            CompressionMode::MultiPredictor if s_ldr < s_multi - SWITCH_HYSTERESIS => {
                Some(CompressionMode::LdrOnly)
            }
            CompressionMode::LdrOnly if s_multi < s_ldr - SWITCH_HYSTERESIS => {
                Some(CompressionMode::MultiPredictor)
            }
            _ => None,
        };
        if let Some(mode) = new_mode {
            debug!(?mode, s_multi, s_ldr, "compression mode switch");
            self.mode = mode;
            self.stats.record_mode_switch();
        } else {
            trace!(s_multi, s_ldr, "mode switch evaluated, no change");
        }
    }
}
