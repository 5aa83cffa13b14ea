//! `decompressor` mirrors the compressor bit for bit (§4.4.5): it re-derives
//! every prediction, mode, and evaluation instant from the bytes alone, with
//! no separate index or cost windows required.

use tracing::{debug, trace_span, warn};

use crate::bits::BitReader;
use crate::codec::read_residual;
use crate::huffman::AdaptiveHuffman;
use crate::mode::{CompressionMode, EvalClock};
use crate::point::Sample;
use crate::predictor::{Predictor, PredictorBank};

pub struct Decompressor<'a> {
    reader: BitReader<'a>,
    huffman: AdaptiveHuffman,
    bank: Option<PredictorBank>,
    mode: CompressionMode,
    clock: Option<EvalClock>,
    block_size: u16,
    quant_step: f64,
    evaluation_window: u16,
    use_time_window: bool,
    time_window_seconds: u32,
    header_parsed: bool,
    exhausted: bool,
    points_emitted: u64,
}

impl<'a> Decompressor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Decompressor {
            reader: BitReader::new(bytes),
            huffman: AdaptiveHuffman::new(),
            bank: None,
            mode: CompressionMode::MultiPredictor,
            clock: None,
            block_size: 0,
            quant_step: 0.0,
            evaluation_window: 0,
            use_time_window: false,
            time_window_seconds: 0,
            header_parsed: false,
            exhausted: false,
            points_emitted: 0,
        }
    }

    pub fn block_size(&self) -> u16 {
        self.block_size
    }

    pub fn points_emitted(&self) -> u64 {
        self.points_emitted
    }

    /// Decodes the next reconstructed sample, or `None` at end-of-stream or
    /// on a truncated/malformed tail (§4.4.6).
    pub fn next(&mut self) -> Option<Sample> {
        if self.exhausted {
            return None;
        }
        let _span = trace_span!("decompressor_next").entered();

        if !self.header_parsed {
            let anchor = self.parse_header_and_anchor();
            if anchor.is_none() {
                self.exhausted = true;
            }
            return anchor;
        }

        let point = match self.decode_point() {
            Some(point) => point,
            None => {
                warn!(points_emitted = self.points_emitted, "stream truncated, stopping decode");
                self.exhausted = true;
                return None;
            }
        };
        Some(point)
    }

    /// Decodes every remaining point.
    pub fn all(&mut self) -> Vec<Sample> {
        let mut points = Vec::new();
        while let Some(point) = self.next() {
            points.push(point);
        }
        points
    }

    fn parse_header_and_anchor(&mut self) -> Option<Sample> {
        let block_size = self.reader.read_u32(16)? as u16;
        let epsilon_bits = self.reader.read_u64(64)?;
        let epsilon_effective = f64::from_bits(epsilon_bits);
        let evaluation_window = self.reader.read_u32(16)? as u16;
        let use_time_window = self.reader.read_bit()?;
        let time_window_seconds = if use_time_window {
            self.reader.read_u32(32)?
        } else {
            0
        };

        let lon = f64::from_bits(self.reader.read_u64(64)?);
        let lat = f64::from_bits(self.reader.read_u64(64)?);
        let ts = self.reader.read_u64(64)?;
        let anchor = Sample::new(lon, lat, ts);

        self.block_size = block_size;
        self.quant_step = 2.0 * epsilon_effective;
        self.evaluation_window = evaluation_window;
        self.use_time_window = use_time_window;
        self.time_window_seconds = time_window_seconds;
        self.bank = Some(PredictorBank::new(anchor));
        self.clock = Some(EvalClock::new(anchor.ts));
        self.header_parsed = true;
        self.points_emitted += 1;
        debug!(
            block_size,
            evaluation_window,
            use_time_window,
            time_window_seconds,
            "header parsed"
        );
        Some(anchor)
    }

    fn decode_point(&mut self) -> Option<Sample> {
        let predictor = match self.mode {
            CompressionMode::MultiPredictor => {
                let predictor = self.huffman.decode(&mut self.reader)?;
                self.huffman.record(predictor);
                predictor
            }
            CompressionMode::LdrOnly => Predictor::Ldr,
        };

        let bank = self.bank.as_ref().expect("header already parsed");
        let current = bank.current();
        let raw_delta = self.reader.read_u64(64)?;
        let delta = raw_delta as i64;
        let target_ts = current.ts.wrapping_add(delta as u64);

        let predictions = bank.predict(target_ts);
        let prediction = predictions.get(predictor);

        let dlon = read_residual(&mut self.reader, self.quant_step)?;
        let dlat = read_residual(&mut self.reader, self.quant_step)?;
        let reconstructed = Sample::new(prediction.0 + dlon, prediction.1 + dlat, target_ts);

        let bank = self.bank.as_mut().expect("header already parsed");
        bank.apply(reconstructed);
        self.points_emitted += 1;

        let clock = self.clock.as_mut().expect("header already parsed");
        let at_instant = clock.advance(
            target_ts,
            self.use_time_window,
            self.evaluation_window,
            self.time_window_seconds,
        );
        if at_instant {
            let bit = self.reader.read_bit()?;
            self.mode = CompressionMode::from_bit(bit);
        }

        Some(reconstructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compressor::Compressor;
    use crate::config::CompressorConfig;

    #[test]
    fn truncated_stream_stops_cleanly_without_panicking() {
        let mut compressor = Compressor::new(CompressorConfig::new(1024, 1e-5));
        for i in 0..20u64 {
            compressor.add(Sample::new(i as f64 * 0.001, 0.0, i));
        }
        compressor.close();
        let mut bytes = compressor.compressed_bytes().to_vec();
        bytes.truncate(bytes.len() / 2);

        let mut decompressor = Decompressor::new(&bytes);
        let points = decompressor.all();
        assert!(points.len() < 20);
    }

    #[test]
    fn empty_stream_yields_no_points() {
        let mut decompressor = Decompressor::new(&[]);
        assert_eq!(decompressor.next(), None);
    }
}
