use super::gamma::{bits_of_gamma, read_gamma, write_gamma};
use super::zigzag::{zigzag_decode, zigzag_encode};
use crate::bits::{BitReader, BitWriter};

/// Quantizes a real-valued delta to the nearest multiple of `step`, returned
/// as the integer multiple. Ties round half away from zero, matching
/// `f64::round`.
#[inline(always)]
pub fn quantize(delta_real: f64, step: f64) -> i64 {
    (delta_real / step).round() as i64
}

/// Inverts [`quantize`]: the real-valued delta a quantized code represents.
#[inline(always)]
pub fn dequantize(q: i64, step: f64) -> f64 {
    q as f64 * step
}

/// Exact bit cost of `write_residual(_, delta_real, step)`, computed without
/// touching a bit stream. Used by the cost model; must never drift from the
/// actual encoded size (§9).
#[inline(always)]
pub fn estimate_bits(delta_real: f64, step: f64) -> u32 {
    let q = quantize(delta_real, step);
    bits_of_gamma(zigzag_encode(q) + 1)
}

/// Quantizes and Elias-Gamma encodes a residual. Returns the number of bits written.
pub fn write_residual(writer: &mut BitWriter, delta_real: f64, step: f64) -> u32 {
    let q = quantize(delta_real, step);
    write_gamma(writer, zigzag_encode(q) + 1)
}

/// Reads back a residual written by [`write_residual`], as the real-valued
/// delta it represents (`q * step`). Returns `None` on a truncated stream.
pub fn read_residual(reader: &mut BitReader, step: f64) -> Option<f64> {
    let v = read_gamma(reader)?;
    let q = zigzag_decode(v - 1);
    Some(dequantize(q, step))
}
