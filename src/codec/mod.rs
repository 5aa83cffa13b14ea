//! `codec` implements the residual codec: ZigZag + Elias-Gamma over quantized
//! real-valued deltas (§4.1 of the design).

mod gamma;
mod residual;
mod zigzag;

pub use gamma::{bits_of_gamma, read_gamma, write_gamma};
pub use residual::{dequantize, estimate_bits, quantize, read_residual, write_residual};
pub use zigzag::{zigzag_decode, zigzag_encode};
