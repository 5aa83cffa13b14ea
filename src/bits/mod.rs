//! `bits` contains the MSB-first bit-level reader and writer the codec is built on.
//!
//! Unlike the byte-oriented `ReadBuffer`/`WriteBuffer` traits used elsewhere for
//! header fields, these two types track a partial byte across calls so that
//! variable-length codes (Elias-Gamma) can straddle byte boundaries.

mod reader;
mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;
