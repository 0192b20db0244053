//! LZSS tokens, parameters, and size-prediction statistics.

use crate::bitstream::bit_width_per_value;
use crate::error::CodecError;

/// One unit of an LZSS token stream: either a literal byte or a
/// back-reference into the already-decoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Literal(u8),
    /// `offset` counts bytes backwards from the position this token is
    /// emitted at (always negative); `length` is the number of bytes to
    /// copy, which may exceed `-offset` for self-overlapping runs.
    BackRef { offset: i32, length: u32 },
}

/// Derive `minimum_backreference` from the token widths: a back-reference
/// is only worth emitting if it is at least as cheap as the literals it
/// would replace.
fn minimum_backreference_for(window_bits: u32, length_bits: u32) -> u32 {
    let reference_size = 1 + window_bits + length_bits;
    match reference_size {
        0..=8 => 1,
        9..=16 => 2,
        17..=24 => 3,
        _ => 4,
    }
}

/// Tunable LZSS parameters plus the values derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub window_bits: u32,
    pub length_bits: u32,
    pub size_bit_count: u32,
    pub minimum_backreference: u32,
}

impl Params {
    /// Construct parameters, validating the legal ranges from the wire
    /// format (`window_bits` fits a 4-bit `- 3` field, `length_bits` fits a
    /// 4-bit `- 1` field).
    pub fn new(window_bits: u32, length_bits: u32, size_bit_count: u32) -> Result<Self, CodecError> {
        if !(3..=16).contains(&window_bits) {
            return Err(CodecError::Configuration("window_bits must be in [3, 16]"));
        }
        if !(1..=16).contains(&length_bits) {
            return Err(CodecError::Configuration("length_bits must be in [1, 16]"));
        }
        if size_bit_count == 0 || size_bit_count > 32 {
            return Err(CodecError::Configuration(
                "size_bit_count must be in [1, 32]",
            ));
        }
        Ok(Params {
            window_bits,
            length_bits,
            size_bit_count,
            minimum_backreference: minimum_backreference_for(window_bits, length_bits),
        })
    }

    /// Cap `window_bits`/`length_bits` at the width actually needed to
    /// address `buffer`, so a small buffer never pays for a header wider
    /// than it needs.
    pub fn sanitize_bits(buffer_len: usize, requested_bits: u32) -> u32 {
        bit_width_per_value(buffer_len).min(requested_bits)
    }

    /// Largest representable back-reference length for these parameters.
    pub fn max_length(&self) -> u32 {
        self.minimum_backreference + (1u32 << self.length_bits) - 1
    }

    /// Header overhead, in bits, for the binary container (§3):
    /// `size_bit_count + 4 + 4 + 2`.
    pub fn overhead_bits(&self) -> u32 {
        self.size_bit_count + 4 + 4 + 2
    }
}

/// Running counts used to predict the encoded size of a token stream
/// without materialising it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub literals: u64,
    pub references: u64,
    pub max_window: u32,
    pub max_length: u32,
    window_bits: u32,
    length_bits: u32,
    overhead_bits: u32,
}

impl Stats {
    pub fn new(params: &Params) -> Self {
        Stats {
            literals: 0,
            references: 0,
            max_window: 0,
            max_length: 0,
            window_bits: params.window_bits,
            length_bits: params.length_bits,
            overhead_bits: params.overhead_bits(),
        }
    }

    pub fn add_literal(&mut self) {
        self.literals += 1;
    }

    pub fn add_reference(&mut self, offset: u32, length: u32) {
        self.references += 1;
        self.max_window = self.max_window.max(offset);
        self.max_length = self.max_length.max(length);
    }

    /// Predicted encoded size in bytes:
    /// `ceil((overhead + 9*literals + (1 + window_bits + length_bits)*references) / 8)`.
    pub fn size(&self) -> u64 {
        let per_reference_bits = (1 + self.window_bits + self.length_bits) as u64;
        let mut bits = self.overhead_bits as u64;
        bits += self.literals * 9;
        bits += self.references * per_reference_bits;
        (bits + 7) / 8
    }
}
