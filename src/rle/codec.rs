//! Fixed-bit-width RLE encoder/decoder with sentinel-or-flag framing.
//!
//! | Operation | Behaviour |
//! |---|---|
//! | [`compress`] | token stream + [`Stats`] for size prediction |
//! | [`decompress`] | token stream → bytes, little-endian per `byte_width` group |
//! | [`to_binary`] | token stream → packed bitstream (see module header table) |
//! | [`from_binary_tokens`] | packed bitstream → token stream |
//! | [`from_binary`] | packed bitstream → bytes |
//!
//! Binary container layout:
//!
//! | Field | Width (bits) |
//! |---|---|
//! | `bit_width - 1` | 7 |
//! | `use_sentinel` flag | 1 |
//! | `token_count - 1` (wrapping) | `size_bits` |
//! | `sentinel` (only if `use_sentinel`) | `bit_width` |
//! | sentinel mode run: `sentinel, value, count - 1` | `bit_width * 3` |
//! | sentinel mode bare: `value` (rewritten as a length-1 run if it equals the sentinel) | `bit_width` |
//! | flag mode run: `1, value, count - 1` | `1 + bit_width * 2` |
//! | flag mode bare: `0, value` | `1 + bit_width` |

use crate::bitstream::BitStream;
use crate::error::CodecError;

use super::types::{Params, Stats, Token};

fn read_group(data: &[u8], byte_width: usize) -> u128 {
    let mut value: u128 = 0;
    for (i, &byte) in data.iter().take(byte_width).enumerate() {
        value |= (byte as u128) << (i * 8);
    }
    value
}

/// Compress `data` under `params`, returning the token stream and the
/// statistics needed to predict its encoded size.
pub fn compress(data: &[u8], params: &Params) -> (Vec<Token>, Stats) {
    let byte_width = params.byte_width();
    let minimum_loop = params.minimum_loop() as u128;
    let max_count = params.max_count();

    let mut tokens = Vec::new();
    let mut stats = Stats::new(params);
    let mut position = 0usize;

    while position < data.len() {
        let value = read_group(&data[position..], byte_width);
        let mut count: u128 = 1;
        position += byte_width;
        while position < data.len() {
            if read_group(&data[position..], byte_width) != value {
                break;
            }
            count += 1;
            position += byte_width;
            if count >= max_count {
                break;
            }
        }
        if count >= minimum_loop {
            tokens.push(Token::Run { value, count });
            stats.add_reference(count);
        } else {
            for _ in 0..count {
                tokens.push(Token::Bare(value));
                stats.add_literal();
            }
        }
    }
    stats.analyze_sentinel(&tokens);
    (tokens, stats)
}

/// Reconstruct the original bytes from a token stream, emitting each value's
/// little-endian `byte_width`-byte encoding `count` times.
pub fn decompress(tokens: &[Token], params: &Params) -> Vec<u8> {
    let byte_width = params.byte_width();
    let mut out = Vec::new();
    for token in tokens {
        let (value, count) = match *token {
            Token::Bare(v) => (v, 1u128),
            Token::Run { value, count } => (value, count),
        };
        for _ in 0..count {
            let mut v = value;
            for _ in 0..byte_width {
                out.push((v & 0xFF) as u8);
                v >>= 8;
            }
        }
    }
    out
}

/// Pack a token stream into the binary container described in the module
/// header. `stats` must come from the same [`compress`] call that produced
/// `tokens` (its chosen sentinel drives the per-token framing).
pub fn to_binary(tokens: &[Token], stats: &Stats, params: &Params) -> Result<Vec<u8>, CodecError> {
    let count_limit = 1u128 << params.size_bits;
    if tokens.len() as u128 >= count_limit {
        return Err(CodecError::Overflow);
    }

    let mut bits = BitStream::new();
    bits.append(7, (params.bit_width - 1) as u128);
    bits.append(1, params.use_sentinel() as u128);

    let mask = count_limit - 1;
    let raw_count = (tokens.len() as u128).wrapping_sub(1) & mask;
    bits.append(params.size_bits, raw_count);

    let sentinel = stats.sentinel;
    if params.use_sentinel() {
        bits.append(params.bit_width, sentinel.unwrap_or(0));
    }
    let count_width = if params.use_sentinel() {
        params.bit_width
    } else {
        params.bit_width + 1
    };

    for token in tokens {
        match *token {
            Token::Run { value, count } => {
                if params.use_sentinel() {
                    bits.append(params.bit_width, sentinel.unwrap_or(0));
                } else {
                    bits.append(1, 1);
                }
                bits.append(params.bit_width, value);
                bits.append(count_width, count - 1);
            }
            Token::Bare(value) => {
                if params.use_sentinel() && Some(value) == sentinel {
                    bits.append(params.bit_width, sentinel.unwrap_or(0));
                    bits.append(params.bit_width, value);
                    bits.append(count_width, 0);
                } else {
                    if !params.use_sentinel() {
                        bits.append(1, 0);
                    }
                    bits.append(params.bit_width, value);
                }
            }
        }
    }

    Ok(bits.to_array())
}

/// Unpack a binary container produced by [`to_binary`] back into a token
/// stream. `size_bits` must match the value the encoder used, since — like
/// the LZSS container's `size_bit_count` — it is not itself carried in the
/// header.
pub fn from_binary_tokens(data: Vec<u8>, size_bits: u32) -> Result<Vec<Token>, CodecError> {
    let mut bits = BitStream::from_array(data);

    let need = |bits: &BitStream, count: u32, what: &'static str| -> Result<(), CodecError> {
        if bits.remaining_bits() < count as usize {
            Err(CodecError::Truncated(what))
        } else {
            Ok(())
        }
    };

    need(&bits, 7, "bit_width header field")?;
    let bit_width = bits.read(7) as u32 + 1;
    need(&bits, 1, "use_sentinel flag")?;
    let use_sentinel = bits.read(1) == 1;

    if !(1..=128).contains(&bit_width) {
        return Err(CodecError::Malformed("decoded bit_width out of range"));
    }
    if use_sentinel != (bit_width % 4 == 0) {
        return Err(CodecError::Malformed(
            "use_sentinel flag inconsistent with bit_width",
        ));
    }

    need(&bits, size_bits, "token count header field")?;
    let mask = (1u128 << size_bits) - 1;
    let raw_count = bits.read(size_bits);
    let token_count = ((raw_count.wrapping_add(1)) & mask) as usize;

    let sentinel = if use_sentinel {
        need(&bits, bit_width, "sentinel value")?;
        Some(bits.read(bit_width))
    } else {
        None
    };
    let count_width = if use_sentinel { bit_width } else { bit_width + 1 };

    let mut tokens = Vec::with_capacity(token_count);
    for _ in 0..token_count {
        if use_sentinel {
            need(&bits, bit_width, "token value")?;
            let value = bits.read(bit_width);
            if Some(value) == sentinel {
                need(&bits, bit_width, "run value")?;
                let run_value = bits.read(bit_width);
                need(&bits, count_width, "run count")?;
                let count = bits.read(count_width) + 1;
                tokens.push(Token::Run {
                    value: run_value,
                    count,
                });
            } else {
                tokens.push(Token::Bare(value));
            }
        } else {
            need(&bits, 1, "run flag")?;
            let is_run = bits.read(1) == 1;
            need(&bits, bit_width, "token value")?;
            let value = bits.read(bit_width);
            if is_run {
                need(&bits, count_width, "run count")?;
                let count = bits.read(count_width) + 1;
                tokens.push(Token::Run { value, count });
            } else {
                tokens.push(Token::Bare(value));
            }
        }
    }

    Ok(tokens)
}

/// Unpack a binary container produced by [`to_binary`] directly into bytes.
pub fn from_binary(data: Vec<u8>, size_bits: u32) -> Result<Vec<u8>, CodecError> {
    let tokens = from_binary_tokens(data.clone(), size_bits)?;

    let mut bits = BitStream::from_array(data);
    let bit_width = bits.read(7) as u32 + 1;
    let params = Params::new(bit_width, false, size_bits)?;
    Ok(decompress(&tokens, &params))
}
