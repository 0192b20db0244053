//! Byte-oriented LZSS encoder/decoder with a hash-map-of-positions matcher.
//!
//! | Operation | Behaviour |
//! |---|---|
//! | [`compress`] | token stream + [`Stats`] for size prediction |
//! | [`decompress`] | token stream → bytes, byte-by-byte copy for back-refs |
//! | [`to_binary`] | token stream → packed bitstream (see module header table) |
//! | [`from_binary`] | packed bitstream → bytes |
//!
//! Binary container layout:
//!
//! | Field | Width (bits) |
//! |---|---|
//! | `window_bits - 3` | 4 |
//! | `length_bits - 1` | 4 |
//! | `minimum_backreference - 1` | 2 |
//! | `token_count` | `size_bit_count` |
//! | literal: `0` then byte | 1 + 8 |
//! | back-ref: `1` then `-offset-1` then `length - minimum_backreference` | 1 + window_bits + length_bits |

use std::collections::HashMap;

use crate::bitstream::BitStream;
use crate::error::CodecError;

use super::types::{Params, Stats, Token};

/// Length of the common prefix between `lhs` (read circularly) and `rhs`
/// (read linearly), capped at `max_length`. `lhs[i % lhs.len()]` lets a
/// match run longer than the candidate-to-cursor gap, producing
/// self-overlapping back-references.
fn common_prefix(lhs: &[u8], rhs: &[u8], max_length: usize) -> usize {
    if lhs.is_empty() {
        return 0;
    }
    let count = rhs.len().min(max_length);
    for (i, &r) in rhs.iter().take(count).enumerate() {
        if lhs[i % lhs.len()] != r {
            return i;
        }
    }
    count
}

/// Compress `data` under `params`, returning the token stream and the
/// statistics needed to predict its encoded size.
pub fn compress(data: &[u8], params: &Params) -> (Vec<Token>, Stats) {
    let minimum_backreference = params.minimum_backreference as usize;
    let max_length = params.max_length() as usize;
    let history = (1u64 << params.window_bits) as i64 + 1;

    let mut candidate_cache: HashMap<Box<[u8]>, Vec<usize>> = HashMap::new();
    let mut tokens = Vec::new();
    let mut stats = Stats::new(params);
    let mut position = 0usize;

    while position < data.len() {
        let probe_end = (position + minimum_backreference).min(data.len());
        let probe_key = &data[position..probe_end];

        let existing = candidate_cache.get(probe_key).cloned();
        match existing {
            None => {
                candidate_cache.insert(probe_key.into(), vec![position]);
                tokens.push(Token::Literal(data[position]));
                position += 1;
                stats.add_literal();
            }
            Some(candidates) => {
                let oldest = position as i64 - history;
                let mut best_candidate = position;
                let mut best_length = 0usize;
                let mut surviving = Vec::with_capacity(candidates.len() + 1);
                for pos in candidates {
                    if pos as i64 > oldest {
                        surviving.push(pos);
                        if best_length < max_length {
                            let lhs = &data[pos..position];
                            let rhs = &data[position..];
                            let prefix = common_prefix(lhs, rhs, max_length);
                            if prefix > best_length {
                                best_length = prefix;
                                best_candidate = pos;
                            }
                        }
                    }
                }
                surviving.push(position);
                candidate_cache.insert(probe_key.into(), surviving);

                if best_length >= minimum_backreference {
                    let offset = best_candidate as i64 - position as i64;
                    tokens.push(Token::BackRef {
                        offset: offset as i32,
                        length: best_length as u32,
                    });
                    stats.add_reference((position - best_candidate) as u32, best_length as u32);
                    position += best_length;
                } else {
                    tokens.push(Token::Literal(data[position]));
                    position += 1;
                    stats.add_literal();
                }
            }
        }
    }

    (tokens, stats)
}

/// Reconstruct the original bytes from a token stream. Back-reference
/// copies proceed one byte at a time (not a block copy), which is what
/// makes self-overlapping runs (length > |offset|) work.
pub fn decompress(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::new();
    for token in tokens {
        match *token {
            Token::Literal(byte) => out.push(byte),
            Token::BackRef { offset, length } => {
                for _ in 0..length {
                    let idx = (out.len() as i64 + offset as i64) as usize;
                    let byte = out[idx];
                    out.push(byte);
                }
            }
        }
    }
    out
}

/// Pack a token stream into the binary container described in the module
/// header.
pub fn to_binary(tokens: &[Token], params: &Params) -> Result<Vec<u8>, CodecError> {
    if tokens.len() as u64 >= (1u64 << params.size_bit_count) {
        return Err(CodecError::Overflow);
    }

    let mut bits = BitStream::new();
    bits.append(4, (params.window_bits - 3) as u128);
    bits.append(4, (params.length_bits - 1) as u128);
    bits.append(2, (params.minimum_backreference - 1) as u128);
    bits.append(params.size_bit_count, tokens.len() as u128);

    for token in tokens {
        match *token {
            Token::Literal(byte) => {
                bits.append(1, 0);
                bits.append(8, byte as u128);
            }
            Token::BackRef { offset, length } => {
                bits.append(1, 1);
                bits.append(params.window_bits, (-offset - 1) as u128);
                bits.append(
                    params.length_bits,
                    (length - params.minimum_backreference) as u128,
                );
            }
        }
    }

    Ok(bits.to_array())
}

/// Unpack a binary container produced by [`to_binary`] back into a token
/// stream. `size_bit_count` must match the value the encoder used, since it
/// is not itself carried in the header.
pub fn tokens_from_binary(
    data: Vec<u8>,
    size_bit_count: u32,
) -> Result<Vec<Token>, CodecError> {
    let mut bits = BitStream::from_array(data);

    let need = |bits: &BitStream, count: u32, what: &'static str| -> Result<(), CodecError> {
        if bits.remaining_bits() < count as usize {
            Err(CodecError::Truncated(what))
        } else {
            Ok(())
        }
    };

    need(&bits, 4, "window_bits header field")?;
    let window_bits = bits.read(4) as u32 + 3;
    need(&bits, 4, "length_bits header field")?;
    let length_bits = bits.read(4) as u32 + 1;
    need(&bits, 2, "minimum_backreference header field")?;
    let minimum_backreference = bits.read(2) as u32 + 1;

    if !(3..=16).contains(&window_bits) {
        return Err(CodecError::Malformed("decoded window_bits out of range"));
    }
    if !(1..=16).contains(&length_bits) {
        return Err(CodecError::Malformed("decoded length_bits out of range"));
    }

    need(&bits, size_bit_count, "token count header field")?;
    let token_count = bits.read(size_bit_count) as usize;

    let mut tokens = Vec::with_capacity(token_count);
    let mut decoded_len: usize = 0;
    for _ in 0..token_count {
        need(&bits, 1, "token tag bit")?;
        if bits.read(1) == 1 {
            need(&bits, window_bits, "back-reference offset")?;
            let raw_offset = bits.read(window_bits) as i64;
            need(&bits, length_bits, "back-reference length")?;
            let length = bits.read(length_bits) as u32 + minimum_backreference;
            let offset = -(raw_offset) - 1;
            if offset.unsigned_abs() as i64 > decoded_len as i64 || offset >= 0 {
                return Err(CodecError::Malformed(
                    "back-reference offset points before start of output",
                ));
            }
            decoded_len += length as usize;
            tokens.push(Token::BackRef {
                offset: offset as i32,
                length,
            });
        } else {
            need(&bits, 8, "literal byte")?;
            let byte = bits.read(8) as u8;
            decoded_len += 1;
            tokens.push(Token::Literal(byte));
        }
    }

    Ok(tokens)
}

/// Unpack a binary container produced by [`to_binary`] directly into bytes.
pub fn from_binary(data: Vec<u8>, size_bit_count: u32) -> Result<Vec<u8>, CodecError> {
    let tokens = tokens_from_binary(data, size_bit_count)?;
    Ok(decompress(&tokens))
}
