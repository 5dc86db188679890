//! Fixed-width little-endian integers and Solana's compact-u16.
//!
//! Compact-u16 is a LEB128-style varint: seven value bits per byte, high bit
//! set on every byte except the last.
//!
//! ```text
//!   0x00..=0x7f        -> 1 byte
//!   0x80..=0x3fff      -> 2 bytes
//!   0x4000..           -> 3+ bytes
//! ```
//!
//! No width cap is applied here. Every count in a legacy message is far below
//! the 16-bit range in practice, but nothing truncates a value to 16 bits.

use crate::error::SolError;

pub fn write_u8(buf: &mut Vec<u8>, value: u8) {
    buf.push(value);
}

pub fn write_u32_le(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_u64_le(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Encode `value` in compact-u16 form.
pub fn encode_compact_u16(value: usize) -> Vec<u8> {
    let mut val = value;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Append the compact-u16 form of `value` to `buf`.
pub fn write_compact_u16(buf: &mut Vec<u8>, value: usize) {
    buf.extend_from_slice(&encode_compact_u16(value));
}

/// Decode a compact-u16 value from the front of `data`.
///
/// Returns `(value, bytes_consumed)`. Fails when the input ends before a byte
/// with the continuation bit clear, or when the value no longer fits in a
/// `usize`. The error offset is relative to the start of `data`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(usize, usize), SolError> {
    let mut value: usize = 0;
    let mut shift = 0u32;

    for (consumed, &byte) in data.iter().enumerate() {
        let bits = (byte & 0x7f) as usize;
        if shift >= usize::BITS || (bits << shift) >> shift != bits {
            return Err(SolError::malformed(consumed, "compact-u16 value overflows"));
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok((value, consumed + 1));
        }
        shift += 7;
    }

    Err(SolError::malformed(
        data.len(),
        "unexpected end of data while decoding compact-u16",
    ))
}

pub fn read_u32_le(data: &[u8]) -> Option<u32> {
    Some(u32::from_le_bytes(data.get(..4)?.try_into().ok()?))
}

pub fn read_u64_le(data: &[u8]) -> Option<u64> {
    Some(u64::from_le_bytes(data.get(..8)?.try_into().ok()?))
}
