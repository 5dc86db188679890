//! Solana address parsing and validation.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte key. There is no
//! checksum and no hashing step; the only structural rule is that the text
//! decodes to exactly 32 bytes.

use crate::base58::{decode_base58, encode_base58};
use crate::error::SolError;

/// Length in bytes of a public key, program id or blockhash.
pub const KEY_LEN: usize = 32;

/// Decode a Solana address string to its 32-byte representation.
///
/// Surrounding whitespace is ignored. Any alphabet violation or wrong decoded
/// length is reported as [`SolError::InvalidAddress`].
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = decode_base58(address.trim())
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected {KEY_LEN} bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Like [`address_to_bytes`], but names the offending field in the error.
pub fn parse_key(field: &str, address: &str) -> Result<[u8; 32], SolError> {
    address_to_bytes(address).map_err(|e| match e {
        SolError::InvalidAddress(reason) => SolError::InvalidAddress(format!("{field}: {reason}")),
        other => other,
    })
}

/// Encode 32 bytes as a Solana address (Base58 string).
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    encode_base58(bytes)
}

/// Validate a Solana address string.
///
/// Returns `Ok(true)` if valid, or an error describing why it is not.
pub fn validate_address(address: &str) -> Result<bool, SolError> {
    address_to_bytes(address).map(|_| true)
}

/// `true` when `address` is a well-formed 32-byte Base58 key.
pub fn is_valid_address(address: &str) -> bool {
    address_to_bytes(address).is_ok()
}
