//! Base58 and hex text encodings.
//!
//! Base58 treats the input as one big-endian unsigned integer and re-expresses
//! it in radix 58. Keys and blockhashes are 32 bytes and whole transactions are
//! hundreds, far past any native integer width, so the arithmetic is done on
//! a [`BigUint`]. Leading zero bytes carry no magnitude and are represented
//! one-for-one by the zero symbol `'1'`.

use num_bigint::BigUint;

use crate::error::SolError;

/// The Bitcoin/Solana Base58 alphabet (no `0`, `O`, `I` or `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const ZERO_SYMBOL: char = '1';

/// Reverse lookup: ASCII byte -> alphabet index, or 0xff when not in the alphabet.
const DECODE_TABLE: [u8; 128] = {
    let mut table = [0xffu8; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode raw bytes as Base58 text.
pub fn encode_base58(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let rest = &bytes[zeros..];

    let mut out = String::with_capacity(bytes.len() * 138 / 100 + 1);
    out.extend(std::iter::repeat(ZERO_SYMBOL).take(zeros));

    // `rest` starts with a non-zero byte, so its magnitude is non-zero and
    // `to_radix_be` yields no leading zero digits.
    if !rest.is_empty() {
        let digits = BigUint::from_bytes_be(rest).to_radix_be(58);
        out.extend(digits.into_iter().map(|d| ALPHABET[d as usize] as char));
    }

    out
}

/// Decode Base58 text to raw bytes.
///
/// Fails with [`SolError::InvalidCharacter`] on the first character that is
/// not in [`ALPHABET`].
pub fn decode_base58(text: &str) -> Result<Vec<u8>, SolError> {
    let zeros = text.chars().take_while(|&c| c == ZERO_SYMBOL).count();

    let mut value = BigUint::default();
    let mut has_digits = false;
    for (position, character) in text.char_indices().skip(zeros) {
        let digit = alphabet_index(character).ok_or(SolError::InvalidCharacter {
            character,
            position,
        })?;
        value = value * 58u32 + u32::from(digit);
        has_digits = true;
    }

    let mut out = vec![0u8; zeros];
    // The first non-'1' symbol has a non-zero index, so `value` is non-zero
    // here and `to_bytes_be` is minimal.
    if has_digits {
        out.extend_from_slice(&value.to_bytes_be());
    }

    Ok(out)
}

fn alphabet_index(c: char) -> Option<u8> {
    let code = c as u32;
    if code >= 128 {
        return None;
    }
    match DECODE_TABLE[code as usize] {
        0xff => None,
        index => Some(index),
    }
}

/// Lower-case hex, two digits per byte.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parse hex text (optionally `0x`-prefixed, surrounding whitespace ignored).
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>, SolError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| SolError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -- encode -------------------------------------------------------------

    #[test]
    fn encode_empty_is_empty() {
        assert_eq!(encode_base58(&[]), "");
    }

    #[test]
    fn encode_leading_zeros_become_ones() {
        assert_eq!(encode_base58(&[0]), "1");
        assert_eq!(encode_base58(&[0, 0, 0]), "111");
        assert_eq!(encode_base58(&[0u8; 32]), "11111111111111111111111111111111");
    }

    #[test]
    fn encode_small_values() {
        assert_eq!(encode_base58(&[57]), "z");
        assert_eq!(encode_base58(&[58]), "21");
        assert_eq!(encode_base58(&[0, 1]), "12");
    }

    #[test]
    fn encode_text_vector() {
        // Widely published test vector.
        assert_eq!(encode_base58(b"Hello World!"), "2NEpo7TZRRrLZSi2U");
    }

    #[test]
    fn encode_system_program_plus_one() {
        let mut key = [0u8; 32];
        key[31] = 1;
        assert_eq!(encode_base58(&key), "11111111111111111111111111111112");
    }

    // -- decode -------------------------------------------------------------

    #[test]
    fn decode_empty_is_empty() {
        assert_eq!(decode_base58("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_only_zero_symbols() {
        assert_eq!(decode_base58("1111").unwrap(), vec![0u8; 4]);
    }

    #[test]
    fn decode_text_vector() {
        assert_eq!(decode_base58("2NEpo7TZRRrLZSi2U").unwrap(), b"Hello World!");
    }

    #[test]
    fn decode_rejects_zero_digit() {
        let err = decode_base58("abc0def").unwrap_err();
        assert_eq!(
            err,
            SolError::InvalidCharacter {
                character: '0',
                position: 3
            }
        );
    }

    #[test]
    fn decode_rejects_ambiguous_letters() {
        for bad in ["O", "I", "l", "+", " "] {
            assert!(
                matches!(decode_base58(bad), Err(SolError::InvalidCharacter { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn decode_rejects_non_ascii() {
        assert!(matches!(
            decode_base58("11é"),
            Err(SolError::InvalidCharacter { character: 'é', .. })
        ));
    }

    #[test]
    fn token_program_id_decodes_to_32_bytes() {
        let bytes = decode_base58("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[0], 0x06);
        assert_eq!(bytes[31], 0xa9);
    }

    // -- agreement with the bs58 crate ----------------------------------------

    #[test]
    fn matches_bs58_on_random_keys() {
        use rand::RngCore;

        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let mut key = [0u8; 32];
            rng.fill_bytes(&mut key);
            key[0] = 0;
            let ours = encode_base58(&key);
            assert_eq!(ours, bs58::encode(&key).into_string());
            assert_eq!(decode_base58(&ours).unwrap(), key);
        }
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..300)) {
            prop_assert_eq!(decode_base58(&encode_base58(&bytes)).unwrap(), bytes);
        }

        #[test]
        fn roundtrip_zero_runs(zeros in 0usize..40, tail in proptest::collection::vec(any::<u8>(), 0..8)) {
            let mut bytes = vec![0u8; zeros];
            bytes.extend(tail);
            prop_assert_eq!(decode_base58(&encode_base58(&bytes)).unwrap(), bytes);
        }
    }

    // -- hex ----------------------------------------------------------------

    #[test]
    fn hex_encoding_is_lowercase() {
        assert_eq!(bytes_to_hex(&[0x02, 0x00, 0xab, 0xff]), "0200abff");
    }

    #[test]
    fn hex_parsing_accepts_prefix_and_whitespace() {
        assert_eq!(hex_to_bytes(" 0x0aFF \n").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(hex_to_bytes("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn hex_parsing_rejects_garbage() {
        assert!(matches!(hex_to_bytes("abc"), Err(SolError::InvalidHex(_))));
        assert!(matches!(hex_to_bytes("zz"), Err(SolError::InvalidHex(_))));
    }
}
