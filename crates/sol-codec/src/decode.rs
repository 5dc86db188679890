//! Structural decoding of legacy wire-format transactions.
//!
//! The decoder knows nothing about the programs involved; it reports what the
//! bytes say, for any number of instructions and whether or not the
//! signature slots are filled. It fails only when the layout is impossible
//! (truncation, an index past the account list, trailing garbage), and every
//! failure carries the absolute byte offset where parsing broke.

use log::trace;
use serde::Serialize;

use crate::base58::{bytes_to_hex, decode_base58, encode_base58};
use crate::compiler::MessageHeader;
use crate::encoding::decode_compact_u16;
use crate::error::SolError;
use crate::transaction::SIGNATURE_LEN;

/// A decoded transaction, shaped for direct JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTransaction {
    pub total_size: usize,
    pub signature_count: usize,
    /// Base58 signatures; an all-zero slot shows up as a run of `1`s.
    pub signatures: Vec<String>,
    pub header: MessageHeader,
    pub accounts: Vec<String>,
    pub recent_blockhash: String,
    pub instructions: Vec<DecodedInstruction>,
}

impl DecodedTransaction {
    /// `true` when at least one signature slot is non-zero.
    pub fn has_signatures(&self) -> bool {
        self.signatures
            .iter()
            .any(|s| s.chars().any(|c| c != '1'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedInstruction {
    pub program_id_index: u8,
    pub program_id: String,
    pub account_indices: Vec<u8>,
    pub accounts: Vec<String>,
    /// Instruction data, lower-case hex.
    pub data: String,
}

/// Bounds-checked cursor over the transaction bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn read_byte(&mut self, what: &str) -> Result<u8, SolError> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or_else(|| SolError::malformed(self.offset, format!("truncated {what}")))?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_slice(&mut self, len: usize, what: &str) -> Result<&'a [u8], SolError> {
        if len > self.remaining() {
            return Err(SolError::malformed(
                self.offset,
                format!(
                    "truncated {what}: need {len} bytes, {} remaining",
                    self.remaining()
                ),
            ));
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_key(&mut self, what: &str) -> Result<&'a [u8], SolError> {
        self.read_slice(32, what)
    }

    fn read_compact_u16(&mut self, what: &str) -> Result<usize, SolError> {
        let start = self.offset;
        let (value, consumed) = decode_compact_u16(&self.bytes[start..]).map_err(|e| match e {
            SolError::MalformedTransaction { offset, reason } => {
                SolError::malformed(start + offset, format!("{what}: {reason}"))
            }
            other => other,
        })?;
        self.offset += consumed;
        trace!("{what} = {value} at byte {start}");
        Ok(value)
    }

    /// Read a length prefix and reject it early when it cannot possibly fit,
    /// so a corrupt count never drives a huge allocation.
    fn read_count(&mut self, item_len: usize, what: &str) -> Result<usize, SolError> {
        let start = self.offset;
        let count = self.read_compact_u16(what)?;
        match count.checked_mul(item_len) {
            Some(total) if total <= self.remaining() => Ok(count),
            _ => Err(SolError::malformed(
                start,
                format!(
                    "{what} {count} exceeds the {} bytes remaining",
                    self.remaining()
                ),
            )),
        }
    }
}

/// Decode Base58 transaction text.
pub fn decode_transaction_base58(text: &str) -> Result<DecodedTransaction, SolError> {
    let bytes = decode_base58(text.trim())?;
    decode_transaction(&bytes)
}

/// Decode raw wire-format transaction bytes.
pub fn decode_transaction(bytes: &[u8]) -> Result<DecodedTransaction, SolError> {
    let mut r = Reader::new(bytes);

    let signature_count = r.read_count(SIGNATURE_LEN, "signature count")?;
    let mut signatures = Vec::with_capacity(signature_count);
    for _ in 0..signature_count {
        signatures.push(encode_base58(r.read_slice(SIGNATURE_LEN, "signature")?));
    }

    let header = MessageHeader {
        num_required_signatures: r.read_byte("message header")?,
        num_readonly_signed_accounts: r.read_byte("message header")?,
        num_readonly_unsigned_accounts: r.read_byte("message header")?,
    };

    let account_count = r.read_count(32, "account count")?;
    let mut accounts = Vec::with_capacity(account_count);
    for _ in 0..account_count {
        accounts.push(encode_base58(r.read_key("account key")?));
    }

    let recent_blockhash = encode_base58(r.read_key("recent blockhash")?);

    // Each instruction needs at least three bytes.
    let instruction_count = r.read_count(3, "instruction count")?;
    let mut instructions = Vec::with_capacity(instruction_count);
    for i in 0..instruction_count {
        let at = r.offset;
        let program_id_index = r.read_byte("program id index")?;
        let program_id = resolve(&accounts, program_id_index, at, i)?;

        let index_count = r.read_count(1, "instruction account count")?;
        let indices_at = r.offset;
        let account_indices = r.read_slice(index_count, "instruction account indices")?.to_vec();
        let resolved = account_indices
            .iter()
            .enumerate()
            .map(|(n, &idx)| resolve(&accounts, idx, indices_at + n, i))
            .collect::<Result<Vec<String>, SolError>>()?;

        let data_len = r.read_count(1, "instruction data length")?;
        let data = r.read_slice(data_len, "instruction data")?;

        instructions.push(DecodedInstruction {
            program_id_index,
            program_id,
            account_indices,
            accounts: resolved,
            data: bytes_to_hex(data),
        });
    }

    if r.remaining() > 0 {
        return Err(SolError::malformed(
            r.offset,
            format!("{} trailing bytes after the last instruction", r.remaining()),
        ));
    }

    Ok(DecodedTransaction {
        total_size: bytes.len(),
        signature_count,
        signatures,
        header,
        accounts,
        recent_blockhash,
        instructions,
    })
}

fn resolve(
    accounts: &[String],
    index: u8,
    offset: usize,
    instruction: usize,
) -> Result<String, SolError> {
    accounts.get(index as usize).cloned().ok_or_else(|| {
        SolError::malformed(
            offset,
            format!(
                "instruction {instruction} references account {index}, but only {} accounts exist",
                accounts.len()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::SolAccountMeta;
    use crate::transaction::{build_transaction, compile_message, finish, InstructionSpec, Transaction};

    fn key(b: u8) -> [u8; 32] {
        [b; 32]
    }

    fn sample() -> Vec<u8> {
        let roles = [
            SolAccountMeta::signer(key(1)),
            SolAccountMeta::writable(key(2)),
            SolAccountMeta::readonly([0u8; 32]),
        ];
        build_transaction(&roles, 2, &[0, 1], &[2, 0, 0, 0, 9, 0, 0, 0, 0, 0, 0, 0], &key(0xCC))
            .unwrap()
            .transaction_bytes
    }

    #[test]
    fn decodes_every_field() {
        let bytes = sample();
        let decoded = decode_transaction(&bytes).unwrap();

        assert_eq!(decoded.total_size, bytes.len());
        assert_eq!(decoded.signature_count, 1);
        assert_eq!(decoded.signatures, vec!["1".repeat(64)]);
        assert!(!decoded.has_signatures());
        assert_eq!(decoded.header.num_required_signatures, 1);
        assert_eq!(decoded.header.num_readonly_signed_accounts, 0);
        assert_eq!(decoded.header.num_readonly_unsigned_accounts, 1);
        assert_eq!(
            decoded.accounts,
            vec![
                encode_base58(&key(1)),
                encode_base58(&key(2)),
                "11111111111111111111111111111111".to_string(),
            ]
        );
        assert_eq!(decoded.recent_blockhash, encode_base58(&key(0xCC)));

        let ix = &decoded.instructions[0];
        assert_eq!(ix.program_id_index, 2);
        assert_eq!(ix.program_id, "11111111111111111111111111111111");
        assert_eq!(ix.account_indices, vec![0, 1]);
        assert_eq!(ix.accounts, vec![encode_base58(&key(1)), encode_base58(&key(2))]);
        assert_eq!(ix.data, "020000000900000000000000");
    }

    #[test]
    fn decodes_base58_text() {
        let bytes = sample();
        let text = format!("  {}\n", encode_base58(&bytes));
        assert_eq!(
            decode_transaction_base58(&text).unwrap(),
            decode_transaction(&bytes).unwrap()
        );
    }

    #[test]
    fn decodes_many_instructions() {
        let roles = [
            SolAccountMeta::signer(key(1)),
            SolAccountMeta::writable(key(2)),
            SolAccountMeta::readonly(key(3)),
        ];
        let instructions: Vec<InstructionSpec> = (0..5u8)
            .map(|n| InstructionSpec {
                program_id_index: 2,
                account_indices: vec![1],
                data: vec![n; n as usize],
            })
            .collect();
        let msg = compile_message(&roles, &instructions, &key(7)).unwrap();
        let built = finish(Transaction::unsigned(msg));

        let decoded = decode_transaction(&built.transaction_bytes).unwrap();
        assert_eq!(decoded.instructions.len(), 5);
        assert_eq!(decoded.instructions[0].data, "");
        assert_eq!(decoded.instructions[3].data, "030303");
    }

    #[test]
    fn unknown_program_is_not_an_error() {
        let roles = [SolAccountMeta::signer(key(1)), SolAccountMeta::readonly(key(0xEE))];
        let bytes = build_transaction(&roles, 1, &[], &[0xFF], &key(2))
            .unwrap()
            .transaction_bytes;
        let decoded = decode_transaction(&bytes).unwrap();
        assert_eq!(decoded.instructions[0].program_id, encode_base58(&key(0xEE)));
        assert!(decoded.instructions[0].accounts.is_empty());
    }

    // -- malformed input ----------------------------------------------------

    #[test]
    fn truncated_by_ten_bytes_fails() {
        let bytes = sample();
        let cut = &bytes[..bytes.len() - 10];
        let err = decode_transaction(cut).unwrap_err();
        assert!(matches!(err, SolError::MalformedTransaction { .. }));
    }

    #[test]
    fn truncation_anywhere_fails() {
        let bytes = sample();
        for len in 0..bytes.len() {
            assert!(
                decode_transaction(&bytes[..len]).is_err(),
                "prefix of {len} bytes decoded"
            );
        }
    }

    #[test]
    fn empty_input_fails_at_zero() {
        assert!(matches!(
            decode_transaction(&[]),
            Err(SolError::MalformedTransaction { offset: 0, .. })
        ));
    }

    #[test]
    fn truncated_account_keys_report_their_offset() {
        let bytes = sample();
        // sig count (1) + sig (64) + header (3) + account count (1) = 69.
        let err = decode_transaction(&bytes[..69 + 40]).unwrap_err();
        assert!(matches!(
            err,
            SolError::MalformedTransaction { offset: 68, .. }
        ));
    }

    #[test]
    fn program_index_out_of_range_fails() {
        let mut bytes = sample();
        // 69 + 3 keys + blockhash + instruction count
        let program_index_at = 69 + 3 * 32 + 32 + 1;
        bytes[program_index_at] = 3;
        let err = decode_transaction(&bytes).unwrap_err();
        assert_eq!(
            err,
            SolError::malformed(
                program_index_at,
                "instruction 0 references account 3, but only 3 accounts exist"
            )
        );
    }

    #[test]
    fn account_index_out_of_range_fails() {
        let mut bytes = sample();
        let first_index_at = 69 + 3 * 32 + 32 + 1 + 2;
        bytes[first_index_at] = 200;
        let err = decode_transaction(&bytes).unwrap_err();
        assert!(matches!(
            err,
            SolError::MalformedTransaction { offset, .. } if offset == first_index_at
        ));
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut bytes = sample();
        let end = bytes.len();
        bytes.push(0);
        assert_eq!(
            decode_transaction(&bytes).unwrap_err(),
            SolError::malformed(end, "1 trailing bytes after the last instruction")
        );
    }

    #[test]
    fn absurd_signature_count_fails_without_allocating() {
        // compact-u16 for 2^20 signatures, nothing else.
        let err = decode_transaction(&[0x80, 0x80, 0x40]).unwrap_err();
        assert!(matches!(
            err,
            SolError::MalformedTransaction { offset: 0, .. }
        ));
    }

    #[test]
    fn invalid_base58_text_fails() {
        assert!(matches!(
            decode_transaction_base58("0abc"),
            Err(SolError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let decoded = decode_transaction(&sample()).unwrap();
        let json = serde_json::to_value(&decoded).unwrap();
        assert_eq!(json["signatureCount"], 1);
        assert_eq!(json["header"]["numReadonlyUnsignedAccounts"], 1);
        assert_eq!(json["instructions"][0]["programIdIndex"], 2);
        assert_eq!(json["recentBlockhash"], encode_base58(&key(0xCC)));
    }
}
