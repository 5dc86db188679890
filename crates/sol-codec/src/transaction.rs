//! Legacy Solana message and transaction wire format.
//!
//! Transactions are built by hand, with no `solana-sdk` dependency:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! Nothing here signs. An unsigned transaction carries one zero-filled
//! signature slot per required signer; callers that already hold signatures
//! can supply them instead.

use log::debug;
use serde::Serialize;

use crate::address::parse_key;
use crate::base58::encode_base58;
use crate::compiler::{compile_accounts, MessageHeader, SolAccountMeta};
use crate::encoding::{write_compact_u16, write_u8};
use crate::error::SolError;

pub const SIGNATURE_LEN: usize = 64;

/// An instruction whose indices still refer to positions in the caller's
/// account role list, before canonical reordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSpec {
    pub program_id_index: usize,
    pub account_indices: Vec<usize>,
    pub data: Vec<u8>,
}

/// An instruction where account references are indices into the message's
/// canonical `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    /// Canonically ordered; see [`crate::compiler`].
    pub account_keys: Vec<[u8; 32]>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Serialize the message (the bytes a signer signs).
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.extend_from_slice(&self.header.to_bytes());

        write_compact_u16(&mut buf, self.account_keys.len());
        for key in &self.account_keys {
            buf.extend_from_slice(key);
        }

        buf.extend_from_slice(&self.recent_blockhash);

        write_compact_u16(&mut buf, self.instructions.len());
        for ix in &self.instructions {
            write_u8(&mut buf, ix.program_id_index);

            write_compact_u16(&mut buf, ix.account_indices.len());
            buf.extend_from_slice(&ix.account_indices);

            write_compact_u16(&mut buf, ix.data.len());
            buf.extend_from_slice(&ix.data);
        }

        buf
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; SIGNATURE_LEN]>,
    pub message: Message,
}

impl Transaction {
    /// Wrap `message` with zero-filled signature slots.
    pub fn unsigned(message: Message) -> Self {
        let slots = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![[0u8; SIGNATURE_LEN]; slots],
            message,
        }
    }

    /// Wrap `message` with caller-provided signatures, one per required signer
    /// in account order.
    pub fn with_signatures(
        message: Message,
        signatures: Vec<[u8; SIGNATURE_LEN]>,
    ) -> Result<Self, SolError> {
        let required = message.header.num_required_signatures as usize;
        if signatures.len() != required {
            return Err(SolError::PreconditionViolation(format!(
                "message requires {required} signatures, got {}",
                signatures.len()
            )));
        }
        Ok(Self {
            signatures,
            message,
        })
    }

    /// Serialize into wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let message = self.message.serialize();
        let mut wire = Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_LEN + message.len());

        write_compact_u16(&mut wire, self.signatures.len());
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message);

        wire
    }

    pub fn to_base58(&self) -> String {
        encode_base58(&self.serialize())
    }
}

/// Everything a build produces, ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub transaction: Transaction,
    pub message_bytes: Vec<u8>,
    pub transaction_bytes: Vec<u8>,
    pub base58: String,
}

impl BuiltTransaction {
    pub fn size(&self) -> usize {
        self.transaction_bytes.len()
    }
}

/// Human-oriented description of a built transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    #[serde(rename = "type")]
    pub kind: String,
    /// Sender wallet (the token owner for token transfers).
    pub from: String,
    /// Recipient wallet, or the destination token account.
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_token_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    /// Amount in display units, e.g. `"0.01"`.
    pub amount: String,
    pub base_units: u64,
    pub decimals: u8,
    /// Serialized transaction size in bytes.
    pub size: usize,
}

/// A built transfer together with its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransfer {
    pub built: BuiltTransaction,
    pub summary: TransferSummary,
}

/// Decode a caller-supplied recent blockhash.
///
/// `None` or blank text means the blockhash has not been fetched yet.
pub fn parse_blockhash(recent_blockhash: Option<&str>) -> Result<[u8; 32], SolError> {
    match recent_blockhash.map(str::trim) {
        None | Some("") => Err(SolError::MissingBlockhash),
        Some(text) => parse_key("recent blockhash", text),
    }
}

/// Compile a message from one role list and an ordered list of instructions.
///
/// Every index in `instructions` refers to a position in `roles`; they are
/// remapped to canonical positions here.
pub fn compile_message(
    roles: &[SolAccountMeta],
    instructions: &[InstructionSpec],
    recent_blockhash: &[u8; 32],
) -> Result<Message, SolError> {
    let compiled = compile_accounts(roles)?;

    let mut compiled_instructions = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = compiled.remap(ix.program_id_index)?;
        let account_indices = ix
            .account_indices
            .iter()
            .map(|&i| compiled.remap(i))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled_instructions.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Message {
        header: compiled.header,
        account_keys: compiled.account_keys(),
        recent_blockhash: *recent_blockhash,
        instructions: compiled_instructions,
    })
}

/// Build an unsigned single-instruction transaction.
///
/// `program_id_index` and `account_indices` are positions in `roles`.
/// Deterministic: identical inputs always give identical bytes.
pub fn build_transaction(
    roles: &[SolAccountMeta],
    program_id_index: usize,
    account_indices: &[usize],
    data: &[u8],
    recent_blockhash: &[u8; 32],
) -> Result<BuiltTransaction, SolError> {
    let instruction = InstructionSpec {
        program_id_index,
        account_indices: account_indices.to_vec(),
        data: data.to_vec(),
    };
    let message = compile_message(roles, &[instruction], recent_blockhash)?;
    Ok(finish(Transaction::unsigned(message)))
}

/// Serialize an assembled transaction into every export form.
pub fn finish(transaction: Transaction) -> BuiltTransaction {
    let message_bytes = transaction.message.serialize();
    let transaction_bytes = transaction.serialize();
    let base58 = encode_base58(&transaction_bytes);

    debug!(
        "built transaction: {} signature slot(s), message {} bytes, total {} bytes",
        transaction.signatures.len(),
        message_bytes.len(),
        transaction_bytes.len()
    );

    BuiltTransaction {
        transaction,
        message_bytes,
        transaction_bytes,
        base58,
    }
}
