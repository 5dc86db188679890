//! Solana legacy transaction codec.
//!
//! Compiles a set of account roles and an instruction into the exact wire
//! layout the cluster expects, and decodes any legacy transaction, signed or
//! not, back into structured form. Everything is done by hand: Base58 over a
//! big integer, compact-u16 varints, and canonical account ordering, without
//! pulling in `solana-sdk`.
//!
//! The codec is synchronous and pure. Recent blockhashes and token account
//! addresses are fetched elsewhere and passed in as Base58 text. Nothing here
//! signs.

pub mod address;
pub mod amount;
pub mod base58;
pub mod compiler;
pub mod decode;
pub mod encoding;
pub mod error;
pub mod spl_token;
pub mod system;
pub mod transaction;

pub use address::{address_to_bytes, bytes_to_address, is_valid_address, validate_address};
pub use amount::{format_amount, parse_amount, MAX_DECIMALS, NATIVE_DECIMALS};
pub use base58::{bytes_to_hex, decode_base58, encode_base58, hex_to_bytes};
pub use compiler::{compile_accounts, CompiledAccounts, MessageHeader, SolAccountMeta};
pub use decode::{
    decode_transaction, decode_transaction_base58, DecodedInstruction, DecodedTransaction,
};
pub use encoding::{decode_compact_u16, encode_compact_u16};
pub use error::SolError;
pub use spl_token::{
    build_spl_transfer, derive_associated_token_address, TokenTransferRequest,
    ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use system::{build_sol_transfer, NativeTransferRequest, SYSTEM_PROGRAM_ID};
pub use transaction::{
    build_transaction, compile_message, BuiltTransaction, BuiltTransfer, CompiledInstruction,
    InstructionSpec, Message, Transaction, TransferSummary,
};
