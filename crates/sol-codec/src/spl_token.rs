//! SPL Token transfers and associated token account derivation.
//!
//! Implemented without the `spl-token` or `solana-sdk` crates.

use log::debug;
use sha2::{Digest, Sha256};

use crate::address::{bytes_to_address, parse_key};
use crate::amount::{check_decimals, format_amount, parse_amount};
use crate::compiler::SolAccountMeta;
use crate::encoding::{write_u64_le, write_u8};
use crate::error::SolError;
use crate::transaction::{build_transaction, parse_blockhash, BuiltTransfer, TransferSummary};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
];

/// SPL Token `Transfer` instruction index (single byte).
pub const SPL_TRANSFER_IX_INDEX: u8 = 3;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

// ---------------------------------------------------------------------------
// SPL Token Transfer
// ---------------------------------------------------------------------------

/// Inputs for a token transfer, exactly as the user supplied them.
///
/// The token accounts are supplied by the caller (typically looked up over
/// RPC); see [`derive_associated_token_address`] for the offline derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTransferRequest {
    /// Wallet that owns `source_token_account` and signs.
    pub owner: String,
    pub source_token_account: String,
    pub destination_token_account: String,
    /// Only reported in the summary; the `Transfer` instruction does not
    /// reference the mint.
    pub mint: Option<String>,
    /// Decimal token amount, e.g. `"1.5"`.
    pub amount: String,
    pub decimals: u8,
    pub recent_blockhash: Option<String>,
}

/// `Transfer` instruction data: `[3]` + u64 LE raw amount = 9 bytes.
pub fn spl_transfer_data(amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    write_u8(&mut data, SPL_TRANSFER_IX_INDEX);
    write_u64_le(&mut data, amount);
    data
}

/// Build an unsigned SPL Token `Transfer`.
///
/// Accounts: `[owner (signer, readonly), source (writable), destination
/// (writable), token program]`. The instruction itself lists
/// `[source, destination, owner]`.
///
/// Validation order: blockhash, owner, source, destination, mint (when
/// given), decimals, amount.
pub fn build_spl_transfer(request: &TokenTransferRequest) -> Result<BuiltTransfer, SolError> {
    let blockhash = parse_blockhash(request.recent_blockhash.as_deref())?;
    let owner = parse_key("owner", &request.owner)?;
    let source = parse_key("source token account", &request.source_token_account)?;
    let destination = parse_key(
        "destination token account",
        &request.destination_token_account,
    )?;
    let mint = request
        .mint
        .as_deref()
        .map(|m| parse_key("mint", m))
        .transpose()?;
    let decimals = check_decimals(request.decimals)?;
    let amount = parse_amount(&request.amount, decimals)?;

    let roles = [
        SolAccountMeta::readonly_signer(owner),
        SolAccountMeta::writable(source),
        SolAccountMeta::writable(destination),
        SolAccountMeta::readonly(TOKEN_PROGRAM_ID),
    ];
    let built = build_transaction(&roles, 3, &[1, 2, 0], &spl_transfer_data(amount), &blockhash)?;

    debug!(
        "spl transfer of {amount} base units ({decimals} decimals), {} bytes",
        built.size()
    );

    let summary = TransferSummary {
        kind: "SPL Token Transfer".into(),
        from: bytes_to_address(&owner),
        to: bytes_to_address(&destination),
        source_token_account: Some(bytes_to_address(&source)),
        mint: mint.as_ref().map(bytes_to_address),
        amount: format_amount(amount, decimals),
        base_units: amount,
        decimals,
        size: built.size(),
    };

    Ok(BuiltTransfer { built, summary })
}

// ---------------------------------------------------------------------------
// Associated Token Account (PDA) derivation
// ---------------------------------------------------------------------------

/// Derive the associated token account address for a wallet + mint pair.
///
/// The ATA is a Program Derived Address with seeds
/// `[wallet, token_program_id, mint]` under the Associated Token Account
/// program.
pub fn derive_associated_token_address(
    wallet: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], SolError> {
    find_program_address(
        &[wallet.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Search bump seeds from 255 down to 0 for a digest that is NOT a valid
/// Ed25519 point.
fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), SolError> {
    for bump in (0u8..=255).rev() {
        if let Some(address) = try_create_program_address(seeds, &[bump], program_id) {
            return Ok((address, bump));
        }
    }

    Err(SolError::InvalidAddress(
        "could not find valid PDA bump seed".into(),
    ))
}

/// `SHA-256(seeds || bump || program_id || "ProgramDerivedAddress")`, or
/// `None` when the digest lands on the curve.
fn try_create_program_address(
    seeds: &[&[u8]],
    bump_seed: &[u8],
    program_id: &[u8; 32],
) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump_seed);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(hash)
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
