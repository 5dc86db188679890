//! Native SOL transfers through the System Program.

use log::debug;

use crate::address::{bytes_to_address, parse_key};
use crate::amount::{format_amount, parse_amount, NATIVE_DECIMALS};
use crate::compiler::SolAccountMeta;
use crate::encoding::{write_u32_le, write_u64_le};
use crate::error::SolError;
use crate::transaction::{build_transaction, parse_blockhash, BuiltTransfer, TransferSummary};

/// The Solana System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program `Transfer` instruction index (little-endian u32).
pub const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

/// Inputs for a native transfer, exactly as the user supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeTransferRequest {
    pub from: String,
    pub to: String,
    /// Decimal SOL, e.g. `"0.01"`.
    pub amount: String,
    /// Base58 recent blockhash; `None` until one has been fetched.
    pub recent_blockhash: Option<String>,
}

/// `Transfer` instruction data: u32 LE index (2) + u64 LE lamports = 12 bytes.
pub fn system_transfer_data(lamports: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(12);
    write_u32_le(&mut data, SYSTEM_TRANSFER_IX_INDEX);
    write_u64_le(&mut data, lamports);
    data
}

/// Build an unsigned native SOL transfer.
///
/// Accounts: `[from (signer, writable), to (writable), system program]`; the
/// instruction references `[from, to]`. Inputs are validated in the order
/// blockhash, sender, recipient, amount, and the first failure is returned.
pub fn build_sol_transfer(request: &NativeTransferRequest) -> Result<BuiltTransfer, SolError> {
    let blockhash = parse_blockhash(request.recent_blockhash.as_deref())?;
    let from = parse_key("from", &request.from)?;
    let to = parse_key("to", &request.to)?;
    let lamports = parse_amount(&request.amount, NATIVE_DECIMALS)?;

    let roles = [
        SolAccountMeta::signer(from),
        SolAccountMeta::writable(to),
        SolAccountMeta::readonly(SYSTEM_PROGRAM_ID),
    ];
    let built = build_transaction(&roles, 2, &[0, 1], &system_transfer_data(lamports), &blockhash)?;

    debug!("sol transfer of {lamports} lamports, {} bytes", built.size());

    let summary = TransferSummary {
        kind: "SOL Transfer".into(),
        from: bytes_to_address(&from),
        to: bytes_to_address(&to),
        source_token_account: None,
        mint: None,
        amount: format_amount(lamports, NATIVE_DECIMALS),
        base_units: lamports,
        decimals: NATIVE_DECIMALS,
        size: built.size(),
    };

    Ok(BuiltTransfer { built, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base58::encode_base58;
    use crate::encoding::{read_u32_le, read_u64_le};

    fn addr(b: u8) -> String {
        encode_base58(&[b; 32])
    }

    fn request(amount: &str) -> NativeTransferRequest {
        NativeTransferRequest {
            from: addr(1),
            to: addr(2),
            amount: amount.into(),
            recent_blockhash: Some(addr(0xCC)),
        }
    }

    // -- instruction data -----------------------------------------------------

    #[test]
    fn transfer_data_is_12_bytes() {
        let data = system_transfer_data(1_000_000);
        assert_eq!(data.len(), 12);
        assert_eq!(&data[..4], &[2, 0, 0, 0]);
        assert_eq!(&data[4..], &1_000_000u64.to_le_bytes());
    }

    // -- building -------------------------------------------------------------

    #[test]
    fn accounts_and_header() {
        let out = build_sol_transfer(&request("0.5")).unwrap();
        let msg = &out.built.transaction.message;

        assert_eq!(msg.account_keys, vec![[1u8; 32], [2u8; 32], SYSTEM_PROGRAM_ID]);
        assert_eq!(msg.header.to_bytes(), [1, 0, 1]);
        assert_eq!(msg.recent_blockhash, [0xCC; 32]);

        let ix = &msg.instructions[0];
        assert_eq!(ix.program_id_index, 2);
        assert_eq!(ix.account_indices, vec![0, 1]);
        assert_eq!(read_u32_le(&ix.data), Some(2));
        assert_eq!(read_u64_le(&ix.data[4..]), Some(500_000_000));
    }

    #[test]
    fn summary_describes_the_transfer() {
        let out = build_sol_transfer(&request("0.01")).unwrap();
        assert_eq!(out.summary.kind, "SOL Transfer");
        assert_eq!(out.summary.amount, "0.01");
        assert_eq!(out.summary.base_units, 10_000_000);
        assert_eq!(out.summary.from, addr(1));
        assert_eq!(out.summary.to, addr(2));
        // 1 + 64 + 3 + 1 + 96 + 32 + 1 + (1 + 1 + 2 + 1 + 12)
        assert_eq!(out.summary.size, 215);
        assert_eq!(out.built.size(), 215);
    }

    // -- validation -----------------------------------------------------------

    #[test]
    fn missing_blockhash_comes_first() {
        let req = NativeTransferRequest {
            from: "bad".into(),
            to: "bad".into(),
            amount: "x".into(),
            recent_blockhash: None,
        };
        assert_eq!(build_sol_transfer(&req).unwrap_err(), SolError::MissingBlockhash);
    }

    #[test]
    fn invalid_sender() {
        let mut req = request("1");
        req.from = "not base58 0OIl".into();
        let err = build_sol_transfer(&req).unwrap_err();
        assert!(err.to_string().starts_with("invalid address: from:"));
    }

    #[test]
    fn thirty_one_byte_recipient() {
        let mut req = request("1");
        req.to = encode_base58(&[9u8; 31]);
        assert_eq!(
            build_sol_transfer(&req).unwrap_err(),
            SolError::InvalidAddress("to: expected 32 bytes, got 31".into())
        );
    }

    #[test]
    fn invalid_amounts() {
        for bad in ["", "abc", "0", "-1", "0.0000000001"] {
            assert!(
                matches!(
                    build_sol_transfer(&request(bad)),
                    Err(SolError::InvalidAmount(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn self_transfer_is_rejected() {
        let mut req = request("1");
        req.to = req.from.clone();
        assert!(matches!(
            build_sol_transfer(&req),
            Err(SolError::PreconditionViolation(_))
        ));
    }
}
