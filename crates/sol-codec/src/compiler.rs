//! Account ordering and index remapping.
//!
//! A legacy message lists its accounts in four blocks, and the header only
//! records block sizes, so the runtime infers each account's privileges from
//! its position:
//!
//! ```text
//!   [ signer+writable | signer+readonly | writable | readonly ]
//!   |<---- num_required_signatures ---->|
//!                     |<-- ro signed -->|          |<ro uns>|
//! ```
//!
//! Getting this order wrong still produces well-formed bytes; the cluster
//! simply rejects the transaction. Within a block the caller's order is kept.

use log::debug;
use serde::Serialize;

use crate::error::SolError;

/// Account indices are single bytes on the wire.
pub const MAX_ACCOUNTS: usize = 256;

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SolAccountMeta {
    /// Signer whose balance or data changes (fee payer, sender).
    pub fn signer(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable: true,
        }
    }

    /// Signer that only authorises (e.g. a token account owner).
    pub fn readonly_signer(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable: false,
        }
    }

    pub fn writable(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: false,
        }
    }

    fn rank(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

/// The three-byte message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
    pub fn to_bytes(&self) -> [u8; 3] {
        [
            self.num_required_signatures,
            self.num_readonly_signed_accounts,
            self.num_readonly_unsigned_accounts,
        ]
    }
}

/// Output of [`compile_accounts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledAccounts {
    /// The input roles permuted into canonical order.
    pub accounts: Vec<SolAccountMeta>,
    /// `index_map[original_position] == canonical_position`.
    pub index_map: Vec<u8>,
    pub header: MessageHeader,
}

impl CompiledAccounts {
    pub fn account_keys(&self) -> Vec<[u8; 32]> {
        self.accounts.iter().map(|a| a.pubkey).collect()
    }

    /// Canonical index of the role the caller supplied at `original`.
    pub fn remap(&self, original: usize) -> Result<u8, SolError> {
        self.index_map.get(original).copied().ok_or_else(|| {
            SolError::PreconditionViolation(format!(
                "account index {original} out of range for {} accounts",
                self.index_map.len()
            ))
        })
    }
}

/// Order `roles` canonically and derive the header counts.
///
/// Pure function of its input. Each pubkey may appear at most once: merging
/// duplicate roles is not supported, and a duplicated key would otherwise be
/// emitted twice and rejected by the cluster.
pub fn compile_accounts(roles: &[SolAccountMeta]) -> Result<CompiledAccounts, SolError> {
    if roles.is_empty() {
        return Err(SolError::PreconditionViolation(
            "cannot compile an empty account list".into(),
        ));
    }
    if roles.len() > MAX_ACCOUNTS {
        return Err(SolError::PreconditionViolation(format!(
            "{} accounts exceed the limit of {MAX_ACCOUNTS}",
            roles.len()
        )));
    }
    for (i, role) in roles.iter().enumerate() {
        if roles[..i].iter().any(|earlier| earlier.pubkey == role.pubkey) {
            return Err(SolError::PreconditionViolation(format!(
                "account at position {i} repeats an earlier pubkey"
            )));
        }
    }

    // `sort_by_key` is stable, which keeps caller order inside each block.
    let mut order: Vec<usize> = (0..roles.len()).collect();
    order.sort_by_key(|&i| roles[i].rank());

    let mut index_map = vec![0u8; roles.len()];
    for (canonical, &original) in order.iter().enumerate() {
        // canonical < MAX_ACCOUNTS, checked above.
        index_map[original] = canonical as u8;
    }

    let accounts: Vec<SolAccountMeta> = order.iter().map(|&i| roles[i]).collect();

    let count = |pred: fn(&SolAccountMeta) -> bool| -> Result<u8, SolError> {
        let n = accounts.iter().filter(|a| pred(a)).count();
        u8::try_from(n).map_err(|_| {
            SolError::PreconditionViolation(format!("header count {n} does not fit in a byte"))
        })
    };

    let header = MessageHeader {
        num_required_signatures: count(|a| a.is_signer)?,
        num_readonly_signed_accounts: count(|a| a.is_signer && !a.is_writable)?,
        num_readonly_unsigned_accounts: count(|a| !a.is_signer && !a.is_writable)?,
    };

    debug!(
        "compiled {} accounts: header {:?}, index map {:?}",
        accounts.len(),
        header.to_bytes(),
        index_map
    );

    Ok(CompiledAccounts {
        accounts,
        index_map,
        header,
    })
}
