use thiserror::Error;

/// Errors produced while building or decoding Solana transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid base58 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid decimals: {0} (expected 0..=18)")]
    InvalidDecimals(u8),

    #[error("missing recent blockhash")]
    MissingBlockhash,

    #[error("malformed transaction at byte {offset}: {reason}")]
    MalformedTransaction { offset: usize, reason: String },

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl SolError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        SolError::MalformedTransaction {
            offset,
            reason: reason.into(),
        }
    }
}
