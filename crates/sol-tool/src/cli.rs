//! Command-line definitions.

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "soltx",
    version,
    about = "Build and decode Solana legacy transactions offline"
)]
pub struct Cli {
    /// Output format
    #[arg(
        long,
        short,
        value_enum,
        global = true,
        env = "SOLTX_OUTPUT",
        default_value_t = OutputFormat::Pretty
    )]
    pub output: OutputFormat,

    /// Log filter, e.g. `debug` or `sol_codec=trace` (falls back to RUST_LOG)
    #[arg(long, global = true, env = "SOLTX_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Build an unsigned native SOL transfer
    Transfer {
        /// Sender address (signer, pays the fee)
        #[arg(long)]
        from: String,
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in SOL, e.g. 0.01
        #[arg(long)]
        amount: String,
        /// Recent blockhash (Base58), fetched from an RPC node
        #[arg(long, env = "SOLTX_BLOCKHASH")]
        blockhash: Option<String>,
    },
    /// Build an unsigned SPL token transfer between two token accounts
    TokenTransfer {
        /// Wallet that owns the source token account (signer)
        #[arg(long)]
        owner: String,
        /// Source token account
        #[arg(long = "source")]
        source_token_account: String,
        /// Destination token account
        #[arg(long = "destination")]
        destination_token_account: String,
        /// Token mint, reported in the summary only
        #[arg(long)]
        mint: Option<String>,
        /// Amount in whole tokens, e.g. 1.5
        #[arg(long)]
        amount: String,
        /// Token decimals (0-18)
        #[arg(long, default_value_t = 9)]
        decimals: u8,
        /// Recent blockhash (Base58), fetched from an RPC node
        #[arg(long, env = "SOLTX_BLOCKHASH")]
        blockhash: Option<String>,
    },
    /// Decode a serialized transaction
    Decode {
        /// Encoded transaction; reads stdin when omitted or '-'
        transaction: Option<String>,
        /// Input is hex rather than Base58
        #[arg(long)]
        hex: bool,
    },
    /// Derive the associated token account for an owner and mint
    Ata {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        mint: String,
    },
    /// Re-encode hex bytes as Base58
    HexToBase58 { hex: String },
    /// Re-encode Base58 text as hex bytes
    Base58ToHex { text: String },
}
