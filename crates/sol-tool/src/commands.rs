//! Subcommand handlers.
//!
//! Each handler turns CLI input into an explicit request, calls the codec and
//! returns the rendered output. Nothing is printed here.

use std::io::Read;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use sol_codec::{
    address_to_bytes, build_sol_transfer, build_spl_transfer, bytes_to_address, bytes_to_hex,
    decode_base58, decode_transaction, decode_transaction_base58,
    derive_associated_token_address, encode_base58, hex_to_bytes, NativeTransferRequest,
    TokenTransferRequest,
};

use crate::cli::Command;
use crate::config::{OutputFormat, Settings};
use crate::render;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtaOutput {
    owner: String,
    mint: String,
    associated_token_account: String,
}

/// Execute `command`. `stdin` is only read by `decode` without an argument.
pub fn run(command: Command, settings: &Settings, stdin: impl Read) -> Result<String> {
    match command {
        Command::Transfer {
            from,
            to,
            amount,
            blockhash,
        } => {
            let request = NativeTransferRequest {
                from,
                to,
                amount,
                recent_blockhash: blockhash,
            };
            let out = build_sol_transfer(&request)?;
            info!("built SOL transfer ({} bytes)", out.built.size());
            render::transfer(&out, settings.output)
        }
        Command::TokenTransfer {
            owner,
            source_token_account,
            destination_token_account,
            mint,
            amount,
            decimals,
            blockhash,
        } => {
            let request = TokenTransferRequest {
                owner,
                source_token_account,
                destination_token_account,
                mint,
                amount,
                decimals,
                recent_blockhash: blockhash,
            };
            let out = build_spl_transfer(&request)?;
            info!("built SPL token transfer ({} bytes)", out.built.size());
            render::transfer(&out, settings.output)
        }
        Command::Decode { transaction, hex } => {
            let input = match transaction.filter(|t| t != "-") {
                Some(text) => text,
                None => read_input(stdin)?,
            };
            let decoded = if hex {
                decode_transaction(&hex_to_bytes(&input)?)?
            } else {
                decode_transaction_base58(&input)?
            };
            info!(
                "decoded {} bytes, {} instruction(s)",
                decoded.total_size,
                decoded.instructions.len()
            );
            render::decoded(&decoded, settings.output)
        }
        Command::Ata { owner, mint } => {
            let owner_bytes = address_to_bytes(&owner).context("owner")?;
            let mint_bytes = address_to_bytes(&mint).context("mint")?;
            let ata = derive_associated_token_address(&owner_bytes, &mint_bytes)?;
            let out = AtaOutput {
                owner: bytes_to_address(&owner_bytes),
                mint: bytes_to_address(&mint_bytes),
                associated_token_account: bytes_to_address(&ata),
            };
            match settings.output {
                OutputFormat::Text => Ok(out.associated_token_account),
                format => render::json(&out, format),
            }
        }
        Command::HexToBase58 { hex } => Ok(encode_base58(&hex_to_bytes(&hex)?)),
        Command::Base58ToHex { text } => Ok(bytes_to_hex(&decode_base58(text.trim())?)),
    }
}

fn read_input(mut stdin: impl Read) -> Result<String> {
    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("failed to read transaction from stdin")?;
    let trimmed = input.trim();
    anyhow::ensure!(!trimmed.is_empty(), "no transaction given on stdin");
    Ok(trimmed.to_string())
}
