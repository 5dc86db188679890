//! Rendering of codec results for stdout.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use sol_codec::{bytes_to_hex, BuiltTransfer, DecodedTransaction, TransferSummary};

use crate::config::OutputFormat;

/// JSON shape of a built transfer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutput<'a> {
    pub summary: &'a TransferSummary,
    /// Base58 unsigned transaction.
    pub transaction: &'a str,
    /// Hex of the message bytes, i.e. what each signer signs.
    pub message_hex: String,
}

impl<'a> From<&'a BuiltTransfer> for TransferOutput<'a> {
    fn from(out: &'a BuiltTransfer) -> Self {
        Self {
            summary: &out.summary,
            transaction: &out.built.base58,
            message_hex: bytes_to_hex(&out.built.message_bytes),
        }
    }
}

pub fn json<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    })
}

pub fn transfer(out: &BuiltTransfer, format: OutputFormat) -> Result<String> {
    if format != OutputFormat::Text {
        return json(&TransferOutput::from(out), format);
    }

    let s = &out.summary;
    let mut text = String::new();
    writeln!(text, "type:    {}", s.kind)?;
    writeln!(text, "from:    {}", s.from)?;
    if let Some(source) = &s.source_token_account {
        writeln!(text, "source:  {source}")?;
    }
    writeln!(text, "to:      {}", s.to)?;
    if let Some(mint) = &s.mint {
        writeln!(text, "mint:    {mint}")?;
    }
    writeln!(
        text,
        "amount:  {} ({} base units, {} decimals)",
        s.amount, s.base_units, s.decimals
    )?;
    writeln!(text, "size:    {} bytes", s.size)?;
    writeln!(text)?;
    write!(text, "{}", out.built.base58)?;
    Ok(text)
}

pub fn decoded(tx: &DecodedTransaction, format: OutputFormat) -> Result<String> {
    if format != OutputFormat::Text {
        return json(tx, format);
    }

    let mut text = String::new();
    writeln!(text, "size:       {} bytes", tx.total_size)?;
    writeln!(
        text,
        "signatures: {}{}",
        tx.signature_count,
        if tx.has_signatures() { "" } else { " (unsigned)" }
    )?;
    writeln!(
        text,
        "header:     {} required, {} readonly signed, {} readonly unsigned",
        tx.header.num_required_signatures,
        tx.header.num_readonly_signed_accounts,
        tx.header.num_readonly_unsigned_accounts
    )?;
    writeln!(text, "blockhash:  {}", tx.recent_blockhash)?;
    writeln!(text, "accounts:")?;
    for (i, account) in tx.accounts.iter().enumerate() {
        writeln!(text, "  [{i}] {account}")?;
    }
    for (n, ix) in tx.instructions.iter().enumerate() {
        writeln!(text, "instruction {n}:")?;
        writeln!(text, "  program: [{}] {}", ix.program_id_index, ix.program_id)?;
        for (idx, account) in ix.account_indices.iter().zip(&ix.accounts) {
            writeln!(text, "  account: [{idx}] {account}")?;
        }
        writeln!(text, "  data:    {}", if ix.data.is_empty() { "-" } else { ix.data.as_str() })?;
    }
    Ok(text.trim_end().to_string())
}
