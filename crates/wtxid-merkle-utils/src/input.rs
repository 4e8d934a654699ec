//! Parsing of hex lists handed to the utility.
//!
//! A list is either a JSON array of strings or one entry per line. Blank lines
//! and surrounding whitespace are ignored; a leading `0x` is stripped.

use color_eyre::eyre::{
    bail,
    Result,
    WrapErr as _,
};
use wtxid_merkle::Digest;

/// Splits `input` into its hex entries without decoding them.
///
/// # Errors
/// Returns an error if `input` starts like a JSON array but is not an array of
/// strings.
pub fn entries(input: &str) -> Result<Vec<String>> {
    let trimmed = input.trim();
    let raw: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).wrap_err("failed to parse input as a JSON array of strings")?
    } else {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    };
    Ok(raw
        .into_iter()
        .map(|entry| {
            let entry = entry.trim();
            entry.strip_prefix("0x").unwrap_or(entry).to_string()
        })
        .collect())
}

/// Parses `input` as a list of 32 byte digests.
///
/// # Errors
/// Returns an error if `input` holds no entries or if any entry is not 64 hex
/// characters.
pub fn digests(input: &str) -> Result<Vec<Digest>> {
    let entries = entries(input)?;
    if entries.is_empty() {
        bail!("input contained no digests");
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Digest::from_hex(entry).wrap_err_with(|| format!("entry `{i}` is not a valid digest"))
        })
        .collect()
}

/// Parses `input` as a list of arbitrary hex encoded byte strings.
///
/// # Errors
/// Returns an error if any entry is not valid hex.
pub fn byte_strings(input: &str) -> Result<Vec<Vec<u8>>> {
    entries(input)?
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            hex::decode(entry).wrap_err_with(|| format!("entry `{i}` is not valid hex"))
        })
        .collect()
}
