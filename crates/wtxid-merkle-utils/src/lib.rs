//! Command line glue around [`wtxid_merkle`].
//!
//! Leaves (or the raw transactions they are derived from) are read from a file
//! or stdin, handed to the tree, and the results are printed to stdout. Logs go
//! to stderr.

use std::fmt::Display;

use color_eyre::eyre::{
    Result,
    WrapErr as _,
};
use serde::Serialize;

pub mod cli;
pub mod commitment;
pub mod config;
pub mod input;
pub mod proof;
pub mod root;
pub mod telemetry;
pub mod wtxids;

use config::Format;

/// Writes `output` to stdout in the requested `format`.
fn print<T>(output: &T, format: Format) -> Result<()>
where
    T: Display + Serialize,
{
    match format {
        Format::Display => println!("{output}"),
        Format::Json => println!(
            "{}",
            serde_json::to_string(output).wrap_err("failed to json-encode")?
        ),
    }
    Ok(())
}
