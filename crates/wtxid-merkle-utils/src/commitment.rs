use std::fmt::{
    self,
    Display,
    Formatter,
};

use color_eyre::eyre::Result;
use serde::Serialize;
use wtxid_merkle::{
    witness_commitment,
    Digest,
};

use crate::{
    config::Format,
    print,
};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// The merkle root as 64 hex characters
    #[arg(value_name = "ROOT")]
    root: Digest,
}

#[derive(Debug, Serialize)]
struct Output {
    root: Digest,
    witness_commitment: Digest,
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Merkle Root: {}", self.root)?;
        write!(f, "Witness Commitment: {}", self.witness_commitment)
    }
}

/// Prints the witness commitment over `args.root`.
///
/// # Errors
/// Returns an error if the output cannot be encoded.
pub fn run(
    Args {
        root,
    }: Args,
    format: Format,
) -> Result<()> {
    let output = Output {
        root,
        witness_commitment: witness_commitment(&root),
    };
    print(&output, format)
}
