use std::fmt::{
    self,
    Display,
    Formatter,
};

use clap_stdin::FileOrStdin;
use color_eyre::eyre::{
    Result,
    WrapErr as _,
};
use serde::Serialize;
use tracing::info;
use wtxid_merkle::{
    witness_commitment,
    Digest,
    Tree,
};

use crate::{
    config::Format,
    input,
    print,
};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// File with one hex leaf digest per line or a JSON array of them; `-` reads stdin
    #[arg(long, value_name = "FILE")]
    leaves: FileOrStdin,
}

#[derive(Debug, Serialize)]
struct Output {
    leaf_count: usize,
    depth: usize,
    root: Digest,
    witness_commitment: Digest,
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Leaves: {}", self.leaf_count)?;
        writeln!(f, "Depth: {}", self.depth)?;
        writeln!(f, "Merkle Root: {}", self.root)?;
        write!(f, "Witness Commitment: {}", self.witness_commitment)
    }
}

/// Builds the tree over the leaves in `args` and prints its root.
///
/// # Errors
/// Returns an error if the leaves cannot be read or parsed.
pub fn run(
    Args {
        leaves,
    }: Args,
    format: Format,
) -> Result<()> {
    let contents = leaves.contents().wrap_err("failed to read leaves")?;
    let leaves = input::digests(&contents)?;
    let tree = Tree::try_from_leaves(leaves).wrap_err("failed to build merkle tree")?;
    let root = tree.root().wrap_err("failed to read merkle root")?;
    info!(leaf_count = tree.len(), %root, "computed merkle root");
    let output = Output {
        leaf_count: tree.len(),
        depth: tree.depth(),
        root,
        witness_commitment: witness_commitment(&root),
    };
    print(&output, format)
}
