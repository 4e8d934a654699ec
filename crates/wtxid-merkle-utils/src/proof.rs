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
use tracing::{
    debug,
    info,
};
use wtxid_merkle::{
    witness_commitment,
    Digest,
    Step,
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

    /// Index of the leaf to prove
    #[arg(long, allow_negative_numbers = true)]
    index: i64,

    /// Hash of the block the leaves belong to, as 64 hex characters.
    ///
    /// It is printed in reversed byte order next to the proof.
    #[arg(long, value_name = "HEX")]
    block_hash: Option<Digest>,
}

#[derive(Debug, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    block_hash: Option<Digest>,
    wtxid: Digest,
    index: usize,
    leaf_count: usize,
    proof: String,
    steps: Vec<Step>,
    root: Digest,
    witness_commitment: Digest,
}

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(block_hash) = &self.block_hash {
            writeln!(f, "Block Hash: {block_hash}")?;
        }
        writeln!(f, "Transaction wtxid: {}", self.wtxid)?;
        writeln!(f, "Merkle Proof: {}", self.proof)?;
        writeln!(f, "Index: {}", self.index)?;
        writeln!(f, "Merkle Root: {}", self.root)?;
        write!(f, "Witness Commitment: {}", self.witness_commitment)
    }
}

/// Builds the tree over the leaves in `args` and prints the inclusion proof of
/// the leaf at `args.index`.
///
/// # Errors
/// Returns an error if the leaves cannot be read or parsed, or if the index is
/// outside the tree.
pub fn run(
    Args {
        leaves,
        index,
        block_hash,
    }: Args,
    format: Format,
) -> Result<()> {
    let contents = leaves.contents().wrap_err("failed to read leaves")?;
    let leaves = input::digests(&contents)?;
    let tree = Tree::try_from_leaves(leaves).wrap_err("failed to build merkle tree")?;
    let proof = tree
        .construct_proof_signed(index)
        .wrap_err_with(|| format!("failed to construct proof for leaf `{index}`"))?;
    let root = tree.root().wrap_err("failed to read merkle root")?;
    let wtxid = tree
        .leaf(proof.leaf_index())
        .expect("a proof was constructed so the leaf is inside the tree");
    for (level, step) in proof.steps().iter().enumerate() {
        debug!(
            level,
            position = step.position.as_str(),
            digest = %step.digest,
            "proof step",
        );
    }
    info!(index = proof.leaf_index(), %wtxid, %root, "constructed inclusion proof");

    let output = Output {
        block_hash: block_hash.map(Digest::reversed),
        wtxid,
        index: proof.leaf_index(),
        leaf_count: proof.leaf_count(),
        proof: proof.to_hex_blob(),
        steps: proof.steps().to_vec(),
        root,
        witness_commitment: witness_commitment(&root),
    };
    print(&output, format)
}
