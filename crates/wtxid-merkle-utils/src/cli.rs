use clap::{
    Parser,
    Subcommand,
};

use super::{
    commitment,
    config::Format,
    proof,
    root,
    wtxids,
};

/// Utilities for computing wtxid merkle roots, inclusion proofs and witness commitments
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configure formatting of output. Overrides `WTXID_MERKLE_UTILS_FORMAT`.
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<Format>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the merkle root and witness commitment of a list of leaves
    #[command(arg_required_else_help = true)]
    Root(root::Args),

    /// Construct the inclusion proof for one leaf
    #[command(arg_required_else_help = true)]
    Proof(proof::Args),

    /// Compute the witness commitment of a merkle root
    #[command(arg_required_else_help = true)]
    Commitment(commitment::Args),

    /// Derive the leaf list of a block from its raw transactions
    #[command(arg_required_else_help = true)]
    Wtxids(wtxids::Args),
}

#[must_use]
pub fn get() -> Cli {
    Cli::parse()
}
