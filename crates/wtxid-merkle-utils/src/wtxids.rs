use std::fmt::{
    self,
    Display,
    Formatter,
};

use clap_stdin::FileOrStdin;
use color_eyre::eyre::{
    bail,
    Result,
    WrapErr as _,
};
use serde::Serialize;
use tracing::{
    debug,
    info,
};
use wtxid_merkle::{
    double_sha256,
    Digest,
};

use crate::{
    config::Format,
    input,
    print,
};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// File with the block's raw serialized transactions in block order, hex encoded, one per
    /// line or as a JSON array; `-` reads stdin. The first transaction is the coinbase.
    #[arg(long, value_name = "FILE")]
    raw_transactions: FileOrStdin,
}

/// The leaves of a block, printed one per line so they can be fed back as
/// `--leaves` input.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct Output(Vec<Digest>);

impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut leaves = self.0.iter();
        if let Some(first) = leaves.next() {
            write!(f, "{first}")?;
        }
        for leaf in leaves {
            write!(f, "\n{leaf}")?;
        }
        Ok(())
    }
}

/// Derives the leaves of a block from its raw transactions.
///
/// The coinbase (the first transaction) is represented by [`Digest::ZERO`]
/// because its wtxid is defined as all zeros. Every other leaf is the double
/// sha256 of the transaction's serialized bytes. Transactions are hashed as
/// opaque bytes.
///
/// # Errors
/// Returns an error if `raw_transactions` is empty.
pub fn leaves_from_raw_transactions<T>(raw_transactions: &[T]) -> Result<Vec<Digest>>
where
    T: AsRef<[u8]>,
{
    let Some((_coinbase, rest)) = raw_transactions.split_first() else {
        bail!("a block has at least one (coinbase) transaction, but none were given");
    };
    let mut leaves = Vec::with_capacity(raw_transactions.len());
    leaves.push(Digest::ZERO);
    for (i, raw) in rest.iter().enumerate() {
        let wtxid = double_sha256(raw.as_ref());
        debug!(index = i + 1, %wtxid, "hashed transaction");
        leaves.push(wtxid);
    }
    Ok(leaves)
}

/// Reads raw transactions and prints the resulting leaves.
///
/// # Errors
/// Returns an error if the transactions cannot be read or decoded from hex.
pub fn run(
    Args {
        raw_transactions,
    }: Args,
    format: Format,
) -> Result<()> {
    let contents = raw_transactions
        .contents()
        .wrap_err("failed to read raw transactions")?;
    let raw_transactions = input::byte_strings(&contents)?;
    let leaves = leaves_from_raw_transactions(&raw_transactions)?;
    info!(leaf_count = leaves.len(), "derived leaves from raw transactions");
    print(&Output(leaves), format)
}

#[cfg(test)]
mod tests {
    use wtxid_merkle::{
        double_sha256,
        Digest,
    };

    use super::leaves_from_raw_transactions;

    #[test]
    fn coinbase_is_replaced_by_zero_leaf() {
        let raw: [&[u8]; 3] = [b"coinbase", b"first", b"second"];
        let leaves = leaves_from_raw_transactions(&raw).unwrap();
        assert_eq!(
            vec![
                Digest::ZERO,
                double_sha256(b"first"),
                double_sha256(b"second")
            ],
            leaves
        );
    }

    #[test]
    fn block_with_only_a_coinbase_has_one_leaf() {
        let leaves = leaves_from_raw_transactions(&[b"coinbase"]).unwrap();
        assert_eq!(vec![Digest::ZERO], leaves);
    }

    #[test]
    fn empty_block_is_rejected() {
        assert!(leaves_from_raw_transactions::<Vec<u8>>(&[]).is_err());
    }
}
