//! The witness commitment over a tree root.

use crate::{
    combine,
    Digest,
    Error,
};

/// The 32 byte value appended to the root before hashing.
pub const WITNESS_RESERVED_VALUE: [u8; 32] = [0; 32];

/// Calculates `SHA256(SHA256(root || WITNESS_RESERVED_VALUE))`.
///
/// This is the same recipe as joining `root` with an all-zero right node.
///
/// # Examples
/// ```
/// use wtxid_merkle::{
///     witness_commitment,
///     Digest,
/// };
/// let commitment = witness_commitment(&Digest::ZERO);
/// assert_eq!(
///     "e2f61c3f71d1defd3fa999dfa36953755c690689799962b48bebd836974e8cf9",
///     commitment.to_string(),
/// );
/// ```
#[must_use]
pub fn witness_commitment(root: &Digest) -> Digest {
    combine(root, &Digest::new(WITNESS_RESERVED_VALUE))
}

/// Calculates the witness commitment over a root given as raw bytes.
///
/// # Errors
/// Returns an error of kind [`crate::ErrorKind::MalformedDigest`] if `root`
/// is not exactly 32 bytes long.
pub fn witness_commitment_from_slice(root: &[u8]) -> Result<Digest, Error> {
    Digest::try_from_slice(root).map(|root| witness_commitment(&root))
}
