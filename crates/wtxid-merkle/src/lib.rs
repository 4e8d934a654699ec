//! A binary merkle tree over the witness transaction ids (wtxids) of a block.
//!
//! The tree is built eagerly from an ordered sequence of 32 byte leaf digests
//! and is immutable afterwards. Nodes are joined with double sha256, i.e.
//! `SHA256(SHA256(left || right))`. When a level has an odd number of nodes, its
//! last node is joined with itself rather than being promoted unchanged.
//!
//! The crate provides:
//! + [`Tree`]: the level structure with root retrieval and proof construction;
//! + [`Proof`]: an inclusion proof whose entries are tagged with their [`Position`];
//! + [`witness_commitment`]: the commitment over a root and a 32 byte zero value.
//!
//! # Usage and examples
//! ```
//! use wtxid_merkle::{
//!     combine,
//!     witness_commitment,
//!     Digest,
//!     Tree,
//! };
//! let a = Digest::new([1; 32]);
//! let b = Digest::new([2; 32]);
//! let c = Digest::new([3; 32]);
//! let tree = Tree::try_from_leaves([a, b, c]).expect("three leaves are not empty");
//!
//! let expected_root = combine(&combine(&a, &b), &combine(&c, &c));
//! assert_eq!(expected_root, tree.root().unwrap());
//!
//! // The last leaf of the odd-length leaf level is its own proof entry.
//! let proof = tree.construct_proof(2).unwrap();
//! assert_eq!(vec![c, combine(&a, &b)], proof.to_vec());
//!
//! let _commitment = witness_commitment(&tree.root().unwrap());
//! ```
//!
//! # Levels
//! Level 0 holds the leaves. Level `k + 1` holds `ceil(len(level k) / 2)`
//! nodes; the last level holds only the root. A tree over `n >= 1` leaves has
//! `ceil(log2(n)) + 1` levels:
//! ```text
//! level 2:         R = H(H(A|B) | H(C|C))
//!                 /                \
//! level 1:     H(A|B)            H(C|C)
//!             /      \           /
//! level 0:   A        B         C
//! ```
//!
//! # Observability
//! With the `tracing` feature enabled, building a tree and constructing a proof
//! emit `tracing` events at trace level. Nothing is emitted otherwise.

pub mod commitment;
pub mod digest;
mod error;
pub mod proof;
#[cfg(test)]
mod tests;

pub use commitment::{
    witness_commitment,
    witness_commitment_from_slice,
    WITNESS_RESERVED_VALUE,
};
pub use digest::{
    combine,
    double_sha256,
    Digest,
    DIGEST_LENGTH,
};
pub use error::{
    Error,
    ErrorKind,
};
pub use proof::{
    Position,
    Proof,
    Step,
};

/// A merkle tree holding every level from the leaves up to the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    levels: Vec<Vec<Digest>>,
}

impl Tree {
    /// Builds a tree over `leaves`, keeping their order.
    ///
    /// An empty `leaves` yields a tree that is not ready: [`Tree::root`] and
    /// [`Tree::construct_proof`] on it fail with [`ErrorKind::NotReady`]. Use
    /// [`Tree::try_from_leaves`] to reject empty input up front.
    ///
    /// # Examples
    /// ```
    /// # use wtxid_merkle::{Digest, ErrorKind, Tree};
    /// let tree = Tree::from_leaves(Vec::<Digest>::new());
    /// assert!(!tree.is_ready());
    /// assert_eq!(ErrorKind::NotReady, tree.root().unwrap_err().kind());
    /// ```
    pub fn from_leaves<I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = Digest>,
    {
        Self {
            levels: build_levels(leaves.into_iter().collect()),
        }
    }

    /// Builds a tree over `leaves`, rejecting an empty sequence.
    ///
    /// # Errors
    /// Returns an error of kind [`ErrorKind::EmptyInput`] if `leaves` yields no
    /// items.
    pub fn try_from_leaves<I>(leaves: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Digest>,
    {
        let tree = Self::from_leaves(leaves);
        if tree.is_ready() {
            Ok(tree)
        } else {
            Err(Error::empty_input())
        }
    }

    /// Builds a tree over hex encoded leaves.
    ///
    /// # Errors
    /// Returns an error of kind [`ErrorKind::MalformedDigest`] if any leaf is not
    /// 64 hex characters, or [`ErrorKind::EmptyInput`] if there are no leaves.
    ///
    /// # Examples
    /// ```
    /// # use wtxid_merkle::Tree;
    /// let leaves = ["00".repeat(32), "ab".repeat(32)];
    /// let tree = Tree::try_from_hex_leaves(&leaves).unwrap();
    /// assert_eq!(2, tree.len());
    /// ```
    pub fn try_from_hex_leaves<I, S>(leaves: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let leaves = leaves
            .into_iter()
            .map(|leaf| Digest::from_hex(leaf.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_leaves(leaves)
    }

    /// Builds a tree over leaves given as raw byte slices of 32 bytes each.
    ///
    /// # Errors
    /// Returns an error of kind [`ErrorKind::MalformedDigest`] if any leaf is not
    /// 32 bytes long, or [`ErrorKind::EmptyInput`] if there are no leaves.
    pub fn try_from_byte_leaves<I, B>(leaves: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let leaves = leaves
            .into_iter()
            .map(|leaf| Digest::try_from_slice(leaf.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_leaves(leaves)
    }

    /// Returns `true` if the tree was built from at least one leaf.
    #[must_use]
    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.levels.is_empty()
    }

    /// Returns the number of leaves.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of levels above the leaves, which is also the length
    /// of every proof constructed from this tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Returns all levels, leaves first and root last.
    #[must_use]
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    /// Returns the leaves of the tree.
    #[must_use]
    pub fn leaves(&self) -> &[Digest] {
        self.levels.first().map_or(&[], Vec::as_slice)
    }

    /// Returns the leaf at index `i`, or `None` if `i` is outside the tree.
    #[must_use]
    pub fn leaf(&self, i: usize) -> Option<Digest> {
        self.leaves().get(i).copied()
    }

    /// Returns the root of the tree.
    ///
    /// The root of a single-leaf tree is that leaf.
    ///
    /// # Errors
    /// Returns an error of kind [`ErrorKind::NotReady`] if the tree has no leaves.
    pub fn root(&self) -> Result<Digest, Error> {
        self.levels
            .last()
            .and_then(|root_level| root_level.first())
            .copied()
            .ok_or_else(Error::not_ready)
    }

    /// Constructs the inclusion proof for the leaf at `leaf_index`.
    ///
    /// Walking up from the leaf, every level below the root contributes one
    /// step. If the node on the path is the last node of an odd-length level it
    /// was joined with itself, so the node itself is recorded with
    /// [`Position::Duplicate`]. Otherwise its sibling is recorded as
    /// [`Position::Left`] (node is a right child) or [`Position::Right`] (node is a
    /// left child).
    ///
    /// # Errors
    /// Returns an error of kind [`ErrorKind::NotReady`] if the tree has no leaves,
    /// or [`ErrorKind::IndexOutOfRange`] if `leaf_index >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// # use wtxid_merkle::{Digest, Tree};
    /// let tree = Tree::from_leaves((1..=8u8).map(|i| Digest::new([i; 32])));
    /// let proof = tree.construct_proof(7).unwrap();
    /// assert_eq!(3, proof.len());
    /// assert_eq!(&Digest::new([7; 32]), proof.digests().next().unwrap());
    /// ```
    pub fn construct_proof(&self, leaf_index: usize) -> Result<Proof, Error> {
        let Some((_root_level, levels)) = self.levels.split_last() else {
            return Err(Error::not_ready());
        };
        let leaf_count = self.len();
        if leaf_index >= leaf_count {
            return Err(Error::index_out_of_range(
                i64::try_from(leaf_index).unwrap_or(i64::MAX),
                leaf_count,
            ));
        }

        let mut steps = Vec::with_capacity(levels.len());
        let mut index = leaf_index;
        for level in levels {
            let level_len = level.len();
            if index == level_len - 1 && level_len % 2 == 1 {
                steps.push(Step {
                    position: Position::Duplicate,
                    digest: level[index],
                });
            } else {
                let (position, sibling_index) = if index % 2 == 1 {
                    (Position::Left, index - 1)
                } else {
                    (Position::Right, index + 1)
                };
                // Always present: the odd tail is handled above.
                if let Some(&digest) = level.get(sibling_index) {
                    steps.push(Step {
                        position,
                        digest,
                    });
                }
            }
            #[cfg(feature = "tracing")]
            if let Some(step) = steps.last() {
                tracing::trace!(
                    index,
                    level_len,
                    position = step.position.as_str(),
                    digest = %step.digest,
                    "took proof step",
                );
            }
            index /= 2;
        }

        Ok(Proof {
            leaf_index,
            leaf_count,
            steps,
        })
    }

    /// Like [`Tree::construct_proof`], but accepts a signed index as received
    /// from untyped input.
    ///
    /// # Errors
    /// Returns an error of kind [`ErrorKind::NotReady`] if the tree has no leaves,
    /// or [`ErrorKind::IndexOutOfRange`] if `leaf_index` is negative or not less
    /// than `self.len()`.
    ///
    /// # Examples
    /// ```
    /// # use wtxid_merkle::{Digest, ErrorKind, Tree};
    /// let tree = Tree::from_leaves([Digest::new([1; 32])]);
    /// let err = tree.construct_proof_signed(-1).unwrap_err();
    /// assert_eq!(ErrorKind::IndexOutOfRange, err.kind());
    /// ```
    pub fn construct_proof_signed(&self, leaf_index: i64) -> Result<Proof, Error> {
        if !self.is_ready() {
            return Err(Error::not_ready());
        }
        let index = usize::try_from(leaf_index)
            .map_err(|_| Error::index_out_of_range(leaf_index, self.len()))?;
        self.construct_proof(index)
    }
}

impl FromIterator<Digest> for Tree {
    fn from_iter<I: IntoIterator<Item = Digest>>(iter: I) -> Self {
        Self::from_leaves(iter)
    }
}

/// Builds all levels from `leaves` up to and including the root level.
///
/// Returns no levels if `leaves` is empty.
fn build_levels(leaves: Vec<Digest>) -> Vec<Vec<Digest>> {
    if leaves.is_empty() {
        return Vec::new();
    }
    let mut levels = Vec::with_capacity(level_count(leaves.len()));
    let mut current = leaves;
    while current.len() > 1 {
        let next = parent_level(&current);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            level = levels.len(),
            width = current.len(),
            parents = next.len(),
            "built level",
        );
        levels.push(std::mem::replace(&mut current, next));
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(root = %current[0], depth = levels.len(), "built merkle tree");
    levels.push(current);
    levels
}

/// Joins adjacent pairs of `level`. A lone last node is joined with itself.
fn parent_level(level: &[Digest]) -> Vec<Digest> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => combine(left, right),
            [lone] => combine(lone, lone),
            _ => unreachable!("`chunks(2)` only yields slices of one or two elements"),
        })
        .collect()
}

/// Returns `ceil(log2(n)) + 1`, the number of levels of a tree over `n >= 1`
/// leaves.
fn level_count(n: usize) -> usize {
    n.next_power_of_two().trailing_zeros() as usize + 1
}
