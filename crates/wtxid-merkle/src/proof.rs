//! Inclusion proofs produced by [`crate::Tree::construct_proof`].

use std::fmt::Write as _;

use crate::Digest;

/// Where the digest of a [`Step`] sits relative to the node on the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Position {
    /// The digest is the left sibling: the parent is `combine(digest, node)`.
    Left,
    /// The digest is the right sibling: the parent is `combine(node, digest)`.
    Right,
    /// The node was the lone last element of an odd-length level and was
    /// paired with itself. The digest is the node itself and the parent is
    /// `combine(node, node)`.
    Duplicate,
}

impl Position {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Duplicate => "duplicate",
        }
    }

    #[must_use]
    pub fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// One entry of an inclusion proof, contributed by one level of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub position: Position,
    pub digest: Digest,
}

/// An inclusion proof for the leaf at `leaf_index` in a tree of `leaf_count`
/// leaves.
///
/// Steps are ordered bottom to top: step `k` was taken from level `k`. Each
/// step carries its [`Position`] so that a consumer does not have to rederive
/// the left/right/duplicate decision from the leaf index and the tree shape.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof {
    pub(crate) leaf_index: usize,
    pub(crate) leaf_count: usize,
    pub(crate) steps: Vec<Step>,
}

impl Proof {
    #[must_use]
    pub fn leaf_index(&self) -> usize {
        self.leaf_index
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Returns the number of steps in the proof.
    ///
    /// This is `ceil(log2(leaf_count))`, and `0` for a single-leaf tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Iterates over the proof digests bottom to top, without positions.
    pub fn digests(&self) -> impl ExactSizeIterator<Item = &Digest> + '_ {
        self.steps.iter().map(|step| &step.digest)
    }

    /// Returns the proof digests bottom to top, without positions.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Digest> {
        self.digests().copied().collect()
    }

    /// Returns the proof digests as lowercase hex strings, bottom to top.
    #[must_use]
    pub fn to_hex_vec(&self) -> Vec<String> {
        self.digests().map(Digest::to_hex).collect()
    }

    /// Concatenates all proof digests into a single `0x`-prefixed hex string.
    ///
    /// # Examples
    /// ```
    /// use wtxid_merkle::{
    ///     Digest,
    ///     Tree,
    /// };
    /// let tree = Tree::from_leaves([Digest::new([1; 32]), Digest::new([2; 32])]);
    /// let proof = tree.construct_proof(0).unwrap();
    /// assert_eq!(format!("0x{}", "02".repeat(32)), proof.to_hex_blob());
    /// ```
    #[must_use]
    pub fn to_hex_blob(&self) -> String {
        let mut blob = String::with_capacity(2 + self.steps.len() * 64);
        blob.push_str("0x");
        for digest in self.digests() {
            // Writing into a `String` is infallible.
            let _ = write!(blob, "{digest}");
        }
        blob
    }
}

impl<'a> IntoIterator for &'a Proof {
    type IntoIter = std::slice::Iter<'a, Step>;
    type Item = &'a Step;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
