/// The errors that can occur when building or querying a [`crate::Tree`].
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorRepr);

impl Error {
    pub(crate) fn empty_input() -> Self {
        Self(ErrorRepr::EmptyInput)
    }

    pub(crate) fn not_ready() -> Self {
        Self(ErrorRepr::NotReady)
    }

    pub(crate) fn index_out_of_range(index: i64, leaf_count: usize) -> Self {
        Self(ErrorRepr::IndexOutOfRange {
            index,
            leaf_count,
        })
    }

    pub(crate) fn incorrect_length(received: usize) -> Self {
        Self(ErrorRepr::IncorrectLength {
            received,
        })
    }

    pub(crate) fn hex(source: hex::FromHexError) -> Self {
        Self(ErrorRepr::Hex {
            source,
        })
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            ErrorRepr::EmptyInput => ErrorKind::EmptyInput,
            ErrorRepr::NotReady => ErrorKind::NotReady,
            ErrorRepr::IndexOutOfRange {
                ..
            } => ErrorKind::IndexOutOfRange,
            ErrorRepr::IncorrectLength {
                ..
            }
            | ErrorRepr::Hex {
                ..
            } => ErrorKind::MalformedDigest,
        }
    }
}

/// The category of an [`Error`].
///
/// None of these are retryable: each one describes a problem with the input
/// or with the state of the tree being queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No leaves were supplied.
    EmptyInput,
    /// The tree was queried but has no levels.
    NotReady,
    /// A proof was requested for an index outside `[0, leaf_count)`.
    IndexOutOfRange,
    /// A digest did not have 32 bytes or was not valid hex.
    MalformedDigest,
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("cannot build a merkle tree without leaves")]
    EmptyInput,
    #[error("the merkle tree has no levels and cannot be queried")]
    NotReady,
    #[error("leaf index `{index}` is outside the tree of `{leaf_count}` leaves")]
    IndexOutOfRange { index: i64, leaf_count: usize },
    #[error("expected a digest of 32 bytes, got `{received}`")]
    IncorrectLength { received: usize },
    #[error("failed decoding digest from hex")]
    Hex { source: hex::FromHexError },
}
