//! The double-sha256 digest primitive and the [`Digest`] value type.

use std::{
    fmt,
    str::FromStr,
};

use sha2::{
    Digest as _,
    Sha256,
};

use crate::Error;

/// The length of a [`Digest`] in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// Calculates `SHA256(SHA256(bytes))`.
///
/// # Examples
/// ```
/// use wtxid_merkle::double_sha256;
/// let digest = double_sha256(b"abc");
/// assert_eq!(
///     "4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358",
///     digest.to_string(),
/// );
/// ```
#[must_use]
pub fn double_sha256(bytes: &[u8]) -> Digest {
    let first = Sha256::digest(bytes);
    Digest(Sha256::digest(first).into())
}

/// Calculates `SHA256(SHA256(left || right))`.
///
/// This is the only way two nodes of the tree are joined. The operation is
/// positional: `combine(a, b)` and `combine(b, a)` differ for `a != b`.
#[must_use]
pub fn combine(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    let first = hasher.finalize();
    Digest(Sha256::digest(first).into())
}

/// A 32 byte hash value.
///
/// Displayed and parsed as 64 lowercase hex characters, in the byte order in
/// which it was produced (no reversal is applied).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// The all-zero digest, used as the coinbase placeholder leaf.
    pub const ZERO: Self = Self([0; DIGEST_LENGTH]);

    #[must_use]
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Constructs a digest from a slice of exactly 32 bytes.
    ///
    /// # Errors
    /// Returns a [`Error`] of kind [`crate::ErrorKind::MalformedDigest`] if
    /// `bytes` is not 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let array = <[u8; DIGEST_LENGTH]>::try_from(bytes)
            .map_err(|_| Error::incorrect_length(bytes.len()))?;
        Ok(Self(array))
    }

    /// Parses a digest from 64 hex characters. A leading `0x` is accepted.
    ///
    /// # Errors
    /// Returns a [`Error`] of kind [`crate::ErrorKind::MalformedDigest`] if
    /// `s` is not valid hex or does not decode to 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(Error::hex)?;
        Self::try_from_slice(&bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; DIGEST_LENGTH] {
        self.0
    }

    /// Returns the digest with its byte order reversed.
    ///
    /// Block and transaction hashes are conventionally shown to users in
    /// reversed byte order.
    #[must_use]
    pub fn reversed(self) -> Self {
        let mut bytes = self.0;
        bytes.reverse();
        Self(bytes)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LENGTH]> for Digest {
    fn from(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LENGTH] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(bytes)
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Digest")
            .field(&format_args!("{self}"))
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
