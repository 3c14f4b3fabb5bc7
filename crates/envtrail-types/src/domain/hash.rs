use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hex characters kept from the SHA-256 digest.
pub const CONTENT_HASH_LEN: usize = 16;

/// Short cross-reference token linking a pointer entry to its log record.
///
/// Computed over the raw UTF-8 bytes of the text with no normalization, so it
/// identifies content for a human following a reference. It is not meant for
/// deduplication or integrity checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash a piece of text.
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..CONTENT_HASH_LEN].to_string())
    }

    /// Wrap an already computed token (e.g. parsed from a reference line).
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token has the shape produced by [`ContentHash::of`].
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == CONTENT_HASH_LEN
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
