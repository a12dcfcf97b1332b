//! Content hashing for staleness detection of sources and interfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3.
///
/// Source text, serialized interfaces, and option fingerprints are all
/// compared through `ContentHash`. Two inputs with the same hash are assumed
/// to be identical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// The all-zero hash, used as a placeholder before an interface is sealed.
    pub const ZERO: ContentHash = ContentHash([0; 16]);

    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes the hash of a piece of source text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Hashes `data` followed by every hash in `parts`, in order.
    ///
    /// Used to fold the hashes of imported modules into a module's own hash.
    pub fn combine<'a>(data: &[u8], parts: impl IntoIterator<Item = &'a ContentHash>) -> Self {
        let mut buf = data.to_vec();
        for part in parts {
            buf.extend_from_slice(&part.0);
        }
        Self::from_bytes(&buf)
    }

    /// Returns the raw little-endian bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"hello");
        let b = ContentHash::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn text_matches_bytes() {
        assert_eq!(
            ContentHash::from_text("module A where"),
            ContentHash::from_bytes(b"module A where")
        );
    }

    #[test]
    fn combine_depends_on_parts() {
        let a = ContentHash::from_text("a");
        let b = ContentHash::from_text("b");
        let ab = ContentHash::combine(b"body", [&a, &b]);
        let ba = ContentHash::combine(b"body", [&b, &a]);
        let none = ContentHash::combine(b"body", []);
        assert_ne!(ab, ba);
        assert_eq!(none, ContentHash::from_bytes(b"body"));
    }

    #[test]
    fn zero_differs_from_empty_input() {
        assert_ne!(ContentHash::ZERO, ContentHash::from_bytes(b""));
    }

    #[test]
    fn display_format() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32, "Display should be 32 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h:?}");
        assert!(s.starts_with("ContentHash("));
        assert!(s.ends_with(")"));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
