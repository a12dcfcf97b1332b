//! Hashing of source text and interfaces.
//!
//! Two hash layers drive staleness detection: the source hash of a module's
//! text, and the full hash of its encoded interface. The full hash folds in
//! the hashes of every import, so editing a leaf module changes the full hash
//! of each module above it.

use lemma_common::ContentHash;

use crate::codec::InterfaceCodec;
use crate::error::CacheError;
use crate::interface::Interface;

/// Utility for computing the hashes recorded in interfaces.
pub struct HashLedger;

impl HashLedger {
    /// Hashes a module's source text.
    pub fn hash_text(text: &str) -> ContentHash {
        ContentHash::from_text(text)
    }

    /// Hashes raw bytes, such as an encoded interface body.
    pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
        ContentHash::from_bytes(bytes)
    }

    /// Computes the full hash of an interface.
    ///
    /// The interface is encoded with its `full_hash` field zeroed, and the
    /// recorded import hashes are folded in after the encoded bytes.
    pub fn full_hash(
        codec: &dyn InterfaceCodec,
        interface: &Interface,
    ) -> Result<ContentHash, CacheError> {
        let mut body = interface.clone();
        body.full_hash = ContentHash::ZERO;
        let bytes = codec.encode(&body)?;
        Ok(ContentHash::combine(
            &bytes,
            interface.imports.iter().map(|(_, hash)| hash),
        ))
    }

    /// Returns the interface with its full hash filled in.
    pub fn seal(
        codec: &dyn InterfaceCodec,
        mut interface: Interface,
    ) -> Result<Interface, CacheError> {
        interface.full_hash = Self::full_hash(codec, &interface)?;
        Ok(interface)
    }
}
