//! Serialization of interfaces to and from bytes.

use crate::error::CacheError;
use crate::interface::Interface;

/// Encodes and decodes interface bodies.
///
/// Decoding is fail-safe: malformed input yields `None`, which the loader
/// treats as a cache miss.
pub trait InterfaceCodec {
    /// Serializes an interface.
    fn encode(&self, interface: &Interface) -> Result<Vec<u8>, CacheError>;

    /// Deserializes an interface, returning `None` on malformed input.
    fn decode(&self, bytes: &[u8]) -> Option<Interface>;
}

/// The default codec, using bincode's standard configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl InterfaceCodec for BincodeCodec {
    fn encode(&self, interface: &Interface) -> Result<Vec<u8>, CacheError> {
        bincode::serde::encode_to_vec(interface, bincode::config::standard()).map_err(|e| {
            CacheError::Serialization {
                reason: e.to_string(),
            }
        })
    }

    fn decode(&self, bytes: &[u8]) -> Option<Interface> {
        let (interface, read): (Interface, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard()).ok()?;
        // Trailing bytes mean the payload is not what we wrote.
        if read != bytes.len() {
            return None;
        }
        Some(interface)
    }
}
