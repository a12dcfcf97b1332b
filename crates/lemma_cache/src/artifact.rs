//! On-disk interface artifacts.
//!
//! Each interface is stored as a binary file with a header containing magic
//! bytes, format version, the compiler version, the source and full hashes
//! of the interface, and a checksum of the payload. The header is prefixed by
//! its own length, so staleness checks can read the hashes without touching
//! the (much larger) encoded body.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use lemma_common::{ContentHash, ModuleName};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::InterfaceCodec;
use crate::error::CacheError;
use crate::interface::Interface;

/// Magic bytes identifying a Lemma interface file.
const ARTIFACT_MAGIC: [u8; 4] = *b"LMIF";

/// Current artifact format version. Increment on breaking changes to
/// the header or payload format.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Headers larger than this are treated as corrupt rather than allocated.
const MAX_HEADER_LEN: usize = 4096;

/// File extension for interface artifacts.
pub const INTERFACE_EXT: &str = "lmi";

/// Header prepended to every interface artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Magic bytes: must be `b"LMIF"`.
    pub magic: [u8; 4],

    /// Artifact format version.
    pub format_version: u32,

    /// Compiler version that produced this artifact.
    pub compiler_version: String,

    /// Source hash recorded in the interface.
    pub source_hash: ContentHash,

    /// Full hash of the interface.
    pub full_hash: ContentHash,

    /// Content hash of the payload bytes (for integrity checks).
    pub checksum: ContentHash,
}

/// Reads and writes interface artifacts.
///
/// The interface of module `A.B` found under include root `<root>` lives at
/// `<root>/<interface_dir>/A/B.lmi`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// Directory name, relative to an include root, holding artifacts.
    interface_dir: String,

    /// Compiler version string for compatibility checks.
    compiler_version: String,
}

impl ArtifactStore {
    /// Creates a store writing under `interface_dir` for the given compiler version.
    pub fn new(interface_dir: &str, compiler_version: &str) -> Self {
        Self {
            interface_dir: interface_dir.to_string(),
            compiler_version: compiler_version.to_string(),
        }
    }

    /// Returns the artifact path for `module` found under include root `root`.
    pub fn interface_path(&self, root: &Path, module: &ModuleName) -> PathBuf {
        root.join(&self.interface_dir)
            .join(module.to_relative_path(INTERFACE_EXT))
    }

    /// Reads only the header of the artifact at `path`.
    ///
    /// Returns `None` if the file doesn't exist, the header is malformed, or
    /// the magic, format version or compiler version don't match. The payload
    /// is not read and its checksum is not verified.
    pub fn read_header(&self, path: &Path) -> Option<ArtifactHeader> {
        let mut file = File::open(path).ok()?;
        let mut len_bytes = [0u8; 4];
        file.read_exact(&mut len_bytes).ok()?;
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        if header_len > MAX_HEADER_LEN {
            return None;
        }
        let mut header_bytes = vec![0u8; header_len];
        file.read_exact(&mut header_bytes).ok()?;
        self.decode_header(&header_bytes)
    }

    /// Reads and decodes the interface at `path`, validating its header.
    ///
    /// Returns `None` if the file doesn't exist, the header is invalid, the
    /// checksum doesn't verify, the body doesn't decode, or the decoded
    /// hashes disagree with the header. This is fail-safe: corruption
    /// results in a cache miss.
    pub fn read_interface(&self, path: &Path, codec: &dyn InterfaceCodec) -> Option<Interface> {
        let raw = std::fs::read(path).ok()?;

        // Need at least 4 bytes for the header length
        if raw.len() < 4 {
            return None;
        }

        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if header_len > MAX_HEADER_LEN || raw.len() < 4 + header_len {
            return None;
        }

        let header = self.decode_header(&raw[4..4 + header_len])?;
        let payload = &raw[4 + header_len..];

        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }

        let interface = codec.decode(payload)?;
        if interface.full_hash != header.full_hash || interface.source_hash != header.source_hash
        {
            return None;
        }
        Some(interface)
    }

    /// Persists `interface` at `path` and returns what was actually stored.
    ///
    /// The artifact is decoded again right after writing and the decoded copy
    /// is returned, so later hash comparisons operate on the durable value.
    /// On any failure, a partially written artifact at `path` is removed
    /// before the error is returned.
    pub fn write_interface(
        &self,
        path: &Path,
        interface: &Interface,
        codec: &dyn InterfaceCodec,
    ) -> Result<Interface, CacheError> {
        let result = self.write_and_verify(path, interface, codec);
        if result.is_err() && path.exists() {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(
                    target: "lemma::cache",
                    path = %path.display(),
                    error = %e,
                    "failed to remove partially written interface"
                );
            }
        }
        result
    }

    fn write_and_verify(
        &self,
        path: &Path,
        interface: &Interface,
        codec: &dyn InterfaceCodec,
    ) -> Result<Interface, CacheError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let payload = codec.encode(interface)?;
        let header = ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            compiler_version: self.compiler_version.clone(),
            source_hash: interface.source_hash,
            full_hash: interface.full_hash,
            checksum: ContentHash::from_bytes(&payload),
        };

        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // Write: 4-byte header length (little-endian) + header + payload
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);

        std::fs::write(path, &output).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.read_interface(path, codec)
            .ok_or_else(|| CacheError::RoundTrip {
                path: path.to_path_buf(),
            })
    }

    fn decode_header(&self, bytes: &[u8]) -> Option<ArtifactHeader> {
        let header: ArtifactHeader =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .ok()?
                .0;

        if header.magic != ARTIFACT_MAGIC
            || header.format_version != ARTIFACT_FORMAT_VERSION
            || header.compiler_version != self.compiler_version
        {
            return None;
        }
        Some(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeCodec;
    use crate::hasher::HashLedger;
    use crate::interface::tests::sample_interface;

    fn make_store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new("_build", "0.1.0");
        (dir, store)
    }

    fn sealed(name: &str) -> Interface {
        HashLedger::seal(&BincodeCodec, sample_interface(name)).unwrap()
    }

    fn write_raw(path: &Path, header: &ArtifactHeader, payload: &[u8]) {
        let header_bytes =
            bincode::serde::encode_to_vec(header, bincode::config::standard()).unwrap();
        let mut output = Vec::new();
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(payload);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, output).unwrap();
    }

    struct FailingEncode;

    impl InterfaceCodec for FailingEncode {
        fn encode(&self, _interface: &Interface) -> Result<Vec<u8>, CacheError> {
            Err(CacheError::Serialization {
                reason: "refused".to_string(),
            })
        }

        fn decode(&self, bytes: &[u8]) -> Option<Interface> {
            BincodeCodec.decode(bytes)
        }
    }

    struct FailingDecode;

    impl InterfaceCodec for FailingDecode {
        fn encode(&self, interface: &Interface) -> Result<Vec<u8>, CacheError> {
            BincodeCodec.encode(interface)
        }

        fn decode(&self, _bytes: &[u8]) -> Option<Interface> {
            None
        }
    }

    #[test]
    fn interface_path_format() {
        let (dir, store) = make_store();
        let path = store.interface_path(dir.path(), &ModuleName::new("Data.List"));
        assert!(path.ends_with("_build/Data/List.lmi"));
        assert!(path.starts_with(dir.path()));
    }

    #[test]
    fn write_returns_decoded_copy() {
        let (dir, store) = make_store();
        let iface = sealed("Data.Nat");
        let path = store.interface_path(dir.path(), &iface.name);

        let durable = store.write_interface(&path, &iface, &BincodeCodec).unwrap();
        assert_eq!(durable, iface);
        assert_eq!(
            store.read_interface(&path, &BincodeCodec),
            Some(durable.clone())
        );
    }

    #[test]
    fn header_readable_without_body() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let path = store.interface_path(dir.path(), &iface.name);
        store.write_interface(&path, &iface, &BincodeCodec).unwrap();

        // Chop the body off: the header still reads, the interface does not.
        let raw = std::fs::read(&path).unwrap();
        let header_len = u32::from_le_bytes(raw[..4].try_into().unwrap()) as usize;
        std::fs::write(&path, &raw[..4 + header_len + 3]).unwrap();

        let header = store.read_header(&path).unwrap();
        assert_eq!(header.full_hash, iface.full_hash);
        assert_eq!(header.source_hash, iface.source_hash);
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn read_missing_returns_none() {
        let (dir, store) = make_store();
        let path = dir.path().join("_build/Missing.lmi");
        assert!(store.read_header(&path).is_none());
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn read_garbage_returns_none() {
        let (dir, store) = make_store();
        let path = dir.path().join("garbage.lmi");
        std::fs::write(&path, b"garbage data").unwrap();
        assert!(store.read_header(&path).is_none());
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn read_truncated_header_returns_none() {
        let (dir, store) = make_store();
        let path = dir.path().join("truncated.lmi");
        // Only 2 bytes: not enough for the header length
        std::fs::write(&path, b"AB").unwrap();
        assert!(store.read_header(&path).is_none());
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn read_wrong_magic_returns_none() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let payload = BincodeCodec.encode(&iface).unwrap();
        let header = ArtifactHeader {
            magic: *b"BAAD",
            format_version: ARTIFACT_FORMAT_VERSION,
            compiler_version: "0.1.0".to_string(),
            source_hash: iface.source_hash,
            full_hash: iface.full_hash,
            checksum: ContentHash::from_bytes(&payload),
        };
        let path = dir.path().join("badmagic.lmi");
        write_raw(&path, &header, &payload);
        assert!(store.read_header(&path).is_none());
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn read_other_compiler_version_returns_none() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let path = store.interface_path(dir.path(), &iface.name);
        ArtifactStore::new("_build", "0.0.9")
            .write_interface(&path, &iface, &BincodeCodec)
            .unwrap();
        assert!(store.read_header(&path).is_none());
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn read_checksum_mismatch_returns_none() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let payload = BincodeCodec.encode(&iface).unwrap();
        let header = ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            compiler_version: "0.1.0".to_string(),
            source_hash: iface.source_hash,
            full_hash: iface.full_hash,
            checksum: ContentHash::from_bytes(b"something else"),
        };
        let path = dir.path().join("mismatch.lmi");
        write_raw(&path, &header, &payload);
        assert!(store.read_header(&path).is_some());
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn header_disagreeing_with_body_returns_none() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let payload = BincodeCodec.encode(&iface).unwrap();
        let header = ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            compiler_version: "0.1.0".to_string(),
            source_hash: iface.source_hash,
            full_hash: ContentHash::from_text("not the full hash"),
            checksum: ContentHash::from_bytes(&payload),
        };
        let path = dir.path().join("liar.lmi");
        write_raw(&path, &header, &payload);
        assert!(store.read_interface(&path, &BincodeCodec).is_none());
    }

    #[test]
    fn failed_encode_removes_existing_artifact() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let path = store.interface_path(dir.path(), &iface.name);
        store.write_interface(&path, &iface, &BincodeCodec).unwrap();
        assert!(path.exists());

        let err = store.write_interface(&path, &iface, &FailingEncode).unwrap_err();
        assert!(matches!(err, CacheError::Serialization { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn failed_round_trip_removes_artifact() {
        let (dir, store) = make_store();
        let iface = sealed("A");
        let path = store.interface_path(dir.path(), &iface.name);

        let err = store.write_interface(&path, &iface, &FailingDecode).unwrap_err();
        assert!(matches!(err, CacheError::RoundTrip { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn overwrite_replaces_previous_artifact() {
        let (dir, store) = make_store();
        let first = sealed("A");
        let path = store.interface_path(dir.path(), &first.name);
        store.write_interface(&path, &first, &BincodeCodec).unwrap();

        let mut second = sample_interface("A");
        second.exports.scope.insert("succ".to_string());
        let second = HashLedger::seal(&BincodeCodec, second).unwrap();
        store.write_interface(&path, &second, &BincodeCodec).unwrap();

        let header = store.read_header(&path).unwrap();
        assert_eq!(header.full_hash, second.full_hash);
        assert_ne!(header.full_hash, first.full_hash);
    }
}
