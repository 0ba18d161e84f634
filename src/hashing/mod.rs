//! Snapshot fingerprints.
//!
//! A fingerprint is a BLAKE3 digest over every artifact of a loaded snapshot. It is
//! logged at startup and reported by the readiness probe so operators can tell which
//! model build a process is serving.

use blake3::Hasher;

/// Number of hex characters shown by [`SnapshotFingerprint::short`].
pub const SHORT_FINGERPRINT_LEN: usize = 16;

/// Incremental hasher over labelled snapshot sections.
///
/// Each section is framed by its label and byte length so that moving bytes between
/// sections changes the digest.
pub struct SnapshotHasher {
    hasher: Hasher,
}

impl SnapshotHasher {
    pub fn new() -> Self {
        Self {
            hasher: Hasher::new(),
        }
    }

    pub fn update(&mut self, label: &str, bytes: &[u8]) -> &mut Self {
        self.hasher.update(label.as_bytes());
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    pub fn finalize(&self) -> SnapshotFingerprint {
        SnapshotFingerprint {
            bytes: *self.hasher.finalize().as_bytes(),
        }
    }
}

impl Default for SnapshotHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// 32-byte BLAKE3 digest of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotFingerprint {
    bytes: [u8; 32],
}

impl SnapshotFingerprint {
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.bytes).to_hex().to_string()
    }

    /// Leading hex characters, enough to tell builds apart in logs.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_FINGERPRINT_LEN);
        hex
    }
}

impl std::fmt::Display for SnapshotFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
