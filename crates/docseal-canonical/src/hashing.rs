//! The two hash families behind docseal identifiers.
//!
//! - Byte-content hash: Keccak-256 over raw file bytes (content identifier)
//!   and over canonical metadata bytes (metadata identifier).
//! - Fingerprint hash: SHA-256 over UTF-8 text (`pdf_text_sha256`,
//!   `model_hash`, `prompt_hash`).
//!
//! Both are reached through [`Hasher`] so either primitive can be replaced
//! without touching callers. Changing a primitive changes every identifier
//! it produces.

use sha2::{Digest as Sha2Digest, Sha256};
use sha3::Keccak256;
use std::sync::Arc;

use crate::digest::{Digest, DigestAlg};
use crate::identifiers::{ContentIdentifier, MetadataIdentifier};

/// A fixed 256-bit hash function with hex output.
pub trait Hasher: Send + Sync {
    /// Algorithm this hasher implements.
    fn alg(&self) -> DigestAlg;

    /// Hashes raw bytes.
    fn digest(&self, bytes: &[u8]) -> Digest;

    /// Hashes the UTF-8 encoding of `text`.
    fn digest_str(&self, text: &str) -> Digest {
        self.digest(text.as_bytes())
    }
}

/// Keccak-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn alg(&self) -> DigestAlg {
        DigestAlg::Keccak256
    }

    fn digest(&self, bytes: &[u8]) -> Digest {
        let mut hasher = Keccak256::new();
        hasher.update(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Digest::from_bytes(out)
    }
}

/// SHA-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn alg(&self) -> DigestAlg {
        DigestAlg::Sha256
    }

    fn digest(&self, bytes: &[u8]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Digest::from_bytes(out)
    }
}

/// Pairs a byte-content hasher with a fingerprint hasher.
///
/// The default pairing is Keccak-256 for content and SHA-256 for fingerprints.
///
/// # Example
///
/// ```rust
/// use docseal_canonical::HashingService;
///
/// let hashing = HashingService::default();
/// let id = hashing.content_identifier(b"hello");
/// assert_eq!(
///     id.as_str(),
///     "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
/// );
/// ```
#[derive(Clone)]
pub struct HashingService {
    content: Arc<dyn Hasher>,
    fingerprint: Arc<dyn Hasher>,
}

impl Default for HashingService {
    fn default() -> Self {
        Self::new(Arc::new(Keccak256Hasher), Arc::new(Sha256Hasher))
    }
}

impl std::fmt::Debug for HashingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashingService")
            .field("content", &self.content.alg())
            .field("fingerprint", &self.fingerprint.alg())
            .finish()
    }
}

impl HashingService {
    /// Builds a service from explicit hashers.
    pub fn new(content: Arc<dyn Hasher>, fingerprint: Arc<dyn Hasher>) -> Self {
        Self {
            content,
            fingerprint,
        }
    }

    /// Algorithm used for content and metadata identifiers.
    pub fn content_alg(&self) -> DigestAlg {
        self.content.alg()
    }

    /// Algorithm used for text fingerprints.
    pub fn fingerprint_alg(&self) -> DigestAlg {
        self.fingerprint.alg()
    }

    /// Identifier of raw document bytes.
    pub fn content_identifier(&self, bytes: &[u8]) -> ContentIdentifier {
        ContentIdentifier::new(self.content.digest(bytes))
    }

    /// Identifier of canonical metadata bytes.
    pub fn metadata_identifier(&self, canonical: &[u8]) -> MetadataIdentifier {
        MetadataIdentifier::new(self.content.digest(canonical))
    }

    /// Fingerprint of a text value (extracted text, model name, prompt).
    pub fn fingerprint(&self, text: &str) -> Digest {
        self.fingerprint.digest_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input_matches_known_vector() {
        assert_eq!(
            Keccak256Hasher.digest(b"").as_str(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn sha256_of_abc_matches_known_vector() {
        assert_eq!(
            Sha256Hasher.digest_str("abc").as_str(),
            "0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn families_differ_for_same_input() {
        let hashing = HashingService::default();
        let content = hashing.content_identifier(b"abc");
        let fingerprint = hashing.fingerprint("abc");
        assert_ne!(content.as_str(), fingerprint.as_str());
        assert_eq!(hashing.content_alg(), DigestAlg::Keccak256);
        assert_eq!(hashing.fingerprint_alg(), DigestAlg::Sha256);
    }

    #[test]
    fn hashers_can_be_swapped() {
        let hashing = HashingService::new(Arc::new(Sha256Hasher), Arc::new(Sha256Hasher));
        assert_eq!(
            hashing.content_identifier(b"abc").as_str(),
            hashing.fingerprint("abc").as_str()
        );
    }
}
