//! Canonical serialization and hashing primitives for docseal notarization.
//!
//! Everything that decides the bytes of an identifier lives in this crate:
//! the canonical serializer, the two hash families, the identifier newtypes
//! and the fixed-point confidence encoding. Two implementations that agree
//! on this crate agree on every identifier.
//!
#![deny(missing_docs)]

/// Deterministic, key-sorted serialization of normalized values.
pub mod canonicalizer;
/// Confidence values encoded as fixed three-decimal strings.
pub mod confidence;
/// Hex digest primitives.
pub mod digest;
/// Byte-content and fingerprint hash families.
pub mod hashing;
/// Hygiene report types emitted during normalization and canonicalization.
pub mod hygiene;
/// Content and metadata identifiers.
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, CanonicalizationResult, Canonicalizer};
pub use confidence::Confidence;
pub use digest::{Digest, DigestAlg};
pub use hashing::{HashingService, Hasher, Keccak256Hasher, Sha256Hasher};
pub use hygiene::{HygieneReport, HygieneStatus, HygieneWarning};
pub use identifiers::{ContentIdentifier, MetadataIdentifier};
pub use validation::ValidationError;
