//! Verification protocol: recompute an identifier, then reverse-look it up.
//!
//! Both entry points are idempotent and side-effect free on the core side.
//! A missing or failing registry yields [`LookupOutcome::NotPerformed`],
//! which is distinct from a lookup that found nothing.

use docseal_canonical::{
    CanonicalizationError, Canonicalizer, ContentIdentifier, HashingService, MetadataIdentifier,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::collaborators::{RecordRef, Registry};
use crate::errors::{RegistryError, VerificationError};
use crate::schema::{normalize, MetadataRecord};

/// Reason recorded when no registry is configured.
pub const REGISTRY_NOT_CONFIGURED: &str = "registry not configured";

/// Result of a reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "LookupView")]
pub enum LookupOutcome {
    /// A record is registered for the identifier.
    Found(RecordRef),
    /// The registry answered and holds no record for the identifier.
    NotFound,
    /// The lookup did not happen (no registry, or registry unavailable).
    NotPerformed(String),
}

impl LookupOutcome {
    /// True when a record was found.
    pub fn found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    /// The record, when found.
    pub fn record_id(&self) -> Option<&RecordRef> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            _ => None,
        }
    }

    /// True when the registry was actually consulted.
    pub fn performed(&self) -> bool {
        !matches!(self, LookupOutcome::NotPerformed(_))
    }
}

/// Wire shape of a [`LookupOutcome`].
#[derive(Serialize)]
struct LookupView {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    record_id: Option<RecordRef>,
    lookup_performed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<LookupOutcome> for LookupView {
    fn from(outcome: LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found(record) => LookupView {
                found: true,
                record_id: Some(record),
                lookup_performed: true,
                reason: None,
            },
            LookupOutcome::NotFound => LookupView {
                found: false,
                record_id: None,
                lookup_performed: true,
                reason: None,
            },
            LookupOutcome::NotPerformed(reason) => LookupView {
                found: false,
                record_id: None,
                lookup_performed: false,
                reason: Some(reason),
            },
        }
    }
}

/// Verification of raw document bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentVerification {
    /// Recomputed identifier.
    pub content_identifier: ContentIdentifier,
    /// Registry answer.
    #[serde(flatten)]
    pub lookup: LookupOutcome,
}

/// Verification of a metadata candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataVerification {
    /// Recomputed identifier.
    pub metadata_identifier: MetadataIdentifier,
    /// Record the identifier was computed from.
    #[serde(skip)]
    pub metadata: MetadataRecord,
    /// Registry answer.
    #[serde(flatten)]
    pub lookup: LookupOutcome,
}

/// Recomputes identifiers and checks them against a registry.
#[derive(Clone)]
pub struct Verifier {
    registry: Option<Arc<dyn Registry>>,
    canonicalizer: Canonicalizer,
    hashing: HashingService,
}

impl Verifier {
    /// Creates a verifier. Without a registry every lookup is `NotPerformed`.
    pub fn new(registry: Option<Arc<dyn Registry>>, hashing: HashingService) -> Self {
        Self {
            registry,
            canonicalizer: Canonicalizer::new(),
            hashing,
        }
    }

    /// Verifies document bytes by content identifier.
    pub async fn verify_content(&self, bytes: &[u8]) -> ContentVerification {
        let content_identifier = self.hashing.content_identifier(bytes);
        let lookup = match &self.registry {
            Some(registry) => {
                settle(registry.lookup_by_content_id(&content_identifier).await)
            }
            None => LookupOutcome::NotPerformed(REGISTRY_NOT_CONFIGURED.to_string()),
        };
        debug!(
            content_identifier = %content_identifier,
            found = lookup.found(),
            "content verification"
        );
        ContentVerification {
            content_identifier,
            lookup,
        }
    }

    /// Verifies a (possibly partial) metadata candidate.
    ///
    /// The candidate is normalized exactly as during notarization, so any
    /// field drift, including sequence order, produces a non-match.
    pub async fn verify_metadata(
        &self,
        candidate: &Value,
    ) -> Result<MetadataVerification, VerificationError> {
        let metadata = normalize(candidate);
        let metadata_identifier = self.metadata_identifier_of(&metadata)?;
        let lookup = match &self.registry {
            Some(registry) => {
                settle(registry.lookup_by_metadata_id(&metadata_identifier).await)
            }
            None => LookupOutcome::NotPerformed(REGISTRY_NOT_CONFIGURED.to_string()),
        };
        debug!(
            metadata_identifier = %metadata_identifier,
            found = lookup.found(),
            "metadata verification"
        );
        Ok(MetadataVerification {
            metadata_identifier,
            metadata,
            lookup,
        })
    }

    fn metadata_identifier_of(
        &self,
        record: &MetadataRecord,
    ) -> Result<MetadataIdentifier, CanonicalizationError> {
        let canonical = self.canonicalizer.canonicalize_serialize(record)?;
        Ok(self.hashing.metadata_identifier(&canonical.bytes))
    }
}

fn settle(result: Result<Option<RecordRef>, RegistryError>) -> LookupOutcome {
    match result {
        Ok(Some(record)) => LookupOutcome::Found(record),
        Ok(None) => LookupOutcome::NotFound,
        Err(e) => {
            warn!(error = %e, "registry lookup not performed");
            LookupOutcome::NotPerformed(e.to_string())
        }
    }
}

/// Content identifier of `bytes` under the default hash families.
pub fn content_identifier(bytes: &[u8]) -> ContentIdentifier {
    HashingService::default().content_identifier(bytes)
}

/// Metadata identifier of a candidate under the default hash families.
///
/// # Example
///
/// ```rust
/// use docseal_core::verification::metadata_identifier;
/// use serde_json::json;
///
/// let forward = metadata_identifier(&json!({"title": "Lease", "tags": ["a"]}))?;
/// let reverse = metadata_identifier(&json!({"tags": ["a"], "title": "Lease"}))?;
/// assert_eq!(forward, reverse);
/// # Ok::<(), docseal_canonical::CanonicalizationError>(())
/// ```
pub fn metadata_identifier(candidate: &Value) -> Result<MetadataIdentifier, CanonicalizationError> {
    let record = normalize(candidate);
    let canonical = Canonicalizer::new().canonicalize_serialize(&record)?;
    Ok(HashingService::default().metadata_identifier(&canonical.bytes))
}
