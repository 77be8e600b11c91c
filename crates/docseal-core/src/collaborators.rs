//! Contracts for the external collaborators the core calls out to.
//!
//! These are the only suspension points in the core: extraction, metadata
//! generation and registry lookups. Timeouts and retries belong to the
//! implementations; the core treats any error as a collaborator failure.

use async_trait::async_trait;
use docseal_canonical::{ContentIdentifier, MetadataIdentifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::{ExtractionError, GenerationError, RegistryError};

/// Text extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted text; empty when nothing could be extracted.
    pub text: String,
    /// Number of pages actually processed (at most the page limit).
    pub pages_processed: u32,
}

/// Turns document bytes into text.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts text from at most `page_limit` pages of `bytes`.
    async fn extract(&self, bytes: &[u8], page_limit: u32) -> Result<Extraction, ExtractionError>;
}

/// Produces an unstructured candidate metadata mapping from text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a candidate for `text` using `prompt` as instructions.
    async fn generate(&self, prompt: &str, text: &str) -> Result<Value, GenerationError>;
}

/// Opaque reference to a registered record (e.g. a token id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordRef(String);

impl RecordRef {
    /// Wraps a record reference.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reverse-lookup registry keyed by identifier.
///
/// `register` is never called by the core; it exists for the caller's
/// explicit registration step after reviewing a notarization.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Finds the record registered for a content identifier.
    async fn lookup_by_content_id(
        &self,
        id: &ContentIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError>;

    /// Finds the record registered for a metadata identifier.
    async fn lookup_by_metadata_id(
        &self,
        id: &MetadataIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError>;

    /// Registers a content/metadata identifier pair.
    async fn register(
        &self,
        content: &ContentIdentifier,
        metadata: &MetadataIdentifier,
    ) -> Result<RecordRef, RegistryError>;
}
