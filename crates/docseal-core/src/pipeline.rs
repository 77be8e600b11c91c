//! Notarization pipeline.
//!
//! ```text
//! Received → TextExtracted → MetadataGenerated → Stamped → Normalized
//!          → Canonicalized → Hashed → Completed
//! ```
//!
//! Any state may end in `Aborted(reason)`, surfaced as
//! [`PipelineError::Aborted`]. The pipeline invokes only the extraction and
//! generation collaborators and never writes to a registry.

use docseal_canonical::{
    Canonicalizer, ContentIdentifier, HashingService, HygieneReport, MetadataIdentifier,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::collaborators::Extractor;
use crate::errors::{AbortReason, PipelineError};
use crate::schema::{normalize_with_report, MetadataRecord};
use crate::stamper::{GenerationStatus, Stamper};

/// Default number of pages handed to the extractor.
pub const DEFAULT_PAGE_LIMIT: u32 = 30;

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Bytes accepted.
    Received,
    /// Extractor returned non-empty text.
    TextExtracted,
    /// Generator (or stub) produced a candidate.
    MetadataGenerated,
    /// Provenance fields attached.
    Stamped,
    /// Candidate mapped onto the schema.
    Normalized,
    /// Record serialized canonically.
    Canonicalized,
    /// Both identifiers computed.
    Hashed,
    /// Result emitted.
    Completed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Received => "received",
            PipelineState::TextExtracted => "text_extracted",
            PipelineState::MetadataGenerated => "metadata_generated",
            PipelineState::Stamped => "stamped",
            PipelineState::Normalized => "normalized",
            PipelineState::Canonicalized => "canonicalized",
            PipelineState::Hashed => "hashed",
            PipelineState::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum number of pages the extractor may process.
    pub page_limit: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Result envelope: the record fields plus both identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Normalized metadata record.
    #[serde(flatten)]
    pub metadata: MetadataRecord,
    /// Identifier of the raw document bytes.
    pub content_identifier: ContentIdentifier,
    /// Identifier of the canonical metadata.
    pub metadata_identifier: MetadataIdentifier,
}

/// A completed notarization.
#[derive(Debug, Clone)]
pub struct Notarization {
    /// Identifier of the raw document bytes.
    pub content_identifier: ContentIdentifier,
    /// Identifier of the canonical metadata.
    pub metadata_identifier: MetadataIdentifier,
    /// Normalized record that was hashed.
    pub metadata: MetadataRecord,
    /// Canonical serialization of `metadata`.
    pub canonical: String,
    /// Size of the input in bytes.
    pub byte_len: usize,
    /// Pages the extractor processed.
    pub pages_processed: u32,
    /// Whether the generator or the stub produced the candidate.
    pub generation: GenerationStatus,
    /// Degradations from normalization and canonicalization.
    pub hygiene: HygieneReport,
    /// States visited, `Received` through `Completed`.
    pub trace: Vec<PipelineState>,
}

impl Notarization {
    /// Builds the caller-facing envelope.
    pub fn envelope(&self) -> ResultEnvelope {
        ResultEnvelope {
            metadata: self.metadata.clone(),
            content_identifier: self.content_identifier.clone(),
            metadata_identifier: self.metadata_identifier.clone(),
        }
    }

    /// True when the stub replaced generator output.
    pub fn used_fallback(&self) -> bool {
        self.generation.used_fallback()
    }
}

/// Orchestrates extraction, generation, stamping, normalization,
/// canonicalization and hashing for a single document.
///
/// Holds no mutable state; one pipeline may serve concurrent requests.
#[derive(Clone)]
pub struct NotarizationPipeline {
    extractor: Arc<dyn Extractor>,
    stamper: Stamper,
    canonicalizer: Canonicalizer,
    hashing: HashingService,
    config: PipelineConfig,
}

/// Tracks the current state and the path taken through the pipeline.
struct Run {
    trace: Vec<PipelineState>,
}

impl Run {
    fn start() -> Self {
        debug!(state = %PipelineState::Received, "pipeline transition");
        Self {
            trace: vec![PipelineState::Received],
        }
    }

    fn current(&self) -> PipelineState {
        *self.trace.last().unwrap_or(&PipelineState::Received)
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(from = %self.current(), to = %next, "pipeline transition");
        self.trace.push(next);
    }

    fn abort(&self, reason: AbortReason) -> PipelineError {
        debug!(at = %self.current(), reason = reason.code(), "pipeline aborted");
        PipelineError::Aborted {
            at: self.current(),
            reason,
        }
    }
}

impl NotarizationPipeline {
    /// Creates a pipeline. The stamper and the pipeline should share one
    /// [`HashingService`] so fingerprints and identifiers are consistent.
    pub fn new(
        extractor: Arc<dyn Extractor>,
        stamper: Stamper,
        hashing: HashingService,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            stamper,
            canonicalizer: Canonicalizer::new(),
            hashing,
            config,
        }
    }

    /// Pipeline configuration.
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Notarizes `bytes`, producing both identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Aborted`] when extraction fails or yields no
    /// text. No identifier is computed in that case.
    pub async fn notarize(&self, bytes: &[u8]) -> Result<Notarization, PipelineError> {
        let mut run = Run::start();

        let extraction = self
            .extractor
            .extract(bytes, self.config.page_limit)
            .await
            .map_err(|e| run.abort(AbortReason::ExtractionFailed(e.to_string())))?;
        if extraction.text.trim().is_empty() {
            return Err(run.abort(AbortReason::NoExtractableText));
        }
        let pages_processed = extraction.pages_processed.min(self.config.page_limit);
        run.advance(PipelineState::TextExtracted);

        let stamped = self.stamper.stamp(&extraction.text).await;
        run.advance(PipelineState::MetadataGenerated);

        let mut candidate = stamped.candidate;
        candidate.insert(
            "pdf_text_sha256".to_string(),
            Value::String(self.hashing.fingerprint(&extraction.text).to_string()),
        );
        candidate.insert(
            "pages_processed".to_string(),
            Value::String(pages_processed.to_string()),
        );
        run.advance(PipelineState::Stamped);

        let normalized = normalize_with_report(&Value::Object(candidate));
        let mut hygiene = normalized.report;
        run.advance(PipelineState::Normalized);

        let canonical = self
            .canonicalizer
            .canonicalize_serialize(&normalized.record)
            .map_err(|e| run.abort(AbortReason::UnsupportedType(e.to_string())))?;
        hygiene.merge(canonical.report);
        run.advance(PipelineState::Canonicalized);

        let content_identifier = self.hashing.content_identifier(bytes);
        let metadata_identifier = self.hashing.metadata_identifier(&canonical.bytes);
        run.advance(PipelineState::Hashed);

        let canonical = String::from_utf8(canonical.bytes)
            .map_err(|e| run.abort(AbortReason::UnsupportedType(e.to_string())))?;
        run.advance(PipelineState::Completed);

        info!(
            content_identifier = %content_identifier,
            metadata_identifier = %metadata_identifier,
            used_fallback = stamped.status.used_fallback(),
            "notarization completed"
        );

        Ok(Notarization {
            content_identifier,
            metadata_identifier,
            metadata: normalized.record,
            canonical,
            byte_len: bytes.len(),
            pages_processed,
            generation: stamped.status,
            hygiene,
            trace: run.trace,
        })
    }
}
