use thiserror::Error;

use crate::pipeline::PipelineState;

/// Reason a notarization reached the `Aborted` terminal state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The extractor returned no text.
    #[error("no extractable text in document")]
    NoExtractableText,
    /// The extractor itself failed.
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),
    /// A non-canonical value reached the serializer.
    #[error("unsupported value in canonical form: {0}")]
    UnsupportedType(String),
}

impl AbortReason {
    /// Stable machine-readable code for callers.
    pub fn code(&self) -> &'static str {
        match self {
            AbortReason::NoExtractableText => "no_extractable_text",
            AbortReason::ExtractionFailed(_) => "extraction_failed",
            AbortReason::UnsupportedType(_) => "unsupported_type",
        }
    }
}

/// Errors surfaced by the notarization pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The pipeline stopped before `Completed`.
    #[error("notarization aborted after {at}: {reason}")]
    Aborted {
        /// Last state reached before aborting.
        at: PipelineState,
        /// Why the pipeline aborted.
        reason: AbortReason,
    },
}

impl PipelineError {
    /// Abort reason carried by the error.
    pub fn reason(&self) -> &AbortReason {
        match self {
            PipelineError::Aborted { reason, .. } => reason,
        }
    }
}

/// Errors reported by an extraction collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The input could not be parsed as a document.
    #[error("unreadable document: {0}")]
    Unreadable(String),
}

/// Errors reported by a metadata generation collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The service could not be reached.
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    /// The service did not answer in time.
    #[error("generation service timed out")]
    Timeout,
}

/// Errors reported by a registry collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry could not be queried.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
    /// The content identifier is already bound to different metadata.
    #[error("content {content_identifier} already registered as {record_id}")]
    Conflict {
        /// Content identifier that was already present.
        content_identifier: String,
        /// Existing record.
        record_id: String,
    },
}

/// Errors surfaced by the verification protocol.
#[derive(Error, Debug)]
pub enum VerificationError {
    /// The normalized record could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] docseal_canonical::CanonicalizationError),
}
