//! Notarization pipeline and verification protocol for docseal.
//!
//! This crate provides:
//! - The metadata schema and its total normalizer
//! - Reproducibility stamping with a deterministic fallback
//! - The notarization pipeline (extraction through hashing)
//! - Verification by content or by metadata against a registry
//!
//! Core invariants:
//! - The same bytes always yield the same content identifier
//! - Candidates that normalize to the same record yield the same metadata identifier
//! - Any field change, including sequence order, changes the metadata identifier
//! - The core holds no shared state and never writes to a registry
//!
//! ## Quick Start
//!
//! ```rust
//! use docseal_canonical::HashingService;
//! use docseal_core::{
//!     async_trait, Extraction, ExtractionError, Extractor, NotarizationPipeline,
//!     PipelineConfig, Stamper, StamperConfig,
//! };
//! use std::sync::Arc;
//!
//! struct Utf8Extractor;
//!
//! #[async_trait]
//! impl Extractor for Utf8Extractor {
//!     async fn extract(&self, bytes: &[u8], _limit: u32) -> Result<Extraction, ExtractionError> {
//!         let text = String::from_utf8_lossy(bytes).trim().to_string();
//!         Ok(Extraction { text, pages_processed: 1 })
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let hashing = HashingService::default();
//! let stamper = Stamper::new(StamperConfig::default(), hashing.clone(), None);
//! let pipeline = NotarizationPipeline::new(
//!     Arc::new(Utf8Extractor),
//!     stamper,
//!     hashing,
//!     PipelineConfig::default(),
//! );
//! let notarization = pipeline.notarize(b"Lease agreement between A and B").await?;
//! println!("{}", notarization.metadata_identifier);
//! # Ok(())
//! # }
//! ```
//!
#![deny(missing_docs)]

/// Collaborator contracts (extractor, generator, registry).
pub mod collaborators;
/// Error types for core operations.
pub mod errors;
/// Notarization pipeline state machine.
pub mod pipeline;
/// In-memory registry.
pub mod registry;
/// Metadata schema and normalizer.
pub mod schema;
/// Reproducibility stamper.
pub mod stamper;
/// Verification protocol.
pub mod verification;

pub use async_trait::async_trait;
pub use collaborators::{Extraction, Extractor, Generator, RecordRef, Registry};
pub use errors::{
    AbortReason, ExtractionError, GenerationError, PipelineError, RegistryError,
    VerificationError,
};
pub use pipeline::{
    Notarization, NotarizationPipeline, PipelineConfig, PipelineState, ResultEnvelope,
};
pub use registry::MemoryRegistry;
pub use schema::{normalize, normalize_with_report, MetadataRecord, Normalized};
pub use stamper::{FallbackReason, GenerationStatus, Stamped, Stamper, StamperConfig};
pub use verification::{
    ContentVerification, LookupOutcome, MetadataVerification, Verifier,
};
