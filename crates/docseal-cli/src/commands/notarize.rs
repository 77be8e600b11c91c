//! Notarize command implementation.

use crate::errors::CliError;
use crate::extractor::TextExtractor;
use crate::generator::StaticGenerator;
use crate::output;
use crate::settings::StampArgs;
use docseal_canonical::HashingService;
use docseal_core::{Generator, NotarizationPipeline, PipelineError, Stamper};
use serde_json::json;
use std::sync::Arc;

pub async fn run(
    input: String,
    candidate: Option<String>,
    stamp: StampArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = super::read_input(Some(&input))?;

    let generator: Option<Arc<dyn Generator>> = match candidate {
        Some(path) => Some(Arc::new(StaticGenerator::from_file(&path)?) as Arc<dyn Generator>),
        None => None,
    };

    let hashing = HashingService::default();
    let stamper = Stamper::new(stamp.stamper_config()?, hashing.clone(), generator);
    let pipeline = NotarizationPipeline::new(
        Arc::new(TextExtractor),
        stamper,
        hashing,
        stamp.pipeline_config(),
    );

    let notarization = match pipeline.notarize(&bytes).await {
        Ok(notarization) => notarization,
        Err(err) => {
            if json_output {
                let PipelineError::Aborted { at, reason } = &err;
                output::print_json(&json!({
                    "ok": false,
                    "error": reason.code(),
                    "state": at,
                }))?;
            }
            return Err(CliError::from(err).into());
        }
    };

    if json_output {
        return output::print_json(&notarization.envelope());
    }

    output::print_row("content_identifier", notarization.content_identifier.as_str());
    output::print_row("metadata_identifier", notarization.metadata_identifier.as_str());
    output::print_row("bytes", &notarization.byte_len.to_string());
    output::print_row("canonical_len", &notarization.canonical.len().to_string());
    output::print_row(
        "generation",
        if notarization.used_fallback() {
            "fallback"
        } else {
            "generated"
        },
    );
    println!("{}", "-".repeat(70));
    output::print_record(&notarization.metadata);
    for warning in &notarization.hygiene.warnings {
        tracing::debug!(warning = warning.as_str(), "normalization hygiene");
    }
    Ok(())
}
