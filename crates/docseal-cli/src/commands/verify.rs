//! Verify command implementations.

use crate::output;
use crate::registry::FileRegistry;
use docseal_canonical::HashingService;
use docseal_core::{LookupOutcome, Registry, Verifier};
use std::sync::Arc;

/// Exit code for a completed lookup that did not match under `--strict`.
const EXIT_NOT_FOUND: i32 = 2;

fn make_verifier(registry: Option<String>) -> Verifier {
    let registry = registry.map(|path| Arc::new(FileRegistry::open(path)) as Arc<dyn Registry>);
    Verifier::new(registry, HashingService::default())
}

pub async fn run_file(
    input: String,
    registry: Option<String>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = super::read_input(Some(&input))?;
    let result = make_verifier(registry).verify_content(&bytes).await;

    if json_output {
        output::print_json(&result)?;
    } else {
        output::print_row("content_identifier", result.content_identifier.as_str());
        output::print_row("result", &output::describe_lookup(&result.lookup));
    }
    finish(&result.lookup, strict);
    Ok(())
}

pub async fn run_meta(
    input: String,
    registry: Option<String>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let candidate = super::read_json(Some(&input))?;
    let result = make_verifier(registry)
        .verify_metadata(&candidate)
        .await
        .map_err(|e| format!("Verification failed: {}", e))?;

    if json_output {
        output::print_json(&result)?;
    } else {
        output::print_row("metadata_identifier", result.metadata_identifier.as_str());
        output::print_row("result", &output::describe_lookup(&result.lookup));
    }
    finish(&result.lookup, strict);
    Ok(())
}

fn finish(lookup: &LookupOutcome, strict: bool) {
    if strict && !lookup.found() {
        std::process::exit(EXIT_NOT_FOUND);
    }
}
