//! Register command implementation.

use crate::errors::CliError;
use crate::output;
use crate::registry::FileRegistry;
use docseal_canonical::HashingService;
use docseal_core::{verification, Registry};
use serde_json::json;

pub async fn run(
    input: String,
    metadata: String,
    registry: String,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = super::read_input(Some(&input))?;
    let candidate = super::read_json(Some(&metadata))?;

    let content_identifier = HashingService::default().content_identifier(&bytes);
    let metadata_identifier = verification::metadata_identifier(&candidate)
        .map_err(|e| format!("Failed to compute metadata identifier: {}", e))?;

    let record_id = FileRegistry::open(&registry)
        .register(&content_identifier, &metadata_identifier)
        .await
        .map_err(CliError::from)?;

    if json_output {
        output::print_json(&json!({
            "record_id": record_id,
            "content_identifier": content_identifier,
            "metadata_identifier": metadata_identifier,
        }))
    } else {
        output::print_row("record_id", record_id.as_str());
        output::print_row("content_identifier", content_identifier.as_str());
        output::print_row("metadata_identifier", metadata_identifier.as_str());
        Ok(())
    }
}
