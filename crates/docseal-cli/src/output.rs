//! Output formatting utilities.

use docseal_core::{LookupOutcome, MetadataRecord};
use serde::Serialize;

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a labelled row.
pub fn print_row(label: &str, value: &str) {
    println!("{:<22} {}", label, value);
}

/// Prints the metadata record as labelled rows.
pub fn print_record(record: &MetadataRecord) {
    print_row("title", &record.title);
    print_row("doc_type", &record.doc_type);
    print_row("date_iso", &record.date_iso);
    print_row("parties", &record.parties.join(", "));
    print_row("tags", &record.tags.join(", "));
    print_row("summary", &truncate(&record.summary, 60));
    print_row("model", &record.model);
    print_row("agent_version", &record.agent_version);
    print_row("extract_confidence", &record.extract_confidence);
    print_row("pages_processed", &record.pages_processed);
    print_row("pdf_text_sha256", &record.pdf_text_sha256);
}

/// Human-readable lookup result.
pub fn describe_lookup(lookup: &LookupOutcome) -> String {
    match lookup {
        LookupOutcome::Found(record) => format!("found (record {})", record),
        LookupOutcome::NotFound => "not found".to_string(),
        LookupOutcome::NotPerformed(reason) => format!("lookup not performed ({})", reason),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
