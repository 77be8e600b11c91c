//! Canonicalize command implementation.

use docseal_canonical::Canonicalizer;
use docseal_core::normalize;

pub fn run(input: Option<String>, normalize_first: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value = super::read_json(input.as_deref())?;
    let canonicalizer = Canonicalizer::new();

    let result = if normalize_first {
        canonicalizer.canonicalize_serialize(&normalize(&value))
    } else {
        canonicalizer.canonicalize(&value)
    }
    .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", result.as_str());
    Ok(())
}
