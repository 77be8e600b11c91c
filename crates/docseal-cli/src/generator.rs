//! Generator that answers with a fixed candidate read from disk.

use docseal_core::{async_trait, GenerationError, Generator};
use serde_json::Value;

/// Returns the same candidate for every document.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    candidate: Value,
}

impl StaticGenerator {
    /// Loads the candidate from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read candidate {}: {}", path, e))?;
        let candidate: Value =
            serde_json::from_str(&raw).map_err(|e| format!("Invalid candidate JSON: {}", e))?;
        Ok(Self { candidate })
    }
}

#[async_trait]
impl Generator for StaticGenerator {
    async fn generate(&self, _prompt: &str, _text: &str) -> Result<Value, GenerationError> {
        Ok(self.candidate.clone())
    }
}
