//! Reproducibility stamping of generated metadata.
//!
//! The stamper asks the generation collaborator for a candidate and attaches
//! provenance: model, model fingerprint, prompt fingerprint, agent version and
//! a fixed-point confidence. When generation is disabled or fails, a
//! deterministic stub built from the text alone takes its place.

use docseal_canonical::{Confidence, HashingService};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::collaborators::Generator;

/// Instructions handed to the generation collaborator.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You extract metadata from a PDF's text. 
Return *valid JSON* with keys: 
- title (string)
- summary (<=120 words, string)
- doc_type (string)
- date_iso (YYYY-MM-DD or empty string)
- parties (array of strings)
- tags (array of strings)
- extract_confidence (0..1 number summarizing your overall extraction confidence)

If unknown, use empty strings/arrays. No extra commentary.";

/// Default generation model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default agent version tag.
pub const DEFAULT_AGENT_VERSION: &str = "v1";

/// UTF-16 code units of text copied into the fallback summary.
pub const STUB_SUMMARY_UNITS: usize = 500;

/// Stamper configuration. Passed explicitly; nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StamperConfig {
    /// Model identifier recorded in every stamp.
    pub model: String,
    /// Agent version recorded in every stamp.
    pub agent_version: String,
    /// Prompt sent to the generator; its fingerprint is recorded.
    pub prompt_template: String,
    /// Whether the generation collaborator may be called at all.
    pub generation_enabled: bool,
}

impl Default for StamperConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            agent_version: DEFAULT_AGENT_VERSION.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            generation_enabled: true,
        }
    }
}

/// Why the fallback stub was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Generation is switched off or no generator is configured.
    Disabled,
    /// The generator returned an error.
    Failed(String),
    /// The generator returned something other than a mapping.
    NotAnObject,
}

/// Outcome of the generation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationStatus {
    /// The collaborator produced the candidate.
    Generated,
    /// The deterministic stub was used.
    Fallback {
        /// Why the stub was used.
        reason: FallbackReason,
    },
}

impl GenerationStatus {
    /// True when the stub replaced the generator output.
    pub fn used_fallback(&self) -> bool {
        matches!(self, GenerationStatus::Fallback { .. })
    }
}

/// A stamped candidate, ready for normalization.
#[derive(Debug, Clone)]
pub struct Stamped {
    /// Candidate mapping including the provenance fields.
    pub candidate: Map<String, Value>,
    /// How the candidate was obtained.
    pub status: GenerationStatus,
}

/// Attaches reproducibility fields to generated metadata.
#[derive(Clone)]
pub struct Stamper {
    config: StamperConfig,
    hashing: HashingService,
    generator: Option<Arc<dyn Generator>>,
}

impl Stamper {
    /// Creates a stamper. With `generator` set to `None`, every stamp uses the stub.
    pub fn new(
        config: StamperConfig,
        hashing: HashingService,
        generator: Option<Arc<dyn Generator>>,
    ) -> Self {
        Self {
            config,
            hashing,
            generator,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &StamperConfig {
        &self.config
    }

    /// Generates (or stubs) a candidate for `text` and stamps it. Never fails.
    pub async fn stamp(&self, text: &str) -> Stamped {
        let (mut candidate, status) = self.generate(text).await;

        let confidence = candidate
            .get("extract_confidence")
            .and_then(Value::as_f64)
            .and_then(Confidence::from_f64)
            .unwrap_or(Confidence::DEFAULT);

        candidate.insert(
            "extract_confidence".to_string(),
            Value::String(confidence.to_string()),
        );
        candidate.insert("model".to_string(), Value::String(self.config.model.clone()));
        candidate.insert(
            "model_hash".to_string(),
            Value::String(self.hashing.fingerprint(&self.config.model).to_string()),
        );
        candidate.insert(
            "prompt_hash".to_string(),
            Value::String(
                self.hashing
                    .fingerprint(&self.config.prompt_template)
                    .to_string(),
            ),
        );
        candidate.insert(
            "agent_version".to_string(),
            Value::String(self.config.agent_version.clone()),
        );

        Stamped { candidate, status }
    }

    async fn generate(&self, text: &str) -> (Map<String, Value>, GenerationStatus) {
        let generator = match (&self.generator, self.config.generation_enabled) {
            (Some(generator), true) => generator,
            _ => {
                debug!("generation disabled, using stub metadata");
                return fallback(text, FallbackReason::Disabled);
            }
        };

        match generator.generate(&self.config.prompt_template, text).await {
            Ok(Value::Object(map)) => (map, GenerationStatus::Generated),
            Ok(other) => {
                warn!(
                    kind = json_kind(&other),
                    "generator returned a non-object, using stub metadata"
                );
                fallback(text, FallbackReason::NotAnObject)
            }
            Err(e) => {
                warn!(error = %e, "generation failed, using stub metadata");
                fallback(text, FallbackReason::Failed(e.to_string()))
            }
        }
    }
}

/// Longest prefix of `text` spanning at most `units` UTF-16 code units.
/// A character whose surrogate pair would straddle the limit is left out.
fn truncate_utf16(text: &str, units: usize) -> String {
    let mut used = 0;
    let mut end = 0;
    for (offset, ch) in text.char_indices() {
        used += ch.len_utf16();
        if used > units {
            break;
        }
        end = offset + ch.len_utf8();
    }
    text[..end].to_string()
}

/// Deterministic placeholder built only from `text`.
pub fn stub_candidate(text: &str) -> Map<String, Value> {
    let summary = truncate_utf16(text, STUB_SUMMARY_UNITS);
    let mut map = Map::new();
    map.insert("title".to_string(), Value::String("Untitled".to_string()));
    map.insert("summary".to_string(), Value::String(summary));
    map.insert("doc_type".to_string(), Value::String("document".to_string()));
    map.insert("date_iso".to_string(), Value::String(String::new()));
    map.insert("parties".to_string(), Value::Array(vec![]));
    map.insert("tags".to_string(), Value::Array(vec![]));
    map
}

fn fallback(text: &str, reason: FallbackReason) -> (Map<String, Value>, GenerationStatus) {
    (stub_candidate(text), GenerationStatus::Fallback { reason })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GenerationError;
    use async_trait::async_trait;
    use serde_json::json;

    struct Fixed(Result<Value, GenerationError>);

    #[async_trait]
    impl Generator for Fixed {
        async fn generate(&self, _prompt: &str, _text: &str) -> Result<Value, GenerationError> {
            self.0.clone()
        }
    }

    fn stamper(generator: Option<Result<Value, GenerationError>>) -> Stamper {
        Stamper::new(
            StamperConfig::default(),
            HashingService::default(),
            generator.map(|r| Arc::new(Fixed(r)) as Arc<dyn Generator>),
        )
    }

    #[tokio::test]
    async fn generated_confidence_is_fixed_point() {
        let stamped = stamper(Some(Ok(json!({"title": "Lease", "extract_confidence": 0.8734}))))
            .stamp("text")
            .await;
        assert_eq!(stamped.status, GenerationStatus::Generated);
        assert_eq!(stamped.candidate["extract_confidence"], "0.873");
        assert_eq!(stamped.candidate["title"], "Lease");
    }

    #[tokio::test]
    async fn non_numeric_confidence_defaults() {
        let stamped = stamper(Some(Ok(json!({"extract_confidence": "high"}))))
            .stamp("text")
            .await;
        assert_eq!(stamped.candidate["extract_confidence"], "0.500");
    }

    #[tokio::test]
    async fn failure_falls_back_to_stub() {
        let stamped = stamper(Some(Err(GenerationError::Timeout)))
            .stamp("hello world")
            .await;
        assert!(stamped.status.used_fallback());
        assert_eq!(
            stamped.status,
            GenerationStatus::Fallback {
                reason: FallbackReason::Failed("generation service timed out".to_string())
            }
        );
        assert_eq!(stamped.candidate["title"], "Untitled");
        assert_eq!(stamped.candidate["summary"], "hello world");
        assert_eq!(stamped.candidate["extract_confidence"], "0.500");
    }

    #[tokio::test]
    async fn non_object_response_falls_back() {
        let stamped = stamper(Some(Ok(json!(["not", "a", "map"])))).stamp("t").await;
        assert_eq!(
            stamped.status,
            GenerationStatus::Fallback {
                reason: FallbackReason::NotAnObject
            }
        );
    }

    #[tokio::test]
    async fn disabled_generation_never_calls_generator() {
        let config = StamperConfig {
            generation_enabled: false,
            ..StamperConfig::default()
        };
        let stamper = Stamper::new(
            config,
            HashingService::default(),
            Some(Arc::new(Fixed(Ok(json!({"title": "Generated"})))) as Arc<dyn Generator>),
        );
        let stamped = stamper.stamp("abc").await;
        assert_eq!(stamped.candidate["title"], "Untitled");
        assert_eq!(
            stamped.status,
            GenerationStatus::Fallback {
                reason: FallbackReason::Disabled
            }
        );
    }

    #[tokio::test]
    async fn provenance_overrides_generator_fields() {
        let stamped = stamper(Some(Ok(json!({"model": "spoofed", "model_hash": "0x00"}))))
            .stamp("t")
            .await;
        let hashing = HashingService::default();
        assert_eq!(stamped.candidate["model"], DEFAULT_MODEL);
        assert_eq!(
            stamped.candidate["model_hash"],
            hashing.fingerprint(DEFAULT_MODEL).as_str()
        );
        assert_eq!(
            stamped.candidate["prompt_hash"],
            hashing.fingerprint(DEFAULT_PROMPT_TEMPLATE).as_str()
        );
        assert_eq!(stamped.candidate["agent_version"], DEFAULT_AGENT_VERSION);
    }

    #[test]
    fn stub_summary_is_truncated_by_utf16_units() {
        let text = "é".repeat(STUB_SUMMARY_UNITS + 10);
        let stub = stub_candidate(&text);
        assert_eq!(
            stub["summary"].as_str().unwrap().chars().count(),
            STUB_SUMMARY_UNITS
        );
        assert_eq!(stub["date_iso"], "");
    }

    #[test]
    fn stub_summary_counts_astral_characters_twice() {
        // 499 units of ASCII leave room for one unit, not a surrogate pair.
        let text = format!("{}\u{1F600}tail", "a".repeat(STUB_SUMMARY_UNITS - 1));
        let stub = stub_candidate(&text);
        assert_eq!(stub["summary"], "a".repeat(STUB_SUMMARY_UNITS - 1));

        let text = "\u{1F600}".repeat(STUB_SUMMARY_UNITS);
        let summary = stub_candidate(&text)["summary"].as_str().unwrap().to_string();
        assert_eq!(summary.chars().count(), STUB_SUMMARY_UNITS / 2);
        assert_eq!(summary.encode_utf16().count(), STUB_SUMMARY_UNITS);
    }
}
