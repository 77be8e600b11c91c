//! Metadata schema and the normalizer that maps arbitrary candidates onto it.
//!
//! Normalization is total: any JSON value produces a schema-conformant
//! [`MetadataRecord`]. Missing or null fields become empty strings (or empty
//! sequences), scalars are coerced to strings, and every degradation is
//! recorded in a [`HygieneReport`].

use docseal_canonical::{HygieneReport, HygieneWarning};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String fields of the schema, in declaration order.
pub const STRING_FIELDS: [&str; 11] = [
    "title",
    "summary",
    "doc_type",
    "date_iso",
    "model",
    "model_hash",
    "prompt_hash",
    "agent_version",
    "extract_confidence",
    "pdf_text_sha256",
    "pages_processed",
];

/// Sequence fields of the schema.
pub const SEQUENCE_FIELDS: [&str; 2] = ["parties", "tags"];

/// Normalized metadata record, the canonical unit of truth.
///
/// Every field is a string or an ordered sequence of strings. Sequence order
/// is significant and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Document title.
    pub title: String,
    /// Short summary.
    pub summary: String,
    /// Document type (e.g. `lease`, `invoice`).
    pub doc_type: String,
    /// ISO calendar date (`YYYY-MM-DD`) or empty.
    pub date_iso: String,
    /// Parties named in the document.
    pub parties: Vec<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Generation model identifier.
    pub model: String,
    /// Fingerprint of `model`.
    pub model_hash: String,
    /// Fingerprint of the prompt template.
    pub prompt_hash: String,
    /// Agent version tag.
    pub agent_version: String,
    /// Confidence with three fractional digits.
    pub extract_confidence: String,
    /// Fingerprint of the extracted text.
    pub pdf_text_sha256: String,
    /// Number of pages processed, as a decimal string.
    pub pages_processed: String,
}

/// Output of [`normalize_with_report`].
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Schema-conformant record.
    pub record: MetadataRecord,
    /// Degradations applied while normalizing.
    pub report: HygieneReport,
}

/// Normalizes an arbitrary candidate into a [`MetadataRecord`].
///
/// # Example
///
/// ```rust
/// use docseal_core::schema::normalize;
/// use serde_json::json;
///
/// let record = normalize(&json!({"title": "  Lease ", "parties": ["A", "B"], "extra": 1}));
/// assert_eq!(record.title, "Lease");
/// assert_eq!(record.parties, vec!["A", "B"]);
/// assert_eq!(record.summary, "");
/// ```
pub fn normalize(candidate: &Value) -> MetadataRecord {
    normalize_with_report(candidate).record
}

/// Normalizes a candidate and reports what was defaulted or coerced.
pub fn normalize_with_report(candidate: &Value) -> Normalized {
    let mut report = HygieneReport::default();
    let empty = Map::new();
    let fields = match candidate {
        Value::Object(map) => map,
        _ => {
            report.degrade(HygieneWarning::new("NotAnObject"), "non_object_candidates");
            &empty
        }
    };

    let mut text = |name: &str| scalar_field(fields.get(name), name, &mut report);
    let title = text("title");
    let summary = text("summary");
    let doc_type = text("doc_type");
    let date_iso = text("date_iso");
    let model = text("model");
    let model_hash = text("model_hash");
    let prompt_hash = text("prompt_hash");
    let agent_version = text("agent_version");
    let extract_confidence = text("extract_confidence");
    let pdf_text_sha256 = text("pdf_text_sha256");
    let pages_processed = text("pages_processed");

    let parties = sequence_field(fields.get("parties"), "parties", &mut report);
    let tags = sequence_field(fields.get("tags"), "tags", &mut report);

    Normalized {
        record: MetadataRecord {
            title,
            summary,
            doc_type,
            date_iso,
            parties,
            tags,
            model,
            model_hash,
            prompt_hash,
            agent_version,
            extract_confidence,
            pdf_text_sha256,
            pages_processed,
        },
        report,
    }
}

fn scalar_field(value: Option<&Value>, name: &str, report: &mut HygieneReport) -> String {
    match value {
        None | Some(Value::Null) => {
            report.degrade(HygieneWarning::for_field("MissingField", name), "missing_fields");
            String::new()
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            report.degrade(HygieneWarning::for_field("CoercedField", name), "coerced_fields");
            coerce(other).trim().to_string()
        }
    }
}

fn sequence_field(value: Option<&Value>, name: &str, report: &mut HygieneReport) -> Vec<String> {
    match value {
        None | Some(Value::Null) => {
            report.degrade(HygieneWarning::for_field("MissingField", name), "missing_fields");
            Vec::new()
        }
        Some(Value::Array(items)) => items.iter().map(coerce).collect(),
        Some(_) => {
            // Scalars are never wrapped into a one-element sequence.
            report.degrade(
                HygieneWarning::for_field("DroppedSequence", name),
                "dropped_sequences",
            );
            Vec::new()
        }
    }
}

/// String form of a JSON value, following JavaScript `String(value)`:
/// numbers use the shortest round-trip digits, arrays join their elements
/// with `,` and objects collapse to `[object Object]`.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n
            .as_f64()
            .map(number_to_string)
            .unwrap_or_else(|| n.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Number-to-string conversion with JavaScript's layout rules: plain
/// decimals for exponents in `[-7, 21)`, otherwise `d.ddde+x` form.
fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", number_to_string(-value));
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. `1.2345e3`.
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => return scientific,
    };
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (n - 1).abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseal_canonical::HygieneStatus;
    use serde_json::json;

    #[test]
    fn missing_fields_default_to_empty() {
        let normalized = normalize_with_report(&json!({}));
        assert_eq!(normalized.record, MetadataRecord::default());
        assert_eq!(normalized.report.status, HygieneStatus::Lossy);
        assert_eq!(
            normalized.report.metrics["missing_fields"],
            (STRING_FIELDS.len() + SEQUENCE_FIELDS.len()) as u64
        );
    }

    #[test]
    fn complete_candidate_is_clean() {
        let mut candidate = Map::new();
        for field in STRING_FIELDS {
            candidate.insert(field.to_string(), json!("x"));
        }
        for field in SEQUENCE_FIELDS {
            candidate.insert(field.to_string(), json!([]));
        }
        let normalized = normalize_with_report(&Value::Object(candidate));
        assert!(normalized.report.is_clean());
        assert_eq!(normalized.record.title, "x");
    }

    #[test]
    fn scalars_are_coerced_and_trimmed() {
        let record = normalize(&json!({
            "title": "  Lease  ",
            "pages_processed": 4,
            "extract_confidence": 0.5,
            "doc_type": true,
            "summary": null,
        }));
        assert_eq!(record.title, "Lease");
        assert_eq!(record.pages_processed, "4");
        assert_eq!(record.extract_confidence, "0.5");
        assert_eq!(record.doc_type, "true");
        assert_eq!(record.summary, "");
    }

    #[test]
    fn sequence_elements_are_stringified_not_trimmed() {
        let record = normalize(&json!({"parties": [" A ", 1, null, false], "tags": ["x", "x"]}));
        assert_eq!(record.parties, vec![" A ", "1", "null", "false"]);
        assert_eq!(record.tags, vec!["x", "x"]);
    }

    #[test]
    fn values_are_stringified_like_javascript() {
        let record = normalize(&json!({
            "pages_processed": 4.0,
            "title": ["A", "B"],
            "summary": {"a": 1},
            "parties": [["A", "B"], {"a": 1}, [1, null, [2, 3]]],
        }));
        assert_eq!(record.pages_processed, "4");
        assert_eq!(record.title, "A,B");
        assert_eq!(record.summary, "[object Object]");
        assert_eq!(record.parties, vec!["A,B", "[object Object]", "1,,2,3"]);
    }

    #[test]
    fn numbers_follow_javascript_layout() {
        assert_eq!(number_to_string(4.0), "4");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(123.456), "123.456");
        assert_eq!(number_to_string(-2.5), "-2.5");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.25e22), "1.25e+22");
    }

    #[test]
    fn scalar_sequences_are_dropped_not_wrapped() {
        let normalized = normalize_with_report(&json!({"parties": "A", "tags": {"a": "b"}}));
        assert!(normalized.record.parties.is_empty());
        assert!(normalized.record.tags.is_empty());
        assert_eq!(normalized.report.metrics["dropped_sequences"], 2);
    }

    #[test]
    fn non_object_candidates_normalize_to_defaults() {
        for candidate in [json!(null), json!("text"), json!([1, 2]), json!(42)] {
            assert_eq!(normalize(&candidate), MetadataRecord::default());
        }
    }

    #[test]
    fn normalizing_a_normalized_record_is_identity() {
        let record = normalize(&json!({"title": "Lease", "parties": ["A", "B"], "junk": 1}));
        let again = normalize(&serde_json::to_value(&record).unwrap());
        assert_eq!(again, record);
    }
}
