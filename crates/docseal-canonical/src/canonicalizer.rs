use serde::Serialize;
use serde_json::Value;

use crate::hygiene::{HygieneReport, HygieneWarning};
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// A value outside {string, sequence, mapping, null} reached the serializer.
    /// Numbers and booleans must be stringified by normalization first.
    #[error("unsupported {kind} value at {path}")]
    UnsupportedType {
        /// JSON path of the offending value.
        path: String,
        /// JSON kind that was rejected (`number` or `boolean`).
        kind: &'static str,
    },
    /// The input could not be turned into a JSON value.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result of canonicalization.
#[derive(Debug)]
pub struct CanonicalizationResult {
    /// Canonical UTF-8 bytes for the input value.
    pub bytes: Vec<u8>,
    /// Hygiene report for the serialization pass.
    pub report: HygieneReport,
}

impl CanonicalizationResult {
    /// Canonical form as a string slice.
    pub fn as_str(&self) -> &str {
        // Bytes are only ever produced from a `String`.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Helper for building JSON paths in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "root.{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes.
///
/// Rules:
/// - mappings: keys in ascending byte order, `"key":value` pairs joined by `,`
/// - sequences: element order preserved, joined by `,`
/// - strings: JSON-quoted; `"`, `\`, and control characters escaped, non-ASCII kept as UTF-8
/// - `null`: emitted as `""`
/// - no whitespace anywhere
///
/// # Example
///
/// ```rust
/// use docseal_canonical::Canonicalizer;
/// use serde_json::json;
///
/// let result = Canonicalizer::new().canonicalize(&json!({"b": "2", "a": ["x", "y"]}))?;
/// assert_eq!(result.as_str(), r#"{"a":["x","y"],"b":"2"}"#);
/// # Ok::<(), docseal_canonical::CanonicalizationError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces canonical bytes + hygiene report.
    pub fn canonicalize(
        &self,
        value: &Value,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        let mut report = HygieneReport::default();
        let mut out = String::new();
        self.write_value(value, Path::root(), &mut out, &mut report)?;
        Ok(CanonicalizationResult {
            bytes: out.into_bytes(),
            report,
        })
    }

    /// Serializes `value` through serde and canonicalizes the result.
    pub fn canonicalize_serialize<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        let value = serde_json::to_value(value)
            .map_err(|e| CanonicalizationError::Serialization(e.to_string()))?;
        self.canonicalize(&value)
    }

    fn write_value(
        &self,
        value: &Value,
        path: Path,
        out: &mut String,
        report: &mut HygieneReport,
    ) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                // serde_json may be built with `preserve_order`, so sort explicitly.
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                out.push('{');
                for (idx, key) in keys.into_iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    write_string(key, out);
                    out.push(':');
                    self.write_value(&map[key.as_str()], path.push_field(key), out, report)?;
                }
                out.push('}');
                Ok(())
            }
            Value::Array(items) => {
                out.push('[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    self.write_value(item, path.push_index(idx), out, report)?;
                }
                out.push(']');
                Ok(())
            }
            Value::String(s) => {
                write_string(s, out);
                Ok(())
            }
            Value::Null => {
                report.degrade(HygieneWarning::new("NullAsEmpty"), "null_values");
                out.push_str("\"\"");
                Ok(())
            }
            Value::Number(_) => Err(CanonicalizationError::UnsupportedType {
                path: path.to_string(),
                kind: "number",
            }),
            Value::Bool(_) => Err(CanonicalizationError::UnsupportedType {
                path: path.to_string(),
                kind: "boolean",
            }),
        }
    }
}

/// Writes a JSON string literal using the minimal escape set.
fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
