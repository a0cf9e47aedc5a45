//! JSON-path extraction over event payloads.
//!
//! Supports the dot/bracket subset used by the archival rule tables: `$`,
//! `.name`, `['name']`, `[n]`, `[*]`, `.*`, `..name`, unions and slices.
//! Pure synchronous; no I/O.
//!
//! # Quick start
//!
//! ```
//! use progression_jsonpath::{extract_first, extract_last};
//! use serde_json::json;
//!
//! let payload = json!({ "prompts": [{ "label": "a" }, { "label": "b" }] });
//! assert_eq!(extract_first(&payload, "$..label").unwrap().as_deref(), Some("a"));
//! assert_eq!(extract_last(&payload, "$..label").unwrap().as_deref(), Some("b"));
//! ```

pub mod error;
mod eval;
mod parse;

use std::{fmt, str::FromStr};

pub use error::{Error, Result};
use serde_json::Value;

use crate::parse::Segment;

// ─── JsonPath ────────────────────────────────────────────────────────────────

/// A compiled path expression.
///
/// Parsing is the only fallible step; evaluating a compiled path against any
/// document always succeeds, returning no matches where the document does
/// not have the requested shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
  source:   String,
  segments: Vec<Segment>,
}

impl JsonPath {
  pub fn parse(path: &str) -> Result<Self> {
    Ok(Self {
      segments: parse::parse_path(path)?,
      source:   path.trim().to_string(),
    })
  }

  pub fn as_str(&self) -> &str { &self.source }

  /// `true` when the path resolves to at most one location: no recursive
  /// descent, wildcards, unions or slices.
  pub fn is_definite(&self) -> bool {
    self.segments.iter().all(Segment::is_definite)
  }

  /// Every location the path matches, in document order.
  pub fn select<'v>(&self, document: &'v Value) -> Vec<&'v Value> {
    eval::select(&self.segments, document)
  }

  /// The first non-null match, rendered as a string.
  pub fn first(&self, document: &Value) -> Option<String> {
    if self.is_definite() {
      return self.select(document).first().and_then(|v| render(v));
    }
    self.select(document).into_iter().find_map(render)
  }

  /// The last non-null match, rendered as a string.
  ///
  /// For a definite path this is the same value as [`JsonPath::first`].
  pub fn last(&self, document: &Value) -> Option<String> {
    if self.is_definite() {
      return self.first(document);
    }
    self.select(document).into_iter().rev().find_map(render)
  }
}

impl FromStr for JsonPath {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl fmt::Display for JsonPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.source)
  }
}

// ─── Free functions ──────────────────────────────────────────────────────────

/// Parse `path` and return its first non-null match in `payload`.
pub fn extract_first(payload: &Value, path: &str) -> Result<Option<String>> {
  Ok(JsonPath::parse(path)?.first(payload))
}

/// Parse `path` and return its last non-null match in `payload`.
pub fn extract_last(payload: &Value, path: &str) -> Result<Option<String>> {
  Ok(JsonPath::parse(path)?.last(payload))
}

/// Render a matched value as a string. Strings are returned verbatim,
/// numbers and booleans as their JSON text, containers as compact JSON.
/// `null` has no value.
pub fn render(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn results_payload() -> Value {
    json!({
      "hearingId": "0b7c9a1e-45c4-4a8f-9a4c-3b1c2d7f6e11",
      "prompts": [
        { "id": "d6caa3c4-ec9d-41ec-8f86-2c617ef0d5d9", "label": "value" },
        { "id": "4e3f1f52-2f0a-4b4e-b2a1-9d56c7f3a0aa", "label": null },
        { "id": "a1f0c1d2-6f3e-4cb5-8d7e-0e9f8a7b6c5d", "label": "prompt label 2" },
      ],
    })
  }

  #[test]
  fn definite_path_reads_single_value() {
    let payload = results_payload();
    let path = "$.prompts[0].id";
    assert!(JsonPath::parse(path).unwrap().is_definite());
    assert_eq!(
      extract_first(&payload, path).unwrap().as_deref(),
      Some("d6caa3c4-ec9d-41ec-8f86-2c617ef0d5d9")
    );
    assert_eq!(
      extract_last(&payload, path).unwrap().as_deref(),
      Some("d6caa3c4-ec9d-41ec-8f86-2c617ef0d5d9")
    );
  }

  #[test]
  fn indefinite_path_returns_head_and_tail() {
    let payload = results_payload();
    let path = JsonPath::parse("$..label").unwrap();
    assert!(!path.is_definite());
    assert_eq!(path.first(&payload).as_deref(), Some("value"));
    assert_eq!(path.last(&payload).as_deref(), Some("prompt label 2"));
  }

  #[test]
  fn definite_null_is_absent() {
    let payload = results_payload();
    assert_eq!(extract_first(&payload, "$.prompts[1].label").unwrap(), None);
  }

  #[test]
  fn missing_locations_are_absent_not_errors() {
    let payload = results_payload();
    assert_eq!(extract_first(&payload, "$.hearing.id").unwrap(), None);
    assert_eq!(extract_first(&payload, "$.prompts[9].id").unwrap(), None);
    assert_eq!(extract_last(&payload, "$..courtCentreId").unwrap(), None);
  }

  #[test]
  fn malformed_path_is_an_error() {
    let payload = results_payload();
    assert!(extract_first(&payload, "$.prompts[").is_err());
    assert!(extract_last(&payload, "prompts").is_err());
  }

  #[test]
  fn non_string_values_are_rendered() {
    let payload = json!({ "count": 3, "flag": true, "nested": { "a": [1] } });
    assert_eq!(extract_first(&payload, "$.count").unwrap().as_deref(), Some("3"));
    assert_eq!(extract_first(&payload, "$.flag").unwrap().as_deref(), Some("true"));
    assert_eq!(
      extract_first(&payload, "$.nested").unwrap().as_deref(),
      Some(r#"{"a":[1]}"#)
    );
  }

  #[test]
  fn display_round_trips_source() {
    let path: JsonPath = " $.prompts[*].id ".parse().unwrap();
    assert_eq!(path.to_string(), "$.prompts[*].id");
    assert_eq!(path.as_str(), "$.prompts[*].id");
  }
}
