//! Event records — the immutable input to every archival decision.
//!
//! Records arrive from an external event-store reader. The engine never
//! mutates them; it only annotates them with a decision.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ─── EventRecord ─────────────────────────────────────────────────────────────

/// A single persisted event as read from the event log.
///
/// The creation timestamp is carried exactly as the log stored it. Historical
/// data contains values that do not parse; [`EventRecord::created_at`] treats
/// those as absent instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
  #[serde(rename = "id")]
  pub event_id:       Uuid,
  pub name:           String,
  #[serde(default)]
  pub payload:        Value,
  #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
  pub raw_created_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stream_id:      Option<Uuid>,
}

impl EventRecord {
  /// Convenience constructor with no timestamp and no stream.
  pub fn new(name: impl Into<String>, payload: Value) -> Self {
    Self {
      event_id: Uuid::new_v4(),
      name: name.into(),
      payload,
      raw_created_at: None,
      stream_id: None,
    }
  }

  pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
    self.raw_created_at = Some(at.to_rfc3339());
    self
  }

  pub fn with_raw_created_at(mut self, raw: impl Into<String>) -> Self {
    self.raw_created_at = Some(raw.into());
    self
  }

  pub fn with_stream_id(mut self, stream_id: Uuid) -> Self {
    self.stream_id = Some(stream_id);
    self
  }

  /// The creation timestamp, if present and parseable.
  ///
  /// Called once per decision, so a bad value is only logged at debug level;
  /// importers report it once through [`EventRecord::has_malformed_created_at`].
  pub fn created_at(&self) -> Option<DateTime<Utc>> {
    let raw = self.raw_created_at.as_deref()?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
      tracing::debug!(
        event_id = %self.event_id,
        raw,
        "unparseable createdAt; treating as absent"
      );
    }
    parsed
  }

  /// A `createdAt` is present but does not parse.
  pub fn has_malformed_created_at(&self) -> bool {
    self
      .raw_created_at
      .as_deref()
      .is_some_and(|raw| parse_timestamp(raw).is_none())
  }
}

/// Parse an RFC 3339 timestamp, falling back to a zone-less ISO 8601 value
/// interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .ok()
    .map(|naive| naive.and_utc())
}
