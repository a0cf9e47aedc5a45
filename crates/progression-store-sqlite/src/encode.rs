//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Store-assigned timestamps are RFC 3339 strings. Event `created_at` values
//! are kept verbatim. Payloads are compact JSON. UUIDs are hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use progression_core::{
  event::EventRecord,
  store::{StoredEvent, StreamStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// The column list matching [`RawEvent::from_row`].
pub const EVENT_COLUMNS: &str =
  "sequence_id, event_id, stream_id, name, payload, created_at, active";

/// Raw values read directly from an `event_log` row.
pub struct RawEvent {
  pub sequence_id: i64,
  pub event_id:    String,
  pub stream_id:   Option<String>,
  pub name:        String,
  pub payload:     String,
  pub created_at:  Option<String>,
  pub active:      bool,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      sequence_id: row.get(0)?,
      event_id:    row.get(1)?,
      stream_id:   row.get(2)?,
      name:        row.get(3)?,
      payload:     row.get(4)?,
      created_at:  row.get(5)?,
      active:      row.get(6)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredEvent> {
    let record = EventRecord {
      event_id:       decode_uuid(&self.event_id)?,
      name:           self.name,
      payload:        serde_json::from_str(&self.payload)?,
      raw_created_at: self.created_at,
      stream_id:      self.stream_id.as_deref().map(decode_uuid).transpose()?,
    };
    Ok(StoredEvent {
      sequence: self.sequence_id,
      record,
      active: self.active,
    })
  }
}

/// Raw values read directly from an `event_stream` row.
pub struct RawStream {
  pub stream_id:  String,
  pub active:     bool,
  pub created_at: String,
}

impl RawStream {
  pub fn into_status(self) -> Result<StreamStatus> {
    Ok(StreamStatus {
      stream_id:  decode_uuid(&self.stream_id)?,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
