//! The `EventStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `progression-store-sqlite`). The archival pipeline and the CLI depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::event::EventRecord;

// ─── Read model ──────────────────────────────────────────────────────────────

/// An event as held by the store, with its position and activity flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredEvent {
  /// Store-assigned, strictly increasing position in the log.
  pub sequence: i64,
  pub record:   EventRecord,
  pub active:   bool,
}

/// Activity of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStatus {
  pub stream_id:  Uuid,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`EventStore::list_events`].
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
  /// Only return events whose `active` flag is set.
  pub active_only: bool,
  /// Restrict to a single event name (exact match).
  pub name:        Option<String>,
  /// Restrict to a single stream.
  pub stream_id:   Option<Uuid>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

impl EventQuery {
  pub fn active() -> Self {
    Self {
      active_only: true,
      ..Self::default()
    }
  }

  pub fn stream(stream_id: Uuid) -> Self {
    Self {
      active_only: true,
      stream_id: Some(stream_id),
      ..Self::default()
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an event-log backend.
///
/// Appends never rewrite existing rows. Archival mutations are limited to
/// soft deletes (the `active` flags) and moving an event to another stream.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a record. Its stream is created on first use.
  fn append(
    &self,
    record: EventRecord,
  ) -> impl Future<Output = Result<StoredEvent, Self::Error>> + Send + '_;

  /// Retrieve an event by id. Returns `None` if not found.
  fn get_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Option<StoredEvent>, Self::Error>> + Send + '_;

  /// List events in log order.
  fn list_events<'a>(
    &'a self,
    query: &'a EventQuery,
  ) -> impl Future<Output = Result<Vec<StoredEvent>, Self::Error>> + Send + 'a;

  /// Clear the `active` flag of one event. Idempotent.
  fn deactivate_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Clear the `active` flag of a stream. Idempotent.
  fn deactivate_stream(
    &self,
    stream_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Move an event onto `new_stream_id`, creating that stream if needed.
  fn reassign_event(
    &self,
    event_id: Uuid,
    new_stream_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Return the status of a stream, or `None` if it has never been written.
  fn stream_status(
    &self,
    stream_id: Uuid,
  ) -> impl Future<Output = Result<Option<StreamStatus>, Self::Error>> + Send + '_;
}
