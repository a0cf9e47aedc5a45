//! [`SqliteStore`] — the SQLite implementation of [`EventStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use progression_core::{
  event::EventRecord,
  store::{EventQuery, EventStore, StoredEvent, StreamStatus},
};

use crate::{
  encode::{EVENT_COLUMNS, RawEvent, RawStream, encode_dt, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Progression event log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Create `stream_id` as an active stream if it does not exist yet.
fn ensure_stream(
  conn: &rusqlite::Connection,
  stream_id: &str,
  now: &str,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR IGNORE INTO event_stream (stream_id, active, created_at) VALUES (?1, 1, ?2)",
    rusqlite::params![stream_id, now],
  )?;
  Ok(())
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn append(&self, record: EventRecord) -> Result<StoredEvent> {
    let event_id_str  = encode_uuid(record.event_id);
    let stream_id_str = record.stream_id.map(encode_uuid);
    let name          = record.name.clone();
    let payload_str   = serde_json::to_string(&record.payload)?;
    let created_at    = record.raw_created_at.clone();
    let now_str       = encode_dt(Utc::now());

    let sequence: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM event_log WHERE event_id = ?1",
            rusqlite::params![event_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if exists {
          return Ok(None);
        }

        if let Some(stream) = &stream_id_str {
          ensure_stream(&tx, stream, &now_str)?;
        }
        tx.execute(
          "INSERT INTO event_log (event_id, stream_id, name, payload, created_at, active)
           VALUES (?1, ?2, ?3, ?4, ?5, 1)",
          rusqlite::params![event_id_str, stream_id_str, name, payload_str, created_at],
        )?;
        let sequence = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(sequence))
      })
      .await?;

    let sequence = sequence.ok_or(Error::DuplicateEvent(record.event_id))?;
    tracing::debug!(event_id = %record.event_id, sequence, "appended event");

    Ok(StoredEvent {
      sequence,
      record,
      active: true,
    })
  }

  async fn get_event(&self, event_id: Uuid) -> Result<Option<StoredEvent>> {
    let id_str = encode_uuid(event_id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EVENT_COLUMNS} FROM event_log WHERE event_id = ?1"),
              rusqlite::params![id_str],
              RawEvent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_stored).transpose()
  }

  async fn list_events(&self, query: &EventQuery) -> Result<Vec<StoredEvent>> {
    let active_only = query.active_only;
    let name        = query.name.clone();
    let stream_str  = query.stream_id.map(encode_uuid);
    // A negative LIMIT means "no limit" in SQLite.
    let limit_val   = query.limit.map_or(-1, |l| l as i64);
    let offset_val  = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<&'static str> = vec![];
        if active_only {
          conds.push("active = 1");
        }
        if name.is_some() {
          conds.push("name = ?1");
        }
        if stream_str.is_some() {
          conds.push("stream_id = ?2");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {EVENT_COLUMNS}
           FROM event_log
           {where_clause}
           ORDER BY sequence_id
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![name.as_deref(), stream_str.as_deref(), limit_val, offset_val],
            RawEvent::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_stored).collect()
  }

  async fn deactivate_event(&self, event_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(event_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE event_log SET active = 0 WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::EventNotFound(event_id));
    }
    tracing::debug!(%event_id, "deactivated event");
    Ok(())
  }

  async fn deactivate_stream(&self, stream_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(stream_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE event_stream SET active = 0 WHERE stream_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::StreamNotFound(stream_id));
    }
    tracing::debug!(%stream_id, "deactivated stream");
    Ok(())
  }

  async fn reassign_event(&self, event_id: Uuid, new_stream_id: Uuid) -> Result<()> {
    let event_str  = encode_uuid(event_id);
    let stream_str = encode_uuid(new_stream_id);
    let now_str    = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        ensure_stream(&tx, &stream_str, &now_str)?;
        let changed = tx.execute(
          "UPDATE event_log SET stream_id = ?2 WHERE event_id = ?1",
          rusqlite::params![event_str, stream_str],
        )?;
        // Leave no orphan stream behind for an unknown event.
        if changed == 0 {
          tx.rollback()?;
        } else {
          tx.commit()?;
        }
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Err(Error::EventNotFound(event_id));
    }
    tracing::debug!(%event_id, %new_stream_id, "reassigned event");
    Ok(())
  }

  async fn stream_status(&self, stream_id: Uuid) -> Result<Option<StreamStatus>> {
    let id_str = encode_uuid(stream_id);

    let raw: Option<RawStream> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT stream_id, active, created_at FROM event_stream WHERE stream_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawStream {
                  stream_id:  row.get(0)?,
                  active:     row.get(1)?,
                  created_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStream::into_status).transpose()
  }
}
