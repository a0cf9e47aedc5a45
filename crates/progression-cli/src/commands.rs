//! Subcommand implementations.
//!
//! Everything here works against an [`EventStore`] and plain readers and
//! writers so it can be exercised without a terminal.

use std::io::{BufRead, Write};

use anyhow::Context as _;
use progression_archive::{ArchivalEngine, RunSummary, run_archival};
use progression_core::{
  action::{ActionFlags, Decision},
  aggregate::CaseProgression,
  event::EventRecord,
  progression::{AddDefendantAdditionalInformation, ProgressionEvent},
  store::{EventQuery, EventStore, StoredEvent},
};
use progression_jsonpath::JsonPath;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

// ─── Input ───────────────────────────────────────────────────────────────────

/// Parse newline-delimited JSON event records, skipping blank lines.
pub fn read_records(reader: impl BufRead) -> anyhow::Result<Vec<EventRecord>> {
  let mut records = Vec::new();
  for (index, line) in reader.lines().enumerate() {
    let line = line.context("failed to read input")?;
    if line.trim().is_empty() {
      continue;
    }
    let record = serde_json::from_str(&line)
      .with_context(|| format!("invalid event record on line {}", index + 1))?;
    records.push(record);
  }
  Ok(records)
}

// ─── import ──────────────────────────────────────────────────────────────────

/// Append every record from `reader` to `store`. Returns the count appended.
///
/// Records whose `createdAt` does not parse are stored verbatim and warned
/// about here, once.
pub async fn import<S: EventStore>(store: &S, reader: impl BufRead) -> anyhow::Result<usize> {
  let records = read_records(reader)?;
  let count = records.len();
  for record in records {
    let event_id = record.event_id;
    if record.has_malformed_created_at() {
      tracing::warn!(
        %event_id,
        raw = record.raw_created_at.as_deref().unwrap_or_default(),
        "unparseable createdAt; archival will treat it as absent"
      );
    }
    store
      .append(record)
      .await
      .with_context(|| format!("failed to append event {event_id}"))?;
  }
  tracing::info!(count, "imported events");
  Ok(count)
}

// ─── decide ──────────────────────────────────────────────────────────────────

/// One line of `decide` output. Keys are camelCase, like the input records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLine<'a> {
  pub id:       Uuid,
  pub name:     &'a str,
  #[serde(flatten)]
  pub decision: Decision,
  #[serde(flatten)]
  pub flags:    ActionFlags,
}

/// Decide every record from `reader`, writing one JSON object per line.
pub fn decide(
  engine: &ArchivalEngine,
  reader: impl BufRead,
  mut out: impl Write,
) -> anyhow::Result<usize> {
  let records = read_records(reader)?;
  for record in &records {
    let decision = engine.decide(record);
    let line = DecisionLine {
      id: record.event_id,
      name: &record.name,
      decision,
      flags: decision.action.flags(),
    };
    serde_json::to_writer(&mut out, &line)?;
    writeln!(out)?;
  }
  Ok(records.len())
}

// ─── run ─────────────────────────────────────────────────────────────────────

pub async fn run<S: EventStore>(
  store: &S,
  engine: &ArchivalEngine,
  dry_run: bool,
  mut out: impl Write,
) -> anyhow::Result<RunSummary> {
  let summary = run_archival(store, engine, dry_run)
    .await
    .context("archival run failed")?;
  serde_json::to_writer_pretty(&mut out, &summary)?;
  writeln!(out)?;
  Ok(summary)
}

// ─── extract ─────────────────────────────────────────────────────────────────

/// Evaluate `path` against the JSON document in `reader`.
pub fn extract(path: &str, reader: impl BufRead, last: bool) -> anyhow::Result<Option<String>> {
  let path: JsonPath = path.parse().with_context(|| format!("invalid path {path:?}"))?;
  let document: Value = serde_json::from_reader(reader).context("invalid JSON document")?;
  Ok(if last {
    path.last(&document)
  } else {
    path.first(&document)
  })
}

// ─── replay ──────────────────────────────────────────────────────────────────

/// The replayed state of one stream.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
  pub stream_id:           Uuid,
  pub events:              usize,
  pub skipped:             usize,
  pub case_progression_id: Option<Uuid>,
  pub defendant_ids:       Vec<Uuid>,
}

/// Rebuild the case-progression aggregate from the active events of
/// `stream_id`. Events the aggregate does not model are skipped.
pub async fn load_aggregate<S: EventStore>(
  store: &S,
  stream_id: Uuid,
) -> anyhow::Result<(CaseProgression, ReplaySummary)> {
  let stored = store
    .list_events(&EventQuery::stream(stream_id))
    .await
    .context("failed to read stream")?;

  let mut events = Vec::with_capacity(stored.len());
  let mut skipped = 0;
  for event in &stored {
    if !ProgressionEvent::is_known(&event.record.name) {
      skipped += 1;
      continue;
    }
    let decoded = ProgressionEvent::from_record(&event.record)
      .with_context(|| format!("malformed payload for event {}", event.record.event_id))?;
    events.push(decoded);
  }

  let aggregate = CaseProgression::load(&events);
  let mut defendant_ids: Vec<_> = aggregate.defendant_ids().iter().copied().collect();
  defendant_ids.sort();
  let summary = ReplaySummary {
    stream_id,
    events: events.len(),
    skipped,
    case_progression_id: aggregate.case_progression_id(),
    defendant_ids,
  };
  tracing::debug!(%stream_id, events = summary.events, skipped, "replayed stream");
  Ok((aggregate, summary))
}

pub async fn replay<S: EventStore>(
  store: &S,
  stream_id: Uuid,
  mut out: impl Write,
) -> anyhow::Result<ReplaySummary> {
  let (_, summary) = load_aggregate(store, stream_id).await?;
  serde_json::to_writer_pretty(&mut out, &summary)?;
  writeln!(out)?;
  Ok(summary)
}

// ─── add-defendant-info ──────────────────────────────────────────────────────

/// Run the add-additional-information command against `stream_id` and append
/// the resulting events to that stream.
pub async fn add_defendant_info<S: EventStore>(
  store: &S,
  stream_id: Uuid,
  case_id: Uuid,
  defendant_id: Uuid,
  additional_information: Value,
) -> anyhow::Result<Vec<StoredEvent>> {
  let (aggregate, _) = load_aggregate(store, stream_id).await?;
  let command = AddDefendantAdditionalInformation {
    case_progression_id: stream_id,
    case_id,
    defendant_id,
    additional_information,
  };

  let mut appended = Vec::new();
  for event in aggregate.add_additional_information_for_defendant(command) {
    let record = event.into_record(stream_id)?;
    let stored = store
      .append(record)
      .await
      .context("failed to append event")?;
    appended.push(stored);
  }
  tracing::info!(%stream_id, %defendant_id, count = appended.len(), "recorded defendant information");
  Ok(appended)
}
