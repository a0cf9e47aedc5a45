//! The archival pipeline: read active events, decide, apply.

use std::collections::HashSet;

use progression_core::{
  action::Decision,
  store::{EventQuery, EventStore, StoredEvent},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result, engine::ArchivalEngine};

/// Counts from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
  pub examined:            usize,
  pub kept:                usize,
  pub deactivated_events:  usize,
  pub deactivated_streams: usize,
  pub reassigned:          usize,
}

impl RunSummary {
  fn record(&mut self, decision: &Decision, streams: &mut HashSet<Uuid>, stream: Option<Uuid>) {
    self.examined += 1;
    let flags = decision.action.flags();
    if decision.action.is_no_action() {
      self.kept += 1;
    }
    if decision.target_stream().is_some() {
      self.reassigned += 1;
    }
    if flags.deactivate_event {
      self.deactivated_events += 1;
    }
    if flags.deactivate_stream
      && let Some(stream) = stream
      && streams.insert(stream)
    {
      self.deactivated_streams += 1;
    }
  }
}

fn store_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

/// Decide every active event in `store` and, unless `dry_run`, apply the
/// decisions.
///
/// The set of events is read once up front, so events moved or deactivated
/// during the run are not revisited.
pub async fn run_archival<S: EventStore>(
  store: &S,
  engine: &ArchivalEngine,
  dry_run: bool,
) -> Result<RunSummary> {
  let events = store
    .list_events(&EventQuery::active())
    .await
    .map_err(store_error)?;

  let mut summary = RunSummary::default();
  let mut streams = HashSet::new();

  for event in &events {
    let decision = engine.decide(&event.record);
    let stream = decision.target_stream().or(event.record.stream_id);
    summary.record(&decision, &mut streams, stream);
    if !dry_run {
      apply_decision(store, event, &decision).await?;
    }
  }

  tracing::info!(
    examined = summary.examined,
    kept = summary.kept,
    deactivated_events = summary.deactivated_events,
    deactivated_streams = summary.deactivated_streams,
    reassigned = summary.reassigned,
    dry_run,
    "archival run complete"
  );
  Ok(summary)
}

/// Apply one decision: move the event first, then clear the flags it names.
///
/// A stream deactivation targets the stream the event ends up on.
pub async fn apply_decision<S: EventStore>(
  store: &S,
  event: &StoredEvent,
  decision: &Decision,
) -> Result<()> {
  let event_id = event.record.event_id;

  if let Some(target) = decision.target_stream() {
    store
      .reassign_event(event_id, target)
      .await
      .map_err(store_error)?;
  }

  let flags = decision.action.flags();
  if flags.deactivate_event {
    store.deactivate_event(event_id).await.map_err(store_error)?;
  }
  if flags.deactivate_stream {
    match decision.target_stream().or(event.record.stream_id) {
      Some(stream_id) => store
        .deactivate_stream(stream_id)
        .await
        .map_err(store_error)?,
      None => tracing::warn!(%event_id, "stream deactivation requested for event without a stream"),
    }
  }
  Ok(())
}
