//! Compiled-in archival configuration for the Progression event log.
//!
//! These lists are fixed for a given migration and are not read from
//! configuration. The policies receive them as explicit values built here
//! once at startup.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
  Result,
  registry::{EventNameRegistry, Matching},
  rules::RuleTable,
};

// ─── Keep-listed (case-insensitive) ──────────────────────────────────────────

/// Events that survive the keep-listed migration. Compared case-insensitively.
pub const KEEP_LISTED_EVENTS: &[&str] = &[
  "progression.events.case-added-to-crown-court",
  "progression.events.sending-sheet-completed",
  "progression.events.sentence-hearing-date-added",
  "progression.events.defendant-additional-information-added",
  "progression.events.case-to-be-assigned-updated",
  "progression.events.case-ready-for-sentence-hearing",
  "progression.events.defendant-offences-changed",
  "progression.events.newcaseDocumentReceivedEvent",
];

// ─── Keep-recent (exact) ─────────────────────────────────────────────────────

/// Events kept regardless of age. Compared exactly.
pub const ALWAYS_KEPT_EVENTS: &[&str] = &[
  "progression.events.case-added-to-crown-court",
  "progression.events.sending-sheet-completed",
  "progression.events.sentence-hearing-date-added",
  "progression.events.defendant-additional-information-added",
];

/// Events kept only when created after [`keep_recent_cutoff`]. Compared
/// exactly.
pub const RECENTLY_KEPT_EVENTS: &[&str] = &[
  "progression.events.case-to-be-assigned-updated",
  "progression.events.case-ready-for-sentence-hearing",
  "progression.events.hearing-initiated",
  "progression.events.defendant-offences-changed",
  "progression.events.court-document-added",
];

/// Events of the recently-kept group created at or before this instant are
/// deactivated.
pub fn keep_recent_cutoff() -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2019, 3, 25, 0, 0, 0)
    .single()
    .expect("cutoff is a valid UTC instant")
}

// ─── Rekey rules (exact) ─────────────────────────────────────────────────────

/// Paths locating the case a hearing-scoped event belongs to, tried in order.
pub const REKEY_RULES: &[(&str, &[&str])] = &[
  ("progression.events.sending-sheet-completed", &[
    "$.hearing.caseId",
    "$.caseId",
  ]),
  ("progression.events.hearing-initiated", &[
    "$.hearing.prosecutionCases[0].id",
    "$..caseId",
  ]),
  ("progression.events.court-document-added", &[
    "$.courtDocument.documentCategory.defendantDocument.prosecutionCaseId",
    "$..prosecutionCaseId",
  ]),
];

// ─── Builders ────────────────────────────────────────────────────────────────

pub fn keep_listed_registry() -> EventNameRegistry {
  EventNameRegistry::case_insensitive(KEEP_LISTED_EVENTS)
}

pub fn always_kept_registry() -> EventNameRegistry {
  EventNameRegistry::exact(ALWAYS_KEPT_EVENTS)
}

pub fn recently_kept_registry() -> EventNameRegistry {
  EventNameRegistry::exact(RECENTLY_KEPT_EVENTS)
}

pub fn rekey_rule_table() -> Result<RuleTable> {
  RuleTable::new(Matching::Exact, REKEY_RULES.iter().copied())
}
