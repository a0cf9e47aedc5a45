use progression_core::{action::Action, event::EventRecord};
use uuid::Uuid;

use super::ArchivalPolicy;
use crate::{Result, catalog, rules::RuleTable};

/// Move events onto the stream named inside their own payload.
///
/// For names in the rule table, each path is tried in order and the first
/// match that is a UUID is the target stream. Events already on that stream,
/// unlisted names and payloads with no usable id are left alone.
#[derive(Debug, Clone)]
pub struct RekeyByPayload {
  rules: RuleTable,
}

impl RekeyByPayload {
  pub fn new(rules: RuleTable) -> Self { Self { rules } }

  pub fn builtin() -> Result<Self> { Ok(Self::new(catalog::rekey_rule_table()?)) }

  fn target_stream(&self, event: &EventRecord) -> Option<Uuid> {
    self
      .rules
      .find_extracted(&event.name, &event.payload, |value| Uuid::parse_str(&value).ok())
  }
}

impl ArchivalPolicy for RekeyByPayload {
  fn name(&self) -> &'static str { "rekey-by-payload" }

  fn action_for(&self, event: &EventRecord) -> Action {
    match self.target_stream(event) {
      Some(stream_id) if event.stream_id != Some(stream_id) => {
        Action::Reassign { stream_id }
      }
      _ => Action::NoAction,
    }
  }
}
