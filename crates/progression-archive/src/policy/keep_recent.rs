use chrono::{DateTime, Utc};
use progression_core::{action::Action, event::EventRecord};
use uuid::Uuid;

use super::ArchivalPolicy;
use crate::{catalog, registry::EventNameRegistry};

/// Keep one group of events unconditionally and a second group only when it
/// was created after a cutoff. Everything else is deactivated and moved onto
/// a fresh stream of its own.
///
/// Membership of the unconditional group is checked first. An event in the
/// conditional group with no timestamp, or one that does not parse, does not
/// qualify.
#[derive(Debug, Clone)]
pub struct KeepRecentEvents {
  always: EventNameRegistry,
  recent: EventNameRegistry,
  cutoff: DateTime<Utc>,
}

impl KeepRecentEvents {
  pub fn new(
    always: EventNameRegistry,
    recent: EventNameRegistry,
    cutoff: DateTime<Utc>,
  ) -> Self {
    Self {
      always,
      recent,
      cutoff,
    }
  }

  /// The policy over the compiled-in groups and cutoff, matched exactly.
  pub fn builtin() -> Self {
    Self::new(
      catalog::always_kept_registry(),
      catalog::recently_kept_registry(),
      catalog::keep_recent_cutoff(),
    )
  }

  pub fn cutoff(&self) -> DateTime<Utc> { self.cutoff }

  fn is_recent(&self, event: &EventRecord) -> bool {
    event.created_at().is_some_and(|at| at > self.cutoff)
  }
}

impl ArchivalPolicy for KeepRecentEvents {
  fn name(&self) -> &'static str { "keep-recent" }

  fn action_for(&self, event: &EventRecord) -> Action {
    if self.always.contains(&event.name) {
      return Action::NoAction;
    }
    if self.recent.contains(&event.name) && self.is_recent(event) {
      return Action::NoAction;
    }
    Action::DEACTIVATE_EVENT
  }

  /// Every deactivated event gets a freshly generated stream id. Two calls
  /// for the same event return different ids.
  fn set_stream_id(&self, _event: &EventRecord, action: &Action) -> Option<Uuid> {
    action.is_deactivate().then(Uuid::new_v4)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;
  use serde_json::json;

  use super::*;

  fn event(name: &str) -> EventRecord { EventRecord::new(name, json!({})) }

  fn policy() -> KeepRecentEvents { KeepRecentEvents::builtin() }

  #[test]
  fn always_kept_ignores_timestamp() {
    let policy = policy();
    let cutoff = policy.cutoff();
    for name in catalog::ALWAYS_KEPT_EVENTS {
      let cases = [
        event(name),
        event(name).with_created_at(cutoff - Duration::days(400)),
        event(name).with_created_at(cutoff + Duration::days(1)),
        event(name).with_raw_created_at("garbage"),
      ];
      for e in cases {
        let decision = policy.decide(&e);
        assert_eq!(decision.action, Action::NoAction);
        assert_eq!(decision.new_stream_id, None);
      }
    }
  }

  #[test]
  fn recent_group_after_cutoff_is_kept() {
    let policy = policy();
    for name in catalog::RECENTLY_KEPT_EVENTS {
      let e = event(name).with_created_at(policy.cutoff() + Duration::seconds(1));
      assert_eq!(policy.decide(&e), progression_core::action::Decision::NO_ACTION);
    }
  }

  #[test]
  fn recent_group_on_or_before_cutoff_is_deactivated_and_rekeyed() {
    let policy = policy();
    for name in catalog::RECENTLY_KEPT_EVENTS {
      let cases = [
        event(name).with_created_at(policy.cutoff()),
        event(name).with_created_at(policy.cutoff() - Duration::days(1)),
        event(name),
        event(name).with_raw_created_at("25/03/2019"),
      ];
      for e in cases {
        let decision = policy.decide(&e);
        assert_eq!(decision.action, Action::DEACTIVATE_EVENT, "{name}");
        assert!(decision.new_stream_id.is_some_and(|id| !id.is_nil()));
      }
    }
  }

  #[test]
  fn unlisted_names_are_always_deactivated() {
    let policy = policy();
    let e = event("progression.events.hearing-confirmed")
      .with_created_at(policy.cutoff() + Duration::days(1000));
    assert_eq!(policy.action_for(&e), Action::DEACTIVATE_EVENT);
  }

  #[test]
  fn names_are_matched_exactly() {
    let policy = policy();
    let upper = catalog::ALWAYS_KEPT_EVENTS[0].to_uppercase();
    assert_eq!(policy.action_for(&event(&upper)), Action::DEACTIVATE_EVENT);
  }

  #[test]
  fn always_group_wins_when_name_is_in_both() {
    let name = "progression.events.shared";
    let policy = KeepRecentEvents::new(
      EventNameRegistry::exact([name]),
      EventNameRegistry::exact([name]),
      catalog::keep_recent_cutoff(),
    );
    let old = event(name).with_created_at(policy.cutoff() - Duration::days(1));
    assert_eq!(policy.action_for(&old), Action::NoAction);
  }

  // Classification is stable across calls; the generated stream id is not.
  #[test]
  fn classification_is_stable_but_stream_ids_are_fresh() {
    let policy = policy();
    let e = event("progression.events.hearing-confirmed");
    let first = policy.decide(&e);
    let second = policy.decide(&e);

    assert_eq!(first.action, second.action);
    assert!(first.new_stream_id.is_some());
    assert!(second.new_stream_id.is_some());
    assert_ne!(first.new_stream_id, second.new_stream_id);
  }
}
