//! Archival policies.
//!
//! A policy looks at one event and decides its [`Action`]. Some policies also
//! assign the event a new stream through [`ArchivalPolicy::set_stream_id`].
//! Policies hold only immutable configuration and never keep state between
//! calls.

mod keep_listed;
mod keep_recent;
mod listed_streams;
mod rekey;

pub use keep_listed::KeepListedEvents;
pub use keep_recent::KeepRecentEvents;
pub use listed_streams::DeactivateListedStreams;
use progression_core::{
  action::{Action, Decision},
  event::EventRecord,
};
pub use rekey::RekeyByPayload;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A per-event archival rule.
pub trait ArchivalPolicy: Send + Sync {
  /// Short name used in logs and summaries.
  fn name(&self) -> &'static str;

  /// Classify `event`. Must depend only on the event.
  fn action_for(&self, event: &EventRecord) -> Action;

  /// The stream `event` should be moved to alongside `action`, if any.
  fn set_stream_id(&self, _event: &EventRecord, _action: &Action) -> Option<Uuid> {
    None
  }

  /// The full decision: the action plus any companion stream id.
  fn decide(&self, event: &EventRecord) -> Decision {
    let action = self.action_for(event);
    Decision {
      new_stream_id: self.set_stream_id(event, &action),
      action,
    }
  }
}

/// The policies that can be enabled from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
  KeepListed,
  KeepRecent,
  DeactivateListedStreams,
  RekeyByPayload,
}

impl PolicyKind {
  pub const ALL: [Self; 4] = [
    Self::KeepListed,
    Self::KeepRecent,
    Self::DeactivateListedStreams,
    Self::RekeyByPayload,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::KeepListed => "keep-listed",
      Self::KeepRecent => "keep-recent",
      Self::DeactivateListedStreams => "deactivate-listed-streams",
      Self::RekeyByPayload => "rekey-by-payload",
    }
  }
}

impl std::str::FromStr for PolicyKind {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| crate::Error::UnknownPolicy(s.to_owned()))
  }
}

impl std::fmt::Display for PolicyKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn policy_kind_parses_its_own_name() {
    for kind in PolicyKind::ALL {
      assert_eq!(kind.as_str().parse::<PolicyKind>().unwrap(), kind);
    }
    assert!(matches!(
      "keep-everything".parse::<PolicyKind>(),
      Err(crate::Error::UnknownPolicy(name)) if name == "keep-everything"
    ));
  }

  #[test]
  fn policy_kind_serde_matches_display() {
    let json = serde_json::to_string(&PolicyKind::DeactivateListedStreams).unwrap();
    assert_eq!(json, "\"deactivate-listed-streams\"");
  }
}
