use std::path::Path;

use progression_core::{action::Action, event::EventRecord};

use super::ArchivalPolicy;
use crate::{Result, reference::StreamIdList};

/// Deactivate events, and their streams, whose stream id appears in either
/// of two reference lists.
///
/// An event with no stream id never matches.
#[derive(Debug, Clone)]
pub struct DeactivateListedStreams {
  primary:   StreamIdList,
  secondary: StreamIdList,
}

impl DeactivateListedStreams {
  pub fn new(primary: StreamIdList, secondary: StreamIdList) -> Self {
    Self { primary, secondary }
  }

  /// Load both lists from disk. Failing to read either file is an error.
  pub fn from_files(primary: impl AsRef<Path>, secondary: impl AsRef<Path>) -> Result<Self> {
    Ok(Self::new(
      StreamIdList::from_file(primary)?,
      StreamIdList::from_file(secondary)?,
    ))
  }
}

impl ArchivalPolicy for DeactivateListedStreams {
  fn name(&self) -> &'static str { "deactivate-listed-streams" }

  fn action_for(&self, event: &EventRecord) -> Action {
    match event.stream_id {
      Some(id) if self.primary.contains(&id) || self.secondary.contains(&id) => {
        Action::Deactivate {
          event:  true,
          stream: true,
        }
      }
      _ => Action::NoAction,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use serde_json::json;
  use uuid::Uuid;

  use super::*;

  struct Streams {
    a: Uuid,
    d: Uuid,
    x: Uuid,
  }

  fn fixture() -> (DeactivateListedStreams, Streams) {
    let [a, b, c, d, x] = std::array::from_fn(|_| Uuid::new_v4());
    let policy = DeactivateListedStreams::new(
      [a, b, c].into_iter().collect(),
      [d].into_iter().collect(),
    );
    (policy, Streams { a, d, x })
  }

  fn on_stream(stream_id: Uuid) -> EventRecord {
    EventRecord::new("progression.events.hearing-confirmed", json!({}))
      .with_stream_id(stream_id)
  }

  #[test]
  fn listed_stream_is_deactivated() {
    let (policy, s) = fixture();
    let action = policy.action_for(&on_stream(s.a));
    assert_eq!(action, Action::Deactivate {
      event:  true,
      stream: true,
    });
    assert!(policy.action_for(&on_stream(s.d)).is_deactivate());
  }

  #[test]
  fn unlisted_stream_is_kept() {
    let (policy, s) = fixture();
    assert_eq!(policy.action_for(&on_stream(s.x)), Action::NoAction);
  }

  #[test]
  fn missing_stream_id_is_kept() {
    let (policy, _) = fixture();
    let event = EventRecord::new("progression.events.hearing-confirmed", json!({}));
    assert_eq!(policy.decide(&event).action, Action::NoAction);
  }

  #[test]
  fn loads_lists_from_files() {
    let listed = Uuid::new_v4();
    let mut primary = tempfile::NamedTempFile::new().unwrap();
    writeln!(primary, "{listed}").unwrap();
    let secondary = tempfile::NamedTempFile::new().unwrap();

    let policy = DeactivateListedStreams::from_files(primary.path(), secondary.path())
      .unwrap();
    assert!(policy.action_for(&on_stream(listed)).is_deactivate());
    assert!(policy.action_for(&on_stream(Uuid::new_v4())).is_no_action());
  }

  #[test]
  fn unreadable_file_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let present = tempfile::NamedTempFile::new().unwrap();
    let result =
      DeactivateListedStreams::from_files(present.path(), dir.path().join("missing"));
    assert!(matches!(result, Err(crate::Error::ReferenceFile { .. })));
  }
}
