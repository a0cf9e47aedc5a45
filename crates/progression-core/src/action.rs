//! Archival actions and decisions.
//!
//! An [`Action`] says what should happen to one persisted event. A
//! [`Decision`] pairs it with the new stream id, if any, that the policy
//! assigned alongside it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Action ──────────────────────────────────────────────────────────────────

/// What the archival pipeline should do with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
  /// Leave the event as-is.
  NoAction,
  /// Soft-delete the event and/or the stream it came from.
  Deactivate {
    event:  bool,
    stream: bool,
  },
  /// Move the event onto another stream.
  Reassign {
    stream_id: Uuid,
  },
}

/// The flat flag view of an [`Action`], as the store applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFlags {
  pub deactivate_event:  bool,
  pub deactivate_stream: bool,
  pub reassign_stream:   bool,
}

impl Action {
  /// Deactivate the event only, leaving its stream active.
  pub const DEACTIVATE_EVENT: Self = Self::Deactivate {
    event:  true,
    stream: false,
  };

  pub fn flags(&self) -> ActionFlags {
    match *self {
      Self::NoAction => ActionFlags::default(),
      Self::Deactivate { event, stream } => ActionFlags {
        deactivate_event:  event,
        deactivate_stream: stream,
        reassign_stream:   false,
      },
      Self::Reassign { .. } => ActionFlags {
        reassign_stream: true,
        ..ActionFlags::default()
      },
    }
  }

  pub fn is_no_action(&self) -> bool { matches!(self, Self::NoAction) }

  pub fn is_deactivate(&self) -> bool { matches!(self, Self::Deactivate { .. }) }

  /// The label used in summaries and log lines.
  pub fn label(&self) -> &'static str {
    match self {
      Self::NoAction => "no_action",
      Self::Deactivate { .. } => "deactivate",
      Self::Reassign { .. } => "reassign",
    }
  }
}

// ─── Decision ────────────────────────────────────────────────────────────────

/// The outcome of evaluating one event against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
  #[serde(flatten)]
  pub action:        Action,
  /// A stream the event should be moved to before the action is applied.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub new_stream_id: Option<Uuid>,
}

impl Decision {
  pub const NO_ACTION: Self = Self {
    action:        Action::NoAction,
    new_stream_id: None,
  };

  pub fn new(action: Action) -> Self {
    Self {
      action,
      new_stream_id: None,
    }
  }

  /// The stream the event ends up on, if the decision moves it.
  pub fn target_stream(&self) -> Option<Uuid> {
    match self.action {
      Action::Reassign { stream_id } => Some(stream_id),
      _ => self.new_stream_id,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deactivate_event_sets_exactly_one_flag() {
    let flags = Action::DEACTIVATE_EVENT.flags();
    assert!(flags.deactivate_event);
    assert!(!flags.deactivate_stream);
    assert!(!flags.reassign_stream);
  }

  #[test]
  fn no_action_has_no_flags() {
    assert_eq!(Action::NoAction.flags(), ActionFlags::default());
  }

  #[test]
  fn target_stream_prefers_reassign_variant() {
    let id = Uuid::new_v4();
    let decision = Decision::new(Action::Reassign { stream_id: id });
    assert_eq!(decision.target_stream(), Some(id));

    let other = Uuid::new_v4();
    let decision = Decision {
      action:        Action::DEACTIVATE_EVENT,
      new_stream_id: Some(other),
    };
    assert_eq!(decision.target_stream(), Some(other));
  }

  #[test]
  fn decision_serialises_flat() {
    let decision = Decision::new(Action::DEACTIVATE_EVENT);
    let json = serde_json::to_value(decision).unwrap();
    assert_eq!(json["action"], "deactivate");
    assert_eq!(json["event"], true);
    assert_eq!(json["stream"], false);
    assert!(json.get("newStreamId").is_none());
  }

  #[test]
  fn decision_keys_are_camel_case() {
    let (target, fresh) = (Uuid::new_v4(), Uuid::new_v4());
    let json = serde_json::to_value(Decision {
      action:        Action::Reassign { stream_id: target },
      new_stream_id: Some(fresh),
    })
    .unwrap();
    assert_eq!(json["action"], "reassign");
    assert_eq!(json["streamId"], target.to_string());
    assert_eq!(json["newStreamId"], fresh.to_string());

    let flags = serde_json::to_value(Action::DEACTIVATE_EVENT.flags()).unwrap();
    assert_eq!(flags["deactivateEvent"], true);
    assert_eq!(flags["reassignStream"], false);

    let back: Decision = serde_json::from_value(json).unwrap();
    assert_eq!(back.target_stream(), Some(target));
  }
}
