use progression_core::{action::Action, event::EventRecord};

use super::ArchivalPolicy;
use crate::{catalog, registry::EventNameRegistry};

/// Keep only events whose name is on an allow-list; deactivate the rest.
///
/// The stream itself is left active.
#[derive(Debug, Clone)]
pub struct KeepListedEvents {
  keep: EventNameRegistry,
}

impl KeepListedEvents {
  pub fn new(keep: EventNameRegistry) -> Self { Self { keep } }

  /// The policy over [`catalog::KEEP_LISTED_EVENTS`], matched
  /// case-insensitively.
  pub fn builtin() -> Self { Self::new(catalog::keep_listed_registry()) }
}

impl ArchivalPolicy for KeepListedEvents {
  fn name(&self) -> &'static str { "keep-listed" }

  fn action_for(&self, event: &EventRecord) -> Action {
    if self.keep.contains(&event.name) {
      Action::NoAction
    } else {
      Action::DEACTIVATE_EVENT
    }
  }
}
