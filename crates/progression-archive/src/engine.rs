//! [`ArchivalEngine`] — an ordered chain of policies.

use std::path::PathBuf;

use progression_core::{action::Decision, event::EventRecord};

use crate::{
  Result,
  policy::{
    ArchivalPolicy, DeactivateListedStreams, KeepListedEvents, KeepRecentEvents,
    PolicyKind, RekeyByPayload,
  },
};

/// Evaluates policies in order; the first one that wants to act decides.
pub struct ArchivalEngine {
  policies: Vec<Box<dyn ArchivalPolicy>>,
}

/// Reference files for [`DeactivateListedStreams`].
#[derive(Debug, Clone, Default)]
pub struct StreamListPaths {
  pub primary:   Option<PathBuf>,
  pub secondary: Option<PathBuf>,
}

impl ArchivalEngine {
  pub fn new(policies: Vec<Box<dyn ArchivalPolicy>>) -> Self { Self { policies } }

  /// Build the built-in policies named by `kinds`, in that order.
  ///
  /// Reference files are read here, once.
  pub fn from_kinds(kinds: &[PolicyKind], lists: &StreamListPaths) -> Result<Self> {
    let mut policies: Vec<Box<dyn ArchivalPolicy>> = Vec::with_capacity(kinds.len());
    for kind in kinds {
      let policy: Box<dyn ArchivalPolicy> = match kind {
        PolicyKind::KeepListed => Box::new(KeepListedEvents::builtin()),
        PolicyKind::KeepRecent => Box::new(KeepRecentEvents::builtin()),
        PolicyKind::DeactivateListedStreams => Box::new(DeactivateListedStreams::from_files(
          required(&lists.primary, "primary")?,
          required(&lists.secondary, "secondary")?,
        )?),
        PolicyKind::RekeyByPayload => Box::new(RekeyByPayload::builtin()?),
      };
      policies.push(policy);
    }
    Ok(Self::new(policies))
  }

  pub fn policy_names(&self) -> Vec<&'static str> {
    self.policies.iter().map(|p| p.name()).collect()
  }

  pub fn is_empty(&self) -> bool { self.policies.is_empty() }

  /// Decide what to do with `event`.
  pub fn decide(&self, event: &EventRecord) -> Decision {
    for policy in &self.policies {
      let decision = policy.decide(event);
      if !decision.action.is_no_action() {
        tracing::debug!(
          event_id = %event.event_id,
          name = %event.name,
          policy = policy.name(),
          action = decision.action.label(),
          "decided"
        );
        return decision;
      }
    }
    Decision::NO_ACTION
  }
}

fn required<'a>(path: &'a Option<PathBuf>, which: &'static str) -> Result<&'a PathBuf> {
  path
    .as_ref()
    .ok_or(crate::Error::MissingStreamList(which))
}
