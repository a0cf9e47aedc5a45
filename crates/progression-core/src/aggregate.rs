//! The case-progression aggregate.
//!
//! A minimal state accumulator rebuilt from a stream's history. It tracks
//! the defendants added to the case and its own identifier, and turns
//! commands into events.

use std::collections::HashSet;

use uuid::Uuid;

use crate::progression::{
  AddDefendantAdditionalInformation, DefendantAdditionalInformationAdded,
  ProgressionEvent,
};

/// State of one case-progression stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseProgression {
  case_progression_id: Option<Uuid>,
  defendant_ids:       HashSet<Uuid>,
}

impl CaseProgression {
  /// Rebuild the aggregate by applying `events` in order.
  pub fn load<'a>(events: impl IntoIterator<Item = &'a ProgressionEvent>) -> Self {
    let mut aggregate = Self::default();
    for event in events {
      aggregate.apply(event);
    }
    aggregate
  }

  pub fn case_progression_id(&self) -> Option<Uuid> { self.case_progression_id }

  pub fn defendant_ids(&self) -> &HashSet<Uuid> { &self.defendant_ids }

  pub fn has_defendant(&self, defendant_id: Uuid) -> bool {
    self.defendant_ids.contains(&defendant_id)
  }

  /// Fold one event into the state. Kinds the aggregate does not track are
  /// ignored.
  pub fn apply(&mut self, event: &ProgressionEvent) {
    match event {
      ProgressionEvent::CaseAddedToCrownCourt(added) => {
        self
          .defendant_ids
          .extend(added.defendants.iter().map(|d| d.defendant_id));
      }
      ProgressionEvent::DefendantAdditionalInformationAdded(added) => {
        self.case_progression_id = Some(added.case_progression_id);
      }
      ProgressionEvent::SendingSheetCompleted(_)
      | ProgressionEvent::SentenceHearingDateAdded(_) => {}
    }
  }

  /// Handle [`AddDefendantAdditionalInformation`].
  ///
  /// Neither the defendant's membership of the case nor hearing-review
  /// completion is checked; the event is always emitted. Whether those
  /// checks should be reinstated is an open business question.
  pub fn add_additional_information_for_defendant(
    &self,
    command: AddDefendantAdditionalInformation,
  ) -> Vec<ProgressionEvent> {
    if !self.has_defendant(command.defendant_id) {
      tracing::debug!(
        defendant_id = %command.defendant_id,
        "recording additional information for a defendant not on the case"
      );
    }
    vec![ProgressionEvent::DefendantAdditionalInformationAdded(
      DefendantAdditionalInformationAdded {
        case_progression_id:    command.case_progression_id,
        case_id:                command.case_id,
        defendant_id:           command.defendant_id,
        additional_information: command.additional_information,
      },
    )]
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::progression::{CaseAddedToCrownCourt, DefendantRef};

  fn case_added(defendants: &[Uuid]) -> ProgressionEvent {
    ProgressionEvent::CaseAddedToCrownCourt(CaseAddedToCrownCourt {
      case_id:         Uuid::new_v4(),
      court_centre_id: "B01LY00".into(),
      defendants:      defendants
        .iter()
        .map(|&defendant_id| DefendantRef { defendant_id })
        .collect(),
    })
  }

  fn command(defendant_id: Uuid) -> AddDefendantAdditionalInformation {
    AddDefendantAdditionalInformation {
      case_progression_id: Uuid::new_v4(),
      case_id: Uuid::new_v4(),
      defendant_id,
      additional_information: json!({ "probationReport": true }),
    }
  }

  #[test]
  fn case_added_accumulates_defendants() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let events = [case_added(&[a, b]), case_added(&[b, c])];
    let aggregate = CaseProgression::load(&events);

    assert_eq!(aggregate.defendant_ids().len(), 3);
    assert!(aggregate.has_defendant(a));
    assert!(aggregate.has_defendant(c));
    assert_eq!(aggregate.case_progression_id(), None);
  }

  #[test]
  fn additional_information_records_aggregate_id() {
    let defendant = Uuid::new_v4();
    let mut aggregate = CaseProgression::load(&[case_added(&[defendant])]);
    let cmd = command(defendant);
    let expected_id = cmd.case_progression_id;

    let events = aggregate.add_additional_information_for_defendant(cmd);
    assert_eq!(events.len(), 1);
    for event in &events {
      aggregate.apply(event);
    }
    assert_eq!(aggregate.case_progression_id(), Some(expected_id));
  }

  #[test]
  fn command_is_not_guarded_by_defendant_membership() {
    let aggregate = CaseProgression::default();
    let stranger = Uuid::new_v4();

    let events = aggregate.add_additional_information_for_defendant(command(stranger));
    let [ProgressionEvent::DefendantAdditionalInformationAdded(added)] =
      events.as_slice()
    else {
      panic!("expected a single DefendantAdditionalInformationAdded");
    };
    assert_eq!(added.defendant_id, stranger);
    assert_eq!(added.additional_information["probationReport"], true);
  }
}
