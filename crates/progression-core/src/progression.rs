//! Progression event kinds and commands.
//!
//! The set of events the case-progression aggregate understands is closed.
//! Dispatch happens on the event name, which doubles as the serde tag.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, Result, event::EventRecord};

// ─── Event names ─────────────────────────────────────────────────────────────

pub const CASE_ADDED_TO_CROWN_COURT: &str =
  "progression.events.case-added-to-crown-court";
pub const DEFENDANT_ADDITIONAL_INFORMATION_ADDED: &str =
  "progression.events.defendant-additional-information-added";
pub const SENDING_SHEET_COMPLETED: &str =
  "progression.events.sending-sheet-completed";
pub const SENTENCE_HEARING_DATE_ADDED: &str =
  "progression.events.sentence-hearing-date-added";

// ─── Payload sub-types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefendantRef {
  #[serde(rename = "id")]
  pub defendant_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseAddedToCrownCourt {
  pub case_id:         Uuid,
  pub court_centre_id: String,
  #[serde(default)]
  pub defendants:      Vec<DefendantRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefendantAdditionalInformationAdded {
  pub case_progression_id:    Uuid,
  pub case_id:                Uuid,
  pub defendant_id:           Uuid,
  #[serde(default)]
  pub additional_information: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendingSheetCompleted {
  pub case_id: Uuid,
  #[serde(default)]
  pub hearing: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceHearingDateAdded {
  pub case_id:               Uuid,
  pub sentence_hearing_date: NaiveDate,
}

// ─── ProgressionEvent ────────────────────────────────────────────────────────

/// A typed progression event. The serde tag is the event name as stored in
/// the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload")]
pub enum ProgressionEvent {
  #[serde(rename = "progression.events.case-added-to-crown-court")]
  CaseAddedToCrownCourt(CaseAddedToCrownCourt),
  #[serde(rename = "progression.events.defendant-additional-information-added")]
  DefendantAdditionalInformationAdded(DefendantAdditionalInformationAdded),
  #[serde(rename = "progression.events.sending-sheet-completed")]
  SendingSheetCompleted(SendingSheetCompleted),
  #[serde(rename = "progression.events.sentence-hearing-date-added")]
  SentenceHearingDateAdded(SentenceHearingDateAdded),
}

impl ProgressionEvent {
  /// Every name this enum can decode.
  pub const NAMES: [&'static str; 4] = [
    CASE_ADDED_TO_CROWN_COURT,
    DEFENDANT_ADDITIONAL_INFORMATION_ADDED,
    SENDING_SHEET_COMPLETED,
    SENTENCE_HEARING_DATE_ADDED,
  ];

  /// The event name stored in the log.
  /// Must match the serde renames above.
  pub fn name(&self) -> &'static str {
    match self {
      Self::CaseAddedToCrownCourt(_) => CASE_ADDED_TO_CROWN_COURT,
      Self::DefendantAdditionalInformationAdded(_) => {
        DEFENDANT_ADDITIONAL_INFORMATION_ADDED
      }
      Self::SendingSheetCompleted(_) => SENDING_SHEET_COMPLETED,
      Self::SentenceHearingDateAdded(_) => SENTENCE_HEARING_DATE_ADDED,
    }
  }

  pub fn is_known(name: &str) -> bool { Self::NAMES.contains(&name) }

  /// Serialise the payload only (without the name tag).
  pub fn to_payload(&self) -> Result<Value> {
    let full = serde_json::to_value(self)?;
    Ok(full.get("payload").cloned().unwrap_or(Value::Null))
  }

  /// Decode from the name and payload stored in the log.
  pub fn from_parts(name: &str, payload: Value) -> Result<Self> {
    if !Self::is_known(name) {
      return Err(Error::UnknownEventKind(name.to_owned()));
    }
    let wrapped = serde_json::json!({ "name": name, "payload": payload });
    Ok(serde_json::from_value(wrapped)?)
  }

  pub fn from_record(record: &EventRecord) -> Result<Self> {
    Self::from_parts(&record.name, record.payload.clone())
  }

  /// Wrap the event in a fresh record on `stream_id`.
  pub fn into_record(self, stream_id: Uuid) -> Result<EventRecord> {
    let name = self.name();
    let payload = self.to_payload()?;
    Ok(
      EventRecord::new(name, payload)
        .with_created_at(chrono::Utc::now())
        .with_stream_id(stream_id),
    )
  }
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// Attach free-form additional information to a defendant on a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDefendantAdditionalInformation {
  pub case_progression_id:    Uuid,
  pub case_id:                Uuid,
  pub defendant_id:           Uuid,
  #[serde(default)]
  pub additional_information: Value,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn from_parts_decodes_known_event() {
    let case_id = Uuid::new_v4();
    let defendant = Uuid::new_v4();
    let event = ProgressionEvent::from_parts(
      CASE_ADDED_TO_CROWN_COURT,
      json!({
        "caseId": case_id,
        "courtCentreId": "LCC",
        "defendants": [{ "id": defendant }],
      }),
    )
    .unwrap();

    let ProgressionEvent::CaseAddedToCrownCourt(added) = event else {
      panic!("wrong variant");
    };
    assert_eq!(added.case_id, case_id);
    assert_eq!(added.defendants[0].defendant_id, defendant);
  }

  #[test]
  fn from_parts_rejects_unknown_name() {
    let err = ProgressionEvent::from_parts("progression.events.other", json!({}))
      .unwrap_err();
    assert!(matches!(err, Error::UnknownEventKind(name) if name == "progression.events.other"));
  }

  #[test]
  fn name_matches_serde_tag() {
    let event = ProgressionEvent::SentenceHearingDateAdded(
      SentenceHearingDateAdded {
        case_id:               Uuid::new_v4(),
        sentence_hearing_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
      },
    );
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["name"], event.name());
    assert_eq!(
      event.to_payload().unwrap()["sentenceHearingDate"],
      "2024-05-01"
    );
  }

  #[test]
  fn into_record_carries_stream_and_timestamp() {
    let stream = Uuid::new_v4();
    let event = ProgressionEvent::SendingSheetCompleted(SendingSheetCompleted {
      case_id: Uuid::new_v4(),
      hearing: json!({ "courtCentreName": "Liverpool" }),
    });
    let record = event.into_record(stream).unwrap();
    assert_eq!(record.name, SENDING_SHEET_COMPLETED);
    assert_eq!(record.stream_id, Some(stream));
    assert!(record.created_at().is_some());
  }
}
