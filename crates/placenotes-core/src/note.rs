//! A titled, dated entry attached to exactly one place.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::place::PlaceId;

pub type NoteId = i64;

/// Storage format for note dates. Dates carry no zone and are stored to the
/// second.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:          NoteId,
  pub title:       String,
  pub description: String,
  pub date:        NaiveDateTime,
  /// Fixed at creation; edits never move a note to another place.
  pub place_id:    PlaceId,
}

/// The user-editable part of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
  pub title:       String,
  pub description: String,
  pub date:        NaiveDateTime,
}

impl NoteDraft {
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
    date: NaiveDateTime,
  ) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      date,
    }
  }

  /// Build a persistable note. Sub-second precision is dropped so the value
  /// read back from storage compares equal.
  pub fn into_note(self, id: NoteId, place_id: PlaceId) -> Note {
    Note {
      id,
      title: self.title,
      description: self.description,
      date: truncate_to_seconds(self.date),
      place_id,
    }
  }

  /// Apply this draft over an existing note, keeping its id and place.
  pub fn apply_to(self, note: &Note) -> Note { self.into_note(note.id, note.place_id) }
}

pub fn truncate_to_seconds(date: NaiveDateTime) -> NaiveDateTime {
  date.with_nanosecond(0).unwrap_or(date)
}
