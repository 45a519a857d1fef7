//! Encoding and decoding helpers between domain types and the plain column
//! representations stored in SQLite.
//!
//! Categories are stored comma-joined. Note dates are stored as
//! [`DATE_FORMAT`] strings without a zone. Favourite flags are 0/1 integers.

use chrono::{Local, NaiveDateTime};
use placenotes_core::{
  note::{DATE_FORMAT, Note},
  place::Place,
};
use tracing::warn;

use crate::{Error, Result};

const CATEGORY_DELIMITER: &str = ",";

// ─── Categories ──────────────────────────────────────────────────────────────

/// Join categories with commas. A comma inside a category is not escaped and
/// will split it in two on the way back.
pub fn encode_categories(categories: &[String]) -> String {
  categories.join(CATEGORY_DELIMITER)
}

/// Split a stored category string, dropping empty segments.
pub fn decode_categories(s: &str) -> Vec<String> {
  s.split(CATEGORY_DELIMITER)
    .filter(|segment| !segment.is_empty())
    .map(str::to_owned)
    .collect()
}

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDateTime) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Values read directly from a `places` row.
pub struct RawPlace {
  pub id:         i64,
  pub name:       String,
  pub latitude:   f64,
  pub longitude:  f64,
  pub categories: String,
  pub favourite:  bool,
}

impl RawPlace {
  pub fn into_place(self) -> Place {
    Place {
      id:           self.id,
      name:         self.name,
      latitude:     self.latitude,
      longitude:    self.longitude,
      categories:   decode_categories(&self.categories),
      is_favourite: self.favourite,
    }
  }
}

/// Values read directly from a `notes` row.
pub struct RawNote {
  pub id:          i64,
  pub title:       String,
  pub description: String,
  pub date:        String,
  pub place_id:    i64,
}

impl RawNote {
  /// Decode the row. An unreadable date does not fail the listing; the note
  /// is dated now instead.
  pub fn into_note(self) -> Note {
    let date = decode_date(&self.date).unwrap_or_else(|e| {
      warn!(note_id = self.id, error = %e, "unreadable note date; using current time");
      Local::now().naive_local()
    });
    Note {
      id: self.id,
      title: self.title,
      description: self.description,
      date: placenotes_core::note::truncate_to_seconds(date),
      place_id: self.place_id,
    }
  }
}
