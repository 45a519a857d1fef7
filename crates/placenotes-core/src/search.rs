//! Text search over the cached snapshot, and date ranking of notes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{note::Note, place::Place};

/// Which table a text search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
  #[default]
  Notes,
  Places,
}

/// Hits from [`search`]; the variant follows the requested scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", content = "hits", rename_all = "lowercase")]
pub enum SearchResults<'a> {
  Notes(Vec<&'a Note>),
  Places(Vec<&'a Place>),
}

impl SearchResults<'_> {
  pub fn len(&self) -> usize {
    match self {
      Self::Notes(hits) => hits.len(),
      Self::Places(hits) => hits.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Case-insensitive substring search. Notes match on title or description,
/// places on name. A blank query returns the whole scope.
pub fn search<'a>(
  query: &str,
  scope: SearchScope,
  places: &'a [Place],
  notes: &'a [Note],
) -> SearchResults<'a> {
  let needle = query.trim().to_lowercase();
  let hit = |text: &str| needle.is_empty() || text.to_lowercase().contains(&needle);

  match scope {
    SearchScope::Notes => SearchResults::Notes(
      notes
        .iter()
        .filter(|note| hit(&note.title) || hit(&note.description))
        .collect(),
    ),
    SearchScope::Places => {
      SearchResults::Places(places.iter().filter(|place| hit(&place.name)).collect())
    }
  }
}

/// Notes ordered by date and split around a reference instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNotes<'a> {
  /// Dated strictly before `now`, oldest first.
  pub past:     Vec<&'a Note>,
  /// Dated at or after `now`, soonest first.
  pub upcoming: Vec<&'a Note>,
}

pub fn rank_notes(notes: &[Note], now: NaiveDateTime) -> RankedNotes<'_> {
  let mut ordered: Vec<&Note> = notes.iter().collect();
  ordered.sort_by_key(|note| note.date);
  let (past, upcoming): (Vec<&Note>, Vec<&Note>) =
    ordered.into_iter().partition(|note| note.date < now);
  RankedNotes { past, upcoming }
}
