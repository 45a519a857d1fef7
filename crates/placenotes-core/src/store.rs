//! The `EntityStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `placenotes-store-sqlite`). The [`crate::datastore::DataStore`] facade
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  note::{Note, NoteId},
  place::Place,
};

/// Durable CRUD over places and notes.
///
/// Every method is a single statement against the backend: there are no
/// multi-call transactions. A caller that inserts a place and then a note
/// may be left with only the place if the second call fails.
///
/// Callers allocate ids before inserting.
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert one place. Fails without effect if the id is already taken.
  fn insert_place(
    &self,
    place: Place,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert one note. The referenced place must already exist.
  fn insert_note(
    &self,
    note: Note,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace every column of the place with the same id. Succeeds without
  /// effect when no such place exists.
  fn update_place(
    &self,
    place: Place,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace title, description and date of the note with the same id. The
  /// stored place reference is never changed. Succeeds without effect when no
  /// such note exists.
  fn update_note(
    &self,
    note: Note,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete exactly the note with `id`. Does not touch places.
  fn delete_note(
    &self,
    id: NoteId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every non-favourite place that no note refers to. Returns the
  /// number of places removed.
  fn clear_unused_places(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete every place unconditionally. Notes that refer to a deleted place
  /// are deleted with it.
  fn clear_all_places(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete every note.
  fn clear_all_notes(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every stored place. An empty table is not an error.
  fn list_places(
    &self,
  ) -> impl Future<Output = Result<Vec<Place>, Self::Error>> + Send + '_;

  /// Every stored note. An empty table is not an error.
  fn list_notes(
    &self,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;
}
