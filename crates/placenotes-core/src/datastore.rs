//! [`DataStore`] is the single entry point for reading and mutating places and
//! notes.
//!
//! The facade keeps an in-memory snapshot of both tables. After every
//! mutation it reloads both tables in full and reseeds its [`IdAllocator`],
//! so the snapshot always matches the backend and observers never see a
//! half-applied change. Reloading is O(places + notes) per mutation.
//!
//! Mutations that can orphan a place (deleting a note, clearing a favourite
//! flag) run the orphan sweep before returning; callers never have to.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  annotation::AnnotationPoint,
  ids::{EntityKind, IdAllocator},
  note::{Note, NoteDraft, NoteId},
  place::{Place, PlaceId},
  search::{self, RankedNotes, SearchResults, SearchScope},
  store::EntityStore,
};

pub struct DataStore<S> {
  store:  S,
  places: Vec<Place>,
  notes:  Vec<Note>,
  ids:    IdAllocator,
}

impl<S: EntityStore> DataStore<S> {
  /// Wrap `store` and load the initial snapshot.
  ///
  /// A failed load is logged and leaves the snapshot empty; the facade is
  /// still usable and every later call reports its own failure.
  pub async fn load(store: S) -> Self {
    let mut data = Self {
      store,
      places: Vec::new(),
      notes: Vec::new(),
      ids: IdAllocator::new(),
    };
    if let Err(e) = data.refresh().await {
      warn!(error = %e, "initial load failed; starting from an empty snapshot");
    }
    data
  }

  /// The backend this facade writes through.
  pub fn store(&self) -> &S { &self.store }

  // ── Snapshot reads ────────────────────────────────────────────────────

  pub fn places(&self) -> &[Place] { &self.places }

  pub fn notes(&self) -> &[Note] { &self.notes }

  pub fn get_place(&self, id: PlaceId) -> Option<&Place> {
    self.places.iter().find(|place| place.id == id)
  }

  pub fn get_note(&self, id: NoteId) -> Option<&Note> {
    self.notes.iter().find(|note| note.id == id)
  }

  pub fn notes_for_place(&self, place_id: PlaceId) -> impl Iterator<Item = &Note> {
    self.notes.iter().filter(move |note| note.place_id == place_id)
  }

  pub fn search(&self, query: &str, scope: SearchScope) -> SearchResults<'_> {
    search::search(query, scope, &self.places, &self.notes)
  }

  pub fn ranked_notes(&self, now: NaiveDateTime) -> RankedNotes<'_> {
    search::rank_notes(&self.notes, now)
  }

  // ── Id allocation ─────────────────────────────────────────────────────

  pub fn next_place_id(&mut self) -> PlaceId { self.ids.unique_id(EntityKind::Place) }

  pub fn next_note_id(&mut self) -> NoteId { self.ids.unique_id(EntityKind::Note) }

  // ── Reload ────────────────────────────────────────────────────────────

  /// Reload both tables and reseed the id counters. The snapshot is only
  /// replaced once both reads have succeeded.
  pub async fn refresh(&mut self) -> Result<()> {
    let places = self.store.list_places().await.map_err(Error::store)?;
    let notes = self.store.list_notes().await.map_err(Error::store)?;
    self.ids.reseed(&places, &notes);
    debug!(places = places.len(), notes = notes.len(), "snapshot reloaded");
    self.places = places;
    self.notes = notes;
    Ok(())
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Persist a new place. The id must come from [`Self::next_place_id`].
  ///
  /// A non-favourite place added here is kept only until the next sweep
  /// unless a note is attached to it first.
  pub async fn add_place(&mut self, place: Place) -> Result<()> {
    let id = place.id;
    self.store.insert_place(place).await.map_err(Error::store)?;
    debug!(place_id = id, "place added");
    self.refresh().await
  }

  /// Persist a new note. The id must come from [`Self::next_note_id`].
  pub async fn add_note(&mut self, note: Note) -> Result<()> {
    let (id, place_id) = (note.id, note.place_id);
    self.store.insert_note(note).await.map_err(Error::store)?;
    debug!(note_id = id, place_id, "note added");
    self.refresh().await
  }

  /// Replace a place. Clearing the favourite flag sweeps orphans, so the
  /// place disappears here if no note refers to it.
  pub async fn update_place(&mut self, place: Place) -> Result<()> {
    let unfavourited = !place.is_favourite
      && self
        .get_place(place.id)
        .is_some_and(|previous| previous.is_favourite);

    self.store.update_place(place).await.map_err(Error::store)?;
    if unfavourited {
      self.sweep().await?;
    }
    self.refresh().await
  }

  /// Replace title, description and date of a note. The place reference is
  /// immutable and is ignored by the backend.
  pub async fn update_note(&mut self, note: Note) -> Result<()> {
    self.store.update_note(note).await.map_err(Error::store)?;
    self.refresh().await
  }

  /// Delete a note, then sweep the place it leaves behind if that was its
  /// last note and it is not a favourite.
  ///
  /// If the sweep fails, the delete has already been committed but the
  /// snapshot still shows the note. Call [`Self::refresh`] after an error
  /// before retrying.
  pub async fn delete_note(&mut self, id: NoteId) -> Result<()> {
    self.store.delete_note(id).await.map_err(Error::store)?;
    debug!(note_id = id, "note deleted");
    self.sweep().await?;
    self.refresh().await
  }

  /// Remove every non-favourite place without notes.
  pub async fn clear_unused_places(&mut self) -> Result<()> {
    self.sweep().await?;
    self.refresh().await
  }

  /// Delete every note, then sweep. Favourite places survive.
  ///
  /// The two statements commit separately. On error the snapshot may be
  /// stale; call [`Self::refresh`] before retrying.
  pub async fn complete_reset(&mut self) -> Result<()> {
    let notes = self.store.clear_all_notes().await.map_err(Error::store)?;
    let places = self.store.clear_unused_places().await.map_err(Error::store)?;
    info!(notes, places, "store reset; favourite places kept");
    self.refresh().await
  }

  // ── Composite flows ───────────────────────────────────────────────────

  /// Attach a new note to `target`.
  ///
  /// A [`AnnotationPoint::Candidate`] is first promoted to a new
  /// non-favourite place. The two inserts are separate statements: if the
  /// note insert fails, the new place stays behind until the next sweep and
  /// the error is returned.
  pub async fn add_note_at(
    &mut self,
    target: &AnnotationPoint,
    draft: NoteDraft,
  ) -> Result<Note> {
    let place_id = match target {
      AnnotationPoint::Known(place) => place.id,
      AnnotationPoint::Candidate(location) => {
        let place = Place::from_location(self.next_place_id(), location);
        let id = place.id;
        self.add_place(place).await?;
        id
      }
    };

    let note = draft.into_note(self.next_note_id(), place_id);
    self.add_note(note.clone()).await?;
    Ok(note)
  }

  /// Rewrite the editable fields of an existing note.
  pub async fn edit_note(&mut self, id: NoteId, draft: NoteDraft) -> Result<Note> {
    let current = self.get_note(id).ok_or(Error::NoteNotFound(id))?;
    let edited = draft.apply_to(current);
    self.update_note(edited.clone()).await?;
    Ok(edited)
  }

  /// Set the favourite flag of a place. Returns whether the place still
  /// exists afterwards: unfavouriting a place with no notes removes it.
  pub async fn set_favourite(&mut self, id: PlaceId, favourite: bool) -> Result<bool> {
    let mut place = self.get_place(id).cloned().ok_or(Error::PlaceNotFound(id))?;
    place.is_favourite = favourite;
    self.update_place(place).await?;
    Ok(self.get_place(id).is_some())
  }

  async fn sweep(&self) -> Result<usize> {
    let removed = self.store.clear_unused_places().await.map_err(Error::store)?;
    if removed > 0 {
      debug!(removed, "orphan places removed");
    }
    Ok(removed)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use chrono::NaiveDate;

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("sweep failed")]
  struct SweepFailed;

  /// In-memory backend whose sweep can be made to fail.
  #[derive(Default)]
  struct FlakyStore {
    places:     Mutex<Vec<Place>>,
    notes:      Mutex<Vec<Note>>,
    fail_sweep: AtomicBool,
  }

  impl EntityStore for FlakyStore {
    type Error = SweepFailed;

    async fn insert_place(&self, place: Place) -> Result<(), SweepFailed> {
      self.places.lock().unwrap().push(place);
      Ok(())
    }

    async fn insert_note(&self, note: Note) -> Result<(), SweepFailed> {
      self.notes.lock().unwrap().push(note);
      Ok(())
    }

    async fn update_place(&self, place: Place) -> Result<(), SweepFailed> {
      for stored in self.places.lock().unwrap().iter_mut() {
        if stored.id == place.id {
          *stored = place.clone();
        }
      }
      Ok(())
    }

    async fn update_note(&self, _note: Note) -> Result<(), SweepFailed> { Ok(()) }

    async fn delete_note(&self, id: NoteId) -> Result<(), SweepFailed> {
      self.notes.lock().unwrap().retain(|note| note.id != id);
      Ok(())
    }

    async fn clear_unused_places(&self) -> Result<usize, SweepFailed> {
      if self.fail_sweep.load(Ordering::SeqCst) {
        return Err(SweepFailed);
      }
      let notes = self.notes.lock().unwrap();
      let mut places = self.places.lock().unwrap();
      let before = places.len();
      places.retain(|place| place.is_favourite || notes.iter().any(|n| n.place_id == place.id));
      Ok(before - places.len())
    }

    async fn clear_all_places(&self) -> Result<usize, SweepFailed> {
      Ok(std::mem::take(&mut *self.places.lock().unwrap()).len())
    }

    async fn clear_all_notes(&self) -> Result<usize, SweepFailed> {
      Ok(std::mem::take(&mut *self.notes.lock().unwrap()).len())
    }

    async fn list_places(&self) -> Result<Vec<Place>, SweepFailed> {
      Ok(self.places.lock().unwrap().clone())
    }

    async fn list_notes(&self) -> Result<Vec<Note>, SweepFailed> {
      Ok(self.notes.lock().unwrap().clone())
    }
  }

  fn draft() -> NoteDraft {
    let date = NaiveDate::from_ymd_opt(2025, 10, 1)
      .unwrap()
      .and_hms_opt(9, 0, 0)
      .unwrap();
    NoteDraft::new("walk", "", date)
  }

  #[tokio::test]
  async fn refresh_after_failed_sweep_shows_committed_delete() {
    let mut data = DataStore::load(FlakyStore::default()).await;
    let id = data.next_place_id();
    data
      .add_place(Place {
        id,
        name: "Park".into(),
        latitude: 0.0,
        longitude: 0.0,
        categories: Vec::new(),
        is_favourite: false,
      })
      .await
      .unwrap();
    let target = AnnotationPoint::Known(data.get_place(id).cloned().unwrap());
    let note = data.add_note_at(&target, draft()).await.unwrap();

    data.store().fail_sweep.store(true, Ordering::SeqCst);
    assert!(matches!(data.delete_note(note.id).await, Err(Error::Store(_))));
    // The delete committed but the snapshot was not reloaded.
    assert!(data.get_note(note.id).is_some());

    data.refresh().await.unwrap();
    assert!(data.get_note(note.id).is_none());
    assert!(data.get_place(id).is_some());

    data.store().fail_sweep.store(false, Ordering::SeqCst);
    data.clear_unused_places().await.unwrap();
    assert!(data.places().is_empty());
  }
}
