//! Integer primary-key allocation.
//!
//! Counters live in memory only. A fresh process starts every counter at 1,
//! so the allocator must be reseeded from the persisted maxima after each
//! load; otherwise it would hand out ids that already exist on disk.

use serde::{Deserialize, Serialize};

use crate::{note::Note, place::Place};

/// The entity tables that draw ids from an [`IdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Place,
  Note,
}

/// One monotonic counter per [`EntityKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
  next_place: i64,
  next_note:  i64,
}

impl Default for IdAllocator {
  fn default() -> Self { Self::new() }
}

impl IdAllocator {
  /// Counters for an empty store.
  pub fn new() -> Self {
    Self {
      next_place: 1,
      next_note:  1,
    }
  }

  /// An allocator seeded from a loaded snapshot.
  pub fn seeded(places: &[Place], notes: &[Note]) -> Self {
    let mut ids = Self::new();
    ids.reseed(places, notes);
    ids
  }

  /// Return the current counter for `kind` and advance it.
  pub fn unique_id(&mut self, kind: EntityKind) -> i64 {
    let counter = self.counter_mut(kind);
    let id = *counter;
    *counter = (*counter).saturating_add(1);
    id
  }

  /// Raise the counter for `kind` past `observed_max`. Never moves backward,
  /// so an id issued before the reseed is never issued again.
  pub fn reset_counter(&mut self, kind: EntityKind, observed_max: i64) {
    let counter = self.counter_mut(kind);
    *counter = (*counter).max(observed_max.saturating_add(1));
  }

  /// Reseed both counters from freshly reloaded rows. An empty table counts
  /// as a maximum of 0.
  pub fn reseed(&mut self, places: &[Place], notes: &[Note]) {
    let place_max = places.iter().map(|p| p.id).max().unwrap_or(0);
    let note_max = notes.iter().map(|n| n.id).max().unwrap_or(0);
    self.reset_counter(EntityKind::Place, place_max);
    self.reset_counter(EntityKind::Note, note_max);
  }

  /// The id the next call to [`Self::unique_id`] would return.
  pub fn peek(&self, kind: EntityKind) -> i64 {
    match kind {
      EntityKind::Place => self.next_place,
      EntityKind::Note => self.next_note,
    }
  }

  fn counter_mut(&mut self, kind: EntityKind) -> &mut i64 {
    match kind {
      EntityKind::Place => &mut self.next_place,
      EntityKind::Note => &mut self.next_note,
    }
  }
}
