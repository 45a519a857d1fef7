//! Integration tests for `SqliteStore` and the `DataStore` facade against an
//! in-memory database.

use std::{
  path::{Path, PathBuf},
  time::{SystemTime, UNIX_EPOCH},
};

use chrono::{NaiveDate, NaiveDateTime};
use placenotes_core::{
  annotation::{AnnotationPoint, ExternalLocation},
  datastore::DataStore,
  note::{Note, NoteDraft},
  place::Place,
  store::EntityStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn data_store() -> DataStore<SqliteStore> { DataStore::load(store().await).await }

fn date(day: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2025, 9, day)
    .unwrap()
    .and_hms_opt(18, 30, 0)
    .unwrap()
}

fn place(id: i64, name: &str, favourite: bool) -> Place {
  Place {
    id,
    name: name.into(),
    latitude: 1.0,
    longitude: 2.0,
    categories: vec!["catering".into(), "catering.cafe".into()],
    is_favourite: favourite,
  }
}

fn note(id: i64, place_id: i64) -> Note {
  Note {
    id,
    title: format!("note {id}"),
    description: "flat white".into(),
    date: date(23),
    place_id,
  }
}

fn location(name: &str, lat: f64, lon: f64) -> ExternalLocation {
  ExternalLocation {
    name:       name.into(),
    categories: vec!["tourism.sights".into()],
    latitude:   lat,
    longitude:  lon,
    country:    "Australia".into(),
  }
}

fn temp_db_path(suffix: &str) -> PathBuf {
  let nanos = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .expect("system time should be after unix epoch")
    .as_nanos();
  std::env::temp_dir().join(format!(
    "placenotes-{suffix}-{}-{nanos}.sqlite",
    std::process::id()
  ))
}

fn remove_db(path: &Path) {
  for ext in ["", "-wal", "-shm"] {
    let mut file = path.as_os_str().to_owned();
    file.push(ext);
    std::fs::remove_file(file).ok();
  }
}

// ─── Places ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_lists_nothing() {
  let s = store().await;
  assert!(s.list_places().await.unwrap().is_empty());
  assert!(s.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_and_list_place() {
  let s = store().await;
  let input = place(1, "Single O", true);
  s.insert_place(input.clone()).await.unwrap();

  let places = s.list_places().await.unwrap();
  assert_eq!(places, [input]);
}

#[tokio::test]
async fn categories_roundtrip_in_order() {
  let s = store().await;
  let mut input = place(1, "A", true);
  input.categories = vec!["A".into(), "B".into(), "C".into()];
  s.insert_place(input).await.unwrap();

  let places = s.list_places().await.unwrap();
  assert_eq!(places[0].categories, ["A", "B", "C"]);
}

#[tokio::test]
async fn empty_categories_roundtrip() {
  let s = store().await;
  let mut input = place(1, "A", true);
  input.categories.clear();
  s.insert_place(input).await.unwrap();

  assert!(s.list_places().await.unwrap()[0].categories.is_empty());
}

#[tokio::test]
async fn duplicate_place_id_is_rejected_without_effect() {
  let s = store().await;
  s.insert_place(place(1, "first", true)).await.unwrap();

  let err = s.insert_place(place(1, "second", false)).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));

  let places = s.list_places().await.unwrap();
  assert_eq!(places.len(), 1);
  assert_eq!(places[0].name, "first");
}

#[tokio::test]
async fn update_place_replaces_row() {
  let s = store().await;
  s.insert_place(place(1, "old", false)).await.unwrap();

  let mut changed = place(1, "new", true);
  changed.latitude = -33.8837;
  s.update_place(changed.clone()).await.unwrap();

  assert_eq!(s.list_places().await.unwrap(), [changed]);
}

#[tokio::test]
async fn update_missing_rows_is_a_noop() {
  let s = store().await;
  s.update_place(place(42, "ghost", true)).await.unwrap();
  s.update_note(note(42, 1)).await.unwrap();
  assert!(s.list_places().await.unwrap().is_empty());
  assert!(s.list_notes().await.unwrap().is_empty());
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_note() {
  let s = store().await;
  s.insert_place(place(1, "A", false)).await.unwrap();
  s.insert_note(note(7, 1)).await.unwrap();

  assert_eq!(s.list_notes().await.unwrap(), [note(7, 1)]);
}

#[tokio::test]
async fn note_for_missing_place_is_rejected() {
  let s = store().await;
  let err = s.insert_note(note(1, 99)).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
  assert!(s.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_note_never_moves_it_to_another_place() {
  let s = store().await;
  s.insert_place(place(1, "A", false)).await.unwrap();
  s.insert_place(place(2, "B", false)).await.unwrap();
  s.insert_note(note(1, 1)).await.unwrap();

  let mut edited = note(1, 2);
  edited.title = "renamed".into();
  edited.date = date(1);
  s.update_note(edited).await.unwrap();

  let notes = s.list_notes().await.unwrap();
  assert_eq!(notes[0].title, "renamed");
  assert_eq!(notes[0].date, date(1));
  assert_eq!(notes[0].place_id, 1);
}

#[tokio::test]
async fn delete_note_removes_only_that_row() {
  let s = store().await;
  s.insert_place(place(1, "A", false)).await.unwrap();
  s.insert_note(note(1, 1)).await.unwrap();
  s.insert_note(note(2, 1)).await.unwrap();

  s.delete_note(1).await.unwrap();

  let notes = s.list_notes().await.unwrap();
  assert_eq!(notes.len(), 1);
  assert_eq!(notes[0].id, 2);
  // No cascade and no implicit sweep at this level.
  assert_eq!(s.list_places().await.unwrap().len(), 1);
}

// ─── Orphan sweep ────────────────────────────────────────────────────────────

#[tokio::test]
async fn sweep_removes_place_after_its_last_note() {
  let s = store().await;
  s.insert_place(place(1, "A", false)).await.unwrap();
  s.insert_note(note(1, 1)).await.unwrap();
  s.delete_note(1).await.unwrap();

  assert_eq!(s.clear_unused_places().await.unwrap(), 1);
  assert!(s.list_places().await.unwrap().is_empty());
}

#[tokio::test]
async fn sweep_keeps_favourite_place_without_notes() {
  let s = store().await;
  s.insert_place(place(1, "A", true)).await.unwrap();
  s.insert_note(note(1, 1)).await.unwrap();
  s.delete_note(1).await.unwrap();

  assert_eq!(s.clear_unused_places().await.unwrap(), 0);
  assert_eq!(s.list_places().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sweep_keeps_referenced_places() {
  let s = store().await;
  s.insert_place(place(1, "referenced", false)).await.unwrap();
  s.insert_place(place(2, "orphan", false)).await.unwrap();
  s.insert_place(place(3, "favourite", true)).await.unwrap();
  s.insert_note(note(1, 1)).await.unwrap();

  assert_eq!(s.clear_unused_places().await.unwrap(), 1);

  let ids: Vec<i64> = s.list_places().await.unwrap().iter().map(|p| p.id).collect();
  assert_eq!(ids, [1, 3]);
}

#[tokio::test]
async fn clear_all_wipes_tables() {
  let s = store().await;
  s.insert_place(place(1, "A", true)).await.unwrap();
  s.insert_place(place(2, "B", false)).await.unwrap();
  s.insert_note(note(1, 2)).await.unwrap();

  assert_eq!(s.clear_all_notes().await.unwrap(), 1);
  assert_eq!(s.clear_all_places().await.unwrap(), 2);
  assert!(s.list_places().await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_all_places_wipes_even_with_notes_present() {
  let s = store().await;
  s.insert_place(place(1, "A", true)).await.unwrap();
  s.insert_place(place(2, "B", false)).await.unwrap();
  s.insert_note(note(1, 1)).await.unwrap();
  s.insert_note(note(2, 2)).await.unwrap();

  assert_eq!(s.clear_all_places().await.unwrap(), 2);
  assert!(s.list_places().await.unwrap().is_empty());
  // Notes cannot outlive their place.
  assert!(s.list_notes().await.unwrap().is_empty());
}

// ─── Degraded mode ───────────────────────────────────────────────────────────

#[tokio::test]
async fn unopenable_path_yields_degraded_store() {
  let path = std::env::temp_dir()
    .join(format!("placenotes-missing-{}", std::process::id()))
    .join("nested")
    .join("store.sqlite");
  let s = SqliteStore::open_or_degraded(&path).await;

  assert!(s.is_degraded());
  assert!(matches!(s.list_places().await, Err(Error::Unavailable)));
  assert!(matches!(s.insert_place(place(1, "A", true)).await, Err(Error::Unavailable)));
  assert!(matches!(s.clear_unused_places().await, Err(Error::Unavailable)));
}

#[tokio::test]
async fn degraded_facade_reports_every_mutation() {
  let mut data = DataStore::load(SqliteStore::degraded()).await;
  assert!(data.places().is_empty());

  let id = data.next_place_id();
  assert!(data.add_place(place(id, "A", true)).await.is_err());
  assert!(data.delete_note(1).await.is_err());
  assert!(data.complete_reset().await.is_err());
  assert!(data.places().is_empty());
}

// ─── Facade: id allocation ───────────────────────────────────────────────────

#[tokio::test]
async fn allocator_starts_at_one_and_follows_reload() {
  let mut data = data_store().await;
  assert_eq!(data.next_place_id(), 1);

  for id in [1, 2, 5] {
    data.store().insert_place(place(id, "p", true)).await.unwrap();
  }
  data.refresh().await.unwrap();

  assert_eq!(data.next_place_id(), 6);
  assert_eq!(data.next_note_id(), 1);
}

#[tokio::test]
async fn allocated_ids_never_collide_with_stored_rows() {
  let mut data = data_store().await;

  for round in 0..5 {
    let place_id = data.next_place_id();
    assert!(data.get_place(place_id).is_none());
    data.add_place(place(place_id, "p", round % 2 == 0)).await.unwrap();

    let note_id = data.next_note_id();
    assert!(data.get_note(note_id).is_none());
    data.add_note(note(note_id, place_id)).await.unwrap();

    if round % 2 == 1 {
      data.delete_note(note_id).await.unwrap();
    }
  }

  let next = data.next_note_id();
  assert!(data.notes().iter().all(|n| n.id != next));
}

#[tokio::test]
async fn ids_continue_after_reopening_the_file() {
  let path = temp_db_path("reopen");
  {
    let mut data = DataStore::load(SqliteStore::open(&path).await.unwrap()).await;
    let place_id = data.next_place_id();
    data.add_place(place(place_id, "A", true)).await.unwrap();
    let note_id = data.next_note_id();
    data.add_note(note(note_id, place_id)).await.unwrap();
  }

  let mut reopened = DataStore::load(SqliteStore::open(&path).await.unwrap()).await;
  assert_eq!(reopened.places().len(), 1);
  assert_eq!(reopened.next_place_id(), 2);
  assert_eq!(reopened.next_note_id(), 2);

  drop(reopened);
  remove_db(&path);
}

// ─── Facade: snapshots and invariants ────────────────────────────────────────

#[tokio::test]
async fn snapshot_tracks_every_mutation() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", false)).await.unwrap();
  data.add_note(note(1, 1)).await.unwrap();

  assert_eq!(data.places().len(), 1);
  assert_eq!(data.get_note(1), Some(&note(1, 1)));
  assert_eq!(data.notes_for_place(1).count(), 1);
  assert!(data.get_place(2).is_none());
  assert!(data.get_note(2).is_none());
}

#[tokio::test]
async fn failed_mutation_leaves_snapshot_unchanged() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", true)).await.unwrap();
  let before = (data.places().to_vec(), data.notes().to_vec());

  assert!(data.add_note(note(1, 99)).await.is_err());
  assert!(data.add_place(place(1, "dup", false)).await.is_err());

  assert_eq!(before, (data.places().to_vec(), data.notes().to_vec()));
}

#[tokio::test]
async fn deleting_last_note_sweeps_its_place() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", false)).await.unwrap();
  data.add_note(note(1, 1)).await.unwrap();

  data.delete_note(1).await.unwrap();

  assert!(data.get_place(1).is_none());
}

#[tokio::test]
async fn deleting_one_of_several_notes_keeps_the_place() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", false)).await.unwrap();
  data.add_place(place(2, "B", false)).await.unwrap();
  data.add_note(note(1, 1)).await.unwrap();
  data.add_note(note(2, 1)).await.unwrap();
  data.add_note(note(3, 2)).await.unwrap();

  data.delete_note(1).await.unwrap();

  assert!(data.get_place(1).is_some());
  assert!(data.get_place(2).is_some());
}

#[tokio::test]
async fn deleting_last_note_of_favourite_keeps_it() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", true)).await.unwrap();
  data.add_note(note(1, 1)).await.unwrap();

  data.delete_note(1).await.unwrap();

  assert!(data.get_place(1).is_some());
}

#[tokio::test]
async fn unfavouriting_a_place_without_notes_removes_it() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", true)).await.unwrap();
  data.add_place(place(2, "B", true)).await.unwrap();
  data.add_note(note(1, 2)).await.unwrap();

  assert!(!data.set_favourite(1, false).await.unwrap());
  assert!(data.get_place(1).is_none());

  assert!(data.set_favourite(2, false).await.unwrap());
  assert_eq!(data.get_place(2).map(|p| p.is_favourite), Some(false));
}

#[tokio::test]
async fn favourite_unknown_place_is_an_error() {
  let mut data = data_store().await;
  let err = data.set_favourite(9, true).await.unwrap_err();
  assert!(matches!(err, placenotes_core::Error::PlaceNotFound(9)));
}

#[tokio::test]
async fn complete_reset_keeps_only_favourites() {
  let mut data = data_store().await;
  data.add_place(place(1, "fav", true)).await.unwrap();
  data.add_place(place(2, "plain", false)).await.unwrap();
  data.add_note(note(1, 1)).await.unwrap();
  data.add_note(note(2, 2)).await.unwrap();

  data.complete_reset().await.unwrap();

  assert!(data.notes().is_empty());
  let ids: Vec<i64> = data.places().iter().map(|p| p.id).collect();
  assert_eq!(ids, [1]);
}

// ─── Facade: composite flows ─────────────────────────────────────────────────

#[tokio::test]
async fn note_at_candidate_creates_the_place() {
  let mut data = data_store().await;
  let target = AnnotationPoint::Candidate(location("Opera House", -33.8568, 151.2153));

  let created = data
    .add_note_at(&target, NoteDraft::new("Concert", "Row F", date(2)))
    .await
    .unwrap();

  let stored_place = data.get_place(created.place_id).expect("place created");
  assert_eq!(stored_place.name, "Opera House");
  assert!(!stored_place.is_favourite);
  assert_eq!(data.get_note(created.id), Some(&created));
}

#[tokio::test]
async fn note_at_known_place_reuses_it() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", true)).await.unwrap();
  let target = AnnotationPoint::Known(data.get_place(1).cloned().unwrap());

  let created = data
    .add_note_at(&target, NoteDraft::new("Again", "", date(3)))
    .await
    .unwrap();

  assert_eq!(created.place_id, 1);
  assert_eq!(data.places().len(), 1);
}

#[tokio::test]
async fn candidate_becomes_known_after_a_note_is_attached() {
  let mut data = data_store().await;
  let found = vec![location("X", 1.0, 1.0), location("Y", 2.0, 2.0)];

  let before = placenotes_core::annotation::classify(data.places(), &found);
  assert!(before.iter().all(|p| !p.is_known()));

  data
    .add_note_at(&before[0], NoteDraft::new("t", "d", date(4)))
    .await
    .unwrap();

  let after = placenotes_core::annotation::classify(data.places(), &found);
  assert_eq!(after.len(), 2);
  assert!(matches!(&after[0], AnnotationPoint::Known(p) if p.name == "X"));
  assert!(matches!(&after[1], AnnotationPoint::Candidate(c) if c.name == "Y"));
}

#[tokio::test]
async fn edit_note_keeps_its_place() {
  let mut data = data_store().await;
  data.add_place(place(1, "A", false)).await.unwrap();
  data.add_note(note(1, 1)).await.unwrap();

  let edited = data
    .edit_note(1, NoteDraft::new("new title", "new text", date(9)))
    .await
    .unwrap();

  assert_eq!(edited.place_id, 1);
  assert_eq!(data.get_note(1), Some(&edited));

  let err = data.edit_note(5, NoteDraft::new("", "", date(9))).await.unwrap_err();
  assert!(matches!(err, placenotes_core::Error::NoteNotFound(5)));
}
