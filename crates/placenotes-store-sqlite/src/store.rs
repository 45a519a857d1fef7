//! [`SqliteStore`], the SQLite implementation of [`EntityStore`].

use std::path::Path;

use placenotes_core::{
  note::{Note, NoteId},
  place::Place,
  store::EntityStore,
};
use tracing::{debug, error, info};

use crate::{
  Error, Result,
  encode::{RawNote, RawPlace, encode_categories, encode_date},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A PlaceNotes entity store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. A store
/// opened with [`SqliteStore::open_or_degraded`] may have no connection at
/// all; every operation on it then fails with [`Error::Unavailable`].
#[derive(Clone)]
pub struct SqliteStore {
  conn: Option<tokio_rusqlite::Connection>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
      })?;
    let store = Self { conn: Some(conn) };
    store.init_schema().await?;
    info!(?path, "store opened");
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn: Some(conn) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Like [`Self::open`], but a failure to open or initialise the file is
  /// logged and yields a degraded store instead of an error. The session
  /// keeps running; every store call reports [`Error::Unavailable`].
  pub async fn open_or_degraded(path: impl AsRef<Path>) -> Self {
    match Self::open(path).await {
      Ok(store) => store,
      Err(e) => {
        error!(error = %e, "store could not be opened; continuing in degraded mode");
        Self::degraded()
      }
    }
  }

  /// A store with no backing database.
  pub fn degraded() -> Self { Self { conn: None } }

  pub fn is_degraded(&self) -> bool { self.conn.is_none() }

  fn conn(&self) -> Result<&tokio_rusqlite::Connection> {
    self.conn.as_ref().ok_or(Error::Unavailable)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn()?
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Schema)?;
    Ok(())
  }

  /// Run one statement that takes no parameters and return the number of
  /// rows it changed.
  async fn execute_static(&self, sql: &'static str) -> Result<usize> {
    let changed = self
      .conn()?
      .call(move |conn| Ok(conn.execute(sql, [])?))
      .await?;
    Ok(changed)
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_place(&self, place: Place) -> Result<()> {
    let categories = encode_categories(&place.categories);
    debug!(place_id = place.id, "insert place");

    self
      .conn()?
      .call(move |conn| {
        conn.execute(
          "INSERT INTO places (id, name, latitude, longitude, categories, favourite)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            place.id,
            place.name,
            place.latitude,
            place.longitude,
            categories,
            place.is_favourite,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_note(&self, note: Note) -> Result<()> {
    let date = encode_date(note.date);
    debug!(note_id = note.id, place_id = note.place_id, "insert note");

    self
      .conn()?
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notes (id, title, description, date, place_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![note.id, note.title, note.description, date, note.place_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_place(&self, place: Place) -> Result<()> {
    let id = place.id;
    let categories = encode_categories(&place.categories);

    let changed = self
      .conn()?
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE places
           SET name = ?1, latitude = ?2, longitude = ?3, categories = ?4, favourite = ?5
           WHERE id = ?6",
          rusqlite::params![
            place.name,
            place.latitude,
            place.longitude,
            categories,
            place.is_favourite,
            id,
          ],
        )?)
      })
      .await?;
    debug!(place_id = id, changed, "update place");
    Ok(())
  }

  async fn update_note(&self, note: Note) -> Result<()> {
    let id = note.id;
    let date = encode_date(note.date);

    // place_id is immutable and stays out of the SET list.
    let changed = self
      .conn()?
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notes SET title = ?1, description = ?2, date = ?3 WHERE id = ?4",
          rusqlite::params![note.title, note.description, date, id],
        )?)
      })
      .await?;
    debug!(note_id = id, changed, "update note");
    Ok(())
  }

  async fn delete_note(&self, id: NoteId) -> Result<()> {
    let changed = self
      .conn()?
      .call(move |conn| Ok(conn.execute("DELETE FROM notes WHERE id = ?1", [id])?))
      .await?;
    debug!(note_id = id, changed, "delete note");
    Ok(())
  }

  async fn clear_unused_places(&self) -> Result<usize> {
    self
      .execute_static(
        "DELETE FROM places
         WHERE favourite = 0
           AND id NOT IN (SELECT DISTINCT place_id FROM notes)",
      )
      .await
  }

  async fn clear_all_places(&self) -> Result<usize> {
    self.execute_static("DELETE FROM places").await
  }

  async fn clear_all_notes(&self) -> Result<usize> {
    self.execute_static("DELETE FROM notes").await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_places(&self) -> Result<Vec<Place>> {
    let raws: Vec<RawPlace> = self
      .conn()?
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, latitude, longitude, categories, favourite
           FROM places ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPlace {
              id:         row.get(0)?,
              name:       row.get(1)?,
              latitude:   row.get(2)?,
              longitude:  row.get(3)?,
              categories: row.get(4)?,
              favourite:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawPlace::into_place).collect())
  }

  async fn list_notes(&self) -> Result<Vec<Note>> {
    let raws: Vec<RawNote> = self
      .conn()?
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, title, description, date, place_id
           FROM notes ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawNote {
              id:          row.get(0)?,
              title:       row.get(1)?,
              description: row.get(2)?,
              date:        row.get(3)?,
              place_id:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawNote::into_note).collect())
  }
}
