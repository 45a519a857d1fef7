//! SQL schema for the PlaceNotes SQLite store.
//!
//! Executed once at connection startup. There are no migrations yet;
//! `user_version` records the layout for a future migration step.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- A place row exists only while it is a favourite or referenced by a note.
-- Rows are removed by the orphan sweep, never by id.
CREATE TABLE IF NOT EXISTS places (
    id          INTEGER PRIMARY KEY,
    name        TEXT    NOT NULL,
    latitude    REAL    NOT NULL,
    longitude   REAL    NOT NULL,
    categories  TEXT    NOT NULL,   -- comma-joined, order preserved
    favourite   INTEGER NOT NULL    -- 0 | 1
);

CREATE TABLE IF NOT EXISTS notes (
    id          INTEGER PRIMARY KEY,
    title       TEXT    NOT NULL,
    description TEXT    NOT NULL,
    date        TEXT    NOT NULL,   -- %Y-%m-%dT%H:%M:%S, no zone
    place_id    INTEGER NOT NULL REFERENCES places(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS notes_place_idx ON notes(place_id);

PRAGMA user_version = 1;
";
