//! Error type for `placenotes-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The database file could not be opened or created.
  #[error("failed to open database at {path:?}: {source}")]
  Open {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  /// Creating the tables failed.
  #[error("schema initialisation failed: {0}")]
  Schema(#[source] tokio_rusqlite::Error),

  /// A single statement failed to prepare, bind or execute.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The store was opened in degraded mode; nothing can be read or written.
  #[error("store unavailable: the database could not be opened")]
  Unavailable,

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
