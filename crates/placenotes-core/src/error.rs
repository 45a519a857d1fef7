//! Error types for `placenotes-core`.

use thiserror::Error;

use crate::{note::NoteId, place::PlaceId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("place not found: {0}")]
  PlaceNotFound(PlaceId),

  #[error("note not found: {0}")]
  NoteNotFound(NoteId),

  /// A backend operation failed. The cached snapshot is left untouched.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
