//! SQLite backend for the PlaceNotes entity store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on one dedicated
//! thread. That thread is the only writer; calls are applied in the order
//! they are issued.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
