//! Core types and trait definitions for PlaceNotes.
//!
//! This crate has no HTTP or database dependencies. Storage
//! backends implement [`store::EntityStore`]; the [`datastore::DataStore`]
//! facade layers snapshots, id allocation and the orphan-place sweep on top of
//! any backend.

pub mod annotation;
pub mod datastore;
pub mod error;
pub mod fetch;
pub mod ids;
pub mod note;
pub mod place;
pub mod search;
pub mod store;

pub use error::{Error, Result};
