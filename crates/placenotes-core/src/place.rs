//! A named geographic point that notes attach to.
//!
//! A place row only exists while it is a favourite or at least one note
//! refers to it. Places are never deleted by id; they disappear when the
//! orphan sweep finds them unreferenced.

use serde::{Deserialize, Serialize};

use crate::annotation::ExternalLocation;

pub type PlaceId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
  pub id:           PlaceId,
  pub name:         String,
  pub latitude:     f64,
  pub longitude:    f64,
  /// Free-form category tags in their original order, e.g.
  /// `commercial.food_and_drink`.
  pub categories:   Vec<String>,
  pub is_favourite: bool,
}

impl Place {
  /// Promote a search result to a new, non-favourite place.
  pub fn from_location(id: PlaceId, location: &ExternalLocation) -> Self {
    Self {
      id,
      name: location.name.clone(),
      latitude: location.latitude,
      longitude: location.longitude,
      categories: location.categories.clone(),
      is_favourite: false,
    }
  }
}
