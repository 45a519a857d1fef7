//! Map annotations: merging stored places with fresh search results.
//!
//! A search returns candidate locations, some of which the user already has
//! notes for. [`classify`] shows every stored place once and only those
//! candidates that are not already stored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
  fetch::{LocationQuery, LocationSearch},
  place::Place,
};

/// A location produced by the external location search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLocation {
  pub name:       String,
  pub categories: Vec<String>,
  pub latitude:   f64,
  pub longitude:  f64,
  pub country:    String,
}

/// A point to draw on the map. Never written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "point", rename_all = "snake_case")]
pub enum AnnotationPoint {
  /// A persisted place.
  Known(Place),
  /// A search result with no matching place.
  Candidate(ExternalLocation),
}

impl AnnotationPoint {
  pub fn name(&self) -> &str {
    match self {
      Self::Known(place) => &place.name,
      Self::Candidate(location) => &location.name,
    }
  }

  pub fn categories(&self) -> &[String] {
    match self {
      Self::Known(place) => &place.categories,
      Self::Candidate(location) => &location.categories,
    }
  }

  /// `(latitude, longitude)`.
  pub fn coordinate(&self) -> (f64, f64) {
    match self {
      Self::Known(place) => (place.latitude, place.longitude),
      Self::Candidate(location) => (location.latitude, location.longitude),
    }
  }

  pub fn is_known(&self) -> bool { matches!(self, Self::Known(_)) }
}

/// Whether `candidate` is the same point as `place`: identical name and
/// bit-for-bit equal coordinates. No tolerance is applied.
#[allow(clippy::float_cmp)]
pub fn matches(candidate: &ExternalLocation, place: &Place) -> bool {
  candidate.name == place.name
    && candidate.latitude == place.latitude
    && candidate.longitude == place.longitude
}

/// Every place as [`AnnotationPoint::Known`], followed by every candidate
/// that matches no place as [`AnnotationPoint::Candidate`]. Input order is
/// kept within each group.
pub fn classify(
  places: &[Place],
  candidates: &[ExternalLocation],
) -> Vec<AnnotationPoint> {
  let known = places.iter().cloned().map(AnnotationPoint::Known);
  let unsaved = candidates
    .iter()
    .filter(|candidate| !places.iter().any(|place| matches(candidate, place)))
    .cloned()
    .map(AnnotationPoint::Candidate);
  known.chain(unsaved).collect()
}

// ─── Candidate cache ─────────────────────────────────────────────────────────

/// Results of the most recent location search.
///
/// Empty until a search completes. Each completed search replaces the whole
/// list, in completion order: a slow earlier search that finishes last wins.
#[derive(Debug, Clone, Default)]
pub struct CandidateCache {
  locations: Vec<ExternalLocation>,
}

impl CandidateCache {
  pub fn new() -> Self { Self::default() }

  /// Run `query` against `source` and replace the cached list with the
  /// result. Returns the number of candidates now cached.
  pub async fn search<L: LocationSearch>(
    &mut self,
    source: &L,
    query: &LocationQuery,
  ) -> usize {
    let locations = source.search_locations(query).await;
    debug!(
      category = query.category.tag(),
      count = locations.len(),
      "location search completed"
    );
    self.replace(locations);
    self.locations.len()
  }

  pub fn replace(&mut self, locations: Vec<ExternalLocation>) { self.locations = locations; }

  pub fn clear(&mut self) { self.locations.clear(); }

  pub fn as_slice(&self) -> &[ExternalLocation] { &self.locations }

  pub fn len(&self) -> usize { self.locations.len() }

  pub fn is_empty(&self) -> bool { self.locations.is_empty() }

  /// [`classify`] the cached candidates against `places`.
  pub fn classify(&self, places: &[Place]) -> Vec<AnnotationPoint> {
    classify(places, &self.locations)
  }
}
