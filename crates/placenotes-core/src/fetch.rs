//! Boundary types for the two external search collaborators.
//!
//! Both collaborators are opaque asynchronous producers. A failed request and
//! a request with no results look the same from here: an empty vector.
//! Implementations log the failure and move on.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::annotation::ExternalLocation;

/// Result count requested from the location search unless configured.
pub const DEFAULT_LOCATION_LIMIT: usize = 40;

/// Result count requested from the city search unless configured.
pub const DEFAULT_CITY_LIMIT: usize = 5;

/// Radius of the circle searched around the current map centre.
pub const DEFAULT_RADIUS_METRES: u32 = 5000;

// ─── Categories ──────────────────────────────────────────────────────────────

/// The place categories a location search may be restricted to. The string
/// form is the tag sent on the wire.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
pub enum LocationCategory {
  #[strum(serialize = "accommodation")]
  Accommodation,
  #[strum(serialize = "childcare")]
  Childcare,
  #[strum(serialize = "commercial.clothing")]
  Clothing,
  #[strum(serialize = "commercial")]
  Commercial,
  #[strum(serialize = "education")]
  Education,
  #[strum(serialize = "emergency")]
  Emergency,
  #[strum(serialize = "entertainment")]
  Entertainment,
  #[strum(serialize = "commercial.food_and_drink")]
  FoodAndDrink,
  #[strum(serialize = "office.government")]
  Government,
  #[strum(serialize = "healthcare")]
  Healthcare,
  #[strum(serialize = "office.lawyer")]
  Lawyer,
  #[strum(serialize = "leisure")]
  Leisure,
  #[strum(serialize = "office")]
  Office,
  #[strum(serialize = "public_transport")]
  PublicTransport,
  #[strum(serialize = "religion")]
  Religion,
  #[strum(serialize = "service")]
  Service,
  #[strum(serialize = "sport")]
  Sport,
  #[strum(serialize = "office.telecommunication")]
  Telecommunication,
  #[strum(serialize = "tourism")]
  Tourism,
}

impl LocationCategory {
  /// The wire tag, e.g. `commercial.food_and_drink`.
  pub fn tag(self) -> &'static str { self.into() }
}

// ─── Geographic filter ───────────────────────────────────────────────────────

/// The area a location search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFilter {
  Circle {
    lon:           f64,
    lat:           f64,
    radius_metres: u32,
  },
  Rect {
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
  },
}

impl LocationFilter {
  /// A circle of `radius_metres` centred on the given point.
  pub fn around(lat: f64, lon: f64, radius_metres: u32) -> Self {
    Self::Circle {
      lon,
      lat,
      radius_metres,
    }
  }
}

impl fmt::Display for LocationFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Circle {
        lon,
        lat,
        radius_metres,
      } => write!(f, "circle:{lon},{lat},{radius_metres}"),
      Self::Rect {
        lon1,
        lat1,
        lon2,
        lat2,
      } => write!(f, "rect:{lon1},{lat1},{lon2},{lat2}"),
    }
  }
}

// ─── Queries and results ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
  pub category: LocationCategory,
  pub filter:   LocationFilter,
  pub limit:    usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
  /// Prefix of the city name as typed so far.
  pub text:  String,
  pub limit: usize,
}

/// A city returned by [`CitySearch`]; used to move the map, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMatch {
  pub city:      String,
  pub latitude:  f64,
  pub longitude: f64,
  pub country:   String,
}

// ─── Collaborator traits ─────────────────────────────────────────────────────

/// Finds named places of one category inside a geographic filter.
pub trait LocationSearch: Send + Sync {
  fn search_locations(
    &self,
    query: &LocationQuery,
  ) -> impl Future<Output = Vec<ExternalLocation>> + Send;
}

/// Finds cities whose name starts with the query text.
pub trait CitySearch: Send + Sync {
  fn search_cities(
    &self,
    query: &CityQuery,
  ) -> impl Future<Output = Vec<CityMatch>> + Send;
}
