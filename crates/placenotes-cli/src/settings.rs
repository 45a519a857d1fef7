//! Layered configuration: an optional TOML file overlaid by `PLACENOTES_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use placenotes_core::fetch::{DEFAULT_CITY_LIMIT, DEFAULT_LOCATION_LIMIT, DEFAULT_RADIUS_METRES};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
  /// SQLite file holding places and notes. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,

  /// Key for the Geoapify places and geocoding APIs. Searches return
  /// nothing while this is empty.
  #[serde(default)]
  pub geoapify_api_key: String,

  #[serde(default = "default_location_limit")]
  pub location_limit: usize,

  #[serde(default = "default_city_limit")]
  pub city_limit: usize,

  #[serde(default = "default_search_radius_metres")]
  pub search_radius_metres: u32,

  /// Map centre used by `explore` when no coordinate is given.
  #[serde(default = "default_home_latitude")]
  pub home_latitude: f64,

  #[serde(default = "default_home_longitude")]
  pub home_longitude: f64,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/placenotes/PlaceNotes.sqlite") }
fn default_location_limit() -> usize { DEFAULT_LOCATION_LIMIT }
fn default_city_limit() -> usize { DEFAULT_CITY_LIMIT }
fn default_search_radius_metres() -> u32 { DEFAULT_RADIUS_METRES }
fn default_home_latitude() -> f64 { -33.8837 }
fn default_home_longitude() -> f64 { 151.2006 }

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:           default_store_path(),
      geoapify_api_key:     String::new(),
      location_limit:       default_location_limit(),
      city_limit:           default_city_limit(),
      search_radius_metres: default_search_radius_metres(),
      home_latitude:        default_home_latitude(),
      home_longitude:       default_home_longitude(),
    }
  }
}

impl Settings {
  /// Read `path` if it exists, then apply `PLACENOTES_*` overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PLACENOTES"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
