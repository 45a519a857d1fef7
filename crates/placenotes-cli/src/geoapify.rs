//! Geoapify HTTP implementation of [`LocationSearch`] and [`CitySearch`].
//!
//! Both endpoints answer with a GeoJSON feature collection; only
//! `features[].properties` is read. Features without a name (locations) or a
//! city (geocoding) are skipped rather than failing the whole response.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use placenotes_core::{
  annotation::ExternalLocation,
  fetch::{CityMatch, CityQuery, CitySearch, LocationQuery, LocationSearch},
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const PLACES_ENDPOINT: &str = "https://api.geoapify.com/v2/places";
pub const GEOCODE_ENDPOINT: &str = "https://api.geoapify.com/v1/geocode/search";

/// Async client for the Geoapify places and geocoding APIs.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeoapifyClient {
  client:  Client,
  api_key: String,
}

impl GeoapifyClient {
  pub fn new(api_key: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      api_key: api_key.into(),
    })
  }

  async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
    if self.api_key.is_empty() {
      bail!("no Geoapify API key configured");
    }

    let resp = self
      .client
      .get(endpoint)
      .query(params)
      .query(&[("lang", "en"), ("apiKey", self.api_key.as_str())])
      .send()
      .await
      .with_context(|| format!("GET {endpoint} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {endpoint} → {}", resp.status()));
    }
    resp.text().await.context("reading response body")
  }

  async fn fetch_locations(&self, query: &LocationQuery) -> Result<Vec<ExternalLocation>> {
    let body = self
      .get(PLACES_ENDPOINT, &[
        ("categories", query.category.tag().to_string()),
        ("filter", query.filter.to_string()),
        ("limit", query.limit.to_string()),
      ])
      .await?;
    decode_locations(&body).context("deserialising places")
  }

  async fn fetch_cities(&self, query: &CityQuery) -> Result<Vec<CityMatch>> {
    let body = self
      .get(GEOCODE_ENDPOINT, &[
        ("text", query.text.clone()),
        ("type", "city".to_string()),
        ("limit", query.limit.to_string()),
      ])
      .await?;
    decode_cities(&body).context("deserialising cities")
  }
}

impl LocationSearch for GeoapifyClient {
  async fn search_locations(&self, query: &LocationQuery) -> Vec<ExternalLocation> {
    match self.fetch_locations(query).await {
      Ok(locations) => {
        debug!(count = locations.len(), filter = %query.filter, "places fetched");
        locations
      }
      Err(e) => {
        warn!(error = format!("{e:#}"), "location search failed");
        Vec::new()
      }
    }
  }
}

impl CitySearch for GeoapifyClient {
  async fn search_cities(&self, query: &CityQuery) -> Vec<CityMatch> {
    match self.fetch_cities(query).await {
      Ok(cities) => cities,
      Err(e) => {
        warn!(error = format!("{e:#}"), text = %query.text, "city search failed");
        Vec::new()
      }
    }
  }
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FeatureCollection<P> {
  #[serde(default = "Vec::new")]
  features: Vec<Feature<P>>,
}

#[derive(Deserialize)]
struct Feature<P> {
  properties: P,
}

#[derive(Deserialize)]
struct RawLocation {
  name:       Option<String>,
  #[serde(default)]
  categories: Vec<String>,
  lat:        f64,
  lon:        f64,
  #[serde(default)]
  country:    String,
}

#[derive(Deserialize)]
struct RawCity {
  city:    Option<String>,
  lat:     f64,
  lon:     f64,
  #[serde(default)]
  country: String,
}

/// Decode a places response body.
pub fn decode_locations(body: &str) -> serde_json::Result<Vec<ExternalLocation>> {
  let collection: FeatureCollection<RawLocation> = serde_json::from_str(body)?;
  Ok(
    collection
      .features
      .into_iter()
      .filter_map(|feature| {
        let raw = feature.properties;
        Some(ExternalLocation {
          name:       raw.name?,
          categories: raw.categories,
          latitude:   raw.lat,
          longitude:  raw.lon,
          country:    raw.country,
        })
      })
      .collect(),
  )
}

/// Decode a geocoding response body.
pub fn decode_cities(body: &str) -> serde_json::Result<Vec<CityMatch>> {
  let collection: FeatureCollection<RawCity> = serde_json::from_str(body)?;
  Ok(
    collection
      .features
      .into_iter()
      .filter_map(|feature| {
        let raw = feature.properties;
        Some(CityMatch {
          city:      raw.city?,
          latitude:  raw.lat,
          longitude: raw.lon,
          country:   raw.country,
        })
      })
      .collect(),
  )
}
