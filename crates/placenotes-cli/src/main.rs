//! `placenotes`: keep dated notes against places on a map.
//!
//! # Usage
//!
//! ```
//! placenotes explore --category tourism
//! placenotes add-note --name "Museum of Sydney" --lat -33.8636 --lon 151.2115 --title Visit
//! placenotes notes --ranked
//! placenotes --config ~/.config/placenotes/config.toml --json places
//! ```

mod commands;
mod geoapify;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use placenotes_core::{datastore::DataStore, fetch::LocationCategory, note::DATE_FORMAT};
use placenotes_store_sqlite::SqliteStore;
use settings::{Settings, expand_tilde};
use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Dated notes attached to places")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "placenotes.toml")]
  config: PathBuf,

  /// SQLite store to use instead of the configured `store_path`.
  #[arg(long, env = "PLACENOTES_STORE")]
  store: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List stored places, optionally filtered by name.
  Places {
    query: Option<String>,
  },

  /// List notes, optionally filtered by title or description.
  Notes {
    query: Option<String>,

    /// Split into past and upcoming notes, each in date order.
    #[arg(long)]
    ranked: bool,
  },

  /// Search notes (default) or places.
  Search {
    query: String,

    #[arg(long)]
    places: bool,
  },

  /// Add a note to a stored place or to a new location.
  AddNote(AddNoteArgs),

  /// Change the title, description or date of a note.
  EditNote {
    id: i64,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDateTime>,
  },

  /// Delete a note. Its place goes too if nothing else keeps it.
  DeleteNote {
    id: i64,
  },

  /// Mark a place as favourite, or clear the mark with `--off`.
  Favourite {
    id: i64,

    #[arg(long)]
    off: bool,
  },

  /// Remove non-favourite places without notes.
  Sweep,

  /// Delete every note and every place that is not a favourite.
  Reset {
    /// Required; the reset cannot be undone.
    #[arg(long)]
    yes: bool,
  },

  /// Search for locations of one category and show them next to stored
  /// places.
  Explore {
    #[arg(long, value_parser = parse_category)]
    category: LocationCategory,

    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// Search radius in metres.
    #[arg(long)]
    radius: Option<u32>,

    #[arg(long)]
    limit: Option<usize>,
  },

  /// Look up cities whose name starts with `text`.
  Cities {
    text: String,

    #[arg(long)]
    limit: Option<usize>,
  },

  /// List the location categories `explore` accepts.
  Categories,
}

#[derive(clap::Args, Debug)]
struct AddNoteArgs {
  #[arg(long)]
  title: String,

  #[arg(long, default_value = "")]
  description: String,

  /// Defaults to now.
  #[arg(long, value_parser = parse_date)]
  date: Option<NaiveDateTime>,

  /// Id of a stored place.
  #[arg(long, conflicts_with = "name", required_unless_present = "name")]
  place: Option<i64>,

  /// Name of a new location; requires `--lat` and `--lon`.
  #[arg(long, requires_all = ["lat", "lon"])]
  name: Option<String>,

  #[arg(long, allow_negative_numbers = true)]
  lat: Option<f64>,

  #[arg(long, allow_negative_numbers = true)]
  lon: Option<f64>,

  #[arg(long = "category")]
  categories: Vec<String>,

  #[arg(long, default_value = "")]
  country: String,
}

fn parse_date(s: &str) -> Result<NaiveDateTime, String> {
  NaiveDateTime::parse_from_str(s, DATE_FORMAT)
    .or_else(|_| {
      chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|day| day.and_time(chrono::NaiveTime::MIN))
    })
    .map_err(|_| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, got {s:?}"))
}

fn parse_category(s: &str) -> Result<LocationCategory, String> {
  s.parse()
    .map_err(|_| format!("unknown category {s:?}; see `placenotes categories`"))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing. Logs go to stderr so `--json` output stays clean.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config)?;

  let store_path = match &cli.store {
    Some(path) => expand_tilde(path),
    None => settings.store_path(),
  };
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
    && let Err(e) = std::fs::create_dir_all(parent)
  {
    warn!(?parent, error = %e, "could not create store directory");
  }

  let store = SqliteStore::open_or_degraded(&store_path).await;
  let mut data = DataStore::load(store).await;

  commands::run(cli.command, &mut data, &settings, cli.json)
    .await
    .context("command failed")
}
