//! One function per subcommand: call the facade, then print the outcome.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDateTime};
use placenotes_core::{
  Error,
  annotation::{AnnotationPoint, CandidateCache, ExternalLocation, matches},
  datastore::DataStore,
  fetch::{CityQuery, CitySearch, LocationCategory, LocationFilter, LocationQuery},
  note::{Note, NoteDraft},
  search::{SearchResults, SearchScope},
  store::EntityStore,
};
use serde_json::json;
use strum::IntoEnumIterator;

use crate::{
  AddNoteArgs, Command,
  geoapify::GeoapifyClient,
  render::{annotation_line, city_line, note_line, place_line, print_json},
  settings::Settings,
};

fn now() -> NaiveDateTime { Local::now().naive_local() }

pub async fn run<S: EntityStore>(
  command: Command,
  data: &mut DataStore<S>,
  settings: &Settings,
  json: bool,
) -> Result<()> {
  match command {
    Command::Places { query } => {
      let results = data.search(query.as_deref().unwrap_or_default(), SearchScope::Places);
      print_results(data, &results, json)
    }
    Command::Notes { query, ranked: true } => {
      if query.is_some() {
        bail!("--ranked lists every note and takes no query");
      }
      let ranked = data.ranked_notes(now());
      if json {
        return print_json(&ranked);
      }
      println!("Upcoming");
      for note in &ranked.upcoming {
        println!("  {}", note_line(note, data.get_place(note.place_id)));
      }
      println!("Past");
      for note in &ranked.past {
        println!("  {}", note_line(note, data.get_place(note.place_id)));
      }
      Ok(())
    }
    Command::Notes { query, ranked: false } => {
      let results = data.search(query.as_deref().unwrap_or_default(), SearchScope::Notes);
      print_results(data, &results, json)
    }
    Command::Search { query, places } => {
      let scope = if places { SearchScope::Places } else { SearchScope::Notes };
      let results = data.search(&query, scope);
      print_results(data, &results, json)
    }
    Command::AddNote(args) => add_note(data, args, json).await,
    Command::EditNote {
      id,
      title,
      description,
      date,
    } => {
      let current = data.get_note(id).ok_or(Error::NoteNotFound(id))?;
      let draft = NoteDraft::new(
        title.unwrap_or_else(|| current.title.clone()),
        description.unwrap_or_else(|| current.description.clone()),
        date.unwrap_or(current.date),
      );
      let edited = data.edit_note(id, draft).await?;
      print_note(data, &edited, "updated", json)
    }
    Command::DeleteNote { id } => {
      let place_id = data.get_note(id).ok_or(Error::NoteNotFound(id))?.place_id;
      data.delete_note(id).await?;
      let place_kept = data.get_place(place_id).is_some();
      if json {
        return print_json(&json!({ "deleted": id, "place_id": place_id, "place_kept": place_kept }));
      }
      println!("deleted note #{id}");
      if !place_kept {
        println!("removed place #{place_id}; it had no other notes");
      }
      Ok(())
    }
    Command::Favourite { id, off } => {
      let exists = data.set_favourite(id, !off).await?;
      if json {
        return print_json(&json!({ "place_id": id, "favourite": !off, "exists": exists }));
      }
      match (off, exists) {
        (false, _) => println!("place #{id} is now a favourite"),
        (true, true) => println!("place #{id} is no longer a favourite"),
        (true, false) => println!("place #{id} is no longer a favourite and was removed"),
      }
      Ok(())
    }
    Command::Sweep => {
      let before = data.places().len();
      data.clear_unused_places().await?;
      let removed = before.saturating_sub(data.places().len());
      if json {
        return print_json(&json!({ "removed": removed }));
      }
      println!("removed {removed} unused place(s)");
      Ok(())
    }
    Command::Reset { yes } => {
      if !yes {
        bail!("reset deletes every note; pass --yes to confirm");
      }
      data.complete_reset().await?;
      if json {
        return print_json(&json!({ "places_kept": data.places().len() }));
      }
      println!("all notes deleted; {} favourite place(s) kept", data.places().len());
      Ok(())
    }
    Command::Explore {
      category,
      lat,
      lon,
      radius,
      limit,
    } => {
      let query = LocationQuery {
        category,
        filter: LocationFilter::around(
          lat.unwrap_or(settings.home_latitude),
          lon.unwrap_or(settings.home_longitude),
          radius.unwrap_or(settings.search_radius_metres),
        ),
        limit: limit.unwrap_or(settings.location_limit),
      };
      let client = GeoapifyClient::new(settings.geoapify_api_key.as_str())?;
      let mut cache = CandidateCache::new();
      cache.search(&client, &query).await;

      let points = cache.classify(data.places());
      if json {
        return print_json(&points);
      }
      for point in &points {
        println!("{}", annotation_line(point));
      }
      Ok(())
    }
    Command::Cities { text, limit } => {
      let client = GeoapifyClient::new(settings.geoapify_api_key.as_str())?;
      let cities = client
        .search_cities(&CityQuery {
          text,
          limit: limit.unwrap_or(settings.city_limit),
        })
        .await;
      if json {
        return print_json(&cities);
      }
      for city in &cities {
        println!("{}", city_line(city));
      }
      Ok(())
    }
    Command::Categories => {
      let tags: Vec<&str> = LocationCategory::iter().map(LocationCategory::tag).collect();
      if json {
        return print_json(&tags);
      }
      for tag in tags {
        println!("{tag}");
      }
      Ok(())
    }
  }
}

async fn add_note<S: EntityStore>(
  data: &mut DataStore<S>,
  args: AddNoteArgs,
  json: bool,
) -> Result<()> {
  let target = match args.place {
    Some(id) => {
      let place = data.get_place(id).cloned().ok_or(Error::PlaceNotFound(id))?;
      AnnotationPoint::Known(place)
    }
    None => {
      let (Some(name), Some(latitude), Some(longitude)) = (args.name, args.lat, args.lon) else {
        bail!("a new location needs --name, --lat and --lon");
      };
      let location = ExternalLocation {
        name,
        categories: args.categories,
        latitude,
        longitude,
        country: args.country,
      };
      // A location that is already stored gets the note on the stored place.
      match data.places().iter().find(|place| matches(&location, place)) {
        Some(place) => AnnotationPoint::Known(place.clone()),
        None => AnnotationPoint::Candidate(location),
      }
    }
  };

  let draft = NoteDraft::new(args.title, args.description, args.date.unwrap_or_else(now));
  let note = data.add_note_at(&target, draft).await?;
  print_note(data, &note, "added", json)
}

// ─── Output helpers ──────────────────────────────────────────────────────────

fn print_note<S: EntityStore>(
  data: &DataStore<S>,
  note: &Note,
  verb: &str,
  json: bool,
) -> Result<()> {
  if json {
    return print_json(note);
  }
  println!("{verb} {}", note_line(note, data.get_place(note.place_id)));
  Ok(())
}

fn print_results<S: EntityStore>(
  data: &DataStore<S>,
  results: &SearchResults<'_>,
  json: bool,
) -> Result<()> {
  match results {
    SearchResults::Places(places) => {
      if json {
        return print_json(places);
      }
      for place in places {
        println!("{}", place_line(place));
      }
    }
    SearchResults::Notes(notes) => {
      if json {
        return print_json(notes);
      }
      for note in notes {
        println!("{}", note_line(note, data.get_place(note.place_id)));
      }
    }
  }
  Ok(())
}
