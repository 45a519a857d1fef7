//! Plain-text and JSON output for the command line.

use anyhow::Context as _;
use placenotes_core::{
  annotation::AnnotationPoint,
  fetch::CityMatch,
  note::{DATE_FORMAT, Note},
  place::Place,
};
use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
  let out = serde_json::to_string_pretty(value).context("serialising output")?;
  println!("{out}");
  Ok(())
}

pub fn place_line(place: &Place) -> String {
  let star = if place.is_favourite { "*" } else { " " };
  format!(
    "{star} #{:<4} {} ({}, {}) [{}]",
    place.id,
    place.name,
    place.latitude,
    place.longitude,
    place.categories.join(", ")
  )
}

/// `place` is the note's place if it is still in the snapshot.
pub fn note_line(note: &Note, place: Option<&Place>) -> String {
  let at = place.map_or("?", |place| place.name.as_str());
  let mut line = format!(
    "#{:<4} {}  {} @ {at}",
    note.id,
    note.date.format(DATE_FORMAT),
    note.title
  );
  if !note.description.is_empty() {
    line.push_str(" - ");
    line.push_str(&note.description);
  }
  line
}

pub fn annotation_line(point: &AnnotationPoint) -> String {
  let (lat, lon) = point.coordinate();
  let tag = match point {
    AnnotationPoint::Known(place) => format!("known #{}", place.id),
    AnnotationPoint::Candidate(_) => "new".to_string(),
  };
  format!(
    "[{tag}] {} ({lat}, {lon}) [{}]",
    point.name(),
    point.categories().join(", ")
  )
}

pub fn city_line(city: &CityMatch) -> String {
  format!("{}, {} ({}, {})", city.city, city.country, city.latitude, city.longitude)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use placenotes_core::annotation::ExternalLocation;

  use super::*;

  fn place() -> Place {
    Place {
      id:           3,
      name:         "Opera House".into(),
      latitude:     -33.85,
      longitude:    151.2,
      categories:   vec!["tourism".into(), "entertainment".into()],
      is_favourite: true,
    }
  }

  #[test]
  fn favourite_places_are_starred() {
    assert_eq!(
      place_line(&place()),
      "* #3    Opera House (-33.85, 151.2) [tourism, entertainment]"
    );
  }

  #[test]
  fn note_line_names_its_place() {
    let note = Note {
      id:          7,
      title:       "Concert".into(),
      description: String::new(),
      date:        NaiveDate::from_ymd_opt(2025, 11, 2)
        .unwrap()
        .and_hms_opt(19, 30, 0)
        .unwrap(),
      place_id:    3,
    };
    assert_eq!(
      note_line(&note, Some(&place())),
      "#7    2025-11-02T19:30:00  Concert @ Opera House"
    );
    assert!(note_line(&note, None).ends_with("@ ?"));
  }

  #[test]
  fn candidates_are_marked_new() {
    let point = AnnotationPoint::Candidate(ExternalLocation {
      name:       "Cafe".into(),
      categories: vec!["catering.cafe".into()],
      latitude:   1.0,
      longitude:  2.5,
      country:    "Australia".into(),
    });
    assert_eq!(annotation_line(&point), "[new] Cafe (1, 2.5) [catering.cafe]");
    assert!(annotation_line(&AnnotationPoint::Known(place())).starts_with("[known #3]"));
  }
}
