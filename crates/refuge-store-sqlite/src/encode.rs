//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and string lists (resources, reporters) as compact JSON arrays.
//! Coordinates are widened to `REAL` on the way in; the `f32 -> f64 -> f32`
//! trip is lossless.

use chrono::{DateTime, Utc};
use refuge_core::{
  robot::Robot,
  survivor::{Location, LocationRecord, Survivor},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── String lists ─────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Location ─────────────────────────────────────────────────────────────────

pub fn encode_location(l: Location) -> (f64, f64) {
  (f64::from(l.latitude), f64::from(l.longitude))
}

pub fn decode_location(latitude: f64, longitude: f64) -> Location {
  Location::new(latitude as f32, longitude as f32)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column order shared by every `SELECT` that builds a [`RawSurvivor`].
pub const SURVIVOR_COLUMNS: &str = "survivor_id, name, age, latitude, \
                                    longitude, resources, reported_count, \
                                    reported_by";

/// Raw values read directly from a `survivors` row.
pub struct RawSurvivor {
  pub survivor_id:    String,
  pub name:           String,
  pub age:            u32,
  pub latitude:       f64,
  pub longitude:      f64,
  pub resources:      String,
  pub reported_count: u32,
  pub reported_by:    String,
}

impl RawSurvivor {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawSurvivor {
      survivor_id:    row.get(0)?,
      name:           row.get(1)?,
      age:            row.get(2)?,
      latitude:       row.get(3)?,
      longitude:      row.get(4)?,
      resources:      row.get(5)?,
      reported_count: row.get(6)?,
      reported_by:    row.get(7)?,
    })
  }

  pub fn into_survivor(self) -> Result<Survivor> {
    Ok(Survivor {
      id:             self.survivor_id,
      name:           self.name,
      age:            self.age,
      location:       decode_location(self.latitude, self.longitude),
      resources:      decode_list(&self.resources)?,
      reported_count: self.reported_count,
      reported_by:    decode_list(&self.reported_by)?,
    })
  }
}

/// Raw values read directly from a `location_history` row.
pub struct RawLocationRecord {
  pub entry_id:    String,
  pub survivor_id: String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub recorded_at: String,
}

impl RawLocationRecord {
  pub fn into_record(self) -> Result<LocationRecord> {
    Ok(LocationRecord {
      entry_id:    decode_uuid(&self.entry_id)?,
      survivor_id: self.survivor_id,
      location:    decode_location(self.latitude, self.longitude),
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Robots need no decoding; a row maps straight onto the domain type.
pub fn robot_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Robot> {
  Ok(Robot {
    model:             row.get(0)?,
    serial_number:     row.get(1)?,
    manufactured_date: row.get(2)?,
    category:          row.get(3)?,
  })
}
