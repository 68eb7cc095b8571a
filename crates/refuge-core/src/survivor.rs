//! Survivor types: the tracked individuals and their movement history.
//!
//! A survivor is created once, partially updated any number of times, and
//! accumulates infection reports. Survivors are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Location ────────────────────────────────────────────────────────────────

/// A latitude/longitude pair.
///
/// `(0.0, 0.0)` doubles as "no location supplied" in update requests, so the
/// exact null island is not a representable destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub latitude:  f32,
  pub longitude: f32,
}

impl Location {
  pub fn new(latitude: f32, longitude: f32) -> Self {
    Self { latitude, longitude }
  }

  pub fn is_unset(&self) -> bool { *self == Self::default() }
}

// ─── Survivor ────────────────────────────────────────────────────────────────

/// A survivor as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survivor {
  pub id:             String,
  pub name:           String,
  pub age:            u32,
  pub location:       Location,
  /// Inventory of resources, in the order the survivor declared them.
  #[serde(default)]
  pub resources:      Vec<String>,
  /// Number of infection reports received so far.
  #[serde(rename = "reportedcount", default)]
  pub reported_count: u32,
  /// Identifiers of the reporters, one entry per report (not deduplicated).
  #[serde(default)]
  pub reported_by:    Vec<String>,
}

/// Input to [`crate::store::TrackerStore::insert_survivor`].
///
/// Infection state is never accepted from callers; a new survivor always
/// starts with zero reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSurvivor {
  pub id:        String,
  #[serde(default)]
  pub name:      String,
  #[serde(default)]
  pub age:       u32,
  #[serde(default)]
  pub location:  Location,
  #[serde(default)]
  pub resources: Vec<String>,
}

impl NewSurvivor {
  /// Reject inputs that cannot be stored at all.
  pub fn validate(&self) -> Result<()> {
    if self.id.trim().is_empty() {
      return Err(Error::Validation("survivor id is required".to_owned()));
    }
    Ok(())
  }

  pub fn into_survivor(self) -> Survivor {
    Survivor {
      id:             self.id,
      name:           self.name,
      age:            self.age,
      location:       self.location,
      resources:      self.resources,
      reported_count: 0,
      reported_by:    Vec::new(),
    }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// The request body of a survivor update. Every field except `id` may be
/// omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurvivorPatch {
  pub id:       String,
  pub name:     Option<String>,
  pub age:      Option<u32>,
  pub location: Option<Location>,
}

/// A normalised partial update: `None` means "leave untouched".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivorUpdate {
  pub id:       String,
  pub name:     Option<String>,
  pub age:      Option<u32>,
  pub location: Option<Location>,
}

impl SurvivorUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.age.is_none() && self.location.is_none()
  }
}

impl From<SurvivorPatch> for SurvivorUpdate {
  /// Empty names, a zero age and an unset location are treated the same as
  /// absent fields.
  fn from(p: SurvivorPatch) -> Self {
    SurvivorUpdate {
      id:       p.id,
      name:     p.name.filter(|n| !n.is_empty()),
      age:      p.age.filter(|a| *a > 0),
      location: p.location.filter(|l| !l.is_unset()),
    }
  }
}

// ─── Infection report ────────────────────────────────────────────────────────

/// An accusation that survivor `id` is infected, made by `reported_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionClaim {
  pub id:          String,
  pub reported_by: String,
}

impl InfectionClaim {
  pub fn validate(&self) -> Result<()> {
    if self.reported_by.trim().is_empty() {
      return Err(Error::Validation("reported_by is required".to_owned()));
    }
    Ok(())
  }
}

// ─── Location history ────────────────────────────────────────────────────────

/// One append-only entry in a survivor's movement trail. Written whenever an
/// update carries a location; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
  pub entry_id:    Uuid,
  pub survivor_id: String,
  pub location:    Location,
  /// Server-assigned timestamp.
  pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patch_drops_empty_and_zero_fields() {
    let update = SurvivorUpdate::from(SurvivorPatch {
      id:       "s1".into(),
      name:     Some(String::new()),
      age:      Some(0),
      location: Some(Location::default()),
    });
    assert_eq!(update.id, "s1");
    assert!(update.is_empty());
  }

  #[test]
  fn patch_keeps_supplied_fields() {
    let update = SurvivorUpdate::from(SurvivorPatch {
      id:       "s1".into(),
      name:     None,
      age:      Some(31),
      location: Some(Location::new(41.0, -3.0)),
    });
    assert_eq!(update.name, None);
    assert_eq!(update.age, Some(31));
    assert_eq!(update.location, Some(Location::new(41.0, -3.0)));
  }

  #[test]
  fn patch_parses_with_only_an_id() {
    let patch: SurvivorPatch = serde_json::from_str(r#"{"id":"s1"}"#).unwrap();
    assert!(SurvivorUpdate::from(patch).is_empty());
  }

  #[test]
  fn new_survivor_requires_id() {
    let input: NewSurvivor =
      serde_json::from_str(r#"{"id":"  ","name":"Ana"}"#).unwrap();
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn infection_claim_requires_reporter() {
    let claim = InfectionClaim { id: "s1".into(), reported_by: " ".into() };
    let err = claim.validate().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.to_string(), "reported_by is required");

    let claim = InfectionClaim { id: "s1".into(), reported_by: "s2".into() };
    assert!(claim.validate().is_ok());
  }

  #[test]
  fn new_survivor_starts_uninfected() {
    let input: NewSurvivor = serde_json::from_str(
      r#"{"id":"s1","name":"Ana","age":30,
          "location":{"latitude":40.1,"longitude":-3.7},
          "resources":["water","ammo"],"reportedcount":9}"#,
    )
    .unwrap();
    let survivor = input.into_survivor();
    assert_eq!(survivor.reported_count, 0);
    assert_eq!(survivor.resources, vec!["water", "ammo"]);
  }

  #[test]
  fn survivor_uses_wire_names() {
    let survivor = Survivor {
      id:             "s1".into(),
      name:           "Ana".into(),
      age:            30,
      location:       Location::new(1.5, 2.5),
      resources:      vec![],
      reported_count: 2,
      reported_by:    vec!["s2".into(), "s3".into()],
    };
    let json = serde_json::to_value(&survivor).unwrap();
    assert_eq!(json["reportedcount"], 2);
    assert_eq!(json["reported_by"][1], "s3");
    assert_eq!(json["location"]["latitude"], 1.5);
  }
}
