//! Infection classification and the derived percentage report.
//!
//! Nothing here is stored. A survivor is "infected" once its report count
//! reaches the threshold; the percentages are recomputed on every request.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Report count at which a survivor counts as infected, unless configured
/// otherwise.
pub const DEFAULT_INFECTION_THRESHOLD: u32 = 3;

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Which side of the threshold a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criteria {
  Infected,
  NonInfected,
}

impl Criteria {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Infected => "infected",
      Self::NonInfected => "non-infected",
    }
  }
}

impl fmt::Display for Criteria {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Criteria {
  type Err = Error;

  /// Only the two exact literals are accepted; no case folding.
  fn from_str(s: &str) -> Result<Self> {
    match s {
      "infected" => Ok(Self::Infected),
      "non-infected" => Ok(Self::NonInfected),
      other => Err(Error::Validation(format!("invalid url {other}"))),
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// A criteria bound to a concrete threshold, handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfectionFilter {
  pub criteria:  Criteria,
  pub threshold: u32,
}

impl InfectionFilter {
  pub fn infected(threshold: u32) -> Self {
    Self { criteria: Criteria::Infected, threshold }
  }

  pub fn non_infected(threshold: u32) -> Self {
    Self { criteria: Criteria::NonInfected, threshold }
  }

  pub fn matches(&self, reported_count: u32) -> bool {
    match self.criteria {
      Criteria::Infected => reported_count >= self.threshold,
      Criteria::NonInfected => reported_count < self.threshold,
    }
  }
}

// ─── Percentage report ───────────────────────────────────────────────────────

/// Share of infected and non-infected survivors, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfectionReport {
  pub infected:     f32,
  pub non_infected: f32,
}

impl InfectionReport {
  /// Compute the report for `infected` out of `total` survivors.
  ///
  /// Returns [`Error::NoData`] when `total` is zero.
  pub fn compute(infected: u64, total: u64) -> Result<Self> {
    if total == 0 {
      return Err(Error::NoData);
    }
    let infected = infected.min(total);
    let total_f = total as f32;
    Ok(Self {
      infected:     (infected as f32 * 100.0) / total_f,
      non_infected: ((total - infected) as f32 * 100.0) / total_f,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn criteria_accepts_exact_literals_only() {
    assert_eq!("infected".parse::<Criteria>().unwrap(), Criteria::Infected);
    assert_eq!(
      "non-infected".parse::<Criteria>().unwrap(),
      Criteria::NonInfected
    );
    for bad in ["Infected", "non_infected", "", "percentage"] {
      let err = bad.parse::<Criteria>().unwrap_err();
      assert!(matches!(err, Error::Validation(_)), "{bad:?} accepted");
    }
  }

  #[test]
  fn filter_splits_at_threshold() {
    let infected = InfectionFilter::infected(3);
    let clean = InfectionFilter::non_infected(3);
    for count in 0..6 {
      assert_ne!(infected.matches(count), clean.matches(count));
    }
    assert!(!infected.matches(2));
    assert!(infected.matches(3));
  }

  #[test]
  fn percentages_sum_to_one_hundred() {
    let report = InfectionReport::compute(1, 4).unwrap();
    assert_eq!(report.infected, 25.0);
    assert_eq!(report.non_infected, 75.0);

    let report = InfectionReport::compute(1, 3).unwrap();
    assert!((report.infected + report.non_infected - 100.0).abs() < 0.001);
  }

  #[test]
  fn zero_survivors_is_no_data() {
    assert!(matches!(InfectionReport::compute(0, 0), Err(Error::NoData)));
  }

  #[test]
  fn report_uses_snake_case_keys() {
    let json = serde_json::to_value(InfectionReport::compute(0, 2).unwrap())
      .unwrap();
    assert_eq!(json["infected"], 0.0);
    assert_eq!(json["non_infected"], 100.0);
  }
}
