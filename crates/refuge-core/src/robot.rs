//! Robot catalog entries mirrored from the external feed.

use serde::{Deserialize, Serialize};

/// One robot unit, as published by the upstream catalog.
///
/// Field names follow the feed's camelCase schema on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
  pub model:             String,
  pub serial_number:     String,
  /// Kept verbatim; the feed's date format is not ours to interpret.
  pub manufactured_date: String,
  pub category:          String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_feed_entry() {
    let robots: Vec<Robot> = serde_json::from_str(
      r#"[{"model":"M3","serialNumber":"X-1","manufacturedDate":"2021-09-03T11:04:17","category":"Land"}]"#,
    )
    .unwrap();
    assert_eq!(robots[0].serial_number, "X-1");
    assert_eq!(robots[0].category, "Land");
  }
}
