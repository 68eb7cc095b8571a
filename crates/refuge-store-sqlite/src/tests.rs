//! Integration tests for `SqliteStore` against an in-memory database.

use refuge_core::{
  report::InfectionFilter,
  robot::Robot,
  store::TrackerStore,
  survivor::{Location, NewSurvivor, SurvivorUpdate},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ana() -> NewSurvivor {
  NewSurvivor {
    id:        "s1".into(),
    name:      "Ana".into(),
    age:       30,
    location:  Location::new(40.1, -3.7),
    resources: vec!["water".into(), "ammo".into()],
  }
}

fn survivor(id: &str) -> NewSurvivor {
  NewSurvivor {
    id:        id.into(),
    name:      format!("survivor {id}"),
    age:       25,
    location:  Location::new(10.0, 20.0),
    resources: vec![],
  }
}

fn robot(serial: &str) -> Robot {
  Robot {
    model:             "RX-78".into(),
    serial_number:     serial.into(),
    manufactured_date: "2021-09-03T11:04:17".into(),
    category:          "Land".into(),
  }
}

// ─── Creation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_survivor() {
  let s = store().await;

  assert!(s.insert_survivor(ana()).await.unwrap());
  assert!(s.survivor_exists("s1").await.unwrap());

  let fetched = s.get_survivor("s1").await.unwrap().unwrap();
  assert_eq!(fetched.name, "Ana");
  assert_eq!(fetched.age, 30);
  assert_eq!(fetched.location, Location::new(40.1, -3.7));
  assert_eq!(fetched.resources, vec!["water", "ammo"]);
  assert_eq!(fetched.reported_count, 0);
  assert!(fetched.reported_by.is_empty());
}

#[tokio::test]
async fn get_survivor_missing_returns_none() {
  let s = store().await;
  assert!(s.get_survivor("nobody").await.unwrap().is_none());
  assert!(!s.survivor_exists("nobody").await.unwrap());
}

#[tokio::test]
async fn duplicate_insert_is_refused_and_keeps_original() {
  let s = store().await;
  assert!(s.insert_survivor(ana()).await.unwrap());

  let mut impostor = ana();
  impostor.name = "Impostor".into();
  assert!(!s.insert_survivor(impostor).await.unwrap());

  let fetched = s.get_survivor("s1").await.unwrap().unwrap();
  assert_eq!(fetched.name, "Ana");
  assert_eq!(s.count_survivors(None).await.unwrap(), 1);
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_supplied_fields() {
  let s = store().await;
  s.insert_survivor(ana()).await.unwrap();
  s.mark_infected("s1", "s2").await.unwrap();

  let updated = s
    .update_survivor(SurvivorUpdate {
      id: "s1".into(),
      age: Some(31),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(updated);

  let fetched = s.get_survivor("s1").await.unwrap().unwrap();
  assert_eq!(fetched.age, 31);
  assert_eq!(fetched.name, "Ana");
  assert_eq!(fetched.location, Location::new(40.1, -3.7));
  assert_eq!(fetched.resources, vec!["water", "ammo"]);
  assert_eq!(fetched.reported_count, 1);
  assert_eq!(fetched.reported_by, vec!["s2"]);
  assert!(s.location_history("s1").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_with_location_appends_one_history_entry() {
  let s = store().await;
  s.insert_survivor(ana()).await.unwrap();

  s.update_survivor(SurvivorUpdate {
    id: "s1".into(),
    location: Some(Location::new(41.0, -3.0)),
    ..Default::default()
  })
  .await
  .unwrap();

  let fetched = s.get_survivor("s1").await.unwrap().unwrap();
  assert_eq!(fetched.location, Location::new(41.0, -3.0));

  let history = s.location_history("s1").await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].survivor_id, "s1");
  assert_eq!(history[0].location, Location::new(41.0, -3.0));
}

#[tokio::test]
async fn history_is_ordered_oldest_first() {
  let s = store().await;
  s.insert_survivor(ana()).await.unwrap();

  for lat in [1.0, 2.0, 3.0] {
    s.update_survivor(SurvivorUpdate {
      id: "s1".into(),
      location: Some(Location::new(lat, lat)),
      ..Default::default()
    })
    .await
    .unwrap();
  }

  let lats: Vec<f32> = s
    .location_history("s1")
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.location.latitude)
    .collect();
  assert_eq!(lats, vec![1.0, 2.0, 3.0]);
}

#[tokio::test]
async fn update_missing_survivor_writes_nothing() {
  let s = store().await;

  let updated = s
    .update_survivor(SurvivorUpdate {
      id: "ghost".into(),
      location: Some(Location::new(5.0, 5.0)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!updated);
  assert!(s.location_history("ghost").await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_update_of_existing_survivor_succeeds() {
  let s = store().await;
  s.insert_survivor(ana()).await.unwrap();

  let updated = s
    .update_survivor(SurvivorUpdate { id: "s1".into(), ..Default::default() })
    .await
    .unwrap();
  assert!(updated);
}

// ─── Infection reports ───────────────────────────────────────────────────────

#[tokio::test]
async fn mark_infected_increments_and_records_reporter() {
  let s = store().await;
  s.insert_survivor(ana()).await.unwrap();

  assert!(s.mark_infected("s1", "s2").await.unwrap());
  assert!(s.mark_infected("s1", "s2").await.unwrap());
  assert!(s.mark_infected("s1", "s3").await.unwrap());

  let fetched = s.get_survivor("s1").await.unwrap().unwrap();
  assert_eq!(fetched.reported_count, 3);
  assert_eq!(fetched.reported_by, vec!["s2", "s2", "s3"]);
}

#[tokio::test]
async fn mark_infected_missing_survivor_returns_false() {
  let s = store().await;
  assert!(!s.mark_infected("ghost", "s2").await.unwrap());
}

#[tokio::test]
async fn counts_and_lists_split_at_threshold() {
  let s = store().await;
  for id in ["a", "b", "c", "d"] {
    s.insert_survivor(survivor(id)).await.unwrap();
  }
  for _ in 0..3 {
    s.mark_infected("a", "b").await.unwrap();
  }
  for _ in 0..2 {
    s.mark_infected("b", "a").await.unwrap();
  }

  assert_eq!(s.count_survivors(None).await.unwrap(), 4);
  assert_eq!(
    s.count_survivors(Some(InfectionFilter::infected(3))).await.unwrap(),
    1
  );
  assert_eq!(
    s.count_survivors(Some(InfectionFilter::non_infected(3)))
      .await
      .unwrap(),
    3
  );

  let infected = s.list_survivors(InfectionFilter::infected(3)).await.unwrap();
  assert_eq!(infected.len(), 1);
  assert_eq!(infected[0].id, "a");

  let clean: Vec<String> = s
    .list_survivors(InfectionFilter::non_infected(3))
    .await
    .unwrap()
    .into_iter()
    .map(|sv| sv.id)
    .collect();
  assert_eq!(clean, vec!["b", "c", "d"]);

  // A lower threshold moves `b` across.
  let infected = s.list_survivors(InfectionFilter::infected(2)).await.unwrap();
  assert_eq!(infected.len(), 2);
}

// ─── Robots ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_robots_discards_previous_catalog() {
  let s = store().await;

  let stored = s
    .replace_robots(vec![robot("old-1"), robot("old-2")])
    .await
    .unwrap();
  assert_eq!(stored, 2);

  s.replace_robots(vec![robot("new-1"), robot("new-2"), robot("new-3")])
    .await
    .unwrap();

  let serials: Vec<String> = s
    .list_robots()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.serial_number)
    .collect();
  assert_eq!(serials, vec!["new-1", "new-2", "new-3"]);
}

#[tokio::test]
async fn replace_with_empty_catalog_clears_robots() {
  let s = store().await;
  s.replace_robots(vec![robot("x")]).await.unwrap();
  assert_eq!(s.replace_robots(vec![]).await.unwrap(), 0);
  assert!(s.list_robots().await.unwrap().is_empty());
}

// ─── Connection ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_memory_uri_opens_private_database() {
  let s = SqliteStore::connect(crate::IN_MEMORY_URI, "ignored")
    .await
    .unwrap();
  assert_eq!(s.count_survivors(None).await.unwrap(), 0);
}

#[tokio::test]
async fn connect_creates_database_file_under_uri() {
  let dir = std::env::temp_dir().join(format!("refuge-{}", uuid::Uuid::new_v4()));
  let uri = dir.to_string_lossy().into_owned();

  {
    let s = SqliteStore::connect(&uri, "tracker").await.unwrap();
    s.insert_survivor(ana()).await.unwrap();
  }
  assert!(dir.join("tracker.sqlite3").exists());

  let reopened = SqliteStore::connect(&uri, "tracker").await.unwrap();
  assert!(reopened.survivor_exists("s1").await.unwrap());

  std::fs::remove_dir_all(&dir).ok();
}
