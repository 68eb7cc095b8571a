//! [`SqliteStore`], the SQLite implementation of [`TrackerStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};
use uuid::Uuid;

use refuge_core::{
  report::{Criteria, InfectionFilter},
  robot::Robot,
  store::TrackerStore,
  survivor::{LocationRecord, NewSurvivor, Survivor, SurvivorUpdate},
};

use crate::{
  Result,
  encode::{
    RawLocationRecord, RawSurvivor, SURVIVOR_COLUMNS, encode_dt, encode_list,
    encode_location, encode_uuid, robot_from_row,
  },
  schema::SCHEMA,
};

/// The `database_uri` value that selects an in-memory database.
pub const IN_MEMORY_URI: &str = ":memory:";

/// `WHERE` fragment selecting one side of the infection threshold; the
/// threshold is always bound as `?1`.
fn filter_clause(filter: InfectionFilter) -> &'static str {
  match filter.criteria {
    Criteria::Infected => "reported_count >= ?1",
    Criteria::NonInfected => "reported_count < ?1",
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A refuge store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted and shared by
/// every request task.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open the database named `database` under the directory `uri`, creating
  /// both if needed. The uri `:memory:` opens a private in-memory database.
  pub async fn connect(uri: &str, database: &str) -> Result<Self> {
    if uri == IN_MEMORY_URI {
      return Self::open_in_memory().await;
    }
    let dir = PathBuf::from(uri);
    tokio::fs::create_dir_all(&dir).await?;
    Self::open(dir.join(format!("{database}.sqlite3"))).await
  }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %path.display(), "opened survivor database");
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = crate::Error;

  // ── Survivors ─────────────────────────────────────────────────────────────

  async fn survivor_exists(&self, id: &str) -> Result<bool> {
    let id = id.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM survivors WHERE survivor_id = ?1",
              rusqlite::params![id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn insert_survivor(&self, input: NewSurvivor) -> Result<bool> {
    let survivor = input.into_survivor();
    let resources_str = encode_list(&survivor.resources)?;
    let (latitude, longitude) = encode_location(survivor.location);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO survivors (
             survivor_id, name, age, latitude, longitude, resources
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (survivor_id) DO NOTHING",
          rusqlite::params![
            survivor.id,
            survivor.name,
            survivor.age,
            latitude,
            longitude,
            resources_str,
          ],
        )?;
        Ok(changed == 1)
      })
      .await?;

    Ok(inserted)
  }

  async fn get_survivor(&self, id: &str) -> Result<Option<Survivor>> {
    let id = id.to_owned();

    let raw: Option<RawSurvivor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SURVIVOR_COLUMNS} FROM survivors WHERE survivor_id = ?1"
              ),
              rusqlite::params![id],
              RawSurvivor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSurvivor::into_survivor).transpose()
  }

  async fn update_survivor(&self, update: SurvivorUpdate) -> Result<bool> {
    let SurvivorUpdate { id, name, age, location } = update;
    let coords = location.map(encode_location);
    let entry_id_str = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(Utc::now());

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // SQLite counts matched rows, so an update that rewrites identical
        // values (or none at all) still reports the row.
        let changed = tx.execute(
          "UPDATE survivors SET
             name      = COALESCE(?2, name),
             age       = COALESCE(?3, age),
             latitude  = COALESCE(?4, latitude),
             longitude = COALESCE(?5, longitude)
           WHERE survivor_id = ?1",
          rusqlite::params![
            id,
            name,
            age,
            coords.map(|c| c.0),
            coords.map(|c| c.1),
          ],
        )?;
        if changed == 0 {
          return Ok(false);
        }

        if let Some((latitude, longitude)) = coords {
          tx.execute(
            "INSERT INTO location_history (
               entry_id, survivor_id, latitude, longitude, recorded_at
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![entry_id_str, id, latitude, longitude, at_str],
          )?;
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(updated)
  }

  async fn mark_infected(&self, id: &str, reported_by: &str) -> Result<bool> {
    let id = id.to_owned();
    let reported_by = reported_by.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE survivors SET
             reported_count = reported_count + 1,
             reported_by    = json_insert(reported_by, '$[#]', ?2)
           WHERE survivor_id = ?1",
          rusqlite::params![id, reported_by],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }

  async fn count_survivors(&self, filter: Option<InfectionFilter>) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        let count = match filter {
          Some(f) => conn.query_row(
            &format!("SELECT COUNT(*) FROM survivors WHERE {}", filter_clause(f)),
            rusqlite::params![f.threshold],
            |r| r.get(0),
          )?,
          None => {
            conn.query_row("SELECT COUNT(*) FROM survivors", [], |r| r.get(0))?
          }
        };
        Ok(count)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  async fn list_survivors(&self, filter: InfectionFilter) -> Result<Vec<Survivor>> {
    let raws: Vec<RawSurvivor> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SURVIVOR_COLUMNS} FROM survivors WHERE {} ORDER BY rowid",
          filter_clause(filter)
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![filter.threshold], RawSurvivor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSurvivor::into_survivor).collect()
  }

  async fn location_history(&self, id: &str) -> Result<Vec<LocationRecord>> {
    let id = id.to_owned();

    let raws: Vec<RawLocationRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, survivor_id, latitude, longitude, recorded_at
           FROM location_history
           WHERE survivor_id = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id], |row| {
            Ok(RawLocationRecord {
              entry_id:    row.get(0)?,
              survivor_id: row.get(1)?,
              latitude:    row.get(2)?,
              longitude:   row.get(3)?,
              recorded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLocationRecord::into_record).collect()
  }

  // ── Robots ────────────────────────────────────────────────────────────────

  async fn replace_robots(&self, robots: Vec<Robot>) -> Result<usize> {
    let stored = self
      .conn
      .call(move |conn| {
        // Delete and reload in one transaction: readers see either the old
        // catalog or the new one, never an empty table.
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM robots", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO robots (model, serial_number, manufactured_date, category)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for robot in &robots {
            stmt.execute(rusqlite::params![
              robot.model,
              robot.serial_number,
              robot.manufactured_date,
              robot.category,
            ])?;
          }
        }
        tx.commit()?;
        debug!(removed, inserted = robots.len(), "replaced robot catalog");
        Ok(robots.len())
      })
      .await?;

    Ok(stored)
  }

  async fn list_robots(&self) -> Result<Vec<Robot>> {
    let robots = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT model, serial_number, manufactured_date, category
           FROM robots
           ORDER BY robot_id",
        )?;
        let rows = stmt
          .query_map([], robot_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(robots)
  }
}
