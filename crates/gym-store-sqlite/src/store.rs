//! [`SqliteStore`], the SQLite implementation of [`GymStore`].

use std::path::Path;

use gym_core::{
  person::{Coach, Member, PersonId, Worker},
  store::{ChangeSet, GymStore},
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  encode::{encode_uuid, RawCoach, RawMember, RawWorker},
  schema::{COACH_COLUMNS, MEMBER_COLUMNS, SCHEMA, WORKER_COLUMNS},
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gym registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
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

  async fn member_where(&self, clause: &'static str, arg: String) -> Result<Option<Member>> {
    let raw: Option<RawMember> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE {clause} = ?1");
        Ok(conn.query_row(&sql, rusqlite::params![arg], RawMember::read).optional()?)
      })
      .await?;
    raw.map(RawMember::into_member).transpose()
  }

  async fn coach_where(&self, clause: &'static str, arg: String) -> Result<Option<Coach>> {
    let raw: Option<RawCoach> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {COACH_COLUMNS} FROM coaches WHERE {clause} = ?1");
        Ok(conn.query_row(&sql, rusqlite::params![arg], RawCoach::read).optional()?)
      })
      .await?;
    raw.map(RawCoach::into_coach).transpose()
  }

  async fn worker_where(&self, clause: &'static str, arg: String) -> Result<Option<Worker>> {
    let raw: Option<RawWorker> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {WORKER_COLUMNS} FROM workers WHERE {clause} = ?1");
        Ok(conn.query_row(&sql, rusqlite::params![arg], RawWorker::read).optional()?)
      })
      .await?;
    raw.map(RawWorker::into_worker).transpose()
  }
}

// ─── GymStore impl ───────────────────────────────────────────────────────────

impl GymStore for SqliteStore {
  type Error = crate::Error;

  // ── Members ───────────────────────────────────────────────────────────────

  async fn get_member(&self, id: PersonId) -> Result<Option<Member>> {
    self.member_where("member_id", encode_uuid(id)).await
  }

  async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>> {
    self.member_where("email", email.to_owned()).await
  }

  async fn list_members(&self) -> Result<Vec<Member>> {
    let raws: Vec<RawMember> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawMember::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMember::into_member).collect()
  }

  async fn get_members(&self, ids: &[PersonId]) -> Result<Vec<Member>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let placeholders = vec!["?"; id_strs.len()].join(", ");

    let raws: Vec<RawMember> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MEMBER_COLUMNS} FROM members
           WHERE member_id IN ({placeholders})
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs.iter()), RawMember::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMember::into_member).collect()
  }

  // ── Coaches ───────────────────────────────────────────────────────────────

  async fn get_coach(&self, id: PersonId) -> Result<Option<Coach>> {
    self.coach_where("coach_id", encode_uuid(id)).await
  }

  async fn find_coach_by_email(&self, email: &str) -> Result<Option<Coach>> {
    self.coach_where("email", email.to_owned()).await
  }

  async fn find_coach_by_code(&self, code_digest: &str) -> Result<Option<Coach>> {
    self.coach_where("code_digest", code_digest.to_owned()).await
  }

  async fn list_coaches(&self) -> Result<Vec<Coach>> {
    let raws: Vec<RawCoach> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COACH_COLUMNS} FROM coaches ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawCoach::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCoach::into_coach).collect()
  }

  // ── Workers ───────────────────────────────────────────────────────────────

  async fn get_worker(&self, id: PersonId) -> Result<Option<Worker>> {
    self.worker_where("worker_id", encode_uuid(id)).await
  }

  async fn find_worker_by_email(&self, email: &str) -> Result<Option<Worker>> {
    self.worker_where("email", email.to_owned()).await
  }

  async fn find_worker_by_code(&self, code_digest: &str) -> Result<Option<Worker>> {
    self.worker_where("code_digest", code_digest.to_owned()).await
  }

  async fn list_workers(&self) -> Result<Vec<Worker>> {
    let raws: Vec<RawWorker> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {WORKER_COLUMNS} FROM workers ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], RawWorker::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWorker::into_worker).collect()
  }

  // ── Cross-table ───────────────────────────────────────────────────────────

  async fn email_taken(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();

    let taken = self
      .conn
      .call(move |conn| {
        let taken: bool = conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM members WHERE email = ?1)
               OR EXISTS (SELECT 1 FROM coaches WHERE email = ?1)
               OR EXISTS (SELECT 1 FROM workers WHERE email = ?1)",
          rusqlite::params![email],
          |r| r.get(0),
        )?;
        Ok(taken)
      })
      .await?;

    Ok(taken)
  }

  async fn staff_ever_registered(&self) -> Result<bool> {
    let seen = self
      .conn
      .call(|conn| {
        let seen: bool = conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM registry_flags WHERE name = 'staff_registered')
               OR EXISTS (SELECT 1 FROM coaches)
               OR EXISTS (SELECT 1 FROM workers)",
          [],
          |r| r.get(0),
        )?;
        Ok(seen)
      })
      .await?;

    Ok(seen)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn commit(&self, changes: ChangeSet) -> Result<()> {
    let members: Vec<RawMember> = changes.members.iter().map(RawMember::from_member).collect();
    let coaches: Vec<RawCoach> = changes
      .coaches
      .iter()
      .map(RawCoach::from_coach)
      .collect::<Result<_>>()?;
    let workers: Vec<RawWorker> = changes.workers.iter().map(RawWorker::from_worker).collect();

    let removed_members: Vec<String> =
      changes.removed_members.iter().copied().map(encode_uuid).collect();
    let removed_coaches: Vec<String> =
      changes.removed_coaches.iter().copied().map(encode_uuid).collect();
    let removed_workers: Vec<String> =
      changes.removed_workers.iter().copied().map(encode_uuid).collect();

    debug!(
      upserts = members.len() + coaches.len() + workers.len(),
      removals = removed_members.len() + removed_coaches.len() + removed_workers.len(),
      "committing change set"
    );

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !workers.is_empty() || !coaches.is_empty() {
          tx.execute(
            "INSERT OR IGNORE INTO registry_flags (name, value) VALUES ('staff_registered', 1)",
            [],
          )?;
        }

        for w in &workers {
          tx.execute(
            "INSERT INTO workers (worker_id, name, date_of_birth, email, code_digest)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(worker_id) DO UPDATE SET
               name          = excluded.name,
               date_of_birth = excluded.date_of_birth,
               email         = excluded.email,
               code_digest   = excluded.code_digest",
            rusqlite::params![w.worker_id, w.name, w.date_of_birth, w.email, w.code_digest],
          )?;
        }

        for c in &coaches {
          tx.execute(
            "INSERT INTO coaches (
               coach_id, name, date_of_birth, email, code_digest, client_ids, workout_plans
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(coach_id) DO UPDATE SET
               name          = excluded.name,
               date_of_birth = excluded.date_of_birth,
               email         = excluded.email,
               code_digest   = excluded.code_digest,
               client_ids    = excluded.client_ids,
               workout_plans = excluded.workout_plans",
            rusqlite::params![
              c.coach_id,
              c.name,
              c.date_of_birth,
              c.email,
              c.code_digest,
              c.client_ids,
              c.workout_plans,
            ],
          )?;
        }

        for m in &members {
          tx.execute(
            "INSERT INTO members (
               member_id, name, date_of_birth, email, membership_date,
               coached_by, bench, squat, deadlift
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(member_id) DO UPDATE SET
               name            = excluded.name,
               date_of_birth   = excluded.date_of_birth,
               email           = excluded.email,
               membership_date = excluded.membership_date,
               coached_by      = excluded.coached_by,
               bench           = excluded.bench,
               squat           = excluded.squat,
               deadlift        = excluded.deadlift",
            rusqlite::params![
              m.member_id,
              m.name,
              m.date_of_birth,
              m.email,
              m.membership_date,
              m.coached_by,
              m.bench,
              m.squat,
              m.deadlift,
            ],
          )?;
        }

        for id in &removed_members {
          tx.execute("DELETE FROM members WHERE member_id = ?1", rusqlite::params![id])?;
        }
        for id in &removed_coaches {
          tx.execute("DELETE FROM coaches WHERE coach_id = ?1", rusqlite::params![id])?;
        }
        for id in &removed_workers {
          tx.execute("DELETE FROM workers WHERE worker_id = ?1", rusqlite::params![id])?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
