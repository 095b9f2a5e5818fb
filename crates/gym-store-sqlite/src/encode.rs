//! Encoding and decoding helpers between domain records and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. Id sets and plan lists are stored as
//! compact JSON arrays. UUIDs are stored as hyphenated lowercase strings.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use gym_core::person::{Coach, Identity, Lifts, Member, PersonId, Worker};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── JSON columns ─────────────────────────────────────────────────────────────

pub fn encode_ids(ids: &BTreeSet<PersonId>) -> Result<String> { Ok(serde_json::to_string(ids)?) }

pub fn decode_ids(s: &str) -> Result<BTreeSet<PersonId>> { Ok(serde_json::from_str(s)?) }

pub fn encode_plans(plans: &[String]) -> Result<String> { Ok(serde_json::to_string(plans)?) }

pub fn decode_plans(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values of a `members` row, in [`crate::schema::MEMBER_COLUMNS`]
/// order.
pub struct RawMember {
  pub member_id:       String,
  pub name:            String,
  pub date_of_birth:   String,
  pub email:           String,
  pub membership_date: String,
  pub coached_by:      Option<String>,
  pub bench:           u32,
  pub squat:           u32,
  pub deadlift:        u32,
}

impl RawMember {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      member_id:       row.get(0)?,
      name:            row.get(1)?,
      date_of_birth:   row.get(2)?,
      email:           row.get(3)?,
      membership_date: row.get(4)?,
      coached_by:      row.get(5)?,
      bench:           row.get(6)?,
      squat:           row.get(7)?,
      deadlift:        row.get(8)?,
    })
  }

  pub fn from_member(m: &Member) -> Self {
    Self {
      member_id:       encode_uuid(m.id),
      name:            m.identity.name.clone(),
      date_of_birth:   encode_date(m.identity.date_of_birth),
      email:           m.identity.email.clone(),
      membership_date: m.membership_date.clone(),
      coached_by:      m.coached_by.map(encode_uuid),
      bench:           m.lifts.bench,
      squat:           m.lifts.squat,
      deadlift:        m.lifts.deadlift,
    }
  }

  pub fn into_member(self) -> Result<Member> {
    Ok(Member {
      id:              decode_uuid(&self.member_id)?,
      identity:        Identity {
        name:          self.name,
        date_of_birth: decode_date(&self.date_of_birth)?,
        email:         self.email,
      },
      membership_date: self.membership_date,
      coached_by:      self.coached_by.as_deref().map(decode_uuid).transpose()?,
      lifts:           Lifts {
        bench:    self.bench,
        squat:    self.squat,
        deadlift: self.deadlift,
      },
    })
  }
}

/// Column values of a `coaches` row, in [`crate::schema::COACH_COLUMNS`]
/// order.
pub struct RawCoach {
  pub coach_id:      String,
  pub name:          String,
  pub date_of_birth: String,
  pub email:         String,
  pub code_digest:   String,
  pub client_ids:    String,
  pub workout_plans: String,
}

impl RawCoach {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      coach_id:      row.get(0)?,
      name:          row.get(1)?,
      date_of_birth: row.get(2)?,
      email:         row.get(3)?,
      code_digest:   row.get(4)?,
      client_ids:    row.get(5)?,
      workout_plans: row.get(6)?,
    })
  }

  pub fn from_coach(c: &Coach) -> Result<Self> {
    Ok(Self {
      coach_id:      encode_uuid(c.id),
      name:          c.identity.name.clone(),
      date_of_birth: encode_date(c.identity.date_of_birth),
      email:         c.identity.email.clone(),
      code_digest:   c.code_digest.clone(),
      client_ids:    encode_ids(&c.clients)?,
      workout_plans: encode_plans(&c.workout_plans)?,
    })
  }

  pub fn into_coach(self) -> Result<Coach> {
    Ok(Coach {
      id:            decode_uuid(&self.coach_id)?,
      identity:      Identity {
        name:          self.name,
        date_of_birth: decode_date(&self.date_of_birth)?,
        email:         self.email,
      },
      code_digest:   self.code_digest,
      clients:       decode_ids(&self.client_ids)?,
      workout_plans: decode_plans(&self.workout_plans)?,
    })
  }
}

/// Column values of a `workers` row, in [`crate::schema::WORKER_COLUMNS`]
/// order.
pub struct RawWorker {
  pub worker_id:     String,
  pub name:          String,
  pub date_of_birth: String,
  pub email:         String,
  pub code_digest:   String,
}

impl RawWorker {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      worker_id:     row.get(0)?,
      name:          row.get(1)?,
      date_of_birth: row.get(2)?,
      email:         row.get(3)?,
      code_digest:   row.get(4)?,
    })
  }

  pub fn from_worker(w: &Worker) -> Self {
    Self {
      worker_id:     encode_uuid(w.id),
      name:          w.identity.name.clone(),
      date_of_birth: encode_date(w.identity.date_of_birth),
      email:         w.identity.email.clone(),
      code_digest:   w.code_digest.clone(),
    }
  }

  pub fn into_worker(self) -> Result<Worker> {
    Ok(Worker {
      id:          decode_uuid(&self.worker_id)?,
      identity:    Identity {
        name:          self.name,
        date_of_birth: decode_date(&self.date_of_birth)?,
        email:         self.email,
      },
      code_digest: self.code_digest,
    })
  }
}
