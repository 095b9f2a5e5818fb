//! Person records — the three mutually exclusive shapes a registered person
//! can take.
//!
//! Every record carries the same [`Identity`]. The coach ↔ member relation is
//! stored on both sides as plain ids (`Member::coached_by` and
//! `Coach::clients`); keeping the two in step is the job of
//! [`crate::service::GymService`], never of the records themselves.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Opaque, immutable identifier assigned at registration.
pub type PersonId = Uuid;

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which record table a person lives in. A person holds exactly one role.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Role {
  #[serde(rename = "ROLE_MEMBER")]
  #[strum(serialize = "ROLE_MEMBER")]
  Member,
  #[serde(rename = "ROLE_COACH")]
  #[strum(serialize = "ROLE_COACH")]
  Coach,
  #[serde(rename = "ROLE_WORKER")]
  #[strum(serialize = "ROLE_WORKER")]
  Worker,
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Fields shared by every role. `email` is unique across all three tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub email:         String,
}

impl Identity {
  /// Whole years between `date_of_birth` and `today`. Never stored.
  pub fn age_on(&self, today: NaiveDate) -> u32 {
    today.years_since(self.date_of_birth).unwrap_or(0)
  }
}

// ─── Lifts ───────────────────────────────────────────────────────────────────

/// A member's best lifts. The total is always derived from the three parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifts {
  pub bench:    u32,
  pub squat:    u32,
  pub deadlift: u32,
}

impl Lifts {
  /// Widened so three maximal lifts still sum exactly.
  pub fn total(&self) -> u64 {
    u64::from(self.bench) + u64::from(self.squat) + u64::from(self.deadlift)
  }

  pub fn get(&self, lift: Lift) -> u64 {
    match lift {
      Lift::Bench => self.bench.into(),
      Lift::Squat => self.squat.into(),
      Lift::Deadlift => self.deadlift.into(),
      Lift::Total => self.total(),
    }
  }
}

/// Selector for the ranking queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Lift {
  Bench,
  Squat,
  Deadlift,
  Total,
}

/// Partial lift update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LiftsPatch {
  pub bench:    Option<u32>,
  pub squat:    Option<u32>,
  pub deadlift: Option<u32>,
}

impl LiftsPatch {
  pub fn is_empty(&self) -> bool {
    self.bench.is_none() && self.squat.is_none() && self.deadlift.is_none()
  }

  pub fn apply(&self, lifts: &mut Lifts) {
    if let Some(bench) = self.bench {
      lifts.bench = bench;
    }
    if let Some(squat) = self.squat {
      lifts.squat = squat;
    }
    if let Some(deadlift) = self.deadlift {
      lifts.deadlift = deadlift;
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub id:              PersonId,
  pub identity:        Identity,
  /// Free-form; not interpreted as a calendar date.
  pub membership_date: String,
  /// `None` means the member is available.
  pub coached_by:      Option<PersonId>,
  pub lifts:           Lifts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
  pub id:            PersonId,
  pub identity:      Identity,
  /// SHA-256 hex digest of the coach code; see [`crate::credential`].
  pub code_digest:   String,
  pub clients:       BTreeSet<PersonId>,
  /// Ordered plan names; never empty.
  pub workout_plans: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
  pub id:          PersonId,
  pub identity:    Identity,
  pub code_digest: String,
}

impl Coach {
  /// A coach with no clients.
  pub fn is_available(&self) -> bool { self.clients.is_empty() }
}

impl Member {
  /// A member with no coach.
  pub fn is_available(&self) -> bool { self.coached_by.is_none() }
}

/// Uniform access used by the identity gate and error messages.
pub trait Person {
  const ROLE: Role;
  /// Entity name used in messages, e.g. "Coach".
  const LABEL: &'static str;

  fn id(&self) -> PersonId;
  fn identity(&self) -> &Identity;
}

impl Person for Member {
  const LABEL: &'static str = "Member";
  const ROLE: Role = Role::Member;

  fn id(&self) -> PersonId { self.id }

  fn identity(&self) -> &Identity { &self.identity }
}

impl Person for Coach {
  const LABEL: &'static str = "Coach";
  const ROLE: Role = Role::Coach;

  fn id(&self) -> PersonId { self.id }

  fn identity(&self) -> &Identity { &self.identity }
}

impl Person for Worker {
  const LABEL: &'static str = "Worker";
  const ROLE: Role = Role::Worker;

  fn id(&self) -> PersonId { self.id }

  fn identity(&self) -> &Identity { &self.identity }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::GymService::register_member`].
/// The id is assigned by the service; lifts start at zero when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
  pub identity:        Identity,
  pub membership_date: String,
  #[serde(default)]
  pub lifts:           Lifts,
  /// Optional coach to link on registration.
  #[serde(default)]
  pub coach_id:        Option<PersonId>,
}

/// Input to [`crate::service::GymService::register_coach`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCoach {
  pub identity:      Identity,
  /// Clear-text code; only its digest is persisted.
  pub code:          String,
  pub workout_plans: Vec<String>,
}

/// Input to [`crate::service::GymService::register_worker`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorker {
  pub identity: Identity,
  pub code:     String,
}

/// Target of a role transition together with the fields the target record
/// needs that the source record cannot supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleChange {
  #[serde(rename = "ROLE_MEMBER")]
  ToMember { membership_date: String },
  #[serde(rename = "ROLE_COACH")]
  ToCoach {
    code:          String,
    workout_plans: Vec<String>,
  },
  #[serde(rename = "ROLE_WORKER")]
  ToWorker { code: String },
}

impl RoleChange {
  pub fn target(&self) -> Role {
    match self {
      Self::ToMember { .. } => Role::Member,
      Self::ToCoach { .. } => Role::Coach,
      Self::ToWorker { .. } => Role::Worker,
    }
  }
}

/// The record produced by a role transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", content = "record")]
pub enum Transitioned {
  #[serde(rename = "ROLE_MEMBER")]
  Member(Member),
  #[serde(rename = "ROLE_COACH")]
  Coach(Coach),
  #[serde(rename = "ROLE_WORKER")]
  Worker(Worker),
}

#[cfg(test)]
mod tests {
  use super::*;

  fn identity(dob: NaiveDate) -> Identity {
    Identity {
      name:          "Alex".into(),
      date_of_birth: dob,
      email:         "alex@x.com".into(),
    }
  }

  #[test]
  fn age_counts_completed_years_only() {
    let id = identity(NaiveDate::from_ymd_opt(1990, 6, 15).unwrap());
    assert_eq!(id.age_on(NaiveDate::from_ymd_opt(2020, 6, 14).unwrap()), 29);
    assert_eq!(id.age_on(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()), 30);
  }

  #[test]
  fn total_tracks_components() {
    let mut lifts = Lifts { bench: 225, squat: 315, deadlift: 405 };
    assert_eq!(lifts.total(), 945);

    LiftsPatch { squat: Some(335), ..Default::default() }.apply(&mut lifts);
    assert_eq!(lifts.squat, 335);
    assert_eq!(lifts.total(), 965);
    assert_eq!(lifts.get(Lift::Total), lifts.total());
  }

  #[test]
  fn total_of_maximal_lifts_does_not_wrap() {
    let lifts = Lifts { bench: u32::MAX, squat: 1, deadlift: u32::MAX };
    assert_eq!(lifts.total(), 2 * u64::from(u32::MAX) + 1);
  }

  #[test]
  fn role_displays_with_prefix() {
    assert_eq!(Role::Coach.to_string(), "ROLE_COACH");
    assert_eq!("ROLE_WORKER".parse::<Role>().unwrap(), Role::Worker);
    assert_eq!("deadlift".parse::<Lift>().unwrap(), Lift::Deadlift);
  }
}
