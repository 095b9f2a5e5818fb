//! Response bodies.
//!
//! Views never carry emails or code digests; those are credentials. Derived
//! values (`age`, lift `total`) are computed at render time.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use gym_core::person::{Coach, Identity, Member, PersonId, Transitioned, Worker};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LiftsView {
  pub bench:    u32,
  pub squat:    u32,
  pub deadlift: u32,
  pub total:    u64,
}

#[derive(Debug, Serialize)]
pub struct MemberView {
  pub id:              PersonId,
  pub name:            String,
  pub date_of_birth:   NaiveDate,
  pub age:             u32,
  pub membership_date: String,
  pub coached_by:      Option<PersonId>,
  pub lifts:           LiftsView,
}

#[derive(Debug, Serialize)]
pub struct CoachView {
  pub id:            PersonId,
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub age:           u32,
  pub clients:       BTreeSet<PersonId>,
  pub workout_plans: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkerView {
  pub id:            PersonId,
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub age:           u32,
}

/// Result of a role change: `{"role": "ROLE_COACH", "record": {...}}`.
#[derive(Debug, Serialize)]
#[serde(tag = "role", content = "record")]
pub enum TransitionView {
  #[serde(rename = "ROLE_MEMBER")]
  Member(MemberView),
  #[serde(rename = "ROLE_COACH")]
  Coach(CoachView),
  #[serde(rename = "ROLE_WORKER")]
  Worker(WorkerView),
}

/// `{"deleted": n}` for bulk deletions.
#[derive(Debug, Serialize)]
pub struct Deleted {
  pub deleted: usize,
}

fn age(identity: &Identity) -> u32 { identity.age_on(gym_core::service::today()) }

impl From<Member> for MemberView {
  fn from(m: Member) -> Self {
    Self {
      id:              m.id,
      age:             age(&m.identity),
      name:            m.identity.name,
      date_of_birth:   m.identity.date_of_birth,
      membership_date: m.membership_date,
      coached_by:      m.coached_by,
      lifts:           LiftsView {
        bench:    m.lifts.bench,
        squat:    m.lifts.squat,
        deadlift: m.lifts.deadlift,
        total:    m.lifts.total(),
      },
    }
  }
}

impl From<Coach> for CoachView {
  fn from(c: Coach) -> Self {
    Self {
      id:            c.id,
      age:           age(&c.identity),
      name:          c.identity.name,
      date_of_birth: c.identity.date_of_birth,
      clients:       c.clients,
      workout_plans: c.workout_plans,
    }
  }
}

impl From<Worker> for WorkerView {
  fn from(w: Worker) -> Self {
    Self {
      id:            w.id,
      age:           age(&w.identity),
      name:          w.identity.name,
      date_of_birth: w.identity.date_of_birth,
    }
  }
}

impl From<Transitioned> for TransitionView {
  fn from(t: Transitioned) -> Self {
    match t {
      Transitioned::Member(m) => Self::Member(m.into()),
      Transitioned::Coach(c) => Self::Coach(c.into()),
      Transitioned::Worker(w) => Self::Worker(w.into()),
    }
  }
}

/// Convert every record in `items` to its view.
pub fn all<T, V: From<T>>(items: Vec<T>) -> Vec<V> { items.into_iter().map(V::from).collect() }
