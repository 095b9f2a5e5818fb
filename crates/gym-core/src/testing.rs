//! In-memory [`GymStore`] double and shared fixtures for service tests.

use std::{
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard},
};

use chrono::NaiveDate;

use crate::{
  credential::Credential,
  person::{Coach, Identity, Member, NewCoach, NewMember, NewWorker, PersonId, Worker},
  service::GymService,
  store::{ChangeSet, GymStore},
};

// ─── MemoryStore ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
  members:    Vec<Member>,
  coaches:    Vec<Coach>,
  workers:    Vec<Worker>,
  commits:    Vec<ChangeSet>,
  staff_seen: bool,
}

/// Vec-backed store. Every committed change set is kept for inspection.
#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  fn lock(&self) -> MutexGuard<'_, Tables> { self.tables.lock().unwrap() }

  pub fn commits(&self) -> Vec<ChangeSet> { self.lock().commits.clone() }

  pub fn commit_count(&self) -> usize { self.lock().commits.len() }
}

fn upsert<T>(rows: &mut Vec<T>, row: T, id: impl Fn(&T) -> PersonId) {
  match rows.iter_mut().find(|r| id(r) == id(&row)) {
    Some(existing) => *existing = row,
    None => rows.push(row),
  }
}

impl GymStore for MemoryStore {
  type Error = Infallible;

  async fn get_member(&self, id: PersonId) -> Result<Option<Member>, Infallible> {
    Ok(self.lock().members.iter().find(|m| m.id == id).cloned())
  }

  async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, Infallible> {
    Ok(self.lock().members.iter().find(|m| m.identity.email == email).cloned())
  }

  async fn list_members(&self) -> Result<Vec<Member>, Infallible> {
    Ok(self.lock().members.clone())
  }

  async fn get_members(&self, ids: &[PersonId]) -> Result<Vec<Member>, Infallible> {
    Ok(
      self
        .lock()
        .members
        .iter()
        .filter(|m| ids.contains(&m.id))
        .cloned()
        .collect(),
    )
  }

  async fn get_coach(&self, id: PersonId) -> Result<Option<Coach>, Infallible> {
    Ok(self.lock().coaches.iter().find(|c| c.id == id).cloned())
  }

  async fn find_coach_by_email(&self, email: &str) -> Result<Option<Coach>, Infallible> {
    Ok(self.lock().coaches.iter().find(|c| c.identity.email == email).cloned())
  }

  async fn find_coach_by_code(&self, code_digest: &str) -> Result<Option<Coach>, Infallible> {
    Ok(self.lock().coaches.iter().find(|c| c.code_digest == code_digest).cloned())
  }

  async fn list_coaches(&self) -> Result<Vec<Coach>, Infallible> {
    Ok(self.lock().coaches.clone())
  }

  async fn get_worker(&self, id: PersonId) -> Result<Option<Worker>, Infallible> {
    Ok(self.lock().workers.iter().find(|w| w.id == id).cloned())
  }

  async fn find_worker_by_email(&self, email: &str) -> Result<Option<Worker>, Infallible> {
    Ok(self.lock().workers.iter().find(|w| w.identity.email == email).cloned())
  }

  async fn find_worker_by_code(&self, code_digest: &str) -> Result<Option<Worker>, Infallible> {
    Ok(self.lock().workers.iter().find(|w| w.code_digest == code_digest).cloned())
  }

  async fn list_workers(&self) -> Result<Vec<Worker>, Infallible> {
    Ok(self.lock().workers.clone())
  }

  async fn email_taken(&self, email: &str) -> Result<bool, Infallible> {
    let t = self.lock();
    Ok(
      t.members.iter().any(|m| m.identity.email == email)
        || t.coaches.iter().any(|c| c.identity.email == email)
        || t.workers.iter().any(|w| w.identity.email == email),
    )
  }

  async fn staff_ever_registered(&self) -> Result<bool, Infallible> {
    Ok(self.lock().staff_seen)
  }

  async fn commit(&self, changes: ChangeSet) -> Result<(), Infallible> {
    let mut t = self.lock();
    t.staff_seen |= !changes.coaches.is_empty() || !changes.workers.is_empty();
    for w in changes.workers.iter().cloned() {
      upsert(&mut t.workers, w, |w| w.id);
    }
    for c in changes.coaches.iter().cloned() {
      upsert(&mut t.coaches, c, |c| c.id);
    }
    for m in changes.members.iter().cloned() {
      upsert(&mut t.members, m, |m| m.id);
    }
    t.members.retain(|m| !changes.removed_members.contains(&m.id));
    t.coaches.retain(|c| !changes.removed_coaches.contains(&c.id));
    t.workers.retain(|w| !changes.removed_workers.contains(&w.id));
    t.commits.push(changes);
    Ok(())
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn email(address: &str) -> Credential { Credential::Email(address.to_owned()) }

pub fn identity(name: &str) -> Identity {
  Identity {
    name:          name.to_owned(),
    date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
    email:         format!("{}@x.com", name.to_lowercase()),
  }
}

pub fn new_member(name: &str, coach_id: Option<PersonId>) -> NewMember {
  NewMember {
    identity: identity(name),
    membership_date: "2023-01-01".into(),
    lifts: Default::default(),
    coach_id,
  }
}

pub fn new_coach(name: &str) -> NewCoach {
  NewCoach {
    identity:      identity(name),
    code:          format!("{}-code", name.to_lowercase()),
    workout_plans: vec!["5x5".into()],
  }
}

pub fn new_worker(name: &str) -> NewWorker {
  NewWorker {
    identity: identity(name),
    code:     format!("{}-code", name.to_lowercase()),
  }
}

pub struct Fixture {
  pub store: Arc<MemoryStore>,
  pub gym:   GymService<MemoryStore>,
}

impl Fixture {
  pub fn empty() -> Self {
    let store = Arc::new(MemoryStore::default());
    let gym = GymService::new(Arc::clone(&store));
    Self { store, gym }
  }

  /// Alex coaches John, David, and Carlos; Maria coaches Jane and Emily;
  /// Sam is an unassigned member; Wendy is a worker.
  pub async fn scenario() -> Self {
    let fx = Self::empty();
    let alex = fx.gym.register_coach(new_coach("Alex")).await.unwrap();
    let maria = fx.gym.register_coach(new_coach("Maria")).await.unwrap();
    for name in ["John", "David", "Carlos"] {
      fx.gym.register_member(new_member(name, Some(alex.id))).await.unwrap();
    }
    for name in ["Jane", "Emily"] {
      fx.gym.register_member(new_member(name, Some(maria.id))).await.unwrap();
    }
    fx.gym.register_member(new_member("Sam", None)).await.unwrap();
    fx.gym.register_worker(new_worker("Wendy")).await.unwrap();
    fx
  }

  pub async fn coach(&self, name: &str) -> Coach {
    let email = format!("{name}@x.com");
    self.store.find_coach_by_email(&email).await.unwrap().unwrap()
  }

  pub async fn member(&self, name: &str) -> Member {
    let email = format!("{name}@x.com");
    self.store.find_member_by_email(&email).await.unwrap().unwrap()
  }

  pub async fn worker(&self, name: &str) -> Worker {
    let email = format!("{name}@x.com");
    self.store.find_worker_by_email(&email).await.unwrap().unwrap()
  }

  /// `member.coached_by == c` ⇔ `member ∈ c.clients`, for every pair.
  pub async fn assert_roster_consistent(&self) {
    let members = self.store.list_members().await.unwrap();
    let coaches = self.store.list_coaches().await.unwrap();
    for m in &members {
      for c in &coaches {
        assert_eq!(
          m.coached_by == Some(c.id),
          c.clients.contains(&m.id),
          "member {} / coach {} disagree",
          m.identity.name,
          c.identity.name,
        );
      }
      if let Some(cid) = m.coached_by {
        assert!(coaches.iter().any(|c| c.id == cid), "dangling coach link");
      }
    }
    for c in &coaches {
      for id in &c.clients {
        assert!(members.iter().any(|m| m.id == *id), "dangling client");
      }
    }
  }
}
