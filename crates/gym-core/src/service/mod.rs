//! Business rules for the gym registry.
//!
//! [`GymService`] is a stateless handle around a [`GymStore`]. Its operations
//! are split across modules by concern:
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`gate`] | (id, credential) ownership checks |
//! | [`members`] / [`coaches`] / [`workers`] | per-record CRUD |
//! | [`clients`] | coach ↔ member roster maintenance |
//! | [`roles`] | moving a person between record types |
//! | [`rankings`] | lift and roster-size aggregates |
//!
//! Every operation validates its inputs, loads what it needs, and submits all
//! of its writes as a single [`ChangeSet`]. A failed precondition therefore
//! never leaves a partial write behind.

pub mod clients;
pub mod coaches;
pub mod gate;
pub mod members;
pub mod rankings;
pub mod roles;
pub mod workers;

mod validate;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
  Error, Result,
  person::{Coach, Member, Person, PersonId, Worker},
  store::{ChangeSet, GymStore},
};

/// Entry point for every use case. Cloning is cheap.
pub struct GymService<S> {
  store: Arc<S>,
}

impl<S> Clone for GymService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: GymStore> GymService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  async fn commit(&self, changes: ChangeSet) -> Result<()> {
    self.store.commit(changes).await.map_err(Error::store)
  }

  async fn member(&self, id: PersonId) -> Result<Member> {
    self
      .store
      .get_member(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| missing::<Member>(id))
  }

  async fn coach(&self, id: PersonId) -> Result<Coach> {
    self
      .store
      .get_coach(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| missing::<Coach>(id))
  }

  async fn worker(&self, id: PersonId) -> Result<Worker> {
    self
      .store
      .get_worker(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| missing::<Worker>(id))
  }

  /// Emails are unique across members, coaches, and workers combined.
  async fn ensure_email_free(&self, email: &str) -> Result<()> {
    if self.store.email_taken(email).await.map_err(Error::store)? {
      return Err(Error::Conflict(format!(
        "A person with an email of: {email} already exists"
      )));
    }
    Ok(())
  }

  async fn ensure_coach_code_free(&self, code_digest: &str) -> Result<()> {
    let taken = self
      .store
      .find_coach_by_code(code_digest)
      .await
      .map_err(Error::store)?;
    if taken.is_some() {
      return Err(Error::Conflict("That coach code is already in use".into()));
    }
    Ok(())
  }

  async fn ensure_worker_code_free(&self, code_digest: &str) -> Result<()> {
    let taken = self
      .store
      .find_worker_by_code(code_digest)
      .await
      .map_err(Error::store)?;
    if taken.is_some() {
      return Err(Error::Conflict("That worker code is already in use".into()));
    }
    Ok(())
  }
}

/// Today in UTC; ages and date-of-birth checks are relative to it.
pub fn today() -> NaiveDate { Utc::now().date_naive() }

fn missing<P: Person>(id: PersonId) -> Error {
  Error::NotFound(format!("{} with an id of: {id} doesn't exist", P::LABEL))
}

fn missing_email<P: Person>(email: &str) -> Error {
  Error::NotFound(format!("{} with an email of: {email} doesn't exist", P::LABEL))
}
