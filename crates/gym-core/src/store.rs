//! The `GymStore` trait and the [`ChangeSet`] unit of work.
//!
//! The trait is implemented by storage backends (e.g. `gym-store-sqlite`).
//! [`crate::service::GymService`] depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::person::{Coach, Member, PersonId, Worker};

// ─── ChangeSet ───────────────────────────────────────────────────────────────

/// Every write produced by one service operation.
///
/// Backends must apply a change set atomically: either every upsert and
/// removal lands, or none does. Upserts are applied before removals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
  pub members:         Vec<Member>,
  pub coaches:         Vec<Coach>,
  pub workers:         Vec<Worker>,
  pub removed_members: Vec<PersonId>,
  pub removed_coaches: Vec<PersonId>,
  pub removed_workers: Vec<PersonId>,
}

impl ChangeSet {
  pub fn new() -> Self { Self::default() }

  pub fn save_member(mut self, member: Member) -> Self {
    self.members.push(member);
    self
  }

  pub fn save_members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
    self.members.extend(members);
    self
  }

  pub fn save_coach(mut self, coach: Coach) -> Self {
    self.coaches.push(coach);
    self
  }

  pub fn save_coaches(mut self, coaches: impl IntoIterator<Item = Coach>) -> Self {
    self.coaches.extend(coaches);
    self
  }

  pub fn save_worker(mut self, worker: Worker) -> Self {
    self.workers.push(worker);
    self
  }

  pub fn remove_member(mut self, id: PersonId) -> Self {
    self.removed_members.push(id);
    self
  }

  pub fn remove_members(mut self, ids: impl IntoIterator<Item = PersonId>) -> Self {
    self.removed_members.extend(ids);
    self
  }

  pub fn remove_coach(mut self, id: PersonId) -> Self {
    self.removed_coaches.push(id);
    self
  }

  pub fn remove_coaches(mut self, ids: impl IntoIterator<Item = PersonId>) -> Self {
    self.removed_coaches.extend(ids);
    self
  }

  pub fn remove_worker(mut self, id: PersonId) -> Self {
    self.removed_workers.push(id);
    self
  }

  pub fn remove_workers(mut self, ids: impl IntoIterator<Item = PersonId>) -> Self {
    self.removed_workers.extend(ids);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.members.is_empty()
      && self.coaches.is_empty()
      && self.workers.is_empty()
      && self.removed_members.is_empty()
      && self.removed_coaches.is_empty()
      && self.removed_workers.is_empty()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a gym registry backend.
///
/// Reads are per record type. `list_*` returns records in registration order;
/// updating a record does not move it. All writes go through [`commit`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`commit`]: GymStore::commit
pub trait GymStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Members ───────────────────────────────────────────────────────────

  fn get_member(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + '_;

  fn find_member_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + 'a;

  fn list_members(
    &self,
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + '_;

  /// Members whose id is in `ids`, in registration order. Unknown ids are
  /// skipped; callers compare lengths to detect them.
  fn get_members<'a>(
    &'a self,
    ids: &'a [PersonId],
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + 'a;

  // ── Coaches ───────────────────────────────────────────────────────────

  fn get_coach(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Coach>, Self::Error>> + Send + '_;

  fn find_coach_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Coach>, Self::Error>> + Send + 'a;

  /// Look up by the digest of a coach code (see [`crate::credential`]).
  fn find_coach_by_code<'a>(
    &'a self,
    code_digest: &'a str,
  ) -> impl Future<Output = Result<Option<Coach>, Self::Error>> + Send + 'a;

  fn list_coaches(
    &self,
  ) -> impl Future<Output = Result<Vec<Coach>, Self::Error>> + Send + '_;

  // ── Workers ───────────────────────────────────────────────────────────

  fn get_worker(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Worker>, Self::Error>> + Send + '_;

  fn find_worker_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Worker>, Self::Error>> + Send + 'a;

  fn find_worker_by_code<'a>(
    &'a self,
    code_digest: &'a str,
  ) -> impl Future<Output = Result<Option<Worker>, Self::Error>> + Send + 'a;

  fn list_workers(
    &self,
  ) -> impl Future<Output = Result<Vec<Worker>, Self::Error>> + Send + '_;

  // ── Cross-table ───────────────────────────────────────────────────────

  /// `true` if any member, coach, or worker uses `email`.
  fn email_taken<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// `true` once any coach or worker has been committed, even if every one
  /// has since been removed.
  fn staff_ever_registered(
    &self,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Apply `changes` atomically.
  fn commit(
    &self,
    changes: ChangeSet,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
