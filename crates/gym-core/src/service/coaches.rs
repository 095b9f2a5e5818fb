//! Coach registration, lookup, updates, workout plans, and deletion.

use std::collections::BTreeSet;

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  credential::{Credential, code_digest},
  person::{Coach, Member, NewCoach, PersonId},
  store::{ChangeSet, GymStore},
};

use super::{GymService, missing_email, validate};

impl<S: GymStore> GymService<S> {
  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_coach(&self, id: PersonId) -> Result<Coach> { self.coach(id).await }

  pub async fn find_coach_by_email(&self, email: &str) -> Result<Coach> {
    let email = validate::email(email)?;
    self
      .store
      .find_coach_by_email(&email)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| missing_email::<Coach>(&email))
  }

  pub async fn list_coaches(&self) -> Result<Vec<Coach>> {
    self.store.list_coaches().await.map_err(Error::store)
  }

  // ── Registration ──────────────────────────────────────────────────────

  pub async fn register_coach(&self, input: NewCoach) -> Result<Coach> {
    let identity = validate::identity(&input.identity, super::today())?;
    let code = validate::code(&input.code)?;
    let workout_plans = validate::workout_plans(&input.workout_plans)?;

    let code_digest = code_digest(code);
    self.ensure_email_free(&identity.email).await?;
    self.ensure_coach_code_free(&code_digest).await?;

    let coach = Coach {
      id: Uuid::new_v4(),
      identity,
      code_digest,
      clients: BTreeSet::new(),
      workout_plans,
    };
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;

    info!(coach = %coach.id, "registered coach");
    Ok(coach)
  }

  // ── Updates ───────────────────────────────────────────────────────────

  pub async fn rename_coach(
    &self,
    id: PersonId,
    credential: &Credential,
    name: &str,
  ) -> Result<Coach> {
    let name = validate::name(name)?;
    let mut coach = self.verify_coach(id, credential).await?;
    coach.identity.name = name;
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;
    Ok(coach)
  }

  /// Changing to the current email returns the record without writing.
  pub async fn change_coach_email(
    &self,
    id: PersonId,
    credential: &Credential,
    new_email: &str,
  ) -> Result<Coach> {
    let new_email = validate::email(new_email)?;
    let mut coach = self.verify_coach(id, credential).await?;
    if coach.identity.email == new_email {
      return Ok(coach);
    }
    self.ensure_email_free(&new_email).await?;
    coach.identity.email = new_email;
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;
    info!(coach = %coach.id, "changed coach email");
    Ok(coach)
  }

  pub async fn change_coach_code(
    &self,
    id: PersonId,
    credential: &Credential,
    new_code: &str,
  ) -> Result<Coach> {
    let new_digest = code_digest(validate::code(new_code)?);
    let mut coach = self.verify_coach(id, credential).await?;
    self.ensure_coach_code_free(&new_digest).await?;
    coach.code_digest = new_digest;
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;
    info!(coach = %coach.id, "changed coach code");
    Ok(coach)
  }

  // ── Workout plans ─────────────────────────────────────────────────────

  pub async fn replace_workout_plans(
    &self,
    id: PersonId,
    credential: &Credential,
    plans: &[String],
  ) -> Result<Coach> {
    let plans = validate::workout_plans(plans)?;
    let mut coach = self.verify_coach(id, credential).await?;
    coach.workout_plans = plans;
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;
    Ok(coach)
  }

  pub async fn add_workout_plan(
    &self,
    id: PersonId,
    credential: &Credential,
    plan: &str,
  ) -> Result<Coach> {
    let plan = validate::plan(plan)?;
    let mut coach = self.verify_coach(id, credential).await?;
    if coach.workout_plans.contains(&plan) {
      return Err(Error::Conflict(format!(
        "Coach with an id of: {id} already has a workout plan named: {plan}"
      )));
    }
    coach.workout_plans.push(plan);
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;
    Ok(coach)
  }

  /// A coach always keeps at least one plan.
  pub async fn remove_workout_plan(
    &self,
    id: PersonId,
    credential: &Credential,
    plan: &str,
  ) -> Result<Coach> {
    let plan = validate::plan(plan)?;
    let mut coach = self.verify_coach(id, credential).await?;
    let Some(index) = coach.workout_plans.iter().position(|p| *p == plan) else {
      return Err(Error::NotFound(format!(
        "Coach with an id of: {id} has no workout plan named: {plan}"
      )));
    };
    if coach.workout_plans.len() == 1 {
      return Err(Error::Conflict(format!(
        "Coach with an id of: {id} must keep at least one workout plan"
      )));
    }
    coach.workout_plans.remove(index);
    self.commit(ChangeSet::new().save_coach(coach.clone())).await?;
    Ok(coach)
  }

  // ── Deletion ──────────────────────────────────────────────────────────

  /// Delete a coach. Its clients are made available in the same change set;
  /// a coach without clients is removed directly.
  pub async fn delete_coach(&self, id: PersonId, credential: &Credential) -> Result<()> {
    let coach = self.verify_coach(id, credential).await?;
    let released = self.release_clients(&coach).await?;
    let count = released.len();

    let mut changes = ChangeSet::new();
    if !released.is_empty() {
      changes = changes.save_members(released);
    }
    self.commit(changes.remove_coach(coach.id)).await?;

    info!(coach = %id, released = count, "deleted coach");
    Ok(())
  }

  /// Remove every coach, making every member available. Returns the number
  /// of coaches removed.
  pub async fn delete_all_coaches(&self) -> Result<usize> {
    let coaches = self.list_coaches().await?;
    if coaches.is_empty() {
      return Ok(0);
    }
    let members = self.store.list_members().await.map_err(Error::store)?;

    let released = members.into_iter().filter(|m| m.coached_by.is_some()).map(|mut m| {
      m.coached_by = None;
      m
    });
    let count = coaches.len();
    let changes = ChangeSet::new()
      .save_members(released)
      .remove_coaches(coaches.into_iter().map(|c| c.id));
    self.commit(changes).await?;

    info!(count, "deleted all coaches");
    Ok(count)
  }

  /// Every client of `coach` with its coach link cleared.
  pub(super) async fn release_clients(&self, coach: &Coach) -> Result<Vec<Member>> {
    if coach.clients.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<PersonId> = coach.clients.iter().copied().collect();
    let members = self.store.get_members(&ids).await.map_err(Error::store)?;
    Ok(
      members
        .into_iter()
        .map(|mut m| {
          m.coached_by = None;
          m
        })
        .collect(),
    )
  }
}
