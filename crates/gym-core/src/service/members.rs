//! Member registration, lookup, updates, and deletion.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  credential::Credential,
  person::{Coach, LiftsPatch, Member, NewMember, PersonId},
  store::{ChangeSet, GymStore},
};

use super::{GymService, missing_email, today, validate};

impl<S: GymStore> GymService<S> {
  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_member(&self, id: PersonId) -> Result<Member> { self.member(id).await }

  pub async fn find_member_by_email(&self, email: &str) -> Result<Member> {
    let email = validate::email(email)?;
    self
      .store
      .find_member_by_email(&email)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| missing_email::<Member>(&email))
  }

  pub async fn list_members(&self) -> Result<Vec<Member>> {
    self.store.list_members().await.map_err(Error::store)
  }

  /// The coach of `id`, or `None` if the member is available.
  pub async fn get_member_coach(&self, id: PersonId) -> Result<Option<Coach>> {
    let member = self.member(id).await?;
    match member.coached_by {
      Some(coach_id) => Ok(Some(self.coach(coach_id).await?)),
      None => Ok(None),
    }
  }

  // ── Registration ──────────────────────────────────────────────────────

  /// Register a member. When `coach_id` is set, both sides of the coaching
  /// link are written in the same change set.
  pub async fn register_member(&self, input: NewMember) -> Result<Member> {
    let identity = validate::identity(&input.identity, today())?;
    let membership_date = validate::membership_date(&input.membership_date)?;
    self.ensure_email_free(&identity.email).await?;

    let coach = match input.coach_id {
      Some(coach_id) => Some(self.coach(coach_id).await?),
      None => None,
    };

    let member = Member {
      id: Uuid::new_v4(),
      identity,
      membership_date,
      coached_by: input.coach_id,
      lifts: input.lifts,
    };

    let mut changes = ChangeSet::new().save_member(member.clone());
    if let Some(mut coach) = coach {
      coach.clients.insert(member.id);
      changes = changes.save_coach(coach);
    }
    self.commit(changes).await?;

    info!(member = %member.id, coach = ?member.coached_by, "registered member");
    Ok(member)
  }

  // ── Updates ───────────────────────────────────────────────────────────

  pub async fn rename_member(&self, id: PersonId, email: &str, name: &str) -> Result<Member> {
    let name = validate::name(name)?;
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    member.identity.name = name;
    self.commit(ChangeSet::new().save_member(member.clone())).await?;
    Ok(member)
  }

  /// Changing to the current email returns the record without writing.
  pub async fn change_member_email(
    &self,
    id: PersonId,
    email: &str,
    new_email: &str,
  ) -> Result<Member> {
    let new_email = validate::email(new_email)?;
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    if member.identity.email == new_email {
      return Ok(member);
    }
    self.ensure_email_free(&new_email).await?;
    member.identity.email = new_email;
    self.commit(ChangeSet::new().save_member(member.clone())).await?;
    info!(member = %member.id, "changed member email");
    Ok(member)
  }

  pub async fn change_member_date_of_birth(
    &self,
    id: PersonId,
    email: &str,
    date_of_birth: NaiveDate,
  ) -> Result<Member> {
    let date_of_birth = validate::date_of_birth(date_of_birth, today())?;
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    member.identity.date_of_birth = date_of_birth;
    self.commit(ChangeSet::new().save_member(member.clone())).await?;
    Ok(member)
  }

  pub async fn change_membership_date(
    &self,
    id: PersonId,
    email: &str,
    membership_date: &str,
  ) -> Result<Member> {
    let membership_date = validate::membership_date(membership_date)?;
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    member.membership_date = membership_date;
    self.commit(ChangeSet::new().save_member(member.clone())).await?;
    Ok(member)
  }

  /// Overwrite any subset of the three lifts. The total follows.
  pub async fn update_lifts(
    &self,
    id: PersonId,
    email: &str,
    patch: LiftsPatch,
  ) -> Result<Member> {
    if patch.is_empty() {
      return Err(Error::InvalidArgument(
        "At least one of bench, squat, or deadlift is required".into(),
      ));
    }
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    patch.apply(&mut member.lifts);
    self.commit(ChangeSet::new().save_member(member.clone())).await?;
    info!(member = %member.id, total = member.lifts.total(), "updated lifts");
    Ok(member)
  }

  // ── Member-side relationship edits ────────────────────────────────────

  /// Point the member at `coach_id`, leaving any previous coach's roster.
  /// Assigning the current coach again is a no-op.
  pub async fn assign_coach(
    &self,
    id: PersonId,
    email: &str,
    coach_id: PersonId,
  ) -> Result<Member> {
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    let mut coach = self.coach(coach_id).await?;
    if member.coached_by == Some(coach_id) {
      return Ok(member);
    }

    let mut changes = ChangeSet::new();
    if let Some(previous) = self.previous_coach(&member).await? {
      changes = changes.save_coach(previous);
    }
    coach.clients.insert(member.id);
    member.coached_by = Some(coach_id);
    self
      .commit(changes.save_coach(coach).save_member(member.clone()))
      .await?;

    info!(member = %member.id, coach = %coach_id, "assigned coach");
    Ok(member)
  }

  /// Make the member available. A member without a coach is left as is.
  pub async fn unassign_coach(&self, id: PersonId, email: &str) -> Result<Member> {
    let mut member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    if member.coached_by.is_none() {
      return Ok(member);
    }

    let mut changes = ChangeSet::new();
    if let Some(previous) = self.previous_coach(&member).await? {
      changes = changes.save_coach(previous);
    }
    member.coached_by = None;
    self.commit(changes.save_member(member.clone())).await?;

    info!(member = %member.id, "unassigned coach");
    Ok(member)
  }

  // ── Deletion ──────────────────────────────────────────────────────────

  pub async fn delete_member(&self, id: PersonId, email: &str) -> Result<()> {
    let member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    let mut changes = ChangeSet::new().remove_member(member.id);
    if let Some(previous) = self.previous_coach(&member).await? {
      changes = changes.save_coach(previous);
    }
    self.commit(changes).await?;
    info!(member = %id, "deleted member");
    Ok(())
  }

  /// Remove every member and empty every coach's roster. Returns the number
  /// of members removed.
  pub async fn delete_all_members(&self) -> Result<usize> {
    let members = self.list_members().await?;
    if members.is_empty() {
      return Ok(0);
    }
    let coaches = self.store.list_coaches().await.map_err(Error::store)?;

    let emptied = coaches.into_iter().filter(|c| !c.clients.is_empty()).map(|mut c| {
      c.clients.clear();
      c
    });
    let count = members.len();
    let changes = ChangeSet::new()
      .save_coaches(emptied)
      .remove_members(members.into_iter().map(|m| m.id));
    self.commit(changes).await?;

    info!(count, "deleted all members");
    Ok(count)
  }

  /// The member's current coach with the member already taken off its
  /// roster, ready to be saved.
  pub(super) async fn previous_coach(&self, member: &Member) -> Result<Option<Coach>> {
    let Some(coach_id) = member.coached_by else {
      return Ok(None);
    };
    let coach = self.store.get_coach(coach_id).await.map_err(Error::store)?;
    Ok(coach.map(|mut c| {
      c.clients.remove(&member.id);
      c
    }))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use crate::{
    Error,
    person::{Lifts, LiftsPatch},
    testing::{Fixture, new_member},
  };

  #[tokio::test]
  async fn register_links_both_sides() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let john = fx.member("john").await;
    assert_eq!(john.coached_by, Some(alex.id));
    assert_eq!(alex.clients.len(), 3);
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn duplicate_email_across_roles_is_rejected_without_write() {
    let fx = Fixture::scenario().await;
    let before = fx.store.commit_count();

    // alex@x.com belongs to a coach.
    let err = fx.gym.register_member(new_member("Alex", None)).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(fx.store.commit_count(), before);
  }

  #[tokio::test]
  async fn register_with_unknown_coach_is_not_found() {
    let fx = Fixture::empty();
    let err = fx
      .gym
      .register_member(new_member("Nina", Some(uuid::Uuid::new_v4())))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(fx.store.commit_count(), 0);
  }

  #[tokio::test]
  async fn register_rejects_future_birthday() {
    let fx = Fixture::empty();
    let mut input = new_member("Nina", None);
    input.identity.date_of_birth = NaiveDate::from_ymd_opt(2999, 1, 1).unwrap();
    let err = fx.gym.register_member(input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
  }

  #[tokio::test]
  async fn lift_updates_keep_total_in_sync() {
    let fx = Fixture::scenario().await;
    let sam = fx.member("sam").await;
    let updated = fx
      .gym
      .update_lifts(sam.id, "sam@x.com", LiftsPatch {
        bench:    Some(225),
        squat:    Some(315),
        deadlift: None,
      })
      .await
      .unwrap();
    assert_eq!(updated.lifts, Lifts { bench: 225, squat: 315, deadlift: 0 });
    assert_eq!(updated.lifts.total(), 540);

    let err = fx
      .gym
      .update_lifts(sam.id, "sam@x.com", LiftsPatch::default())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
  }

  #[tokio::test]
  async fn email_change_checks_every_role() {
    let fx = Fixture::scenario().await;
    let sam = fx.member("sam").await;
    let err = fx
      .gym
      .change_member_email(sam.id, "sam@x.com", "wendy@x.com")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let moved = fx
      .gym
      .change_member_email(sam.id, "sam@x.com", "samuel@x.com")
      .await
      .unwrap();
    assert_eq!(moved.identity.email, "samuel@x.com");
    assert_eq!(fx.gym.find_member_by_email("samuel@x.com").await.unwrap().id, sam.id);
  }

  #[tokio::test]
  async fn rename_requires_matching_email() {
    let fx = Fixture::scenario().await;
    let sam = fx.member("sam").await;
    let err = fx.gym.rename_member(sam.id, "john@x.com", "Samuel").await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let renamed = fx.gym.rename_member(sam.id, "sam@x.com", "Samuel").await.unwrap();
    assert_eq!(renamed.identity.name, "Samuel");
  }

  #[tokio::test]
  async fn assign_coach_moves_between_rosters() {
    let fx = Fixture::scenario().await;
    let maria = fx.coach("maria").await;
    let john = fx.member("john").await;

    let moved = fx.gym.assign_coach(john.id, "john@x.com", maria.id).await.unwrap();
    assert_eq!(moved.coached_by, Some(maria.id));
    assert_eq!(fx.coach("alex").await.clients.len(), 2);
    assert!(fx.coach("maria").await.clients.contains(&john.id));
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn unassign_coach_makes_member_available() {
    let fx = Fixture::scenario().await;
    let john = fx.member("john").await;
    let freed = fx.gym.unassign_coach(john.id, "john@x.com").await.unwrap();
    assert!(freed.is_available());
    assert!(!fx.coach("alex").await.clients.contains(&john.id));
    assert!(fx.gym.get_member_coach(john.id).await.unwrap().is_none());
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn delete_member_leaves_roster() {
    let fx = Fixture::scenario().await;
    let jane = fx.member("jane").await;
    fx.gym.delete_member(jane.id, "jane@x.com").await.unwrap();

    assert!(matches!(fx.gym.get_member(jane.id).await, Err(Error::NotFound(_))));
    let maria = fx.coach("maria").await;
    assert_eq!(maria.clients.len(), 1);
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn delete_all_members_empties_rosters() {
    let fx = Fixture::scenario().await;
    assert_eq!(fx.gym.delete_all_members().await.unwrap(), 6);
    assert!(fx.gym.list_members().await.unwrap().is_empty());
    for coach in fx.gym.list_coaches().await.unwrap() {
      assert!(coach.clients.is_empty());
    }
  }

  #[tokio::test]
  async fn lookup_by_email_reports_missing() {
    let fx = Fixture::empty();
    let err = fx.gym.find_member_by_email("ghost@x.com").await.unwrap_err();
    let Error::NotFound(msg) = err else { panic!("expected not found") };
    assert!(msg.contains("ghost@x.com"));
  }

  #[tokio::test]
  async fn same_email_change_writes_nothing() {
    let fx = Fixture::scenario().await;
    let john = fx.member("john").await;
    let before = fx.store.commit_count();

    let got = fx.gym.change_member_email(john.id, "john@x.com", " john@x.com ").await.unwrap();
    assert_eq!(got.identity.email, "john@x.com");
    assert_eq!(fx.store.commit_count(), before);
  }
}
