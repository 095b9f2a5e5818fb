//! Coach ↔ member roster maintenance.
//!
//! Invariant after every operation here: `member.coached_by == Some(c)` if
//! and only if `c.clients` contains the member. A member switching coaches
//! is removed from the old coach's roster in the same change set.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::{
  Error, Result,
  credential::Credential,
  person::{Coach, Member, PersonId},
  store::{ChangeSet, GymStore},
};

use super::{GymService, missing};

impl<S: GymStore> GymService<S> {
  /// Union `member_ids` into the coach's roster.
  pub async fn add_clients(
    &self,
    coach_id: PersonId,
    credential: &Credential,
    member_ids: &[PersonId],
  ) -> Result<Coach> {
    if member_ids.is_empty() {
      return Err(Error::InvalidArgument("No clients were given".into()));
    }
    let mut coach = self.verify_coach(coach_id, credential).await?;
    let joining = self.resolve_members(member_ids).await?;

    let mut roster = Roster::new(self);
    for mut member in joining {
      if member.coached_by == Some(coach.id) {
        continue;
      }
      roster.leave_previous(&member).await?;
      member.coached_by = Some(coach.id);
      coach.clients.insert(member.id);
      roster.members.push(member);
    }

    let added = roster.members.len();
    self.commit(roster.finish(coach.clone())).await?;
    info!(coach = %coach.id, added, "added clients");
    Ok(coach)
  }

  /// Make `member_ids` the coach's entire roster. Former clients not in the
  /// new list become available. An empty list clears the roster.
  pub async fn replace_clients(
    &self,
    coach_id: PersonId,
    credential: &Credential,
    member_ids: &[PersonId],
  ) -> Result<Coach> {
    let mut coach = self.verify_coach(coach_id, credential).await?;
    let incoming = self.resolve_members(member_ids).await?;
    let wanted: BTreeSet<PersonId> = incoming.iter().map(|m| m.id).collect();

    let mut roster = Roster::new(self);

    let dropped: Vec<PersonId> = coach.clients.difference(&wanted).copied().collect();
    let dropped = self.store.get_members(&dropped).await.map_err(Error::store)?;
    for mut member in dropped {
      member.coached_by = None;
      roster.members.push(member);
    }

    for mut member in incoming {
      if member.coached_by == Some(coach.id) {
        continue;
      }
      roster.leave_previous(&member).await?;
      member.coached_by = Some(coach.id);
      roster.members.push(member);
    }

    coach.clients = wanted;
    self.commit(roster.finish(coach.clone())).await?;
    info!(coach = %coach.id, clients = coach.clients.len(), "replaced clients");
    Ok(coach)
  }

  /// Take `member_ids` off the coach's roster. Each must currently be a
  /// client of this coach.
  pub async fn remove_clients(
    &self,
    coach_id: PersonId,
    credential: &Credential,
    member_ids: &[PersonId],
  ) -> Result<Coach> {
    if member_ids.is_empty() {
      return Err(Error::InvalidArgument("No clients were given".into()));
    }
    let mut coach = self.verify_coach(coach_id, credential).await?;
    if let Some(stranger) = member_ids.iter().find(|id| !coach.clients.contains(id)) {
      return Err(Error::NotFound(format!(
        "Member with an id of: {stranger} isn't a client of Coach with an id of: {coach_id}"
      )));
    }

    let leaving = self.resolve_members(member_ids).await?;
    let mut changes = ChangeSet::new();
    for mut member in leaving {
      coach.clients.remove(&member.id);
      member.coached_by = None;
      changes = changes.save_member(member);
    }
    self.commit(changes.save_coach(coach.clone())).await?;
    info!(coach = %coach.id, removed = member_ids.len(), "removed clients");
    Ok(coach)
  }

  /// The coach's clients in registration order. An empty roster is a valid
  /// result.
  pub async fn get_clients(&self, coach_id: PersonId) -> Result<Vec<Member>> {
    let coach = self.coach(coach_id).await?;
    if coach.clients.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<PersonId> = coach.clients.into_iter().collect();
    self.store.get_members(&ids).await.map_err(Error::store)
  }

  /// Coaches with no clients. Fails only if no coach is registered at all.
  pub async fn available_coaches(&self) -> Result<Vec<Coach>> {
    let coaches = self.store.list_coaches().await.map_err(Error::store)?;
    if coaches.is_empty() {
      return Err(no_coaches());
    }
    Ok(coaches.into_iter().filter(Coach::is_available).collect())
  }

  /// Members with no coach.
  pub async fn available_members(&self) -> Result<Vec<Member>> {
    let members = self.store.list_members().await.map_err(Error::store)?;
    Ok(members.into_iter().filter(Member::is_available).collect())
  }

  /// Resolve every id, failing on the first one that is not a member.
  /// Duplicate ids collapse.
  async fn resolve_members(&self, ids: &[PersonId]) -> Result<Vec<Member>> {
    let unique: BTreeSet<PersonId> = ids.iter().copied().collect();
    let unique: Vec<PersonId> = unique.into_iter().collect();
    let found = self.store.get_members(&unique).await.map_err(Error::store)?;
    if found.len() != unique.len() {
      let first_missing = ids
        .iter()
        .find(|id| !found.iter().any(|m| m.id == **id))
        .copied()
        .unwrap_or_default();
      return Err(missing::<Member>(first_missing));
    }
    Ok(found)
  }
}

pub(super) fn no_coaches() -> Error { Error::NotFound("No coaches are registered".into()) }

/// Accumulates the members and other coaches touched by a roster change so
/// they can be committed together.
struct Roster<'s, S> {
  gym:     &'s GymService<S>,
  members: Vec<Member>,
  others:  BTreeMap<PersonId, Coach>,
}

impl<'s, S: GymStore> Roster<'s, S> {
  fn new(gym: &'s GymService<S>) -> Self {
    Self { gym, members: Vec::new(), others: BTreeMap::new() }
  }

  /// Drop `member` from the roster of whichever coach currently has it.
  async fn leave_previous(&mut self, member: &Member) -> Result<()> {
    let Some(previous) = member.coached_by else {
      return Ok(());
    };
    if !self.others.contains_key(&previous) {
      let loaded = self.gym.store.get_coach(previous).await.map_err(Error::store)?;
      match loaded {
        Some(coach) => {
          self.others.insert(previous, coach);
        }
        None => return Ok(()),
      }
    }
    if let Some(coach) = self.others.get_mut(&previous) {
      coach.clients.remove(&member.id);
    }
    Ok(())
  }

  fn finish(self, coach: Coach) -> ChangeSet {
    ChangeSet::new()
      .save_coaches(self.others.into_values())
      .save_coach(coach)
      .save_members(self.members)
  }
}

#[cfg(test)]
mod tests {
  use crate::{
    Error,
    testing::{Fixture, email, new_coach},
  };

  #[tokio::test]
  async fn replace_detaches_old_clients() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let maria = fx.coach("maria").await;
    let jane = fx.member("jane").await;
    let emily = fx.member("emily").await;

    let alex = fx
      .gym
      .replace_clients(alex.id, &email("alex@x.com"), &[jane.id, emily.id])
      .await
      .unwrap();

    assert_eq!(alex.clients, [jane.id, emily.id].into_iter().collect());
    for name in ["john", "david", "carlos"] {
      assert!(fx.member(name).await.coached_by.is_none(), "{name} still coached");
    }
    for name in ["jane", "emily"] {
      assert_eq!(fx.member(name).await.coached_by, Some(alex.id));
    }
    // Maria lost both clients to Alex.
    assert!(fx.coach("maria").await.clients.is_empty());
    assert_eq!(fx.coach("maria").await.id, maria.id);
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn replace_writes_one_change_set() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let sam = fx.member("sam").await;
    let before = fx.store.commit_count();

    fx.gym
      .replace_clients(alex.id, &email("alex@x.com"), &[sam.id])
      .await
      .unwrap();
    assert_eq!(fx.store.commit_count(), before + 1);
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn replace_with_unknown_id_writes_nothing() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let jane = fx.member("jane").await;
    let before = fx.store.commit_count();

    let ghost = uuid::Uuid::new_v4();
    let err = fx
      .gym
      .replace_clients(alex.id, &email("alex@x.com"), &[jane.id, ghost])
      .await
      .unwrap_err();
    let Error::NotFound(msg) = err else { panic!("expected not found") };
    assert!(msg.contains(&ghost.to_string()));
    assert_eq!(fx.store.commit_count(), before);
  }

  #[tokio::test]
  async fn add_is_a_union() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let john = fx.member("john").await;
    let sam = fx.member("sam").await;

    let alex = fx
      .gym
      .add_clients(alex.id, &email("alex@x.com"), &[john.id, sam.id, sam.id])
      .await
      .unwrap();
    assert_eq!(alex.clients.len(), 4);
    assert_eq!(fx.member("sam").await.coached_by, Some(alex.id));
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn add_steals_from_previous_coach() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let jane = fx.member("jane").await;

    fx.gym
      .add_clients(alex.id, &email("alex@x.com"), &[jane.id])
      .await
      .unwrap();
    assert_eq!(fx.coach("maria").await.clients.len(), 1);
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn add_rejects_empty_input() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    assert!(matches!(
      fx.gym.add_clients(alex.id, &email("alex@x.com"), &[]).await,
      Err(Error::InvalidArgument(_))
    ));
  }

  #[tokio::test]
  async fn remove_only_accepts_current_clients() {
    let fx = Fixture::scenario().await;
    let alex = fx.coach("alex").await;
    let john = fx.member("john").await;
    let jane = fx.member("jane").await;

    assert!(matches!(
      fx.gym.remove_clients(alex.id, &email("alex@x.com"), &[jane.id]).await,
      Err(Error::NotFound(_))
    ));

    let alex = fx
      .gym
      .remove_clients(alex.id, &email("alex@x.com"), &[john.id])
      .await
      .unwrap();
    assert_eq!(alex.clients.len(), 2);
    assert!(fx.member("john").await.is_available());
    fx.assert_roster_consistent().await;
  }

  #[tokio::test]
  async fn empty_roster_is_a_valid_result() {
    let fx = Fixture::scenario().await;
    let zoe = fx.gym.register_coach(new_coach("Zoe")).await.unwrap();
    assert!(fx.gym.get_clients(zoe.id).await.unwrap().is_empty());

    let alex = fx.coach("alex").await;
    let names: Vec<_> = fx
      .gym
      .get_clients(alex.id)
      .await
      .unwrap()
      .into_iter()
      .map(|m| m.identity.name)
      .collect();
    assert_eq!(names, ["John", "David", "Carlos"]);
  }

  #[tokio::test]
  async fn availability_queries() {
    let fx = Fixture::empty();
    assert!(matches!(fx.gym.available_coaches().await, Err(Error::NotFound(_))));
    assert!(fx.gym.available_members().await.unwrap().is_empty());

    let fx = Fixture::scenario().await;
    assert!(fx.gym.available_coaches().await.unwrap().is_empty());
    let zoe = fx.gym.register_coach(new_coach("Zoe")).await.unwrap();
    let available = fx.gym.available_coaches().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, zoe.id);

    let members = fx.gym.available_members().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].identity.name, "Sam");
  }
}
