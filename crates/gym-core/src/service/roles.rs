//! Role transitions — moving a person between the member, coach, and worker
//! tables.
//!
//! A transition deletes the source record and creates a target record with a
//! fresh id and the same [`Identity`], all in one change set. Role-specific
//! data does not survive: a member's lifts are dropped on leaving, and a coach
//! leaving the role releases every client first. Asking for the role a
//! person already holds is a conflict, not a no-op.

use std::collections::BTreeSet;

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  credential::{Credential, code_digest},
  person::{
    Coach, Identity, Lifts, Member, Person, PersonId, RoleChange, Transitioned, Worker,
  },
  store::{ChangeSet, GymStore},
};

use super::{GymService, validate};

impl<S: GymStore> GymService<S> {
  pub async fn change_member_role(
    &self,
    id: PersonId,
    email: &str,
    change: RoleChange,
  ) -> Result<Transitioned> {
    let change = validated(change)?;
    let member = self.verify_member(id, &Credential::Email(email.to_owned())).await?;
    reject_same_role::<Member>(id, &change)?;
    self.ensure_target_free(&member.identity.email, &change).await?;

    let mut changes = ChangeSet::new().remove_member(member.id);
    if let Some(previous) = self.previous_coach(&member).await? {
      changes = changes.save_coach(previous);
    }
    self.finish_transition::<Member>(id, member.identity, change, changes).await
  }

  pub async fn change_coach_role(
    &self,
    id: PersonId,
    credential: &Credential,
    change: RoleChange,
  ) -> Result<Transitioned> {
    let change = validated(change)?;
    let coach = self.verify_coach(id, credential).await?;
    reject_same_role::<Coach>(id, &change)?;
    self.ensure_target_free(&coach.identity.email, &change).await?;

    let released = self.release_clients(&coach).await?;
    let changes = ChangeSet::new().save_members(released).remove_coach(coach.id);
    self.finish_transition::<Coach>(id, coach.identity, change, changes).await
  }

  pub async fn change_worker_role(
    &self,
    id: PersonId,
    credential: &Credential,
    change: RoleChange,
  ) -> Result<Transitioned> {
    let change = validated(change)?;
    let worker = self.verify_worker(id, credential).await?;
    reject_same_role::<Worker>(id, &change)?;
    self.ensure_target_free(&worker.identity.email, &change).await?;

    let changes = ChangeSet::new().remove_worker(worker.id);
    self.finish_transition::<Worker>(id, worker.identity, change, changes).await
  }

  /// The person's own email is still held by the source record, so the
  /// target table is checked on its own rather than through `email_taken`.
  async fn ensure_target_free(&self, email: &str, change: &RoleChange) -> Result<()> {
    let clash = match change {
      RoleChange::ToMember { .. } => {
        self.store.find_member_by_email(email).await.map_err(Error::store)?.is_some()
      }
      RoleChange::ToCoach { code, .. } => {
        self.ensure_coach_code_free(&code_digest(code)).await?;
        self.store.find_coach_by_email(email).await.map_err(Error::store)?.is_some()
      }
      RoleChange::ToWorker { code } => {
        self.ensure_worker_code_free(&code_digest(code)).await?;
        self.store.find_worker_by_email(email).await.map_err(Error::store)?.is_some()
      }
    };
    if clash {
      return Err(Error::Conflict(format!(
        "A person with an email of: {email} already has a role of {}",
        change.target()
      )));
    }
    Ok(())
  }

  async fn finish_transition<P: Person>(
    &self,
    old_id: PersonId,
    identity: Identity,
    change: RoleChange,
    changes: ChangeSet,
  ) -> Result<Transitioned> {
    let target = change.target();
    let record = build_record(identity, change);
    let (new_id, changes) = match &record {
      Transitioned::Member(m) => (m.id, changes.save_member(m.clone())),
      Transitioned::Coach(c) => (c.id, changes.save_coach(c.clone())),
      Transitioned::Worker(w) => (w.id, changes.save_worker(w.clone())),
    };
    self.commit(changes).await?;

    info!(%old_id, %new_id, from = %P::ROLE, to = %target, "changed role");
    Ok(record)
  }
}

fn validated(change: RoleChange) -> Result<RoleChange> {
  Ok(match change {
    RoleChange::ToMember { membership_date } => RoleChange::ToMember {
      membership_date: validate::membership_date(&membership_date)?,
    },
    RoleChange::ToCoach { code, workout_plans } => {
      validate::code(&code)?;
      RoleChange::ToCoach {
        workout_plans: validate::workout_plans(&workout_plans)?,
        code,
      }
    }
    RoleChange::ToWorker { code } => {
      validate::code(&code)?;
      RoleChange::ToWorker { code }
    }
  })
}

fn reject_same_role<P: Person>(id: PersonId, change: &RoleChange) -> Result<()> {
  if change.target() == P::ROLE {
    return Err(Error::Conflict(format!(
      "{} with an id of: {id} already has a role of {}",
      P::LABEL,
      P::ROLE
    )));
  }
  Ok(())
}

fn build_record(identity: Identity, change: RoleChange) -> Transitioned {
  let id = Uuid::new_v4();
  match change {
    RoleChange::ToMember { membership_date } => Transitioned::Member(Member {
      id,
      identity,
      membership_date,
      coached_by: None,
      lifts: Lifts::default(),
    }),
    RoleChange::ToCoach { code, workout_plans } => Transitioned::Coach(Coach {
      id,
      identity,
      code_digest: code_digest(&code),
      clients: BTreeSet::new(),
      workout_plans,
    }),
    RoleChange::ToWorker { code } => Transitioned::Worker(Worker {
      id,
      identity,
      code_digest: code_digest(&code),
    }),
  }
}
