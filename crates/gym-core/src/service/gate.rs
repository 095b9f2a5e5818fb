//! Identity gate — confirm that an id and a secondary credential name the
//! same record before anything is mutated.
//!
//! Checks run in a fixed order:
//!
//! 1. blank credential → `InvalidArgument` (no lookup performed)
//! 2. id does not resolve → `NotFound`
//! 3. credential does not resolve → `NotFound` (emails are trimmed first,
//!    as they are on registration)
//! 4. the two lookups disagree → `Conflict`

use crate::{
  Error, Result,
  credential::{Credential, code_digest},
  person::{Coach, Member, Person, PersonId, Role, Worker},
  store::GymStore,
};

use super::GymService;

impl<S: GymStore> GymService<S> {
  /// Members carry no code, so only an email credential is accepted.
  pub async fn verify_member(
    &self,
    id: PersonId,
    credential: &Credential,
  ) -> Result<Member> {
    reject_blank(credential)?;
    let Credential::Email(email) = credential else {
      return Err(Error::InvalidArgument(
        "Members are verified by email, not by code".into(),
      ));
    };
    let by_id = self.member(id).await?;
    let by_credential = self
      .store
      .find_member_by_email(email.trim())
      .await
      .map_err(Error::store)?;
    same_record(by_id, by_credential, credential)
  }

  pub async fn verify_coach(
    &self,
    id: PersonId,
    credential: &Credential,
  ) -> Result<Coach> {
    reject_blank(credential)?;
    let by_id = self.coach(id).await?;
    let by_credential = match credential {
      Credential::Email(email) => self.store.find_coach_by_email(email.trim()).await,
      Credential::Code(code) => {
        self.store.find_coach_by_code(&code_digest(code)).await
      }
    }
    .map_err(Error::store)?;
    same_record(by_id, by_credential, credential)
  }

  pub async fn verify_worker(
    &self,
    id: PersonId,
    credential: &Credential,
  ) -> Result<Worker> {
    reject_blank(credential)?;
    let by_id = self.worker(id).await?;
    let by_credential = match credential {
      Credential::Email(email) => self.store.find_worker_by_email(email.trim()).await,
      Credential::Code(code) => {
        self.store.find_worker_by_code(&code_digest(code)).await
      }
    }
    .map_err(Error::store)?;
    same_record(by_id, by_credential, credential)
  }

  /// Authenticate a staff (id, code) pair against coaches, then workers.
  /// Returns the role that matched.
  pub async fn verify_staff(&self, id: PersonId, code: &str) -> Result<Role> {
    let credential = Credential::Code(code.to_owned());
    reject_blank(&credential)?;

    if self.store.get_coach(id).await.map_err(Error::store)?.is_some() {
      return self.verify_coach(id, &credential).await.map(|_| Role::Coach);
    }
    if self.store.get_worker(id).await.map_err(Error::store)?.is_some() {
      return self.verify_worker(id, &credential).await.map(|_| Role::Worker);
    }
    Err(Error::NotFound(format!("Staff with an id of: {id} doesn't exist")))
  }

  /// Whether a worker may still be enrolled without staff credentials. Closes
  /// for good once the first coach or worker is stored.
  pub async fn enrollment_open(&self) -> Result<bool> {
    let seen = self.store.staff_ever_registered().await.map_err(Error::store)?;
    Ok(!seen)
  }
}

fn reject_blank(credential: &Credential) -> Result<()> {
  if credential.is_blank() {
    return Err(Error::InvalidArgument(match credential {
      Credential::Email(_) => "Email must not be blank".into(),
      Credential::Code(_) => "Code must not be blank".into(),
    }));
  }
  Ok(())
}

fn same_record<P: Person>(
  by_id: P,
  by_credential: Option<P>,
  credential: &Credential,
) -> Result<P> {
  let Some(by_credential) = by_credential else {
    return Err(Error::NotFound(format!(
      "{} with {} doesn't exist",
      P::LABEL,
      credential.describe()
    )));
  };
  if by_credential.id() != by_id.id() {
    return Err(Error::Conflict(format!(
      "{label} with an id of: {id} and {label} with {cred} isn't the same entity",
      label = P::LABEL,
      id = by_id.id(),
      cred = credential.describe(),
    )));
  }
  Ok(by_id)
}
