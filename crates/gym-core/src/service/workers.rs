//! Worker registration, lookup, updates, and deletion.

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  credential::{Credential, code_digest},
  person::{NewWorker, PersonId, Worker},
  store::{ChangeSet, GymStore},
};

use super::{GymService, missing_email, today, validate};

impl<S: GymStore> GymService<S> {
  pub async fn get_worker(&self, id: PersonId) -> Result<Worker> { self.worker(id).await }

  pub async fn find_worker_by_email(&self, email: &str) -> Result<Worker> {
    let email = validate::email(email)?;
    self
      .store
      .find_worker_by_email(&email)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| missing_email::<Worker>(&email))
  }

  pub async fn list_workers(&self) -> Result<Vec<Worker>> {
    self.store.list_workers().await.map_err(Error::store)
  }

  pub async fn register_worker(&self, input: NewWorker) -> Result<Worker> {
    let identity = validate::identity(&input.identity, today())?;
    let code_digest = code_digest(validate::code(&input.code)?);
    self.ensure_email_free(&identity.email).await?;
    self.ensure_worker_code_free(&code_digest).await?;

    let worker = Worker { id: Uuid::new_v4(), identity, code_digest };
    self.commit(ChangeSet::new().save_worker(worker.clone())).await?;

    info!(worker = %worker.id, "registered worker");
    Ok(worker)
  }

  pub async fn rename_worker(
    &self,
    id: PersonId,
    credential: &Credential,
    name: &str,
  ) -> Result<Worker> {
    let name = validate::name(name)?;
    let mut worker = self.verify_worker(id, credential).await?;
    worker.identity.name = name;
    self.commit(ChangeSet::new().save_worker(worker.clone())).await?;
    Ok(worker)
  }

  /// Changing to the current email returns the record without writing.
  pub async fn change_worker_email(
    &self,
    id: PersonId,
    credential: &Credential,
    new_email: &str,
  ) -> Result<Worker> {
    let new_email = validate::email(new_email)?;
    let mut worker = self.verify_worker(id, credential).await?;
    if worker.identity.email == new_email {
      return Ok(worker);
    }
    self.ensure_email_free(&new_email).await?;
    worker.identity.email = new_email;
    self.commit(ChangeSet::new().save_worker(worker.clone())).await?;
    Ok(worker)
  }

  pub async fn change_worker_code(
    &self,
    id: PersonId,
    credential: &Credential,
    new_code: &str,
  ) -> Result<Worker> {
    let new_digest = code_digest(validate::code(new_code)?);
    let mut worker = self.verify_worker(id, credential).await?;
    self.ensure_worker_code_free(&new_digest).await?;
    worker.code_digest = new_digest;
    self.commit(ChangeSet::new().save_worker(worker.clone())).await?;
    info!(worker = %worker.id, "changed worker code");
    Ok(worker)
  }

  pub async fn delete_worker(&self, id: PersonId, credential: &Credential) -> Result<()> {
    let worker = self.verify_worker(id, credential).await?;
    self.commit(ChangeSet::new().remove_worker(worker.id)).await?;
    info!(worker = %id, "deleted worker");
    Ok(())
  }

  pub async fn delete_all_workers(&self) -> Result<usize> {
    let workers = self.list_workers().await?;
    let count = workers.len();
    if count > 0 {
      self
        .commit(ChangeSet::new().remove_workers(workers.into_iter().map(|w| w.id)))
        .await?;
      info!(count, "deleted all workers");
    }
    Ok(count)
  }
}
