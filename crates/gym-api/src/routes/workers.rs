//! Handlers for `/workers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/workers` | All workers, registration order |
//! | `POST`   | `/workers` | Body: [`NewWorker`]; 201. Open until the first staff member is stored |
//! | `DELETE` | `/workers` | Removes every worker |
//! | `GET`    | `/workers/search` | `?email=` |
//! | `GET`    | `/workers/{id}` | |
//! | `DELETE` | `/workers/{id}` | `?email=` or `?code=` |
//! | `PUT`    | `/workers/{id}/name` | `{"credential", "name"}` |
//! | `PUT`    | `/workers/{id}/email` | `{"credential", "new_email"}` |
//! | `PUT`    | `/workers/{id}/code` | `{"credential", "new_code"}` |
//! | `POST`   | `/workers/{id}/role` | `{"credential", "role": "ROLE_COACH", ...}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use gym_core::{
  person::{NewWorker, PersonId},
  service::GymService,
  store::GymStore,
};

use super::{
  CredentialParams, EmailParam,
  coaches::{CodeBody, EmailBody, NameBody, RoleBody},
};
use crate::{
  auth::{self, Staff},
  error::ApiError,
  views::{self, Deleted, TransitionView, WorkerView},
};

// ─── Queries ─────────────────────────────────────────────────────────────────

/// `GET /workers`
pub async fn list<S>(State(gym): State<GymService<S>>) -> Result<Json<Vec<WorkerView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.list_workers().await?)))
}

/// `GET /workers/{id}`
pub async fn get_one<S>(
  State(gym): State<GymService<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<WorkerView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.get_worker(id).await?.into()))
}

/// `GET /workers/search?email=<email>`
pub async fn search<S>(
  State(gym): State<GymService<S>>,
  Query(params): Query<EmailParam>,
) -> Result<Json<WorkerView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.find_worker_by_email(&params.email).await?.into()))
}

// ─── Registration and deletion ───────────────────────────────────────────────

/// `POST /workers`
pub async fn create<S>(
  State(gym): State<GymService<S>>,
  headers: HeaderMap,
  Json(body): Json<NewWorker>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + 'static,
{
  auth::verify_staff_or_bootstrap(&headers, &gym).await?;
  let worker = gym.register_worker(body).await?;
  Ok((StatusCode::CREATED, Json(WorkerView::from(worker))))
}

/// `DELETE /workers/{id}?email=<email>` or `?code=<code>`
pub async fn delete_one<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Query(params): Query<CredentialParams>,
) -> Result<StatusCode, ApiError>
where
  S: GymStore + 'static,
{
  gym.delete_worker(id, &params.into_credential()?).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /workers`
pub async fn delete_all<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
) -> Result<Json<Deleted>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(Deleted { deleted: gym.delete_all_workers().await? }))
}

// ─── Field updates ───────────────────────────────────────────────────────────

/// `PUT /workers/{id}/name`
pub async fn rename<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<NameBody>,
) -> Result<Json<WorkerView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.rename_worker(id, &body.credential, &body.name).await?.into()))
}

/// `PUT /workers/{id}/email`
pub async fn change_email<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<EmailBody>,
) -> Result<Json<WorkerView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_worker_email(id, &body.credential, &body.new_email).await?.into()))
}

/// `PUT /workers/{id}/code`
pub async fn change_code<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<CodeBody>,
) -> Result<Json<WorkerView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_worker_code(id, &body.credential, &body.new_code).await?.into()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// `POST /workers/{id}/role`
pub async fn change_role<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<RoleBody>,
) -> Result<Json<TransitionView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_worker_role(id, &body.credential, body.change).await?.into()))
}
