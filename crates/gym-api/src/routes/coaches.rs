//! Handlers for `/coaches` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/coaches` | All coaches, registration order |
//! | `POST`   | `/coaches` | Body: [`NewCoach`]; 201 |
//! | `DELETE` | `/coaches` | Removes every coach, releasing all clients |
//! | `GET`    | `/coaches/available` | Coaches without clients |
//! | `GET`    | `/coaches/search` | `?email=` |
//! | `GET`    | `/coaches/most-clients` | First coach with the largest roster |
//! | `GET`    | `/coaches/fewest-clients` | First coach with the smallest roster |
//! | `GET`    | `/coaches/{id}` | |
//! | `DELETE` | `/coaches/{id}` | `?email=` or `?code=` |
//! | `PUT`    | `/coaches/{id}/name` | `{"credential", "name"}` |
//! | `PUT`    | `/coaches/{id}/email` | `{"credential", "new_email"}` |
//! | `PUT`    | `/coaches/{id}/code` | `{"credential", "new_code"}` |
//! | `PUT`    | `/coaches/{id}/workout-plans` | `{"credential", "workout_plans"}` |
//! | `POST`   | `/coaches/{id}/workout-plans` | `{"credential", "plan"}` |
//! | `DELETE` | `/coaches/{id}/workout-plans` | `{"credential", "plan"}` |
//! | `GET`    | `/coaches/{id}/clients` | Client records |
//! | `POST`   | `/coaches/{id}/clients` | `{"credential", "member_ids"}`; union |
//! | `PUT`    | `/coaches/{id}/clients` | `{"credential", "member_ids"}`; replace |
//! | `DELETE` | `/coaches/{id}/clients` | `{"credential", "member_ids"}`; detach |
//! | `POST`   | `/coaches/{id}/role` | `{"credential", "role": "ROLE_MEMBER", ...}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use gym_core::{
  credential::Credential,
  person::{NewCoach, PersonId, RoleChange},
  service::GymService,
  store::GymStore,
};
use serde::Deserialize;

use super::{CredentialParams, EmailParam};
use crate::{
  auth::Staff,
  error::ApiError,
  views::{self, CoachView, Deleted, MemberView, TransitionView},
};

// ─── Queries ─────────────────────────────────────────────────────────────────

/// `GET /coaches`
pub async fn list<S>(State(gym): State<GymService<S>>) -> Result<Json<Vec<CoachView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.list_coaches().await?)))
}

/// `GET /coaches/{id}`
pub async fn get_one<S>(
  State(gym): State<GymService<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.get_coach(id).await?.into()))
}

/// `GET /coaches/search?email=<email>`
pub async fn search<S>(
  State(gym): State<GymService<S>>,
  Query(params): Query<EmailParam>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.find_coach_by_email(&params.email).await?.into()))
}

/// `GET /coaches/available`
pub async fn available<S>(
  State(gym): State<GymService<S>>,
) -> Result<Json<Vec<CoachView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.available_coaches().await?)))
}

/// `GET /coaches/most-clients`
pub async fn most_clients<S>(
  State(gym): State<GymService<S>>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.coach_with_most_clients().await?.into()))
}

/// `GET /coaches/fewest-clients`
pub async fn fewest_clients<S>(
  State(gym): State<GymService<S>>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.coach_with_fewest_clients().await?.into()))
}

/// `GET /coaches/{id}/clients`
pub async fn clients<S>(
  State(gym): State<GymService<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Vec<MemberView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.get_clients(id).await?)))
}

// ─── Registration and deletion ───────────────────────────────────────────────

/// `POST /coaches`
pub async fn create<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Json(body): Json<NewCoach>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + 'static,
{
  let coach = gym.register_coach(body).await?;
  Ok((StatusCode::CREATED, Json(CoachView::from(coach))))
}

/// `DELETE /coaches/{id}?email=<email>` or `?code=<code>`
pub async fn delete_one<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Query(params): Query<CredentialParams>,
) -> Result<StatusCode, ApiError>
where
  S: GymStore + 'static,
{
  gym.delete_coach(id, &params.into_credential()?).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /coaches`
pub async fn delete_all<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
) -> Result<Json<Deleted>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(Deleted { deleted: gym.delete_all_coaches().await? }))
}

// ─── Field updates ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub credential: Credential,
  pub name:       String,
}

/// `PUT /coaches/{id}/name`
pub async fn rename<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<NameBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.rename_coach(id, &body.credential, &body.name).await?.into()))
}

#[derive(Debug, Deserialize)]
pub struct EmailBody {
  pub credential: Credential,
  pub new_email:  String,
}

/// `PUT /coaches/{id}/email`
pub async fn change_email<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<EmailBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_coach_email(id, &body.credential, &body.new_email).await?.into()))
}

#[derive(Debug, Deserialize)]
pub struct CodeBody {
  pub credential: Credential,
  pub new_code:   String,
}

/// `PUT /coaches/{id}/code`
pub async fn change_code<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<CodeBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_coach_code(id, &body.credential, &body.new_code).await?.into()))
}

// ─── Workout plans ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlansBody {
  pub credential:    Credential,
  pub workout_plans: Vec<String>,
}

/// `PUT /coaches/{id}/workout-plans`
pub async fn replace_plans<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<PlansBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  let coach = gym
    .replace_workout_plans(id, &body.credential, &body.workout_plans)
    .await?;
  Ok(Json(coach.into()))
}

#[derive(Debug, Deserialize)]
pub struct PlanBody {
  pub credential: Credential,
  pub plan:       String,
}

/// `POST /coaches/{id}/workout-plans`
pub async fn add_plan<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<PlanBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.add_workout_plan(id, &body.credential, &body.plan).await?.into()))
}

/// `DELETE /coaches/{id}/workout-plans`
pub async fn remove_plan<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<PlanBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.remove_workout_plan(id, &body.credential, &body.plan).await?.into()))
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClientsBody {
  pub credential: Credential,
  pub member_ids: Vec<PersonId>,
}

/// `POST /coaches/{id}/clients`
pub async fn add_clients<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<ClientsBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.add_clients(id, &body.credential, &body.member_ids).await?.into()))
}

/// `PUT /coaches/{id}/clients`
pub async fn replace_clients<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<ClientsBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.replace_clients(id, &body.credential, &body.member_ids).await?.into()))
}

/// `DELETE /coaches/{id}/clients`
pub async fn remove_clients<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<ClientsBody>,
) -> Result<Json<CoachView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.remove_clients(id, &body.credential, &body.member_ids).await?.into()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub credential: Credential,
  #[serde(flatten)]
  pub change:     RoleChange,
}

/// `POST /coaches/{id}/role`
pub async fn change_role<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<RoleBody>,
) -> Result<Json<TransitionView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_coach_role(id, &body.credential, body.change).await?.into()))
}
