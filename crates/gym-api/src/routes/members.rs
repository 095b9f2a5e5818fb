//! Handlers for `/members` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/members` | All members, registration order |
//! | `POST`   | `/members` | Body: [`NewMember`]; 201 |
//! | `DELETE` | `/members` | Removes every member |
//! | `GET`    | `/members/available` | Members without a coach |
//! | `GET`    | `/members/search` | `?email=` |
//! | `GET`    | `/members/top/{lift}` | `bench`, `squat`, `deadlift`, `total` |
//! | `GET`    | `/members/above-total` | `?threshold=` |
//! | `GET`    | `/members/{id}` | |
//! | `DELETE` | `/members/{id}` | `?email=` |
//! | `PUT`    | `/members/{id}/name` | `{"email", "name"}` |
//! | `PUT`    | `/members/{id}/email` | `{"email", "new_email"}` |
//! | `PUT`    | `/members/{id}/date-of-birth` | `{"email", "date_of_birth"}` |
//! | `PUT`    | `/members/{id}/membership-date` | `{"email", "membership_date"}` |
//! | `PATCH`  | `/members/{id}/lifts` | `{"email", "bench"?, "squat"?, "deadlift"?}` |
//! | `GET`    | `/members/{id}/coach` | `null` when unassigned |
//! | `PUT`    | `/members/{id}/coach` | `{"email", "coach_id"}` |
//! | `DELETE` | `/members/{id}/coach` | `?email=` |
//! | `POST`   | `/members/{id}/role` | `{"email", "role": "ROLE_COACH", ...}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use gym_core::{
  person::{Lift, LiftsPatch, NewMember, PersonId, RoleChange},
  service::GymService,
  store::GymStore,
};
use serde::Deserialize;

use super::EmailParam;
use crate::{
  auth::Staff,
  error::ApiError,
  views::{self, CoachView, Deleted, MemberView, TransitionView},
};

// ─── Queries ─────────────────────────────────────────────────────────────────

/// `GET /members`
pub async fn list<S>(State(gym): State<GymService<S>>) -> Result<Json<Vec<MemberView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.list_members().await?)))
}

/// `GET /members/{id}`
pub async fn get_one<S>(
  State(gym): State<GymService<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.get_member(id).await?.into()))
}

/// `GET /members/search?email=<email>`
pub async fn search<S>(
  State(gym): State<GymService<S>>,
  Query(params): Query<EmailParam>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.find_member_by_email(&params.email).await?.into()))
}

/// `GET /members/available`
pub async fn available<S>(
  State(gym): State<GymService<S>>,
) -> Result<Json<Vec<MemberView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.available_members().await?)))
}

/// `GET /members/top/{lift}`
pub async fn top<S>(
  State(gym): State<GymService<S>>,
  Path(lift): Path<Lift>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.highest(lift).await?.into()))
}

#[derive(Debug, Deserialize)]
pub struct ThresholdParams {
  pub threshold: u64,
}

/// `GET /members/above-total?threshold=<n>`
pub async fn above_total<S>(
  State(gym): State<GymService<S>>,
  Query(params): Query<ThresholdParams>,
) -> Result<Json<Vec<MemberView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(views::all(gym.members_above_total(params.threshold).await?)))
}

/// `GET /members/{id}/coach`
pub async fn coach<S>(
  State(gym): State<GymService<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Option<CoachView>>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.get_member_coach(id).await?.map(Into::into)))
}

// ─── Registration and deletion ───────────────────────────────────────────────

/// `POST /members`
pub async fn create<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Json(body): Json<NewMember>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GymStore + 'static,
{
  let member = gym.register_member(body).await?;
  Ok((StatusCode::CREATED, Json(MemberView::from(member))))
}

/// `DELETE /members/{id}?email=<email>`
pub async fn delete_one<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Query(params): Query<EmailParam>,
) -> Result<StatusCode, ApiError>
where
  S: GymStore + 'static,
{
  gym.delete_member(id, &params.email).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /members`
pub async fn delete_all<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
) -> Result<Json<Deleted>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(Deleted { deleted: gym.delete_all_members().await? }))
}

// ─── Field updates ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub email: String,
  pub name:  String,
}

/// `PUT /members/{id}/name`
pub async fn rename<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<NameBody>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.rename_member(id, &body.email, &body.name).await?.into()))
}

#[derive(Debug, Deserialize)]
pub struct EmailBody {
  pub email:     String,
  pub new_email: String,
}

/// `PUT /members/{id}/email`
pub async fn change_email<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<EmailBody>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_member_email(id, &body.email, &body.new_email).await?.into()))
}

#[derive(Debug, Deserialize)]
pub struct DateOfBirthBody {
  pub email:         String,
  pub date_of_birth: NaiveDate,
}

/// `PUT /members/{id}/date-of-birth`
pub async fn change_date_of_birth<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<DateOfBirthBody>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  let member = gym
    .change_member_date_of_birth(id, &body.email, body.date_of_birth)
    .await?;
  Ok(Json(member.into()))
}

#[derive(Debug, Deserialize)]
pub struct MembershipDateBody {
  pub email:           String,
  pub membership_date: String,
}

/// `PUT /members/{id}/membership-date`
pub async fn change_membership_date<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<MembershipDateBody>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  let member = gym
    .change_membership_date(id, &body.email, &body.membership_date)
    .await?;
  Ok(Json(member.into()))
}

#[derive(Debug, Deserialize)]
pub struct LiftsBody {
  pub email: String,
  #[serde(flatten)]
  pub patch: LiftsPatch,
}

/// `PATCH /members/{id}/lifts`
pub async fn update_lifts<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<LiftsBody>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.update_lifts(id, &body.email, body.patch).await?.into()))
}

// ─── Coach link ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub email:    String,
  pub coach_id: PersonId,
}

/// `PUT /members/{id}/coach`
pub async fn assign_coach<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<AssignBody>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.assign_coach(id, &body.email, body.coach_id).await?.into()))
}

/// `DELETE /members/{id}/coach?email=<email>`
pub async fn unassign_coach<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Query(params): Query<EmailParam>,
) -> Result<Json<MemberView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.unassign_coach(id, &params.email).await?.into()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub email:  String,
  #[serde(flatten)]
  pub change: RoleChange,
}

/// `POST /members/{id}/role`
pub async fn change_role<S>(
  State(gym): State<GymService<S>>,
  _staff: Staff,
  Path(id): Path<PersonId>,
  Json(body): Json<RoleBody>,
) -> Result<Json<TransitionView>, ApiError>
where
  S: GymStore + 'static,
{
  Ok(Json(gym.change_member_role(id, &body.email, body.change).await?.into()))
}
