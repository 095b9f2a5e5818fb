//! Staff header extractor and standalone verifier.
//!
//! Mutating routes require `x-staff-id` and `x-staff-code` naming a
//! registered coach or worker. The code is checked through the identity gate.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use gym_core::{
  person::{PersonId, Role},
  service::GymService,
  store::GymStore,
};
use tracing::warn;

use crate::error::ApiError;

pub const STAFF_ID: &str = "x-staff-id";
pub const STAFF_CODE: &str = "x-staff-code";

/// The authenticated operator behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staff {
  pub id:   PersonId,
  pub role: Role,
}

fn unauthorized() -> ApiError { ApiError::Unauthorized("Valid staff credentials are required".into()) }

fn header<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, ApiError> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(unauthorized)
}

/// Verify the staff headers directly; used where the extractor cannot be.
pub async fn verify_staff<S: GymStore>(
  headers: &HeaderMap,
  gym: &GymService<S>,
) -> Result<Staff, ApiError> {
  let id: PersonId = header(headers, STAFF_ID)?.parse().map_err(|_| unauthorized())?;
  let code = header(headers, STAFF_CODE)?;

  match gym.verify_staff(id, code).await {
    Ok(role) => Ok(Staff { id, role }),
    Err(gym_core::Error::Store(e)) => Err(ApiError::Store(e)),
    Err(e) => {
      warn!(staff = %id, reason = %e, "rejected staff credentials");
      Err(unauthorized())
    }
  }
}

/// Like [`verify_staff`], but lets the request through without headers
/// until the first coach or worker has ever been stored, so an empty
/// registry can enroll its first worker. Removing every staff member later
/// does not reopen it.
pub async fn verify_staff_or_bootstrap<S: GymStore>(
  headers: &HeaderMap,
  gym: &GymService<S>,
) -> Result<Option<Staff>, ApiError> {
  if gym.enrollment_open().await? {
    return Ok(None);
  }
  verify_staff(headers, gym).await.map(Some)
}

impl<S> FromRequestParts<GymService<S>> for Staff
where
  S: GymStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    gym: &GymService<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_staff(&parts.headers, gym).await
  }
}
