//! Route handlers, one module per record type.
//!
//! Handlers that mutate a record take the record's own credential in addition
//! to the [`crate::auth::Staff`] headers. Members pass `email`; coaches and
//! workers pass `"credential": {"email": ...}` or `{"code": ...}` in bodies and
//! `?email=` or `?code=` on `DELETE`.

pub mod coaches;
pub mod members;
pub mod workers;

use gym_core::credential::Credential;
use serde::Deserialize;

use crate::error::ApiError;

/// Query-string credential: `email` or `code`, exactly one of which must be
/// present.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialParams {
  pub email: Option<String>,
  pub code:  Option<String>,
}

impl CredentialParams {
  pub fn into_credential(self) -> Result<Credential, ApiError> {
    match (self.email, self.code) {
      (Some(email), None) => Ok(Credential::Email(email)),
      (None, Some(code)) => Ok(Credential::Code(code)),
      (Some(_), Some(_)) => {
        Err(ApiError::BadRequest("Give either an email or a code, not both".into()))
      }
      (None, None) => Err(ApiError::BadRequest("An email or a code is required".into())),
    }
  }
}

/// Members are always identified by email.
#[derive(Debug, Deserialize)]
pub struct EmailParam {
  pub email: String,
}
