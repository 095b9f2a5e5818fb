//! Error types for `gym-core`.
//!
//! Three business kinds plus an opaque storage failure. Transports map
//! `NotFound` to 404 and the other business kinds to 400.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A referenced id, email, or code does not resolve to any record.
  #[error("{0}")]
  NotFound(String),

  /// A required input is blank or malformed; raised before any lookup.
  #[error("{0}")]
  InvalidArgument(String),

  /// The request would break a business invariant.
  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
