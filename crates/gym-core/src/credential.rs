//! Secondary credentials presented alongside an id.
//!
//! Coach and worker codes behave like passwords: only a SHA-256 digest is
//! persisted, and lookups by code hash the presented value first.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The second half of an (id, credential) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credential {
  Email(String),
  Code(String),
}

impl Credential {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Email(s) | Self::Code(s) => s,
    }
  }

  pub fn is_blank(&self) -> bool { self.as_str().trim().is_empty() }

  /// Used in messages, e.g. "an email of: a@b.c". Codes are never echoed.
  pub fn describe(&self) -> String {
    match self {
      Self::Email(email) => format!("an email of: {email}"),
      Self::Code(_) => "the given code".to_string(),
    }
  }
}

/// Hex-encoded SHA-256 of a clear-text code.
pub fn code_digest(code: &str) -> String {
  hex::encode(Sha256::digest(code.as_bytes()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn digest_is_stable_and_distinct() {
    assert_eq!(code_digest("alpha"), code_digest("alpha"));
    assert_ne!(code_digest("alpha"), code_digest("beta"));
    assert_eq!(code_digest("alpha").len(), 64);
  }

  #[test]
  fn code_is_not_echoed() {
    let c = Credential::Code("hunter2".into());
    assert!(!c.describe().contains("hunter2"));
  }
}
