//! Static API key authentication.

use std::fmt;
use thiserror::Error;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-lnac-api-key";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("LNAC_API_KEY not set on server")]
    Unconfigured,

    #[error("Invalid API key")]
    Unauthorized,
}

/// Checks caller keys against the secret configured at startup.
///
/// Only the BLAKE3 digest of the secret is kept. `blake3::Hash` equality is
/// constant-time, so the comparison does not leak how much of the key matched.
#[derive(Clone, Default)]
pub struct Authenticator {
    secret: Option<blake3::Hash>,
}

impl Authenticator {
    /// An empty secret is treated the same as no secret.
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret
            .filter(|secret| !secret.is_empty())
            .map(|secret| blake3::hash(secret.as_bytes()));
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn verify(&self, provided: Option<&str>) -> Result<(), AuthError> {
        let expected = self.secret.as_ref().ok_or(AuthError::Unconfigured)?;
        let provided = provided.ok_or(AuthError::Unauthorized)?;
        if blake3::hash(provided.as_bytes()) == *expected {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("configured", &self.is_configured())
            .finish()
    }
}
