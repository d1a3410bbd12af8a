//! Shared API state and small response types.

use std::sync::Arc;

use psico_core::{ClinicCore, ClinicResult, Therapist, TokenIssuer};
use serde::Serialize;

use crate::api::error::ApiError;

/// Handler state. Cheap to clone; everything behind it is shared.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<ClinicCore>,
    pub tokens: Arc<TokenIssuer>,
}

impl ApiContext {
    pub fn new(core: ClinicCore, tokens: TokenIssuer) -> Self {
        Self {
            core: Arc::new(core),
            tokens: Arc::new(tokens),
        }
    }

    /// Run a core operation on the blocking pool.
    ///
    /// Core calls take the database lock and may hash passwords, so they must
    /// not run on the async executor threads.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ClinicCore) -> ClinicResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let core = Arc::clone(&self.core);
        tokio::task::spawn_blocking(move || op(&core))
            .await
            .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
            .map_err(ApiError::from)
    }
}

/// Identity of the caller, injected into request extensions by
/// [`crate::api::middleware::auth::require_auth`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub therapist: Therapist,
}

/// `{"ok": true}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Parse a path id. Anything that is not a positive integer cannot name a
/// row, so it is reported as not found.
pub fn parse_id(raw: &str, not_found: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("42", "x").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_everything_else_as_not_found() {
        for raw in ["abc", "0", "-3", "1.5", ""] {
            match parse_id(raw, "Paciente no encontrado") {
                Err(ApiError::NotFound(message)) => assert_eq!(message, "Paciente no encontrado"),
                other => panic!("unexpected result for {raw:?}: {other:?}"),
            }
        }
    }
}
