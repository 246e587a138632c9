//! Token acquisition.
//!
//! A fresh token is requested on every invocation that needs one; it lives in
//! memory only and is never logged.

use crate::config::ConnectionConfig;
use crate::constants::LOGIN_ROUTE;
use crate::error::AuthError;
use crate::transport::Transport;
use serde_json::Value;
use tracing::debug;

/// Opaque bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Extract the token from a `/login` response body
///
/// Any non-null `error` field means the credentials were refused; the
/// server's wording is dropped.
pub fn parse_login_response(body: &[u8]) -> Result<AuthToken, AuthError> {
    let value: Value = serde_json::from_slice(body).map_err(AuthError::MalformedResponse)?;
    if value.get("error").is_some_and(|e| !e.is_null()) {
        return Err(AuthError::InvalidCredentials);
    }
    match value.get("token") {
        Some(Value::String(s)) => Ok(AuthToken(s.clone())),
        None | Some(Value::Null) => Err(AuthError::MissingToken),
        Some(other) => Ok(AuthToken(other.to_string())),
    }
}

/// Exchange the configured credentials for a bearer token
pub async fn authenticate(
    transport: &Transport,
    cfg: &ConnectionConfig,
) -> anyhow::Result<AuthToken> {
    debug!(username = cfg.username(), "authenticating");
    let body = transport
        .post_json(LOGIN_ROUTE, &cfg.credentials(), None)
        .await?;
    Ok(parse_login_response(&body)?)
}
