use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use faultline_config::AuthConfig;
use faultline_core::Raised;
use http::HeaderName;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::AuthorizationError;

/// Expected token and the header it arrives in
pub struct TokenCheck {
    header_name: HeaderName,
    token: SecretString,
}

impl TokenCheck {
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let header_name = HeaderName::try_from(config.header_name.as_str())
            .map_err(|e| anyhow::anyhow!("invalid auth header name `{}`: {e}", config.header_name))?;

        Ok(Self {
            header_name,
            token: config.token.clone(),
        })
    }
}

/// Middleware rejecting requests without the configured token
///
/// A missing token and a wrong token both raise `AuthorizationError`; the
/// wrong one is echoed back in the error context.
pub async fn authorize(check: Arc<TokenCheck>, request: Request, next: Next) -> Result<Response, Raised> {
    let token = request
        .headers()
        .get(&check.header_name)
        .and_then(|v| v.to_str().ok());

    match token {
        None => Err(AuthorizationError::new().with("reason", "no token").into()),
        Some(token) if token != check.token.expose_secret() => Err(AuthorizationError::new()
            .with("reason", "no token")
            .with("token", token)
            .into()),
        Some(_) => Ok(next.run(request).await),
    }
}
