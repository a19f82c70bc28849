use async_trait::async_trait;
use faultline_core::{
    Context, ErrorType, Raised, RequestFailure, StatusCode, connection_error, request_error,
};
use http::request::Parts;
use serde_json::Value;
use thiserror::Error;

/// The request carried no token, or the wrong one
///
/// Logs every rejection before the response is built.
#[derive(Debug, Default, Error)]
#[error("{}: {}", Self::STATUS_CODE.as_u16(), Self::MESSAGE)]
pub struct AuthorizationError {
    context: Context,
}

impl AuthorizationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a context value
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key, value);
        self
    }
}

#[async_trait]
impl RequestFailure for AuthorizationError {
    const STATUS_CODE: StatusCode = StatusCode::UNAUTHORIZED;
    const MESSAGE: &'static str = "Failed to authorize";

    fn context(&self) -> &Context {
        &self.context
    }

    async fn hook(&self, request: &Parts) {
        tracing::error!(method = %request.method, path = %request.uri.path(), "{}", Self::MESSAGE);
    }
}

impl From<AuthorizationError> for Raised {
    fn from(error: AuthorizationError) -> Self {
        Self::request(error)
    }
}

request_error! {
    /// The path named no user
    pub struct InvalidRequestError {
        status: StatusCode::BAD_REQUEST,
        message: "Invalid request",
    }
}

request_error! {
    /// The named user does not exist
    pub struct NoUserFoundError {
        status: StatusCode::NOT_FOUND,
        message: "No such user",
    }
}

connection_error! {
    /// The peer sent a binary frame to a text-only session
    pub struct UnsupportedDataError {
        code: 1003,
        reason: "Only text frames are accepted",
    }
}

connection_error! {
    /// A text frame exceeded the configured size limit
    pub struct MessageTooBigError {
        code: 1009,
    }
}

/// Every error type the service raises, in registration order
pub fn registered() -> [ErrorType; 5] {
    [
        ErrorType::request::<AuthorizationError>(),
        ErrorType::request::<InvalidRequestError>(),
        ErrorType::request::<NoUserFoundError>(),
        ErrorType::connection::<UnsupportedDataError>(),
        ErrorType::connection::<MessageTooBigError>(),
    ]
}
