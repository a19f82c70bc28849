use std::any::Any;
use std::borrow::Cow;

use async_trait::async_trait;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{HeaderName, HeaderValue, StatusCode, request::Parts};
use serde::{Deserialize, Serialize};

use crate::{Context, family::short_type_name};

/// Response header carrying the concrete error type name
pub const ERROR_TYPE_HEADER: HeaderName = HeaderName::from_static("x-error-type");

/// JSON body of every request-family error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    pub context: Context,
}

/// Domain error that terminates in an HTTP response
///
/// Status code and message are fixed per type; the context is set per
/// instance. Override [`RequestFailure::hook`] for side effects that must
/// run before the response is built, and [`RequestFailure::to_response`] to
/// change the response itself.
#[async_trait]
pub trait RequestFailure: std::error::Error + Send + Sync + Sized + 'static {
    /// HTTP status code of every response built from this type
    const STATUS_CODE: StatusCode;

    /// Message shared by every instance of this type
    const MESSAGE: &'static str;

    /// Instance-specific context
    fn context(&self) -> &Context;

    /// Display name, used in the `X-Error-Type` header
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Body of the response: `{"message": ..., "context": ...}`
    fn to_body(&self) -> ErrorBody {
        ErrorBody {
            message: Cow::Borrowed(Self::MESSAGE),
            context: self.context().clone(),
        }
    }

    /// Build the response sent to the client
    fn to_response(&self, _request: &Parts) -> Response {
        let mut response = (Self::STATUS_CODE, Json(self.to_body())).into_response();

        match HeaderValue::from_str(self.name()) {
            Ok(value) => {
                response.headers_mut().insert(ERROR_TYPE_HEADER, value);
            }
            Err(e) => tracing::warn!(name = self.name(), "error name is not a valid header value: {e}"),
        }

        response
    }

    /// Runs before the response is built; no-op by default
    async fn hook(&self, _request: &Parts) {}
}

/// Object-safe view of a [`RequestFailure`]
///
/// Implemented for every `RequestFailure`; this is what [`crate::Raised`]
/// carries once the concrete type is erased.
#[async_trait]
pub trait DynRequestFailure: std::error::Error + Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn status_code(&self) -> StatusCode;

    fn message(&self) -> &'static str;

    fn context(&self) -> &Context;

    fn to_body(&self) -> ErrorBody;

    fn to_response(&self, request: &Parts) -> Response;

    async fn hook(&self, request: &Parts);

    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<E: RequestFailure> DynRequestFailure for E {
    fn name(&self) -> &'static str {
        RequestFailure::name(self)
    }

    fn status_code(&self) -> StatusCode {
        E::STATUS_CODE
    }

    fn message(&self) -> &'static str {
        E::MESSAGE
    }

    fn context(&self) -> &Context {
        RequestFailure::context(self)
    }

    fn to_body(&self) -> ErrorBody {
        RequestFailure::to_body(self)
    }

    fn to_response(&self, request: &Parts) -> Response {
        RequestFailure::to_response(self, request)
    }

    async fn hook(&self, request: &Parts) {
        RequestFailure::hook(self, request).await;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
