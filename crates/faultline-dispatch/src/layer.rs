use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use faultline_core::{Family, Raised};
use http::StatusCode;

use crate::{DispatchError, HandlerTable, metrics};

/// Middleware that routes raised errors through the handler table
///
/// Route handlers and inner middleware return `Result<_, Raised>`; the
/// raised error travels out in the response extensions. This layer takes
/// it, runs the bound handler with the originating request, and returns the
/// handler's response. Errors with no usable handler leave a bare 500.
pub async fn dispatch_errors(table: Arc<HandlerTable>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let originating = parts.clone();

    let mut response = next.run(Request::from_parts(parts, body)).await;

    let Some(raised) = response.extensions_mut().remove::<Raised>() else {
        return response;
    };

    let type_name = raised.name();

    match table.dispatch_request(originating, raised).await {
        Ok(response) => {
            tracing::debug!(error_type = type_name, status = %response.status(), "handled raised error");
            metrics::record_handled(type_name, Family::Request);
            response
        }
        Err(DispatchError::Unhandled { .. }) => {
            tracing::error!(error_type = type_name, "no handler registered for raised error");
            metrics::record_unhandled(type_name);
            response
        }
        Err(DispatchError::Contract(violation)) => {
            tracing::error!(error_type = type_name, "error handler contract violated: {violation}");
            metrics::record_unhandled(type_name);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
