use std::sync::Arc;

use axum::response::Response;
use faultline_core::{CloseSignal, ConnectionContext, DynConnectionFailure, DynRequestFailure, Family, Raised};
use futures_util::future::BoxFuture;
use http::request::Parts;

use crate::ContractViolation;

/// Handler bound to a request-family error type
pub type RequestHandler =
    Arc<dyn Fn(Parts, Raised) -> BoxFuture<'static, Result<Response, ContractViolation>> + Send + Sync>;

/// Handler bound to a connection-family error type
pub type ConnectionHandler =
    Arc<dyn Fn(ConnectionContext, Raised) -> BoxFuture<'static, Result<CloseSignal, ContractViolation>> + Send + Sync>;

/// Build the handler for request-family errors
///
/// Checks the family, awaits the error's hook, then builds the response.
pub fn request_handler() -> RequestHandler {
    Arc::new(|request: Parts, error: Raised| -> BoxFuture<'static, Result<Response, ContractViolation>> {
        Box::pin(async move {
            let Raised::Request(error) = error else {
                return Err(ContractViolation::WrongFamily {
                    type_name: error.name(),
                    expected: Family::Request,
                });
            };

            error.hook(&request).await;
            Ok(error.to_response(&request))
        })
    })
}

/// Build the handler for connection-family errors
///
/// Checks the family, awaits the error's hook, then yields the close signal
/// the connection runtime must act on.
pub fn connection_handler() -> ConnectionHandler {
    Arc::new(|connection: ConnectionContext, error: Raised| -> BoxFuture<'static, Result<CloseSignal, ContractViolation>> {
        Box::pin(async move {
            let Raised::Connection(error) = error else {
                return Err(ContractViolation::WrongFamily {
                    type_name: error.name(),
                    expected: Family::Connection,
                });
            };

            error.hook(&connection).await;
            Ok(error.close_signal())
        })
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use faultline_core::{ConnectionFailure, Context, RequestFailure, StatusCode, connection_error, request_error};

    use super::*;

    request_error! {
        pub struct NoUserFoundError {
            status: StatusCode::NOT_FOUND,
            message: "No such user",
        }
    }

    connection_error! {
        pub struct UnsupportedDataError {
            code: 1003,
            reason: "Only text frames are accepted",
        }
    }

    static REQUEST_HOOKS: AtomicUsize = AtomicUsize::new(0);
    static CONNECTION_HOOKS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, Default)]
    struct AuditedError {
        context: Context,
    }

    impl std::fmt::Display for AuditedError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("audited")
        }
    }

    impl std::error::Error for AuditedError {}

    #[async_trait]
    impl RequestFailure for AuditedError {
        const STATUS_CODE: StatusCode = StatusCode::FORBIDDEN;
        const MESSAGE: &'static str = "Forbidden";

        fn context(&self) -> &Context {
            &self.context
        }

        async fn hook(&self, _request: &Parts) {
            REQUEST_HOOKS.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug, Default)]
    struct KickedError;

    impl std::fmt::Display for KickedError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("kicked")
        }
    }

    impl std::error::Error for KickedError {}

    #[async_trait]
    impl ConnectionFailure for KickedError {
        const CODE: u16 = 4000;

        async fn hook(&self, _connection: &ConnectionContext) {
            CONNECTION_HOOKS.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn request_parts() -> Parts {
        http::Request::builder().uri("/1").body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn request_handler_builds_response() {
        let handler = request_handler();
        let error = NoUserFoundError::new().with("user", "1");

        let response = handler(request_parts(), error.into()).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get("x-error-type").unwrap(), "NoUserFoundError");
    }

    #[tokio::test]
    async fn request_handler_runs_hook_first() {
        let handler = request_handler();

        let response = handler(request_parts(), Raised::request(AuditedError::default())).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(REQUEST_HOOKS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_handler_rejects_connection_errors() {
        let handler = request_handler();

        let err = handler(request_parts(), UnsupportedDataError.into()).await.unwrap_err();

        assert_eq!(
            err,
            ContractViolation::WrongFamily {
                type_name: "UnsupportedDataError",
                expected: Family::Request,
            }
        );
    }

    #[tokio::test]
    async fn request_handler_rejects_unrelated_errors() {
        let handler = request_handler();
        let parse_error = "x".parse::<u8>().unwrap_err();

        let err = handler(request_parts(), Raised::other(parse_error)).await.unwrap_err();

        assert!(err.to_string().contains("ParseIntError"));
    }

    #[tokio::test]
    async fn connection_handler_yields_close_signal() {
        let handler = connection_handler();
        let connection = ConnectionContext::from_parts(&request_parts());

        let signal = handler(connection, UnsupportedDataError.into()).await.unwrap();

        assert_eq!(
            signal,
            CloseSignal {
                code: 1003,
                reason: Some("Only text frames are accepted"),
            }
        );
    }

    #[tokio::test]
    async fn connection_handler_runs_hook_first() {
        let handler = connection_handler();
        let connection = ConnectionContext::from_parts(&request_parts());

        let signal = handler(connection, Raised::connection(KickedError)).await.unwrap();

        assert_eq!(signal.code, 4000);
        assert_eq!(signal.reason, None);
        assert_eq!(CONNECTION_HOOKS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connection_handler_rejects_request_errors() {
        let handler = connection_handler();
        let connection = ConnectionContext::from_parts(&request_parts());

        let err = handler(connection, NoUserFoundError::new().into()).await.unwrap_err();

        assert_eq!(
            err,
            ContractViolation::WrongFamily {
                type_name: "NoUserFoundError",
                expected: Family::Connection,
            }
        );
    }
}
