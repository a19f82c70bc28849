use std::any::Any;
use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use http::{HeaderMap, Method, Uri, request::Parts};
use uuid::Uuid;

use crate::family::short_type_name;

/// Terminal outcome of handling a connection-family error
///
/// The connection runtime turns this into a close frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseSignal {
    /// WebSocket close code
    pub code: u16,
    /// Optional close reason
    pub reason: Option<&'static str>,
}

/// The originating connection, as seen by connection-family hooks
///
/// Captured from the upgrade request; the id is unique per connection.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub id: Uuid,
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl ConnectionContext {
    /// Capture the handshake request
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            id: Uuid::new_v4(),
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ConnectionContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Domain error that terminates a WebSocket connection
///
/// Close code and reason are fixed per type. Handling runs
/// [`ConnectionFailure::hook`], then closes the connection with
/// [`ConnectionFailure::close_signal`].
#[async_trait]
pub trait ConnectionFailure: std::error::Error + Send + Sync + Sized + 'static {
    /// Close code sent to the peer
    const CODE: u16;

    /// Close reason sent to the peer
    const REASON: Option<&'static str> = None;

    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    fn close_signal(&self) -> CloseSignal {
        CloseSignal {
            code: Self::CODE,
            reason: Self::REASON,
        }
    }

    /// Runs before the connection is closed; no-op by default
    async fn hook(&self, _connection: &ConnectionContext) {}
}

/// Object-safe view of a [`ConnectionFailure`]
#[async_trait]
pub trait DynConnectionFailure: std::error::Error + Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn close_signal(&self) -> CloseSignal;

    async fn hook(&self, connection: &ConnectionContext);

    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<E: ConnectionFailure> DynConnectionFailure for E {
    fn name(&self) -> &'static str {
        ConnectionFailure::name(self)
    }

    fn close_signal(&self) -> CloseSignal {
        ConnectionFailure::close_signal(self)
    }

    async fn hook(&self, connection: &ConnectionContext) {
        ConnectionFailure::hook(self, connection).await;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
