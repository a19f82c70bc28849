use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::{
    ConnectionFailure, DynConnectionFailure, DynRequestFailure, Family, RequestFailure, family::short_type_name,
};

/// A domain error on its way from business logic to the host
///
/// Route handlers and middleware return `Result<_, Raised>`. Converting a
/// `Raised` into a response yields a bare 500 carrying the error in its
/// extensions, which the dispatch layer picks up and routes to the handler
/// registered for the concrete type.
#[derive(Clone)]
pub enum Raised {
    Request(Arc<dyn DynRequestFailure>),
    Connection(Arc<dyn DynConnectionFailure>),
    /// Any error outside both families
    Other {
        name: &'static str,
        type_id: TypeId,
        error: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl Raised {
    pub fn request<E: RequestFailure>(error: E) -> Self {
        Self::Request(Arc::new(error))
    }

    pub fn connection<E: ConnectionFailure>(error: E) -> Self {
        Self::Connection(Arc::new(error))
    }

    pub fn other<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Other {
            name: short_type_name::<E>(),
            type_id: TypeId::of::<E>(),
            error: Arc::new(error),
        }
    }

    /// Display name of the concrete error type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Request(error) => error.name(),
            Self::Connection(error) => error.name(),
            Self::Other { name, .. } => name,
        }
    }

    /// `TypeId` of the concrete error type, the key handlers are bound to
    pub fn error_type_id(&self) -> TypeId {
        match self {
            Self::Request(error) => error.as_any().type_id(),
            Self::Connection(error) => error.as_any().type_id(),
            Self::Other { type_id, .. } => *type_id,
        }
    }

    pub const fn family(&self) -> Option<Family> {
        match self {
            Self::Request(_) => Some(Family::Request),
            Self::Connection(_) => Some(Family::Connection),
            Self::Other { .. } => None,
        }
    }

    /// Borrow the concrete error if it is of type `E`
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Request(error) => error.as_any().downcast_ref(),
            Self::Connection(error) => error.as_any().downcast_ref(),
            Self::Other { error, .. } => error.downcast_ref(),
        }
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        match self {
            Self::Request(error) => &**error,
            Self::Connection(error) => &**error,
            Self::Other { error, .. } => &**error,
        }
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_error(), f)
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_error(), f)
    }
}

impl std::error::Error for Raised {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.as_error())
    }
}

impl IntoResponse for Raised {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}
