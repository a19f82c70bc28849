use std::any::TypeId;
use std::collections::HashMap;

use axum::response::Response;
use faultline_core::{CloseSignal, ConnectionContext, ErrorType, Family, Raised};
use http::request::Parts;

use crate::{
    ConnectionHandler, DispatchError, RegistrationError, RequestHandler, connection_handler, request_handler,
};

/// The host's exception-to-handler table
///
/// Populated once at startup, then shared read-only (typically behind an
/// `Arc`) by the dispatch layer and the connection runtime. Binding the same
/// type twice replaces the earlier handler.
#[derive(Default)]
pub struct HandlerTable {
    request: HashMap<TypeId, RequestHandler>,
    connection: HashMap<TypeId, ConnectionHandler>,
    order: Vec<ErrorType>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler for request-family dispatch
    pub fn add_request_handler(&mut self, error_type: ErrorType, handler: RequestHandler) {
        self.request.insert(error_type.type_id(), handler);
        self.order.push(error_type);
    }

    /// Bind a handler for connection-family dispatch
    pub fn add_connection_handler(&mut self, error_type: ErrorType, handler: ConnectionHandler) {
        self.connection.insert(error_type.type_id(), handler);
        self.order.push(error_type);
    }

    /// Registered types, in registration order
    pub fn registered(&self) -> &[ErrorType] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Run the request handler bound to the error's concrete type
    pub async fn dispatch_request(&self, request: Parts, error: Raised) -> Result<Response, DispatchError> {
        let Some(handler) = self.request.get(&error.error_type_id()) else {
            return Err(DispatchError::Unhandled {
                type_name: error.name(),
                family: Family::Request.as_str(),
            });
        };

        Ok(handler(request, error).await?)
    }

    /// Run the connection handler bound to the error's concrete type
    pub async fn dispatch_connection(
        &self,
        connection: ConnectionContext,
        error: Raised,
    ) -> Result<CloseSignal, DispatchError> {
        let Some(handler) = self.connection.get(&error.error_type_id()) else {
            return Err(DispatchError::Unhandled {
                type_name: error.name(),
                family: Family::Connection.as_str(),
            });
        };

        Ok(handler(connection, error).await?)
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.order.iter().map(ErrorType::name)).finish()
    }
}

/// Bind each error type to a fresh handler of its family
///
/// Types are processed in order. The first type that belongs to neither
/// family aborts registration; types before it stay bound.
pub fn register_errors<I>(table: &mut HandlerTable, error_types: I) -> Result<(), RegistrationError>
where
    I: IntoIterator<Item = ErrorType>,
{
    for error_type in error_types {
        match error_type.family() {
            Some(Family::Request) => table.add_request_handler(error_type, request_handler()),
            Some(Family::Connection) => table.add_connection_handler(error_type, connection_handler()),
            None => {
                return Err(RegistrationError::UnknownFamily {
                    type_name: error_type.name(),
                });
            }
        }

        tracing::debug!(error_type = error_type.name(), family = ?error_type.family(), "registered error handler");
    }

    Ok(())
}
