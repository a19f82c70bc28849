//! Host-side dispatch for faultline error families
//!
//! [`register_errors`] binds error types to handlers in a [`HandlerTable`];
//! [`dispatch_errors`] and [`run_connection`] consult the table when a raised
//! error escapes an HTTP route or a WebSocket session.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod connection;
mod error;
mod handler;
mod layer;
pub mod metrics;
mod registry;

pub use connection::{Session, close_frame, run_connection};
pub use error::{ContractViolation, DispatchError, RegistrationError};
pub use handler::{ConnectionHandler, RequestHandler, connection_handler, request_handler};
pub use layer::dispatch_errors;
pub use registry::{HandlerTable, register_errors};

pub use connection_handler as create_websocket_exception_handler;
pub use register_errors as register_exceptions;
pub use request_handler as create_http_exception_handler;
