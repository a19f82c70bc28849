//! Typed error families for HTTP and WebSocket transports
//!
//! Domain errors implement either [`RequestFailure`] (terminates in a JSON
//! response) or [`ConnectionFailure`] (terminates in a close frame). Business
//! logic hands them to the host as a [`Raised`] value; the dispatch layer
//! looks up the registered handler and performs the terminal action.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod connection;
mod context;
mod family;
mod macros;
mod raised;
mod request;

pub use connection::{CloseSignal, ConnectionContext, ConnectionFailure, DynConnectionFailure};
pub use context::Context;
pub use family::{ErrorType, Family, short_type_name};
pub use http::StatusCode;
pub use raised::Raised;
pub use request::{DynRequestFailure, ERROR_TYPE_HEADER, ErrorBody, RequestFailure};

#[doc(hidden)]
pub mod __private {
    pub use http::StatusCode;
    pub use serde_json::Value;
}
