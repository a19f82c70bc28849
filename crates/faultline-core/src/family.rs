use std::any::TypeId;
use std::fmt;

use crate::{ConnectionFailure, RequestFailure};

/// The two disjoint error families a registered type can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Terminates in a JSON HTTP response
    Request,
    /// Terminates in a closed WebSocket connection
    Connection,
}

impl Family {
    /// Name of the trait that defines membership in this family
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "RequestFailure",
            Self::Connection => "ConnectionFailure",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration descriptor for a concrete error type
///
/// Carries what the registrar needs to bind a handler: the type's identity,
/// its display name, and which family it belongs to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorType {
    name: &'static str,
    type_id: TypeId,
    family: Option<Family>,
}

impl ErrorType {
    /// Describe a request-family error type
    pub fn request<E: RequestFailure>() -> Self {
        Self {
            name: short_type_name::<E>(),
            type_id: TypeId::of::<E>(),
            family: Some(Family::Request),
        }
    }

    /// Describe a connection-family error type
    pub fn connection<E: ConnectionFailure>() -> Self {
        Self {
            name: short_type_name::<E>(),
            type_id: TypeId::of::<E>(),
            family: Some(Family::Connection),
        }
    }

    /// Describe an error type that belongs to neither family
    ///
    /// The registrar rejects these; the constructor exists so lists assembled
    /// at runtime can carry arbitrary error types up to that check.
    pub fn unclassified<E: std::error::Error + 'static>() -> Self {
        Self {
            name: short_type_name::<E>(),
            type_id: TypeId::of::<E>(),
            family: None,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub const fn family(&self) -> Option<Family> {
        self.family
    }
}

/// Bare identifier of a type, without its module path or generic arguments
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
