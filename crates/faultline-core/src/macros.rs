/// Declare a request-family error type
///
/// ```
/// use faultline_core::{RequestFailure, StatusCode, request_error};
///
/// request_error! {
///     /// Raised when the path names no user
///     pub struct InvalidRequestError {
///         status: StatusCode::BAD_REQUEST,
///         message: "Invalid request",
///     }
/// }
///
/// let error = InvalidRequestError::new().with("reason", "no user");
/// assert_eq!(RequestFailure::name(&error), "InvalidRequestError");
/// ```
///
/// The generated type carries a [`Context`](crate::Context), converts into
/// [`Raised`](crate::Raised), and keeps the default hook. Implement
/// [`RequestFailure`](crate::RequestFailure) by hand to override the hook.
#[macro_export]
macro_rules! request_error {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            status: $status:expr,
            message: $message:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq)]
        $vis struct $name {
            context: $crate::Context,
        }

        impl $name {
            #[allow(dead_code)]
            pub fn new() -> Self {
                Self::default()
            }

            /// Attach a context value
            #[allow(dead_code)]
            #[must_use]
            pub fn with(
                mut self,
                key: impl ::std::convert::Into<::std::string::String>,
                value: impl ::std::convert::Into<$crate::__private::Value>,
            ) -> Self {
                self.context.insert(key, value);
                self
            }

            #[allow(dead_code)]
            pub fn from_context(context: $crate::Context) -> Self {
                Self { context }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{}: {}",
                    <Self as $crate::RequestFailure>::STATUS_CODE.as_u16(),
                    <Self as $crate::RequestFailure>::MESSAGE,
                )
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("status_code", &<Self as $crate::RequestFailure>::STATUS_CODE.as_u16())
                    .field("message", &<Self as $crate::RequestFailure>::MESSAGE)
                    .field("context", &self.context)
                    .finish()
            }
        }

        impl ::std::error::Error for $name {}

        impl $crate::RequestFailure for $name {
            const STATUS_CODE: $crate::__private::StatusCode = $status;
            const MESSAGE: &'static str = $message;

            fn context(&self) -> &$crate::Context {
                &self.context
            }

            fn name(&self) -> &'static str {
                stringify!($name)
            }
        }

        impl ::std::convert::From<$name> for $crate::Raised {
            fn from(error: $name) -> Self {
                $crate::Raised::request(error)
            }
        }
    };
}

/// Declare a connection-family error type
///
/// ```
/// use faultline_core::{ConnectionFailure, connection_error};
///
/// connection_error! {
///     pub struct UnsupportedDataError {
///         code: 1003,
///         reason: "Only text frames are accepted",
///     }
/// }
///
/// assert_eq!(ConnectionFailure::close_signal(&UnsupportedDataError).code, 1003);
/// ```
#[macro_export]
macro_rules! connection_error {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            code: $code:expr
            $(, reason: $reason:expr)? $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $name;

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let code = <Self as $crate::ConnectionFailure>::CODE;
                match <Self as $crate::ConnectionFailure>::REASON {
                    Some(reason) => write!(f, "{code}: {reason}"),
                    None => write!(f, "{code}: None"),
                }
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("code", &<Self as $crate::ConnectionFailure>::CODE)
                    .field("reason", &<Self as $crate::ConnectionFailure>::REASON)
                    .finish()
            }
        }

        impl ::std::error::Error for $name {}

        impl $crate::ConnectionFailure for $name {
            const CODE: u16 = $code;
            $(const REASON: ::std::option::Option<&'static str> = ::std::option::Option::Some($reason);)?

            fn name(&self) -> &'static str {
                stringify!($name)
            }
        }

        impl ::std::convert::From<$name> for $crate::Raised {
            fn from(error: $name) -> Self {
                $crate::Raised::connection(error)
            }
        }
    };
}
