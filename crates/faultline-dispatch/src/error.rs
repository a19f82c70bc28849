use faultline_core::Family;
use thiserror::Error;

/// A handler was given an error outside the family it was built for
///
/// This is a wiring defect, never a domain outcome: the dispatch layer logs
/// it and refuses to build a domain response from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("error `{type_name}` should implement `{expected}`")]
    WrongFamily { type_name: &'static str, expected: Family },
}

/// The registrar was given a type that belongs to neither family
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error(
        "error `{type_name}` should implement either `{}` or `{}`",
        Family::Request,
        Family::Connection
    )]
    UnknownFamily { type_name: &'static str },
}

/// Failure to turn a raised error into its terminal outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No handler bound for the concrete type
    #[error("no {family} handler registered for `{type_name}`")]
    Unhandled { type_name: &'static str, family: &'static str },

    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_family_names_type_and_both_families() {
        let err = RegistrationError::UnknownFamily { type_name: "ParseIntError" };
        assert_eq!(
            err.to_string(),
            "error `ParseIntError` should implement either `RequestFailure` or `ConnectionFailure`"
        );
    }

    #[test]
    fn wrong_family_message() {
        let err = ContractViolation::WrongFamily {
            type_name: "UnsupportedDataError",
            expected: Family::Request,
        };
        assert_eq!(err.to_string(), "error `UnsupportedDataError` should implement `RequestFailure`");
    }
}
