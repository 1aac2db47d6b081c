use std::fmt;
use crate::error::ParsingError;

/// An error produced while running an [`Operation`](super::Operation).
///
/// Every error has a [`kind`](OperationError::kind), which clients use to tell failure classes
/// apart, and a user-facing [`message`](OperationError::message).
#[derive(Debug)]
pub enum OperationError {
    /// An argument could not be parsed or validated.
    Parsing(ParsingError),

    /// The engine failed to compute the result, for example because an integral has no closed
    /// form.
    Computation(mathnote_error::Error),

    /// No operation has the requested name.
    UnknownOperation(String),

    /// A required argument was not given.
    MissingArgument(&'static str),

    /// An argument has the wrong shape, such as a list where a string was expected.
    InvalidArgument {
        name: &'static str,
        expected: &'static str,
    },

    /// The request itself could not be read.
    InvalidRequest(String),

    /// The operation did not finish in time.
    Timeout,

    /// Too many earlier operations ran out of time and are still running, so no new operation is
    /// started.
    Overloaded(usize),

    /// The operation panicked.
    Internal(String),
}

impl OperationError {
    /// The failure class of this error, as reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parsing(err) => err.category.name(),
            Self::Computation(_) => "ComputationError",
            Self::UnknownOperation(_) => "UnknownOperation",
            Self::MissingArgument(_) | Self::InvalidArgument { .. } | Self::InvalidRequest(_) => {
                "InvalidRequest"
            },
            Self::Timeout => "TimeoutError",
            Self::Overloaded(_) => "OverloadedError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// The user-facing message of this error.
    pub fn message(&self) -> String {
        match self {
            Self::Parsing(err) => err.message(),
            Self::Computation(err) => err.message(),
            Self::UnknownOperation(op) => format!("Unknown operation: {}", op),
            Self::MissingArgument(name) => format!("Missing argument: {}", name),
            Self::InvalidArgument { name, expected } => {
                format!("Argument {} must be {}", name, expected)
            },
            Self::InvalidRequest(message) => message.clone(),
            Self::Timeout => "Exceeded time limit".to_string(),
            Self::Overloaded(stalled) => {
                format!("{} earlier requests are still running, try again later", stalled)
            },
            Self::Internal(message) => format!("Internal error: {}", message),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OperationError {}

impl From<ParsingError> for OperationError {
    fn from(err: ParsingError) -> Self {
        Self::Parsing(err)
    }
}

impl From<mathnote_error::Error> for OperationError {
    fn from(err: mathnote_error::Error) -> Self {
        Self::Computation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Category, InvertedBounds};
    use pretty_assertions::assert_eq;

    #[test]
    fn kinds_and_messages() {
        let err = OperationError::UnknownOperation("frobnicate".to_string());
        assert_eq!((err.kind(), err.message()), ("UnknownOperation", "Unknown operation: frobnicate".to_string()));

        let err = OperationError::Timeout;
        assert_eq!((err.kind(), err.to_string()), ("TimeoutError", "Exceeded time limit".to_string()));

        let err = OperationError::from(ParsingError::new(Category::DomainFailure, "", vec![], InvertedBounds));
        assert_eq!(err.kind(), "DomainFailure");
        assert_eq!(err.message(), "Upper bound is smaller than lower bound");

        assert_eq!(OperationError::MissingArgument("expr").kind(), "InvalidRequest");

        let err = OperationError::Overloaded(4);
        assert_eq!((err.kind(), err.message()), (
            "OverloadedError",
            "4 earlier requests are still running, try again later".to_string(),
        ));
    }
}
