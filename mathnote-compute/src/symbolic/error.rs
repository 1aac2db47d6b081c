//! Errors produced by the symbolic engine.
//!
//! Conversion errors point at spans of the source expression. Errors from symbolic operations
//! (differentiation, integration, limits, and solving) carry no spans, and describe the failing
//! expression in their message instead.

use mathnote_attrs::ErrorKind;
use mathnote_error::ErrorKind;

/// A function call names a function that the engine does not know.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = ["this function"],
)]
pub struct UnknownFunction {
    /// The name of the function.
    pub name: String,
}

/// A built-in function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` takes {} argument(s), but {} were given", name, expected, given),
    labels = ["this call"],
)]
pub struct WrongArity {
    /// The name of the function.
    pub name: String,

    /// The accepted number of arguments, such as `1` or `1 or 2`.
    pub expected: String,

    /// The number of arguments given.
    pub given: usize,
}

/// The name of a built-in function was used as a variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is a function, not a variable", name),
    labels = ["this name"],
    help = format!("call it with an argument, as in `{}(x)`", name),
)]
pub struct FunctionAsSymbol {
    pub name: String,
}

/// A numeric literal could not be read.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("`{}` is not a valid number", literal), labels = ["this literal"])]
pub struct InvalidNumber {
    pub literal: String,
}

/// The derivative of an expression could not be computed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("cannot differentiate {}", expr))]
pub struct CannotDifferentiate {
    pub expr: String,
}

/// No antiderivative of an expression could be found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("cannot find the integral of {}", expr))]
pub struct CannotIntegrate {
    pub expr: String,
}

/// The one-sided limits of an expression disagree.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!(
    "the limit does not exist: the limit from the left is {} and the limit from the right is {}",
    left,
    right,
))]
pub struct LimitDoesNotExist {
    pub left: String,
    pub right: String,
}

/// The limit of an expression could not be determined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("cannot compute the limit of {}", expr))]
pub struct CannotComputeLimit {
    pub expr: String,
}

/// An equation or inequality could not be solved.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("cannot solve {} for {}", relation, var))]
pub struct CannotSolve {
    pub relation: String,
    pub var: String,
}

/// An inequality was to be solved over the complex numbers, which are not ordered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "inequalities can only be solved over the real numbers")]
pub struct ComplexInequality;

/// An equation of a linear system is not linear in the unknowns.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not linear in {}", equation, vars))]
pub struct NotLinear {
    pub equation: String,
    pub vars: String,
}

/// A relation was given where a bare expression is expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is a relation, not an expression", expr),
    labels = ["this relation"],
)]
pub struct NotAnExpression {
    pub expr: String,
}
