//! The catalog of user-facing notation errors.
//!
//! The message of every error kind in this module is shown to users verbatim, so the exact text
//! is part of the interface: clients match on it. Each kind belongs to one [`Category`], which is
//! reported alongside the message.

use mathnote_attrs::ErrorKind;
use mathnote_error::{Error, ErrorKind};
use serde::Serialize;
use std::{fmt, ops::Range};

/// The category of a [`ParsingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// A forbidden character or identifier was found during sanitization.
    DenylistViolation,

    /// An alternate notation with a known replacement was used, such as `|x|` for `abs(x)`.
    UnsupportedSyntax,

    /// The normalized input does not parse.
    GrammarFailure,

    /// A function was called with the wrong number of arguments.
    ArityFailure,

    /// The input parsed, but into the wrong kind of value, such as a relation where an expression
    /// was required.
    ShapeFailure,

    /// A value is outside the accepted set: a reserved variable name, an unknown domain or
    /// direction, or inverted bounds.
    DomainFailure,
}

impl Category {
    /// The name of the category, as reported to clients.
    pub fn name(self) -> &'static str {
        match self {
            Self::DenylistViolation => "DenylistViolation",
            Self::UnsupportedSyntax => "UnsupportedSyntax",
            Self::GrammarFailure => "GrammarFailure",
            Self::ArityFailure => "ArityFailure",
            Self::ShapeFailure => "ShapeFailure",
            Self::DomainFailure => "DomainFailure",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An error produced while turning user input into a typed value.
///
/// The spans of the inner [`Error`] point into [`ParsingError::input`], which is the text the
/// failing stage looked at. For sanitizer errors this is the raw input; for errors reported by the
/// engine's parser it is the normalized input.
#[derive(Debug)]
pub struct ParsingError {
    /// The category of the error.
    pub category: Category,

    /// The error itself, carrying the catalog message.
    pub error: Error,

    /// The text that the spans of the error point into.
    pub input: String,
}

impl ParsingError {
    /// Creates a new error with the given category and kind.
    pub fn new(
        category: Category,
        input: impl Into<String>,
        spans: Vec<Range<usize>>,
        kind: impl ErrorKind + 'static,
    ) -> Self {
        Self {
            category,
            error: Error::new(spans, kind),
            input: input.into(),
        }
    }

    /// The exact, user-facing message of this error.
    pub fn message(&self) -> String {
        self.error.message()
    }

    /// Returns the concrete error kind if it is of type `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.error.downcast_ref::<T>()
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParsingError {}

/// A character that is never accepted.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is an invalid character", character), labels = ["this character"])]
pub struct InvalidCharacter {
    pub character: char,
}

/// Input that cannot be accepted, either because it contains a denylisted word or because it does
/// not parse.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is invalid", input), labels = ["here"])]
pub struct InvalidInput {
    pub input: String,
}

/// A backslash, which usually means LaTeX input.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "Please do not use \\ and note latex input is not accepted",
    labels = ["this backslash"],
)]
pub struct LatexInput;

/// Three or more consecutive factorial signs.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "Only one (!) and double (!!) factorial are allowed", labels = ["here"])]
pub struct TripleFactorial;

/// An alternate notation with a known replacement.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("Please use {} instead of {}", right, wrong),
    labels = [format!("replace this with {}", right)],
)]
pub struct AlternateSyntax {
    /// The notation to use instead.
    pub right: String,

    /// The notation that was used.
    pub wrong: String,
}

/// An opening bracket without a matching closing bracket.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{} is probably missing a closing bracket", input),
    labels = ["this bracket is not closed"],
)]
pub struct MissingClosingBracket {
    pub input: String,
}

/// A function of one argument was called with a different number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{}() requires 1 argument", name), labels = ["this call"])]
pub struct RequiresOneArgument {
    pub name: String,
}

/// `log` was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "log() requires 2 arguments\n\
        log(n, b) returns the logarithm of n to base b\n\
        e.g. log(10, 2) computes the logarithm of 10 to base 2\n\
        the default base is the natural base, e",
    labels = ["this call"],
)]
pub struct LogArity;

/// `root` was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "root() requires 2 arguments\n\
        root(n, k) returns the kth root of n\n\
        e.g. root(8, 3) computes the cube root of 8",
    labels = ["this call"],
)]
pub struct RootArity;

/// `mod` was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "mod() requires 2 arguments\n\
        mod(n, k) returns the remainder when n is divided by k\n\
        e.g. mod(5, 2) computes 5 mod 2",
    labels = ["this call"],
)]
pub struct ModArity;

/// A relation was given where an expression is required.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not an expression", input), labels = ["this relation"])]
pub struct NotAnExpression {
    pub input: String,
}

/// A name that cannot be used as a variable. The message stays the same for every name; the help
/// text says what is wrong with this one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{} is an invalid variable name", name),
    labels = ["this name"],
    help = reason,
)]
pub struct InvalidVariable {
    pub name: String,

    /// Why the name was rejected.
    pub reason: &'static str,
}

/// An expression was given where a relation is required.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not an equation", input), labels = ["this expression"])]
pub struct NotAnEquation {
    pub input: String,
}

/// A relation to be graphed mentions neither `x` nor `y`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "Relation must contain x or y or both")]
pub struct RelationWithoutXY;

/// The parameter of a function written as `f(t) = ...` is not the requested variable.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "The variable in your function does not match the variable you have specified: {} != {}",
        declared,
        requested,
    ),
    labels = ["this parameter"],
)]
pub struct FunctionVariableMismatch {
    /// The parameter written in the function.
    pub declared: String,

    /// The variable that was requested.
    pub requested: String,
}

/// Input that is neither a function definition nor an expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not a function", input))]
pub struct NotAFunction {
    pub input: String,
}

/// Input that is not a pair of bounds.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not a limit", input))]
pub struct NotALimit {
    pub input: String,
}

/// The upper bound of a range is smaller than its lower bound.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "Upper bound is smaller than lower bound")]
pub struct InvertedBounds;

/// A domain other than `real` or `complex`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not a valid domain", input))]
pub struct InvalidDomain {
    pub input: String,
}

/// A direction other than `+`, `-`, or `+-`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("{} is not a valid direction", input))]
pub struct InvalidDirection {
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne::Source;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_messages() {
        assert_eq!(InvalidCharacter { character: '_' }.message(), "_ is an invalid character");
        assert_eq!(
            AlternateSyntax { right: "abs(x)".to_string(), wrong: "|x|".to_string() }.message(),
            "Please use abs(x) instead of |x|",
        );
        assert_eq!(
            LatexInput.message(),
            "Please do not use \\ and note latex input is not accepted",
        );
        assert_eq!(
            FunctionVariableMismatch {
                declared: "y".to_string(),
                requested: "x".to_string(),
            }.message(),
            "The variable in your function does not match the variable you have specified: y != x",
        );
    }

    #[test]
    fn guidance_spans_several_lines() {
        assert_eq!(RootArity.message(), [
            "root() requires 2 arguments",
            "root(n, k) returns the kth root of n",
            "e.g. root(8, 3) computes the cube root of 8",
        ].join("\n"));
        assert_eq!(LogArity.message().lines().count(), 4);
        assert!(LogArity.message().ends_with("the default base is the natural base, e"));
        assert_eq!(ModArity.message().lines().next(), Some("mod() requires 2 arguments"));
    }

    #[test]
    fn parsing_error_report() {
        let err = ParsingError::new(
            Category::DenylistViolation,
            "2_2",
            vec![1..2],
            InvalidCharacter { character: '_' },
        );
        assert_eq!(err.to_string(), "_ is an invalid character");
        assert_eq!(err.category.name(), "DenylistViolation");

        let mut buf = Vec::new();
        err.error.build_report("input")
            .write(("input", Source::from(&err.input)), &mut buf)
            .unwrap();
        let rendered = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(rendered.contains("this character"));
    }
}
