//! Named operations over flat string arguments.
//!
//! An operation takes a mapping of named arguments, each a string or a list of strings, and
//! produces either a [`Success`] payload or a [`Failure`] payload. The set of operations is
//! closed: see [`Operation`]. Operations are looked up by name with [`dispatch`], which never
//! fails; any error is turned into a failure payload.
//!
//! ```
//! use mathnote_notation::operation::{dispatch, Args, Field, Response};
//!
//! let args = Args::from([
//!     ("expr".to_string(), Field::One("x^2".to_string())),
//!     ("var".to_string(), Field::One("x".to_string())),
//! ]);
//! let Response::Success(success) = dispatch("derive", &args) else {
//!     panic!("derive failed");
//! };
//! assert_eq!(success.answer, Some(Field::One("2x".to_string())));
//! ```

mod algebra;
mod calculus;
pub mod error;
pub mod humanize;

pub use error::OperationError;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// The value of an argument, or of an entry of a response: a string, or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    One(String),
    Many(Vec<String>),
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<Vec<String>> for Field {
    fn from(list: Vec<String>) -> Self {
        Self::Many(list)
    }
}

/// The named arguments of an operation.
pub type Args = BTreeMap<String, Field>;

/// The result of a successful operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Success {
    /// The arguments, and any extra rendering of the result, in compact notation.
    pub pretty: BTreeMap<String, Field>,

    /// The answer in compact notation. Operations that only render their input have none.
    pub answer: Option<Field>,

    /// The computed statement as LaTeX. Omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub latex: String,
}

impl Success {
    pub(crate) fn new(answer: Option<Field>, latex: String) -> Self {
        Self { pretty: BTreeMap::new(), answer, latex }
    }

    /// Adds an entry to the pretty map.
    pub(crate) fn with(mut self, key: &str, value: impl Into<Field>) -> Self {
        self.pretty.insert(key.to_string(), value.into());
        self
    }
}

/// The result of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// The failure class, such as `GrammarFailure` or `TimeoutError`.
    pub kind: String,

    /// The user-facing message.
    pub message: String,
}

impl From<&OperationError> for Failure {
    fn from(err: &OperationError) -> Self {
        Self { kind: err.kind().to_string(), message: err.message() }
    }
}

/// The response to a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success(Success),
    Failure(Failure),
}

impl From<Result<Success, OperationError>> for Response {
    fn from(result: Result<Success, OperationError>) -> Self {
        match result {
            Ok(success) => Self::Success(success),
            Err(err) => Self::Failure(Failure::from(&err)),
        }
    }
}

/// A parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// The name of the argument.
    pub name: &'static str,

    /// Whether the argument may be a list of strings.
    pub list: bool,

    /// Whether the argument may be omitted.
    pub optional: bool,
}

const fn param(name: &'static str) -> Param {
    Param { name, list: false, optional: false }
}

const fn list(name: &'static str) -> Param {
    Param { name, list: true, optional: false }
}

const fn optional(name: &'static str) -> Param {
    Param { name, list: false, optional: true }
}

const EXPR: &[Param] = &[param("expr")];
const DERIVE: &[Param] = &[param("expr"), list("var")];
const INTEGRATE_INDEFINITE: &[Param] = &[param("expr"), param("var")];
const INTEGRATE_DEFINITE: &[Param] = &[param("expr"), param("var"), param("lt"), param("ut")];
const LIMIT: &[Param] = &[param("expr"), param("var"), param("val"), optional("dir")];
const SOLVE: &[Param] = &[param("eq"), param("var"), param("dom")];
const LINSOLVE: &[Param] = &[list("eqs"), list("vars")];
const DISPLAY: &[Param] = &[param("text")];

/// The operations that can be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Evaluate,
    Simplify,
    Expand,
    Factor,
    Derive,
    IntegrateIndefinite,
    IntegrateDefinite,
    Limit,
    Solve,
    Linsolve,
    Display,
}

impl Operation {
    /// Every operation.
    pub const ALL: [Operation; 11] = [
        Self::Evaluate,
        Self::Simplify,
        Self::Expand,
        Self::Factor,
        Self::Derive,
        Self::IntegrateIndefinite,
        Self::IntegrateDefinite,
        Self::Limit,
        Self::Solve,
        Self::Linsolve,
        Self::Display,
    ];

    /// The short name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Evaluate => "evaluate",
            Self::Simplify => "simplify",
            Self::Expand => "expand",
            Self::Factor => "factor",
            Self::Derive => "derive",
            Self::IntegrateIndefinite => "integrate_indefinite",
            Self::IntegrateDefinite => "integrate_definite",
            Self::Limit => "limit",
            Self::Solve => "solve",
            Self::Linsolve => "linsolve",
            Self::Display => "display",
        }
    }

    /// The longer name the operation is also known by.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::Evaluate => "evaluate_expression",
            Self::Simplify => "simplify_expression",
            Self::Expand => "expand_expression",
            Self::Factor => "factor_expression",
            Self::Derive => "derive_expression",
            Self::IntegrateIndefinite => "integrate_indefinite_expression",
            Self::IntegrateDefinite => "integrate_definite_expression",
            Self::Limit => "limit_expression",
            Self::Solve => "solve_equation",
            Self::Linsolve => "solve_linear_system",
            Self::Display => "display_text",
        }
    }

    /// The parameters of the operation, in the order they are usually written.
    pub fn params(self) -> &'static [Param] {
        match self {
            Self::Evaluate | Self::Simplify | Self::Expand | Self::Factor => EXPR,
            Self::Derive => DERIVE,
            Self::IntegrateIndefinite => INTEGRATE_INDEFINITE,
            Self::IntegrateDefinite => INTEGRATE_DEFINITE,
            Self::Limit => LIMIT,
            Self::Solve => SOLVE,
            Self::Linsolve => LINSOLVE,
            Self::Display => DISPLAY,
        }
    }

    /// Runs the operation with the given arguments.
    pub fn run(self, args: &Args) -> Result<Success, OperationError> {
        match self {
            Self::Evaluate => algebra::evaluate(args),
            Self::Simplify => algebra::simplify(args),
            Self::Expand => algebra::expand(args),
            Self::Factor => algebra::factor(args),
            Self::Derive => calculus::derive(args),
            Self::IntegrateIndefinite => calculus::integrate_indefinite(args),
            Self::IntegrateDefinite => calculus::integrate_definite(args),
            Self::Limit => calculus::limit(args),
            Self::Solve => algebra::solve(args),
            Self::Linsolve => algebra::linsolve(args),
            Self::Display => algebra::display(args),
        }
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|op| op.name() == s || op.long_name() == s)
            .ok_or_else(|| OperationError::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runs the operation with the given name. Errors are returned as a [`Failure`] payload.
pub fn dispatch(name: &str, args: &Args) -> Response {
    debug!("dispatching `{}` with {:?}", name, args);
    let result = name.parse::<Operation>().and_then(|op| op.run(args));
    if let Err(err) = &result {
        info!("`{}` failed with {}: {}", name, err.kind(), err);
    }
    Response::from(result)
}

/// Returns the string argument with the given name.
pub(crate) fn arg<'a>(args: &'a Args, name: &'static str) -> Result<&'a str, OperationError> {
    match args.get(name) {
        Some(Field::One(s)) => Ok(s),
        Some(Field::Many(_)) => Err(OperationError::InvalidArgument { name, expected: "a string" }),
        None => Err(OperationError::MissingArgument(name)),
    }
}

/// Returns the optional string argument with the given name.
pub(crate) fn optional_arg<'a>(args: &'a Args, name: &'static str) -> Result<Option<&'a str>, OperationError> {
    match args.get(name) {
        None => Ok(None),
        Some(_) => arg(args, name).map(Some),
    }
}

/// Returns the argument with the given name as a list. A single string is a list of one.
pub(crate) fn list_arg<'a>(args: &'a Args, name: &'static str) -> Result<&'a [String], OperationError> {
    match args.get(name) {
        Some(Field::One(s)) => Ok(std::slice::from_ref(s)),
        Some(Field::Many(list)) if !list.is_empty() => Ok(list),
        Some(Field::Many(_)) => Err(OperationError::InvalidArgument {
            name,
            expected: "a non-empty list of strings",
        }),
        None => Err(OperationError::MissingArgument(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(super) fn args(pairs: &[(&str, &str)]) -> Args {
        pairs.iter()
            .map(|(name, value)| (name.to_string(), Field::One(value.to_string())))
            .collect()
    }

    #[test]
    fn names() {
        assert_eq!("derive".parse::<Operation>().unwrap(), Operation::Derive);
        assert_eq!("solve_linear_system".parse::<Operation>().unwrap(), Operation::Linsolve);
        assert_eq!("display_text".parse::<Operation>().unwrap(), Operation::Display);
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
            assert_eq!(op.long_name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn parameters() {
        let names = |op: Operation| op.params().iter().map(|param| param.name).collect::<Vec<_>>();
        assert_eq!(names(Operation::Factor), vec!["expr"]);
        assert_eq!(names(Operation::IntegrateDefinite), vec!["expr", "var", "lt", "ut"]);

        let [.., dir] = Operation::Limit.params() else {
            panic!("limit has parameters");
        };
        assert_eq!(*dir, Param { name: "dir", list: false, optional: true });
        assert!(Operation::Linsolve.params().iter().all(|param| param.list));
    }

    #[test]
    fn unknown_operation() {
        assert_eq!(dispatch("frobnicate", &Args::new()), Response::Failure(Failure {
            kind: "UnknownOperation".to_string(),
            message: "Unknown operation: frobnicate".to_string(),
        }));
    }

    #[test]
    fn argument_shapes() {
        let response = dispatch("simplify", &Args::new());
        assert_eq!(response, Response::Failure(Failure {
            kind: "InvalidRequest".to_string(),
            message: "Missing argument: expr".to_string(),
        }));

        let mut bad = Args::new();
        bad.insert("expr".to_string(), Field::Many(vec!["x".to_string()]));
        let Response::Failure(failure) = dispatch("simplify", &bad) else {
            panic!("expected a failure");
        };
        assert_eq!(failure.message, "Argument expr must be a string");
    }

    #[test]
    fn parse_failures_carry_their_category() {
        let Response::Failure(failure) = dispatch("simplify", &args(&[("expr", "import(x)")])) else {
            panic!("expected a failure");
        };
        assert_eq!(failure, Failure {
            kind: "DenylistViolation".to_string(),
            message: "import(x) is invalid".to_string(),
        });
    }

    #[test]
    fn serialization() {
        let response = dispatch("derive", &args(&[("expr", "x^2"), ("var", "x")]));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["answer"], "2x");
        assert_eq!(json["pretty"]["expr"], "x^2");
        assert_eq!(json["pretty"]["var"], "x");
        assert_eq!(json["latex"], "\\frac{d}{dx}\\left(x^{2}\\right) = 2 x");

        let response = dispatch("display", &args(&[("text", "x^2")]));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["answer"].is_null());

        let failure = dispatch("evaluate", &args(&[("expr", "(1")]));
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json, serde_json::json!({
            "kind": "GrammarFailure",
            "message": "(1 is probably missing a closing bracket",
        }));
    }

    #[test]
    fn fields_deserialize_untagged() {
        let args: Args = serde_json::from_str(r#"{"eqs": ["x + y = 2", "x - y = 0"], "vars": "x"}"#).unwrap();
        assert_eq!(args["vars"], Field::One("x".to_string()));
        assert_eq!(args["eqs"], Field::Many(vec!["x + y = 2".to_string(), "x - y = 0".to_string()]));
    }
}
