//! Informal math notation for mathnote.
//!
//! Users type math the way they would write it on paper: `2x^2 + 3x`, `sin x cos x`,
//! `5 mod 2`, `90deg`. This crate turns such input into the canonical syntax understood by
//! [`mathnote_compute`], and turns the engine's output back into the same compact notation.
//!
//! Input goes through three stages, each its own module:
//!
//! 1. [`sanitize`] rejects input that is unsafe or uses unsupported syntax, without modifying it.
//! 2. [`normalize`] rewrites informal notation into canonical syntax: implicit multiplication,
//!    implicit function application, symbol substitutions, and so on.
//! 3. [`parse`] hands the canonical string to the engine and translates its errors into the
//!    [error catalog](error) shown to users.
//!
//! On top of these, [`validate`] parses the typed arguments of an operation (expressions,
//! equations, variables, bounds), [`pretty`] renders results, and [`operation`] runs named
//! operations over string arguments.
//!
//! ```
//! use mathnote_notation::{names::SymbolMap, parse::parse, pretty::Pretty};
//!
//! let stmt = parse("x + x", &SymbolMap::new(), true).unwrap();
//! assert_eq!(stmt.pretty(), "2x");
//! ```

pub mod error;
pub mod names;
pub mod normalize;
pub mod operation;
pub mod parse;
pub mod pretty;
pub mod sanitize;
pub mod validate;

pub use error::{Category, ParsingError};
pub use operation::{dispatch, Args, Field, Operation, OperationError, Response};
