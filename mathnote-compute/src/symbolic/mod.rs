//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`SymExpr`] nodes. It's
//! similar to the [`mathnote_parser::parser::expr::Expr`] nodes produced by [`mathnote_parser`],
//! with the main difference being that [`SymExpr`] nodes **flatten** out the tree structure.
//!
//! For example, the expression `x + (y + z)` would be represented internally as a single
//! [`SymExpr::Add`] node with _three_ children, `x`, `y`, and `z`, where as the
//! [`mathnote_parser::parser::expr::Expr`] node would have two children, `x` and `(y + z)`.
//!
//! This is done to make it easier to perform algebraic manipulations on the expression. A common
//! step in simplifying an expression is to combine "like terms", that is, to combine terms that
//! share the same factors (e.g. `x + x = 2x`). This is much easier to do when the terms in
//! question are all at the same level in the tree.
//!
//! Source text is turned into a [`SymExpr`] with [`parse_expr`], or into a [`Statement`] (an
//! expression or a relation) with [`parse_statement`]. Parsing is unevaluated: `1 = 1` stays the
//! relation "1 equals 1", and `2 + 2` stays a sum of two terms.
//!
//! ```
//! use mathnote_compute::symbolic::{expr::SymExpr, parse_expr};
//!
//! let expr = parse_expr("x + (y + z)").unwrap();
//! assert_eq!(expr, SymExpr::Add(vec![
//!     SymExpr::symbol("x"),
//!     SymExpr::symbol("y"),
//!     SymExpr::symbol("z"),
//! ]));
//! ```
//!
//! # Simplification
//!
//! A primary use case for algebraic manipulation is to reduce expressions to some canonical form.
//! This is done with the [`simplify()`] function, which accepts an expression and returns a
//! "simplified" version of it.
//!
//! Simplification is done by applying a set of simplification rules to the expression in multiple
//! passes. Each rule is simply a function that accepts an expression and returns
//! [`Option<SymExpr>`]; if the rule is applicable to the expression, the rule is applied and the
//! result is returned.
//!
//! ```
//! use mathnote_compute::symbolic::{parse_expr, simplify};
//!
//! let simplified = simplify(&parse_expr("x + x + x").unwrap());
//! assert_eq!(simplified.to_string(), "3*x");
//! ```
//!
//! For more information, see the [`mod@simplify`] module.
//!
//! # Operations
//!
//! Built on top of simplification are [expansion](expand), [factoring](factor),
//! [differentiation](derivative), [integration](integral), [limits](limit), and
//! [equation solving](solve).

pub mod derivative;
pub mod error;
pub mod expand;
pub mod expr;
pub mod factor;
pub mod integral;
pub mod limit;
pub mod numeric;
pub mod poly;
pub mod relation;
pub mod simplify;
pub mod solve;
pub mod step_collector;

pub use expr::SymExpr;
pub use relation::{RelKind, Relation, Statement};
pub use simplify::{simplify, simplify_statement, simplify_with, simplify_with_steps};
pub use step_collector::StepCollector;

use error::NotAnExpression;
use log::debug;
use mathnote_error::Error;
use mathnote_parser::parser::{relation::Stmt, Parser};

/// Parses a statement (an expression or a relation) in the canonical grammar, without evaluating
/// it.
pub fn parse_statement(source: &str) -> Result<Statement, Error> {
    let stmt = Parser::new(source)
        .try_parse_full::<Stmt>()
        .map_err(Error::from)?;
    let stmt = expr::to_statement(&stmt)?;
    debug!("parsed `{}` as `{}`", source, stmt);
    Ok(stmt)
}

/// Parses an expression in the canonical grammar, without evaluating it. Returns an error if the
/// source is a relation.
pub fn parse_expr(source: &str) -> Result<SymExpr, Error> {
    match parse_statement(source)? {
        Statement::Expr(expr) => Ok(expr),
        _ => Err(Error::new(vec![0..source.len()], NotAnExpression {
            expr: source.to_string(),
        })),
    }
}

/// Parses a statement and simplifies it. Relations between numbers are decided, so `1 = 1`
/// becomes [`Statement::Bool`].
pub fn parse_evaluated(source: &str) -> Result<Statement, Error> {
    parse_statement(source).map(|stmt| simplify_statement(&stmt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relation_is_not_an_expression() {
        let err = parse_expr("x = 1").unwrap_err();
        assert_eq!(err.downcast_ref::<NotAnExpression>(), Some(&NotAnExpression {
            expr: "x = 1".to_string(),
        }));
    }

    #[test]
    fn unevaluated_and_evaluated() {
        assert_eq!(parse_statement("1 = 1").unwrap().to_string(), "Eq(1, 1)");
        assert_eq!(parse_evaluated("1 = 1").unwrap(), Statement::Bool(true));
        assert_eq!(parse_evaluated("2*x + 3*x").unwrap().to_string(), "5*x");
    }

    #[test]
    fn syntax_errors_carry_spans() {
        let err = parse_statement("(1 + 2").unwrap_err();
        assert!(!err.spans.is_empty());
    }
}
