use std::{fmt, ops::Range};
use super::{
    error::{kind, Error},
    expr::Expr,
    fmt::Latex,
    token::op::RelOp,
    Parse,
    Parser,
};

/// A relation between two expressions, such as `x^2 = 4` or `x < 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// The left-hand side of the relation.
    pub lhs: Expr,

    /// The relational operator.
    pub op: RelOp,

    /// The right-hand side of the relation.
    pub rhs: Expr,

    /// The region of the source code that this relation was parsed from.
    pub span: Range<usize>,
}

/// A complete input of the canonical grammar: either a bare expression, or a single relation
/// between two expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A bare expression.
    Expr(Expr),

    /// A relation.
    Relation(Relation),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn span(&self) -> Range<usize> {
        match self {
            Stmt::Expr(expr) => expr.span(),
            Stmt::Relation(relation) => relation.span.clone(),
        }
    }
}

impl Parse for Stmt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = input.try_parse::<Expr>()?;
        let Ok(op) = input.try_parse::<RelOp>() else {
            return Ok(Stmt::Expr(lhs));
        };
        let rhs = input.try_parse::<Expr>()?;

        if let Ok(extra) = input.clone().try_parse::<RelOp>() {
            return Err(Error::new_fatal(vec![extra.span], kind::NestedRelation));
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Stmt::Relation(Relation { lhs, op, rhs, span }))
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => expr.fmt(f),
            Stmt::Relation(relation) => {
                relation.lhs.fmt(f)?;
                relation.op.fmt(f)?;
                relation.rhs.fmt(f)
            },
        }
    }
}

impl Latex for Stmt {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => expr.fmt_latex(f),
            Stmt::Relation(relation) => {
                relation.lhs.fmt_latex(f)?;
                relation.op.fmt_latex(f)?;
                relation.rhs.fmt_latex(f)
            },
        }
    }
}
