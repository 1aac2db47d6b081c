//! Relations between two expressions, and complete statements.

use mathnote_parser::parser::{fmt::Latex, token::op::RelOpKind};
use std::fmt::{self, Display, Formatter};
use super::expr::SymExpr;

/// The kind of relation between two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelKind {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelKind {
    /// Returns the relation obtained by swapping both sides, such that `a < b` becomes `b > a`.
    pub fn reversed(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            other => other,
        }
    }

    /// Returns true if this is one of the ordering relations `<`, `<=`, `>`, `>=`.
    pub fn is_inequality(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    /// Returns true if the relation holds for a difference `lhs - rhs` with the given sign.
    pub fn holds_for_sign(self, sign: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Eq => sign == Equal,
            Self::Ne => sign != Equal,
            Self::Lt => sign == Less,
            Self::Le => sign != Greater,
            Self::Gt => sign == Greater,
            Self::Ge => sign != Less,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    fn latex_symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "\\neq",
            Self::Lt => "<",
            Self::Le => "\\leq",
            Self::Gt => ">",
            Self::Ge => "\\geq",
        }
    }
}

impl From<RelOpKind> for RelKind {
    fn from(kind: RelOpKind) -> Self {
        match kind {
            RelOpKind::Eq => Self::Eq,
            RelOpKind::NotEq => Self::Ne,
            RelOpKind::Less => Self::Lt,
            RelOpKind::LessEq => Self::Le,
            RelOpKind::Greater => Self::Gt,
            RelOpKind::GreaterEq => Self::Ge,
        }
    }
}

/// A relation between two expressions, such as `x^2 = 4` or `x < 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub lhs: SymExpr,
    pub kind: RelKind,
    pub rhs: SymExpr,
}

impl Relation {
    pub fn new(lhs: SymExpr, kind: RelKind, rhs: SymExpr) -> Self {
        Self { lhs, kind, rhs }
    }

    /// Returns the expression `lhs - rhs`, which is zero exactly where an equation holds. No
    /// simplification is done.
    pub fn difference(&self) -> SymExpr {
        self.lhs.clone() - self.rhs.clone()
    }
}

/// Relations print as `Eq(lhs, rhs)` and `Ne(lhs, rhs)`; ordering relations print infix.
impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            RelKind::Eq => write!(f, "Eq({}, {})", self.lhs, self.rhs),
            RelKind::Ne => write!(f, "Ne({}, {})", self.lhs, self.rhs),
            kind => write!(f, "{} {} {}", self.lhs, kind.symbol(), self.rhs),
        }
    }
}

impl Latex for Relation {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        self.lhs.fmt_latex(f)?;
        write!(f, " {} ", self.kind.latex_symbol())?;
        self.rhs.fmt_latex(f)
    }
}

/// A complete statement: a bare expression, a relation, or the truth value a relation between
/// two numbers evaluated to.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expr(SymExpr),
    Relation(Relation),
    Bool(bool),
}

impl Statement {
    /// Returns the contained expression, if this is a bare expression.
    pub fn as_expr(&self) -> Option<&SymExpr> {
        match self {
            Self::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Returns the contained relation, if this is a relation.
    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    /// Returns true if the statement is a single symbol.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Expr(expr) if expr.as_symbol().is_some())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{}", expr),
            Self::Relation(relation) => write!(f, "{}", relation),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
        }
    }
}

impl Latex for Statement {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Expr(expr) => expr.fmt_latex(f),
            Self::Relation(relation) => relation.fmt_latex(f),
            Self::Bool(value) => write!(f, "\\text{{{}}}", if *value { "True" } else { "False" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display() {
        let x = SymExpr::symbol("x");
        let eq = Relation::new(SymExpr::pow(x.clone(), SymExpr::int(2)), RelKind::Eq, SymExpr::int(4));
        assert_eq!(eq.to_string(), "Eq(x**2, 4)");

        let lt = Relation::new(x.clone(), RelKind::Le, SymExpr::int(1));
        assert_eq!(lt.to_string(), "x <= 1");
        assert_eq!(lt.as_display().to_string(), "x \\leq 1");
    }

    #[test]
    fn sign_tests() {
        use std::cmp::Ordering;
        assert!(RelKind::Le.holds_for_sign(Ordering::Equal));
        assert!(!RelKind::Lt.holds_for_sign(Ordering::Equal));
        assert_eq!(RelKind::Lt.reversed(), RelKind::Gt);
    }
}
