use std::{fmt, ops::Range};
use super::{
    error::{kind, Error},
    expr::Expr,
    fmt::Latex,
    token::{CloseParen, OpenParen},
    Parse,
    Parser,
};
use crate::tokenizer::TokenKind;

/// Parses the closing parenthesis matching `open`. The error is fatal if it is missing: the input
/// either ended too early, or contains something that cannot appear before the closing
/// parenthesis.
pub(crate) fn parse_close_paren(input: &mut Parser, open: &OpenParen) -> Result<CloseParen, Error> {
    if let Ok(close) = input.try_parse::<CloseParen>() {
        return Ok(close);
    }

    input.advance_past_whitespace();
    match input.current_token() {
        None => Err(Error::new_fatal(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true },
        )),
        Some(token) if token.kind.is_relation() => Err(input.error_fatal(kind::NestedRelation)),
        Some(token) => {
            let found = token.kind;
            Err(input.error_fatal(kind::UnexpectedToken {
                expected: &[TokenKind::CloseParen],
                found,
            }))
        },
    }
}

/// Parses an expression inside the parenthesis `open`. Once the opening parenthesis has been
/// consumed there is no other way to interpret the input, so any error is fatal.
pub(crate) fn parse_inner_expr(input: &mut Parser, open: &OpenParen) -> Result<Expr, Error> {
    match input.try_parse::<Expr>() {
        Ok(expr) => Ok(expr),
        Err(err) if err.fatal => Err(err),
        Err(err) if err.downcast_ref::<kind::UnexpectedEof>().is_some() => Err(Error::new_fatal(
            vec![open.span.clone()],
            kind::UnclosedParenthesis { opening: true },
        )),
        Err(mut err) => {
            err.fatal = true;
            Err(err)
        },
    }
}

/// A parenthesized expression. A [`Paren`] can only contain a single expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the innermost expression in the parenthesized expression, consuming the [`Paren`].
    pub fn into_innermost(self) -> Expr {
        let mut inner = self.expr;
        while let Expr::Paren(paren) = *inner {
            inner = paren.expr;
        }
        *inner
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open_paren = input.try_parse::<OpenParen>()?;
        if let Ok(close_paren) = input.clone().try_parse::<CloseParen>() {
            return Err(Error::new_fatal(
                vec![open_paren.span.start..close_paren.span.end],
                kind::EmptyParenthesis,
            ));
        }

        let expr = parse_inner_expr(input, &open_paren)?;
        let close_paren = parse_close_paren(input, &open_paren)?;
        Ok(Self {
            expr: Box::new(expr),
            span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl std::fmt::Display for Paren {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(")?;
        self.expr.fmt(f)?;
        write!(f, ")")
    }
}

impl Latex for Paren {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\left(")?;
        self.expr.fmt_latex(f)?;
        write!(f, "\\right)")
    }
}
