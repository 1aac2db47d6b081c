pub mod binary;
pub mod call;
pub mod error;
pub mod expr;
pub mod fmt;
pub mod literal;
pub mod paren;
pub mod relation;
pub mod token;
pub mod unary;

use error::{Error, kind};
use mathnote_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token};
use std::ops::Range;

/// Attempts to parse a value from the given stream of tokens, using multiple parsing functions
/// in order. The first function that succeeds is used to parse the value.
///
/// This macro can also catch fatal errors and immediately short-circuit the parsing process.
///
/// If parsing is successful, the value is returned from the enclosing function. Otherwise, the
/// error of the last attempted parsing function is the value of the macro.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($($expr:expr),+ $(,)?) => {{
        $(
            match $expr {
                Ok(value) => return Ok(value),
                Err(err) if err.fatal => return Err(err),
                // ignore this error and try the next parser, or return it
                err => err,
            }
        )+
    }};
}

/// A high-level parser for the canonical grammar. This is the type to use to parse an arbitrary
/// piece of input into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next non-whitespace token without moving the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Moves the cursor past any whitespace tokens.
    pub fn advance_past_whitespace(&mut self) {
        while let Some(token) = self.current_token() {
            if !token.is_whitespace() {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the position of the given parser, which must be parsing the same
    /// source.
    pub fn set_cursor(&mut self, other: &Parser<'source>) {
        self.cursor = other.cursor;
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. This function can be used in the [`Parse::parse`]
    /// implementation of a type with the given [`Parser`], as it will automatically backtrack the
    /// cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser (trailing whitespace is allowed); if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        self.advance_past_whitespace();
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`. For unary
    /// operations, this means `a op op` is evaluated as `(a op) op` (the operators appear to the
    /// right of the operand).
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`), division (`/`), and modulo (`%`), which separate
    /// factors.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`^` or `**`).
    Exp,

    /// Precedence of factorial (`!`) and double factorial (`!!`).
    Factorial,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use binary::Binary;
    use call::Call;
    use error::kind::{EmptyParenthesis, NestedRelation, UnclosedParenthesis};
    use expr::Expr;
    use literal::{Literal, LitFloat, LitInt, LitSym};
    use paren::Paren;
    use relation::{Relation, Stmt};
    use token::op::{BinOp, BinOpKind, RelOp, RelOpKind, UnaryOp, UnaryOpKind};
    use unary::Unary;

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value: value.to_string(), span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn binary_left_associativity() {
        let mut parser = Parser::new("3 - 2 - 1");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("3", 0..1)),
                op: BinOp { kind: BinOpKind::Sub, span: 2..3 },
                rhs: Box::new(int("2", 4..5)),
                span: 0..5,
            })),
            op: BinOp { kind: BinOpKind::Sub, span: 6..7 },
            rhs: Box::new(int("1", 8..9)),
            span: 0..9,
        }));
    }

    #[test]
    fn binary_right_associativity() {
        let mut parser = Parser::new("2^3^4");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(int("2", 0..1)),
            op: BinOp { kind: BinOpKind::Exp, span: 1..2 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("3", 2..3)),
                op: BinOp { kind: BinOpKind::Exp, span: 3..4 },
                rhs: Box::new(int("4", 4..5)),
                span: 2..5,
            })),
            span: 0..5,
        }));
    }

    #[test]
    fn binary_precedence() {
        let mut parser = Parser::new("1 + 2 * 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(int("1", 0..1)),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("2", 4..5)),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(int("3", 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn unary_neg_binds_looser_than_exp() {
        let mut parser = Parser::new("-x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 1..2)),
                op: BinOp { kind: BinOpKind::Exp, span: 2..3 },
                rhs: Box::new(int("2", 3..4)),
                span: 1..4,
            })),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn factorials() {
        let mut parser = Parser::new("5!!");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(int("5", 0..1)),
            op: UnaryOp { kind: UnaryOpKind::DoubleFactorial, span: 1..3 },
            span: 0..3,
        }));
    }

    #[test]
    fn call_with_arguments() {
        let mut parser = Parser::new("log(x, 2)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "log".to_string(), span: 0..3 },
            args: vec![sym("x", 4..5), int("2", 7..8)],
            span: 0..9,
            paren_span: 3..9,
        }));
    }

    #[test]
    fn call_without_arguments() {
        let mut parser = Parser::new("f()");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "f".to_string(), span: 0..1 },
            args: vec![],
            span: 0..3,
            paren_span: 1..3,
        }));
    }

    #[test]
    fn parenthesized() {
        let mut parser = Parser::new("(x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Paren(Paren {
            expr: Box::new(sym("x", 1..2)),
            span: 0..3,
        }));
    }

    #[test]
    fn relation() {
        let mut parser = Parser::new("x = 1");
        let stmt = parser.try_parse_full::<Stmt>().unwrap();

        assert_eq!(stmt, Stmt::Relation(Relation {
            lhs: sym("x", 0..1),
            op: RelOp { kind: RelOpKind::Eq, span: 2..3 },
            rhs: int("1", 4..5),
            span: 0..5,
        }));
    }

    #[test]
    fn bare_statement() {
        let mut parser = Parser::new("x ");
        let stmt = parser.try_parse_full::<Stmt>().unwrap();

        assert_eq!(stmt, Stmt::Expr(sym("x", 0..1)));
    }

    #[test]
    fn unclosed_paren() {
        let mut parser = Parser::new("sin(x + 1");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert!(err.fatal);
        assert_eq!(err.spans, vec![3..4]);
        assert_eq!(err.downcast_ref::<UnclosedParenthesis>(), Some(&UnclosedParenthesis { opening: true }));
    }

    #[test]
    fn unopened_paren() {
        let mut parser = Parser::new(")");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.downcast_ref::<UnclosedParenthesis>(), Some(&UnclosedParenthesis { opening: false }));
    }

    #[test]
    fn empty_paren() {
        let mut parser = Parser::new("2*()");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.downcast_ref::<EmptyParenthesis>(), Some(&EmptyParenthesis));
    }

    #[test]
    fn chained_relation() {
        let mut parser = Parser::new("x = y = z");
        let err = parser.try_parse_full::<Stmt>().unwrap_err();

        assert_eq!(err.downcast_ref::<NestedRelation>(), Some(&NestedRelation));
        assert_eq!(err.spans, vec![6..7]);
    }

    #[test]
    fn relation_inside_paren() {
        let mut parser = Parser::new("(x = 1)");
        let err = parser.try_parse_full::<Stmt>().unwrap_err();

        assert_eq!(err.downcast_ref::<NestedRelation>(), Some(&NestedRelation));
    }

    #[test]
    fn implicit_multiplication_is_rejected() {
        let mut parser = Parser::new("2 x");
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn dot_is_rejected() {
        let source = "2.x";
        let mut parser = Parser::new(source);
        let err = parser.try_parse_full::<Expr>().unwrap_err();

        assert_eq!(&source[err.spans[0].clone()], ".");
    }
}
