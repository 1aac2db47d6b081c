use std::{fmt, ops::Range};
use super::{
    error::Error,
    fmt::Latex,
    token::{Float, Int, Name},
    Parse,
    Parser,
};

/// An integer literal. The digits are kept as written, so that arbitrarily large integers can be
/// represented exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct LitInt {
    /// The digits of the integer literal.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Int>()?;
        Ok(Self {
            value: token.lexeme,
            span: token.span,
        })
    }
}

/// A decimal literal, such as `3.14` or `.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct LitFloat {
    /// The literal as written.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitFloat {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Float>()?;
        Ok(Self {
            value: token.lexeme,
            span: token.span,
        })
    }
}

/// A symbol / identifier literal. Symbols are used to represent variables and functions.
#[derive(Debug, Clone, PartialEq)]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.try_parse::<Name>()?;
        Ok(Self {
            name: token.lexeme,
            span: token.span,
        })
    }
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Latex for LitSym {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name.as_str() {
            "pi" => write!(f, "\\pi"),
            "oo" => write!(f, "\\infty"),
            name if name.chars().count() == 1 => write!(f, "{}", name),
            name => write!(f, "\\mathrm{{{}}}", name),
        }
    }
}

/// Represents a literal value.
///
/// A literal is any value that can is written directly into the source code.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// An integer literal.
    Integer(LitInt),

    /// A decimal literal.
    Float(LitFloat),

    /// A symbol / identifier literal. Symbols are used to represent variables and functions.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(num) => num.span.clone(),
            Literal::Float(num) => num.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.try_parse::<LitInt>().map(Literal::Integer)
            .or_else(|_| input.try_parse::<LitFloat>().map(Literal::Float))
            .or_else(|_| input.try_parse::<LitSym>().map(Literal::Symbol))
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(num) => write!(f, "{}", num.value),
            Literal::Float(num) => write!(f, "{}", num.value),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}

impl Latex for Literal {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(_) | Literal::Float(_) => write!(f, "{}", self),
            Literal::Symbol(sym) => sym.fmt_latex(f),
        }
    }
}
