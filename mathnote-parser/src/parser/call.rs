use std::{fmt, ops::Range};
use super::{
    error::Error,
    expr::Expr,
    fmt::{Latex, fmt_pow},
    literal::LitSym,
    paren::{parse_close_paren, parse_inner_expr},
    token::{CloseParen, Comma, OpenParen},
    Parse,
    Parser,
};

/// A function call, such as `func(x, -40)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns a set of two spans, where the first is the span of the function name (with the
    /// opening parenthesis) and the second is the span of the closing parenthesis.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [
            self.name.span.start..self.paren_span.start + 1,
            self.paren_span.end - 1..self.paren_span.end,
        ]
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open_paren = input.try_parse::<OpenParen>()?;

        let mut args = Vec::new();
        let close_paren = match input.try_parse::<CloseParen>() {
            Ok(close_paren) => close_paren,
            Err(_) => {
                loop {
                    args.push(parse_inner_expr(input, &open_paren)?);
                    if input.try_parse::<Comma>().is_err() {
                        break;
                    }
                }
                parse_close_paren(input, &open_paren)?
            },
        };

        // use `name` here before it is moved into the struct
        let span = name.span.start..close_paren.span.end;
        Ok(Self {
            name,
            args,
            span,
            paren_span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(f)?;
        write!(f, "(")?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                arg.fmt(f)?;
                write!(f, ", ")?;
            }
            last.fmt(f)?;
        }
        write!(f, ")")
    }
}

impl Latex for Call {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        enum SpecialFunc {
            Pow,
            Root,
            Cbrt,
            Sqrt,
            Abs,
            Other,
        }

        impl SpecialFunc {
            /// Write the name of the function.
            fn name(&self, f: &mut fmt::Formatter, call: &Call) -> fmt::Result {
                match self {
                    Self::Pow | Self::Abs => Ok(()),
                    Self::Root | Self::Sqrt => write!(f, "\\sqrt"),
                    Self::Cbrt => write!(f, "\\sqrt[3]"),
                    Self::Other => call.name.fmt_latex(f),
                }
            }

            /// Write the tokens surrounding the arguments, and delegate the arguments to `inner_args`.
            fn outer_args(&self, f: &mut fmt::Formatter, call: &Call) -> fmt::Result {
                match self {
                    Self::Pow => self.inner_args(f, call),
                    Self::Root => {
                        self.inner_args(f, call)?;
                        write!(f, "}}")
                    },
                    Self::Cbrt | Self::Sqrt => {
                        write!(f, "{{")?;
                        self.inner_args(f, call)?;
                        write!(f, "}}")
                    },
                    Self::Abs => {
                        write!(f, "\\left|")?;
                        self.inner_args(f, call)?;
                        write!(f, "\\right|")
                    },
                    Self::Other => {
                        write!(f, "\\left(")?;
                        self.inner_args(f, call)?;
                        write!(f, "\\right)")
                    },
                }
            }

            fn inner_args(&self, f: &mut fmt::Formatter, call: &Call) -> fmt::Result {
                match self {
                    Self::Pow => fmt_pow(f, call.args.first(), call.args.get(1))?,
                    Self::Root => {
                        if let Some(arg1) = call.args.get(1) {
                            write!(f, "[{}]", arg1.as_display())?;
                        }
                        write!(f, "{{")?;
                        if let Some(arg0) = call.args.first() {
                            arg0.fmt_latex(f)?;
                        }
                    },
                    Self::Cbrt | Self::Sqrt | Self::Abs | Self::Other => {
                        if let Some((last, args)) = call.args.split_last() {
                            for arg in args {
                                arg.fmt_latex(f)?;
                                write!(f, ", ")?;
                            }
                            last.fmt_latex(f)?;
                        }
                    },
                }

                Ok(())
            }
        }

        let func = match self.name.name.as_str() {
            "pow" => SpecialFunc::Pow,
            "root" => SpecialFunc::Root,
            "cbrt" => SpecialFunc::Cbrt,
            "sqrt" => SpecialFunc::Sqrt,
            "abs" => SpecialFunc::Abs,
            _ => SpecialFunc::Other,
        };

        func.name(f, self)?;
        func.outer_args(f, self)
    }
}
