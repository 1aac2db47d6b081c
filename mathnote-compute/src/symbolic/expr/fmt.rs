//! Canonical string and LaTeX rendering of [`SymExpr`].
//!
//! The canonical string uses `**` for powers, `Mod(a, b)` for the modulo operation, and writes
//! products with negative powers as fractions, such as `x/2` or `3*x/(y*z)`.

use mathnote_parser::parser::fmt::Latex;
use rug::Float;
use std::fmt::{self, Display, Formatter};
use super::{Number, Primary, SymExpr};

/// Binding strength of an expression when printed, used to decide where parentheses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Strength {
    Add,
    Mul,
    Pow,
    Atom,
}

/// Formats a [`Float`] with 15 significant digits, trimming trailing zeros. Integral values keep
/// a trailing `.0` so that they remain recognizable as decimals.
pub fn format_float(f: &Float) -> String {
    let value = f.to_f64();
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "oo".to_string() } else { "-oo".to_string() };
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    let rounded = format!("{:.14e}", value).parse::<f64>().unwrap_or(value);
    let magnitude = rounded.abs();
    if !(1e-5..1e16).contains(&magnitude) {
        format!("{:e}", rounded)
    } else if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Splits a product into its numeric coefficient, the factors of the numerator, and the factors
/// of the denominator (with their exponents negated).
fn split_fraction(factors: &[SymExpr]) -> (Number, Vec<SymExpr>, Vec<SymExpr>) {
    let mut coeff = Number::one();
    let mut numer = Vec::new();
    let mut denom = Vec::new();

    for factor in factors {
        if let Some(n) = factor.as_number() {
            coeff = coeff.mul(n);
            continue;
        }

        if let SymExpr::Exp(base, exp) = factor {
            if let Some(n) = exp.as_number().filter(|n| n.is_negative()) {
                let positive = n.neg();
                if positive.is_one() {
                    denom.push((**base).clone());
                } else {
                    denom.push(SymExpr::pow((**base).clone(), positive.into_expr()));
                }
                continue;
            }
        }

        numer.push(factor.clone());
    }

    (coeff, numer, denom)
}

impl SymExpr {
    fn strength(&self) -> Strength {
        match self {
            Self::Primary(Primary::Integer(n)) if n.cmp0().is_lt() => Strength::Add,
            Self::Primary(Primary::Rational(r)) => {
                if r.cmp0().is_lt() { Strength::Add } else { Strength::Mul }
            },
            Self::Primary(Primary::Float(f)) if f.is_sign_negative() => Strength::Add,
            Self::Primary(_) => Strength::Atom,
            Self::Add(terms) if terms.len() == 1 => terms[0].strength(),
            Self::Add(_) => Strength::Add,
            Self::Mul(factors) => {
                if self.is_negated() {
                    Strength::Add
                } else if factors.len() == 1 {
                    factors[0].strength()
                } else {
                    Strength::Mul
                }
            },
            Self::Exp(base, exp) => {
                if base.is_symbol("E") || is_half(exp) {
                    Strength::Atom
                } else if exp.as_number().is_some_and(|n| n.is_negative()) {
                    Strength::Mul
                } else {
                    Strength::Pow
                }
            },
        }
    }
}

/// Returns true if the expression is the rational number `1/2`.
fn is_half(expr: &SymExpr) -> bool {
    matches!(expr, SymExpr::Primary(Primary::Rational(r)) if *r.numer() == 1 && *r.denom() == 2)
}

/// Writes `expr`, wrapped in parentheses if it binds weaker than `min`.
fn write_with_parens(f: &mut Formatter, expr: &SymExpr, min: Strength) -> fmt::Result {
    if expr.strength() < min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Returns true for an unevaluated product whose numbers are positive integers written after
/// another factor, such as `x*2*y` or `9*8`. These products are printed in the order they were
/// written.
fn keeps_written_order(factors: &[SymExpr]) -> bool {
    let positions = factors.iter()
        .enumerate()
        .filter(|(_, factor)| factor.is_number())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    if matches!(positions.as_slice(), [] | [0]) {
        return false;
    }
    positions.iter().all(|&i| factors[i].as_integer().is_some_and(|n| n.cmp0().is_gt()))
        && !factors.iter().any(|factor| matches!(
            factor,
            SymExpr::Exp(_, exp) if exp.as_number().is_some_and(|n| n.is_negative())
        ))
}

/// Writes a product of factors joined by `*`.
fn write_product(f: &mut Formatter, factors: &[SymExpr]) -> fmt::Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            write!(f, "*")?;
        }
        write_with_parens(f, factor, Strength::Mul)?;
    }
    Ok(())
}

impl Display for Primary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Float(n) => write!(f, "{}", format_float(n)),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
        }
    }
}

impl Display for SymExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        write!(f, "{}", term)?;
                    } else if term.is_negated() {
                        write!(f, " - {}", -term.clone())?;
                    } else {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) if keeps_written_order(factors) => write_product(f, factors),
            Self::Mul(factors) => {
                let (coeff, numer, denom) = split_fraction(factors);
                if coeff.is_negative() {
                    write!(f, "-")?;
                }
                let coeff = coeff.abs();

                let (coeff_numer, coeff_denom) = match &coeff {
                    Number::Exact(r) => (
                        SymExpr::int(r.numer().clone()),
                        SymExpr::int(r.denom().clone()),
                    ),
                    Number::Float(_) => (coeff.clone().into_expr(), SymExpr::one()),
                };

                let mut top = Vec::new();
                if !coeff_numer.is_one() || numer.is_empty() {
                    top.push(coeff_numer);
                }
                top.extend(numer);

                let mut bottom = Vec::new();
                if !coeff_denom.is_one() {
                    bottom.push(coeff_denom);
                }
                bottom.extend(denom);

                write_product(f, &top)?;
                match bottom.len() {
                    0 => Ok(()),
                    1 => {
                        write!(f, "/")?;
                        write_with_parens(f, &bottom[0], Strength::Pow)
                    },
                    _ => {
                        write!(f, "/(")?;
                        write_product(f, &bottom)?;
                        write!(f, ")")
                    },
                }
            },
            Self::Exp(base, exp) => {
                if base.is_symbol("E") {
                    return write!(f, "exp({})", exp);
                }
                if is_half(exp) {
                    return write!(f, "sqrt({})", base);
                }
                if exp.is_neg_one() {
                    write!(f, "1/")?;
                    return write_with_parens(f, base, Strength::Pow);
                }
                if let SymExpr::Primary(Primary::Rational(r)) = &**exp {
                    if *r.numer() == -1 && *r.denom() == 2 {
                        return write!(f, "1/sqrt({})", base);
                    }
                }

                write_with_parens(f, base, Strength::Atom)?;
                write!(f, "**")?;
                write_with_parens(f, exp, Strength::Atom)
            },
        }
    }
}

/// Returns the LaTeX command for a function name, if the function has one.
fn latex_function_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "sin" => "\\sin",
        "cos" => "\\cos",
        "tan" => "\\tan",
        "cot" => "\\cot",
        "sec" => "\\sec",
        "csc" => "\\csc",
        "asin" => "\\operatorname{asin}",
        "acos" => "\\operatorname{acos}",
        "atan" => "\\operatorname{atan}",
        "sinh" => "\\sinh",
        "cosh" => "\\cosh",
        "tanh" => "\\tanh",
        "log" => "\\log",
        "exp" => "\\exp",
        _ => return None,
    })
}

/// Formats a symbol name as LaTeX.
fn latex_symbol(name: &str) -> String {
    const GREEK: [&str; 24] = [
        "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
        "lambda", "mu", "nu", "xi", "omicron", "rho", "sigma", "tau", "upsilon", "phi", "chi",
        "psi", "omega", "Delta",
    ];

    match name {
        "pi" => "\\pi".to_string(),
        "E" => "e".to_string(),
        "I" => "i".to_string(),
        "oo" => "\\infty".to_string(),
        "zoo" => "\\tilde{\\infty}".to_string(),
        "nan" => "\\text{NaN}".to_string(),
        _ if GREEK.contains(&name) => format!("\\{}", name),
        _ => name.strip_prefix('_').unwrap_or(name).to_string(),
    }
}

/// Writes `expr` as LaTeX, wrapped in `\left( \right)` if it binds weaker than `min`.
fn latex_with_parens(f: &mut Formatter, expr: &SymExpr, min: Strength) -> fmt::Result {
    if expr.strength() < min {
        write!(f, "\\left(")?;
        expr.fmt_latex(f)?;
        write!(f, "\\right)")
    } else {
        expr.fmt_latex(f)
    }
}

fn latex_product(f: &mut Formatter, factors: &[SymExpr]) -> fmt::Result {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        latex_with_parens(f, factor, Strength::Mul)?;
    }
    Ok(())
}

impl Latex for SymExpr {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Primary(Primary::Integer(n)) => write!(f, "{}", n),
            Self::Primary(Primary::Rational(r)) => {
                if r.cmp0().is_lt() {
                    write!(f, "- ")?;
                }
                write!(f, "\\frac{{{}}}{{{}}}", r.numer().clone().abs(), r.denom())
            },
            Self::Primary(Primary::Float(n)) => write!(f, "{}", format_float(n)),
            Self::Primary(Primary::Symbol(name)) => write!(f, "{}", latex_symbol(name)),
            Self::Primary(Primary::Call(name, args)) => match (name.as_str(), args.as_slice()) {
                ("abs", [arg]) => {
                    write!(f, "\\left|")?;
                    arg.fmt_latex(f)?;
                    write!(f, "\\right|")
                },
                ("Mod", [lhs, rhs]) => {
                    latex_with_parens(f, lhs, Strength::Pow)?;
                    write!(f, " \\bmod ")?;
                    latex_with_parens(f, rhs, Strength::Pow)
                },
                ("factorial", [arg]) => {
                    latex_with_parens(f, arg, Strength::Atom)?;
                    write!(f, "!")
                },
                ("factorial2", [arg]) => {
                    latex_with_parens(f, arg, Strength::Atom)?;
                    write!(f, "!!")
                },
                _ => {
                    match latex_function_name(name) {
                        Some(command) => write!(f, "{}", command)?,
                        None => write!(f, "\\operatorname{{{}}}", name)?,
                    }
                    write!(f, "\\left(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        arg.fmt_latex(f)?;
                    }
                    write!(f, "\\right)")
                },
            },
            Self::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        term.fmt_latex(f)?;
                    } else if term.is_negated() {
                        write!(f, " - ")?;
                        (-term.clone()).fmt_latex(f)?;
                    } else {
                        write!(f, " + ")?;
                        term.fmt_latex(f)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let (coeff, numer, denom) = split_fraction(factors);
                if coeff.is_negative() {
                    write!(f, "- ")?;
                }
                let coeff = coeff.abs();

                let (coeff_numer, coeff_denom) = match &coeff {
                    Number::Exact(r) => (
                        SymExpr::int(r.numer().clone()),
                        SymExpr::int(r.denom().clone()),
                    ),
                    Number::Float(_) => (coeff.clone().into_expr(), SymExpr::one()),
                };

                let mut top = Vec::new();
                if !coeff_numer.is_one() || numer.is_empty() {
                    top.push(coeff_numer);
                }
                top.extend(numer);

                let mut bottom = Vec::new();
                if !coeff_denom.is_one() {
                    bottom.push(coeff_denom);
                }
                bottom.extend(denom);

                if bottom.is_empty() {
                    latex_product(f, &top)
                } else {
                    write!(f, "\\frac{{")?;
                    latex_product(f, &top)?;
                    write!(f, "}}{{")?;
                    latex_product(f, &bottom)?;
                    write!(f, "}}")
                }
            },
            Self::Exp(base, exp) => {
                if base.is_symbol("E") {
                    write!(f, "e^{{")?;
                    exp.fmt_latex(f)?;
                    return write!(f, "}}");
                }
                if let Some(r) = exp.as_rational() {
                    if *r.numer() == 1 && *r.denom() > 1 {
                        if *r.denom() == 2 {
                            write!(f, "\\sqrt{{")?;
                        } else {
                            write!(f, "\\sqrt[{}]{{", r.denom())?;
                        }
                        base.fmt_latex(f)?;
                        return write!(f, "}}");
                    }
                    if r.cmp0().is_lt() {
                        write!(f, "\\frac{{1}}{{")?;
                        SymExpr::pow((**base).clone(), SymExpr::rational(-r)).downgrade_power().fmt_latex(f)?;
                        return write!(f, "}}");
                    }
                }

                latex_with_parens(f, base, Strength::Atom)?;
                write!(f, "^{{")?;
                exp.fmt_latex(f)?;
                write!(f, "}}")
            },
        }
    }
}

impl SymExpr {
    /// Rewrites `base^1` as `base`. Used while printing reciprocals.
    fn downgrade_power(self) -> Self {
        match self {
            Self::Exp(base, exp) if exp.is_one() => *base,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{float, rat};
    use pretty_assertions::assert_eq;

    fn x() -> SymExpr {
        SymExpr::symbol("x")
    }

    #[test]
    fn sums_with_negative_terms() {
        let expr = SymExpr::Add(vec![
            SymExpr::pow(x(), SymExpr::int(2)),
            SymExpr::Mul(vec![SymExpr::int(-2), x()]),
            SymExpr::int(-1),
        ]);
        assert_eq!(expr.to_string(), "x**2 - 2*x - 1");
    }

    #[test]
    fn fractions() {
        let half_x = SymExpr::Mul(vec![SymExpr::rational(rat(1, 2)), x()]);
        assert_eq!(half_x.to_string(), "x/2");

        let expr = SymExpr::Mul(vec![
            SymExpr::rational(rat(-3, 2)),
            x(),
            SymExpr::pow(SymExpr::symbol("y"), SymExpr::neg_one()),
        ]);
        assert_eq!(expr.to_string(), "-3*x/(2*y)");

        let recip = SymExpr::pow(x(), SymExpr::neg_one());
        assert_eq!(recip.to_string(), "1/x");
    }

    #[test]
    fn powers_and_roots() {
        let sqrt = SymExpr::Mul(vec![
            SymExpr::rational(rat(1, 2)),
            SymExpr::int(2).sqrt(),
        ]);
        assert_eq!(sqrt.to_string(), "sqrt(2)/2");

        let exp = SymExpr::pow(SymExpr::e(), x());
        assert_eq!(exp.to_string(), "exp(x)");

        let nested = SymExpr::pow(x() + SymExpr::one(), SymExpr::rational(rat(1, 3)));
        assert_eq!(nested.to_string(), "(x + 1)**(1/3)");

        let negative = SymExpr::pow(x(), SymExpr::int(-2));
        assert_eq!(negative.to_string(), "x**(-2)");
    }

    #[test]
    fn negation() {
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!((-(x() + SymExpr::one())).to_string(), "-(x + 1)");
    }

    #[test]
    fn written_order_of_unevaluated_products() {
        let y = SymExpr::symbol("y");
        let expr = SymExpr::Mul(vec![x(), SymExpr::int(2), y.clone()]);
        assert_eq!(expr.to_string(), "x*2*y");

        let expr = SymExpr::Mul(vec![SymExpr::int(2), x(), y]);
        assert_eq!(expr.to_string(), "2*x*y");

        let expr = SymExpr::Mul(vec![SymExpr::int(9), SymExpr::int(8)]);
        assert_eq!(expr.to_string(), "9*8");
    }

    #[test]
    fn floats() {
        assert_eq!(format_float(&float(2.5)), "2.5");
        assert_eq!(format_float(&float(3)), "3.0");
        assert_eq!(format_float(&(float(1) / float(3))), "0.333333333333333");
    }

    #[test]
    fn latex() {
        let expr = SymExpr::Mul(vec![SymExpr::int(2), x()]);
        assert_eq!(expr.as_display().to_string(), "2 x");

        let frac = SymExpr::Mul(vec![
            SymExpr::call("sin", vec![x()]),
            SymExpr::pow(x(), SymExpr::neg_one()),
        ]);
        assert_eq!(frac.as_display().to_string(), "\\frac{\\sin\\left(x\\right)}{x}");

        let root = SymExpr::pow(x(), SymExpr::rational(rat(1, 3)));
        assert_eq!(root.as_display().to_string(), "\\sqrt[3]{x}");
    }
}
