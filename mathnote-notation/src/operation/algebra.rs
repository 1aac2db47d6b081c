//! Evaluation, rewriting and solving.

use mathnote_compute::symbolic::{
    self,
    expand::expand as expand_expr,
    factor::factor as factor_expr,
    numeric,
    solve::{linsolve as linsolve_system, set::SolutionSet, solve as solve_relation},
    SymExpr,
};
use mathnote_parser::parser::fmt::Latex;
use rug::Integer;
use std::cmp::Ordering;
use crate::{
    names::SymbolMap,
    pretty::Pretty,
    sanitize::sanitize,
    validate::{parse_dom, parse_eq, parse_expr, parse_var},
};
use super::{
    arg,
    humanize::{humanize, MAX_FINITE, MIN_NONZERO},
    list_arg,
    Args,
    Field,
    OperationError,
    Success,
};

/// Renders a value as LaTeX.
pub(super) fn latex(value: &impl Latex) -> String {
    value.as_display().to_string()
}

/// The value of an evaluated expression.
enum Value {
    /// An exact integer.
    Integer(Integer),

    /// A real number that is not an integer.
    Decimal(f64),

    /// A real number too large or too small to report; it is reported as `oo`, `-oo`, or `0`.
    Approximate(&'static str, &'static str),

    /// Anything else, such as an expression with free symbols or a complex number.
    Symbolic(SymExpr),
}

impl Value {
    fn of(simplified: &SymExpr) -> Self {
        if !simplified.free_symbols().is_empty() {
            return Self::Symbolic(simplified.clone());
        }

        if let Some(sign) = numeric::overflow_sign(simplified) {
            return Self::infinite(sign == Ordering::Less);
        }

        // values beyond the range of `f64` convert to an infinity
        let real = numeric::eval_f64(simplified);
        if let Some(value) = real {
            let magnitude = value.abs();
            if magnitude > MAX_FINITE {
                return Self::infinite(value < 0.0);
            }
            if magnitude > 0.0 && magnitude < MIN_NONZERO {
                return Self::Approximate("0", "0");
            }
        }

        if let Some(n) = numeric::eval_integer(simplified) {
            return Self::Integer(n);
        }
        if let Some(value) = real {
            return Self::Decimal(value);
        }

        // complex values stay exact, unless they were already approximate
        if simplified.post_order_iter().any(SymExpr::is_float) {
            if let Some(approximation) = numeric::evaluate(simplified) {
                return Self::Symbolic(approximation);
            }
        }
        Self::Symbolic(simplified.clone())
    }

    fn infinite(negative: bool) -> Self {
        if negative {
            Self::Approximate("-oo", "-\\infty")
        } else {
            Self::Approximate("oo", "\\infty")
        }
    }

    /// The value as an [`f64`], if it is a real number.
    fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(n.to_f64()),
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    fn pretty(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::Approximate(text, _) => text.to_string(),
            Self::Symbolic(expr) => expr.pretty(),
        }
    }

    fn latex(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::Approximate(_, latex) => latex.to_string(),
            Self::Symbolic(expr) => latex(expr),
        }
    }

    fn is_approximate(&self) -> bool {
        matches!(self, Self::Approximate(..))
    }
}

/// Evaluates an expression, reducing it to a number if it has no free symbols.
pub(super) fn evaluate(args: &Args) -> Result<Success, OperationError> {
    let source = arg(args, "expr")?;
    let expr = parse_expr(source)?;
    let value = Value::of(&symbolic::simplify(&expr));

    let relation = if value.is_approximate() { "\\approx" } else { "=" };
    let mut success = Success::new(
        Some(Field::One(value.pretty())),
        format!("{} {} {}", latex(&expr), relation, value.latex()),
    )
        .with("expr", expr.pretty());
    if let Some(humanized) = value.to_f64().and_then(humanize) {
        success = success.with("humanized_res", humanized);
    }
    Ok(success)
}

/// Simplifies an expression.
pub(super) fn simplify(args: &Args) -> Result<Success, OperationError> {
    let source = arg(args, "expr")?;
    let expr = parse_expr(source)?;
    let simplified = symbolic::simplify(&expr);
    Ok(Success::new(
        Some(Field::One(simplified.pretty())),
        format!("{} = {}", latex(&expr), latex(&simplified)),
    )
        .with("expr", expr.pretty()))
}

/// Expands products and integer powers of sums.
pub(super) fn expand(args: &Args) -> Result<Success, OperationError> {
    let source = arg(args, "expr")?;
    let expr = parse_expr(source)?;
    let expanded = expand_expr(&expr);
    Ok(Success::new(
        Some(Field::One(expanded.pretty())),
        format!("{} = {}", latex(&expr), latex(&expanded)),
    )
        .with("expr", expr.pretty()))
}

/// Factors a polynomial over the rationals.
pub(super) fn factor(args: &Args) -> Result<Success, OperationError> {
    let source = arg(args, "expr")?;
    let expr = parse_expr(source)?;
    let factored = factor_expr(&expr);
    Ok(Success::new(
        Some(Field::One(factored.pretty())),
        format!("{} = {}", latex(&expr), latex(&factored)),
    )
        .with("expr", expr.pretty()))
}

/// The LaTeX of a solution set of `var`.
fn solution_latex(var: &str, set: &SolutionSet) -> String {
    match set {
        SolutionSet::Empty => "\\text{No solution}".to_string(),
        SolutionSet::Reals => format!("{} \\in \\mathbb{{R}}", var),
        SolutionSet::Complexes => format!("{} \\in \\mathbb{{C}}", var),
        SolutionSet::Interval(_) | SolutionSet::Union(_) | SolutionSet::Intersection(_) => {
            format!("{} \\in {}", var, latex(set))
        },
        _ => format!("{} = {}", var, latex(set)),
    }
}

/// Solves an equation or inequality for one variable.
pub(super) fn solve(args: &Args) -> Result<Success, OperationError> {
    let var = parse_var(arg(args, "var")?)?;
    let scope = SymbolMap::with_variables(&[&var]);
    let relation = parse_eq(arg(args, "eq")?, &scope)?;
    let domain = parse_dom(arg(args, "dom")?)?;

    let set = solve_relation(&relation, &var, domain)?;
    Ok(Success::new(Some(Field::Many(set.pretty_many())), solution_latex(&var, &set))
        .with("eq", relation.pretty())
        .with("var", var))
}

/// Solves a system of linear equations.
pub(super) fn linsolve(args: &Args) -> Result<Success, OperationError> {
    let vars = list_arg(args, "vars")?
        .iter()
        .map(|var| parse_var(var))
        .collect::<Result<Vec<_>, _>>()?;
    let scope = SymbolMap::with_variables(&vars);
    let equations = list_arg(args, "eqs")?
        .iter()
        .map(|eq| parse_eq(eq, &scope))
        .collect::<Result<Vec<_>, _>>()?;

    let (answer, latex) = match linsolve_system(&equations, &vars)? {
        Some(values) => {
            let latex = vars.iter()
                .zip(&values)
                .map(|(var, value)| format!("{} = {}", var, latex(value)))
                .collect::<Vec<_>>()
                .join(", ");
            (values.iter().map(Pretty::pretty).collect(), latex)
        },
        None => (vec!["∅".to_string()], "\\text{No solution}".to_string()),
    };

    Ok(Success::new(Some(Field::Many(answer)), latex)
        .with("eqs", equations.iter().map(Pretty::pretty).collect::<Vec<_>>())
        .with("vars", vars))
}

/// Echoes text for a rendering layer to typeset, without parsing or computing anything. The text
/// must still pass the sanitizer.
pub(super) fn display(args: &Args) -> Result<Success, OperationError> {
    let text = sanitize(arg(args, "text")?)?;
    Ok(Success::new(None, text.to_string()).with("text", text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{dispatch, tests::args, Failure, Response};
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use pretty_assertions::assert_eq;

    fn success(op: &str, pairs: &[(&str, &str)]) -> Success {
        match dispatch(op, &args(pairs)) {
            Response::Success(success) => success,
            Response::Failure(failure) => panic!("{} failed: {:?}", op, failure),
        }
    }

    fn failure(op: &str, pairs: &[(&str, &str)]) -> Failure {
        match dispatch(op, &args(pairs)) {
            Response::Success(success) => panic!("{} succeeded: {:?}", op, success),
            Response::Failure(failure) => failure,
        }
    }

    fn answer(success: &Success) -> Field {
        success.answer.clone().unwrap()
    }

    fn one(s: &str) -> Field {
        Field::One(s.to_string())
    }

    fn many(list: &[&str]) -> Field {
        Field::Many(list.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn evaluate_numbers() {
        assert_eq!(answer(&success("evaluate", &[("expr", "2+2")])), one("4"));
        assert_eq!(answer(&success("evaluate", &[("expr", "1.5+0.25")])), one("1.75"));
        assert_eq!(answer(&success("evaluate", &[("expr", "5 mod 3")])), one("2"));
        assert_eq!(answer(&success("evaluate", &[("expr", "x + 1")])), one("x+1"));

        let Field::One(root) = answer(&success("evaluate", &[("expr", "sqrt(2)")])) else {
            panic!("expected a single answer");
        };
        assert_float_relative_eq!(root.parse::<f64>().unwrap(), std::f64::consts::SQRT_2);

        assert_eq!(answer(&success("evaluate", &[("expr", "1e5")])), one("100000"));
        assert_eq!(answer(&success("evaluate", &[("expr", "2.5E-1")])), one("0.25"));
    }

    #[test]
    fn evaluate_complex_values_exactly() {
        assert_eq!(answer(&success("evaluate", &[("expr", "sqrt(-1)")])), one("i"));
        assert_eq!(answer(&success("evaluate", &[("expr", "sqrt(-4)")])), one("2i"));
    }

    #[test]
    fn repeated_decimal_points() {
        let failed = failure("evaluate", &[("expr", "2.5.3")]);
        assert_eq!(failed.kind, "GrammarFailure");
        assert_eq!(failed.message, "2.5.3 is invalid");
    }

    #[test]
    fn evaluate_magnitudes() {
        let big = success("evaluate", &[("expr", "1234567")]);
        assert_eq!(big.pretty.get("humanized_res"), Some(&one("1.23 million")));

        let huge = success("evaluate", &[("expr", "10^40")]);
        assert_eq!(answer(&huge), one("oo"));
        assert!(huge.latex.contains("\\approx"));
        assert_eq!(huge.pretty.get("humanized_res"), None);

        assert_eq!(answer(&success("evaluate", &[("expr", "-10^40")])), one("-oo"));
        assert_eq!(answer(&success("evaluate", &[("expr", "10^-40")])), one("0"));
        assert_eq!(answer(&success("evaluate", &[("expr", "10^400")])), one("oo"));

        // too large for any float, but still reported as an infinity
        let tower = success("evaluate", &[("expr", "10^10^10")]);
        assert_eq!(answer(&tower), one("oo"));
        assert!(tower.latex.ends_with("\\approx \\infty"));
        assert_eq!(answer(&success("evaluate", &[("expr", "-10^10^10")])), one("-oo"));
        assert_eq!(answer(&success("evaluate", &[("expr", "0")])), one("0"));
    }

    #[test]
    fn evaluate_degrees() {
        assert_eq!(answer(&success("evaluate", &[("expr", "sin(90deg)")])), one("1"));
        assert_eq!(answer(&success("evaluate", &[("expr", "2x^2+sin(90deg)")])), one("2x^2+1"));
    }

    #[test]
    fn simplify_and_expand() {
        let simplified = success("simplify", &[("expr", "x + x + x")]);
        assert_eq!(answer(&simplified), one("3x"));
        assert_eq!(simplified.pretty.get("expr"), Some(&one("x+x+x")));

        assert_eq!(answer(&success("expand", &[("expr", "(x+1)^2")])), one("x^2+2x+1"));
        assert_eq!(answer(&success("expand_expression", &[("expr", "x(x-1)")])), one("x^2-x"));
    }

    #[test]
    fn solve_equations() {
        let solved = success("solve", &[("eq", "x^2=4"), ("var", "x"), ("dom", "real")]);
        assert_eq!(answer(&solved), many(&["-2", "2"]));
        assert_eq!(solved.latex, "x = \\left\\{-2, 2\\right\\}");

        let solved = success("solve", &[("eq", "x^2+1=0"), ("var", "x"), ("dom", "real")]);
        assert_eq!(answer(&solved), many(&["∅"]));
        assert_eq!(solved.latex, "\\text{No solution}");

        let solved = success("solve", &[("eq", "x^2+1=0"), ("var", "x"), ("dom", "complex")]);
        assert_eq!(answer(&solved), many(&["-i", "i"]));

        let solved = success("solve_equation", &[("eq", "x^2 <= 4"), ("var", "x"), ("dom", "real")]);
        assert_eq!(answer(&solved), many(&["[-2,2]"]));
        assert!(solved.latex.starts_with("x \\in "));

        let solved = success("solve", &[("eq", "x = x"), ("var", "x"), ("dom", "real")]);
        assert_eq!(solved.latex, "x \\in \\mathbb{R}");
    }

    #[test]
    fn solve_failures() {
        let failed = failure("solve", &[("eq", "x^2"), ("var", "x"), ("dom", "real")]);
        assert_eq!(failed.message, "x^2 is not an equation");
        assert_eq!(failed.kind, "ShapeFailure");

        let failed = failure("solve", &[("eq", "x=1"), ("var", "pi"), ("dom", "real")]);
        assert_eq!(failed.message, "pi is an invalid variable name");

        let failed = failure("solve", &[("eq", "x=1"), ("var", "x"), ("dom", "rational")]);
        assert_eq!(failed.message, "rational is not a valid domain");

        let failed = failure("solve", &[("eq", "x^5 - x + 1 = 0"), ("var", "x"), ("dom", "real")]);
        assert_eq!(failed.kind, "ComputationError");
    }

    #[test]
    fn linear_systems() {
        let mut system = Args::new();
        system.insert("eqs".to_string(), many(&["x + y = 3", "x - y = 1"]));
        system.insert("vars".to_string(), many(&["x", "y"]));
        let Response::Success(solved) = dispatch("linsolve", &system) else {
            panic!("linsolve failed");
        };
        assert_eq!(answer(&solved), many(&["2", "1"]));
        assert_eq!(solved.latex, "x = 2, y = 1");
        assert_eq!(solved.pretty.get("eqs"), Some(&many(&["x+y=3", "x-y=1"])));

        system.insert("eqs".to_string(), many(&["x + y = 1", "x + y = 2"]));
        let Response::Success(solved) = dispatch("solve_linear_system", &system) else {
            panic!("linsolve failed");
        };
        assert_eq!(answer(&solved), many(&["∅"]));
        assert_eq!(solved.latex, "\\text{No solution}");
    }

    #[test]
    fn factoring() {
        let factored = success("factor", &[("expr", "x^2 - 4")]);
        assert_eq!(answer(&factored), one("(x+2)(x-2)"));
        assert_eq!(factored.pretty.get("expr"), Some(&one("x^2-4")));

        assert_eq!(answer(&success("factor_expression", &[("expr", "x^2+2x+1")])), one("(x+1)^2"));
        assert_eq!(answer(&success("factor", &[("expr", "x^2+1")])), one("x^2+1"));
        assert_eq!(failure("factor", &[("expr", "x = 1")]).message, "x = 1 is not an expression");
    }

    #[test]
    fn display_echoes_text() {
        let shown = success("display", &[("text", "1=1")]);
        assert_eq!(shown.answer, None);
        assert_eq!(shown.pretty.get("text"), Some(&one("1=1")));
        assert_eq!(shown.latex, "1=1");

        // text is shown as written, even when it would not parse
        let shown = success("display_text", &[("text", "The answer is 2xy")]);
        assert_eq!(shown.pretty.get("text"), Some(&one("The answer is 2xy")));
        assert_eq!(shown.latex, "The answer is 2xy");

        let refused = failure("display", &[("text", "import(x)")]);
        assert_eq!(refused.kind, "DenylistViolation");
    }
}
