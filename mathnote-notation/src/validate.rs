//! Semantic validators: converters from user input to typed values.
//!
//! Each validator runs the input through the [parse adapter](crate::parse) where needed, then
//! checks that the result has the expected shape, returning a [`ParsingError`] from the catalog
//! otherwise.

use mathnote_compute::{
    funcs,
    symbolic::{limit::Direction, numeric, simplify, solve::Domain, Relation, Statement, SymExpr},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use crate::{
    error::{
        Category,
        FunctionVariableMismatch,
        InvalidDirection,
        InvalidDomain,
        InvalidVariable,
        InvertedBounds,
        NotAFunction,
        NotALimit,
        NotAnEquation,
        NotAnExpression,
        ParsingError,
        RelationWithoutXY,
    },
    names::SymbolMap,
    parse::parse,
    sanitize::sanitize,
};

/// A function definition `name(var) = body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub name: String,
    pub var: String,
    pub body: SymExpr,
}

/// A pair of bounds, with `lower <= upper` whenever both can be compared numerically.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub lower: SymExpr,
    pub upper: SymExpr,
}

/// Names that cannot be used as variables, compared case-insensitively.
const RESERVED_VARIABLES: [&str; 5] = ["i", "pi", "deg", "e", "oo"];

/// `name(param) = body`.
static FUNCTION_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)\((\w+)\)\s*=\s*(.+)").expect("function definition pattern is valid")
});

fn whole(input: &str) -> Vec<std::ops::Range<usize>> {
    vec![0..input.len()]
}

/// Parses a bare expression. Relations are rejected.
pub fn parse_expr(s: &str) -> Result<SymExpr, ParsingError> {
    parse_expr_with(s, &SymbolMap::new())
}

/// Like [`parse_expr`], with extra names in scope.
pub fn parse_expr_with(s: &str, scope: &SymbolMap) -> Result<SymExpr, ParsingError> {
    let not_an_expression = || ParsingError::new(
        Category::ShapeFailure,
        s,
        whole(s),
        NotAnExpression { input: s.to_string() },
    );

    if s.contains('=') {
        return Err(not_an_expression());
    }
    match parse(s, scope, false)? {
        Statement::Expr(expr) => Ok(expr),
        _ => Err(not_an_expression()),
    }
}

/// Parses a relation, such as an equation `x^2 = 4` or an inequality `x < 1`.
pub fn parse_eq(s: &str, scope: &SymbolMap) -> Result<Relation, ParsingError> {
    match parse(s, scope, false)? {
        Statement::Relation(relation) => Ok(relation),
        _ => Err(ParsingError::new(
            Category::ShapeFailure,
            s,
            whole(s),
            NotAnEquation { input: s.to_string() },
        )),
    }
}

/// Parses a relation in `x` and `y`, such as one to be graphed.
pub fn parse_rel(s: &str) -> Result<Relation, ParsingError> {
    if !s.contains(['x', 'y']) {
        return Err(ParsingError::new(Category::ShapeFailure, s, whole(s), RelationWithoutXY));
    }
    parse_eq(s, &SymbolMap::new())
}

/// Parses the name of a variable.
///
/// A variable is a non-empty run of letters that is not the name of a constant, a function, or
/// the `deg` unit.
pub fn parse_var(s: &str) -> Result<String, ParsingError> {
    let name = sanitize(s.trim())?;
    let reason = if name.is_empty() {
        Some("a variable name cannot be empty")
    } else if !name.chars().all(char::is_alphabetic) {
        Some("variable names may only contain letters")
    } else if RESERVED_VARIABLES.contains(&name.to_lowercase().as_str()) {
        Some("this name is reserved for a constant or unit")
    } else if funcs::is_builtin(name) {
        Some("this name is reserved for a built-in function")
    } else {
        None
    };

    match reason {
        None => Ok(name.to_string()),
        Some(reason) => Err(ParsingError::new(
            Category::DomainFailure,
            s,
            whole(s),
            InvalidVariable { name: s.to_string(), reason },
        )),
    }
}

/// Parses a function of `var`, written either as a definition `g(var) = body` or as a bare
/// expression, which is named `f`.
pub fn parse_func(s: &str, var: &str) -> Result<Func, ParsingError> {
    let scope = SymbolMap::with_variables(&[var]);

    let Some(captures) = FUNCTION_DEFINITION.captures(s) else {
        return match parse_expr_with(s, &scope) {
            Ok(body) => Ok(Func { name: "f".to_string(), var: var.to_string(), body }),
            Err(err) if err.category == Category::ShapeFailure => Err(ParsingError::new(
                Category::ShapeFailure,
                s,
                whole(s),
                NotAFunction { input: s.to_string() },
            )),
            Err(err) => Err(err),
        };
    };

    let name = captures[1].trim();
    if name.is_empty() || !name.chars().all(char::is_alphabetic) {
        return Err(ParsingError::new(
            Category::ShapeFailure,
            s,
            whole(s),
            NotAFunction { input: s.to_string() },
        ));
    }

    let param = &captures[2];
    if param != var {
        let span = captures.get(2).map(|m| m.range()).unwrap_or(0..s.len());
        return Err(ParsingError::new(
            Category::DomainFailure,
            s,
            vec![span],
            FunctionVariableMismatch { declared: param.to_string(), requested: var.to_string() },
        ));
    }

    let body = parse_expr_with(&captures[3], &scope)?;
    Ok(Func { name: name.to_string(), var: var.to_string(), body })
}

/// The value of a bound as an [`f64`], with infinities mapped to the infinite floats.
fn bound_value(bound: &SymExpr) -> Option<f64> {
    if bound.is_infinity() {
        Some(f64::INFINITY)
    } else if bound.is_neg_infinity() {
        Some(f64::NEG_INFINITY)
    } else {
        numeric::eval_f64(bound)
    }
}

/// Returns an error if `upper` is numerically smaller than `lower`. Bounds that cannot be
/// evaluated are accepted.
pub fn check_bounds(lower: &SymExpr, upper: &SymExpr) -> Result<(), ParsingError> {
    let inverted = bound_value(lower)
        .zip(bound_value(upper))
        .and_then(|(lower, upper)| upper.partial_cmp(&lower))
        == Some(Ordering::Less);
    if inverted {
        Err(ParsingError::new(Category::DomainFailure, "", vec![], InvertedBounds))
    } else {
        Ok(())
    }
}

/// Parses a pair of bounds, such as `(0, 1)`, `[0, 1]`, or `0, oo`.
pub fn parse_lim(s: &str) -> Result<Limit, ParsingError> {
    let not_a_limit = || ParsingError::new(
        Category::ShapeFailure,
        s,
        whole(s),
        NotALimit { input: s.to_string() },
    );

    if !s.contains(',') {
        return Err(not_a_limit());
    }
    let stripped = s.replace(['(', ')', '[', ']'], "");
    let halves = stripped.split(',').collect::<Vec<_>>();
    let [lower, upper] = halves[..] else {
        return Err(not_a_limit());
    };

    let lower = simplify(&parse_expr(lower.trim())?);
    let upper = simplify(&parse_expr(upper.trim())?);
    check_bounds(&lower, &upper)?;
    Ok(Limit { lower, upper })
}

/// Parses a domain, `real` or `complex`, case-insensitively.
pub fn parse_dom(s: &str) -> Result<Domain, ParsingError> {
    match s.trim().to_lowercase().as_str() {
        "real" => Ok(Domain::Reals),
        "complex" => Ok(Domain::Complexes),
        _ => Err(ParsingError::new(
            Category::DomainFailure,
            s,
            whole(s),
            InvalidDomain { input: s.to_string() },
        )),
    }
}

/// Parses the direction of a limit: `+`, `-`, or `+-`.
pub fn parse_dir(s: &str) -> Result<Direction, ParsingError> {
    Direction::from_symbol(s).ok_or_else(|| ParsingError::new(
        Category::DomainFailure,
        s,
        whole(s),
        InvalidDirection { input: s.to_string() },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathnote_compute::symbolic::RelKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn expressions() {
        assert_eq!(parse_expr("2x").unwrap().to_string(), "2*x");
        assert_eq!(parse_expr("2x").unwrap(), parse_expr("2*x").unwrap());
        assert_eq!(parse_expr("xyz").unwrap(), parse_expr("x*y*z").unwrap());
        assert_eq!(parse_expr("x = 1").unwrap_err().message(), "x = 1 is not an expression");
        assert_eq!(parse_expr("x >= 1").unwrap_err().message(), "x >= 1 is not an expression");
        assert_eq!(parse_expr("x < 1").unwrap_err().category, Category::ShapeFailure);
    }

    #[test]
    fn equations() {
        let scope = SymbolMap::new();
        let relation = parse_eq("x^2 = 4", &scope).unwrap();
        assert_eq!(relation.kind, RelKind::Eq);
        assert_eq!(relation.to_string(), "Eq(x**2, 4)");
        assert_eq!(parse_eq("1 = 1", &scope).unwrap().to_string(), "Eq(1, 1)");
        assert_eq!(parse_eq("x^2", &scope).unwrap_err().message(), "x^2 is not an equation");
    }

    #[test]
    fn relations() {
        assert_eq!(parse_rel("y > x^2").unwrap().kind, RelKind::Gt);
        assert_eq!(parse_rel("a = b").unwrap_err().message(), "Relation must contain x or y or both");
    }

    #[test]
    fn variables() {
        assert_eq!(parse_var("x").unwrap(), "x");
        assert_eq!(parse_var(" theta ").unwrap(), "theta");
        for invalid in ["", "12", "i", "PI", "Deg", "E", "x1", "sin"] {
            assert_eq!(
                parse_var(invalid).unwrap_err().message(),
                format!("{} is an invalid variable name", invalid),
            );
        }
        assert_eq!(parse_var("exec").unwrap_err().message(), "exec is invalid");
    }

    #[test]
    fn rejected_variables_say_why() {
        let reason = |name: &str| {
            let err = parse_var(name).unwrap_err();
            err.downcast_ref::<InvalidVariable>().map(|invalid| invalid.reason)
        };
        assert_eq!(reason("x1"), Some("variable names may only contain letters"));
        assert_eq!(reason("oo"), Some("this name is reserved for a constant or unit"));
        assert_eq!(reason("sin"), Some("this name is reserved for a built-in function"));
        assert_eq!(reason(" "), Some("a variable name cannot be empty"));

        let err = parse_var("x1").unwrap_err();
        let mut buf = Vec::new();
        err.error.build_report("input")
            .write(("input", ariadne::Source::from(&err.input)), &mut buf)
            .unwrap();
        let rendered = String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap();
        assert!(rendered.contains("x1 is an invalid variable name"));
        assert!(rendered.contains("variable names may only contain letters"));
    }

    #[test]
    fn functions() {
        let func = parse_func("g(t) = t^2 + 1", "t").unwrap();
        assert_eq!(func.name, "g");
        assert_eq!(func.var, "t");
        assert_eq!(func.body.to_string(), "t**2 + 1");

        let func = parse_func("2x", "x").unwrap();
        assert_eq!(func.name, "f");
        assert_eq!(func.body.to_string(), "2*x");

        assert_eq!(
            parse_func("f(y) = y^2", "x").unwrap_err().message(),
            "The variable in your function does not match the variable you have specified: y != x",
        );
        assert_eq!(parse_func("x + 1 = 2", "x").unwrap_err().message(), "x + 1 = 2 is not a function");
    }

    #[test]
    fn function_variable_is_in_scope() {
        let func = parse_func("f(time) = 2time", "time").unwrap();
        assert_eq!(func.body.to_string(), "2*time");
    }

    #[test]
    fn limits() {
        let lim = parse_lim("(0, 1)").unwrap();
        assert_eq!((lim.lower.to_string(), lim.upper.to_string()), ("0".to_string(), "1".to_string()));

        let lim = parse_lim("[-oo, oo]").unwrap();
        assert!(lim.lower.is_neg_infinity() && lim.upper.is_infinity());

        assert!(parse_lim("0, pi").is_ok());
        assert_eq!(parse_lim("0").unwrap_err().message(), "0 is not a limit");
        assert_eq!(parse_lim("0, 1, 2").unwrap_err().message(), "0, 1, 2 is not a limit");
        assert_eq!(parse_lim("(1, 0)").unwrap_err().message(), "Upper bound is smaller than lower bound");
        assert_eq!(parse_lim("1,0").unwrap_err().message(), "Upper bound is smaller than lower bound");

        // brackets of either kind are ignored
        let lim = parse_lim("[0,1)").unwrap();
        assert_eq!((lim.lower.to_string(), lim.upper.to_string()), ("0".to_string(), "1".to_string()));
        assert_eq!(parse_lim("(oo, 0)").unwrap_err().category, Category::DomainFailure);
        assert!(parse_lim("(a, b)").is_ok());
    }

    #[test]
    fn domains_and_directions() {
        assert_eq!(parse_dom("Real").unwrap(), Domain::Reals);
        assert_eq!(parse_dom("COMPLEX").unwrap(), Domain::Complexes);
        assert_eq!(parse_dom("integer").unwrap_err().message(), "integer is not a valid domain");

        assert_eq!(parse_dir("+").unwrap(), Direction::Right);
        assert_eq!(parse_dir("-").unwrap(), Direction::Left);
        assert_eq!(parse_dir("+-").unwrap(), Direction::Both);
        assert_eq!(parse_dir("left").unwrap_err().message(), "left is not a valid direction");
    }
}
