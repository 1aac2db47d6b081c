//! Derivatives, integrals and limits.

use mathnote_compute::symbolic::{
    derivative::derive_many,
    integral::{integrate, integrate_definite as integrate_between},
    limit::{limit as limit_at, Direction},
    simplify,
    SymExpr,
};
use crate::{
    names::SymbolMap,
    pretty::Pretty,
    validate::{check_bounds, parse_dir, parse_expr, parse_expr_with, parse_var},
};
use super::{algebra::latex, arg, list_arg, optional_arg, Args, Field, OperationError, Success};

/// Parses the function to operate on, with the given variables in scope.
fn parse_function<S: AsRef<str>>(args: &Args, vars: &[S]) -> Result<SymExpr, OperationError> {
    Ok(parse_expr_with(arg(args, "expr")?, &SymbolMap::with_variables(vars))?)
}

/// Parses a point or a bound, such as `0`, `pi/2` or `-oo`.
fn parse_point(args: &Args, name: &'static str) -> Result<SymExpr, OperationError> {
    Ok(simplify(&parse_expr(arg(args, name)?)?))
}

/// Differentiates an expression with respect to one or more variables, in order.
pub(super) fn derive(args: &Args) -> Result<Success, OperationError> {
    let vars = list_arg(args, "var")?
        .iter()
        .map(|var| parse_var(var))
        .collect::<Result<Vec<_>, _>>()?;
    let f = parse_function(args, vars.as_slice())?;
    let derivative = derive_many(&f, &vars)?;

    let operators = vars.iter()
        .rev()
        .map(|var| format!("\\frac{{d}}{{d{}}}", var))
        .collect::<String>();
    let var = match args.get("var") {
        Some(Field::Many(_)) => Field::Many(vars),
        _ => Field::One(vars.concat()),
    };

    Ok(Success::new(
        Some(Field::One(derivative.pretty())),
        format!("{}\\left({}\\right) = {}", operators, latex(&f), latex(&derivative)),
    )
        .with("expr", f.pretty())
        .with("var", var))
}

/// Finds an antiderivative of an expression.
pub(super) fn integrate_indefinite(args: &Args) -> Result<Success, OperationError> {
    let var = parse_var(arg(args, "var")?)?;
    let f = parse_function(args, &[&var])?;
    let antiderivative = integrate(&f, &var)?;

    Ok(Success::new(
        Some(Field::One(antiderivative.pretty())),
        format!(
            "\\int \\left({}\\right) \\, d{} = {} + C",
            latex(&f),
            var,
            latex(&antiderivative),
        ),
    )
        .with("expr", f.pretty())
        .with("var", var))
}

/// Integrates an expression between two bounds.
pub(super) fn integrate_definite(args: &Args) -> Result<Success, OperationError> {
    let var = parse_var(arg(args, "var")?)?;
    let f = parse_function(args, &[&var])?;
    let lower = parse_point(args, "lt")?;
    let upper = parse_point(args, "ut")?;
    check_bounds(&lower, &upper)?;
    let integral = integrate_between(&f, &var, &lower, &upper)?;

    Ok(Success::new(
        Some(Field::One(integral.pretty())),
        format!(
            "\\int_{{{}}}^{{{}}} \\left({}\\right) \\, d{} = {}",
            latex(&lower),
            latex(&upper),
            latex(&f),
            var,
            latex(&integral),
        ),
    )
        .with("expr", f.pretty())
        .with("var", var)
        .with("lt", lower.pretty())
        .with("ut", upper.pretty()))
}

/// Computes the limit of an expression as a variable approaches a point, from above by default.
pub(super) fn limit(args: &Args) -> Result<Success, OperationError> {
    let var = parse_var(arg(args, "var")?)?;
    let f = parse_function(args, &[&var])?;
    let point = parse_point(args, "val")?;
    let dir = parse_dir(optional_arg(args, "dir")?.unwrap_or("+"))?;
    let value = limit_at(&f, &var, &point, dir)?;

    let side = match dir {
        _ if point.is_infinite() => "",
        Direction::Right => "^{+}",
        Direction::Left => "^{-}",
        Direction::Both => "",
    };

    Ok(Success::new(
        Some(Field::One(value.pretty())),
        format!(
            "\\lim_{{{} \\to {}{}}} \\left({}\\right) = {}",
            var,
            latex(&point),
            side,
            latex(&f),
            latex(&value),
        ),
    )
        .with("expr", f.pretty())
        .with("var", var)
        .with("val", point.pretty())
        .with("dir", dir.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::operation::{dispatch, tests::args, Args, Field, Response, Success};
    use pretty_assertions::assert_eq;

    fn run(op: &str, pairs: &[(&str, &str)]) -> Response {
        dispatch(op, &args(pairs))
    }

    fn success(op: &str, pairs: &[(&str, &str)]) -> Success {
        match run(op, pairs) {
            Response::Success(success) => success,
            Response::Failure(failure) => panic!("{} failed: {:?}", op, failure),
        }
    }

    fn answer(op: &str, pairs: &[(&str, &str)]) -> String {
        match success(op, pairs).answer {
            Some(Field::One(answer)) => answer,
            other => panic!("expected a single answer, got {:?}", other),
        }
    }

    fn failure_message(op: &str, pairs: &[(&str, &str)]) -> String {
        match run(op, pairs) {
            Response::Success(success) => panic!("{} succeeded: {:?}", op, success),
            Response::Failure(failure) => failure.message,
        }
    }

    #[test]
    fn derivatives() {
        assert_eq!(answer("derive", &[("expr", "x^2"), ("var", "x")]), "2x");
        assert_eq!(answer("derive", &[("expr", "sin(x)"), ("var", "x")]), "cos(x)");
        assert_eq!(answer("derive_expression", &[("expr", "t^3"), ("var", "t")]), "3t^2");
    }

    #[test]
    fn repeated_derivatives() {
        let mut second = Args::new();
        second.insert("expr".to_string(), Field::One("x^3".to_string()));
        second.insert("var".to_string(), Field::Many(vec!["x".to_string(), "x".to_string()]));
        let Response::Success(success) = dispatch("derive", &second) else {
            panic!("derive failed");
        };
        assert_eq!(success.answer, Some(Field::One("6x".to_string())));
        assert_eq!(success.pretty.get("var"), Some(&Field::Many(vec!["x".to_string(), "x".to_string()])));
        assert!(success.latex.starts_with("\\frac{d}{dx}\\frac{d}{dx}\\left("));
    }

    #[test]
    fn variables_are_checked() {
        assert_eq!(
            failure_message("derive", &[("expr", "x^2"), ("var", "sin")]),
            "sin is an invalid variable name",
        );
        assert_eq!(
            failure_message("integrate_indefinite", &[("expr", "x"), ("var", "x1")]),
            "x1 is an invalid variable name",
        );
    }

    #[test]
    fn antiderivatives() {
        let antiderivative = success("integrate_indefinite", &[("expr", "x^2"), ("var", "x")]);
        assert_eq!(antiderivative.answer, Some(Field::One("x^3/3".to_string())));
        assert!(antiderivative.latex.ends_with(" + C"));

        assert_eq!(answer("integrate_indefinite", &[("expr", "cos(x)"), ("var", "x")]), "sin(x)");
    }

    #[test]
    fn definite_integrals() {
        let pairs = [("expr", "x^2"), ("var", "x"), ("lt", "0"), ("ut", "3")];
        assert_eq!(answer("integrate_definite", &pairs), "9");
        assert_eq!(answer("integrate_definite", &[("expr", "cos(x)"), ("var", "x"), ("lt", "0"), ("ut", "pi/2")]), "1");
        assert_eq!(answer("integrate_definite", &[("expr", "x"), ("var", "x"), ("lt", "2"), ("ut", "2")]), "0");

        let latex = success("integrate_definite", &pairs).latex;
        assert!(latex.starts_with("\\int_{0}^{3} \\left("));

        assert_eq!(
            failure_message("integrate_definite", &[("expr", "x"), ("var", "x"), ("lt", "3"), ("ut", "0")]),
            "Upper bound is smaller than lower bound",
        );
    }

    #[test]
    fn limits() {
        assert_eq!(answer("limit", &[("expr", "sin(x)/x"), ("var", "x"), ("val", "0")]), "1");
        assert_eq!(answer("limit", &[("expr", "1/x"), ("var", "x"), ("val", "0"), ("dir", "-")]), "-oo");
        assert_eq!(answer("limit_expression", &[("expr", "1/x"), ("var", "x"), ("val", "oo")]), "0");

        let both = success("limit", &[("expr", "x^2"), ("var", "x"), ("val", "3"), ("dir", "+-")]);
        assert_eq!(both.answer, Some(Field::One("9".to_string())));
        assert_eq!(both.pretty.get("dir"), Some(&Field::One("+-".to_string())));
        assert!(both.latex.starts_with("\\lim_{x \\to 3} "));

        let right = success("limit", &[("expr", "x^2"), ("var", "x"), ("val", "3")]);
        assert!(right.latex.starts_with("\\lim_{x \\to 3^{+}} "));

        assert_eq!(
            failure_message("limit", &[("expr", "x"), ("var", "x"), ("val", "0"), ("dir", "up")]),
            "up is not a valid direction",
        );
    }
}
