//! Symbolic derivatives of the builtin functions in [`crate::funcs`].

use crate::primitive::rat;
use mathnote_error::Error;
use super::{cannot_differentiate, derivative, MultBuilder};
use crate::symbolic::expr::SymExpr;

fn call(name: &str, arg: &SymExpr) -> SymExpr {
    SymExpr::call(name, vec![arg.clone()])
}

fn square(expr: SymExpr) -> SymExpr {
    SymExpr::pow(expr, SymExpr::int(2))
}

/// `u^(-1/2)`
fn inv_sqrt(u: SymExpr) -> SymExpr {
    SymExpr::pow(u, SymExpr::rational(rat(-1, 2)))
}

/// Returns `f'(u)` for a function of one argument, that is, the derivative of the outer function
/// evaluated at the argument, before the chain rule multiplies it by `u'`.
fn outer_derivative(func: &str, u: &SymExpr) -> Option<SymExpr> {
    let one = SymExpr::one;
    Some(match func {
        "sin" => call("cos", u),
        "cos" => -call("sin", u),
        "tan" => square(call("tan", u)) + one(),
        "cot" => -square(call("cot", u)) - one(),
        "sec" => call("tan", u) * call("sec", u),
        "csc" => -(call("cot", u) * call("csc", u)),

        "asin" => inv_sqrt(one() - square(u.clone())),
        "acos" => -inv_sqrt(one() - square(u.clone())),
        "atan" => (square(u.clone()) + one()).recip(),
        "acot" => -(square(u.clone()) + one()).recip(),
        "asec" => square(u.clone()).recip() * inv_sqrt(one() - square(u.clone()).recip()),
        "acsc" => -(square(u.clone()).recip() * inv_sqrt(one() - square(u.clone()).recip())),

        "sinh" => call("cosh", u),
        "cosh" => call("sinh", u),
        "tanh" => one() - square(call("tanh", u)),
        "coth" => one() - square(call("coth", u)),
        "sech" => -(call("tanh", u) * call("sech", u)),
        "csch" => -(call("coth", u) * call("csch", u)),

        "asinh" => inv_sqrt(square(u.clone()) + one()),
        "acosh" => inv_sqrt(square(u.clone()) - one()),
        "atanh" | "acoth" => (one() - square(u.clone())).recip(),
        "asech" => -(u.clone().recip() * inv_sqrt(one() - square(u.clone()))),
        "acsch" => -(square(u.clone()).recip() * inv_sqrt(one() + square(u.clone()).recip())),

        "exp" => call("exp", u),
        "log" => u.clone().recip(),
        "sqrt" => SymExpr::rational(rat(1, 2)) * inv_sqrt(u.clone()),
        "cbrt" => SymExpr::rational(rat(1, 3)) * SymExpr::pow(u.clone(), SymExpr::rational(rat(-2, 3))),

        "abs" => call("sign", u),
        "sign" | "floor" | "ceiling" => SymExpr::zero(),
        _ => return None,
    })
}

/// Computes the derivative of a call to a builtin function, applying the chain rule.
pub(super) fn function_derivative(
    expr: &SymExpr,
    func: &str,
    args: &[SymExpr],
    var: &str,
) -> Result<SymExpr, Error> {
    match (func, args) {
        ("log", [x, base]) => {
            let quotient = SymExpr::call("log", vec![x.clone()])
                * SymExpr::call("log", vec![base.clone()]).recip();
            return derivative(&quotient, var);
        },
        ("root", [x, n]) => {
            let power = SymExpr::pow(x.clone(), SymExpr::one() / n.clone());
            return derivative(&power, var);
        },
        // d/dx Mod(f, c) = f' wherever the remainder is continuous
        ("Mod", [x, n]) if !n.contains_symbol(var) => return derivative(x, var),
        _ => {},
    }

    let [arg] = args else {
        return Err(cannot_differentiate(expr));
    };
    let outer = outer_derivative(func, arg).ok_or_else(|| cannot_differentiate(expr))?;

    let mut mult_group = MultBuilder::default();
    mult_group.mult(outer);
    mult_group.mult(derivative(arg, var)?);
    Ok(mult_group.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{parse_expr, simplify};
    use pretty_assertions::assert_eq;

    fn derived(source: &str) -> String {
        let expr = parse_expr(source).unwrap();
        simplify(&derivative(&expr, "x").unwrap()).to_string()
    }

    #[test]
    fn trigonometric() {
        assert_eq!(derived("sin(x)"), "cos(x)");
        assert_eq!(derived("cos(x)"), "-sin(x)");
        assert_eq!(derived("sec(x)"), "sec(x)*tan(x)");
    }

    #[test]
    fn hyperbolic() {
        assert_eq!(derived("sinh(x)"), "cosh(x)");
        assert_eq!(derived("cosh(2*x)"), "2*sinh(2*x)");
    }

    #[test]
    fn piecewise_constant() {
        assert_eq!(derived("floor(x)"), "0");
        assert_eq!(derived("Mod(x, 3)"), "1");
        assert_eq!(derived("abs(x)"), "sign(x)");
    }
}
