//! Simplification rules for calls to built-in functions other than the trigonometric functions.

use crate::{
    funcs,
    primitive::{complex, float, rat},
    symbolic::{
        expr::{Number, Primary, SymExpr},
        numeric,
        simplify::{rules::do_call, step::Step},
        step_collector::StepCollector,
    },
};
use rug::{Integer, Rational};
use std::cmp::Ordering;

/// `exp(x) = e^x`
pub fn exp_to_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "exp", |args| {
        Some(SymExpr::pow(SymExpr::e(), args.first()?.clone()))
    })?;

    step_collector.push(Step::ExpToPower);
    Some(opt)
}

/// `sqrt(x) = x^(1/2)`
/// `cbrt(x) = x^(1/3)`
/// `root(x, n) = x^(1/n)`
pub fn root_to_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, args) = expr.as_call()?;
    let opt = match (name, args) {
        ("sqrt", [arg]) => SymExpr::pow(arg.clone(), SymExpr::rational(rat(1, 2))),
        ("cbrt", [arg]) => SymExpr::pow(arg.clone(), SymExpr::rational(rat(1, 3))),
        ("root", [arg, n]) => SymExpr::pow(arg.clone(), SymExpr::one() / n.clone()),
        _ => return None,
    };

    step_collector.push(Step::RootToPower);
    Some(opt)
}

/// Returns `k` if `n = base^k` for a positive integer `k`.
fn exact_log(n: &Integer, base: &Integer) -> Option<u32> {
    if *base <= 1 || *n < 1 {
        return None;
    }

    let mut power = Integer::from(1);
    let mut k = 0;
    while power < *n {
        power *= base;
        k += 1;
    }
    (power == *n).then_some(k)
}

/// `log(x, e) = log(x)`
/// `log(8, 2) = 3`
/// `log(x, b) = log(x)/log(b)`
pub fn log_base(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "log", |args| {
        let [arg, base] = args else {
            return None;
        };

        if base.is_symbol("E") {
            return Some(SymExpr::call("log", vec![arg.clone()]));
        }
        if let (Some(n), Some(b)) = (arg.as_integer(), base.as_integer()) {
            if let Some(k) = exact_log(n, b) {
                return Some(SymExpr::int(k));
            }
        }
        Some(
            SymExpr::call("log", vec![arg.clone()])
                * SymExpr::call("log", vec![base.clone()]).recip(),
        )
    })?;

    step_collector.push(Step::LogBase);
    Some(opt)
}

/// Known values of the natural logarithm.
///
/// `log(1) = 0`
/// `log(e) = 1`
/// `log(e^x) = x`
/// `log(0) = zoo`
/// `log(1/n) = -log(n)`
pub fn log(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "log", |args| {
        let [arg] = args else {
            return None;
        };

        if arg.is_one() {
            return Some(SymExpr::zero());
        }
        if arg.is_symbol("E") {
            return Some(SymExpr::one());
        }
        if arg.is_zero() && !arg.is_float() {
            return Some(SymExpr::complex_infinity());
        }
        if let SymExpr::Exp(base, exp) = arg {
            if base.is_symbol("E") && exp.free_symbols().is_empty() && numeric::eval_real(exp).is_some() {
                return Some((**exp).clone());
            }
        }

        match arg.as_number()? {
            Number::Exact(r) if r.cmp0() == Ordering::Greater && *r.numer() == 1 => {
                let (_, denom) = r.into_numer_denom();
                Some(-SymExpr::call("log", vec![SymExpr::Primary(Primary::Integer(denom))]))
            },
            Number::Float(f) if f.cmp0() == Some(Ordering::Greater) => {
                Some(SymExpr::Primary(Primary::Float(f.ln())))
            },
            _ => None,
        }
    })?;

    step_collector.push(Step::Log);
    Some(opt)
}

/// Returns the sign of an expression that is a number, or evaluates to a real number without free
/// symbols.
fn known_sign(expr: &SymExpr) -> Option<Ordering> {
    if let Some(n) = expr.as_number() {
        return Some(n.sign());
    }
    if !expr.free_symbols().is_empty() || expr.has_unbounded() {
        return None;
    }
    numeric::eval_real(expr)?.cmp0()
}

/// `abs(-2) = 2`
/// `abs(-3*x) = 3*abs(x)`
/// `abs(pi - 4) = 4 - pi`
pub fn abs(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "abs", |args| {
        let [arg] = args else {
            return None;
        };

        if let Some(n) = arg.as_number() {
            return Some(n.abs().into_expr());
        }
        if let Some(inner) = arg.as_unary_call("abs") {
            return Some(SymExpr::call("abs", vec![inner.clone()]));
        }
        match known_sign(arg) {
            Some(Ordering::Less) => return Some(-arg.clone()),
            Some(_) => return Some(arg.clone()),
            None => {},
        }

        let (coeff, rest) = arg.split_coefficient();
        if coeff.is_one() {
            return None;
        }
        Some(coeff.abs().into_expr() * SymExpr::call("abs", vec![rest]))
    })?;

    step_collector.push(Step::Abs);
    Some(opt)
}

/// `sign(-2) = -1`
/// `sign(pi) = 1`
pub fn sign(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "sign", |args| {
        let value = match known_sign(args.first()?)? {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        Some(SymExpr::int(value))
    })?;

    step_collector.push(Step::Sign);
    Some(opt)
}

/// `floor(5/2) = 2`
/// `ceiling(pi) = 4`
pub fn round(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };
    if name != "floor" && name != "ceiling" {
        return None;
    }

    let opt = match arg.as_number() {
        Some(Number::Exact(r)) => {
            let value = if name == "floor" { r.floor() } else { r.ceil() };
            SymExpr::rational(value)
        },
        Some(Number::Float(f)) => {
            let value = if name == "floor" { f.floor() } else { f.ceil() };
            SymExpr::Primary(Primary::Integer(value.to_integer()?))
        },
        None => {
            if !arg.free_symbols().is_empty() || arg.has_unbounded() {
                return None;
            }
            // values within rounding error of an integer cannot be rounded reliably
            if numeric::eval_integer(arg).is_some() {
                return None;
            }
            let value = numeric::eval_real(arg)?;
            let value = if name == "floor" { value.floor() } else { value.ceil() };
            SymExpr::Primary(Primary::Integer(value.to_integer()?))
        },
    };

    step_collector.push(Step::Round);
    Some(opt)
}

/// Evaluates the remainder of two numbers, with the sign of the divisor.
///
/// `Mod(7, 3) = 1`
/// `Mod(-7, 3) = 2`
/// `Mod(x, 0) = nan`
pub fn modulo(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "Mod", |args| {
        let [lhs, rhs] = args else {
            return None;
        };
        if rhs.is_zero() {
            return Some(SymExpr::nan());
        }

        match (lhs.as_number()?, rhs.as_number()?) {
            (Number::Exact(a), Number::Exact(b)) => {
                let quotient = Rational::from(&a / &b).floor();
                Some(SymExpr::rational(a - b * quotient))
            },
            (a, b) => {
                let (a, b) = (a.to_float(), b.to_float());
                let quotient = float(&a / &b).floor();
                Some(SymExpr::Primary(Primary::Float(a - b * quotient)))
            },
        }
    })?;

    step_collector.push(Step::Mod);
    Some(opt)
}

/// `5! = 120`
/// `7!! = 105`
/// `(-1)! = zoo`
pub fn factorial(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };

    let opt = match (name, arg.as_number()?) {
        ("factorial", Number::Float(x)) => {
            let value = numeric::eval_function("factorial", &[complex(&x)])?;
            SymExpr::Primary(Primary::Float(value.into_real_imag().0))
        },
        ("factorial", n) => {
            let n = n.as_integer()?;
            if n.cmp0() == Ordering::Less {
                SymExpr::complex_infinity()
            } else {
                SymExpr::Primary(Primary::Integer(funcs::factorial(&n)?))
            }
        },
        ("factorial2", n) => SymExpr::Primary(Primary::Integer(funcs::factorial2(&n.as_integer()?)?)),
        _ => return None,
    };

    step_collector.push(Step::Factorial);
    Some(opt)
}

/// `gamma(n) = (n-1)!`
/// `gamma(1/2) = sqrt(pi)`
/// `gamma(0) = zoo`
pub fn gamma(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_call(expr, "gamma", |args| {
        let arg = args.first()?;
        if arg.as_rational() == Some(rat(1, 2)) {
            return Some(SymExpr::pi().sqrt());
        }

        match arg.as_number()? {
            Number::Float(x) => {
                let value = numeric::eval_function("gamma", &[complex(&x)])?;
                Some(SymExpr::Primary(Primary::Float(value.into_real_imag().0)))
            },
            n => {
                let n = n.as_integer()?;
                if n.cmp0() != Ordering::Greater {
                    Some(SymExpr::complex_infinity())
                } else {
                    Some(SymExpr::Primary(Primary::Integer(funcs::factorial(&(n - 1u32))?)))
                }
            },
        }
    })?;

    step_collector.push(Step::Gamma);
    Some(opt)
}

/// Values of hyperbolic functions at zero, such as `sinh(0) = 0` and `cosh(0) = 1`.
pub fn hyperbolic(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };

    let opt = match name {
        "sinh" | "tanh" | "asinh" | "atanh" if arg.is_zero() && !arg.is_float() => SymExpr::zero(),
        "cosh" | "sech" if arg.is_zero() && !arg.is_float() => SymExpr::one(),
        "coth" | "csch" if arg.is_zero() && !arg.is_float() => SymExpr::complex_infinity(),
        "acosh" if arg.is_one() => SymExpr::zero(),
        _ => return None,
    };

    step_collector.push(Step::Hyperbolic);
    Some(opt)
}

/// Evaluates a call whose arguments are all numbers, at least one of which is a float.
///
/// `sin(0.5) = 0.479425538604203`
pub fn evaluate_float(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, args) = expr.as_call()?;
    if !args.iter().all(SymExpr::is_number) || !args.iter().any(SymExpr::is_float) {
        return None;
    }

    let values = args.iter()
        .map(|arg| arg.as_number().map(|n| complex(&n.to_float())))
        .collect::<Option<Vec<_>>>()?;
    let value = numeric::eval_function(name, &values)?;
    let (re, im) = value.into_real_imag();
    let opt = if im.is_zero() {
        SymExpr::Primary(Primary::Float(re))
    } else {
        SymExpr::Primary(Primary::Float(re))
            + SymExpr::Mul(vec![SymExpr::Primary(Primary::Float(im)), SymExpr::i()])
    };

    step_collector.push(Step::EvaluateFloat);
    Some(opt)
}

/// Applies all function rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    exp_to_power(expr, step_collector)
        .or_else(|| root_to_power(expr, step_collector))
        .or_else(|| log_base(expr, step_collector))
        .or_else(|| log(expr, step_collector))
        .or_else(|| abs(expr, step_collector))
        .or_else(|| sign(expr, step_collector))
        .or_else(|| round(expr, step_collector))
        .or_else(|| modulo(expr, step_collector))
        .or_else(|| factorial(expr, step_collector))
        .or_else(|| gamma(expr, step_collector))
        .or_else(|| hyperbolic(expr, step_collector))
        .or_else(|| evaluate_float(expr, step_collector))
}
