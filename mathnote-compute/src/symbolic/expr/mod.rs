//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](mathnote_parser::parser::expr::Expr) type from `mathnote_parser` is a recursive
//! `enum` that represents the AST of a mathematical expression. It's convenient for parsing, but
//! not so much for algebraic manipulation.
//!
//! This module defines a separate [`SymExpr`], which flattens the AST into a list of terms or
//! factors, depending on the operation, and normalizes the expression into a sum of products.
//! Subtraction is represented as addition of a term multiplied by `-1`, and division as
//! multiplication by a power with exponent `-1`.
//!
//! Named constants are represented as symbols: `E` (Euler's number), `I` (the imaginary unit),
//! `pi`, `oo` (positive infinity), `zoo` (complex infinity), and `nan` (an undefined value).
//!
//! # Strict equality
//!
//! A common problem that arises in symbolic computation is determining if two expressions are
//! semantically / mathematically equal, in order to determine if terms / factors are similar
//! enough to be combined, for example. However, this is extremely difficult to do, because there
//! are an infinite number of ways to represent the same expression.
//!
//! Consider pairs of expressions such as `x^2 + 2x + 1` and `(x + 1)^2`, or `cos(2x)` and
//! `cos(x)^2 - sin(x)^2`. Both pairs are semantically equal, but this is not immediately obvious
//! without first applying expansion / factoring / simplification.
//!
//! To alleviate these issues, we define a subset of semantic equality for expressions, called
//! **strict equality**. We define two expressions to be strictly equal if:
//!
//! - They are the same type of expression (i.e. both [`SymExpr::Primary`], both
//! [`SymExpr::Add`], etc.).
//! - If both are [`SymExpr::Primary`], both expressions must have strictly equal values.
//! - If both are [`SymExpr::Add`] or [`SymExpr::Mul`], both expressions must have strictly equal
//! terms / factors, in any order.
//! - If both are [`SymExpr::Exp`], both expressions must have strictly equal base and exponent.
//!
//! Strict equality can **never** report false positives. If two expressions are strictly equal,
//! then they must be semantically equal. It is simple and fast to compute, and it does not depend
//! on any simplification to work.
//!
//! The [`PartialEq`] implementation for [`SymExpr`] implements **strict equality**. Use
//! [`SymExpr::is_identical`] to additionally require the same order of terms and factors.

mod convert;
mod fmt;
mod iter;
mod number;

pub use convert::{to_relation, to_statement};
pub use fmt::format_float;
pub use iter::ExprIter;
pub use number::Number;

use crate::primitive::float;
use rug::{Assign, Float, Integer, Rational};
use std::{
    cmp::Ordering,
    collections::BTreeSet,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub},
};

/// The names of the symbols that represent constants.
pub const CONSTANTS: [&str; 6] = ["E", "I", "pi", "oo", "zoo", "nan"];

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A rational number that is not an integer, such as `1/2` or `-7/3`.
    Rational(Rational),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(Float),

    /// A variable or constant, such as `x`, `theta` or `pi`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `log(x, 2)`.
    Call(String, Vec<SymExpr>),
}

/// A mathematical expression with information about its terms and factors.
///
/// This type should be distinguished from the [`mathnote_parser::parser::expr::Expr`] type,
/// which is produced by [`mathnote_parser`]. The main difference is that this type **flattens**
/// out the tree structure. For example, the expression `x + (y + z)` would be represented
/// internally as a single [`SymExpr::Add`] node with _three_ children, `x`, `y`, and `z`.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<SymExpr>),

    /// Multiple factors multiplied together.
    Mul(Vec<SymExpr>),

    /// An expression raised to a power.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

/// Returns true if every element of `lhs` can be paired with a distinct, strictly equal element
/// of `rhs`.
fn same_multiset(lhs: &[SymExpr], rhs: &[SymExpr]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut used = vec![false; rhs.len()];
    lhs.iter().all(|l| {
        let found = rhs.iter()
            .enumerate()
            .position(|(i, r)| !used[i] && l == r);
        match found {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

/// Checks if two expressions are **strictly** equal.
impl PartialEq for SymExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                same_multiset(lhs, rhs)
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

impl SymExpr {
    /// Creates an integer expression.
    pub fn int<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(Integer::from(n)))
    }

    /// Creates a rational expression, downgrading it to an integer if the denominator is one.
    pub fn rational(r: Rational) -> Self {
        if r.is_integer() {
            let (numer, _) = r.into_numer_denom();
            Self::Primary(Primary::Integer(numer))
        } else {
            Self::Primary(Primary::Rational(r))
        }
    }

    /// Creates a floating-point expression.
    pub fn float<T>(n: T) -> Self
    where
        Float: Assign<T>,
    {
        Self::Primary(Primary::Float(float(n)))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    pub fn call(name: impl Into<String>, args: Vec<SymExpr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Creates the expression `base^exp`. No simplification is done.
    pub fn pow(base: SymExpr, exp: SymExpr) -> Self {
        Self::Exp(Box::new(base), Box::new(exp))
    }

    pub fn zero() -> Self {
        Self::int(0)
    }

    pub fn one() -> Self {
        Self::int(1)
    }

    pub fn neg_one() -> Self {
        Self::int(-1)
    }

    pub fn pi() -> Self {
        Self::symbol("pi")
    }

    /// Euler's number.
    pub fn e() -> Self {
        Self::symbol("E")
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Self::symbol("I")
    }

    /// Positive infinity.
    pub fn infinity() -> Self {
        Self::symbol("oo")
    }

    /// Negative infinity.
    pub fn neg_infinity() -> Self {
        Self::Mul(vec![Self::neg_one(), Self::infinity()])
    }

    /// Complex infinity, the result of dividing a non-zero number by zero.
    pub fn complex_infinity() -> Self {
        Self::symbol("zoo")
    }

    /// An undefined value.
    pub fn nan() -> Self {
        Self::symbol("nan")
    }

    /// Returns the square root of this expression. No simplification is done.
    pub fn sqrt(self) -> Self {
        Self::pow(self, Self::rational(Rational::from((1, 2))))
    }

    /// Returns the reciprocal of this expression. No simplification is done.
    pub fn recip(self) -> Self {
        Self::pow(self, Self::neg_one())
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`SymExpr::Add`] with zero / one term, or an
    /// [`SymExpr::Mul`] with zero / one factor. This function checks for these cases and
    /// simplifies the expression into the single term / factor, or an [`SymExpr::Primary`]
    /// containing the integer 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns true if both expressions are strictly equal **and** list their terms and factors
    /// in the same order.
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(Primary::Call(lhs_name, lhs_args)), Self::Primary(Primary::Call(rhs_name, rhs_args))) => {
                lhs_name == rhs_name
                    && lhs_args.len() == rhs_args.len()
                    && lhs_args.iter().zip(rhs_args).all(|(l, r)| l.is_identical(r))
            },
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| l.is_identical(r))
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base.is_identical(rhs_base) && lhs_exp.is_identical(rhs_exp)
            },
            _ => false,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(_)))
    }

    /// If the expression is an integer or a rational number, returns its exact value.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Primary(Primary::Integer(n)) => Some(Rational::from(n)),
            Self::Primary(Primary::Rational(r)) => Some(r.clone()),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Float`], returns a reference to the contained float.
    pub fn as_float(&self) -> Option<&Float> {
        match self {
            Self::Primary(Primary::Float(f)) => Some(f),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Primary(Primary::Float(_)))
    }

    /// Returns true if the expression is an integer, rational, or floating-point number.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Primary(Primary::Integer(_) | Primary::Rational(_) | Primary::Float(_))
        )
    }

    /// Returns the numeric value of the expression, if it is a number.
    pub fn as_number(&self) -> Option<Number> {
        Number::from_expr(self)
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns true if the expression is the symbol with the given name.
    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    /// If the expression is a [`Primary::Call`], returns the function name and arguments.
    pub fn as_call(&self) -> Option<(&str, &[SymExpr])> {
        match self {
            Self::Primary(Primary::Call(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    /// Returns true if the expression is a call to the given function with one argument.
    pub fn as_unary_call(&self, func: &str) -> Option<&SymExpr> {
        match self.as_call() {
            Some((name, [arg])) if name == func => Some(arg),
            _ => None,
        }
    }

    /// Returns true if the expression is the exact number zero, or a floating-point zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_zero())
    }

    /// Returns true if the expression is the exact number one.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(n)) if *n == 1)
    }

    /// Returns true if the expression is the exact number negative one.
    pub fn is_neg_one(&self) -> bool {
        matches!(self, Self::Primary(Primary::Integer(n)) if *n == -1)
    }

    /// Returns true if the expression is `oo`.
    pub fn is_infinity(&self) -> bool {
        self.is_symbol("oo")
    }

    /// Returns true if the expression is `-oo`, in any of its flattened forms.
    pub fn is_neg_infinity(&self) -> bool {
        match self {
            Self::Mul(factors) if factors.len() == 2 => {
                let (coeff, rest) = self.split_coefficient();
                coeff.is_negative() && rest.is_infinity() && !factors.iter().any(|f| f.is_float())
            },
            _ => false,
        }
    }

    /// Returns true if the expression is `oo`, `-oo`, or `zoo`.
    pub fn is_infinite(&self) -> bool {
        self.is_infinity() || self.is_neg_infinity() || self.is_symbol("zoo")
    }

    /// Returns true if the expression contains any of `oo`, `zoo`, or `nan` anywhere in its tree.
    pub fn has_unbounded(&self) -> bool {
        self.post_order_iter()
            .any(|e| e.is_symbol("oo") || e.is_symbol("zoo") || e.is_symbol("nan"))
    }

    /// Returns true if the expression is `nan`, or contains `nan` or `zoo` anywhere in its tree.
    pub fn has_undefined(&self) -> bool {
        self.post_order_iter().any(|e| e.is_symbol("zoo") || e.is_symbol("nan"))
    }

    /// Returns true if the symbol with the given name appears anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|e| e.is_symbol(name))
    }

    /// Returns the names of the free symbols in the expression, that is, every symbol that is not
    /// a constant.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(|e| e.as_symbol())
            .filter(|name| !CONSTANTS.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Returns a copy of the expression with every occurrence of the symbol `name` replaced by
    /// `value`. No simplification is done.
    pub fn subs(&self, name: &str, value: &SymExpr) -> SymExpr {
        match self {
            Self::Primary(Primary::Symbol(sym)) if sym == name => value.clone(),
            Self::Primary(Primary::Call(func, args)) => Self::call(
                func.clone(),
                args.iter().map(|arg| arg.subs(name, value)).collect(),
            ),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => Self::Add(terms.iter().map(|t| t.subs(name, value)).collect()),
            Self::Mul(factors) => Self::Mul(factors.iter().map(|f| f.subs(name, value)).collect()),
            Self::Exp(base, exp) => Self::pow(base.subs(name, value), exp.subs(name, value)),
        }
    }

    /// Returns a symbol name starting with `prefix` that does not occur in the expression.
    pub fn fresh_symbol(&self, prefix: &str) -> String {
        let mut name = prefix.to_string();
        let mut suffix = 0;
        while self.contains_symbol(&name) {
            suffix += 1;
            name = format!("{}{}", prefix, suffix);
        }
        name
    }

    /// Returns a copy of the expression with every subexpression strictly equal to `target`
    /// replaced by `value`.
    pub fn replace(&self, target: &SymExpr, value: &SymExpr) -> SymExpr {
        if self == target {
            return value.clone();
        }
        match self {
            Self::Primary(Primary::Call(func, args)) => Self::call(
                func.clone(),
                args.iter().map(|arg| arg.replace(target, value)).collect(),
            ),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => Self::Add(terms.iter().map(|t| t.replace(target, value)).collect()),
            Self::Mul(factors) => Self::Mul(factors.iter().map(|f| f.replace(target, value)).collect()),
            Self::Exp(base, exp) => Self::pow(base.replace(target, value), exp.replace(target, value)),
        }
    }

    /// Returns the terms of the expression: the children of an [`SymExpr::Add`], or the
    /// expression itself.
    pub fn terms(&self) -> &[SymExpr] {
        match self {
            Self::Add(terms) => terms,
            _ => std::slice::from_ref(self),
        }
    }

    /// Returns the factors of the expression: the children of an [`SymExpr::Mul`], or the
    /// expression itself.
    pub fn factors(&self) -> &[SymExpr] {
        match self {
            Self::Mul(factors) => factors,
            _ => std::slice::from_ref(self),
        }
    }

    /// Splits the expression into its numeric coefficient and the remaining factors.
    ///
    /// For example, `-3*x*y` is split into `-3` and `x*y`, and `x` is split into `1` and `x`. A
    /// number is split into itself and `1`.
    pub fn split_coefficient(&self) -> (Number, SymExpr) {
        let mut coeff = Number::one();
        let mut rest = Vec::new();
        for factor in self.factors() {
            match factor.as_number() {
                Some(n) => coeff = coeff.mul(n),
                None => rest.push(factor.clone()),
            }
        }
        (coeff, Self::Mul(rest).downgrade())
    }

    /// Returns true if the expression has a negative numeric coefficient, such as `-2`, `-x` or
    /// `-3*x/2`.
    pub fn is_negated(&self) -> bool {
        self.factors()
            .iter()
            .find_map(|f| f.as_number())
            .is_some_and(|n| n.is_negative())
    }

    /// If the expression is `base^exp`, returns the base and exponent. Otherwise returns the
    /// expression itself raised to the power of one.
    pub fn as_power(&self) -> (SymExpr, SymExpr) {
        match self {
            Self::Exp(base, exp) => ((**base).clone(), (**exp).clone()),
            _ => (self.clone(), Self::one()),
        }
    }

    /// Returns the number of nodes in the expression tree.
    pub fn complexity(&self) -> usize {
        self.post_order_iter().count()
    }
}

impl From<Number> for SymExpr {
    fn from(n: Number) -> Self {
        n.into_expr()
    }
}

/// Adds two [`SymExpr`]s together, flattening nested sums. No simplification is done.
impl Add for SymExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), rhs) => {
                terms.push(rhs);
                Self::Add(terms)
            },
            (lhs, Self::Add(rhs_terms)) => {
                let mut terms = vec![lhs];
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for SymExpr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::zero());
        *self = lhs + rhs;
    }
}

/// Multiplies two [`SymExpr`]s together, flattening nested products. No simplification is done.
impl Mul for SymExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), rhs) => {
                factors.push(rhs);
                Self::Mul(factors)
            },
            (lhs, Self::Mul(rhs_factors)) => {
                let mut factors = vec![lhs];
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for SymExpr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::one());
        *self = lhs * rhs;
    }
}

/// Negates the expression. Numbers are negated directly; anything else is multiplied by `-1`.
impl Neg for SymExpr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match Number::from_expr(&self) {
            Some(n) => n.neg().into_expr(),
            None => Self::neg_one() * self,
        }
    }
}

impl Sub for SymExpr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

/// Divides two [`SymExpr`]s, by multiplying the numerator by the reciprocal of the denominator.
impl Div for SymExpr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        match (Number::from_expr(&self), Number::from_expr(&rhs)) {
            (Some(Number::Exact(num)), Some(Number::Exact(den))) if den.cmp0() != Ordering::Equal => {
                Self::rational(num / den)
            },
            _ => self * rhs.recip(),
        }
    }
}
