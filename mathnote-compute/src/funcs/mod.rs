//! The table of built-in functions understood by the engine.
//!
//! Every function call in an expression must name one of these functions, with a number of
//! arguments in the allowed range. The table is used when converting parsed expressions into
//! [`SymExpr`](crate::symbolic::expr::SymExpr)s, and by callers that need to know which names are
//! reserved.
//!
//! ```
//! use mathnote_compute::funcs;
//!
//! let log = funcs::lookup("log").unwrap();
//! assert!(log.accepts(1) && log.accepts(2));
//! assert!(!log.accepts(3));
//! assert!(funcs::lookup("foo").is_none());
//! ```

use once_cell::sync::Lazy;
use rug::Integer;
use std::collections::HashMap;

/// A built-in function and the number of arguments it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    /// The name of the function.
    pub name: &'static str,

    /// The minimum number of arguments.
    pub min_args: usize,

    /// The maximum number of arguments.
    pub max_args: usize,
}

impl Builtin {
    /// Returns true if the function can be called with `count` arguments.
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&count)
    }

    /// Describes the accepted argument count, such as `1` or `1 or 2`.
    pub fn arity(&self) -> String {
        if self.min_args == self.max_args {
            self.min_args.to_string()
        } else {
            format!("{} or {}", self.min_args, self.max_args)
        }
    }
}

macro_rules! build {
    ($($name:literal $min:literal $max:literal),* $(,)?) => {
        [
            $(
                ($name, Builtin { name: $name, min_args: $min, max_args: $max }),
            )*
        ]
            .into_iter()
            .collect()
    };
}

static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| build! {
    "sin" 1 1,
    "cos" 1 1,
    "tan" 1 1,
    "cot" 1 1,
    "sec" 1 1,
    "csc" 1 1,
    "asin" 1 1,
    "acos" 1 1,
    "atan" 1 1,
    "acot" 1 1,
    "asec" 1 1,
    "acsc" 1 1,
    "sinh" 1 1,
    "cosh" 1 1,
    "tanh" 1 1,
    "coth" 1 1,
    "sech" 1 1,
    "csch" 1 1,
    "asinh" 1 1,
    "acosh" 1 1,
    "atanh" 1 1,
    "acoth" 1 1,
    "asech" 1 1,
    "acsch" 1 1,
    "exp" 1 1,
    "log" 1 2,
    "sqrt" 1 1,
    "cbrt" 1 1,
    "root" 2 2,
    "abs" 1 1,
    "sign" 1 1,
    "floor" 1 1,
    "ceiling" 1 1,
    "Mod" 2 2,
    "factorial" 1 1,
    "factorial2" 1 1,
    "gamma" 1 1,
});

/// Returns the built-in function with the given name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

/// Returns true if `name` is the name of a built-in function.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// Returns the names of all built-in functions, sorted alphabetically.
pub fn names() -> Vec<&'static str> {
    let mut names = BUILTINS.keys().copied().collect::<Vec<_>>();
    names.sort_unstable();
    names
}

/// The largest argument for which factorials are computed exactly.
const MAX_FACTORIAL: u32 = 5000;

/// Computes `n!`, or returns [`None`] if `n` is negative or too large to compute exactly.
pub fn factorial(n: &Integer) -> Option<Integer> {
    let n = n.to_u32().filter(|&n| n <= MAX_FACTORIAL)?;
    Some(Integer::from(Integer::factorial(n)))
}

/// Computes the double factorial `n!!`, or returns [`None`] if `n` is less than `-1` or too large
/// to compute exactly. By convention, `0!! = (-1)!! = 1`.
pub fn factorial2(n: &Integer) -> Option<Integer> {
    if *n == -1 {
        return Some(Integer::from(1));
    }
    let n = n.to_u32().filter(|&n| n <= MAX_FACTORIAL)?;
    Some(Integer::from(Integer::factorial_2(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arity_descriptions() {
        assert_eq!(lookup("sin").map(Builtin::arity), Some("1".to_string()));
        assert_eq!(lookup("log").map(Builtin::arity), Some("1 or 2".to_string()));
        assert_eq!(lookup("root").map(|b| b.accepts(1)), Some(false));
    }

    #[test]
    fn factorials() {
        assert_eq!(factorial(&Integer::from(5)), Some(Integer::from(120)));
        assert_eq!(factorial(&Integer::from(-1)), None);
        assert_eq!(factorial2(&Integer::from(7)), Some(Integer::from(105)));
        assert_eq!(factorial2(&Integer::from(-1)), Some(Integer::from(1)));
    }

    #[test]
    fn names_are_sorted() {
        let names = names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names.contains(&"Mod"));
    }
}
