//! Compact, human-readable rendering of engine output.
//!
//! This is the inverse of [normalization](crate::normalize): the canonical string of a value is
//! _neatened_ by dropping spaces and redundant multiplication signs, and by writing constants the
//! way users type them.
//!
//! ```
//! use mathnote_notation::pretty::neaten;
//!
//! assert_eq!(neaten("2*x**2 + 3*pi"), "2x^2+3π");
//! assert_eq!(neaten("-1*(x + 1)"), "-(x+1)");
//! ```

use mathnote_compute::symbolic::{
    solve::set::{Interval, SolutionSet, IMAGE_INDEX},
    RelKind,
    Relation,
    Statement,
    SymExpr,
};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::validate::{Func, Limit};

/// Plain string replacements applied after removing spaces, in order.
const REPLACEMENTS: [(&str, &str); 6] = [
    ("**", "^"),
    ("E", "e"),
    ("I", "i"),
    ("-1*", "-"),
    ("(-1)*", "-"),
    ("Mod", "mod"),
];

/// A multiplication sign that can be dropped: after a letter, digit or closing bracket, and
/// before a letter or opening parenthesis.
static REDUNDANT_MUL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z0-9)\]])\*([a-zA-Z(])").expect("multiplication pattern is valid")
});

/// Neatens a canonical string.
pub fn neaten(canonical: &str) -> String {
    let mut s = canonical.replace(' ', "");
    for (from, to) in REPLACEMENTS {
        s = s.replace(from, to);
    }

    // matches can overlap, as in `x*y*z`
    loop {
        let next = REDUNDANT_MUL.replace_all(&s, "$1$2").into_owned();
        if next == s {
            break;
        }
        s = next;
    }

    s.replace("pi", "π")
}

/// A value that can be rendered in compact notation.
pub trait Pretty {
    /// Renders the value as a single string.
    fn pretty(&self) -> String;

    /// Renders the value as a list of strings. Sets give one string per member; anything else
    /// gives a single string.
    fn pretty_many(&self) -> Vec<String> {
        vec![self.pretty()]
    }
}

/// Renders the value as a single string.
pub fn pretty(value: &impl Pretty) -> String {
    value.pretty()
}

/// Renders the value as a list of strings, one per member of a set.
pub fn pretty_many(value: &impl Pretty) -> Vec<String> {
    value.pretty_many()
}

impl Pretty for SymExpr {
    fn pretty(&self) -> String {
        neaten(&self.to_string())
    }
}

impl Pretty for Relation {
    fn pretty(&self) -> String {
        match self.kind {
            RelKind::Eq => neaten(&format!("{} = {}", self.lhs, self.rhs)),
            RelKind::Ne => neaten(&format!("{} != {}", self.lhs, self.rhs)),
            _ => neaten(&self.to_string()),
        }
    }
}

impl Pretty for Statement {
    fn pretty(&self) -> String {
        match self {
            Self::Expr(expr) => expr.pretty(),
            Self::Relation(relation) => relation.pretty(),
            Self::Bool(value) => if *value { "True" } else { "False" }.to_string(),
        }
    }
}

impl Pretty for Interval {
    fn pretty(&self) -> String {
        format!(
            "{}{},{}{}",
            if self.left_open { '(' } else { '[' },
            self.start.pretty(),
            self.end.pretty(),
            if self.right_open { ')' } else { ']' },
        )
    }
}

impl Pretty for SolutionSet {
    fn pretty(&self) -> String {
        match self {
            Self::Empty => "∅".to_string(),
            Self::Reals => "Reals".to_string(),
            Self::Complexes => "Complexes".to_string(),
            Self::Finite(members) => format!(
                "{{{}}}",
                members.iter().map(Pretty::pretty).collect::<Vec<_>>().join(","),
            ),
            Self::Interval(interval) => interval.pretty(),
            Self::Union(sets) => sets.iter().map(Pretty::pretty).collect::<Vec<_>>().join("∪"),
            Self::Intersection(sets) => sets.iter().map(Pretty::pretty).collect::<Vec<_>>().join("∩"),
            Self::Image(expr) => neaten(&expr.to_string().replace(IMAGE_INDEX, "n")),
        }
    }

    fn pretty_many(&self) -> Vec<String> {
        match self {
            Self::Finite(members) => members.iter().map(Pretty::pretty).collect(),
            Self::Union(sets) | Self::Intersection(sets) => sets.iter().map(Pretty::pretty).collect(),
            _ => vec![self.pretty()],
        }
    }
}

impl Pretty for Func {
    fn pretty(&self) -> String {
        format!("{}({})={}", self.name, self.var, self.body.pretty())
    }
}

impl Pretty for Limit {
    fn pretty(&self) -> String {
        format!("[{},{}]", self.lower.pretty(), self.upper.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{parse_eq, parse_expr, parse_func, parse_lim};
    use crate::names::SymbolMap;
    use mathnote_compute::symbolic::{simplify, solve::{solve, Domain}};
    use pretty_assertions::assert_eq;

    fn expr(source: &str) -> String {
        parse_expr(source).unwrap().pretty()
    }

    fn solutions(source: &str, domain: Domain) -> Vec<String> {
        let relation = parse_eq(source, &SymbolMap::new()).unwrap();
        solve(&relation, "x", domain).unwrap().pretty_many()
    }

    #[test]
    fn written_products() {
        assert_eq!(expr("x*2"), "x*2");
        assert_eq!(expr("9*8"), "9*8");
        assert_eq!(expr("x*y*z*2"), "xyz*2");
        assert_eq!(expr("2*pi"), "2π");
        assert_eq!(expr("-1*(x+1)"), "-(x+1)");
        assert_eq!(expr("x*2*y"), "x*2y");
        assert_eq!(expr("x*y"), "xy");
        assert_eq!(expr("-1*x"), "-x");
        assert_eq!(expr("pi"), "π");
    }

    #[test]
    fn constants_and_operators() {
        assert_eq!(expr("e^x"), "exp(x)");
        assert_eq!(expr("2^x"), "2^x");
        assert_eq!(expr("3 + 2i"), "3+2i");
        assert_eq!(expr("Mod(x, 3)"), "mod(x,3)");
        assert_eq!(neaten("sqrt(2)*x"), "sqrt(2)x");
    }

    #[test]
    fn simplified_values() {
        let derivative = simplify(&parse_expr("2x^2 + 3x").unwrap());
        assert_eq!(derivative.pretty(), "2x^2+3x");
    }

    #[test]
    fn statements() {
        let scope = SymbolMap::new();
        assert_eq!(parse_eq("x^2 = 4", &scope).unwrap().pretty(), "x^2=4");
        assert_eq!(parse_eq("x != 1", &scope).unwrap().pretty(), "x!=1");
        assert_eq!(parse_eq("2x <= 3", &scope).unwrap().pretty(), "2x<=3");
        assert_eq!(Statement::Bool(true).pretty(), "True");
    }

    #[test]
    fn functions_and_limits() {
        assert_eq!(parse_func("g(t) = 2t^2", "t").unwrap().pretty(), "g(t)=2t^2");
        assert_eq!(parse_lim("(0, pi)").unwrap().pretty(), "[0,π]");
        assert_eq!(parse_lim("[-oo, 1]").unwrap().pretty(), "[-oo,1]");
    }

    #[test]
    fn solution_sets() {
        assert_eq!(solutions("x^2 = 4", Domain::Reals), vec!["-2", "2"]);
        assert_eq!(solutions("x^2 + 1 = 0", Domain::Reals), vec!["∅"]);
        assert_eq!(solutions("x^2 + 1 = 0", Domain::Complexes), vec!["-i", "i"]);
        assert_eq!(solutions("x^2 <= 4", Domain::Reals), vec!["[-2,2]"]);
        assert_eq!(solutions("x^2 >= 1", Domain::Reals), vec!["(-oo,-1]", "[1,oo)"]);
        assert_eq!(solutions("x^2 + 1 > 0", Domain::Reals), vec!["Reals"]);
    }

    #[test]
    fn image_sets() {
        let set = SolutionSet::Image(SymExpr::Add(vec![
            SymExpr::Mul(vec![SymExpr::int(2), SymExpr::symbol(IMAGE_INDEX), SymExpr::pi()]),
            SymExpr::Mul(vec![SymExpr::pi(), SymExpr::pow(SymExpr::int(2), SymExpr::neg_one())]),
        ]));
        assert_eq!(set.pretty(), "2nπ+π/2");
        assert_eq!(set.pretty_many(), vec!["2nπ+π/2"]);

        let relation = parse_eq("sin(x) = 1", &SymbolMap::new()).unwrap();
        let [solution] = &solve(&relation, "x", Domain::Reals).unwrap().pretty_many()[..] else {
            panic!("expected a single image set");
        };
        assert!(solution.contains('n') && solution.contains('π'));
        assert!(!solution.contains(IMAGE_INDEX));
    }
}
