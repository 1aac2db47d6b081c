//! Sets of solutions.

use mathnote_parser::parser::fmt::Latex;
use rug::Complex;
use std::{cmp::Ordering, fmt::{self, Display, Formatter}};
use super::super::{expr::SymExpr, numeric, simplify};

/// The symbol used as the integer index of an [`SolutionSet::Image`].
pub const IMAGE_INDEX: &str = "_n";

/// An interval of the real line. Infinite endpoints are always open.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: SymExpr,
    pub end: SymExpr,
    pub left_open: bool,
    pub right_open: bool,
}

impl Interval {
    pub fn new(start: SymExpr, end: SymExpr, left_open: bool, right_open: bool) -> Self {
        let left_open = left_open || start.is_neg_infinity();
        let right_open = right_open || end.is_infinity();
        Self { start, end, left_open, right_open }
    }

    /// Returns true if the interval is the whole real line.
    pub fn is_reals(&self) -> bool {
        self.start.is_neg_infinity() && self.end.is_infinity()
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.left_open { '(' } else { '[' },
            self.start,
            self.end,
            if self.right_open { ')' } else { ']' },
        )
    }
}

impl Latex for Interval {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "\\left{}", if self.left_open { '(' } else { '[' })?;
        self.start.fmt_latex(f)?;
        write!(f, ", ")?;
        self.end.fmt_latex(f)?;
        write!(f, "\\right{}", if self.right_open { ')' } else { ']' })
    }
}

/// The set of solutions of an equation or inequality.
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
    /// No solutions.
    Empty,

    /// Every real number.
    Reals,

    /// Every complex number.
    Complexes,

    /// A finite set of solutions, sorted by value where they can be evaluated.
    Finite(Vec<SymExpr>),

    /// An interval of the real line.
    Interval(Interval),

    /// The union of several sets.
    Union(Vec<SolutionSet>),

    /// The intersection of several sets. This is produced for solutions containing other symbols,
    /// such as the real solutions of `x = a`, which depend on whether `a` is real.
    Intersection(Vec<SolutionSet>),

    /// The values of an expression in [`IMAGE_INDEX`] as the index ranges over the integers, such
    /// as `2*_n*pi + pi/2`.
    Image(SymExpr),
}

impl SolutionSet {
    /// Creates a finite set, removing duplicates and sorting the members by value.
    pub fn finite(members: impl IntoIterator<Item = SymExpr>) -> Self {
        let mut unique: Vec<SymExpr> = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        if unique.is_empty() {
            return Self::Empty;
        }

        let mut keyed = unique.into_iter()
            .map(|member| (numeric::eval_complex(&member), member))
            .collect::<Vec<_>>();
        keyed.sort_by(|(a, _), (b, _)| compare_values(a.as_ref(), b.as_ref()));
        Self::Finite(keyed.into_iter().map(|(_, member)| member).collect())
    }

    /// Returns the union of the given sets. Empty sets are dropped, finite sets are merged, and a
    /// universal set absorbs the rest.
    pub fn union(sets: impl IntoIterator<Item = SolutionSet>) -> Self {
        let mut points = Vec::new();
        let mut others = Vec::new();
        for set in sets {
            match set {
                Self::Empty => (),
                Self::Reals | Self::Complexes => return set,
                Self::Finite(members) => points.extend(members),
                Self::Union(inner) => others.extend(inner),
                other => {
                    if !others.contains(&other) {
                        others.push(other);
                    }
                },
            }
        }

        if !points.is_empty() {
            others.insert(0, Self::finite(points));
        }
        match others.len() {
            0 => Self::Empty,
            1 => others.remove(0),
            _ => Self::Union(others),
        }
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the members of a finite set, or [`None`] for any other set.
    pub fn as_finite(&self) -> Option<&[SymExpr]> {
        match self {
            Self::Finite(members) => Some(members),
            Self::Empty => Some(&[]),
            _ => None,
        }
    }

    /// Applies a function to every member of a finite set and every element of an image set.
    pub(crate) fn map(self, f: &impl Fn(&SymExpr) -> SymExpr) -> Self {
        match self {
            Self::Finite(members) => Self::finite(members.iter().map(|m| simplify(&f(m)))),
            Self::Image(expr) => Self::Image(simplify(&f(&expr))),
            Self::Union(sets) => Self::union(sets.into_iter().map(|set| set.map(f))),
            Self::Intersection(sets) => Self::Intersection(
                sets.into_iter().map(|set| set.map(f)).collect(),
            ),
            other => other,
        }
    }
}

/// Orders numeric values by real part, then imaginary part. Values that could not be evaluated
/// are placed last.
fn compare_values(a: Option<&Complex>, b: Option<&Complex>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.real()
            .partial_cmp(b.real())
            .filter(|ord| *ord != Ordering::Equal)
            .or_else(|| a.imag().partial_cmp(b.imag()))
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn fmt_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn fmt_latex_list<T: Latex>(f: &mut Formatter, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        item.fmt_latex(f)?;
    }
    Ok(())
}

impl Display for SolutionSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EmptySet"),
            Self::Reals => write!(f, "Reals"),
            Self::Complexes => write!(f, "Complexes"),
            Self::Finite(members) => {
                write!(f, "{{")?;
                fmt_list(f, members)?;
                write!(f, "}}")
            },
            Self::Interval(interval) => write!(f, "{}", interval),
            Self::Union(sets) => {
                write!(f, "Union(")?;
                fmt_list(f, sets)?;
                write!(f, ")")
            },
            Self::Intersection(sets) => {
                write!(f, "Intersection(")?;
                fmt_list(f, sets)?;
                write!(f, ")")
            },
            Self::Image(expr) => write!(f, "ImageSet(Lambda({}, {}), Integers)", IMAGE_INDEX, expr),
        }
    }
}

impl Latex for SolutionSet {
    fn fmt_latex(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "\\emptyset"),
            Self::Reals => write!(f, "\\mathbb{{R}}"),
            Self::Complexes => write!(f, "\\mathbb{{C}}"),
            Self::Finite(members) => {
                write!(f, "\\left\\{{")?;
                fmt_latex_list(f, members, ", ")?;
                write!(f, "\\right\\}}")
            },
            Self::Interval(interval) => interval.fmt_latex(f),
            Self::Union(sets) => fmt_latex_list(f, sets, " \\cup "),
            Self::Intersection(sets) => fmt_latex_list(f, sets, " \\cap "),
            Self::Image(expr) => {
                let n = SymExpr::symbol("n");
                write!(f, "\\left\\{{")?;
                expr.subs(IMAGE_INDEX, &n).fmt_latex(f)?;
                write!(f, "\\; \\middle|\\; n \\in \\mathbb{{Z}}\\right\\}}")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finite_sets_are_sorted() {
        let set = SolutionSet::finite([SymExpr::int(2), SymExpr::int(-2), SymExpr::int(2)]);
        assert_eq!(set, SolutionSet::Finite(vec![SymExpr::int(-2), SymExpr::int(2)]));
        assert_eq!(set.to_string(), "{-2, 2}");
        assert_eq!(SolutionSet::finite([]), SolutionSet::Empty);
    }

    #[test]
    fn unions() {
        let interval = SolutionSet::Interval(Interval::new(
            SymExpr::int(0),
            SymExpr::infinity(),
            false,
            false,
        ));
        let union = SolutionSet::union([
            SolutionSet::Empty,
            SolutionSet::Finite(vec![SymExpr::int(3)]),
            interval.clone(),
            SolutionSet::Finite(vec![SymExpr::int(-1)]),
        ]);
        assert_eq!(union.to_string(), "Union({-1, 3}, [0, oo))");
        assert_eq!(SolutionSet::union([interval, SolutionSet::Reals]), SolutionSet::Reals);
        assert_eq!(SolutionSet::union([]), SolutionSet::Empty);
    }

    #[test]
    fn latex() {
        let set = SolutionSet::Finite(vec![SymExpr::int(1), SymExpr::int(2)]);
        assert_eq!(set.as_display().to_string(), "\\left\\{1, 2\\right\\}");
        assert_eq!(SolutionSet::Empty.as_display().to_string(), "\\emptyset");
    }
}
