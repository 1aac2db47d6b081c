//! Inequalities over the real numbers.
//!
//! The sign of `lhs - rhs` can only change at its zeros and at the zeros of its denominator (the
//! _critical points_). The real line is split at the critical points, the sign is tested once in
//! each piece, and the pieces where the relation holds are joined into intervals.

use mathnote_error::Error;
use std::cmp::Ordering;
use super::{
    cannot_solve,
    Domain,
    Interval,
    SolutionSet,
    Solver,
};
use super::super::{
    expand::{numer_denom, together},
    expr::SymExpr,
    numeric,
    relation::Relation,
    simplify,
};

/// A piece of the real line: the open interval between two consecutive critical points, or a
/// critical point itself.
#[derive(Debug, Clone)]
enum Piece {
    Between(SymExpr, SymExpr),
    At(SymExpr),
}

impl Piece {
    /// The point at which the sign of the expression is tested.
    fn test_point(&self) -> Option<f64> {
        match self {
            Self::Between(start, end) => {
                match (start.is_neg_infinity(), end.is_infinity()) {
                    (true, true) => Some(0.0),
                    (true, false) => Some(numeric::eval_f64(end)? - 1.0),
                    (false, true) => Some(numeric::eval_f64(start)? + 1.0),
                    (false, false) => {
                        Some((numeric::eval_f64(start)? + numeric::eval_f64(end)?) / 2.0)
                    },
                }
            },
            Self::At(point) => numeric::eval_f64(point),
        }
    }
}

/// Collects the real zeros of the expression, which must be finitely many numbers.
fn critical_points(solver: &Solver, expr: &SymExpr) -> Result<Vec<(f64, SymExpr)>, Error> {
    if !expr.contains_symbol(solver.var) {
        return Ok(Vec::new());
    }
    let zeros = solver.zeros(expr, 0)?;
    let Some(members) = zeros.as_finite() else {
        return solver.fail();
    };
    members.iter()
        .map(|member| match numeric::eval_f64(member) {
            Some(value) => Ok((value, member.clone())),
            None => solver.fail(),
        })
        .collect()
}

/// Solves an inequality, or an inequation `lhs != rhs`, over the real numbers.
pub fn solve_real(relation: &Relation, var: &str) -> Result<SolutionSet, Error> {
    let f = simplify(&relation.difference());
    if !f.contains_symbol(var) {
        let sign = numeric::eval_real(&f)
            .and_then(|value| value.cmp0())
            .ok_or_else(|| cannot_solve(relation, var))?;
        return Ok(if relation.kind.holds_for_sign(sign) {
            SolutionSet::Reals
        } else {
            SolutionSet::Empty
        });
    }

    let solver = Solver::new(relation, var, Domain::Reals);
    let (numer, denom) = numer_denom(&together(&f));
    let poles = critical_points(&solver, &denom)?;
    let mut points = critical_points(&solver, &numer)?;
    points.extend(poles.iter().cloned());
    points.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    points.dedup_by(|(_, a), (_, b)| a == b);

    let mut pieces = Vec::with_capacity(2 * points.len() + 1);
    let mut start = SymExpr::neg_infinity();
    for (_, point) in points {
        pieces.push(Piece::Between(start, point.clone()));
        pieces.push(Piece::At(point.clone()));
        start = point;
    }
    pieces.push(Piece::Between(start, SymExpr::infinity()));

    let holds = pieces.iter()
        .map(|piece| {
            if let Piece::At(point) = piece {
                if poles.iter().any(|(_, pole)| pole == point) {
                    return false;
                }
            }
            let Some(at) = piece.test_point() else {
                return false;
            };
            numeric::eval_real(&f.subs(var, &SymExpr::float(at)))
                .and_then(|value| value.cmp0())
                .is_some_and(|sign| relation.kind.holds_for_sign(sign))
        })
        .collect::<Vec<_>>();

    Ok(join(&pieces, &holds))
}

/// Joins consecutive pieces where the relation holds into intervals.
fn join(pieces: &[Piece], holds: &[bool]) -> SolutionSet {
    let mut sets = Vec::new();
    let mut run: Option<(SymExpr, bool)> = None;

    for (i, piece) in pieces.iter().enumerate() {
        if holds[i] {
            if run.is_none() {
                run = Some(match piece {
                    Piece::Between(start, _) => (start.clone(), true),
                    Piece::At(point) => (point.clone(), false),
                });
            }
            if i + 1 < pieces.len() && holds[i + 1] {
                continue;
            }
        } else {
            continue;
        }

        // the run ends with this piece
        let Some((start, left_open)) = run.take() else {
            continue;
        };
        let (end, right_open) = match piece {
            Piece::Between(_, end) => (end.clone(), true),
            Piece::At(point) => (point.clone(), false),
        };
        let interval = Interval::new(start, end, left_open, right_open);
        sets.push(if interval.is_reals() {
            SolutionSet::Reals
        } else if interval.start == interval.end {
            SolutionSet::Finite(vec![interval.start])
        } else {
            SolutionSet::Interval(interval)
        });
    }

    SolutionSet::union(sets)
}
