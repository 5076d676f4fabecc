//! Newton polytope vertex reduction.
//!
//! The Newton polyhedron of a point set `S` is `conv(S) + R^n_{>=0}`. A point
//! `p` of `S` is one of its vertices iff `p` is not in
//! `conv(S \ {p}) + R^n_{>=0}`, i.e. there are no convex weights `λ` on the
//! other points with `Σ λ_q q <= p` componentwise.
//!
//! ## Algorithm
//!
//! 1. Domination pass: drop `p` when some other `q <= p` componentwise.
//!    Cheap and removes most non-vertices in practice.
//! 2. Exact pass: for each survivor, solve the feasibility problem
//!    `Σ λ_q q + s = p, Σ λ_q = 1, λ, s >= 0` with the rational simplex.
//!
//! Non-vertices are removed all at once; the polyhedron is generated by its
//! vertices, so testing each point against every other survivor is sound.

use serde::{Deserialize, Serialize};

use super::simplex::Feasibility;
use crate::core::{Point, PointSet};

/// How thoroughly to reduce a point set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReductionMode {
    /// Exact Newton polytope vertices.
    #[default]
    Exact,
    /// Only the domination pass. Keeps every point not dominated
    /// coordinate-wise, which may include non-vertices.
    Domination,
}

/// Computes the vertices of the Newton polytope of a point set.
///
/// ```
/// use hironaka_engine::core::PointSet;
/// use hironaka_engine::geometry::VertexReducer;
///
/// // (1,1) lies on the segment between (2,0) and (0,2)
/// let set = PointSet::new(2, vec![vec![2, 0], vec![0, 2], vec![1, 1]]).unwrap();
/// let reduced = VertexReducer::new().reduce(&set);
/// assert_eq!(reduced.to_vecs(), vec![vec![0, 2], vec![2, 0]]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexReducer {
    mode: ReductionMode,
}

impl VertexReducer {
    /// Exact reducer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reducer with the given mode.
    #[must_use]
    pub fn with_mode(mode: ReductionMode) -> Self {
        Self { mode }
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> ReductionMode {
        self.mode
    }

    /// Keep only the vertices of the Newton polytope.
    ///
    /// The result is a non-empty subset of `set`, and reducing it again
    /// changes nothing.
    #[must_use]
    pub fn reduce(&self, set: &PointSet) -> PointSet {
        if set.is_singleton() {
            return set.clone();
        }

        let minimal: Vec<&Point> = set
            .iter()
            .filter(|p| !set.iter().any(|q| q != *p && q.le_componentwise(p)))
            .collect();

        let vertices: Vec<&Point> = match self.mode {
            ReductionMode::Domination => minimal,
            ReductionMode::Exact => minimal
                .iter()
                .copied()
                .filter(|p| {
                    let others: Vec<&Point> =
                        minimal.iter().copied().filter(|q| q != p).collect();
                    let keep = !in_upper_hull(p, &others);
                    if !keep {
                        log::trace!("dropping {} from Newton polytope", p);
                    }
                    keep
                })
                .collect(),
        };

        // A lexicographically smallest minimal point is always a vertex, so
        // `retain` never empties the set.
        set.retain(|p| vertices.contains(&p))
            .unwrap_or_else(|_| set.clone())
    }

    /// True if `point` is a vertex of the Newton polytope of `set`.
    ///
    /// `point` need not belong to `set`; it is compared against every other
    /// member.
    #[must_use]
    pub fn is_vertex(&self, point: &Point, set: &PointSet) -> bool {
        let others: Vec<&Point> = set.iter().filter(|q| *q != point).collect();
        if others.iter().any(|q| q.le_componentwise(point)) {
            return false;
        }
        match self.mode {
            ReductionMode::Domination => true,
            ReductionMode::Exact => !in_upper_hull(point, &others),
        }
    }
}

/// Is `p` in `conv(others) + R^n_{>=0}`?
fn in_upper_hull(p: &Point, others: &[&Point]) -> bool {
    if others.is_empty() {
        return false;
    }

    let n = p.dimension();
    let m = others.len();
    // Variables: λ_1..λ_m, then slacks s_1..s_n.
    let mut lp = Feasibility::new(m + n);

    for k in 0..n {
        let mut row = vec![0i64; m + n];
        for (j, q) in others.iter().enumerate() {
            row[j] = q.coords()[k];
        }
        row[m + k] = 1;
        lp = lp.constraint(&row, p.coords()[k]);
    }

    let mut weights = vec![0i64; m + n];
    weights[..m].fill(1);
    lp = lp.constraint(&weights, 1);

    lp.is_feasible()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(dim: usize, points: &[&[i64]]) -> PointSet {
        PointSet::new(dim, points.iter().map(|p| p.to_vec())).unwrap()
    }

    #[test]
    fn test_singleton_unchanged() {
        let s = set(2, &[&[3, 3]]);
        assert_eq!(VertexReducer::new().reduce(&s), s);
    }

    #[test]
    fn test_dominated_point_removed() {
        let s = set(2, &[&[1, 1], &[2, 3]]);
        let reduced = VertexReducer::new().reduce(&s);
        assert_eq!(reduced.to_vecs(), vec![vec![1, 1]]);
    }

    #[test]
    fn test_segment_midpoint_removed() {
        let s = set(2, &[&[4, 0], &[0, 4], &[2, 2]]);
        let reduced = VertexReducer::new().reduce(&s);
        assert_eq!(reduced.to_vecs(), vec![vec![0, 4], vec![4, 0]]);
    }

    #[test]
    fn test_point_above_segment_removed() {
        // (2,3) sits above the segment (0,4)-(4,0) but dominates nothing
        let s = set(2, &[&[4, 0], &[0, 4], &[2, 3]]);
        let reduced = VertexReducer::new().reduce(&s);
        assert_eq!(reduced.cardinality(), 2);
        assert!(!reduced.contains(&Point::from([2, 3])));
    }

    #[test]
    fn test_point_below_segment_kept() {
        let s = set(2, &[&[4, 0], &[0, 4], &[1, 1]]);
        let reduced = VertexReducer::new().reduce(&s);
        assert_eq!(reduced, s);
    }

    #[test]
    fn test_domination_mode_keeps_non_vertices() {
        let s = set(2, &[&[4, 0], &[0, 4], &[2, 2]]);
        let reduced = VertexReducer::with_mode(ReductionMode::Domination).reduce(&s);
        assert_eq!(reduced.cardinality(), 3);
    }

    #[test]
    fn test_three_dimensional_interior() {
        // (1,1,1) = average of the three unit-scaled axis points (3,0,0),(0,3,0),(0,0,3)
        let s = set(3, &[&[3, 0, 0], &[0, 3, 0], &[0, 0, 3], &[1, 1, 1]]);
        let reduced = VertexReducer::new().reduce(&s);
        assert_eq!(reduced.cardinality(), 3);
        assert!(!reduced.contains(&Point::from([1, 1, 1])));
    }

    #[test]
    fn test_idempotent() {
        let s = set(3, &[&[5, 0, 1], &[0, 4, 2], &[2, 2, 2], &[1, 1, 7], &[3, 3, 0]]);
        let reducer = VertexReducer::new();
        let once = reducer.reduce(&s);
        assert_eq!(reducer.reduce(&once), once);
    }

    #[test]
    fn test_is_vertex() {
        let s = set(2, &[&[4, 0], &[0, 4]]);
        let reducer = VertexReducer::new();
        assert!(reducer.is_vertex(&Point::from([1, 1]), &s));
        assert!(!reducer.is_vertex(&Point::from([2, 2]), &s));
        assert!(reducer.is_vertex(&Point::from([4, 0]), &s));
    }
}
