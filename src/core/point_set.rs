//! Canonical game state: a deduplicated set of lattice points.
//!
//! ## Representation
//!
//! Points live in an `im::OrdSet`, which gives:
//! - Set semantics (duplicates collapse on insert)
//! - Canonical lexicographic iteration order, so observations are stable
//! - O(1) clones, so every operation can return a fresh snapshot
//!
//! ## Invariants
//!
//! - Every point has exactly `dimension` coordinates
//! - The set is never empty
//! - `dimension >= 2`

use im::OrdSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::GameError;
use super::point::Point;
use super::rng::GameRng;

/// Immutable snapshot of a game state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointSet {
    dimension: usize,
    points: OrdSet<Point>,
}

impl PointSet {
    /// Create a point set, collapsing duplicates.
    ///
    /// ## Errors
    ///
    /// - `UnsupportedDimension` if `dimension < 2`
    /// - `DimensionMismatch` if a point has the wrong length
    /// - `EmptyState` if `points` is empty
    ///
    /// ```
    /// use hironaka_engine::core::PointSet;
    ///
    /// let set = PointSet::new(2, vec![vec![1, 0], vec![0, 1], vec![1, 0]]).unwrap();
    /// assert_eq!(set.cardinality(), 2);
    /// ```
    pub fn new<I, P>(dimension: usize, points: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        if dimension < 2 {
            return Err(GameError::UnsupportedDimension(dimension));
        }

        let mut set = OrdSet::new();
        for (index, point) in points.into_iter().enumerate() {
            let point = point.into();
            if point.dimension() != dimension {
                return Err(GameError::DimensionMismatch {
                    index,
                    expected: dimension,
                    found: point.dimension(),
                });
            }
            set.insert(point);
        }

        Self::from_ord_set(dimension, set)
    }

    /// Sample `num_points` points with coordinates in `[0, max_value)`.
    ///
    /// Duplicates collapse, so the result may hold fewer points than
    /// requested, but never zero.
    pub fn random(
        rng: &mut GameRng,
        num_points: usize,
        dimension: usize,
        max_value: i64,
    ) -> Result<Self, GameError> {
        if num_points == 0 {
            return Err(GameError::EmptyState);
        }
        let max_value = max_value.max(1);
        let points = (0..num_points).map(|_| {
            (0..dimension)
                .map(|_| rng.gen_range_i64(0..max_value))
                .collect::<Vec<i64>>()
        });
        Self::new(dimension, points.collect::<Vec<_>>())
    }

    pub(crate) fn from_ord_set(dimension: usize, points: OrdSet<Point>) -> Result<Self, GameError> {
        if points.is_empty() {
            return Err(GameError::EmptyState);
        }
        Ok(Self { dimension, points })
    }

    // === Queries ===

    /// Number of distinct points.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.points.len()
    }

    /// Dimension shared by every point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }

    /// True when a single point remains.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.points.len() == 1
    }

    /// Iterate over points in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Points as plain vectors, in canonical order.
    #[must_use]
    pub fn to_vecs(&self) -> Vec<Vec<i64>> {
        self.points.iter().map(Point::to_vec).collect()
    }

    /// Largest coordinate over all points.
    #[must_use]
    pub fn max_value(&self) -> i64 {
        self.points
            .iter()
            .filter_map(Point::max_coord)
            .max()
            .unwrap_or(0)
    }

    // === Transformations ===

    /// Replace coordinate `axis` of every point by the sum over `coords`.
    ///
    /// `x'_j = x_j` for `j != axis` and `x'_axis = sum_{k in coords} x_k`.
    /// Images that coincide collapse into one point.
    ///
    /// ## Errors
    ///
    /// - `InvalidMove` if `axis` or a member of `coords` is outside `1..=dimension`
    /// - `CoordinateOverflow` if a sum exceeds `i64`
    pub fn apply_coordinate_map(&self, axis: usize, coords: &[usize]) -> Result<Self, GameError> {
        let in_range = |k: usize| (1..=self.dimension).contains(&k);
        if !in_range(axis) {
            return Err(GameError::invalid_move(format!(
                "axis {} outside 1..={}",
                axis, self.dimension
            )));
        }
        if let Some(&bad) = coords.iter().find(|&&k| !in_range(k)) {
            return Err(GameError::invalid_move(format!(
                "coordinate {} outside 1..={}",
                bad, self.dimension
            )));
        }

        let mut mapped = OrdSet::new();
        for point in self.points.iter() {
            let src = point.coords();
            let sum = coords
                .iter()
                .try_fold(0i64, |acc, &k| acc.checked_add(src[k - 1]))
                .ok_or(GameError::CoordinateOverflow { axis })?;

            let mut next: SmallVec<[i64; 4]> = SmallVec::from_slice(src);
            next[axis - 1] = sum;
            mapped.insert(Point::from_smallvec(next));
        }

        Self::from_ord_set(self.dimension, mapped)
    }

    /// Translate the set so that every coordinate's minimum becomes zero.
    #[must_use]
    pub fn reposition(&self) -> Self {
        let mins: Vec<i64> = (0..self.dimension)
            .map(|k| self.points.iter().map(|p| p.coords()[k]).min().unwrap_or(0))
            .collect();

        if mins.iter().all(|&m| m == 0) {
            return self.clone();
        }

        let points = self
            .points
            .iter()
            .map(|p| {
                let shifted: SmallVec<[i64; 4]> =
                    p.coords().iter().zip(&mins).map(|(c, m)| c - m).collect();
                Point::from_smallvec(shifted)
            })
            .collect();

        Self {
            dimension: self.dimension,
            points,
        }
    }

    /// Keep only the points matching `keep`.
    ///
    /// Returns `EmptyState` if nothing survives.
    pub(crate) fn retain(&self, keep: impl Fn(&Point) -> bool) -> Result<Self, GameError> {
        let points: OrdSet<Point> = self.points.iter().filter(|&p| keep(p)).cloned().collect();
        Self::from_ord_set(self.dimension, points)
    }
}

impl std::fmt::Display for PointSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(dim: usize, points: &[&[i64]]) -> PointSet {
        PointSet::new(dim, points.iter().map(|p| p.to_vec())).unwrap()
    }

    #[test]
    fn test_new_deduplicates() {
        let s = set(2, &[&[1, 0], &[1, 0], &[0, 1]]);
        assert_eq!(s.cardinality(), 2);
        assert_eq!(s.dimension(), 2);
        assert!(s.contains(&Point::from([0, 1])));
    }

    #[test]
    fn test_new_rejects_dimension_mismatch() {
        let err = PointSet::new(2, vec![vec![1, 0], vec![1, 2, 3]]).unwrap_err();
        assert_eq!(
            err,
            GameError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = PointSet::new(3, Vec::<Vec<i64>>::new()).unwrap_err();
        assert_eq!(err, GameError::EmptyState);
    }

    #[test]
    fn test_new_rejects_small_dimension() {
        let err = PointSet::new(1, vec![vec![1]]).unwrap_err();
        assert_eq!(err, GameError::UnsupportedDimension(1));
    }

    #[test]
    fn test_coordinate_map() {
        let s = set(2, &[&[0, 0], &[1, 0], &[0, 1]]);
        let next = s.apply_coordinate_map(1, &[1, 2]).unwrap();
        assert_eq!(next.to_vecs(), vec![vec![0, 0], vec![1, 0], vec![1, 1]]);
        // Original snapshot untouched
        assert_eq!(s.to_vecs(), vec![vec![0, 0], vec![0, 1], vec![1, 0]]);
    }

    #[test]
    fn test_coordinate_map_keeps_distinct_points_distinct() {
        let s = set(3, &[&[1, 0, 0], &[1, 1, 0], &[0, 0, 5]]);
        let next = s.apply_coordinate_map(2, &[1, 2]).unwrap();
        assert_eq!(next.to_vecs(), vec![vec![0, 0, 5], vec![1, 1, 0], vec![1, 2, 0]]);

        let s = set(2, &[&[2, 0], &[1, 1]]);
        let next = s.apply_coordinate_map(1, &[1, 2]).unwrap();
        assert_eq!(next.to_vecs(), vec![vec![2, 0], vec![2, 1]]);
    }

    #[test]
    fn test_coordinate_map_out_of_range() {
        let s = set(2, &[&[0, 1]]);
        assert!(matches!(
            s.apply_coordinate_map(3, &[1, 3]),
            Err(GameError::InvalidMove(_))
        ));
        assert!(matches!(
            s.apply_coordinate_map(0, &[0, 1]),
            Err(GameError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_coordinate_map_overflow() {
        let s = set(2, &[&[i64::MAX, 1]]);
        assert_eq!(
            s.apply_coordinate_map(1, &[1, 2]).unwrap_err(),
            GameError::CoordinateOverflow { axis: 1 }
        );
    }

    #[test]
    fn test_reposition() {
        let s = set(2, &[&[3, 5], &[4, 2]]);
        assert_eq!(s.reposition().to_vecs(), vec![vec![0, 3], vec![1, 0]]);

        let already = set(2, &[&[0, 1], &[2, 0]]);
        assert_eq!(already.reposition(), already);
    }

    #[test]
    fn test_max_value() {
        let s = set(3, &[&[3, 5, 0], &[9, 2, 1]]);
        assert_eq!(s.max_value(), 9);
    }

    #[test]
    fn test_random_is_deterministic() {
        let a = PointSet::random(&mut GameRng::new(7), 10, 3, 20).unwrap();
        let b = PointSet::random(&mut GameRng::new(7), 10, 3, 20).unwrap();
        assert_eq!(a, b);
        assert!(a.cardinality() >= 1 && a.cardinality() <= 10);
        assert!(a.iter().all(|p| p.coords().iter().all(|&c| (0..20).contains(&c))));
    }

    #[test]
    fn test_display() {
        let s = set(2, &[&[1, 0], &[0, 1]]);
        assert_eq!(s.to_string(), "{(0,1), (1,0)}");
    }
}
