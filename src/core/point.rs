//! Lattice points: exponent vectors of monomials.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An integer vector of fixed dimension.
///
/// Coordinates are stored inline for up to four dimensions, which covers
/// the usual game sizes without heap allocation.
///
/// ```
/// use hironaka_engine::core::Point;
///
/// let p = Point::from([1, 0, 2]);
/// assert_eq!(p.dimension(), 3);
/// assert_eq!(p.coord(3), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point(SmallVec<[i64; 4]>);

impl Point {
    /// Create a point from its coordinates.
    #[must_use]
    pub fn new(coords: &[i64]) -> Self {
        Self(SmallVec::from_slice(coords))
    }

    /// Number of coordinates.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Coordinates as a slice.
    #[must_use]
    pub fn coords(&self) -> &[i64] {
        &self.0
    }

    /// Coordinate at a 1-based axis.
    #[must_use]
    pub fn coord(&self, axis: usize) -> Option<i64> {
        axis.checked_sub(1).and_then(|i| self.0.get(i).copied())
    }

    /// Largest coordinate (`None` for the zero-dimensional point).
    #[must_use]
    pub fn max_coord(&self) -> Option<i64> {
        self.0.iter().copied().max()
    }

    /// True if every coordinate is at most the matching coordinate of `other`.
    #[must_use]
    pub fn le_componentwise(&self, other: &Point) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// Copy the coordinates into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        self.0.to_vec()
    }

    pub(crate) fn from_smallvec(coords: SmallVec<[i64; 4]>) -> Self {
        Self(coords)
    }
}

impl From<Vec<i64>> for Point {
    fn from(coords: Vec<i64>) -> Self {
        Self(SmallVec::from_vec(coords))
    }
}

impl From<&[i64]> for Point {
    fn from(coords: &[i64]) -> Self {
        Self::new(coords)
    }
}

impl<const N: usize> From<[i64; N]> for Point {
    fn from(coords: [i64; N]) -> Self {
        Self::new(&coords)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_coords() {
        let p = Point::from(vec![4, 5]);
        assert_eq!(p.dimension(), 2);
        assert_eq!(p.coord(1), Some(4));
        assert_eq!(p.coord(2), Some(5));
        assert_eq!(p.coord(0), None);
        assert_eq!(p.coord(3), None);
        assert_eq!(p.max_coord(), Some(5));
    }

    #[test]
    fn test_point_ordering_is_lexicographic() {
        let a = Point::from([0, 9]);
        let b = Point::from([1, 0]);
        assert!(a < b);
    }

    #[test]
    fn test_le_componentwise() {
        let a = Point::from([1, 2]);
        assert!(a.le_componentwise(&Point::from([1, 3])));
        assert!(!a.le_componentwise(&Point::from([0, 3])));
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::from([3, 0, 1]).to_string(), "(3,0,1)");
    }
}
