//! Move representation: host subset + agent axis.
//!
//! A turn is a pair `(I, i)`:
//! - The host picks a subset `I` of coordinate indices with `|I| >= 2`
//! - The agent answers with one index `i` from `I`
//!
//! Indices are 1-based throughout the public API, matching the usual
//! `x_1, ..., x_n` notation for monomial exponents.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::GameError;

/// Largest dimension whose subsets fit a `u64` bitmask.
pub const MAX_SUBSET_DIMENSION: usize = 63;

/// The host's choice of coordinates.
///
/// Stored sorted and deduplicated, so `[2, 1, 2]` and `[1, 2]` are the same
/// subset. Validation against a state happens in the rules, not here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostSubset(SmallVec<[usize; 4]>);

impl HostSubset {
    /// Build a subset from 1-based coordinate indices.
    #[must_use]
    pub fn new(coords: &[usize]) -> Self {
        let mut inner: SmallVec<[usize; 4]> = SmallVec::from_slice(coords);
        inner.sort_unstable();
        inner.dedup();
        Self(inner)
    }

    /// Build a subset from a multi-binary mask (`mask[k]` selects axis `k + 1`).
    #[must_use]
    pub fn from_mask(mask: &[bool]) -> Self {
        Self(
            mask.iter()
                .enumerate()
                .filter(|&(_, &on)| on)
                .map(|(k, _)| k + 1)
                .collect(),
        )
    }

    /// The subset of every coordinate `1..=dimension`.
    #[must_use]
    pub fn all(dimension: usize) -> Self {
        Self((1..=dimension).collect())
    }

    /// Every legal host subset (`|I| >= 2`) of `1..=dimension`.
    ///
    /// Subsets come out in ascending order of their bitmask, where bit `k`
    /// selects axis `k + 1`. There are `2^n - n - 1` of them. Dimensions
    /// above `MAX_SUBSET_DIMENSION` are rejected.
    pub fn enumerate(dimension: usize) -> Result<impl Iterator<Item = HostSubset>, GameError> {
        if dimension > MAX_SUBSET_DIMENSION {
            return Err(GameError::UnsupportedDimension(dimension));
        }
        let limit = 1u64 << dimension;
        Ok((0..limit)
            .filter(|bits| bits.count_ones() >= 2)
            .map(move |bits| Self((0..dimension).filter(|k| (bits >> k) & 1 == 1).map(|k| k + 1).collect())))
    }

    /// Bitmask with bit `k` set for axis `k + 1`.
    #[must_use]
    pub fn to_bits(&self) -> u64 {
        self.0
            .iter()
            .filter(|&&axis| (1..=64).contains(&axis))
            .fold(0, |bits, &axis| bits | 1 << (axis - 1))
    }

    /// Multi-binary mask of length `dimension`.
    #[must_use]
    pub fn to_mask(&self, dimension: usize) -> Vec<bool> {
        (1..=dimension).map(|axis| self.contains(axis)).collect()
    }

    /// Number of chosen coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no coordinate is chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check membership of a 1-based axis.
    #[must_use]
    pub fn contains(&self, axis: usize) -> bool {
        self.0.binary_search(&axis).is_ok()
    }

    /// Chosen axes in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Iterate over the chosen axes.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl From<&[usize]> for HostSubset {
    fn from(coords: &[usize]) -> Self {
        Self::new(coords)
    }
}

impl FromIterator<usize> for HostSubset {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut inner: SmallVec<[usize; 4]> = iter.into_iter().collect();
        inner.sort_unstable();
        inner.dedup();
        Self(inner)
    }
}

impl From<Vec<usize>> for HostSubset {
    fn from(coords: Vec<usize>) -> Self {
        Self::new(&coords)
    }
}

impl<const N: usize> From<[usize; N]> for HostSubset {
    fn from(coords: [usize; N]) -> Self {
        Self::new(&coords)
    }
}

impl std::fmt::Display for HostSubset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, axis) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", axis)?;
        }
        write!(f, "}}")
    }
}

/// A complete turn, recorded for trajectories and replay.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Host's subset `I`.
    pub subset: HostSubset,

    /// Agent's axis `i` (1-based, member of `subset`).
    pub axis: usize,
}

impl Move {
    /// Create a new move record.
    #[must_use]
    pub fn new(subset: HostSubset, axis: usize) -> Self {
        Self { subset, axis }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_is_canonical() {
        let a = HostSubset::new(&[3, 1, 3]);
        let b = HostSubset::from([1, 3]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.as_slice(), &[1, 3]);
    }

    #[test]
    fn test_subset_mask_roundtrip() {
        let subset = HostSubset::from_mask(&[true, false, true]);
        assert_eq!(subset.as_slice(), &[1, 3]);
        assert_eq!(subset.to_mask(3), vec![true, false, true]);
    }

    #[test]
    fn test_subset_all() {
        let subset = HostSubset::all(4);
        assert_eq!(subset.as_slice(), &[1, 2, 3, 4]);
        assert!(subset.contains(4));
        assert!(!subset.contains(5));
    }

    #[test]
    fn test_enumerate_counts_and_order() {
        let subsets: Vec<HostSubset> = HostSubset::enumerate(3).unwrap().collect();
        assert_eq!(subsets.len(), 4);
        assert_eq!(subsets[0].as_slice(), &[1, 2]);
        assert_eq!(subsets[1].as_slice(), &[1, 3]);
        assert_eq!(subsets[2].as_slice(), &[2, 3]);
        assert_eq!(subsets[3].as_slice(), &[1, 2, 3]);

        assert_eq!(HostSubset::enumerate(5).unwrap().count(), 32 - 5 - 1);
        assert!(HostSubset::enumerate(5).unwrap().all(|s| s.len() >= 2));
    }

    #[test]
    fn test_enumerate_rejects_oversized_dimension() {
        assert!(HostSubset::enumerate(MAX_SUBSET_DIMENSION).is_ok());
        assert!(matches!(
            HostSubset::enumerate(64),
            Err(GameError::UnsupportedDimension(64))
        ));
        assert!(HostSubset::enumerate(200).is_err());
    }

    #[test]
    fn test_collect_from_unordered_iterator() {
        let coords: std::collections::HashSet<usize> = [3, 1, 2].into_iter().collect();
        let subset: HostSubset = coords.into_iter().collect();
        assert_eq!(subset, HostSubset::from([1, 2, 3]));

        let subset: HostSubset = [2, 2, 1].into_iter().collect();
        assert_eq!(subset.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_to_bits() {
        assert_eq!(HostSubset::from([1, 3]).to_bits(), 0b101);
        assert_eq!(HostSubset::all(4).to_bits(), 0b1111);
    }

    #[test]
    fn test_display() {
        assert_eq!(HostSubset::from([2, 1]).to_string(), "{1,2}");
    }

    #[test]
    fn test_move_serialization() {
        let mv = Move::new(HostSubset::from([1, 2]), 2);
        let json = serde_json::to_string(&mv).unwrap();
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(mv, back);
    }
}
