use crate::distance::LinkMatrix;
use crate::error::ConfigError;
use sorted_iter::assume::AssumeSortedByKeyExt;
use sorted_iter::sorted_pair_iterator::SortedByKey;
use std::iter;

/// Identifies one combination of two point types, by their positions in a
/// [`TypeSet`][crate::TypeSet].
///
/// Keys order lexicographically, first by `first` and then by `second`, which is also the order
/// in which every [`PairCounts`] enumerates them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PairKey {
    /// Type of the point the pair starts from.
    pub first: usize,
    /// Type of the point the pair ends at.
    pub second: usize,
}

/// Whether a pair of types is directional.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Pairing {
    /// (A, B) and (B, A) are counted separately.
    Ordered,
    /// (A, B) and (B, A) are merged into the key whose first type sorts first.
    Unordered,
}

impl Default for Pairing {
    fn default() -> Self {
        Pairing::Unordered
    }
}

impl Pairing {
    /// Maps the boolean `order` flag of the public entry points onto a pairing.
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            Pairing::Ordered
        } else {
            Pairing::Unordered
        }
    }

    /// Returns the key under which a link from a point of type `a` to a point of type `b` is
    /// counted.
    pub fn key(self, a: usize, b: usize) -> PairKey {
        match self {
            Pairing::Unordered if b < a => PairKey {
                first: b,
                second: a,
            },
            _ => PairKey {
                first: a,
                second: b,
            },
        }
    }
}

/// A table of how many linked point pairs were seen for each combination of types.
///
/// Every key the pairing allows is present from the start with a count of zero, so two tables
/// built over the same type set always have the same keys in the same order: `T * T` keys when
/// ordered, `T * (T + 1) / 2` keys when unordered.
///
/// ```
/// use spatial_entropy::{PairCounts, PairKey, Pairing};
///
/// let mut counts = PairCounts::new(Pairing::Unordered, 2);
/// counts.add(1, 0, 3).add(0, 1, 1).add(1, 1, 2);
///
/// let cells: Vec<_> = counts.iter().collect();
/// assert_eq!(
///     cells,
///     vec![
///         (PairKey { first: 0, second: 0 }, 0),
///         (PairKey { first: 0, second: 1 }, 4),
///         (PairKey { first: 1, second: 1 }, 2),
///     ]
/// );
/// assert_eq!(counts.total(), 6);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PairCounts {
    pairing: Pairing,
    types: usize,
    counts: Vec<u64>,
}

impl PairCounts {
    /// Creates a table with every count set to zero.
    pub fn new(pairing: Pairing, types: usize) -> Self {
        let len = match pairing {
            Pairing::Ordered => types * types,
            Pairing::Unordered => types * (types + 1) / 2,
        };
        PairCounts {
            pairing,
            types,
            counts: vec![0; len],
        }
    }

    /// Counts the true entries of a point-level link matrix, given the type index of every point.
    ///
    /// This is the direct counting strategy: every link is visited once.
    pub fn from_links(links: &LinkMatrix, codes: &[usize], types: usize, pairing: Pairing) -> Self {
        debug_assert_eq!(links.len(), codes.len());
        PairCounts::from_pairs(links.iter(), codes, types, pairing)
    }

    /// Counts an arbitrary list of linked point pairs, given as point indices.
    ///
    /// This is how neighbour lists from a radius query get counted without ever building a
    /// matrix.
    pub fn from_pairs<I>(pairs: I, codes: &[usize], types: usize, pairing: Pairing) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut counts = PairCounts::new(pairing, types);
        for (i, j) in pairs {
            counts.add(codes[i], codes[j], 1);
        }
        counts
    }

    /// Counts a type-level matrix produced by [`TypeMatrix::reduce`].
    pub fn from_type_matrix(matrix: &TypeMatrix, pairing: Pairing) -> Self {
        let mut counts = PairCounts::new(pairing, matrix.types);
        for a in 0..matrix.types {
            for b in 0..matrix.types {
                let n = matrix.get(a, b);
                if n > 0 {
                    counts.add(a, b, n);
                }
            }
        }
        counts
    }

    /// How keys are formed in this table.
    pub fn pairing(&self) -> Pairing {
        self.pairing
    }

    /// The number of distinct types the table was built over.
    pub fn type_count(&self) -> usize {
        self.types
    }

    /// The number of keys in the table, including those with zero count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if the table has no keys, which only happens when there are no types.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn slot(&self, key: PairKey) -> usize {
        debug_assert!(key.first < self.types && key.second < self.types);
        match self.pairing {
            Pairing::Ordered => key.first * self.types + key.second,
            Pairing::Unordered => {
                debug_assert!(key.first <= key.second);
                // Row `first` starts after the (T - r) keys of every earlier row r.
                key.first * (2 * self.types - key.first + 1) / 2 + (key.second - key.first)
            }
        }
    }

    /// Adds `n` links from a point of type `a` to a point of type `b`.
    pub fn add(&mut self, a: usize, b: usize, n: u64) -> &mut Self {
        let slot = self.slot(self.pairing.key(a, b));
        self.counts[slot] += n;
        self
    }

    /// Returns the count for links from type `a` to type `b`. For unordered tables the order of
    /// the arguments doesn't matter.
    pub fn get(&self, a: usize, b: usize) -> u64 {
        self.counts[self.slot(self.pairing.key(a, b))]
    }

    /// The sum of all counts, which equals the number of links that were counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns an iterator over every key in the table, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = PairKey> + Clone + '_ {
        let types = self.types;
        let pairing = self.pairing;
        (0..types).flat_map(move |first| {
            let start = match pairing {
                Pairing::Ordered => 0,
                Pairing::Unordered => first,
            };
            (start..types).map(move |second| PairKey { first, second })
        })
    }

    /// Returns an iterator over every key and its count, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (PairKey, u64)> + SortedByKey + '_ {
        self.keys()
            .zip(self.counts.iter().copied())
            .assume_sorted_by_key()
    }

    /// Like [`iter`][PairCounts::iter], but skips keys whose count is zero.
    pub fn nonzero(&self) -> impl Iterator<Item = (PairKey, u64)> + SortedByKey + '_ {
        self.keys()
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
            .assume_sorted_by_key()
    }

    /// Converts the counts to probabilities, keeping every key (including zero-count ones) in
    /// order. Returns `None` if the table is empty of links.
    pub fn probabilities(&self) -> Option<Vec<(PairKey, f64)>> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some(
            self.iter()
                .map(|(key, count)| (key, count as f64 / total))
                .collect(),
        )
    }

    /// Computes a [`CountSummary`] over the non-zero cells of this table.
    pub fn summary(&self) -> CountSummary {
        self.counts.iter().copied().filter(|&c| c > 0).collect()
    }
}

/// A type-by-type matrix of link counts, built by merging the rows and then the columns of a
/// point-level link matrix which belong to points of the same type.
///
/// Counting this matrix with [`PairCounts::from_type_matrix`] gives the same table as counting
/// the point-level matrix directly with [`PairCounts::from_links`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeMatrix {
    types: usize,
    cells: Vec<u64>,
}

impl TypeMatrix {
    /// Collapses an `N * N` link matrix into a `T * T` matrix, where `codes[i]` is the index of
    /// point `i`'s type and `types` is `T`.
    pub fn reduce(links: &LinkMatrix, codes: &[usize], types: usize) -> Self {
        let n = links.len();
        debug_assert_eq!(n, codes.len());

        // First merge rows, giving a T * N matrix...
        let mut rows = vec![0u64; types * n];
        for (i, &a) in codes.iter().enumerate() {
            let row = &mut rows[a * n..(a + 1) * n];
            for (cell, linked) in row.iter_mut().zip(links.row(i)) {
                *cell += u64::from(*linked);
            }
        }

        // ...then merge columns, giving T * T.
        let mut cells = vec![0u64; types * types];
        for a in 0..types {
            for (j, &b) in codes.iter().enumerate() {
                cells[a * types + b] += rows[a * n + j];
            }
        }

        TypeMatrix { types, cells }
    }

    /// The number of types along each side of the matrix.
    pub fn types(&self) -> usize {
        self.types
    }

    /// The number of links from points of type `a` to points of type `b`.
    pub fn get(&self, a: usize, b: usize) -> u64 {
        self.cells[a * self.types + b]
    }

    /// The number of links in the matrix.
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }
}

/// A logarithm base that entropies are reported in.
///
/// The default is `e`, giving entropies in nats. Use `2.0` for bits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogBase(f64);

impl Default for LogBase {
    fn default() -> Self {
        LogBase::E
    }
}

impl LogBase {
    /// The natural logarithm.
    pub const E: LogBase = LogBase(std::f64::consts::E);

    /// Checks that `base` can be used to rescale a natural logarithm.
    ///
    /// ```
    /// use spatial_entropy::LogBase;
    ///
    /// assert!(LogBase::new(2.0).is_ok());
    /// assert!(LogBase::new(1.0).is_err());
    /// assert!(LogBase::new(0.0).is_err());
    /// assert!(LogBase::new(-3.0).is_err());
    /// assert!(LogBase::new(f64::NAN).is_err());
    /// ```
    pub fn new(base: f64) -> Result<Self, ConfigError> {
        if base.is_finite() && base > 0.0 && base != 1.0 {
            Ok(LogBase(base))
        } else {
            Err(ConfigError::InvalidLogBase(base))
        }
    }

    /// The base itself.
    pub fn value(self) -> f64 {
        self.0
    }

    /// The natural logarithm of the base; dividing a value in nats by this converts it to this
    /// base.
    pub fn ln(self) -> f64 {
        self.0.ln()
    }
}

/// Summary statistics for the non-zero counts of a distribution.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct CountSummary {
    /// The [Shannon entropy][] of the normalized counts, in nats.
    ///
    /// [Shannon entropy]: https://en.wikipedia.org/wiki/Entropy_(information_theory)
    pub entropy: f64,

    /// The sum of all counts.
    pub total: u64,

    /// How many non-zero counts there were.
    pub support: usize,
}

impl CountSummary {
    /// The entropy rescaled to the given base.
    pub fn entropy_in(&self, base: LogBase) -> f64 {
        self.entropy / base.ln()
    }
}

impl iter::FromIterator<u64> for CountSummary {
    /// Creates a summary of a distribution whose non-zero counts are provided by the iterator.
    ///
    /// ```
    /// use spatial_entropy::CountSummary;
    ///
    /// let summary: CountSummary = vec![1, 1].into_iter().collect();
    /// assert!((summary.entropy - 2f64.ln()).abs() < 1e-12);
    ///
    /// let single: CountSummary = vec![7].into_iter().collect();
    /// assert_eq!(single.entropy, 0.0);
    /// ```
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let counts: Vec<f64> = iter
            .into_iter()
            .filter(|&c| c > 0)
            .map(|c| c as f64)
            .collect();
        let total: f64 = counts.iter().sum();
        let entropy = if total > 0.0 {
            counts
                .iter()
                .map(|c| {
                    let p = c / total;
                    p * (1.0 / p).ln()
                })
                .sum()
        } else {
            0.0
        };
        CountSummary {
            entropy,
            total: total as u64,
            support: counts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_slots_follow_key_order() {
        for types in 0..6 {
            let counts = PairCounts::new(Pairing::Unordered, types);
            let slots: Vec<usize> = counts.keys().map(|key| counts.slot(key)).collect();
            assert_eq!(slots, (0..counts.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn ordered_slots_follow_key_order() {
        let counts = PairCounts::new(Pairing::Ordered, 4);
        let slots: Vec<usize> = counts.keys().map(|key| counts.slot(key)).collect();
        assert_eq!(slots, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn unordered_merges_both_directions() {
        let mut ordered = PairCounts::new(Pairing::Ordered, 3);
        let mut unordered = PairCounts::new(Pairing::Unordered, 3);
        for &(a, b, n) in &[(0, 2, 5), (2, 0, 1), (1, 1, 4), (2, 1, 3)] {
            ordered.add(a, b, n);
            unordered.add(a, b, n);
        }
        assert_eq!(ordered.total(), unordered.total());
        assert_eq!(unordered.get(0, 2), ordered.get(0, 2) + ordered.get(2, 0));
        assert_eq!(unordered.get(2, 1), 3);
        assert_eq!(unordered.get(1, 1), 4);
    }

    #[test]
    fn zero_counts_are_not_dropped() {
        let mut counts = PairCounts::new(Pairing::Ordered, 2);
        counts.add(1, 0, 2);
        assert_eq!(counts.iter().count(), 4);
        assert_eq!(counts.nonzero().count(), 1);
        let p = counts.probabilities().unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p[2], (PairKey { first: 1, second: 0 }, 1.0));
    }

    #[test]
    fn empty_table_has_no_probabilities() {
        assert!(PairCounts::new(Pairing::Unordered, 3)
            .probabilities()
            .is_none());
    }
}
