use crate::counts::{LogBase, PairCounts, Pairing, TypeMatrix};
use crate::distance::{check_input, DistanceMatrix, LinkMatrix};
use crate::error::{ConfigError, Error, Result};
use crate::grid::GridIndex;
use crate::types::TypeSet;
use log::debug;

/// Which point pairs count as co-occurring: those whose distance lies in a closed interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
    /// Pairs within distance 10, the conventional default.
    Default,
    /// Pairs at distance `0..=d`, which includes every point paired with itself.
    UpTo(f64),
    /// Pairs at distance `lo..=hi`.
    Between(f64, f64),
}

impl Default for Distance {
    fn default() -> Self {
        Distance::Default
    }
}

impl From<f64> for Distance {
    fn from(d: f64) -> Self {
        Distance::UpTo(d)
    }
}

impl From<(f64, f64)> for Distance {
    fn from((lo, hi): (f64, f64)) -> Self {
        Distance::Between(lo, hi)
    }
}

impl Distance {
    /// Returns the closed interval `(lo, hi)`, after checking it makes sense.
    pub fn bounds(&self) -> std::result::Result<(f64, f64), ConfigError> {
        let (lo, hi) = match *self {
            Distance::Default => (0.0, 10.0),
            Distance::UpTo(hi) => (0.0, hi),
            Distance::Between(lo, hi) => (lo, hi),
        };
        if lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo <= hi {
            Ok((lo, hi))
        } else {
            Err(ConfigError::InvalidInterval { lo, hi })
        }
    }
}

/// How linked pairs are found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backend {
    /// Compute every pairwise distance, then reduce the link matrix by type. Needs `O(N^2)`
    /// memory.
    Dense,
    /// Query a [`GridIndex`] for pairs within the upper distance bound. Needs memory
    /// proportional to the number of links found, and gives the same counts as `Dense`.
    Grid,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Dense
    }
}

/// The links that were counted, kept for inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum Adjacency {
    /// The full link matrix, from [`Backend::Dense`].
    Dense(LinkMatrix),
    /// Every linked `(i, j)` in row-major order, from [`Backend::Grid`].
    Sparse(Vec<(usize, usize)>),
}

impl Adjacency {
    /// The number of linked ordered pairs.
    pub fn link_count(&self) -> usize {
        match self {
            Adjacency::Dense(links) => links.count(),
            Adjacency::Sparse(pairs) => pairs.len(),
        }
    }

    /// Returns every linked `(i, j)` in row-major order.
    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        match self {
            Adjacency::Dense(links) => links.iter().collect(),
            Adjacency::Sparse(pairs) => pairs.clone(),
        }
    }
}

/// Settings for computing Leibovici entropy: the Shannon entropy of the types of point pairs
/// found within a distance interval.
#[derive(Clone, Debug, Default)]
pub struct Leibovici {
    /// Which pairs co-occur.
    pub distance: Distance,
    /// Whether (A, B) and (B, A) are distinct.
    pub pairing: Pairing,
    /// Base of the reported entropy.
    pub base: LogBase,
    /// How pairs are found.
    pub backend: Backend,
}

impl Leibovici {
    /// Default settings: pairs within distance 10, unordered, in nats, dense backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the co-occurrence distance.
    pub fn distance<D: Into<Distance>>(mut self, distance: D) -> Self {
        self.distance = distance.into();
        self
    }

    /// Sets whether pairs are ordered.
    pub fn pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Sets the logarithm base.
    pub fn base(mut self, base: LogBase) -> Self {
        self.base = base;
        self
    }

    /// Sets how pairs are found.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Computes the entropy for points whose types are given by `types`.
    ///
    /// ```
    /// use spatial_entropy::Leibovici;
    ///
    /// let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [10.0, 10.0]];
    /// let result = Leibovici::new().distance(2.0).compute(&points, &["A", "A", "B", "B"]).unwrap();
    ///
    /// // Counting both directions and each point with itself: AA 4, AB 4, BB 2.
    /// let p = [0.4f64, 0.4, 0.2];
    /// let expected: f64 = p.iter().map(|p| -p * p.ln()).sum();
    /// assert!((result.entropy - expected).abs() < 1e-9);
    /// ```
    pub fn compute<P, L>(&self, points: &[P], types: &[L]) -> Result<LeiboviciEntropy<L>>
    where
        P: AsRef<[f64]>,
        L: Ord + Clone,
    {
        check_input(points, types)?;
        let (lo, hi) = self.distance.bounds()?;
        let (type_set, codes) = TypeSet::encode(types);

        let (pair_counts, adjacency) = match self.backend {
            Backend::Dense => {
                let links = DistanceMatrix::pairwise(points).links(|d| lo <= d && d <= hi);
                let reduced = TypeMatrix::reduce(&links, &codes, type_set.len());
                let counts = PairCounts::from_type_matrix(&reduced, self.pairing);
                (counts, Adjacency::Dense(links))
            }
            Backend::Grid => {
                let mut pairs: Vec<(usize, usize)> = GridIndex::new(points, hi)
                    .neighbors()
                    .filter(|&(_, _, d)| d >= lo)
                    .map(|(i, j, _)| (i, j))
                    .collect();
                pairs.sort_unstable();
                let counts = PairCounts::from_pairs(
                    pairs.iter().copied(),
                    &codes,
                    type_set.len(),
                    self.pairing,
                );
                (counts, Adjacency::Sparse(pairs))
            }
        };

        let summary = pair_counts.summary();
        debug!(
            "leibovici: {} points, {} types, {} links in [{}, {}] over {} pair types",
            points.len(),
            type_set.len(),
            summary.total,
            lo,
            hi,
            summary.support
        );
        if summary.total == 0 {
            return Err(Error::NoPairs { lo, hi });
        }

        Ok(LeiboviciEntropy {
            entropy: summary.entropy_in(self.base),
            pair_counts,
            types: type_set,
            adjacency,
        })
    }
}

/// The result of [`Leibovici::compute`].
#[derive(Clone, Debug)]
pub struct LeiboviciEntropy<L> {
    /// The entropy, in the requested base. Zero if only one pair type occurs.
    pub entropy: f64,
    /// How many links were found for each pair of types, indexed into `types`.
    pub pair_counts: PairCounts,
    /// The distinct point types.
    pub types: TypeSet<L>,
    /// The links that were counted.
    pub adjacency: Adjacency,
}

impl<L> LeiboviciEntropy<L> {
    /// Returns every pair of type labels with its count, in key order, including zero counts.
    pub fn labelled_counts(&self) -> impl Iterator<Item = (&L, &L, u64)> + '_ {
        self.pair_counts.iter().map(move |(key, count)| {
            (
                self.types.label(key.first),
                self.types.label(key.second),
                count,
            )
        })
    }
}

/// Computes Leibovici entropy with the given settings.
///
/// `ordered` selects whether (A, B) and (B, A) pairs are distinct, and `base` is the logarithm
/// base of the result.
pub fn leibovici_entropy<P, L, D>(
    points: &[P],
    types: &[L],
    distance: D,
    ordered: bool,
    base: f64,
) -> Result<LeiboviciEntropy<L>>
where
    P: AsRef<[f64]>,
    L: Ord + Clone,
    D: Into<Distance>,
{
    Leibovici::new()
        .distance(distance)
        .pairing(Pairing::from_ordered(ordered))
        .base(LogBase::new(base)?)
        .compute(points, types)
}
