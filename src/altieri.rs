use crate::bands::{Band, Cut};
use crate::counts::{LogBase, PairCounts, PairKey, Pairing, TypeMatrix};
use crate::distance::{bounding_box_diagonal, check_input, DistanceMatrix};
use crate::error::{Error, Result};
use crate::types::TypeSet;
use log::{debug, trace};
use sorted_iter::assume::AssumeSortedByKeyExt;
use sorted_iter::SortedPairIterator;

/// Settings for computing Altieri entropy, which splits the entropy of pair types into the
/// information carried by pair distance (spatial mutual information) and what remains (spatial
/// residual entropy).
///
/// Bands are measured against the diagonal of the points' bounding box rather than the largest
/// pairwise distance; the diagonal is never smaller, so every pair at a positive distance falls
/// in some band when bands come from [`Cut::Default`] or [`Cut::Count`].
#[derive(Clone, Debug, Default)]
pub struct Altieri {
    /// How distances are split into bands.
    pub cut: Cut,
    /// Whether (A, B) and (B, A) are distinct.
    pub pairing: Pairing,
    /// Base of the reported entropies.
    pub base: LogBase,
}

impl Altieri {
    /// Default settings: two bands, unordered, in nats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how distances are split into bands.
    pub fn cut<C: Into<Cut>>(mut self, cut: C) -> Self {
        self.cut = cut.into();
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

    /// Computes the entropy decomposition for points whose types are given by `types`.
    ///
    /// ```
    /// use spatial_entropy::{Altieri, Cut};
    ///
    /// let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [10.0, 10.0]];
    /// let result = Altieri::new()
    ///     .cut(Cut::Count(1))
    ///     .compute(&points, &["A", "A", "B", "B"])
    ///     .unwrap();
    ///
    /// assert_eq!(result.bands.len(), 2);
    /// assert_eq!(result.entropy, result.mutual_info + result.residue);
    /// ```
    pub fn compute<P, L>(&self, points: &[P], types: &[L]) -> Result<AltieriEntropy<L>>
    where
        P: AsRef<[f64]>,
        L: Ord + Clone,
    {
        check_input(points, types)?;
        self.cut.validate()?;
        let (type_set, codes) = TypeSet::encode(types);
        let type_count = type_set.len();

        let distances = DistanceMatrix::pairwise(points);
        let max_distance = bounding_box_diagonal(points);

        // The baseline counts every pair of distinct locations, whatever band it falls in.
        let baseline_links = distances.links(|d| d > 0.0);
        let baseline = PairCounts::from_type_matrix(
            &TypeMatrix::reduce(&baseline_links, &codes, type_count),
            self.pairing,
        );
        let pz = baseline.probabilities().ok_or(Error::NoDistinctPairs)?;

        let bands = self.cut.partition(max_distance)?;
        let total_width: f64 = bands.iter().map(Band::width).sum();
        debug!(
            "altieri: {} points, {} types, {} baseline links, {} bands up to {}",
            points.len(),
            type_count,
            baseline.total(),
            bands.len(),
            max_distance
        );

        let mut contributions = Vec::with_capacity(bands.len());
        for band in bands {
            let links = distances.links(|d| band.contains(d));
            let pair_counts = PairCounts::from_type_matrix(
                &TypeMatrix::reduce(&links, &codes, type_count),
                self.pairing,
            );
            let (entropy, mutual_info) = band_terms(&pair_counts, &pz, self.base);
            let weight = band.width() / total_width;
            trace!(
                "band ({}, {}]: weight {}, {} links, H {}, PI {}",
                band.lo,
                band.hi,
                weight,
                pair_counts.total(),
                entropy,
                mutual_info
            );
            contributions.push(BandEntropy {
                band,
                weight,
                pair_counts,
                entropy,
                mutual_info,
            });
        }

        if contributions.iter().all(|b| b.pair_counts.total() == 0) {
            if let (Some(first), Some(last)) = (contributions.first(), contributions.last()) {
                return Err(Error::NoPairs {
                    lo: first.band.lo,
                    hi: last.band.hi,
                });
            }
        }

        let residue: f64 = contributions.iter().map(|b| b.weight * b.entropy).sum();
        let mutual_info: f64 = contributions.iter().map(|b| b.weight * b.mutual_info).sum();

        Ok(AltieriEntropy::new(
            mutual_info,
            residue,
            contributions,
            baseline,
            type_set,
            max_distance,
        ))
    }
}

/// Returns the entropy of the pair types within one band, and the divergence of that
/// distribution from the baseline, both in the given base.
///
/// A band with no links contributes nothing to either term.
fn band_terms(counts: &PairCounts, baseline: &[(PairKey, f64)], base: LogBase) -> (f64, f64) {
    let total = counts.total();
    if total == 0 {
        return (0.0, 0.0);
    }
    let total = total as f64;

    let (entropy, divergence, matched) = counts
        .nonzero()
        .join(baseline.iter().copied().assume_sorted_by_key())
        .fold((0.0, 0.0, 0), |(h, pi, n), (_, (count, pz))| {
            let v = count as f64 / total;
            (h + v * (1.0 / v).ln(), pi + v * (v / pz).ln(), n + 1)
        });

    // Band links are a subset of baseline links, so no band key can be missing a baseline
    // probability.
    debug_assert_eq!(matched, counts.nonzero().count());

    (entropy / base.ln(), divergence / base.ln())
}

/// One band's share of an [`AltieriEntropy`].
#[derive(Clone, Debug)]
pub struct BandEntropy {
    /// The distance interval.
    pub band: Band,
    /// The band's width as a fraction of the total width of all bands.
    pub weight: f64,
    /// Pair-type counts for links within the band.
    pub pair_counts: PairCounts,
    /// Entropy of pair types given this band.
    pub entropy: f64,
    /// Divergence of this band's pair types from the baseline.
    pub mutual_info: f64,
}

/// The result of [`Altieri::compute`].
#[derive(Clone, Debug)]
pub struct AltieriEntropy<L> {
    /// Total spatial entropy; always exactly `mutual_info + residue`.
    pub entropy: f64,
    /// Spatial mutual information: weighted divergence of each band from the baseline.
    pub mutual_info: f64,
    /// Spatial residual entropy: weighted entropy within each band.
    pub residue: f64,
    /// Per-band contributions, in increasing distance order.
    pub bands: Vec<BandEntropy>,
    /// Pair-type counts over every pair of points at a positive distance.
    pub baseline: PairCounts,
    /// The distinct point types.
    pub types: TypeSet<L>,
    /// The bounding-box diagonal that default and counted bands were spread over.
    pub max_distance: f64,
}

impl<L> AltieriEntropy<L> {
    fn new(
        mutual_info: f64,
        residue: f64,
        bands: Vec<BandEntropy>,
        baseline: PairCounts,
        types: TypeSet<L>,
        max_distance: f64,
    ) -> Self {
        AltieriEntropy {
            entropy: mutual_info + residue,
            mutual_info,
            residue,
            bands,
            baseline,
            types,
            max_distance,
        }
    }
}

/// Computes Altieri entropy with the given settings.
///
/// `cut` may be a [`Cut`], a number of cuts, or a list of break points. `ordered` selects whether
/// (A, B) and (B, A) pairs are distinct, and `base` is the logarithm base of the results.
pub fn altieri_entropy<P, L, C>(
    points: &[P],
    types: &[L],
    cut: C,
    ordered: bool,
    base: f64,
) -> Result<AltieriEntropy<L>>
where
    P: AsRef<[f64]>,
    L: Ord + Clone,
    C: Into<Cut>,
{
    Altieri::new()
        .cut(cut)
        .pairing(Pairing::from_ordered(ordered))
        .base(LogBase::new(base)?)
        .compute(points, types)
}
