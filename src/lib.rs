#![warn(missing_docs)]
#![doc(test(no_crate_inject))]
#![doc(test(attr(deny(unused, future_incompatible))))]

//! This crate measures how spatially mixed or segregated categorical point types are, using the
//! spatial entropy statistics described by these papers:
//!
//! - Leibovici, Claramunt, Le Guyader and Brosset, [Local and global spatio-temporal entropy
//!   indices based on distance-ratios and co-occurrences distributions][leibovici], 2014
//! - Altieri, Cocchi and Roli, [A new approach to spatial entropy measures][altieri], 2018
//!
//! [leibovici]: https://doi.org/10.1080/13658816.2013.871284
//! [altieri]: https://doi.org/10.1007/s10651-017-0383-1
//!
//! Both statistics start from the same sufficient statistic: a [`PairCounts`] table recording,
//! for each combination of two point types, how many pairs of points of those types lie within
//! some distance of each other.
//!
//! - [`Leibovici`] entropy is the Shannon entropy of that table for a single distance interval.
//! - [`Altieri`] entropy splits distances into [`Band`]s and decomposes the entropy into spatial
//!   mutual information (how much each band's pair types differ from all pairs) and spatial
//!   residual entropy (what's left within each band).
//!
//! ```
//! use spatial_entropy::{altieri_entropy, leibovici_entropy, Cut};
//!
//! let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [10.0, 10.0]];
//! let types = ["A", "A", "B", "B"];
//!
//! let leibovici = leibovici_entropy(&points, &types, 2.0, false, std::f64::consts::E).unwrap();
//! assert!(leibovici.entropy > 0.0);
//!
//! let altieri = altieri_entropy(&points, &types, Cut::Count(1), true, 2.0).unwrap();
//! assert_eq!(altieri.entropy, altieri.mutual_info + altieri.residue);
//! ```
//!
//! Every computation is a pure function of its inputs, so results are reproducible and it's safe
//! to run many at once from different threads.

pub use sorted_iter;

mod altieri;
mod bands;
mod counts;
mod distance;
mod error;
mod grid;
mod leibovici;
mod types;

pub use altieri::{altieri_entropy, Altieri, AltieriEntropy, BandEntropy};
pub use bands::{Band, Cut, MAX_CUTS};
pub use counts::{CountSummary, LogBase, PairCounts, PairKey, Pairing, TypeMatrix};
pub use distance::{bounding_box_diagonal, euclidean, DistanceMatrix, LinkMatrix};
pub use error::{ConfigError, Error, Result};
pub use grid::GridIndex;
pub use leibovici::{leibovici_entropy, Adjacency, Backend, Distance, Leibovici, LeiboviciEntropy};
pub use types::TypeSet;
