use crate::error::ConfigError;
use statrs::statistics::Statistics;

/// The Euclidean distance between two points of the same dimension.
///
/// The result is exactly symmetric in its arguments, so the dense and radius-query paths agree
/// bit-for-bit on every pair.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Checks the preconditions every engine shares: labels are index-aligned with points, there are
/// at least two points, and every point has the same number of finite coordinates. Returns that
/// number of coordinates.
pub(crate) fn check_input<P: AsRef<[f64]>, L>(
    points: &[P],
    types: &[L],
) -> Result<usize, ConfigError> {
    if points.len() != types.len() {
        return Err(ConfigError::LengthMismatch {
            points: points.len(),
            types: types.len(),
        });
    }
    if points.len() < 2 {
        return Err(ConfigError::TooFewPoints(points.len()));
    }

    let expected = points[0].as_ref().len();
    if expected == 0 {
        return Err(ConfigError::ZeroDimension);
    }
    for (index, point) in points.iter().enumerate() {
        let point = point.as_ref();
        if point.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                index,
                expected,
                found: point.len(),
            });
        }
        if !point.iter().all(|x| x.is_finite()) {
            return Err(ConfigError::NonFiniteCoordinate(index));
        }
    }
    Ok(expected)
}

/// The length of the diagonal of the axis-aligned box bounding all the points.
///
/// This is never smaller than the largest pairwise distance, and is cheaper to find.
///
/// ```
/// use spatial_entropy::bounding_box_diagonal;
///
/// let points = [[0.0, 0.0], [3.0, 1.0], [1.0, 4.0]];
/// assert_eq!(bounding_box_diagonal(&points), 5.0);
/// ```
pub fn bounding_box_diagonal<P: AsRef<[f64]>>(points: &[P]) -> f64 {
    let dimension = points.first().map_or(0, |p| p.as_ref().len());
    (0..dimension)
        .map(|axis| {
            let column = points.iter().map(|p| p.as_ref()[axis]);
            let extent = Statistics::max(column.clone()) - Statistics::min(column);
            extent * extent
        })
        .sum::<f64>()
        .sqrt()
}

/// A dense, symmetric matrix of the distances between every pair of points, with zeros on the
/// diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes the distance between every pair of points.
    ///
    /// This takes `O(N^2)` time and space. For large point sets where only short distances
    /// matter, see [`GridIndex`][crate::GridIndex].
    pub fn pairwise<P: AsRef<[f64]>>(points: &[P]) -> Self {
        let n = points.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in i + 1..n {
                let d = euclidean(points[i].as_ref(), points[j].as_ref());
                cells[i * n + j] = d;
                cells[j * n + i] = d;
            }
        }
        DistanceMatrix { n, cells }
    }

    /// The number of points along each side.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` if the matrix was built from no points.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// The distance between points `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    /// Links every pair of points whose distance satisfies `linked`, including each point with
    /// itself if `linked(0.0)` holds.
    pub fn links<F: Fn(f64) -> bool>(&self, linked: F) -> LinkMatrix {
        LinkMatrix {
            n: self.n,
            cells: self.cells.iter().map(|&d| linked(d)).collect(),
        }
    }
}

/// A square boolean matrix recording which pairs of points are linked.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LinkMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl LinkMatrix {
    /// The number of points along each side.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` if the matrix was built from no points.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Whether point `i` is linked to point `j`.
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.n + j]
    }

    /// All the links from point `i`.
    pub fn row(&self, i: usize) -> &[bool] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    /// Returns an iterator over every linked `(i, j)`, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.n;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &linked)| linked)
            .map(move |(idx, _)| (idx / n, idx % n))
    }

    /// The number of true entries.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&linked| linked).count()
    }
}
