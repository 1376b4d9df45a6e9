use crate::distance::euclidean;
use smallvec::SmallVec;
use std::collections::HashMap;

type Cell = SmallVec<[i64; 4]>;

/// A uniform grid over a point set, for finding every pair of points within some radius without
/// computing all `N^2` distances.
///
/// Each point is bucketed into a cubic cell whose side equals the search radius, so any
/// neighbour within the radius lives either in the same cell or in one of the `3^d - 1` cells
/// around it.
///
/// ```
/// use spatial_entropy::GridIndex;
///
/// let points = [[0.0, 0.0], [0.5, 0.0], [3.0, 3.0]];
/// let grid = GridIndex::new(&points, 1.0);
/// let mut pairs: Vec<_> = grid.neighbors().map(|(i, j, _)| (i, j)).collect();
/// pairs.sort_unstable();
/// assert_eq!(pairs, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 2)]);
/// ```
pub struct GridIndex<'a, P> {
    points: &'a [P],
    radius: f64,
    side: f64,
    cells: HashMap<Cell, Vec<usize>>,
}

impl<'a, P: AsRef<[f64]>> GridIndex<'a, P> {
    /// Buckets the points for queries with the given radius.
    ///
    /// A radius of zero is allowed, and finds only points at identical locations.
    pub fn new(points: &'a [P], radius: f64) -> Self {
        // Any positive side works for a zero radius, since matches must share coordinates.
        let side = if radius > 0.0 { radius } else { 1.0 };
        let mut cells: HashMap<Cell, Vec<usize>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            cells
                .entry(cell_of(point.as_ref(), side))
                .or_insert_with(Vec::new)
                .push(idx);
        }
        log::debug!(
            "bucketed {} points into {} grid cells of side {}",
            points.len(),
            cells.len(),
            side
        );
        GridIndex {
            points,
            radius,
            side,
            cells,
        }
    }

    /// The search radius this grid was built for.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns every ordered pair `(i, j, distance)` with `distance <= radius`, including each
    /// point paired with itself. Both `(i, j)` and `(j, i)` are produced.
    ///
    /// Pairs are grouped by `i` in increasing order, but within one `i` the order of `j` is
    /// unspecified.
    pub fn neighbors(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let points: &[P] = self.points;
        let cells = &self.cells;
        let (radius, side) = (self.radius, self.side);
        let dimension = points.first().map_or(0, |p| p.as_ref().len());
        (0..points.len()).flat_map(move |i| {
            let point = points[i].as_ref();
            let home = cell_of(point, side);
            Offsets::new(dimension)
                .filter_map(move |offset| {
                    // Offsets past the edge of the i64 range can't name a cell holding any point.
                    let cell: Cell = home
                        .iter()
                        .zip(offset.iter())
                        .map(|(c, o)| c.checked_add(*o))
                        .collect::<Option<_>>()?;
                    cells.get(&cell)
                })
                .flatten()
                .filter_map(move |&j| {
                    let d = euclidean(point, points[j].as_ref());
                    if d <= radius {
                        Some((i, j, d))
                    } else {
                        None
                    }
                })
        })
    }
}

fn cell_of(point: &[f64], side: f64) -> Cell {
    point.iter().map(|x| (x / side).floor() as i64).collect()
}

/// Enumerates every vector in `{-1, 0, 1}^d`.
struct Offsets {
    current: Option<Cell>,
}

impl Offsets {
    fn new(dimension: usize) -> Self {
        Offsets {
            current: Some(SmallVec::from_elem(-1, dimension)),
        }
    }
}

impl Iterator for Offsets {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let current = self.current.take()?;
        let mut next = current.clone();
        // Count in base 3, with digits -1..=1.
        for digit in next.iter_mut() {
            if *digit < 1 {
                *digit += 1;
                self.current = Some(next);
                break;
            }
            *digit = -1;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    #[test]
    fn offsets_cover_the_neighbourhood() {
        assert_eq!(Offsets::new(1).count(), 3);
        assert_eq!(Offsets::new(2).count(), 9);
        let all: Vec<Cell> = Offsets::new(3).collect();
        assert_eq!(all.len(), 27);
        assert!(all.iter().any(|o| o.iter().all(|&d| d == 0)));
    }

    #[test]
    fn matches_brute_force() {
        let points: Vec<[f64; 2]> = (0..40)
            .map(|i| {
                let t = i as f64;
                [(t * 1.7).sin() * 5.0, (t * 0.3).cos() * 5.0 - t * 0.1]
            })
            .collect();
        let dense = DistanceMatrix::pairwise(&points);
        for &radius in &[0.0, 0.5, 1.0, 2.5, 100.0] {
            let mut found: Vec<(usize, usize)> = GridIndex::new(&points, radius)
                .neighbors()
                .map(|(i, j, _)| (i, j))
                .collect();
            found.sort_unstable();
            let expected: Vec<(usize, usize)> =
                dense.links(|d| d <= radius).iter().collect();
            assert_eq!(found, expected, "radius {}", radius);
        }
    }

    #[test]
    fn tiny_radius_far_from_origin() {
        // Cell coordinates saturate at the ends of the i64 range.
        let points = [[1.0, 0.0], [2.0, 0.0], [-3.0, 1e10], [1e10, -1e10]];
        for &radius in &[1e-300, 1e-9] {
            let mut found: Vec<(usize, usize)> = GridIndex::new(&points, radius)
                .neighbors()
                .map(|(i, j, _)| (i, j))
                .collect();
            found.sort_unstable();
            assert_eq!(found, vec![(0, 0), (1, 1), (2, 2), (3, 3)], "radius {}", radius);
        }
    }

    #[test]
    fn negative_coordinates_share_cells_correctly() {
        let points = [[-0.1, -0.1], [0.1, 0.1]];
        let pairs = GridIndex::new(&points, 0.3).neighbors().count();
        assert_eq!(pairs, 4);
    }
}
