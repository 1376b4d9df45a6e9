use crate::error::ConfigError;

/// A distance interval `(lo, hi]`, open on the left and closed on the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Exclusive lower bound.
    pub lo: f64,
    /// Inclusive upper bound.
    pub hi: f64,
}

impl Band {
    /// Returns `true` if a pair at distance `d` belongs in this band.
    ///
    /// ```
    /// use spatial_entropy::Band;
    ///
    /// let band = Band { lo: 1.0, hi: 2.0 };
    /// assert!(!band.contains(1.0));
    /// assert!(band.contains(1.5));
    /// assert!(band.contains(2.0));
    /// ```
    pub fn contains(&self, d: f64) -> bool {
        d > self.lo && d <= self.hi
    }

    /// The width of the band.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// The most cuts [`Cut::Count`] accepts.
pub const MAX_CUTS: usize = 1 << 24;

/// How to split distances into bands.
#[derive(Clone, Debug, PartialEq)]
pub enum Cut {
    /// Two equal-width bands between zero and the maximum distance.
    Default,
    /// Make this many cuts between zero and the maximum distance, giving one more band than
    /// cuts, all of equal width.
    Count(usize),
    /// Use these break points, which must be nonnegative and strictly increasing. Consecutive
    /// break points bound each band; the maximum distance is ignored.
    Breaks(Vec<f64>),
}

impl Default for Cut {
    fn default() -> Self {
        Cut::Default
    }
}

impl From<usize> for Cut {
    fn from(cuts: usize) -> Self {
        Cut::Count(cuts)
    }
}

impl From<Vec<f64>> for Cut {
    fn from(breaks: Vec<f64>) -> Self {
        Cut::Breaks(breaks)
    }
}

impl Cut {
    /// Checks the break points, or the number of cuts, without needing a maximum distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Cut::Count(cuts) = *self {
            if cuts > MAX_CUTS {
                return Err(ConfigError::TooManyCuts(cuts));
            }
        }
        if let Cut::Breaks(breaks) = self {
            if breaks.len() < 2 {
                return Err(ConfigError::TooFewBreaks(breaks.len()));
            }
            for (index, &value) in breaks.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidBreak { index, value });
                }
            }
            for (index, pair) in breaks.windows(2).enumerate() {
                if pair[1] <= pair[0] {
                    return Err(ConfigError::NonMonotonicBreaks {
                        index: index + 1,
                        previous: pair[0],
                        next: pair[1],
                    });
                }
            }
        }
        Ok(())
    }

    /// Produces consecutive bands covering `[0, max_distance]` (or the explicit break points).
    ///
    /// ```
    /// use spatial_entropy::{Band, Cut};
    ///
    /// let bands = Cut::Count(1).partition(4.0).unwrap();
    /// assert_eq!(bands, vec![Band { lo: 0.0, hi: 2.0 }, Band { lo: 2.0, hi: 4.0 }]);
    ///
    /// let bands = Cut::Breaks(vec![0.0, 4.0, 10.0]).partition(4.0).unwrap();
    /// assert_eq!(bands, vec![Band { lo: 0.0, hi: 4.0 }, Band { lo: 4.0, hi: 10.0 }]);
    ///
    /// assert!(Cut::Breaks(vec![0.0, 4.0, 4.0]).partition(4.0).is_err());
    /// ```
    pub fn partition(&self, max_distance: f64) -> Result<Vec<Band>, ConfigError> {
        self.validate()?;
        let breaks = match self {
            Cut::Default => linspace(max_distance, 3),
            Cut::Count(cuts) => linspace(max_distance, cuts + 2),
            Cut::Breaks(breaks) => breaks.clone(),
        };
        Ok(breaks
            .windows(2)
            .map(|pair| Band {
                lo: pair[0],
                hi: pair[1],
            })
            .collect())
    }
}

/// `count` evenly spaced values from 0 to `stop`, with the last one exactly `stop`.
fn linspace(stop: f64, count: usize) -> Vec<f64> {
    debug_assert!(count >= 2);
    let step = stop / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i + 1 == count {
                stop
            } else {
                i as f64 * step
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_gives_one_more_band_than_cuts() {
        for cuts in 0..10 {
            let bands = Cut::Count(cuts).partition(7.5).unwrap();
            assert_eq!(bands.len(), cuts + 1);
            assert_eq!(bands[0].lo, 0.0);
            assert_eq!(bands[cuts].hi, 7.5);
            for pair in bands.windows(2) {
                assert_eq!(pair[0].hi, pair[1].lo);
                assert!(pair[0].lo < pair[0].hi);
            }
            let width: f64 = bands.iter().map(Band::width).sum();
            assert!((width - 7.5).abs() < 1e-12);
        }
    }

    #[test]
    fn default_is_two_bands() {
        assert_eq!(
            Cut::Default.partition(1.0).unwrap(),
            Cut::Count(1).partition(1.0).unwrap()
        );
    }

    #[test]
    fn rejects_bad_breaks() {
        assert_eq!(
            Cut::Breaks(vec![1.0]).validate(),
            Err(ConfigError::TooFewBreaks(1))
        );
        assert_eq!(
            Cut::Breaks(vec![0.0, 2.0, 1.0]).validate(),
            Err(ConfigError::NonMonotonicBreaks {
                index: 2,
                previous: 2.0,
                next: 1.0
            })
        );
        assert_eq!(
            Cut::Breaks(vec![-1.0, 2.0]).validate(),
            Err(ConfigError::InvalidBreak {
                index: 0,
                value: -1.0
            })
        );
        assert!(Cut::Breaks(vec![0.0, f64::INFINITY]).validate().is_err());
    }

    #[test]
    fn rejects_too_many_cuts() {
        assert_eq!(
            Cut::Count(usize::MAX).partition(1.0),
            Err(ConfigError::TooManyCuts(usize::MAX))
        );
        assert!(Cut::Count(MAX_CUTS + 1).validate().is_err());
        assert!(Cut::Count(MAX_CUTS).validate().is_ok());
    }

    #[test]
    fn band_is_open_on_the_left() {
        let band = Band { lo: 0.0, hi: 1.0 };
        assert!(!band.contains(0.0));
        assert!(band.contains(1.0));
        assert!(!band.contains(1.0 + 1e-12));
    }
}
