use thiserror::Error;

/// Problems with the arguments given to one of the entropy computations. These are always the
/// caller's fault and are detected before any counting happens.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The point and label sequences are not index-aligned.
    #[error("points and types should have the same length ({points} points, {types} types)")]
    LengthMismatch {
        /// Number of points.
        points: usize,
        /// Number of type labels.
        types: usize,
    },

    /// Fewer than two points were given.
    #[error("at least 2 points are required, got {0}")]
    TooFewPoints(usize),

    /// Points have different numbers of coordinates.
    #[error("point {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        found: usize,
    },

    /// Points have no coordinates at all.
    #[error("points must have at least one coordinate")]
    ZeroDimension,

    /// A coordinate is NaN or infinite.
    #[error("point {0} has a coordinate that is not finite")]
    NonFiniteCoordinate(usize),

    /// A distance threshold is negative, reversed, or not finite.
    #[error("distance interval [{lo}, {hi}] must satisfy 0 <= lo <= hi with finite bounds")]
    InvalidInterval {
        /// Smallest linked distance.
        lo: f64,
        /// Largest linked distance.
        hi: f64,
    },

    /// An explicit band list has fewer than two break points.
    #[error("at least 2 break points are required, got {0}")]
    TooFewBreaks(usize),

    /// A break point is negative or not finite.
    #[error("break point {index} ({value}) is negative or not finite")]
    InvalidBreak {
        /// Position of the break point.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// Break points are not strictly increasing.
    #[error("break points must be strictly increasing, but {next} follows {previous} at index {index}")]
    NonMonotonicBreaks {
        /// Position of the first break point out of order.
        index: usize,
        /// The break point before it.
        previous: f64,
        /// The break point at `index`.
        next: f64,
    },

    /// So many cuts were requested that their break points can't be counted.
    #[error("{0} cuts is too many")]
    TooManyCuts(usize),

    /// The logarithm base cannot be used to rescale entropies.
    #[error("log base {0} is invalid; it must be finite, positive and not equal to 1")]
    InvalidLogBase(f64),
}

/// Everything that can go wrong while computing a spatial entropy.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// The arguments were rejected before any counting happened.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// No point pair had a distance inside the requested interval, or inside any distance band,
    /// so there is no distribution of pair types to take the entropy of.
    #[error("no point pairs have a distance between {lo} and {hi}; entropy is undefined")]
    NoPairs {
        /// Lower end of the distances searched.
        lo: f64,
        /// Upper end of the distances searched.
        hi: f64,
    },

    /// Every point sits at the same location, so no pair has a positive distance.
    #[error("no point pairs have a positive distance; entropy is undefined")]
    NoDistinctPairs,
}

impl Error {
    /// Returns `true` if the error was caused by invalid arguments rather than by input data
    /// which has no pairs to count.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
