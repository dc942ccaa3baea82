use core::fmt;

/// Result alias for `cmeans`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the c-means estimator and its building blocks.
///
/// Numerical degeneracies (zero distances, empty clusters, zero typicality
/// scales) are resolved inside the update kernels and never show up here.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Column counts of two matrices disagree.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Estimator configuration rejected before any computation.
    InvalidConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Human-readable reason, naming the offending value.
        message: String,
    },
}

impl Error {
    pub(crate) fn config(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            name,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {requested} clusters from {n_items} items")
            }
            Error::InvalidConfiguration { message, .. } => write!(f, "{message}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
