//! Error types for Clasificar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Clasificar operations.
///
/// Covers precondition violations on the classification and validation entry
/// points, and contract violations in the dataset source.
///
/// # Examples
///
/// ```
/// use clasificar::error::ClasificarError;
///
/// let err = ClasificarError::InvalidNeighborCount { k: 0, max: 14 };
/// assert!(err.to_string().contains("neighbour count"));
/// ```
#[derive(Debug)]
pub enum ClasificarError {
    /// Neighbour count outside `[1, dataset size − 1]`.
    InvalidNeighborCount {
        /// Requested neighbour count
        k: usize,
        /// Largest permissible count for the current dataset
        max: usize,
    },

    /// Neighbour-count search range is inverted or starts at zero.
    InvalidNeighborRange {
        /// Lower bound of the requested range
        k_min: usize,
        /// Upper bound of the requested range
        k_max: usize,
    },

    /// Method token outside the four defined voting methods.
    InvalidMethod {
        /// Token that failed to parse
        name: String,
    },

    /// Label token outside the closed category set.
    UnknownLabel {
        /// Token that failed to parse
        token: String,
    },

    /// Dataset source record violating the tabular contract.
    MalformedRecord {
        /// 1-based line number of the offending record
        line: usize,
        /// Description of the violation
        message: String,
    },

    /// Sample, row, or mask width doesn't match the dataset's dimensionality.
    DimensionMismatch {
        /// Expected number of feature dimensions
        expected: usize,
        /// Actual number found
        actual: usize,
    },

    /// Dataset construction was attempted with no samples or no feature
    /// dimensions.
    EmptyDataset,

    /// I/O error from the dataset source.
    Io(std::io::Error),
}

impl fmt::Display for ClasificarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasificarError::InvalidNeighborCount { k, max } => {
                write!(f, "Invalid neighbour count: k = {k}, expected 1 <= k <= {max}")
            }
            ClasificarError::InvalidNeighborRange { k_min, k_max } => {
                write!(
                    f,
                    "Invalid neighbour range: expected 1 <= k_min <= k_max, got [{k_min}, {k_max}]"
                )
            }
            ClasificarError::InvalidMethod { name } => {
                write!(
                    f,
                    "Invalid method: {name:?}, expected one of normal, weighted, \
                     weighted-squared, bayes-naive"
                )
            }
            ClasificarError::UnknownLabel { token } => {
                write!(f, "Unknown label: {token:?}, expected one of S, T, U, V, TX")
            }
            ClasificarError::MalformedRecord { line, message } => {
                write!(f, "Malformed record on line {line}: {message}")
            }
            ClasificarError::DimensionMismatch { expected, actual } => {
                write!(f, "Feature dimension mismatch: expected {expected}, got {actual}")
            }
            ClasificarError::EmptyDataset => {
                write!(f, "Dataset must contain at least one sample with at least one feature")
            }
            ClasificarError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ClasificarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClasificarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClasificarError {
    fn from(err: std::io::Error) -> Self {
        ClasificarError::Io(err)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ClasificarError>;
