//! Error types shared across the labeled-grid workspace.

use thiserror::Error;

/// Result type alias using GridError.
pub type Result<T> = std::result::Result<T, GridError>;

/// Primary error type for labeled-grid operations.
///
/// All failures are immediate and synchronous. Mutating operations
/// validate their arguments before touching storage, so a rejected call
/// leaves the target unmodified.
#[derive(Debug, Error)]
pub enum GridError {
    /// No missing-value sentinel is derivable for an operation that needs one.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A malformed argument: bad rule table shape, empty geometry,
    /// out-of-bounds index, and similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested axes or shapes do not line up with what the data provides.
    #[error("dimension mismatch: requested {requested}, available {available}")]
    DimensionMismatch {
        requested: String,
        available: String,
    },
}

impl GridError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(requested: impl Into<String>, available: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            requested: requested.into(),
            available: available.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::dimension_mismatch("axis 'z'", "x, y");
        assert_eq!(
            err.to_string(),
            "dimension mismatch: requested axis 'z', available x, y"
        );

        let err = GridError::configuration("no missing value defined");
        assert!(err.to_string().starts_with("configuration error"));
    }
}
