//! Path parsing errors.

use thiserror::Error;

/// Errors raised while parsing a path expression.
///
/// Resolution never fails with an error; only turning a string into a
/// [`JsonPath`](crate::JsonPath) can.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// The expression does not start with the `.` root marker.
    #[error("path '{expression}' must start with '.'")]
    MissingRoot {
        /// The offending expression.
        expression: String,
    },

    /// Two separators with nothing between them, or a trailing separator.
    #[error("path '{expression}' has an empty segment at position {position}")]
    EmptySegment {
        /// The offending expression.
        expression: String,
        /// Zero-based position of the empty segment (root excluded).
        position: usize,
    },
}

impl PathError {
    /// Returns the expression that failed to parse.
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::MissingRoot { expression } | Self::EmptySegment { expression, .. } => expression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_display() {
        let err = PathError::MissingRoot {
            expression: "kids.1".to_string(),
        };
        assert_eq!(err.to_string(), "path 'kids.1' must start with '.'");
        assert_eq!(err.expression(), "kids.1");
    }

    #[test]
    fn test_empty_segment_display() {
        let err = PathError::EmptySegment {
            expression: ".a..b".to_string(),
            position: 1,
        };
        assert!(err.to_string().contains("position 1"));
        assert_eq!(err.expression(), ".a..b");
    }
}
