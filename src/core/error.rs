//! Error types for perceptron training and evaluation

use std::fmt;
use thiserror::Error;

/// Which side of the declared class count the discovered labels fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassCountMismatch {
    TooFew,
    TooMany,
}

impl fmt::Display for ClassCountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFew => write!(f, "too few distinct labels"),
            Self::TooMany => write!(f, "too many distinct labels"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PerceptronError {
    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid class count: expected {expected}, found {found} ({kind})")]
    InvalidClassCount {
        expected: usize,
        found: usize,
        kind: ClassCountMismatch,
    },

    #[error("Label of example {position} is not in the class index")]
    UnknownLabel { position: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PerceptronError {
    /// Build an `InvalidClassCount` error, deriving the sub-case from the counts
    pub fn class_count(expected: usize, found: usize) -> Self {
        let kind = if found < expected {
            ClassCountMismatch::TooFew
        } else {
            ClassCountMismatch::TooMany
        };
        Self::InvalidClassCount {
            expected,
            found,
            kind,
        }
    }
}

pub type Result<T> = std::result::Result<T, PerceptronError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_count_sub_cases() {
        match PerceptronError::class_count(3, 2) {
            PerceptronError::InvalidClassCount { kind, .. } => {
                assert_eq!(kind, ClassCountMismatch::TooFew)
            }
            other => panic!("unexpected error: {other}"),
        }
        match PerceptronError::class_count(2, 3) {
            PerceptronError::InvalidClassCount { kind, .. } => {
                assert_eq!(kind, ClassCountMismatch::TooMany)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_messages_carry_fields() {
        let err = PerceptronError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");

        let err = PerceptronError::class_count(3, 1);
        assert_eq!(
            err.to_string(),
            "Invalid class count: expected 3, found 1 (too few distinct labels)"
        );
    }
}
