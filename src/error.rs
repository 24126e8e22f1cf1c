//! Error types for loading and aggregating audit data.

use thiserror::Error;

/// A malformed audit entry. Aggregation stops at the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entry #{index}: auditor name is empty")]
    EmptyAuditor { index: usize },

    #[error("entry #{index} ({auditor}): department code is empty")]
    EmptyDepartment { index: usize, auditor: String },

    #[error("entry #{index} ({auditor}, dept {department}): {field} is negative ({value})")]
    NegativeCount {
        index: usize,
        auditor: String,
        department: String,
        field: &'static str,
        value: i64,
    },
}

impl ValidationError {
    /// Zero-based position of the offending entry in the input.
    pub fn index(&self) -> usize {
        match self {
            ValidationError::EmptyAuditor { index }
            | ValidationError::EmptyDepartment { index, .. }
            | ValidationError::NegativeCount { index, .. } => *index,
        }
    }
}

/// Failures while reading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
