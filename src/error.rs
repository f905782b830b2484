//! Error types for blueprint fitting, application and loading.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlueprintError>;

/// Fatal errors surfaced to the caller.
///
/// Conditions with a deterministic fallback (zero variance, unseen
/// categories) are not errors; see [`RecoveredCondition`].
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// A column the fitted blueprint expects is missing or changed kind.
    #[error("schema mismatch on column `{column}`: {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// The target column is missing or not numeric.
    #[error("invalid target column `{column}`: {reason}")]
    InvalidTarget { column: String, reason: String },

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// A numeric input cell is NaN or infinite.
    #[error("non-finite value in column `{column}` at row {row}")]
    NonFinite { column: String, row: usize },

    /// An output cell is not a finite number.
    #[error("column `{column}` produced a non-numeric value at row {row}")]
    NonNumericOutput { column: String, row: usize },

    /// Invalid configuration or blueprint composition.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Structurally invalid dataset (ragged columns, duplicate names, bad records).
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BlueprintError {
    pub(crate) fn schema_mismatch(column: impl Into<String>, reason: impl Into<String>) -> Self {
        BlueprintError::SchemaMismatch {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_target(column: impl Into<String>, reason: impl Into<String>) -> Self {
        BlueprintError::InvalidTarget {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

/// A condition handled locally by a deterministic fallback.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum RecoveredCondition {
    /// Zero training-time standard deviation; the column is scaled by 1.
    DegenerateColumn { column: String },
    /// A value outside the frozen categories, mapped to the fallback bucket.
    UnseenCategory {
        column: String,
        value: String,
        count: usize,
    },
}
