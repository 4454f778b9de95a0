//! Error types for the grade store and its storage backends

use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The backend refused the request
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a store operation
///
/// Every variant except `Storage` is raised before any state changes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No grade with this id
    #[error("grade not found: {0}")]
    GradeNotFound(Uuid),

    /// No semester with this id
    #[error("semester not found: {0}")]
    SemesterNotFound(Uuid),

    /// The operation needs an initialized academic record
    #[error("academic record has not been initialized")]
    AcademicRecordMissing,

    /// Numerical grade outside 0-100 or not finite
    #[error("invalid numerical grade: {0} (expected 0-100)")]
    InvalidGrade(f64),

    /// Negative or non-finite unit count
    #[error("invalid unit count: {0}")]
    InvalidUnits(f64),

    /// Load or explicit save failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}
