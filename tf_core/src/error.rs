//! Error types for transform buffer operations
//!
//! The variants form a hierarchy: `Lookup`, `Connectivity`, `Extrapolation`,
//! `InvalidArgument` and `Timeout` are the specific failure categories,
//! `Transform` is the generic catch-all for transform errors that fit none
//! of them.

use thiserror::Error;

/// Transform buffer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TfError {
    /// A requested frame or transform chain does not exist.
    #[error("{0}")]
    Lookup(String),

    /// Both frames exist but are not connected in the transform tree.
    #[error("{0}")]
    Connectivity(String),

    /// The requested time lies outside the buffered data.
    #[error("{0}")]
    Extrapolation(String),

    /// A malformed frame identifier or argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// A lookup exceeded its time budget.
    ///
    /// `BufferCore` itself never raises this; it exists for engines layered
    /// on top that enforce deadlines.
    #[error("{0}")]
    Timeout(String),

    /// Generic transform error with no more specific category.
    #[error("{0}")]
    Transform(String),
}

/// Result type for transform buffer operations.
pub type TfResult<T> = Result<T, TfError>;
