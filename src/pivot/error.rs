//! Errors raised while generating a pivot table query.

/// Result type for query generation.
pub type GeneratorResult<T> = Result<T, QueryGeneratorError>;

/// The specification is not suitable for building a correct query.
///
/// These are caller-recoverable: the UI shows the message and waits for the
/// user to complete the selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryGeneratorError {
    /// No selection area is set.
    #[error("Should not be called without area")]
    MissingArea,

    /// No aggregation is selected.
    #[error("No aggregations selected")]
    NoAggregations,

    /// Neither slice nor joined pivots are selected.
    #[error("No pivots selected")]
    NoPivots,
}
