use thiserror::Error;

/// Per-request query failures. Both map to a client error at the HTTP edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid date format. Must be in {pattern} format")]
    InvalidDateFormat { pattern: &'static str },

    #[error("The `country` parameter may not equal 'total' if a specific `region` is provided")]
    InvalidRegionConstraint,
}
