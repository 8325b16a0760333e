use thiserror::Error;

use crate::data::metric::Metric;

/// Fatal index build failures. Unreadable sources are not errors; they
/// contribute zero observations instead.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("malformed count '{value}' in {source_name} line {line}, column '{column}'")]
    MalformedCount {
        source_name: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("missing country value in {source_name} line {line}")]
    MissingCountry { source_name: String, line: u64 },

    #[error("duplicate {metric} observation for {country} / {region} / {date}")]
    DuplicateObservation {
        country: String,
        region: String,
        date: String,
        metric: Metric,
    },
}
