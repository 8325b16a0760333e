//! Payload builders behind the HTTP routes. Kept free of axum types so they
//! can be exercised directly.

use serde::{Deserialize, Serialize};

use crate::data::index::{IndexStats, ResultTree, SeriesIndex};
use crate::data::metric::Metric;
use crate::query::date_codec::DateCoverage;
use crate::query::{run_query, QueryError, QueryRequest};

/// Query string of the series endpoints. `state` is accepted as an alias of
/// `region`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesParams {
    pub country: Option<String>,
    #[serde(alias = "state")]
    pub region: Option<String>,
    pub date: Option<String>,
}

impl SeriesParams {
    pub fn to_request(&self, metric: Option<Metric>) -> QueryRequest {
        QueryRequest::from_raw(
            self.country.as_deref(),
            self.region.as_deref(),
            self.date.as_deref(),
            metric,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub index: IndexStats,
    /// Dates callers can ask for, as `MMddyyyy`. Null for an empty index.
    pub coverage: Option<DateCoverage>,
}

pub fn series_payload(
    index: &SeriesIndex,
    params: &SeriesParams,
    metric: Option<Metric>,
) -> Result<ResultTree, QueryError> {
    run_query(index, &params.to_request(metric))
}

pub fn health_payload(stats: IndexStats, coverage: Option<DateCoverage>) -> HealthResponse {
    HealthResponse {
        status: "ok",
        service: "covid-api",
        version: env!("CARGO_PKG_VERSION"),
        index: stats,
        coverage,
    }
}
