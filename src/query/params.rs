//! Query parameter selectors.
//!
//! Raw strings are classified once here; everything downstream matches on
//! [`Selector`] instead of comparing sentinel literals.

use crate::data::metric::Metric;

/// Matches every key at its level. An empty or omitted parameter means the same.
pub const WILDCARD: &str = "all";
/// Country-wide total, no regional breakdown.
pub const AGGREGATE: &str = "total";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    Literal(String),
    #[default]
    Wildcard,
    Aggregate,
}

impl Selector {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(WILDCARD) {
            Self::Wildcard
        } else if trimmed.eq_ignore_ascii_case(AGGREGATE) {
            Self::Aggregate
        } else {
            Self::Literal(trimmed.to_string())
        }
    }

    pub fn parse_optional(raw: Option<&str>) -> Self {
        raw.map_or(Self::Wildcard, Self::parse)
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// One query against the index: a selector per level plus an optional metric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub country: Selector,
    pub region: Selector,
    pub date: Selector,
    pub metric: Option<Metric>,
}

impl QueryRequest {
    pub fn new(
        country: impl Into<Selector>,
        region: impl Into<Selector>,
        date: impl Into<Selector>,
        metric: Option<Metric>,
    ) -> Self {
        Self {
            country: country.into(),
            region: region.into(),
            date: date.into(),
            metric,
        }
    }

    /// Builds a request from optional raw parameters; omitted ones default to
    /// the wildcard.
    pub fn from_raw(
        country: Option<&str>,
        region: Option<&str>,
        date: Option<&str>,
        metric: Option<Metric>,
    ) -> Self {
        Self {
            country: Selector::parse_optional(country),
            region: Selector::parse_optional(region),
            date: Selector::parse_optional(date),
            metric,
        }
    }
}
