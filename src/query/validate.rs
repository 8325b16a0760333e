use crate::query::error::QueryError;
use crate::query::params::{QueryRequest, Selector};

/// Cross-parameter checks that run before any traversal.
///
/// A country aggregate asks for country-wide rows only, so pairing it with a
/// named region is contradictory. Wildcard or aggregate regions are fine.
pub fn validate(request: &QueryRequest) -> Result<(), QueryError> {
    match (&request.country, &request.region) {
        (Selector::Aggregate, Selector::Literal(_)) => Err(QueryError::InvalidRegionConstraint),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_country_rejects_named_region() {
        let request = QueryRequest::new("total", "California", "all", None);
        assert_eq!(validate(&request), Err(QueryError::InvalidRegionConstraint));
    }

    #[test]
    fn aggregate_country_accepts_default_or_aggregate_region() {
        for region in ["total", "all", ""] {
            let request = QueryRequest::new("total", region, "03122020", None);
            assert_eq!(validate(&request), Ok(()), "region {region:?}");
        }
    }

    #[test]
    fn named_country_accepts_named_region() {
        let request = QueryRequest::new("US", "California", "all", None);
        assert_eq!(validate(&request), Ok(()));
    }
}
