//! Query engine over the immutable series index.
//!
//! `run_query` validates the request, resolves it into per-level predicates
//! (encoding the date) and runs a read-only traversal. It never touches the
//! index itself, so any number of queries may run against a shared index.

pub mod date_codec;
pub mod error;
pub mod filter;
pub mod params;
pub mod validate;

pub use error::QueryError;
pub use filter::{filter, FilterPlan};
pub use params::{QueryRequest, Selector, AGGREGATE, WILDCARD};
pub use validate::validate;

use crate::data::index::{ResultTree, SeriesIndex};

pub fn run_query(index: &SeriesIndex, request: &QueryRequest) -> Result<ResultTree, QueryError> {
    validate(request)?;
    let plan = FilterPlan::resolve(request)?;
    Ok(filter(index, &plan))
}
