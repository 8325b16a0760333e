//! Hierarchical COVID-19 time-series index and query engine.
//!
//! Three wide-format tables (confirmed, deaths, recovered) are merged at
//! startup into one country -> region -> date -> metric tree, which is then
//! queried read-only with exact/wildcard/aggregate selectors per level.

pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod query;
pub mod server;
