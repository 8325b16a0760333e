//! Hierarchical filter: depth-first projection of the index with bottom-up
//! pruning. Nodes are attached to the result only when non-empty, so a date
//! with no surviving metric drops its region, and a region with no surviving
//! date drops its country.

use crate::data::index::{
    CountryNode, DateNode, RegionNode, ResultTree, SeriesIndex, ALL_REGIONS,
};
use crate::data::metric::Metric;
use crate::query::date_codec;
use crate::query::error::QueryError;
use crate::query::params::{QueryRequest, Selector};

/// Key predicate for the country and region levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatch {
    Any,
    /// Case-insensitive equality, resolved through the index's folded keys.
    Exact(String),
}

/// Date-level predicate. Keys are already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateMatch {
    Any,
    Key(String),
    /// Most recent date of each region that carries the requested metric.
    Latest,
}

/// A validated request resolved into per-level predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPlan {
    pub country: KeyMatch,
    pub region: KeyMatch,
    pub date: DateMatch,
    pub metric: Option<Metric>,
}

impl FilterPlan {
    /// Resolves selectors into predicates, encoding a literal date.
    ///
    /// A country aggregate spans every country but only its [`ALL_REGIONS`]
    /// node; the validator has already rejected a named region alongside it.
    pub fn resolve(request: &QueryRequest) -> Result<Self, QueryError> {
        let country = match &request.country {
            Selector::Literal(name) => KeyMatch::Exact(name.clone()),
            Selector::Wildcard | Selector::Aggregate => KeyMatch::Any,
        };
        let region = match (&request.country, &request.region) {
            (_, Selector::Literal(name)) => KeyMatch::Exact(name.clone()),
            (Selector::Aggregate, _) | (_, Selector::Aggregate) => {
                KeyMatch::Exact(ALL_REGIONS.to_string())
            }
            _ => KeyMatch::Any,
        };
        let date = match &request.date {
            Selector::Literal(raw) => DateMatch::Key(date_codec::encode(raw)?),
            Selector::Wildcard => DateMatch::Any,
            Selector::Aggregate => DateMatch::Latest,
        };
        Ok(Self {
            country,
            region,
            date,
            metric: request.metric,
        })
    }
}

/// Projects the index through `plan` into a freshly allocated tree.
pub fn filter(index: &SeriesIndex, plan: &FilterPlan) -> ResultTree {
    let countries: Box<dyn Iterator<Item = (&str, &CountryNode)> + '_> = match &plan.country {
        KeyMatch::Any => Box::new(index.countries()),
        KeyMatch::Exact(name) => Box::new(index.countries_named(name)),
    };
    let mut result = ResultTree::default();
    for (country_key, country) in countries {
        result.attach(country_key, filter_regions(country, plan));
    }
    result
}

fn filter_regions(country: &CountryNode, plan: &FilterPlan) -> CountryNode {
    let regions: Box<dyn Iterator<Item = (&str, &RegionNode)> + '_> = match &plan.region {
        KeyMatch::Any => Box::new(country.regions()),
        KeyMatch::Exact(name) => Box::new(country.regions_named(name)),
    };
    let mut out = CountryNode::default();
    for (region_key, region) in regions {
        out.attach(region_key, filter_dates(region, plan));
    }
    out
}

fn filter_dates(region: &RegionNode, plan: &FilterPlan) -> RegionNode {
    let mut out = RegionNode::default();
    match &plan.date {
        DateMatch::Any => {
            for (key, node) in region.dates() {
                out.attach(key, project_metrics(node, plan.metric));
            }
        }
        DateMatch::Key(key) => {
            if let Some(node) = region.date(key) {
                out.attach(key, project_metrics(node, plan.metric));
            }
        }
        DateMatch::Latest => {
            if let Some((key, node)) = latest_date(region, plan.metric) {
                out.attach(key, project_metrics(node, plan.metric));
            }
        }
    }
    out
}

/// Latest dated node, skipping dates where `metric` was left blank.
fn latest_date(region: &RegionNode, metric: Option<Metric>) -> Option<(&str, &DateNode)> {
    region
        .dates()
        .filter(|(_, node)| metric.map_or(true, |metric| node.count(metric).is_some()))
        .filter_map(|(key, node)| date_codec::parse_key(key).map(|date| (date, key, node)))
        .max_by_key(|(date, _, _)| *date)
        .map(|(_, key, node)| (key, node))
}

fn project_metrics(node: &DateNode, metric: Option<Metric>) -> DateNode {
    match metric {
        None => node.clone(),
        Some(metric) => node
            .count(metric)
            .map(|count| DateNode::single(metric, count))
            .unwrap_or_default(),
    }
}
