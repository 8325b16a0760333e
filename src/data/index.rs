//! Four-level series tree: country -> region -> date label -> metric counts.
//!
//! The same tree type is used for the startup-built index and for query
//! results. Mutation is crate-private: the builder upserts observations and
//! the filter attaches freshly projected nodes. `attach` refuses empty nodes,
//! which is what keeps every level of a query result non-empty.
//!
//! Country and region keys also get a case-folded lookup map, so literal
//! matches are map lookups rather than scans over every key.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::error::BuildError;
use crate::data::metric::Metric;
use crate::data::normalize::Observation;

/// Region key for rows that describe a whole country with no sub-region.
pub const ALL_REGIONS: &str = "all";

/// What to do when two sources supply the same (country, region, date, metric).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later sources in build order replace earlier values.
    #[default]
    Overwrite,
    /// Fail the build on the first collision.
    Reject,
}

/// Case folding used for key matching. Unicode-aware, so `CURAÇAO` matches
/// `Curaçao`.
pub fn fold_key(key: &str) -> String {
    key.to_lowercase()
}

/// Folded key -> stored keys that fold to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FoldedKeys(BTreeMap<String, BTreeSet<String>>);

impl FoldedKeys {
    fn insert(&mut self, key: &str) {
        self.0.entry(fold_key(key)).or_default().insert(key.to_string());
    }

    fn get(&self, name: &str) -> impl Iterator<Item = &str> + '_ {
        self.0
            .get(&fold_key(name))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

/// Metric counts recorded for one (country, region, date).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateNode {
    metrics: BTreeMap<Metric, u64>,
}

impl DateNode {
    pub(crate) fn single(metric: Metric, count: u64) -> Self {
        let mut node = Self::default();
        node.metrics.insert(metric, count);
        node
    }

    pub fn count(&self, metric: Metric) -> Option<u64> {
        self.metrics.get(&metric).copied()
    }

    pub fn metrics(&self) -> impl Iterator<Item = (Metric, u64)> + '_ {
        self.metrics.iter().map(|(metric, count)| (*metric, *count))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Dated series for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionNode {
    dates: BTreeMap<String, DateNode>,
}

impl RegionNode {
    pub fn date(&self, key: &str) -> Option<&DateNode> {
        self.dates.get(key)
    }

    pub fn dates(&self) -> impl Iterator<Item = (&str, &DateNode)> + '_ {
        self.dates.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub(crate) fn attach(&mut self, key: &str, node: DateNode) -> bool {
        if node.is_empty() {
            return false;
        }
        self.dates.insert(key.to_string(), node);
        true
    }
}

/// Regions reported for one country, including the [`ALL_REGIONS`] node when
/// the source carries a country-wide row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CountryNode {
    regions: BTreeMap<String, RegionNode>,
    #[serde(skip)]
    folded: FoldedKeys,
}

impl CountryNode {
    pub fn region(&self, key: &str) -> Option<&RegionNode> {
        self.regions.get(key)
    }

    pub fn regions(&self) -> impl Iterator<Item = (&str, &RegionNode)> + '_ {
        self.regions.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Regions whose key equals `name` ignoring case.
    pub fn regions_named<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = (&'a str, &'a RegionNode)> + 'a {
        self.folded
            .get(name)
            .filter_map(move |key| self.regions.get_key_value(key))
            .map(|(key, node)| (key.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn region_entry(&mut self, key: String) -> &mut RegionNode {
        if !self.regions.contains_key(&key) {
            self.folded.insert(&key);
        }
        self.regions.entry(key).or_default()
    }

    pub(crate) fn attach(&mut self, key: &str, node: RegionNode) -> bool {
        if node.is_empty() {
            return false;
        }
        self.folded.insert(key);
        self.regions.insert(key.to_string(), node);
        true
    }
}

/// Built series index, also used as the query result subtree.
///
/// Keys preserve the casing found in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeriesIndex {
    countries: BTreeMap<String, CountryNode>,
    #[serde(skip)]
    folded: FoldedKeys,
}

/// Result subtree returned by a query.
pub type ResultTree = SeriesIndex;

impl SeriesIndex {
    pub fn country(&self, key: &str) -> Option<&CountryNode> {
        self.countries.get(key)
    }

    pub fn countries(&self) -> impl Iterator<Item = (&str, &CountryNode)> + '_ {
        self.countries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Countries whose key equals `name` ignoring case.
    pub fn countries_named<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = (&'a str, &'a CountryNode)> + 'a {
        self.folded
            .get(name)
            .filter_map(move |key| self.countries.get_key_value(key))
            .map(|(key, node)| (key.as_str(), node))
    }

    /// Direct point lookup with exact keys.
    pub fn count(&self, country: &str, region: &str, date: &str, metric: Metric) -> Option<u64> {
        self.countries
            .get(country)?
            .regions
            .get(region)?
            .dates
            .get(date)?
            .count(metric)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Flattens the tree back into observations, in key order.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.countries.iter().flat_map(|(country, country_node)| {
            country_node.regions.iter().flat_map(move |(region, region_node)| {
                region_node.dates.iter().flat_map(move |(date, date_node)| {
                    date_node.metrics().map(move |(metric, count)| Observation {
                        country: country.clone(),
                        region: region.clone(),
                        date: date.clone(),
                        metric,
                        count,
                    })
                })
            })
        })
    }

    /// Distinct date labels across all regions.
    pub fn date_labels(&self) -> BTreeSet<&str> {
        self.countries
            .values()
            .flat_map(|country| country.regions.values())
            .flat_map(|region| region.dates.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            countries: self.countries.len(),
            dates: self.date_labels().len(),
            ..IndexStats::default()
        };
        for country in self.countries.values() {
            stats.regions += country.regions.len();
            for region in country.regions.values() {
                stats.observations += region.dates.values().map(DateNode::len).sum::<usize>();
            }
        }
        stats
    }

    /// Navigates or creates the country, region and date nodes for the
    /// observation and sets its metric slot.
    pub(crate) fn upsert(
        &mut self,
        observation: Observation,
        policy: DuplicatePolicy,
    ) -> Result<(), BuildError> {
        if policy == DuplicatePolicy::Reject
            && self
                .count(
                    &observation.country,
                    &observation.region,
                    &observation.date,
                    observation.metric,
                )
                .is_some()
        {
            return Err(BuildError::DuplicateObservation {
                country: observation.country,
                region: observation.region,
                date: observation.date,
                metric: observation.metric,
            });
        }

        if !self.countries.contains_key(&observation.country) {
            self.folded.insert(&observation.country);
        }
        self.countries
            .entry(observation.country)
            .or_default()
            .region_entry(observation.region)
            .dates
            .entry(observation.date)
            .or_default()
            .metrics
            .insert(observation.metric, observation.count);
        Ok(())
    }

    pub(crate) fn attach(&mut self, key: &str, node: CountryNode) -> bool {
        if node.is_empty() {
            return false;
        }
        self.folded.insert(key);
        self.countries.insert(key.to_string(), node);
        true
    }
}

/// Size summary of a built index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub countries: usize,
    pub regions: usize,
    /// Distinct date labels across all regions.
    pub dates: usize,
    pub observations: usize,
}
