//! Index builder: reads each configured source, normalizes its rows and folds
//! the observations into one [`SeriesIndex`] in source order.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::error::BuildError;
use crate::data::index::{DuplicatePolicy, SeriesIndex};
use crate::data::metric::Metric;
use crate::data::normalize::{has_identity_columns, normalize_row, Observation, RawRow};

/// One wide-format source table and the metric its cells carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub metric: Metric,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>, metric: Metric) -> Self {
        Self {
            path: path.into(),
            metric,
        }
    }
}

/// Accumulates observations into a tree. Consumed by [`IndexBuilder::finish`],
/// after which the index can no longer change.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    policy: DuplicatePolicy,
    index: SeriesIndex,
}

impl IndexBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            index: SeriesIndex::default(),
        }
    }

    pub fn ingest(
        &mut self,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Result<(), BuildError> {
        for observation in observations {
            self.index.upsert(observation, self.policy)?;
        }
        Ok(())
    }

    pub fn finish(self) -> SeriesIndex {
        self.index
    }
}

/// Builds the index from files on disk.
///
/// Sources are read and normalized in parallel, then merged strictly in the
/// given order so overwrite semantics do not depend on scheduling.
pub fn build_index(
    sources: &[SourceSpec],
    policy: DuplicatePolicy,
) -> Result<SeriesIndex, BuildError> {
    let normalized: Vec<Result<Vec<Observation>, BuildError>> =
        sources.par_iter().map(read_source).collect();

    let mut builder = IndexBuilder::new(policy);
    for (spec, observations) in sources.iter().zip(normalized) {
        let observations = observations?;
        info!(
            source = %spec.path.display(),
            metric = %spec.metric,
            observations = observations.len(),
            "ingesting source"
        );
        builder.ingest(observations)?;
    }

    let index = builder.finish();
    let stats = index.stats();
    info!(
        countries = stats.countries,
        regions = stats.regions,
        dates = stats.dates,
        observations = stats.observations,
        "series index built"
    );
    Ok(index)
}

/// Builds the index from already-open readers, in order. Each entry is
/// `(source name, metric, reader)`.
pub fn build_index_from_readers<R: Read>(
    inputs: Vec<(String, Metric, R)>,
    policy: DuplicatePolicy,
) -> Result<SeriesIndex, BuildError> {
    let mut builder = IndexBuilder::new(policy);
    for (name, metric, reader) in inputs {
        builder.ingest(normalize_reader(&name, reader, metric)?)?;
    }
    Ok(builder.finish())
}

/// Reads one source file. A file that cannot be opened contributes nothing.
pub fn read_source(spec: &SourceSpec) -> Result<Vec<Observation>, BuildError> {
    let name = spec.path.display().to_string();
    match File::open(&spec.path) {
        Ok(file) => normalize_reader(&name, file, spec.metric),
        Err(err) => {
            warn!(
                source = %name,
                error = %err,
                "source unavailable, contributing no observations"
            );
            Ok(Vec::new())
        }
    }
}

/// Normalizes every row of a CSV stream.
///
/// Structural problems (unreadable header, missing identity columns, ragged
/// or non-UTF-8 records) discard the whole source with a warning. A malformed
/// count cell is a hard error.
pub fn normalize_reader<R: Read>(
    source_name: &str,
    reader: R,
    metric: Metric,
) -> Result<Vec<Observation>, BuildError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = match csv_reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            warn!(
                source = %source_name,
                error = %err,
                "unreadable header, contributing no observations"
            );
            return Ok(Vec::new());
        }
    };
    if !has_identity_columns(headers.iter()) {
        warn!(
            source = %source_name,
            "header lacks identity columns, contributing no observations"
        );
        return Ok(Vec::new());
    }

    let mut observations = Vec::new();
    let mut rows = 0usize;
    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    source = %source_name,
                    error = %err,
                    "corrupt record, contributing no observations"
                );
                return Ok(Vec::new());
            }
        };
        let line = record.position().map_or(0, |pos| pos.line());
        let row = RawRow::from_record(line, &headers, &record);
        observations.extend(normalize_row(source_name, &row, metric)?);
        rows += 1;
    }
    debug!(source = %source_name, rows, observations = observations.len(), "source normalized");
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::index::ALL_REGIONS;

    const HEADER: &str = "Province/State,Country/Region,Lat,Long,3/11/20,3/12/20\n";

    #[test]
    fn ragged_source_is_discarded() {
        let csv = format!("{HEADER},US,37.0,-95.0,90\n");
        let observations =
            normalize_reader("ragged.csv", csv.as_bytes(), Metric::Confirmed).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn header_without_identity_columns_is_discarded() {
        let csv = "Country,Lat,Long,3/12/20\nUS,37.0,-95.0,1\n";
        let observations = normalize_reader("odd.csv", csv.as_bytes(), Metric::Deaths).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn padded_header_labels_are_accepted() {
        let csv = "Province/State, Country/Region,Lat,Long,3/12/20\n,US,0,0,100\n";
        let observations =
            normalize_reader("padded.csv", csv.as_bytes(), Metric::Confirmed).unwrap();
        assert_eq!(
            observations,
            vec![Observation {
                country: "US".to_string(),
                region: ALL_REGIONS.to_string(),
                date: "3/12/20".to_string(),
                metric: Metric::Confirmed,
                count: 100,
            }]
        );
    }

    #[test]
    fn malformed_count_reports_line() {
        let csv = format!("{HEADER},US,37.0,-95.0,90,n/a\n");
        let err =
            normalize_reader("confirmed.csv", csv.as_bytes(), Metric::Confirmed).unwrap_err();
        match err {
            BuildError::MalformedCount { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
