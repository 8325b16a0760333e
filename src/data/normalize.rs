//! Row normalizer: one wide-format source row in, one observation per dated
//! count cell out.

use crate::data::error::BuildError;
use crate::data::index::ALL_REGIONS;
use crate::data::metric::Metric;

pub const COUNTRY_COLUMN: &str = "Country/Region";
pub const REGION_COLUMN: &str = "Province/State";
/// Geocoordinate columns, dropped unconditionally.
pub const GEO_COLUMNS: &[&str] = &["Lat", "Long", "Long_"];

/// One (country, region, date, metric) -> count fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub country: String,
    pub region: String,
    pub date: String,
    pub metric: Metric,
    pub count: u64,
}

/// Source row as (column label, cell) pairs in header order.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// 1-based line in the source, for error messages.
    pub line: u64,
    pub cells: Vec<(String, String)>,
}

impl RawRow {
    /// Column labels are stored trimmed, so padded headers still resolve.
    pub fn new<K, V>(line: u64, cells: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            cells: cells
                .into_iter()
                .map(|(label, value)| {
                    let label: String = label.into();
                    (label.trim().to_string(), value.into())
                })
                .collect(),
        }
    }

    pub fn from_record(
        line: u64,
        headers: &csv::StringRecord,
        record: &csv::StringRecord,
    ) -> Self {
        Self::new(line, headers.iter().zip(record.iter()))
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(column, _)| column == label)
            .map(|(_, value)| value.as_str())
    }
}

/// Whether a header row carries the identity columns the normalizer needs.
pub fn has_identity_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> bool {
    let mut country = false;
    let mut region = false;
    for label in headers {
        country |= label.trim() == COUNTRY_COLUMN;
        region |= label.trim() == REGION_COLUMN;
    }
    country && region
}

fn is_temporal_column(label: &str) -> bool {
    label != COUNTRY_COLUMN && label != REGION_COLUMN && !GEO_COLUMNS.contains(&label)
}

/// Turns one raw row into observations for `metric`.
///
/// An empty region becomes [`ALL_REGIONS`]. Empty count cells are absent and
/// skipped; anything else that is not a non-negative integer fails the build.
pub fn normalize_row(
    source_name: &str,
    row: &RawRow,
    metric: Metric,
) -> Result<Vec<Observation>, BuildError> {
    let country = row.get(COUNTRY_COLUMN).map(str::trim).unwrap_or_default();
    if country.is_empty() {
        return Err(BuildError::MissingCountry {
            source_name: source_name.to_string(),
            line: row.line,
        });
    }
    let region = match row.get(REGION_COLUMN).map(str::trim) {
        Some(region) if !region.is_empty() => region,
        _ => ALL_REGIONS,
    };

    let mut observations = Vec::with_capacity(row.cells.len());
    for (label, raw) in &row.cells {
        let label = label.as_str();
        if !is_temporal_column(label) {
            continue;
        }
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        let count = value.parse::<u64>().map_err(|_| BuildError::MalformedCount {
            source_name: source_name.to_string(),
            line: row.line,
            column: label.to_string(),
            value: value.to_string(),
        })?;
        observations.push(Observation {
            country: country.to_string(),
            region: region.to_string(),
            date: label.to_string(),
            metric,
            count,
        });
    }
    Ok(observations)
}
