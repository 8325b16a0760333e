//! Translation between the external query date (`MMddyyyy`) and the index
//! date key, which is the source header label (`M/D/YY`, no padding).

use chrono::NaiveDate;
use serde::Serialize;

use crate::query::error::QueryError;

/// Pattern reported back to callers on a bad date.
pub const EXTERNAL_DATE_PATTERN: &str = "MMddyyyy";

const EXTERNAL_FORMAT: &str = "%m%d%Y";
const KEY_FORMAT: &str = "%-m/%-d/%y";
const KEY_PARSE_FORMAT: &str = "%m/%d/%y";

fn invalid() -> QueryError {
    QueryError::InvalidDateFormat {
        pattern: EXTERNAL_DATE_PATTERN,
    }
}

/// `03122020` -> `3/12/20`.
pub fn encode(query_date: &str) -> Result<String, QueryError> {
    let trimmed = query_date.trim();
    if trimmed.len() != EXTERNAL_DATE_PATTERN.len()
        || !trimmed.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(trimmed, EXTERNAL_FORMAT).map_err(|_| invalid())?;
    Ok(date.format(KEY_FORMAT).to_string())
}

/// `3/12/20` -> `03122020`. None when the key is not a date label.
pub fn decode(index_key: &str) -> Option<String> {
    parse_key(index_key).map(|date| date.format(EXTERNAL_FORMAT).to_string())
}

/// Calendar date of an index key, used for ordering.
pub fn parse_key(index_key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(index_key.trim(), KEY_PARSE_FORMAT).ok()
}

/// First and last dates present in an index, in the external query format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCoverage {
    pub first: String,
    pub last: String,
}

/// Calendar span of `labels`. Labels that are not dates are ignored; None
/// when no label is a date.
pub fn coverage<'a>(labels: impl IntoIterator<Item = &'a str>) -> Option<DateCoverage> {
    let dates: Vec<(NaiveDate, &str)> = labels
        .into_iter()
        .filter_map(|label| parse_key(label).map(|date| (date, label)))
        .collect();
    let (_, first) = dates.iter().min_by_key(|(date, _)| *date)?;
    let (_, last) = dates.iter().max_by_key(|(date, _)| *date)?;
    Some(DateCoverage {
        first: decode(first)?,
        last: decode(last)?,
    })
}
