#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use covid_api::data::{build_index_from_readers, DuplicatePolicy, Metric, SeriesIndex};

pub const CONFIRMED_CSV: &str = "\
Province/State,Country/Region,Lat,Long,3/10/20,3/11/20,3/12/20
,US,37.0902,-95.7129,52,80,100
California,US,36.1162,-119.6816,144,177,221
Hubei,China,30.9756,112.2707,67760,67773,67781
Beijing,China,40.1824,116.4142,435,436,437
";

pub const DEATHS_CSV: &str = "\
Province/State,Country/Region,Lat,Long,3/10/20,3/11/20,3/12/20
,US,37.0902,-95.7129,0,1,2
California,US,36.1162,-119.6816,2,3,4
Hubei,China,30.9756,112.2707,3024,3046,3056
Beijing,China,40.1824,116.4142,8,8,8
";

/// US country-wide row has no recovered count on 3/12/20.
pub const RECOVERED_CSV: &str = "\
Province/State,Country/Region,Lat,Long,3/10/20,3/11/20,3/12/20
,US,37.0902,-95.7129,0,0,
California,US,36.1162,-119.6816,2,2,6
Hubei,China,30.9756,112.2707,47743,49134,50318
Beijing,China,40.1824,116.4142,315,318,326
";

pub fn fixture_index() -> SeriesIndex {
    build_index_from_readers(
        vec![
            ("confirmed.csv".to_string(), Metric::Confirmed, CONFIRMED_CSV.as_bytes()),
            ("deaths.csv".to_string(), Metric::Deaths, DEATHS_CSV.as_bytes()),
            ("recovered.csv".to_string(), Metric::Recovered, RECOVERED_CSV.as_bytes()),
        ],
        DuplicatePolicy::Overwrite,
    )
    .expect("fixture index should build")
}

pub fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("covid-api-{name}-{stamp}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

/// Writes the three fixture tables into `dir`.
pub fn write_fixture_sources(dir: &PathBuf) {
    for (name, contents) in [
        ("confirmed.csv", CONFIRMED_CSV),
        ("deaths.csv", DEATHS_CSV),
        ("recovered.csv", RECOVERED_CSV),
    ] {
        fs::write(dir.join(name), contents).expect("fixture should be written");
    }
}

/// Every level of the tree is non-empty.
pub fn assert_no_empty_branches(tree: &SeriesIndex) {
    for (country, regions) in tree.countries() {
        assert!(!regions.is_empty(), "country {country} has no regions");
        for (region, dates) in regions.regions() {
            assert!(!dates.is_empty(), "{country}/{region} has no dates");
            for (date, metrics) in dates.dates() {
                assert!(!metrics.is_empty(), "{country}/{region}/{date} has no metrics");
            }
        }
    }
}
