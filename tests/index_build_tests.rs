mod common;

use std::fs;

use common::{fixture_index, unique_temp_dir, write_fixture_sources, CONFIRMED_CSV, DEATHS_CSV};
use covid_api::data::{
    build_index, build_index_from_readers, BuildError, DuplicatePolicy, Metric, SourceSpec,
    ALL_REGIONS,
};

fn sources_in(dir: &std::path::Path) -> Vec<SourceSpec> {
    vec![
        SourceSpec::new(dir.join("confirmed.csv"), Metric::Confirmed),
        SourceSpec::new(dir.join("deaths.csv"), Metric::Deaths),
        SourceSpec::new(dir.join("recovered.csv"), Metric::Recovered),
    ]
}

#[test]
fn build_is_idempotent() {
    let dir = unique_temp_dir("idempotent");
    write_fixture_sources(&dir);

    let first = build_index(&sources_in(&dir), DuplicatePolicy::Overwrite).expect("first build");
    let second = build_index(&sources_in(&dir), DuplicatePolicy::Overwrite).expect("second build");
    assert_eq!(first, second);
    assert_eq!(first, fixture_index());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn sources_merge_into_one_date_node() {
    let index = build_index_from_readers(
        vec![
            (
                "confirmed.csv".to_string(),
                Metric::Confirmed,
                "Province/State,Country/Region,Lat,Long,3/12/20\n,US,37.0,-95.0,100\n".as_bytes(),
            ),
            (
                "deaths.csv".to_string(),
                Metric::Deaths,
                "Province/State,Country/Region,Lat,Long,3/12/20\n,US,37.0,-95.0,2\n".as_bytes(),
            ),
        ],
        DuplicatePolicy::Overwrite,
    )
    .expect("index should build");

    let node = index
        .country("US")
        .and_then(|country| country.region(ALL_REGIONS))
        .and_then(|region| region.date("3/12/20"))
        .expect("merged date node");
    assert_eq!(node.count(Metric::Confirmed), Some(100));
    assert_eq!(node.count(Metric::Deaths), Some(2));
    assert_eq!(node.count(Metric::Recovered), None);
}

#[test]
fn built_index_has_no_empty_levels_and_no_geo_columns() {
    let index = fixture_index();
    common::assert_no_empty_branches(&index);

    for (_, country) in index.countries() {
        for (_, region) in country.regions() {
            for (date, _) in region.dates() {
                assert!(!["Lat", "Long"].contains(&date), "geo column leaked as date");
            }
        }
    }
    let stats = index.stats();
    assert_eq!(stats.countries, 2);
    assert_eq!(stats.regions, 4);
    assert_eq!(stats.dates, 3);
    // 4 rows x 3 dates x 3 metrics, minus the blank US recovered cell.
    assert_eq!(stats.observations, 35);
}

#[test]
fn missing_source_contributes_nothing() {
    let dir = unique_temp_dir("missing");
    fs::write(dir.join("confirmed.csv"), CONFIRMED_CSV).expect("fixture should be written");

    let index = build_index(&sources_in(&dir), DuplicatePolicy::Overwrite)
        .expect("missing sources should not abort the build");
    assert_eq!(index.count("US", ALL_REGIONS, "3/12/20", Metric::Confirmed), Some(100));
    assert_eq!(index.count("US", ALL_REGIONS, "3/12/20", Metric::Deaths), None);
    assert_eq!(index.stats().observations, 12);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn malformed_count_fails_the_build() {
    let dir = unique_temp_dir("malformed");
    write_fixture_sources(&dir);
    fs::write(
        dir.join("deaths.csv"),
        DEATHS_CSV.replace("3024", "\"3,024\""),
    )
    .expect("fixture should be written");

    let err = build_index(&sources_in(&dir), DuplicatePolicy::Overwrite).unwrap_err();
    match err {
        BuildError::MalformedCount { value, column, .. } => {
            assert_eq!(value, "3,024");
            assert_eq!(column, "3/10/20");
        }
        other => panic!("unexpected error: {other}"),
    }

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn duplicate_observation_overwrites_under_overwrite_policy() {
    let later = "Province/State,Country/Region,Lat,Long,3/12/20\n,US,37.0,-95.0,999\n";
    let index = build_index_from_readers(
        vec![
            ("confirmed.csv".to_string(), Metric::Confirmed, CONFIRMED_CSV.as_bytes()),
            ("confirmed-late.csv".to_string(), Metric::Confirmed, later.as_bytes()),
        ],
        DuplicatePolicy::Overwrite,
    )
    .expect("overwrite policy should accept collisions");
    assert_eq!(index.count("US", ALL_REGIONS, "3/12/20", Metric::Confirmed), Some(999));
    assert_eq!(index.count("US", ALL_REGIONS, "3/11/20", Metric::Confirmed), Some(80));
}

#[test]
fn duplicate_observation_fails_under_reject_policy() {
    let later = "Province/State,Country/Region,Lat,Long,3/12/20\n,US,37.0,-95.0,999\n";
    let err = build_index_from_readers(
        vec![
            ("confirmed.csv".to_string(), Metric::Confirmed, CONFIRMED_CSV.as_bytes()),
            ("confirmed-late.csv".to_string(), Metric::Confirmed, later.as_bytes()),
        ],
        DuplicatePolicy::Reject,
    )
    .unwrap_err();
    match err {
        BuildError::DuplicateObservation { country, region, date, metric } => {
            assert_eq!(country, "US");
            assert_eq!(region, ALL_REGIONS);
            assert_eq!(date, "3/12/20");
            assert_eq!(metric, Metric::Confirmed);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reject_policy_accepts_distinct_metrics() {
    let index = build_index_from_readers(
        vec![
            ("confirmed.csv".to_string(), Metric::Confirmed, CONFIRMED_CSV.as_bytes()),
            ("deaths.csv".to_string(), Metric::Deaths, DEATHS_CSV.as_bytes()),
        ],
        DuplicatePolicy::Reject,
    )
    .expect("one metric per source never collides");
    assert_eq!(index.count("China", "Hubei", "3/10/20", Metric::Deaths), Some(3024));
}
