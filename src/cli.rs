use tracing::error;

use crate::config::AppConfig;
use crate::data::builder::build_index;
use crate::data::index::SeriesIndex;
use crate::data::metric::Metric;
use crate::query::{run_query, QueryRequest, WILDCARD};
use crate::server::{self, AppState};

const USAGE: &str = "usage: covid_api <serve|query|validate>";
const QUERY_USAGE: &str =
    "usage: covid_api query <all|confirmed|deaths|recovered> [country] [region] [date MMddyyyy]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Query,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("query") => Some(Command::Query),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Query) => handle_query(args),
        Some(Command::Validate) => handle_validate(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn load_index() -> Result<(AppConfig, SeriesIndex), String> {
    let config = AppConfig::load().map_err(|err| err.to_string())?;
    let index = build_index(&config.resolved_sources(), config.duplicate_policy)
        .map_err(|err| format!("index build failed: {err}"))?;
    Ok((config, index))
}

fn handle_serve() -> i32 {
    let (config, index) = match load_index() {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(error = %err, "startup failed");
            eprintln!("{err}");
            return 1;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };
    match runtime.block_on(server::run_server(&config.bind, AppState::new(index))) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn parse_metric_arg(raw: Option<&String>) -> Result<Option<Metric>, String> {
    match raw.map(|value| value.trim()) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case(WILDCARD) => Ok(None),
        Some(value) => value.parse::<Metric>().map(Some).map_err(|err| err.to_string()),
    }
}

fn handle_query(args: &[String]) -> i32 {
    let metric = match parse_metric_arg(args.get(2)) {
        Ok(metric) => metric,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{QUERY_USAGE}");
            return 2;
        }
    };
    let request = QueryRequest::from_raw(
        args.get(3).map(String::as_str),
        args.get(4).map(String::as_str),
        args.get(5).map(String::as_str),
        metric,
    );

    let (_, index) = match load_index() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    match run_query(&index, &request) {
        Ok(tree) => match serde_json::to_string_pretty(&tree) {
            Ok(payload) => {
                println!("{payload}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize query result: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("query rejected: {err}");
            1
        }
    }
}

fn handle_validate() -> i32 {
    match load_index() {
        Ok((config, index)) => {
            let stats = index.stats();
            println!(
                "validation passed: sources={}, countries={}, regions={}, dates={}, \
                 observations={}",
                config.sources.len(),
                stats.countries,
                stats.regions,
                stats.dates,
                stats.observations
            );
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
