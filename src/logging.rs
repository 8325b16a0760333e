use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "covid_api=info,tower_http=info";

/// Installs the global fmt subscriber. Honors `RUST_LOG`; logs go to stderr
/// so command output on stdout stays machine-readable.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
