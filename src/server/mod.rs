use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::data::index::{IndexStats, SeriesIndex};
use crate::query::date_codec::{self, DateCoverage};

pub mod api;
pub mod routes;

/// Shared, read-only handler state. The index is built before the server
/// starts and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppState {
    pub index: Arc<SeriesIndex>,
    pub stats: IndexStats,
    pub coverage: Option<DateCoverage>,
}

impl AppState {
    pub fn new(index: SeriesIndex) -> Self {
        let stats = index.stats();
        let coverage = date_codec::coverage(index.date_labels());
        Self {
            index: Arc::new(index),
            stats,
            coverage,
        }
    }
}

pub async fn run_server(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "covid_api server listening");
    axum::serve(listener, routes::router(state)).await
}
