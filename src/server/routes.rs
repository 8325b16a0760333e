use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::data::metric::Metric;
use crate::server::api::{self, ErrorBody, SeriesParams};
use crate::server::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/all", get(all_series))
        .route("/api/confirmed", get(confirmed_series))
        .route("/api/deaths", get(deaths_series))
        .route("/api/recovered", get(recovered_series))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Response {
    Json(api::health_payload(state.stats, state.coverage.clone())).into_response()
}

async fn all_series(State(state): State<AppState>, Query(params): Query<SeriesParams>) -> Response {
    series_response(&state, &params, None)
}

async fn confirmed_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Response {
    series_response(&state, &params, Some(Metric::Confirmed))
}

async fn deaths_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Response {
    series_response(&state, &params, Some(Metric::Deaths))
}

async fn recovered_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Response {
    series_response(&state, &params, Some(Metric::Recovered))
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "request sent to invalid endpoint")
}

fn series_response(state: &AppState, params: &SeriesParams, metric: Option<Metric>) -> Response {
    match api::series_payload(&state.index, params, metric) {
        Ok(tree) => Json(tree).into_response(),
        Err(err) => {
            debug!(error = %err, ?params, "rejected series query");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
