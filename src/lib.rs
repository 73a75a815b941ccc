//! Tazza keeps the office coffee ledger: who owes one, who paid.
//!
//! State lives in a hosted relational store; this service mirrors it into
//! an in-memory [`context::AppContext`] and exposes the views and mutation
//! operations over HTTP.

mod helpers;
mod router;

pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod store;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Router, middleware as AxumMiddleware};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

use config::Configuration;
use context::AppContext;
use store::Store;

/// MUST NEVER be used in production.
#[cfg(test)]
pub(crate) async fn make_request(
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use axum::http::header;
    use tower::util::ServiceExt;

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub context: Arc<AppContext>,
    pub metrics: Option<PrometheusHandle>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(10)))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        );

    Router::new()
        // `GET /` renders the current view.
        .route("/", get(router::page::handler))
        // Navigation state.
        .route("/view", post(router::navigate::set_view))
        .route("/select", post(router::navigate::select_user))
        // Mutation operations.
        .route("/users", post(router::users::handler))
        .route("/coffees", post(router::coffees::add))
        .route("/coffees/{record_id}/pay", post(router::coffees::pay))
        // Instance identification and telemetry.
        .route("/status.json", get(router::status::status))
        .route("/metrics", get(router::status::metrics))
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
///
/// Missing store credentials degrade to the unconfigured screen instead of
/// aborting; data operations keep answering with that state.
pub async fn initialize_state() -> AppState {
    let config = Arc::new(Configuration::from_env());

    let store = Store::from_config(config.store.clone());
    if let Store::Unavailable(reason) = &store {
        tracing::warn!(%reason, "starting without a usable store");
    }

    // first mount: mirror both collections and derive the people list.
    let context = Arc::new(AppContext::new(store));
    context.init().await;

    let metrics = match telemetry::setup_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::warn!(error = %err, "metrics recorder unavailable");
            None
        },
    };

    AppState {
        config,
        context,
        metrics,
    }
}
