//! HTTP gateway (Axum) over the recommendation and search services.
//!
//! Every response carries an `X-Folio-Status` header naming the outcome.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::Response,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::GatewayError;
pub use handler::{
    books_handler, load_more_books_handler, popular_handler, recommend_handler,
    search_books_handler, search_suggestions_handler,
};
pub use state::HandlerState;

use crate::constants::{FOLIO_STATUS_OK, FOLIO_STATUS_READY};
use handler::with_status;

/// Builds the router. An empty `cors_origins` leaves CORS disabled.
pub fn create_router_with_state(state: HandlerState, cors_origins: &[String]) -> Router {
    let router = Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/popular", get(popular_handler))
        .route("/api/books", get(books_handler))
        .route("/api/recommend_books", post(recommend_handler))
        .route("/api/search_books", post(search_books_handler))
        .route("/api/search_suggestions", get(search_suggestions_handler))
        .route("/api/load_more_books", get(load_more_books_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors_layer(cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]),
    )
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub books: usize,
    pub pivot_titles: usize,
    pub popular: usize,
    pub fingerprint: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    with_status(
        StatusCode::OK,
        FOLIO_STATUS_OK,
        HealthResponse {
            status: FOLIO_STATUS_OK,
        },
    )
}

/// The snapshot is fully loaded before the listener binds, so a reachable server is
/// always ready; the body reports what it serves.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let recommender = &state.recommender;
    with_status(
        StatusCode::OK,
        FOLIO_STATUS_READY,
        ReadyResponse {
            status: FOLIO_STATUS_READY,
            books: recommender.catalog().unique_len(),
            pivot_titles: recommender.index().len(),
            popular: state.popular.len(),
            fingerprint: state.fingerprint.to_hex(),
        },
    )
}
