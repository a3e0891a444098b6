//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter; [`api_router`] mounts them
//! under [`API_BASE_PATH`].

pub mod agenda;
mod error;
pub mod voting;

use std::time::Duration;

use axum::Router;
use http::{header, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use agenda::{agenda_routes, AgendaHandlers};
pub use error::{status_for, voting_error_response, ErrorResponse};
pub use voting::{voting_routes, VotingHandlers};

/// Every route is served below this path.
pub const API_BASE_PATH: &str = "/api/v1";

/// All API routes, without middleware.
pub fn api_router(agenda: AgendaHandlers, voting: VotingHandlers) -> Router {
    Router::new().nest(
        API_BASE_PATH,
        agenda_routes(agenda).merge(voting_routes(voting)),
    )
}

/// Wraps `router` with request tracing, a per-request timeout and CORS.
///
/// An empty `cors_origins` list allows no cross-origin callers.
pub fn with_middleware(
    router: Router,
    request_timeout: Duration,
    cors_origins: &[String],
) -> Router {
    let origins: Vec<http::HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
