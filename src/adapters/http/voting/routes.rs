//! HTTP routes for voting endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{cast_vote, get_result, get_session, open_session, VotingHandlers};

/// Voting routes, relative to the API base path.
pub fn voting_routes(handlers: VotingHandlers) -> Router {
    Router::new()
        .route("/agenda-items/:id/sessions", post(open_session))
        .route("/agenda-items/:id/votes", post(cast_vote))
        .route("/agenda-items/:id/result", get(get_result))
        .route("/sessions/:id", get(get_session))
        .with_state(handlers)
}
