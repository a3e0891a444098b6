//! HTTP handlers for voting endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, voting_error_response, ErrorResponse};
use crate::application::handlers::voting::{
    CastVoteCommand, CastVoteHandler, GetResultHandler, GetResultQuery, GetSessionHandler,
    GetSessionQuery, OpenSessionCommand, OpenSessionHandler,
};
use crate::domain::foundation::{AgendaItemId, VoterId, VotingSessionId};
use crate::domain::voting::{VoteValue, VotingError};

use super::dto::{
    CastVoteRequest, OpenSessionRequest, ResultResponse, SessionResponse, VoteResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct VotingHandlers {
    open_handler: Arc<OpenSessionHandler>,
    cast_handler: Arc<CastVoteHandler>,
    session_handler: Arc<GetSessionHandler>,
    result_handler: Arc<GetResultHandler>,
}

impl VotingHandlers {
    pub fn new(
        open_handler: Arc<OpenSessionHandler>,
        cast_handler: Arc<CastVoteHandler>,
        session_handler: Arc<GetSessionHandler>,
        result_handler: Arc<GetResultHandler>,
    ) -> Self {
        Self {
            open_handler,
            cast_handler,
            session_handler,
            result_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /agenda-items/:id/sessions
///
/// The body is optional; a request without a JSON content type opens a
/// session with the default duration.
pub async fn open_session(
    State(handlers): State<VotingHandlers>,
    Path(agenda_item_id): Path<String>,
    request: Result<Json<OpenSessionRequest>, JsonRejection>,
) -> Response {
    let agenda_item_id: AgendaItemId = match agenda_item_id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("agenda item"),
    };
    let request = match request {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => OpenSessionRequest::default(),
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response()
        }
    };

    let cmd = OpenSessionCommand {
        agenda_item_id,
        duration_secs: request.duration_seconds,
    };

    match handlers.open_handler.handle(cmd).await {
        Ok(session) => (StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => voting_error_response(e),
    }
}

/// POST /agenda-items/:id/votes
pub async fn cast_vote(
    State(handlers): State<VotingHandlers>,
    Path(agenda_item_id): Path<String>,
    Json(request): Json<CastVoteRequest>,
) -> Response {
    let agenda_item_id: AgendaItemId = match agenda_item_id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("agenda item"),
    };

    let voter_id = match VoterId::new(request.voter_id) {
        Ok(id) => id,
        Err(e) => return voting_error_response(VotingError::Validation(e)),
    };
    let value: VoteValue = match request.value.parse() {
        Ok(value) => value,
        Err(e) => return voting_error_response(VotingError::Validation(e)),
    };

    let cmd = CastVoteCommand {
        agenda_item_id,
        voter_id,
        value,
    };

    match handlers.cast_handler.handle(cmd).await {
        Ok(vote) => (StatusCode::CREATED, Json(VoteResponse::from(&vote))).into_response(),
        Err(e) => voting_error_response(e),
    }
}

/// GET /agenda-items/:id/result
pub async fn get_result(
    State(handlers): State<VotingHandlers>,
    Path(agenda_item_id): Path<String>,
) -> Response {
    let agenda_item_id: AgendaItemId = match agenda_item_id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("agenda item"),
    };

    match handlers
        .result_handler
        .handle(GetResultQuery { agenda_item_id })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ResultResponse::from(&result))).into_response(),
        Err(e) => voting_error_response(e),
    }
}

/// GET /sessions/:id
pub async fn get_session(
    State(handlers): State<VotingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id: VotingSessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("session"),
    };

    match handlers
        .session_handler
        .handle(GetSessionQuery { session_id })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => voting_error_response(e),
    }
}
