//! HTTP handlers for agenda item endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, voting_error_response};
use crate::application::handlers::agenda::{
    CreateAgendaItemCommand, CreateAgendaItemHandler, GetAgendaItemHandler, GetAgendaItemQuery,
    ListAgendaItemsHandler,
};
use crate::domain::foundation::AgendaItemId;

use super::dto::{AgendaItemResponse, CreateAgendaItemRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AgendaHandlers {
    create_handler: Arc<CreateAgendaItemHandler>,
    get_handler: Arc<GetAgendaItemHandler>,
    list_handler: Arc<ListAgendaItemsHandler>,
}

impl AgendaHandlers {
    pub fn new(
        create_handler: Arc<CreateAgendaItemHandler>,
        get_handler: Arc<GetAgendaItemHandler>,
        list_handler: Arc<ListAgendaItemsHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /agenda-items
pub async fn create_agenda_item(
    State(handlers): State<AgendaHandlers>,
    Json(request): Json<CreateAgendaItemRequest>,
) -> Response {
    let cmd = CreateAgendaItemCommand {
        title: request.title,
        description: request.description,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(item) => (StatusCode::CREATED, Json(AgendaItemResponse::from(&item))).into_response(),
        Err(e) => voting_error_response(e),
    }
}

/// GET /agenda-items
pub async fn list_agenda_items(State(handlers): State<AgendaHandlers>) -> Response {
    match handlers.list_handler.handle().await {
        Ok(items) => {
            let body: Vec<AgendaItemResponse> =
                items.iter().map(AgendaItemResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => voting_error_response(e),
    }
}

/// GET /agenda-items/:id
pub async fn get_agenda_item(
    State(handlers): State<AgendaHandlers>,
    Path(agenda_item_id): Path<String>,
) -> Response {
    let agenda_item_id: AgendaItemId = match agenda_item_id.parse() {
        Ok(id) => id,
        Err(_) => return invalid_id("agenda item"),
    };

    match handlers
        .get_handler
        .handle(GetAgendaItemQuery { agenda_item_id })
        .await
    {
        Ok(item) => (StatusCode::OK, Json(AgendaItemResponse::from(&item))).into_response(),
        Err(e) => voting_error_response(e),
    }
}
