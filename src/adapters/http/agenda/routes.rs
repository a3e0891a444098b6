//! HTTP routes for agenda item endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_agenda_item, get_agenda_item, list_agenda_items, AgendaHandlers};

/// Agenda item routes, relative to the API base path.
pub fn agenda_routes(handlers: AgendaHandlers) -> Router {
    Router::new()
        .route("/agenda-items", post(create_agenda_item).get(list_agenda_items))
        .route("/agenda-items/:id", get(get_agenda_item))
        .with_state(handlers)
}
