//! HTTP adapter for agenda item endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{AgendaItemResponse, CreateAgendaItemRequest};
pub use handlers::AgendaHandlers;
pub use routes::agenda_routes;
