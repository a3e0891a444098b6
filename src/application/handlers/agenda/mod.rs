//! Agenda item command and query handlers.

mod create_agenda_item;
mod get_agenda_item;
mod list_agenda_items;

pub use create_agenda_item::{CreateAgendaItemCommand, CreateAgendaItemHandler};
pub(crate) use get_agenda_item::find_agenda_item;
pub use get_agenda_item::{
    agenda_item_cache_key, AgendaItemCache, GetAgendaItemHandler, GetAgendaItemQuery,
    DEFAULT_AGENDA_ITEM_CACHE_TTL,
};
pub use list_agenda_items::ListAgendaItemsHandler;
