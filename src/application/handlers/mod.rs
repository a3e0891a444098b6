//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod agenda;
pub mod voting;

pub use agenda::{
    agenda_item_cache_key, AgendaItemCache, CreateAgendaItemCommand, CreateAgendaItemHandler,
    GetAgendaItemHandler, GetAgendaItemQuery, ListAgendaItemsHandler,
    DEFAULT_AGENDA_ITEM_CACHE_TTL,
};
pub use voting::{
    CastVoteCommand, CastVoteHandler, GetResultHandler, GetResultQuery, GetSessionHandler,
    GetSessionQuery, OpenSessionCommand, OpenSessionHandler, VotingResult,
    DEFAULT_COUNTER_TTL_SECS,
};
