//! Application layer - Commands, Queries, Handlers and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Request handlers live in `handlers`; the closure pipeline driven by the
//! expiration sweeper lives in `services`.

pub mod handlers;
pub mod services;

pub use handlers::{
    CastVoteCommand, CastVoteHandler, CreateAgendaItemCommand, CreateAgendaItemHandler,
    GetAgendaItemHandler, GetAgendaItemQuery, GetResultHandler, GetResultQuery,
    GetSessionHandler, GetSessionQuery, ListAgendaItemsHandler, OpenSessionCommand,
    OpenSessionHandler, VotingResult,
};
pub use services::{
    ClosedSession, ExpirationSweeper, ExpirationSweeperConfig, ResultAggregator, ResultPublisher,
    SessionCloser, SweepReport,
};
