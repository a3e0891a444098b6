//! HTTP adapter for voting session, ballot and result endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CastVoteRequest, OpenSessionRequest, ResultResponse, SessionResponse, VoteResponse};
pub use handlers::VotingHandlers;
pub use routes::voting_routes;
