//! Voting command and query handlers.

mod cast_vote;
mod get_result;
mod get_session;
mod open_session;

pub use cast_vote::{CastVoteCommand, CastVoteHandler, DEFAULT_COUNTER_TTL_SECS};
pub use get_result::{GetResultHandler, GetResultQuery, VotingResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use open_session::{OpenSessionCommand, OpenSessionHandler};
