//! Voting domain module.
//!
//! Session lifecycle, ballots, tallies and the result announcement.
//!
//! # Events
//!
//! - `VotingResultAnnounced` - Published once when a session is closed

mod counter_keys;
mod errors;
mod events;
mod outcome;
mod session;
mod vote;

pub use counter_keys::CounterKeys;
pub use errors::{ErrorKind, VotingError};
pub use events::VotingResultAnnounced;
pub use outcome::{Outcome, Tally, TallySource};
pub use session::{
    resolve_duration, VotingSession, DEFAULT_SESSION_DURATION_SECS, MAX_SESSION_DURATION_SECS,
};
pub use vote::{Vote, VoteValue};
