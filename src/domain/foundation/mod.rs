//! Identifiers, time, status and error types shared by every voting module.

mod errors;
mod events;
mod ids;
mod session_status;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId};
pub use ids::{AgendaItemId, VoteId, VoterId, VotingSessionId};
pub use session_status::SessionStatus;
pub use timestamp::Timestamp;
