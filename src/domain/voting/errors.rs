//! Voting error types.

use crate::domain::foundation::{
    AgendaItemId, DomainError, ErrorCode, ValidationError, VoterId, VotingSessionId,
};
use thiserror::Error;

/// Coarse classification every voting error falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced agenda item or session does not exist.
    NotFound,
    /// The request breaks a voting rule (conflict, closed window, duplicate).
    Business,
    /// A backing store or channel failed.
    Infrastructure,
    /// Anything else. Details stay server-side.
    Internal,
}

/// Errors returned by voting operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError {
    #[error("Agenda item not found: {0}")]
    AgendaItemNotFound(AgendaItemId),

    #[error("Voting session not found: {0}")]
    SessionNotFound(VotingSessionId),

    #[error("No open voting session for agenda item {0}")]
    NoOpenSession(AgendaItemId),

    #[error("No voting session found for agenda item {0}")]
    NoSession(AgendaItemId),

    #[error("A voting session is already open for agenda item {0}")]
    SessionAlreadyOpen(AgendaItemId),

    #[error("Voting session for agenda item {0} is not currently open")]
    SessionNotOpen(AgendaItemId),

    #[error("Voter {voter_id} already voted on agenda item {agenda_item_id}")]
    AlreadyVoted {
        agenda_item_id: AgendaItemId,
        voter_id: VoterId,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to publish result for agenda item {agenda_item_id}: {reason}")]
    PublishFailed {
        agenda_item_id: AgendaItemId,
        reason: String,
    },

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VotingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VotingError::AgendaItemNotFound(_)
            | VotingError::SessionNotFound(_)
            | VotingError::NoOpenSession(_)
            | VotingError::NoSession(_) => ErrorKind::NotFound,
            VotingError::SessionAlreadyOpen(_)
            | VotingError::SessionNotOpen(_)
            | VotingError::AlreadyVoted { .. }
            | VotingError::InvalidState(_)
            | VotingError::Validation(_) => ErrorKind::Business,
            VotingError::PublishFailed { .. } | VotingError::Infrastructure(_) => {
                ErrorKind::Infrastructure
            }
            VotingError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            VotingError::AgendaItemNotFound(_) => ErrorCode::AgendaItemNotFound,
            VotingError::SessionNotFound(_)
            | VotingError::NoOpenSession(_)
            | VotingError::NoSession(_) => ErrorCode::VotingSessionNotFound,
            VotingError::SessionAlreadyOpen(_) => ErrorCode::SessionAlreadyOpen,
            VotingError::SessionNotOpen(_) => ErrorCode::SessionNotOpen,
            VotingError::AlreadyVoted { .. } => ErrorCode::DuplicateVote,
            VotingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            VotingError::Validation(_) => ErrorCode::ValidationFailed,
            VotingError::PublishFailed { .. } => ErrorCode::EventPublishError,
            VotingError::Infrastructure(_) => ErrorCode::DatabaseError,
            VotingError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// True for the duplicate-open conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, VotingError::SessionAlreadyOpen(_))
    }
}

/// Parse the id a port attached under `key`, if any.
fn detail_id<T: std::str::FromStr>(err: &DomainError, key: &str) -> Option<T> {
    err.details.get(key).and_then(|raw| raw.parse().ok())
}

impl From<DomainError> for VotingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::VotingSessionNotFound => match detail_id(&err, "session_id") {
                Some(id) => VotingError::SessionNotFound(id),
                None => VotingError::Internal(err.to_string()),
            },
            ErrorCode::ValidationFailed => {
                let field = err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                VotingError::Validation(ValidationError::invalid_format(field, err.message))
            }
            ErrorCode::InvalidStateTransition => VotingError::InvalidState(err.message),
            ErrorCode::DatabaseError | ErrorCode::CacheError | ErrorCode::EventPublishError => {
                VotingError::Infrastructure(err.to_string())
            }
            _ => VotingError::Internal(err.to_string()),
        }
    }
}
