//! Voting session repository port.
//!
//! Storage is the serialization point for the one-open-session-per-item
//! invariant and for the final closing write.

use crate::domain::foundation::{
    AgendaItemId, DomainError, SessionStatus, Timestamp, VotingSessionId,
};
use crate::domain::voting::VotingSession;
use async_trait::async_trait;

/// Repository port for VotingSession persistence.
///
/// Implementations must ensure:
/// - at most one OPEN session per agenda item (a second insert fails
///   with `UniqueViolation`)
/// - `mark_closed` only succeeds against a row that is still OPEN
#[async_trait]
pub trait VotingSessionRepository: Send + Sync {
    /// Save a newly opened session.
    ///
    /// # Errors
    ///
    /// - `UniqueViolation` if the agenda item already has an OPEN session
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &VotingSession) -> Result<(), DomainError>;

    /// Find a session by its ID.
    async fn find_by_id(&self, id: &VotingSessionId) -> Result<Option<VotingSession>, DomainError>;

    /// Find the agenda item's session in `status`.
    ///
    /// With several CLOSED sessions for one item the most recently started
    /// one is returned.
    async fn find_by_agenda_item_and_status(
        &self,
        agenda_item_id: &AgendaItemId,
        status: SessionStatus,
    ) -> Result<Option<VotingSession>, DomainError>;

    /// OPEN sessions whose end is at or before `now`, oldest end first.
    async fn find_expired_open(&self, now: Timestamp) -> Result<Vec<VotingSession>, DomainError>;

    /// Persist the closed state and final totals.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the stored session is no longer OPEN
    /// - `VotingSessionNotFound` if the session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn mark_closed(&self, session: &VotingSession) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voting_session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn VotingSessionRepository) {}
    }
}
