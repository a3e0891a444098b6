//! Vote repository port.

use crate::domain::foundation::{AgendaItemId, DomainError};
use crate::domain::voting::{Vote, VoteValue};
use async_trait::async_trait;

/// Repository port for Vote persistence.
///
/// Votes are insert-only. The (agenda item, voter) pair is unique and the
/// store is what enforces it; callers never pre-check.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Insert a vote.
    ///
    /// # Errors
    ///
    /// - `UniqueViolation` if the voter already voted on the agenda item
    /// - `DatabaseError` on persistence failure
    async fn save(&self, vote: &Vote) -> Result<(), DomainError>;

    /// Number of persisted votes with `value` for the agenda item.
    async fn count_by_agenda_item_and_value(
        &self,
        agenda_item_id: &AgendaItemId,
        value: VoteValue,
    ) -> Result<u64, DomainError>;
}
