//! Agenda item repository port.

use crate::domain::agenda::AgendaItem;
use crate::domain::foundation::{AgendaItemId, DomainError};
use async_trait::async_trait;

/// Repository port for agenda item persistence.
#[async_trait]
pub trait AgendaItemRepository: Send + Sync {
    /// Save a new agenda item.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, item: &AgendaItem) -> Result<(), DomainError>;

    /// Find an agenda item by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &AgendaItemId) -> Result<Option<AgendaItem>, DomainError>;

    /// All agenda items, newest first.
    async fn list_all(&self) -> Result<Vec<AgendaItem>, DomainError>;
}
