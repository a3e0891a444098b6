//! GetAgendaItemHandler - Read-through cached agenda item lookup.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::agenda::AgendaItem;
use crate::domain::foundation::{AgendaItemId, DomainError};
use crate::domain::voting::VotingError;
use crate::ports::{get_or_load, AgendaItemRepository, CacheStore};

/// Default lifetime of a cached agenda item.
pub const DEFAULT_AGENDA_ITEM_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache key for one agenda item.
pub fn agenda_item_cache_key(id: &AgendaItemId) -> String {
    format!("agenda-item:{}", id)
}

/// Read-through cache over agenda item lookups.
///
/// Agenda items never change after creation, so a cached item is never
/// stale. Unknown ids are not cached.
#[derive(Clone)]
pub struct AgendaItemCache {
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl AgendaItemCache {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            cache,
            ttl: DEFAULT_AGENDA_ITEM_CACHE_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn find(
        &self,
        repository: &Arc<dyn AgendaItemRepository>,
        id: AgendaItemId,
    ) -> Result<Option<AgendaItem>, DomainError> {
        let repository = repository.clone();
        get_or_load(
            self.cache.as_ref(),
            &agenda_item_cache_key(&id),
            self.ttl,
            || async move { repository.find_by_id(&id).await },
        )
        .await
    }
}

/// Resolve an agenda item through `cache` when one is configured.
pub(crate) async fn find_agenda_item(
    repository: &Arc<dyn AgendaItemRepository>,
    cache: Option<&AgendaItemCache>,
    id: AgendaItemId,
) -> Result<AgendaItem, VotingError> {
    let found = match cache {
        Some(cache) => cache.find(repository, id).await?,
        None => repository.find_by_id(&id).await?,
    };
    found.ok_or(VotingError::AgendaItemNotFound(id))
}

/// Query to get an agenda item by ID.
#[derive(Debug, Clone)]
pub struct GetAgendaItemQuery {
    pub agenda_item_id: AgendaItemId,
}

/// Handler for retrieving agenda items.
pub struct GetAgendaItemHandler {
    repository: Arc<dyn AgendaItemRepository>,
    cache: AgendaItemCache,
}

impl GetAgendaItemHandler {
    pub fn new(repository: Arc<dyn AgendaItemRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self::with_cache(repository, AgendaItemCache::new(cache))
    }

    /// Share one `AgendaItemCache` with the voting handlers.
    pub fn with_cache(repository: Arc<dyn AgendaItemRepository>, cache: AgendaItemCache) -> Self {
        Self { repository, cache }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = self.cache.with_ttl(ttl);
        self
    }

    pub async fn handle(&self, query: GetAgendaItemQuery) -> Result<AgendaItem, VotingError> {
        find_agenda_item(&self.repository, Some(&self.cache), query.agenda_item_id).await
    }
}
