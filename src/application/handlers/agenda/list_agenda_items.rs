//! ListAgendaItemsHandler - Query handler listing every agenda item.

use std::sync::Arc;

use crate::domain::agenda::AgendaItem;
use crate::domain::voting::VotingError;
use crate::ports::AgendaItemRepository;

/// Handler for listing agenda items, newest first.
pub struct ListAgendaItemsHandler {
    repository: Arc<dyn AgendaItemRepository>,
}

impl ListAgendaItemsHandler {
    pub fn new(repository: Arc<dyn AgendaItemRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<AgendaItem>, VotingError> {
        Ok(self.repository.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryVotingStore;
    use crate::domain::foundation::{AgendaItemId, Timestamp};

    #[tokio::test]
    async fn lists_newest_first() {
        let store = InMemoryVotingStore::new();
        let older = AgendaItem::reconstitute(
            AgendaItemId::new(),
            "Older".to_string(),
            None,
            Timestamp::now().minus_secs(60),
        );
        let newer = AgendaItem::new(AgendaItemId::new(), "Newer".to_string(), None).unwrap();
        store.save(&older).await.unwrap();
        store.save(&newer).await.unwrap();

        let items = ListAgendaItemsHandler::new(Arc::new(store))
            .handle()
            .await
            .unwrap();

        let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn empty_store_gives_empty_list() {
        let items = ListAgendaItemsHandler::new(Arc::new(InMemoryVotingStore::new()))
            .handle()
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
