//! CreateAgendaItemHandler - Command handler for registering agenda items.

use std::sync::Arc;

use crate::domain::agenda::AgendaItem;
use crate::domain::foundation::AgendaItemId;
use crate::domain::voting::VotingError;
use crate::ports::AgendaItemRepository;

/// Command to create an agenda item.
#[derive(Debug, Clone)]
pub struct CreateAgendaItemCommand {
    pub title: String,
    pub description: Option<String>,
}

/// Handler for creating agenda items.
pub struct CreateAgendaItemHandler {
    repository: Arc<dyn AgendaItemRepository>,
}

impl CreateAgendaItemHandler {
    pub fn new(repository: Arc<dyn AgendaItemRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateAgendaItemCommand) -> Result<AgendaItem, VotingError> {
        let item = AgendaItem::new(AgendaItemId::new(), cmd.title, cmd.description)?;

        self.repository.save(&item).await?;

        tracing::info!(agenda_item_id = %item.id(), "Agenda item created");
        Ok(item)
    }
}
