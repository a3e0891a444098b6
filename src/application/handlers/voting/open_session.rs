//! OpenSessionHandler - Command handler for opening a voting window.

use std::sync::Arc;

use crate::application::handlers::agenda::{find_agenda_item, AgendaItemCache};
use crate::domain::foundation::{AgendaItemId, SessionStatus, Timestamp};
use crate::domain::voting::{
    resolve_duration, VotingError, VotingSession, DEFAULT_SESSION_DURATION_SECS,
};
use crate::ports::{AgendaItemRepository, VotingSessionRepository};

/// Command to open a voting session on an agenda item.
#[derive(Debug, Clone)]
pub struct OpenSessionCommand {
    pub agenda_item_id: AgendaItemId,
    /// Window length; missing or non-positive means the default.
    pub duration_secs: Option<i64>,
}

/// Handler for opening voting sessions.
pub struct OpenSessionHandler {
    agenda_items: Arc<dyn AgendaItemRepository>,
    sessions: Arc<dyn VotingSessionRepository>,
    agenda_cache: Option<AgendaItemCache>,
    default_duration_secs: i64,
}

impl OpenSessionHandler {
    pub fn new(
        agenda_items: Arc<dyn AgendaItemRepository>,
        sessions: Arc<dyn VotingSessionRepository>,
    ) -> Self {
        Self {
            agenda_items,
            sessions,
            agenda_cache: None,
            default_duration_secs: DEFAULT_SESSION_DURATION_SECS,
        }
    }

    /// Resolve agenda items through `cache` instead of the repository alone.
    pub fn with_agenda_cache(mut self, cache: AgendaItemCache) -> Self {
        self.agenda_cache = Some(cache);
        self
    }

    pub fn with_default_duration(mut self, secs: i64) -> Self {
        self.default_duration_secs = secs;
        self
    }

    /// Open a session.
    ///
    /// # Errors
    ///
    /// - `Validation` if the requested window exceeds the maximum duration
    /// - `AgendaItemNotFound` if the agenda item doesn't exist
    /// - `SessionAlreadyOpen` if an OPEN session exists, including one
    ///   inserted concurrently between the check and the write
    pub async fn handle(&self, cmd: OpenSessionCommand) -> Result<VotingSession, VotingError> {
        let agenda_item_id = cmd.agenda_item_id;
        let duration = resolve_duration(cmd.duration_secs, self.default_duration_secs)?;

        find_agenda_item(&self.agenda_items, self.agenda_cache.as_ref(), agenda_item_id).await?;

        let existing = self
            .sessions
            .find_by_agenda_item_and_status(&agenda_item_id, SessionStatus::Open)
            .await?;
        if existing.is_some() {
            return Err(VotingError::SessionAlreadyOpen(agenda_item_id));
        }

        let session = VotingSession::open(agenda_item_id, duration, Timestamp::now());

        self.sessions.save(&session).await.map_err(|e| {
            if e.is_unique_violation() {
                VotingError::SessionAlreadyOpen(agenda_item_id)
            } else {
                e.into()
            }
        })?;

        tracing::info!(
            session_id = %session.id(),
            agenda_item_id = %agenda_item_id,
            ends_at = %session.ends_at().as_datetime(),
            "Voting session opened"
        );
        Ok(session)
    }
}
