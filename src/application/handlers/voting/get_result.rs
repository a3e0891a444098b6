//! GetResultHandler - Query handler for an agenda item's voting result.

use std::sync::Arc;

use crate::domain::foundation::{AgendaItemId, SessionStatus};
use crate::domain::voting::{Outcome, VotingError, VotingSession};
use crate::ports::VotingSessionRepository;

/// Query for the result of voting on an agenda item.
#[derive(Debug, Clone)]
pub struct GetResultQuery {
    pub agenda_item_id: AgendaItemId,
}

/// Session the result was read from, with its outcome.
///
/// For a session that is still OPEN the totals are zero until it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingResult {
    pub session: VotingSession,
    pub outcome: Outcome,
}

/// Handler for retrieving voting results.
pub struct GetResultHandler {
    sessions: Arc<dyn VotingSessionRepository>,
}

impl GetResultHandler {
    pub fn new(sessions: Arc<dyn VotingSessionRepository>) -> Self {
        Self { sessions }
    }

    /// The most recent CLOSED session if there is one, else the OPEN one.
    ///
    /// # Errors
    ///
    /// - `NoSession` if the agenda item never had a session
    pub async fn handle(&self, query: GetResultQuery) -> Result<VotingResult, VotingError> {
        let id = query.agenda_item_id;

        let closed = self
            .sessions
            .find_by_agenda_item_and_status(&id, SessionStatus::Closed)
            .await?;
        let session = match closed {
            Some(session) => session,
            None => self
                .sessions
                .find_by_agenda_item_and_status(&id, SessionStatus::Open)
                .await?
                .ok_or(VotingError::NoSession(id))?,
        };

        Ok(VotingResult {
            outcome: session.outcome(),
            session,
        })
    }
}
