//! GetSessionHandler - Query handler for a single voting session.

use std::sync::Arc;

use crate::domain::foundation::VotingSessionId;
use crate::domain::voting::{VotingError, VotingSession};
use crate::ports::VotingSessionRepository;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: VotingSessionId,
}

/// Handler for retrieving session details.
pub struct GetSessionHandler {
    sessions: Arc<dyn VotingSessionRepository>,
}

impl GetSessionHandler {
    pub fn new(sessions: Arc<dyn VotingSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<VotingSession, VotingError> {
        self.sessions
            .find_by_id(&query.session_id)
            .await?
            .ok_or(VotingError::SessionNotFound(query.session_id))
    }
}
