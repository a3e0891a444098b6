//! CastVoteHandler - Command handler for admitting a vote.
//!
//! Admission runs in this order:
//! 1. agenda item exists, read through the agenda item cache when one is set
//! 2. an OPEN session exists and `now` falls inside its window
//! 3. the vote is inserted; the store's (agenda item, voter) uniqueness
//!    is the only duplicate check
//! 4. the session's fast counter is bumped, best-effort

use std::sync::Arc;

use crate::application::handlers::agenda::{find_agenda_item, AgendaItemCache};
use crate::domain::foundation::{AgendaItemId, SessionStatus, Timestamp, VoterId};
use crate::domain::voting::{CounterKeys, Vote, VoteValue, VotingError, VotingSession};
use crate::ports::{AgendaItemRepository, FastCounter, VoteRepository, VotingSessionRepository};

/// Default expiry of the per-session counters: 48 hours.
pub const DEFAULT_COUNTER_TTL_SECS: u64 = 48 * 60 * 60;

/// Command to cast a vote.
#[derive(Debug, Clone)]
pub struct CastVoteCommand {
    pub agenda_item_id: AgendaItemId,
    pub voter_id: VoterId,
    pub value: VoteValue,
}

/// Handler for casting votes.
pub struct CastVoteHandler {
    agenda_items: Arc<dyn AgendaItemRepository>,
    sessions: Arc<dyn VotingSessionRepository>,
    votes: Arc<dyn VoteRepository>,
    counter: Arc<dyn FastCounter>,
    agenda_cache: Option<AgendaItemCache>,
    counter_ttl_secs: u64,
}

impl CastVoteHandler {
    pub fn new(
        agenda_items: Arc<dyn AgendaItemRepository>,
        sessions: Arc<dyn VotingSessionRepository>,
        votes: Arc<dyn VoteRepository>,
        counter: Arc<dyn FastCounter>,
    ) -> Self {
        Self {
            agenda_items,
            sessions,
            votes,
            counter,
            agenda_cache: None,
            counter_ttl_secs: DEFAULT_COUNTER_TTL_SECS,
        }
    }

    /// Resolve agenda items through `cache` instead of the repository alone.
    pub fn with_agenda_cache(mut self, cache: AgendaItemCache) -> Self {
        self.agenda_cache = Some(cache);
        self
    }

    pub fn with_counter_ttl(mut self, ttl_secs: u64) -> Self {
        self.counter_ttl_secs = ttl_secs;
        self
    }

    /// Cast a vote.
    ///
    /// # Errors
    ///
    /// - `AgendaItemNotFound` / `NoOpenSession` when there is nothing to vote on
    /// - `SessionNotOpen` when `now` is outside the session window
    /// - `AlreadyVoted` when the voter already voted on this agenda item
    pub async fn handle(&self, cmd: CastVoteCommand) -> Result<Vote, VotingError> {
        let agenda_item_id = cmd.agenda_item_id;

        find_agenda_item(&self.agenda_items, self.agenda_cache.as_ref(), agenda_item_id).await?;

        let session = self
            .sessions
            .find_by_agenda_item_and_status(&agenda_item_id, SessionStatus::Open)
            .await?
            .ok_or(VotingError::NoOpenSession(agenda_item_id))?;

        let now = Timestamp::now();
        if !session.is_open_at(now) {
            return Err(VotingError::SessionNotOpen(agenda_item_id));
        }

        let vote = Vote::cast(agenda_item_id, cmd.voter_id, cmd.value, now);
        self.votes.save(&vote).await.map_err(|e| {
            if e.is_unique_violation() {
                VotingError::AlreadyVoted {
                    agenda_item_id,
                    voter_id: vote.voter_id().clone(),
                }
            } else {
                e.into()
            }
        })?;

        self.bump_counter(&session, vote.value()).await;

        tracing::debug!(
            vote_id = %vote.id(),
            session_id = %session.id(),
            value = %vote.value(),
            "Vote registered"
        );
        Ok(vote)
    }

    async fn bump_counter(&self, session: &VotingSession, value: VoteValue) {
        let keys = CounterKeys::for_session(&session.id());
        if let Err(e) = self
            .counter
            .increment_with_expiry(keys.key_for(value), self.counter_ttl_secs)
            .await
        {
            tracing::warn!(
                session_id = %session.id(),
                error = %e,
                "Failed to increment vote counter"
            );
        }
    }
}
