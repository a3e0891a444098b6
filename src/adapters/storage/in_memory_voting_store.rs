//! In-Memory Voting Store
//!
//! Implements the three durable repository ports over one shared state.
//! The uniqueness rules the database enforces with indexes are checked
//! under a single lock here, so concurrent writers see the same
//! `UniqueViolation` outcomes they would against Postgres.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::agenda::AgendaItem;
use crate::domain::foundation::{
    AgendaItemId, DomainError, ErrorCode, SessionStatus, Timestamp, VotingSessionId,
};
use crate::domain::voting::{Vote, VoteValue, VotingSession};
use crate::ports::{AgendaItemRepository, VoteRepository, VotingSessionRepository};

#[derive(Debug, Default)]
struct State {
    agenda_items: HashMap<AgendaItemId, AgendaItem>,
    sessions: HashMap<VotingSessionId, VotingSession>,
    votes: Vec<Vote>,
    failing_closes: HashSet<VotingSessionId>,
}

/// In-memory durable store for agenda items, sessions and votes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVotingStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryVotingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `mark_closed` fail for one session (tests).
    pub async fn fail_close_for(&self, session_id: VotingSessionId) {
        self.state.lock().await.failing_closes.insert(session_id);
    }

    /// Total persisted votes for an agenda item.
    pub async fn vote_count(&self, agenda_item_id: &AgendaItemId) -> usize {
        self.state
            .lock()
            .await
            .votes
            .iter()
            .filter(|v| &v.agenda_item_id() == agenda_item_id)
            .count()
    }

    /// Sessions currently OPEN for an agenda item.
    pub async fn open_session_count(&self, agenda_item_id: &AgendaItemId) -> usize {
        self.state
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| &s.agenda_item_id() == agenda_item_id && s.status().is_open())
            .count()
    }
}

fn unique_violation(message: String, constraint: &str) -> DomainError {
    DomainError::new(ErrorCode::UniqueViolation, message).with_detail("constraint", constraint)
}

#[async_trait]
impl AgendaItemRepository for InMemoryVotingStore {
    async fn save(&self, item: &AgendaItem) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.agenda_items.contains_key(&item.id()) {
            return Err(unique_violation(
                format!("Agenda item {} already exists", item.id()),
                "agenda_items_pkey",
            ));
        }
        state.agenda_items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AgendaItemId) -> Result<Option<AgendaItem>, DomainError> {
        Ok(self.state.lock().await.agenda_items.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<AgendaItem>, DomainError> {
        let state = self.state.lock().await;
        let mut items: Vec<AgendaItem> = state.agenda_items.values().cloned().collect();
        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(items)
    }
}

#[async_trait]
impl VotingSessionRepository for InMemoryVotingStore {
    async fn save(&self, session: &VotingSession) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let already_open = state.sessions.values().any(|s| {
            s.agenda_item_id() == session.agenda_item_id() && s.status().is_open()
        });
        if session.status().is_open() && already_open {
            return Err(unique_violation(
                format!(
                    "Agenda item {} already has an open session",
                    session.agenda_item_id()
                ),
                "uq_voting_sessions_open_per_item",
            ));
        }
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &VotingSessionId) -> Result<Option<VotingSession>, DomainError> {
        Ok(self.state.lock().await.sessions.get(id).cloned())
    }

    async fn find_by_agenda_item_and_status(
        &self,
        agenda_item_id: &AgendaItemId,
        status: SessionStatus,
    ) -> Result<Option<VotingSession>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .filter(|s| &s.agenda_item_id() == agenda_item_id && s.status() == status)
            .max_by_key(|s| s.starts_at())
            .cloned())
    }

    async fn find_expired_open(&self, now: Timestamp) -> Result<Vec<VotingSession>, DomainError> {
        let state = self.state.lock().await;
        let mut expired: Vec<VotingSession> = state
            .sessions
            .values()
            .filter(|s| s.status().is_open() && s.is_expired_at(now))
            .cloned()
            .collect();
        expired.sort_by_key(|s| s.ends_at());
        Ok(expired)
    }

    async fn mark_closed(&self, session: &VotingSession) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.failing_closes.contains(&session.id()) {
            return Err(DomainError::database(format!(
                "Simulated failure closing session {}",
                session.id()
            )));
        }
        let stored = state.sessions.get_mut(&session.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::VotingSessionNotFound,
                format!("Voting session not found: {}", session.id()),
            )
            .with_detail("session_id", session.id().to_string())
        })?;
        if !stored.status().is_open() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Voting session {} is already closed", session.id()),
            ));
        }
        *stored = session.clone();
        Ok(())
    }
}

#[async_trait]
impl VoteRepository for InMemoryVotingStore {
    async fn save(&self, vote: &Vote) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let duplicate = state.votes.iter().any(|v| {
            v.agenda_item_id() == vote.agenda_item_id() && v.voter_id() == vote.voter_id()
        });
        if duplicate {
            return Err(unique_violation(
                format!(
                    "Voter {} already voted on agenda item {}",
                    vote.voter_id(),
                    vote.agenda_item_id()
                ),
                "uq_votes_agenda_item_voter",
            ));
        }
        state.votes.push(vote.clone());
        Ok(())
    }

    async fn count_by_agenda_item_and_value(
        &self,
        agenda_item_id: &AgendaItemId,
        value: VoteValue,
    ) -> Result<u64, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .votes
            .iter()
            .filter(|v| &v.agenda_item_id() == agenda_item_id && v.value() == value)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::VoterId;
    use crate::domain::voting::Tally;

    fn agenda_item() -> AgendaItem {
        AgendaItem::new(AgendaItemId::new(), "Budget".to_string(), None).unwrap()
    }

    fn vote(item: AgendaItemId, voter: &str, value: VoteValue) -> Vote {
        Vote::cast(item, VoterId::new(voter).unwrap(), value, Timestamp::now())
    }

    #[tokio::test]
    async fn second_open_session_is_a_unique_violation() {
        let store = InMemoryVotingStore::new();
        let item = AgendaItemId::new();

        VotingSessionRepository::save(&store, &VotingSession::open(item, 60, Timestamp::now()))
            .await
            .unwrap();
        let err = VotingSessionRepository::save(
            &store,
            &VotingSession::open(item, 60, Timestamp::now()),
        )
        .await
        .unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(store.open_session_count(&item).await, 1);
    }

    #[tokio::test]
    async fn closed_session_allows_a_new_open_one() {
        let store = InMemoryVotingStore::new();
        let item = AgendaItemId::new();
        let mut first = VotingSession::open(item, 60, Timestamp::now());
        VotingSessionRepository::save(&store, &first).await.unwrap();

        first.close(Tally::new(1, 0)).unwrap();
        store.mark_closed(&first).await.unwrap();

        VotingSessionRepository::save(&store, &VotingSession::open(item, 60, Timestamp::now()))
            .await
            .unwrap();
        assert_eq!(store.open_session_count(&item).await, 1);
    }

    #[tokio::test]
    async fn duplicate_vote_is_a_unique_violation() {
        let store = InMemoryVotingStore::new();
        let item = AgendaItemId::new();

        VoteRepository::save(&store, &vote(item, "voter-1", VoteValue::Yes))
            .await
            .unwrap();
        let err = VoteRepository::save(&store, &vote(item, "voter-1", VoteValue::No))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(store.vote_count(&item).await, 1);
    }

    #[tokio::test]
    async fn same_voter_may_vote_on_different_items() {
        let store = InMemoryVotingStore::new();
        VoteRepository::save(&store, &vote(AgendaItemId::new(), "voter-1", VoteValue::Yes))
            .await
            .unwrap();
        VoteRepository::save(&store, &vote(AgendaItemId::new(), "voter-1", VoteValue::Yes))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn counts_votes_by_value() {
        let store = InMemoryVotingStore::new();
        let item = AgendaItemId::new();
        for (voter, value) in [("a", VoteValue::Yes), ("b", VoteValue::No), ("c", VoteValue::Yes)] {
            VoteRepository::save(&store, &vote(item, voter, value)).await.unwrap();
        }

        assert_eq!(
            store.count_by_agenda_item_and_value(&item, VoteValue::Yes).await.unwrap(),
            2
        );
        assert_eq!(
            store.count_by_agenda_item_and_value(&item, VoteValue::No).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn mark_closed_rejects_already_closed_session() {
        let store = InMemoryVotingStore::new();
        let mut session = VotingSession::open(AgendaItemId::new(), 60, Timestamp::now());
        VotingSessionRepository::save(&store, &session).await.unwrap();
        session.close(Tally::new(2, 1)).unwrap();

        store.mark_closed(&session).await.unwrap();
        let err = store.mark_closed(&session).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn mark_closed_unknown_session_is_not_found() {
        let store = InMemoryVotingStore::new();
        let mut session = VotingSession::open(AgendaItemId::new(), 60, Timestamp::now());
        session.close(Tally::default()).unwrap();

        let err = store.mark_closed(&session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VotingSessionNotFound);
        assert_eq!(err.details.get("session_id"), Some(&session.id().to_string()));
    }

    #[tokio::test]
    async fn find_expired_open_orders_by_end_and_skips_live_sessions() {
        let store = InMemoryVotingStore::new();
        let now = Timestamp::now();
        let later = VotingSession::open(AgendaItemId::new(), 5, now.minus_secs(10));
        let earlier = VotingSession::open(AgendaItemId::new(), 1, now.minus_secs(10));
        let live = VotingSession::open(AgendaItemId::new(), 600, now);
        for s in [&later, &earlier, &live] {
            VotingSessionRepository::save(&store, s).await.unwrap();
        }

        let expired = store.find_expired_open(now).await.unwrap();
        let ids: Vec<_> = expired.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![earlier.id(), later.id()]);
    }

    #[tokio::test]
    async fn list_all_returns_newest_first() {
        let store = InMemoryVotingStore::new();
        let old = AgendaItem::reconstitute(
            AgendaItemId::new(),
            "Old".to_string(),
            None,
            Timestamp::now().minus_secs(100),
        );
        let new = agenda_item();
        AgendaItemRepository::save(&store, &old).await.unwrap();
        AgendaItemRepository::save(&store, &new).await.unwrap();

        let items = store.list_all().await.unwrap();
        assert_eq!(items[0].id(), new.id());
        assert_eq!(items[1].id(), old.id());
    }

    #[tokio::test]
    async fn fail_close_for_only_affects_that_session() {
        let store = InMemoryVotingStore::new();
        let mut broken = VotingSession::open(AgendaItemId::new(), 60, Timestamp::now());
        let mut healthy = VotingSession::open(AgendaItemId::new(), 60, Timestamp::now());
        VotingSessionRepository::save(&store, &broken).await.unwrap();
        VotingSessionRepository::save(&store, &healthy).await.unwrap();
        store.fail_close_for(broken.id()).await;

        broken.close(Tally::default()).unwrap();
        healthy.close(Tally::default()).unwrap();

        assert_eq!(
            store.mark_closed(&broken).await.unwrap_err().code,
            ErrorCode::DatabaseError
        );
        store.mark_closed(&healthy).await.unwrap();
    }
}
