//! SessionCloser - Drives one expired session to CLOSED.
//!
//! Order matters:
//! 1. aggregate totals (counters, falling back to persisted votes)
//! 2. transition the session and persist it with a status-guarded write
//! 3. announce the result
//! 4. drop the session's counter keys
//!
//! Steps 3 and 4 run only after step 2 committed. Step 4 runs whether or
//! not step 3 succeeded.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::voting::{
    CounterKeys, TallySource, VotingError, VotingResultAnnounced, VotingSession,
};
use crate::ports::{FastCounter, VotingSessionRepository};

use super::{ResultAggregator, ResultPublisher};

/// A session that was closed and announced.
#[derive(Debug, Clone)]
pub struct ClosedSession {
    pub session: VotingSession,
    pub source: TallySource,
}

/// Closes sessions one at a time.
pub struct SessionCloser {
    sessions: Arc<dyn VotingSessionRepository>,
    counter: Arc<dyn FastCounter>,
    aggregator: ResultAggregator,
    publisher: ResultPublisher,
}

impl SessionCloser {
    pub fn new(
        sessions: Arc<dyn VotingSessionRepository>,
        counter: Arc<dyn FastCounter>,
        aggregator: ResultAggregator,
        publisher: ResultPublisher,
    ) -> Self {
        Self {
            sessions,
            counter,
            aggregator,
            publisher,
        }
    }

    /// Close `session` and announce its result.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session was already closed, here or in storage
    /// - `Infrastructure` if aggregation or the closing write failed; the
    ///   session stays OPEN and is retried on the next sweep
    /// - `PublishFailed` if the announcement failed; the session IS closed
    pub async fn close(&self, mut session: VotingSession) -> Result<ClosedSession, VotingError> {
        let (tally, source) = self.aggregator.aggregate(&session).await?;

        session.close(tally)?;
        self.sessions.mark_closed(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            agenda_item_id = %session.agenda_item_id(),
            yes_total = tally.yes,
            no_total = tally.no,
            source = ?source,
            "Voting session closed"
        );

        let event = VotingResultAnnounced::from_closed_session(&session, Timestamp::now());
        let published = self.publisher.publish(&event).await;

        self.clear_counters(&session).await;

        published.map(|()| ClosedSession { session, source })
    }

    async fn clear_counters(&self, session: &VotingSession) {
        let keys = CounterKeys::for_session(&session.id());
        if let Err(e) = self.counter.delete(&keys.as_vec()).await {
            tracing::warn!(
                session_id = %session.id(),
                error = %e,
                "Failed to delete vote counters"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::counter::InMemoryFastCounter;
    use crate::adapters::events::{InMemoryEventBus, PublishBehavior};
    use crate::adapters::storage::InMemoryVotingStore;
    use crate::domain::foundation::{AgendaItemId, SessionStatus, VoterId};
    use crate::domain::voting::{Outcome, Tally, Vote, VoteValue};
    use crate::ports::VoteRepository;
    use std::time::Duration;

    struct Fixture {
        store: InMemoryVotingStore,
        counter: InMemoryFastCounter,
        bus: InMemoryEventBus,
        closer: SessionCloser,
    }

    fn fixture() -> Fixture {
        let store = InMemoryVotingStore::new();
        let counter = InMemoryFastCounter::new();
        let bus = InMemoryEventBus::new();
        let aggregator = ResultAggregator::new(Arc::new(counter.clone()), Arc::new(store.clone()));
        let publisher = ResultPublisher::new(Arc::new(bus.clone()))
            .with_timeout(Duration::from_millis(50));
        let closer = SessionCloser::new(
            Arc::new(store.clone()),
            Arc::new(counter.clone()),
            aggregator,
            publisher,
        );
        Fixture {
            store,
            counter,
            bus,
            closer,
        }
    }

    async fn expired_session_with_votes(f: &Fixture, yes: usize, no: usize) -> VotingSession {
        let session = VotingSession::open(AgendaItemId::new(), 1, Timestamp::now().minus_secs(5));
        VotingSessionRepository::save(&f.store, &session).await.unwrap();
        let keys = CounterKeys::for_session(&session.id());

        let values = std::iter::repeat(VoteValue::Yes)
            .take(yes)
            .chain(std::iter::repeat(VoteValue::No).take(no));
        for (i, value) in values.enumerate() {
            let voter = VoterId::new(format!("member-{}", i)).unwrap();
            let vote = Vote::cast(session.agenda_item_id(), voter, value, Timestamp::now());
            VoteRepository::save(&f.store, &vote).await.unwrap();
            f.counter
                .increment_with_expiry(keys.key_for(value), 60)
                .await
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn closes_persists_and_announces() {
        let f = fixture();
        let session = expired_session_with_votes(&f, 3, 2).await;

        let closed = f.closer.close(session.clone()).await.unwrap();

        assert_eq!(closed.session.status(), SessionStatus::Closed);
        assert_eq!(closed.session.tally(), Tally::new(3, 2));
        assert_eq!(closed.source, TallySource::Counter);

        let stored = f.store.find_by_id(&session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Closed);
        assert_eq!(stored.outcome(), Outcome::Approved);

        let events = f.bus.published_events();
        assert_eq!(events.len(), 1);
        let payload: VotingResultAnnounced = events[0].envelope.payload_as().unwrap();
        assert_eq!(payload.yes_total, 3);
        assert_eq!(payload.no_total, 2);
        assert_eq!(payload.outcome, Outcome::Approved);
    }

    #[tokio::test]
    async fn clears_counters_after_publish() {
        let f = fixture();
        let session = expired_session_with_votes(&f, 1, 0).await;
        let keys = CounterKeys::for_session(&session.id());

        f.closer.close(session).await.unwrap();

        assert_eq!(f.counter.peek(&keys.yes).await, None);
    }

    #[tokio::test]
    async fn publish_failure_keeps_session_closed_and_still_clears_counters() {
        let f = fixture();
        f.bus.set_behavior(PublishBehavior::Fail);
        let session = expired_session_with_votes(&f, 2, 2).await;
        let keys = CounterKeys::for_session(&session.id());

        let err = f.closer.close(session.clone()).await.unwrap_err();

        assert!(matches!(err, VotingError::PublishFailed { .. }));
        let stored = f.store.find_by_id(&session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Closed);
        assert_eq!(stored.tally(), Tally::new(2, 2));
        assert_eq!(f.counter.peek(&keys.yes).await, None);
        assert_eq!(f.bus.attempt_count(), 1);
    }

    #[tokio::test]
    async fn already_closed_session_is_not_announced_twice() {
        let f = fixture();
        let session = expired_session_with_votes(&f, 1, 0).await;

        f.closer.close(session.clone()).await.unwrap();
        let err = f.closer.close(session).await.unwrap_err();

        assert!(matches!(err, VotingError::InvalidState(_)));
        assert_eq!(f.bus.event_count(), 1);
    }

    #[tokio::test]
    async fn storage_failure_leaves_session_open_and_unannounced() {
        let f = fixture();
        let session = expired_session_with_votes(&f, 1, 0).await;
        f.store.fail_close_for(session.id()).await;

        let err = f.closer.close(session.clone()).await.unwrap_err();

        assert!(matches!(err, VotingError::Infrastructure(_)));
        let stored = f.store.find_by_id(&session.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), SessionStatus::Open);
        assert_eq!(f.bus.attempt_count(), 0);
    }

    #[tokio::test]
    async fn counter_outage_uses_durable_totals() {
        let f = fixture();
        let session = expired_session_with_votes(&f, 3, 2).await;
        f.counter.set_available(false);

        let closed = f.closer.close(session).await.unwrap();

        assert_eq!(closed.session.tally(), Tally::new(3, 2));
        assert_eq!(closed.source, TallySource::Durable);
    }
}
