//! End-to-end voting flow over the in-memory adapters.
//!
//! Covers the full lifecycle:
//! 1. An agenda item is created and a session opened for it
//! 2. Members cast ballots while the window is open
//! 3. The expiration sweeper closes the session once the window passes
//! 4. The result is persisted and announced exactly once

use std::sync::Arc;
use std::time::Duration;

use coop_voting::adapters::events::PublishBehavior;
use coop_voting::adapters::{
    InMemoryDistributedLock, InMemoryEventBus, InMemoryFastCounter, InMemoryVotingStore,
};
use coop_voting::application::handlers::{
    CastVoteCommand, CastVoteHandler, CreateAgendaItemCommand, CreateAgendaItemHandler,
    GetResultHandler, GetResultQuery, OpenSessionCommand, OpenSessionHandler,
};
use coop_voting::application::services::{
    ExpirationSweeper, ExpirationSweeperConfig, ResultAggregator, ResultPublisher, SessionCloser,
};
use coop_voting::domain::foundation::{AgendaItemId, SessionStatus, VoterId};
use coop_voting::domain::voting::{
    Outcome, Tally, VoteValue, VotingError, VotingResultAnnounced, VotingSession,
};
use coop_voting::ports::VotingSessionRepository;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    store: InMemoryVotingStore,
    counter: InMemoryFastCounter,
    bus: InMemoryEventBus,
    create_item: CreateAgendaItemHandler,
    open: Arc<OpenSessionHandler>,
    cast: Arc<CastVoteHandler>,
    result: GetResultHandler,
    sweeper: ExpirationSweeper,
}

fn harness() -> Harness {
    harness_with_publish_timeout(Duration::from_secs(1))
}

fn harness_with_publish_timeout(publish_timeout: Duration) -> Harness {
    let store = InMemoryVotingStore::new();
    let counter = InMemoryFastCounter::new();
    let bus = InMemoryEventBus::new();
    let lock = InMemoryDistributedLock::new();

    let closer = Arc::new(SessionCloser::new(
        Arc::new(store.clone()),
        Arc::new(counter.clone()),
        ResultAggregator::new(Arc::new(counter.clone()), Arc::new(store.clone())),
        ResultPublisher::new(Arc::new(bus.clone())).with_timeout(publish_timeout),
    ));
    let sweeper = ExpirationSweeper::with_config(
        Arc::new(store.clone()),
        Arc::new(lock),
        closer,
        ExpirationSweeperConfig::default().with_lock_hold(Duration::ZERO, Duration::from_secs(30)),
    );

    Harness {
        create_item: CreateAgendaItemHandler::new(Arc::new(store.clone())),
        open: Arc::new(OpenSessionHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )),
        cast: Arc::new(CastVoteHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(counter.clone()),
        )),
        result: GetResultHandler::new(Arc::new(store.clone())),
        sweeper,
        store,
        counter,
        bus,
    }
}

impl Harness {
    async fn agenda_item(&self, title: &str) -> AgendaItemId {
        self.create_item
            .handle(CreateAgendaItemCommand {
                title: title.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id()
    }

    /// Opens a two-second session. Start times are truncated to whole
    /// seconds, so this leaves at least one second to vote in.
    async fn open_short_session(&self, agenda_item_id: AgendaItemId) -> VotingSession {
        self.open
            .handle(OpenSessionCommand {
                agenda_item_id,
                duration_secs: Some(2),
            })
            .await
            .unwrap()
    }

    async fn vote(
        &self,
        agenda_item_id: AgendaItemId,
        voter: &str,
        value: VoteValue,
    ) -> Result<(), VotingError> {
        self.cast
            .handle(CastVoteCommand {
                agenda_item_id,
                voter_id: VoterId::new(voter).unwrap(),
                value,
            })
            .await
            .map(|_| ())
    }

    async fn cast_ballots(&self, agenda_item_id: AgendaItemId, yes: usize, no: usize) {
        for i in 0..yes {
            self.vote(agenda_item_id, &format!("yes-{}", i), VoteValue::Yes)
                .await
                .unwrap();
        }
        for i in 0..no {
            self.vote(agenda_item_id, &format!("no-{}", i), VoteValue::No)
                .await
                .unwrap();
        }
    }

    async fn stored(&self, session: &VotingSession) -> VotingSession {
        self.store.find_by_id(&session.id()).await.unwrap().unwrap()
    }
}

async fn wait_until_expired(session: &VotingSession) {
    let remaining = (*session.ends_at().as_datetime() - chrono::Utc::now())
        .to_std()
        .unwrap_or_default();
    tokio::time::sleep(remaining + Duration::from_millis(50)).await;
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn expired_session_closes_with_counted_totals_and_one_announcement() {
    let h = harness();
    let item = h.agenda_item("Approve annual budget").await;
    let session = h.open_short_session(item).await;
    h.cast_ballots(item, 3, 2).await;

    wait_until_expired(&session).await;
    let report = h.sweeper.run_once().await;

    assert!(report.lock_acquired);
    assert_eq!(report.closed, 1);

    let result = h.result.handle(GetResultQuery { agenda_item_id: item }).await.unwrap();
    assert_eq!(result.session.status(), SessionStatus::Closed);
    assert_eq!(result.session.tally(), Tally::new(3, 2));
    assert_eq!(result.outcome, Outcome::Approved);

    let events = h.bus.published_events();
    assert_eq!(events.len(), 1);
    let payload: VotingResultAnnounced = events[0].envelope.payload_as().unwrap();
    assert_eq!(payload.session_id, session.id());
    assert_eq!(payload.yes_total, 3);
    assert_eq!(payload.no_total, 2);
}

#[tokio::test]
async fn second_ballot_from_same_voter_is_rejected() {
    let h = harness();
    let item = h.agenda_item("Elect treasurer").await;
    h.open_short_session(item).await;

    h.vote(item, "member-42", VoteValue::Yes).await.unwrap();
    let err = h.vote(item, "member-42", VoteValue::No).await.unwrap_err();

    assert!(matches!(err, VotingError::AlreadyVoted { .. }));
    assert_eq!(h.store.vote_count(&item).await, 1);
}

#[tokio::test]
async fn unreachable_counter_at_closure_falls_back_to_persisted_votes() {
    let h = harness();
    let item = h.agenda_item("Adopt new bylaws").await;
    let session = h.open_short_session(item).await;
    h.cast_ballots(item, 3, 2).await;
    h.counter.set_available(false);

    wait_until_expired(&session).await;
    let report = h.sweeper.run_once().await;

    assert_eq!(report.closed, 1);
    let stored = h.stored(&session).await;
    assert_eq!(stored.tally(), Tally::new(3, 2));
    assert_eq!(stored.outcome(), Outcome::Approved);
}

#[tokio::test]
async fn publish_timeout_keeps_session_closed_and_is_not_retried() {
    let h = harness_with_publish_timeout(Duration::from_millis(50));
    h.bus.set_behavior(PublishBehavior::Delay(Duration::from_millis(500)));
    let item = h.agenda_item("Renovate common room").await;
    let session = h.open_short_session(item).await;
    h.cast_ballots(item, 3, 2).await;

    wait_until_expired(&session).await;
    let first = h.sweeper.run_once().await;
    let second = h.sweeper.run_once().await;

    assert_eq!(first.publish_failures, 1);
    assert_eq!(first.closed, 0);
    assert_eq!(second.expired, 0);

    let stored = h.stored(&session).await;
    assert_eq!(stored.status(), SessionStatus::Closed);
    assert_eq!(stored.tally(), Tally::new(3, 2));
    assert_eq!(h.bus.attempt_count(), 1);
    assert_eq!(h.bus.event_count(), 0);
}

// =============================================================================
// Invariants
// =============================================================================

#[tokio::test]
async fn concurrent_opens_for_same_item_yield_one_conflict() {
    let h = harness();
    let item = h.agenda_item("Hire property manager").await;

    let attempts: Vec<_> = (0..2)
        .map(|_| {
            let open = h.open.clone();
            tokio::spawn(async move {
                open.handle(OpenSessionCommand {
                    agenda_item_id: item,
                    duration_secs: None,
                })
                .await
            })
        })
        .collect();

    let mut opened = 0;
    let mut conflicts = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => opened += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(opened, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(h.store.open_session_count(&item).await, 1);
}

#[tokio::test]
async fn concurrent_duplicate_ballots_yield_one_success() {
    let h = harness();
    let item = h.agenda_item("Raise membership fee").await;
    h.open_short_session(item).await;

    let attempts: Vec<_> = [VoteValue::Yes, VoteValue::No]
        .into_iter()
        .map(|value| {
            let cast = h.cast.clone();
            tokio::spawn(async move {
                cast.handle(CastVoteCommand {
                    agenda_item_id: item,
                    voter_id: VoterId::new("member-7").unwrap(),
                    value,
                })
                .await
            })
        })
        .collect();

    let mut accepted = 0;
    let mut duplicates = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(VotingError::AlreadyVoted { .. }) => duplicates += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(h.store.vote_count(&item).await, 1);
}

#[tokio::test]
async fn ballot_after_window_is_rejected() {
    let h = harness();
    let item = h.agenda_item("Plant a garden").await;
    let session = h.open_short_session(item).await;

    wait_until_expired(&session).await;
    let err = h.vote(item, "member-1", VoteValue::Yes).await.unwrap_err();

    assert!(matches!(err, VotingError::SessionNotOpen(_)));
    assert_eq!(h.store.vote_count(&item).await, 0);
}

#[tokio::test]
async fn failed_closure_does_not_block_other_sessions() {
    let h = harness();
    let broken_item = h.agenda_item("Broken").await;
    let healthy_item = h.agenda_item("Healthy").await;
    let broken = h.open_short_session(broken_item).await;
    let healthy = h.open_short_session(healthy_item).await;
    h.cast_ballots(healthy_item, 1, 0).await;
    h.store.fail_close_for(broken.id()).await;

    wait_until_expired(&broken).await;
    wait_until_expired(&healthy).await;
    let report = h.sweeper.run_once().await;

    assert_eq!(report.expired, 2);
    assert_eq!(report.closed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(h.stored(&broken).await.status(), SessionStatus::Open);
    assert_eq!(h.stored(&healthy).await.status(), SessionStatus::Closed);
    assert_eq!(h.bus.event_count(), 1);
}

#[tokio::test]
async fn closed_totals_match_persisted_votes() {
    let h = harness();
    let mixes = [(0, 0), (1, 0), (2, 5), (4, 4)];

    let mut sessions = Vec::new();
    for (i, (yes, no)) in mixes.iter().enumerate() {
        let item = h.agenda_item(&format!("Motion {}", i)).await;
        let session = h.open_short_session(item).await;
        h.cast_ballots(item, *yes, *no).await;
        sessions.push((item, session, *yes, *no));
    }

    for (_, session, _, _) in &sessions {
        wait_until_expired(session).await;
    }
    let report = h.sweeper.run_once().await;
    assert_eq!(report.closed, mixes.len());

    for (item, session, yes, no) in sessions {
        let stored = h.stored(&session).await;
        assert_eq!(stored.tally(), Tally::new(yes as u64, no as u64));
        assert_eq!(stored.tally().total() as usize, h.store.vote_count(&item).await);
        assert_eq!(stored.outcome(), Outcome::from_totals(yes as u64, no as u64));
    }
}
