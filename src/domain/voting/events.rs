//! Voting domain events.

use crate::domain::foundation::{AgendaItemId, DomainEvent, EventId, Timestamp, VotingSessionId};
use serde::{Deserialize, Serialize};

use super::{Outcome, VotingSession};

/// Announced once per session closure.
///
/// Downstream consumers receive the camelCase payload
/// `{agendaItemId, sessionId, yesTotal, naoTotal, outcome, sessionEndTime, publishTime}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingResultAnnounced {
    #[serde(skip, default)]
    pub event_id: EventId,
    pub agenda_item_id: AgendaItemId,
    pub session_id: VotingSessionId,
    pub yes_total: u64,
    #[serde(rename = "naoTotal")]
    pub no_total: u64,
    pub outcome: Outcome,
    pub session_end_time: Timestamp,
    pub publish_time: Timestamp,
}

impl VotingResultAnnounced {
    /// Build the announcement for a closed session.
    pub fn from_closed_session(session: &VotingSession, publish_time: Timestamp) -> Self {
        Self {
            event_id: EventId::new(),
            agenda_item_id: session.agenda_item_id(),
            session_id: session.id(),
            yes_total: session.yes_total(),
            no_total: session.no_total(),
            outcome: session.outcome(),
            session_end_time: session.ends_at(),
            publish_time,
        }
    }

    /// Partition key: all results for one agenda item share a partition.
    pub fn partition_key(&self) -> String {
        self.agenda_item_id.to_string()
    }
}

impl DomainEvent for VotingResultAnnounced {
    fn event_type(&self) -> &'static str {
        "voting.result_announced.v1"
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn aggregate_id(&self) -> String {
        self.agenda_item_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "AgendaItem"
    }

    fn occurred_at(&self) -> Timestamp {
        self.publish_time
    }
}
