//! ResultAggregator - Reconciles fast counters with persisted votes.
//!
//! The counters are read first. When they cannot be read, or when both
//! read as zero, the totals are recounted from the durable vote store.
//!
//! Both-zero is ambiguous: it is either a session nobody voted in or a
//! counter pair that expired or was never written. The recount settles it
//! at the cost of two count queries for genuinely empty sessions.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::voting::{CounterKeys, Tally, TallySource, VoteValue, VotingSession};
use crate::ports::{FastCounter, VoteRepository};

/// Computes a session's final totals.
pub struct ResultAggregator {
    counter: Arc<dyn FastCounter>,
    votes: Arc<dyn VoteRepository>,
}

impl ResultAggregator {
    pub fn new(counter: Arc<dyn FastCounter>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { counter, votes }
    }

    /// Totals for `session` and the path they came from.
    ///
    /// # Errors
    ///
    /// Only the durable recount can fail; counter failures fall back.
    pub async fn aggregate(
        &self,
        session: &VotingSession,
    ) -> Result<(Tally, TallySource), DomainError> {
        let keys = CounterKeys::for_session(&session.id());

        match self.counter.multi_get(&keys.as_vec()).await {
            Ok(values) => {
                let tally = Tally::new(
                    counter_value(values.first().copied().flatten()),
                    counter_value(values.get(1).copied().flatten()),
                );
                if !tally.is_empty() {
                    return Ok((tally, TallySource::Counter));
                }
                tracing::debug!(
                    session_id = %session.id(),
                    "Counters empty, recounting persisted votes"
                );
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "Counter read failed, recounting persisted votes"
                );
            }
        }

        let agenda_item_id = session.agenda_item_id();
        let yes = self
            .votes
            .count_by_agenda_item_and_value(&agenda_item_id, VoteValue::Yes)
            .await?;
        let no = self
            .votes
            .count_by_agenda_item_and_value(&agenda_item_id, VoteValue::No)
            .await?;

        Ok((Tally::new(yes, no), TallySource::Durable))
    }
}

/// Missing or negative counters count as zero.
fn counter_value(raw: Option<i64>) -> u64 {
    raw.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}
