//! Voting session aggregate.
//!
//! A session is one time-boxed voting window for an agenda item.
//!
//! # Lifecycle
//!
//! ```text
//! OPEN ──close──> CLOSED (terminal)
//! ```
//!
//! Admission is gated by the window, not by the status flag alone: an OPEN
//! session whose end has passed no longer accepts votes, even before the
//! sweeper has closed it.

use crate::domain::foundation::{
    AgendaItemId, DomainError, ErrorCode, SessionStatus, Timestamp, ValidationError,
    VotingSessionId,
};
use serde::{Deserialize, Serialize};

use super::{Outcome, Tally};

/// Window length used when none (or a non-positive one) is requested.
pub const DEFAULT_SESSION_DURATION_SECS: i64 = 60;

/// Longest window a session may be opened with: ten years.
pub const MAX_SESSION_DURATION_SECS: i64 = 10 * 366 * 24 * 60 * 60;

/// Resolve a requested window length, falling back to `default_secs` when
/// absent or not positive.
///
/// # Errors
///
/// `InvalidFormat` on `duration_seconds` when the request exceeds
/// [`MAX_SESSION_DURATION_SECS`].
pub fn resolve_duration(
    requested_secs: Option<i64>,
    default_secs: i64,
) -> Result<i64, ValidationError> {
    match requested_secs {
        Some(secs) if secs > MAX_SESSION_DURATION_SECS => Err(ValidationError::invalid_format(
            "duration_seconds",
            format!(
                "must be at most {} seconds, got {}",
                MAX_SESSION_DURATION_SECS, secs
            ),
        )),
        Some(secs) if secs > 0 => Ok(secs),
        _ => Ok(default_secs),
    }
}

/// Voting session aggregate.
///
/// # Invariants
///
/// - `starts_at` has no sub-second part
/// - `starts_at <= ends_at`
/// - totals are only written by `close`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSession {
    id: VotingSessionId,
    agenda_item_id: AgendaItemId,
    starts_at: Timestamp,
    ends_at: Timestamp,
    status: SessionStatus,
    yes_total: u64,
    no_total: u64,
}

impl VotingSession {
    /// Open a new window of `duration_secs` starting at `now`, truncated to
    /// whole seconds. An end beyond the representable range is clamped.
    pub fn open(agenda_item_id: AgendaItemId, duration_secs: i64, now: Timestamp) -> Self {
        let starts_at = now.truncate_to_secs();
        Self {
            id: VotingSessionId::new(),
            agenda_item_id,
            starts_at,
            ends_at: starts_at.plus_secs(duration_secs),
            status: SessionStatus::Open,
            yes_total: 0,
            no_total: 0,
        }
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: VotingSessionId,
        agenda_item_id: AgendaItemId,
        starts_at: Timestamp,
        ends_at: Timestamp,
        status: SessionStatus,
        yes_total: u64,
        no_total: u64,
    ) -> Self {
        Self {
            id,
            agenda_item_id,
            starts_at,
            ends_at,
            status,
            yes_total,
            no_total,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> VotingSessionId {
        self.id
    }

    pub fn agenda_item_id(&self) -> AgendaItemId {
        self.agenda_item_id
    }

    pub fn starts_at(&self) -> Timestamp {
        self.starts_at
    }

    pub fn ends_at(&self) -> Timestamp {
        self.ends_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn yes_total(&self) -> u64 {
        self.yes_total
    }

    pub fn no_total(&self) -> u64 {
        self.no_total
    }

    /// Stored totals. Zero until the session is closed.
    pub fn tally(&self) -> Tally {
        Tally::new(self.yes_total, self.no_total)
    }

    pub fn outcome(&self) -> Outcome {
        self.tally().outcome()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// True iff the session is OPEN and `starts_at <= instant <= ends_at`.
    pub fn is_open_at(&self, instant: Timestamp) -> bool {
        self.status.is_open() && self.starts_at <= instant && instant <= self.ends_at
    }

    /// True once the window's end has been reached.
    pub fn is_expired_at(&self, instant: Timestamp) -> bool {
        self.ends_at <= instant
    }

    /// Mark the session CLOSED with its final totals.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is already closed
    pub fn close(&mut self, tally: Tally) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(SessionStatus::Closed)
            .map_err(|e| {
                DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                    .with_detail("session_id", self.id.to_string())
            })?;
        self.yes_total = tally.yes;
        self.no_total = tally.no;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn open_at(start: i64, duration: i64) -> VotingSession {
        VotingSession::open(AgendaItemId::new(), duration, at(start))
    }

    #[test]
    fn resolve_duration_defaults_missing_and_non_positive() {
        assert_eq!(resolve_duration(None, 60), Ok(60));
        assert_eq!(resolve_duration(Some(0), 60), Ok(60));
        assert_eq!(resolve_duration(Some(-5), 60), Ok(60));
        assert_eq!(resolve_duration(Some(300), 60), Ok(300));
    }

    #[test]
    fn resolve_duration_caps_requested_window() {
        assert_eq!(
            resolve_duration(Some(MAX_SESSION_DURATION_SECS), 60),
            Ok(MAX_SESSION_DURATION_SECS)
        );
        for requested in [MAX_SESSION_DURATION_SECS + 1, 1_000_000_000_000_000, i64::MAX] {
            let err = resolve_duration(Some(requested), 60).unwrap_err();
            assert!(matches!(
                err,
                ValidationError::InvalidFormat { ref field, .. } if field == "duration_seconds"
            ));
        }
    }

    #[test]
    fn open_with_huge_duration_clamps_instead_of_overflowing() {
        let session = VotingSession::open(AgendaItemId::new(), i64::MAX, at(1_000));
        assert!(session.ends_at() > session.starts_at());
        assert!(session.is_open_at(at(1_000_000_000)));
    }

    #[test]
    fn open_truncates_start_to_whole_seconds() {
        let now = Timestamp::from_datetime(
            chrono::DateTime::from_timestamp(1_700_000_000, 750_000_000).unwrap(),
        );
        let session = VotingSession::open(AgendaItemId::new(), 60, now);
        assert_eq!(session.starts_at(), at(1_700_000_000));
        assert_eq!(session.ends_at(), at(1_700_000_060));
        assert_eq!(session.status(), SessionStatus::Open);
        assert_eq!(session.tally(), Tally::default());
    }

    #[test]
    fn window_is_closed_on_both_ends() {
        let session = open_at(1_000, 10);
        assert!(!session.is_open_at(at(999)));
        assert!(session.is_open_at(at(1_000)));
        assert!(session.is_open_at(at(1_005)));
        assert!(session.is_open_at(at(1_010)));
        assert!(!session.is_open_at(at(1_011)));
    }

    #[test]
    fn closed_session_is_never_open() {
        let mut session = open_at(1_000, 10);
        session.close(Tally::new(1, 0)).unwrap();
        assert!(!session.is_open_at(at(1_005)));
    }

    #[test]
    fn close_records_totals() {
        let mut session = open_at(1_000, 10);
        session.close(Tally::new(3, 2)).unwrap();
        assert_eq!(session.status(), SessionStatus::Closed);
        assert_eq!(session.yes_total(), 3);
        assert_eq!(session.no_total(), 2);
        assert_eq!(session.outcome(), Outcome::Approved);
    }

    #[test]
    fn close_twice_is_rejected_and_keeps_first_totals() {
        let mut session = open_at(1_000, 10);
        session.close(Tally::new(3, 2)).unwrap();

        let err = session.close(Tally::new(0, 9)).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(session.tally(), Tally::new(3, 2));
    }

    #[test]
    fn expiry_includes_end_instant() {
        let session = open_at(1_000, 10);
        assert!(!session.is_expired_at(at(1_009)));
        assert!(session.is_expired_at(at(1_010)));
    }

    proptest! {
        #[test]
        fn admission_matches_window(
            start in 0i64..1_000_000,
            duration in 1i64..10_000,
            offset in -20_000i64..20_000,
        ) {
            let session = open_at(start, duration);
            let instant = at(start + offset);
            let inside = offset >= 0 && offset <= duration;
            prop_assert_eq!(session.is_open_at(instant), inside);
        }
    }
}
