//! HTTP DTOs for voting endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::voting::VotingResult;
use crate::domain::foundation::SessionStatus;
use crate::domain::voting::{Outcome, Vote, VoteValue, VotingSession};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to open a session. The body itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub duration_seconds: Option<i64>,
}

/// Request to cast a ballot.
///
/// `value` stays a string here so a bad ballot value is reported as a
/// validation error rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub voter_id: String,
    pub value: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub agenda_item_id: String,
    pub starts_at: String,
    pub ends_at: String,
    pub status: SessionStatus,
    pub yes_total: u64,
    pub no_total: u64,
    /// Present once the session is closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl From<&VotingSession> for SessionResponse {
    fn from(session: &VotingSession) -> Self {
        let outcome = match session.status() {
            SessionStatus::Closed => Some(session.outcome()),
            SessionStatus::Open => None,
        };
        Self {
            id: session.id().to_string(),
            agenda_item_id: session.agenda_item_id().to_string(),
            starts_at: session.starts_at().as_datetime().to_rfc3339(),
            ends_at: session.ends_at().as_datetime().to_rfc3339(),
            status: session.status(),
            yes_total: session.yes_total(),
            no_total: session.no_total(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: String,
    pub agenda_item_id: String,
    pub voter_id: String,
    pub value: VoteValue,
    pub cast_at: String,
}

impl From<&Vote> for VoteResponse {
    fn from(vote: &Vote) -> Self {
        Self {
            id: vote.id().to_string(),
            agenda_item_id: vote.agenda_item_id().to_string(),
            voter_id: vote.voter_id().as_str().to_string(),
            value: vote.value(),
            cast_at: vote.cast_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Totals and outcome for an agenda item's latest relevant session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub agenda_item_id: String,
    pub session_id: String,
    pub status: SessionStatus,
    pub yes_total: u64,
    pub no_total: u64,
    pub outcome: Outcome,
    pub ends_at: String,
}

impl From<&VotingResult> for ResultResponse {
    fn from(result: &VotingResult) -> Self {
        let session = &result.session;
        Self {
            agenda_item_id: session.agenda_item_id().to_string(),
            session_id: session.id().to_string(),
            status: session.status(),
            yes_total: session.yes_total(),
            no_total: session.no_total(),
            outcome: result.outcome,
            ends_at: session.ends_at().as_datetime().to_rfc3339(),
        }
    }
}
