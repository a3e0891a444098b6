//! PostgreSQL implementation of VotingSessionRepository.
//!
//! The partial unique index `uq_voting_sessions_open_per_item` rejects a
//! second OPEN row for an agenda item. Closing is a conditional update on
//! `status = 'OPEN'`, so two sweepers racing on one session cannot both
//! write totals.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{
    AgendaItemId, DomainError, ErrorCode, SessionStatus, Timestamp, VotingSessionId,
};
use crate::domain::voting::VotingSession;
use crate::ports::VotingSessionRepository;

use super::{column, map_sqlx_error, total_from_db, total_to_db};

const SELECT_COLUMNS: &str =
    "SELECT id, agenda_item_id, starts_at, ends_at, status, yes_total, no_total FROM voting_sessions";

/// PostgreSQL implementation of VotingSessionRepository.
#[derive(Clone)]
pub struct PostgresVotingSessionRepository {
    pool: PgPool,
}

impl PostgresVotingSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VotingSessionRepository for PostgresVotingSessionRepository {
    async fn save(&self, session: &VotingSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO voting_sessions (
                id, agenda_item_id, starts_at, ends_at, status, yes_total, no_total
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*session.id().as_uuid())
        .bind(*session.agenda_item_id().as_uuid())
        .bind(*session.starts_at().as_datetime())
        .bind(*session.ends_at().as_datetime())
        .bind(session.status().as_str())
        .bind(total_to_db(session.yes_total()))
        .bind(total_to_db(session.no_total()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert voting session", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &VotingSessionId) -> Result<Option<VotingSession>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch voting session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn find_by_agenda_item_and_status(
        &self,
        agenda_item_id: &AgendaItemId,
        status: SessionStatus,
    ) -> Result<Option<VotingSession>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE agenda_item_id = $1 AND status = $2 ORDER BY starts_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(agenda_item_id.as_uuid())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch voting session by agenda item", e))?;

        row.map(row_to_session).transpose()
    }

    async fn find_expired_open(&self, now: Timestamp) -> Result<Vec<VotingSession>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE status = 'OPEN' AND ends_at <= $1 ORDER BY ends_at ASC",
            SELECT_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list expired voting sessions", e))?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn mark_closed(&self, session: &VotingSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE voting_sessions SET
                status = 'CLOSED',
                yes_total = $2,
                no_total = $3
            WHERE id = $1 AND status = 'OPEN'
            "#,
        )
        .bind(*session.id().as_uuid())
        .bind(total_to_db(session.yes_total()))
        .bind(total_to_db(session.no_total()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("close voting session", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.find_by_id(&session.id()).await? {
            Some(_) => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Voting session {} is already closed", session.id()),
            )),
            None => Err(DomainError::new(
                ErrorCode::VotingSessionNotFound,
                format!("Voting session not found: {}", session.id()),
            )
            .with_detail("session_id", session.id().to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn str_to_session_status(s: &str) -> Result<SessionStatus, DomainError> {
    s.parse::<SessionStatus>().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid session status: {}", s),
        )
    })
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<VotingSession, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let agenda_item_id: uuid::Uuid = column(&row, "agenda_item_id")?;
    let starts_at: chrono::DateTime<chrono::Utc> = column(&row, "starts_at")?;
    let ends_at: chrono::DateTime<chrono::Utc> = column(&row, "ends_at")?;
    let status: String = column(&row, "status")?;
    let yes_total: i64 = column(&row, "yes_total")?;
    let no_total: i64 = column(&row, "no_total")?;

    Ok(VotingSession::reconstitute(
        VotingSessionId::from_uuid(id),
        AgendaItemId::from_uuid(agenda_item_id),
        Timestamp::from_datetime(starts_at),
        Timestamp::from_datetime(ends_at),
        str_to_session_status(&status)?,
        total_from_db("yes_total", yes_total)?,
        total_from_db("no_total", no_total)?,
    ))
}
