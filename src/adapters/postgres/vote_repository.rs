//! PostgreSQL implementation of VoteRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{AgendaItemId, DomainError};
use crate::domain::voting::{Vote, VoteValue};
use crate::ports::VoteRepository;

use super::{map_sqlx_error, total_from_db};

/// PostgreSQL implementation of VoteRepository.
///
/// Duplicate (agenda item, voter) inserts hit `uq_votes_agenda_item_voter`
/// and surface as `UniqueViolation`.
#[derive(Clone)]
pub struct PostgresVoteRepository {
    pool: PgPool,
}

impl PostgresVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn save(&self, vote: &Vote) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO votes (id, agenda_item_id, voter_id, value, cast_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*vote.id().as_uuid())
        .bind(*vote.agenda_item_id().as_uuid())
        .bind(vote.voter_id().as_str())
        .bind(vote.value().as_str())
        .bind(*vote.cast_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert vote", e))?;

        Ok(())
    }

    async fn count_by_agenda_item_and_value(
        &self,
        agenda_item_id: &AgendaItemId,
        value: VoteValue,
    ) -> Result<u64, DomainError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM votes WHERE agenda_item_id = $1 AND value = $2")
                .bind(agenda_item_id.as_uuid())
                .bind(value.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("count votes", e))?;

        total_from_db("vote count", result.0)
    }
}
