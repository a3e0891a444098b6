//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAgendaItemRepository` - Agenda items
//! - `PostgresVotingSessionRepository` - Sessions, one OPEN per item via a
//!   partial unique index
//! - `PostgresVoteRepository` - Votes, unique per (agenda item, voter)

mod agenda_item_repository;
mod vote_repository;
mod voting_session_repository;

pub use agenda_item_repository::PostgresAgendaItemRepository;
pub use vote_repository::PostgresVoteRepository;
pub use voting_session_repository::PostgresVotingSessionRepository;

use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Translate a sqlx failure, keeping unique violations distinguishable.
pub(crate) fn map_sqlx_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let err = DomainError::new(
                ErrorCode::UniqueViolation,
                format!("Failed to {}: {}", context, db.message()),
            );
            return match db.constraint() {
                Some(constraint) => err.with_detail("constraint", constraint),
                None => err,
            };
        }
    }
    DomainError::database(format!("Failed to {}: {}", context, e))
}

/// Read one column, mapping decode failures to `DatabaseError`.
pub(crate) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

/// Totals are BIGINT in storage.
pub(crate) fn total_to_db(total: u64) -> i64 {
    i64::try_from(total).unwrap_or(i64::MAX)
}

pub(crate) fn total_from_db(name: &str, value: i64) -> Result<u64, DomainError> {
    u64::try_from(value)
        .map_err(|_| DomainError::database(format!("Negative {} in storage: {}", name, value)))
}
