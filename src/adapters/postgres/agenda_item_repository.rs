//! PostgreSQL implementation of AgendaItemRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::agenda::AgendaItem;
use crate::domain::foundation::{AgendaItemId, DomainError, Timestamp};
use crate::ports::AgendaItemRepository;

use super::{column, map_sqlx_error};

/// PostgreSQL implementation of AgendaItemRepository.
#[derive(Clone)]
pub struct PostgresAgendaItemRepository {
    pool: PgPool,
}

impl PostgresAgendaItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaItemRepository for PostgresAgendaItemRepository {
    async fn save(&self, item: &AgendaItem) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO agenda_items (id, title, description, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(*item.id().as_uuid())
        .bind(item.title())
        .bind(item.description())
        .bind(*item.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert agenda item", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &AgendaItemId) -> Result<Option<AgendaItem>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, created_at
            FROM agenda_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch agenda item", e))?;

        row.map(row_to_agenda_item).transpose()
    }

    async fn list_all(&self) -> Result<Vec<AgendaItem>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, created_at
            FROM agenda_items
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list agenda items", e))?;

        rows.into_iter().map(row_to_agenda_item).collect()
    }
}

fn row_to_agenda_item(row: sqlx::postgres::PgRow) -> Result<AgendaItem, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let title: String = column(&row, "title")?;
    let description: Option<String> = column(&row, "description")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;

    Ok(AgendaItem::reconstitute(
        AgendaItemId::from_uuid(id),
        title,
        description,
        Timestamp::from_datetime(created_at),
    ))
}

