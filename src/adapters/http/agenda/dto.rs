//! HTTP DTOs for agenda item endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::agenda::AgendaItem;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create an agenda item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgendaItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItemResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
}

impl From<&AgendaItem> for AgendaItemResponse {
    fn from(item: &AgendaItem) -> Self {
        Self {
            id: item.id().to_string(),
            title: item.title().to_string(),
            description: item.description().map(str::to_string),
            created_at: item.created_at().as_datetime().to_rfc3339(),
        }
    }
}
