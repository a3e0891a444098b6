//! Agenda item aggregate.
//!
//! An agenda item is the subject members vote on. It is created once and
//! never modified by the voting core.

use crate::domain::foundation::{AgendaItemId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Maximum length for an agenda item title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for an agenda item description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Agenda item aggregate.
///
/// # Invariants
///
/// - `title` is 1-200 characters, non-blank
/// - `description`, when present, is at most 1000 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    id: AgendaItemId,
    title: String,
    description: Option<String>,
    created_at: Timestamp,
}

impl AgendaItem {
    /// Create a new agenda item.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank
    /// - `TooLong` if the title or description exceeds its limit
    pub fn new(
        id: AgendaItemId,
        title: String,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let title_len = title.chars().count();
        if title_len > MAX_TITLE_LENGTH {
            return Err(ValidationError::too_long("title", MAX_TITLE_LENGTH, title_len));
        }

        let description = description.filter(|d| !d.trim().is_empty());
        if let Some(d) = &description {
            let len = d.chars().count();
            if len > MAX_DESCRIPTION_LENGTH {
                return Err(ValidationError::too_long(
                    "description",
                    MAX_DESCRIPTION_LENGTH,
                    len,
                ));
            }
        }

        Ok(Self {
            id,
            title,
            description,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute an agenda item from persistence (no validation).
    pub fn reconstitute(
        id: AgendaItemId,
        title: String,
        description: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_at,
        }
    }

    pub fn id(&self) -> AgendaItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
