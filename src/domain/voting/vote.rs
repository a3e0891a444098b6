//! Vote entity and ballot values.

use crate::domain::foundation::{AgendaItemId, Timestamp, ValidationError, VoteId, VoterId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteValue {
    Yes,
    No,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Yes => "YES",
            VoteValue::No => "NO",
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoteValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YES" => Ok(VoteValue::Yes),
            "NO" => Ok(VoteValue::No),
            other => Err(ValidationError::invalid_format(
                "value",
                format!("expected YES or NO, got '{}'", other),
            )),
        }
    }
}

/// A member's recorded decision on an agenda item.
///
/// Votes are immutable once created. Uniqueness per
/// (agenda item, voter) is enforced by storage, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    id: VoteId,
    agenda_item_id: AgendaItemId,
    voter_id: VoterId,
    value: VoteValue,
    cast_at: Timestamp,
}

impl Vote {
    /// Record a new vote at `cast_at`.
    pub fn cast(
        agenda_item_id: AgendaItemId,
        voter_id: VoterId,
        value: VoteValue,
        cast_at: Timestamp,
    ) -> Self {
        Self {
            id: VoteId::new(),
            agenda_item_id,
            voter_id,
            value,
            cast_at,
        }
    }

    /// Reconstitute a vote from persistence.
    pub fn reconstitute(
        id: VoteId,
        agenda_item_id: AgendaItemId,
        voter_id: VoterId,
        value: VoteValue,
        cast_at: Timestamp,
    ) -> Self {
        Self {
            id,
            agenda_item_id,
            voter_id,
            value,
            cast_at,
        }
    }

    pub fn id(&self) -> VoteId {
        self.id
    }

    pub fn agenda_item_id(&self) -> AgendaItemId {
        self.agenda_item_id
    }

    pub fn voter_id(&self) -> &VoterId {
        &self.voter_id
    }

    pub fn value(&self) -> VoteValue {
        self.value
    }

    pub fn cast_at(&self) -> Timestamp {
        self.cast_at
    }
}
