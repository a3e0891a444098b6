//! Fast counter key naming.
//!
//! Keys are `voting:session:{session_id}:{yes|no}`. Session ids are never
//! reused, so neither are keys.

use crate::domain::foundation::VotingSessionId;

use super::VoteValue;

const KEY_PREFIX: &str = "voting:session:";

/// The pair of counter keys belonging to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterKeys {
    pub yes: String,
    pub no: String,
}

impl CounterKeys {
    pub fn for_session(session_id: &VotingSessionId) -> Self {
        Self {
            yes: format!("{}{}:yes", KEY_PREFIX, session_id),
            no: format!("{}{}:no", KEY_PREFIX, session_id),
        }
    }

    /// Key counting ballots of `value`.
    pub fn key_for(&self, value: VoteValue) -> &str {
        match value {
            VoteValue::Yes => &self.yes,
            VoteValue::No => &self.no,
        }
    }

    /// Both keys, yes first.
    pub fn as_vec(&self) -> Vec<String> {
        vec![self.yes.clone(), self.no.clone()]
    }
}
