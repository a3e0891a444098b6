//! SessionStatus enum for the voting session lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Lifecycle status of a voting session.
///
/// `Open -> Closed` is the only transition; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Open,
    Closed,
}

impl SessionStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "OPEN",
            SessionStatus::Closed => "CLOSED",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Open)
    }

    pub fn can_transition_to(&self, target: SessionStatus) -> bool {
        matches!((self, target), (SessionStatus::Open, SessionStatus::Closed))
    }

    /// Move to `target`, or explain why the lifecycle forbids it.
    pub fn transition_to(&self, target: SessionStatus) -> Result<SessionStatus, ValidationError> {
        if self.can_transition_to(target) {
            return Ok(target);
        }
        Err(ValidationError::invalid_format(
            "status",
            format!("session cannot move from {} to {}", self, target),
        ))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(SessionStatus::Open),
            "CLOSED" => Ok(SessionStatus::Closed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown session status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_open() {
        assert_eq!(SessionStatus::default(), SessionStatus::Open);
    }

    #[test]
    fn open_can_close() {
        assert_eq!(
            SessionStatus::Open.transition_to(SessionStatus::Closed),
            Ok(SessionStatus::Closed)
        );
    }

    #[test]
    fn closed_is_terminal() {
        assert!(!SessionStatus::Closed.can_transition_to(SessionStatus::Open));
        assert!(SessionStatus::Closed.transition_to(SessionStatus::Open).is_err());
        assert!(SessionStatus::Closed.transition_to(SessionStatus::Closed).is_err());
    }

    #[test]
    fn open_cannot_reenter_open() {
        assert!(!SessionStatus::Open.can_transition_to(SessionStatus::Open));
    }

    #[test]
    fn parses_storage_representation() {
        for status in [SessionStatus::Open, SessionStatus::Closed] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("ARCHIVED".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&SessionStatus::Open).unwrap(), "\"OPEN\"");
        assert_eq!(serde_json::to_string(&SessionStatus::Closed).unwrap(), "\"CLOSED\"");
    }
}
