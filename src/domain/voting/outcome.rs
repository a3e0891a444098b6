//! Tally and outcome classification.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::VoteValue;

/// Result of a closed vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Approved,
    Rejected,
    Tie,
}

impl Outcome {
    /// APPROVED when yes wins, REJECTED when no wins, TIE otherwise.
    pub fn from_totals(yes_total: u64, no_total: u64) -> Self {
        match yes_total.cmp(&no_total) {
            Ordering::Greater => Outcome::Approved,
            Ordering::Less => Outcome::Rejected,
            Ordering::Equal => Outcome::Tie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Approved => "APPROVED",
            Outcome::Rejected => "REJECTED",
            Outcome::Tie => "TIE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a tally was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallySource {
    /// Fast counter snapshot.
    Counter,
    /// Counted from persisted votes.
    Durable,
}

/// Yes/no totals for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    pub fn new(yes: u64, no: u64) -> Self {
        Self { yes, no }
    }

    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    /// True when neither side has a single vote.
    pub fn is_empty(&self) -> bool {
        self.yes == 0 && self.no == 0
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_totals(self.yes, self.no)
    }

    /// Count for one ballot value.
    pub fn count_for(&self, value: VoteValue) -> u64 {
        match value {
            VoteValue::Yes => self.yes,
            VoteValue::No => self.no,
        }
    }
}
