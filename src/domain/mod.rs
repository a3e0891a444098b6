//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `agenda` - Agenda items put to a vote
//! - `voting` - Session lifecycle, ballots, tallies and result events

pub mod agenda;
pub mod foundation;
pub mod voting;
