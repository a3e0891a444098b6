//! Agenda domain module.
//!
//! Agenda items are the subjects put to a vote.

mod aggregate;

pub use aggregate::{AgendaItem, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
