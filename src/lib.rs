//! Coop Voting - Time-boxed voting on cooperative agenda items
//!
//! Members vote YES or NO on an agenda item while its session is open.
//! An expiration sweep closes sessions whose window has passed, settles
//! their totals and announces the result on the event bus.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
