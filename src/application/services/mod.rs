//! Application services - Closure pipeline and the background sweeper.
//!
//! `ExpirationSweeper` → `SessionCloser` → (`ResultAggregator`, `ResultPublisher`)

mod expiration_sweeper;
mod result_aggregator;
mod result_publisher;
mod session_closer;

pub use expiration_sweeper::{
    ExpirationSweeper, ExpirationSweeperConfig, SweepReport, SWEEP_LOCK_NAME,
};
pub use result_aggregator::ResultAggregator;
pub use result_publisher::{ResultPublisher, DEFAULT_PUBLISH_TIMEOUT};
pub use session_closer::{ClosedSession, SessionCloser};
