//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Durable Store Ports
//!
//! - `AgendaItemRepository` - Agenda item persistence
//! - `VotingSessionRepository` - Session persistence, one OPEN per item
//! - `VoteRepository` - Insert-only votes, unique per (item, voter)
//!
//! ## Coordination Ports
//!
//! - `FastCounter` - Atomic expiring counters for running tallies
//! - `DistributedLock` - Cross-instance lease for scheduled jobs
//! - `CacheStore` - Read-through cache behind `get_or_load`
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Partition-keyed publishing of domain events

mod agenda_item_repository;
mod cache_store;
mod distributed_lock;
mod event_publisher;
mod fast_counter;
mod vote_repository;
mod voting_session_repository;

pub use agenda_item_repository::AgendaItemRepository;
pub use cache_store::{get_or_load, CacheStore};
pub use distributed_lock::{DistributedLock, LockError, LockLease, LockRequest};
pub use event_publisher::EventPublisher;
pub use fast_counter::{CounterError, FastCounter};
pub use vote_repository::VoteRepository;
pub use voting_session_repository::VotingSessionRepository;
