//! Storage Adapters
//!
//! In-process implementations of the durable repository ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryVotingStore** - Agenda items, sessions and votes behind one
//!   lock (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryVotingStore;
//!
//! let store = Arc::new(InMemoryVotingStore::new());
//! let sessions: Arc<dyn VotingSessionRepository> = store.clone();
//! let votes: Arc<dyn VoteRepository> = store;
//! ```

mod in_memory_voting_store;

pub use in_memory_voting_store::InMemoryVotingStore;
