//! In-memory persistence: a generic keyed record store and the match store.
//!
//! Stores are constructed once per process and handed to the logic functions
//! through [`Stores`]; nothing here is global.

mod matches;
mod records;

pub use matches::{InMemoryMatchStore, MatchStore};
pub use records::{Record, RecordStore};

use crate::models::{MatchId, Player, Registration, Tournament};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("Store lock poisoned")]
    Poisoned,
    #[error("Match {0} not found in store")]
    NotFound(MatchId),
    #[error("Match {0} is already finished")]
    Finished(MatchId),
    /// Another writer already created this round (or a later one).
    #[error("Round {round} already exists for this category")]
    RoundConflict { round: u32 },
}

/// Every store the backend needs, bundled for injection.
#[derive(Clone)]
pub struct Stores {
    pub players: Arc<RecordStore<Player>>,
    pub tournaments: Arc<RecordStore<Tournament>>,
    pub registrations: Arc<RecordStore<Registration>>,
    pub matches: Arc<dyn MatchStore>,
}

impl Stores {
    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            players: Arc::new(RecordStore::new()),
            tournaments: Arc::new(RecordStore::new()),
            registrations: Arc::new(RecordStore::new()),
            matches: Arc::new(InMemoryMatchStore::new()),
        }
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::in_memory()
    }
}
