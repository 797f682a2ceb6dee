//! Storage layer.
//!
//! The economy works on an in-memory [`EconomyState`] and mirrors it to a
//! [`StateStore`] after every transaction. Each concern (ledger, inventories,
//! market) is saved independently, so a transaction only rewrites what it
//! touched.

pub mod inventory;
pub mod json;
pub mod ledger;
#[cfg(test)]
pub mod memory;
pub mod state;

pub use inventory::Inventories;
pub use json::JsonFileStore;
pub use ledger::Ledger;
#[cfg(test)]
pub use memory::MemoryStore;
pub use state::EconomyState;

use crate::{
    entities::MarketBook,
    errors::{Error, Result},
};
use tracing::error;

/// A freshly loaded state plus the stores that load-time migrations changed.
#[derive(Debug, Clone, Default)]
pub struct LoadedState {
    pub state: EconomyState,
    pub migrated: Dirty,
}

/// Durable backing for the economy state.
pub trait StateStore: Send + Sync {
    /// Reads the full state. Missing data loads as empty.
    fn load(&self) -> Result<LoadedState>;

    fn save_ledger(&self, ledger: &Ledger) -> Result<()>;

    fn save_inventories(&self, inventories: &Inventories) -> Result<()>;

    fn save_market(&self, market: &MarketBook) -> Result<()>;
}

/// Which stores a transaction mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub ledger: bool,
    pub inventories: bool,
    pub market: bool,
}

impl Dirty {
    pub const LEDGER: Self = Self {
        ledger: true,
        inventories: false,
        market: false,
    };

    pub const INVENTORIES: Self = Self {
        ledger: false,
        inventories: true,
        market: false,
    };

    pub const MARKET: Self = Self {
        ledger: false,
        inventories: false,
        market: true,
    };

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            ledger: self.ledger || other.ledger,
            inventories: self.inventories || other.inventories,
            market: self.market || other.market,
        }
    }

    #[must_use]
    pub const fn any(self) -> bool {
        self.ledger || self.inventories || self.market
    }
}

/// Writes every dirty store. All writes are attempted even when one fails;
/// the first failure is returned as [`Error::Persistence`].
pub fn flush(store: &dyn StateStore, state: &EconomyState, dirty: Dirty) -> Result<()> {
    let mut first_failure = None;
    let mut record = |what: &str, outcome: Result<()>| {
        if let Err(e) = outcome {
            error!(store = what, error = %e, "failed to persist state");
            first_failure.get_or_insert_with(|| Error::Persistence {
                message: format!("{what}: {e}"),
            });
        }
    };

    if dirty.ledger {
        record("ledger", store.save_ledger(&state.ledger));
    }
    if dirty.inventories {
        record("inventories", store.save_inventories(&state.inventories));
    }
    if dirty.market {
        record("market", store.save_market(&state.market));
    }

    first_failure.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_only_writes_dirty_stores() {
        let store = MemoryStore::default();
        let state = EconomyState::default();
        assert!(flush(&store, &state, Dirty::LEDGER.union(Dirty::MARKET)).is_ok());
        assert_eq!(store.writes(), (1, 0, 1));
    }

    #[test]
    fn test_flush_attempts_all_and_reports_first_failure() {
        let store = MemoryStore::default();
        store.fail_writes(true);
        let state = EconomyState::default();
        let all = Dirty::LEDGER.union(Dirty::INVENTORIES).union(Dirty::MARKET);
        let err = flush(&store, &state, all).err();
        assert!(matches!(err, Some(Error::Persistence { message }) if message.starts_with("ledger")));
        assert_eq!(store.attempts(), 3);
    }

    #[test]
    fn test_dirty_union() {
        assert!(!Dirty::default().any());
        let both = Dirty::LEDGER.union(Dirty::INVENTORIES);
        assert!(both.ledger && both.inventories && !both.market);
    }
}
