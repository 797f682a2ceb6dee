//! In-memory store used by tests. Records what was written and can
//! be told to fail every write.

use super::{Dirty, EconomyState, Inventories, Ledger, LoadedState, StateStore};
use crate::{
    entities::MarketBook,
    errors::{Error, Result},
};
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<EconomyState>,
    initial: EconomyState,
    failing: AtomicBool,
    attempts: AtomicUsize,
    ledger_writes: AtomicUsize,
    inventory_writes: AtomicUsize,
    market_writes: AtomicUsize,
}

impl MemoryStore {
    /// A store whose `load` returns `state`.
    #[must_use]
    pub fn with_state(state: EconomyState) -> Self {
        Self {
            saved: Mutex::new(state.clone()),
            initial: state,
            ..Self::default()
        }
    }

    /// Makes every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful `(ledger, inventories, market)` write counts.
    pub fn writes(&self) -> (usize, usize, usize) {
        (
            self.ledger_writes.load(Ordering::SeqCst),
            self.inventory_writes.load(Ordering::SeqCst),
            self.market_writes.load(Ordering::SeqCst),
        )
    }

    /// Write attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The last successfully written state.
    pub fn saved(&self) -> EconomyState {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, counter: &AtomicUsize, apply: impl FnOnce(&mut EconomyState)) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other("simulated write failure")));
        }
        apply(&mut self.saved.lock().unwrap_or_else(PoisonError::into_inner));
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<LoadedState> {
        Ok(LoadedState {
            state: self.initial.clone(),
            migrated: Dirty::default(),
        })
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        self.write(&self.ledger_writes, |saved| saved.ledger = ledger.clone())
    }

    fn save_inventories(&self, inventories: &Inventories) -> Result<()> {
        self.write(&self.inventory_writes, |saved| {
            saved.inventories = inventories.clone();
        })
    }

    fn save_market(&self, market: &MarketBook) -> Result<()> {
        self.write(&self.market_writes, |saved| saved.market = market.clone())
    }
}
