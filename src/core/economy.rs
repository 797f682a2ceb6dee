//! Economy facade - the operations the bot layer calls.
//!
//! One `tokio::sync::Mutex` guards the whole in-memory state, the random
//! source and the slot cooldowns. Each operation locks, mutates, flushes the
//! stores it touched and unlocks; nothing else happens under the lock.
//!
//! When a flush fails the in-memory mutation is kept (memory is authoritative
//! and the next successful flush writes a full snapshot) and the caller gets
//! [`Error::Persistence`].

use crate::{
    config::AppConfig,
    core::{
        case_open::{self, CaseOpening},
        catalog::{Catalog, CaseDefinition},
        games::{self, BetOutcome, CoinSide, SlotCooldowns, SlotsOutcome},
        inventory::{self, Sale},
        leaderboard::{self, LeaderboardPage},
        ledger,
        market::{self, ListingRequest, Purchase},
    },
    entities::{AccountKey, ItemRecord, ListingRecord},
    errors::{Error, Result},
    store::{Dirty, EconomyState, StateStore, flush},
};
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

struct Inner {
    state: EconomyState,
    rng: StdRng,
    cooldowns: SlotCooldowns,
}

/// Shared handle to the economy. Cheap to wrap in an `Arc` and share
/// between command handlers.
pub struct Economy {
    settings: AppConfig,
    catalog: Catalog,
    store: Arc<dyn StateStore>,
    inner: Mutex<Inner>,
}

impl Economy {
    /// Loads state from `store` with an entropy-seeded random source.
    pub fn open(settings: AppConfig, catalog: Catalog, store: Arc<dyn StateStore>) -> Result<Self> {
        Self::with_rng(settings, catalog, store, StdRng::from_entropy())
    }

    /// Loads state from `store`, repairs ids and writes back anything the
    /// load-time migrations changed.
    pub fn with_rng(
        settings: AppConfig,
        catalog: Catalog,
        store: Arc<dyn StateStore>,
        mut rng: StdRng,
    ) -> Result<Self> {
        let loaded = store.load()?;
        let mut state = loaded.state;
        let migrated = loaded.migrated.union(state.repair_ids(&mut rng));
        if migrated.any() {
            info!(?migrated, "writing migrated economy data");
            if let Err(e) = flush(store.as_ref(), &state, migrated) {
                warn!(error = %e, "could not write migrated data, continuing from memory");
            }
        }

        Ok(Self {
            settings,
            catalog,
            store,
            inner: Mutex::new(Inner {
                state,
                rng,
                cooldowns: SlotCooldowns::default(),
            }),
        })
    }

    #[must_use]
    pub const fn settings(&self) -> &AppConfig {
        &self.settings
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All cases in catalog order.
    #[must_use]
    pub fn list_cases(&self) -> &[CaseDefinition] {
        self.catalog.list_cases()
    }

    /// Resolves user input to a case (exact id, then case-insensitive id or
    /// display name).
    pub fn find_case(&self, input: &str) -> Result<&CaseDefinition> {
        self.catalog.find_case(input)
    }

    const fn starting_balance(&self) -> u64 {
        self.settings.economy.starting_balance
    }

    fn persist<T>(&self, state: &EconomyState, dirty: Dirty, outcome: T) -> Result<T> {
        flush(self.store.as_ref(), state, dirty)?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn open_case(&self, guild_id: &str, user_id: &str, case_input: &str) -> Result<CaseOpening> {
        let case = self.catalog.find_case(case_input)?;
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let opening = case_open::open_case(
            &mut inner.state,
            &mut inner.rng,
            case,
            self.catalog.wear_policy(),
            AccountKey::new(guild_id, user_id),
            self.starting_balance(),
            Utc::now(),
        )?;
        self.persist(&inner.state, Dirty::LEDGER.union(Dirty::INVENTORIES), opening)
    }

    #[instrument(skip(self))]
    pub async fn sell_item(&self, guild_id: &str, user_id: &str, item_id: &str) -> Result<Sale> {
        let mut guard = self.inner.lock().await;
        let sale = inventory::sell_item(
            &mut guard.state,
            AccountKey::new(guild_id, user_id),
            item_id,
            self.starting_balance(),
        )?;
        self.persist(&guard.state, Dirty::LEDGER.union(Dirty::INVENTORIES), sale)
    }

    #[instrument(skip(self))]
    pub async fn list_on_market(&self, request: ListingRequest<'_>) -> Result<ListingRecord> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let listing = market::list_on_market(&mut inner.state, &mut inner.rng, request, Utc::now())?;
        self.persist(&inner.state, Dirty::INVENTORIES.union(Dirty::MARKET), listing)
    }

    #[instrument(skip(self))]
    pub async fn buy_from_market(&self, guild_id: &str, user_id: &str, listing_id: &str) -> Result<Purchase> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let purchase = market::buy_from_market(
            &mut inner.state,
            &mut inner.rng,
            AccountKey::new(guild_id, user_id),
            listing_id,
            self.starting_balance(),
            Utc::now(),
        )?;
        let dirty = Dirty::LEDGER.union(Dirty::INVENTORIES).union(Dirty::MARKET);
        self.persist(&inner.state, dirty, purchase)
    }

    /// Listings matching `query` by item name, rarity or wear.
    pub async fn search_market(&self, query: &str) -> Vec<ListingRecord> {
        let guard = self.inner.lock().await;
        market::search_market(&guard.state.market, query)
            .into_iter()
            .cloned()
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn remove_listing(&self, user_id: &str, listing_id: &str) -> Result<ListingRecord> {
        let mut guard = self.inner.lock().await;
        let listing = market::remove_listing(&mut guard.state, user_id, listing_id)?;
        self.persist(&guard.state, Dirty::INVENTORIES.union(Dirty::MARKET), listing)
    }

    /// Active listings created by `user_id`.
    pub async fn listings_by_seller(&self, user_id: &str) -> Vec<ListingRecord> {
        let guard = self.inner.lock().await;
        market::listings_by_seller(&guard.state.market, user_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Current balance; opens (and persists) the account on first use.
    pub async fn get_balance(&self, guild_id: &str, user_id: &str) -> Result<u64> {
        let mut guard = self.inner.lock().await;
        let (balance, created) = ledger::get_balance(
            &mut guard.state.ledger,
            AccountKey::new(guild_id, user_id),
            self.starting_balance(),
        );
        if created {
            return self.persist(&guard.state, Dirty::LEDGER, balance);
        }
        Ok(balance)
    }

    #[instrument(skip(self))]
    pub async fn grant(&self, guild_id: &str, user_id: &str, amount: u64) -> Result<u64> {
        let mut guard = self.inner.lock().await;
        let balance = ledger::grant(
            &mut guard.state.ledger,
            AccountKey::new(guild_id, user_id),
            amount,
            self.starting_balance(),
        )?;
        self.persist(&guard.state, Dirty::LEDGER, balance)
    }

    /// Items owned in a guild, in acquisition order.
    pub async fn get_inventory(&self, guild_id: &str, user_id: &str) -> Vec<ItemRecord> {
        let guard = self.inner.lock().await;
        guard.state.inventories.items(guild_id, user_id).to_vec()
    }

    /// One page of the global net-worth ranking.
    pub async fn rank_leaderboard(&self, page: usize) -> LeaderboardPage {
        let guard = self.inner.lock().await;
        leaderboard::rank(&guard.state, page, self.settings.leaderboard.page_size)
    }

    #[instrument(skip(self))]
    pub async fn coinflip_bet(
        &self,
        guild_id: &str,
        user_id: &str,
        amount: u64,
        choice: &str,
    ) -> Result<BetOutcome> {
        let choice: CoinSide = choice.parse()?;
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let outcome = games::coinflip_bet(
            &mut inner.state.ledger,
            &mut inner.rng,
            AccountKey::new(guild_id, user_id),
            amount,
            choice,
            &self.settings.games,
            self.starting_balance(),
        )?;
        self.persist(&inner.state, Dirty::LEDGER, outcome)
    }

    #[instrument(skip(self))]
    pub async fn play_slots(&self, guild_id: &str, user_id: &str) -> Result<SlotsOutcome> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let outcome = games::play_slots(
            &mut inner.state.ledger,
            &mut inner.cooldowns,
            &mut inner.rng,
            AccountKey::new(guild_id, user_id),
            &self.settings.games,
            self.starting_balance(),
            Utc::now(),
        )?;
        self.persist(&inner.state, Dirty::LEDGER, outcome)
    }

    /// Copy of the current in-memory state.
    #[cfg(test)]
    pub async fn snapshot(&self) -> EconomyState {
        self.inner.lock().await.state.clone()
    }
}

impl std::fmt::Debug for Economy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Economy")
            .field("cases", &self.catalog.list_cases().len())
            .finish_non_exhaustive()
    }
}

/// Maps a domain rejection to the message shown to the user, or `None` for
/// infrastructure faults that should go to the error handler.
#[must_use]
pub fn user_message(error: &Error) -> Option<String> {
    error.is_user_error().then(|| error.to_string())
}
