//! Shared test utilities for `UnboxBuddy`.
//!
//! Fixtures for catalogs, items and listings, a seeded random source, and an
//! [`Economy`] wired to a [`MemoryStore`] so tests can inspect what was
//! persisted.

use crate::{
    config::AppConfig,
    core::{
        catalog::{CaseDefinition, Catalog, ItemTemplate, RarityTier, WearPolicy},
        economy::Economy,
    },
    entities::{ItemRecord, ListingRecord, Rarity, Wear},
    store::{EconomyState, MemoryStore, StateStore},
};
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use std::{
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Deterministic random source.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Builds a tier from item names.
///
/// # Arguments
/// * `rarity` - Tier rarity
/// * `chance` - Explicit weight, `None` for the default table
/// * `base_value` - Tier base value
/// * `names` - Item names, may be empty
pub fn tier(rarity: Rarity, chance: Option<f64>, base_value: u64, names: &[&str]) -> RarityTier {
    RarityTier {
        rarity,
        chance,
        base_value,
        base_value_configured: true,
        items: names
            .iter()
            .map(|name| ItemTemplate {
                name: (*name).to_string(),
                image_ref: None,
                base_value: None,
            })
            .collect(),
    }
}

/// A case costing 10 coins with the given tiers.
pub fn case_with_tiers(id: &str, tiers: Vec<RarityTier>) -> CaseDefinition {
    CaseDefinition {
        id: id.to_string(),
        display_name: format!("📦 {id} Case"),
        cost: 10,
        tiers,
    }
}

/// One case, `starter` ("Starter Case"), costing 10 with three stocked tiers.
pub fn standard_catalog() -> Catalog {
    let mut starter = case_with_tiers(
        "starter",
        vec![
            tier(Rarity::Consumer, None, 5, &["P250 | Sand Dune", "Nova | Predator"]),
            tier(Rarity::MilSpec, None, 25, &["M4A1-S | Nitro"]),
            tier(Rarity::Covert, None, 400, &["AWP | Dragon Lore"]),
        ],
    );
    starter.display_name = "Starter Case".to_string();
    Catalog::new(vec![starter], WearPolicy::Uniform)
}

/// A consumer, Minimal Wear item.
pub fn sample_item(id: &str, name: &str, value: u64) -> ItemRecord {
    ItemRecord {
        id: id.to_string(),
        name: name.to_string(),
        rarity: Rarity::Consumer,
        wear: Wear::MinimalWear,
        value,
        image_ref: None,
        obtained_at: Utc::now(),
    }
}

/// A listing escrowing `item`.
pub fn sample_listing(id: &str, item: ItemRecord, price: u64, seller_id: &str, guild_id: &str) -> ListingRecord {
    ListingRecord {
        id: id.to_string(),
        item_id: item.id.clone(),
        item,
        price,
        seller_id: seller_id.to_string(),
        seller_guild_id: guild_id.to_string(),
        seller_name: seller_id.to_string(),
        listed_at: Utc::now(),
        guild_name: String::new(),
    }
}

/// A unique, not yet created directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("unbox-buddy-{prefix}-{}-{unique}", std::process::id()))
}

/// An economy over [`standard_catalog`] and an empty memory store.
pub fn test_economy() -> (Economy, Arc<MemoryStore>) {
    test_economy_with_state(EconomyState::default())
}

/// An economy over [`standard_catalog`] starting from `state`.
#[allow(clippy::unwrap_used)]
pub fn test_economy_with_state(state: EconomyState) -> (Economy, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_state(state));
    let economy = Economy::with_rng(
        AppConfig::default(),
        standard_catalog(),
        Arc::clone(&store) as Arc<dyn StateStore>,
        seeded_rng(42),
    )
    .unwrap();
    (economy, store)
}
