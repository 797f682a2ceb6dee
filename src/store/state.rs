//! The in-memory economy snapshot and its load-time migrations.

use super::{Dirty, inventory::Inventories, ledger::Ledger};
use crate::{
    core::ids::unique_readable_id,
    entities::{ListingRecord, MarketBook},
    errors::{Error, Result},
};
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// Everything the economy mutates. Memory is authoritative; stores mirror it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EconomyState {
    pub ledger: Ledger,
    pub inventories: Inventories,
    pub market: MarketBook,
}

impl EconomyState {
    /// True when an inventory item, listing or escrowed item already uses `id`.
    #[must_use]
    pub fn id_in_use(&self, id: &str) -> bool {
        self.inventories.contains_id(id)
            || self
                .market
                .listings
                .iter()
                .any(|listing| listing.id == id || listing.item.id == id)
    }

    /// A readable id not used anywhere in the state.
    pub fn fresh_id<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        unique_readable_id(rng, |candidate| self.id_in_use(candidate))
    }

    /// Assigns ids to records that lack one and re-assigns duplicates, so
    /// that every item and listing id is globally unique.
    pub fn repair_ids<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Dirty {
        let mut taken: HashSet<String> = HashSet::new();
        for (_, _, items) in self.inventories.iter() {
            taken.extend(items.iter().map(|item| item.id.clone()));
        }
        for listing in &self.market.listings {
            taken.insert(listing.id.clone());
            taken.insert(listing.item.id.clone());
            taken.insert(listing.item_id.clone());
        }
        taken.remove("");

        let mut seen = HashSet::new();
        let mut dirty = Dirty::default();
        let mut reassigned = 0_usize;
        let mut claim = |id: &mut String, rng: &mut R| {
            if id.is_empty() || !seen.insert(id.clone()) {
                let fresh = unique_readable_id(rng, |candidate| taken.contains(candidate));
                taken.insert(fresh.clone());
                seen.insert(fresh.clone());
                *id = fresh;
                reassigned += 1;
                true
            } else {
                false
            }
        };

        for item in self.inventories.all_items_mut() {
            dirty.inventories |= claim(&mut item.id, &mut *rng);
        }
        for listing in &mut self.market.listings {
            dirty.market |= claim(&mut listing.id, &mut *rng);
            if listing.item.id.is_empty() && !listing.item_id.is_empty() {
                listing.item.id = listing.item_id.clone();
                dirty.market = true;
            }
            dirty.market |= claim(&mut listing.item.id, &mut *rng);
            if listing.item_id != listing.item.id {
                listing.item_id = listing.item.id.clone();
                dirty.market = true;
            }
        }

        if reassigned > 0 {
            info!(reassigned, "assigned missing or duplicate ids");
        }
        dirty
    }
}

/// Parses the market document, accepting the legacy per-guild layout
/// `{ guildId: { listings: [...] } }`. The flag is true when the legacy
/// layout was flattened.
pub fn parse_market(value: Value) -> Result<(MarketBook, bool)> {
    let Value::Object(map) = value else {
        return Err(Error::Persistence {
            message: "market data is not a JSON object".to_string(),
        });
    };
    if map.is_empty() {
        return Ok((MarketBook::default(), false));
    }
    if map.contains_key("listings") {
        let book: MarketBook = serde_json::from_value(Value::Object(map))?;
        return Ok((book, false));
    }

    let mut listings = Vec::new();
    for (guild_id, section) in map {
        let Some(Value::Array(entries)) = section.get("listings").cloned() else {
            warn!(%guild_id, "skipping legacy market section without listings");
            continue;
        };
        for mut entry in entries {
            if let Value::Object(fields) = &mut entry {
                fields
                    .entry("sellerGuildId")
                    .or_insert_with(|| Value::String(guild_id.clone()));
            }
            match serde_json::from_value::<ListingRecord>(entry) {
                Ok(listing) => listings.push(listing),
                Err(e) => warn!(%guild_id, error = %e, "dropping unreadable legacy listing"),
            }
        }
    }
    info!(count = listings.len(), "flattened legacy per-guild market");
    Ok((MarketBook { listings }, true))
}
