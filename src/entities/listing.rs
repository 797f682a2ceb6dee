//! Listing entity - an item escrowed on the global marketplace.
//!
//! While a listing is active it is the only owner of its item snapshot; the
//! item is not present in any inventory.

use super::item::ItemRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single marketplace listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Unique listing id
    pub id: String,
    /// Id the item had in the seller's inventory
    #[serde(default)]
    pub item_id: String,
    /// Escrowed item snapshot
    pub item: ItemRecord,
    /// Asking price in coins
    pub price: u64,
    /// Discord user id of the seller
    pub seller_id: String,
    /// Guild whose ledger and inventory the seller listed from
    pub seller_guild_id: String,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default = "Utc::now")]
    pub listed_at: DateTime<Utc>,
    #[serde(default)]
    pub guild_name: String,
}

impl ListingRecord {
    /// Case-insensitive substring match against item name, rarity or wear.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.item.name.to_lowercase().contains(needle)
            || self.item.rarity.as_str().contains(needle)
            || self.item.rarity.label().to_lowercase().contains(needle)
            || self.item.wear.as_str().to_lowercase().contains(needle)
    }
}

/// The persisted market document, `{ "listings": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBook {
    #[serde(default)]
    pub listings: Vec<ListingRecord>,
}

impl MarketBook {
    /// Finds an active listing by id.
    #[must_use]
    pub fn get(&self, listing_id: &str) -> Option<&ListingRecord> {
        self.listings.iter().find(|l| l.id == listing_id)
    }

    /// Removes and returns a listing by id.
    pub fn take(&mut self, listing_id: &str) -> Option<ListingRecord> {
        let index = self.listings.iter().position(|l| l.id == listing_id)?;
        Some(self.listings.remove(index))
    }
}
