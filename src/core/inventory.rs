//! Inventory management - selling items and ordering them for display.

use crate::{
    entities::{AccountKey, ItemRecord},
    errors::{Error, Result},
    store::EconomyState,
};
use tracing::info;

/// Result of a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    /// The item that was converted to coins
    pub item: ItemRecord,
    /// Balance after the credit
    pub balance: u64,
}

/// Sells one item, matched by exact id, for its stored value.
///
/// Matching by id rather than name keeps duplicate-named items of different
/// wear and value apart.
pub fn sell_item(
    state: &mut EconomyState,
    account: AccountKey<'_>,
    item_id: &str,
    starting_balance: u64,
) -> Result<Sale> {
    let item_id = item_id.trim();
    let item = state
        .inventories
        .take(account.guild_id, account.user_id, item_id)
        .ok_or_else(|| Error::ItemNotFound {
            id: item_id.to_string(),
        })?;
    let balance = state
        .ledger
        .credit(account.guild_id, account.user_id, item.value, starting_balance);

    info!(
        guild_id = account.guild_id,
        user_id = account.user_id,
        item_id = %item.id,
        value = item.value,
        balance,
        "sold item"
    );
    Ok(Sale { item, balance })
}

/// Display order: rarest first, acquisition order within a tier.
#[must_use]
pub fn sorted_by_rarity(items: &[ItemRecord]) -> Vec<ItemRecord> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.rarity.cmp(&a.rarity));
    sorted
}

/// Sum of item values, saturating.
#[must_use]
pub fn total_value(items: &[ItemRecord]) -> u64 {
    items
        .iter()
        .fold(0_u64, |sum, item| sum.saturating_add(item.value))
}
