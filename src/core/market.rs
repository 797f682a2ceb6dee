//! Marketplace - a single listing book shared by every guild.
//!
//! Listing moves an item from the seller's inventory into escrow on the
//! listing. Buying moves coins from the buyer's ledger to the seller's (each
//! in its own guild) and re-creates the item in the buyer's inventory under a
//! fresh id. Removing a listing hands the escrowed item back to the seller
//! with its id unchanged.

use crate::{
    core::ledger::require_positive,
    entities::{AccountKey, ItemRecord, ListingRecord, MarketBook},
    errors::{Error, Result},
    store::EconomyState,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

/// Everything needed to put an item up for sale.
#[derive(Debug, Clone, Copy)]
pub struct ListingRequest<'a> {
    pub seller: AccountKey<'a>,
    /// Display name shown on the listing
    pub seller_name: &'a str,
    /// Name of the guild the seller listed from
    pub guild_name: &'a str,
    pub item_id: &'a str,
    pub price: u64,
}

/// Result of a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// The item as it now exists in the buyer's inventory
    pub item: ItemRecord,
    pub price: u64,
    pub seller_id: String,
    pub seller_guild_id: String,
    /// Buyer balance after paying
    pub balance: u64,
}

/// Moves an owned item into a new listing and returns it.
pub fn list_on_market<R: Rng + ?Sized>(
    state: &mut EconomyState,
    rng: &mut R,
    request: ListingRequest<'_>,
    now: DateTime<Utc>,
) -> Result<ListingRecord> {
    let price = require_positive(request.price, "Price")?;
    let item_id = request.item_id.trim();
    let seller = request.seller;
    if !state
        .inventories
        .items(seller.guild_id, seller.user_id)
        .iter()
        .any(|item| item.id == item_id)
    {
        return Err(Error::ItemNotFound {
            id: item_id.to_string(),
        });
    }

    // Drawn while the item is still held so the two ids cannot coincide.
    let listing_id = state.fresh_id(rng);
    let item = state
        .inventories
        .take(seller.guild_id, seller.user_id, item_id)
        .ok_or_else(|| Error::ItemNotFound {
            id: item_id.to_string(),
        })?;

    let listing = ListingRecord {
        id: listing_id,
        item_id: item.id.clone(),
        item,
        price,
        seller_id: seller.user_id.to_string(),
        seller_guild_id: seller.guild_id.to_string(),
        seller_name: request.seller_name.to_string(),
        listed_at: now,
        guild_name: request.guild_name.to_string(),
    };
    state.market.listings.push(listing.clone());

    info!(
        listing_id = %listing.id,
        item_id = %listing.item_id,
        seller_id = %listing.seller_id,
        price,
        "listed item"
    );
    Ok(listing)
}

/// Buys a listing for `buyer`.
///
/// Rejected without any change when the buyer is the seller (in any guild)
/// or cannot afford the price. On success the listing is gone, the buyer
/// paid exactly what the seller received, and the buyer owns one new item.
pub fn buy_from_market<R: Rng + ?Sized>(
    state: &mut EconomyState,
    rng: &mut R,
    buyer: AccountKey<'_>,
    listing_id: &str,
    starting_balance: u64,
    now: DateTime<Utc>,
) -> Result<Purchase> {
    let listing_id = listing_id.trim();
    let (price, seller_id) = {
        let listing = state
            .market
            .get(listing_id)
            .ok_or_else(|| Error::ListingNotFound {
                id: listing_id.to_string(),
            })?;
        (listing.price, listing.seller_id.clone())
    };
    if seller_id == buyer.user_id {
        return Err(Error::SelfTrade);
    }

    let balance = state
        .ledger
        .debit(buyer.guild_id, buyer.user_id, price, starting_balance)?;
    // Drawn while the listing still escrows the old id.
    let new_id = state.fresh_id(rng);
    let listing = state
        .market
        .take(listing_id)
        .ok_or_else(|| Error::ListingNotFound {
            id: listing_id.to_string(),
        })?;
    state.ledger.credit(
        &listing.seller_guild_id,
        &listing.seller_id,
        price,
        starting_balance,
    );

    let item = ItemRecord {
        id: new_id,
        obtained_at: now,
        ..listing.item
    };
    state
        .inventories
        .push(buyer.guild_id, buyer.user_id, item.clone());

    info!(
        listing_id,
        buyer_id = buyer.user_id,
        seller_id = %listing.seller_id,
        price,
        item_id = %item.id,
        "bought listing"
    );
    Ok(Purchase {
        item,
        price,
        seller_id: listing.seller_id,
        seller_guild_id: listing.seller_guild_id,
        balance,
    })
}

/// Listings whose item name, rarity or wear contains `query`
/// (case-insensitive), in listing order. A blank query matches everything.
#[must_use]
pub fn search_market<'a>(market: &'a MarketBook, query: &str) -> Vec<&'a ListingRecord> {
    let needle = query.trim().to_lowercase();
    market
        .listings
        .iter()
        .filter(|listing| needle.is_empty() || listing.matches(&needle))
        .collect()
}

/// Withdraws a listing and returns it. Only the seller may do this; the item
/// goes back to the inventory it was listed from, which may be in another guild.
pub fn remove_listing(state: &mut EconomyState, caller_id: &str, listing_id: &str) -> Result<ListingRecord> {
    let listing_id = listing_id.trim();
    let listing = state
        .market
        .get(listing_id)
        .ok_or_else(|| Error::ListingNotFound {
            id: listing_id.to_string(),
        })?;
    if listing.seller_id != caller_id {
        return Err(Error::NotOwner {
            id: listing_id.to_string(),
        });
    }

    let listing = state
        .market
        .take(listing_id)
        .ok_or_else(|| Error::ListingNotFound {
            id: listing_id.to_string(),
        })?;
    state.inventories.push(
        &listing.seller_guild_id,
        &listing.seller_id,
        listing.item.clone(),
    );

    info!(listing_id, seller_id = caller_id, "removed listing");
    Ok(listing)
}

/// Active listings created by `user_id`, in listing order.
#[must_use]
pub fn listings_by_seller<'a>(market: &'a MarketBook, user_id: &str) -> Vec<&'a ListingRecord> {
    market
        .listings
        .iter()
        .filter(|listing| listing.seller_id == user_id)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        entities::{Rarity, Wear},
        test_utils::{sample_item, seeded_rng},
    };

    const STARTING: u64 = 100;

    fn request<'a>(guild: &'a str, user: &'a str, item_id: &'a str, price: u64) -> ListingRequest<'a> {
        ListingRequest {
            seller: AccountKey::new(guild, user),
            seller_name: "Seller",
            guild_name: "Seller's Guild",
            item_id,
            price,
        }
    }

    /// Seller owns "X" (value 30) in guild "g1" and both parties hold 100 coins.
    fn seeded_state() -> EconomyState {
        let mut state = EconomyState::default();
        state.ledger.ensure("g1", "seller", STARTING);
        state.ledger.ensure("g2", "buyer", STARTING);
        let mut item = sample_item("X", "AWP | Asiimov", 30);
        item.rarity = Rarity::Covert;
        item.wear = Wear::FieldTested;
        state.inventories.push("g1", "seller", item);
        state
    }

    #[test]
    fn test_list_moves_item_into_escrow() {
        let mut state = seeded_state();
        let listing =
            list_on_market(&mut state, &mut seeded_rng(1), request("g1", "seller", "X", 50), Utc::now()).unwrap();

        assert!(state.inventories.items("g1", "seller").is_empty());
        assert_eq!(state.market.listings.len(), 1);
        assert_eq!(listing.item.id, "X");
        assert_eq!(listing.item_id, "X");
        assert_ne!(listing.id, "X");
        assert_eq!(listing.seller_guild_id, "g1");
    }

    #[test]
    fn test_list_rejects_zero_price_and_unknown_item() {
        let mut state = seeded_state();
        let before = state.clone();
        let mut rng = seeded_rng(1);

        let err = list_on_market(&mut state, &mut rng, request("g1", "seller", "X", 0), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        let err = list_on_market(&mut state, &mut rng, request("g1", "seller", "nope", 5), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));
        let err = list_on_market(&mut state, &mut rng, request("g2", "seller", "X", 5), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_cross_guild_purchase_scenario() {
        let mut state = seeded_state();
        let mut rng = seeded_rng(2);
        let listing = list_on_market(&mut state, &mut rng, request("g1", "seller", "X", 50), Utc::now()).unwrap();
        let total_before = state.ledger.balance("g1", "seller").unwrap() + state.ledger.balance("g2", "buyer").unwrap();

        let purchase = buy_from_market(
            &mut state,
            &mut rng,
            AccountKey::new("g2", "buyer"),
            &listing.id,
            STARTING,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(state.ledger.balance("g2", "buyer"), Some(50));
        assert_eq!(state.ledger.balance("g1", "seller"), Some(150));
        assert_eq!(
            state.ledger.balance("g1", "seller").unwrap() + state.ledger.balance("g2", "buyer").unwrap(),
            total_before
        );
        assert!(state.market.listings.is_empty());

        let owned = state.inventories.items("g2", "buyer");
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0], purchase.item);
        assert_ne!(owned[0].id, "X");
        assert_eq!(owned[0].name, "AWP | Asiimov");
        assert_eq!(owned[0].rarity, Rarity::Covert);
        assert_eq!(owned[0].wear, Wear::FieldTested);
        assert_eq!(owned[0].value, 30);
    }

    #[test]
    fn test_self_trade_is_rejected_across_guilds() {
        let mut state = seeded_state();
        let mut rng = seeded_rng(3);
        let listing = list_on_market(&mut state, &mut rng, request("g1", "seller", "X", 50), Utc::now()).unwrap();
        let before = state.clone();

        for guild in ["g1", "g2"] {
            let err = buy_from_market(
                &mut state,
                &mut rng,
                AccountKey::new(guild, "seller"),
                &listing.id,
                STARTING,
                Utc::now(),
            )
            .unwrap_err();
            assert!(matches!(err, Error::SelfTrade));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_buy_without_funds_changes_nothing() {
        let mut state = seeded_state();
        let mut rng = seeded_rng(4);
        let listing = list_on_market(&mut state, &mut rng, request("g1", "seller", "X", 500), Utc::now()).unwrap();
        let before = state.clone();

        let err = buy_from_market(
            &mut state,
            &mut rng,
            AccountKey::new("g2", "buyer"),
            &listing.id,
            STARTING,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_buy_unknown_listing() {
        let mut state = seeded_state();
        let err = buy_from_market(
            &mut state,
            &mut seeded_rng(1),
            AccountKey::new("g2", "buyer"),
            "missing",
            STARTING,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ListingNotFound { .. }));
    }

    #[test]
    fn test_remove_by_non_owner_is_rejected() {
        let mut state = seeded_state();
        let listing =
            list_on_market(&mut state, &mut seeded_rng(5), request("g1", "seller", "X", 50), Utc::now()).unwrap();
        let before = state.clone();

        let err = remove_listing(&mut state, "buyer", &listing.id).unwrap_err();
        assert!(matches!(err, Error::NotOwner { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_remove_returns_item_with_same_id() {
        let mut state = seeded_state();
        let listing =
            list_on_market(&mut state, &mut seeded_rng(6), request("g1", "seller", "X", 50), Utc::now()).unwrap();

        let removed = remove_listing(&mut state, "seller", &listing.id).unwrap();
        assert_eq!(removed.item.id, "X");
        assert_eq!(removed.seller_guild_id, "g1");
        assert_eq!(removed.guild_name, "Seller's Guild");
        assert!(state.market.listings.is_empty());
        assert_eq!(state.inventories.items("g1", "seller").len(), 1);
        assert_eq!(state.inventories.items("g1", "seller")[0].id, "X");
    }

    #[test]
    fn test_search_matches_name_rarity_and_wear() {
        let mut state = seeded_state();
        state.inventories.push("g1", "seller", sample_item("Y", "Glock-18 | Fade", 10));
        let mut rng = seeded_rng(7);
        list_on_market(&mut state, &mut rng, request("g1", "seller", "X", 50), Utc::now()).unwrap();
        list_on_market(&mut state, &mut rng, request("g1", "seller", "Y", 20), Utc::now()).unwrap();

        let by_name = search_market(&state.market, "asiimov");
        assert_eq!(by_name.len(), 1);
        assert_eq!(search_market(&state.market, "COVERT").len(), 1);
        assert_eq!(search_market(&state.market, "field-tested").len(), 1);
        assert_eq!(search_market(&state.market, "").len(), 2);
        assert!(search_market(&state.market, "karambit").is_empty());
    }

    #[test]
    fn test_listings_by_seller() {
        let mut state = seeded_state();
        list_on_market(&mut state, &mut seeded_rng(8), request("g1", "seller", "X", 50), Utc::now()).unwrap();
        assert_eq!(listings_by_seller(&state.market, "seller").len(), 1);
        assert!(listings_by_seller(&state.market, "buyer").is_empty());
    }
}
