//! Case opening - pay for a case, draw an item, add it to the inventory.

use crate::{
    core::{
        catalog::{CaseDefinition, WearPolicy},
        selector,
    },
    entities::{AccountKey, ItemRecord},
    errors::Result,
    store::EconomyState,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

/// Result of a successful opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOpening {
    /// The newly owned item
    pub item: ItemRecord,
    /// Coins paid
    pub cost: u64,
    /// Balance after paying
    pub balance: u64,
}

/// Opens `case` for `account`.
///
/// Either the cost is debited and exactly one item is appended, or (on
/// insufficient funds) nothing changes. The draw itself cannot fail.
pub fn open_case<R: Rng + ?Sized>(
    state: &mut EconomyState,
    rng: &mut R,
    case: &CaseDefinition,
    policy: &WearPolicy,
    account: AccountKey<'_>,
    starting_balance: u64,
    now: DateTime<Utc>,
) -> Result<CaseOpening> {
    let balance = state
        .ledger
        .debit(account.guild_id, account.user_id, case.cost, starting_balance)?;

    let drawn = selector::select(case, policy, rng);
    let id = state.fresh_id(rng);
    let item = drawn.into_record(id, now);
    state
        .inventories
        .push(account.guild_id, account.user_id, item.clone());

    info!(
        guild_id = account.guild_id,
        user_id = account.user_id,
        case_id = %case.id,
        item_id = %item.id,
        rarity = %item.rarity,
        value = item.value,
        "opened case"
    );

    Ok(CaseOpening {
        item,
        cost: case.cost,
        balance,
    })
}
