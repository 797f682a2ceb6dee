//! Leaderboard - ranks users by net worth across every guild.
//!
//! Net worth is the sum of a user's balances plus the value of the items in
//! their inventories, over all guilds. Escrowed (listed) items are not
//! counted until they come back or are sold.

use crate::{core::inventory::total_value, store::EconomyState};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position in the full ranking
    pub position: usize,
    pub user_id: String,
    pub total_value: u64,
    pub balance: u64,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardPage {
    pub entries: Vec<LeaderboardEntry>,
    /// Page actually shown, after clamping
    pub page: usize,
    pub max_page: usize,
    pub total_users: usize,
}

#[derive(Default)]
struct Totals {
    balance: u64,
    item_value: u64,
    item_count: usize,
}

/// Ranks everyone and returns one page.
///
/// Ordering is by total value descending, then user id ascending. `page` is
/// 1-based and clamped into `[1, max_page]`; an empty board has one empty page.
#[must_use]
pub fn rank(state: &EconomyState, page: usize, page_size: usize) -> LeaderboardPage {
    let page_size = page_size.max(1);
    let mut totals: HashMap<&str, Totals> = HashMap::new();
    for (_, user_id, account) in state.ledger.iter() {
        let entry = totals.entry(user_id).or_default();
        entry.balance = entry.balance.saturating_add(account.balance);
    }
    for (_, user_id, items) in state.inventories.iter() {
        let entry = totals.entry(user_id).or_default();
        entry.item_value = entry.item_value.saturating_add(total_value(items));
        entry.item_count += items.len();
    }

    let mut ranked: Vec<(&str, Totals)> = totals.into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| {
        let a_total = a.balance.saturating_add(a.item_value);
        let b_total = b.balance.saturating_add(b.item_value);
        b_total.cmp(&a_total).then_with(|| a_id.cmp(b_id))
    });

    let total_users = ranked.len();
    let max_page = total_users.div_ceil(page_size).max(1);
    let page = page.clamp(1, max_page);
    let offset = (page - 1) * page_size;

    let entries = ranked
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(page_size)
        .map(|(index, (user_id, totals))| LeaderboardEntry {
            position: index + 1,
            user_id: user_id.to_string(),
            total_value: totals.balance.saturating_add(totals.item_value),
            balance: totals.balance,
            item_count: totals.item_count,
        })
        .collect();

    LeaderboardPage {
        entries,
        page,
        max_page,
        total_users,
    }
}
