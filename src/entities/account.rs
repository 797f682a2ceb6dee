//! Account entity - a coin balance for one user in one guild.

use serde::{Deserialize, Serialize};

/// Ledger entry persisted as `{ "balance": <int> }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Current coin balance, never negative
    pub balance: u64,
}

impl Account {
    /// Creates an account holding `balance` coins.
    #[must_use]
    pub const fn new(balance: u64) -> Self {
        Self { balance }
    }
}

/// Identifies one account: balances and inventories are guild-scoped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccountKey<'a> {
    pub guild_id: &'a str,
    pub user_id: &'a str,
}

impl<'a> AccountKey<'a> {
    #[must_use]
    pub const fn new(guild_id: &'a str, user_id: &'a str) -> Self {
        Self { guild_id, user_id }
    }
}
