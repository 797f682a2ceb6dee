//! Ledger store - per-guild, per-user coin balances.
//!
//! Persisted as `{ guildId: { userId: { "balance": n } } }`. Accounts are
//! created lazily with the starting balance and never deleted.

use crate::{
    entities::Account,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All balances, keyed by guild id then user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    guilds: BTreeMap<String, BTreeMap<String, Account>>,
}

impl Ledger {
    /// Balance of an existing account.
    #[must_use]
    pub fn balance(&self, guild_id: &str, user_id: &str) -> Option<u64> {
        self.guilds
            .get(guild_id)
            .and_then(|users| users.get(user_id))
            .map(|account| account.balance)
    }

    /// Returns the account, creating it with `starting_balance` if absent.
    /// The flag is true when the account was created by this call.
    pub fn ensure(
        &mut self,
        guild_id: &str,
        user_id: &str,
        starting_balance: u64,
    ) -> (&mut Account, bool) {
        let users = self.guilds.entry(guild_id.to_string()).or_default();
        let created = !users.contains_key(user_id);
        let account = users
            .entry(user_id.to_string())
            .or_insert_with(|| Account::new(starting_balance));
        (account, created)
    }

    /// Balance after lazily creating the account.
    pub fn balance_or_open(&mut self, guild_id: &str, user_id: &str, starting_balance: u64) -> u64 {
        self.ensure(guild_id, user_id, starting_balance).0.balance
    }

    /// Removes `amount` coins. Rejected without mutation when the balance is
    /// too low; balances are never clamped.
    pub fn debit(
        &mut self,
        guild_id: &str,
        user_id: &str,
        amount: u64,
        starting_balance: u64,
    ) -> Result<u64> {
        let (account, _) = self.ensure(guild_id, user_id, starting_balance);
        let remaining = account
            .balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientFunds {
                current: account.balance,
                required: amount,
            })?;
        account.balance = remaining;
        Ok(remaining)
    }

    /// Adds `amount` coins, saturating at `u64::MAX`.
    pub fn credit(
        &mut self,
        guild_id: &str,
        user_id: &str,
        amount: u64,
        starting_balance: u64,
    ) -> u64 {
        let (account, _) = self.ensure(guild_id, user_id, starting_balance);
        account.balance = account.balance.saturating_add(amount);
        account.balance
    }

    /// Iterates `(guild_id, user_id, account)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Account)> {
        self.guilds.iter().flat_map(|(guild_id, users)| {
            users
                .iter()
                .map(move |(user_id, account)| (guild_id.as_str(), user_id.as_str(), account))
        })
    }
}
