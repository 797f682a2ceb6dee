//! Balance operations - balance lookups and admin grants.
//!
//! The primitive debit/credit rules live on [`Ledger`]: debits that would
//! overdraw are rejected before anything changes, and accounts are created
//! lazily with the configured starting balance.

use crate::{
    entities::AccountKey,
    errors::{Error, Result},
    store::Ledger,
};
use tracing::info;

/// Rejects zero amounts for operations that move coins.
pub(crate) fn require_positive(amount: u64, what: &str) -> Result<u64> {
    if amount == 0 {
        return Err(Error::invalid_input(format!("{what} must be positive")));
    }
    Ok(amount)
}

/// Returns the account's balance, opening the account if needed.
///
/// The flag is true when this call created the account, in which case the
/// ledger must be persisted.
pub fn get_balance(ledger: &mut Ledger, account: AccountKey<'_>, starting_balance: u64) -> (u64, bool) {
    let (entry, created) = ledger.ensure(account.guild_id, account.user_id, starting_balance);
    (entry.balance, created)
}

/// Credits `amount` coins to an account (administrator grant).
///
/// # Arguments
/// * `account` - Receiving account
/// * `amount` - Coins to add, must be positive
/// * `starting_balance` - Balance used if the account does not exist yet
pub fn grant(
    ledger: &mut Ledger,
    account: AccountKey<'_>,
    amount: u64,
    starting_balance: u64,
) -> Result<u64> {
    let amount = require_positive(amount, "Amount")?;
    let balance = ledger.credit(account.guild_id, account.user_id, amount, starting_balance);
    info!(
        guild_id = account.guild_id,
        user_id = account.user_id,
        amount,
        balance,
        "granted coins"
    );
    Ok(balance)
}
