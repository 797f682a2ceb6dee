//! Gambling games - the coinflip bet and the slot machine.

use crate::{
    config::settings::GamesConfig,
    core::ledger::require_positive,
    entities::AccountKey,
    errors::{Error, Result},
    store::Ledger,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::info;

/// Reel symbols, all equally likely.
pub const SLOT_SYMBOLS: [&str; 6] = ["🍒", "🍋", "🍊", "🍉", "⭐", "7️⃣"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoinSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "heads" => Ok(Self::Heads),
            "tails" => Ok(Self::Tails),
            _ => Err(Error::invalid_input("Choice must be heads or tails")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetOutcome {
    pub choice: CoinSide,
    pub landed: CoinSide,
    /// Coins won (if `won`) or lost
    pub delta: u64,
    pub won: bool,
    pub balance: u64,
}

/// Bets `amount` on a coin flip.
///
/// A win credits `floor(amount * bet_payout_multiplier)` on top of the
/// stake; a loss debits the stake.
pub fn coinflip_bet<R: Rng + ?Sized>(
    ledger: &mut Ledger,
    rng: &mut R,
    account: AccountKey<'_>,
    amount: u64,
    choice: CoinSide,
    games: &GamesConfig,
    starting_balance: u64,
) -> Result<BetOutcome> {
    let amount = require_positive(amount, "Bet")?;
    let current = ledger.balance_or_open(account.guild_id, account.user_id, starting_balance);
    if current < amount {
        return Err(Error::InsufficientFunds {
            current,
            required: amount,
        });
    }

    let landed = if rng.gen_bool(0.5) {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    };
    let won = landed == choice;
    let (delta, balance) = if won {
        let payout = scale(amount, games.bet_payout_multiplier);
        let balance = ledger.credit(account.guild_id, account.user_id, payout, starting_balance);
        (payout, balance)
    } else {
        let balance = ledger.debit(account.guild_id, account.user_id, amount, starting_balance)?;
        (amount, balance)
    };

    info!(
        guild_id = account.guild_id,
        user_id = account.user_id,
        amount,
        won,
        balance,
        "coinflip bet"
    );
    Ok(BetOutcome {
        choice,
        landed,
        delta,
        won,
        balance,
    })
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale(amount: u64, multiplier: f64) -> u64 {
    let scaled = (amount as f64 * multiplier).floor();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotsOutcome {
    pub reels: [&'static str; 3],
    /// Zero unless all three reels match
    pub payout: u64,
    pub balance: u64,
}

impl SlotsOutcome {
    #[must_use]
    pub const fn won(&self) -> bool {
        self.payout > 0
    }
}

/// Last slots play per user. Kept in memory only; a restart clears it.
#[derive(Debug, Default)]
pub struct SlotCooldowns {
    last_played: HashMap<String, DateTime<Utc>>,
}

impl SlotCooldowns {
    /// Seconds left before `user_id` may play again, if any.
    fn remaining(&self, user_id: &str, now: DateTime<Utc>, cooldown_secs: u64) -> Option<u64> {
        let last = self.last_played.get(user_id)?;
        seconds_left(*last, now, cooldown_secs)
    }

    /// Records a play, dropping entries whose cooldown has already expired.
    fn record(&mut self, user_id: &str, now: DateTime<Utc>, cooldown_secs: u64) {
        self.last_played
            .retain(|_, last| seconds_left(*last, now, cooldown_secs).is_some());
        self.last_played.insert(user_id.to_string(), now);
    }
}

fn seconds_left(last: DateTime<Utc>, now: DateTime<Utc>, cooldown_secs: u64) -> Option<u64> {
    let elapsed = now.signed_duration_since(last).num_milliseconds();
    let cooldown_ms = i64::try_from(cooldown_secs.saturating_mul(1_000)).unwrap_or(i64::MAX);
    (elapsed < cooldown_ms).then(|| {
        let left_ms = u64::try_from(cooldown_ms - elapsed.max(0)).unwrap_or(0);
        left_ms.div_ceil(1_000).max(1)
    })
}

/// Plays one round of slots.
///
/// The cooldown is per user across guilds. The stake is paid before the
/// spin; three matching reels pay `slots_cost * slots_payout_multiplier`.
pub fn play_slots<R: Rng + ?Sized>(
    ledger: &mut Ledger,
    cooldowns: &mut SlotCooldowns,
    rng: &mut R,
    account: AccountKey<'_>,
    games: &GamesConfig,
    starting_balance: u64,
    now: DateTime<Utc>,
) -> Result<SlotsOutcome> {
    if let Some(remaining_secs) = cooldowns.remaining(account.user_id, now, games.slots_cooldown_secs) {
        return Err(Error::Cooldown { remaining_secs });
    }
    let mut balance = ledger.debit(
        account.guild_id,
        account.user_id,
        games.slots_cost,
        starting_balance,
    )?;
    cooldowns.record(account.user_id, now, games.slots_cooldown_secs);

    let reels = [(); 3].map(|()| SLOT_SYMBOLS[rng.gen_range(0..SLOT_SYMBOLS.len())]);
    let payout = if reels[0] == reels[1] && reels[1] == reels[2] {
        games.slots_cost.saturating_mul(games.slots_payout_multiplier)
    } else {
        0
    };
    if payout > 0 {
        balance = ledger.credit(account.guild_id, account.user_id, payout, starting_balance);
    }

    info!(
        guild_id = account.guild_id,
        user_id = account.user_id,
        payout,
        balance,
        "played slots"
    );
    Ok(SlotsOutcome {
        reels,
        payout,
        balance,
    })
}
