//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let settings = ctx.data().economy.settings();
        let help_text = format!(
            "**UnboxBuddy Help**\n\n\
            **Cases**\n\
            • `/case list` - Shows the cases you can open.\n\
            • `/case open <case>` - Opens a case and keeps the drop.\n\
            • `/case inventory [user]` - Shows an inventory, rarest first.\n\
            • `/case sell <item_id>` - Sells an item for its value.\n\
            • `/case leaderboard [page]` - Richest players across all servers.\n\n\
            **Marketplace** (shared by every server)\n\
            • `/market list <item_id> <price>` - Lists an item for sale.\n\
            • `/market buy <listing_id>` - Buys a listing.\n\
            • `/market search [query]` - Finds listings by name, rarity or wear.\n\
            • `/market remove <listing_id>` - Takes your listing down.\n\n\
            **Economy**\n\
            • `/balance` or `/bal` - Shows your balance (new players start with {start}).\n\
            • `/bet <amount> <heads|tails>` - Coin flip, pays {bet}x on a win.\n\
            • `/slots` - Costs {slots} coins, three of a kind pays {payout}x.\n\
            • `/give <user> <amount>` - Admin only.\n\n\
            **Utility**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.",
            start = settings.economy.starting_balance,
            bet = settings.games.bet_payout_multiplier,
            slots = settings.games.slots_cost,
            payout = settings.games.slots_payout_multiplier,
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
