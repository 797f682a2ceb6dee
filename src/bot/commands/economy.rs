//! Economy Discord commands - balance, admin grants and gambling games.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, guild_key, reject},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    async fn show_balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();
        match ctx.data().economy.get_balance(&guild_id, &user_id).await {
            Ok(balance) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("💰 {}, your balance is **{balance}** coins.", ctx.author()))
                        .ephemeral(true),
                )
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }

    /// Shows your coin balance in this server.
    #[poise::command(slash_command, guild_only)]
    pub async fn balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        show_balance(ctx).await
    }

    /// Shows your coin balance in this server.
    #[poise::command(slash_command, guild_only)]
    pub async fn bal(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        show_balance(ctx).await
    }

    /// Gives coins to a member (requires Manage Server).
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        default_member_permissions = "MANAGE_GUILD"
    )]
    pub async fn give(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Member to receive the coins"] user: serenity::User,
        #[description = "Number of coins"]
        #[min = 1]
        amount: u64,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        match ctx
            .data()
            .economy
            .grant(&guild_id, &user.id.to_string(), amount)
            .await
        {
            Ok(balance) => {
                ctx.say(format!(
                    "🎁 Gave **{amount}** coins to {}. Their balance is now {balance}.",
                    user.name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }

    /// Bets coins on a coin flip.
    #[poise::command(slash_command, guild_only)]
    pub async fn bet(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Coins to bet"]
        #[min = 1]
        amount: u64,
        #[description = "heads or tails"] choice: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();

        match ctx
            .data()
            .economy
            .coinflip_bet(&guild_id, &user_id, amount, &choice)
            .await
        {
            Ok(outcome) => {
                let result = if outcome.won {
                    format!("You won **{}** coins!", outcome.delta)
                } else {
                    format!("You lost **{}** coins.", outcome.delta)
                };
                ctx.say(format!(
                    "🪙 The coin landed on **{}**. {result} New balance: {}",
                    outcome.landed, outcome.balance
                ))
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }

    /// Plays the slot machine.
    #[poise::command(slash_command, guild_only)]
    pub async fn slots(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();

        match ctx.data().economy.play_slots(&guild_id, &user_id).await {
            Ok(outcome) => {
                let [a, b, c] = outcome.reels;
                let result = if outcome.won() {
                    format!("You win **{}** coins!", outcome.payout)
                } else {
                    "You lose!".to_string()
                };
                ctx.say(format!(
                    "🎰 | {a} | {b} | {c} |\n{result} New balance: {}",
                    outcome.balance
                ))
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
