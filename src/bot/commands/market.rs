//! Marketplace Discord commands - `/market list|buy|search|remove`.
//!
//! The market is shared by every server the bot is in: a listing created in
//! one server can be bought from any other.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, guild_key, handlers::autocomplete, item_line, reject, withdrawal_line},
        core::market::ListingRequest,
        entities::AccountKey,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Listings shown by `/market search`.
    const SEARCH_LIMIT: usize = 15;

    /// Parent command for the cross-server marketplace.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("market_list", "market_buy", "market_search", "market_remove")
    )]
    pub async fn market(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Marketplace commands:\n\
            `/market list <item_id> <price>` - Put an item up for sale\n\
            `/market buy <listing_id>` - Buy a listing\n\
            `/market search [query]` - Find listings by name, rarity or wear\n\
            `/market remove <listing_id>` - Take your listing down";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Puts one of your items up for sale.
    #[poise::command(slash_command, guild_only, rename = "list")]
    pub async fn market_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of the item to sell"]
        #[autocomplete = "autocomplete::autocomplete_item_id"]
        item_id: String,
        #[description = "Asking price in coins"]
        #[min = 1]
        price: u64,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();
        let guild_name = ctx.guild().map(|g| g.name.clone()).unwrap_or_default();
        let request = ListingRequest {
            seller: AccountKey::new(&guild_id, &user_id),
            seller_name: &ctx.author().name,
            guild_name: &guild_name,
            item_id: &item_id,
            price,
        };

        match ctx.data().economy.list_on_market(request).await {
            Ok(listing) => {
                ctx.say(format!(
                    "🏷️ Listed {} for **{} coins**. Listing ID: `{}`",
                    item_line(&listing.item),
                    listing.price,
                    listing.id
                ))
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }

    /// Buys a listing from any server.
    #[poise::command(slash_command, guild_only, rename = "buy")]
    pub async fn market_buy(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of the listing to buy"] listing_id: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();

        match ctx
            .data()
            .economy
            .buy_from_market(&guild_id, &user_id, &listing_id)
            .await
        {
            Ok(purchase) => {
                ctx.say(format!(
                    "🛒 Bought {} from <@{}> for **{} coins**. New balance: {}",
                    item_line(&purchase.item),
                    purchase.seller_id,
                    purchase.price,
                    purchase.balance
                ))
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }

    /// Searches listings by item name, rarity or wear.
    #[poise::command(slash_command, guild_only, rename = "search")]
    pub async fn market_search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Text to look for (leave empty to browse)"] query: Option<String>,
    ) -> Result<()> {
        let query = query.unwrap_or_default();
        let listings = ctx.data().economy.search_market(&query).await;
        if listings.is_empty() {
            ctx.say("🔍 No listings match your search.").await?;
            return Ok(());
        }

        let mut description = String::new();
        for listing in listings.iter().take(SEARCH_LIMIT) {
            writeln!(
                &mut description,
                "`{}` {} **{}** ({}) - **{} coins** by {}",
                listing.id,
                listing.item.rarity.emoji(),
                listing.item.name,
                listing.item.wear,
                listing.price,
                if listing.seller_name.is_empty() {
                    format!("<@{}>", listing.seller_id)
                } else {
                    listing.seller_name.clone()
                }
            )?;
        }

        let embed = serenity::CreateEmbed::default()
            .title("🏪 Marketplace")
            .description(description)
            .color(0x002E_CC71)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} listings • Buy with /market buy",
                listings.len()
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Takes one of your listings down and returns the item to you.
    #[poise::command(slash_command, guild_only, rename = "remove")]
    pub async fn market_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of your listing"]
        #[autocomplete = "autocomplete::autocomplete_listing_id"]
        listing_id: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        match ctx.data().economy.remove_listing(&user_id, &listing_id).await {
            Ok(listing) => {
                ctx.say(withdrawal_line(&listing)).await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
