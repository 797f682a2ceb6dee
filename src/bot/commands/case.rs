//! Case Discord commands - `/case list|open|inventory|sell|leaderboard`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, guild_key, handlers::autocomplete, item_line, reject},
        core::inventory::{sorted_by_rarity, total_value},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Cases shown per page of `/case list`.
    const CASES_PER_PAGE: usize = 10;
    /// Items shown by `/case inventory`.
    const INVENTORY_PREVIEW: usize = 20;

    fn page_number(page: Option<u32>) -> usize {
        page.map_or(1, |p| usize::try_from(p).unwrap_or(usize::MAX))
    }

    /// Parent command for opening cases and managing your items.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("case_list", "case_open", "case_inventory", "case_sell", "case_leaderboard")
    )]
    pub async fn case(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Case commands:\n\
            `/case list` - Show available cases\n\
            `/case open <case>` - Open a case\n\
            `/case inventory [user]` - Show an inventory\n\
            `/case sell <item_id>` - Sell an item for its value\n\
            `/case leaderboard [page]` - Richest players";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists the cases you can open, with their prices.
    #[poise::command(slash_command, guild_only, rename = "list")]
    pub async fn case_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Page number"]
        #[min = 1]
        page: Option<u32>,
    ) -> Result<()> {
        let cases = ctx.data().economy.list_cases();
        if cases.is_empty() {
            ctx.say("📦 No cases are configured yet.").await?;
            return Ok(());
        }

        let max_page = cases.len().div_ceil(CASES_PER_PAGE).max(1);
        let page = page_number(page).clamp(1, max_page);
        let mut embed = serenity::CreateEmbed::default()
            .title("📦 Available Cases")
            .color(0x00F1_C40F)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Page {page}/{max_page} • Open one with /case open"
            )));
        for case in cases.iter().skip((page - 1) * CASES_PER_PAGE).take(CASES_PER_PAGE) {
            let mut tiers = String::new();
            for tier in case.tiers.iter().filter(|t| !t.items.is_empty()) {
                write!(&mut tiers, "{} ", tier.rarity.emoji())?;
            }
            embed = embed.field(
                &case.display_name,
                format!(
                    "**{} coins** • {} items {tiers}\n`{}`",
                    case.cost,
                    case.item_count(),
                    case.id
                ),
                false,
            );
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Opens a case and adds the drop to your inventory.
    #[poise::command(slash_command, guild_only, rename = "open")]
    pub async fn case_open(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Case to open"]
        #[autocomplete = "autocomplete::autocomplete_case_name"]
        case: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();
        let economy = &ctx.data().economy;

        let opening = match economy.open_case(&guild_id, &user_id, &case).await {
            Ok(opening) => opening,
            Err(e) => return reject(ctx, e).await,
        };
        let case_name = economy
            .find_case(&case)
            .map_or_else(|_| case.clone(), |c| c.display_name.clone());

        let item = &opening.item;
        let mut embed = serenity::CreateEmbed::default()
            .title(format!("{} {}", item.rarity.emoji(), item.name))
            .description(format!("Unboxed from **{case_name}**"))
            .color(item.rarity.color())
            .field("Rarity", item.rarity.label(), true)
            .field("Wear", item.wear.as_str(), true)
            .field("Value", format!("{} coins", item.value), true)
            .field("Item ID", format!("`{}`", item.id), false)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Paid {} coins • Balance: {}",
                opening.cost, opening.balance
            )));
        if let Some(image) = &item.image_ref {
            embed = embed.image(image);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows your inventory (or another member's), rarest first.
    #[poise::command(slash_command, guild_only, rename = "inventory")]
    pub async fn case_inventory(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Whose inventory to show (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let target = user.as_ref().unwrap_or_else(|| ctx.author());
        let items = ctx
            .data()
            .economy
            .get_inventory(&guild_id, &target.id.to_string())
            .await;

        if items.is_empty() {
            ctx.say(format!("🎒 {} has no items yet. Try `/case open`!", target.name))
                .await?;
            return Ok(());
        }

        let mut description = String::new();
        for item in sorted_by_rarity(&items).iter().take(INVENTORY_PREVIEW) {
            writeln!(&mut description, "{}", item_line(item))?;
        }
        if items.len() > INVENTORY_PREVIEW {
            writeln!(
                &mut description,
                "…and {} more",
                items.len() - INVENTORY_PREVIEW
            )?;
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("🎒 {}'s Inventory", target.name))
            .description(description)
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} items • Total value: {} coins",
                items.len(),
                total_value(&items)
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sells one of your items for its value.
    #[poise::command(slash_command, guild_only, rename = "sell")]
    pub async fn case_sell(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "ID of the item to sell"]
        #[autocomplete = "autocomplete::autocomplete_item_id"]
        item_id: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let user_id = ctx.author().id.to_string();

        match ctx.data().economy.sell_item(&guild_id, &user_id, &item_id).await {
            Ok(sale) => {
                ctx.say(format!(
                    "💰 Sold {} for **{} coins**. New balance: {}",
                    item_line(&sale.item),
                    sale.item.value,
                    sale.balance
                ))
                .await?;
                Ok(())
            }
            Err(e) => reject(ctx, e).await,
        }
    }

    /// Ranks players by balance plus inventory value across all servers.
    #[poise::command(slash_command, guild_only, rename = "leaderboard")]
    pub async fn case_leaderboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Page number"]
        #[min = 1]
        page: Option<u32>,
    ) -> Result<()> {
        let board = ctx.data().economy.rank_leaderboard(page_number(page)).await;
        if board.entries.is_empty() {
            ctx.say("🏆 Nobody is on the leaderboard yet.").await?;
            return Ok(());
        }

        let mut description = String::new();
        for entry in &board.entries {
            let medal = match entry.position {
                1 => "🥇".to_string(),
                2 => "🥈".to_string(),
                3 => "🥉".to_string(),
                n => format!("`#{n}`"),
            };
            writeln!(
                &mut description,
                "{medal} <@{}> - **{} coins** ({} items)",
                entry.user_id, entry.total_value, entry.item_count
            )?;
        }

        let embed = serenity::CreateEmbed::default()
            .title("🏆 Leaderboard")
            .description(description)
            .color(0x00F1_C40F)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Page {}/{} • {} players",
                board.page, board.max_page, board.total_users
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
