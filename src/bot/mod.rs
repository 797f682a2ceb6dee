//! Bot layer - Discord-specific interface and command handlers
//!
//! Commands translate Discord interactions into calls on the shared
//! [`Economy`] and render the results. Domain rejections become ephemeral
//! `❌` replies; anything else is passed to the framework error hook.

/// Discord command implementations (case, market, economy, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::economy::{Economy, user_message},
    entities::{ItemRecord, ListingRecord},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared data available to all bot commands.
pub struct BotData {
    /// The economy every command operates on
    pub economy: Arc<Economy>,
}

impl BotData {
    #[must_use]
    pub const fn new(economy: Arc<Economy>) -> Self {
        Self { economy }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Guild the command was invoked in, as a ledger key.
pub(crate) fn guild_key(ctx: Context<'_>) -> Result<String> {
    ctx.guild_id()
        .map(|id| id.to_string())
        .ok_or_else(|| Error::invalid_input("This command only works in a server"))
}

/// Sends a domain rejection back to the invoking user, or propagates an
/// infrastructure error to the framework.
pub(crate) async fn reject(ctx: Context<'_>, error: Error) -> Result<()> {
    let Some(message) = user_message(&error) else {
        return Err(error);
    };
    warn!(
        command = %ctx.command().qualified_name,
        user_id = %ctx.author().id,
        reason = %message,
        "command rejected"
    );
    ctx.send(
        poise::CreateReply::default()
            .content(format!("❌ {message}"))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// One-line rendering of an owned item.
pub(crate) fn item_line(item: &ItemRecord) -> String {
    format!(
        "{} **{}** ({}) - {} coins `{}`",
        item.rarity.emoji(),
        item.name,
        item.wear,
        item.value,
        item.id
    )
}

/// Reply for a withdrawn listing, naming the server the item went back to.
pub(crate) fn withdrawal_line(listing: &ListingRecord) -> String {
    let guild = if listing.guild_name.trim().is_empty() {
        format!("the server it was listed from (`{}`)", listing.seller_guild_id)
    } else {
        format!("**{}**", listing.guild_name)
    };
    format!(
        "↩️ Listing removed. {} is back in your inventory in {guild}.",
        item_line(&listing.item)
    )
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content("⚠️ Something went wrong. Please try again.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Registers every slash command and runs the Discord client until it stops.
pub async fn run_bot(token: String, economy: Arc<Economy>) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::case(),
                commands::market(),
                commands::balance(),
                commands::bal(),
                commands::give(),
                commands::bet(),
                commands::slots(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands", framework.options().commands.len());
                Ok(BotData::new(economy))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
