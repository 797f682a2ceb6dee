//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are capped at 25 entries (the Discord limit) and matched
//! case-insensitively against what the user has typed so far.

use crate::{bot::BotData, errors::Error};

/// Discord autocomplete limit.
const MAX_SUGGESTIONS: usize = 25;

fn matching<I>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let partial_lower = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|(value, label)| {
            value.to_lowercase().contains(&partial_lower)
                || label.to_lowercase().contains(&partial_lower)
        })
        .map(|(value, _)| value)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests case ids, matching on id or display name, in catalog order.
#[allow(clippy::unused_async)]
pub async fn autocomplete_case_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let cases = ctx.data().economy.list_cases();
    matching(
        cases
            .iter()
            .map(|case| (case.id.clone(), case.display_name.clone())),
        partial,
    )
}

/// Suggests ids of the caller's items in this server, matching on id or name.
pub async fn autocomplete_item_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };
    let items = ctx
        .data()
        .economy
        .get_inventory(&guild_id.to_string(), &ctx.author().id.to_string())
        .await;
    matching(
        items.into_iter().map(|item| (item.id, item.name)),
        partial,
    )
}

/// Suggests ids of the caller's active listings, matching on id or item name.
pub async fn autocomplete_listing_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let listings = ctx
        .data()
        .economy
        .listings_by_seller(&ctx.author().id.to_string())
        .await;
    matching(
        listings
            .into_iter()
            .map(|listing| (listing.id, listing.item.name)),
        partial,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
            .collect()
    }

    #[test]
    fn test_matching_on_value_or_label() {
        let candidates = pairs(&[
            ("dreams", "Dreams & Nightmares"),
            ("prisma", "Prisma 2 Case"),
            ("fracture", "Fracture Case"),
        ]);
        assert_eq!(matching(candidates.clone(), "NIGHT"), vec!["dreams"]);
        assert_eq!(matching(candidates.clone(), "case"), vec!["prisma", "fracture"]);
        assert_eq!(matching(candidates, "").len(), 3);
    }

    #[test]
    fn test_matching_caps_suggestions() {
        let candidates: Vec<(String, String)> = (0..40)
            .map(|i| (format!("fox-calm-{i}"), "Redline".to_string()))
            .collect();
        assert_eq!(matching(candidates, "fox").len(), MAX_SUGGESTIONS);
    }
}
