//! Inventory store - per-guild, per-user lists of owned items.
//!
//! Persisted as `{ guildId: { userId: [ItemRecord] } }`.

use crate::entities::ItemRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventories {
    guilds: BTreeMap<String, BTreeMap<String, Vec<ItemRecord>>>,
}

impl Inventories {
    /// Items owned by a user in a guild, in acquisition order.
    #[must_use]
    pub fn items(&self, guild_id: &str, user_id: &str) -> &[ItemRecord] {
        self.guilds
            .get(guild_id)
            .and_then(|users| users.get(user_id))
            .map_or(&[], Vec::as_slice)
    }

    /// Appends an item to a user's inventory.
    pub fn push(&mut self, guild_id: &str, user_id: &str, item: ItemRecord) {
        self.guilds
            .entry(guild_id.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_default()
            .push(item);
    }

    /// Removes exactly one item by id.
    pub fn take(&mut self, guild_id: &str, user_id: &str, item_id: &str) -> Option<ItemRecord> {
        let items = self.guilds.get_mut(guild_id)?.get_mut(user_id)?;
        let index = items.iter().position(|item| item.id == item_id)?;
        Some(items.remove(index))
    }

    /// True when any inventory holds an item with this id.
    #[must_use]
    pub fn contains_id(&self, item_id: &str) -> bool {
        self.all_items().any(|item| item.id == item_id)
    }

    /// Iterates `(guild_id, user_id, items)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[ItemRecord])> {
        self.guilds.iter().flat_map(|(guild_id, users)| {
            users
                .iter()
                .map(move |(user_id, items)| (guild_id.as_str(), user_id.as_str(), items.as_slice()))
        })
    }

    fn all_items(&self) -> impl Iterator<Item = &ItemRecord> {
        self.guilds
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(|items| items.iter())
    }

    pub(crate) fn all_items_mut(&mut self) -> impl Iterator<Item = &mut ItemRecord> {
        self.guilds
            .values_mut()
            .flat_map(BTreeMap::values_mut)
            .flat_map(|items| items.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_item;

    #[test]
    fn test_push_and_take_by_id() {
        let mut inventories = Inventories::default();
        inventories.push("g", "u", sample_item("a", "Redline", 10));
        inventories.push("g", "u", sample_item("b", "Redline", 30));

        let taken = inventories.take("g", "u", "b").unwrap();
        assert_eq!(taken.value, 30);
        let remaining = inventories.items("g", "u");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "a");
    }

    #[test]
    fn test_take_unknown_id_is_none() {
        let mut inventories = Inventories::default();
        inventories.push("g", "u", sample_item("a", "Redline", 10));
        assert!(inventories.take("g", "u", "zzz").is_none());
        assert!(inventories.take("other", "u", "a").is_none());
        assert_eq!(inventories.items("g", "u").len(), 1);
    }

    #[test]
    fn test_contains_id_across_guilds() {
        let mut inventories = Inventories::default();
        inventories.push("g1", "u", sample_item("x", "Fade", 1));
        inventories.push("g2", "v", sample_item("y", "Fade", 1));
        assert!(inventories.contains_id("y"));
        assert!(!inventories.contains_id("z"));
    }

    #[test]
    fn test_missing_user_has_empty_inventory() {
        assert!(Inventories::default().items("g", "u").is_empty());
    }
}
