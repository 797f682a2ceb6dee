//! Random item selector.
//!
//! A pure function of the case definition, the wear policy and the random
//! source. Tier choice is weighted-cumulative: the first tier whose running
//! weight total is `>=` the roll wins. Tiers without items never enter the
//! table, so they take no probability mass.

use crate::{
    core::catalog::{CaseDefinition, RarityTier, WearPolicy},
    entities::{ItemRecord, Rarity, Wear},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{trace, warn};

/// Name of the item handed out when a case has nothing to draw.
pub const PLACEHOLDER_ITEM_NAME: &str = "Mysterious Trinket";

/// Uniform jitter applied to the tier base value, as a fraction.
const VALUE_JITTER: f64 = 0.3;

/// Cumulative percent thresholds for the wear ladder, best wear first.
const WEAR_LADDER: [(f64, Wear); 5] = [
    (10.0, Wear::FactoryNew),
    (30.0, Wear::MinimalWear),
    (65.0, Wear::FieldTested),
    (85.0, Wear::WellWorn),
    (100.0, Wear::BattleScarred),
];

/// The outcome of one draw, before it is given an id and an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnItem {
    pub name: String,
    pub rarity: Rarity,
    pub wear: Wear,
    pub value: u64,
    pub image_ref: Option<String>,
}

impl DrawnItem {
    fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_ITEM_NAME.to_string(),
            rarity: Rarity::Consumer,
            wear: Wear::BattleScarred,
            value: 0,
            image_ref: None,
        }
    }

    /// Materializes the draw as an owned inventory record.
    #[must_use]
    pub fn into_record(self, id: String, obtained_at: DateTime<Utc>) -> ItemRecord {
        ItemRecord {
            id,
            name: self.name,
            rarity: self.rarity,
            wear: self.wear,
            value: self.value,
            image_ref: self.image_ref,
            obtained_at,
        }
    }
}

/// Draws one item from `case`.
///
/// Never fails: a case with no items at all yields a zero-value placeholder
/// so a paid-for opening always produces something.
pub fn select<R: Rng + ?Sized>(case: &CaseDefinition, policy: &WearPolicy, rng: &mut R) -> DrawnItem {
    let Some(tier) = pick_tier(case, rng).or_else(|| case.first_stocked_tier()) else {
        warn!(case_id = %case.id, "case has no items, returning placeholder");
        return DrawnItem::placeholder();
    };
    let Some(template) = pick_uniform(&tier.items, rng) else {
        return DrawnItem::placeholder();
    };

    let (wear, value) = match policy {
        WearPolicy::Uniform => {
            let wear = Wear::ALL[rng.gen_range(0..Wear::ALL.len())];
            let jitter = rng.r#gen::<f64>().mul_add(2.0 * VALUE_JITTER, -VALUE_JITTER);
            (wear, scaled_value(tier.base_value, 1.0 + jitter))
        }
        WearPolicy::Table(table) => {
            let wear = pick_wear(rng);
            let base = tier.table_base_value(template);
            (wear, scaled_value(base, table.multiplier(wear)))
        }
    };

    trace!(
        case_id = %case.id,
        rarity = %tier.rarity,
        item = %template.name,
        %wear,
        value,
        "drew item"
    );

    DrawnItem {
        name: template.name.clone(),
        rarity: tier.rarity,
        wear,
        value,
        image_ref: template.image_ref.clone(),
    }
}

/// Running weight totals over the stocked tiers, in catalog order.
fn cumulative_table(case: &CaseDefinition) -> Vec<(f64, &RarityTier)> {
    let mut cumulative = 0.0;
    case.tiers
        .iter()
        .filter(|tier| !tier.items.is_empty())
        .map(|tier| {
            cumulative += tier.weight();
            (cumulative, tier)
        })
        .collect()
}

/// First tier whose cumulative threshold is `>=` `roll`.
fn tier_for_roll<'a>(table: &[(f64, &'a RarityTier)], roll: f64) -> Option<&'a RarityTier> {
    table
        .iter()
        .find(|(threshold, _)| *threshold >= roll)
        .map(|(_, tier)| *tier)
}

fn pick_tier<'a, R: Rng + ?Sized>(case: &'a CaseDefinition, rng: &mut R) -> Option<&'a RarityTier> {
    let table = cumulative_table(case);
    let total = table.last().map_or(0.0, |(threshold, _)| *threshold);
    if total <= 0.0 {
        return None;
    }
    let roll = rng.r#gen::<f64>() * total;
    tier_for_roll(&table, roll)
}

fn pick_uniform<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}

fn pick_wear<R: Rng + ?Sized>(rng: &mut R) -> Wear {
    let roll = rng.r#gen::<f64>() * 100.0;
    WEAR_LADDER
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map_or(Wear::BattleScarred, |(_, wear)| *wear)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scaled_value(base: u64, factor: f64) -> u64 {
    let scaled = (base as f64 * factor).floor();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as u64
    } else {
        1
    }
}
