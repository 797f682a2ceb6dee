//! Case catalog loading from JSON.
//!
//! Missing or malformed values in the hand-edited catalog are replaced with
//! defaults and logged at `warn`. Only unreadable files and invalid JSON
//! syntax are errors.
//!
//! ```json
//! {
//!   "cases": {
//!     "dreams": {
//!       "display": "Dreams & Nightmares",
//!       "cost": 25,
//!       "items": {
//!         "consumer": { "chance": 40, "baseValue": 5, "items": [{ "name": "P250 | Sand", "imageRef": "..." }] }
//!       }
//!     }
//!   },
//!   "wearSystem": { "factoryNew": { "valueMultiplier": 1.5 }, "...": {} }
//! }
//! ```

use crate::{
    core::catalog::{CaseDefinition, Catalog, ItemTemplate, RarityTier, WearPolicy, WearTable},
    entities::{Rarity, Wear},
    errors::{Error, Result},
};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Cost assigned to cases without a valid positive cost.
pub const DEFAULT_CASE_COST: u64 = 10;
/// Base value assigned to tiers without one.
pub const DEFAULT_TIER_BASE_VALUE: u64 = 10;

/// Loads and normalizes the catalog at `path`. A missing file yields an empty
/// catalog.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or is not valid JSON.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        warn!(
            "Catalog file {} not found, starting with no cases",
            path_ref.display()
        );
        return Ok(Catalog::default());
    }
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog {}: {e}", path_ref.display()),
    })?;
    let catalog = parse_catalog(&contents)?;
    info!(
        "Catalog loaded: {} cases, wear table {}",
        catalog.list_cases().len(),
        if matches!(catalog.wear_policy(), WearPolicy::Table(_)) {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(catalog)
}

/// Parses catalog JSON and runs the normalization pass.
///
/// # Errors
/// Returns an error only when `contents` is not valid JSON.
pub fn parse_catalog(contents: &str) -> Result<Catalog> {
    let root: Value = if contents.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse catalog JSON: {e}"),
        })?
    };

    let cases = match root.get("cases") {
        Some(Value::Object(cases)) => cases
            .iter()
            .map(|(id, raw)| normalize_case(id, raw))
            .collect(),
        Some(_) => {
            warn!("Catalog 'cases' is not an object, ignoring it");
            Vec::new()
        }
        None => {
            warn!("Catalog has no 'cases' section");
            Vec::new()
        }
    };

    let wear_policy = root
        .get("wearSystem")
        .map_or(WearPolicy::Uniform, normalize_wear_system);

    Ok(Catalog::new(cases, wear_policy))
}

fn normalize_case(id: &str, raw: &Value) -> CaseDefinition {
    let cost = match raw.get("cost").and_then(as_number) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(cost) if cost >= 1.0 => cost.floor() as u64,
        _ => {
            warn!("Case '{id}' has no valid cost, defaulting to {DEFAULT_CASE_COST}");
            DEFAULT_CASE_COST
        }
    };

    let display_name = match raw.get("display").and_then(Value::as_str) {
        Some(display) if !display.trim().is_empty() => display.to_string(),
        _ => {
            warn!("Case '{id}' has no display name, synthesizing one");
            format!("📦 {id} Case")
        }
    };

    let mut tiers: Vec<RarityTier> = Vec::new();
    if let Some(Value::Object(raw_tiers)) = raw.get("items") {
        for (key, raw_tier) in raw_tiers {
            let Ok(rarity) = key.parse::<Rarity>() else {
                warn!("Case '{id}': dropping unknown rarity tier '{key}'");
                continue;
            };
            if tiers.iter().any(|t| t.rarity == rarity) {
                warn!("Case '{id}': duplicate tier '{key}', keeping the first");
                continue;
            }
            tiers.push(normalize_tier(id, rarity, raw_tier));
        }
    } else {
        warn!("Case '{id}' has no item tiers");
    }

    debug!(
        "Normalized case '{id}': cost {cost}, {} tiers",
        tiers.len()
    );
    CaseDefinition {
        id: id.to_string(),
        display_name,
        cost,
        tiers,
    }
}

fn normalize_tier(case_id: &str, rarity: Rarity, raw: &Value) -> RarityTier {
    let chance = raw.get("chance").and_then(as_number);
    let configured_base = positive_u64(raw.get("baseValue"));

    let items = raw
        .get("items")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let template = normalize_item(entry);
                    if template.is_none() {
                        warn!("Case '{case_id}' tier '{rarity}': dropping item without a name");
                    }
                    template
                })
                .collect()
        })
        .unwrap_or_default();

    RarityTier {
        rarity,
        chance,
        base_value: configured_base.unwrap_or(DEFAULT_TIER_BASE_VALUE),
        base_value_configured: configured_base.is_some(),
        items,
    }
}

fn normalize_item(raw: &Value) -> Option<ItemTemplate> {
    let name = raw.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let image_ref = raw
        .get("imageRef")
        .or_else(|| raw.get("gif"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some(ItemTemplate {
        name: name.to_string(),
        image_ref,
        base_value: positive_u64(raw.get("baseValue")),
    })
}

fn normalize_wear_system(raw: &Value) -> WearPolicy {
    let mut multipliers = [0.0; 5];
    for (slot, wear) in multipliers.iter_mut().zip(Wear::ALL) {
        let multiplier = raw
            .get(wear.catalog_key())
            .and_then(|grade| grade.get("valueMultiplier"))
            .and_then(as_number)
            .filter(|m| *m >= 0.0);
        let Some(multiplier) = multiplier else {
            warn!(
                "wearSystem is missing a valid '{}' entry, using uniform wear",
                wear.catalog_key()
            );
            return WearPolicy::Uniform;
        };
        *slot = multiplier;
    }
    WearPolicy::Table(WearTable::new(multipliers))
}

/// Accepts JSON numbers and numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn positive_u64(value: Option<&Value>) -> Option<u64> {
    value
        .and_then(as_number)
        .filter(|n| *n >= 1.0)
        .map(|n| n.floor() as u64)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_well_formed_catalog() {
        let json = r#"{
            "cases": {
                "dreams": {
                    "display": "Dreams & Nightmares",
                    "cost": 25,
                    "items": {
                        "consumer": { "chance": 50, "baseValue": 5, "items": [{ "name": "P250 | Sand", "imageRef": "p250.gif" }] },
                        "covert": { "baseValue": 800, "items": [{ "name": "AK-47 | Fire Serpent" }] }
                    }
                }
            }
        }"#;
        let catalog = parse_catalog(json).unwrap();
        let case = catalog.get_case("dreams").unwrap();
        assert_eq!(case.display_name, "Dreams & Nightmares");
        assert_eq!(case.cost, 25);
        assert_eq!(case.tiers.len(), 2);
        assert_eq!(case.tiers[0].rarity, Rarity::Consumer);
        assert_eq!(case.tiers[0].chance, Some(50.0));
        assert_eq!(case.tiers[0].items[0].image_ref.as_deref(), Some("p250.gif"));
        assert_eq!(case.tiers[1].rarity, Rarity::Covert);
        assert_eq!(case.tiers[1].weight(), 1.0);
        assert_eq!(case.tiers[1].base_value, 800);
        assert!(case.tiers[1].base_value_configured);
        assert_eq!(catalog.wear_policy(), &WearPolicy::Uniform);
    }

    #[test]
    fn test_missing_cost_and_display_are_defaulted() {
        let json = r#"{ "cases": { "gamma": { "items": {} }, "free": { "cost": 0, "display": "  " } } }"#;
        let catalog = parse_catalog(json).unwrap();
        let gamma = catalog.get_case("gamma").unwrap();
        assert_eq!(gamma.cost, DEFAULT_CASE_COST);
        assert_eq!(gamma.display_name, "📦 gamma Case");
        let free = catalog.get_case("free").unwrap();
        assert_eq!(free.cost, DEFAULT_CASE_COST);
        assert!(free.tiers.is_empty());
    }

    #[test]
    fn test_case_order_follows_file_order() {
        let json = r#"{ "cases": { "zeta": {}, "alpha": {}, "mid": {} } }"#;
        let catalog = parse_catalog(json).unwrap();
        let ids: Vec<&str> = catalog.list_cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_tier_and_item_fixups() {
        let json = r#"{ "cases": { "c": { "cost": "15", "items": {
            "Mil-Spec": { "items": [{ "name": "M4A4 | Howl", "gif": "howl.gif", "baseValue": 70 }, { "gif": "nameless.gif" }, { "name": "" }] },
            "gold": { "items": [{ "name": "Karambit" }] },
            "restricted": { "items": "not an array" }
        } } } }"#;
        let catalog = parse_catalog(json).unwrap();
        let case = catalog.get_case("c").unwrap();
        assert_eq!(case.cost, 15);
        assert_eq!(case.tiers.len(), 2);

        let mil_spec = &case.tiers[0];
        assert_eq!(mil_spec.rarity, Rarity::MilSpec);
        assert_eq!(mil_spec.base_value, DEFAULT_TIER_BASE_VALUE);
        assert!(!mil_spec.base_value_configured);
        assert_eq!(mil_spec.items.len(), 1);
        assert_eq!(mil_spec.items[0].image_ref.as_deref(), Some("howl.gif"));
        assert_eq!(mil_spec.items[0].base_value, Some(70));

        assert_eq!(case.tiers[1].rarity, Rarity::Restricted);
        assert!(case.tiers[1].items.is_empty());
    }

    #[test]
    fn test_complete_wear_system_enables_table() {
        let json = r#"{ "cases": {}, "wearSystem": {
            "factoryNew": { "display": "Factory New", "valueMultiplier": 1.5 },
            "minimalWear": { "valueMultiplier": 1.2 },
            "fieldTested": { "valueMultiplier": 1.0 },
            "wellWorn": { "valueMultiplier": 0.8 },
            "battleScarred": { "valueMultiplier": 0.6 }
        } }"#;
        let catalog = parse_catalog(json).unwrap();
        let WearPolicy::Table(table) = catalog.wear_policy() else {
            panic!("expected wear table");
        };
        assert_eq!(table.multiplier(Wear::MinimalWear), 1.2);
        assert_eq!(table.multiplier(Wear::BattleScarred), 0.6);
    }

    #[test]
    fn test_incomplete_wear_system_falls_back_to_uniform() {
        let json = r#"{ "wearSystem": { "factoryNew": { "valueMultiplier": 1.5 } } }"#;
        let catalog = parse_catalog(json).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.wear_policy(), &WearPolicy::Uniform);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            parse_catalog("{ not json"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_empty_file_is_empty_catalog() {
        assert!(parse_catalog("").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty_catalog() {
        let catalog = load_catalog("/definitely/not/here/catalog.json").unwrap();
        assert!(catalog.is_empty());
    }
}
