//! Item entity - an owned, unboxed skin.
//!
//! Items are created by case openings and marketplace purchases and live in
//! exactly one (guild, user) inventory or one market listing at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::warn;

/// Rarity tiers in ascending order of rarity and value.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Rarity {
    /// Most common tier
    #[default]
    Consumer,
    /// Second tier
    Industrial,
    /// Third tier
    MilSpec,
    /// Fourth tier
    Restricted,
    /// Fifth tier
    Classified,
    /// Rarest tier
    Covert,
}

impl Rarity {
    /// All tiers, most common first.
    pub const ALL: [Self; 6] = [
        Self::Consumer,
        Self::Industrial,
        Self::MilSpec,
        Self::Restricted,
        Self::Classified,
        Self::Covert,
    ];

    /// Key used in the catalog and in persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Industrial => "industrial",
            Self::MilSpec => "mil-spec",
            Self::Restricted => "restricted",
            Self::Classified => "classified",
            Self::Covert => "covert",
        }
    }

    /// Draw weight used when a catalog tier does not specify `chance`.
    #[must_use]
    pub const fn default_weight(self) -> f64 {
        match self {
            Self::Consumer => 40.0,
            Self::Industrial => 30.0,
            Self::MilSpec => 15.0,
            Self::Restricted => 10.0,
            Self::Classified => 4.0,
            Self::Covert => 1.0,
        }
    }

    /// Embed colour for this tier.
    #[must_use]
    pub const fn color(self) -> u32 {
        match self {
            Self::Consumer => 0x00B0_C3D9,
            Self::Industrial => 0x005E_98D9,
            Self::MilSpec => 0x004B_69FF,
            Self::Restricted => 0x0088_47FF,
            Self::Classified => 0x00D3_2CE6,
            Self::Covert => 0x00EB_4B4B,
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Consumer => "🟢",
            Self::Industrial => "🔵",
            Self::MilSpec => "🔷",
            Self::Restricted => "🟣",
            Self::Classified => "🟠",
            Self::Covert => "🔴",
        }
    }

    /// Human readable label, e.g. "Mil Spec".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Consumer => "Consumer",
            Self::Industrial => "Industrial",
            Self::MilSpec => "Mil Spec",
            Self::Restricted => "Restricted",
            Self::Classified => "Classified",
            Self::Covert => "Covert",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "consumer" => Ok(Self::Consumer),
            "industrial" => Ok(Self::Industrial),
            "mil-spec" | "milspec" => Ok(Self::MilSpec),
            "restricted" => Ok(Self::Restricted),
            "classified" => Ok(Self::Classified),
            "covert" => Ok(Self::Covert),
            _ => Err(format!("unknown rarity '{s}'")),
        }
    }
}

// Lenient: legacy records carry capitalised or unknown tiers ("Common", "Gold").
impl From<String> for Rarity {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|e| {
            let fallback = Self::default();
            warn!("{e}, loading as {fallback}");
            fallback
        })
    }
}

/// Wear condition of a drawn item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Wear {
    /// Best condition
    #[serde(rename = "Factory New")]
    FactoryNew,
    #[serde(rename = "Minimal Wear")]
    MinimalWear,
    #[serde(rename = "Field-Tested")]
    FieldTested,
    #[serde(rename = "Well-Worn")]
    WellWorn,
    /// Worst condition
    #[default]
    #[serde(rename = "Battle-Scarred")]
    BattleScarred,
}

impl Wear {
    /// All wear conditions, best first.
    pub const ALL: [Self; 5] = [
        Self::FactoryNew,
        Self::MinimalWear,
        Self::FieldTested,
        Self::WellWorn,
        Self::BattleScarred,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FactoryNew => "Factory New",
            Self::MinimalWear => "Minimal Wear",
            Self::FieldTested => "Field-Tested",
            Self::WellWorn => "Well-Worn",
            Self::BattleScarred => "Battle-Scarred",
        }
    }

    /// Key of this condition in the catalog's `wearSystem` table.
    #[must_use]
    pub const fn catalog_key(self) -> &'static str {
        match self {
            Self::FactoryNew => "factoryNew",
            Self::MinimalWear => "minimalWear",
            Self::FieldTested => "fieldTested",
            Self::WellWorn => "wellWorn",
            Self::BattleScarred => "battleScarred",
        }
    }
}

impl fmt::Display for Wear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Wear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphabetic)
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "factorynew" => Ok(Self::FactoryNew),
            "minimalwear" => Ok(Self::MinimalWear),
            "fieldtested" => Ok(Self::FieldTested),
            "wellworn" | "worn" => Ok(Self::WellWorn),
            "battlescarred" => Ok(Self::BattleScarred),
            _ => Err(format!("unknown wear '{s}'")),
        }
    }
}

impl From<String> for Wear {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|e| {
            let fallback = Self::default();
            warn!("{e}, loading as {fallback}");
            fallback
        })
    }
}

/// A persisted inventory item.
///
/// Serialized as `{ id, name, rarity, wear, value, imageRef?, obtainedAt }`.
/// The aliases accept records written before ids and the current field names existed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    /// Globally unique readable id, e.g. `panda-golden-42`
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub wear: Wear,
    /// Sell value in coins
    #[serde(default)]
    pub value: u64,
    #[serde(default, alias = "gif", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(alias = "obtained", default = "Utc::now")]
    pub obtained_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_rarity_ordering_is_ascending() {
        assert!(Rarity::Consumer < Rarity::Industrial);
        assert!(Rarity::Classified < Rarity::Covert);
        assert_eq!(Rarity::ALL.iter().max(), Some(&Rarity::Covert));
    }

    #[test]
    fn test_rarity_parse_variants() {
        assert_eq!("mil-spec".parse::<Rarity>().unwrap(), Rarity::MilSpec);
        assert_eq!("Mil_Spec".parse::<Rarity>().unwrap(), Rarity::MilSpec);
        assert_eq!("COVERT".parse::<Rarity>().unwrap(), Rarity::Covert);
        assert!("gold".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_wear_parse_variants() {
        assert_eq!("field-tested".parse::<Wear>().unwrap(), Wear::FieldTested);
        assert_eq!("Factory New".parse::<Wear>().unwrap(), Wear::FactoryNew);
        assert_eq!("Worn".parse::<Wear>().unwrap(), Wear::WellWorn);
    }

    #[test]
    fn test_item_record_json_shape() {
        let item = ItemRecord {
            id: "fox-calm-7".to_string(),
            name: "AK-47 | Redline".to_string(),
            rarity: Rarity::MilSpec,
            wear: Wear::FieldTested,
            value: 42,
            image_ref: None,
            obtained_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["rarity"], "mil-spec");
        assert_eq!(json["wear"], "Field-Tested");
        assert!(json.get("imageRef").is_none());
        assert!(json.get("obtainedAt").is_some());
    }

    #[test]
    fn test_item_record_reads_legacy_fields() {
        let json = r#"{
            "name": "Glock-18 | Fade",
            "rarity": "Covert",
            "wear": "Minimal Wear",
            "value": 300,
            "gif": "https://example.com/fade.gif",
            "obtained": "2024-05-01T12:00:00Z"
        }"#;
        let item: ItemRecord = serde_json::from_str(json).unwrap();
        assert!(item.id.is_empty());
        assert_eq!(item.rarity, Rarity::Covert);
        assert_eq!(item.wear, Wear::MinimalWear);
        assert_eq!(
            item.image_ref.as_deref(),
            Some("https://example.com/fade.gif")
        );
        assert_eq!(item.obtained_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_unknown_rarity_falls_back_to_consumer() {
        let json = r#"{"id":"a","name":"Mysterious Trinket","rarity":"Common","wear":"Worn","value":0}"#;
        let item: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(item.rarity, Rarity::Consumer);
        assert_eq!(item.wear, Wear::WellWorn);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_legacy_gold_rarity_is_demoted_with_warning() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let item: ItemRecord = tracing::subscriber::with_default(subscriber, || {
            serde_json::from_str(
                r#"{"id":"a","name":"Karambit | Gold","rarity":"Gold","wear":"Scratched","value":900}"#,
            )
            .unwrap()
        });

        assert_eq!(item.rarity, Rarity::Consumer);
        assert_eq!(item.wear, Wear::BattleScarred);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("unknown rarity 'Gold', loading as consumer"), "{output}");
        assert!(output.contains("unknown wear 'Scratched', loading as Battle-Scarred"), "{output}");
    }
}
