//! Case catalog - the read-only, strongly-typed view of the configured cases.
//!
//! A `Catalog` is produced once at startup by
//! [`crate::config::catalog::parse_catalog`], which has already replaced any
//! missing or malformed values with defaults. Lookups here never fail because
//! of bad configuration, only because of unknown ids.

use crate::{
    entities::{Rarity, Wear},
    errors::{Error, Result},
};

/// A concrete item that can drop from a tier.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub name: String,
    pub image_ref: Option<String>,
    /// Per-item base value, used by the wear table when the tier sets none
    pub base_value: Option<u64>,
}

/// One rarity tier of a case.
#[derive(Debug, Clone, PartialEq)]
pub struct RarityTier {
    pub rarity: Rarity,
    /// Explicit draw weight from the catalog, if any
    pub chance: Option<f64>,
    pub base_value: u64,
    /// False when `base_value` is the fallback default
    pub base_value_configured: bool,
    pub items: Vec<ItemTemplate>,
}

impl RarityTier {
    /// Weight of this tier in the cumulative draw table.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.chance
            .filter(|c| c.is_finite() && *c > 0.0)
            .unwrap_or_else(|| self.rarity.default_weight())
    }

    /// Base value priced by the wear table: the tier's configured value,
    /// else the drawn item's own, else the tier default.
    #[must_use]
    pub fn table_base_value(&self, template: &ItemTemplate) -> u64 {
        if self.base_value_configured {
            self.base_value
        } else {
            template.base_value.unwrap_or(self.base_value)
        }
    }
}

/// A case users can buy and open.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDefinition {
    /// Internal key from the catalog file
    pub id: String,
    pub display_name: String,
    /// Price in coins, always positive
    pub cost: u64,
    /// Tiers in catalog order
    pub tiers: Vec<RarityTier>,
}

impl CaseDefinition {
    /// First tier, in catalog order, that has at least one item.
    #[must_use]
    pub fn first_stocked_tier(&self) -> Option<&RarityTier> {
        self.tiers.iter().find(|t| !t.items.is_empty())
    }

    /// Total number of item templates across all tiers.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.tiers.iter().map(|t| t.items.len()).sum()
    }
}

/// Value multiplier for each wear condition, indexed like [`Wear::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WearTable {
    multipliers: [f64; 5],
}

impl WearTable {
    /// Builds a table from multipliers ordered Factory New → Battle-Scarred.
    #[must_use]
    pub const fn new(multipliers: [f64; 5]) -> Self {
        Self { multipliers }
    }

    #[must_use]
    pub fn multiplier(&self, wear: Wear) -> f64 {
        let index = Wear::ALL.iter().position(|w| *w == wear).unwrap_or(0);
        self.multipliers[index]
    }
}

/// How the selector assigns a wear condition and computes item value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WearPolicy {
    /// Uniform wear, value jittered ±30% around the tier base value
    #[default]
    Uniform,
    /// Weighted wear ladder, value scaled by the wear's multiplier
    Table(WearTable),
}

/// All configured cases plus the catalog-wide wear policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cases: Vec<CaseDefinition>,
    wear_policy: WearPolicy,
}

impl Catalog {
    #[must_use]
    pub const fn new(cases: Vec<CaseDefinition>, wear_policy: WearPolicy) -> Self {
        Self { cases, wear_policy }
    }

    /// Exact lookup by internal case id.
    pub fn get_case(&self, case_id: &str) -> Result<&CaseDefinition> {
        self.cases
            .iter()
            .find(|c| c.id == case_id)
            .ok_or_else(|| Error::CaseNotFound {
                name: case_id.to_string(),
            })
    }

    /// Resolves user input to a case: an exact id match wins, otherwise the
    /// first case (in catalog order) whose id or display name matches
    /// case-insensitively.
    pub fn find_case(&self, input: &str) -> Result<&CaseDefinition> {
        let trimmed = input.trim();
        if let Ok(found) = self.get_case(trimmed) {
            return Ok(found);
        }
        let lowered = trimmed.to_lowercase();
        self.cases
            .iter()
            .find(|c| c.id.to_lowercase() == lowered || c.display_name.to_lowercase() == lowered)
            .ok_or_else(|| Error::CaseNotFound {
                name: trimmed.to_string(),
            })
    }

    /// All cases in catalog order.
    #[must_use]
    pub fn list_cases(&self) -> &[CaseDefinition] {
        &self.cases
    }

    #[must_use]
    pub const fn wear_policy(&self) -> &WearPolicy {
        &self.wear_policy
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
