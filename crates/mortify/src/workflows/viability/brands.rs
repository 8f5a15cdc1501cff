use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Manufacturing tier a brand falls into for scoring purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandTier {
    Premium,
    Trusted,
    Recognized,
    Unlisted,
}

impl BrandTier {
    pub const fn rank(self) -> u8 {
        match self {
            BrandTier::Premium => 1,
            BrandTier::Trusted => 2,
            BrandTier::Recognized => 3,
            BrandTier::Unlisted => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BrandTier::Premium => "premium",
            BrandTier::Trusted => "trusted",
            BrandTier::Recognized => "recognized",
            BrandTier::Unlisted => "unlisted",
        }
    }
}

/// Curated tier assignments shipped with the service.
///
/// Names are stored normalized (trimmed, uppercased, single-spaced); lookups
/// normalize the same way, so matching is whole-name and case-insensitive.
const STANDARD_TIERS: &[(&str, BrandTier)] = &[
    ("MIELE", BrandTier::Premium),
    ("GAGGENAU", BrandTier::Premium),
    ("LIEBHERR", BrandTier::Premium),
    ("BOSCH", BrandTier::Trusted),
    ("SIEMENS", BrandTier::Trusted),
    ("AEG", BrandTier::Trusted),
    ("LG", BrandTier::Trusted),
    ("SAMSUNG", BrandTier::Trusted),
    ("ELECTROLUX", BrandTier::Trusted),
    ("WHIRLPOOL", BrandTier::Trusted),
    ("BALAY", BrandTier::Recognized),
    ("TEKA", BrandTier::Recognized),
    ("FAGOR", BrandTier::Recognized),
    ("ZANUSSI", BrandTier::Recognized),
    ("CANDY", BrandTier::Recognized),
    ("BEKO", BrandTier::Recognized),
    ("INDESIT", BrandTier::Recognized),
    ("CORBERO", BrandTier::Recognized),
    ("EDESA", BrandTier::Recognized),
];

/// Brand-to-tier lookup used by the amortization engine.
///
/// The table is plain data handed to the engine at construction, so tests and
/// deployments can swap the curated set without touching scoring code.
#[derive(Debug, Clone)]
pub struct BrandTierTable {
    tiers: HashMap<String, BrandTier>,
}

impl BrandTierTable {
    /// Table holding the curated assignments in [`STANDARD_TIERS`].
    pub fn standard() -> Self {
        Self::from_entries(
            STANDARD_TIERS
                .iter()
                .map(|(name, tier)| ((*name).to_string(), *tier)),
        )
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, BrandTier)>,
    {
        let mut tiers = HashMap::new();
        for (name, tier) in entries {
            let normalized = normalize_brand(&name);
            if normalized.is_empty() {
                continue;
            }
            tiers.insert(normalized, tier);
        }
        Self { tiers }
    }

    /// Whole-name lookup; anything not in the table is [`BrandTier::Unlisted`].
    pub fn tier_for(&self, brand: &str) -> BrandTier {
        let normalized = normalize_brand(brand);
        if normalized.is_empty() {
            return BrandTier::Unlisted;
        }
        self.tiers
            .get(&normalized)
            .copied()
            .unwrap_or(BrandTier::Unlisted)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

fn normalize_brand(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != '\u{feff}' && *c != '\u{200b}')
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

#[cfg(test)]
pub(crate) fn normalize_brand_for_tests(value: &str) -> String {
    normalize_brand(value)
}
