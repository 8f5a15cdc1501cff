use serde::{Deserialize, Serialize};

use super::super::domain::CategoryDefaults;

/// Market price assumed when a category has no reference data.
pub const FALLBACK_MARKET_PRICE: f64 = 500.0;

/// Expected lifespan assumed when a category has no reference data.
pub const FALLBACK_LIFESPAN_YEARS: u8 = 10;

/// Thresholds and fallbacks driving the amortization rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Purchases younger than this many years earn the age point.
    pub recent_purchase_window_years: i32,
    /// Highest floor a technician reaches without special equipment.
    pub accessible_floor_limit: i32,
    /// Fraction of the market price below which spend stays economical.
    pub repair_spend_ratio: f64,
    /// Totals at or above this classify as viable.
    pub viable_from: u8,
    /// Totals strictly below this classify as obsolete.
    pub obsolete_below: u8,
    pub fallback_market_price: f64,
    pub fallback_lifespan_years: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recent_purchase_window_years: 6,
            accessible_floor_limit: 2,
            repair_spend_ratio: 0.5,
            viable_from: 5,
            obsolete_below: 3,
            fallback_market_price: FALLBACK_MARKET_PRICE,
            fallback_lifespan_years: FALLBACK_LIFESPAN_YEARS,
        }
    }
}

impl ScoringConfig {
    /// Stand-in reference data for categories the catalog cannot resolve.
    pub fn fallback_defaults(&self, category: &str) -> CategoryDefaults {
        CategoryDefaults {
            category: category.to_string(),
            avg_market_price: self.fallback_market_price,
            avg_lifespan_years: self.fallback_lifespan_years,
            trivial_install: false,
        }
    }
}
