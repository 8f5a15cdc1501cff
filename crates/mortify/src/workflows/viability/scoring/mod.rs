mod config;
mod factors;
mod policy;

pub use config::{ScoringConfig, FALLBACK_LIFESPAN_YEARS, FALLBACK_MARKET_PRICE};
pub use policy::ViabilitySuggestion;

pub(crate) use factors::{age_points, brand_points, financial_points, installation_points};
pub(crate) use policy::suggest_outcome;

use serde::{Deserialize, Serialize};

use super::brands::BrandTierTable;
use super::domain::CategoryDefaults;

/// Stateless scorer that applies the amortization rubric to a snapshot.
///
/// The engine owns nothing mutable; concurrent scoring runs over the same
/// appliance never contend, they just produce separate assessments.
pub struct AmortizationEngine {
    config: ScoringConfig,
    brands: BrandTierTable,
}

impl AmortizationEngine {
    pub fn new(config: ScoringConfig, brands: BrandTierTable) -> Self {
        Self { config, brands }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, snapshot: &ScoringSnapshot) -> ScoreBreakdown {
        let (components, total_score) = factors::score_snapshot(snapshot, &self.config, &self.brands);

        let suggestion = suggest_outcome(total_score, &self.config);

        ScoreBreakdown {
            components,
            total_score,
            suggestion,
        }
    }
}

/// Factor the amortization rubric scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Brand,
    Age,
    Installation,
    Financial,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::Brand => "brand",
            ScoreFactor::Age => "age",
            ScoreFactor::Installation => "installation",
            ScoreFactor::Financial => "financial",
        }
    }
}

/// Discrete contribution to a score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: u8,
    pub notes: String,
}

/// Everything the rubric consumes for one run, resolved ahead of scoring.
///
/// Resolution (inputs over stored fields, catalog defaults, ledger spend)
/// happens in the service; the engine sees only settled values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSnapshot {
    pub brand: String,
    pub current_year: i32,
    pub purchase_year: Option<i32>,
    pub floor_level: i32,
    pub total_spent: f64,
    pub defaults: CategoryDefaults,
}

/// Scoring output: per-factor audit rows, the raw total, and the suggestion.
///
/// The total is stored unclamped; presentation squeezes it into the display
/// scale later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total_score: u8,
    pub suggestion: ViabilitySuggestion,
}

impl ScoreBreakdown {
    pub fn points_for(&self, factor: ScoreFactor) -> u8 {
        self.components
            .iter()
            .find(|component| component.factor == factor)
            .map(|component| component.points)
            .unwrap_or(0)
    }
}
